/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! historical hourly weather at the time and place of a fire event

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::warn;
use odin_common::{datetime::full_hour, net::{blocking_client, get_json}};

use crate::config::WeatherServiceConfig;
use crate::errors::Result;
use crate::geo::GeoPoint;

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct WeatherQuery {
    pub location: GeoPoint,
    pub time: DateTime<Utc>,
}

/// one hourly observation. Providers might not have all fields
#[derive(Debug,Clone,Default,PartialEq)]
pub struct WeatherObservation {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_deg: Option<f64>,
    pub clouds: Option<f64>,
    pub rain_1h: Option<f64>,
    pub weather: Option<String>,
}

impl WeatherObservation {
    pub fn has_any (&self)->bool {
        self.temp.is_some() || self.humidity.is_some() || self.pressure.is_some() || self.wind_speed.is_some()
        || self.wind_deg.is_some() || self.clouds.is_some() || self.rain_1h.is_some() || self.weather.is_some()
    }
}

/// returns the first available hourly observation in the window that starts at the full hour of the query time.
/// Implementors return None on any failure or if there is no observation in the window, and log the cause
pub trait WeatherResolver {
    fn lookup (&mut self, query: &WeatherQuery)->Option<WeatherObservation>;
}

/* #region Open-Meteo *****************************************************************************************/

const HOURLY_VARS: &str = "temperature_2m,relative_humidity_2m,surface_pressure,wind_speed_10m,wind_direction_10m,cloud_cover,rain,weather_code";

#[derive(Debug,Deserialize)]
struct ArchiveResponse {
    hourly: Option<HourlySeries>,
}

/// column oriented hourly series as returned by the Open-Meteo archive API (values are null if unknown)
#[derive(Debug,Default,Deserialize)]
#[serde(default)]
struct HourlySeries {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    surface_pressure: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    wind_direction_10m: Vec<Option<f64>>,
    cloud_cover: Vec<Option<f64>>,
    rain: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
}

impl HourlySeries {
    fn observation_at (&self, i: usize)->WeatherObservation {
        WeatherObservation {
            temp: value_at( &self.temperature_2m, i),
            humidity: value_at( &self.relative_humidity_2m, i),
            pressure: value_at( &self.surface_pressure, i),
            wind_speed: value_at( &self.wind_speed_10m, i),
            wind_deg: value_at( &self.wind_direction_10m, i),
            clouds: value_at( &self.cloud_cover, i),
            rain_1h: value_at( &self.rain, i),
            weather: value_at( &self.weather_code, i).and_then( wmo_description).map(|s| s.to_string()),
        }
    }

    /// the first hour within [start,end] that has any value
    fn first_observation (&self, start: &DateTime<Utc>, end: &DateTime<Utc>)->Option<WeatherObservation> {
        for (i,t) in self.time.iter().enumerate() {
            if let Some(t) = parse_hour(t) {
                if t >= *start && t <= *end {
                    let obs = self.observation_at(i);
                    if obs.has_any() { return Some(obs) }
                }
            }
        }
        None
    }
}

fn value_at<T: Copy> (v: &[Option<T>], i: usize)->Option<T> {
    v.get(i).copied().flatten()
}

fn parse_hour (s: &str)->Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").ok().map( |ndt| Utc.from_utc_datetime(&ndt))
}

/// short text for WMO weather interpretation codes (WW) as used by Open-Meteo
fn wmo_description (code: i32)->Option<&'static str> {
    match code {
        0 => Some("clear sky"),
        1 => Some("mainly clear"),
        2 => Some("partly cloudy"),
        3 => Some("overcast"),
        45 | 48 => Some("fog"),
        51 | 53 | 55 => Some("drizzle"),
        56 | 57 => Some("freezing drizzle"),
        61 | 63 | 65 => Some("rain"),
        66 | 67 => Some("freezing rain"),
        71 | 73 | 75 | 77 => Some("snow"),
        80 | 81 | 82 => Some("rain showers"),
        85 | 86 => Some("snow showers"),
        95 => Some("thunderstorm"),
        96 | 99 => Some("thunderstorm with hail"),
        _ => None
    }
}

/// weather resolver that uses the Open-Meteo historical weather (reanalysis) API
pub struct OpenMeteoWeatherResolver {
    client: Client,
    config: WeatherServiceConfig,
}

impl OpenMeteoWeatherResolver {
    pub fn new (config: WeatherServiceConfig)->Result<Self> {
        let client = blocking_client( None, config.timeout)?;
        Ok( OpenMeteoWeatherResolver { client, config } )
    }

    fn window (&self, time: &DateTime<Utc>)->(DateTime<Utc>,DateTime<Utc>) {
        let start = full_hour(time);
        let window = chrono::Duration::from_std( self.config.window).unwrap_or( chrono::Duration::hours(6));
        (start, start + window)
    }
}

impl WeatherResolver for OpenMeteoWeatherResolver {
    fn lookup (&mut self, query: &WeatherQuery)->Option<WeatherObservation> {
        let (start,end) = self.window( &query.time);
        let params = [
            ("latitude", query.location.lat.to_string()),
            ("longitude", query.location.lon.to_string()),
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
            ("hourly", HOURLY_VARS.to_string()),
            ("timezone", "UTC".to_string()),
        ];

        match get_json::<ArchiveResponse,_>( &self.client, &self.config.base_url, &params) {
            Ok(response) => {
                let obs = response.hourly.and_then( |series| series.first_observation( &start, &end));
                if obs.is_none() {
                    warn!("[WeatherError] no observations for {},{} between {} and {}", query.location.lat, query.location.lon, start, end);
                }
                obs
            }
            Err(e) => {
                warn!("[WeatherError] {e}");
                None
            }
        }
    }
}

/* #endregion Open-Meteo */

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "latitude": 48.86, "longitude": 2.34, "utc_offset_seconds": 0, "timezone": "GMT",
        "hourly": {
            "time": ["2022-08-10T13:00","2022-08-10T14:00","2022-08-10T15:00","2022-08-10T16:00"],
            "temperature_2m": [28.1, null, 29.4, 30.0],
            "relative_humidity_2m": [35, null, 31, 30],
            "surface_pressure": [1012.3, null, null, 1011.8],
            "wind_speed_10m": [11.2, null, 9.8, 9.0],
            "wind_direction_10m": [220, null, 230, 240],
            "cloud_cover": [0, null, 5, 10],
            "rain": [0.0, null, 0.0, 0.0],
            "weather_code": [0, null, 1, 2]
        }
    }"#;

    fn utc (s: &str)->DateTime<Utc> { parse_hour(s).unwrap() }

    #[test]
    fn test_first_observation_in_window() {
        let response: ArchiveResponse = serde_json::from_str(RESPONSE).unwrap();
        let series = response.hourly.unwrap();

        // 14:00 is all null, so the first available observation is 15:00
        let obs = series.first_observation( &utc("2022-08-10T14:00"), &utc("2022-08-10T20:00")).unwrap();
        assert_eq!( obs.temp, Some(29.4));
        assert_eq!( obs.humidity, Some(31.0));
        assert_eq!( obs.pressure, None);
        assert_eq!( obs.weather.as_deref(), Some("mainly clear"));

        assert!( series.first_observation( &utc("2022-08-11T00:00"), &utc("2022-08-11T06:00")).is_none());
    }

    #[test]
    fn test_empty_series() {
        let response: ArchiveResponse = serde_json::from_str(r#"{"hourly": {"time": []}}"#).unwrap();
        let series = response.hourly.unwrap();
        assert!( series.first_observation( &utc("2022-08-10T14:00"), &utc("2022-08-10T20:00")).is_none());
    }

    #[test]
    fn test_window() {
        let resolver = OpenMeteoWeatherResolver::new( WeatherServiceConfig::default()).unwrap();
        let t = odin_common::datetime::parse_utc_datetime("2022-08-10 14:35:00").unwrap();
        let (start,end) = resolver.window(&t);
        assert_eq!( start, utc("2022-08-10T14:00"));
        assert_eq!( end, utc("2022-08-10T20:00"));
    }
}
