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

//! geocoding of administrative location codes

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::warn;
use odin_common::net::{blocking_client, get_json};

use crate::config::GeocoderConfig;
use crate::errors::Result;

/// WGS84 position in decimal degrees
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new (lat: f64, lon: f64)->Self { GeoPoint { lat, lon } }
}

/// resolves a location code into coordinates. Implementors return None on any failure, including
/// "no match", and log the cause. Each call issues at most one request (no retries)
pub trait GeoResolver {
    fn lookup (&mut self, location_code: &str)->Option<GeoPoint>;
}

#[derive(Debug,Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// geocoder that uses the free-form query of a Nominatim server (OpenStreetMap)
pub struct NominatimGeoResolver {
    client: Client,
    config: GeocoderConfig,
}

impl NominatimGeoResolver {
    pub fn new (config: GeocoderConfig)->Result<Self> {
        let client = blocking_client( Some(config.user_agent.as_str()), Some(config.timeout))?;
        Ok( NominatimGeoResolver { client, config } )
    }

    fn query_string (&self, location_code: &str)->String {
        if self.config.query_prefix.is_empty() {
            location_code.to_string()
        } else {
            format!("{} {}", self.config.query_prefix, location_code)
        }
    }
}

impl GeoResolver for NominatimGeoResolver {
    fn lookup (&mut self, location_code: &str)->Option<GeoPoint> {
        let q = self.query_string(location_code);
        let query = [ ("q", q.as_str()), ("format", "json"), ("limit", "1") ];

        match get_json::<Vec<NominatimPlace>,_>( &self.client, &self.config.base_url, &query) {
            Ok(places) => {
                let pt = places.first().and_then( parse_place);
                if pt.is_none() { warn!("[GeoError] no match for location {location_code}") }
                pt
            }
            Err(e) => {
                warn!("[GeoError] location {location_code}: {e}");
                None
            }
        }
    }
}

fn parse_place (place: &NominatimPlace)->Option<GeoPoint> {
    let lat: f64 = place.lat.trim().parse().ok()?;
    let lon: f64 = place.lon.trim().parse().ok()?;
    if lat.is_finite() && lon.is_finite() { Some( GeoPoint::new(lat,lon)) } else { None }
}
