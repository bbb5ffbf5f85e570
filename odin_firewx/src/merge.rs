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

use std::path::Path;

use crate::geo::GeoPoint;
use crate::record::{Enrichment, InputRecord, OutputRecord};
use crate::weather::WeatherObservation;

/// combine an input record with the (possibly absent) lookup results. This is total - every enrichment
/// field is set, either from a present result or as absent
pub fn merge (input: InputRecord, geo: Option<GeoPoint>, weather: Option<WeatherObservation>)->OutputRecord {
    let mut enrichment = Enrichment::default();

    if let Some(pt) = geo {
        enrichment.latitude = Some(pt.lat);
        enrichment.longitude = Some(pt.lon);
    }

    if let Some(obs) = weather {
        enrichment.temp = obs.temp;
        enrichment.humidity = obs.humidity;
        enrichment.pressure = obs.pressure;
        enrichment.wind_speed = obs.wind_speed;
        enrichment.wind_deg = obs.wind_deg;
        enrichment.clouds = obs.clouds;
        enrichment.rain_1h = obs.rain_1h;
        enrichment.weather = obs.weather;
    }

    OutputRecord { input, enrichment }
}

/// the `image_path` field value for an image lookup result. Absent is the empty string, never "None"
pub fn image_path_field (path: Option<&Path>)->String {
    path.map( |p| p.to_string_lossy().into_owned()).unwrap_or_default()
}
