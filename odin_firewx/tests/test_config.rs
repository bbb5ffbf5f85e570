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

#![allow(unused)]

use std::path::{Path, PathBuf};
use odin_common::datetime::{hours, secs};
use odin_firewx::{load_config, EnrichConfig, ImageConfig};

// run with "cargo test --test test_config -- --nocapture"

fn config_path (name: &str)->PathBuf {
    Path::new( env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

#[test]
fn test_enrich_weather_config() {
    let config: EnrichConfig = load_config( config_path("enrich_weather.ron")).unwrap();
    println!("{config:#?}");

    assert_eq!( config.delimiter, ';');
    assert_eq!( config.columns.location, "Code INSEE");
    assert_eq!( config.geocoder.timeout, secs(10));
    assert_eq!( config.weather.window, hours(6));
    assert_eq!( config.weather.min_interval, secs(1));
}

#[test]
fn test_fire_images_config() {
    let config: ImageConfig = load_config( config_path("fire_images.ron")).unwrap();

    assert_eq!( config.output_delimiter, ',');
    assert_eq!( config.service.margin, 0.05);
    assert_eq!( config.service.format, "image/png"); // default
    assert_eq!( config.columns.image_path, "image_path");
    assert_eq!( config.prep.drop_columns.len(), 9);
}

#[test]
fn test_missing_config() {
    assert!( load_config::<EnrichConfig>( config_path("no_such_config.ron")).is_err());
}
