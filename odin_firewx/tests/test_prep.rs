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

use odin_firewx::{config::PrepConfig, prep::prepare_image_table, table::Table};

// run with "cargo test --test test_prep -- --nocapture"

const ENRICHED: &str = "\
Code INSEE;Date de première alerte;Nature;Surface parcourue (m2);Surfaces agricoles (m2);latitude;longitude;temp;humidity;weather;clouds
75056;2022-08-10 14:00:00;Forêt;1000;0;48.8566;2.3522;29;30;;
13055;2022-07-01;Maquis;0;;43.2965;5.3698;25;;;
2A004;2022-08-15;;500;;41.9192;8.7386;;;;
2B033;2022-08-20;Autre;2500;;42.5;9.1;;;;
06088;not a date;Forêt;300;;43.7;7.26;31;50;;
";

#[test]
fn test_prepare_image_table() {
    let enriched = Table::read_from( ENRICHED.as_bytes(), b';').unwrap();
    let t = prepare_image_table( enriched, &PrepConfig::default()).unwrap();

    let names: Vec<&str> = t.header().names().iter().map(|s| s.as_str()).collect();
    assert_eq!( names, vec![
        "Code INSEE", "Date de première alerte", "Nature", "Surface parcourue (m2)",
        "latitude", "longitude", "temp", "humidity", "Nature_encoded", "date_str"
    ]);

    // zero area and missing vegetation type are filtered out
    assert_eq!( t.column_values("Code INSEE"), vec!["75056", "2B033", "06088"]);

    // gaps in numeric columns get the column median, present values are not touched
    assert_eq!( t.column_values("temp"), vec!["29", "30", "31"]);
    assert_eq!( t.column_values("humidity"), vec!["30", "40", "50"]);

    assert_eq!( t.column_values("Nature_encoded"), vec!["1", "0", "1"]);
    assert_eq!( t.column_values("date_str"), vec!["2022-08-10", "2022-08-20", ""]);
}

#[test]
fn test_missing_columns() {
    let enriched = Table::read_from( "Code INSEE;Nature\n75056;Forêt\n".as_bytes(), b';').unwrap();
    assert!( prepare_image_table( enriched, &PrepConfig::default()).is_err());
}
