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

use std::fs;
use odin_firewx::{
    config::SourceColumns,
    key::IdentityKey,
    ledger::ResumeLedger,
    table::Table,
};

// run with "cargo test --test test_ledger -- --nocapture"

#[test]
fn test_ledger_from_appended_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let rule = SourceColumns::default().key_rule();

    let ledger = ResumeLedger::from_appended_output( &path, b';', &rule).unwrap();
    assert!( ledger.is_empty());

    // rows with all enrichment fields absent are still done
    fs::write( &path, "\
Code INSEE;Date de première alerte;latitude;longitude
75056;2022-08-10;48.8566;2.3522
99999;2022-09-01;;
").unwrap();

    let ledger = ResumeLedger::from_appended_output( &path, b';', &rule).unwrap();
    assert_eq!( ledger.len(), 2);
    assert!( ledger.is_done( &IdentityKey::from_parts( &["75056", "2022-08-10"])));
    assert!( ledger.is_done( &IdentityKey::from_parts( &["99999", "2022-09-01"])));
    assert!( !ledger.is_done( &IdentityKey::from_parts( &["75056", "2022-08-11"])));
}

#[test]
fn test_ledger_from_image_table() {
    let t = Table::read_from( "\
latitude,longitude,image_path
1.0,2.0,fire_images/fire_0.png
1.0,2.0,None
1.0,2.0,
1.0,2.0, 
".as_bytes(), b',').unwrap();

    let mut ledger = ResumeLedger::from_image_table( &t, "image_path");
    assert_eq!( ledger.len(), 1);
    assert!( ledger.is_done( &IdentityKey::from_index(0)));
    assert!( !ledger.is_done( &IdentityKey::from_index(1)));

    ledger.mark_done( IdentityKey::from_index(2));
    assert!( ledger.is_done( &IdentityKey::from_index(2)));
}
