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

//! the set of enrichment tasks that are already completed in durable output.
//!
//! The ledger is rebuilt at startup by scanning the existing output, which is O(size of output).
//! What counts as "completed" differs between the pipelines:
//!  - weather/geo: every appended row is done, even if all its enrichment fields are absent
//!  - images: a row is only done if it has a non-empty image path that is not the textual "None"

use std::{collections::HashSet, path::Path};
use odin_common::fs::is_empty_or_missing;

use crate::errors::{op_failed, Result};
use crate::key::{FieldKeyRule, IdentityKey};
use crate::record::{is_absent_text, InputDataset};
use crate::table::Table;
use crate::writer::repair_appended_output;

#[derive(Debug,Default)]
pub struct ResumeLedger {
    done: HashSet<IdentityKey>,
}

impl ResumeLedger {
    pub fn new ()->Self { ResumeLedger { done: HashSet::new() } }

    /// keys of all rows in an append-only output file, using the same rule the driver uses for input records.
    /// A missing or empty file means nothing is done yet. An incomplete last row is removed from the file first
    pub fn from_appended_output (path: impl AsRef<Path>, delimiter: u8, rule: &FieldKeyRule)->Result<Self> {
        let path = path.as_ref();
        let mut done = HashSet::new();

        repair_appended_output(path)?;

        if !is_empty_or_missing(path) {
            let ds = InputDataset::open( path, delimiter)?;
            let missing = rule.missing_columns( ds.header());
            if !missing.is_empty() {
                return Err( op_failed!("output {:?} lacks key columns {:?}", path, missing))
            }

            for (_,res) in ds.records() {
                if let Some(key) = rule.key_of( &res?) {
                    done.insert(key);
                }
            }
        }

        Ok( ResumeLedger { done } )
    }

    /// row indices of an image table that already have a stored image
    pub fn from_image_table (table: &Table, image_column: &str)->Self {
        let done = table.column_values(image_column).iter().enumerate()
            .filter( |(_,v)| !is_absent_text(v))
            .map( |(i,_)| IdentityKey::from_index(i))
            .collect();

        ResumeLedger { done }
    }

    pub fn is_done (&self, key: &IdentityKey)->bool { self.done.contains(key) }

    /// only to be called after the record for `key` was durably persisted
    pub fn mark_done (&mut self, key: IdentityKey) { self.done.insert(key); }

    pub fn len (&self)->usize { self.done.len() }

    pub fn is_empty (&self)->bool { self.done.is_empty() }
}
