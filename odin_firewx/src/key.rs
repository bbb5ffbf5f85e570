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

use std::fmt;
use crate::record::{Header, InputRecord};

const KEY_SEPARATOR: &str = "|";

/// the identity of a record's enrichment task. Records with equal keys are the same task
#[derive(Debug,Clone,PartialEq,Eq,Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn from_parts (parts: &[&str])->Self {
        IdentityKey( parts.join(KEY_SEPARATOR))
    }

    /// for tables that are only ever processed in place (row position is stable)
    pub fn from_index (idx: usize)->Self {
        IdentityKey( idx.to_string())
    }

    pub fn as_str (&self)->&str { self.0.as_str() }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// derives identity keys from the raw text of named record fields. The same rule has to be used for
/// input records and for rows read back from persisted output
#[derive(Debug,Clone)]
pub struct FieldKeyRule {
    columns: Vec<String>
}

impl FieldKeyRule {
    pub fn new (columns: Vec<String>)->Self { FieldKeyRule { columns } }

    pub fn columns (&self)->&[String] { &self.columns }

    /// names of key columns that are not in `header`
    pub fn missing_columns (&self, header: &Header)->Vec<&str> {
        self.columns.iter().filter(|c| !header.contains(c)).map(|c| c.as_str()).collect()
    }

    /// None if the record does not have all key columns
    pub fn key_of (&self, rec: &InputRecord)->Option<IdentityKey> {
        let mut parts: Vec<&str> = Vec::with_capacity( self.columns.len());
        for c in &self.columns {
            parts.push( rec.get(c)?);
        }
        Some( IdentityKey::from_parts(&parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_key_of() {
        let header = Arc::new( Header::from_strs( &["Code INSEE", "Nature", "Date de première alerte"]));
        let rec = InputRecord::new( 1, header.clone(), vec!["75056".into(), "Foret".into(), "2022-08-10".into()]);

        let rule = FieldKeyRule::new( vec!["Code INSEE".into(), "Date de première alerte".into()]);
        assert_eq!( rule.key_of(&rec), Some(IdentityKey::from_parts(&["75056", "2022-08-10"])));
        assert!( rule.missing_columns(&header).is_empty());

        let rule = FieldKeyRule::new( vec!["Code INSEE".into(), "Date".into()]);
        assert_eq!( rule.key_of(&rec), None);
        assert_eq!( rule.missing_columns(&header), vec!["Date"]);
    }

    #[test]
    fn test_separator_keeps_parts_apart() {
        assert_ne!( IdentityKey::from_parts(&["7505", "62022-08-10"]), IdentityKey::from_parts(&["75056", "2022-08-10"]));
    }
}
