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

//! durable output stores. Both writers persist before they return, i.e. a record that was
//! successfully written survives a process crash right after the call

use std::{fs::File, path::{Path, PathBuf}};
use tracing::warn;
use odin_common::fs::{append_synced, is_empty_or_missing, truncate_partial_line, write_file_replacing};

use crate::errors::{op_failed, Result};
use crate::record::Header;
use crate::table::Table;

/* #region append-only rows ************************************************************************************/

/// remove a row that was torn by a crash during a previous append. This has to run before the file is scanned
/// for already processed records or appended to, otherwise the partial row would be read as a record and the
/// next row would get glued onto it
pub fn repair_appended_output (path: &Path)->Result<()> {
    let n_removed = truncate_partial_line(path)?;
    if n_removed > 0 {
        warn!("removed incomplete last row ({} bytes) from {:?}", n_removed, path);
    }
    Ok(())
}

/// appends one complete row per call
pub trait RowAppender {
    fn append (&mut self, row: &[String])->Result<()>;
}

/// append-only delimited file. The header is written together with the first row if the file is empty,
/// and each row is emitted as a single buffer that gets synced before `append` returns
pub struct CsvAppendWriter {
    path: PathBuf,
    delimiter: u8,
    header: Header,
    needs_header: bool,
}

impl CsvAppendWriter {
    /// note this fails if the file already has content with a different header, since appending to it would
    /// produce rows that don't match their columns
    pub fn open (path: impl AsRef<Path>, delimiter: u8, header: Header)->Result<Self> {
        let path = path.as_ref().to_path_buf();
        repair_appended_output(&path)?;
        let needs_header = is_empty_or_missing(&path);

        if !needs_header {
            let mut reader = csv::ReaderBuilder::new().delimiter(delimiter).from_reader( File::open(&path)?);
            let existing = Header::from( reader.headers()?);
            if existing != header {
                return Err( op_failed!("header of {:?} does not match expected output columns", path))
            }
        }

        Ok( CsvAppendWriter { path, delimiter, header, needs_header } )
    }

    pub fn path (&self)->&Path { &self.path }

    fn encode (&self, row: &[String])->Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer( Vec::with_capacity(256));

        if self.needs_header {
            writer.write_record( self.header.names())?;
        }
        writer.write_record( row)?;

        Ok( writer.into_inner().map_err(|e| e.into_error())? )
    }
}

impl RowAppender for CsvAppendWriter {
    fn append (&mut self, row: &[String])->Result<()> {
        if row.len() != self.header.len() {
            return Err( op_failed!("row has {} fields, expected {}", row.len(), self.header.len()))
        }

        let buf = self.encode(row)?;
        append_synced( &self.path, &buf)?;
        self.needs_header = false;
        Ok(())
    }
}

/* #endregion append-only rows */

/* #region full table rewrite **********************************************************************************/

/// replaces the stored table as a whole
pub trait TableStore {
    fn store (&mut self, table: &Table)->Result<()>;
}

/// a table that is kept in a single delimited file. Stores go through a temp file that replaces the old one,
/// i.e. if a store fails the file still holds the previously stored table
pub struct CsvTableFile {
    path: PathBuf,
    delimiter: u8,
}

impl CsvTableFile {
    pub fn new (path: impl AsRef<Path>, delimiter: u8)->Self {
        CsvTableFile { path: path.as_ref().to_path_buf(), delimiter }
    }

    pub fn path (&self)->&Path { &self.path }

    /// None if there is no stored table yet
    pub fn load (&self)->Result<Option<Table>> {
        if self.path.is_file() {
            Ok( Some( Table::read_file( &self.path, self.delimiter)?) )
        } else {
            Ok( None )
        }
    }
}

impl TableStore for CsvTableFile {
    fn store (&mut self, table: &Table)->Result<()> {
        let bytes = table.to_csv_bytes( self.delimiter)?;
        Ok( write_file_replacing( &self.path, &bytes)? )
    }
}

/* #endregion full table rewrite */
