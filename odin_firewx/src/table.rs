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

use std::{fs::File, io, path::Path};
use tracing::warn;

use crate::errors::{op_failed, Result};
use crate::record::Header;

/// a fully loaded delimited table. Used by processing steps that have to see (or rewrite) all rows at once.
/// All rows have exactly as many fields as the header
#[derive(Debug,Clone,PartialEq)]
pub struct Table {
    header: Header,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new (header: Header, mut rows: Vec<Vec<String>>)->Self {
        let n = header.len();
        for row in rows.iter_mut() { row.resize( n, String::new()) }
        Table { header, rows }
    }

    pub fn read_file (path: impl AsRef<Path>, delimiter: u8)->Result<Table> {
        let file = File::open(path)?;
        Self::read_from( file, delimiter)
    }

    pub fn read_from (rdr: impl io::Read, delimiter: u8)->Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(rdr);
        let header = Header::from( reader.headers()?);

        let mut rows = Vec::new();
        for (i,res) in reader.records().enumerate() {
            let rec = res?;
            if rec.len() > header.len() {
                warn!("[{}] row has {} fields, header has {}: dropping extra fields", i+1, rec.len(), header.len());
            }
            rows.push( rec.iter().map(|s| s.to_string()).collect());
        }

        Ok( Table::new( header, rows) )
    }

    pub fn to_csv_bytes (&self, delimiter: u8)->Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer( Vec::with_capacity( 128 * (self.rows.len()+1)));

        writer.write_record( self.header.names())?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        Ok( writer.into_inner().map_err(|e| e.into_error())? )
    }

    pub fn header (&self)->&Header { &self.header }

    pub fn rows (&self)->&[Vec<String>] { &self.rows }

    pub fn len (&self)->usize { self.rows.len() }

    pub fn is_empty (&self)->bool { self.rows.is_empty() }

    pub fn has_column (&self, name: &str)->bool { self.header.contains(name) }

    pub fn get (&self, row: usize, column: &str)->Option<&str> {
        let i = self.header.index_of(column)?;
        self.rows.get(row).map( |r| r[i].as_str())
    }

    pub fn set (&mut self, row: usize, column: &str, value: impl Into<String>)->Result<()> {
        let i = self.header.index_of(column).ok_or_else(|| op_failed!("no column {}", column))?;
        let r = self.rows.get_mut(row).ok_or_else(|| op_failed!("no row {}", row))?;
        r[i] = value.into();
        Ok(())
    }

    /// all values of the given column (empty if there is no such column)
    pub fn column_values (&self, column: &str)->Vec<&str> {
        match self.header.index_of(column) {
            Some(i) => self.rows.iter().map(|r| r[i].as_str()).collect(),
            None => Vec::new()
        }
    }

    /// append a column with a uniform initial value. Does nothing if the column already exists
    pub fn add_column (&mut self, name: &str, value: &str) {
        if !self.header.contains(name) {
            self.header = self.header.with_appended(&[name]);
            for row in self.rows.iter_mut() { row.push( value.to_string()) }
        }
    }

    /// set all values of an existing column from a function of the row index
    pub fn update_column<F> (&mut self, name: &str, mut f: F)->Result<()> where F: FnMut(usize,&str)->String {
        let i = self.header.index_of(name).ok_or_else(|| op_failed!("no column {}", name))?;
        for (idx,row) in self.rows.iter_mut().enumerate() {
            row[i] = f( idx, &row[i]);
        }
        Ok(())
    }

    /// remove the named columns, ignoring names that are not in the table
    pub fn drop_columns (&mut self, names: &[String]) {
        let keep: Vec<usize> = (0..self.header.len())
            .filter( |&i| !names.contains( &self.header.names()[i]))
            .collect();

        if keep.len() < self.header.len() {
            self.header = Header::new( keep.iter().map(|&i| self.header.names()[i].clone()).collect());
            for row in self.rows.iter_mut() {
                *row = keep.iter().map(|&i| std::mem::take(&mut row[i])).collect();
            }
        }
    }

    /// keep only rows for which the predicate returns true. The predicate gets the table header to look up fields
    pub fn retain_rows<F> (&mut self, mut f: F) where F: FnMut(&Header,&[String])->bool {
        let header = &self.header;
        self.rows.retain( |row| f(header, row));
    }
}
