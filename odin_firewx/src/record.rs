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

//! records of the fire event dataset and the enrichment fields we add to them.
//! Absent enrichment values are `None` in here and only turn into empty CSV fields at the output boundary

use std::{fs::File, io, path::Path, sync::Arc};

use crate::errors::{op_failed, OdinFireWxError, Result};

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const TEMP: &str = "temp";
pub const HUMIDITY: &str = "humidity";
pub const PRESSURE: &str = "pressure";
pub const WIND_SPEED: &str = "wind_speed";
pub const WIND_DEG: &str = "wind_deg";
pub const CLOUDS: &str = "clouds";
pub const RAIN_1H: &str = "rain_1h";
pub const WEATHER: &str = "weather";

/// the columns the weather/geo enrichment appends to each input row, in output order
pub const ENRICHMENT_FIELDS: [&str; 10] = [
    LATITUDE, LONGITUDE, TEMP, HUMIDITY, PRESSURE, WIND_SPEED, WIND_DEG, CLOUDS, RAIN_1H, WEATHER
];

/// the textual forms that mean "no value" when we read back persisted output
pub fn is_absent_text (s: &str)->bool {
    let s = s.trim();
    s.is_empty() || s == "None"
}

/* #region header and input records ****************************************************************************/

/// column names of a delimited table, shared by all records read from it
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct Header {
    names: Vec<String>
}

impl Header {
    pub fn new (names: Vec<String>)->Self { Header { names } }

    pub fn from_strs (names: &[&str])->Self {
        Header { names: names.iter().map(|s| s.to_string()).collect() }
    }

    pub fn names (&self)->&[String] { &self.names }

    pub fn len (&self)->usize { self.names.len() }

    pub fn is_empty (&self)->bool { self.names.is_empty() }

    pub fn index_of (&self, name: &str)->Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains (&self, name: &str)->bool { self.index_of(name).is_some() }

    /// a new header with the `extra` names appended
    pub fn with_appended (&self, extra: &[&str])->Header {
        let mut names = self.names.clone();
        names.extend( extra.iter().map(|s| s.to_string()));
        Header { names }
    }
}

impl From<&csv::StringRecord> for Header {
    fn from (rec: &csv::StringRecord)->Self {
        Header { names: rec.iter().map(|s| s.trim().to_string()).collect() }
    }
}

/// one row of the source dataset. `ordinal` is the 1-based position of the row within the data lines of its file
#[derive(Debug,Clone)]
pub struct InputRecord {
    pub ordinal: usize,
    header: Arc<Header>,
    values: Vec<String>,
}

impl InputRecord {
    /// note that `values` get padded with empty fields (or truncated) to the header length
    pub fn new (ordinal: usize, header: Arc<Header>, mut values: Vec<String>)->Self {
        values.resize( header.len(), String::new());
        InputRecord { ordinal, header, values }
    }

    pub fn header (&self)->&Header { &self.header }

    pub fn values (&self)->&[String] { &self.values }

    pub fn get (&self, name: &str)->Option<&str> {
        self.header.index_of(name).map( |i| self.values[i].as_str())
    }
}

/// the ordered rows of a delimited input file, read one at a time
pub struct InputDataset<R: io::Read> {
    header: Arc<Header>,
    reader: csv::Reader<R>,
}

impl InputDataset<File> {
    pub fn open (path: impl AsRef<Path>, delimiter: u8)->Result<Self> {
        let file = File::open(path)?;
        Self::from_reader( file, delimiter)
    }
}

impl<R: io::Read> InputDataset<R> {
    pub fn from_reader (rdr: R, delimiter: u8)->Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(rdr);
        let header = Arc::new( Header::from( reader.headers()?));

        Ok( InputDataset { header, reader } )
    }

    pub fn header (&self)->&Arc<Header> { &self.header }

    /// iterate over (ordinal, record) pairs. Rows that can't be read or have more fields than the header are
    /// reported as per-record errors so that the caller can log them with their position and keep going.
    /// Short rows are padded with empty fields
    pub fn records (self)->impl Iterator<Item=(usize,Result<InputRecord>)> {
        let header = self.header;
        self.reader.into_records().enumerate().map( move |(i,res)| {
            let ordinal = i+1;
            let rec = res.map_err( OdinFireWxError::from).and_then( |sr| {
                if sr.len() > header.len() {
                    Err( op_failed!("record has {} fields, header has {}", sr.len(), header.len()))
                } else {
                    Ok( InputRecord::new( ordinal, header.clone(), sr.iter().map(|s| s.to_string()).collect()) )
                }
            });
            (ordinal, rec)
        })
    }
}

/* #endregion header and input records */

/* #region enrichment and output records ***********************************************************************/

/// the enrichment attributes of one record. Every field is either a concrete value or absent
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Enrichment {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_deg: Option<f64>,
    pub clouds: Option<f64>,
    pub rain_1h: Option<f64>,
    pub weather: Option<String>,
}

impl Enrichment {
    /// the CSV fields in `ENRICHMENT_FIELDS` order. Absent values become empty fields
    pub fn to_fields (&self)->[String; 10] {
        [
            number_field(self.latitude),
            number_field(self.longitude),
            number_field(self.temp),
            number_field(self.humidity),
            number_field(self.pressure),
            number_field(self.wind_speed),
            number_field(self.wind_deg),
            number_field(self.clouds),
            number_field(self.rain_1h),
            self.weather.clone().unwrap_or_default(),
        ]
    }

    pub fn n_absent (&self)->usize {
        [ self.latitude, self.longitude, self.temp, self.humidity, self.pressure,
          self.wind_speed, self.wind_deg, self.clouds, self.rain_1h ].iter().filter(|v| v.is_none()).count()
        + self.weather.is_none() as usize
    }
}

fn number_field (v: Option<f64>)->String {
    v.map( |x| x.to_string()).unwrap_or_default()
}

/// an input record together with all its enrichment fields
#[derive(Debug,Clone)]
pub struct OutputRecord {
    pub input: InputRecord,
    pub enrichment: Enrichment,
}

impl OutputRecord {
    /// the full output row: input values followed by the enrichment fields
    pub fn to_row (&self)->Vec<String> {
        let mut row = Vec::with_capacity( self.input.values.len() + ENRICHMENT_FIELDS.len());
        row.extend( self.input.values.iter().cloned());
        row.extend( self.enrichment.to_fields());
        row
    }

    pub fn output_header (input_header: &Header)->Header {
        input_header.with_appended( &ENRICHMENT_FIELDS)
    }
}

/* #endregion enrichment and output records */
