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

//! RON configuration of the enrichment tools. All config structs have defaults for the French
//! "Incendies" (BDIFF) fire dataset and the public services we use, so config files only have to
//! specify what differs

use std::{fs, path::{Path, PathBuf}, time::Duration};
use serde::{Serialize, Deserialize, de::DeserializeOwned};
use odin_common::datetime::{hours, secs};

use crate::errors::{op_failed, Result};
use crate::key::FieldKeyRule;

/// load a RON config file
pub fn load_config<C> (path: impl AsRef<Path>) -> Result<C> where C: DeserializeOwned {
    let data = fs::read_to_string( path)?;
    Ok( ron::from_str( data.as_str())? )
}

/// CSV delimiters have to be single byte (ASCII) chars
pub fn ascii_delimiter (c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok( c as u8 )
    } else {
        Err( op_failed!("not an ASCII delimiter: '{}'", c))
    }
}

/* #region weather/geo enrichment *****************************************************************************/

#[derive(Clone,Serialize,Deserialize,Debug)]
#[serde(default)]
pub struct EnrichConfig {
    /// the source fire event dataset
    pub input_file: PathBuf,
    /// the append-only enriched dataset (also the resume state)
    pub output_file: PathBuf,
    /// delimiter of both input and output
    pub delimiter: char,
    pub columns: SourceColumns,
    pub geocoder: GeocoderConfig,
    pub weather: WeatherServiceConfig,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        EnrichConfig {
            input_file: PathBuf::from("Incendies.csv"),
            output_file: PathBuf::from("incendies_meteo_safe.csv"),
            delimiter: ';',
            columns: SourceColumns::default(),
            geocoder: GeocoderConfig::default(),
            weather: WeatherServiceConfig::default(),
        }
    }
}

/// the source dataset columns we need for keying and lookups
#[derive(Clone,Serialize,Deserialize,Debug)]
#[serde(default)]
pub struct SourceColumns {
    /// administrative location code (INSEE commune code) that gets geocoded
    pub location: String,
    /// date/time of the first fire alert
    pub event_date: String,
}

impl SourceColumns {
    /// identity of a weather/geo enrichment task: location code + event date
    pub fn key_rule (&self)->FieldKeyRule {
        FieldKeyRule::new( vec![ self.location.clone(), self.event_date.clone() ])
    }
}

impl Default for SourceColumns {
    fn default() -> Self {
        SourceColumns {
            location: "Code INSEE".to_string(),
            event_date: "Date de première alerte".to_string(),
        }
    }
}

#[derive(Clone,Serialize,Deserialize,Debug)]
#[serde(default)]
pub struct GeocoderConfig {
    /// search endpoint of a Nominatim server
    pub base_url: String,
    /// Nominatim usage policy requires an identifying user agent
    pub user_agent: String,
    /// prepended to the location code to form the free-form query (e.g. "France 75056")
    pub query_prefix: String,
    pub timeout: Duration,
    pub min_interval: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        GeocoderConfig {
            base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: "weather_matcher".to_string(),
            query_prefix: "France".to_string(),
            timeout: secs(10),
            min_interval: secs(1),
        }
    }
}

#[derive(Clone,Serialize,Deserialize,Debug)]
#[serde(default)]
pub struct WeatherServiceConfig {
    /// Open-Meteo historical weather endpoint
    pub base_url: String,
    /// forward window starting at the full hour of the event in which we look for the first observation
    pub window: Duration,
    pub min_interval: Duration,
    /// None means we use the client default
    pub timeout: Option<Duration>,
}

impl Default for WeatherServiceConfig {
    fn default() -> Self {
        WeatherServiceConfig {
            base_url: "https://archive-api.open-meteo.com/v1/archive".to_string(),
            window: hours(6),
            min_interval: secs(1),
            timeout: None,
        }
    }
}

/* #endregion weather/geo enrichment */

/* #region image download **************************************************************************************/

#[derive(Clone,Serialize,Deserialize,Debug)]
#[serde(default)]
pub struct ImageConfig {
    /// the output of the weather/geo enrichment, used to prepare the image table if there is none yet
    pub input_file: PathBuf,
    pub input_delimiter: char,
    /// the image table that is rewritten after each record (also the resume state)
    pub output_file: PathBuf,
    pub output_delimiter: char,
    /// where downloaded snapshots are stored
    pub image_dir: PathBuf,
    pub columns: ImageColumns,
    pub service: ImageServiceConfig,
    pub prep: PrepConfig,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            input_file: PathBuf::from("incendies_meteo_safe.csv"),
            input_delimiter: ';',
            output_file: PathBuf::from("df_nature_with_images.csv"),
            output_delimiter: ',',
            image_dir: PathBuf::from("fire_images"),
            columns: ImageColumns::default(),
            service: ImageServiceConfig::default(),
            prep: PrepConfig::default(),
        }
    }
}

#[derive(Clone,Serialize,Deserialize,Debug)]
#[serde(default)]
pub struct ImageColumns {
    pub latitude: String,
    pub longitude: String,
    /// calendar date (YYYY-MM-DD) of the snapshot
    pub date: String,
    pub image_path: String,
}

impl Default for ImageColumns {
    fn default() -> Self {
        ImageColumns {
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            date: "date_str".to_string(),
            image_path: "image_path".to_string(),
        }
    }
}

/// parameters of the GIBS Worldview snapshot service
#[derive(Clone,Serialize,Deserialize,Debug)]
#[serde(default)]
pub struct ImageServiceConfig {
    pub base_url: String,
    pub layer: String,
    pub format: String,
    /// file extension of stored images, has to match `format`
    pub extension: String,
    pub width: u32,
    pub height: u32,
    /// half side length of the (lat,lon) bounding box in degrees
    pub margin: f64,
    pub min_interval: Duration,
    pub timeout: Option<Duration>,
}

impl Default for ImageServiceConfig {
    fn default() -> Self {
        ImageServiceConfig {
            base_url: "https://wvs.earthdata.nasa.gov/api/v1/snapshot".to_string(),
            layer: "MODIS_Terra_CorrectedReflectance_TrueColor".to_string(),
            format: "image/png".to_string(),
            extension: "png".to_string(),
            width: 800,
            height: 800,
            margin: 0.05,
            min_interval: secs(1),
            timeout: None,
        }
    }
}

/// how to derive the image table from the enriched dataset
#[derive(Clone,Serialize,Deserialize,Debug)]
#[serde(default)]
pub struct PrepConfig {
    /// columns that are not used downstream (missing ones are ignored)
    pub drop_columns: Vec<String>,
    /// burned area. Only rows with a positive value are kept, and this column is not imputed
    pub area_column: String,
    /// categorical vegetation type. Rows without it are dropped
    pub nature_column: String,
    pub nature_encoded_column: String,
    pub event_date_column: String,
    /// formatted (YYYY-MM-DD) event date column we add
    pub date_str_column: String,
}

impl Default for PrepConfig {
    fn default() -> Self {
        PrepConfig {
            drop_columns: [
                "weather", "clouds", "Précision de la donnée",
                "Nombre de bâtiments partiellement détruits",
                "Nombre de décès", "Nombre de bâtiments totalement détruits",
                "Autres surfaces (m2)", "Surfaces agricoles (m2)",
                "Décès ou bâtiments touchés"
            ].iter().map(|s| s.to_string()).collect(),
            area_column: "Surface parcourue (m2)".to_string(),
            nature_column: "Nature".to_string(),
            nature_encoded_column: "Nature_encoded".to_string(),
            event_date_column: "Date de première alerte".to_string(),
            date_str_column: "date_str".to_string(),
        }
    }
}

/* #endregion image download */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let src = r#"(
            output_file: "out.csv",
            geocoder: ( query_prefix: "Corse", timeout: (secs: 5, nanos: 0) ),
        )"#;
        let conf: EnrichConfig = ron::from_str(src).unwrap();
        assert_eq!( conf.output_file, PathBuf::from("out.csv"));
        assert_eq!( conf.geocoder.query_prefix, "Corse");
        assert_eq!( conf.geocoder.timeout, secs(5));
        assert_eq!( conf.geocoder.user_agent, "weather_matcher"); // default
        assert_eq!( conf.weather.window, hours(6));
        assert_eq!( conf.delimiter, ';');
    }

    #[test]
    fn test_delimiter() {
        assert_eq!( ascii_delimiter(';').unwrap(), b';');
        assert!( ascii_delimiter('§').is_err());
    }
}
