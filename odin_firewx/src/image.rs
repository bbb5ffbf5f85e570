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

//! satellite snapshots of fire locations

use std::path::{Path, PathBuf};
use reqwest::blocking::Client;
use tracing::{info, warn};
use odin_common::{fs::write_file_replacing, net::{blocking_client, get_bytes}};

use crate::config::ImageServiceConfig;
use crate::errors::Result;
use crate::geo::GeoPoint;

#[derive(Debug,Clone,PartialEq)]
pub struct ImageQuery {
    /// stable row position of the record in the image table
    pub index: usize,
    pub location: GeoPoint,
    /// calendar date as YYYY-MM-DD
    pub date: String,
}

/// retrieves and stores an image for a (location,date) and returns the path of the stored file.
/// Implementors return None if nothing was stored, and log the cause. Failures must not leave a file behind
pub trait ImageResolver {
    fn lookup (&mut self, query: &ImageQuery)->Option<PathBuf>;
}

/// `fire_{index}_{lat}_{lon}_{date}.{ext}` with coordinates rounded to 4 decimals
pub fn image_filename (index: usize, location: &GeoPoint, date: &str, extension: &str)->String {
    format!("fire_{}_{:.4}_{:.4}_{}.{}", index, location.lat, location.lon, date, extension)
}

/// the GetSnapshot request URL for a square (lat,lon) bounding box around `location`
pub fn snapshot_url (config: &ImageServiceConfig, location: &GeoPoint, date: &str)->String {
    let m = config.margin;
    format!("{}?REQUEST=GetSnapshot&BBOX={},{},{},{}&CRS=EPSG:4326&LAYERS={}&WRAP=day&FORMAT={}&WIDTH={}&HEIGHT={}&TIME={}",
        config.base_url,
        location.lat - m, location.lon - m, location.lat + m, location.lon + m,
        config.layer, config.format, config.width, config.height, date)
}

/// image resolver for the NASA GIBS Worldview snapshot service
pub struct SnapshotImageResolver {
    client: Client,
    config: ImageServiceConfig,
    image_dir: PathBuf,
}

impl SnapshotImageResolver {
    pub fn new (config: ImageServiceConfig, image_dir: impl AsRef<Path>)->Result<Self> {
        let client = blocking_client( None, config.timeout)?;
        Ok( SnapshotImageResolver { client, config, image_dir: image_dir.as_ref().to_path_buf() } )
    }

    pub fn image_dir (&self)->&Path { &self.image_dir }
}

impl ImageResolver for SnapshotImageResolver {
    fn lookup (&mut self, query: &ImageQuery)->Option<PathBuf> {
        let url = snapshot_url( &self.config, &query.location, &query.date);

        match get_bytes( &self.client, &url) {
            Ok(bytes) => {
                let fname = image_filename( query.index, &query.location, &query.date, &self.config.extension);
                let path = self.image_dir.join( &fname);
                match write_file_replacing( &path, &bytes) {
                    Ok(()) => {
                        info!("saved image {fname}");
                        Some(path)
                    }
                    Err(e) => {
                        warn!("[ImageError] storing {path:?} failed: {e}");
                        None
                    }
                }
            }
            Err(e) => {
                warn!("[ImageError] row {} at {},{} on {}: {e}", query.index, query.location.lat, query.location.lon, query.date);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename() {
        let loc = GeoPoint::new( 48.85661234, 2.35222);
        assert_eq!( image_filename( 12, &loc, "2022-08-10", "png"), "fire_12_48.8566_2.3522_2022-08-10.png");
    }

    #[test]
    fn test_snapshot_url() {
        let config = ImageServiceConfig { margin: 0.5, ..Default::default() };
        let url = snapshot_url( &config, &GeoPoint::new( 43.0, 5.5), "2022-07-01");
        assert!( url.starts_with("https://wvs.earthdata.nasa.gov/api/v1/snapshot?REQUEST=GetSnapshot&BBOX=42.5,5,43.5,6&CRS=EPSG:4326"));
        assert!( url.contains("&LAYERS=MODIS_Terra_CorrectedReflectance_TrueColor&WRAP=day&FORMAT=image/png"));
        assert!( url.ends_with("&WIDTH=800&HEIGHT=800&TIME=2022-07-01"));
    }
}
