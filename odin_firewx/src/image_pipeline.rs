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

//! the satellite image download loop. Works in place on the image table, which is stored in full after each
//! record. Rows without an image path are retried on every run. If storing the table fails the run is aborted

use tracing::{error, info, warn};
use odin_common::fs::ensure_writable_dir;

use crate::config::{ascii_delimiter, ImageColumns, ImageConfig};
use crate::errors::{op_failed, OdinFireWxError, Result};
use crate::geo::GeoPoint;
use crate::image::{ImageQuery, ImageResolver, SnapshotImageResolver};
use crate::key::IdentityKey;
use crate::ledger::ResumeLedger;
use crate::merge::image_path_field;
use crate::prep::prepare_image_table;
use crate::rate_gate::RateGate;
use crate::record::is_absent_text;
use crate::table::Table;
use crate::writer::{CsvTableFile, TableStore};
use crate::{RecordOutcome, RunSummary};

pub struct ImagePipeline<R,S> {
    columns: ImageColumns,
    resolver: R,
    gate: RateGate,
    store: S,
}

impl<R,S> ImagePipeline<R,S> where R: ImageResolver, S: TableStore {

    pub fn new (columns: ImageColumns, resolver: R, gate: RateGate, store: S)->Self {
        ImagePipeline { columns, resolver, gate, store }
    }

    pub fn resolver (&self)->&R { &self.resolver }

    pub fn store (&self)->&S { &self.store }

    /// process all rows of `table` that don't have an image yet. Returns `PersistenceAborted` if the table
    /// could not be stored, in which case the store still holds the table as of the previous record
    pub fn run (&mut self, table: &mut Table)->Result<RunSummary> {
        for col in [&self.columns.latitude, &self.columns.longitude, &self.columns.date] {
            if !table.has_column(col) {
                return Err( op_failed!("image table has no column '{}'", col))
            }
        }

        let image_col = self.columns.image_path.clone();
        table.add_column( &image_col, "");
        table.update_column( &image_col, |_,v| if is_absent_text(v) { String::new() } else { v.to_string() })?;

        let mut ledger = ResumeLedger::from_image_table( table, &image_col);
        info!("{} of {} rows already have images", ledger.len(), table.len());

        let mut summary = RunSummary::default();
        for idx in 0..table.len() {
            let key = IdentityKey::from_index(idx);
            if ledger.is_done(&key) {
                summary.add( Some(RecordOutcome::Skipped));
                continue;
            }

            let (path, outcome) = match self.query(table, idx) {
                Some(query) => {
                    self.gate.wait();
                    let path = self.resolver.lookup(&query);
                    let outcome = if path.is_some() { RecordOutcome::Enriched } else { RecordOutcome::Partial };
                    (path, outcome)
                }
                None => (None, RecordOutcome::Partial)
            };

            if let Err(e) = table.set( idx, &image_col, image_path_field( path.as_deref())) {
                error!("[{idx}] record failed: {e}");
                summary.add(None);
                continue;
            }

            if let Err(e) = self.store.store(table) {
                error!("[{idx}] storing image table failed, aborting: {e}");
                return Err( OdinFireWxError::PersistenceAborted { position: idx, source: Box::new(e) })
            }

            if path.is_some() {
                ledger.mark_done(key);
            }
            summary.add( Some(outcome));
        }

        Ok(summary)
    }

    /// None if the row has no valid coordinates
    fn query (&self, table: &Table, idx: usize)->Option<ImageQuery> {
        let lat = table.get( idx, &self.columns.latitude).and_then( parse_coordinate);
        let lon = table.get( idx, &self.columns.longitude).and_then( parse_coordinate);
        let date = table.get( idx, &self.columns.date).unwrap_or_default().trim().to_string();

        match (lat,lon) {
            (Some(lat), Some(lon)) => {
                if date.is_empty() { warn!("[{idx}] no date for image") }
                Some( ImageQuery { index: idx, location: GeoPoint::new(lat,lon), date })
            }
            _ => {
                warn!("[{idx}] no valid coordinates, skipping image lookup");
                None
            }
        }
    }
}

fn parse_coordinate (s: &str)->Option<f64> {
    s.trim().parse::<f64>().ok().filter( |v| v.is_finite())
}

/// run the image download with the configured snapshot service. If there is no image table yet it is
/// prepared from the enriched dataset and stored before the first download
pub fn run_image_download (config: &ImageConfig)->Result<RunSummary> {
    let resolver = SnapshotImageResolver::new( config.service.clone(), &config.image_dir)?;
    run_image_download_with( config, resolver)
}

/// same as [`run_image_download`] but with a caller provided image resolver
pub fn run_image_download_with<R: ImageResolver> (config: &ImageConfig, resolver: R)->Result<RunSummary> {
    ensure_writable_dir( &config.image_dir)?;

    let mut store = CsvTableFile::new( &config.output_file, ascii_delimiter( config.output_delimiter)?);
    let mut table = match store.load()? {
        Some(table) => {
            info!("resuming with image table {:?}", store.path());
            table
        }
        None => {
            info!("preparing image table from {:?}", config.input_file);
            let enriched = Table::read_file( &config.input_file, ascii_delimiter( config.input_delimiter)?)?;
            let mut table = prepare_image_table( enriched, &config.prep)?;
            table.add_column( &config.columns.image_path, "");
            store.store(&table)?;
            table
        }
    };

    let mut pipeline = ImagePipeline::new( config.columns.clone(), resolver, RateGate::new( config.service.min_interval), store);
    pipeline.run( &mut table)
}
