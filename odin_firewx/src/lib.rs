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

//! incremental, resumable enrichment of wildfire event datasets with coordinates, historical weather and
//! satellite imagery from external services.
//!
//! Both pipelines process one record at a time and persist it before moving on, so that an interrupted run
//! can be restarted without repeating lookups for records that are already stored

use std::fmt;
use tracing_subscriber::EnvFilter;

pub mod errors;
pub mod config;
pub mod record;
pub mod table;
pub mod key;
pub mod ledger;
pub mod rate_gate;
pub mod geo;
pub mod weather;
pub mod image;
pub mod merge;
pub mod writer;
pub mod prep;
pub mod weather_pipeline;
pub mod image_pipeline;

pub use errors::{OdinFireWxError, Result};
pub use config::{load_config, EnrichConfig, ImageConfig};
pub use weather_pipeline::{run_weather_enrichment, LookupContext, WeatherPipeline};
pub use image_pipeline::{run_image_download, run_image_download_with, ImagePipeline};

/// what happened to a single record in a pipeline run
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum RecordOutcome {
    /// already completed in a previous run (or earlier in this one)
    Skipped,
    /// all lookups returned results, record persisted
    Enriched,
    /// at least one lookup was absent, record still persisted
    Partial,
}

#[derive(Debug,Clone,Default,PartialEq,Eq)]
pub struct RunSummary {
    pub total: usize,
    pub skipped: usize,
    pub enriched: usize,
    pub partial: usize,
    pub failed: usize,
}

impl RunSummary {
    /// None counts as a failed record
    pub fn add (&mut self, outcome: Option<RecordOutcome>) {
        self.total += 1;
        match outcome {
            Some(RecordOutcome::Skipped) => self.skipped += 1,
            Some(RecordOutcome::Enriched) => self.enriched += 1,
            Some(RecordOutcome::Partial) => self.partial += 1,
            None => self.failed += 1,
        }
    }

    pub fn persisted (&self)->usize { self.enriched + self.partial }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} records: {} skipped, {} enriched, {} partial, {} failed",
               self.total, self.skipped, self.enriched, self.partial, self.failed)
    }
}

/// install a fmt subscriber that is configured through RUST_LOG, defaulting to "info"
pub fn init_tracing () {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // this only fails if there already is a global subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
