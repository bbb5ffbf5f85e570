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

use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use tracing::info;
use odin_firewx::{init_tracing, load_config, run_weather_enrichment, EnrichConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "add coordinates and historical weather to fire event records, resuming from existing output")]
pub struct Args {
    /// RON config file (built-in defaults if not set)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// source dataset (overrides config)
    #[arg(short,long)]
    pub input: Option<PathBuf>,

    /// append-only enriched dataset (overrides config)
    #[arg(short,long)]
    pub output: Option<PathBuf>,
}

fn main()->Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config: EnrichConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => EnrichConfig::default()
    };
    if let Some(input) = args.input { config.input_file = input }
    if let Some(output) = args.output { config.output_file = output }

    info!("enriching {:?} into {:?}", config.input_file, config.output_file);
    let summary = run_weather_enrichment( &config)?;
    info!("done: {summary}");

    Ok(())
}
