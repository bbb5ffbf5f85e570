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
use odin_firewx::{init_tracing, load_config, run_image_download, ImageConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "download satellite snapshots for enriched fire event records, retrying records without image")]
pub struct Args {
    /// RON config file (built-in defaults if not set)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// weather/geo enriched dataset the image table is prepared from (overrides config)
    #[arg(short,long)]
    pub input: Option<PathBuf>,

    /// image table that is rewritten after each record (overrides config)
    #[arg(short,long)]
    pub output: Option<PathBuf>,

    /// directory for downloaded images (overrides config)
    #[arg(long)]
    pub image_dir: Option<PathBuf>,
}

fn main()->Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config: ImageConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => ImageConfig::default()
    };
    if let Some(input) = args.input { config.input_file = input }
    if let Some(output) = args.output { config.output_file = output }
    if let Some(image_dir) = args.image_dir { config.image_dir = image_dir }

    info!("downloading images for {:?} into {:?}", config.output_file, config.image_dir);
    let summary = run_image_download( &config)?;
    info!("done: {summary}");

    Ok(())
}
