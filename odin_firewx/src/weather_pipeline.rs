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

//! the coordinate/weather enrichment loop. Each input record is geocoded, its weather at the time of the
//! event is looked up, and the merged record is appended to the output before the next record is processed.
//! Records are processed at most once over all runs - a row that was appended with absent fields is not retried

use tracing::{error, info, warn};
use odin_common::datetime::{parse_utc_datetime, utc_now};

use crate::config::{ascii_delimiter, EnrichConfig, SourceColumns};
use crate::errors::{op_failed, Result};
use crate::geo::{GeoResolver, NominatimGeoResolver};
use crate::key::FieldKeyRule;
use crate::ledger::ResumeLedger;
use crate::merge::merge;
use crate::rate_gate::RateGate;
use crate::record::{InputDataset, InputRecord, OutputRecord};
use crate::weather::{OpenMeteoWeatherResolver, WeatherQuery, WeatherResolver};
use crate::writer::{CsvAppendWriter, RowAppender};
use crate::{RecordOutcome, RunSummary};

/// the lookup adapters together with the rate gates of their services
pub struct LookupContext<G,W> {
    pub geo: G,
    pub weather: W,
    pub geo_gate: RateGate,
    pub weather_gate: RateGate,
}

impl<G,W> LookupContext<G,W> where G: GeoResolver, W: WeatherResolver {
    pub fn new (geo: G, geo_gate: RateGate, weather: W, weather_gate: RateGate)->Self {
        LookupContext { geo, weather, geo_gate, weather_gate }
    }
}

pub struct WeatherPipeline<G,W,A> {
    columns: SourceColumns,
    key_rule: FieldKeyRule,
    ledger: ResumeLedger,
    ctx: LookupContext<G,W>,
    writer: A,
}

impl<G,W,A> WeatherPipeline<G,W,A> where G: GeoResolver, W: WeatherResolver, A: RowAppender {

    pub fn new (columns: SourceColumns, ledger: ResumeLedger, ctx: LookupContext<G,W>, writer: A)->Self {
        let key_rule = columns.key_rule();
        WeatherPipeline { columns, key_rule, ledger, ctx, writer }
    }

    pub fn ledger (&self)->&ResumeLedger { &self.ledger }

    pub fn context (&self)->&LookupContext<G,W> { &self.ctx }

    pub fn writer (&self)->&A { &self.writer }

    /// process all (ordinal,record) items in order. Per-record failures (including failed appends) are logged
    /// with the record ordinal and do not stop the run
    pub fn run<I> (&mut self, records: I)->RunSummary where I: IntoIterator<Item=(usize,Result<InputRecord>)> {
        let mut summary = RunSummary::default();

        for (ordinal,res) in records {
            let outcome = res.and_then( |rec| self.process_record(rec));
            if let Err(e) = &outcome {
                error!("[{ordinal}] record failed: {e}");
            }
            summary.add( outcome.ok());
        }

        summary
    }

    pub fn process_record (&mut self, rec: InputRecord)->Result<RecordOutcome> {
        let ordinal = rec.ordinal;
        let key = self.key_rule.key_of(&rec).ok_or_else(|| op_failed!("record has no key columns"))?;
        let code = rec.get( &self.columns.location).unwrap_or_default().trim().to_string();

        if self.ledger.is_done(&key) {
            info!("[{ordinal}] skipping: already processed {code}");
            return Ok(RecordOutcome::Skipped)
        }

        let raw_date = rec.get( &self.columns.event_date).unwrap_or_default();
        let time = match parse_utc_datetime(raw_date) {
            Some(dt) => dt,
            None => {
                warn!("[{ordinal}] invalid date '{raw_date}', using current time");
                utc_now()
            }
        };

        let geo = if code.is_empty() {
            warn!("[{ordinal}] no location code, skipping lookups");
            None
        } else {
            self.ctx.geo_gate.wait();
            self.ctx.geo.lookup(&code)
        };

        let weather = match geo {
            Some(location) => {
                self.ctx.weather_gate.wait();
                self.ctx.weather.lookup( &WeatherQuery { location, time })
            }
            None => None
        };

        let outcome = if geo.is_some() && weather.is_some() { RecordOutcome::Enriched } else { RecordOutcome::Partial };
        let out: OutputRecord = merge( rec, geo, weather);

        self.writer.append( &out.to_row())?;
        self.ledger.mark_done(key);

        info!("[{ordinal}] saved: {code}");
        Ok(outcome)
    }
}

/// run the weather/geo enrichment with the configured providers over the configured input file,
/// resuming from what is already in the output file
pub fn run_weather_enrichment (config: &EnrichConfig)->Result<RunSummary> {
    let delimiter = ascii_delimiter( config.delimiter)?;

    let input = InputDataset::open( &config.input_file, delimiter)?;
    let key_rule = config.columns.key_rule();
    let missing = key_rule.missing_columns( input.header());
    if !missing.is_empty() {
        return Err( op_failed!("input {:?} lacks columns {:?}", config.input_file, missing))
    }

    let ledger = ResumeLedger::from_appended_output( &config.output_file, delimiter, &key_rule)?;
    info!("{} records already processed in {:?}", ledger.len(), config.output_file);

    let writer = CsvAppendWriter::open( &config.output_file, delimiter, OutputRecord::output_header( input.header()))?;

    let ctx = LookupContext::new(
        NominatimGeoResolver::new( config.geocoder.clone())?, RateGate::new( config.geocoder.min_interval),
        OpenMeteoWeatherResolver::new( config.weather.clone())?, RateGate::new( config.weather.min_interval)
    );

    let mut pipeline = WeatherPipeline::new( config.columns.clone(), ledger, ctx, writer);
    Ok( pipeline.run( input.records()) )
}
