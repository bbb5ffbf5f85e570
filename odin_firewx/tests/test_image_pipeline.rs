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

#![allow(unused)]

use std::{collections::HashSet, fs, path::{Path, PathBuf}, time::Duration};
use odin_firewx::{
    config::{ImageColumns, ImageConfig},
    errors::{OdinFireWxError, Result},
    image::{image_filename, ImageQuery, ImageResolver},
    rate_gate::RateGate,
    table::Table,
    writer::{CsvTableFile, TableStore},
    ImagePipeline, RunSummary, run_image_download_with,
};

// run with "cargo test --test test_image_pipeline -- --nocapture"

const TABLE: &str = "\
Nature,latitude,longitude,date_str
Forêt,48.8566,2.3522,2022-08-10
Maquis,43.2965,5.3698,2022-07-01
Forêt,,,2022-08-15
Autre,41.9192,8.7386,2022-08-20
";

/// "downloads" an image for every query unless its row index is in `fail`
#[derive(Default)]
struct StubImages {
    fail: HashSet<usize>,
    calls: Vec<usize>,
}

impl StubImages {
    fn failing (rows: &[usize])->Self {
        StubImages { fail: rows.iter().copied().collect(), calls: Vec::new() }
    }
}

impl ImageResolver for StubImages {
    fn lookup (&mut self, query: &ImageQuery)->Option<PathBuf> {
        self.calls.push( query.index);
        if self.fail.contains( &query.index) {
            None
        } else {
            Some( Path::new("fire_images").join( image_filename( query.index, &query.location, &query.date, "png")))
        }
    }
}

/// a table file that refuses the n-th store (1-based)
struct FailingStore {
    file: CsvTableFile,
    fail_on: usize,
    n: usize,
}

impl TableStore for FailingStore {
    fn store (&mut self, table: &Table)->Result<()> {
        self.n += 1;
        if self.n == self.fail_on {
            Err( OdinFireWxError::IOError( std::io::Error::other("no space left on device")))
        } else {
            self.file.store(table)
        }
    }
}

fn table (src: &str)->Table {
    Table::read_from( src.as_bytes(), b',').unwrap()
}

fn run<S: TableStore> (table: &mut Table, images: StubImages, store: S)->(Result<RunSummary>, Vec<usize>) {
    let mut pipeline = ImagePipeline::new( ImageColumns::default(), images, RateGate::unlimited(), store);
    let res = pipeline.run( table);
    (res, pipeline.resolver().calls.clone())
}

#[test]
fn test_download_and_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("images.csv");

    let mut t = table(TABLE);
    let (res, calls) = run( &mut t, StubImages::failing(&[1]), CsvTableFile::new( &path, b','));
    let summary = res.unwrap();
    println!("{summary}");

    // row 2 has no coordinates, so there is no lookup for it
    assert_eq!( calls, vec![0, 1, 3]);
    assert_eq!( summary, RunSummary { total: 4, skipped: 0, enriched: 2, partial: 2, failed: 0 });

    let stored = CsvTableFile::new( &path, b',').load().unwrap().unwrap();
    assert_eq!( stored, t);
    assert_eq!( stored.get(0, "image_path"), Some("fire_images/fire_0_48.8566_2.3522_2022-08-10.png"));
    assert_eq!( stored.get(1, "image_path"), Some(""));
    assert_eq!( stored.get(2, "image_path"), Some(""));
    assert!( stored.get(3, "image_path").unwrap().ends_with("fire_3_41.9192_8.7386_2022-08-20.png"));
}

#[test]
fn test_retry_until_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("images.csv");

    let mut t = table(TABLE);
    let (res, _) = run( &mut t, StubImages::failing(&[1,3]), CsvTableFile::new( &path, b','));
    assert!( res.is_ok());

    // rows without image are retried on the next run, the others are not touched
    let mut t = CsvTableFile::new( &path, b',').load().unwrap().unwrap();
    let (res, calls) = run( &mut t, StubImages::default(), CsvTableFile::new( &path, b','));
    assert_eq!( calls, vec![1, 3]);
    assert_eq!( res.unwrap().skipped, 1);

    // nothing left to do except the row without coordinates, which never gets a lookup
    let mut t = CsvTableFile::new( &path, b',').load().unwrap().unwrap();
    let before = fs::read(&path).unwrap();
    let (res, calls) = run( &mut t, StubImages::default(), CsvTableFile::new( &path, b','));
    assert!( calls.is_empty());
    assert_eq!( res.unwrap().skipped, 3);
    assert_eq!( fs::read(&path).unwrap(), before);
}

#[test]
fn test_none_text_is_not_done() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("images.csv");

    let mut t = table("\
latitude,longitude,date_str,image_path
48.8566,2.3522,2022-08-10,None
43.2965,5.3698,2022-07-01,
41.9192,8.7386,2022-08-20,fire_images/fire_2.png
");
    let (res, calls) = run( &mut t, StubImages::failing(&[0]), CsvTableFile::new( &path, b','));
    assert_eq!( calls, vec![0, 1]);
    assert_eq!( res.unwrap().skipped, 1);

    // the textual "None" is never written back
    let stored = fs::read_to_string(&path).unwrap();
    assert!( !stored.contains("None"));
    assert_eq!( t.get(2, "image_path"), Some("fire_images/fire_2.png"));
}

#[test]
fn test_abort_on_store_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("images.csv");

    let mut t = table(TABLE);
    let store = FailingStore { file: CsvTableFile::new( &path, b','), fail_on: 2, n: 0 };
    let (res, calls) = run( &mut t, StubImages::default(), store);

    match res {
        Err(OdinFireWxError::PersistenceAborted { position, .. }) => assert_eq!( position, 1),
        other => panic!("expected abort, got {other:?}")
    }
    // no lookup after the failed record
    assert_eq!( calls, vec![0, 1]);

    // the stored table is the one of the previous record
    let stored = CsvTableFile::new( &path, b',').load().unwrap().unwrap();
    assert!( !stored.get(0, "image_path").unwrap().is_empty());
    assert_eq!( stored.get(1, "image_path"), Some(""));
    assert_eq!( stored.get(3, "image_path"), Some(""));
}

#[test]
fn test_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = table("Nature,date_str\nForêt,2022-08-10\n");
    let (res, calls) = run( &mut t, StubImages::default(), CsvTableFile::new( dir.path().join("images.csv"), b','));
    assert!( res.is_err());
    assert!( calls.is_empty());
}

#[test]
fn test_prepare_and_download() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ImageConfig::default();
    config.input_file = dir.path().join("enriched.csv");
    config.output_file = dir.path().join("images.csv");
    config.image_dir = dir.path().join("fire_images");
    config.service.min_interval = Duration::ZERO;

    fs::write( &config.input_file, "\
Code INSEE;Date de première alerte;Nature;Surface parcourue (m2);latitude;longitude;temp;weather
75056;2022-08-10 14:00:00;Forêt;1000;48.8566;2.3522;29;
13055;2022-07-01;Maquis;0;43.2965;5.3698;25;
2B033;2022-08-20;Autre;2500;42.5;9.1;;
").unwrap();

    // there is no image table yet, so it gets prepared from the enriched dataset
    let summary = run_image_download_with( &config, StubImages::failing(&[1])).unwrap();
    println!("{summary}");
    assert_eq!( summary, RunSummary { total: 2, skipped: 0, enriched: 1, partial: 1, failed: 0 });
    assert!( config.image_dir.is_dir());

    let stored = CsvTableFile::new( &config.output_file, b',').load().unwrap().unwrap();
    assert_eq!( stored.column_values("Code INSEE"), vec!["75056", "2B033"]);
    assert!( !stored.has_column("weather"));
    assert_eq!( stored.column_values("temp"), vec!["29", "29"]);
    assert_eq!( stored.column_values("date_str"), vec!["2022-08-10", "2022-08-20"]);
    assert_eq!( stored.get(0, "image_path"), Some("fire_images/fire_0_48.8566_2.3522_2022-08-10.png"));
    assert_eq!( stored.get(1, "image_path"), Some(""));

    // the next run resumes from the stored table and only retries the row without image
    fs::remove_file( &config.input_file).unwrap();
    let summary = run_image_download_with( &config, StubImages::default()).unwrap();
    assert_eq!( summary, RunSummary { total: 2, skipped: 1, enriched: 1, partial: 0, failed: 0 });

    let summary = run_image_download_with( &config, StubImages::default()).unwrap();
    assert_eq!( summary.skipped, 2);
}
