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

//! derive the image table from the weather/geo enriched dataset

use std::collections::BTreeSet;
use tracing::{debug, info};
use odin_common::{datetime::parse_utc_datetime, median};

use crate::config::PrepConfig;
use crate::errors::{op_failed, Result};
use crate::table::Table;

/// turn the enriched dataset into the table the image download works on:
/// unused columns are dropped, only rows with a positive burned area and a known vegetation type are kept,
/// gaps in numeric columns get the column median, and the encoded vegetation type plus the formatted event
/// date are added. The `image_path` column is not added here
pub fn prepare_image_table (mut table: Table, config: &PrepConfig)->Result<Table> {
    for col in [&config.area_column, &config.nature_column, &config.event_date_column] {
        if !table.has_column(col) {
            return Err( op_failed!("no column '{}' in enriched dataset", col))
        }
    }

    let n_input = table.len();
    table.drop_columns( &config.drop_columns);

    table.retain_rows( |header,row| {
        let area = header.index_of( &config.area_column).and_then( |i| parse_number(&row[i]));
        let nature = header.index_of( &config.nature_column).map( |i| row[i].trim());
        matches!(area, Some(a) if a > 0.0) && matches!(nature, Some(n) if !n.is_empty())
    });
    info!("{} of {} rows have a positive burned area and a vegetation type", table.len(), n_input);

    impute_numeric_columns( &mut table, &config.area_column)?;
    add_category_codes( &mut table, &config.nature_column, &config.nature_encoded_column)?;
    add_date_strings( &mut table, &config.event_date_column, &config.date_str_column)?;

    Ok(table)
}

fn parse_number (s: &str)->Option<f64> {
    s.trim().parse::<f64>().ok().filter( |v| v.is_finite())
}

/// a column is numeric if it has at least one value and all its non-empty values are numbers
fn numeric_values (values: &[&str])->Option<Vec<f64>> {
    let mut nums = Vec::with_capacity( values.len());
    for v in values {
        if !v.trim().is_empty() {
            nums.push( parse_number(v)?);
        }
    }
    if nums.is_empty() { None } else { Some(nums) }
}

fn impute_numeric_columns (table: &mut Table, exclude: &str)->Result<()> {
    let columns: Vec<String> = table.header().names().iter().filter(|c| *c != exclude).cloned().collect();

    for col in &columns {
        let filled = match numeric_values( &table.column_values(col)) {
            Some(mut nums) if nums.len() < table.len() => median( &mut nums),
            _ => None
        };

        if let Some(m) = filled {
            let m = m.to_string();
            debug!("imputing missing '{}' values with {}", col, m);
            table.update_column( col, |_,v| if v.trim().is_empty() { m.clone() } else { v.to_string() })?;
        }
    }
    Ok(())
}

/// category codes are the positions of the values within the sorted set of distinct values
fn add_category_codes (table: &mut Table, column: &str, code_column: &str)->Result<()> {
    let categories: Vec<String> = table.column_values(column).iter()
        .map(|v| v.trim().to_string())
        .collect::<BTreeSet<_>>().into_iter().collect();
    let codes: Vec<String> = table.column_values(column).iter()
        .map( |v| categories.binary_search( &v.trim().to_string()).map(|i| i.to_string()).unwrap_or_default())
        .collect();

    table.add_column( code_column, "");
    table.update_column( code_column, |i,_| codes[i].clone())
}

/// unparseable dates become empty fields
fn add_date_strings (table: &mut Table, date_column: &str, date_str_column: &str)->Result<()> {
    let dates: Vec<String> = table.column_values(date_column).iter()
        .map( |v| parse_utc_datetime(v).map( |dt| dt.format("%Y-%m-%d").to_string()).unwrap_or_default())
        .collect();

    table.add_column( date_str_column, "");
    table.update_column( date_str_column, |i,_| dates[i].clone())
}
