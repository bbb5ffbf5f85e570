/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
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

//! common utilities shared by the ODIN data import and enrichment crates

pub mod macros;
pub mod fs;
pub mod datetime;
pub mod net;

/// compute the median of the provided values. The slice gets sorted in place.
/// NaN values are not expected here - callers filter them out while parsing
pub fn median (values: &mut [f64])->Option<f64> {
    if values.is_empty() {
        None
    } else {
        values.sort_by( |a,b| a.total_cmp(b));
        let n = values.len();
        if n % 2 == 0 {
            Some( (values[n/2 - 1] + values[n/2]) / 2.0 )
        } else {
            Some( values[n/2] )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!( median( &mut []), None);
        assert_eq!( median( &mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!( median( &mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }
}
