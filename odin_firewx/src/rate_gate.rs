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

use std::{thread, time::{Duration, Instant}};

/// minimum spacing between consecutive outbound calls to one external service.
/// This is a plain "sleep until enough time has passed" gate for a single thread, not a token bucket
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateGate {
    pub fn new (min_interval: Duration)->Self {
        RateGate { min_interval, last: None }
    }

    pub fn unlimited ()->Self { RateGate::new( Duration::ZERO) }

    pub fn min_interval (&self)->Duration { self.min_interval }

    /// how long a call issued now would have to wait
    pub fn remaining (&self)->Duration {
        match self.last {
            Some(last) => self.min_interval.saturating_sub( last.elapsed()),
            None => Duration::ZERO
        }
    }

    /// block until the minimum interval since the previous call has elapsed, then record this call
    pub fn wait (&mut self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing() {
        let mut gate = RateGate::new( Duration::from_millis(50));
        let t0 = Instant::now();
        gate.wait(); // first call does not wait
        assert!( t0.elapsed() < Duration::from_millis(50));

        gate.wait();
        gate.wait();
        assert!( t0.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_unlimited() {
        let mut gate = RateGate::unlimited();
        gate.wait();
        assert!( gate.remaining().is_zero());
    }
}
