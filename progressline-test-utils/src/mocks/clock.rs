//! Clock that only moves when told to

use chrono::{DateTime, Local, TimeDelta};
use progressline_core::Clock;
use std::sync::Mutex;

use crate::builders::fixed_start;

/// Manually advanced clock for driving bars in tests
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    /// Clock stopped at [`fixed_start`]
    pub fn new() -> Self {
        Self::at(fixed_start())
    }

    pub fn at(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward by `seconds`
    pub fn advance(&self, seconds: f64) {
        let mut now = self.now.lock().unwrap();
        *now += TimeDelta::milliseconds((seconds * 1000.0).round() as i64);
    }

    pub fn set(&self, time: DateTime<Local>) {
        *self.now.lock().unwrap() = time;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}
