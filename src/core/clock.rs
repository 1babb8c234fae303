//! Timestamp source for transcript entries

use std::cell::Cell;
use chrono::{DateTime, Utc};

pub trait Clock {
    /// Current time as fractional Unix seconds
    fn now(&self) -> f64;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp_millis() as f64 / 1000.0
    }
}

/// Deterministic clock: starts at `start` and moves `step` seconds per read
#[derive(Debug, Clone)]
pub struct FixedClock {
    next: Cell<f64>,
    step: f64,
}

impl FixedClock {
    pub fn at(start: f64) -> Self {
        Self::stepping(start, 0.0)
    }

    pub fn stepping(start: f64, step: f64) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }

    /// Jump forward without a read
    pub fn advance(&self, seconds: f64) {
        self.next.set(self.next.get() + seconds);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}

/// Calendar date (`YYYY-MM-DD`, UTC) for a Unix-seconds timestamp
pub fn date_string(timestamp: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis((timestamp * 1000.0) as i64)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}
