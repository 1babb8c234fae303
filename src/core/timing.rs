//! Interview time budget
//!
//! Pure arithmetic over caller-supplied timestamps. The caller turns the
//! result into the engine's time-exceeded signal.

use crate::FORCE_COMPLETION_SECS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBudget {
    max_minutes: f64,
}

/// Outcome of a budget check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeCheck {
    pub exceeded: bool,
    pub remaining_seconds: u64,
}

impl TimeCheck {
    /// Exceeded, or close enough that the interview should be wrapped up
    pub fn should_conclude(&self) -> bool {
        self.exceeded || self.remaining_seconds <= FORCE_COMPLETION_SECS
    }
}

impl TimeBudget {
    /// `None` unless the limit is positive
    pub fn from_minutes(max_minutes: f64) -> Option<Self> {
        (max_minutes.is_finite() && max_minutes > 0.0).then_some(Self { max_minutes })
    }

    pub fn max_minutes(&self) -> f64 {
        self.max_minutes
    }

    pub fn check(&self, start: f64, now: f64) -> TimeCheck {
        let elapsed = (now - start).max(0.0);
        if elapsed / 60.0 >= self.max_minutes {
            return TimeCheck {
                exceeded: true,
                remaining_seconds: 0,
            };
        }
        TimeCheck {
            exceeded: false,
            remaining_seconds: (self.max_minutes * 60.0 - elapsed) as u64,
        }
    }
}

/// Budget check for an optional limit; no limit never concludes
pub fn should_conclude(budget: Option<&TimeBudget>, start: Option<f64>, now: f64) -> bool {
    match (budget, start) {
        (Some(budget), Some(start)) => budget.check(start, now).should_conclude(),
        _ => false,
    }
}
