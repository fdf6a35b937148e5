//! Utility functions and the injectable clock

use chrono::Utc;

/// Source of the current time for stamping rating periods
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current time in seconds since the Unix epoch (UTC)
    fn now(&self) -> f64;
}

/// Clock backed by the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        current_timestamp()
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}

/// Get the current UTC timestamp in whole epoch seconds
pub fn current_timestamp() -> f64 {
    Utc::now().timestamp() as f64
}
