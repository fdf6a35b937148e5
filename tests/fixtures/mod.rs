//! Test fixtures shared by the integration tests

use glicko::{Clock, Rating, DEFAULT_VOLATILITY, LOSS, WIN};
use std::sync::atomic::{AtomicU64, Ordering};

/// Clock that advances one rating period every time it is read
#[derive(Debug)]
pub struct SteppingClock {
    next: AtomicU64,
    step: u64,
}

impl SteppingClock {
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
            step,
        }
    }

    /// Number of readings so far
    pub fn readings(&self, start: u64) -> u64 {
        (self.next.load(Ordering::SeqCst) - start) / self.step
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> f64 {
        self.next.fetch_add(self.step, Ordering::SeqCst) as f64
    }
}

pub fn rating(mu: f64, sigma: f64) -> Rating {
    Rating::new(mu, sigma, DEFAULT_VOLATILITY, None).unwrap()
}

/// The rating period worked through in Glickman's Glicko-2 paper
pub fn glickman_player() -> Rating {
    rating(1500.0, 200.0)
}

pub fn glickman_series() -> Vec<(f64, Rating)> {
    vec![
        (WIN, rating(1400.0, 30.0)),
        (LOSS, rating(1550.0, 100.0)),
        (LOSS, rating(1700.0, 300.0)),
    ]
}
