//! Glicko - skill ratings for matchmaking and leaderboards
//!
//! This crate implements the Glicko and Glicko-2 rating systems: immutable
//! ratings, per-period updates, the Glicko-2 volatility solver and match
//! quality scoring for one-on-one pairings.

pub mod config;
pub mod error;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{rate_1vs1, Glicko, Glicko2, RatingSystem};
pub use utils::{Clock, FixedClock, SystemClock};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
