//! Glicko and Glicko-2 rating systems
//!
//! This module provides the shared [`RatingSystem`] interface, both rating
//! system implementations, the Glicko-2 volatility solver and the one-on-one
//! conveniences built on top of them.

pub mod glicko;
pub mod glicko2;
pub mod system;
pub mod volatility;

// Re-export commonly used types
pub use glicko::Glicko;
pub use glicko2::Glicko2;
pub use system::{rate_1vs1, RatingSystem};
pub use volatility::VolatilityEquation;
