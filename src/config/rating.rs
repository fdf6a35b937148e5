//! Rating system configuration

use crate::error::{RatingError, Result};
use crate::types::{DEFAULT_MU, DEFAULT_SIGMA, DEFAULT_VOLATILITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One day, the customary rating period
pub const DEFAULT_PERIOD_SECONDS: u64 = 86_400;
/// Default Glicko-2 system constant
pub const DEFAULT_TAU: f64 = 1.0;
/// Default convergence tolerance of the volatility solver
pub const DEFAULT_EPSILON: f64 = 0.000_001;
/// Default iteration cap for each loop of the volatility solver
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Parameters of the base Glicko system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlickoConfig {
    /// Mean for new ratings
    pub mu: f64,
    /// Rating deviation for new ratings
    pub sigma: f64,
    /// Length of a rating period in seconds (informational)
    pub period_seconds: u64,
}

impl Default for GlickoConfig {
    fn default() -> Self {
        Self {
            mu: DEFAULT_MU,
            sigma: DEFAULT_SIGMA,
            period_seconds: DEFAULT_PERIOD_SECONDS,
        }
    }
}

impl GlickoConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        validate_mu_sigma(self.mu, self.sigma)?;
        validate_period(self.period_seconds)
    }

    /// Rating period as a Duration
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_seconds)
    }
}

/// Parameters of the Glicko-2 system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glicko2Config {
    /// Mean for new ratings and center of the internal scale
    pub mu: f64,
    /// Rating deviation for new ratings
    pub sigma: f64,
    /// Volatility for new ratings
    pub volatility: f64,
    /// System constant bounding volatility change between periods
    pub tau: f64,
    /// Convergence tolerance of the volatility solver
    pub epsilon: f64,
    /// Length of a rating period in seconds (informational)
    pub period_seconds: u64,
    /// Iteration cap for the bracket search and the Illinois loop
    pub max_iterations: u32,
}

impl Default for Glicko2Config {
    fn default() -> Self {
        Self {
            mu: DEFAULT_MU,
            sigma: DEFAULT_SIGMA,
            volatility: DEFAULT_VOLATILITY,
            tau: DEFAULT_TAU,
            epsilon: DEFAULT_EPSILON,
            period_seconds: DEFAULT_PERIOD_SECONDS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Glicko2Config {
    /// Create conservative configuration (volatility changes slowly)
    pub fn conservative() -> Self {
        Self {
            tau: 0.3,
            ..Self::default()
        }
    }

    /// Create aggressive configuration (volatility reacts quickly to upsets)
    pub fn aggressive() -> Self {
        Self {
            tau: 1.2,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        validate_mu_sigma(self.mu, self.sigma)?;

        if !self.volatility.is_finite() || self.volatility <= 0.0 {
            return Err(RatingError::validation(format!(
                "Volatility must be positive, got {}",
                self.volatility
            )));
        }

        if !self.tau.is_finite() || self.tau <= 0.0 {
            return Err(RatingError::validation(format!(
                "Tau must be positive, got {}",
                self.tau
            )));
        }

        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(RatingError::validation(format!(
                "Epsilon must lie in (0, 1), got {}",
                self.epsilon
            )));
        }

        if self.max_iterations == 0 {
            return Err(RatingError::validation(
                "Max iterations must be greater than 0",
            ));
        }

        validate_period(self.period_seconds)
    }

    /// Rating period as a Duration
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_seconds)
    }
}

fn validate_mu_sigma(mu: f64, sigma: f64) -> Result<()> {
    if !mu.is_finite() {
        return Err(RatingError::validation(format!(
            "Default mu must be finite, got {}",
            mu
        )));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(RatingError::validation(format!(
            "Default sigma must be positive, got {}",
            sigma
        )));
    }
    Ok(())
}

fn validate_period(period_seconds: u64) -> Result<()> {
    if period_seconds == 0 {
        return Err(RatingError::validation(
            "Rating period must be greater than 0",
        ));
    }
    Ok(())
}
