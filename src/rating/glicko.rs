//! Glicko rating system implementation
//!
//! The base Glicko update works directly on the public rating scale and needs
//! no iteration: a period of games is folded into closed-form updates of the
//! mean and the rating deviation.

use crate::config::GlickoConfig;
use crate::error::Result;
use crate::rating::system::RatingSystem;
use crate::types::{Rating, Series, DEFAULT_VOLATILITY};
use crate::utils::{Clock, SystemClock};
use std::f64::consts::{LN_10, PI};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// ln(10) / 400, converting rating points to natural-log odds
pub const Q: f64 = LN_10 / 400.0;

/// Glicko rating system
#[derive(Clone)]
pub struct Glicko {
    config: GlickoConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Glicko {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Glicko")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Glicko {
    fn default() -> Self {
        Self {
            config: GlickoConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Glicko {
    /// Create a new Glicko system
    pub fn new(config: GlickoConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Use `clock` to stamp ratings rated without an explicit time
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &GlickoConfig {
        &self.config
    }

    /// Create a rating, filling omitted values from the system defaults
    pub fn create_rating(
        &self,
        mu: Option<f64>,
        sigma: Option<f64>,
        rated_at: Option<f64>,
    ) -> Result<Rating> {
        Rating::new(
            mu.unwrap_or(self.config.mu),
            sigma.unwrap_or(self.config.sigma),
            DEFAULT_VOLATILITY,
            rated_at,
        )
    }
}

impl RatingSystem for Glicko {
    fn default_rating(&self) -> Rating {
        Rating::from_parts(self.config.mu, self.config.sigma, DEFAULT_VOLATILITY, None)
    }

    fn g(&self, rating: &Rating) -> f64 {
        1.0 / (1.0 + 3.0 * Q.powi(2) * rating.sigma().powi(2) / PI.powi(2)).sqrt()
    }

    fn expect_score(&self, rating: &Rating, other: &Rating, g: f64) -> f64 {
        1.0 / (1.0 + 10f64.powf(g * (rating.mu() - other.mu()) / -400.0))
    }

    fn rate(&self, rating: &Rating, series: &Series, rated_at: Option<f64>) -> Result<Rating> {
        let rated_at = rated_at.unwrap_or_else(|| self.clock.now());

        let mut d_square_inv = 0.0;
        let mut difference = 0.0;
        for (actual_score, other) in series {
            let g = self.g(other);
            let expected_score = self.expect_score(rating, other, g);
            difference += g * (actual_score - expected_score);
            d_square_inv += expected_score * (1.0 - expected_score) * Q.powi(2) * g.powi(2);
        }

        let denom = 1.0 / rating.sigma().powi(2) + d_square_inv;
        let mu = rating.mu() + Q / denom * difference;
        let sigma = (1.0 / denom).sqrt();

        debug!(
            games = series.len(),
            old_mu = rating.mu(),
            new_mu = mu,
            new_sigma = sigma,
            "Glicko rating period"
        );

        Rating::new(mu, sigma, rating.volatility(), Some(rated_at))
    }

    fn period(&self) -> Duration {
        self.config.period()
    }

    fn now(&self) -> f64 {
        self.clock.now()
    }
}
