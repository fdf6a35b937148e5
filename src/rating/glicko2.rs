//! Glicko-2 rating system implementation
//!
//! Glicko-2 rates on an internal scale centered on zero. Ratings are scaled
//! down before the update and back up afterwards, and every period also
//! re-estimates the competitor's volatility with an iterative solver.

use crate::config::Glicko2Config;
use crate::error::{RatingError, Result};
use crate::rating::system::{pairing_quality, RatingSystem};
use crate::rating::volatility::VolatilityEquation;
use crate::types::{Rating, Series};
use crate::utils::{Clock, SystemClock};
use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Ratio between the public Glicko scale and the internal Glicko-2 scale (400 / ln 10)
pub const RATIO: f64 = 173.7178;

/// Glicko-2 rating system
#[derive(Clone)]
pub struct Glicko2 {
    config: Glicko2Config,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Glicko2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Glicko2")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Glicko2 {
    fn default() -> Self {
        Self {
            config: Glicko2Config::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Glicko2 {
    /// Create a new Glicko-2 system
    pub fn new(config: Glicko2Config) -> Result<Self> {
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

    pub fn config(&self) -> &Glicko2Config {
        &self.config
    }

    /// Create a rating, filling omitted values from the system defaults
    pub fn create_rating(
        &self,
        mu: Option<f64>,
        sigma: Option<f64>,
        volatility: Option<f64>,
        rated_at: Option<f64>,
    ) -> Result<Rating> {
        Rating::new(
            mu.unwrap_or(self.config.mu),
            sigma.unwrap_or(self.config.sigma),
            volatility.unwrap_or(self.config.volatility),
            rated_at,
        )
    }

    /// Convert a public-scale rating to the internal scale
    pub fn scale_down(&self, rating: &Rating, ratio: f64) -> Rating {
        Rating::from_parts(
            (rating.mu() - self.config.mu) / ratio,
            rating.sigma() / ratio,
            rating.volatility(),
            rating.rated_at(),
        )
    }

    /// Convert an internal-scale rating back to the public scale
    pub fn scale_up(&self, rating: &Rating, ratio: f64) -> Rating {
        Rating::from_parts(
            rating.mu() * ratio + self.config.mu,
            rating.sigma() * ratio,
            rating.volatility(),
            rating.rated_at(),
        )
    }

    /// Solve for the volatility after a period
    ///
    /// `rating` is on the internal scale; `difference` is the estimated
    /// improvement Δ and `variance` the outcome-based variance v.
    pub fn determine_volatility(
        &self,
        rating: &Rating,
        difference: f64,
        variance: f64,
    ) -> Result<f64> {
        VolatilityEquation::new(
            rating.sigma(),
            rating.volatility(),
            difference,
            variance,
            self.config.tau,
        )
        .solve(self.config.epsilon, self.config.max_iterations)
    }

    /// Widen the deviation of a competitor who sat out `periods` rating periods
    pub fn decay(&self, rating: &Rating, periods: u32, rated_at: Option<f64>) -> Result<Rating> {
        let rated_at = rated_at.unwrap_or_else(|| self.clock.now());
        let scaled = self.scale_down(rating, RATIO);

        let sigma = (scaled.sigma().powi(2) + f64::from(periods) * scaled.volatility().powi(2))
            .sqrt();
        let decayed = Rating::from_parts(scaled.mu(), sigma, scaled.volatility(), Some(rated_at));

        let result = self.scale_up(&decayed, RATIO);
        Rating::new(
            result.mu(),
            result.sigma(),
            result.volatility(),
            result.rated_at(),
        )
    }
}

impl RatingSystem for Glicko2 {
    fn default_rating(&self) -> Rating {
        Rating::from_parts(
            self.config.mu,
            self.config.sigma,
            self.config.volatility,
            None,
        )
    }

    fn g(&self, rating: &Rating) -> f64 {
        1.0 / (1.0 + 3.0 * rating.sigma().powi(2) / PI.powi(2)).sqrt()
    }

    fn expect_score(&self, rating: &Rating, other: &Rating, g: f64) -> f64 {
        1.0 / (1.0 + (-g * (rating.mu() - other.mu())).exp())
    }

    fn rate(&self, rating: &Rating, series: &Series, rated_at: Option<f64>) -> Result<Rating> {
        if series.is_empty() {
            return Err(RatingError::EmptySeries);
        }
        let rated_at = rated_at.unwrap_or_else(|| self.clock.now());

        let scaled = self.scale_down(rating, RATIO);

        let mut variance_inv = 0.0;
        let mut difference_sum = 0.0;
        for (actual_score, other) in series {
            let other = self.scale_down(other, RATIO);
            let g = self.g(&other);
            let expected_score = self.expect_score(&scaled, &other, g);
            variance_inv += g.powi(2) * expected_score * (1.0 - expected_score);
            difference_sum += g * (actual_score - expected_score);
        }

        // Outcomes that were certain carry no information; treat as a skipped period
        if !variance_inv.is_normal() {
            debug!(
                games = series.len(),
                "Glicko-2 series has no informative games, widening deviation only"
            );
            return self.decay(rating, 1, Some(rated_at));
        }

        let rating = scaled;
        let variance = 1.0 / variance_inv;
        let difference = difference_sum / variance_inv;

        let volatility = self.determine_volatility(&rating, difference, variance)?;

        let sigma_star = (rating.sigma().powi(2) + volatility.powi(2)).sqrt();
        let sigma = 1.0 / (1.0 / sigma_star.powi(2) + 1.0 / variance).sqrt();
        let mu = rating.mu() + sigma.powi(2) * (difference / variance);

        let result = self.scale_up(
            &Rating::from_parts(mu, sigma, volatility, Some(rated_at)),
            RATIO,
        );

        debug!(
            games = series.len(),
            new_mu = result.mu(),
            new_sigma = result.sigma(),
            new_volatility = result.volatility(),
            "Glicko-2 rating period"
        );

        Rating::new(
            result.mu(),
            result.sigma(),
            result.volatility(),
            result.rated_at(),
        )
    }

    fn quality_1vs1(&self, rating1: &Rating, rating2: &Rating) -> f64 {
        pairing_quality(
            self,
            &self.scale_down(rating1, RATIO),
            &self.scale_down(rating2, RATIO),
        )
    }

    fn period(&self) -> Duration {
        self.config.period()
    }

    fn now(&self) -> f64 {
        self.clock.now()
    }
}
