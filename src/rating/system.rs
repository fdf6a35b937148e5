//! Rating system trait and pairwise helpers
//!
//! This module defines the interface shared by the Glicko and Glicko-2 systems
//! and the one-on-one conveniences built on top of it.

use crate::error::Result;
use crate::types::{Rating, Series, DRAW, LOSS, WIN};
use std::time::Duration;

/// Trait implemented by every rating system
pub trait RatingSystem: Send + Sync {
    /// Rating for a competitor the system has never seen
    fn default_rating(&self) -> Rating;

    /// Weight in (0, 1] discounting an opponent by its own uncertainty
    fn g(&self, rating: &Rating) -> f64;

    /// Probability that `rating` beats `other`, given `g` of `other`
    fn expect_score(&self, rating: &Rating, other: &Rating, g: f64) -> f64;

    /// Update `rating` with one period of games
    ///
    /// # Arguments
    /// * `rating` - Rating at the start of the period
    /// * `series` - (actual score, opponent) pairs; order does not matter
    /// * `rated_at` - Period timestamp, taken from the system clock when `None`
    fn rate(&self, rating: &Rating, series: &Series, rated_at: Option<f64>) -> Result<Rating>;

    /// Length of a rating period (informational)
    fn period(&self) -> Duration;

    /// Current time from the system's clock, in epoch seconds
    fn now(&self) -> f64;

    /// Match quality in [0, 1]; 1 for a coin flip, towards 0 for a foregone result
    fn quality_1vs1(&self, rating1: &Rating, rating2: &Rating) -> f64 {
        pairing_quality(self, rating1, rating2)
    }
}

/// Quality of a pairing, computed with the system's own `g` and expectation
///
/// Both directional expectations are expressed as the chance that `rating1`
/// wins, then averaged.
pub(crate) fn pairing_quality<S: RatingSystem + ?Sized>(
    system: &S,
    rating1: &Rating,
    rating2: &Rating,
) -> f64 {
    let expected1 = system.expect_score(rating1, rating2, system.g(rating2));
    let expected2 = system.expect_score(rating2, rating1, system.g(rating1));
    let expected = (expected1 + (1.0 - expected2)) / 2.0;
    (2.0 * (0.5 - (0.5 - expected).abs())).clamp(0.0, 1.0)
}

/// Rate a single game between two competitors
///
/// `rating1` wins unless `drawn` is set. Both sides are rated against the
/// other's prior rating and share one timestamp.
pub fn rate_1vs1<S: RatingSystem + ?Sized>(
    system: &S,
    rating1: &Rating,
    rating2: &Rating,
    drawn: bool,
    rated_at: Option<f64>,
) -> Result<(Rating, Rating)> {
    let rated_at = rated_at.unwrap_or_else(|| system.now());
    let (score1, score2) = if drawn { (DRAW, DRAW) } else { (WIN, LOSS) };

    let new_rating1 = system.rate(rating1, &[(score1, rating2.clone())], Some(rated_at))?;
    let new_rating2 = system.rate(rating2, &[(score2, rating1.clone())], Some(rated_at))?;

    Ok((new_rating1, new_rating2))
}
