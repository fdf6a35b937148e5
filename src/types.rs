//! Common types shared by the rating systems

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Actual score for a win
pub const WIN: f64 = 1.0;
/// Actual score for a draw
pub const DRAW: f64 = 0.5;
/// Actual score for a loss
pub const LOSS: f64 = 0.0;

/// Default mean skill on the public scale
pub const DEFAULT_MU: f64 = 1500.0;
/// Default rating deviation on the public scale
pub const DEFAULT_SIGMA: f64 = 350.0;
/// Default Glicko-2 volatility
pub const DEFAULT_VOLATILITY: f64 = 0.06;

/// One rating period worth of games: (actual score, opponent rating) pairs
pub type Series = [(f64, Rating)];

/// A competitor's skill estimate at a point in time.
///
/// Ratings are immutable. Every update produces a new instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RatingRecord")]
pub struct Rating {
    mu: f64,
    sigma: f64,
    volatility: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rated_at: Option<f64>,
}

/// Unvalidated wire form of a [`Rating`]
#[derive(Debug, Deserialize)]
struct RatingRecord {
    mu: f64,
    sigma: f64,
    #[serde(default = "default_volatility")]
    volatility: f64,
    #[serde(default)]
    rated_at: Option<f64>,
}

fn default_volatility() -> f64 {
    DEFAULT_VOLATILITY
}

impl TryFrom<RatingRecord> for Rating {
    type Error = RatingError;

    fn try_from(record: RatingRecord) -> Result<Self> {
        Rating::new(record.mu, record.sigma, record.volatility, record.rated_at)
    }
}

impl Rating {
    /// Create a validated rating
    pub fn new(mu: f64, sigma: f64, volatility: f64, rated_at: Option<f64>) -> Result<Self> {
        if !mu.is_finite() {
            return Err(RatingError::validation(format!(
                "mu must be finite, got {}",
                mu
            )));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(RatingError::validation(format!(
                "sigma must be positive and finite, got {}",
                sigma
            )));
        }
        if !volatility.is_finite() || volatility <= 0.0 {
            return Err(RatingError::validation(format!(
                "volatility must be positive and finite, got {}",
                volatility
            )));
        }
        if let Some(secs) = rated_at {
            if !secs.is_finite() {
                return Err(RatingError::validation(format!(
                    "rated_at must be finite, got {}",
                    secs
                )));
            }
        }

        Ok(Self::from_parts(mu, sigma, volatility, rated_at))
    }

    /// Build a rating from values the rating math already guarantees
    pub(crate) fn from_parts(mu: f64, sigma: f64, volatility: f64, rated_at: Option<f64>) -> Self {
        Self {
            mu,
            sigma,
            volatility,
            rated_at,
        }
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Epoch seconds of the rating period that produced this rating
    pub fn rated_at(&self) -> Option<f64> {
        self.rated_at
    }

    /// Copy of this rating stamped with a different period time
    pub fn with_rated_at(&self, rated_at: Option<f64>) -> Self {
        Self {
            rated_at,
            ..self.clone()
        }
    }

    /// Range holding the true skill with roughly 95% confidence
    pub fn confidence_interval_95(&self) -> (f64, f64) {
        (self.mu - 1.96 * self.sigma, self.mu + 1.96 * self.sigma)
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::from_parts(DEFAULT_MU, DEFAULT_SIGMA, DEFAULT_VOLATILITY, None)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rating(mu={:.3}, sigma={:.3}, volatility={:.3}",
            self.mu, self.sigma, self.volatility
        )?;
        match self.rated_at {
            Some(rated_at) => write!(f, ", rated_at={})", rated_at),
            None => write!(f, ")"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rating() {
        let rating = Rating::default();
        assert_eq!(rating.mu(), 1500.0);
        assert_eq!(rating.sigma(), 350.0);
        assert_eq!(rating.volatility(), 0.06);
        assert_eq!(rating.rated_at(), None);
    }

    #[test]
    fn test_rating_validation() {
        assert!(Rating::new(1500.0, 200.0, 0.06, None).is_ok());
        assert!(Rating::new(-300.0, 1.0, 0.01, Some(0.0)).is_ok());

        assert!(Rating::new(f64::NAN, 200.0, 0.06, None).is_err());
        assert!(Rating::new(f64::INFINITY, 200.0, 0.06, None).is_err());
        assert!(Rating::new(1500.0, 0.0, 0.06, None).is_err());
        assert!(Rating::new(1500.0, -1.0, 0.06, None).is_err());
        assert!(Rating::new(1500.0, 200.0, 0.0, None).is_err());
        assert!(Rating::new(1500.0, 200.0, 0.06, Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_display() {
        let rating = Rating::new(1464.0506, 151.5172, 0.059996, None).unwrap();
        assert_eq!(
            rating.to_string(),
            "Rating(mu=1464.051, sigma=151.517, volatility=0.060)"
        );

        let stamped = rating.with_rated_at(Some(1700000000.0));
        assert_eq!(
            stamped.to_string(),
            "Rating(mu=1464.051, sigma=151.517, volatility=0.060, rated_at=1700000000)"
        );
    }

    #[test]
    fn test_with_rated_at_keeps_estimate() {
        let rating = Rating::new(1600.0, 80.0, 0.05, None).unwrap();
        let stamped = rating.with_rated_at(Some(42.0));

        assert_eq!(stamped.mu(), rating.mu());
        assert_eq!(stamped.sigma(), rating.sigma());
        assert_eq!(stamped.volatility(), rating.volatility());
        assert_eq!(stamped.rated_at(), Some(42.0));
        assert_eq!(rating.rated_at(), None);
    }

    #[test]
    fn test_confidence_interval() {
        let rating = Rating::new(1500.0, 100.0, 0.06, None).unwrap();
        let (low, high) = rating.confidence_interval_95();
        assert!((low - 1304.0).abs() < 1e-9);
        assert!((high - 1696.0).abs() < 1e-9);
    }

    #[test]
    fn test_serde_round_trip() {
        let rating = Rating::new(1520.5, 75.25, 0.055, Some(1234.0)).unwrap();
        let json = serde_json::to_string(&rating).unwrap();
        let parsed: Rating = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rating);
    }

    #[test]
    fn test_deserialize_defaults_and_validation() {
        let parsed: Rating = serde_json::from_str(r#"{"mu": 1400.0, "sigma": 30.0}"#).unwrap();
        assert_eq!(parsed.volatility(), DEFAULT_VOLATILITY);
        assert_eq!(parsed.rated_at(), None);

        let unstamped = serde_json::to_value(&parsed).unwrap();
        assert!(unstamped.get("rated_at").is_none());

        let invalid = serde_json::from_str::<Rating>(r#"{"mu": 1400.0, "sigma": -5.0}"#);
        assert!(invalid.is_err());
    }
}
