//! Error types for the rating systems
//!
//! The rating math reports failures through the typed [`RatingError`] so callers
//! can tell bad input apart from a solver that failed to converge. Application
//! glue (configuration loading, the command line) uses anyhow on top of it.

/// Result type alias for rating operations
pub type Result<T> = std::result::Result<T, RatingError>;

/// Which loop of the volatility solver gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStage {
    /// Searching for the lower end of the initial bracket
    Bracket,
    /// Illinois regula falsi iteration
    Illinois,
}

impl std::fmt::Display for SolverStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverStage::Bracket => write!(f, "bracket search"),
            SolverStage::Illinois => write!(f, "Illinois iteration"),
        }
    }
}

/// Errors raised by ratings and rating systems
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid rating parameter: {message}")]
    Validation { message: String },

    #[error("Cannot rate an empty series of games with Glicko-2")]
    EmptySeries,

    #[error("Volatility solver did not converge: {stage} exceeded {iterations} iterations")]
    Convergence { stage: SolverStage, iterations: u32 },
}

impl RatingError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        RatingError::Validation {
            message: message.into(),
        }
    }
}
