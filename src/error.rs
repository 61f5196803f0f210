//! Error types
//!
//! Taxonomy for taper generation: validation errors reject a request
//! before any step is computed, `UnreachableDose` is downgraded to a
//! per-step warning, and `ScheduleTooLong` aborts generation.

use thiserror::Error;

/// Taper generation error types
#[derive(Debug, Error)]
pub enum TaperError {
    #[error("medication '{0}' is not in the equivalency table")]
    UnknownMedication(String),

    #[error("taper speed '{0}' is not recognized")]
    UnknownSpeed(String),

    #[error("starting dose must be positive, got {0} mg")]
    InvalidDose(f64),

    #[error("at least one tablet strength is required")]
    EmptyStrengths,

    #[error("tablet strengths must be positive, got {0} mg")]
    InvalidStrength(f64),

    #[error("final hold requires positive total days and interval")]
    InvalidFinalHold,

    #[error("final hold dose {0} mg is not a multiple of the smallest available strength")]
    InvalidHoldDose(f64),

    #[error("{0} mg cannot be made with the available tablet strengths")]
    UnreachableDose(f64),

    #[error("schedule exceeded the {0}-step safety cap; check speed configuration")]
    ScheduleTooLong(usize),
}

impl TaperError {
    /// Whether this error indicates bad input rather than an internal limit
    pub fn is_validation(&self) -> bool {
        !matches!(self, TaperError::ScheduleTooLong(_))
    }
}

/// Result type for taper operations
pub type TaperResult<T> = Result<T, TaperError>;
