//! Error types for program generation.

use thiserror::Error;

/// Errors raised while validating inputs or generating a program.
///
/// Validation always runs before any computation, so a returned error
/// means nothing was produced.
#[derive(Debug, Error, PartialEq)]
pub enum ProgramError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid template parameters: {sets} sets x {reps} reps (sets must be 3-8, reps 3-5)")]
    InvalidTemplateParams { sets: u32, reps: u32 },

    #[error("division by zero: the Brzycki formula is undefined for {reps} reps")]
    DivisionByZero { reps: u32 },

    #[error("upstream computation failed{}: {message}", status_suffix(.status))]
    Upstream { status: Option<u16>, message: String },
}

impl ProgramError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ProgramError::InvalidInput(msg.into())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Reject non-finite and non-positive loads.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<(), ProgramError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProgramError::invalid(format!("{name} must be positive, got {value}")))
    }
}
