use shared::domain::UnknownVariant;
use thiserror::Error;

use crate::{transport::TransportError, validation::ValidationErrors};

/// Why a submission attempt did not produce a result.
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    #[error("configuration has invalid fields: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Transport(TransportError),
    #[error("malformed simulation response: {reason}")]
    MalformedResponse { reason: String, body: String },
    #[error("simulation failed: {0}")]
    Service(String),
    #[error("a simulation is already in progress")]
    Busy,
}

impl SubmissionError {
    /// Transport failures keep the fallback dataset on screen.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<TransportError> for SubmissionError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Malformed { reason, body } => Self::MalformedResponse { reason, body },
            other => Self::Transport(other),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CorrectionError {
    #[error("no equilibrium correction is pending")]
    NotPending,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("conversion must be greater than 0 and at most 1, got {0}")]
    OutOfRange(f64),
    #[error("conversion {value} exceeds the equilibrium conversion {equilibrium}")]
    AboveEquilibrium { value: f64, equilibrium: f64 },
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown mode '{0}'")]
    UnknownMode(String),
    #[error(transparent)]
    InvalidValue(#[from] UnknownVariant),
    #[error("expected true or false, got '{0}'")]
    InvalidFlag(String),
}
