//! Error types shared by every detector and boundary.

use thiserror::Error;

/// Failures surfaced by frame validation, detection and backend selection.
///
/// `detect` itself only ever produces `InvalidInput` or `AllocationFailure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdgeError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("failed to allocate {bytes} byte output buffer")]
    AllocationFailure { bytes: usize },

    #[error("edge backend unavailable: {0}")]
    BackendUnavailable(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EdgeError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EdgeError>;
