//! Error types for the quote pipeline.

use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

/// A bounded step of the request pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Store,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Stage::Fetch => "fetch",
                Stage::Store => "store",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum QuoteError {
    /// The stage budget elapsed before the operation completed.
    #[error("{stage} deadline of {budget:?} exceeded")]
    DeadlineExceeded { stage: Stage, budget: Duration },

    /// Upstream body was not the expected JSON envelope.
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    /// Transport failure or non-success status from upstream.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to serialize response: {0}")]
    Serialization(String),
}

impl QuoteError {
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, QuoteError::DeadlineExceeded { .. })
    }
}

impl From<fjall::Error> for QuoteError {
    fn from(err: fjall::Error) -> Self {
        QuoteError::Storage(err.to_string())
    }
}

pub type QuoteResult<T> = Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_message_names_stage() {
        let err = QuoteError::DeadlineExceeded {
            stage: Stage::Store,
            budget: Duration::from_millis(10),
        };
        assert!(err.is_deadline_exceeded());
        assert_eq!(err.to_string(), "store deadline of 10ms exceeded");
    }

    #[test]
    fn test_other_errors_are_not_deadlines() {
        assert!(!QuoteError::Decode("bad".into()).is_deadline_exceeded());
        assert!(!QuoteError::Network("down".into()).is_deadline_exceeded());
        assert!(!QuoteError::Storage("full".into()).is_deadline_exceeded());
    }
}
