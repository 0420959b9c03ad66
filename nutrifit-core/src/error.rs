use std::time::Duration;

use thiserror::Error;

/// Errors produced by the nutrition engine.
///
/// The variants fall into three families that callers treat differently:
/// network failures (the call never completed or the server rejected it),
/// validation failures (blocked locally before any network call), and
/// partial-data failures (the server answered but the answer is unusable).
#[derive(Debug, Error)]
pub enum NutritionError {
    /// The request could not be completed (connection, DNS, body decode).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    ServerStatus { status: u16 },

    /// The request exceeded its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The action is not legal in the current state. Detected locally,
    /// before any network call, with zero side effects.
    #[error("{0}")]
    Validation(String),

    /// The server answered but left out data we cannot fall back from.
    #[error("{0}")]
    PartialData(String),
}

impl NutritionError {
    pub fn validation(message: impl Into<String>) -> Self {
        NutritionError::Validation(message.into())
    }

    pub fn partial_data(message: impl Into<String>) -> Self {
        NutritionError::PartialData(message.into())
    }

    /// True for failures where local state was left exactly as before.
    pub fn is_validation(&self) -> bool {
        matches!(self, NutritionError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = NutritionError::validation("Save your plan before logging meals");
        assert_eq!(err.to_string(), "Save your plan before logging meals");
        assert!(err.is_validation());
    }

    #[test]
    fn test_server_status_display() {
        let err = NutritionError::ServerStatus { status: 503 };
        assert_eq!(err.to_string(), "server returned status 503");
        assert!(!err.is_validation());
    }
}
