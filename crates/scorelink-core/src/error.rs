//! Feedback provider error types.
//!
//! These error types represent failures when requesting narrative feedback.
//! Defined in `scorelink-core` so callers can classify failures without
//! string matching; the report flow degrades gracefully when feedback is
//! unavailable.

use thiserror::Error;

/// Errors that can occur when requesting narrative feedback.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// No provider is configured, or the provider is missing its API key.
    #[error("feedback unavailable: {0}")]
    Unavailable(String),

    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

impl FeedbackError {
    /// Returns `true` when retrying cannot help and the report should be
    /// shown without a narrative.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            FeedbackError::Unavailable(_) | FeedbackError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            FeedbackError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_classification() {
        assert!(FeedbackError::Unavailable("no key".into()).is_unavailable());
        assert!(FeedbackError::ModelNotFound("m".into()).is_unavailable());
        assert!(!FeedbackError::Timeout(30).is_unavailable());
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        let err = FeedbackError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.retry_after_ms(), Some(5000));
        assert_eq!(FeedbackError::Timeout(30).retry_after_ms(), None);
    }
}
