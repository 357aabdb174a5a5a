//! Trait boundary for the narrative-feedback collaborator.
//!
//! The scoring core never depends on feedback being available; providers
//! implement this trait in `scorelink-feedback`, and callers treat
//! `FeedbackError::is_unavailable` failures as "show the report without a
//! narrative".

use async_trait::async_trait;

use crate::error::FeedbackError;
use crate::scoring::EvaluationResult;

/// Backend that turns a computed score summary into narrative text.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Produce a short narrative analysis of the given score report.
    async fn narrative(&self, result: &EvaluationResult) -> Result<String, FeedbackError>;
}
