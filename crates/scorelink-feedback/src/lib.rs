//! scorelink-feedback — narrative feedback provider integration.
//!
//! Implements the `FeedbackProvider` trait over the Gemini API, turning a
//! computed score report into a short written analysis. The rest of the
//! system never depends on this succeeding: an unavailable provider means
//! the report is shown without a narrative.

pub mod config;
pub mod gemini;
pub mod mock;

pub use config::{create_provider, load_config, load_config_from, FeedbackConfig, ScorelinkConfig};
pub use gemini::GeminiProvider;
pub use mock::MockFeedback;
pub use scorelink_core::error::FeedbackError;
