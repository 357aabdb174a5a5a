//! Mock feedback provider for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use scorelink_core::error::FeedbackError;
use scorelink_core::scoring::EvaluationResult;
use scorelink_core::traits::FeedbackProvider;

/// A feedback provider that returns a fixed narrative (or a fixed failure)
/// without any network traffic.
pub struct MockFeedback {
    response: Result<String, String>,
    call_count: AtomicU32,
    last_student: Mutex<Option<String>>,
}

impl MockFeedback {
    /// A mock that always returns the same narrative.
    pub fn with_narrative(narrative: &str) -> MockFeedback {
        MockFeedback {
            response: Ok(narrative.to_string()),
            call_count: AtomicU32::new(0),
            last_student: Mutex::new(None),
        }
    }

    /// A mock that always reports itself unavailable.
    pub fn unavailable(reason: &str) -> MockFeedback {
        MockFeedback {
            response: Err(reason.to_string()),
            call_count: AtomicU32::new(0),
            last_student: Mutex::new(None),
        }
    }

    /// Number of narrative requests made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Name of the student in the most recent request.
    pub fn last_student(&self) -> Option<String> {
        self.last_student.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackProvider for MockFeedback {
    fn name(&self) -> &str {
        "mock"
    }

    async fn narrative(&self, result: &EvaluationResult) -> Result<String, FeedbackError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_student.lock().unwrap() = Some(result.student_name.clone());

        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(reason) => Err(FeedbackError::Unavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorelink_core::model::{default_exam, StudentInput};
    use scorelink_core::scoring::evaluate;

    fn sample_result() -> EvaluationResult {
        let input = StudentInput {
            name: "Kim".into(),
            ..StudentInput::empty()
        };
        evaluate(&default_exam(), &input)
    }

    #[tokio::test]
    async fn fixed_narrative() {
        let provider = MockFeedback::with_narrative("Consistent across sections.");
        let narrative = provider.narrative(&sample_result()).await.unwrap();
        assert_eq!(narrative, "Consistent across sections.");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_student().as_deref(), Some("Kim"));
    }

    #[tokio::test]
    async fn unavailable_mock_fails_recognizably() {
        let provider = MockFeedback::unavailable("offline");
        let err = provider.narrative(&sample_result()).await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(provider.call_count(), 1);
    }
}
