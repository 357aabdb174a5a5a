//! Gemini API provider implementation.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use scorelink_core::error::FeedbackError;
use scorelink_core::scoring::EvaluationResult;
use scorelink_core::traits::FeedbackProvider;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Band descriptions the narrative leans on for the two rubric categories
/// the tool ships guidance for; other categories are analyzed from the
/// numbers alone.
const ANALYSIS_GUIDELINES: &str = "\
Guidelines per category, by percentage band:
- Vocabulary 0-35%: core word knowledge is too thin to hold sentence meaning together.
- Vocabulary 36-70%: everyday vocabulary is solid, but academic or polysemous words cause uneven interpretation.
- Vocabulary 71-100%: strong command of advanced vocabulary and synonym substitution.
- Detail 0-35%: struggles to locate explicitly stated information.
- Detail 36-70%: grasps overall facts but slips on distractors that swap a word or invert causality.
- Detail 71-100%: extracts stated facts precisely and sees through distorted answer choices.
Write 2-3 sentences of objective analysis in a formal register. No greetings or encouragement. \
For categories without a guideline above, analyze from the overall achievement data.";

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: Option<String>, base_url: Option<String>) -> GeminiProvider {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        GeminiProvider {
            api_key: api_key.to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        }
    }
}

/// Build the analysis prompt from the score summary.
pub fn build_prompt(result: &EvaluationResult) -> String {
    let category_summary = result
        .category_results
        .iter()
        .map(|c| format!("{} {}: {:.1}%", c.section, c.category, c.percentage))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Student: {}\nTotal score: {} / {}\nPer-category achievement: {}\n\n{}",
        result.student_name, result.total_score, result.max_score, category_summary,
        ANALYSIS_GUIDELINES
    )
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[async_trait]
impl FeedbackProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, result), fields(model = %self.model))]
    async fn narrative(&self, result: &EvaluationResult) -> Result<String, FeedbackError> {
        if self.api_key.is_empty() {
            return Err(FeedbackError::Unavailable("no API key configured".into()));
        }

        let start = Instant::now();
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(result),
                }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FeedbackError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    FeedbackError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(FeedbackError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedbackError::Unavailable(body));
        }
        if status == 404 {
            return Err(FeedbackError::ModelNotFound(self.model.clone()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(FeedbackError::Api { status, message });
        }

        let api_response: GeminiResponse =
            response.json().await.map_err(|e| FeedbackError::Api {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        tracing::debug!(latency_ms = start.elapsed().as_millis() as u64, "feedback generated");

        let text = api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(FeedbackError::Api {
                status,
                message: "response carried no text".into(),
            });
        }
        Ok(text)
    }
}
