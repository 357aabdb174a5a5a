//! Score report envelope with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::EvaluationResult;

/// A computed score report, ready for rendering or persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was computed.
    pub created_at: DateTime<Utc>,
    /// The computed scores.
    pub result: EvaluationResult,
    /// The `#s=` share fragment this report can be reopened from, if one
    /// was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_fragment: Option<String>,
}

impl ScoreReport {
    pub fn new(result: EvaluationResult) -> ScoreReport {
        ScoreReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            result,
            share_fragment: None,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<ScoreReport> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ScoreReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_exam, StudentInput};
    use crate::scoring::evaluate;

    #[test]
    fn json_round_trip() {
        let result = evaluate(&default_exam(), &StudentInput::empty());
        let mut report = ScoreReport::new(result);
        report.share_fragment = Some("#s=abc".into());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = ScoreReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.result, report.result);
        assert_eq!(loaded.share_fragment.as_deref(), Some("#s=abc"));
    }
}
