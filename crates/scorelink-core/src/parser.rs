//! Session TOML parser.
//!
//! Loads exam sessions ({questions, student input}) from TOML files and
//! directories, and validates them. Question type is derived from the
//! section: Reading/Listening items are MCQ, Speaking/Writing items are
//! direct-graded. Identifiers and numbers default to the canonical
//! positional scheme when omitted.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{
    Question, QuestionType, Section, StudentInput, DEFAULT_DIRECT_POINTS, DEFAULT_MCQ_POINTS,
    GENERAL_CATEGORY,
};

/// One exam session: the configured questions plus one student's input.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub title: String,
    pub questions: Vec<Question>,
    pub student: StudentInput,
}

/// Intermediate TOML structure for session files.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TomlSessionFile {
    #[serde(default)]
    session: TomlSessionHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
    #[serde(default)]
    student: TomlStudent,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TomlSessionHeader {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TomlStudent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    answers: BTreeMap<String, String>,
}

/// Parse a single TOML file into a `Session`.
pub fn load_session(path: &Path) -> Result<Session> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session file: {}", path.display()))?;

    parse_session_str(&content, path)
}

/// Parse a TOML string into a `Session` (useful for testing).
pub fn parse_session_str(content: &str, source_path: &Path) -> Result<Session> {
    let parsed: TomlSessionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut mcq_counts: BTreeMap<Section, u32> = BTreeMap::new();
    let mut direct_counts: BTreeMap<Section, usize> = BTreeMap::new();

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let section: Section = q
                .section
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{}", e))?;

            let question = if section.is_mcq() {
                let count = mcq_counts.entry(section).or_insert(0);
                *count += 1;
                let number = q.number.unwrap_or(*count);
                Question {
                    id: q
                        .id
                        .unwrap_or_else(|| Question::canonical_mcq_id(section, number)),
                    number,
                    section,
                    category: q.category.unwrap_or_else(|| GENERAL_CATEGORY.to_string()),
                    correct_answer: Some(q.correct_answer.unwrap_or_default()),
                    points: q.points.unwrap_or(DEFAULT_MCQ_POINTS),
                    question_type: QuestionType::Mcq,
                }
            } else {
                let index = direct_counts.entry(section).or_insert(0);
                let current = *index;
                *index += 1;
                Question {
                    id: q
                        .id
                        .unwrap_or_else(|| Question::canonical_direct_id(section, current)),
                    number: q.number.unwrap_or(current as u32 + 1),
                    section,
                    category: q.category.unwrap_or_else(|| GENERAL_CATEGORY.to_string()),
                    correct_answer: None,
                    points: q.points.unwrap_or(DEFAULT_DIRECT_POINTS),
                    question_type: QuestionType::Direct,
                }
            };
            Ok(question)
        })
        .collect::<Result<Vec<_>>>()?;

    let title = if parsed.session.title.is_empty() {
        source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        parsed.session.title
    };

    Ok(Session {
        title,
        questions,
        student: StudentInput {
            name: parsed.student.name,
            answers: parsed.student.answers.into_iter().collect(),
        },
    })
}

/// Render a session back to TOML, re-readable by `parse_session_str`.
pub fn session_to_toml(session: &Session) -> Result<String> {
    let file = TomlSessionFile {
        session: TomlSessionHeader {
            title: session.title.clone(),
        },
        questions: session
            .questions
            .iter()
            .map(|q| TomlQuestion {
                section: q.section.to_string().to_lowercase(),
                id: Some(q.id.clone()),
                number: Some(q.number),
                category: (q.category != GENERAL_CATEGORY).then(|| q.category.clone()),
                correct_answer: q.correct_answer.clone(),
                points: Some(q.points),
            })
            .collect(),
        student: TomlStudent {
            name: session.student.name.clone(),
            answers: session
                .student
                .answers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        },
    };

    toml::to_string_pretty(&file).context("failed to serialize session")
}

/// Recursively load all `.toml` session files from a directory.
pub fn load_session_directory(dir: &Path) -> Result<Vec<Session>> {
    let mut sessions = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            sessions.extend(load_session_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match load_session(&path) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(sessions)
}

/// A warning from session validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a session for common issues.
pub fn validate_session(session: &Session) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate question ids
    let mut seen_ids = HashSet::new();
    for question in &session.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question id: {}", question.id),
            });
        }
    }

    // MCQ items without an answer key never score
    for question in &session.questions {
        if question.is_mcq()
            && question
                .correct_answer
                .as_deref()
                .unwrap_or("")
                .trim()
                .is_empty()
        {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "no answer key set".into(),
            });
        }
    }

    // Zero or negative weights
    for question in &session.questions {
        if question.points <= 0.0 {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("non-positive points: {}", question.points),
            });
        }
    }

    // Answers that reference no question
    for answer_id in session.student.answers.keys() {
        if !session.questions.iter().any(|q| &q.id == answer_id) {
            warnings.push(ValidationWarning {
                question_id: Some(answer_id.clone()),
                message: "answer references an unknown question id".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[session]
title = "Mock Test 1"

[[questions]]
section = "reading"
category = "Vocabulary"
correct_answer = "B"

[[questions]]
section = "reading"
correct_answer = "D"
points = 2.0

[[questions]]
section = "speaking"
category = "Delivery"

[student]
name = "Kim"

[student.answers]
R-1 = "B"
R-2 = "a"
S-D-0 = "4.5"
"#;

    #[test]
    fn parse_valid_session() {
        let session = parse_session_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(session.title, "Mock Test 1");
        assert_eq!(session.questions.len(), 3);
        assert_eq!(session.questions[0].id, "R-1");
        assert_eq!(session.questions[0].question_type, QuestionType::Mcq);
        assert_eq!(session.questions[1].id, "R-2");
        assert_eq!(session.questions[1].points, 2.0);
        assert_eq!(session.questions[2].id, "S-D-0");
        assert_eq!(session.questions[2].question_type, QuestionType::Direct);
        assert_eq!(session.questions[2].points, DEFAULT_DIRECT_POINTS);
        assert_eq!(session.student.answer("S-D-0"), Some("4.5"));
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[[questions]]
section = "listening"

[[questions]]
section = "writing"
"#;
        let session = parse_session_str(toml, &PathBuf::from("minimal.toml")).unwrap();
        assert_eq!(session.title, "minimal");
        assert_eq!(session.questions[0].id, "L-1");
        assert_eq!(session.questions[0].category, GENERAL_CATEGORY);
        assert_eq!(session.questions[0].points, DEFAULT_MCQ_POINTS);
        assert_eq!(session.questions[1].id, "W-D-0");
        assert!(session.student.name.is_empty());
    }

    #[test]
    fn parse_unknown_section_fails() {
        let toml = r#"
[[questions]]
section = "grammar"
"#;
        assert!(parse_session_str(toml, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_session_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn toml_round_trip() {
        let session = parse_session_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let rendered = session_to_toml(&session).unwrap();
        let back = parse_session_str(&rendered, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn validate_duplicate_ids() {
        let toml = r#"
[[questions]]
section = "reading"
id = "R-1"
correct_answer = "A"

[[questions]]
section = "reading"
id = "R-1"
correct_answer = "B"
"#;
        let session = parse_session_str(toml, &PathBuf::from("dupes.toml")).unwrap();
        let warnings = validate_session(&session);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
    }

    #[test]
    fn validate_missing_answer_key() {
        let toml = r#"
[[questions]]
section = "reading"
"#;
        let session = parse_session_str(toml, &PathBuf::from("t.toml")).unwrap();
        let warnings = validate_session(&session);
        assert!(warnings.iter().any(|w| w.message.contains("answer key")));
    }

    #[test]
    fn validate_unknown_answer_id() {
        let toml = r#"
[[questions]]
section = "reading"
correct_answer = "A"

[student]
name = "Kim"

[student.answers]
R-9 = "A"
"#;
        let session = parse_session_str(toml, &PathBuf::from("t.toml")).unwrap();
        let warnings = validate_session(&session);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("unknown question")));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("mock.toml");
        std::fs::write(&file_path, VALID_TOML).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sessions = load_session_directory(dir.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].title, "Mock Test 1");
    }
}
