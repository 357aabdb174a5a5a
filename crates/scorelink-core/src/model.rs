//! Core data model types for scorelink.
//!
//! These are the fundamental types that the entire scorelink system uses
//! to represent exam questions and one student's submission.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sentinel rubric label for questions without a specific category.
pub const GENERAL_CATEGORY: &str = "general";

/// Default weight of an MCQ item.
pub const DEFAULT_MCQ_POINTS: f64 = 1.0;

/// Default maximum of a direct-graded item.
pub const DEFAULT_DIRECT_POINTS: f64 = 5.0;

/// How many MCQ placeholders each MCQ section starts with.
pub const DEFAULT_MCQ_COUNT: u32 = 30;

/// The four fixed exam sections.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Section {
    Reading,
    Listening,
    Speaking,
    Writing,
}

impl Section {
    /// All sections in report order.
    pub const ALL: [Section; 4] = [
        Section::Reading,
        Section::Listening,
        Section::Speaking,
        Section::Writing,
    ];

    /// Single-letter section code used in identifiers and wire formats.
    pub fn initial(self) -> char {
        match self {
            Section::Reading => 'R',
            Section::Listening => 'L',
            Section::Speaking => 'S',
            Section::Writing => 'W',
        }
    }

    /// Look up a section by its single-letter code.
    pub fn from_initial(code: &str) -> Option<Section> {
        match code {
            "R" => Some(Section::Reading),
            "L" => Some(Section::Listening),
            "S" => Some(Section::Speaking),
            "W" => Some(Section::Writing),
            _ => None,
        }
    }

    /// Reading and Listening hold auto-graded MCQ items; Speaking and
    /// Writing hold direct-graded items.
    pub fn is_mcq(self) -> bool {
        matches!(self, Section::Reading | Section::Listening)
    }

    /// The question type every item of this section carries.
    pub fn question_type(self) -> QuestionType {
        if self.is_mcq() {
            QuestionType::Mcq
        } else {
            QuestionType::Direct
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Reading => write!(f, "Reading"),
            Section::Listening => write!(f, "Listening"),
            Section::Speaking => write!(f, "Speaking"),
            Section::Writing => write!(f, "Writing"),
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reading" | "r" => Ok(Section::Reading),
            "listening" | "l" => Ok(Section::Listening),
            "speaking" | "s" => Ok(Section::Speaking),
            "writing" | "w" => Ok(Section::Writing),
            other => Err(format!("unknown section: {other}")),
        }
    }
}

/// The two disjoint scoring variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Auto-graded by exact case-insensitive match against the answer key.
    Mcq,
    /// Manually graded; the score is entered directly up to `points`.
    Direct,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Mcq => write!(f, "mcq"),
            QuestionType::Direct => write!(f, "direct"),
        }
    }
}

/// One scoring unit of the exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique within the exam.
    pub id: String,
    /// 1-based position within the section.
    pub number: u32,
    /// The section this question belongs to.
    pub section: Section,
    /// Free-text rubric label.
    #[serde(default = "default_category")]
    pub category: String,
    /// Answer key; present only for MCQ items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Weight (MCQ) or maximum score (direct).
    pub points: f64,
    /// Which scoring variant this item uses.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

fn default_category() -> String {
    GENERAL_CATEGORY.to_string()
}

impl Question {
    /// Canonical identifier of an MCQ item: `<initial>-<number>`.
    pub fn canonical_mcq_id(section: Section, number: u32) -> String {
        format!("{}-{}", section.initial(), number)
    }

    /// Canonical identifier of a direct item: `<initial>-D-<index>` (0-based).
    pub fn canonical_direct_id(section: Section, index: usize) -> String {
        format!("{}-D-{}", section.initial(), index)
    }

    /// A blank MCQ placeholder at the given 1-based position.
    pub fn mcq(section: Section, number: u32) -> Question {
        Question {
            id: Question::canonical_mcq_id(section, number),
            number,
            section,
            category: default_category(),
            correct_answer: Some(String::new()),
            points: DEFAULT_MCQ_POINTS,
            question_type: QuestionType::Mcq,
        }
    }

    /// A direct-graded item at the given 0-based insertion index.
    pub fn direct(
        section: Section,
        index: usize,
        category: impl Into<String>,
        points: f64,
    ) -> Question {
        Question {
            id: Question::canonical_direct_id(section, index),
            number: index as u32 + 1,
            section,
            category: category.into(),
            correct_answer: None,
            points,
            question_type: QuestionType::Direct,
        }
    }

    pub fn is_mcq(&self) -> bool {
        self.question_type == QuestionType::Mcq
    }
}

/// One respondent's submission: a name and raw answer strings keyed by
/// question id. MCQ answers hold the chosen key; direct answers hold the
/// awarded score rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentInput {
    pub name: String,
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

impl StudentInput {
    pub fn empty() -> StudentInput {
        StudentInput::default()
    }

    /// The raw answer for a question, if one was entered.
    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }
}

/// The starting question set: 30 MCQ placeholders per MCQ section, no
/// direct items until the evaluator adds them.
pub fn default_exam() -> Vec<Question> {
    let mut questions = Vec::with_capacity(DEFAULT_MCQ_COUNT as usize * 2);
    for section in [Section::Reading, Section::Listening] {
        for number in 1..=DEFAULT_MCQ_COUNT {
            questions.push(Question::mcq(section, number));
        }
    }
    questions
}
