//! Decoders for the two historical share formats.
//!
//! Both are decode-only: new links always use the compact `#s=` format.
//! The shapes here must stay readable forever — links shared under the old
//! formats never expire.

use std::collections::HashMap;

use base64::Engine;
use percent_encoding::percent_decode_str;
use serde::Deserialize;

use scorelink_core::model::{Question, QuestionType, Section, StudentInput, GENERAL_CATEGORY};

use crate::codec::STANDARD_FORGIVING;
use crate::compress;
use crate::dispatch::SharedState;
use crate::error::ShareError;

// ---------------------------------------------------------------------------
// `#r=` — compressed minified-object format
// ---------------------------------------------------------------------------

/// Minified question with single-letter keys:
/// id / number / section-code / category / answer / points / type-flag.
#[derive(Debug, Deserialize)]
struct MinifiedQuestion {
    i: String,
    n: u32,
    s: String,
    #[serde(default)]
    c: Option<String>,
    #[serde(default)]
    a: Option<String>,
    p: f64,
    t: i64,
}

#[derive(Debug, Deserialize)]
struct MinifiedStudent {
    n: String,
    #[serde(default)]
    a: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct MinifiedState {
    q: Vec<MinifiedQuestion>,
    s: MinifiedStudent,
}

/// Decode a `#r=` token: same codec/compression stack as the compact
/// format, different JSON shape.
pub(crate) fn decode_compressed(token: &str) -> Result<SharedState, ShareError> {
    let bytes = crate::codec::decode(token)?;
    let json = compress::decompress(&bytes)?;
    let state: MinifiedState = serde_json::from_slice(&json)?;

    let questions = state
        .q
        .into_iter()
        .map(|q| {
            let section = Section::from_initial(&q.s)
                .ok_or_else(|| ShareError::Shape(format!("unknown section code: {}", q.s)))?;
            let question_type = if q.t == 0 {
                QuestionType::Mcq
            } else {
                QuestionType::Direct
            };
            Ok(Question {
                id: q.i,
                number: q.n,
                section,
                category: q
                    .c
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| GENERAL_CATEGORY.to_string()),
                correct_answer: match question_type {
                    QuestionType::Mcq => Some(q.a.unwrap_or_default()),
                    QuestionType::Direct => None,
                },
                points: q.p,
                question_type,
            })
        })
        .collect::<Result<Vec<_>, ShareError>>()?;

    Ok(SharedState {
        questions,
        student: StudentInput {
            name: state.s.n,
            answers: state.s.a,
        },
    })
}

// ---------------------------------------------------------------------------
// `#report=` — oldest uncompressed format
// ---------------------------------------------------------------------------

/// Question exactly as the oldest links carried it: camelCase keys,
/// capitalized section names.
#[derive(Debug, Deserialize)]
struct PlainQuestion {
    id: String,
    number: u32,
    section: Section,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "correctAnswer")]
    correct_answer: Option<String>,
    points: f64,
    #[serde(rename = "type")]
    question_type: QuestionType,
}

#[derive(Debug, Deserialize)]
struct PlainStudent {
    name: String,
    #[serde(default)]
    answers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct PlainState {
    questions: Vec<PlainQuestion>,
    #[serde(rename = "studentInput")]
    student_input: PlainStudent,
}

/// Decode a `#report=` token: percent-decode, standard base64, UTF-8, JSON.
pub(crate) fn decode_plain(token: &str) -> Result<SharedState, ShareError> {
    let unescaped: Vec<u8> = percent_decode_str(token).collect();
    let bytes = STANDARD_FORGIVING.decode(unescaped)?;
    // Multi-byte characters survive: the payload is UTF-8 under the base64.
    let text = String::from_utf8(bytes)?;
    let state: PlainState = serde_json::from_str(&text)?;

    let questions = state
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            number: q.number,
            section: q.section,
            category: q
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| GENERAL_CATEGORY.to_string()),
            correct_answer: q.correct_answer,
            points: q.points,
            question_type: q.question_type,
        })
        .collect();

    Ok(SharedState {
        questions,
        student: StudentInput {
            name: state.student_input.name,
            answers: state.student_input.answers,
        },
    })
}
