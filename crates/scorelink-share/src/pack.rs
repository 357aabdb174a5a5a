//! Compact state packer.
//!
//! Projects {questions, student input} onto the smallest reasonable
//! positional structure and back. The packed form is a 5-tuple
//! `(name, reading, listening, speaking, writing)`: each MCQ section is
//! four parallel arrays (correct answers, student answers, categories,
//! points) aligned by index, and each direct section is a list of
//! `(category, points, answer)` triples in insertion order. Tuple structs
//! serialize as JSON arrays, so the wire shape carries no keys at all.
//!
//! Packing is lossy only for non-canonical question ids: unpacking
//! regenerates ids positionally (`R-1`, `S-D-0`, ...), which reproduces the
//! originals whenever they followed the canonical scheme.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use scorelink_core::model::{
    Question, QuestionType, Section, StudentInput, DEFAULT_DIRECT_POINTS, DEFAULT_MCQ_POINTS,
    GENERAL_CATEGORY,
};

/// The packed 5-tuple: (student name, Reading, Listening, Speaking, Writing).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackedState(
    pub String,
    pub McqBlock,
    pub McqBlock,
    pub Vec<DirectEntry>,
    pub Vec<DirectEntry>,
);

/// One MCQ section as four parallel arrays: correct answers, student
/// answers, categories (empty = the "general" sentinel), points (empty =
/// the default weight).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McqBlock(
    pub Vec<String>,
    pub Vec<String>,
    pub Vec<String>,
    pub Vec<String>,
);

/// One direct-graded item: (category, points, student answer or "0").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectEntry(pub String, pub String, pub String);

/// Render a weight the way the wire format stores it: no trailing `.0` on
/// whole numbers.
fn format_points(points: f64) -> String {
    if points.fract() == 0.0 && points.abs() < 1e15 {
        format!("{}", points as i64)
    } else {
        format!("{points}")
    }
}

fn pack_mcq(section: Section, questions: &[Question], input: &StudentInput) -> McqBlock {
    let mut items: Vec<&Question> = questions
        .iter()
        .filter(|q| q.section == section && q.is_mcq())
        .collect();
    items.sort_by_key(|q| q.number);

    let mut block = McqBlock::default();
    for q in items {
        block
            .0
            .push(q.correct_answer.clone().unwrap_or_default());
        block
            .1
            .push(input.answer(&q.id).unwrap_or("").to_string());
        block.2.push(if q.category == GENERAL_CATEGORY {
            String::new()
        } else {
            q.category.clone()
        });
        block.3.push(if q.points == DEFAULT_MCQ_POINTS {
            String::new()
        } else {
            format_points(q.points)
        });
    }
    block
}

fn pack_direct(section: Section, questions: &[Question], input: &StudentInput) -> Vec<DirectEntry> {
    questions
        .iter()
        .filter(|q| q.section == section && !q.is_mcq())
        .map(|q| {
            let answer = input.answer(&q.id).unwrap_or("");
            DirectEntry(
                q.category.clone(),
                format_points(q.points),
                if answer.is_empty() {
                    "0".to_string()
                } else {
                    answer.to_string()
                },
            )
        })
        .collect()
}

/// Project a session onto the packed 5-tuple.
pub fn pack(questions: &[Question], input: &StudentInput) -> PackedState {
    PackedState(
        input.name.clone(),
        pack_mcq(Section::Reading, questions, input),
        pack_mcq(Section::Listening, questions, input),
        pack_direct(Section::Speaking, questions, input),
        pack_direct(Section::Writing, questions, input),
    )
}

fn unpack_mcq(
    section: Section,
    block: &McqBlock,
    questions: &mut Vec<Question>,
    answers: &mut HashMap<String, String>,
) {
    let McqBlock(correct, student, categories, points) = block;
    for (i, answer_key) in correct.iter().enumerate() {
        let id = Question::canonical_mcq_id(section, i as u32 + 1);

        let category = match categories.get(i) {
            Some(c) if !c.is_empty() => c.clone(),
            _ => GENERAL_CATEGORY.to_string(),
        };
        let weight = points
            .get(i)
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_MCQ_POINTS);

        if let Some(answer) = student.get(i).filter(|a| !a.is_empty()) {
            answers.insert(id.clone(), answer.clone());
        }

        questions.push(Question {
            id,
            number: i as u32 + 1,
            section,
            category,
            correct_answer: Some(answer_key.clone()),
            points: weight,
            question_type: QuestionType::Mcq,
        });
    }
}

fn unpack_direct(
    section: Section,
    entries: &[DirectEntry],
    questions: &mut Vec<Question>,
    answers: &mut HashMap<String, String>,
) {
    for (i, DirectEntry(category, points, answer)) in entries.iter().enumerate() {
        let id = Question::canonical_direct_id(section, i);

        answers.insert(id.clone(), answer.clone());
        questions.push(Question {
            id,
            number: i as u32 + 1,
            section,
            category: if category.is_empty() {
                GENERAL_CATEGORY.to_string()
            } else {
                category.clone()
            },
            correct_answer: None,
            points: points.parse().unwrap_or(DEFAULT_DIRECT_POINTS),
            question_type: QuestionType::Direct,
        });
    }
}

/// Rebuild a session from the packed 5-tuple, regenerating canonical ids.
pub fn unpack(packed: &PackedState) -> (Vec<Question>, StudentInput) {
    let PackedState(name, reading, listening, speaking, writing) = packed;

    let mut questions = Vec::new();
    let mut answers = HashMap::new();
    unpack_mcq(Section::Reading, reading, &mut questions, &mut answers);
    unpack_mcq(Section::Listening, listening, &mut questions, &mut answers);
    unpack_direct(Section::Speaking, speaking, &mut questions, &mut answers);
    unpack_direct(Section::Writing, writing, &mut questions, &mut answers);

    (
        questions,
        StudentInput {
            name: name.clone(),
            answers,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> (Vec<Question>, StudentInput) {
        let questions = vec![
            Question {
                correct_answer: Some("B".into()),
                ..Question::mcq(Section::Reading, 1)
            },
            Question {
                correct_answer: Some("D".into()),
                category: "Vocabulary".into(),
                points: 2.0,
                ..Question::mcq(Section::Reading, 2)
            },
            Question {
                correct_answer: Some("A".into()),
                ..Question::mcq(Section::Listening, 1)
            },
            Question::direct(Section::Speaking, 0, "Delivery", 5.0),
            Question::direct(Section::Writing, 0, "Organization", 7.5),
        ];
        let mut input = StudentInput {
            name: "Kim".into(),
            ..StudentInput::empty()
        };
        input.answers.insert("R-1".into(), "B".into());
        input.answers.insert("R-2".into(), "c".into());
        input.answers.insert("S-D-0".into(), "4.5".into());
        (questions, input)
    }

    #[test]
    fn packed_json_is_positional() {
        let (questions, input) = sample_session();
        let packed = pack(&questions, &input);
        let json = serde_json::to_string(&packed).unwrap();
        assert!(json.starts_with("[\"Kim\",[["));
        // Positional arrays only: no object keys anywhere.
        assert!(!json.contains('{'));
    }

    #[test]
    fn pack_applies_placeholders() {
        let (questions, input) = sample_session();
        let PackedState(name, reading, _, speaking, writing) = pack(&questions, &input);

        assert_eq!(name, "Kim");
        assert_eq!(reading.0, vec!["B", "D"]);
        assert_eq!(reading.1, vec!["B", "c"]);
        // "general" packs as the empty placeholder, explicit labels survive.
        assert_eq!(reading.2, vec!["", "Vocabulary"]);
        // Default weight packs empty, 2.0 packs literally.
        assert_eq!(reading.3, vec!["", "2"]);

        assert_eq!(speaking, vec![DirectEntry("Delivery".into(), "5".into(), "4.5".into())]);
        // Missing direct answers pack as "0".
        assert_eq!(
            writing,
            vec![DirectEntry("Organization".into(), "7.5".into(), "0".into())]
        );
    }

    #[test]
    fn round_trip_preserves_scoring_fields() {
        let (questions, input) = sample_session();
        let (unpacked_questions, unpacked_input) = unpack(&pack(&questions, &input));

        assert_eq!(unpacked_input.name, input.name);
        assert_eq!(unpacked_questions.len(), questions.len());
        for (orig, back) in questions.iter().zip(&unpacked_questions) {
            assert_eq!(back.id, orig.id, "ids here are canonical already");
            assert_eq!(back.section, orig.section);
            assert_eq!(back.category, orig.category);
            assert_eq!(back.points, orig.points);
            assert_eq!(back.correct_answer, orig.correct_answer);
            assert_eq!(back.question_type, orig.question_type);
        }
        assert_eq!(unpacked_input.answer("R-1"), Some("B"));
        assert_eq!(unpacked_input.answer("R-2"), Some("c"));
        assert_eq!(unpacked_input.answer("S-D-0"), Some("4.5"));
        // The unanswered direct item comes back as the "0" placeholder.
        assert_eq!(unpacked_input.answer("W-D-0"), Some("0"));
    }

    #[test]
    fn unpack_regenerates_non_canonical_ids() {
        let (mut questions, mut input) = sample_session();
        // Simulate a dynamically-added item with a disambiguated id.
        questions[3].id = "S-Direct-1699999999-0".into();
        let answer = input.answers.remove("S-D-0").unwrap();
        input.answers.insert(questions[3].id.clone(), answer);

        let (unpacked_questions, unpacked_input) = unpack(&pack(&questions, &input));
        assert_eq!(unpacked_questions[3].id, "S-D-0");
        assert_eq!(unpacked_input.answer("S-D-0"), Some("4.5"));
    }

    #[test]
    fn unpack_substitutes_defaults() {
        // Empty points placeholder at index 0, unparsable at index 1.
        let packed = PackedState(
            String::new(),
            McqBlock(
                vec!["A".into(), "B".into()],
                vec![String::new(), String::new()],
                vec![String::new(), String::new()],
                vec![String::new(), "x.y".into()],
            ),
            McqBlock::default(),
            vec![DirectEntry("Delivery".into(), "??".into(), "3".into())],
            Vec::new(),
        );

        let (questions, input) = unpack(&packed);
        assert_eq!(questions[0].points, DEFAULT_MCQ_POINTS);
        assert_eq!(questions[1].points, DEFAULT_MCQ_POINTS);
        assert_eq!(questions[0].category, GENERAL_CATEGORY);
        assert_eq!(questions[2].points, DEFAULT_DIRECT_POINTS);
        // Blank MCQ answers produce no entries at all.
        assert!(input.answers.get("R-1").is_none());
    }

    #[test]
    fn mcq_blocks_sort_by_number() {
        let questions = vec![
            Question {
                correct_answer: Some("C".into()),
                ..Question::mcq(Section::Reading, 2)
            },
            Question {
                correct_answer: Some("A".into()),
                ..Question::mcq(Section::Reading, 1)
            },
        ];
        let packed = pack(&questions, &StudentInput::empty());
        assert_eq!(packed.1 .0, vec!["A", "C"]);
    }

    #[test]
    fn format_points_drops_whole_number_fraction() {
        assert_eq!(format_points(1.0), "1");
        assert_eq!(format_points(7.5), "7.5");
        assert_eq!(format_points(0.25), "0.25");
    }
}
