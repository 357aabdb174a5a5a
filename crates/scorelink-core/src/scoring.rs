//! Weighted-sum scoring of one student's submission.
//!
//! MCQ items earn their full weight on an exact case-insensitive match;
//! direct items earn the entered score clamped to `[0, points]`. Each
//! section's raw total is scaled to the 0–30 band, for a 120-point maximum.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{Question, Section, StudentInput};

/// Highest scaled score a single section can reach.
pub const SECTION_MAX: u32 = 30;

/// Achievement within one section/category pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub section: Section,
    pub category: String,
    pub total_questions: u32,
    /// Raw points earned in this category.
    pub earned_points: f64,
    /// Total weight of this category.
    pub max_points: f64,
    /// `earned / max` as a percentage; 0 when the category is empty.
    pub percentage: f64,
}

/// The full computed score report for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub student_name: String,
    /// Sum of the four scaled section scores.
    pub total_score: u32,
    /// Always `4 * SECTION_MAX`.
    pub max_score: u32,
    /// Scaled 0–30 score per section.
    pub section_scores: BTreeMap<Section, u32>,
    /// Per-category breakdown, in first-appearance order.
    pub category_results: Vec<CategoryResult>,
    /// Correctness per MCQ question id.
    pub is_correct: HashMap<String, bool>,
    /// Sum of raw earned points across all sections.
    pub actual_earned_points: f64,
}

/// Scale a raw section total to the 0–30 band.
pub fn scaled_score(earned: f64, max: f64) -> u32 {
    if max <= 0.0 {
        return 0;
    }
    ((earned / max) * SECTION_MAX as f64).floor() as u32
}

/// Whether a raw MCQ answer matches the answer key.
///
/// Empty input never matches, even against an empty key.
pub fn mcq_matches(student_answer: &str, correct_answer: &str) -> bool {
    let student = student_answer.trim();
    !student.is_empty() && student.to_lowercase() == correct_answer.trim().to_lowercase()
}

/// The raw score a direct item earns from its entered text.
///
/// Unparsable entries earn 0; parsable entries are clamped to `[0, points]`.
pub fn direct_earned(raw: &str, points: f64) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map(|v| v.clamp(0.0, points.max(0.0)))
        .unwrap_or(0.0)
}

/// Compute the score report for one submission.
pub fn evaluate(questions: &[Question], input: &StudentInput) -> EvaluationResult {
    let mut is_correct = HashMap::new();
    let mut section_totals: BTreeMap<Section, (f64, f64)> = Section::ALL
        .iter()
        .map(|&section| (section, (0.0, 0.0)))
        .collect();
    let mut categories: Vec<CategoryResult> = Vec::new();

    for question in questions {
        let raw = input.answer(&question.id).unwrap_or("");
        let earned = if question.is_mcq() {
            let correct = mcq_matches(raw, question.correct_answer.as_deref().unwrap_or(""));
            is_correct.insert(question.id.clone(), correct);
            if correct {
                question.points
            } else {
                0.0
            }
        } else {
            direct_earned(raw, question.points)
        };

        let totals = section_totals.entry(question.section).or_insert((0.0, 0.0));
        totals.0 += earned;
        totals.1 += question.points;

        let slot = categories
            .iter()
            .position(|c| c.section == question.section && c.category == question.category)
            .unwrap_or_else(|| {
                categories.push(CategoryResult {
                    section: question.section,
                    category: question.category.clone(),
                    total_questions: 0,
                    earned_points: 0.0,
                    max_points: 0.0,
                    percentage: 0.0,
                });
                categories.len() - 1
            });
        let entry = &mut categories[slot];
        entry.total_questions += 1;
        entry.earned_points += earned;
        entry.max_points += question.points;
    }

    for category in &mut categories {
        category.percentage = if category.max_points > 0.0 {
            category.earned_points / category.max_points * 100.0
        } else {
            0.0
        };
    }

    let section_scores: BTreeMap<Section, u32> = section_totals
        .iter()
        .map(|(&section, &(earned, max))| (section, scaled_score(earned, max)))
        .collect();
    let total_score = section_scores.values().sum();
    let actual_earned_points = section_totals.values().map(|&(earned, _)| earned).sum();

    EvaluationResult {
        student_name: input.name.clone(),
        total_score,
        max_score: SECTION_MAX * Section::ALL.len() as u32,
        section_scores,
        category_results: categories,
        is_correct,
        actual_earned_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn mcq(number: u32, section: Section, correct: &str, category: &str) -> Question {
        Question {
            correct_answer: Some(correct.into()),
            category: category.into(),
            ..Question::mcq(section, number)
        }
    }

    fn answers(pairs: &[(&str, &str)]) -> StudentInput {
        StudentInput {
            name: "Kim".into(),
            answers: pairs
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn mcq_match_is_case_insensitive_and_trims() {
        assert!(mcq_matches("b", "B"));
        assert!(mcq_matches(" B ", "b"));
        assert!(!mcq_matches("", ""));
        assert!(!mcq_matches("A", "B"));
    }

    #[test]
    fn direct_entry_is_clamped() {
        assert_eq!(direct_earned("4.5", 5.0), 4.5);
        assert_eq!(direct_earned("9", 5.0), 5.0);
        assert_eq!(direct_earned("-1", 5.0), 0.0);
        assert_eq!(direct_earned("abc", 5.0), 0.0);
        assert_eq!(direct_earned("", 5.0), 0.0);
    }

    #[test]
    fn scaled_score_floors() {
        assert_eq!(scaled_score(29.0, 30.0), 29);
        assert_eq!(scaled_score(1.0, 3.0), 10);
        assert_eq!(scaled_score(0.0, 0.0), 0);
    }

    #[test]
    fn empty_sections_score_zero() {
        let result = evaluate(&[], &StudentInput::empty());
        assert_eq!(result.total_score, 0);
        assert_eq!(result.max_score, 120);
        assert!(result.section_scores.values().all(|&s| s == 0));
    }

    #[test]
    fn full_marks_reach_thirty_per_section() {
        let questions = vec![
            mcq(1, Section::Reading, "A", "general"),
            mcq(2, Section::Reading, "C", "general"),
        ];
        let input = answers(&[("R-1", "a"), ("R-2", "C")]);
        let result = evaluate(&questions, &input);
        assert_eq!(result.section_scores[&Section::Reading], 30);
        assert_eq!(result.total_score, 30);
        assert!(result.is_correct["R-1"]);
        assert_eq!(result.actual_earned_points, 2.0);
    }

    #[test]
    fn direct_items_scale_by_entered_score() {
        let questions = vec![
            Question::direct(Section::Speaking, 0, "Delivery", 5.0),
            Question::direct(Section::Speaking, 1, "Content", 5.0),
        ];
        let input = answers(&[("S-D-0", "4.5"), ("S-D-1", "not-a-number")]);
        let result = evaluate(&questions, &input);
        // 4.5 of 10 -> floor(13.5)
        assert_eq!(result.section_scores[&Section::Speaking], 13);
        assert_eq!(result.actual_earned_points, 4.5);
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let questions = vec![
            mcq(1, Section::Reading, "A", "Detail"),
            mcq(2, Section::Reading, "B", "Vocabulary"),
            mcq(3, Section::Reading, "C", "Detail"),
        ];
        let input = answers(&[("R-1", "A"), ("R-3", "X")]);
        let result = evaluate(&questions, &input);
        let labels: Vec<&str> = result
            .category_results
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(labels, ["Detail", "Vocabulary"]);
        let detail = &result.category_results[0];
        assert_eq!(detail.total_questions, 2);
        assert_eq!(detail.earned_points, 1.0);
        assert_eq!(detail.max_points, 2.0);
        assert!((detail.percentage - 50.0).abs() < f64::EPSILON);
    }
}
