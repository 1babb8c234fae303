//! ResponseEvaluator: five-dimension keyword/length rubric
//!
//! All keyword checks are case-insensitive substring matches; each keyword
//! counts at most once per response. Lengths are in characters of the raw
//! response.

use tracing::debug;
use crate::{IMPROVEMENT_THRESHOLD, MIN_SCOREABLE_CHARS, STRENGTH_THRESHOLD};
use crate::core::text::{char_len, contains_any, count_present};
use crate::types::{Dimension, DimensionScores, EvaluationTotals, Feedback, QuestionType};

// =========================================================================
// Presentation: length window + structure
// =========================================================================
const STRUCTURE_MARKERS: &[&str] = &["first", "second", "finally", "additionally", "however", "therefore"];

// =========================================================================
// Content: specifics, length, personal reflection
// =========================================================================
const SPECIFICITY_MARKERS: &[&str] = &["specifically", "example", "instance", "case", "event", "situation"];
const REFLECTION_MARKERS: &[&str] = &["i felt", "my experience", "personally", "i believe", "i learned"];

// =========================================================================
// Confidence: assertive vs hedging language
// =========================================================================
const CONFIDENCE_MARKERS: &[&str] = &[
    "confident", "sure", "certainly", "definitely", "absolutely",
    "i know", "i am certain", "without doubt", "strongly believe",
];
const UNCERTAINTY_MARKERS: &[&str] = &[
    "maybe", "perhaps", "i think", "i guess", "sort of",
    "kind of", "not sure", "might be", "possibly", "probably",
];

// =========================================================================
// Relevance: type-specific vocabulary
// =========================================================================
const PLATFORM_MARKERS: &[&str] = &["platform", "cause", "issue", "support", "advocate", "change", "impact"];
const WORLD_ISSUE_MARKERS: &[&str] = &["issue", "problem", "solution", "address", "solve", "change", "impact", "world"];

// =========================================================================
// Authenticity: first-hand, felt language
// =========================================================================
const AUTHENTICITY_MARKERS: &[&str] = &[
    "i feel", "i felt", "my experience", "personally", "in my life",
    "i learned", "influenced", "emotional", "meaningful", "journey",
];

/// Response scorer
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseEvaluator;

impl ResponseEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Score one response; `None` for empty or too-short text
    pub fn score(
        &self,
        question_type: QuestionType,
        response: &str,
        organization_values: &[&str],
    ) -> Option<DimensionScores> {
        let len = char_len(response);
        if len < MIN_SCOREABLE_CHARS {
            return None;
        }
        let lower = response.to_lowercase();

        let presentation = (0.4
            + bonus(len > 100 && len < 500, 0.3)
            + bonus(contains_any(&lower, STRUCTURE_MARKERS), 0.3))
            .min(1.0);

        let content = (0.3
            + bonus(contains_any(&lower, SPECIFICITY_MARKERS), 0.4)
            + bonus(len > 200, 0.1)
            + bonus(contains_any(&lower, REFLECTION_MARKERS), 0.2))
            .min(1.0);

        let assertive = per_hit(count_present(&lower, CONFIDENCE_MARKERS), 0.1, 0.3);
        let hedging = per_hit(count_present(&lower, UNCERTAINTY_MARKERS), 0.1, 0.3);
        let confidence = (0.5 + assertive - hedging).clamp(0.1, 1.0);

        let relevance_bonus = match question_type {
            QuestionType::Platform => per_hit(count_present(&lower, PLATFORM_MARKERS), 0.1, 0.5),
            QuestionType::WorldIssue => per_hit(count_present(&lower, WORLD_ISSUE_MARKERS), 0.1, 0.5),
            QuestionType::PageantValues => {
                let mentioned = organization_values
                    .iter()
                    .map(|v| v.trim().to_lowercase())
                    .filter(|v| !v.is_empty() && lower.contains(v.as_str()))
                    .count();
                per_hit(mentioned, 0.2, 0.5)
            }
            _ => 0.0,
        };
        let relevance = (0.5 + relevance_bonus).min(1.0);

        let authenticity = (0.4 + per_hit(count_present(&lower, AUTHENTICITY_MARKERS), 0.1, 0.6)).min(1.0);

        Some(DimensionScores {
            presentation,
            content,
            confidence,
            relevance,
            authenticity,
        })
    }

    /// Score, fold into the running totals and note strengths/improvements.
    ///
    /// Too-short responses leave everything untouched.
    pub fn evaluate(
        &self,
        question_type: QuestionType,
        response: &str,
        organization_values: &[&str],
        totals: &mut EvaluationTotals,
        feedback: &mut Feedback,
    ) -> Option<DimensionScores> {
        let Some(scores) = self.score(question_type, response, organization_values) else {
            debug!(chars = char_len(response), "response too short to score");
            return None;
        };

        totals.record(&scores);
        for dimension in Dimension::ALL {
            let value = scores.get(dimension);
            if value > STRENGTH_THRESHOLD {
                feedback.note_strength(dimension.strength_label());
            }
            if value < IMPROVEMENT_THRESHOLD {
                feedback.note_improvement(dimension.improvement_label());
            }
        }

        debug!(
            question_type = %question_type,
            presentation = scores.presentation,
            content = scores.content,
            confidence = scores.confidence,
            relevance = scores.relevance,
            authenticity = scores.authenticity,
            scored = totals.question_count,
            "response scored"
        );
        Some(scores)
    }
}

fn bonus(hit: bool, amount: f64) -> f64 {
    if hit { amount } else { 0.0 }
}

fn per_hit(hits: usize, each: f64, cap: f64) -> f64 {
    (hits as f64 * each).min(cap)
}

// =============================================================================
// TESTS
// =============================================================================
