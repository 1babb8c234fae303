//! SummaryAggregator: completed interview → scored report

use tracing::info;
use crate::{MAX_FEEDBACK_ITEMS, MAX_NOTABLE_QUOTES, MAX_QUOTE_CHARS, MIN_QUOTE_SOURCE_CHARS};
use crate::core::clock::date_string;
use crate::core::text::char_len;
use crate::error::{InterviewError, Result};
use crate::types::{ConversationState, Dimension, Phase, Profile, Summary, TranscriptEntry};

pub const DEFAULT_STRENGTH: &str = "Participated fully in the interview process";
pub const DEFAULT_IMPROVEMENT: &str = "Continue developing interview skills";

#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryAggregator;

impl SummaryAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Reduce a completed interview to its report
    pub fn summarize(
        &self,
        state: &ConversationState,
        organization: &Profile,
        candidate: &Profile,
    ) -> Result<Summary> {
        let phase = state.phase();
        if phase != Phase::Complete {
            return Err(InterviewError::InvalidState {
                expected: Phase::Complete.as_str(),
                actual: phase.as_str(),
            });
        }
        let candidate_name = candidate.name().ok_or(InterviewError::IncompleteProfile {
            profile: "candidate",
            field: "name",
        })?;
        let organization_name = organization.name().ok_or(InterviewError::IncompleteProfile {
            profile: "organization",
            field: "name",
        })?;

        let totals = &state.evaluation;
        let dated = state
            .interview_end_time
            .or(state.interview_start_time)
            .unwrap_or_default();

        let summary = Summary {
            candidate_name: candidate_name.to_string(),
            organization_name: organization_name.to_string(),
            interview_date: date_string(dated),
            overall_score: round1(totals.overall()),
            presentation_score: round1(totals.normalized(Dimension::Presentation)),
            content_score: round1(totals.normalized(Dimension::Content)),
            confidence_score: round1(totals.normalized(Dimension::Confidence)),
            relevance_score: round1(totals.normalized(Dimension::Relevance)),
            authenticity_score: round1(totals.normalized(Dimension::Authenticity)),
            question_count: totals.question_count,
            strengths: top_or_default(&state.feedback.strengths, DEFAULT_STRENGTH),
            areas_for_improvement: top_or_default(&state.feedback.areas_for_improvement, DEFAULT_IMPROVEMENT),
            notable_quotes: notable_quotes(&state.history),
            conversation_transcript: state.history.clone(),
            interview_start_time: state.interview_start_time,
            interview_end_time: state.interview_end_time,
            interview_duration_seconds: state.duration_seconds(),
            time_limit_exceeded: state.time_limit_exceeded,
        };

        info!(
            overall = summary.overall_score,
            scored = summary.question_count,
            "summary produced"
        );
        Ok(summary)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn top_or_default(items: &[String], default: &str) -> Vec<String> {
    if items.is_empty() {
        return vec![default.to_string()];
    }
    items.iter().take(MAX_FEEDBACK_ITEMS).cloned().collect()
}

/// First sentence of up to three substantial candidate responses
pub fn notable_quotes(history: &[TranscriptEntry]) -> Vec<String> {
    let mut quotes: Vec<String> = Vec::new();
    for entry in history.iter().filter(|e| e.is_candidate()) {
        if char_len(&entry.text) <= MIN_QUOTE_SOURCE_CHARS {
            continue;
        }
        let sentence = entry.text.split('.').next().unwrap_or_default();
        let quote = if char_len(sentence) > MAX_QUOTE_CHARS {
            let head: String = sentence.chars().take(MAX_QUOTE_CHARS - 3).collect();
            format!("{}...", head)
        } else {
            sentence.to_string()
        };
        if quote.is_empty() || quotes.contains(&quote) {
            continue;
        }
        quotes.push(quote);
        if quotes.len() >= MAX_NOTABLE_QUOTES {
            break;
        }
    }
    quotes
}

// =============================================================================
// TESTS
// =============================================================================
