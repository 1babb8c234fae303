//! Final interview report

use serde::{Deserialize, Serialize};
use crate::error::{InterviewError, Result};
use crate::types::TranscriptEntry;

/// Scored summary of a completed interview
///
/// Every field is required on load, `Option` times included (as a value or
/// `null`). A missing score is corruption, never a zero or a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub candidate_name: String,
    pub organization_name: String,
    pub interview_date: String,
    pub overall_score: f64,
    pub presentation_score: f64,
    pub content_score: f64,
    pub confidence_score: f64,
    pub relevance_score: f64,
    pub authenticity_score: f64,
    pub question_count: u32,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub notable_quotes: Vec<String>,
    pub conversation_transcript: Vec<TranscriptEntry>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub interview_start_time: Option<f64>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub interview_end_time: Option<f64>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub interview_duration_seconds: Option<f64>,
    pub time_limit_exceeded: bool,
}

impl Summary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let summary: Self = serde_json::from_str(json)
            .map_err(|e| InterviewError::corrupt(format!("unreadable summary: {}", e)))?;
        if !(0.0..=100.0).contains(&summary.overall_score) {
            return Err(InterviewError::corrupt(format!(
                "overall_score {} outside [0, 100]",
                summary.overall_score
            )));
        }
        Ok(summary)
    }

    /// One-line text form for terminal output
    pub fn to_parseable_string(&self) -> String {
        format!(
            "overall={:.1} | presentation={:.1} | content={:.1} | confidence={:.1} | relevance={:.1} | authenticity={:.1} | scored={}",
            self.overall_score,
            self.presentation_score,
            self.content_score,
            self.confidence_score,
            self.relevance_score,
            self.authenticity_score,
            self.question_count,
        )
    }
}
