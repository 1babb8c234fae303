//! Append-only interview transcript

use serde::{Deserialize, Serialize};

/// Label recorded for closing remarks and time-limit conclusions
pub const CONCLUSION_LABEL: &str = "conclusion";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

/// One line of the transcript
///
/// Interviewer entries carry `question_type` (script type, `<type>_follow_up`
/// or `conclusion`); candidate entries carry `in_response_to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    /// Unix seconds
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,
}

impl TranscriptEntry {
    pub fn interviewer(text: impl Into<String>, timestamp: f64, label: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Interviewer,
            text: text.into(),
            timestamp,
            question_type: Some(label.into()),
            in_response_to: None,
        }
    }

    pub fn candidate(text: impl Into<String>, timestamp: f64, in_response_to: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Candidate,
            text: text.into(),
            timestamp,
            question_type: None,
            in_response_to: Some(in_response_to.into()),
        }
    }

    pub fn is_candidate(&self) -> bool {
        self.speaker == Speaker::Candidate
    }
}
