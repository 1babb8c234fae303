//! Conversation state carried between turns
//!
//! The engine never keeps this resident: callers hand a state value in and
//! get the updated value back, persisting it in between.

use serde::{Deserialize, Serialize};
use crate::error::{InterviewError, Result};
use crate::types::{EvaluationTotals, Feedback, QuestionType, Script, TranscriptEntry};

/// Interview lifecycle: NOT_STARTED → IN_PROGRESS → COMPLETE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    NotStarted,
    InProgress,
    /// Terminal
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NotStarted => "NOT_STARTED",
            Phase::InProgress => "IN_PROGRESS",
            Phase::Complete => "COMPLETE",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to continue an interview on the next turn
///
/// `Option` fields must be present on load (as a value or `null`); a
/// missing key is corruption, never an implicit `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub script: Script,
    pub current_index: usize,
    #[serde(deserialize_with = "Option::deserialize")]
    pub current_question_type: Option<QuestionType>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub current_question: Option<String>,
    pub follow_up_pending: bool,
    pub history: Vec<TranscriptEntry>,
    pub evaluation: EvaluationTotals,
    #[serde(flatten)]
    pub feedback: Feedback,
    pub complete: bool,
    pub time_limit_exceeded: bool,
    #[serde(deserialize_with = "Option::deserialize")]
    pub interview_start_time: Option<f64>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub interview_end_time: Option<f64>,
}

impl ConversationState {
    /// Fresh, not-yet-started state for a script
    pub fn new(script: Script) -> Self {
        Self {
            script,
            current_index: 0,
            current_question_type: None,
            current_question: None,
            follow_up_pending: false,
            history: Vec::new(),
            evaluation: EvaluationTotals::default(),
            feedback: Feedback::default(),
            complete: false,
            time_limit_exceeded: false,
            interview_start_time: None,
            interview_end_time: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.complete {
            Phase::Complete
        } else if self.current_question.is_some() {
            Phase::InProgress
        } else {
            Phase::NotStarted
        }
    }

    pub fn candidate_entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.history.iter().filter(|e| e.is_candidate())
    }

    /// Wall-clock length of the interview, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        match (self.interview_start_time, self.interview_end_time) {
            (Some(start), Some(end)) => Some((end - start).max(0.0)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Strict load: parse failures and inconsistent fields are `CorruptState`
    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json)
            .map_err(|e| InterviewError::corrupt(format!("unreadable conversation state: {}", e)))?;
        state.validate()?;
        Ok(state)
    }

    /// Check the structural invariants of a (possibly rehydrated) state
    pub fn validate(&self) -> Result<()> {
        let phase = self.phase();

        if phase == Phase::NotStarted
            && (!self.history.is_empty() || self.evaluation.question_count > 0)
        {
            return Err(InterviewError::corrupt(
                "interview has a transcript but no current question",
            ));
        }

        if phase != Phase::NotStarted {
            if self.script.is_empty() {
                return Err(InterviewError::corrupt("started interview has an empty script"));
            }
            if self.current_index >= self.script.len() {
                return Err(InterviewError::corrupt(format!(
                    "current_index {} out of range for script of {}",
                    self.current_index,
                    self.script.len()
                )));
            }
            if self.interview_start_time.is_none() {
                return Err(InterviewError::corrupt("started interview has no start time"));
            }
        }

        if phase == Phase::InProgress {
            // Validated non-empty and in range above
            let expected = &self.script.questions()[self.current_index];
            if self.current_question_type != Some(expected.question_type)
                || self.current_question.as_deref() != Some(expected.text.as_str())
            {
                return Err(InterviewError::corrupt(
                    "current question does not match the script position",
                ));
            }
        }

        if self.follow_up_pending && phase != Phase::InProgress {
            return Err(InterviewError::corrupt("follow-up pending outside an active interview"));
        }

        let answered = self.candidate_entries().count();
        let count = self.evaluation.question_count as usize;
        if count > answered {
            return Err(InterviewError::corrupt(format!(
                "question_count {} exceeds {} candidate responses",
                count, answered
            )));
        }

        let ceiling = count as f64 + 1e-9;
        for dimension in crate::types::Dimension::ALL {
            let total = self.evaluation.total(dimension);
            if !total.is_finite() || total < 0.0 || total > ceiling {
                return Err(InterviewError::corrupt(format!(
                    "{:?} total {} outside [0, {}]",
                    dimension, total, count
                )));
            }
        }

        if self
            .history
            .windows(2)
            .any(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(InterviewError::corrupt("transcript is not in chronological order"));
        }

        Ok(())
    }
}
