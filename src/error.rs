//! Error taxonomy for the interview core and its collaborators

use thiserror::Error;

/// Notice shown in place of a first question when the script is empty
pub const NO_QUESTIONS_NOTICE: &str = "I don't have any questions prepared for this interview.";

/// Errors surfaced by script building, the conversation engine and the store
#[derive(Debug, Error)]
pub enum InterviewError {
    /// `start` was called with a script that has no questions
    #[error("script has no questions")]
    EmptyScript,

    /// Operation called in the wrong interview phase
    #[error("invalid interview state: expected {expected}, found {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// A required profile field is missing or blank
    #[error("{profile} profile is missing required field '{field}'")]
    IncompleteProfile {
        profile: &'static str,
        field: &'static str,
    },

    /// Persisted state could not be read back faithfully
    #[error("corrupt interview state: {0}")]
    CorruptState(String),

    /// Settings rejected before any interview is created
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InterviewError {
    /// Text a caller can show the candidate instead of propagating the fault.
    ///
    /// Only `EmptyScript` has a user-facing substitute.
    pub fn user_notice(&self) -> Option<&'static str> {
        match self {
            Self::EmptyScript => Some(NO_QUESTIONS_NOTICE),
            _ => None,
        }
    }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptState(msg.into())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, InterviewError>;
