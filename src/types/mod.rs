//! Core types for Rehearsal

mod question;
mod profile;
mod transcript;
mod evaluation;
mod state;
mod summary;

pub use question::{Question, QuestionType, Script};
pub use profile::{Profile, ProfileValue};
pub use transcript::{Speaker, TranscriptEntry, CONCLUSION_LABEL};
pub use evaluation::{Dimension, DimensionScores, EvaluationTotals, Feedback};
pub use state::{ConversationState, Phase};
pub use summary::Summary;
