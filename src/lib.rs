//! Rehearsal: scripted mock-interview engine
//!
//! Profiles → ScriptBuilder → ConversationEngine (FollowUpPolicy + ResponseEvaluator)
//! → SummaryAggregator → report

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use config::InterviewConfig;
pub use error::{InterviewError, Result};

// =============================================================================
// SCRIPT GENERATION
// =============================================================================

/// Word-set Jaccard similarity above which a rendered question is dropped
pub const DUPLICATE_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Hard cap on script length, closing question included
pub const MAX_SCRIPT_QUESTIONS: usize = 12;

/// Per-slot limits
pub const MAX_EXPERIENCE_QUESTIONS: usize = 2;
pub const MAX_SKILL_QUESTIONS: usize = 2;
pub const MAX_VALUE_QUESTIONS: usize = 2;
pub const BEHAVIORAL_QUESTIONS: usize = 2;
pub const SITUATIONAL_QUESTIONS: usize = 2;

/// Semantic questions requested from the optional source
pub const DEFAULT_SEMANTIC_QUESTIONS: usize = 5;

// =============================================================================
// FOLLOW-UP POLICY
// =============================================================================

/// Responses shorter than this (chars) always get a follow-up
pub const SHORT_RESPONSE_CHARS: usize = 50;

/// Chance of a follow-up when no other rule fires
pub const FOLLOW_UP_PROBABILITY: f64 = 0.3;

// =============================================================================
// EVALUATION
// =============================================================================

/// Responses shorter than this (chars) are not scored
pub const MIN_SCOREABLE_CHARS: usize = 10;

/// Per-response score above which a strength is noted
pub const STRENGTH_THRESHOLD: f64 = 0.7;

/// Per-response score below which an improvement is noted
pub const IMPROVEMENT_THRESHOLD: f64 = 0.5;

/// Overall score weights (sum = 1.0)
pub const WEIGHT_PRESENTATION: f64 = 0.25;
pub const WEIGHT_CONTENT: f64 = 0.25;
pub const WEIGHT_CONFIDENCE: f64 = 0.20;
pub const WEIGHT_RELEVANCE: f64 = 0.15;
pub const WEIGHT_AUTHENTICITY: f64 = 0.15;

// =============================================================================
// SUMMARY
// =============================================================================

/// Feedback lists are truncated to this many entries
pub const MAX_FEEDBACK_ITEMS: usize = 5;

/// Notable quotes
pub const MAX_NOTABLE_QUOTES: usize = 3;
pub const MIN_QUOTE_SOURCE_CHARS: usize = 20;
pub const MAX_QUOTE_CHARS: usize = 100;

// =============================================================================
// TIMING
// =============================================================================

/// Remaining seconds at or below which a timed interview is wrapped up
pub const FORCE_COMPLETION_SECS: u64 = 15;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
