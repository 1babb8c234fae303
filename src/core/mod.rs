//! Core modules for the interview engine

pub mod random;
pub mod clock;
pub mod text;
pub mod script_builder;
pub mod follow_up;
pub mod evaluator;
pub mod engine;
pub mod summary;
pub mod semantic;
pub mod profile_parser;
pub mod timing;
pub mod store;
pub mod api;

pub use random::{RandomSource, SeededRandom, FixedDraws};
pub use clock::{Clock, SystemClock, FixedClock};
pub use script_builder::{QuestionBank, ScriptBuilder};
pub use follow_up::{FollowUpBank, FollowUpPolicy, FollowUpReason};
pub use evaluator::ResponseEvaluator;
pub use engine::{ConversationEngine, TurnOutcome};
pub use summary::SummaryAggregator;
pub use semantic::{QuestionBankSource, SemanticError, SemanticQuestionSource};
pub use profile_parser::{ProfileKind, ProfileParser};
pub use timing::{TimeBudget, TimeCheck};
pub use store::{InterviewSetup, InterviewStore, save_report};
pub use api::{create_router, create_router_with_source, run_server};
