//! HTTP API for running interviews
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /interview/new - Build a script from two profiles
//! - POST /interview/:id/start - Ask the first question
//! - POST /interview/:id/respond - Submit a response, get the next prompt
//! - GET /interview/:id - Interview status and transcript
//! - GET /interview/:id/summary - Final report (complete interviews only)
//!
//! No engine lives between requests: each handler loads the stored state,
//! rebuilds an engine around it and saves the result. Mutations are
//! serialized so two responses to one interview cannot interleave.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::InterviewConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::core::engine::ConversationEngine;
use crate::core::random::SeededRandom;
use crate::core::profile_parser::ProfileParser;
use crate::core::script_builder::ScriptBuilder;
use crate::core::semantic::QuestionBankSource;
use crate::core::store::{new_interview_id, save_report, InterviewSetup, InterviewStore};
use crate::core::summary::SummaryAggregator;
use crate::core::timing::should_conclude;
use crate::error::InterviewError;
use crate::types::{Phase, Profile, Question, Summary, TranscriptEntry};

/// App state
pub struct AppState {
    pub store: InterviewStore,
    pub config: InterviewConfig,
    pub semantic: Option<QuestionBankSource>,
    writes: Mutex<()>,
}

/// Create interview request; structured profiles win over raw text
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewInterviewRequest {
    pub organization_profile: Option<String>,
    pub candidate_profile: Option<String>,
    pub organization: Option<Profile>,
    pub candidate: Option<Profile>,
    pub time_limit_minutes: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct NewInterviewResponse {
    pub interview_id: String,
    pub question_count: usize,
    pub script: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub interview_id: String,
    pub question: Question,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub next_prompt: String,
    pub complete: bool,
    pub time_limit_exceeded: bool,
    pub follow_up: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub interview_id: String,
    pub phase: Phase,
    pub question_count: usize,
    pub current_index: Option<usize>,
    pub current_question: Option<String>,
    pub follow_up_pending: bool,
    pub time_limit_exceeded: bool,
    pub transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(err: InterviewError) -> ApiError {
    let status = match &err {
        InterviewError::EmptyScript
        | InterviewError::IncompleteProfile { .. }
        | InterviewError::InvalidConfig(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InterviewError::InvalidState { .. } => StatusCode::CONFLICT,
        InterviewError::CorruptState(_) | InterviewError::Io(_) | InterviewError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            notice: err.user_notice().map(String::from),
        }),
    )
}

fn not_found(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("interview '{}' not found", id),
            notice: None,
        }),
    )
}

/// Create the API router
pub fn create_router(store: InterviewStore, config: InterviewConfig) -> Router {
    create_router_with_source(store, config, None)
}

/// Router whose scripts also draw on a question bank
pub fn create_router_with_source(
    store: InterviewStore,
    config: InterviewConfig,
    semantic: Option<QuestionBankSource>,
) -> Router {
    let state = Arc::new(AppState {
        store,
        config,
        semantic,
        writes: Mutex::new(()),
    });

    Router::new()
        .route("/health", get(health))
        .route("/interview/new", post(create_interview))
        .route("/interview/:id", get(get_interview))
        .route("/interview/:id/start", post(start_interview))
        .route("/interview/:id/respond", post(respond))
        .route("/interview/:id/summary", get(get_summary))
        .with_state(state)
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn create_interview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewInterviewRequest>,
) -> ApiResult<NewInterviewResponse> {
    let _guard = state.writes.lock().await;
    build_interview(&state, req).map(Json).map_err(api_error)
}

fn build_interview(state: &AppState, req: NewInterviewRequest) -> crate::Result<NewInterviewResponse> {
    let organization = req
        .organization
        .or_else(|| req.organization_profile.map(|t| ProfileParser::organization().parse(&t)))
        .unwrap_or_default();
    let candidate = req
        .candidate
        .or_else(|| req.candidate_profile.map(|t| ProfileParser::candidate().parse(&t)))
        .unwrap_or_default();

    let mut config = state.config.clone();
    if req.time_limit_minutes.is_some() {
        config.time_limit_minutes = req.time_limit_minutes;
    }
    config.validate()?;

    let mut rng = SeededRandom::from_option(config.seed);
    let mut builder = ScriptBuilder::new();
    if let Some(source) = &state.semantic {
        builder = builder.with_semantic_source(source, config.semantic_question_count);
    }
    let script = builder.build(&organization, &candidate, &mut rng)?;

    let now = SystemClock.now();
    let mut id = new_interview_id(now);
    let mut bump = 1.0;
    while state.store.exists(&id) {
        id = new_interview_id(now + bump * 1e-6);
        bump += 1.0;
    }
    let setup = InterviewSetup {
        id,
        organization,
        candidate,
        script,
        config,
        created_at: now,
    };
    state.store.save_setup(&setup)?;
    info!(id = %setup.id, questions = setup.script.len(), "interview created");

    Ok(NewInterviewResponse {
        interview_id: setup.id,
        question_count: setup.script.len(),
        script: setup.script.questions().to_vec(),
    })
}

async fn start_interview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StartResponse> {
    let _guard = state.writes.lock().await;
    let setup = state
        .store
        .load_setup(&id)
        .map_err(api_error)?
        .ok_or_else(|| not_found(&id))?;
    begin(&state, setup).map(Json).map_err(api_error)
}

fn begin(state: &AppState, setup: InterviewSetup) -> crate::Result<StartResponse> {
    if let Some(existing) = state.store.load_state(&setup.id)? {
        return Err(InterviewError::InvalidState {
            expected: Phase::NotStarted.as_str(),
            actual: existing.phase().as_str(),
        });
    }
    let mut rng = SeededRandom::from_option(setup.config.seed);
    let clock = SystemClock;
    let mut engine = ConversationEngine::new(&setup.organization, &setup.candidate, &mut rng, &clock);
    let (question, conversation) = engine.start(setup.script.clone())?;
    state.store.save_state(&setup.id, &conversation)?;

    Ok(StartResponse {
        interview_id: setup.id,
        question,
    })
}

async fn respond(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RespondRequest>,
) -> ApiResult<RespondResponse> {
    let _guard = state.writes.lock().await;
    let setup = state
        .store
        .load_setup(&id)
        .map_err(api_error)?
        .ok_or_else(|| not_found(&id))?;
    take_turn(&state, setup, &req.response).map(Json).map_err(api_error)
}

fn take_turn(state: &AppState, setup: InterviewSetup, response: &str) -> crate::Result<RespondResponse> {
    let conversation = state
        .store
        .load_state(&setup.id)?
        .ok_or(InterviewError::InvalidState {
            expected: Phase::InProgress.as_str(),
            actual: Phase::NotStarted.as_str(),
        })?;

    let clock = SystemClock;
    let budget = setup.config.time_budget();
    let time_exceeded = should_conclude(budget.as_ref(), conversation.interview_start_time, clock.now());

    // Reseed per turn so a seeded run does not repeat the same draw every request
    let seed = setup
        .config
        .seed
        .map(|s| s.wrapping_add(conversation.history.len() as u64));
    let mut rng = SeededRandom::from_option(seed);
    let mut engine = ConversationEngine::new(&setup.organization, &setup.candidate, &mut rng, &clock);
    let outcome = engine.submit_response(conversation, response, time_exceeded)?;

    // A COMPLETE state is only persisted alongside its summary
    if outcome.complete {
        let summary = SummaryAggregator::new().summarize(&outcome.state, &setup.organization, &setup.candidate)?;
        state.store.save_state(&setup.id, &outcome.state)?;
        state.store.save_summary(&setup.id, &summary)?;
        if let Some(dir) = &setup.config.reports_dir {
            match save_report(dir, &setup.id, &summary) {
                Ok(path) => info!(path = %path.display(), "report saved"),
                Err(e) => warn!(error = %e, "report not saved"),
            }
        }
    } else {
        state.store.save_state(&setup.id, &outcome.state)?;
    }

    Ok(RespondResponse {
        next_prompt: outcome.next_prompt,
        complete: outcome.complete,
        time_limit_exceeded: outcome.time_limit_exceeded,
        follow_up: outcome.state.follow_up_pending,
    })
}

async fn get_interview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusResponse> {
    let setup = state
        .store
        .load_setup(&id)
        .map_err(api_error)?
        .ok_or_else(|| not_found(&id))?;
    let conversation = state.store.load_state(&id).map_err(api_error)?;

    let response = match conversation {
        Some(c) => StatusResponse {
            interview_id: id,
            phase: c.phase(),
            question_count: c.script.len(),
            current_index: Some(c.current_index),
            current_question: c.current_question.clone(),
            follow_up_pending: c.follow_up_pending,
            time_limit_exceeded: c.time_limit_exceeded,
            transcript: c.history,
        },
        None => StatusResponse {
            interview_id: id,
            phase: Phase::NotStarted,
            question_count: setup.script.len(),
            current_index: None,
            current_question: None,
            follow_up_pending: false,
            time_limit_exceeded: false,
            transcript: Vec::new(),
        },
    };
    Ok(Json(response))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Summary> {
    if !state.store.exists(&id) {
        return Err(not_found(&id));
    }
    match state.store.load_summary(&id).map_err(api_error)? {
        Some(summary) => Ok(Json(summary)),
        None => {
            let actual = state
                .store
                .load_state(&id)
                .map_err(api_error)?
                .map(|c| c.phase())
                .unwrap_or(Phase::NotStarted);
            Err(api_error(InterviewError::InvalidState {
                expected: Phase::Complete.as_str(),
                actual: actual.as_str(),
            }))
        }
    }
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    store: InterviewStore,
    config: InterviewConfig,
    semantic: Option<QuestionBankSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router_with_source(store, config, semantic);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "interview API listening");
    println!("Rehearsal API running on {}", addr);
    println!("  GET  /health                 - Health check");
    println!("  POST /interview/new          - Create interview");
    println!("  POST /interview/:id/start    - First question");
    println!("  POST /interview/:id/respond  - Submit response");
    println!("  GET  /interview/:id          - Status + transcript");
    println!("  GET  /interview/:id/summary  - Final report");
    axum::serve(listener, router).await?;
    Ok(())
}
