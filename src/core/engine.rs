//! ConversationEngine: turn-taking state machine
//!
//! State transitions:
//! - NOT_STARTED → IN_PROGRESS: `start` on a non-empty script
//! - IN_PROGRESS → IN_PROGRESS: follow-up asked, or next script question
//! - IN_PROGRESS → COMPLETE: last question answered, or time limit signalled
//!
//! The engine holds no interview state of its own. Each call takes the
//! current `ConversationState` by value and hands back the updated one, so an
//! engine can be rebuilt per request from persisted state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::core::clock::Clock;
use crate::core::evaluator::ResponseEvaluator;
use crate::core::follow_up::{FollowUpPolicy, FollowUpReason};
use crate::core::random::{choose, RandomSource};
use crate::core::script_builder::{render, QuestionBank};
use crate::error::{InterviewError, Result};
use crate::types::{
    ConversationState, Phase, Profile, Question, Script, TranscriptEntry, CONCLUSION_LABEL,
};

/// Result of one `submit_response` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Follow-up, next script question, or concluding remark
    pub next_prompt: String,
    pub complete: bool,
    pub time_limit_exceeded: bool,
    /// Follow-up decision for this turn; `None` when the time limit cut in
    pub reason: Option<FollowUpReason>,
    pub state: ConversationState,
}

pub struct ConversationEngine<'a> {
    organization: &'a Profile,
    candidate: &'a Profile,
    bank: QuestionBank,
    policy: FollowUpPolicy,
    evaluator: ResponseEvaluator,
    rng: &'a mut dyn RandomSource,
    clock: &'a dyn Clock,
}

impl<'a> ConversationEngine<'a> {
    pub fn new(
        organization: &'a Profile,
        candidate: &'a Profile,
        rng: &'a mut dyn RandomSource,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            organization,
            candidate,
            bank: QuestionBank::standard(),
            policy: FollowUpPolicy::default(),
            evaluator: ResponseEvaluator::new(),
            rng,
            clock,
        }
    }

    pub fn with_bank(mut self, bank: QuestionBank) -> Self {
        self.bank = bank;
        self
    }

    pub fn with_policy(mut self, policy: FollowUpPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ask the first question of the script
    pub fn start(&mut self, script: Script) -> Result<(Question, ConversationState)> {
        let first = script.get(0).cloned().ok_or(InterviewError::EmptyScript)?;
        let now = self.clock.now();

        let mut state = ConversationState::new(script);
        state.current_index = 0;
        state.current_question_type = Some(first.question_type);
        state.current_question = Some(first.text.clone());
        state.interview_start_time = Some(now);
        state
            .history
            .push(TranscriptEntry::interviewer(&first.text, now, first.question_type.as_str()));

        info!(questions = state.script.len(), "interview started");
        Ok((first, state))
    }

    /// Record a candidate response and produce the next prompt.
    ///
    /// `time_exceeded` is the caller's time-limit signal: the response is
    /// still recorded and scored, then the interview is concluded.
    pub fn submit_response(
        &mut self,
        mut state: ConversationState,
        response: &str,
        time_exceeded: bool,
    ) -> Result<TurnOutcome> {
        let phase = state.phase();
        if phase != Phase::InProgress {
            return Err(InterviewError::InvalidState {
                expected: Phase::InProgress.as_str(),
                actual: phase.as_str(),
            });
        }
        let question_type = state
            .current_question_type
            .ok_or_else(|| InterviewError::corrupt("active interview has no current question type"))?;
        let current_question = state.current_question.clone().unwrap_or_default();

        state
            .history
            .push(TranscriptEntry::candidate(response, self.clock.now(), question_type.as_str()));

        let values = self.organization.values();
        self.evaluator.evaluate(
            question_type,
            response,
            &values,
            &mut state.evaluation,
            &mut state.feedback,
        );

        if time_exceeded {
            let text = self.conclusion_text(self.bank.time_exceeded_conclusion);
            state.time_limit_exceeded = true;
            info!(index = state.current_index, "time limit reached, concluding");
            return Ok(self.finish(state, text, None));
        }

        let reason = if state.follow_up_pending {
            FollowUpReason::F001_ALREADY_ASKED
        } else {
            self.policy
                .decide(question_type, response, &mut state.feedback, &mut *self.rng)
        };

        if reason.asks() {
            let follow_up = self
                .policy
                .pick(question_type, &current_question, response, &mut *self.rng);
            state.follow_up_pending = true;
            state.history.push(TranscriptEntry::interviewer(
                &follow_up,
                self.clock.now(),
                question_type.follow_up_label(),
            ));
            debug!(reason = reason.code(), question_type = %question_type, "follow-up asked");
            return Ok(TurnOutcome {
                next_prompt: follow_up,
                complete: false,
                time_limit_exceeded: false,
                reason: Some(reason),
                state,
            });
        }

        state.follow_up_pending = false;

        if Some(state.current_index) == state.script.last_index() {
            let template = choose(&mut *self.rng, self.bank.conclusions).copied().unwrap_or_default();
            let text = self.conclusion_text(template);
            info!(questions = state.script.len(), "script finished");
            return Ok(self.finish(state, text, Some(reason)));
        }

        state.current_index += 1;
        let next = state.script.get(state.current_index).cloned().ok_or_else(|| {
            InterviewError::corrupt(format!(
                "current_index {} out of range for script of {}",
                state.current_index,
                state.script.len()
            ))
        })?;
        state.current_question_type = Some(next.question_type);
        state.current_question = Some(next.text.clone());
        state
            .history
            .push(TranscriptEntry::interviewer(&next.text, self.clock.now(), next.question_type.as_str()));
        debug!(index = state.current_index, question_type = %next.question_type, "advanced");

        Ok(TurnOutcome {
            next_prompt: next.text,
            complete: false,
            time_limit_exceeded: false,
            reason: Some(reason),
            state,
        })
    }

    fn conclusion_text(&self, template: &str) -> String {
        render(
            template,
            &[
                ("candidate_name", self.candidate.name().unwrap_or("there")),
                ("organization_name", self.organization.name().unwrap_or("this pageant")),
            ],
        )
    }

    fn finish(&self, mut state: ConversationState, text: String, reason: Option<FollowUpReason>) -> TurnOutcome {
        let now = self.clock.now();
        state.follow_up_pending = false;
        state.complete = true;
        state.interview_end_time = Some(now);
        state
            .history
            .push(TranscriptEntry::interviewer(&text, now, CONCLUSION_LABEL));
        TurnOutcome {
            next_prompt: text,
            complete: true,
            time_limit_exceeded: state.time_limit_exceeded,
            reason,
            state,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
