//! Integration tests for running an interview end to end
//!
//! Engine + evaluator + follow-up policy + summary, driven with scripted
//! draws and a fixed clock.

use pretty_assertions::assert_eq;

use rehearsal::core::summary::DEFAULT_STRENGTH;
use rehearsal::core::{
    ConversationEngine, FixedClock, FixedDraws, FollowUpReason, ProfileParser, ResponseEvaluator,
    ScriptBuilder, SeededRandom, SummaryAggregator,
};
use rehearsal::types::{Phase, Profile, Question, QuestionType, Script, Speaker};
use rehearsal::InterviewError;

/// Long enough to skip the short-response rule, free of follow-up keywords
const NEUTRAL: &str =
    "I grew up on a small farm and spent long afternoons reading books under the old oak tree.";

fn profiles() -> (Profile, Profile) {
    (
        Profile::new()
            .with_text("name", "Miss Lakeshore")
            .with_list("values", ["integrity", "service"]),
        Profile::new().with_text("name", "Ava"),
    )
}

fn three_questions() -> Script {
    Script::new(vec![
        Question::new(QuestionType::Introduction, "Tell us about yourself."),
        Question::new(QuestionType::Platform, "What is your platform?"),
        Question::new(QuestionType::Closing, "Anything else you'd like to add?"),
    ])
}

#[test]
fn test_three_question_script_completes_on_third_answer() {
    let (org, candidate) = profiles();
    let clock = FixedClock::stepping(1_000.0, 5.0);
    let mut draws = FixedDraws::new().with_chances([0.95, 0.95]);
    let mut engine = ConversationEngine::new(&org, &candidate, &mut draws, &clock);

    let (first, state) = engine.start(three_questions()).unwrap();
    assert_eq!(first.question_type, QuestionType::Introduction);

    let first_turn = engine.submit_response(state, NEUTRAL, false).unwrap();
    assert!(!first_turn.complete);
    assert_eq!(first_turn.reason, Some(FollowUpReason::F001_TYPE_EXCLUDED));
    assert_eq!(first_turn.next_prompt, "What is your platform?");

    let second_turn = engine.submit_response(first_turn.state, NEUTRAL, false).unwrap();
    assert!(!second_turn.complete);
    assert_eq!(second_turn.reason, Some(FollowUpReason::F004_NO_FOLLOW_UP));
    assert_eq!(second_turn.next_prompt, "Anything else you'd like to add?");

    let last = engine.submit_response(second_turn.state, NEUTRAL, false).unwrap();
    assert!(last.complete);
    assert!(!last.time_limit_exceeded);
    assert!(last.next_prompt.contains("Ava"));

    let state = last.state;
    assert_eq!(state.phase(), Phase::Complete);
    // 3 questions + 3 answers + conclusion
    assert_eq!(state.history.len(), 7);
    assert_eq!(state.history.last().unwrap().question_type.as_deref(), Some("conclusion"));
    assert_eq!(state.evaluation.question_count, 3);
    assert!(state.interview_end_time.unwrap() > state.interview_start_time.unwrap());
}

#[test]
fn test_hedging_short_answer_gets_follow_up() {
    let (org, candidate) = profiles();
    let clock = FixedClock::at(50.0);
    let mut draws = FixedDraws::new();
    let mut engine = ConversationEngine::new(&org, &candidate, &mut draws, &clock);
    let script = Script::new(vec![
        Question::new(QuestionType::Behavioral, "Describe a hard decision you made."),
        Question::new(QuestionType::Closing, "Anything else?"),
    ]);

    let (_, state) = engine.start(script).unwrap();
    let outcome = engine
        .submit_response(state, "I think maybe it was okay", false)
        .unwrap();

    assert!(!outcome.complete);
    assert_eq!(outcome.reason, Some(FollowUpReason::F002_SHORT_RESPONSE));
    assert!(outcome.state.follow_up_pending);
    assert!(outcome
        .state
        .feedback
        .areas_for_improvement
        .contains(&"Providing more detailed responses".to_string()));

    let totals = &outcome.state.evaluation;
    assert_eq!(totals.question_count, 1);
    assert!((totals.confidence - 0.3).abs() < 1e-9);
    assert!((totals.relevance - 0.5).abs() < 1e-9);

    let follow_up = outcome.state.history.last().unwrap();
    assert_eq!(follow_up.speaker, Speaker::Interviewer);
    assert_eq!(follow_up.question_type.as_deref(), Some("behavioral_follow_up"));

    // Second short answer to the same question moves on
    let next = engine
        .submit_response(outcome.state, "It worked out fine.", false)
        .unwrap();
    assert_eq!(next.reason, Some(FollowUpReason::F001_ALREADY_ASKED));
    assert_eq!(next.next_prompt, "Anything else?");
    assert!(!next.state.follow_up_pending);
}

#[test]
fn test_keyword_answer_gets_context_follow_up() {
    let (org, candidate) = profiles();
    let clock = FixedClock::at(0.0);
    let mut draws = FixedDraws::new();
    let mut engine = ConversationEngine::new(&org, &candidate, &mut draws, &clock);
    let script = Script::new(vec![
        Question::new(QuestionType::Experience, "Tell us about the food bank."),
        Question::new(QuestionType::Closing, "Anything else?"),
    ]);

    let (_, state) = engine.start(script).unwrap();
    let outcome = engine
        .submit_response(
            state,
            "Running the weekend food drive for our community taught me how to organize forty people.",
            false,
        )
        .unwrap();
    assert_eq!(outcome.reason, Some(FollowUpReason::F003_INTERESTING_KEYWORD));
    assert_eq!(
        outcome.next_prompt,
        "How has your community responded to your efforts?"
    );
}

#[test]
fn test_values_answer_relevance() {
    let evaluator = ResponseEvaluator::new();
    let scores = evaluator
        .score(
            QuestionType::PageantValues,
            "Integrity and service guide every choice I make at school and at home.",
            &["integrity", "service"],
        )
        .unwrap();
    assert!((scores.relevance - 0.9).abs() < 1e-9);
}

#[test]
fn test_time_limit_concludes_and_summarizes() {
    let (org, candidate) = profiles();
    let clock = FixedClock::stepping(0.0, 30.0);
    let mut draws = FixedDraws::new();
    let mut engine = ConversationEngine::new(&org, &candidate, &mut draws, &clock);

    let (_, state) = engine.start(three_questions()).unwrap();
    let outcome = engine.submit_response(state, NEUTRAL, true).unwrap();

    assert!(outcome.complete);
    assert!(outcome.time_limit_exceeded);
    assert_eq!(outcome.reason, None);
    assert!(outcome.next_prompt.contains("allocated time"));
    assert!(outcome.next_prompt.contains("Miss Lakeshore"));
    assert_eq!(outcome.state.evaluation.question_count, 1);

    let summary = SummaryAggregator::new()
        .summarize(&outcome.state, &org, &candidate)
        .unwrap();
    assert!(summary.time_limit_exceeded);
    assert_eq!(summary.question_count, 1);
    assert!(summary.interview_duration_seconds.unwrap() > 0.0);

    let err = engine.submit_response(outcome.state, NEUTRAL, false).unwrap_err();
    assert!(matches!(
        err,
        InterviewError::InvalidState { expected: "IN_PROGRESS", actual: "COMPLETE" }
    ));
}

#[test]
fn test_summary_before_completion_is_rejected() {
    let (org, candidate) = profiles();
    let clock = FixedClock::at(0.0);
    let mut draws = FixedDraws::new();
    let mut engine = ConversationEngine::new(&org, &candidate, &mut draws, &clock);
    let (_, state) = engine.start(three_questions()).unwrap();

    let err = SummaryAggregator::new().summarize(&state, &org, &candidate).unwrap_err();
    assert!(matches!(err, InterviewError::InvalidState { expected: "COMPLETE", .. }));
}

#[test]
fn test_full_interview_from_profile_text() {
    let org = ProfileParser::organization().parse(
        "Name: Miss Lakeshore\nCore Values: integrity, courage\nFocus Issues: literacy\n",
    );
    let candidate = ProfileParser::candidate().parse(
        "Name: Ava Reyes\nTalents: piano, debate\nExperiences: Girl Scouts, hospital visits\n",
    );
    let script = ScriptBuilder::new()
        .build(&org, &candidate, &mut SeededRandom::from_seed(5))
        .unwrap();
    let question_count = script.len();

    let clock = FixedClock::stepping(10_000.0, 1.0);
    let mut draws = FixedDraws::new();
    let mut engine = ConversationEngine::new(&org, &candidate, &mut draws, &clock);
    let (_, mut state) = engine.start(script).unwrap();

    let mut answers = 0;
    loop {
        let outcome = engine.submit_response(state, NEUTRAL, false).unwrap();
        answers += 1;
        assert!(answers <= question_count, "interview did not finish");
        assert!(!outcome.state.follow_up_pending);
        state = outcome.state;
        if outcome.complete {
            break;
        }
    }
    assert_eq!(answers, question_count);

    let summary = SummaryAggregator::new().summarize(&state, &org, &candidate).unwrap();
    assert_eq!(summary.candidate_name, "Ava Reyes");
    assert_eq!(summary.organization_name, "Miss Lakeshore");
    assert_eq!(summary.question_count as usize, question_count);
    assert_eq!(summary.presentation_score, 40.0);
    assert_eq!(summary.content_score, 30.0);
    assert_eq!(summary.confidence_score, 50.0);
    assert_eq!(summary.relevance_score, 50.0);
    assert_eq!(summary.authenticity_score, 40.0);
    assert_eq!(summary.overall_score, 41.0);
    assert_eq!(summary.strengths, vec![DEFAULT_STRENGTH.to_string()]);
    assert_eq!(summary.areas_for_improvement.len(), 3);
    // Identical answers collapse to a single quote
    assert_eq!(
        summary.notable_quotes,
        vec!["I grew up on a small farm and spent long afternoons reading books under the old oak tree".to_string()]
    );
    assert_eq!(summary.conversation_transcript.len(), 2 * question_count + 1);
}
