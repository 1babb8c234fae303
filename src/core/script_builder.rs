//! ScriptBuilder: profiles → ordered, deduplicated question script
//!
//! Slot order is fixed (introduction, experiences, skills, platform, values,
//! behavioral, situational, world issue, semantic, closing); wording is drawn
//! at random from each slot's template set. A rendered question whose word
//! Jaccard similarity to any already placed question exceeds 0.7 is dropped
//! without substitution, so scripts can come out shorter than the slot count.

use tracing::debug;
use crate::{
    DUPLICATE_SIMILARITY_THRESHOLD, MAX_SCRIPT_QUESTIONS,
    MAX_EXPERIENCE_QUESTIONS, MAX_SKILL_QUESTIONS, MAX_VALUE_QUESTIONS,
    BEHAVIORAL_QUESTIONS, SITUATIONAL_QUESTIONS, DEFAULT_SEMANTIC_QUESTIONS,
};
use crate::core::random::{choose, RandomSource};
use crate::core::semantic::{gather_semantic_questions, SemanticQuestionSource};
use crate::core::text::jaccard;
use crate::error::{InterviewError, Result};
use crate::types::{Profile, Question, QuestionType, Script};

/// Used when the candidate profile names no demographic
pub const DEFAULT_DEMOGRAPHIC: &str = "young women";

/// Used when the organization profile names no current issue
pub const DEFAULT_ISSUE: &str = "climate change";

/// Versioned, immutable template tables
#[derive(Debug, Clone, Copy)]
pub struct QuestionBank {
    pub version: &'static str,
    pub introduction: &'static [&'static str],
    pub experience: &'static [&'static str],
    pub skill: &'static [&'static str],
    pub platform: &'static [&'static str],
    pub values: &'static [&'static str],
    pub behavioral: &'static [&'static str],
    pub situational: &'static [&'static str],
    pub world_issue: &'static [&'static str],
    pub closing: &'static [&'static str],
    /// Remarks recorded when the last script question has been answered
    pub conclusions: &'static [&'static str],
    /// Remark recorded when the caller signals the time limit
    pub time_exceeded_conclusion: &'static str,
}

impl QuestionBank {
    pub const STANDARD_VERSION: &'static str = "standard-1";

    pub fn standard() -> Self {
        Self {
            version: Self::STANDARD_VERSION,
            introduction: INTRODUCTION_TEMPLATES,
            experience: EXPERIENCE_TEMPLATES,
            skill: SKILL_TEMPLATES,
            platform: PLATFORM_TEMPLATES,
            values: VALUE_TEMPLATES,
            behavioral: BEHAVIORAL_TEMPLATES,
            situational: SITUATIONAL_TEMPLATES,
            world_issue: WORLD_ISSUE_TEMPLATES,
            closing: CLOSING_TEMPLATES,
            conclusions: CONCLUSION_TEMPLATES,
            time_exceeded_conclusion: TIME_EXCEEDED_CONCLUSION,
        }
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

/// Replace every `{key}` in the template with its bound value
///
/// Single pass over the template: bound values are copied verbatim and never
/// re-scanned, so a value that itself looks like `{key}` stays literal.
/// Unbound placeholders are kept as written.
pub fn render(template: &str, bindings: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match bindings.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Builds one script per interview
pub struct ScriptBuilder<'a> {
    bank: QuestionBank,
    semantic: Option<&'a dyn SemanticQuestionSource>,
    semantic_count: usize,
}

impl Default for ScriptBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ScriptBuilder<'a> {
    pub fn new() -> Self {
        Self::with_bank(QuestionBank::standard())
    }

    pub fn with_bank(bank: QuestionBank) -> Self {
        Self {
            bank,
            semantic: None,
            semantic_count: DEFAULT_SEMANTIC_QUESTIONS,
        }
    }

    /// Attach an optional semantic question source
    pub fn with_semantic_source(mut self, source: &'a dyn SemanticQuestionSource, count: usize) -> Self {
        self.semantic = Some(source);
        self.semantic_count = count;
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Build the script for an organization/candidate pair
    pub fn build(
        &self,
        organization: &Profile,
        candidate: &Profile,
        rng: &mut dyn RandomSource,
    ) -> Result<Script> {
        organization.name().ok_or(InterviewError::IncompleteProfile {
            profile: "organization",
            field: "name",
        })?;
        let candidate_name = candidate.name().ok_or(InterviewError::IncompleteProfile {
            profile: "candidate",
            field: "name",
        })?;

        let mut draft = Draft::default();
        let bank = &self.bank;

        draft.offer_templated(rng, bank.introduction, QuestionType::Introduction, &[("candidate_name", candidate_name)]);

        for subject in candidate
            .experience_subjects()
            .into_iter()
            .take(MAX_EXPERIENCE_QUESTIONS)
            .flatten()
        {
            draft.offer_templated(
                rng,
                bank.experience,
                QuestionType::Experience,
                &[("activity", subject), ("organization", subject), ("event", subject)],
            );
        }

        for skill in candidate.skills().into_iter().take(MAX_SKILL_QUESTIONS) {
            draft.offer_templated(rng, bank.skill, QuestionType::Skill, &[("talent", skill), ("skill", skill)]);
        }

        if let Some(platform) = candidate.platform() {
            draft.offer_templated(rng, bank.platform, QuestionType::Platform, &[("platform", platform)]);
        }

        for value in organization.values().into_iter().take(MAX_VALUE_QUESTIONS) {
            draft.offer_templated(rng, bank.values, QuestionType::PageantValues, &[("value", value)]);
        }

        for _ in 0..BEHAVIORAL_QUESTIONS {
            draft.offer_templated(rng, bank.behavioral, QuestionType::Behavioral, &[]);
        }

        for _ in 0..SITUATIONAL_QUESTIONS {
            draft.offer_templated(rng, bank.situational, QuestionType::Situational, &[]);
        }

        let demographic = candidate.demographic().unwrap_or(DEFAULT_DEMOGRAPHIC);
        let issue = organization.current_issue().unwrap_or(DEFAULT_ISSUE);
        draft.offer_templated(
            rng,
            bank.world_issue,
            QuestionType::WorldIssue,
            &[("demographic", demographic), ("issue", issue)],
        );

        // Closing is drawn now so semantic questions are deduplicated against it
        let closing = choose(rng, bank.closing).map(|template| {
            Question::new(QuestionType::Closing, render(template, &[("candidate_name", candidate_name)]))
        });

        if let Some(source) = self.semantic {
            if draft.has_room() {
                for question in gather_semantic_questions(source, organization, candidate, self.semantic_count) {
                    draft.offer_beside(question, closing.as_ref());
                }
            }
        }

        // Closing is always placed, last
        if let Some(closing) = closing {
            draft.questions.push(closing);
        }

        debug!(
            questions = draft.questions.len(),
            dropped = draft.dropped,
            bank = bank.version,
            "script built"
        );
        Ok(Script::new(draft.questions))
    }
}

/// Script under construction
#[derive(Default)]
struct Draft {
    questions: Vec<Question>,
    dropped: usize,
}

impl Draft {
    /// Room left for another non-closing question
    fn has_room(&self) -> bool {
        self.questions.len() + 1 < MAX_SCRIPT_QUESTIONS
    }

    fn offer_templated(
        &mut self,
        rng: &mut dyn RandomSource,
        templates: &[&str],
        question_type: QuestionType,
        bindings: &[(&str, &str)],
    ) {
        if !self.has_room() {
            return;
        }
        if let Some(template) = choose(rng, templates) {
            self.offer(Question::new(question_type, render(template, bindings)));
        }
    }

    fn offer(&mut self, question: Question) -> bool {
        if !self.has_room() {
            return false;
        }
        if self.is_similar_to_placed(&question.text) {
            debug!(question_type = %question.question_type, "dropped near-duplicate question");
            self.dropped += 1;
            return false;
        }
        self.questions.push(question);
        true
    }

    /// Offer a question that must also stay distinct from one not yet placed
    fn offer_beside(&mut self, question: Question, reserved: Option<&Question>) -> bool {
        if let Some(reserved) = reserved {
            if jaccard(&reserved.text, &question.text) > DUPLICATE_SIMILARITY_THRESHOLD {
                debug!(
                    question_type = %question.question_type,
                    reserved = %reserved.question_type,
                    "dropped near-duplicate question"
                );
                self.dropped += 1;
                return false;
            }
        }
        self.offer(question)
    }

    fn is_similar_to_placed(&self, text: &str) -> bool {
        self.questions
            .iter()
            .any(|q| jaccard(&q.text, text) > DUPLICATE_SIMILARITY_THRESHOLD)
    }
}

// =============================================================================
// STANDARD TEMPLATES
// =============================================================================

const INTRODUCTION_TEMPLATES: &[&str] = &[
    "Welcome, {candidate_name}! It's great to have you with us. To start, could you tell us a little about your journey and what motivated you to participate in this pageant?",
    "Hello, {candidate_name}, and thank you for being here. What inspired you to compete in this pageant, and how has it shaped your personal growth?",
    "Hi {candidate_name}, we're thrilled to have you today. Could you share with us your story and why you believe you're a great fit for this pageant?",
];

const EXPERIENCE_TEMPLATES: &[&str] = &[
    "You mentioned in your bio that you have experience in {activity}. Can you tell us how this experience has influenced your preparation for the pageant?",
    "Your work with {organization} is impressive! How do you think your experiences there will help you as a representative of this pageant?",
    "You've participated in several events, such as {event}. What was your most memorable experience and how did it help you grow?",
];

const SKILL_TEMPLATES: &[&str] = &[
    "You highlighted your talent in {talent}. Could you tell us about a time when this skill gave you an edge or helped you overcome a challenge?",
    "How do you continue to improve your {skill} and stay at the top of your game for pageant events?",
    "Your profile mentions {skill}. Could you walk us through a moment when this skill was essential to your success in a public setting?",
];

const BEHAVIORAL_TEMPLATES: &[&str] = &[
    "Tell us about a challenging moment during your pageant journey. How did you handle the stress, and what did you learn from it?",
    "Describe a situation where you had to deal with a difficult contestant or judge. How did you manage the situation?",
    "Can you share an instance where you had to quickly think on your feet during an event or stage performance?",
];

const PLATFORM_TEMPLATES: &[&str] = &[
    "Your platform is focused on {platform}. What inspired you to choose this cause, and what specific actions have you taken to advance it?",
    "How do you plan to leverage the pageant title to further your platform of {platform}?",
    "If selected as the winner, what specific initiatives would you implement to promote {platform} in our community?",
];

const VALUE_TEMPLATES: &[&str] = &[
    "Our pageant values {value}. Can you tell us how you've demonstrated this value in your life?",
    "One of our key values is {value}. How have you embodied this value throughout your journey, and how do you plan to continue doing so?",
    "We are deeply committed to {value}. Can you share an experience where you worked towards upholding this value in your community?",
];

const SITUATIONAL_TEMPLATES: &[&str] = &[
    "If you were to win the title today, how would you use the platform to influence positive change in your community?",
    "Imagine you have to speak at a major event with little preparation. How would you handle the situation?",
    "If you faced a setback during your competition, how would you keep yourself motivated to push forward?",
];

const WORLD_ISSUE_TEMPLATES: &[&str] = &[
    "What do you believe is the most significant issue facing {demographic} today, and how would you address it as a pageant winner?",
    "How do you think your generation can contribute to solving {issue}?",
    "If you had the opportunity to address world leaders about {issue}, what would be your main message?",
];

const CLOSING_TEMPLATES: &[&str] = &[
    "Thank you for sharing your journey with us today, {candidate_name}. Is there anything else you'd like to share with us about your vision as a potential winner?",
    "You've given us a lot to think about today. Before we conclude, do you have any final words or questions about the competition or next steps?",
    "We're honored to have had you here today, {candidate_name}. Is there anything else you'd like to add about your goals for the future?",
];

const CONCLUSION_TEMPLATES: &[&str] = &[
    "Thank you, {candidate_name}, for taking the time to interview with us today for {organization_name}. We've covered a lot of ground, and I appreciate your thoughtful responses. Our panel will review your interview and get back to you soon regarding the results. Do you have any final thoughts or questions before we conclude?",
    "That concludes the formal part of our interview, {candidate_name}. I've enjoyed learning more about your background and how you might represent {organization_name}. We'll be in touch soon with the judges' feedback. Is there anything else you'd like to share about your vision for the title?",
    "We've come to the end of our scheduled time, {candidate_name}. Thank you for sharing your experiences and insights related to {organization_name}. The judging panel will evaluate all contestants and announce the results shortly. Before we end, is there anything else you'd like to add about your goals or aspirations?",
];

const TIME_EXCEEDED_CONCLUSION: &str = "I see we've reached the end of our allocated time for this interview, {candidate_name}. Thank you for sharing your experiences and insights for {organization_name}. Although we couldn't get through all our questions, I've gathered valuable information about your background and talents. Our panel will review your interview and get back to you soon regarding next steps. Do you have any brief final thoughts before we conclude?";

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::{FixedDraws, SeededRandom};

    fn organization() -> Profile {
        Profile::new()
            .with_text("name", "Miss Riverside")
            .with_list("values", ["integrity", "service"])
            .with_text("current_issue", "literacy")
    }

    fn candidate() -> Profile {
        Profile::new()
            .with_text("name", "Ava Reyes")
            .with_records("experiences", [("activity", "food bank volunteering"), ("organization", "Girl Scouts")])
            .with_list("skills", ["public speaking", "piano"])
            .with_text("platform", "mental health awareness")
    }

    #[test]
    fn test_render_binds_all_placeholders() {
        let text = render("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(text, "x and y and x");
    }

    #[test]
    fn test_render_does_not_rescan_bound_values() {
        let text = render("{a} and {b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(text, "{b} and x");
    }

    #[test]
    fn test_render_keeps_unbound_and_unclosed_braces() {
        assert_eq!(render("{missing} {a}", &[("a", "x")]), "{missing} x");
        assert_eq!(render("{a} {open", &[("a", "x")]), "x {open");
    }

    struct Canned(Vec<&'static str>);

    impl SemanticQuestionSource for Canned {
        fn generate(
            &self,
            _organization: &Profile,
            _candidate: &Profile,
            _count: usize,
        ) -> std::result::Result<Vec<Question>, crate::core::semantic::SemanticError> {
            Ok(self
                .0
                .iter()
                .map(|text| Question::new(QuestionType::Semantic, *text))
                .collect())
        }
    }

    #[test]
    fn test_semantic_question_like_the_closing_is_dropped() {
        // Index draws all pick template 0, so the closing is CLOSING_TEMPLATES[0]
        let source = Canned(vec![
            "Thank you for sharing your journey with us today, Sam. Is there anything else you would like to share with us about your vision as a potential winner?",
            "Which book would you hand to every seventh grader and why?",
        ]);
        let script = ScriptBuilder::new()
            .with_semantic_source(&source, 2)
            .build(
                &Profile::new().with_text("name", "Org"),
                &Profile::new().with_text("name", "Sam"),
                &mut FixedDraws::new(),
            )
            .unwrap();

        let semantic: Vec<_> = script
            .iter()
            .filter(|q| q.question_type == QuestionType::Semantic)
            .map(|q| q.text.as_str())
            .collect();
        assert_eq!(semantic, vec!["Which book would you hand to every seventh grader and why?"]);
        assert_eq!(script.questions().last().unwrap().question_type, QuestionType::Closing);

        let qs = script.questions();
        for i in 0..qs.len() {
            for j in (i + 1)..qs.len() {
                assert!(jaccard(&qs[i].text, &qs[j].text) <= DUPLICATE_SIMILARITY_THRESHOLD);
            }
        }
    }

    #[test]
    fn test_missing_organization_name() {
        let builder = ScriptBuilder::new();
        let err = builder
            .build(&Profile::new(), &candidate(), &mut FixedDraws::new())
            .unwrap_err();
        assert!(matches!(
            err,
            InterviewError::IncompleteProfile { profile: "organization", field: "name" }
        ));
    }

    #[test]
    fn test_missing_candidate_name() {
        let builder = ScriptBuilder::new();
        let err = builder
            .build(&organization(), &Profile::new().with_text("platform", "x"), &mut FixedDraws::new())
            .unwrap_err();
        assert!(matches!(
            err,
            InterviewError::IncompleteProfile { profile: "candidate", field: "name" }
        ));
    }

    #[test]
    fn test_same_template_twice_is_dropped() {
        // Every draw picks template 0, so the second behavioral and
        // situational questions are exact duplicates and get dropped.
        let builder = ScriptBuilder::new();
        let script = builder
            .build(
                &Profile::new().with_text("name", "Org"),
                &Profile::new().with_text("name", "Sam"),
                &mut FixedDraws::new(),
            )
            .unwrap();
        assert_eq!(script.count_of(QuestionType::Behavioral), 1);
        assert_eq!(script.count_of(QuestionType::Situational), 1);
    }

    #[test]
    fn test_minimal_profiles_give_fixed_slots() {
        // Distinct template draws for the repeated slots
        let mut draws = FixedDraws::new().with_indices([0, 0, 1, 0, 1, 0, 0]);
        let script = ScriptBuilder::new()
            .build(
                &Profile::new().with_text("name", "Org"),
                &Profile::new().with_text("name", "Sam"),
                &mut draws,
            )
            .unwrap();
        let types: Vec<_> = script.iter().map(|q| q.question_type).collect();
        assert_eq!(
            types,
            vec![
                QuestionType::Introduction,
                QuestionType::Behavioral,
                QuestionType::Behavioral,
                QuestionType::Situational,
                QuestionType::Situational,
                QuestionType::WorldIssue,
                QuestionType::Closing,
            ]
        );
    }

    #[test]
    fn test_world_issue_uses_defaults() {
        let mut draws = FixedDraws::new().with_indices([0, 0, 0, 0, 0, 1]);
        let script = ScriptBuilder::new()
            .build(
                &Profile::new().with_text("name", "Org"),
                &Profile::new().with_text("name", "Sam"),
                &mut draws,
            )
            .unwrap();
        let world = script
            .iter()
            .find(|q| q.question_type == QuestionType::WorldIssue)
            .unwrap();
        assert!(world.text.contains(DEFAULT_ISSUE), "{}", world.text);
    }

    #[test]
    fn test_no_platform_no_platform_question() {
        let mut rng = SeededRandom::from_seed(3);
        let script = ScriptBuilder::new()
            .build(&organization(), &Profile::new().with_text("name", "Sam"), &mut rng)
            .unwrap();
        assert_eq!(script.count_of(QuestionType::Platform), 0);
        assert_eq!(script.count_of(QuestionType::Skill), 0);
        assert_eq!(script.count_of(QuestionType::Experience), 0);
    }

    #[test]
    fn test_script_invariants_across_seeds() {
        for seed in 0..200 {
            let mut rng = SeededRandom::from_seed(seed);
            let script = ScriptBuilder::new()
                .build(&organization(), &candidate(), &mut rng)
                .unwrap();

            assert!(script.len() >= 1 && script.len() <= MAX_SCRIPT_QUESTIONS, "seed {}", seed);
            assert!(script.count_of(QuestionType::Introduction) <= 1);
            assert_eq!(script.count_of(QuestionType::Closing), 1);
            assert_eq!(script.questions().last().unwrap().question_type, QuestionType::Closing);

            let qs = script.questions();
            for i in 0..qs.len() {
                for j in (i + 1)..qs.len() {
                    assert!(
                        jaccard(&qs[i].text, &qs[j].text) <= DUPLICATE_SIMILARITY_THRESHOLD,
                        "seed {}: {:?} / {:?}",
                        seed,
                        qs[i].text,
                        qs[j].text
                    );
                }
            }
        }
    }

    #[test]
    fn test_templates_fully_rendered() {
        let mut rng = SeededRandom::from_seed(11);
        let script = ScriptBuilder::new()
            .build(&organization(), &candidate(), &mut rng)
            .unwrap();
        for q in script.iter() {
            assert!(!q.text.contains('{'), "unrendered placeholder in {:?}", q.text);
        }
    }
}
