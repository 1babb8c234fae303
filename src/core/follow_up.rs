//! FollowUpPolicy: whether to probe a response further, and with what
//!
//! Decision order:
//! - introduction/closing → never
//! - response shorter than 50 chars → always (notes "Providing more detailed responses")
//! - any interesting keyword present → always
//! - otherwise → with probability 0.3

use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::{FOLLOW_UP_PROBABILITY, SHORT_RESPONSE_CHARS};
use crate::core::random::{choose, RandomSource};
use crate::core::text::{char_len, contains_any};
use crate::types::{Feedback, QuestionType};

/// Why a follow-up was or was not asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum FollowUpReason {
    /// Introduction and closing are never probed
    F001_TYPE_EXCLUDED,
    /// A follow-up was already asked for this question
    F001_ALREADY_ASKED,
    /// Response too short
    F002_SHORT_RESPONSE,
    /// Response mentions a topic worth probing
    F003_INTERESTING_KEYWORD,
    /// Random draw under the follow-up probability
    F004_RANDOM_DRAW,
    /// No rule fired
    F004_NO_FOLLOW_UP,
}

impl FollowUpReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::F001_TYPE_EXCLUDED => "F001_TYPE_EXCLUDED",
            Self::F001_ALREADY_ASKED => "F001_ALREADY_ASKED",
            Self::F002_SHORT_RESPONSE => "F002_SHORT_RESPONSE",
            Self::F003_INTERESTING_KEYWORD => "F003_INTERESTING_KEYWORD",
            Self::F004_RANDOM_DRAW => "F004_RANDOM_DRAW",
            Self::F004_NO_FOLLOW_UP => "F004_NO_FOLLOW_UP",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::F001_TYPE_EXCLUDED => "Question type is never followed up",
            Self::F001_ALREADY_ASKED => "Follow-up already asked",
            Self::F002_SHORT_RESPONSE => "Response needs more detail",
            Self::F003_INTERESTING_KEYWORD => "Response mentions an interesting topic",
            Self::F004_RANDOM_DRAW => "Random follow-up",
            Self::F004_NO_FOLLOW_UP => "Advancing",
        }
    }

    /// Does this reason ask a follow-up?
    pub fn asks(&self) -> bool {
        matches!(
            self,
            Self::F002_SHORT_RESPONSE | Self::F003_INTERESTING_KEYWORD | Self::F004_RANDOM_DRAW
        )
    }
}

impl std::fmt::Display for FollowUpReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

/// Versioned follow-up tables
#[derive(Debug, Clone, Copy)]
pub struct FollowUpBank {
    pub version: &'static str,
    pub interesting_keywords: &'static [&'static str],
    /// Ordered keyword → fixed follow-up; the first match wins
    pub context_follow_ups: &'static [(&'static str, &'static str)],
    pub generic: &'static [&'static str],
    pub platform: &'static [&'static str],
    pub experience: &'static [&'static str],
    pub skill: &'static [&'static str],
    pub behavioral: &'static [&'static str],
    pub pageant_values: &'static [&'static str],
    pub world_issue: &'static [&'static str],
    pub short_response_note: &'static str,
}

impl FollowUpBank {
    pub const STANDARD_VERSION: &'static str = "standard-1";

    pub fn standard() -> Self {
        Self {
            version: Self::STANDARD_VERSION,
            interesting_keywords: INTERESTING_KEYWORDS,
            context_follow_ups: CONTEXT_FOLLOW_UPS,
            generic: GENERIC_FOLLOW_UPS,
            platform: PLATFORM_FOLLOW_UPS,
            experience: EXPERIENCE_FOLLOW_UPS,
            skill: SKILL_FOLLOW_UPS,
            behavioral: BEHAVIORAL_FOLLOW_UPS,
            pageant_values: VALUES_FOLLOW_UPS,
            world_issue: WORLD_ISSUE_FOLLOW_UPS,
            short_response_note: SHORT_RESPONSE_NOTE,
        }
    }

    /// Type-specific templates, if the type has a set of its own
    pub fn for_type(&self, question_type: QuestionType) -> Option<&'static [&'static str]> {
        match question_type {
            QuestionType::Platform => Some(self.platform),
            QuestionType::Experience => Some(self.experience),
            QuestionType::Skill => Some(self.skill),
            QuestionType::Behavioral => Some(self.behavioral),
            QuestionType::PageantValues => Some(self.pageant_values),
            QuestionType::WorldIssue => Some(self.world_issue),
            _ => None,
        }
    }
}

impl Default for FollowUpBank {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FollowUpPolicy {
    bank: FollowUpBank,
}

impl FollowUpPolicy {
    pub fn new(bank: FollowUpBank) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &FollowUpBank {
        &self.bank
    }

    /// Decide with a reason; may note an improvement in `feedback`.
    ///
    /// The random source is only drawn from when no other rule fires.
    pub fn decide(
        &self,
        question_type: QuestionType,
        response: &str,
        feedback: &mut Feedback,
        rng: &mut dyn RandomSource,
    ) -> FollowUpReason {
        if !question_type.allows_follow_up() {
            return FollowUpReason::F001_TYPE_EXCLUDED;
        }

        if char_len(response) < SHORT_RESPONSE_CHARS {
            feedback.note_improvement(self.bank.short_response_note);
            return FollowUpReason::F002_SHORT_RESPONSE;
        }

        if contains_any(&response.to_lowercase(), self.bank.interesting_keywords) {
            return FollowUpReason::F003_INTERESTING_KEYWORD;
        }

        if rng.chance() < FOLLOW_UP_PROBABILITY {
            FollowUpReason::F004_RANDOM_DRAW
        } else {
            FollowUpReason::F004_NO_FOLLOW_UP
        }
    }

    pub fn should_follow_up(
        &self,
        question_type: QuestionType,
        response: &str,
        feedback: &mut Feedback,
        rng: &mut dyn RandomSource,
    ) -> bool {
        self.decide(question_type, response, feedback, rng).asks()
    }

    /// Follow-up text: first context keyword in table order, else a
    /// type-specific template, else a generic one
    pub fn pick(
        &self,
        question_type: QuestionType,
        _original_question: &str,
        response: &str,
        rng: &mut dyn RandomSource,
    ) -> String {
        let lower = response.to_lowercase();
        if let Some((keyword, text)) = self
            .bank
            .context_follow_ups
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
        {
            debug!(keyword, "context follow-up");
            return text.to_string();
        }

        let templates = self.bank.for_type(question_type).unwrap_or(self.bank.generic);
        choose(rng, templates)
            .or_else(|| choose(rng, self.bank.generic))
            .map(|t| t.to_string())
            .unwrap_or_default()
    }
}

// =============================================================================
// STANDARD TABLES
// =============================================================================

const SHORT_RESPONSE_NOTE: &str = "Providing more detailed responses";

const INTERESTING_KEYWORDS: &[&str] = &[
    "passion", "challenge", "overcome", "success", "failure", "learn",
    "community", "impact", "service", "volunteer", "experience", "dream",
    "goal", "aspiration", "inspire", "change",
];

const CONTEXT_FOLLOW_UPS: &[(&str, &str)] = &[
    ("challenge", "What was the biggest challenge you faced during that?"),
    ("community", "How has your community responded to your efforts?"),
    ("passion", "When did you first discover this passion?"),
    ("inspire", "Who has been your biggest inspiration in this journey?"),
    ("goal", "How do you plan to achieve that goal?"),
    ("volunteer", "How has volunteering shaped your perspective?"),
    ("impact", "How do you measure the impact of your actions?"),
    ("future", "What specific steps are you taking to achieve that future vision?"),
    ("confidence", "How do you maintain your confidence in challenging situations?"),
    ("role model", "How do you ensure you're being a positive role model?"),
];

const GENERIC_FOLLOW_UPS: &[&str] = &[
    "Can you elaborate on that?",
    "That's interesting. Could you provide a specific example?",
    "How did that experience shape your perspective?",
    "What were the key lessons you learned from that?",
    "How would you apply that to your role if you win this pageant?",
];

const PLATFORM_FOLLOW_UPS: &[&str] = &[
    "What specific initiatives would you pursue to advance this platform?",
    "How do you measure the impact of your work on this platform?",
    "How do you engage others to support your platform?",
    "What challenges have you faced in promoting your platform?",
    "How has your perspective on this platform evolved over time?",
];

const EXPERIENCE_FOLLOW_UPS: &[&str] = &[
    "What was your biggest takeaway from that experience?",
    "How did that experience prepare you for this pageant?",
    "What would you do differently if you could revisit that experience?",
    "How have you applied what you learned to other aspects of your life?",
    "How did that experience influence your pageant platform?",
];

const SKILL_FOLLOW_UPS: &[&str] = &[
    "How do you continue to develop this skill?",
    "How have you used this skill to benefit your community?",
    "Can you describe a situation where this skill was particularly valuable?",
    "How do you think this skill will help you as a pageant winner?",
    "How do you adapt this skill to different situations?",
];

const BEHAVIORAL_FOLLOW_UPS: &[&str] = &[
    "Looking back, what would you have done differently?",
    "How has this situation informed your approach to similar challenges?",
    "What was the most challenging aspect of that situation?",
    "How did you know your approach was successful?",
    "How did this experience change your perspective?",
];

const VALUES_FOLLOW_UPS: &[&str] = &[
    "How have you helped promote these values in your community?",
    "How do you see yourself embodying these values if you win?",
    "Can you share another example of how you've demonstrated this value?",
    "How do you handle situations where others don't share these values?",
    "What aspects of this value resonate with you the most?",
];

const WORLD_ISSUE_FOLLOW_UPS: &[&str] = &[
    "How would you use the pageant platform to address this issue?",
    "How has this issue personally affected you or your community?",
    "What specific solutions would you advocate for?",
    "How would you engage young people in addressing this issue?",
    "How do you stay informed about developments related to this issue?",
];

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::FixedDraws;

    const LONG_PLAIN: &str = "I spent my summers reading to children at the downtown library branch every week.";

    #[test]
    fn test_never_for_introduction_or_closing() {
        let policy = FollowUpPolicy::default();
        let mut feedback = Feedback::default();
        let mut draws = FixedDraws::new().with_chances([0.0, 0.0]);
        for t in [QuestionType::Introduction, QuestionType::Closing] {
            for text in ["", "short", LONG_PLAIN, "my passion and my community"] {
                assert!(!policy.should_follow_up(t, text, &mut feedback, &mut draws));
            }
        }
        assert!(feedback.areas_for_improvement.is_empty());
    }

    #[test]
    fn test_short_response_forces_follow_up_and_notes_once() {
        let policy = FollowUpPolicy::default();
        let mut feedback = Feedback::default();
        let mut draws = FixedDraws::new();
        let reason = policy.decide(QuestionType::Behavioral, "I think maybe it was okay", &mut feedback, &mut draws);
        assert_eq!(reason, FollowUpReason::F002_SHORT_RESPONSE);
        policy.decide(QuestionType::Skill, "Yes.", &mut feedback, &mut draws);
        assert_eq!(feedback.areas_for_improvement, vec![SHORT_RESPONSE_NOTE.to_string()]);
    }

    #[test]
    fn test_interesting_keyword_is_case_insensitive() {
        let policy = FollowUpPolicy::default();
        let mut feedback = Feedback::default();
        let mut draws = FixedDraws::new();
        let text = "Working at the shelter taught me that real CHANGE takes patience and many hands.";
        assert_eq!(
            policy.decide(QuestionType::Situational, text, &mut feedback, &mut draws),
            FollowUpReason::F003_INTERESTING_KEYWORD
        );
    }

    #[test]
    fn test_random_branch_uses_injected_draw() {
        let policy = FollowUpPolicy::default();
        let mut feedback = Feedback::default();
        let mut draws = FixedDraws::new().with_chances([0.29, 0.3]);
        assert!(policy.should_follow_up(QuestionType::Skill, LONG_PLAIN, &mut feedback, &mut draws));
        assert!(!policy.should_follow_up(QuestionType::Skill, LONG_PLAIN, &mut feedback, &mut draws));
    }

    #[test]
    fn test_pick_first_context_keyword_in_table_order() {
        let policy = FollowUpPolicy::default();
        let mut draws = FixedDraws::new();
        // "community" precedes "goal" in the table even though "goal" comes first in the text
        let text = policy.pick(QuestionType::Platform, "q", "My goal is to serve my community", &mut draws);
        assert_eq!(text, "How has your community responded to your efforts?");

        let text = policy.pick(QuestionType::Platform, "q", "Being a Role Model matters", &mut draws);
        assert_eq!(text, "How do you ensure you're being a positive role model?");
    }

    #[test]
    fn test_pick_type_specific_then_generic() {
        let policy = FollowUpPolicy::default();
        let mut draws = FixedDraws::new().with_indices([2, 1]);
        let text = policy.pick(QuestionType::WorldIssue, "q", "nothing to match here", &mut draws);
        assert_eq!(text, WORLD_ISSUE_FOLLOW_UPS[2]);

        let text = policy.pick(QuestionType::Situational, "q", "nothing to match here", &mut draws);
        assert_eq!(text, GENERIC_FOLLOW_UPS[1]);
    }
}
