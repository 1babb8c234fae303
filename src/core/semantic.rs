//! Optional semantic question source
//!
//! A source contributes extra questions tailored to the profile pair. It may
//! be absent or fail; either way the script is built without its questions.

use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};
use crate::core::text::{char_len, word_set};
use crate::error::Result;
use crate::types::{Profile, Question, QuestionType};

/// Accepted length of a normalized question, in chars
const MIN_QUESTION_CHARS: usize = 10;
const MAX_QUESTION_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("semantic source unavailable: {0}")]
    Unavailable(String),

    #[error("semantic source produced no usable questions")]
    NoQuestions,
}

pub trait SemanticQuestionSource {
    fn generate(
        &self,
        organization: &Profile,
        candidate: &Profile,
        count: usize,
    ) -> std::result::Result<Vec<Question>, SemanticError>;
}

/// Ask the source for questions; any failure contributes nothing
pub fn gather_semantic_questions(
    source: &dyn SemanticQuestionSource,
    organization: &Profile,
    candidate: &Profile,
    count: usize,
) -> Vec<Question> {
    if count == 0 {
        return Vec::new();
    }
    match source.generate(organization, candidate, count) {
        Ok(questions) => {
            debug!(count = questions.len(), "semantic questions received");
            questions
        }
        Err(e) => {
            warn!(error = %e, "semantic source failed; continuing without it");
            Vec::new()
        }
    }
}

/// Trim, end with `?`, capitalize; `None` when outside the accepted length
pub fn normalize_question(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let mut question: String = first.to_uppercase().chain(chars).collect();
    if !question.ends_with('?') {
        question.push('?');
    }
    let len = char_len(&question);
    if !(MIN_QUESTION_CHARS..=MAX_QUESTION_CHARS).contains(&len) {
        return None;
    }
    Some(question)
}

/// Free-text context describing the profile pair
pub fn profile_context(organization: &Profile, candidate: &Profile) -> String {
    let mut parts = Vec::new();
    if let Some(name) = candidate.name() {
        parts.push(format!("Candidate: {}", name));
    }
    let skills = candidate.skills();
    if !skills.is_empty() {
        parts.push(format!("Skills: {}", skills.join(", ")));
    }
    let experiences: Vec<&str> = candidate.experience_subjects().into_iter().flatten().collect();
    if !experiences.is_empty() {
        parts.push(format!("Experiences: {}", experiences.join("; ")));
    }
    if let Some(platform) = candidate.platform() {
        parts.push(format!("Platform: {}", platform));
    }
    if let Some(name) = organization.name() {
        parts.push(format!("Organization: {}", name));
    }
    let values = organization.values();
    if !values.is_empty() {
        parts.push(format!("Values: {}", values.join(", ")));
    }
    if let Some(issue) = organization.current_issue() {
        parts.push(format!("Current focus: {}", issue));
    }
    parts.join(" ")
}

/// Ranks a fixed list of questions by word overlap with the profile context
#[derive(Debug, Clone, Default)]
pub struct QuestionBankSource {
    questions: Vec<String>,
}

impl QuestionBankSource {
    pub fn new(questions: Vec<String>) -> Self {
        Self { questions }
    }

    /// One question per line; blank lines and `#` comments are skipped
    pub fn from_lines(text: &str) -> Self {
        let questions = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(String::from)
            .collect();
        Self { questions }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&text))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl SemanticQuestionSource for QuestionBankSource {
    fn generate(
        &self,
        organization: &Profile,
        candidate: &Profile,
        count: usize,
    ) -> std::result::Result<Vec<Question>, SemanticError> {
        if self.questions.is_empty() {
            return Err(SemanticError::Unavailable("question bank is empty".to_string()));
        }
        let context = word_set(&profile_context(organization, candidate));

        let mut ranked: Vec<(usize, &String)> = self
            .questions
            .iter()
            .map(|q| (word_set(q).intersection(&context).count(), q))
            .collect();
        // Stable: ties keep bank order
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        let questions: Vec<Question> = ranked
            .into_iter()
            .filter_map(|(_, q)| normalize_question(q))
            .take(count)
            .map(|text| Question::new(QuestionType::Semantic, text))
            .collect();

        if questions.is_empty() {
            return Err(SemanticError::NoQuestions);
        }
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl SemanticQuestionSource for Failing {
        fn generate(&self, _: &Profile, _: &Profile, _: usize) -> std::result::Result<Vec<Question>, SemanticError> {
            Err(SemanticError::Unavailable("index offline".to_string()))
        }
    }

    fn profiles() -> (Profile, Profile) {
        let org = Profile::new()
            .with_text("name", "Miss Lakeside")
            .with_list("values", ["literacy", "service"]);
        let candidate = Profile::new()
            .with_text("name", "Jo")
            .with_list("skills", ["debate"]);
        (org, candidate)
    }

    #[test]
    fn test_normalize_question() {
        assert_eq!(
            normalize_question("  how do you handle pressure "),
            Some("How do you handle pressure?".to_string())
        );
        assert_eq!(normalize_question("Why?"), None);
        assert_eq!(normalize_question(""), None);
        assert_eq!(normalize_question(&"a".repeat(250)), None);
    }

    #[test]
    fn test_failure_contributes_nothing() {
        let (org, candidate) = profiles();
        assert!(gather_semantic_questions(&Failing, &org, &candidate, 5).is_empty());
    }

    #[test]
    fn test_bank_ranks_by_context_overlap() {
        let (org, candidate) = profiles();
        let bank = QuestionBankSource::from_lines(
            "# sample bank\n\
             What is your favorite color\n\
             How has debate shaped your view of literacy and service?\n\
             \n\
             Tell us about a book you love\n",
        );
        assert_eq!(bank.len(), 3);

        let questions = bank.generate(&org, &candidate, 2).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "How has debate shaped your view of literacy and service?");
        assert_eq!(questions[0].question_type, QuestionType::Semantic);
        assert_eq!(questions[1].text, "What is your favorite color?");
    }

    #[test]
    fn test_empty_bank_is_unavailable() {
        let (org, candidate) = profiles();
        let err = QuestionBankSource::default().generate(&org, &candidate, 3).unwrap_err();
        assert!(matches!(err, SemanticError::Unavailable(_)));
    }
}
