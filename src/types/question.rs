//! Questions and the fixed interview script

use serde::{Deserialize, Serialize};

/// Kind of question, drives follow-up templates and relevance scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Introduction,
    Experience,
    Skill,
    Platform,
    /// Organizational values
    PageantValues,
    Behavioral,
    Situational,
    WorldIssue,
    Closing,
    /// Contributed by an external semantic question source
    Semantic,
}

impl QuestionType {
    /// Wire name, as used in transcript labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Introduction => "introduction",
            Self::Experience => "experience",
            Self::Skill => "skill",
            Self::Platform => "platform",
            Self::PageantValues => "pageant_values",
            Self::Behavioral => "behavioral",
            Self::Situational => "situational",
            Self::WorldIssue => "world_issue",
            Self::Closing => "closing",
            Self::Semantic => "semantic",
        }
    }

    /// Transcript label for a follow-up asked under this type
    pub fn follow_up_label(&self) -> String {
        format!("{}_follow_up", self.as_str())
    }

    /// Introduction and closing never get follow-ups
    pub fn allows_follow_up(&self) -> bool {
        !matches!(self, Self::Introduction | Self::Closing)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rendered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
}

impl Question {
    pub fn new(question_type: QuestionType, text: impl Into<String>) -> Self {
        Self {
            question_type,
            text: text.into(),
        }
    }
}

/// Ordered, immutable list of questions generated once per interview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    questions: Vec<Question>,
}

impl Script {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.questions.len().checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions of the given type
    pub fn count_of(&self, question_type: QuestionType) -> usize {
        self.questions
            .iter()
            .filter(|q| q.question_type == question_type)
            .count()
    }
}
