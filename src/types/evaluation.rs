//! Per-response dimension scores and running totals

use serde::{Deserialize, Serialize};
use crate::{
    WEIGHT_PRESENTATION, WEIGHT_CONTENT, WEIGHT_CONFIDENCE,
    WEIGHT_RELEVANCE, WEIGHT_AUTHENTICITY,
};

/// The five scored qualities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Presentation,
    Content,
    Confidence,
    Relevance,
    Authenticity,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Presentation,
        Dimension::Content,
        Dimension::Confidence,
        Dimension::Relevance,
        Dimension::Authenticity,
    ];

    /// Weight in the overall score
    pub fn weight(&self) -> f64 {
        match self {
            Self::Presentation => WEIGHT_PRESENTATION,
            Self::Content => WEIGHT_CONTENT,
            Self::Confidence => WEIGHT_CONFIDENCE,
            Self::Relevance => WEIGHT_RELEVANCE,
            Self::Authenticity => WEIGHT_AUTHENTICITY,
        }
    }

    /// Strength noted when a response scores above the strength threshold
    pub fn strength_label(&self) -> &'static str {
        match self {
            Self::Presentation => "Clear and articulate communication",
            Self::Content => "Substantial and detailed responses",
            Self::Confidence => "Strong confidence and poise",
            Self::Relevance => "Excellent ability to address questions directly",
            Self::Authenticity => "Genuine and authentic communication style",
        }
    }

    /// Improvement noted when a response scores below the improvement threshold
    pub fn improvement_label(&self) -> &'static str {
        match self {
            Self::Presentation => "Improving clarity of communication",
            Self::Content => "Adding more depth to responses",
            Self::Confidence => "Building confidence in delivery",
            Self::Relevance => "Addressing questions more directly",
            Self::Authenticity => "Adding more personal connection to answers",
        }
    }
}

/// Scores for a single response, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionScores {
    pub presentation: f64,
    pub content: f64,
    pub confidence: f64,
    pub relevance: f64,
    pub authenticity: f64,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Presentation => self.presentation,
            Dimension::Content => self.content,
            Dimension::Confidence => self.confidence,
            Dimension::Relevance => self.relevance,
            Dimension::Authenticity => self.authenticity,
        }
    }
}

/// Running sums across scored responses
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationTotals {
    pub presentation: f64,
    pub content: f64,
    pub confidence: f64,
    pub relevance: f64,
    pub authenticity: f64,
    pub question_count: u32,
}

impl EvaluationTotals {
    /// Fold one scored response into the totals
    pub fn record(&mut self, scores: &DimensionScores) {
        self.presentation += scores.presentation;
        self.content += scores.content;
        self.confidence += scores.confidence;
        self.relevance += scores.relevance;
        self.authenticity += scores.authenticity;
        self.question_count += 1;
    }

    pub fn total(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Presentation => self.presentation,
            Dimension::Content => self.content,
            Dimension::Confidence => self.confidence,
            Dimension::Relevance => self.relevance,
            Dimension::Authenticity => self.authenticity,
        }
    }

    /// Average score on the 0-100 scale; 0 when nothing was scored
    pub fn normalized(&self, dimension: Dimension) -> f64 {
        if self.question_count == 0 {
            return 0.0;
        }
        self.total(dimension) / self.question_count as f64 * 100.0
    }

    /// Weighted average of the normalized dimensions, clamped to [0, 100]
    pub fn overall(&self) -> f64 {
        if self.question_count == 0 {
            return 0.0;
        }
        Dimension::ALL
            .iter()
            .map(|d| self.normalized(*d) * d.weight())
            .sum::<f64>()
            .clamp(0.0, 100.0)
    }
}

/// Qualitative notes, deduplicated by exact string in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

impl Feedback {
    pub fn note_strength(&mut self, label: &str) {
        push_unique(&mut self.strengths, label);
    }

    pub fn note_improvement(&mut self, label: &str) {
        push_unique(&mut self.areas_for_improvement, label);
    }
}

fn push_unique(list: &mut Vec<String>, label: &str) {
    if !list.iter().any(|s| s == label) {
        list.push(label.to_string());
    }
}
