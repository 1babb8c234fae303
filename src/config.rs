//! Per-run settings, from CLI flags or a JSON file

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::DEFAULT_SEMANTIC_QUESTIONS;
use crate::core::timing::TimeBudget;
use crate::error::{InterviewError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Interview length limit; `None` for untimed
    pub time_limit_minutes: Option<u32>,
    /// Questions requested from the semantic source, when one is configured
    pub semantic_question_count: usize,
    /// Where finished reports are written; `None` disables reports
    pub reports_dir: Option<PathBuf>,
    /// Seed for template and follow-up draws; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            time_limit_minutes: None,
            semantic_question_count: DEFAULT_SEMANTIC_QUESTIONS,
            reports_dir: Some(PathBuf::from("./reports")),
            seed: None,
        }
    }
}

impl InterviewConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_limit_minutes == Some(0) {
            return Err(InterviewError::InvalidConfig("time_limit_minutes must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn time_budget(&self) -> Option<TimeBudget> {
        self.time_limit_minutes
            .and_then(|m| TimeBudget::from_minutes(f64::from(m)))
    }
}
