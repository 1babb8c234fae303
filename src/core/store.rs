//! InterviewStore: one directory per interview
//!
//! ```text
//! <root>/<id>/setup.json         profiles, script, config
//! <root>/<id>/conversation.json  latest ConversationState
//! <root>/<id>/summary.json       final Summary
//! <reports>/<date>_<candidate>_<organization>_<id>.json
//! ```
//!
//! Every write goes to a temp file in the same directory and is renamed into
//! place. Every read is strict: a file that exists but does not parse or
//! validate is `CorruptState`, never a default.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::InterviewConfig;
use crate::error::{InterviewError, Result};
use crate::types::{ConversationState, Profile, Script, Summary};

const SETUP_FILE: &str = "setup.json";
const CONVERSATION_FILE: &str = "conversation.json";
const SUMMARY_FILE: &str = "summary.json";

/// Everything fixed at interview creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSetup {
    pub id: String,
    pub organization: Profile,
    pub candidate: Profile,
    pub script: Script,
    pub config: InterviewConfig,
    pub created_at: f64,
}

/// Interview id from a creation timestamp (Unix seconds)
pub fn new_interview_id(now: f64) -> String {
    format!("interview_{:x}", (now * 1_000_000.0) as u128)
}

/// Ids are used as directory names; anything else is never found
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn slug(text: &str) -> String {
    let slug: String = text
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if slug.is_empty() { "unnamed".to_string() } else { slug }
}

/// Write via temp file + rename so readers never see a partial file
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent directory")
    })?;
    fs::create_dir_all(parent)?;

    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));

    let mut tmp = File::create(&tmp_path)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.sync_all()?;
    drop(tmp);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct InterviewStore {
    root: PathBuf,
}

impl InterviewStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, id: &str, name: &str) -> Option<PathBuf> {
        is_valid_id(id).then(|| self.root.join(id).join(name))
    }

    fn read(&self, id: &str, name: &str) -> Result<Option<String>> {
        let Some(path) = self.file(id, name) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, id: &str, name: &str, contents: &str) -> Result<()> {
        let path = self
            .file(id, name)
            .ok_or_else(|| InterviewError::corrupt(format!("invalid interview id '{}'", id)))?;
        write_atomic(&path, contents)?;
        debug!(path = %path.display(), "saved");
        Ok(())
    }

    pub fn exists(&self, id: &str) -> bool {
        self.file(id, SETUP_FILE).is_some_and(|p| p.exists())
    }

    pub fn save_setup(&self, setup: &InterviewSetup) -> Result<()> {
        self.write(&setup.id, SETUP_FILE, &serde_json::to_string_pretty(setup)?)
    }

    pub fn load_setup(&self, id: &str) -> Result<Option<InterviewSetup>> {
        self.read(id, SETUP_FILE)?
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|e| InterviewError::corrupt(format!("unreadable setup for {}: {}", id, e)))
            })
            .transpose()
    }

    pub fn save_state(&self, id: &str, state: &ConversationState) -> Result<()> {
        self.write(id, CONVERSATION_FILE, &state.to_json()?)
    }

    /// `None` until the interview has been started
    pub fn load_state(&self, id: &str) -> Result<Option<ConversationState>> {
        self.read(id, CONVERSATION_FILE)?
            .map(|json| ConversationState::from_json(&json))
            .transpose()
    }

    pub fn save_summary(&self, id: &str, summary: &Summary) -> Result<()> {
        self.write(id, SUMMARY_FILE, &summary.to_json()?)
    }

    pub fn load_summary(&self, id: &str) -> Result<Option<Summary>> {
        self.read(id, SUMMARY_FILE)?
            .map(|json| Summary::from_json(&json))
            .transpose()
    }
}

/// Write a finished report into `dir`; returns the file path
pub fn save_report(dir: &Path, id: &str, summary: &Summary) -> Result<PathBuf> {
    let path = dir.join(format!(
        "{}_{}_{}_{}.json",
        summary.interview_date,
        slug(&summary.candidate_name),
        slug(&summary.organization_name),
        slug(id),
    ));
    write_atomic(&path, &summary.to_json()?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Question, QuestionType};

    fn setup(id: &str) -> InterviewSetup {
        InterviewSetup {
            id: id.to_string(),
            organization: Profile::new().with_text("name", "Miss Bay"),
            candidate: Profile::new().with_text("name", "Kim"),
            script: Script::new(vec![Question::new(QuestionType::Closing, "Anything else?")]),
            config: InterviewConfig::default(),
            created_at: 10.0,
        }
    }

    #[test]
    fn test_setup_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::new(dir.path());
        assert!(!store.exists("interview_1"));
        store.save_setup(&setup("interview_1")).unwrap();
        assert!(store.exists("interview_1"));
        assert_eq!(store.load_setup("interview_1").unwrap(), Some(setup("interview_1")));
        assert!(store.load_state("interview_1").unwrap().is_none());
    }

    #[test]
    fn test_unsafe_id_is_never_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::new(dir.path());
        assert!(store.load_setup("../etc").unwrap().is_none());
        assert!(store.save_setup(&setup("../etc")).is_err());
    }

    #[test]
    fn test_corrupt_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::new(dir.path());
        store.save_setup(&setup("interview_2")).unwrap();
        fs::write(dir.path().join("interview_2").join(CONVERSATION_FILE), "{\"history\": []}").unwrap();
        let err = store.load_state("interview_2").unwrap_err();
        assert!(matches!(err, InterviewError::CorruptState(_)));
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_atomic(&path, "{}").unwrap();
        write_atomic(&path, "{\"a\": 1}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\": 1}");
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(slug(" Ava Reyes "), "Ava_Reyes");
        assert_eq!(slug("  "), "unnamed");
        assert_eq!(new_interview_id(1.0), "interview_f4240");
    }
}
