//! Organization and candidate profiles
//!
//! A profile is an opaque field map produced by the profile parser. The core
//! only reads it.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// A profile field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Text(String),
    List(Vec<String>),
    Records(Vec<BTreeMap<String, String>>),
}

/// Field map for an organization or a candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    fields: BTreeMap<String, ProfileValue>,
}

/// Experience entry keys, in lookup priority order
const EXPERIENCE_KEYS: [&str; 3] = ["activity", "organization", "event"];

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, ProfileValue::Text(value.into()));
        self
    }

    pub fn with_list<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(key, ProfileValue::List(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Add an `experiences`-style list of single-field records
    pub fn with_records<I, K, V>(mut self, key: impl Into<String>, records: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let records = records
            .into_iter()
            .map(|(k, v)| {
                let mut map = BTreeMap::new();
                map.insert(k.into(), v.into());
                map
            })
            .collect();
        self.set(key, ProfileValue::Records(records));
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: ProfileValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ProfileValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Text field, trimmed; blank counts as absent
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(ProfileValue::Text(s)) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    /// List field; a text field is treated as a one-item list
    pub fn list(&self, key: &str) -> Vec<&str> {
        match self.fields.get(key) {
            Some(ProfileValue::List(items)) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(ProfileValue::Text(s)) if !s.trim().is_empty() => vec![s.trim()],
            _ => Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn values(&self) -> Vec<&str> {
        self.list("values")
    }

    pub fn skills(&self) -> Vec<&str> {
        self.list("skills")
    }

    pub fn platform(&self) -> Option<&str> {
        self.text("platform")
    }

    pub fn demographic(&self) -> Option<&str> {
        self.text("demographic")
    }

    pub fn current_issue(&self) -> Option<&str> {
        self.text("current_issue")
    }

    /// Subject of each experience entry (`activity`, else `organization`,
    /// else `event`); `None` for entries carrying none of them.
    ///
    /// Plain list entries are taken as activities.
    pub fn experience_subjects(&self) -> Vec<Option<&str>> {
        match self.fields.get("experiences") {
            Some(ProfileValue::Records(records)) => records
                .iter()
                .map(|record| {
                    EXPERIENCE_KEYS
                        .iter()
                        .find_map(|k| record.get(*k))
                        .map(|s| s.trim())
                        .filter(|s| !s.is_empty())
                })
                .collect(),
            Some(ProfileValue::List(items)) => items
                .iter()
                .map(|s| Some(s.trim()).filter(|s| !s.is_empty()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_absent() {
        let profile = Profile::new().with_text("name", "   ");
        assert_eq!(profile.name(), None);
    }

    #[test]
    fn test_experience_subject_priority() {
        let mut first = BTreeMap::new();
        first.insert("event".to_string(), "Gala".to_string());
        first.insert("activity".to_string(), "Tutoring".to_string());
        let mut second = BTreeMap::new();
        second.insert("organization".to_string(), "Red Cross".to_string());
        let mut third = BTreeMap::new();
        third.insert("type".to_string(), "leadership".to_string());

        let mut profile = Profile::new();
        profile.set("experiences", ProfileValue::Records(vec![first, second, third]));

        assert_eq!(
            profile.experience_subjects(),
            vec![Some("Tutoring"), Some("Red Cross"), None]
        );
    }

    #[test]
    fn test_untagged_round_trip() {
        let profile = Profile::new()
            .with_text("name", "Ava")
            .with_list("skills", ["singing", "debate"])
            .with_records("experiences", [("activity", "food bank")]);

        let json = serde_json::to_string(&profile).unwrap();
        let restored: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, profile);
        assert_eq!(restored.skills(), vec!["singing", "debate"]);
    }
}
