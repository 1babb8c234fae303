//! ProfileParser: free text → Profile
//!
//! Line based. `Key: value` lines become fields (key lowercased, spaces →
//! `_`). In candidate text a line ending in `:` opens a section whose
//! following plain lines are collected as a list.
//!
//! A missing `name` is left missing; the script builder reports it.

use std::collections::BTreeMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use crate::types::{Profile, ProfileValue};

lazy_static! {
    static ref RE_FIELD: Regex = Regex::new(r"^([^:]+):(.*)$").unwrap();
    static ref RE_BULLET: Regex = Regex::new(r"^(?:[-*•]\s+|\d+[.)]\s+)").unwrap();
}

const DEFAULT_VALUES: [&str; 3] = ["leadership", "service", "excellence"];
const DEFAULT_ISSUE: &str = "community service";
const DEFAULT_DEMOGRAPHIC: &str = "young women";
const DEFAULT_SKILLS: [&str; 3] = ["public speaking", "leadership", "community service"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Organization,
    Candidate,
}

#[derive(Debug, Clone, Copy)]
pub struct ProfileParser {
    kind: ProfileKind,
}

impl ProfileParser {
    pub fn new(kind: ProfileKind) -> Self {
        Self { kind }
    }

    pub fn organization() -> Self {
        Self::new(ProfileKind::Organization)
    }

    pub fn candidate() -> Self {
        Self::new(ProfileKind::Candidate)
    }

    pub fn parse(&self, text: &str) -> Profile {
        let profile = match self.kind {
            ProfileKind::Organization => parse_organization(text),
            ProfileKind::Candidate => parse_candidate(text),
        };
        debug!(kind = ?self.kind, has_name = profile.name().is_some(), "profile parsed");
        profile
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn field(line: &str) -> Option<(String, String)> {
    let caps = RE_FIELD.captures(line)?;
    Some((normalize_key(&caps[1]), caps[2].trim().to_string()))
}

fn parse_organization(text: &str) -> Profile {
    let mut profile = Profile::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((key, value)) = field(line) else {
            continue;
        };
        match key.as_str() {
            "values" | "core_values" => {
                profile.set("values", ProfileValue::List(split_list(&value)));
            }
            "current_issues" | "focus_issues" => {
                let issues = split_list(&value);
                if let Some(first) = issues.first() {
                    profile.set("current_issue", ProfileValue::Text(first.clone()));
                }
                profile.set("current_issues", ProfileValue::List(issues));
            }
            _ => profile.set(key, ProfileValue::Text(value)),
        }
    }

    if profile.values().is_empty() {
        profile.set("values", ProfileValue::List(DEFAULT_VALUES.map(String::from).to_vec()));
    }
    if profile.current_issue().is_none() {
        profile.set("current_issue", ProfileValue::Text(DEFAULT_ISSUE.to_string()));
        profile.set("current_issues", ProfileValue::List(vec![DEFAULT_ISSUE.to_string()]));
    }
    profile
}

/// Where plain lines under a section header go
enum Section {
    None,
    Skills,
    Experiences,
    Other(String),
}

fn parse_candidate(text: &str) -> Profile {
    let mut profile = Profile::new();
    let mut skills: Vec<String> = Vec::new();
    let mut experiences: Vec<String> = Vec::new();
    let mut sections: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut section = Section::None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(header) = line.strip_suffix(':') {
            let key = normalize_key(header);
            section = match key.as_str() {
                // A header continues whatever inline items the field already has
                "skills" | "talents" => Section::Skills,
                "experience" | "experiences" | "activities" => Section::Experiences,
                _ => {
                    sections.entry(key.clone()).or_default();
                    Section::Other(key)
                }
            };
            continue;
        }

        if let Some((key, value)) = field(line) {
            match key.as_str() {
                "skills" | "talents" => skills.extend(split_list(&value)),
                "experience" | "experiences" | "activities" => experiences.extend(split_list(&value)),
                _ => profile.set(key, ProfileValue::Text(value)),
            }
            continue;
        }

        let item = RE_BULLET.replace(line, "").trim().to_string();
        if item.is_empty() {
            continue;
        }
        match &section {
            Section::None => {}
            Section::Skills => skills.push(item),
            Section::Experiences => experiences.push(item),
            Section::Other(key) => sections.entry(key.clone()).or_default().push(item),
        }
    }

    for (key, items) in sections {
        profile.set(key, ProfileValue::List(items));
    }

    if profile.platform().is_none() {
        if let Some(first) = experiences.first() {
            profile.set("platform", ProfileValue::Text(format!("Advocacy for {}", first)));
        }
    }
    let records = experiences
        .into_iter()
        .map(|activity| BTreeMap::from([("activity".to_string(), activity)]))
        .collect();
    profile.set("experiences", ProfileValue::Records(records));

    if profile.demographic().is_none() {
        profile.set("demographic", ProfileValue::Text(DEFAULT_DEMOGRAPHIC.to_string()));
    }
    if skills.is_empty() {
        skills = DEFAULT_SKILLS.map(String::from).to_vec();
    }
    profile.set("skills", ProfileValue::List(skills));
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_organization_fields_and_lists() {
        let profile = ProfileParser::organization().parse(
            "Name: Miss Riverside\n\
             Core Values: integrity, service , courage\n\
             Focus Issues: literacy, clean water\n\
             Founded: 1952\n",
        );
        assert_eq!(profile.name(), Some("Miss Riverside"));
        assert_eq!(profile.values(), vec!["integrity", "service", "courage"]);
        assert_eq!(profile.current_issue(), Some("literacy"));
        assert_eq!(profile.text("founded"), Some("1952"));
    }

    #[test]
    fn test_organization_defaults_but_no_name() {
        let profile = ProfileParser::organization().parse("Motto: rise together");
        assert_eq!(profile.name(), None);
        assert_eq!(profile.values(), vec!["leadership", "service", "excellence"]);
        assert_eq!(profile.current_issue(), Some("community service"));
    }

    #[test]
    fn test_candidate_fields_sections_and_defaults() {
        let profile = ProfileParser::candidate().parse(
            "Name: Ava Reyes\n\
             Talents: piano, debate\n\
             Activities: food bank volunteering\n\
             Experiences:\n\
             - Girl Scouts troop leader\n\
             - Hospital volunteer\n\
             Awards:\n\
             * Regional debate champion\n",
        );
        assert_eq!(profile.name(), Some("Ava Reyes"));
        assert_eq!(profile.skills(), vec!["piano", "debate"]);
        assert_eq!(
            profile.experience_subjects(),
            vec![
                Some("food bank volunteering"),
                Some("Girl Scouts troop leader"),
                Some("Hospital volunteer"),
            ]
        );
        assert_eq!(profile.platform(), Some("Advocacy for food bank volunteering"));
        assert_eq!(profile.demographic(), Some("young women"));
        assert_eq!(profile.list("awards"), vec!["Regional debate champion"]);
    }

    #[test]
    fn test_section_header_appends_to_inline_items() {
        let profile = ProfileParser::candidate().parse(
            "Name: Jo\n\
             Talents: piano\n\
             Talents:\n\
             - chess\n",
        );
        assert_eq!(profile.skills(), vec!["piano", "chess"]);
    }

    #[test]
    fn test_candidate_explicit_platform_and_default_skills() {
        let profile = ProfileParser::candidate().parse(
            "Name: Sam\nPlatform: Mental health awareness\nDemographic: teens\n",
        );
        assert_eq!(profile.platform(), Some("Mental health awareness"));
        assert_eq!(profile.demographic(), Some("teens"));
        assert_eq!(profile.skills(), vec!["public speaking", "leadership", "community service"]);
        assert!(profile.experience_subjects().is_empty());
    }
}
