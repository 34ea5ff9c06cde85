//! Declarative rule records and their loader.
//!
//! Rules are JSON files, one rule per file. A file that fails to parse,
//! lacks an id, or carries a malformed regex invalidates only that rule;
//! everything else in the directory loads normally.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{Error, Result};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Blocker,
    Error,
    Warn,
    Info,
}

impl Severity {
    /// Rank for report ordering; BLOCKER sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Blocker => 0,
            Severity::Error => 1,
            Severity::Warn => 2,
            Severity::Info => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Blocker => "BLOCKER",
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
        };
        f.write_str(s)
    }
}

/// Selects the entry methods a rule applies to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSelector {
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub name_pattern: Option<String>,
    #[serde(default)]
    pub type_fqns: Vec<String>,
}

/// Forbidden/required relations checked along reachable paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConstraints {
    #[serde(default)]
    pub forbidden_annotations: Vec<String>,
    #[serde(default)]
    pub forbidden_calls: Vec<String>,
    #[serde(default)]
    pub forbidden_packages: Vec<String>,
    #[serde(default)]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntrySelector {
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkSelector {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathConstraints {
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub must_contain: Vec<String>,
    #[serde(default)]
    pub must_not_contain: Vec<String>,
}

/// Generic path-reachability detection block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionSpec {
    #[serde(default)]
    pub entry_points: EntrySelector,
    #[serde(default)]
    pub sinks: SinkSelector,
    #[serde(default)]
    pub path_constraints: PathConstraints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub target: Option<TargetSelector>,
    #[serde(default)]
    pub constraints: Option<RuleConstraints>,
    #[serde(default)]
    pub detection: Option<DetectionSpec>,
    #[serde(default)]
    pub remediation: Option<String>,
}

impl RuleDefinition {
    /// Load-time validation: non-empty id and compilable regexes.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("rule id must not be empty".to_owned());
        }
        let mut patterns: Vec<&str> = Vec::new();
        if let Some(target) = &self.target {
            if let Some(p) = &target.name_pattern {
                patterns.push(p);
            }
        }
        if let Some(constraints) = &self.constraints {
            patterns.extend(constraints.forbidden_calls.iter().map(String::as_str));
            patterns.extend(constraints.forbidden_packages.iter().map(String::as_str));
        }
        if let Some(detection) = &self.detection {
            patterns.extend(detection.sinks.patterns.iter().map(String::as_str));
        }
        for pattern in patterns {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(format!("malformed pattern '{pattern}': {e}"));
            }
        }
        Ok(())
    }

    pub fn max_search_depth(&self) -> usize {
        let requested = self
            .constraints
            .as_ref()
            .and_then(|c| c.max_depth)
            .unwrap_or(girder_graph::MAX_DEPTH);
        requested.min(girder_graph::MAX_DEPTH)
    }
}

/// Load every `.json` rule under `dir`, in sorted path order. Invalid rules
/// are logged and skipped; I/O failures are fatal.
pub fn load_rules(dir: &Path) -> Result<Vec<RuleDefinition>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut rules = Vec::new();
    for path in paths {
        let text = fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        match serde_json::from_str::<RuleDefinition>(&text) {
            Ok(rule) => match rule.validate() {
                Ok(()) => rules.push(rule),
                Err(reason) => {
                    error!(file = %path.display(), %reason, "skipping invalid rule");
                }
            },
            Err(reason) => {
                error!(file = %path.display(), %reason, "skipping unparseable rule file");
            }
        }
    }
    Ok(rules)
}
