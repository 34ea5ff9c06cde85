//! Violation records with stable fingerprints.

use indexmap::IndexMap;
use serde::Serialize;

use girder_model::Location;

use crate::definition::Severity;

/// One finding. The fingerprint identifies the logical finding across runs
/// so downstream consumers can discard re-emissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_chain: Option<Vec<String>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub context: IndexMap<String, String>,
    pub fingerprint: String,
}

impl Violation {
    /// `subject` is the salient identity of the finding (the forbidden
    /// target FQN, the table name, the cycle) and feeds the fingerprint
    /// together with the rule id and location.
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
        subject: &str,
    ) -> Self {
        let rule_id = rule_id.into();
        let fingerprint = fingerprint(&rule_id, &location, subject);
        Self {
            rule_id,
            severity,
            message: message.into(),
            location,
            call_chain: None,
            context: IndexMap::new(),
            fingerprint,
        }
    }

    pub fn with_chain(mut self, chain: Vec<String>) -> Self {
        self.call_chain = Some(chain);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Stable hash of a violation's identity.
fn fingerprint(rule_id: &str, location: &Location, subject: &str) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(rule_id.as_bytes());
    hasher.update(b"|");
    hasher.update(location.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(subject.as_bytes());
    format!("{:08x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_across_constructions() {
        let a = Violation::new(
            "TX-BOUNDARY-001",
            Severity::Error,
            "first message",
            Location::new("A.java", 10, 4),
            "net.HttpClient#post()",
        );
        let b = Violation::new(
            "TX-BOUNDARY-001",
            Severity::Error,
            "different message, same identity",
            Location::new("A.java", 10, 4),
            "net.HttpClient#post()",
        );
        assert_eq!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn fingerprint_varies_with_identity() {
        let base = Violation::new(
            "R1",
            Severity::Warn,
            "m",
            Location::new("A.java", 1, 0),
            "s",
        );
        let other_rule =
            Violation::new("R2", Severity::Warn, "m", Location::new("A.java", 1, 0), "s");
        let other_line =
            Violation::new("R1", Severity::Warn, "m", Location::new("A.java", 2, 0), "s");
        let other_subject =
            Violation::new("R1", Severity::Warn, "m", Location::new("A.java", 1, 0), "t");
        assert_ne!(base.fingerprint, other_rule.fingerprint);
        assert_ne!(base.fingerprint, other_line.fingerprint);
        assert_ne!(base.fingerprint, other_subject.fingerprint);
    }

    #[test]
    fn serializes_to_stable_schema() {
        let v = Violation::new(
            "R1",
            Severity::Blocker,
            "boom",
            Location::new("A.java", 3, 1),
            "s",
        )
        .with_chain(vec!["a.A#m()".to_owned()])
        .with_context("sink", "s");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["severity"], "BLOCKER");
        assert_eq!(json["location"]["file"], "A.java");
        assert_eq!(json["location"]["line"], 3);
        assert_eq!(json["call_chain"][0], "a.A#m()");
        assert_eq!(json["context"]["sink"], "s");
        assert!(json["fingerprint"].is_string());
    }

    #[test]
    fn empty_optionals_are_omitted() {
        let v = Violation::new(
            "R1",
            Severity::Info,
            "m",
            Location::new("A.java", 1, 0),
            "s",
        );
        let json = serde_json::to_value(&v).unwrap();
        assert!(json.get("call_chain").is_none());
        assert!(json.get("context").is_none());
    }
}
