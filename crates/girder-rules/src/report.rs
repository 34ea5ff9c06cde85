//! Report assembly: deduplication, ordering, summary, verdict.

use indexmap::IndexSet;
use serde::Serialize;

use crate::definition::Severity;
use crate::violation::Violation;

/// Policy knobs for the final verdict. By default only BLOCKER findings
/// fail the run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Most lenient severity that still fails the run.
    pub fail_level: Severity,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fail_level: Severity::Blocker,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Violation counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub blocker: usize,
    pub error: usize,
    pub warn: usize,
    pub info: usize,
}

impl Summary {
    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Blocker => self.blocker,
            Severity::Error => self.error,
            Severity::Warn => self.warn,
            Severity::Info => self.info,
        }
    }

    pub fn total(&self) -> usize {
        self.blocker + self.error + self.warn + self.info
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub violations: Vec<Violation>,
    pub summary: Summary,
    pub verdict: Verdict,
}

impl Report {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_owned())
    }

    /// Process exit code: 0 on PASS, 1 on FAIL.
    pub fn exit_code(&self) -> i32 {
        match self.verdict {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }
}

/// Deduplicate by fingerprint (first occurrence wins), order by
/// (severity, file, line, column), count, and decide the verdict.
pub fn assemble(violations: Vec<Violation>, config: &AnalysisConfig) -> Report {
    let mut seen: IndexSet<String> = IndexSet::new();
    let mut kept: Vec<Violation> = violations
        .into_iter()
        .filter(|v| seen.insert(v.fingerprint.clone()))
        .collect();
    kept.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| a.location.cmp(&b.location))
    });

    let mut summary = Summary::default();
    for v in &kept {
        match v.severity {
            Severity::Blocker => summary.blocker += 1,
            Severity::Error => summary.error += 1,
            Severity::Warn => summary.warn += 1,
            Severity::Info => summary.info += 1,
        }
    }

    let failing = kept
        .iter()
        .any(|v| v.severity.rank() <= config.fail_level.rank());
    Report {
        violations: kept,
        summary,
        verdict: if failing { Verdict::Fail } else { Verdict::Pass },
    }
}
