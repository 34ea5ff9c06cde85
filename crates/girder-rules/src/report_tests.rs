use girder_model::Location;

use crate::definition::Severity;
use crate::report::{assemble, AnalysisConfig, Verdict};
use crate::violation::Violation;

fn violation(rule: &str, severity: Severity, file: &str, line: u32, subject: &str) -> Violation {
    Violation::new(
        rule,
        severity,
        format!("{rule} at {file}:{line}"),
        Location::new(file, line, 0),
        subject,
    )
}

#[test]
fn duplicate_fingerprints_keep_first_occurrence() {
    let first = violation("R1", Severity::Warn, "A.java", 5, "x");
    let mut second = violation("R1", Severity::Warn, "A.java", 5, "x");
    second.message = "re-emission".to_owned();

    let report = assemble(vec![first, second], &AnalysisConfig::default());
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].message, "R1 at A.java:5");
}

#[test]
fn ordering_is_severity_then_file_then_line() {
    let report = assemble(
        vec![
            violation("R1", Severity::Info, "a.java", 1, "1"),
            violation("R2", Severity::Blocker, "z.java", 9, "2"),
            violation("R3", Severity::Error, "b.java", 2, "3"),
            violation("R4", Severity::Blocker, "a.java", 7, "4"),
            violation("R5", Severity::Blocker, "a.java", 3, "5"),
        ],
        &AnalysisConfig::default(),
    );
    let order: Vec<&str> = report
        .violations
        .iter()
        .map(|v| v.rule_id.as_str())
        .collect();
    assert_eq!(order, vec!["R5", "R4", "R2", "R3", "R1"]);
}

#[test]
fn verdict_fails_only_on_blockers_by_default() {
    let pass = assemble(
        vec![
            violation("R1", Severity::Error, "a.java", 1, "1"),
            violation("R2", Severity::Warn, "a.java", 2, "2"),
        ],
        &AnalysisConfig::default(),
    );
    assert_eq!(pass.verdict, Verdict::Pass);
    assert_eq!(pass.exit_code(), 0);

    let fail = assemble(
        vec![violation("R3", Severity::Blocker, "a.java", 1, "1")],
        &AnalysisConfig::default(),
    );
    assert_eq!(fail.verdict, Verdict::Fail);
    assert_eq!(fail.exit_code(), 1);
}

#[test]
fn fail_level_knob_tightens_the_verdict() {
    let config = AnalysisConfig {
        fail_level: Severity::Error,
    };
    let report = assemble(
        vec![violation("R1", Severity::Error, "a.java", 1, "1")],
        &config,
    );
    assert_eq!(report.verdict, Verdict::Fail);

    let warn_only = assemble(
        vec![violation("R2", Severity::Warn, "a.java", 1, "1")],
        &config,
    );
    assert_eq!(warn_only.verdict, Verdict::Pass);
}

#[test]
fn summary_counts_each_severity() {
    let report = assemble(
        vec![
            violation("R1", Severity::Blocker, "a.java", 1, "1"),
            violation("R2", Severity::Error, "a.java", 2, "2"),
            violation("R3", Severity::Error, "a.java", 3, "3"),
            violation("R4", Severity::Info, "a.java", 4, "4"),
        ],
        &AnalysisConfig::default(),
    );
    assert_eq!(report.summary.blocker, 1);
    assert_eq!(report.summary.error, 2);
    assert_eq!(report.summary.warn, 0);
    assert_eq!(report.summary.info, 1);
    assert_eq!(report.summary.total(), 4);
    assert_eq!(report.summary.count(Severity::Error), 2);
}

#[test]
fn empty_input_passes() {
    let report = assemble(Vec::new(), &AnalysisConfig::default());
    assert_eq!(report.verdict, Verdict::Pass);
    assert_eq!(report.summary.total(), 0);
    assert!(report.violations.is_empty());
}

#[test]
fn json_rendering_carries_the_schema() {
    let report = assemble(
        vec![violation("R1", Severity::Blocker, "a.java", 1, "1")],
        &AnalysisConfig::default(),
    );
    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["verdict"], "FAIL");
    assert_eq!(json["summary"]["blocker"], 1);
    assert_eq!(json["violations"][0]["rule_id"], "R1");
}
