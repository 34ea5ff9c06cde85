//! Full pipeline: scan, build, graph, evaluate, report.

use std::path::Path;

use girder_graph::{CallGraph, DependencyGraph};
use girder_rules::{assemble, load_rules, AnalysisConfig, Report, Verdict};

use super::build_or_exit;
use crate::cli::{FailLevel, OutputFormat};

pub fn run(repo: &Path, rules_dir: &Path, format: OutputFormat, fail_level: FailLevel) -> i32 {
    let rules = load_rules(rules_dir).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let out = build_or_exit(repo);
    let calls = CallGraph::build(&out.model, &out.edges);
    let deps = DependencyGraph::build(&out.model);

    let violations = girder_rules::evaluate(&rules, &out.model, &calls, &deps);
    let config = AnalysisConfig {
        fail_level: fail_level.severity(),
    };
    let report = assemble(violations, &config);

    match format {
        OutputFormat::Json => println!("{}", report.to_json()),
        OutputFormat::Text => print_text(&report),
    }
    report.exit_code()
}

fn print_text(report: &Report) {
    for v in &report.violations {
        println!("{} [{}] {} - {}", v.severity, v.rule_id, v.location, v.message);
        if let Some(chain) = &v.call_chain {
            for (i, node) in chain.iter().enumerate() {
                println!("    {}{}", "  ".repeat(i), node);
            }
        }
    }
    println!(
        "{} violations ({} blocker, {} error, {} warn, {} info)",
        report.summary.total(),
        report.summary.blocker,
        report.summary.error,
        report.summary.warn,
        report.summary.info
    );
    match report.verdict {
        Verdict::Pass => println!("PASS"),
        Verdict::Fail => println!("FAIL"),
    }
}
