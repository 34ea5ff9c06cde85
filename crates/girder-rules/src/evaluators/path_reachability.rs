//! Generic path-reachability rules: a detection block names entry points
//! and sinks; every surviving (entry, chain) pair is a violation. Runs last
//! in the registry so family evaluators keyed by rule id win dispatch.

use indexmap::IndexSet;
use regex::Regex;

use girder_graph::MAX_DEPTH;

use crate::definition::{PathConstraints, RuleDefinition};
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

pub struct PathReachabilityEvaluator;

impl Evaluator for PathReachabilityEvaluator {
    fn name(&self) -> &'static str {
        "path-reachability"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        rule.detection.is_some()
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        let Some(detection) = &rule.detection else {
            return Vec::new();
        };

        let mut entries: IndexSet<String> = IndexSet::new();
        for annotation in &detection.entry_points.annotations {
            entries.extend(
                ctx.model
                    .methods_by_annotation(annotation)
                    .map(|m| m.fqn.clone()),
            );
        }
        for type_fqn in &detection.entry_points.types {
            entries.extend(ctx.model.methods_in_type(type_fqn).map(|m| m.fqn.clone()));
        }

        let sink_patterns: Vec<Regex> = detection
            .sinks
            .patterns
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();

        let mut violations = Vec::new();
        for entry in &entries {
            let mut chains: Vec<Vec<String>> = Vec::new();
            for sink_type in &detection.sinks.types {
                chains.extend(ctx.calls.chains_to_sink(entry, &format!("{sink_type}#")));
            }
            for annotation in &detection.sinks.annotations {
                for target in ctx.model.methods_by_annotation(annotation) {
                    if target.fqn == *entry {
                        continue;
                    }
                    chains.extend(ctx.calls.chains_to(entry, &target.fqn, true));
                }
            }
            if !sink_patterns.is_empty() {
                for chain in ctx.calls.chains(entry, true) {
                    let hit = chain
                        .last()
                        .is_some_and(|last| sink_patterns.iter().any(|p| p.is_match(last)));
                    if hit {
                        chains.push(chain);
                    }
                }
            }

            for chain in chains {
                if !passes_constraints(&chain, &detection.path_constraints) {
                    continue;
                }
                let target = chain.last().cloned().unwrap_or_default();
                let entry_location = ctx
                    .model
                    .get_method(entry)
                    .map(|m| m.location.clone())
                    .unwrap_or_else(|| girder_model::Location::synthetic("unknown"));
                violations.push(
                    Violation::new(
                        rule.id.clone(),
                        rule.severity,
                        format!("method '{entry}' reaches '{target}'"),
                        entry_location,
                        &target,
                    )
                    .with_chain(chain)
                    .with_context("entry", entry.clone())
                    .with_context("sink", target.clone()),
                );
            }
        }
        violations
    }
}

fn passes_constraints(chain: &[String], constraints: &PathConstraints) -> bool {
    let max_depth = constraints.max_depth.unwrap_or(MAX_DEPTH).min(MAX_DEPTH);
    if chain.len().saturating_sub(1) > max_depth {
        return false;
    }
    for needle in &constraints.must_contain {
        if !chain.iter().any(|node| node.contains(needle)) {
            return false;
        }
    }
    for needle in &constraints.must_not_contain {
        if chain.iter().any(|node| node.contains(needle)) {
            return false;
        }
    }
    true
}
