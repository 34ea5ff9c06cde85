//! Scheduled jobs run unattended; without a retry or circuit-breaker
//! marker anywhere in reach, a transient failure loses the whole run.

use crate::catalog::{RESILIENCE_MARKERS, SCHEDULED_MARKER};
use crate::definition::RuleDefinition;
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

use super::{id_matches, methods_with_marker};

pub struct ScheduledResiliencyEvaluator;

impl Evaluator for ScheduledResiliencyEvaluator {
    fn name(&self) -> &'static str {
        "scheduled-resiliency"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        id_matches(&rule.id, &["SCHEDULED-RESILIENCY", "SCHEDULED"])
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for entry in methods_with_marker(ctx, SCHEDULED_MARKER) {
            if has_resilience_marker(ctx, &entry.fqn) {
                continue;
            }
            let covered = ctx
                .calls
                .reachable(&entry.fqn, true)
                .iter()
                .any(|m| has_resilience_marker(ctx, m));
            if covered {
                continue;
            }
            violations.push(
                Violation::new(
                    rule.id.clone(),
                    rule.severity,
                    format!(
                        "scheduled method '{}' has no retry or circuit breaker in reach",
                        entry.fqn
                    ),
                    entry.location.clone(),
                    &entry.fqn,
                )
                .with_chain(vec![entry.fqn.clone()])
                .with_context("entry", entry.fqn.clone()),
            );
        }
        violations
    }
}

fn has_resilience_marker(ctx: &EvalContext<'_>, method: &str) -> bool {
    ctx.model.get_method(method).is_some_and(|m| {
        RESILIENCE_MARKERS
            .iter()
            .any(|marker| m.has_annotation(marker))
    })
}
