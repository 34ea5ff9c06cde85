//! Retryable methods must not reach non-idempotent sinks: a retry would
//! repeat the mail, the charge, or the published message.

use regex::Regex;

use girder_model::names::method_name_of;

use crate::catalog::{
    NON_IDEMPOTENT_METHOD_PREFIXES, NON_IDEMPOTENT_NAME_PATTERNS, NON_IDEMPOTENT_SINK_TYPES,
    RETRYABLE_MARKER,
};
use crate::definition::RuleDefinition;
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

use super::{first_chain_to, id_matches, methods_with_marker};

pub struct RetryIdempotencyEvaluator;

impl Evaluator for RetryIdempotencyEvaluator {
    fn name(&self) -> &'static str {
        "retry-idempotency"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        id_matches(&rule.id, &["RETRY-IDEMPOTENCY", "RETRY"])
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        let mut patterns: Vec<Regex> = NON_IDEMPOTENT_NAME_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        if let Some(constraints) = &rule.constraints {
            // Validated at load time; a miss here only narrows the rule.
            patterns.extend(
                constraints
                    .forbidden_calls
                    .iter()
                    .filter_map(|p| Regex::new(p).ok()),
            );
        }

        let mut violations = Vec::new();
        for entry in methods_with_marker(ctx, RETRYABLE_MARKER) {
            for reached in ctx.calls.reachable(&entry.fqn, true) {
                let reason = if is_non_idempotent_sink(&reached) {
                    Some("non-idempotent sink")
                } else if patterns.iter().any(|p| p.is_match(&reached)) {
                    Some("name pattern")
                } else {
                    None
                };
                let Some(reason) = reason else { continue };
                let chain = first_chain_to(ctx, &entry.fqn, &reached)
                    .unwrap_or_else(|| vec![entry.fqn.clone(), reached.clone()]);
                violations.push(
                    Violation::new(
                        rule.id.clone(),
                        rule.severity,
                        format!(
                            "retryable method '{}' reaches non-idempotent operation '{}'",
                            entry.fqn, reached
                        ),
                        entry.location.clone(),
                        &reached,
                    )
                    .with_chain(chain)
                    .with_context("entry", entry.fqn.clone())
                    .with_context("sink", reached.clone())
                    .with_context("reason", reason),
                );
            }
        }
        violations
    }
}

fn is_non_idempotent_sink(fqn: &str) -> bool {
    let type_hit = NON_IDEMPOTENT_SINK_TYPES.iter().any(|t| fqn.contains(t));
    if !type_hit {
        return false;
    }
    method_name_of(fqn).is_some_and(|name| {
        NON_IDEMPOTENT_METHOD_PREFIXES
            .iter()
            .any(|p| name.starts_with(p))
    })
}
