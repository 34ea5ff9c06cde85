//! Layered-architecture checks: methods in a source layer (selected by
//! regex) must not reach methods of a forbidden layer.

use regex::Regex;

use crate::definition::RuleDefinition;
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

use super::{first_chain_to, id_matches};

pub struct LayeringEvaluator;

impl Evaluator for LayeringEvaluator {
    fn name(&self) -> &'static str {
        "layering"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        id_matches(&rule.id, &["LAYERING", "LAYER"])
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        let Some(source_pattern) = rule
            .target
            .as_ref()
            .and_then(|t| t.name_pattern.as_deref())
            .and_then(|p| Regex::new(p).ok())
        else {
            return Vec::new();
        };
        let forbidden: Vec<Regex> = rule
            .constraints
            .as_ref()
            .map(|c| {
                c.forbidden_calls
                    .iter()
                    .chain(c.forbidden_packages.iter())
                    .filter_map(|p| Regex::new(p).ok())
                    .collect()
            })
            .unwrap_or_default();
        if forbidden.is_empty() {
            return Vec::new();
        }

        let mut violations = Vec::new();
        for entry in ctx.model.methods() {
            if !source_pattern.is_match(&entry.fqn) {
                continue;
            }
            for reached in ctx.calls.reachable(&entry.fqn, true) {
                if !forbidden.iter().any(|p| p.is_match(&reached)) {
                    continue;
                }
                let chain = first_chain_to(ctx, &entry.fqn, &reached)
                    .unwrap_or_else(|| vec![entry.fqn.clone(), reached.clone()]);
                violations.push(
                    Violation::new(
                        rule.id.clone(),
                        rule.severity,
                        format!(
                            "method '{}' reaches forbidden layer via '{}'",
                            entry.fqn, reached
                        ),
                        entry.location.clone(),
                        &reached,
                    )
                    .with_chain(chain)
                    .with_context("entry", entry.fqn.clone())
                    .with_context("forbidden", reached),
                );
            }
        }
        violations
    }
}
