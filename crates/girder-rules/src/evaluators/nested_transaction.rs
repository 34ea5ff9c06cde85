//! A transactional method reaching another transactional method nests
//! scopes; with default propagation the inner marker is silently absorbed.

use crate::catalog::TRANSACTIONAL_MARKER;
use crate::definition::RuleDefinition;
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

use super::{first_chain_to, id_matches, methods_with_marker};

pub struct NestedTransactionEvaluator;

impl Evaluator for NestedTransactionEvaluator {
    fn name(&self) -> &'static str {
        "nested-transaction"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        id_matches(&rule.id, &["NESTED-TX", "NESTED-TRANSACTION"])
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for entry in methods_with_marker(ctx, TRANSACTIONAL_MARKER) {
            for reached in ctx.calls.reachable(&entry.fqn, true) {
                if reached == entry.fqn {
                    continue;
                }
                let inner_transactional = ctx
                    .model
                    .get_method(&reached)
                    .is_some_and(|m| m.has_annotation(TRANSACTIONAL_MARKER));
                if !inner_transactional {
                    continue;
                }
                let chain = first_chain_to(ctx, &entry.fqn, &reached)
                    .unwrap_or_else(|| vec![entry.fqn.clone(), reached.clone()]);
                violations.push(
                    Violation::new(
                        rule.id.clone(),
                        rule.severity,
                        format!(
                            "transactional method '{}' reaches transactional method '{}'",
                            entry.fqn, reached
                        ),
                        entry.location.clone(),
                        &reached,
                    )
                    .with_chain(chain)
                    .with_context("outer", entry.fqn.clone())
                    .with_context("inner", reached),
                );
            }
        }
        violations
    }
}
