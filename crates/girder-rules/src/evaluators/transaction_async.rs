//! Transactional scopes must not hand work to async methods: the spawned
//! work escapes the transaction and commits or rolls back independently.

use crate::catalog::{ASYNC_MARKER, TRANSACTIONAL_MARKER};
use crate::definition::RuleDefinition;
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

use super::{first_chain_to, id_matches, methods_with_marker};

pub struct TransactionAsyncEvaluator;

impl Evaluator for TransactionAsyncEvaluator {
    fn name(&self) -> &'static str {
        "transaction-async"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        id_matches(&rule.id, &["TX-ASYNC", "TRANSACTIONAL-ASYNC"])
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for entry in methods_with_marker(ctx, TRANSACTIONAL_MARKER) {
            for reached in ctx.calls.reachable(&entry.fqn, true) {
                let is_async = ctx
                    .model
                    .get_method(&reached)
                    .is_some_and(|m| m.has_annotation(ASYNC_MARKER));
                if !is_async {
                    continue;
                }
                let chain = first_chain_to(ctx, &entry.fqn, &reached)
                    .unwrap_or_else(|| vec![entry.fqn.clone(), reached.clone()]);
                violations.push(
                    Violation::new(
                        rule.id.clone(),
                        rule.severity,
                        format!(
                            "transactional method '{}' invokes async method '{}'",
                            entry.fqn, reached
                        ),
                        entry.location.clone(),
                        &reached,
                    )
                    .with_chain(chain)
                    .with_context("entry", entry.fqn.clone())
                    .with_context("async_method", reached),
                );
            }
        }
        violations
    }
}
