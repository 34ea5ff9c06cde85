//! Async entry points must not open transactional scopes: the transaction
//! would bind to the executor thread, not the caller's.

use crate::catalog::{ASYNC_MARKER, TRANSACTIONAL_MARKER};
use crate::definition::RuleDefinition;
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

use super::{first_chain_to, id_matches, methods_with_marker};

pub struct AsyncTransactionEvaluator;

impl Evaluator for AsyncTransactionEvaluator {
    fn name(&self) -> &'static str {
        "async-transaction"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        id_matches(&rule.id, &["ASYNC-TX", "ASYNC-TRANSACTIONAL"])
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for entry in methods_with_marker(ctx, ASYNC_MARKER) {
            if entry.has_annotation(TRANSACTIONAL_MARKER) {
                violations.push(
                    Violation::new(
                        rule.id.clone(),
                        rule.severity,
                        format!(
                            "method '{}' is marked both async and transactional",
                            entry.simple_name
                        ),
                        entry.location.clone(),
                        &entry.fqn,
                    )
                    .with_chain(vec![entry.fqn.clone()])
                    .with_context("entry", entry.fqn.clone()),
                );
                continue;
            }
            let transactional = ctx
                .calls
                .reachable(&entry.fqn, true)
                .into_iter()
                .find(|m| {
                    ctx.model
                        .get_method(m)
                        .is_some_and(|method| method.has_annotation(TRANSACTIONAL_MARKER))
                });
            if let Some(target) = transactional {
                let chain = first_chain_to(ctx, &entry.fqn, &target)
                    .unwrap_or_else(|| vec![entry.fqn.clone(), target.clone()]);
                violations.push(
                    Violation::new(
                        rule.id.clone(),
                        rule.severity,
                        format!(
                            "async method '{}' reaches transactional method '{}'",
                            entry.simple_name, target
                        ),
                        entry.location.clone(),
                        &target,
                    )
                    .with_chain(chain)
                    .with_context("entry", entry.fqn.clone())
                    .with_context("transactional_method", target),
                );
            }
        }
        violations
    }
}
