//! Transactional scopes must not reach remote-client sinks: a network call
//! inside an open transaction pins the connection for the full round trip.

use crate::catalog::{REMOTE_SINK_TYPES, TRANSACTIONAL_MARKER};
use crate::definition::RuleDefinition;
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

use super::{id_matches, methods_with_marker};

pub struct TransactionBoundaryEvaluator;

impl Evaluator for TransactionBoundaryEvaluator {
    fn name(&self) -> &'static str {
        "transaction-boundary"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        id_matches(&rule.id, &["TX-BOUNDARY", "TRANSACTION-BOUNDARY"])
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        // Built-in remote sinks plus any the rule declares itself.
        let mut sinks: Vec<String> = REMOTE_SINK_TYPES.iter().map(|s| (*s).to_owned()).collect();
        if let Some(detection) = &rule.detection {
            sinks.extend(detection.sinks.types.iter().cloned());
        }

        let mut violations = Vec::new();
        for entry in methods_with_marker(ctx, TRANSACTIONAL_MARKER) {
            for sink in &sinks {
                let prefix = format!("{sink}#");
                for chain in ctx.calls.chains_to_sink(&entry.fqn, &prefix) {
                    let target = chain.last().cloned().unwrap_or_default();
                    violations.push(
                        Violation::new(
                            rule.id.clone(),
                            rule.severity,
                            format!(
                                "transactional method '{}' reaches remote client '{}'",
                                entry.fqn, target
                            ),
                            entry.location.clone(),
                            &target,
                        )
                        .with_chain(chain)
                        .with_context("entry", entry.fqn.clone())
                        .with_context("sink", target.clone()),
                    );
                }
            }
        }
        violations
    }
}
