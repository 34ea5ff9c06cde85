//! The evaluator catalogue. One module per rule family; dispatch order is
//! the registry order below, with the generic path-reachability evaluator
//! last because it supports any rule carrying a detection block.

pub mod async_transaction;
pub mod circular_dependency;
pub mod duplicate_table_update;
pub mod layering;
pub mod nested_transaction;
pub mod path_reachability;
pub mod retry_idempotency;
pub mod scheduled_resiliency;
pub mod transaction_async;
pub mod transaction_boundary;

use crate::engine::{EvalContext, Evaluator};

pub fn default_registry() -> Vec<Box<dyn Evaluator>> {
    vec![
        Box::new(transaction_boundary::TransactionBoundaryEvaluator),
        Box::new(async_transaction::AsyncTransactionEvaluator),
        Box::new(transaction_async::TransactionAsyncEvaluator),
        Box::new(retry_idempotency::RetryIdempotencyEvaluator),
        Box::new(nested_transaction::NestedTransactionEvaluator),
        Box::new(scheduled_resiliency::ScheduledResiliencyEvaluator),
        Box::new(layering::LayeringEvaluator),
        Box::new(circular_dependency::CircularDependencyEvaluator),
        Box::new(duplicate_table_update::DuplicateTableUpdateEvaluator),
        Box::new(path_reachability::PathReachabilityEvaluator),
    ]
}

/// Rule-id dispatch: current id prefixes plus legacy aliases.
pub(crate) fn id_matches(rule_id: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| rule_id.starts_with(p))
}

/// Entry methods bearing a marker annotation, in model order.
pub(crate) fn methods_with_marker<'a>(
    ctx: &EvalContext<'a>,
    marker: &str,
) -> Vec<&'a girder_model::MethodEntity> {
    ctx.model.methods_by_annotation(marker).collect()
}

/// First chain from `entry` to `target`, boundary-stopping.
pub(crate) fn first_chain_to(
    ctx: &EvalContext<'_>,
    entry: &str,
    target: &str,
) -> Option<Vec<String>> {
    ctx.calls.chains_to(entry, target, true).into_iter().next()
}
