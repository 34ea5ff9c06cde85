//! Evaluator registry and rule dispatch.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use girder_graph::{CallGraph, DependencyGraph};
use girder_model::SourceModel;

use crate::definition::RuleDefinition;
use crate::evaluators;
use crate::violation::Violation;

/// Read-only view handed to every evaluator. The model and both graphs are
/// frozen, so the context can be shared freely.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub model: &'a SourceModel,
    pub calls: &'a CallGraph,
    pub deps: &'a DependencyGraph,
}

/// One rule family. Evaluators are pure with respect to the context; they
/// only read, and findings come back as values.
pub trait Evaluator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this evaluator handles the rule. Dispatch picks the first
    /// supporting evaluator in registry order, so family evaluators keyed
    /// by rule id come before the generic path-reachability one.
    fn supports(&self, rule: &RuleDefinition) -> bool;

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation>;
}

pub struct RuleEngine {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl RuleEngine {
    pub fn new(evaluators: Vec<Box<dyn Evaluator>>) -> Self {
        Self { evaluators }
    }

    pub fn with_default_evaluators() -> Self {
        Self::new(evaluators::default_registry())
    }

    /// Evaluate every rule in order. Unsupported rules produce a warning
    /// and no violations.
    pub fn evaluate(&self, rules: &[RuleDefinition], ctx: &EvalContext<'_>) -> Vec<Violation> {
        let never = AtomicBool::new(false);
        self.evaluate_with_cancel(rules, ctx, &never)
    }

    /// Same, with a cooperative cancellation flag checked before each rule.
    /// On cancellation partial results are discarded.
    pub fn evaluate_with_cancel(
        &self,
        rules: &[RuleDefinition],
        ctx: &EvalContext<'_>,
        cancel: &AtomicBool,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        for rule in rules {
            if cancel.load(Ordering::Relaxed) {
                warn!("evaluation cancelled, discarding partial results");
                return Vec::new();
            }
            match self.evaluators.iter().find(|e| e.supports(rule)) {
                Some(evaluator) => {
                    violations.extend(evaluator.evaluate(rule, ctx));
                }
                None => {
                    warn!(rule = %rule.id, "no evaluator supports this rule");
                }
            }
        }
        violations
    }
}
