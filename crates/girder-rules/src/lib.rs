//! Rule engine for Girder:
//! - `definition` - declarative rule records loaded from JSON files
//! - `catalog` - compiled-in marker and sink constants
//! - `engine` - evaluator registry and dispatch
//! - `evaluators` - one module per rule family
//! - `violation` - located, fingerprinted findings
//! - `report` - deduplication, ordering, verdict

pub mod catalog;
pub mod definition;
pub mod engine;
pub mod evaluators;
pub mod report;
pub mod violation;

#[cfg(test)]
mod evaluators_tests;
#[cfg(test)]
mod report_tests;

pub use definition::{load_rules, RuleDefinition, Severity};
pub use engine::{EvalContext, Evaluator, RuleEngine};
pub use report::{assemble, AnalysisConfig, Report, Summary, Verdict};
pub use violation::Violation;

/// Errors that abort rule loading. A single malformed rule file is not an
/// error; it is logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read rule file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk rule directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Run every rule against a frozen model and its graphs with the default
/// evaluator registry.
pub fn evaluate(
    rules: &[RuleDefinition],
    model: &girder_model::SourceModel,
    calls: &girder_graph::CallGraph,
    deps: &girder_graph::DependencyGraph,
) -> Vec<Violation> {
    let ctx = EvalContext { model, calls, deps };
    RuleEngine::with_default_evaluators().evaluate(rules, &ctx)
}
