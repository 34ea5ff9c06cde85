//! Graph structures derived from the frozen model:
//! - `call_graph` - bidirectional index over call edges with reachability
//!   and chain enumeration
//! - `dependency_graph` - package-to-package edges with cycle detection
//!
//! Both are built once after the model freezes and are read-only afterwards,
//! so they can be shared across concurrent rule evaluations.

pub mod call_graph;
pub mod dependency_graph;


pub use call_graph::CallGraph;
pub use dependency_graph::DependencyGraph;

/// Process-wide bound on graph traversal depth. Rule definitions may lower
/// their own search, never raise past this.
pub const MAX_DEPTH: usize = 100;
