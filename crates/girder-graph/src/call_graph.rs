//! Bidirectional call graph with bounded traversal.
//!
//! Traversal follows resolved callees only. A method absent from the model
//! is a *library* method: in boundary-stopping mode (the default for every
//! rule) it terminates the walk. Chain enumeration uses a path-local
//! visited set, never a global one, so alternative routes through shared
//! nodes are all reported.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use tracing::warn;

use girder_model::{CallEdge, SourceModel};

use crate::MAX_DEPTH;

#[derive(Debug)]
pub struct CallGraph {
    outgoing: IndexMap<String, Vec<CallEdge>>,
    incoming: IndexMap<String, Vec<String>>,
    application: IndexSet<String>,
}

impl CallGraph {
    /// Index the call edges of a frozen model. Edge order is preserved from
    /// extraction order, which keeps every traversal deterministic.
    pub fn build(model: &SourceModel, edges: &[CallEdge]) -> Self {
        let application: IndexSet<String> = model.methods().map(|m| m.fqn.clone()).collect();
        let mut outgoing: IndexMap<String, Vec<CallEdge>> = IndexMap::new();
        let mut incoming: IndexMap<String, Vec<String>> = IndexMap::new();
        for edge in edges {
            debug_assert!(
                application.contains(&edge.caller),
                "call edge caller {} is not an application method",
                edge.caller
            );
            outgoing
                .entry(edge.caller.clone())
                .or_default()
                .push(edge.clone());
            if let Some(target) = &edge.resolved {
                incoming
                    .entry(target.clone())
                    .or_default()
                    .push(edge.caller.clone());
            }
        }
        Self {
            outgoing,
            incoming,
            application,
        }
    }

    /// Outgoing edges of a method; empty for unknown methods. Unresolved
    /// call sites are included for diagnostics but never traversed.
    pub fn callees(&self, method: &str) -> &[CallEdge] {
        self.outgoing.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Callers of a method; empty for unknown methods.
    pub fn callers(&self, method: &str) -> &[String] {
        self.incoming.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_application(&self, method: &str) -> bool {
        self.application.contains(method)
    }

    /// A method referenced by an edge but absent from the model.
    pub fn is_library(&self, method: &str) -> bool {
        !self.is_application(method)
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(Vec::len).sum()
    }

    fn resolved_targets<'g>(&'g self, method: &str) -> impl Iterator<Item = &'g str> {
        self.callees(method)
            .iter()
            .filter_map(|e| e.resolved.as_deref())
    }

    /// Breadth-first closure over outgoing edges. The start method is not
    /// part of the result unless a cycle leads back to it.
    pub fn reachable(&self, method: &str, stop_at_libraries: bool) -> IndexSet<String> {
        let mut seen: IndexSet<String> = IndexSet::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        queue.push_back((method.to_owned(), 0));
        while let Some((node, depth)) = queue.pop_front() {
            if depth > 0 && stop_at_libraries && self.is_library(&node) {
                continue;
            }
            if depth >= MAX_DEPTH {
                warn!(root = method, "reachability truncated at depth cap");
                continue;
            }
            for target in self.resolved_targets(&node) {
                if seen.insert(target.to_owned()) {
                    queue.push_back((target.to_owned(), depth + 1));
                }
            }
        }
        seen
    }

    /// All distinct simple paths starting at `method`, each ending at a
    /// leaf, a library boundary, or the depth cap. Cycles are broken
    /// silently by the path-local visited set.
    pub fn chains(&self, method: &str, stop_at_libraries: bool) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut path = vec![method.to_owned()];
        let mut visited: IndexSet<String> = IndexSet::new();
        visited.insert(method.to_owned());
        self.walk_chains(
            method,
            stop_at_libraries,
            &mut path,
            &mut visited,
            &mut out,
            &mut |_, _| ChainStep::Continue,
        );
        out
    }

    /// Paths from `method` whose last element is `target`. A path is
    /// emitted as soon as it reaches the target, even if the target has
    /// further outgoing edges.
    pub fn chains_to(
        &self,
        method: &str,
        target: &str,
        stop_at_libraries: bool,
    ) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut path = vec![method.to_owned()];
        let mut visited: IndexSet<String> = IndexSet::new();
        visited.insert(method.to_owned());
        self.walk_chains(
            method,
            stop_at_libraries,
            &mut path,
            &mut visited,
            &mut out,
            &mut |node, _| {
                if node == target {
                    ChainStep::Emit
                } else {
                    ChainStep::Continue
                }
            },
        );
        out.retain(|chain| chain.last().map(String::as_str) == Some(target));
        out
    }

    /// Paths from `method` ending at any method whose FQN starts with
    /// `sink_prefix` (typically `"pkg.Type#"`).
    pub fn chains_to_sink(&self, method: &str, sink_prefix: &str) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut path = vec![method.to_owned()];
        let mut visited: IndexSet<String> = IndexSet::new();
        visited.insert(method.to_owned());
        self.walk_chains(
            method,
            true,
            &mut path,
            &mut visited,
            &mut out,
            &mut |node, is_start| {
                if !is_start && node.starts_with(sink_prefix) {
                    ChainStep::Emit
                } else {
                    ChainStep::Continue
                }
            },
        );
        out.retain(|chain| {
            chain
                .last()
                .is_some_and(|last| last.starts_with(sink_prefix))
        });
        out
    }

    /// Backward chains: each result has `method` at position 0 and a root
    /// (a method with no callers) at the end.
    pub fn inverse_chains(&self, method: &str) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut path = vec![method.to_owned()];
        let mut visited: IndexSet<String> = IndexSet::new();
        visited.insert(method.to_owned());
        self.walk_inverse(method, &mut path, &mut visited, &mut out);
        out
    }

    /// For each entry method, its forward chains. Used by evaluators that
    /// report the full scope opened by a marker annotation.
    pub fn transaction_boundaries(
        &self,
        entries: &[String],
    ) -> IndexMap<String, Vec<Vec<String>>> {
        entries
            .iter()
            .map(|entry| (entry.clone(), self.chains(entry, true)))
            .collect()
    }

    fn walk_chains(
        &self,
        node: &str,
        stop_at_libraries: bool,
        path: &mut Vec<String>,
        visited: &mut IndexSet<String>,
        out: &mut Vec<Vec<String>>,
        accept: &mut dyn FnMut(&str, bool) -> ChainStep,
    ) {
        let is_start = path.len() == 1;
        if accept(node, is_start) == ChainStep::Emit {
            out.push(path.clone());
            return;
        }
        if path.len() > MAX_DEPTH {
            warn!(root = %path[0], "chain enumeration truncated at depth cap");
            out.push(path.clone());
            return;
        }
        let expandable = is_start || !stop_at_libraries || self.is_application(node);
        let mut extended = false;
        if expandable {
            // Two call sites to the same callee yield one branch, not two
            // identical paths.
            let targets: IndexSet<String> = self
                .resolved_targets(node)
                .filter(|t| !visited.contains(*t))
                .map(str::to_owned)
                .collect();
            for target in targets {
                visited.insert(target.clone());
                path.push(target.clone());
                self.walk_chains(&target, stop_at_libraries, path, visited, out, accept);
                path.pop();
                visited.swap_remove(&target);
                extended = true;
            }
        }
        if !extended {
            out.push(path.clone());
        }
    }

    fn walk_inverse(
        &self,
        node: &str,
        path: &mut Vec<String>,
        visited: &mut IndexSet<String>,
        out: &mut Vec<Vec<String>>,
    ) {
        if path.len() > MAX_DEPTH {
            warn!(root = %path[0], "inverse chain enumeration truncated at depth cap");
            out.push(path.clone());
            return;
        }
        let callers: IndexSet<String> = self
            .callers(node)
            .iter()
            .filter(|c| !visited.contains(*c))
            .cloned()
            .collect();
        let mut extended = false;
        for caller in callers {
            visited.insert(caller.clone());
            path.push(caller.clone());
            self.walk_inverse(&caller, path, visited, out);
            path.pop();
            visited.swap_remove(&caller);
            extended = true;
        }
        if !extended {
            out.push(path.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainStep {
    Continue,
    Emit,
}
