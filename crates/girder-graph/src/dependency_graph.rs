//! Package dependency graph with cycle detection.
//!
//! An edge P → Q exists when some type in package P references a type whose
//! package is Q. Cycles are computed with Tarjan's SCC algorithm; every
//! non-trivial component (and every self-loop) yields one representative
//! closed walk.

use indexmap::{IndexMap, IndexSet};

use girder_model::names::package_of;
use girder_model::{RelationshipKind, SourceModel};

#[derive(Debug)]
pub struct DependencyGraph {
    edges: IndexMap<String, IndexSet<String>>,
    reverse: IndexMap<String, IndexSet<String>>,
    cycles: Vec<Vec<String>>,
}

impl DependencyGraph {
    pub fn build(model: &SourceModel) -> Self {
        let mut edges: IndexMap<String, IndexSet<String>> = IndexMap::new();
        let mut reverse: IndexMap<String, IndexSet<String>> = IndexMap::new();

        for rel in model.relationships_of_kind(RelationshipKind::References) {
            let Some(source_type) = model.get_type(&rel.source) else {
                continue;
            };
            let p = source_type.package.clone();
            let q = match model.get_type(&rel.target) {
                Some(t) => t.package.clone(),
                None => package_of(&rel.target).to_owned(),
            };
            if p.is_empty() || q.is_empty() || p == q {
                continue;
            }
            edges.entry(p.clone()).or_default().insert(q.clone());
            reverse.entry(q).or_default().insert(p);
        }

        let cycles = find_cycles(&edges);
        Self {
            edges,
            reverse,
            cycles,
        }
    }

    /// Packages that `package` depends on. Never contains `package` itself.
    pub fn depends_on(&self, package: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(package)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Packages that depend on `package`.
    pub fn dependents_of(&self, package: &str) -> impl Iterator<Item = &str> {
        self.reverse
            .get(package)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.get(from).is_some_and(|set| set.contains(to))
    }

    /// Representative cycles, each a closed walk with the first package
    /// repeated at the end.
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn package_count(&self) -> usize {
        let mut all: IndexSet<&str> = self.edges.keys().map(String::as_str).collect();
        all.extend(self.reverse.keys().map(String::as_str));
        all.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(IndexSet::len).sum()
    }
}

/// Tarjan over the package graph, in deterministic insertion order.
fn find_cycles(edges: &IndexMap<String, IndexSet<String>>) -> Vec<Vec<String>> {
    let mut nodes: IndexSet<&str> = IndexSet::new();
    for (from, targets) in edges {
        nodes.insert(from.as_str());
        for to in targets {
            nodes.insert(to.as_str());
        }
    }

    let mut state = Tarjan {
        edges,
        index: 0,
        indices: IndexMap::new(),
        lowlinks: IndexMap::new(),
        on_stack: IndexSet::new(),
        stack: Vec::new(),
        sccs: Vec::new(),
    };
    for &node in &nodes {
        if !state.indices.contains_key(node) {
            state.strongconnect(node);
        }
    }

    let mut cycles = Vec::new();
    for scc in &state.sccs {
        if scc.len() > 1 {
            if let Some(cycle) = cycle_through(&scc[0], edges, scc) {
                cycles.push(cycle);
            }
        } else if let Some(single) = scc.first() {
            let self_loop = edges.get(single).is_some_and(|set| set.contains(single));
            if self_loop {
                cycles.push(vec![single.clone(), single.clone()]);
            }
        }
    }
    cycles
}

struct Tarjan<'g> {
    edges: &'g IndexMap<String, IndexSet<String>>,
    index: usize,
    indices: IndexMap<String, usize>,
    lowlinks: IndexMap<String, usize>,
    on_stack: IndexSet<String>,
    stack: Vec<String>,
    sccs: Vec<Vec<String>>,
}

impl Tarjan<'_> {
    fn strongconnect(&mut self, node: &str) {
        self.indices.insert(node.to_owned(), self.index);
        self.lowlinks.insert(node.to_owned(), self.index);
        self.index += 1;
        self.stack.push(node.to_owned());
        self.on_stack.insert(node.to_owned());

        let targets: Vec<String> = self
            .edges
            .get(node)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        for target in targets {
            if !self.indices.contains_key(&target) {
                self.strongconnect(&target);
                let low = self.lowlinks[&target].min(self.lowlinks[node]);
                self.lowlinks.insert(node.to_owned(), low);
            } else if self.on_stack.contains(&target) {
                let low = self.indices[&target].min(self.lowlinks[node]);
                self.lowlinks.insert(node.to_owned(), low);
            }
        }

        if self.lowlinks[node] == self.indices[node] {
            let mut scc = Vec::new();
            while let Some(top) = self.stack.pop() {
                self.on_stack.swap_remove(&top);
                let done = top == node;
                scc.push(top);
                if done {
                    break;
                }
            }
            scc.reverse();
            self.sccs.push(scc);
        }
    }
}

/// A closed walk through a strongly connected component, starting and
/// ending at `start`. Every consecutive pair is an edge of the graph.
fn cycle_through(
    start: &str,
    edges: &IndexMap<String, IndexSet<String>>,
    scc: &[String],
) -> Option<Vec<String>> {
    let members: IndexSet<&str> = scc.iter().map(String::as_str).collect();
    let mut path = vec![start.to_owned()];
    let mut visited: IndexSet<String> = IndexSet::new();
    visited.insert(start.to_owned());
    if walk_back_to_start(start, start, edges, &members, &mut path, &mut visited) {
        Some(path)
    } else {
        None
    }
}

fn walk_back_to_start(
    node: &str,
    start: &str,
    edges: &IndexMap<String, IndexSet<String>>,
    members: &IndexSet<&str>,
    path: &mut Vec<String>,
    visited: &mut IndexSet<String>,
) -> bool {
    let Some(targets) = edges.get(node) else {
        return false;
    };
    if path.len() > 1 && targets.contains(start) {
        path.push(start.to_owned());
        return true;
    }
    for target in targets {
        if !members.contains(target.as_str()) || visited.contains(target) {
            continue;
        }
        visited.insert(target.clone());
        path.push(target.clone());
        if walk_back_to_start(target, start, edges, members, path, visited) {
            return true;
        }
        path.pop();
        visited.swap_remove(target);
    }
    false
}
