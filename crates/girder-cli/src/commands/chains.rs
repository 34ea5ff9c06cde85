//! Print call chains starting at a method.

use std::path::Path;

use girder_graph::CallGraph;

use super::build_or_exit;

pub fn run(repo: &Path, method: &str, to: Option<&str>) -> i32 {
    let out = build_or_exit(repo);
    let calls = CallGraph::build(&out.model, &out.edges);

    if !out.model.contains_method(method) {
        eprintln!("error: method not found in model: {method}");
        return 1;
    }

    let chains = match to {
        Some(target) => calls.chains_to(method, target, true),
        None => calls.chains(method, true),
    };
    if chains.is_empty() {
        println!("no chains");
        return 0;
    }
    for chain in &chains {
        println!("{}", chain.join(" -> "));
    }
    0
}
