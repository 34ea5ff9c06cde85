//! Build the model and print parse statistics.

use std::path::Path;

use super::build_or_exit;

pub fn run(repo: &Path) -> i32 {
    let out = build_or_exit(repo);
    let stats = &out.stats;
    println!("files:        {}", stats.files);
    println!("failed files: {}", stats.failed_files);
    println!("types:        {}", stats.types);
    println!("methods:      {}", stats.methods);
    println!("fields:       {}", stats.fields);
    println!("call edges:   {}", stats.call_edges);
    println!("elapsed:      {} ms", stats.elapsed_ms);
    0
}
