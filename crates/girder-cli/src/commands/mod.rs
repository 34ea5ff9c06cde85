pub mod analyze;
pub mod chains;
pub mod model;
pub mod rules;

use std::path::Path;

use girder_java::{scan_repo, BuildOutput, ModelPipeline};

/// Scan and build, or exit with a message. Shared by every subcommand that
/// needs a model.
pub fn build_or_exit(repo: &Path) -> BuildOutput {
    let files = scan_repo(repo).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let mut pipeline = ModelPipeline::new().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    pipeline.build_from_paths(&files).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}
