//! Shared helpers for frontend tests.

use crate::pipeline::{BuildOutput, ModelPipeline};

/// Build a model from inline `(path, source)` pairs.
pub fn build(sources: &[(&str, &str)]) -> BuildOutput {
    let owned: Vec<(String, String)> = sources
        .iter()
        .map(|(p, s)| ((*p).to_owned(), (*s).to_owned()))
        .collect();
    ModelPipeline::new()
        .expect("java grammar loads")
        .build_from_sources(&owned)
}

/// Build a model from a single `Main.java`.
pub fn build_one(source: &str) -> BuildOutput {
    build(&[("Main.java", source)])
}
