//! Java frontend for Girder.
//!
//! Builds the frozen semantic model from a tree of `.java` files:
//! - `repo` - repository scanning
//! - `parse` - tree-sitter parsing
//! - `types` - per-file type name resolution (imports, java.lang, package)
//! - `extract` - phase 1, entity extraction
//! - `calls` - phase 2, call-site extraction and qualifier resolution
//! - `pipeline` - the phase orchestration
//!
//! Parsing runs sequentially: the tree-sitter parser is a stateful object
//! and a single one is reused for every file in sorted path order, which
//! keeps entity and edge order reproducible across runs.

pub mod calls;
pub mod extract;
pub mod parse;
pub mod pipeline;
pub mod repo;
pub mod types;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod extract_tests;

pub use pipeline::{build_model, BuildOutput, ModelPipeline, ParseStats};
pub use repo::scan_repo;

/// Errors that abort a build. Per-file parse failures are not errors; they
/// are counted in [`ParseStats`] and the build continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk repository root: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("tree-sitter rejected the Java grammar: {0}")]
    Grammar(String),
}

/// Result type for frontend operations.
pub type Result<T> = std::result::Result<T, Error>;
