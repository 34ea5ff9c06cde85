//! Build pipeline: parse, extract entities, extract calls, complete
//! relationships, freeze.

use std::path::PathBuf;
use std::time::Instant;

use indexmap::IndexSet;
use tracing::{debug, warn};

use girder_model::{CallEdge, ModelBuilder, Relationship, RelationshipKind, SourceModel};

use crate::calls::extract_calls;
use crate::extract::{build_resolver, collect_declared_types, extract_file};
use crate::parse::JavaParser;
use crate::{Error, Result};

/// Counters reported alongside the frozen model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub files: usize,
    pub failed_files: usize,
    pub types: usize,
    pub methods: usize,
    pub fields: usize,
    pub call_edges: usize,
    pub elapsed_ms: u64,
}

/// A frozen model plus its call edges and build counters.
#[derive(Debug)]
pub struct BuildOutput {
    pub model: SourceModel,
    pub edges: Vec<CallEdge>,
    pub stats: ParseStats,
}

/// Orchestrates the build phases. One instance per build; the embedded
/// tree-sitter parser is stateful and files are fed sequentially.
pub struct ModelPipeline {
    parser: JavaParser,
}

impl ModelPipeline {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: JavaParser::new()?,
        })
    }

    /// Build from files on disk. Unreadable files abort the build; files
    /// that fail to parse are counted and skipped.
    pub fn build_from_paths(&mut self, files: &[PathBuf]) -> Result<BuildOutput> {
        let mut sources = Vec::with_capacity(files.len());
        for path in files {
            let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.display().to_string(),
                source,
            })?;
            sources.push((path.display().to_string(), content));
        }
        Ok(self.build_from_sources(&sources))
    }

    /// Build from in-memory `(path, source)` pairs.
    pub fn build_from_sources(&mut self, sources: &[(String, String)]) -> BuildOutput {
        let started = Instant::now();
        let mut stats = ParseStats {
            files: sources.len(),
            ..ParseStats::default()
        };

        let mut parsed = Vec::with_capacity(sources.len());
        for (path, source) in sources {
            match self.parser.parse(source) {
                Some(tree) => parsed.push((path.as_str(), source.as_str(), tree)),
                None => {
                    stats.failed_files += 1;
                    warn!(file = %path, "skipping file with syntax errors");
                }
            }
        }

        // Declared-type pre-pass so cross-file same-package and wildcard
        // names resolve during extraction.
        let mut declared: IndexSet<String> = IndexSet::new();
        for (_, source, tree) in &parsed {
            declared.extend(collect_declared_types(tree, source));
        }

        let mut builder = ModelBuilder::new();
        let mut resolvers = Vec::with_capacity(parsed.len());
        for (path, source, tree) in &parsed {
            let resolver = build_resolver(tree.root_node(), source);
            extract_file(tree, source, path, &resolver, &declared, &mut builder);
            resolvers.push(resolver);
        }
        debug!(types = builder.types().count(), "entity extraction done");

        let mut edges = Vec::new();
        let mut accesses = Vec::new();
        for ((path, source, tree), resolver) in parsed.iter().zip(&resolvers) {
            let mut extraction = extract_calls(tree, source, path, resolver, &declared, &builder);
            edges.append(&mut extraction.edges);
            accesses.append(&mut extraction.accesses);
        }

        for edge in &edges {
            let target = edge
                .resolved
                .clone()
                .unwrap_or_else(|| edge.raw_callee.clone());
            builder.add_relationship(Relationship::new(
                edge.caller.clone(),
                target,
                RelationshipKind::Calls,
            ));
        }
        for access in accesses {
            builder.add_relationship(access);
        }
        builder.complete_containment();

        let model = builder.freeze();
        stats.types = model.type_count();
        stats.methods = model.method_count();
        stats.fields = model.field_count();
        stats.call_edges = edges.len();
        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(
            types = stats.types,
            methods = stats.methods,
            edges = stats.call_edges,
            "model frozen"
        );

        BuildOutput {
            model,
            edges,
            stats,
        }
    }
}

/// Convenience entry point: build a model from files on disk.
pub fn build_model(files: &[PathBuf]) -> Result<BuildOutput> {
    ModelPipeline::new()?.build_from_paths(files)
}
