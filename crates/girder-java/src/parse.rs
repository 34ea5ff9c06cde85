//! Tree-sitter parsing of Java compilation units.

use arborium_tree_sitter as tree_sitter;

use crate::{Error, Result};

/// Reusable Java parser. One instance per build; not shareable across
/// threads.
pub struct JavaParser {
    parser: tree_sitter::Parser,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&arborium_java::language().into())
            .map_err(|e| Error::Grammar(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse one compilation unit. Returns `None` when the tree contains a
    /// syntax error; the caller counts the file as failed and moves on.
    pub fn parse(&mut self, source: &str) -> Option<tree_sitter::Tree> {
        let tree = self.parser.parse(source, None)?;
        if tree.root_node().has_error() {
            return None;
        }
        Some(tree)
    }
}

/// Text of a node, borrowed from the source.
pub fn node_text<'s>(node: tree_sitter::Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// 1-based line and 0-based column of a node's start.
pub fn node_position(node: tree_sitter::Node<'_>) -> (u32, u32) {
    let point = node.start_position();
    (point.row as u32 + 1, point.column as u32)
}
