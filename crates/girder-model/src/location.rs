//! Source positions for entities and call sites.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable source position: file path plus 1-based line and 0-based column.
///
/// Equality and hashing are structural; the ordering (file, line, column)
/// is what report sorting relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Placeholder location for findings that have no single source position,
    /// like package-level cycles.
    pub fn synthetic(label: &str) -> Self {
        Self {
            file: label.to_owned(),
            line: 0,
            column: 0,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let loc = Location::new("src/A.java", 12, 4);
        assert_eq!(loc.to_string(), "src/A.java:12:4");
    }

    #[test]
    fn structural_equality_and_ordering() {
        let a = Location::new("a.java", 1, 0);
        let b = Location::new("a.java", 1, 0);
        let c = Location::new("a.java", 2, 0);
        assert_eq!(a, b);
        assert!(a < c);
    }

    #[test]
    fn synthetic_has_zero_position() {
        let loc = Location::synthetic("package-level");
        assert_eq!(loc.file, "package-level");
        assert_eq!(loc.line, 0);
        assert_eq!(loc.column, 0);
    }
}
