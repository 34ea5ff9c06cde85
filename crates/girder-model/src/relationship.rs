//! Relationships between entities, and the call-edge payload used by the
//! call graph and sink-sensitive rules.

use serde::{Deserialize, Serialize};

use crate::Location;
use crate::names::UNKNOWN_TYPE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    Contains,
    Calls,
    Accesses,
    References,
    Inherits,
    Implements,
}

/// Directed relation between two entity FQNs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallKind {
    /// Unqualified call on the same instance.
    Direct,
    /// Call qualified by an expression or variable.
    Virtual,
    /// Call qualified by a type name.
    Static,
    /// Constructor invocation.
    Constructor,
}

/// One argument at a call site.
///
/// The type FQN is always present (`Unknown` when resolution failed). The
/// literal value is kept for string literals so that sink rules can recover
/// SQL statements; the identifier is kept for variables so bindings can be
/// substituted through a call chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallArgument {
    pub type_fqn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl CallArgument {
    pub fn unknown() -> Self {
        Self {
            type_fqn: UNKNOWN_TYPE.to_owned(),
            literal: None,
            identifier: None,
        }
    }

    pub fn of_type(type_fqn: impl Into<String>) -> Self {
        Self {
            type_fqn: type_fqn.into(),
            literal: None,
            identifier: None,
        }
    }
}

/// A resolved-or-unresolved call site.
///
/// `caller` is always a method present in the model. `resolved` is the
/// callee signature FQN when symbol resolution succeeded; the callee may be
/// an application method or an external (library) one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: String,
    /// Callee as written at the call site, qualifier preserved.
    pub raw_callee: String,
    pub resolved: Option<String>,
    pub kind: CallKind,
    pub location: Location,
    pub arguments: Vec<CallArgument>,
}

impl CallEdge {
    pub fn argument_type_fqns(&self) -> Vec<String> {
        self.arguments.iter().map(|a| a.type_fqn.clone()).collect()
    }
}
