//! Entity records: types, methods, fields, and the symbolic references
//! (`TypeRef`, `AnnotationRef`) they carry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Location;
use crate::names::{self, UNKNOWN_TYPE};

/// Symbolic reference to a type by simple name and FQN.
///
/// Primitive refs have an FQN equal to the keyword. When the frontend can
/// resolve generic arguments they are preserved in the FQN string
/// (`java.util.List<com.a.Foo>`); otherwise the raw type is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub simple_name: String,
    pub fqn: String,
    pub is_primitive: bool,
    pub is_array: bool,
    pub is_generic: bool,
}

impl TypeRef {
    pub fn object(simple_name: impl Into<String>, fqn: impl Into<String>) -> Self {
        Self {
            simple_name: simple_name.into(),
            fqn: fqn.into(),
            is_primitive: false,
            is_array: false,
            is_generic: false,
        }
    }

    pub fn primitive(keyword: &str) -> Self {
        Self {
            simple_name: keyword.to_owned(),
            fqn: keyword.to_owned(),
            is_primitive: true,
            is_array: false,
            is_generic: false,
        }
    }

    pub fn unknown() -> Self {
        Self::object(UNKNOWN_TYPE, UNKNOWN_TYPE)
    }

    /// FQN with any generic arguments stripped (`java.util.List<X>` →
    /// `java.util.List`).
    pub fn base_fqn(&self) -> &str {
        match self.fqn.find('<') {
            Some(idx) => &self.fqn[..idx],
            None => &self.fqn,
        }
    }
}

/// Reference to an annotation occurrence. The simple name is always
/// populated; the FQN is best-effort (resolved through imports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRef {
    pub simple_name: String,
    pub fqn: Option<String>,
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
}

impl AnnotationRef {
    pub fn new(simple_name: impl Into<String>) -> Self {
        Self {
            simple_name: simple_name.into(),
            fqn: None,
            attributes: IndexMap::new(),
        }
    }

    pub fn with_fqn(mut self, fqn: impl Into<String>) -> Self {
        self.fqn = Some(fqn.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    PackagePrivate,
    Static,
    Final,
    Abstract,
    Synchronized,
    Volatile,
    Transient,
    Native,
    Strictfp,
}

impl Modifier {
    /// Map a source keyword to a modifier. Annotations and unknown tokens
    /// inside a modifier list return `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "public" => Self::Public,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "static" => Self::Static,
            "final" => Self::Final,
            "abstract" => Self::Abstract,
            "synchronized" => Self::Synchronized,
            "volatile" => Self::Volatile,
            "transient" => Self::Transient,
            "native" => Self::Native,
            "strictfp" => Self::Strictfp,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

/// One record per declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeEntity {
    pub fqn: String,
    pub simple_name: String,
    pub package: String,
    pub kind: TypeKind,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
    pub supertypes: Vec<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub location: Location,
    /// Derived at build time by matching annotations against
    /// [`crate::STEREOTYPE_ANNOTATIONS`].
    pub is_component: bool,
}

impl TypeEntity {
    pub fn has_annotation(&self, simple_name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.simple_name == simple_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeRef,
    pub annotations: Vec<AnnotationRef>,
}

/// One record per declared method or constructor.
///
/// Constructors have simple name `<init>` and a return type equal to the
/// containing type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodEntity {
    pub fqn: String,
    pub owner_fqn: String,
    pub simple_name: String,
    pub return_type: TypeRef,
    pub parameters: Vec<Parameter>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
    pub throws: Vec<TypeRef>,
    pub location: Location,
    /// Inherited from the owner type when the model is frozen.
    pub is_component_member: bool,
}

impl MethodEntity {
    pub fn has_annotation(&self, simple_name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.simple_name == simple_name)
    }

    pub fn is_constructor(&self) -> bool {
        self.simple_name == names::CONSTRUCTOR_NAME
    }

    pub fn parameter_type_fqns(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|p| p.type_ref.fqn.clone())
            .collect()
    }
}

/// One record per declared field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEntity {
    pub fqn: String,
    pub owner_fqn: String,
    pub name: String,
    pub type_ref: TypeRef,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
    pub location: Location,
}
