//! Per-file type name resolution.
//!
//! Resolution order for a simple type name: explicit import, declared type
//! in the same package, `java.lang`, declared type behind a wildcard
//! import, then the same-package guess. Names that already carry a dot are
//! taken as qualified.

use arborium_tree_sitter as tree_sitter;
use indexmap::{IndexMap, IndexSet};

use girder_model::TypeRef;

use crate::parse::node_text;

/// `java.lang` types resolvable without an import.
const JAVA_LANG: &[&str] = &[
    "Object",
    "String",
    "Integer",
    "Long",
    "Short",
    "Byte",
    "Double",
    "Float",
    "Boolean",
    "Character",
    "Void",
    "Number",
    "Math",
    "System",
    "Thread",
    "Runnable",
    "Iterable",
    "Class",
    "Enum",
    "Record",
    "StringBuilder",
    "StringBuffer",
    "CharSequence",
    "Comparable",
    "Throwable",
    "Exception",
    "RuntimeException",
    "Error",
    "IllegalArgumentException",
    "IllegalStateException",
    "NullPointerException",
    "UnsupportedOperationException",
    "Override",
    "Deprecated",
    "SuppressWarnings",
    "FunctionalInterface",
];

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "char", "float", "double", "void",
];

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// Resolves simple type names to FQNs within one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct TypeResolver {
    package: String,
    imports: IndexMap<String, String>,
    wildcard_packages: Vec<String>,
}

impl TypeResolver {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            imports: IndexMap::new(),
            wildcard_packages: Vec::new(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Record an import path. `com.a.Foo` maps `Foo`; `com.a.*` contributes
    /// only the package prefix.
    pub fn add_import(&mut self, path: &str) {
        if let Some(prefix) = path.strip_suffix(".*") {
            self.wildcard_packages.push(prefix.to_owned());
            return;
        }
        if let Some(simple) = path.rsplit('.').next() {
            self.imports.insert(simple.to_owned(), path.to_owned());
        }
    }

    /// FQN behind an explicit import of `simple`, if any.
    pub fn imported(&self, simple: &str) -> Option<&str> {
        self.imports.get(simple).map(String::as_str)
    }

    /// Resolve a simple or qualified type name to an FQN.
    ///
    /// `declared` is the set of type FQNs declared anywhere in the
    /// repository; it settles same-package and wildcard candidates.
    pub fn resolve_name(&self, name: &str, declared: &IndexSet<String>) -> String {
        if name.is_empty() || is_primitive(name) || name.contains('.') {
            return name.to_owned();
        }
        if let Some(fqn) = self.imports.get(name) {
            return fqn.clone();
        }
        if !self.package.is_empty() {
            let candidate = format!("{}.{}", self.package, name);
            if declared.contains(&candidate) {
                return candidate;
            }
        }
        if JAVA_LANG.contains(&name) {
            return format!("java.lang.{name}");
        }
        for pkg in &self.wildcard_packages {
            let candidate = format!("{pkg}.{name}");
            if declared.contains(&candidate) {
                return candidate;
            }
        }
        if self.package.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{}", self.package, name)
        }
    }

    /// Build a `TypeRef` from a type node of the grammar.
    pub fn type_ref_of(
        &self,
        node: tree_sitter::Node<'_>,
        source: &str,
        declared: &IndexSet<String>,
    ) -> TypeRef {
        match node.kind() {
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                TypeRef::primitive(node_text(node, source))
            }
            "array_type" => {
                let element = node
                    .child_by_field_name("element")
                    .map(|e| self.type_ref_of(e, source, declared))
                    .unwrap_or_else(TypeRef::unknown);
                TypeRef {
                    fqn: format!("{}[]", element.fqn),
                    simple_name: format!("{}[]", element.simple_name),
                    is_array: true,
                    ..element
                }
            }
            "generic_type" => {
                // First child is the raw type, then the type_arguments.
                let base = node
                    .named_child(0)
                    .map(|b| self.type_ref_of(b, source, declared))
                    .unwrap_or_else(TypeRef::unknown);
                let args: Vec<String> = node
                    .named_child(1)
                    .map(|type_args| {
                        let mut cursor = type_args.walk();
                        type_args
                            .named_children(&mut cursor)
                            .map(|a| self.type_ref_of(a, source, declared).fqn)
                            .collect()
                    })
                    .unwrap_or_default();
                let fqn = if args.is_empty() {
                    base.fqn.clone()
                } else {
                    format!("{}<{}>", base.fqn, args.join(","))
                };
                TypeRef {
                    simple_name: base.simple_name,
                    fqn,
                    is_primitive: false,
                    is_array: false,
                    is_generic: true,
                }
            }
            "scoped_type_identifier" => {
                let raw = node_text(node, source);
                TypeRef::object(
                    girder_model::names::simple_name_of(raw),
                    raw,
                )
            }
            "type_identifier" => {
                let simple = node_text(node, source);
                TypeRef::object(simple, self.resolve_name(simple, declared))
            }
            // Wildcards and anything else fall back to raw text.
            _ => {
                let raw = node_text(node, source);
                if raw.is_empty() {
                    TypeRef::unknown()
                } else {
                    TypeRef::object(raw, raw)
                }
            }
        }
    }
}
