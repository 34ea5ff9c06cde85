//! Phase 1: entity extraction.
//!
//! Walks one parsed compilation unit and populates the model builder with
//! types, methods, constructors, and fields, plus the structural
//! relationships (Inherits, Implements, References) read off declarations.

use arborium_tree_sitter as tree_sitter;
use indexmap::IndexSet;

use girder_model::names::{field_fqn, method_fqn, CONSTRUCTOR_NAME};
use girder_model::{
    AnnotationRef, FieldEntity, Location, MethodEntity, ModelBuilder, Modifier, Parameter,
    Relationship, RelationshipKind, TypeEntity, TypeKind, TypeRef,
};

use crate::parse::{node_position, node_text};
use crate::types::TypeResolver;

pub(crate) const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Pre-pass: declared type FQNs of one compilation unit (including nested
/// types), without building entities. Feeds cross-file name resolution.
pub fn collect_declared_types(tree: &tree_sitter::Tree, source: &str) -> Vec<String> {
    let package = read_package(tree.root_node(), source);
    let mut out = Vec::new();
    let mut cursor = tree.root_node().walk();
    for child in tree.root_node().named_children(&mut cursor) {
        collect_type_names(child, source, &package, &mut out);
    }
    out
}

fn collect_type_names(
    node: tree_sitter::Node<'_>,
    source: &str,
    scope: &str,
    out: &mut Vec<String>,
) {
    if !TYPE_DECLARATION_KINDS.contains(&node.kind()) {
        return;
    }
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(name_node, source);
    let fqn = if scope.is_empty() {
        name.to_owned()
    } else {
        format!("{scope}.{name}")
    };
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            collect_type_names(member, source, &fqn, out);
        }
    }
    out.push(fqn);
}

/// Package declared by a compilation unit, or `""`.
pub fn read_package(root: tree_sitter::Node<'_>, source: &str) -> String {
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "package_declaration" {
            let mut inner = child.walk();
            for part in child.named_children(&mut inner) {
                if matches!(part.kind(), "scoped_identifier" | "identifier") {
                    return node_text(part, source).to_owned();
                }
            }
        }
    }
    String::new()
}

/// Build the per-file resolver from the package and import declarations.
pub fn build_resolver(root: tree_sitter::Node<'_>, source: &str) -> TypeResolver {
    let mut resolver = TypeResolver::new(read_package(root, source));
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "import_declaration" {
            let mut inner = child.walk();
            let mut path = String::new();
            let mut wildcard = false;
            for part in child.named_children(&mut inner) {
                match part.kind() {
                    "scoped_identifier" | "identifier" => {
                        path = node_text(part, source).to_owned();
                    }
                    "asterisk" => wildcard = true,
                    _ => {}
                }
            }
            if path.is_empty() {
                continue;
            }
            if wildcard {
                resolver.add_import(&format!("{path}.*"));
            } else {
                resolver.add_import(&path);
            }
        }
    }
    resolver
}

/// Extract all entities of one compilation unit into the builder.
pub fn extract_file(
    tree: &tree_sitter::Tree,
    source: &str,
    path: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    builder: &mut ModelBuilder,
) {
    let root = tree.root_node();
    let package = resolver.package().to_owned();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        extract_type(child, source, path, &package, resolver, declared, builder);
    }
}

fn extract_type(
    node: tree_sitter::Node<'_>,
    source: &str,
    path: &str,
    scope: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    builder: &mut ModelBuilder,
) {
    let kind = match node.kind() {
        "class_declaration" => TypeKind::Class,
        "interface_declaration" => TypeKind::Interface,
        "enum_declaration" => TypeKind::Enum,
        "record_declaration" => TypeKind::Record,
        "annotation_type_declaration" => TypeKind::Annotation,
        _ => return,
    };
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let simple_name = node_text(name_node, source).to_owned();
    let fqn = if scope.is_empty() {
        simple_name.clone()
    } else {
        format!("{scope}.{simple_name}")
    };

    let (modifiers, annotations) = read_modifiers(node, source, resolver);
    let mut supertypes = Vec::new();
    let mut interfaces = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "superclass" => {
                let mut inner = child.walk();
                for t in child.named_children(&mut inner) {
                    supertypes.push(resolver.type_ref_of(t, source, declared));
                }
            }
            "super_interfaces" | "extends_interfaces" => {
                let mut inner = child.walk();
                for list in child.named_children(&mut inner) {
                    if list.kind() == "type_list" {
                        let mut items = list.walk();
                        for t in list.named_children(&mut items) {
                            interfaces.push(resolver.type_ref_of(t, source, declared));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    // Interfaces extend through the supertype slot conceptually, but the
    // grammar puts them in extends_interfaces; for Inherits edges we keep
    // them where the declaration put them.
    for s in &supertypes {
        builder.add_relationship(Relationship::new(
            fqn.clone(),
            s.base_fqn().to_owned(),
            RelationshipKind::Inherits,
        ));
        add_reference_fqn(builder, &fqn, s);
    }
    for i in &interfaces {
        let edge_kind = if kind == TypeKind::Interface {
            RelationshipKind::Inherits
        } else {
            RelationshipKind::Implements
        };
        builder.add_relationship(Relationship::new(
            fqn.clone(),
            i.base_fqn().to_owned(),
            edge_kind,
        ));
        add_reference_fqn(builder, &fqn, i);
    }

    let (line, column) = node_position(node);
    builder.add_type(TypeEntity {
        fqn: fqn.clone(),
        simple_name,
        package: resolver.package().to_owned(),
        kind,
        modifiers,
        annotations,
        supertypes,
        interfaces,
        location: Location::new(path, line, column),
        is_component: false,
    });

    // Record components double as fields.
    if kind == TypeKind::Record {
        if let Some(params) = node.child_by_field_name("parameters") {
            let mut inner = params.walk();
            for component in params.named_children(&mut inner) {
                if component.kind() != "formal_parameter" {
                    continue;
                }
                let (Some(type_node), Some(comp_name)) = (
                    component.child_by_field_name("type"),
                    component.child_by_field_name("name"),
                ) else {
                    continue;
                };
                let type_ref = resolver.type_ref_of(type_node, source, declared);
                let name = node_text(comp_name, source).to_owned();
                let (line, column) = node_position(component);
                add_reference_fqn(builder, &fqn, &type_ref);
                builder.add_field(FieldEntity {
                    fqn: field_fqn(&fqn, &name),
                    owner_fqn: fqn.clone(),
                    name,
                    type_ref,
                    modifiers: vec![Modifier::Private, Modifier::Final],
                    annotations: Vec::new(),
                    location: Location::new(path, line, column),
                });
            }
        }
    }

    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "method_declaration" | "constructor_declaration" => {
                extract_method(member, source, path, &fqn, resolver, declared, builder);
            }
            "field_declaration" => {
                extract_field(member, source, path, &fqn, resolver, declared, builder);
            }
            k if TYPE_DECLARATION_KINDS.contains(&k) => {
                extract_type(member, source, path, &fqn, resolver, declared, builder);
            }
            _ => {}
        }
    }
}

/// Signature of a method or constructor declaration. Shared with phase 2 so
/// both phases derive identical FQNs.
pub fn method_signature(
    owner_fqn: &str,
    node: tree_sitter::Node<'_>,
    source: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
) -> (String, String, Vec<Parameter>) {
    let is_constructor = node.kind() == "constructor_declaration";
    let simple_name = if is_constructor {
        CONSTRUCTOR_NAME.to_owned()
    } else {
        node.child_by_field_name("name")
            .map(|n| node_text(n, source).to_owned())
            .unwrap_or_default()
    };

    let mut parameters = Vec::new();
    if let Some(params) = node.child_by_field_name("parameters") {
        let mut cursor = params.walk();
        for p in params.named_children(&mut cursor) {
            if !matches!(p.kind(), "formal_parameter" | "spread_parameter") {
                continue;
            }
            let type_ref = p
                .child_by_field_name("type")
                .map(|t| resolver.type_ref_of(t, source, declared))
                .unwrap_or_else(TypeRef::unknown);
            let name = p
                .child_by_field_name("name")
                .map(|n| node_text(n, source).to_owned())
                .unwrap_or_default();
            let (_, annotations) = read_modifiers(p, source, resolver);
            parameters.push(Parameter {
                name,
                type_ref,
                annotations,
            });
        }
    }

    let param_fqns: Vec<String> = parameters.iter().map(|p| p.type_ref.fqn.clone()).collect();
    let fqn = method_fqn(owner_fqn, &simple_name, &param_fqns);
    (fqn, simple_name, parameters)
}

fn extract_method(
    node: tree_sitter::Node<'_>,
    source: &str,
    path: &str,
    owner_fqn: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    builder: &mut ModelBuilder,
) {
    let (fqn, simple_name, parameters) =
        method_signature(owner_fqn, node, source, resolver, declared);
    let is_constructor = simple_name == CONSTRUCTOR_NAME;

    let return_type = if is_constructor {
        TypeRef::object(
            girder_model::names::simple_name_of(owner_fqn),
            owner_fqn,
        )
    } else {
        node.child_by_field_name("type")
            .map(|t| resolver.type_ref_of(t, source, declared))
            .unwrap_or_else(TypeRef::unknown)
    };

    let (modifiers, annotations) = read_modifiers(node, source, resolver);

    let mut throws = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "throws" {
            let mut inner = child.walk();
            for t in child.named_children(&mut inner) {
                throws.push(resolver.type_ref_of(t, source, declared));
            }
        }
    }

    for p in &parameters {
        add_reference_fqn(builder, owner_fqn, &p.type_ref);
    }
    if !is_constructor {
        add_reference_fqn(builder, owner_fqn, &return_type);
    }
    for t in &throws {
        add_reference_fqn(builder, owner_fqn, t);
    }

    let (line, column) = node_position(node);
    builder.add_method(MethodEntity {
        fqn,
        owner_fqn: owner_fqn.to_owned(),
        simple_name,
        return_type,
        parameters,
        modifiers,
        annotations,
        throws,
        location: Location::new(path, line, column),
        is_component_member: false,
    });
}

fn extract_field(
    node: tree_sitter::Node<'_>,
    source: &str,
    path: &str,
    owner_fqn: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    builder: &mut ModelBuilder,
) {
    let Some(type_node) = node.child_by_field_name("type") else {
        return;
    };
    let type_ref = resolver.type_ref_of(type_node, source, declared);
    let (modifiers, annotations) = read_modifiers(node, source, resolver);
    add_reference_fqn(builder, owner_fqn, &type_ref);

    let mut cursor = node.walk();
    for declarator in node.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };
        let name = node_text(name_node, source).to_owned();
        let (line, column) = node_position(declarator);
        builder.add_field(FieldEntity {
            fqn: field_fqn(owner_fqn, &name),
            owner_fqn: owner_fqn.to_owned(),
            name,
            type_ref: type_ref.clone(),
            modifiers: modifiers.clone(),
            annotations: annotations.clone(),
            location: Location::new(path, line, column),
        });
    }
}

/// Modifier keywords and annotations of a declaration's `modifiers` child.
pub fn read_modifiers(
    node: tree_sitter::Node<'_>,
    source: &str,
    resolver: &TypeResolver,
) -> (Vec<Modifier>, Vec<AnnotationRef>) {
    let mut modifiers = Vec::new();
    let mut annotations = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let count = child.child_count();
        for i in 0..count {
            let Some(item) = child.child(i as u32) else { continue };
            match item.kind() {
                "marker_annotation" | "annotation" => {
                    annotations.push(annotation_ref(item, source, resolver));
                }
                keyword => {
                    if let Some(m) = Modifier::from_keyword(keyword) {
                        modifiers.push(m);
                    }
                }
            }
        }
    }
    if !modifiers
        .iter()
        .any(|m| matches!(m, Modifier::Public | Modifier::Private | Modifier::Protected))
    {
        modifiers.push(Modifier::PackagePrivate);
    }
    (modifiers, annotations)
}

fn annotation_ref(
    node: tree_sitter::Node<'_>,
    source: &str,
    resolver: &TypeResolver,
) -> AnnotationRef {
    let raw_name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source))
        .unwrap_or("");
    let simple = girder_model::names::simple_name_of(raw_name).to_owned();
    let fqn = if raw_name.contains('.') {
        Some(raw_name.to_owned())
    } else {
        resolver.imported(&simple).map(str::to_owned)
    };

    let mut annotation = AnnotationRef::new(simple);
    annotation.fqn = fqn;

    if let Some(args) = node.child_by_field_name("arguments") {
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            if arg.kind() == "element_value_pair" {
                let key = arg
                    .child_by_field_name("key")
                    .map(|k| node_text(k, source).to_owned())
                    .unwrap_or_default();
                let value = arg
                    .child_by_field_name("value")
                    .map(|v| node_text(v, source).to_owned())
                    .unwrap_or_default();
                annotation.attributes.insert(key, value);
            } else {
                annotation
                    .attributes
                    .insert("value".to_owned(), node_text(arg, source).to_owned());
            }
        }
    }
    annotation
}

fn add_reference_fqn(builder: &mut ModelBuilder, source_fqn: &str, type_ref: &TypeRef) {
    if type_ref.is_primitive {
        return;
    }
    let target = type_ref.base_fqn().trim_end_matches("[]");
    if target.is_empty() || target == girder_model::names::UNKNOWN_TYPE || target == source_fqn {
        return;
    }
    builder.add_relationship(Relationship::new(
        source_fqn.to_owned(),
        target.to_owned(),
        RelationshipKind::References,
    ));
}
