//! Phase 2: call-site extraction.
//!
//! Re-walks each compilation unit against the phase-1 entities and turns
//! every invocation and constructor expression into a `CallEdge`. Qualifier
//! resolution is syntactic with simple environment tracking: parameters,
//! then locals declared earlier in the body, then fields (including
//! model-visible supertypes), then imports and same-package types. No
//! generic substitution, no virtual-dispatch expansion.

use arborium_tree_sitter as tree_sitter;
use indexmap::{IndexMap, IndexSet};

use girder_model::names::{method_fqn, CONSTRUCTOR_NAME, UNKNOWN_TYPE};
use girder_model::{
    CallArgument, CallEdge, CallKind, Location, ModelBuilder, Relationship, RelationshipKind,
    TypeRef,
};

use crate::extract::{method_signature, TYPE_DECLARATION_KINDS};
use crate::parse::{node_position, node_text};
use crate::types::TypeResolver;

/// Variable names conventionally bound to a generated logger.
const LOGGER_NAMES: &[&str] = &["log", "logger", "LOG", "LOGGER"];
const LOGGER_TYPE: &str = "org.slf4j.Logger";

/// Output of phase 2 for one file.
#[derive(Debug, Default)]
pub struct CallExtraction {
    pub edges: Vec<CallEdge>,
    pub accesses: Vec<Relationship>,
}

/// Extract call edges for every method body in one compilation unit.
pub fn extract_calls(
    tree: &tree_sitter::Tree,
    source: &str,
    path: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    builder: &ModelBuilder,
) -> CallExtraction {
    let mut out = CallExtraction::default();
    let root = tree.root_node();
    let package = resolver.package().to_owned();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        visit_type(
            child, source, path, &package, resolver, declared, builder, &mut out,
        );
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn visit_type(
    node: tree_sitter::Node<'_>,
    source: &str,
    path: &str,
    scope: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    builder: &ModelBuilder,
    out: &mut CallExtraction,
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
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "method_declaration" | "constructor_declaration" => {
                visit_method(member, source, path, &fqn, resolver, declared, builder, out);
            }
            k if TYPE_DECLARATION_KINDS.contains(&k) => {
                visit_type(member, source, path, &fqn, resolver, declared, builder, out);
            }
            _ => {}
        }
    }
}

/// A local variable in scope, with its string-literal initializer when the
/// declaration carried one.
#[derive(Debug, Clone)]
struct LocalVar {
    type_ref: TypeRef,
    literal: Option<String>,
}

struct BodyContext<'m> {
    method_fqn: String,
    owner_fqn: String,
    path: String,
    params: IndexMap<String, TypeRef>,
    locals: IndexMap<String, LocalVar>,
    builder: &'m ModelBuilder,
}

#[allow(clippy::too_many_arguments)]
fn visit_method(
    node: tree_sitter::Node<'_>,
    source: &str,
    path: &str,
    owner_fqn: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    builder: &ModelBuilder,
    out: &mut CallExtraction,
) {
    let (fqn, _, parameters) = method_signature(owner_fqn, node, source, resolver, declared);
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let mut ctx = BodyContext {
        method_fqn: fqn,
        owner_fqn: owner_fqn.to_owned(),
        path: path.to_owned(),
        params: parameters
            .into_iter()
            .map(|p| (p.name, p.type_ref))
            .collect(),
        locals: IndexMap::new(),
        builder,
    };
    walk_body(body, source, resolver, declared, &mut ctx, out);
}

/// In-order walk of a method body. Locals enter the environment as their
/// declarations are passed, so a use before its declaration never resolves.
fn walk_body(
    node: tree_sitter::Node<'_>,
    source: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    ctx: &mut BodyContext<'_>,
    out: &mut CallExtraction,
) {
    match node.kind() {
        "local_variable_declaration" => {
            record_local(node, source, resolver, declared, ctx);
        }
        "method_invocation" => {
            emit_invocation(node, source, resolver, declared, ctx, out);
        }
        "object_creation_expression" => {
            emit_constructor(node, source, resolver, declared, ctx, out);
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk_body(child, source, resolver, declared, ctx, out);
    }
}

fn record_local(
    node: tree_sitter::Node<'_>,
    source: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    ctx: &mut BodyContext<'_>,
) {
    let type_ref = node
        .child_by_field_name("type")
        .map(|t| resolver.type_ref_of(t, source, declared))
        .unwrap_or_else(TypeRef::unknown);
    let mut cursor = node.walk();
    for declarator in node.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };
        let literal = declarator
            .child_by_field_name("value")
            .filter(|v| v.kind() == "string_literal")
            .map(|v| string_literal_value(v, source));
        ctx.locals.insert(
            node_text(name_node, source).to_owned(),
            LocalVar {
                type_ref: type_ref.clone(),
                literal,
            },
        );
    }
}

fn emit_invocation(
    node: tree_sitter::Node<'_>,
    source: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    ctx: &mut BodyContext<'_>,
    out: &mut CallExtraction,
) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(name_node, source);
    let object = node.child_by_field_name("object");
    let raw_callee = match object {
        Some(obj) => format!("{}.{}", node_text(obj, source), name),
        None => name.to_owned(),
    };

    let (declaring_type, kind) = resolve_qualifier(object, source, resolver, declared, ctx, out);
    let arguments = collect_arguments(node, source, ctx);
    let resolved = declaring_type.map(|t| {
        let arg_fqns: Vec<String> = arguments.iter().map(|a| a.type_fqn.clone()).collect();
        method_fqn(&t, name, &arg_fqns)
    });

    let (line, column) = node_position(node);
    out.edges.push(CallEdge {
        caller: ctx.method_fqn.clone(),
        raw_callee,
        resolved,
        kind,
        location: Location::new(&ctx.path, line, column),
        arguments,
    });
}

fn emit_constructor(
    node: tree_sitter::Node<'_>,
    source: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    ctx: &mut BodyContext<'_>,
    out: &mut CallExtraction,
) {
    let Some(type_node) = node.child_by_field_name("type") else {
        return;
    };
    let type_ref = resolver.type_ref_of(type_node, source, declared);
    let arguments = collect_arguments(node, source, ctx);
    let arg_fqns: Vec<String> = arguments.iter().map(|a| a.type_fqn.clone()).collect();

    let (line, column) = node_position(node);
    out.edges.push(CallEdge {
        caller: ctx.method_fqn.clone(),
        raw_callee: format!("new {}", node_text(type_node, source)),
        resolved: Some(method_fqn(type_ref.base_fqn(), CONSTRUCTOR_NAME, &arg_fqns)),
        kind: CallKind::Constructor,
        location: Location::new(&ctx.path, line, column),
        arguments,
    });
}

/// The qualifier → declaring type ladder.
fn resolve_qualifier(
    object: Option<tree_sitter::Node<'_>>,
    source: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    ctx: &BodyContext<'_>,
    out: &mut CallExtraction,
) -> (Option<String>, CallKind) {
    let Some(obj) = object else {
        return (Some(ctx.owner_fqn.clone()), CallKind::Direct);
    };
    match obj.kind() {
        "this" => (Some(ctx.owner_fqn.clone()), CallKind::Direct),
        "identifier" => resolve_identifier(node_text(obj, source), resolver, declared, ctx, out),
        "field_access" => {
            let inner = obj.child_by_field_name("object");
            let field = obj.child_by_field_name("field");
            if let (Some(inner), Some(field)) = (inner, field) {
                if inner.kind() == "this" {
                    let field_name = node_text(field, source);
                    if let Some(t) = field_type(field_name, ctx, out) {
                        return (Some(t), CallKind::Virtual);
                    }
                    return (None, CallKind::Virtual);
                }
            }
            // Dotted chain: attribute the call to the leftmost segment.
            let mut leftmost = obj;
            while let Some(next) = leftmost.child_by_field_name("object") {
                leftmost = next;
            }
            if leftmost.kind() == "identifier" {
                let (resolved, _) =
                    resolve_identifier(node_text(leftmost, source), resolver, declared, ctx, out);
                (resolved, CallKind::Virtual)
            } else {
                (None, CallKind::Virtual)
            }
        }
        _ => (None, CallKind::Virtual),
    }
}

fn resolve_identifier(
    name: &str,
    resolver: &TypeResolver,
    declared: &IndexSet<String>,
    ctx: &BodyContext<'_>,
    out: &mut CallExtraction,
) -> (Option<String>, CallKind) {
    if let Some(t) = ctx.params.get(name) {
        return (Some(t.base_fqn().to_owned()), CallKind::Virtual);
    }
    if let Some(local) = ctx.locals.get(name) {
        return (Some(local.type_ref.base_fqn().to_owned()), CallKind::Virtual);
    }
    if let Some(t) = field_type(name, ctx, out) {
        return (Some(t), CallKind::Virtual);
    }
    if let Some(fqn) = resolver.imported(name) {
        return (Some(fqn.to_owned()), CallKind::Static);
    }
    if name.chars().next().is_some_and(char::is_uppercase) {
        return (Some(resolver.resolve_name(name, declared)), CallKind::Static);
    }
    if LOGGER_NAMES.contains(&name) {
        return (Some(LOGGER_TYPE.to_owned()), CallKind::Virtual);
    }
    (None, CallKind::Virtual)
}

/// Field lookup against the half-built model, current type first, then
/// supertypes as far as they are declared in the repository. A hit also
/// records an Accesses relationship.
fn field_type(name: &str, ctx: &BodyContext<'_>, out: &mut CallExtraction) -> Option<String> {
    let mut current = Some(ctx.owner_fqn.clone());
    let mut hops = 0;
    while let Some(type_fqn) = current {
        if hops > 64 {
            break;
        }
        let field_fqn = girder_model::names::field_fqn(&type_fqn, name);
        if let Some(field) = ctx.builder.get_field(&field_fqn) {
            out.accesses.push(Relationship::new(
                ctx.method_fqn.clone(),
                field_fqn,
                RelationshipKind::Accesses,
            ));
            return Some(field.type_ref.base_fqn().to_owned());
        }
        current = ctx
            .builder
            .get_type(&type_fqn)
            .and_then(|t| t.supertypes.first())
            .map(|s| s.base_fqn().to_owned())
            .filter(|s| ctx.builder.has_type(s));
        hops += 1;
    }
    None
}

fn collect_arguments(
    node: tree_sitter::Node<'_>,
    source: &str,
    ctx: &BodyContext<'_>,
) -> Vec<CallArgument> {
    let Some(args) = node.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut cursor = args.walk();
    args.named_children(&mut cursor)
        .map(|arg| argument_of(arg, source, ctx))
        .collect()
}

/// Literal and identifier typing for a single argument expression.
fn argument_of(
    node: tree_sitter::Node<'_>,
    source: &str,
    ctx: &BodyContext<'_>,
) -> CallArgument {
    match node.kind() {
        "string_literal" => CallArgument {
            type_fqn: "java.lang.String".to_owned(),
            literal: Some(string_literal_value(node, source)),
            identifier: None,
        },
        "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal"
        | "binary_integer_literal" => {
            let text = node_text(node, source);
            let fqn = if text.ends_with('l') || text.ends_with('L') {
                "long"
            } else {
                "int"
            };
            CallArgument::of_type(fqn)
        }
        "decimal_floating_point_literal" | "hex_floating_point_literal" => {
            let text = node_text(node, source);
            let fqn = if text.ends_with('f') || text.ends_with('F') {
                "float"
            } else {
                "double"
            };
            CallArgument::of_type(fqn)
        }
        "true" | "false" => CallArgument::of_type("boolean"),
        "character_literal" => CallArgument::of_type("char"),
        "null_literal" => CallArgument::unknown(),
        "identifier" => {
            let name = node_text(node, source);
            if let Some(t) = ctx.params.get(name) {
                return CallArgument {
                    type_fqn: t.fqn.clone(),
                    literal: None,
                    identifier: Some(name.to_owned()),
                };
            }
            if let Some(local) = ctx.locals.get(name) {
                return CallArgument {
                    type_fqn: local.type_ref.fqn.clone(),
                    literal: local.literal.clone(),
                    identifier: Some(name.to_owned()),
                };
            }
            let field_fqn = girder_model::names::field_fqn(&ctx.owner_fqn, name);
            if let Some(field) = ctx.builder.get_field(&field_fqn) {
                return CallArgument {
                    type_fqn: field.type_ref.fqn.clone(),
                    literal: None,
                    identifier: Some(name.to_owned()),
                };
            }
            CallArgument {
                type_fqn: UNKNOWN_TYPE.to_owned(),
                literal: None,
                identifier: Some(name.to_owned()),
            }
        }
        _ => CallArgument::unknown(),
    }
}

/// Content of a string literal without the surrounding quotes.
fn string_literal_value(node: tree_sitter::Node<'_>, source: &str) -> String {
    let text = node_text(node, source);
    text.trim_start_matches('"')
        .trim_end_matches('"')
        .to_owned()
}
