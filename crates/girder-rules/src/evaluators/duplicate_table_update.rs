//! Duplicate same-table updates inside one transactional scope.
//!
//! Walks the call graph from each transactional entry, collecting database
//! template calls whose SQL literal names a written table. Literals passed
//! down through parameters are substituted along the chain so the table is
//! still recoverable at the sink.

use indexmap::IndexMap;
use regex::Regex;

use girder_model::names::method_name_of;
use girder_model::MethodEntity;

use crate::catalog::{
    DB_TEMPLATE_TYPES, DB_UPDATE_METHOD_PREFIXES, TABLE_NAME_PATTERN, TRANSACTIONAL_MARKER,
};
use crate::definition::RuleDefinition;
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

use super::{id_matches, methods_with_marker};

pub struct DuplicateTableUpdateEvaluator;

#[derive(Debug)]
struct UpdateOp {
    table: String,
    chain: Vec<String>,
    line: u32,
}

impl Evaluator for DuplicateTableUpdateEvaluator {
    fn name(&self) -> &'static str {
        "duplicate-table-update"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        id_matches(&rule.id, &["DUPLICATE-TABLE", "DUPLICATE-UPDATE"])
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        let table_pattern =
            Regex::new(TABLE_NAME_PATTERN).expect("compiled-in table pattern is valid");
        let max_depth = rule.max_search_depth();

        let mut violations = Vec::new();
        for entry in methods_with_marker(ctx, TRANSACTIONAL_MARKER) {
            let mut ops = Vec::new();
            let mut chain = vec![entry.fqn.clone()];
            collect_update_ops(
                ctx,
                &entry.fqn,
                &IndexMap::new(),
                &mut chain,
                max_depth,
                &table_pattern,
                &mut ops,
            );

            let mut by_table: IndexMap<String, Vec<UpdateOp>> = IndexMap::new();
            for op in ops {
                by_table.entry(op.table.clone()).or_default().push(op);
            }
            for (table, ops) in by_table {
                if ops.len() < 2 {
                    continue;
                }
                let sites: Vec<String> = ops
                    .iter()
                    .map(|op| format!("{} (line {})", op.chain.join(" -> "), op.line))
                    .collect();
                violations.push(
                    Violation::new(
                        rule.id.clone(),
                        rule.severity,
                        format!(
                            "transactional method '{}' updates table '{}' {} times: {}",
                            entry.fqn,
                            table,
                            ops.len(),
                            sites.join("; ")
                        ),
                        entry.location.clone(),
                        &format!("{}:{}", entry.fqn, table),
                    )
                    .with_chain(ops[0].chain.clone())
                    .with_context("table", table)
                    .with_context("update_count", ops.len().to_string()),
                );
            }
        }
        violations
    }
}

/// Depth-first walk over application calls, carrying parameter bindings so
/// a literal passed by a caller is visible at the template call site.
fn collect_update_ops(
    ctx: &EvalContext<'_>,
    node: &str,
    bindings: &IndexMap<String, String>,
    chain: &mut Vec<String>,
    depth_left: usize,
    table_pattern: &Regex,
    out: &mut Vec<UpdateOp>,
) {
    if depth_left == 0 {
        return;
    }
    for edge in ctx.calls.callees(node) {
        let Some(resolved) = edge.resolved.as_deref() else {
            continue;
        };
        if is_template_write(resolved) {
            let sql = edge.arguments.first().and_then(|arg| {
                arg.literal.clone().or_else(|| {
                    arg.identifier
                        .as_ref()
                        .and_then(|name| bindings.get(name).cloned())
                })
            });
            let Some(sql) = sql else { continue };
            if let Some(caps) = table_pattern.captures(&sql) {
                out.push(UpdateOp {
                    table: caps[1].to_lowercase(),
                    chain: chain.clone(),
                    line: edge.location.line,
                });
            }
            continue;
        }
        if !ctx.calls.is_application(resolved) || chain.iter().any(|m| m == resolved) {
            continue;
        }
        let callee_bindings = ctx
            .model
            .get_method(resolved)
            .map(|callee| bind_arguments(callee, edge, bindings))
            .unwrap_or_default();
        chain.push(resolved.to_owned());
        collect_update_ops(
            ctx,
            resolved,
            &callee_bindings,
            chain,
            depth_left - 1,
            table_pattern,
            out,
        );
        chain.pop();
    }
}

fn is_template_write(fqn: &str) -> bool {
    let template = DB_TEMPLATE_TYPES
        .iter()
        .any(|t| fqn.starts_with(&format!("{t}#")));
    if !template {
        return false;
    }
    method_name_of(fqn).is_some_and(|name| {
        DB_UPDATE_METHOD_PREFIXES
            .iter()
            .any(|p| name.starts_with(p))
    })
}

/// Map callee parameter names to string literals known at the call site,
/// either directly or through the caller's own bindings.
fn bind_arguments(
    callee: &MethodEntity,
    edge: &girder_model::CallEdge,
    caller_bindings: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut bindings = IndexMap::new();
    for (param, arg) in callee.parameters.iter().zip(&edge.arguments) {
        let literal = arg.literal.clone().or_else(|| {
            arg.identifier
                .as_ref()
                .and_then(|name| caller_bindings.get(name).cloned())
        });
        if let Some(literal) = literal {
            bindings.insert(param.name.clone(), literal);
        }
    }
    bindings
}
