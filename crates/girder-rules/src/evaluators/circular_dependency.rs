//! One violation per package cycle reported by the dependency graph.

use girder_model::Location;

use crate::definition::RuleDefinition;
use crate::engine::{EvalContext, Evaluator};
use crate::violation::Violation;

use super::id_matches;

pub struct CircularDependencyEvaluator;

impl Evaluator for CircularDependencyEvaluator {
    fn name(&self) -> &'static str {
        "circular-dependency"
    }

    fn supports(&self, rule: &RuleDefinition) -> bool {
        id_matches(&rule.id, &["CIRCULAR-DEPENDENCY", "CYCLE"])
    }

    fn evaluate(&self, rule: &RuleDefinition, ctx: &EvalContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for cycle in ctx.deps.cycles() {
            let rendered: Vec<String> = cycle.iter().map(|p| shorten(p)).collect();
            let subject = cycle.join("->");
            violations.push(
                Violation::new(
                    rule.id.clone(),
                    rule.severity,
                    format!("package dependency cycle: {}", rendered.join(" -> ")),
                    Location::synthetic("package-level"),
                    &subject,
                )
                .with_chain(cycle.clone())
                .with_context("cycle_length", (cycle.len() - 1).to_string())
                .with_context("packages", rendered.join(" -> ")),
            );
        }
        violations
    }
}

/// Last two or three segments of a package name, enough to recognize it
/// without the full groupId prefix.
fn shorten(package: &str) -> String {
    let segments: Vec<&str> = package.split('.').collect();
    if segments.len() <= 3 {
        package.to_owned()
    } else {
        segments[segments.len() - 3..].join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::shorten;

    #[test]
    fn short_packages_stay_whole() {
        assert_eq!(shorten("p.a"), "p.a");
        assert_eq!(shorten("com.shop.orders"), "com.shop.orders");
    }

    #[test]
    fn long_packages_keep_three_segments() {
        assert_eq!(shorten("io.example.shop.orders.internal"), "shop.orders.internal");
    }
}
