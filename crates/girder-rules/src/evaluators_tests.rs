use crate::definition::RuleDefinition;
use crate::evaluators::default_registry;

fn rule(id: &str) -> RuleDefinition {
    serde_json::from_str(&format!(r#"{{ "id": "{id}", "severity": "WARN" }}"#)).unwrap()
}

fn rule_with_detection(id: &str) -> RuleDefinition {
    serde_json::from_str(&format!(
        r#"{{
            "id": "{id}",
            "severity": "WARN",
            "detection": {{ "sinks": {{ "types": ["net.HttpClient"] }} }}
        }}"#
    ))
    .unwrap()
}

fn dispatched(rule: &RuleDefinition) -> Option<&'static str> {
    default_registry()
        .into_iter()
        .find(|e| e.supports(rule))
        .map(|e| e.name())
}

#[test]
fn current_ids_dispatch_to_their_families() {
    assert_eq!(dispatched(&rule("TX-BOUNDARY-001")), Some("transaction-boundary"));
    assert_eq!(dispatched(&rule("ASYNC-TX-001")), Some("async-transaction"));
    assert_eq!(dispatched(&rule("TX-ASYNC-001")), Some("transaction-async"));
    assert_eq!(
        dispatched(&rule("RETRY-IDEMPOTENCY-001")),
        Some("retry-idempotency")
    );
    assert_eq!(
        dispatched(&rule("NESTED-TX-PROPAGATION-001")),
        Some("nested-transaction")
    );
    assert_eq!(
        dispatched(&rule("SCHEDULED-RESILIENCY-001")),
        Some("scheduled-resiliency")
    );
    assert_eq!(dispatched(&rule("LAYERING-001")), Some("layering"));
    assert_eq!(
        dispatched(&rule("CIRCULAR-DEPENDENCY-001")),
        Some("circular-dependency")
    );
    assert_eq!(
        dispatched(&rule("DUPLICATE-TABLE-UPDATE-001")),
        Some("duplicate-table-update")
    );
}

#[test]
fn legacy_alias_ids_reach_the_same_evaluator() {
    assert_eq!(
        dispatched(&rule("TRANSACTION-BOUNDARY-001")),
        Some("transaction-boundary")
    );
    assert_eq!(
        dispatched(&rule("ASYNC-TRANSACTIONAL-001")),
        Some("async-transaction")
    );
    assert_eq!(
        dispatched(&rule("TRANSACTIONAL-ASYNC-001")),
        Some("transaction-async")
    );
    assert_eq!(dispatched(&rule("RETRY-001")), Some("retry-idempotency"));
    assert_eq!(
        dispatched(&rule("NESTED-TRANSACTION-001")),
        Some("nested-transaction")
    );
    assert_eq!(dispatched(&rule("SCHEDULED-001")), Some("scheduled-resiliency"));
    assert_eq!(dispatched(&rule("LAYER-001")), Some("layering"));
    assert_eq!(dispatched(&rule("CYCLE-001")), Some("circular-dependency"));
    assert_eq!(
        dispatched(&rule("DUPLICATE-UPDATE-001")),
        Some("duplicate-table-update")
    );
}

#[test]
fn detection_block_falls_through_to_path_reachability() {
    assert_eq!(
        dispatched(&rule_with_detection("NO-AUDIT-BYPASS-001")),
        Some("path-reachability")
    );
}

#[test]
fn family_id_wins_over_generic_detection_dispatch() {
    // A boundary rule that also carries a detection block still goes to
    // its family evaluator, which folds the extra sinks in itself.
    assert_eq!(
        dispatched(&rule_with_detection("TX-BOUNDARY-002")),
        Some("transaction-boundary")
    );
}

#[test]
fn unknown_id_without_detection_is_unsupported() {
    assert_eq!(dispatched(&rule("SOMETHING-ELSE-001")), None);
}
