//! End-to-end scenarios: Java sources in, violations out.

use indoc::indoc;

use girder_graph::{CallGraph, DependencyGraph};
use girder_java::ModelPipeline;
use girder_rules::{assemble, AnalysisConfig, RuleDefinition, Verdict, Violation};

fn analyze(sources: &[(&str, &str)], rules_json: &[&str]) -> Vec<Violation> {
    let owned: Vec<(String, String)> = sources
        .iter()
        .map(|(p, s)| ((*p).to_owned(), (*s).to_owned()))
        .collect();
    let out = ModelPipeline::new()
        .expect("grammar loads")
        .build_from_sources(&owned);
    let calls = CallGraph::build(&out.model, &out.edges);
    let deps = DependencyGraph::build(&out.model);
    let rules: Vec<RuleDefinition> = rules_json
        .iter()
        .map(|json| serde_json::from_str(json).expect("rule parses"))
        .collect();
    girder_rules::evaluate(&rules, &out.model, &calls, &deps)
}

#[test]
fn transaction_boundary_positive() {
    let violations = analyze(
        &[
            (
                "svc/OrderService.java",
                indoc! {r#"
                    package svc;

                    import net.HttpClient;

                    public class OrderService {
                        private HttpClient client;

                        @Transactional
                        public void createOrder(Order order) {
                            client.post("http://inventory/reserve", "payload");
                        }
                    }
                "#},
            ),
            ("svc/Order.java", "package svc; public class Order {}"),
        ],
        &[r#"{
            "id": "TX-BOUNDARY-001",
            "severity": "ERROR",
            "detection": { "sinks": { "types": ["net.HttpClient"] } }
        }"#],
    );

    assert_eq!(violations.len(), 1);
    let v = &violations[0];
    assert_eq!(v.rule_id, "TX-BOUNDARY-001");
    assert_eq!(
        v.call_chain.as_deref(),
        Some(
            &[
                "svc.OrderService#createOrder(svc.Order)".to_owned(),
                "net.HttpClient#post(java.lang.String,java.lang.String)".to_owned(),
            ][..]
        )
    );
}

#[test]
fn async_and_transactional_on_same_method() {
    let violations = analyze(
        &[(
            "foo/Worker.java",
            indoc! {r#"
                package foo;

                public class Worker {
                    @Async
                    @Transactional
                    public void run() {}
                }
            "#},
        )],
        &[r#"{ "id": "ASYNC-TX-001", "severity": "ERROR" }"#],
    );

    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("run"));
}

#[test]
fn nested_transaction_through_intermediate_method() {
    let violations = analyze(
        &[
            (
                "a/A.java",
                indoc! {r#"
                    package a;
                    import b.B;
                    public class A {
                        private B b;
                        @Transactional
                        public void m() { b.n(); }
                    }
                "#},
            ),
            (
                "b/B.java",
                indoc! {r#"
                    package b;
                    import c.C;
                    public class B {
                        private C c;
                        public void n() { c.k(); }
                    }
                "#},
            ),
            (
                "c/C.java",
                indoc! {r#"
                    package c;
                    public class C {
                        @Transactional
                        public void k() {}
                    }
                "#},
            ),
        ],
        &[r#"{ "id": "NESTED-TX-PROPAGATION-001", "severity": "WARN" }"#],
    );

    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].call_chain.as_deref(),
        Some(&["a.A#m()".to_owned(), "b.B#n()".to_owned(), "c.C#k()".to_owned()][..])
    );
}

#[test]
fn library_boundary_stops_traversal() {
    // ext.Ext is not part of the model, so nothing beyond it is reachable
    // and neither marker rule fires on this chain.
    let violations = analyze(
        &[
            (
                "x/X.java",
                indoc! {r#"
                    package x;
                    import y.Y;
                    public class X {
                        private Y y;
                        @Async
                        public void m() { y.n(); }
                    }
                "#},
            ),
            (
                "y/Y.java",
                indoc! {r#"
                    package y;
                    import ext.Ext;
                    public class Y {
                        private Ext ext;
                        public void n() { ext.op(); }
                    }
                "#},
            ),
        ],
        &[
            r#"{ "id": "ASYNC-TX-001", "severity": "ERROR" }"#,
            r#"{ "id": "NESTED-TX-PROPAGATION-001", "severity": "WARN" }"#,
        ],
    );

    assert!(violations.is_empty());
}

#[test]
fn duplicate_table_update_groups_by_table() {
    let violations = analyze(
        &[(
            "svc/AccountService.java",
            indoc! {r#"
                package svc;

                import org.springframework.jdbc.core.JdbcTemplate;

                public class AccountService {
                    private JdbcTemplate jdbc;

                    @Transactional
                    public void apply() {
                        jdbc.update("UPDATE users SET name=? WHERE id=?");
                        jdbc.update("UPDATE users SET email=?");
                        jdbc.update("UPDATE orders SET total=?");
                    }
                }
            "#},
        )],
        &[r#"{ "id": "DUPLICATE-TABLE-UPDATE-001", "severity": "WARN" }"#],
    );

    assert_eq!(violations.len(), 1);
    let v = &violations[0];
    assert_eq!(v.context.get("table").map(String::as_str), Some("users"));
    assert_eq!(v.context.get("update_count").map(String::as_str), Some("2"));
    assert!(v.message.contains("line 10"));
    assert!(v.message.contains("line 11"));
    assert!(!v.message.contains("orders"));
}

#[test]
fn duplicate_table_update_follows_parameter_bindings() {
    let violations = analyze(
        &[(
            "svc/LedgerService.java",
            indoc! {r#"
                package svc;

                import org.springframework.jdbc.core.JdbcTemplate;

                public class LedgerService {
                    private JdbcTemplate jdbc;

                    @Transactional
                    public void rebalance() {
                        jdbc.update("UPDATE accounts SET debit=?");
                        write("UPDATE accounts SET credit=?");
                    }

                    void write(String sql) {
                        jdbc.update(sql);
                    }
                }
            "#},
        )],
        &[r#"{ "id": "DUPLICATE-TABLE-UPDATE-001", "severity": "WARN" }"#],
    );

    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].context.get("table").map(String::as_str),
        Some("accounts")
    );
}

#[test]
fn package_cycle_is_reported_at_package_level() {
    let violations = analyze(
        &[
            (
                "p/a/Foo.java",
                indoc! {r#"
                    package p.a;
                    import p.b.Bar;
                    public class Foo {
                        Bar bar;
                    }
                "#},
            ),
            (
                "p/b/Bar.java",
                indoc! {r#"
                    package p.b;
                    import p.a.Foo;
                    public class Bar {
                        Foo foo;
                    }
                "#},
            ),
        ],
        &[r#"{ "id": "CIRCULAR-DEPENDENCY-001", "severity": "ERROR" }"#],
    );

    assert_eq!(violations.len(), 1);
    let v = &violations[0];
    assert_eq!(v.location.file, "package-level");
    let chain = v.call_chain.as_ref().unwrap();
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.first(), chain.last());
}

#[test]
fn transactional_calling_async_is_flagged() {
    let violations = analyze(
        &[(
            "svc/Mixed.java",
            indoc! {r#"
                package svc;

                public class Mixed {
                    @Transactional
                    public void save() { refresh(); }

                    @Async
                    public void refresh() {}
                }
            "#},
        )],
        &[r#"{ "id": "TX-ASYNC-001", "severity": "ERROR" }"#],
    );

    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].context.get("async_method").map(String::as_str),
        Some("svc.Mixed#refresh()")
    );
}

#[test]
fn retryable_reaching_mail_sender_is_flagged() {
    let violations = analyze(
        &[(
            "svc/Mailer.java",
            indoc! {r#"
                package svc;

                import org.springframework.mail.javamail.JavaMailSender;

                public class Mailer {
                    private JavaMailSender mailSender;

                    @Retryable
                    public void dispatch() {
                        mailSender.send("welcome");
                    }
                }
            "#},
        )],
        &[r#"{ "id": "RETRY-IDEMPOTENCY-001", "severity": "ERROR" }"#],
    );

    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].context.get("reason").map(String::as_str),
        Some("non-idempotent sink")
    );
}

#[test]
fn scheduled_without_resilience_is_flagged() {
    let violations = analyze(
        &[(
            "svc/Jobs.java",
            indoc! {r#"
                package svc;

                public class Jobs {
                    @Scheduled
                    public void nightly() { sweep(); }

                    void sweep() {}
                }
            "#},
        )],
        &[r#"{ "id": "SCHEDULED-RESILIENCY-001", "severity": "WARN" }"#],
    );
    assert_eq!(violations.len(), 1);

    let covered = analyze(
        &[(
            "svc/Jobs.java",
            indoc! {r#"
                package svc;

                public class Jobs {
                    @Scheduled
                    public void nightly() { sweep(); }

                    @Retryable
                    void sweep() {}
                }
            "#},
        )],
        &[r#"{ "id": "SCHEDULED-RESILIENCY-001", "severity": "WARN" }"#],
    );
    assert!(covered.is_empty());
}

#[test]
fn layering_rule_flags_service_reaching_controller() {
    let violations = analyze(
        &[
            (
                "svc/ReportService.java",
                indoc! {r#"
                    package svc;
                    import web.PageController;
                    public class ReportService {
                        private PageController controller;
                        public void render() { controller.show(); }
                    }
                "#},
            ),
            (
                "web/PageController.java",
                indoc! {r#"
                    package web;
                    public class PageController {
                        public void show() {}
                    }
                "#},
            ),
        ],
        &[r#"{
            "id": "LAYERING-001",
            "severity": "ERROR",
            "target": { "name_pattern": ".*Service.*" },
            "constraints": { "forbidden_calls": [".*Controller.*"] }
        }"#],
    );

    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].context.get("forbidden").map(String::as_str),
        Some("web.PageController#show()")
    );
}

#[test]
fn generic_path_rule_with_constraints() {
    let rule = r#"{
        "id": "NO-AUDIT-BYPASS-001",
        "severity": "WARN",
        "detection": {
            "entry_points": { "annotations": ["Entry"] },
            "sinks": { "types": ["db.Store"] },
            "path_constraints": { "must_not_contain": ["Audited"] }
        }
    }"#;
    let sources = [
        (
            "svc/Direct.java",
            indoc! {r#"
                package svc;
                import db.Store;
                public class Direct {
                    private Store store;
                    @Entry
                    public void run() { store.write(); }
                }
            "#},
        ),
        (
            "svc/Checked.java",
            indoc! {r#"
                package svc;
                public class Checked {
                    private AuditedGateway gateway;
                    @Entry
                    public void run() { gateway.write(); }
                }
            "#},
        ),
        (
            "svc/AuditedGateway.java",
            indoc! {r#"
                package svc;
                import db.Store;
                public class AuditedGateway {
                    private Store store;
                    public void write() { store.write(); }
                }
            "#},
        ),
    ];
    let violations = analyze(&sources, &[rule]);

    // The direct path is flagged; the one through the audited gateway is
    // filtered by must_not_contain.
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].context.get("entry").map(String::as_str),
        Some("svc.Direct#run()")
    );
}

#[test]
fn empty_repository_passes() {
    let violations = analyze(
        &[],
        &[
            r#"{ "id": "TX-BOUNDARY-001", "severity": "BLOCKER" }"#,
            r#"{ "id": "CIRCULAR-DEPENDENCY-001", "severity": "ERROR" }"#,
        ],
    );
    let report = assemble(violations, &AnalysisConfig::default());
    assert_eq!(report.verdict, Verdict::Pass);
    assert_eq!(report.summary.total(), 0);
}

#[test]
fn repeated_runs_produce_identical_reports() {
    let sources = [(
        "svc/Mixed.java",
        indoc! {r#"
            package svc;

            public class Mixed {
                @Transactional
                public void save() { refresh(); }

                @Async
                public void refresh() {}
            }
        "#},
    )];
    let rules = [r#"{ "id": "TX-ASYNC-001", "severity": "BLOCKER" }"#];

    let first = assemble(analyze(&sources, &rules), &AnalysisConfig::default());
    let second = assemble(analyze(&sources, &rules), &AnalysisConfig::default());
    assert_eq!(first.to_json(), second.to_json());
    assert_eq!(first.verdict, Verdict::Fail);
}

#[test]
fn path_rule_must_contain_keeps_only_matching_chains() {
    let rule = r#"{
        "id": "VIA-GATEWAY-001",
        "severity": "INFO",
        "detection": {
            "entry_points": { "annotations": ["Entry"] },
            "sinks": { "types": ["db.Store"] },
            "path_constraints": { "must_contain": ["Gateway"] }
        }
    }"#;
    let violations = analyze(
        &[
            (
                "svc/Direct.java",
                indoc! {r#"
                    package svc;
                    import db.Store;
                    public class Direct {
                        private Store store;
                        @Entry
                        public void run() { store.write(); }
                    }
                "#},
            ),
            (
                "svc/Routed.java",
                indoc! {r#"
                    package svc;
                    public class Routed {
                        private Gateway gateway;
                        @Entry
                        public void run() { gateway.write(); }
                    }
                "#},
            ),
            (
                "svc/Gateway.java",
                indoc! {r#"
                    package svc;
                    import db.Store;
                    public class Gateway {
                        private Store store;
                        public void write() { store.write(); }
                    }
                "#},
            ),
        ],
        &[rule],
    );

    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].context.get("entry").map(String::as_str),
        Some("svc.Routed#run()")
    );
}

#[test]
fn path_rule_max_depth_discards_long_chains() {
    let sources = [
        (
            "svc/Chain.java",
            indoc! {r#"
                package svc;
                import db.Store;
                public class Chain {
                    private Store store;
                    @Entry
                    public void top() { mid(); }
                    void mid() { store.write(); }
                }
            "#},
        ),
    ];
    let shallow = r#"{
        "id": "SHALLOW-001",
        "severity": "INFO",
        "detection": {
            "entry_points": { "annotations": ["Entry"] },
            "sinks": { "types": ["db.Store"] },
            "path_constraints": { "max_depth": 1 }
        }
    }"#;
    let deep = r#"{
        "id": "DEEP-001",
        "severity": "INFO",
        "detection": {
            "entry_points": { "annotations": ["Entry"] },
            "sinks": { "types": ["db.Store"] },
            "path_constraints": { "max_depth": 2 }
        }
    }"#;

    // The chain top -> mid -> db.Store#write() has two edges.
    assert!(analyze(&sources, &[shallow]).is_empty());
    assert_eq!(analyze(&sources, &[deep]).len(), 1);
}
