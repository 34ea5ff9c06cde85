use indoc::indoc;

use girder_model::{Modifier, RelationshipKind, TypeKind};

use crate::test_utils::{build, build_one};

#[test]
fn class_with_package_and_annotations() {
    let out = build_one(indoc! {r#"
        package com.shop;

        import org.springframework.stereotype.Service;

        @Service
        public final class OrderService {
            private int count;

            public void create() {}
        }
    "#});
    let model = &out.model;

    let t = model.get_type("com.shop.OrderService").expect("type present");
    assert_eq!(t.simple_name, "OrderService");
    assert_eq!(t.package, "com.shop");
    assert_eq!(t.kind, TypeKind::Class);
    assert!(t.modifiers.contains(&Modifier::Public));
    assert!(t.modifiers.contains(&Modifier::Final));
    assert!(t.has_annotation("Service"));
    assert!(t.is_component);
    assert_eq!(
        t.annotations[0].fqn.as_deref(),
        Some("org.springframework.stereotype.Service")
    );

    let m = model
        .get_method("com.shop.OrderService#create()")
        .expect("method present");
    assert!(m.is_component_member);
    assert_eq!(m.return_type.fqn, "void");

    let f = model
        .get_field("com.shop.OrderService#count")
        .expect("field present");
    assert_eq!(f.type_ref.fqn, "int");
    assert!(f.type_ref.is_primitive);
}

#[test]
fn nested_types_get_dotted_fqns() {
    let out = build_one(indoc! {r#"
        package com.shop;

        class Outer {
            static class Inner {
                void run() {}
            }
        }
    "#});
    let model = &out.model;
    assert!(model.get_type("com.shop.Outer").is_some());
    let inner = model.get_type("com.shop.Outer.Inner").expect("nested type");
    assert!(inner.modifiers.contains(&Modifier::Static));
    assert!(model
        .get_method("com.shop.Outer.Inner#run()")
        .is_some());
}

#[test]
fn interface_enum_record_annotation_kinds() {
    let out = build_one(indoc! {r#"
        package com.shop;

        interface Repo {}
        enum Status { OPEN, CLOSED }
        record Point(int x, int y) {}
        @interface Marker {}
    "#});
    let model = &out.model;
    assert_eq!(model.get_type("com.shop.Repo").unwrap().kind, TypeKind::Interface);
    assert_eq!(model.get_type("com.shop.Status").unwrap().kind, TypeKind::Enum);
    assert_eq!(model.get_type("com.shop.Point").unwrap().kind, TypeKind::Record);
    assert_eq!(
        model.get_type("com.shop.Marker").unwrap().kind,
        TypeKind::Annotation
    );
    // Record components double as fields.
    assert!(model.get_field("com.shop.Point#x").is_some());
    assert!(model.get_field("com.shop.Point#y").is_some());
}

#[test]
fn constructors_use_init_name_and_owner_return() {
    let out = build_one(indoc! {r#"
        package com.shop;

        class Order {
            Order(long id) {}
        }
    "#});
    let model = &out.model;
    let ctor = model
        .get_method("com.shop.Order#<init>(long)")
        .expect("constructor present");
    assert!(ctor.is_constructor());
    assert_eq!(ctor.return_type.fqn, "com.shop.Order");
}

#[test]
fn supertypes_and_interfaces_produce_edges() {
    let out = build(&[
        (
            "Base.java",
            indoc! {r#"
                package com.shop;
                class Base {}
                interface Audited {}
            "#},
        ),
        (
            "Order.java",
            indoc! {r#"
                package com.shop;
                class Order extends Base implements Audited {}
            "#},
        ),
    ]);
    let model = &out.model;
    let order = model.get_type("com.shop.Order").unwrap();
    assert_eq!(order.supertypes[0].fqn, "com.shop.Base");
    assert_eq!(order.interfaces[0].fqn, "com.shop.Audited");

    let inherits: Vec<_> = model
        .relationships_of_kind(RelationshipKind::Inherits)
        .collect();
    assert!(inherits
        .iter()
        .any(|r| r.source == "com.shop.Order" && r.target == "com.shop.Base"));
    let implements: Vec<_> = model
        .relationships_of_kind(RelationshipKind::Implements)
        .collect();
    assert!(implements
        .iter()
        .any(|r| r.source == "com.shop.Order" && r.target == "com.shop.Audited"));
}

#[test]
fn throws_and_generic_parameter_types() {
    let out = build_one(indoc! {r#"
        package com.shop;

        import java.util.List;
        import java.io.IOException;

        class Svc {
            List<Order> find(List<Order> filter) throws IOException { return filter; }
        }

        class Order {}
    "#});
    let model = &out.model;
    let m = model
        .get_method("com.shop.Svc#find(java.util.List<com.shop.Order>)")
        .expect("generic parameter resolved into signature");
    assert!(m.return_type.is_generic);
    assert_eq!(m.return_type.fqn, "java.util.List<com.shop.Order>");
    assert_eq!(m.throws[0].fqn, "java.io.IOException");
}

#[test]
fn annotation_attributes_are_recorded() {
    let out = build_one(indoc! {r#"
        package com.shop;

        class Jobs {
            @Scheduled(fixedRate = 5000)
            void tick() {}
        }
    "#});
    let model = &out.model;
    let m = model.get_method("com.shop.Jobs#tick()").unwrap();
    let a = &m.annotations[0];
    assert_eq!(a.simple_name, "Scheduled");
    assert_eq!(a.attributes.get("fixedRate").map(String::as_str), Some("5000"));
}

#[test]
fn array_parameter_types() {
    let out = build_one(indoc! {r#"
        package com.shop;

        class Svc {
            void load(byte[] data) {}
        }
    "#});
    let model = &out.model;
    let m = model.get_method("com.shop.Svc#load(byte[])").unwrap();
    assert!(m.parameters[0].type_ref.is_array);
}

#[test]
fn references_edges_cover_member_types() {
    let out = build(&[
        (
            "Svc.java",
            indoc! {r#"
                package com.app;
                import com.db.Store;
                class Svc {
                    Store store;
                }
            "#},
        ),
        (
            "Store.java",
            indoc! {r#"
                package com.db;
                public class Store {}
            "#},
        ),
    ]);
    let refs: Vec<_> = out
        .model
        .relationships_of_kind(RelationshipKind::References)
        .collect();
    assert!(refs
        .iter()
        .any(|r| r.source == "com.app.Svc" && r.target == "com.db.Store"));
}
