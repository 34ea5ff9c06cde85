//! Helpers over fully qualified names.
//!
//! Type FQN: `com.example.Outer.Inner`. Method FQN:
//! `<type fqn>#<name>(<comma-joined parameter type fqns>)`. Field FQN:
//! `<type fqn>#<name>`.

/// Sentinel FQN for an argument or reference whose type could not be resolved.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Method name used for constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Build a method signature FQN from its parts.
pub fn method_fqn(owner: &str, name: &str, param_types: &[String]) -> String {
    format!("{owner}#{name}({})", param_types.join(","))
}

/// Build a field FQN from its parts.
pub fn field_fqn(owner: &str, name: &str) -> String {
    format!("{owner}#{name}")
}

/// Package of a type FQN: everything before the last `.`, or `""` when the
/// name has no package. Works on the type part of a method/field FQN too.
pub fn package_of(fqn: &str) -> &str {
    let type_part = fqn.split('#').next().unwrap_or(fqn);
    match type_part.rfind('.') {
        Some(idx) => &type_part[..idx],
        None => "",
    }
}

/// Simple name of a type FQN (last `.`-separated segment).
pub fn simple_name_of(fqn: &str) -> &str {
    let type_part = fqn.split('#').next().unwrap_or(fqn);
    type_part.rsplit('.').next().unwrap_or(type_part)
}

/// Declaring type of a method or field FQN (everything before `#`).
pub fn type_of_member_fqn(fqn: &str) -> Option<&str> {
    let idx = fqn.find('#')?;
    Some(&fqn[..idx])
}

/// Method name of a method FQN (between `#` and `(`).
pub fn method_name_of(fqn: &str) -> Option<&str> {
    let rest = &fqn[fqn.find('#')? + 1..];
    Some(match rest.find('(') {
        Some(idx) => &rest[..idx],
        None => rest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_fqn_joins_params() {
        let fqn = method_fqn(
            "com.a.Svc",
            "save",
            &["java.lang.String".to_owned(), "int".to_owned()],
        );
        assert_eq!(fqn, "com.a.Svc#save(java.lang.String,int)");
    }

    #[test]
    fn method_fqn_no_params() {
        assert_eq!(method_fqn("com.a.Svc", "run", &[]), "com.a.Svc#run()");
    }

    #[test]
    fn package_of_handles_default_package() {
        assert_eq!(package_of("Foo"), "");
        assert_eq!(package_of("com.a.Foo"), "com.a");
    }

    #[test]
    fn package_of_strips_member_part() {
        assert_eq!(package_of("com.a.Foo#bar()"), "com.a");
    }

    #[test]
    fn simple_name_of_type() {
        assert_eq!(simple_name_of("com.a.Foo"), "Foo");
        assert_eq!(simple_name_of("Foo"), "Foo");
    }

    #[test]
    fn member_fqn_parts() {
        assert_eq!(
            type_of_member_fqn("com.a.Foo#bar(int)"),
            Some("com.a.Foo")
        );
        assert_eq!(method_name_of("com.a.Foo#bar(int)"), Some("bar"));
        assert_eq!(method_name_of("com.a.Foo#field"), Some("field"));
        assert_eq!(type_of_member_fqn("com.a.Foo"), None);
    }
}
