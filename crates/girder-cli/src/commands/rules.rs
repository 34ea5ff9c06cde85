//! List the rules in a directory.

use std::path::Path;

use girder_rules::load_rules;

pub fn run(rules_dir: &Path) -> i32 {
    let rules = load_rules(rules_dir).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    if rules.is_empty() {
        println!("no rules found in {}", rules_dir.display());
        return 0;
    }
    for rule in &rules {
        let name = if rule.name.is_empty() {
            "(unnamed)"
        } else {
            rule.name.as_str()
        };
        println!("{:<32} {:<8} {}", rule.id, rule.severity.to_string(), name);
    }
    0
}
