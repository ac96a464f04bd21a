//! List rules command implementation.

use tfnames_rules::RuleSet;

/// Runs the list-rules command.
pub fn run() {
    let ruleset = RuleSet::builtin();

    println!("{} {} rules:\n", ruleset.name, ruleset.version);
    println!(
        "{:<8} {:<40} {:<9} {:<8} Description",
        "Code", "Name", "Severity", "Enabled"
    );
    println!("{}", "-".repeat(100));

    for rule in &ruleset.rules {
        println!(
            "{:<8} {:<40} {:<9} {:<8} {}",
            rule.code(),
            rule.name(),
            rule.severity(),
            rule.enabled(),
            rule.description()
        );
    }

    println!("\nPolicies for terraform_resource_name_contains_type:");
    println!("  suffix     - name ends with trailing words of the type (default)");
    println!("  substring  - name contains the type or any significant type word");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  tfnames check --rules TFN001 --policy substring");
}
