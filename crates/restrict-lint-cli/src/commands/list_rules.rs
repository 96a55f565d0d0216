//! List rules command implementation.

use restrict_lint_rules::{RestrictedCallRule, SymbolKind};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<28} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for kind in SymbolKind::ALL {
        println!("{:<10} {:<28} {}", kind.code(), kind.name(), kind.description());
    }

    for kind in SymbolKind::ALL {
        let rule = RestrictedCallRule::with_defaults(kind);
        println!("\nDefault table for {}:", kind.name());
        for (name, restriction) in rule.registry().iter() {
            let minimum = restriction
                .minimum_arguments
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            println!(
                "  {:<24} min args {:<3} contexts: {}",
                name,
                minimum,
                restriction.allowed_contexts.join(", ")
            );
        }
    }

    println!("\nPresets:");
    println!("  recommended  - RC001, RC002 as errors (default)");
    println!("  advisory     - RC001, RC002 as warnings");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  restrict-lint check --rules restricted-functions");
    println!("  restrict-lint check --rules RC002");
}
