//! Init command implementation.

use anyhow::{bail, Result};
use restrict_lint_rules::SymbolKind;
use std::fmt::Write as _;
use std::path::Path;

const HEADER: &str = r#"# restrict-lint configuration

# recommended (errors) or advisory (warnings)
preset = "recommended"

# Lowest severity that makes `restrict-lint check` exit with status 1
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Extra glob patterns to skip; vendor/ and node_modules/ are always skipped
exclude = []

# Respect .gitignore files
respect_gitignore = true

# Each rule can be disabled, have its severity overridden (or set
# `error = false`), and have its `forbidden` table replaced. The tables
# below are the built-in defaults.
"#;

/// Renders the starter configuration with the built-in tables.
#[must_use]
pub fn default_config() -> String {
    let mut out = String::from(HEADER);
    for kind in SymbolKind::ALL {
        let table = kind.default_table();
        let contexts = table
            .allowed_contexts
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");

        let _ = write!(out, "\n[rules.{}]\nenabled = true\n", kind.name());
        for (name, minimum) in table.symbols {
            let _ = write!(
                out,
                "\n[rules.{}.forbidden.{}]\nallowed_context = [{}]\n",
                kind.name(),
                name,
                contexts
            );
            if let Some(minimum) = minimum {
                let _ = writeln!(out, "minimum_arguments = {minimum}");
            }
        }
    }
    out
}

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("restrict-lint.toml"), force)?;

    println!("Created restrict-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit restrict-lint.toml to configure rules");
    println!("  2. Run: restrict-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }
    std::fs::write(config_path, default_config())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use restrict_lint_core::Config;
    use restrict_lint_rules::{RestrictedCallRule, SymbolRegistry};

    #[test]
    fn generated_config_matches_defaults() {
        let config = Config::parse(&default_config()).unwrap();
        assert_eq!(config.fail_on_severity().unwrap(), restrict_lint_core::Severity::Error);

        for kind in SymbolKind::ALL {
            let block = config.rule(kind.name()).unwrap();
            let table = block.get_table("forbidden").unwrap();
            assert_eq!(
                &SymbolRegistry::from_toml(table),
                RestrictedCallRule::with_defaults(kind).registry()
            );
        }
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("restrict-lint.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("[rules.restricted-functions.forbidden.date]"));
    }
}
