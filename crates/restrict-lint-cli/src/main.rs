//! `restrict-lint` command line.
//!
//! ```bash
//! restrict-lint check [OPTIONS] [PATH]
//! restrict-lint list-rules
//! restrict-lint init [--force]
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Flags calls to restricted PHP functions and classes
#[derive(Parser)]
#[command(name = "restrict-lint", author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file, bypassing the lookup
    #[arg(short, long, global = true, env = "RESTRICT_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check PHP sources under a path
    Check {
        /// Directory to analyze
        #[arg(default_value = ".")]
        path: PathBuf,

        /// How to print violations
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Comma-separated rule names or codes to run
        #[arg(long)]
        rules: Option<String>,

        /// Extra glob to skip (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Print the built-in rules
    ListRules,

    /// Write a restrict-lint.toml with the default tables
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    fn run(self, config: Option<PathBuf>) -> Result<()> {
        match self {
            Self::Check {
                path,
                format,
                rules,
                exclude,
            } => {
                let source = config_resolver::resolve(&path, config.as_deref());
                commands::check::run(&path, format, rules, exclude, &source)
            }
            Self::ListRules => {
                commands::list_rules::run();
                Ok(())
            }
            Self::Init { force } => commands::init::run(force),
        }
    }
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Violation blocks followed by a summary.
    #[default]
    Text,
    /// The full result as JSON.
    Json,
    /// `file:line:col: severity [code] message` lines.
    Compact,
    /// Source snippets rendered with miette.
    Pretty,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.command.run(cli.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_defaults() {
        let cli = Cli::try_parse_from(["restrict-lint", "check"]).unwrap();
        let Command::Check {
            path,
            format,
            rules,
            exclude,
        } = cli.command
        else {
            panic!("expected check");
        };
        assert_eq!(path, PathBuf::from("."));
        assert!(matches!(format, OutputFormat::Text));
        assert!(rules.is_none());
        assert!(exclude.is_empty());
    }

    #[test]
    fn check_flags() {
        let cli = Cli::try_parse_from([
            "restrict-lint",
            "check",
            "app",
            "-f",
            "compact",
            "--rules",
            "RC001",
            "-e",
            "**/legacy/**",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Check {
            path,
            format,
            rules,
            exclude,
        } = cli.command
        else {
            panic!("expected check");
        };
        assert_eq!(path, PathBuf::from("app"));
        assert!(matches!(format, OutputFormat::Compact));
        assert_eq!(rules.as_deref(), Some("RC001"));
        assert_eq!(exclude, vec!["**/legacy/**"]);
    }
}
