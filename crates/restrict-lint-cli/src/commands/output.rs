//! Rendering of lint results.

use anyhow::Result;
use miette::{NamedSource, Report};
use restrict_lint_core::{LintResult, Severity, Summary, Violation, ViolationDiagnostic};
use std::fmt::Write as _;
use std::path::Path;

use crate::OutputFormat;

const RESET: &str = "\x1b[0m";

fn color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",
        Severity::Warning => "\x1b[33m",
        Severity::Info => "\x1b[34m",
    }
}

/// Prints `result` to stdout.
///
/// `pretty` output re-reads sources relative to `root` for snippets.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => text(result),
        OutputFormat::Compact => compact(result),
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Pretty => pretty(result, root),
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn text(result: &LintResult) -> String {
    let mut out = String::new();
    for v in &result.violations {
        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            v.code,
            v.rule,
            v.location.file.display(),
            v.location.line,
            v.location.column
        );
        let _ = writeln!(out, "  {}{}{RESET}: {}", color(v.severity), v.severity, v.message);
        if let Some(suggestion) = &v.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        out.push('\n');
    }
    out.push_str(&summary_line(result.summary()));
    out
}

fn compact(result: &LintResult) -> String {
    result
        .violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn pretty(result: &LintResult, root: &Path) -> String {
    let mut out = String::new();
    for v in &result.violations {
        let _ = writeln!(out, "{:?}", snippet(v, root));
    }
    out.push_str(&summary_line(result.summary()));
    out
}

fn snippet(violation: &Violation, root: &Path) -> Report {
    let report = Report::new(ViolationDiagnostic::from(violation));
    let file = &violation.location.file;
    match std::fs::read_to_string(root.join(file)) {
        Ok(content) => {
            report.with_source_code(NamedSource::new(file.display().to_string(), content))
        }
        Err(e) => {
            tracing::warn!("Cannot read {} for snippet: {}", file.display(), e);
            report
        }
    }
}

fn summary_line(summary: Summary) -> String {
    let tint = if summary.errors > 0 {
        color(Severity::Error)
    } else if summary.warnings > 0 {
        color(Severity::Warning)
    } else {
        "\x1b[32m"
    };
    format!("{tint}{summary}{RESET}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use restrict_lint_core::{Location, Suggestion};
    use std::path::PathBuf;

    fn result() -> LintResult {
        let location = Location {
            file: PathBuf::from("src/Clock.php"),
            line: 3,
            column: 9,
            offset: 20,
            length: 4,
        };
        let violation = Violation::new(
            "RC001.Found",
            "restricted-functions",
            Severity::Error,
            location,
            "time is forbidden.",
        )
        .with_suggestion(Suggestion::new("Inject a clock instead."));
        LintResult {
            violations: vec![violation],
            files_checked: 1,
        }
    }

    #[test]
    fn compact_is_one_line_per_violation() {
        assert_eq!(
            compact(&result()),
            "src/Clock.php:3:9: error [RC001.Found] time is forbidden."
        );
    }

    #[test]
    fn text_includes_help_and_summary() {
        let out = text(&result());
        assert!(out.starts_with("RC001.Found restricted-functions at src/Clock.php:3:9\n"));
        assert!(out.contains("  = help: Inject a clock instead.\n"));
        assert!(out.contains("Found 1 error(s), 0 warning(s), 0 info(s) in 1 file(s)"));
    }

    #[test]
    fn clean_summary_is_green() {
        let out = summary_line(LintResult::new().summary());
        assert!(out.starts_with("\x1b[32m"));
    }
}
