//! Violations, their locations, and the result of a lint run.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::tokens::Token;

/// How a violation affects the run.
///
/// Ordered from least to most severe, so `>=` compares against a
/// `fail_on` threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, never fails.
    Info,
    /// A discouraged usage.
    Warning,
    /// A forbidden usage.
    Error,
}

impl Severity {
    /// Lowercase name as used in configuration and output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Parses a severity name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Info, Self::Warning, Self::Error]
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a violation was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path relative to the analyzed root.
    pub file: PathBuf,
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column, in characters.
    pub column: usize,
    /// Byte offset of the span start.
    pub offset: usize,
    /// Span length in bytes.
    pub length: usize,
}

impl Location {
    /// Location spanning `token`.
    #[must_use]
    pub fn from_token(file: PathBuf, token: &Token) -> Self {
        Self {
            file,
            line: token.line,
            column: token.column,
            offset: token.offset,
            length: token.text.len(),
        }
    }

    /// Byte span for diagnostic rendering.
    #[must_use]
    pub fn span(&self) -> SourceSpan {
        SourceSpan::from((self.offset, self.length))
    }

    fn sort_key(&self) -> (&Path, usize, usize) {
        (self.file.as_path(), self.line, self.column)
    }
}

/// A hint attached to a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// What to do instead.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One reported finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Code with outcome suffix, e.g. `RC001.Found`.
    pub code: String,
    /// Name of the rule that produced it.
    pub rule: String,
    /// Severity after configuration overrides.
    pub severity: Severity,
    /// Where it was found.
    pub location: Location,
    /// Message text.
    pub message: String,
    /// Optional hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a violation without a suggestion.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attaches a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }
}

/// `file:line:col: severity [code] message`
impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Location {
            file, line, column, ..
        } = &self.location;
        write!(
            f,
            "{}:{line}:{column}: {} [{}] {}",
            file.display(),
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A [`Violation`] as a miette diagnostic, for rendering with source
/// snippets.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{code}] {message}")]
pub struct ViolationDiagnostic {
    code: String,
    message: String,
    #[help]
    help: Option<String>,
    #[label("{rule}")]
    span: SourceSpan,
    rule: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            code: v.code.clone(),
            message: v.message.clone(),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: v.location.span(),
            rule: v.rule.clone(),
        }
    }
}

/// Violation counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Error count.
    pub errors: usize,
    /// Warning count.
    pub warnings: usize,
    /// Info count.
    pub infos: usize,
    /// Files analyzed.
    pub files: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} error(s), {} warning(s), {} info(s) in {} file(s)",
            self.errors, self.warnings, self.infos, self.files
        )
    }
}

/// Outcome of analyzing a tree.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Violations, sorted by location once analysis completes.
    pub violations: Vec<Violation>,
    /// Number of files that were tokenized and checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any violation is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Returns true if any violation is at least `threshold`.
    #[must_use]
    pub fn has_violations_at(&self, threshold: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= threshold)
    }

    /// Counts violations per severity.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.violations.iter().fold(
            Summary {
                files: self.files_checked,
                ..Summary::default()
            },
            |mut summary, v| {
                match v.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                    Severity::Info => summary.infos += 1,
                }
                summary
            },
        )
    }

    /// Sorts violations by file, line and column.
    pub fn sort(&mut self) {
        self.violations
            .sort_by(|a, b| a.location.sort_key().cmp(&b.location.sort_key()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    fn violation(severity: Severity, file: &str, line: usize) -> Violation {
        let token = Token::new(TokenKind::Identifier, "time").at(line, 10, 0);
        Violation::new(
            "RC001.Found",
            "restricted-functions",
            severity,
            Location::from_token(PathBuf::from(file), &token),
            "time is forbidden.",
        )
    }

    #[test]
    fn severity_names() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::from_name("Warning"), Some(Severity::Warning));
        assert_eq!(Severity::from_name("fatal"), None);
        assert_eq!(Severity::Info.to_string(), "info");
    }

    #[test]
    fn location_from_token_carries_span() {
        let token = Token::new(TokenKind::Identifier, "date").at(3, 5, 42);
        let loc = Location::from_token(PathBuf::from("a.php"), &token);
        assert_eq!((loc.line, loc.column, loc.offset, loc.length), (3, 5, 42, 4));
        assert_eq!(loc.span(), SourceSpan::from((42, 4)));
    }

    #[test]
    fn display_is_one_line() {
        let v = violation(Severity::Error, "src/Clock.php", 42);
        insta::assert_snapshot!(
            v.to_string(),
            @"src/Clock.php:42:10: error [RC001.Found] time is forbidden."
        );
    }

    #[test]
    fn json_omits_missing_suggestion() {
        let v = violation(Severity::Warning, "a.php", 1);
        let json = serde_json::to_string(&v).unwrap();
        assert!(!json.contains("suggestion"));
        assert!(json.contains(r#""severity":"warning""#));
    }

    #[test]
    fn threshold_checks() {
        let mut result = LintResult::new();
        result.violations.push(violation(Severity::Warning, "a.php", 1));
        assert!(!result.has_errors());
        assert!(result.has_violations_at(Severity::Warning));
        assert!(result.has_violations_at(Severity::Info));
    }

    #[test]
    fn summary_counts() {
        let mut result = LintResult::new();
        result.files_checked = 2;
        result.violations.push(violation(Severity::Warning, "a.php", 1));
        result.violations.push(violation(Severity::Error, "a.php", 2));
        result.violations.push(violation(Severity::Error, "b.php", 2));
        let summary = result.summary();
        assert_eq!((summary.errors, summary.warnings, summary.infos), (2, 1, 0));
        insta::assert_snapshot!(
            summary.to_string(),
            @"Found 2 error(s), 1 warning(s), 0 info(s) in 2 file(s)"
        );
    }

    #[test]
    fn sort_by_file_then_line() {
        let mut result = LintResult::new();
        result.violations.push(violation(Severity::Error, "b.php", 1));
        result.violations.push(violation(Severity::Error, "a.php", 9));
        result.violations.push(violation(Severity::Error, "a.php", 3));
        result.sort();
        let order: Vec<(String, usize)> = result
            .violations
            .iter()
            .map(|v| (v.location.file.display().to_string(), v.location.line))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.php".to_string(), 3),
                ("a.php".to_string(), 9),
                ("b.php".to_string(), 1)
            ]
        );
    }
}
