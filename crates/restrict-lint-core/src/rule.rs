//! The per-token rule interface.

use crate::config::RuleConfig;
use crate::context::FileContext;
use crate::tokens::{TokenKind, TokenStream};
use crate::types::{Severity, Violation};

/// A per-token lint rule.
///
/// The analyzer calls [`Rule::process`] once for every token whose kind is
/// listed in [`Rule::watched_tokens`]. Rules are shared across threads while
/// files are analyzed in parallel, so any state they hold must be read-only.
///
/// # Example
///
/// ```ignore
/// use restrict_lint_core::{FileContext, Rule, TokenKind, TokenStream, Violation};
///
/// pub struct NoEval;
///
/// impl Rule for NoEval {
///     fn name(&self) -> &'static str { "no-eval" }
///     fn code(&self) -> &'static str { "EX001" }
///     fn watched_tokens(&self) -> &[TokenKind] { &[TokenKind::Keyword] }
///
///     fn process(
///         &self,
///         ctx: &FileContext,
///         tokens: &dyn TokenStream,
///         position: usize,
///     ) -> Option<Violation> {
///         // inspect tokens around `position`
///         None
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Kebab-case name used in configuration, e.g. `restricted-functions`.
    fn name(&self) -> &'static str;

    /// Short code used in output and allow directives, e.g. `RC001`.
    fn code(&self) -> &'static str;

    /// One-line summary shown by `list-rules`.
    fn description(&self) -> &'static str {
        ""
    }

    /// Severity used when the configuration sets none.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Allow directives for this rule must carry `reason="..."`.
    ///
    /// Defaults to true for error-level rules.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Applies the rule's `[rules.<name>]` block.
    ///
    /// [`AnalyzerBuilder::build`](crate::AnalyzerBuilder::build) calls this
    /// once per rule that has a block. Applying the same block twice must
    /// leave the rule unchanged.
    fn apply_config(&mut self, _config: &RuleConfig) {}

    /// Token kinds this rule wants to be invoked on.
    fn watched_tokens(&self) -> &[TokenKind];

    /// Inspects the token at `position` and returns a violation, if any.
    fn process(
        &self,
        ctx: &FileContext,
        tokens: &dyn TokenStream,
        position: usize,
    ) -> Option<Violation>;
}

/// A rule as held by the analyzer.
pub type RuleBox = Box<dyn Rule>;
