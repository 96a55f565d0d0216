//! Rules restricting calls to configured functions and classes.
//!
//! Two rules share one engine and differ only in [`SymbolKind`]:
//!
//! | Code | Name | Watches |
//! |------|------|---------|
//! | RC001 | `restricted-functions` | identifiers followed by `(` |
//! | RC002 | `restricted-class-instances` | `new Name(...)` |
//!
//! A restricted call is exempt when it sits directly inside one of the
//! symbol's allowed routines, or when it passes at least the symbol's
//! minimum number of arguments.
//!
//! # Configuration
//!
//! ```toml
//! [rules.restricted-functions]
//! severity = "warning"        # or: error = false
//!
//! [rules.restricted-functions.forbidden.date]
//! allowed_context = ["__construct", "init"]
//! minimum_arguments = 2
//! ```
//!
//! A `forbidden` table replaces the built-in table.
//!
//! # Suppression
//!
//! - `// restrict-lint: allow(restricted-functions) reason="..."`

pub mod defaults;
pub mod detector;
pub mod engine;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

use restrict_lint_core::utils::check_allow_with_reason;
use restrict_lint_core::{
    FileContext, Location, Rule, RuleConfig, Severity, Suggestion, TokenKind, TokenStream,
    Violation,
};
use tracing::warn;

use defaults::{DefaultTable, RESTRICTED_CLASSES, RESTRICTED_FUNCTIONS};
use engine::{evaluate, CallSite, Finding};
use registry::SymbolRegistry;

/// Rule code for restricted-functions.
pub const FUNCTIONS_CODE: &str = "RC001";

/// Rule name for restricted-functions.
pub const FUNCTIONS_NAME: &str = "restricted-functions";

/// Rule code for restricted-class-instances.
pub const CLASSES_CODE: &str = "RC002";

/// Rule name for restricted-class-instances.
pub const CLASSES_NAME: &str = "restricted-class-instances";

/// The kind of restricted symbol a rule looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Free function calls such as `date()`.
    Function,
    /// Class instantiations such as `new DateTime()`.
    Instantiation,
}

impl SymbolKind {
    /// Both kinds, in rule-code order.
    pub const ALL: [Self; 2] = [Self::Function, Self::Instantiation];

    /// Rule name for this kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Function => FUNCTIONS_NAME,
            Self::Instantiation => CLASSES_NAME,
        }
    }

    /// Rule code for this kind.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Function => FUNCTIONS_CODE,
            Self::Instantiation => CLASSES_CODE,
        }
    }

    /// One-line rule description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Function => "Restricts calls to configured functions",
            Self::Instantiation => "Restricts instantiation of configured classes",
        }
    }

    /// Token kinds the detector inspects.
    #[must_use]
    pub fn watched_tokens(self) -> &'static [TokenKind] {
        match self {
            Self::Function => &[TokenKind::Identifier],
            Self::Instantiation => &[TokenKind::New],
        }
    }

    /// Built-in restriction table.
    #[must_use]
    pub fn default_table(self) -> DefaultTable {
        match self {
            Self::Function => RESTRICTED_FUNCTIONS,
            Self::Instantiation => RESTRICTED_CLASSES,
        }
    }

    /// Finds the call site starting at the watched token `position`.
    #[must_use]
    pub fn detect(self, tokens: &dyn TokenStream, position: usize) -> Option<CallSite> {
        match self {
            Self::Function => detector::function_call(tokens, position),
            Self::Instantiation => detector::instantiation(tokens, position),
        }
    }
}

/// A restricted-call rule for one [`SymbolKind`].
#[derive(Debug, Clone)]
pub struct RestrictedCallRule {
    kind: SymbolKind,
    registry: SymbolRegistry,
    severity: Severity,
}

impl RestrictedCallRule {
    /// Creates a rule with an explicit registry.
    #[must_use]
    pub fn new(kind: SymbolKind, registry: SymbolRegistry) -> Self {
        Self {
            kind,
            registry,
            severity: Severity::Error,
        }
    }

    /// Creates a rule with the built-in table for `kind`.
    #[must_use]
    pub fn with_defaults(kind: SymbolKind) -> Self {
        Self::new(kind, SymbolRegistry::build(kind.default_table().entries()))
    }

    /// `restricted-functions` with the built-in date/time functions.
    #[must_use]
    pub fn functions() -> Self {
        Self::with_defaults(SymbolKind::Function)
    }

    /// `restricted-class-instances` with the built-in date classes.
    #[must_use]
    pub fn class_instances() -> Self {
        Self::with_defaults(SymbolKind::Instantiation)
    }

    /// Creates a rule for `kind`, applying its configuration block if any.
    #[must_use]
    pub fn from_config(kind: SymbolKind, config: Option<&RuleConfig>) -> Self {
        let rule = Self::with_defaults(kind);
        match config {
            Some(config) => rule.configure(config),
            None => rule,
        }
    }

    /// Applies a configuration block.
    ///
    /// `severity` wins over `error = false`. A `forbidden` table replaces
    /// the current registry; a non-table `forbidden` value is ignored.
    #[must_use]
    pub fn configure(mut self, config: &RuleConfig) -> Self {
        self.apply(config);
        self
    }

    fn apply(&mut self, config: &RuleConfig) {
        if let Some(severity) = config.severity {
            self.severity = severity;
        } else if !config.get_bool("error", true) {
            self.severity = Severity::Warning;
        }

        if let Some(table) = config.get_table("forbidden") {
            self.registry = SymbolRegistry::from_toml(table);
        } else if config.options.contains_key("forbidden") {
            warn!(rule = self.kind.name(), "`forbidden` must be a table, keeping defaults");
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// The symbol kind this rule detects.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// The restricted symbols.
    #[must_use]
    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    fn violation(&self, location: Location, finding: &Finding<'_>) -> Violation {
        let code = format!("{}.{}", self.code(), finding.code());
        let violation =
            Violation::new(code, self.name(), finding.severity, location, finding.message());
        match suggestion(finding) {
            Some(suggestion) => violation.with_suggestion(suggestion),
            None => violation,
        }
    }
}

fn suggestion(finding: &Finding<'_>) -> Option<Suggestion> {
    let restriction = finding.restriction;
    let contexts = restriction.allowed_contexts.join(", ");
    let message = match (restriction.minimum_arguments.filter(|n| *n > 0), contexts.is_empty()) {
        (Some(n), false) => format!("Pass at least {n} argument(s) or move the call into {contexts}"),
        (Some(n), true) => format!("Pass at least {n} argument(s)"),
        (None, false) => format!("Move the call into {contexts}"),
        (None, true) => return None,
    };
    Some(Suggestion::new(message))
}

impl Rule for RestrictedCallRule {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn code(&self) -> &'static str {
        self.kind.code()
    }

    fn description(&self) -> &'static str {
        self.kind.description()
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn watched_tokens(&self) -> &[TokenKind] {
        self.kind.watched_tokens()
    }

    fn apply_config(&mut self, config: &RuleConfig) {
        self.apply(config);
    }

    fn process(
        &self,
        ctx: &FileContext,
        tokens: &dyn TokenStream,
        position: usize,
    ) -> Option<Violation> {
        let site = self.kind.detect(tokens, position)?;
        let finding = evaluate(&self.registry, tokens, &site, self.severity)?;
        let token = tokens.get(finding.position)?;
        let location = Location::from_token(ctx.relative_path.clone(), token);

        let allow_check = check_allow_with_reason(ctx.content, token.line, self.name(), self.code());
        if allow_check.is_allowed() {
            if self.requires_allow_reason() && allow_check.reason().is_none() {
                let name = self.name();
                return Some(
                    Violation::new(
                        self.code(),
                        name,
                        Severity::Warning,
                        location,
                        format!("Allow directive for '{name}' is missing required reason"),
                    )
                    .with_suggestion(Suggestion::new(
                        "Add reason=\"...\" to explain why this exception is necessary",
                    )),
                );
            }
            return None;
        }

        Some(self.violation(location, &finding))
    }
}
