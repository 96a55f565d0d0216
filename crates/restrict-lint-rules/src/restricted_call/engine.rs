//! Decides whether a detected call site violates its restriction.

use restrict_lint_core::utils::{count_arguments, enclosing_routine_name};
use restrict_lint_core::{Severity, TokenStream};
use tracing::{debug, trace};

use super::registry::{Restriction, SymbolRegistry};

/// A candidate call or instantiation found by a detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Token index the violation is reported at.
    pub position: usize,
    /// Last token of the called name; its argument list follows it.
    pub identifier: usize,
    /// Qualified name without a leading separator.
    pub name: String,
}

/// A call site that satisfies none of its exemptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding<'r> {
    /// Token index the violation is reported at.
    pub position: usize,
    /// Name as spelled in source.
    pub name: String,
    /// Severity of the owning rule.
    pub severity: Severity,
    /// The restriction that was broken.
    pub restriction: &'r Restriction,
}

impl Finding<'_> {
    /// Returns true if the owning rule reports blocking errors.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Violation code suffix: `Found` for errors, `Discouraged` otherwise.
    #[must_use]
    pub fn code(&self) -> &'static str {
        if self.is_error() {
            "Found"
        } else {
            "Discouraged"
        }
    }

    /// Human-readable message, e.g.
    /// `date with less than 2 argument(s) is forbidden outside of init functions.`
    #[must_use]
    pub fn message(&self) -> String {
        let mut message = self.name.clone();
        if let Some(minimum) = self.restriction.minimum_arguments.filter(|n| *n > 0) {
            message.push_str(&format!(" with less than {minimum} argument(s)"));
        }
        message.push_str(if self.is_error() {
            " is forbidden"
        } else {
            " is discouraged"
        });
        if !self.restriction.allowed_contexts.is_empty() {
            message.push_str(" outside of ");
            message.push_str(&self.restriction.allowed_contexts.join(", "));
            message.push_str(" functions");
        }
        message.push('.');
        message
    }
}

/// Evaluates `site` against `registry`.
///
/// The allowed-context exemption is checked first, then the argument
/// threshold. Either one is enough to exempt the call.
#[must_use]
pub fn evaluate<'r>(
    registry: &'r SymbolRegistry,
    tokens: &dyn TokenStream,
    site: &CallSite,
    severity: Severity,
) -> Option<Finding<'r>> {
    let restriction = registry.lookup(&site.name)?;
    trace!(name = %site.name, position = site.position, "evaluating restricted call");

    if !restriction.allowed_contexts.is_empty() {
        if let Some(routine) = enclosing_routine_name(tokens, site.identifier) {
            if restriction.allows_context(routine) {
                debug!(name = %site.name, routine, "exempt by allowed context");
                return None;
            }
        }
    }

    if let Some(minimum) = restriction.minimum_arguments {
        let actual = count_arguments(tokens, site.identifier);
        if actual >= minimum {
            debug!(name = %site.name, actual, minimum, "exempt by argument count");
            return None;
        }
    }

    Some(Finding {
        position: site.position,
        name: site.name.clone(),
        severity,
        restriction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restricted_call::registry::RawRestriction;
    use crate::restricted_call::test_support::{php, position_of};

    fn registry(contexts: &[&str], minimum: Option<i64>) -> SymbolRegistry {
        SymbolRegistry::build([(
            "date",
            RawRestriction {
                allowed_contexts: contexts.iter().map(|c| (*c).to_string()).collect(),
                minimum_arguments: minimum,
            },
        )])
    }

    fn site_at(tokens: &dyn TokenStream, name: &str) -> CallSite {
        let identifier = position_of(tokens, name);
        CallSite {
            position: identifier,
            identifier,
            name: name.to_string(),
        }
    }

    fn finds(registry: &SymbolRegistry, source: &str) -> bool {
        let tokens = php(source);
        let site = site_at(&tokens, "date");
        evaluate(registry, &tokens, &site, Severity::Error).is_some()
    }

    #[test]
    fn unregistered_names_pass() {
        let registry = registry(&[], None);
        let tokens = php("<?php time();");
        let site = site_at(&tokens, "time");
        assert!(evaluate(&registry, &tokens, &site, Severity::Error).is_none());
    }

    #[test]
    fn argument_threshold_boundary() {
        let registry = registry(&[], Some(2));
        assert!(finds(&registry, "<?php date('Y');"));
        assert!(!finds(&registry, "<?php date('Y', 0);"));
        assert!(!finds(&registry, "<?php date('Y', 0, 1);"));
    }

    #[test]
    fn context_exemption_is_case_insensitive() {
        let registry = registry(&["Init"], None);
        assert!(!finds(&registry, "<?php function INIT() { date(); }"));
        assert!(finds(&registry, "<?php function process() { date(); }"));
        assert!(finds(&registry, "<?php date();"));
    }

    #[test]
    fn either_exemption_suffices() {
        let registry = registry(&["init"], Some(2));
        assert!(!finds(&registry, "<?php function init() { date('Y'); }"));
        assert!(!finds(&registry, "<?php function run() { date('Y', 1); }"));
        assert!(finds(&registry, "<?php function run() { date('Y'); }"));
    }

    #[test]
    fn file_scope_never_matches_a_context() {
        let registry = registry(&[""], None);
        assert!(finds(&registry, "<?php date();"));
    }

    #[test]
    fn zero_threshold_always_exempts() {
        let registry = registry(&[], Some(0));
        assert!(!finds(&registry, "<?php date();"));
    }

    #[test]
    fn message_with_both_clauses() {
        let registry = registry(&["__construct", "Init"], Some(2));
        let tokens = php("<?php date('Y');");
        let site = site_at(&tokens, "date");
        let finding = evaluate(&registry, &tokens, &site, Severity::Error).unwrap();
        assert_eq!(finding.code(), "Found");
        insta::assert_snapshot!(
            finding.message(),
            @"date with less than 2 argument(s) is forbidden outside of __construct, init functions."
        );
    }

    #[test]
    fn message_for_discouraged_without_clauses() {
        let registry = registry(&[], None);
        let tokens = php("<?php date();");
        let site = site_at(&tokens, "date");
        let finding = evaluate(&registry, &tokens, &site, Severity::Warning).unwrap();
        assert_eq!(finding.code(), "Discouraged");
        assert_eq!(finding.message(), "date is discouraged.");
    }
}
