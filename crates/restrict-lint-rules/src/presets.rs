//! Rule presets and configuration-driven rule construction.

use restrict_lint_core::{Config, RuleBox, Severity};
use tracing::warn;

use crate::restricted_call::{RestrictedCallRule, SymbolKind};

/// Preset configurations for restrict-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Both rules, reporting errors.
    Recommended,
    /// Both rules, reporting warnings.
    Advisory,
}

impl Preset {
    /// Parses a preset name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "recommended" => Some(Self::Recommended),
            "advisory" => Some(Self::Advisory),
            _ => None,
        }
    }

    /// Severity rules take when their configuration does not set one.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::Recommended => Severity::Error,
            Self::Advisory => Severity::Warning,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        SymbolKind::ALL
            .into_iter()
            .map(|kind| {
                Box::new(RestrictedCallRule::with_defaults(kind).severity(self.severity()))
                    as RuleBox
            })
            .collect()
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `restricted-functions` (RC001) - date/time functions
/// - `restricted-class-instances` (RC002) - date classes
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns the advisory set of rules, reporting warnings only.
#[must_use]
pub fn advisory_rules() -> Vec<RuleBox> {
    Preset::Advisory.rules()
}

/// Builds rules from a loaded configuration.
///
/// The preset supplies the base severity; each rule's block may override
/// its severity and replace its restriction table. Unknown presets fall
/// back to `recommended`.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let preset = match config.preset.as_deref() {
        None => Preset::Recommended,
        Some(name) => Preset::from_name(name).unwrap_or_else(|| {
            warn!(preset = name, "unknown preset, using recommended");
            Preset::Recommended
        }),
    };

    SymbolKind::ALL
        .into_iter()
        .map(|kind| {
            let rule = RestrictedCallRule::with_defaults(kind).severity(preset.severity());
            let rule = match config.rule(kind.name()) {
                Some(block) => rule.configure(block),
                None => rule,
            };
            Box::new(rule) as RuleBox
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::Recommended.rules().len(), 2);
        assert!(advisory_rules()
            .iter()
            .all(|r| r.default_severity() == Severity::Warning));
        assert!(recommended_rules()
            .iter()
            .all(|r| r.default_severity() == Severity::Error));
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::from_name("Advisory"), Some(Preset::Advisory));
        assert_eq!(Preset::from_name("strict"), None);
    }

    #[test]
    fn test_rules_from_config() {
        let config = Config::parse(
            r#"
            preset = "advisory"

            [rules.restricted-class-instances]
            severity = "error"
            "#,
        )
        .unwrap();
        let rules = rules_from_config(&config);
        let severities: Vec<(&str, Severity)> = rules
            .iter()
            .map(|r| (r.name(), r.default_severity()))
            .collect();
        assert_eq!(
            severities,
            vec![
                ("restricted-functions", Severity::Warning),
                ("restricted-class-instances", Severity::Error),
            ]
        );
    }

    #[test]
    fn test_unknown_preset_falls_back() {
        let config = Config::parse("preset = \"bogus\"").unwrap();
        assert!(rules_from_config(&config)
            .iter()
            .all(|r| r.default_severity() == Severity::Error));
    }
}
