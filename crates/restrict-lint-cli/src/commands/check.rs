//! Check command implementation.

use anyhow::{Context, Result};
use restrict_lint_core::{Analyzer, Config, RuleBox};
use restrict_lint_php::PhpTokenizer;
use restrict_lint_rules::rules_from_config;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
///
/// Exits the process with status 1 when violations at or above the
/// configured `fail_on` severity are found.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;
    let fail_on = config.fail_on_severity()?;

    let rules = select_rules(&config, rules_filter.as_deref());

    let mut builder = Analyzer::builder()
        .root(path)
        .tokenizer(PhpTokenizer::new())
        .config(config)
        .excludes(exclude);
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, analyzer.root())?;

    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Builds the configured rules, keeping only those named in `filter`.
///
/// Filter entries match rule names or codes, case-insensitively.
fn select_rules(config: &Config, filter: Option<&str>) -> Vec<RuleBox> {
    let rules = rules_from_config(config);
    let Some(filter) = filter else {
        return rules;
    };

    let wanted: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    for name in &wanted {
        let known = rules
            .iter()
            .any(|r| r.name().eq_ignore_ascii_case(name) || r.code().eq_ignore_ascii_case(name));
        if !known {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    rules
        .into_iter()
        .filter(|r| {
            wanted
                .iter()
                .any(|w| r.name().eq_ignore_ascii_case(w) || r.code().eq_ignore_ascii_case(w))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn no_filter_keeps_every_rule() {
        let rules = select_rules(&Config::default(), None);
        assert_eq!(
            names(&rules),
            vec!["restricted-functions", "restricted-class-instances"]
        );
    }

    #[test]
    fn filter_by_name_or_code() {
        let rules = select_rules(&Config::default(), Some("rc002"));
        assert_eq!(names(&rules), vec!["restricted-class-instances"]);

        let rules = select_rules(&Config::default(), Some(" restricted-functions , bogus"));
        assert_eq!(names(&rules), vec!["restricted-functions"]);
    }
}
