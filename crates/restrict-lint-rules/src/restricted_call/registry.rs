//! Case-insensitive table of restricted symbols.

use std::collections::BTreeMap;

use tracing::warn;

/// Exemptions for one restricted symbol.
///
/// Context names are stored lowercased, deduplicated, in configuration
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restriction {
    /// Routines in which the symbol may be used freely.
    pub allowed_contexts: Vec<String>,
    /// Argument count at which a call is exempt.
    pub minimum_arguments: Option<usize>,
}

impl Restriction {
    /// Returns true if `routine` is one of the allowed contexts.
    #[must_use]
    pub fn allows_context(&self, routine: &str) -> bool {
        let routine = routine.to_lowercase();
        self.allowed_contexts.iter().any(|c| *c == routine)
    }
}

/// A restriction as written in configuration, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRestriction {
    /// Allowed routine names, any casing.
    pub allowed_contexts: Vec<String>,
    /// Minimum argument count; negative values mean "no threshold".
    pub minimum_arguments: Option<i64>,
}

impl From<RawRestriction> for Restriction {
    fn from(raw: RawRestriction) -> Self {
        let mut allowed_contexts: Vec<String> = Vec::with_capacity(raw.allowed_contexts.len());
        for context in raw.allowed_contexts {
            let context = context.to_lowercase();
            if !allowed_contexts.contains(&context) {
                allowed_contexts.push(context);
            }
        }
        Self {
            allowed_contexts,
            minimum_arguments: raw.minimum_arguments.and_then(|n| usize::try_from(n).ok()),
        }
    }
}

/// Restricted symbols keyed by lowercased name.
///
/// Built once per rule and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolRegistry {
    entries: BTreeMap<String, Restriction>,
}

impl SymbolRegistry {
    /// Builds a registry, lowercasing names and allowed contexts.
    ///
    /// A later entry replaces an earlier one that differs only in casing.
    #[must_use]
    pub fn build<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = (S, RawRestriction)>,
        S: AsRef<str>,
    {
        let entries = raw
            .into_iter()
            .map(|(name, restriction)| (name.as_ref().to_lowercase(), Restriction::from(restriction)))
            .collect();
        Self { entries }
    }

    /// Builds a registry from a TOML `forbidden` table.
    ///
    /// Accepts `allowed_context`/`allowedContext` (a list of strings or a
    /// single string) and `minimum_arguments`/`minimumArguments` (an integer).
    /// Malformed values are dropped with a warning; a symbol whose entry is
    /// not a table is restricted without exemptions.
    #[must_use]
    pub fn from_toml(table: &toml::Table) -> Self {
        Self::build(
            table
                .iter()
                .map(|(name, value)| (name.as_str(), raw_from_toml(name, value))),
        )
    }

    /// Returns the restriction for `name`, ignoring case.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Restriction> {
        self.entries.get(&name.to_lowercase())
    }

    /// Returns true if `name` is restricted, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of restricted symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no symbol is restricted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Restriction)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn raw_from_toml(name: &str, value: &toml::Value) -> RawRestriction {
    let Some(entry) = value.as_table() else {
        warn!(symbol = name, "restriction is not a table, no exemptions apply");
        return RawRestriction::default();
    };

    let contexts = entry
        .get("allowed_context")
        .or_else(|| entry.get("allowedContext"));
    let allowed_contexts = match contexts {
        None => Vec::new(),
        Some(toml::Value::String(single)) => vec![single.clone()],
        Some(toml::Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let context = item.as_str();
                if context.is_none() {
                    warn!(symbol = name, value = %item, "ignoring non-string allowed context");
                }
                context.map(str::to_string)
            })
            .collect(),
        Some(other) => {
            warn!(symbol = name, value = %other, "ignoring malformed allowed_context");
            Vec::new()
        }
    };

    let minimum = entry
        .get("minimum_arguments")
        .or_else(|| entry.get("minimumArguments"));
    let minimum_arguments = match minimum {
        None => None,
        Some(toml::Value::Integer(n)) if *n >= 0 => Some(*n),
        Some(other) => {
            warn!(symbol = name, value = %other, "ignoring malformed minimum_arguments");
            None
        }
    };

    RawRestriction {
        allowed_contexts,
        minimum_arguments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(contexts: &[&str], minimum: Option<i64>) -> RawRestriction {
        RawRestriction {
            allowed_contexts: contexts.iter().map(|c| (*c).to_string()).collect(),
            minimum_arguments: minimum,
        }
    }

    #[test]
    fn lookups_ignore_case() {
        let registry = SymbolRegistry::build([("Date", raw(&["setUp"], Some(2)))]);
        for spelling in ["date", "DATE", "Date", "dAtE"] {
            assert!(registry.contains(spelling), "{spelling}");
        }
        assert!(!registry.contains("time"));
    }

    #[test]
    fn contexts_are_lowercased_and_deduplicated() {
        let registry =
            SymbolRegistry::build([("time", raw(&["Init", "setUp", "INIT", "__construct"], None))]);
        let restriction = registry.lookup("time").unwrap();
        assert_eq!(restriction.allowed_contexts, vec!["init", "setup", "__construct"]);
        assert!(restriction.allows_context("SETUP"));
        assert!(!restriction.allows_context("process"));
    }

    #[test]
    fn negative_minimum_means_no_threshold() {
        let registry = SymbolRegistry::build([("mktime", raw(&[], Some(-1)))]);
        assert_eq!(registry.lookup("mktime").unwrap().minimum_arguments, None);
    }

    #[test]
    fn from_toml_accepts_both_spellings() {
        let table: toml::Table = toml::from_str(
            r#"
            [date]
            allowed_context = ["Init"]
            minimum_arguments = 2

            [DateTime]
            allowedContext = ["setUp"]
            minimumArguments = 1
            "#,
        )
        .unwrap();
        let registry = SymbolRegistry::from_toml(&table);

        let date = registry.lookup("DATE").unwrap();
        assert_eq!(date.allowed_contexts, vec!["init"]);
        assert_eq!(date.minimum_arguments, Some(2));

        let datetime = registry.lookup("datetime").unwrap();
        assert_eq!(datetime.allowed_contexts, vec!["setup"]);
        assert_eq!(datetime.minimum_arguments, Some(1));
    }

    #[test]
    fn malformed_toml_becomes_strict() {
        let table: toml::Table = toml::from_str(
            r#"
            time = true

            [date]
            allowed_context = ["init", 3]
            minimum_arguments = "two"

            [mktime]
            allowed_context = "setUp"
            minimum_arguments = -4
            "#,
        )
        .unwrap();
        let registry = SymbolRegistry::from_toml(&table);

        assert_eq!(registry.lookup("time"), Some(&Restriction::default()));

        let date = registry.lookup("date").unwrap();
        assert_eq!(date.allowed_contexts, vec!["init"]);
        assert_eq!(date.minimum_arguments, None);

        let mktime = registry.lookup("mktime").unwrap();
        assert_eq!(mktime.allowed_contexts, vec!["setup"]);
        assert_eq!(mktime.minimum_arguments, None);
    }

    #[test]
    fn iterates_in_name_order() {
        let registry = SymbolRegistry::build([
            ("time", RawRestriction::default()),
            ("date", RawRestriction::default()),
        ]);
        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["date", "time"]);
        assert_eq!(registry.len(), 2);
    }
}
