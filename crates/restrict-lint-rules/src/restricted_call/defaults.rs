//! Built-in restriction tables.
//!
//! Both tables target wall-clock access outside of set-up routines.

use super::registry::RawRestriction;

/// A static restriction table sharing one allowed-context list.
#[derive(Debug, Clone, Copy)]
pub struct DefaultTable {
    /// Routine names in which every listed symbol may be used.
    pub allowed_contexts: &'static [&'static str],
    /// Symbol names with their optional minimum argument count.
    pub symbols: &'static [(&'static str, Option<i64>)],
}

impl DefaultTable {
    /// Expands the table into raw registry entries.
    pub fn entries(&self) -> impl Iterator<Item = (String, RawRestriction)> + '_ {
        self.symbols.iter().map(|(name, minimum)| {
            (
                (*name).to_string(),
                RawRestriction {
                    allowed_contexts: self
                        .allowed_contexts
                        .iter()
                        .map(|c| (*c).to_string())
                        .collect(),
                    minimum_arguments: *minimum,
                },
            )
        })
    }
}

/// Date and time functions. A threshold marks the argument count at which
/// the call receives an explicit timestamp.
pub const RESTRICTED_FUNCTIONS: DefaultTable = DefaultTable {
    allowed_contexts: &["__construct", "init", "setUp"],
    symbols: &[
        ("date", Some(2)),
        ("date_create", Some(1)),
        ("date_create_immutable", Some(1)),
        ("get_date", Some(1)),
        ("gettimeofday", None),
        ("gmdate", Some(2)),
        ("gmmktime", Some(6)),
        ("gmstrftime", Some(2)),
        ("idate", Some(2)),
        ("localtime", Some(2)),
        ("mktime", Some(6)),
        ("strftime", Some(2)),
        ("microtime", None),
        ("strtotime", Some(2)),
        ("time", None),
    ],
};

/// Date classes whose constructors default to "now".
pub const RESTRICTED_CLASSES: DefaultTable = DefaultTable {
    allowed_contexts: &["__construct", "init", "setup"],
    symbols: &[("DateTime", None), ("DateTimeImmutable", None)],
};
