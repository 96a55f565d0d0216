//! # restrict-lint-rules
//!
//! Built-in rules for restrict-lint.
//!
//! Both rules flag calls to configured symbols unless the call sits inside
//! an allowed routine or passes enough arguments.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | RC001 | `restricted-functions` | Restricts calls such as `date()` and `time()` |
//! | RC002 | `restricted-class-instances` | Restricts `new DateTime()` and `new DateTimeImmutable()` |
//!
//! ## Usage
//!
//! ```ignore
//! use restrict_lint_core::Analyzer;
//! use restrict_lint_php::PhpTokenizer;
//! use restrict_lint_rules::RestrictedCallRule;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .tokenizer(PhpTokenizer::new())
//!     .rule(RestrictedCallRule::functions())
//!     .rule(RestrictedCallRule::class_instances())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod presets;
pub mod restricted_call;

pub use presets::{advisory_rules, recommended_rules, rules_from_config, Preset};
pub use restricted_call::engine::{evaluate, CallSite, Finding};
pub use restricted_call::registry::{RawRestriction, Restriction, SymbolRegistry};
pub use restricted_call::{RestrictedCallRule, SymbolKind};

/// Re-export core types for convenience.
pub use restrict_lint_core::{Rule, Severity, Violation};
