//! # restrict-lint-core
//!
//! Core framework for restricted-call linting over flat token streams.
//!
//! Language frontends produce a [`TokenBuffer`]; rules walk it. Contents:
//!
//! - [`TokenStream`] and [`TokenBuffer`], the token model with bracket and
//!   routine-scope metadata
//! - [`Tokenizer`], the seam for language frontends
//! - [`utils`] navigation helpers (cursor, qualified names, argument
//!   counting, enclosing routine lookup, allow directives)
//! - [`Rule`] trait for per-token rules
//! - [`Analyzer`], which discovers files and dispatches tokens to rules
//! - [`Violation`] and [`LintResult`], the reported findings
//!
//! ## Example
//!
//! ```ignore
//! use restrict_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .tokenizer(PhpTokenizer::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! println!("{}", result.summary());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod rule;
mod tokenizer;
mod tokens;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use rule::{Rule, RuleBox};
pub use tokenizer::{TokenizeError, Tokenizer};
pub use tokens::{Scope, Token, TokenBuffer, TokenKind, TokenStream, TRIVIA};
pub use types::{
    LintResult, Location, Severity, Suggestion, Summary, Violation, ViolationDiagnostic,
};
