//! # restrict-lint-php
//!
//! PHP frontend for restrict-lint.
//!
//! [`PhpTokenizer`] lexes PHP source into a linked
//! [`TokenBuffer`](restrict_lint_core::TokenBuffer): brackets carry their
//! partners and named function declarations carry their body scopes.
//!
//! ```
//! use restrict_lint_core::{TokenKind, TokenStream, Tokenizer};
//! use restrict_lint_php::PhpTokenizer;
//!
//! let buffer = PhpTokenizer::new().tokenize("<?php date('Y');").unwrap();
//! assert!(buffer.tokens().iter().any(|t| t.is(TokenKind::Identifier)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod keywords;
pub mod lexer;

pub use lexer::{LexError, Lexer};

use restrict_lint_core::{TokenBuffer, TokenizeError, Tokenizer};

/// Tokenizer for `.php`, `.phtml` and `.inc` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpTokenizer;

impl PhpTokenizer {
    /// Creates a new PHP tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for PhpTokenizer {
    fn language_id(&self) -> &'static str {
        "php"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".php", ".phtml", ".inc"]
    }

    fn tokenize(&self, source: &str) -> Result<TokenBuffer, TokenizeError> {
        let tokens = Lexer::new(source).run()?;
        tracing::trace!(count = tokens.len(), "lexed php source");
        Ok(TokenBuffer::new(tokens))
    }
}
