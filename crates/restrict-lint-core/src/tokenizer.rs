//! Language frontend seam.
//!
//! A [`Tokenizer`] turns source text into a [`TokenBuffer`]. Implement it to
//! teach the analyzer a new language.

use crate::tokens::TokenBuffer;

/// Failure to tokenize a source file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at line {line}, column {column}")]
pub struct TokenizeError {
    /// What went wrong.
    pub message: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

/// Trait for language-specific tokenizers.
pub trait Tokenizer: Send + Sync {
    /// Language identifier (e.g., `"php"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this tokenizer handles (e.g., `&[".php"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Tokenizes source text.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be tokenized (e.g. an
    /// unterminated string).
    fn tokenize(&self, source: &str) -> Result<TokenBuffer, TokenizeError>;

    /// Returns true if the path has one of this tokenizer's extensions.
    fn handles(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}
