use restrict_lint_core::{TokenBuffer, TokenStream, Tokenizer};
use restrict_lint_php::PhpTokenizer;

pub(crate) fn php(source: &str) -> TokenBuffer {
    PhpTokenizer::new().tokenize(source).unwrap()
}

pub(crate) fn position_of(tokens: &dyn TokenStream, text: &str) -> usize {
    tokens
        .tokens()
        .iter()
        .position(|t| t.text == text)
        .unwrap_or_else(|| panic!("no token `{text}`"))
}
