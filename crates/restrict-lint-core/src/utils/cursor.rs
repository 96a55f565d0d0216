//! Token navigation helpers.
//!
//! Thin wrappers over [`TokenStream::find_next`] and
//! [`TokenStream::find_previous`] that skip trivia and balanced groups.

use crate::tokens::{TokenKind, TokenStream, TRIVIA};

/// Returns the index of the first non-trivia token after `position`.
#[must_use]
pub fn next_significant(tokens: &dyn TokenStream, position: usize) -> Option<usize> {
    next_significant_ignoring(tokens, position, TRIVIA)
}

/// Returns the index of the first token after `position` whose kind is not
/// in `ignore`.
#[must_use]
pub fn next_significant_ignoring(
    tokens: &dyn TokenStream,
    position: usize,
    ignore: &[TokenKind],
) -> Option<usize> {
    tokens.find_next(ignore, position.checked_add(1)?, None, true)
}

/// Returns the index of the last non-trivia token before `position`.
#[must_use]
pub fn previous_significant(tokens: &dyn TokenStream, position: usize) -> Option<usize> {
    previous_significant_ignoring(tokens, position, TRIVIA)
}

/// Returns the index of the last token before `position` whose kind is not
/// in `ignore`.
#[must_use]
pub fn previous_significant_ignoring(
    tokens: &dyn TokenStream,
    position: usize,
    ignore: &[TokenKind],
) -> Option<usize> {
    tokens.find_previous(ignore, position.checked_sub(1)?, None, true)
}

/// Steps over a balanced group.
///
/// If the token at `position` opens a bracket group, returns the first
/// significant token after its matching closer. Otherwise returns the first
/// significant token after `position`.
#[must_use]
pub fn skip_balanced_group(tokens: &dyn TokenStream, position: usize) -> Option<usize> {
    let token = tokens.get(position)?;
    let from = match token.partner {
        Some(closer) if token.kind.is_opener() => closer,
        _ => position,
    };
    next_significant(tokens, from)
}

/// Returns the kind of the token at `position`.
#[must_use]
pub fn kind_at(tokens: &dyn TokenStream, position: usize) -> Option<TokenKind> {
    tokens.get(position).map(|t| t.kind)
}

/// Returns true if the next significant token after `position` has `kind`.
#[must_use]
pub fn is_followed_by(tokens: &dyn TokenStream, position: usize, kind: TokenKind) -> bool {
    next_significant(tokens, position).and_then(|i| kind_at(tokens, i)) == Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_support::lex;

    #[test]
    fn next_and_previous_skip_whitespace() {
        let tokens = lex("a , b");
        // a ␠ , ␠ b
        assert_eq!(next_significant(&tokens, 0), Some(2));
        assert_eq!(previous_significant(&tokens, 4), Some(2));
        assert_eq!(previous_significant(&tokens, 0), None);
        assert_eq!(next_significant(&tokens, 4), None);
    }

    #[test]
    fn custom_ignore_set_stops_on_whitespace() {
        let tokens = lex("a , b");
        assert_eq!(next_significant_ignoring(&tokens, 0, &[]), Some(1));
        assert_eq!(previous_significant_ignoring(&tokens, 2, &[]), Some(1));
    }

    #[test]
    fn skip_balanced_group_jumps_over_parentheses() {
        let tokens = lex("( a , b ) c");
        let c = tokens.len() - 1;
        assert_eq!(skip_balanced_group(&tokens, 0), Some(c));
    }

    #[test]
    fn skip_balanced_group_moves_one_token_otherwise() {
        let tokens = lex("a ( b )");
        assert_eq!(skip_balanced_group(&tokens, 0), Some(2));
    }

    #[test]
    fn skip_unclosed_group_moves_one_token() {
        let tokens = lex("[ a");
        assert_eq!(skip_balanced_group(&tokens, 0), Some(2));
    }

    #[test]
    fn followed_by_checks_next_significant_kind() {
        let tokens = lex("date ( )");
        assert!(is_followed_by(&tokens, 0, TokenKind::OpenParenthesis));
        assert!(!is_followed_by(&tokens, 2, TokenKind::OpenParenthesis));
    }
}
