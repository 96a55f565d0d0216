//! Qualified name reconstruction.
//!
//! PHP names such as `\Foo\Bar\baz` arrive as a run of identifier and
//! namespace-separator tokens. [`resolve_qualified_name`] rebuilds the
//! spelling and records the on-screen span of the run.

use crate::tokens::{TokenKind, TokenStream};
use crate::utils::cursor::{next_significant, previous_significant};

const NAME_PARTS: &[TokenKind] = &[TokenKind::Identifier, TokenKind::NsSeparator];

/// A name spelled across one or more tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Name without a leading separator (e.g. `Foo\Bar`).
    pub name: String,
    /// Index of the first token of the run.
    pub start: usize,
    /// Index of the last token of the run.
    pub end: usize,
}

fn is_name_part(tokens: &dyn TokenStream, index: usize) -> bool {
    tokens
        .get(index)
        .is_some_and(|t| NAME_PARTS.contains(&t.kind))
}

/// Resolves the full name whose run contains `position`.
///
/// Returns `None` if the token at `position` is neither an identifier nor a
/// namespace separator.
#[must_use]
pub fn resolve_qualified_name(tokens: &dyn TokenStream, position: usize) -> Option<QualifiedName> {
    if !is_name_part(tokens, position) {
        return None;
    }

    let mut start = position;
    while let Some(previous) = previous_significant(tokens, start) {
        if !is_name_part(tokens, previous) {
            break;
        }
        start = previous;
    }

    let mut name = String::new();
    let mut end = start;
    let mut current = Some(start);
    while let Some(index) = current {
        if !is_name_part(tokens, index) {
            break;
        }
        if let Some(token) = tokens.get(index) {
            name.push_str(&token.text);
        }
        end = index;
        current = next_significant(tokens, index);
    }

    if let Some(stripped) = name.strip_prefix('\\') {
        name = stripped.to_string();
    }

    Some(QualifiedName { name, start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_support::lex;

    #[test]
    fn resolves_single_identifier() {
        let tokens = lex("date ( )");
        let q = resolve_qualified_name(&tokens, 0).unwrap();
        assert_eq!(q.name, "date");
        assert_eq!((q.start, q.end), (0, 0));
    }

    #[test]
    fn strips_one_leading_separator() {
        let tokens = lex("= \\ Foo \\ Bar ( )");
        // = ␠ \ ␠ Foo ␠ \ ␠ Bar
        let q = resolve_qualified_name(&tokens, 8).unwrap();
        assert_eq!(q.name, "Foo\\Bar");
        assert_eq!((q.start, q.end), (2, 8));
    }

    #[test]
    fn resolves_from_middle_of_run() {
        let tokens = lex("Foo \\ Bar");
        let q = resolve_qualified_name(&tokens, 0).unwrap();
        assert_eq!(q.name, "Foo\\Bar");
        assert_eq!(q.end, 4);
    }

    #[test]
    fn stops_at_member_access() {
        let tokens = lex("$x -> date ( )");
        let q = resolve_qualified_name(&tokens, 4).unwrap();
        assert_eq!(q.name, "date");
        assert_eq!(q.start, 4);
    }

    #[test]
    fn non_name_token_resolves_to_none() {
        let tokens = lex("( date )");
        assert!(resolve_qualified_name(&tokens, 0).is_none());
    }
}
