//! Top-level call argument counting.

use crate::tokens::{TokenKind, TokenStream};
use crate::utils::cursor::{next_significant, skip_balanced_group};

/// Returns the `(` and `)` indices of the call whose name ends at `identifier`.
#[must_use]
pub fn call_parentheses(tokens: &dyn TokenStream, identifier: usize) -> Option<(usize, usize)> {
    let opener = next_significant(tokens, identifier)?;
    let token = tokens.get(opener)?;
    if !token.is(TokenKind::OpenParenthesis) {
        return None;
    }
    Some((opener, token.partner?))
}

/// Counts the arguments of the call whose name ends at `identifier`.
///
/// Nested parenthesis, bracket and brace groups are stepped over as single
/// units, so only commas at the top level of the argument list are
/// separators. A trailing comma does not start a new argument. Returns 0 when
/// no argument list follows `identifier`.
#[must_use]
pub fn count_arguments(tokens: &dyn TokenStream, identifier: usize) -> usize {
    let Some((opener, closer)) = call_parentheses(tokens, identifier) else {
        return 0;
    };

    let mut current = match next_significant(tokens, opener) {
        Some(first) if first < closer => first,
        _ => return 0,
    };

    let mut count = 1;
    loop {
        let is_comma = tokens.get(current).is_some_and(|t| t.is(TokenKind::Comma));
        let Some(next) = skip_balanced_group(tokens, current) else {
            break;
        };
        if next >= closer {
            break;
        }
        if is_comma {
            count += 1;
        }
        current = next;
    }
    count
}
