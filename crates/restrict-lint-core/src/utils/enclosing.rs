//! Enclosing routine lookup.

use crate::tokens::{TokenKind, TokenStream};

/// Returns the index of the innermost named routine whose body contains
/// `position`.
///
/// Walks backward over `function` declarations. Routines whose body closed
/// before `position`, and bodiless (abstract or interface) declarations, are
/// skipped. Closures and arrow functions are never routines.
#[must_use]
pub fn enclosing_routine(tokens: &dyn TokenStream, position: usize) -> Option<usize> {
    let mut from = position.checked_sub(1)?;
    loop {
        let candidate = tokens.find_previous(&[TokenKind::Function], from, None, false)?;
        let contains = tokens
            .get(candidate)
            .and_then(|t| t.scope)
            .is_some_and(|scope| scope.contains(position));
        if contains {
            return Some(candidate);
        }
        from = candidate.checked_sub(1)?;
    }
}

/// Returns the declared name of the innermost named routine containing
/// `position`, or `None` at file scope.
#[must_use]
pub fn enclosing_routine_name(tokens: &dyn TokenStream, position: usize) -> Option<&str> {
    let routine = enclosing_routine(tokens, position)?;
    tokens.declaration_name(routine)
}
