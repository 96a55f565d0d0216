//! Call-site detection for functions and instantiations.

use restrict_lint_core::utils::arguments::call_parentheses;
use restrict_lint_core::utils::{next_significant, previous_significant, resolve_qualified_name};
use restrict_lint_core::{TokenKind, TokenStream};

use super::engine::CallSite;

/// Tokens that, directly before a name, mean the name is not a free
/// function call: declarations, member access, imports and trait
/// adaptations.
const NOT_A_FUNCTION_CALL: &[TokenKind] = &[
    TokenKind::As,
    TokenKind::Attribute,
    TokenKind::Const,
    TokenKind::DoubleColon,
    TokenKind::Function,
    TokenKind::Implements,
    TokenKind::Insteadof,
    TokenKind::New,
    TokenKind::NsSeparator,
    TokenKind::NullsafeObjectOperator,
    TokenKind::ObjectOperator,
    TokenKind::Private,
    TokenKind::Protected,
    TokenKind::Public,
];

/// Detects a free function call at the identifier `position`.
///
/// Only the last identifier of a qualified name is considered, so
/// `\Foo\date()` yields one call site named `Foo\date`.
#[must_use]
pub fn function_call(tokens: &dyn TokenStream, position: usize) -> Option<CallSite> {
    if !tokens.get(position)?.is(TokenKind::Identifier) {
        return None;
    }
    let name = resolve_qualified_name(tokens, position)?;
    if name.end != position {
        return None;
    }

    if let Some(previous) = previous_significant(tokens, name.start) {
        if is_excluded_prefix(tokens, previous) {
            return None;
        }
    }

    call_parentheses(tokens, name.end)?;
    Some(CallSite {
        position,
        identifier: name.end,
        name: name.name,
    })
}

/// Detects an instantiation at the `new` keyword `position`.
///
/// The call site is reported at the first token of the class name. Dynamic
/// targets (`new $class`, `new class {}`, `new static`) are not detected.
#[must_use]
pub fn instantiation(tokens: &dyn TokenStream, position: usize) -> Option<CallSite> {
    if !tokens.get(position)?.is(TokenKind::New) {
        return None;
    }
    let start = next_significant(tokens, position)?;
    let name = resolve_qualified_name(tokens, start)?;
    if !tokens.get(name.end)?.is(TokenKind::Identifier) {
        return None;
    }

    call_parentheses(tokens, name.end)?;
    Some(CallSite {
        position: name.start,
        identifier: name.end,
        name: name.name,
    })
}

fn is_excluded_prefix(tokens: &dyn TokenStream, previous: usize) -> bool {
    let Some(token) = tokens.get(previous) else {
        return false;
    };
    if NOT_A_FUNCTION_CALL.contains(&token.kind) {
        return true;
    }
    // `function &name()` returns by reference
    token.text == "&"
        && previous_significant(tokens, previous)
            .and_then(|p| tokens.get(p))
            .is_some_and(|t| t.is(TokenKind::Function))
}
