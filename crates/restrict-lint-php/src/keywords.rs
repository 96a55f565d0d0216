//! Case-insensitive PHP keyword table.

use restrict_lint_core::TokenKind;

/// Reserved words without a dedicated token kind.
const RESERVED: &[&str] = &[
    "abstract",
    "and",
    "array",
    "break",
    "callable",
    "case",
    "catch",
    "clone",
    "continue",
    "declare",
    "default",
    "do",
    "echo",
    "else",
    "elseif",
    "empty",
    "enddeclare",
    "endfor",
    "endforeach",
    "endif",
    "endswitch",
    "endwhile",
    "eval",
    "exit",
    "die",
    "final",
    "finally",
    "for",
    "foreach",
    "global",
    "goto",
    "if",
    "include",
    "include_once",
    "isset",
    "list",
    "match",
    "or",
    "print",
    "readonly",
    "require",
    "require_once",
    "return",
    "static",
    "switch",
    "throw",
    "try",
    "unset",
    "var",
    "while",
    "xor",
    "yield",
];

/// Returns the token kind for a keyword, or `None` for a plain identifier.
#[must_use]
pub fn keyword_kind(word: &str) -> Option<TokenKind> {
    let lower = word.to_ascii_lowercase();
    let kind = match lower.as_str() {
        "function" => TokenKind::Function,
        "fn" => TokenKind::Fn,
        "new" => TokenKind::New,
        "const" => TokenKind::Const,
        "as" => TokenKind::As,
        "implements" => TokenKind::Implements,
        "insteadof" => TokenKind::Insteadof,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "public" => TokenKind::Public,
        "use" => TokenKind::Use,
        "namespace" => TokenKind::Namespace,
        "class" => TokenKind::Class,
        "interface" => TokenKind::Interface,
        "trait" => TokenKind::Trait,
        "extends" => TokenKind::Extends,
        "instanceof" => TokenKind::Instanceof,
        other if RESERVED.contains(&other) => TokenKind::Keyword,
        _ => return None,
    };
    Some(kind)
}
