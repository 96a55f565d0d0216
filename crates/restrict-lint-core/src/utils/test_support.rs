//! Whitespace-delimited token builder for unit tests.

use crate::tokens::{Token, TokenBuffer, TokenKind};

/// Builds a buffer from space-separated pieces, inserting a whitespace token
/// between consecutive pieces.
pub(crate) fn lex(source: &str) -> TokenBuffer {
    let mut tokens = Vec::new();
    for (i, piece) in source.split_whitespace().enumerate() {
        if i > 0 {
            tokens.push(Token::new(TokenKind::Whitespace, " "));
        }
        tokens.push(Token::new(classify(piece), piece));
    }
    TokenBuffer::new(tokens)
}

fn classify(piece: &str) -> TokenKind {
    match piece {
        "(" => TokenKind::OpenParenthesis,
        ")" => TokenKind::CloseParenthesis,
        "[" => TokenKind::OpenSquareBracket,
        "]" => TokenKind::CloseSquareBracket,
        "{" => TokenKind::OpenCurlyBracket,
        "}" => TokenKind::CloseCurlyBracket,
        "," => TokenKind::Comma,
        ";" => TokenKind::Semicolon,
        ":" => TokenKind::Colon,
        "\\" => TokenKind::NsSeparator,
        "::" => TokenKind::DoubleColon,
        "->" => TokenKind::ObjectOperator,
        "function" => TokenKind::Function,
        "closure" => TokenKind::Closure,
        "new" => TokenKind::New,
        "return" => TokenKind::Keyword,
        p if p.starts_with("/*") => TokenKind::Comment,
        p if p.starts_with('$') => TokenKind::Variable,
        p if p.starts_with(|c: char| c.is_ascii_digit()) => TokenKind::Number,
        p if p.starts_with(|c: char| c.is_alphabetic() || c == '_') => TokenKind::Identifier,
        _ => TokenKind::Operator,
    }
}
