//! Flat token model shared by tokenizers and rules.
//!
//! A [`TokenBuffer`] is an index-addressable token sequence with precomputed
//! bracket partners and routine body scopes. Rules never see source text
//! directly; they navigate the buffer through the [`TokenStream`] trait.

use serde::{Deserialize, Serialize};

/// Classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// `<?php`, `<?=` or `<?`.
    OpenTag,
    /// `?>`.
    CloseTag,
    /// Text outside of PHP tags.
    InlineHtml,
    /// Spaces, tabs and newlines.
    Whitespace,
    /// `// ...`, `# ...` or `/* ... */`.
    Comment,
    /// `/** ... */`.
    DocComment,
    /// `$name`.
    Variable,
    /// Bare word that is not a reserved keyword.
    Identifier,
    /// `\`.
    NsSeparator,
    /// `::`.
    DoubleColon,
    /// `->`.
    ObjectOperator,
    /// `?->`.
    NullsafeObjectOperator,
    /// `(`.
    OpenParenthesis,
    /// `)`.
    CloseParenthesis,
    /// `[`.
    OpenSquareBracket,
    /// `]`.
    CloseSquareBracket,
    /// `{`.
    OpenCurlyBracket,
    /// `}`.
    CloseCurlyBracket,
    /// `#[`, closed by `]`.
    Attribute,
    /// `,`.
    Comma,
    /// `;`.
    Semicolon,
    /// `:`.
    Colon,
    /// `'...'`, `"..."`, backtick, heredoc or nowdoc literal.
    StringLiteral,
    /// Integer or float literal.
    Number,
    /// Any other operator or punctuation.
    Operator,
    /// `function` introducing a named routine.
    Function,
    /// `function` introducing an anonymous function.
    Closure,
    /// `fn`.
    Fn,
    /// `new`.
    New,
    /// `const`.
    Const,
    /// `as`.
    As,
    /// `implements`.
    Implements,
    /// `insteadof`.
    Insteadof,
    /// `private`.
    Private,
    /// `protected`.
    Protected,
    /// `public`.
    Public,
    /// `use`.
    Use,
    /// `namespace`.
    Namespace,
    /// `class`.
    Class,
    /// `interface`.
    Interface,
    /// `trait`.
    Trait,
    /// `extends`.
    Extends,
    /// `instanceof`.
    Instanceof,
    /// Any other reserved word (`return`, `echo`, `if`, ...).
    Keyword,
}

/// Token kinds that carry no meaning for navigation.
pub const TRIVIA: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Comment,
    TokenKind::DocComment,
];

impl TokenKind {
    /// Returns true for whitespace and comments.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        TRIVIA.contains(&self)
    }

    /// Returns true if this kind opens a bracket group.
    #[must_use]
    pub fn is_opener(self) -> bool {
        matches!(
            self,
            Self::OpenParenthesis
                | Self::OpenSquareBracket
                | Self::OpenCurlyBracket
                | Self::Attribute
        )
    }

    /// Returns true if this kind closes a bracket group.
    #[must_use]
    pub fn is_closer(self) -> bool {
        matches!(
            self,
            Self::CloseParenthesis | Self::CloseSquareBracket | Self::CloseCurlyBracket
        )
    }

    fn closes(self, opener: Self) -> bool {
        matches!(
            (opener, self),
            (Self::OpenParenthesis, Self::CloseParenthesis)
                | (Self::OpenSquareBracket | Self::Attribute, Self::CloseSquareBracket)
                | (Self::OpenCurlyBracket, Self::CloseCurlyBracket)
        )
    }
}

/// Body braces of a routine declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Index of the opening `{`.
    pub opener: usize,
    /// Index of the matching `}`.
    pub closer: usize,
}

impl Scope {
    /// Returns true if `index` lies strictly inside the braces.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index > self.opener && index < self.closer
    }
}

/// A single token with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Literal source text.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset of the first character.
    pub offset: usize,
    /// Index of the matching bracket, for bracket tokens.
    pub partner: Option<usize>,
    /// Body scope, for named routine declarations.
    pub scope: Option<Scope>,
}

impl Token {
    /// Creates an unpositioned token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            line: 1,
            column: 1,
            offset: 0,
            partner: None,
            scope: None,
        }
    }

    /// Sets the source position of this token.
    #[must_use]
    pub fn at(mut self, line: usize, column: usize, offset: usize) -> Self {
        self.line = line;
        self.column = column;
        self.offset = offset;
        self
    }

    /// Returns true if the token has the given kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Read-only, index-addressable access to a tokenized file.
///
/// Every lookup that can miss returns `None`; no index is ever used as a
/// "not found" marker.
pub trait TokenStream {
    /// All tokens in source order.
    fn tokens(&self) -> &[Token];

    /// Returns the token at `index`.
    fn get(&self, index: usize) -> Option<&Token> {
        self.tokens().get(index)
    }

    /// Number of tokens.
    fn len(&self) -> usize {
        self.tokens().len()
    }

    /// Returns true if the stream holds no tokens.
    fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }

    /// Finds the first index at or after `from` whose kind is in `kinds`
    /// (or not in `kinds` when `negate` is set), stopping before `until`.
    fn find_next(
        &self,
        kinds: &[TokenKind],
        from: usize,
        until: Option<usize>,
        negate: bool,
    ) -> Option<usize> {
        let tokens = self.tokens();
        let end = until.unwrap_or(tokens.len()).min(tokens.len());
        (from..end).find(|&i| kinds.contains(&tokens[i].kind) != negate)
    }

    /// Finds the first index at or before `from` whose kind is in `kinds`
    /// (or not in `kinds` when `negate` is set), stopping before reaching
    /// `until`.
    fn find_previous(
        &self,
        kinds: &[TokenKind],
        from: usize,
        until: Option<usize>,
        negate: bool,
    ) -> Option<usize> {
        let tokens = self.tokens();
        if tokens.is_empty() {
            return None;
        }
        let start = from.min(tokens.len() - 1);
        let lower = until.map_or(0, |u| u + 1);
        (lower..=start)
            .rev()
            .find(|&i| kinds.contains(&tokens[i].kind) != negate)
    }

    /// Returns the declared name for a routine declaration token.
    fn declaration_name(&self, index: usize) -> Option<&str> {
        let token = self.get(index)?;
        if !token.is(TokenKind::Function) {
            return None;
        }
        let mut next = self.find_next(TRIVIA, index + 1, None, true)?;
        if self.get(next)?.text == "&" {
            next = self.find_next(TRIVIA, next + 1, None, true)?;
        }
        let name = self.get(next)?;
        name.is(TokenKind::Identifier).then_some(name.text.as_str())
    }
}

/// Owned token sequence with linked brackets and routine scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
}

impl TokenBuffer {
    /// Wraps raw tokens, computing bracket partners and routine scopes.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut buffer = Self { tokens };
        buffer.link_brackets();
        buffer.link_scopes();
        buffer
    }

    /// Consumes the buffer, returning its tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn link_brackets(&mut self) {
        let mut stack: Vec<usize> = Vec::new();
        for index in 0..self.tokens.len() {
            let kind = self.tokens[index].kind;
            if kind.is_opener() {
                stack.push(index);
            } else if kind.is_closer() {
                // A stray closer leaves the stack untouched.
                if let Some(&open) = stack.last() {
                    if kind.closes(self.tokens[open].kind) {
                        stack.pop();
                        self.tokens[open].partner = Some(index);
                        self.tokens[index].partner = Some(open);
                    }
                }
            }
        }
    }

    fn link_scopes(&mut self) {
        for index in 0..self.tokens.len() {
            if self.tokens[index].is(TokenKind::Function) {
                let scope = self.routine_body(index);
                self.tokens[index].scope = scope;
            }
        }
    }

    /// Locates `{ ... }` after a declaration's parameter list and return type.
    fn routine_body(&self, function: usize) -> Option<Scope> {
        let mut name = self.find_next(TRIVIA, function + 1, None, true)?;
        if self.tokens[name].text == "&" {
            name = self.find_next(TRIVIA, name + 1, None, true)?;
        }
        let params = self.find_next(TRIVIA, name + 1, None, true)?;
        if !self.tokens[params].is(TokenKind::OpenParenthesis) {
            return None;
        }
        let mut cursor = self.tokens[params].partner?;
        loop {
            cursor = self.find_next(TRIVIA, cursor + 1, None, true)?;
            let token = &self.tokens[cursor];
            match token.kind {
                TokenKind::OpenCurlyBracket => {
                    return token.partner.map(|closer| Scope {
                        opener: cursor,
                        closer,
                    });
                }
                TokenKind::Semicolon | TokenKind::CloseCurlyBracket => return None,
                _ => {}
            }
        }
    }
}

impl TokenStream for TokenBuffer {
    fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
