//! Lexer for PHP source text.

use restrict_lint_core::{Token, TokenKind};
use thiserror::Error;

use crate::keywords::keyword_kind;

/// Errors raised while lexing PHP source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A quoted string has no closing quote.
    #[error("unterminated string at line {line}, col {col}")]
    UnterminatedString {
        /// Line of the opening quote.
        line: usize,
        /// Column of the opening quote.
        col: usize,
    },
    /// A `/* ... */` comment has no closing `*/`.
    #[error("unterminated comment at line {line}, col {col}")]
    UnterminatedComment {
        /// Line of the comment start.
        line: usize,
        /// Column of the comment start.
        col: usize,
    },
    /// A heredoc or nowdoc has no closing label.
    #[error("unterminated heredoc `{label}` at line {line}, col {col}")]
    UnterminatedHeredoc {
        /// The heredoc label.
        label: String,
        /// Line of the `<<<`.
        line: usize,
        /// Column of the `<<<`.
        col: usize,
    },
}

impl LexError {
    fn position(&self) -> (usize, usize) {
        match self {
            Self::UnterminatedString { line, col }
            | Self::UnterminatedComment { line, col }
            | Self::UnterminatedHeredoc { line, col, .. } => (*line, *col),
        }
    }
}

impl From<LexError> for restrict_lint_core::TokenizeError {
    fn from(e: LexError) -> Self {
        let (line, column) = e.position();
        let message = match &e {
            LexError::UnterminatedString { .. } => "unterminated string".to_string(),
            LexError::UnterminatedComment { .. } => "unterminated comment".to_string(),
            LexError::UnterminatedHeredoc { label, .. } => format!("unterminated heredoc `{label}`"),
        };
        Self {
            message,
            line,
            column,
        }
    }
}

/// Multi-character operators, longest first within each shared prefix.
const OPERATORS: &[&str] = &[
    "<=>", "**=", "...", "<<=", ">>=", "===", "!==", "??=", "=>", "==", "!=", "<>", "<=", ">=",
    "&&", "||", "??", "++", "--", "+=", "-=", "*=", "/=", ".=", "%=", "&=", "|=", "^=", "<<",
    ">>", "**",
];

/// Words after which a keyword spelling is a plain identifier.
const NAME_POSITIONS: &[TokenKind] = &[
    TokenKind::Function,
    TokenKind::ObjectOperator,
    TokenKind::NullsafeObjectOperator,
    TokenKind::DoubleColon,
];

#[derive(Clone, Copy)]
struct Mark {
    offset: usize,
    line: usize,
    col: usize,
}

/// Single-pass PHP lexer.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    in_php: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `src`, outside PHP tags.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            col: 1,
            in_php: false,
            tokens: Vec::new(),
        }
    }

    /// Lexes the whole source.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for unterminated strings, comments and heredocs.
    pub fn run(mut self) -> Result<Vec<Token>, LexError> {
        while self.pos < self.src.len() {
            if self.in_php {
                self.php_token()?;
            } else {
                self.inline_html();
            }
        }
        classify_closures(&mut self.tokens);
        Ok(self.tokens)
    }

    fn rest(&self) -> &'a str {
        let src: &'a str = self.src;
        &src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn mark(&self) -> Mark {
        Mark {
            offset: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn bump_bytes(&mut self, n: usize) {
        let target = (self.pos + n).min(self.src.len());
        while self.pos < target {
            self.bump();
        }
    }

    fn push(&mut self, kind: TokenKind, start: Mark) {
        let text = &self.src[start.offset..self.pos];
        self.tokens
            .push(Token::new(kind, text).at(start.line, start.col, start.offset));
    }

    fn last_significant_kind(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
    }

    fn inline_html(&mut self) {
        let start = self.mark();
        let rest = self.rest();
        let open = find_open_tag(rest);
        let html_len = open.map_or(rest.len(), |(at, _)| at);
        if html_len > 0 {
            self.bump_bytes(html_len);
            self.push(TokenKind::InlineHtml, start);
        }
        if let Some((_, tag_len)) = open {
            let tag_start = self.mark();
            self.bump_bytes(tag_len);
            self.push(TokenKind::OpenTag, tag_start);
            self.in_php = true;
        }
    }

    fn php_token(&mut self) -> Result<(), LexError> {
        let start = self.mark();
        let rest = self.rest();
        let Some(ch) = self.peek() else {
            return Ok(());
        };

        if rest.starts_with("?>") {
            self.bump_bytes(2);
            self.push(TokenKind::CloseTag, start);
            self.in_php = false;
            return Ok(());
        }

        if ch.is_whitespace() {
            while self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            }
            self.push(TokenKind::Whitespace, start);
            return Ok(());
        }

        if rest.starts_with("#[") {
            self.bump_bytes(2);
            self.push(TokenKind::Attribute, start);
            return Ok(());
        }

        if ch == '#' || rest.starts_with("//") {
            self.line_comment();
            self.push(TokenKind::Comment, start);
            return Ok(());
        }

        if rest.starts_with("/*") {
            let kind = if rest.starts_with("/**") && rest[3..].starts_with(char::is_whitespace) {
                TokenKind::DocComment
            } else {
                TokenKind::Comment
            };
            self.block_comment(start)?;
            self.push(kind, start);
            return Ok(());
        }

        if ch == '$' && self.peek_at(1).is_some_and(is_ident_start) {
            self.bump();
            self.ident_tail();
            self.push(TokenKind::Variable, start);
            return Ok(());
        }

        if is_ident_start(ch) {
            self.ident_tail();
            let word = &self.src[start.offset..self.pos];
            let kind = if self
                .last_significant_kind()
                .is_some_and(|k| NAME_POSITIONS.contains(&k))
            {
                TokenKind::Identifier
            } else {
                keyword_kind(word).unwrap_or(TokenKind::Identifier)
            };
            self.push(kind, start);
            return Ok(());
        }

        if ch.is_ascii_digit() || (ch == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            self.number(start);
            self.push(TokenKind::Number, start);
            return Ok(());
        }

        if matches!(ch, '\'' | '"' | '`') {
            self.quoted(ch, start)?;
            self.push(TokenKind::StringLiteral, start);
            return Ok(());
        }

        if rest.starts_with("<<<") && self.heredoc(start)? {
            self.push(TokenKind::StringLiteral, start);
            return Ok(());
        }

        self.punctuation(start);
        Ok(())
    }

    fn punctuation(&mut self, start: Mark) {
        let rest = self.rest();
        let fixed = [
            ("?->", TokenKind::NullsafeObjectOperator),
            ("::", TokenKind::DoubleColon),
            ("->", TokenKind::ObjectOperator),
        ];
        for (text, kind) in fixed {
            if rest.starts_with(text) {
                self.bump_bytes(text.len());
                self.push(kind, start);
                return;
            }
        }

        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.bump_bytes(op.len());
            self.push(TokenKind::Operator, start);
            return;
        }

        let Some(ch) = self.bump() else {
            return;
        };
        let kind = match ch {
            '(' => TokenKind::OpenParenthesis,
            ')' => TokenKind::CloseParenthesis,
            '[' => TokenKind::OpenSquareBracket,
            ']' => TokenKind::CloseSquareBracket,
            '{' => TokenKind::OpenCurlyBracket,
            '}' => TokenKind::CloseCurlyBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '\\' => TokenKind::NsSeparator,
            _ => TokenKind::Operator,
        };
        self.push(kind, start);
    }

    fn ident_tail(&mut self) {
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
    }

    fn number(&mut self, start: Mark) {
        let hex = self.rest().starts_with("0x") || self.rest().starts_with("0X");
        while let Some(c) = self.peek() {
            let continues = c.is_ascii_alphanumeric()
                || c == '_'
                || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
                || (matches!(c, '+' | '-')
                    && !hex
                    && self.src[start.offset..self.pos].ends_with(['e', 'E']));
            if !continues {
                break;
            }
            self.bump();
        }
    }

    /// Consumes to end of line, leaving a `?>` in place.
    fn line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' || self.rest().starts_with("?>") {
                break;
            }
            self.bump();
        }
    }

    fn block_comment(&mut self, start: Mark) -> Result<(), LexError> {
        let Some(end) = self.rest()[2..].find("*/") else {
            return Err(LexError::UnterminatedComment {
                line: start.line,
                col: start.col,
            });
        };
        self.bump_bytes(end + 4);
        Ok(())
    }

    fn quoted(&mut self, quote: char, start: Mark) -> Result<(), LexError> {
        self.bump();
        loop {
            match self.bump() {
                None => {
                    return Err(LexError::UnterminatedString {
                        line: start.line,
                        col: start.col,
                    })
                }
                Some('\\') => {
                    self.bump();
                }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }

    /// Lexes a heredoc or nowdoc. Returns `Ok(false)` if `<<<` does not
    /// introduce one, leaving the input untouched.
    fn heredoc(&mut self, start: Mark) -> Result<bool, LexError> {
        let Some(label) = heredoc_label(self.rest()) else {
            return Ok(false);
        };
        let Some(header_end) = self.rest().find('\n') else {
            return Ok(false);
        };

        let body_start = self.pos + header_end + 1;
        let body = &self.src[body_start..];
        let mut line_start = 0;
        let mut close = None;
        for line in body.split_inclusive('\n') {
            let trimmed = line.trim_start_matches([' ', '\t']);
            if let Some(after) = trimmed.strip_prefix(label.as_str()) {
                if !after.starts_with(is_ident_char) {
                    let indent = line.len() - trimmed.len();
                    close = Some(body_start + line_start + indent + label.len());
                    break;
                }
            }
            line_start += line.len();
        }

        let Some(close) = close else {
            return Err(LexError::UnterminatedHeredoc {
                label,
                line: start.line,
                col: start.col,
            });
        };
        self.bump_bytes(close - self.pos);
        Ok(true)
    }
}

/// Finds the next PHP open tag, returning its byte offset and length.
fn find_open_tag(text: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(found) = text[from..].find("<?") {
        let at = from + found;
        let after = &text[at + 2..];
        if after.get(..3).is_some_and(|tag| tag.eq_ignore_ascii_case("php")) {
            let tail = &after[3..];
            if tail.is_empty() || tail.starts_with(char::is_whitespace) {
                return Some((at, 5));
            }
        } else if after.starts_with('=') {
            return Some((at, 3));
        } else if after.is_empty() || after.starts_with(char::is_whitespace) {
            return Some((at, 2));
        }
        from = at + 2;
    }
    None
}

/// Parses `<<<LABEL`, `<<<"LABEL"` or `<<<'LABEL'` at the start of `text`.
fn heredoc_label(text: &str) -> Option<String> {
    let header = text.strip_prefix("<<<")?.trim_start_matches([' ', '\t']);
    let (quote, header) = match header.chars().next()? {
        q @ ('"' | '\'') => (Some(q), &header[1..]),
        _ => (None, header),
    };
    let len = header
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map_or(header.len(), |(i, _)| i);
    if len == 0 || !header.starts_with(is_ident_start) {
        return None;
    }
    let rest = &header[len..];
    if let Some(q) = quote {
        if !rest.starts_with(q) {
            return None;
        }
    }
    Some(header[..len].to_string())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Reclassifies `function` tokens that start an anonymous function.
fn classify_closures(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if !tokens[i].is(TokenKind::Function) {
            continue;
        }
        let mut next = tokens[i + 1..]
            .iter()
            .position(|t| !t.kind.is_trivia())
            .map(|p| p + i + 1);
        if let Some(n) = next {
            if tokens[n].text == "&" {
                next = tokens[n + 1..]
                    .iter()
                    .position(|t| !t.kind.is_trivia())
                    .map(|p| p + n + 1);
            }
        }
        if next.is_some_and(|n| tokens[n].is(TokenKind::OpenParenthesis)) {
            tokens[i].kind = TokenKind::Closure;
        }
    }
}
