//! Inline suppression comments.
//!
//! A directive on the reported line, or the line above it, silences the
//! listed rules:
//! ```text
//! // restrict-lint: allow(restricted-functions) reason="legacy report"
//! # restrict-lint: allow(all)
//! /* restrict-lint: allow(RC002) */
//! ```

use std::collections::HashSet;

/// Marker that introduces a directive inside a comment.
pub const DIRECTIVE_MARKER: &str = "restrict-lint:";

/// Whether a directive suppresses a rule at a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// No covering directive.
    Denied,
    /// Suppressed.
    Allowed {
        /// Text of `reason="..."`, when given.
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// True for [`AllowCheck::Allowed`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// The given reason, if suppressed with one.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// One `restrict-lint: allow(...)` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowDirective {
    /// Rule names, codes, or `all`.
    pub rules: HashSet<String>,
    /// Text of `reason="..."`.
    pub reason: Option<String>,
}

impl AllowDirective {
    /// Returns true if the directive covers a rule by name, code or `all`.
    #[must_use]
    pub fn covers(&self, rule_name: &str, rule_code: &str) -> bool {
        self.rules.contains(rule_name) || self.rules.contains(rule_code) || self.rules.contains("all")
    }
}

/// Checks the given line and the line before it for a directive covering
/// the rule.
///
/// `line` is 1-indexed.
#[must_use]
pub fn check_allow_with_reason(
    content: &str,
    line: usize,
    rule_name: &str,
    rule_code: &str,
) -> AllowCheck {
    if line == 0 {
        return AllowCheck::Denied;
    }
    let first = line.saturating_sub(2);
    content
        .lines()
        .skip(first)
        .take(line - first)
        .filter_map(parse_allow_directive)
        .find(|directive| directive.covers(rule_name, rule_code))
        .map_or(AllowCheck::Denied, |directive| AllowCheck::Allowed {
            reason: directive.reason,
        })
}

/// Parses an allow directive from a single source line.
///
/// The directive must appear inside a `//`, `#` or `/*` comment.
#[must_use]
pub fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let marker = line.find(DIRECTIVE_MARKER)?;
    if !ends_inside_comment(&line[..marker]) {
        return None;
    }

    let rest = line[marker + DIRECTIVE_MARKER.len()..].trim_start();
    let rest = rest.strip_prefix("allow(")?;
    let close = rest.find(')')?;

    let rules: HashSet<String> = rest[..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if rules.is_empty() {
        return None;
    }

    let reason = parse_reason(&rest[close + 1..]);
    Some(AllowDirective { rules, reason })
}

/// True if the end of `prefix` lies inside a `//`, `#` or open `/*` comment.
///
/// Quoted strings are skipped, and `#[` opens an attribute, not a comment.
fn ends_inside_comment(prefix: &str) -> bool {
    let bytes = prefix.as_bytes();
    let mut quote = None;
    let mut i = 0;
    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();
        match (quote, bytes[i]) {
            (Some(_), b'\\') => i += 1,
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, q @ (b'\'' | b'"')) => quote = Some(q),
            (None, b'#') if next != Some(b'[') => return true,
            (None, b'/') if next == Some(b'/') => return true,
            (None, b'/') if next == Some(b'*') => match prefix[i + 2..].find("*/") {
                Some(end) => i += end + 3,
                None => return true,
            },
            (None, _) => {}
        }
        i += 1;
    }
    false
}

fn parse_reason(tail: &str) -> Option<String> {
    let start = tail.find("reason=\"")? + "reason=\"".len();
    let len = tail[start..].find('"')?;
    let reason = tail[start..start + len].trim();
    (!reason.is_empty()).then(|| reason.to_string())
}
