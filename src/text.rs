//! Text boundary helpers: decoding, whitespace normalization, tokenization.
//!
//! Everything downstream of [`decode`] assumes valid UTF-8; malformed input is
//! rejected here, before any fingerprinting starts.

use crate::error::Result;

/// Whether `c` separates tokens.
///
/// Unicode `White_Space` plus the information separators U+001C..=U+001F,
/// which Python's `str.split()` also treats as whitespace.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Split `text` on [`is_separator`] runs, dropping empty pieces.
pub fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|t| !t.is_empty())
}

/// Validate raw bytes as UTF-8.
pub fn decode(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

/// Normalize whitespace so layout-only edits do not change fingerprints.
///
/// Tabs become four spaces, `\r\n` and lone `\r` become `\n`, and trailing
/// whitespace is stripped from every line.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text
        .replace('\t', "    ")
        .replace("\r\n", "\n")
        .replace('\r', "\n");
    unified
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split source code into tokens.
///
/// Tokens are identifiers (`[A-Za-z_][A-Za-z0-9_]*`), quoted string literals
/// (single or double quotes, backslash escapes), runs of ASCII digits, and
/// otherwise single non-separator chars. Non-ASCII digits such as `١` are
/// not grouped; each is its own token. An unterminated quote is emitted as
/// a one-char token and scanning resumes after it.
pub fn tokenize_code(code: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = code;
    while let Some(c) = rest.chars().next() {
        if is_separator(c) {
            rest = &rest[c.len_utf8()..];
            continue;
        }
        let len = if c == '_' || c.is_ascii_alphabetic() {
            prefix_len(rest, |ch| ch == '_' || ch.is_ascii_alphanumeric())
        } else if c.is_ascii_digit() {
            prefix_len(rest, |ch| ch.is_ascii_digit())
        } else if c == '"' || c == '\'' {
            quoted_len(rest, c).unwrap_or(1)
        } else {
            c.len_utf8()
        };
        tokens.push(&rest[..len]);
        rest = &rest[len..];
    }
    tokens
}

fn prefix_len(s: &str, keep: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, ch)| !keep(ch))
        .map_or(s.len(), |(i, _)| i)
}

/// Byte length of the literal opened by `quote` at the start of `s`.
fn quoted_len(s: &str, quote: char) -> Option<usize> {
    let mut chars = s.char_indices().skip(1);
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, '\n')) | None => return None,
                Some(_) => {}
            },
            _ if ch == quote => return Some(i + ch.len_utf8()),
            _ => {}
        }
    }
    None
}
