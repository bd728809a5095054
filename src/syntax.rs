//! Character-level SIP grammar helpers.
//!
//! This module is the bridge between raw text and the value model: token
//! and host predicates, quoted-string handling, percent escaping per URI
//! component (RFC 3261 §25.1 character classes) and the RFC 3966
//! telephone-number helpers. Everything here is pure and allocation-light;
//! the typed parsers in `uri/` and `header/` build on these primitives.

use crate::error::{Error, Result};
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

/// True for characters of the SIP `token` class (RFC 3261 §25.1).
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '-' | '.' | '!' | '%' | '*' | '_' | '+' | '`' | '\'' | '~')
}

/// True when the whole string is a non-empty SIP token.
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

/// True when the string is a syntactically complete quoted-string,
/// including the surrounding double quotes and with every backslash
/// escaping exactly one character.
pub fn is_quoted(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'"' || bytes[bytes.len() - 1] != b'"' {
        return false;
    }
    let mut chars = s[1..s.len() - 1].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return false;
                }
            }
            '"' => return false,
            _ => {}
        }
    }
    true
}

/// Wraps a string in double quotes, backslash-escaping `"` and `\`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Strips surrounding quotes and resolves backslash escapes. Inputs that
/// are not quoted-strings are returned unchanged.
pub fn unquote(s: &str) -> String {
    if !is_quoted(s) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() - 2);
    let mut chars = s[1..s.len() - 1].chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(esc) = chars.next() {
                out.push(esc);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// True when the string is a syntactically valid host: a hostname, an
/// IPv4 literal, or an IPv6 literal (bracketed or bare).
pub fn is_host(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        return Ipv6Addr::from_str(inner).is_ok();
    }
    if IpAddr::from_str(s).is_ok() {
        return true;
    }
    is_hostname(s)
}

/// Hostname per RFC 3261: dot-separated labels, each starting and ending
/// alphanumeric with hyphens allowed inside.
fn is_hostname(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|label| {
            !label.is_empty()
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                && !label.starts_with('-')
                && !label.ends_with('-')
        })
}

/// Unfolds linear white space: a line break followed by SP/HTAB collapses
/// to a single space, and runs of WSP compress to one space.
pub fn unfold_lws(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let mut last_was_wsp = false;
    while i < bytes.len() {
        let fold = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n')
                && matches!(bytes.get(i + 2), Some(b' ') | Some(b'\t')) =>
            {
                Some(2)
            }
            b'\n' if matches!(bytes.get(i + 1), Some(b' ') | Some(b'\t')) => Some(1),
            b' ' | b'\t' => Some(0),
            _ => None,
        };
        match fold {
            Some(skip) => {
                i += skip;
                if !last_was_wsp {
                    out.push(b' ');
                    last_was_wsp = true;
                }
                while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
                    i += 1;
                }
            }
            None => {
                out.push(bytes[i]);
                i += 1;
                last_was_wsp = false;
            }
        }
    }
    // Input was valid UTF-8 and only ASCII bytes were touched.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

// ---- percent escaping -------------------------------------------------

/// RFC 3261 `mark` characters, unreserved in every URI component.
fn is_mark(c: char) -> bool {
    matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_mark(c)
}

/// `user-unreserved` from RFC 3261 §25.1.
fn is_user_unreserved(c: char) -> bool {
    matches!(c, '&' | '=' | '+' | '$' | ',' | ';' | '?' | '/')
}

/// `password` extra characters.
fn is_password_unreserved(c: char) -> bool {
    matches!(c, '&' | '=' | '+' | '$' | ',')
}

/// `param-unreserved` from RFC 3261 §25.1.
fn is_param_unreserved(c: char) -> bool {
    matches!(c, '[' | ']' | '/' | ':' | '&' | '+' | '$')
}

/// `hnv-unreserved` from RFC 3261 §25.1 (URI header names and values).
fn is_hnv_unreserved(c: char) -> bool {
    matches!(c, '[' | ']' | '/' | '?' | ':' | '+' | '$')
}

fn escape_with(s: &str, keep: fn(char) -> bool) -> String {
    let mut out = String::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < s.len() {
        let c = s[i..].chars().next().unwrap_or('\0');
        // A valid %XX triplet is already an escape; never re-escape it.
        if c == '%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.push_str(&s[i..i + 3]);
            i += 3;
            continue;
        }
        if is_unreserved(c) || keep(c) {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push('%');
                out.push_str(&format!("{:02X}", b));
            }
        }
        i += c.len_utf8();
    }
    out
}

/// Percent-escapes a URI user component.
pub fn escape_user(s: &str) -> String {
    escape_with(s, is_user_unreserved)
}

/// Percent-escapes a URI password component.
pub fn escape_password(s: &str) -> String {
    escape_with(s, is_password_unreserved)
}

/// Percent-escapes a URI parameter name or value.
pub fn escape_param(s: &str) -> String {
    escape_with(s, is_param_unreserved)
}

/// Percent-escapes a URI header name or value (`hnv-unreserved` class).
pub fn escape_header(s: &str) -> String {
    escape_with(s, is_hnv_unreserved)
}

/// Resolves percent escapes. Incomplete or non-hex sequences are rejected.
pub fn unescape(s: &str) -> Result<String> {
    let bytes = s.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let (h1, h2) = match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(&a), Some(&b)) => (a, b),
                _ => return Err(Error::malformed("escaped", s)),
            };
            match (hex_val(h1), hex_val(h2)) {
                (Some(v1), Some(v2)) => {
                    out.push((v1 << 4) | v2);
                    i += 3;
                }
                _ => return Err(Error::malformed("escaped", s)),
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| Error::malformed("escaped", s))
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// ---- telephone numbers (RFC 3966) -------------------------------------

/// Visual separators that carry no meaning in a telephone number.
pub fn is_visual_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | '.' | '(' | ')')
}

/// True when the string looks like a telephone number: at least one digit,
/// an optional leading `+`, and otherwise only digits and visual
/// separators.
pub fn is_phone_number(s: &str) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || is_visual_separator(c))
}

/// Removes every visual separator (spaces, dashes, dots, parentheses).
pub fn strip_visual_separators(s: &str) -> String {
    s.chars().filter(|c| !is_visual_separator(*c)).collect()
}

/// Removes spaces only; rendering a `tel:` number keeps the remaining
/// visual separators verbatim.
pub fn strip_spaces(s: &str) -> String {
    s.chars().filter(|c| *c != ' ').collect()
}

/// Splits on `sep` at the top level, honouring quoted-strings and
/// angle-bracketed URIs so separators inside them are not split points.
pub fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => depth += 1,
            '>' if !in_quotes && depth > 0 => depth -= 1,
            c if c == sep && !in_quotes && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_predicate() {
        assert!(is_token("z9hG4bK-77.asd*"));
        assert!(!is_token(""));
        assert!(!is_token("with space"));
        assert!(!is_token("semi;colon"));
    }

    #[test]
    fn quoted_string_round_trip() {
        assert!(is_quoted("\"hello\""));
        assert!(is_quoted("\"say \\\"hi\\\"\""));
        assert!(!is_quoted("\"unterminated"));
        assert!(!is_quoted("plain"));
        assert_eq!(quote("a \"b\" \\c"), "\"a \\\"b\\\" \\\\c\"");
        assert_eq!(unquote("\"a \\\"b\\\"\""), "a \"b\"");
        assert_eq!(unquote("token"), "token");
    }

    #[test]
    fn host_predicate() {
        assert!(is_host("example.com"));
        assert!(is_host("atlanta-1.example.com"));
        assert!(is_host("192.0.2.128"));
        assert!(is_host("[2001:db8::1]"));
        assert!(is_host("2001:db8::1"));
        assert!(!is_host(""));
        assert!(!is_host("-bad.example.com"));
        assert!(!is_host("no spaces.com"));
        assert!(!is_host("+222"));
    }

    #[test]
    fn unfolds_header_continuations() {
        assert_eq!(unfold_lws("a\r\n b"), "a b");
        assert_eq!(unfold_lws("a\n\tb"), "a b");
        assert_eq!(unfold_lws("many   spaces"), "many spaces");
        assert_eq!(unfold_lws("a\r\nb"), "a\r\nb");
    }

    #[test]
    fn escape_upper_hex_no_double_escape() {
        assert_eq!(escape_user("alice"), "alice");
        assert_eq!(escape_user("a b"), "a%20b");
        // ';' stays in the user component, but not in headers
        assert_eq!(escape_user("123;ctx"), "123;ctx");
        assert_eq!(escape_header("a;b"), "a%3Bb");
        // an existing valid triplet passes through untouched
        assert_eq!(escape_user("a%20b"), "a%20b");
        assert_eq!(escape_user("100%"), "100%25");
    }

    #[test]
    fn unescape_rejects_bad_sequences() {
        assert_eq!(unescape("a%20b").unwrap(), "a b");
        assert_eq!(unescape("%41%42").unwrap(), "AB");
        assert!(unescape("%2").is_err());
        assert!(unescape("%GG").is_err());
    }

    #[test]
    fn phone_number_helpers() {
        assert!(is_phone_number("+1(22)333-44-55"));
        assert!(is_phone_number("123456"));
        assert!(!is_phone_number("example.com"));
        assert!(!is_phone_number("+"));
        assert_eq!(strip_visual_separators("+1 (22) 333-44.55"), "+1223334455");
        assert_eq!(strip_spaces("+1 (22) 333"), "+1(22)333");
    }

    #[test]
    fn split_respects_quotes_and_brackets() {
        assert_eq!(split_unquoted("a,b,c", ','), vec!["a", "b", "c"]);
        assert_eq!(
            split_unquoted("\"Smith, John\" <sip:j@x>,b", ','),
            vec!["\"Smith, John\" <sip:j@x>", "b"]
        );
        assert_eq!(
            split_unquoted("<sip:a@x;lr>;tag=1", ';'),
            vec!["<sip:a@x;lr>", "tag=1"]
        );
    }
}
