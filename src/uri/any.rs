//! Generic/opaque URIs for schemes other than `sip`, `sips` and `tel`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A URI of an unrecognized scheme, kept component-wise the way a generic
/// URL value is: `scheme:opaque` or
/// `scheme://[user@]host[/path][?query][#fragment]`.
///
/// Equality lower-cases the full rendering and compares the strings; this
/// is deliberately looser than a component-wise comparison and is part of
/// the documented contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnyUri {
    /// Scheme, lowercase.
    pub scheme: String,
    /// Everything after `scheme:` when the URI has no authority part.
    pub opaque: String,
    /// User info before `@`, when an authority is present.
    pub user: Option<String>,
    /// Authority host (may include a port spelled into the text).
    pub host: String,
    /// Path, including its leading `/`.
    pub path: String,
    /// Raw query without the `?`.
    pub raw_query: String,
    /// Fragment without the `#`.
    pub fragment: String,
}

impl AnyUri {
    /// At least one of opaque, host or path must be non-blank.
    pub fn is_valid(&self) -> bool {
        !self.opaque.trim().is_empty()
            || !self.host.trim().is_empty()
            || !self.path.trim().is_empty()
    }
}

impl PartialEq for AnyUri {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().to_lowercase() == other.to_string().to_lowercase()
    }
}

impl fmt::Display for AnyUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if self.opaque.is_empty() {
            f.write_str("//")?;
            if let Some(user) = &self.user {
                write!(f, "{}@", user)?;
            }
            f.write_str(&self.host)?;
            f.write_str(&self.path)?;
        } else {
            f.write_str(&self.opaque)?;
        }
        if !self.raw_query.is_empty() {
            write!(f, "?{}", self.raw_query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

impl FromStr for AnyUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        let (scheme, rest) = s
            .split_once(':')
            .ok_or_else(|| Error::malformed("uri", s))?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
            return Err(Error::malformed("scheme", s));
        }

        let (rest, fragment) = match rest.split_once('#') {
            Some((r, frag)) => (r, frag.to_string()),
            None => (rest, String::new()),
        };
        let (rest, raw_query) = match rest.split_once('?') {
            Some((r, q)) => (r, q.to_string()),
            None => (rest, String::new()),
        };

        let mut uri = AnyUri {
            scheme: scheme.to_ascii_lowercase(),
            raw_query,
            fragment,
            ..AnyUri::default()
        };

        match rest.strip_prefix("//") {
            Some(authority_and_path) => {
                let (authority, path) = match authority_and_path.find('/') {
                    Some(idx) => (&authority_and_path[..idx], &authority_and_path[idx..]),
                    None => (authority_and_path, ""),
                };
                match authority.split_once('@') {
                    Some((user, host)) => {
                        uri.user = Some(user.to_string());
                        uri.host = host.to_string();
                    }
                    None => uri.host = authority.to_string(),
                }
                uri.path = path.to_string();
            }
            None => uri.opaque = rest.to_string(),
        }
        Ok(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_authority_form() {
        let uri = AnyUri::from_str("http://user@example.com/a/b?x=1#frag").unwrap();
        assert_eq!(uri.scheme, "http");
        assert_eq!(uri.user.as_deref(), Some("user"));
        assert_eq!(uri.host, "example.com");
        assert_eq!(uri.path, "/a/b");
        assert_eq!(uri.raw_query, "x=1");
        assert_eq!(uri.fragment, "frag");
        assert_eq!(uri.to_string(), "http://user@example.com/a/b?x=1#frag");
    }

    #[test]
    fn parses_opaque_form() {
        let uri = AnyUri::from_str("mailto:bob@example.com").unwrap();
        assert_eq!(uri.scheme, "mailto");
        assert_eq!(uri.opaque, "bob@example.com");
        assert!(uri.host.is_empty());
        assert_eq!(uri.to_string(), "mailto:bob@example.com");
    }

    #[test]
    fn equality_is_case_folded_render() {
        let a = AnyUri::from_str("HTTP://Example.COM/Path").unwrap();
        let b = AnyUri::from_str("http://example.com/path").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn blank_uris_are_invalid() {
        let uri = AnyUri::from_str("x: ").unwrap();
        assert!(!uri.is_valid());
        assert!(AnyUri::from_str("http://example.com").unwrap().is_valid());
        assert!(AnyUri::from_str("bad scheme:x").is_err());
    }
}
