//! Free-text and single-word headers: Call-ID, Subject, Organization,
//! Server, User-Agent, Priority and MIME-Version.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::syntax;

/// Value of the Call-ID header. Compared case-sensitively: `word@word`
/// identifiers are opaque and must not be case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub String);

impl CallId {
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.contains(char::is_whitespace)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CallId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(CallId(s.to_string()))
    }
}

macro_rules! text_header {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn is_valid(&self) -> bool {
                true
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                // Free text: empty is a legal value (an empty Subject is
                // explicitly allowed by the grammar).
                Ok($name(s.trim().to_string()))
            }
        }
    };
}

text_header!(
    /// Value of the Subject header, free text, compared verbatim.
    Subject
);
text_header!(
    /// Value of the Organization header.
    Organization
);
text_header!(
    /// Value of the Server header.
    Server
);
text_header!(
    /// Value of the User-Agent header.
    UserAgent
);

/// Value of the Priority header: a single token such as `emergency` or
/// `non-urgent`. Unknown tokens are legal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Priority(pub String);

impl Priority {
    pub fn is_valid(&self) -> bool {
        syntax::is_token(&self.0)
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Priority(s.to_string()))
    }
}

/// Value of the MIME-Version header, `major.minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeVersion {
    pub major: u32,
    pub minor: u32,
}

impl MimeVersion {
    pub fn is_valid(&self) -> bool {
        true
    }
}

impl fmt::Display for MimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for MimeVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| Error::malformed("mime-version", s))?;
        let parse = |piece: &str| {
            piece
                .parse::<u32>()
                .map_err(|_| Error::malformed("mime-version", s))
        };
        Ok(MimeVersion { major: parse(major)?, minor: parse(minor)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_id_is_case_sensitive() {
        let a = CallId::from_str("f81d4fae-7dec-11d0-a765-00a0c91e6bf6@foo.bar.com").unwrap();
        let b = CallId::from_str("F81D4FAE-7dec-11d0-a765-00a0c91e6bf6@foo.bar.com").unwrap();
        assert_ne!(a, b);
        assert!(a.is_valid());
        assert!(!CallId("has space".into()).is_valid());
    }

    #[test]
    fn subject_may_be_empty() {
        let s = Subject::from_str("").unwrap();
        assert_eq!(s.0, "");
        assert!(s.is_valid());
        assert_eq!(Subject::from_str("Need more boxes").unwrap().to_string(), "Need more boxes");
    }

    #[test]
    fn priority_token_case_insensitive() {
        let a = Priority::from_str("Emergency").unwrap();
        let b = Priority::from_str("emergency").unwrap();
        assert_eq!(a, b);
        assert!(a.is_valid());
        assert!(!Priority("two words".into()).is_valid());
    }

    #[test]
    fn mime_version_round_trip() {
        let v = MimeVersion::from_str("1.0").unwrap();
        assert_eq!(v, MimeVersion { major: 1, minor: 0 });
        assert_eq!(v.to_string(), "1.0");
        assert!(MimeVersion::from_str("1").is_err());
        assert!(MimeVersion::from_str("1.x").is_err());
    }
}
