//! Token-list headers: Allow, Require, Supported, Unsupported,
//! Proxy-Require, Content-Encoding, Content-Language and In-Reply-To.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::syntax;

/// A comma-separated list of tokens. Order is preserved and significant
/// for equality; token comparison is case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenList(pub Vec<String>);

impl TokenList {
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|t| syntax::is_token(t))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t.eq_ignore_ascii_case(token))
    }
}

impl PartialEq for TokenList {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(other.0.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}

impl FromStr for TokenList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // An empty list is a meaningful value for several of these
        // headers (an empty Allow advertises no methods at all).
        if s.trim().is_empty() {
            return Ok(TokenList(Vec::new()));
        }
        let tokens: Vec<String> = s.split(',').map(|t| t.trim().to_string()).collect();
        if tokens.iter().any(String::is_empty) {
            return Err(Error::malformed("token-list", s));
        }
        Ok(TokenList(tokens))
    }
}

macro_rules! token_list_header {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name(pub TokenList);

        impl $name {
            pub fn is_valid(&self) -> bool {
                self.0.is_valid()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                TokenList::from_str(s).map($name)
            }
        }
    };
}

token_list_header!(
    /// Value of the Allow header: the methods the sender supports.
    Allow
);
token_list_header!(
    /// Value of the Require header.
    Require
);
token_list_header!(
    /// Value of the Supported header.
    Supported
);
token_list_header!(
    /// Value of the Unsupported header.
    Unsupported
);
token_list_header!(
    /// Value of the Proxy-Require header.
    ProxyRequire
);
token_list_header!(
    /// Value of the Content-Encoding header.
    ContentEncoding
);
token_list_header!(
    /// Value of the Content-Language header.
    ContentLanguage
);

/// Value of the In-Reply-To header: a list of Call-IDs. Unlike the token
/// lists above, Call-IDs are case-sensitive words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InReplyTo(pub Vec<String>);

impl InReplyTo {
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|id| !id.is_empty() && !id.contains(char::is_whitespace))
    }
}

impl fmt::Display for InReplyTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(id)?;
        }
        Ok(())
    }
}

impl FromStr for InReplyTo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        let ids: Vec<String> = s.split(',').map(|t| t.trim().to_string()).collect();
        if ids.iter().any(String::is_empty) {
            return Err(Error::malformed("in-reply-to", s));
        }
        Ok(InReplyTo(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_round_trip() {
        let allow = Allow::from_str("INVITE, ACK, OPTIONS, CANCEL, BYE").unwrap();
        assert_eq!(allow.0 .0.len(), 5);
        assert_eq!(allow.to_string(), "INVITE, ACK, OPTIONS, CANCEL, BYE");
        assert!(allow.0.contains("invite"));
        assert!(allow.is_valid());
    }

    #[test]
    fn comparison_is_ordered_but_case_insensitive() {
        let a = TokenList::from_str("timer, 100rel").unwrap();
        let b = TokenList::from_str("TIMER, 100REL").unwrap();
        let c = TokenList::from_str("100rel, timer").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_list_is_allowed() {
        let allow = Allow::from_str("").unwrap();
        assert!(allow.0 .0.is_empty());
        assert_eq!(allow.to_string(), "");
    }

    #[test]
    fn rejects_dangling_commas() {
        assert!(TokenList::from_str("timer,").is_err());
        assert!(TokenList::from_str(",timer").is_err());
    }

    #[test]
    fn in_reply_to_is_case_sensitive() {
        let a = InReplyTo::from_str("70710@saturn.bell-tel.com, 17320@venus.bell-tel.com").unwrap();
        let b = InReplyTo::from_str("70710@SATURN.bell-tel.com, 17320@venus.bell-tel.com").unwrap();
        assert_ne!(a, b);
        assert!(a.is_valid());
        assert_eq!(
            a.to_string(),
            "70710@saturn.bell-tel.com, 17320@venus.bell-tel.com"
        );
    }
}
