//! # URI model
//!
//! A closed set of URI variants: [`SipUri`] for `sip:`/`sips:`
//! (RFC 3261 §19.1), [`TelUri`] for `tel:` (RFC 3966), and [`AnyUri`] as
//! the generic fallback for every other scheme. [`Uri`] is the tagged
//! union the header model carries, so exhaustive matching replaces
//! runtime type switching.
//!
//! Every variant supports canonical rendering (`Display`), parsing
//! (`FromStr`), RFC semantic equality (`PartialEq`), deep cloning and
//! structural validation (`is_valid`).
//!
//! ```rust
//! use sipmsg::Uri;
//! use std::str::FromStr;
//!
//! let uri = Uri::from_str("sips:alice@example.com:5061;transport=tls").unwrap();
//! assert_eq!(uri.scheme(), "sips");
//! assert!(uri.is_valid());
//! ```

mod any;
mod sip;
mod tel;

pub use any::AnyUri;
pub use sip::{SipUri, UserInfo};
pub use tel::TelUri;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Any URI the value model can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Uri {
    /// `sip:` or `sips:` URI.
    Sip(SipUri),
    /// `tel:` URI.
    Tel(TelUri),
    /// Opaque URI of any other scheme.
    Any(AnyUri),
}

impl Uri {
    /// The URI scheme in lowercase.
    pub fn scheme(&self) -> &str {
        match self {
            Uri::Sip(uri) => uri.scheme(),
            Uri::Tel(_) => "tel",
            Uri::Any(uri) => uri.scheme.as_str(),
        }
    }

    /// Structural validity of the underlying variant.
    pub fn is_valid(&self) -> bool {
        match self {
            Uri::Sip(uri) => uri.is_valid(),
            Uri::Tel(uri) => uri.is_valid(),
            Uri::Any(uri) => uri.is_valid(),
        }
    }

    /// The SIP form, when this is a `sip:`/`sips:` URI.
    pub fn as_sip(&self) -> Option<&SipUri> {
        match self {
            Uri::Sip(uri) => Some(uri),
            _ => None,
        }
    }

    /// The tel form, when this is a `tel:` URI.
    pub fn as_tel(&self) -> Option<&TelUri> {
        match self {
            Uri::Tel(uri) => Some(uri),
            _ => None,
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uri::Sip(uri) => uri.fmt(f),
            Uri::Tel(uri) => uri.fmt(f),
            Uri::Any(uri) => uri.fmt(f),
        }
    }
}

impl FromStr for Uri {
    type Err = Error;

    /// Dispatches on the scheme: `sip:`/`sips:` and `tel:` get their
    /// typed parse, everything else falls back to [`AnyUri`].
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        let scheme = s.split(':').next().unwrap_or("").to_ascii_lowercase();
        match scheme.as_str() {
            "sip" | "sips" => SipUri::from_str(s).map(Uri::Sip),
            "tel" => TelUri::from_str(s).map(Uri::Tel),
            _ => AnyUri::from_str(s).map(Uri::Any),
        }
    }
}

impl From<SipUri> for Uri {
    fn from(uri: SipUri) -> Self {
        Uri::Sip(uri)
    }
}

impl From<TelUri> for Uri {
    fn from(uri: TelUri) -> Self {
        Uri::Tel(uri)
    }
}

impl From<AnyUri> for Uri {
    fn from(uri: AnyUri) -> Self {
        Uri::Any(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_scheme() {
        assert!(matches!(Uri::from_str("sip:a@b.com").unwrap(), Uri::Sip(_)));
        assert!(matches!(Uri::from_str("SIPS:a@b.com").unwrap(), Uri::Sip(_)));
        assert!(matches!(Uri::from_str("tel:+1234").unwrap(), Uri::Tel(_)));
        assert!(matches!(Uri::from_str("http://x.com/p").unwrap(), Uri::Any(_)));
        assert!(Uri::from_str("").is_err());
    }

    #[test]
    fn cross_variant_uris_never_compare_equal() {
        let sip = Uri::from_str("sip:123@example.com").unwrap();
        let tel = Uri::from_str("tel:123").unwrap();
        assert_ne!(sip, tel);
    }
}
