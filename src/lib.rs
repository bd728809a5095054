//! # sipmsg
//!
//! The SIP value model: typed `sip:`/`sips:`/`tel:` URIs and the RFC
//! 3261 header set, with the three operations everything else builds on:
//!
//! - **canonical rendering** via `Display`, stable enough to diff in
//!   interop test vectors (sorted parameters, fixed auth field order,
//!   canonical header-name casing);
//! - **semantic equality** via `PartialEq`, following the RFC rules
//!   rather than string comparison (case-insensitive tokens, the
//!   special-parameter law, IP-literal folding, visual-separator
//!   stripping for tel numbers);
//! - **validation** via `is_valid`, syntactic checks only.
//!
//! Parsing one header line, compact form included:
//!
//! ```rust
//! use sipmsg::header::Header;
//!
//! let header = Header::parse("f: Alice <sip:alice@atlanta.com>;tag=1928301774")?;
//! assert_eq!(
//!     header.to_string(),
//!     "From: Alice <sip:alice@atlanta.com>;tag=1928301774",
//! );
//! # Ok::<(), sipmsg::Error>(())
//! ```
//!
//! URIs parse through [`FromStr`](std::str::FromStr) and compare by RFC
//! 3261 §19.1.4 semantics:
//!
//! ```rust
//! use sipmsg::SipUri;
//!
//! let a: SipUri = "sip:alice@AtLanTa.com;Transport=udp".parse()?;
//! let b: SipUri = "sip:alice@atlanta.com;transport=UDP".parse()?;
//! assert_eq!(a, b);
//! # Ok::<(), sipmsg::Error>(())
//! ```

pub mod addr;
pub mod error;
pub mod header;
pub mod params;
pub mod syntax;
pub mod uri;

pub use addr::Addr;
pub use error::{Error, Result};
pub use header::{Header, HeaderName};
pub use params::Params;
pub use uri::{AnyUri, SipUri, TelUri, Uri, UserInfo};

/// One-stop imports for the common case.
pub mod prelude {
    pub use crate::addr::Addr;
    pub use crate::error::{Error, Result};
    pub use crate::header::{
        Accept, Allow, Authorization, CSeq, CallId, Contact, ContentLength, ContentType, Expires,
        FromTo, Header, HeaderName, MaxForwards, NameAddr, Route, Via, ViaHop, WwwAuthenticate,
    };
    pub use crate::params::Params;
    pub use crate::uri::{AnyUri, SipUri, TelUri, Uri, UserInfo};
}
