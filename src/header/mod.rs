//! # Typed SIP headers
//!
//! One Rust type per RFC 3261 header, a [`Header`] sum over all of them,
//! and the wire-name machinery: compact forms, canonical casing and the
//! extension-parser table for headers this crate does not know.
//!
//! ```rust
//! use sipmsg::header::Header;
//!
//! let header = Header::parse("m: <sip:alice@pc33.atlanta.com>;q=0.7").unwrap();
//! assert_eq!(header.to_string(), "Contact: <sip:alice@pc33.atlanta.com>;q=0.7");
//! ```

pub mod accept;
pub mod auth;
pub mod cseq;
pub mod date;
pub mod disposition;
pub mod media_type;
pub mod name_addr;
pub mod numeric;
pub mod resource;
pub mod text;
pub mod token_list;
pub mod via;

pub use accept::{Accept, AcceptEncoding, AcceptLanguage, MediaRange, TokenRange};
pub use auth::{
    Authorization, BearerChallenge, BearerCredentials, Challenge, Credentials, DigestChallenge,
    DigestCredentials, GenericAuth, ProxyAuthenticate, ProxyAuthorization, WwwAuthenticate,
};
pub use cseq::CSeq;
pub use date::SipDate;
pub use disposition::ContentDisposition;
pub use media_type::{ContentType, MediaType};
pub use name_addr::{Contact, FromTo, NameAddr, RecordRoute, ReplyTo, Route};
pub use numeric::{
    ContentLength, Expires, MaxForwards, MinExpires, RetryAfter, Timestamp,
};
pub use resource::{InfoList, ResourceAddr};
pub use text::{CallId, MimeVersion, Organization, Priority, Server, Subject, UserAgent};
pub use token_list::{
    Allow, ContentEncoding, ContentLanguage, InReplyTo, ProxyRequire, Require, Supported,
    TokenList, Unsupported,
};
pub use via::{ProtoInfo, Via, ViaHop};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::params::Params;
use crate::syntax;

/// Parses a `;`-separated parameter run that has already had its leading
/// `;` stripped. Quote-aware; an empty run yields an empty map.
pub(crate) fn parse_params_str(s: &str, rule: &'static str, whole: &str) -> Result<Params> {
    let mut params = Params::new();
    if s.trim().is_empty() {
        return Ok(params);
    }
    for piece in syntax::split_unquoted(s, ';') {
        name_addr::append_param(&mut params, piece, rule, whole)?;
    }
    Ok(params)
}

/// A header name, wire-spelling aware.
///
/// `from_wire` accepts any casing plus the single-letter compact forms;
/// `as_str` gives the canonical spelling (`Call-ID`, `CSeq`,
/// `MIME-Version`, `WWW-Authenticate` keep their irregular casing, an
/// unknown name is MIME-cased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderName {
    Accept,
    AcceptEncoding,
    AcceptLanguage,
    AlertInfo,
    Allow,
    Authorization,
    CallId,
    CallInfo,
    Contact,
    ContentDisposition,
    ContentEncoding,
    ContentLanguage,
    ContentLength,
    ContentType,
    CSeq,
    Date,
    ErrorInfo,
    Expires,
    From,
    InReplyTo,
    MaxForwards,
    MimeVersion,
    MinExpires,
    Organization,
    Priority,
    ProxyAuthenticate,
    ProxyAuthorization,
    ProxyRequire,
    RecordRoute,
    ReplyTo,
    Require,
    RetryAfter,
    Route,
    Server,
    Subject,
    Supported,
    Timestamp,
    To,
    Unsupported,
    UserAgent,
    Via,
    WwwAuthenticate,
    /// Any other header, canonicalized to MIME casing.
    Other(String),
}

impl HeaderName {
    /// Resolves a wire spelling: canonical, any-cased or compact.
    pub fn from_wire(name: &str) -> Self {
        use HeaderName::*;
        match name.to_ascii_lowercase().as_str() {
            "accept" => Accept,
            "accept-encoding" => AcceptEncoding,
            "accept-language" => AcceptLanguage,
            "alert-info" => AlertInfo,
            "allow" => Allow,
            "authorization" => Authorization,
            "call-id" | "i" => CallId,
            "call-info" => CallInfo,
            "contact" | "m" => Contact,
            "content-disposition" => ContentDisposition,
            "content-encoding" | "e" => ContentEncoding,
            "content-language" => ContentLanguage,
            "content-length" | "l" => ContentLength,
            "content-type" | "c" => ContentType,
            "cseq" => CSeq,
            "date" => Date,
            "error-info" => ErrorInfo,
            "expires" => Expires,
            "from" | "f" => From,
            "in-reply-to" => InReplyTo,
            "max-forwards" => MaxForwards,
            "mime-version" => MimeVersion,
            "min-expires" => MinExpires,
            "organization" => Organization,
            "priority" => Priority,
            "proxy-authenticate" => ProxyAuthenticate,
            "proxy-authorization" => ProxyAuthorization,
            "proxy-require" => ProxyRequire,
            "record-route" => RecordRoute,
            "reply-to" => ReplyTo,
            "require" => Require,
            "retry-after" => RetryAfter,
            "route" => Route,
            "server" => Server,
            "subject" | "s" => Subject,
            "supported" | "k" => Supported,
            "timestamp" => Timestamp,
            "to" | "t" => To,
            "unsupported" => Unsupported,
            "user-agent" => UserAgent,
            "via" | "v" => Via,
            "www-authenticate" => WwwAuthenticate,
            _ => Other(mime_case(name)),
        }
    }

    /// Canonical wire spelling.
    pub fn as_str(&self) -> &str {
        use HeaderName::*;
        match self {
            Accept => "Accept",
            AcceptEncoding => "Accept-Encoding",
            AcceptLanguage => "Accept-Language",
            AlertInfo => "Alert-Info",
            Allow => "Allow",
            Authorization => "Authorization",
            CallId => "Call-ID",
            CallInfo => "Call-Info",
            Contact => "Contact",
            ContentDisposition => "Content-Disposition",
            ContentEncoding => "Content-Encoding",
            ContentLanguage => "Content-Language",
            ContentLength => "Content-Length",
            ContentType => "Content-Type",
            CSeq => "CSeq",
            Date => "Date",
            ErrorInfo => "Error-Info",
            Expires => "Expires",
            From => "From",
            InReplyTo => "In-Reply-To",
            MaxForwards => "Max-Forwards",
            MimeVersion => "MIME-Version",
            MinExpires => "Min-Expires",
            Organization => "Organization",
            Priority => "Priority",
            ProxyAuthenticate => "Proxy-Authenticate",
            ProxyAuthorization => "Proxy-Authorization",
            ProxyRequire => "Proxy-Require",
            RecordRoute => "Record-Route",
            ReplyTo => "Reply-To",
            Require => "Require",
            RetryAfter => "Retry-After",
            Route => "Route",
            Server => "Server",
            Subject => "Subject",
            Supported => "Supported",
            Timestamp => "Timestamp",
            To => "To",
            Unsupported => "Unsupported",
            UserAgent => "User-Agent",
            Via => "Via",
            WwwAuthenticate => "WWW-Authenticate",
            Other(name) => name,
        }
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MIME header casing: first letter and every letter after a `-` upper,
/// the rest lower.
fn mime_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if c == '-' {
            upper = true;
            out.push(c);
        } else if upper {
            upper = false;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// A header this crate has no model for: canonical name plus the raw
/// value text. Name comparison is case-insensitive, the value verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericHeader {
    pub name: String,
    pub value: String,
}

impl GenericHeader {
    pub fn is_valid(&self) -> bool {
        syntax::is_token(&self.name)
    }
}

impl PartialEq for GenericHeader {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name) && self.value == other.value
    }
}

impl fmt::Display for GenericHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Caller-supplied parsers for extension headers, keyed by lower-cased
/// header name. Consulted only for names the crate does not recognize;
/// a parser returning `None` falls through to [`GenericHeader`].
#[derive(Default)]
pub struct ExtensionParsers {
    parsers: HashMap<String, Box<dyn Fn(&str, &str) -> Option<Header> + Send + Sync>>,
}

impl ExtensionParsers {
    pub fn new() -> Self {
        ExtensionParsers::default()
    }

    /// Registers a parser for `name`. The parser receives the canonical
    /// name and the raw value.
    pub fn register<F>(&mut self, name: &str, parser: F)
    where
        F: Fn(&str, &str) -> Option<Header> + Send + Sync + 'static,
    {
        self.parsers.insert(name.to_ascii_lowercase(), Box::new(parser));
    }

    fn get(&self, name: &str) -> Option<&(dyn Fn(&str, &str) -> Option<Header> + Send + Sync)> {
        self.parsers.get(&name.to_ascii_lowercase()).map(Box::as_ref)
    }
}

/// A parsed, typed header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Header {
    Accept(Accept),
    AcceptEncoding(AcceptEncoding),
    AcceptLanguage(AcceptLanguage),
    AlertInfo(InfoList),
    Allow(Allow),
    Authorization(Authorization),
    CallId(CallId),
    CallInfo(InfoList),
    Contact(Contact),
    ContentDisposition(ContentDisposition),
    ContentEncoding(ContentEncoding),
    ContentLanguage(ContentLanguage),
    ContentLength(ContentLength),
    ContentType(ContentType),
    CSeq(CSeq),
    Date(SipDate),
    ErrorInfo(InfoList),
    Expires(Expires),
    From(FromTo),
    InReplyTo(InReplyTo),
    MaxForwards(MaxForwards),
    MimeVersion(MimeVersion),
    MinExpires(MinExpires),
    Organization(Organization),
    Priority(Priority),
    ProxyAuthenticate(ProxyAuthenticate),
    ProxyAuthorization(ProxyAuthorization),
    ProxyRequire(ProxyRequire),
    RecordRoute(RecordRoute),
    ReplyTo(ReplyTo),
    Require(Require),
    RetryAfter(RetryAfter),
    Route(Route),
    Server(Server),
    Subject(Subject),
    Supported(Supported),
    Timestamp(Timestamp),
    To(FromTo),
    Unsupported(Unsupported),
    UserAgent(UserAgent),
    Via(Via),
    WwwAuthenticate(WwwAuthenticate),
    Generic(GenericHeader),
}

impl Header {
    /// Parses one header line, compact forms and line folding included.
    pub fn parse(input: &str) -> Result<Header> {
        Header::parse_with(input, &ExtensionParsers::new())
    }

    /// Like [`Header::parse`], consulting `extensions` for unknown names.
    pub fn parse_with(input: &str, extensions: &ExtensionParsers) -> Result<Header> {
        let unfolded = syntax::unfold_lws(input);
        let line = unfolded.trim();
        if line.is_empty() {
            return Err(Error::EmptyInput);
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::malformed("header", input))?;
        let name = name.trim();
        if !syntax::is_token(name) {
            return Err(Error::malformed("header-name", input));
        }
        let value = value.trim();

        use HeaderName as N;
        Ok(match N::from_wire(name) {
            N::Accept => Header::Accept(value.parse()?),
            N::AcceptEncoding => Header::AcceptEncoding(value.parse()?),
            N::AcceptLanguage => Header::AcceptLanguage(value.parse()?),
            N::AlertInfo => Header::AlertInfo(value.parse()?),
            N::Allow => Header::Allow(value.parse()?),
            N::Authorization => Header::Authorization(value.parse()?),
            N::CallId => Header::CallId(value.parse()?),
            N::CallInfo => Header::CallInfo(value.parse()?),
            N::Contact => Header::Contact(value.parse()?),
            N::ContentDisposition => Header::ContentDisposition(value.parse()?),
            N::ContentEncoding => Header::ContentEncoding(value.parse()?),
            N::ContentLanguage => Header::ContentLanguage(value.parse()?),
            N::ContentLength => Header::ContentLength(value.parse()?),
            N::ContentType => Header::ContentType(value.parse()?),
            N::CSeq => Header::CSeq(value.parse()?),
            N::Date => Header::Date(value.parse()?),
            N::ErrorInfo => Header::ErrorInfo(value.parse()?),
            N::Expires => Header::Expires(value.parse()?),
            N::From => Header::From(value.parse()?),
            N::InReplyTo => Header::InReplyTo(value.parse()?),
            N::MaxForwards => Header::MaxForwards(value.parse()?),
            N::MimeVersion => Header::MimeVersion(value.parse()?),
            N::MinExpires => Header::MinExpires(value.parse()?),
            N::Organization => Header::Organization(value.parse()?),
            N::Priority => Header::Priority(value.parse()?),
            N::ProxyAuthenticate => Header::ProxyAuthenticate(value.parse()?),
            N::ProxyAuthorization => Header::ProxyAuthorization(value.parse()?),
            N::ProxyRequire => Header::ProxyRequire(value.parse()?),
            N::RecordRoute => Header::RecordRoute(value.parse()?),
            N::ReplyTo => Header::ReplyTo(value.parse()?),
            N::Require => Header::Require(value.parse()?),
            N::RetryAfter => Header::RetryAfter(value.parse()?),
            N::Route => Header::Route(value.parse()?),
            N::Server => Header::Server(value.parse()?),
            N::Subject => Header::Subject(value.parse()?),
            N::Supported => Header::Supported(value.parse()?),
            N::Timestamp => Header::Timestamp(value.parse()?),
            N::To => Header::To(value.parse()?),
            N::Unsupported => Header::Unsupported(value.parse()?),
            N::UserAgent => Header::UserAgent(value.parse()?),
            N::Via => Header::Via(value.parse()?),
            N::WwwAuthenticate => Header::WwwAuthenticate(value.parse()?),
            N::Other(canonical) => {
                if let Some(parser) = extensions.get(&canonical) {
                    if let Some(header) = parser(&canonical, value) {
                        return Ok(header);
                    }
                }
                tracing::trace!(name = %canonical, "no typed parser, keeping generic header");
                Header::Generic(GenericHeader { name: canonical, value: value.to_string() })
            }
        })
    }

    /// The header's name in canonical spelling.
    pub fn name(&self) -> HeaderName {
        use Header::*;
        match self {
            Accept(_) => HeaderName::Accept,
            AcceptEncoding(_) => HeaderName::AcceptEncoding,
            AcceptLanguage(_) => HeaderName::AcceptLanguage,
            AlertInfo(_) => HeaderName::AlertInfo,
            Allow(_) => HeaderName::Allow,
            Authorization(_) => HeaderName::Authorization,
            CallId(_) => HeaderName::CallId,
            CallInfo(_) => HeaderName::CallInfo,
            Contact(_) => HeaderName::Contact,
            ContentDisposition(_) => HeaderName::ContentDisposition,
            ContentEncoding(_) => HeaderName::ContentEncoding,
            ContentLanguage(_) => HeaderName::ContentLanguage,
            ContentLength(_) => HeaderName::ContentLength,
            ContentType(_) => HeaderName::ContentType,
            CSeq(_) => HeaderName::CSeq,
            Date(_) => HeaderName::Date,
            ErrorInfo(_) => HeaderName::ErrorInfo,
            Expires(_) => HeaderName::Expires,
            From(_) => HeaderName::From,
            InReplyTo(_) => HeaderName::InReplyTo,
            MaxForwards(_) => HeaderName::MaxForwards,
            MimeVersion(_) => HeaderName::MimeVersion,
            MinExpires(_) => HeaderName::MinExpires,
            Organization(_) => HeaderName::Organization,
            Priority(_) => HeaderName::Priority,
            ProxyAuthenticate(_) => HeaderName::ProxyAuthenticate,
            ProxyAuthorization(_) => HeaderName::ProxyAuthorization,
            ProxyRequire(_) => HeaderName::ProxyRequire,
            RecordRoute(_) => HeaderName::RecordRoute,
            ReplyTo(_) => HeaderName::ReplyTo,
            Require(_) => HeaderName::Require,
            RetryAfter(_) => HeaderName::RetryAfter,
            Route(_) => HeaderName::Route,
            Server(_) => HeaderName::Server,
            Subject(_) => HeaderName::Subject,
            Supported(_) => HeaderName::Supported,
            Timestamp(_) => HeaderName::Timestamp,
            To(_) => HeaderName::To,
            Unsupported(_) => HeaderName::Unsupported,
            UserAgent(_) => HeaderName::UserAgent,
            Via(_) => HeaderName::Via,
            WwwAuthenticate(_) => HeaderName::WwwAuthenticate,
            Generic(g) => HeaderName::Other(g.name.clone()),
        }
    }

    /// Structural validity of the typed value.
    pub fn is_valid(&self) -> bool {
        use Header::*;
        match self {
            Accept(v) => v.is_valid(),
            AcceptEncoding(v) => v.is_valid(),
            AcceptLanguage(v) => v.is_valid(),
            AlertInfo(v) => v.is_valid(),
            Allow(v) => v.is_valid(),
            Authorization(v) => v.is_valid(),
            CallId(v) => v.is_valid(),
            CallInfo(v) => v.is_valid(),
            Contact(v) => v.is_valid(),
            ContentDisposition(v) => v.is_valid(),
            ContentEncoding(v) => v.is_valid(),
            ContentLanguage(v) => v.is_valid(),
            ContentLength(v) => v.is_valid(),
            ContentType(v) => v.is_valid(),
            CSeq(v) => v.is_valid(),
            Date(v) => v.is_valid(),
            ErrorInfo(v) => v.is_valid(),
            Expires(v) => v.is_valid(),
            From(v) => v.is_valid(),
            InReplyTo(v) => v.is_valid(),
            MaxForwards(v) => v.is_valid(),
            MimeVersion(v) => v.is_valid(),
            MinExpires(v) => v.is_valid(),
            Organization(v) => v.is_valid(),
            Priority(v) => v.is_valid(),
            ProxyAuthenticate(v) => v.is_valid(),
            ProxyAuthorization(v) => v.is_valid(),
            ProxyRequire(v) => v.is_valid(),
            RecordRoute(v) => v.is_valid(),
            ReplyTo(v) => v.is_valid(),
            Require(v) => v.is_valid(),
            RetryAfter(v) => v.is_valid(),
            Route(v) => v.is_valid(),
            Server(v) => v.is_valid(),
            Subject(v) => v.is_valid(),
            Supported(v) => v.is_valid(),
            Timestamp(v) => v.is_valid(),
            To(v) => v.is_valid(),
            Unsupported(v) => v.is_valid(),
            UserAgent(v) => v.is_valid(),
            Via(v) => v.is_valid(),
            WwwAuthenticate(v) => v.is_valid(),
            Generic(v) => v.is_valid(),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Header::*;
        // Generic carries its own name; everything else prefixes the
        // canonical one.
        if !matches!(self, Generic(_)) {
            write!(f, "{}: ", self.name())?;
        }
        match self {
            Accept(v) => v.fmt(f),
            AcceptEncoding(v) => v.fmt(f),
            AcceptLanguage(v) => v.fmt(f),
            AlertInfo(v) => v.fmt(f),
            Allow(v) => v.fmt(f),
            Authorization(v) => v.fmt(f),
            CallId(v) => v.fmt(f),
            CallInfo(v) => v.fmt(f),
            Contact(v) => v.fmt(f),
            ContentDisposition(v) => v.fmt(f),
            ContentEncoding(v) => v.fmt(f),
            ContentLanguage(v) => v.fmt(f),
            ContentLength(v) => v.fmt(f),
            ContentType(v) => v.fmt(f),
            CSeq(v) => v.fmt(f),
            Date(v) => v.fmt(f),
            ErrorInfo(v) => v.fmt(f),
            Expires(v) => v.fmt(f),
            From(v) => v.fmt(f),
            InReplyTo(v) => v.fmt(f),
            MaxForwards(v) => v.fmt(f),
            MimeVersion(v) => v.fmt(f),
            MinExpires(v) => v.fmt(f),
            Organization(v) => v.fmt(f),
            Priority(v) => v.fmt(f),
            ProxyAuthenticate(v) => v.fmt(f),
            ProxyAuthorization(v) => v.fmt(f),
            ProxyRequire(v) => v.fmt(f),
            RecordRoute(v) => v.fmt(f),
            ReplyTo(v) => v.fmt(f),
            Require(v) => v.fmt(f),
            RetryAfter(v) => v.fmt(f),
            Route(v) => v.fmt(f),
            Server(v) => v.fmt(f),
            Subject(v) => v.fmt(f),
            Supported(v) => v.fmt(f),
            Timestamp(v) => v.fmt(f),
            To(v) => v.fmt(f),
            Unsupported(v) => v.fmt(f),
            UserAgent(v) => v.fmt(f),
            Via(v) => v.fmt(f),
            WwwAuthenticate(v) => v.fmt(f),
            Generic(v) => v.fmt(f),
        }
    }
}

impl FromStr for Header {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Header::parse(s)
    }
}
