//! HTTP-style authentication headers: Authorization, WWW-Authenticate
//! and their Proxy-* twins.
//!
//! Credentials and challenges are closed sums over the `Digest`,
//! `Bearer` and generic schemes, selected by the (case-insensitive)
//! scheme token. Digest rendering is byte-exact: the known quoted fields
//! come in a fixed order, then `nc`, then `uri`, then any custom
//! parameters alphabetically. Interop suites diff this output verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::params::{compare_params, validate_params, Params};
use crate::syntax;

/// Catch-all for schemes this crate does not model: the scheme token and
/// the rest of the value, untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericAuth {
    pub scheme: String,
    pub data: String,
}

impl PartialEq for GenericAuth {
    fn eq(&self, other: &Self) -> bool {
        self.scheme.eq_ignore_ascii_case(&other.scheme) && self.data == other.data
    }
}

impl fmt::Display for GenericAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            f.write_str(&self.scheme)
        } else {
            write!(f, "{} {}", self.scheme, self.data)
        }
    }
}

// ---- Digest ------------------------------------------------------------

/// Digest credentials from an Authorization header.
///
/// The scalar fields are stored unquoted; absent fields are `None` and a
/// zero `nc` means no nonce count was sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestCredentials {
    pub username: Option<String>,
    pub realm: Option<String>,
    pub nonce: Option<String>,
    pub response: Option<String>,
    pub algorithm: Option<String>,
    pub cnonce: Option<String>,
    pub opaque: Option<String>,
    pub qop: Option<String>,
    pub nc: u32,
    pub uri: Option<String>,
    /// Extension parameters, values kept verbatim (quotes included).
    pub params: Params,
}

impl DigestCredentials {
    /// Requires the fields a verifier cannot do without, and a response
    /// of MD5 hex-digest length. The length check is syntactic only.
    pub fn is_valid(&self) -> bool {
        let filled = |f: &Option<String>| f.as_deref().map_or(false, |v| !v.is_empty());
        filled(&self.username)
            && filled(&self.realm)
            && filled(&self.nonce)
            && self
                .response
                .as_deref()
                .map_or(false, |r| r.len() == 32 && r.bytes().all(|b| b.is_ascii_hexdigit()))
            && validate_params(&self.params)
    }
}

impl PartialEq for DigestCredentials {
    fn eq(&self, other: &Self) -> bool {
        // The quoted fields are credential material: verbatim compare.
        self.username == other.username
            && self.realm == other.realm
            && self.nonce == other.nonce
            && self.response == other.response
            && ci_opt(&self.algorithm, &other.algorithm)
            && self.cnonce == other.cnonce
            && self.opaque == other.opaque
            && ci_opt(&self.qop, &other.qop)
            && self.nc == other.nc
            && self.uri == other.uri
            && compare_params(&self.params, &other.params, &[])
    }
}

fn ci_opt(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

impl fmt::Display for DigestCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Digest")?;
        let mut joiner = FieldJoiner::new();
        let quoted = [
            ("username", &self.username),
            ("realm", &self.realm),
            ("nonce", &self.nonce),
            ("response", &self.response),
            ("algorithm", &self.algorithm),
            ("cnonce", &self.cnonce),
            ("opaque", &self.opaque),
            ("qop", &self.qop),
        ];
        for (key, value) in quoted {
            if let Some(value) = value {
                joiner.field(f, key, &syntax::quote(value))?;
            }
        }
        if self.nc != 0 {
            joiner.field(f, "nc", &format!("{:08x}", self.nc))?;
        }
        if let Some(uri) = &self.uri {
            joiner.field(f, "uri", &syntax::quote(uri))?;
        }
        joiner.extension_params(f, &self.params)
    }
}

/// A Digest challenge from a WWW-Authenticate header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestChallenge {
    pub realm: Option<String>,
    pub domain: Option<String>,
    pub nonce: Option<String>,
    pub opaque: Option<String>,
    pub stale: Option<bool>,
    pub algorithm: Option<String>,
    pub qop: Option<String>,
    pub params: Params,
}

impl DigestChallenge {
    /// A challenge is useless without a realm and a nonce.
    pub fn is_valid(&self) -> bool {
        self.realm.as_deref().map_or(false, |r| !r.is_empty())
            && self.nonce.as_deref().map_or(false, |n| !n.is_empty())
            && validate_params(&self.params)
    }
}

impl PartialEq for DigestChallenge {
    fn eq(&self, other: &Self) -> bool {
        self.realm == other.realm
            && self.domain == other.domain
            && self.nonce == other.nonce
            && self.opaque == other.opaque
            && self.stale == other.stale
            && ci_opt(&self.algorithm, &other.algorithm)
            && ci_opt(&self.qop, &other.qop)
            && compare_params(&self.params, &other.params, &[])
    }
}

impl fmt::Display for DigestChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Digest")?;
        let mut joiner = FieldJoiner::new();
        let quoted = [
            ("realm", &self.realm),
            ("domain", &self.domain),
            ("nonce", &self.nonce),
            ("opaque", &self.opaque),
        ];
        for (key, value) in quoted {
            if let Some(value) = value {
                joiner.field(f, key, &syntax::quote(value))?;
            }
        }
        if let Some(stale) = self.stale {
            joiner.field(f, "stale", if stale { "true" } else { "false" })?;
        }
        if let Some(algorithm) = &self.algorithm {
            joiner.field(f, "algorithm", algorithm)?;
        }
        if let Some(qop) = &self.qop {
            joiner.field(f, "qop", &syntax::quote(qop))?;
        }
        joiner.extension_params(f, &self.params)
    }
}

// ---- Bearer ------------------------------------------------------------

/// RFC 6750 bearer credentials: an opaque token68.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BearerCredentials {
    pub token: String,
}

impl BearerCredentials {
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.token.contains(char::is_whitespace)
    }
}

impl fmt::Display for BearerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bearer {}", self.token)
    }
}

/// RFC 6750 bearer challenge: `Bearer realm="...", key=value...`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BearerChallenge {
    pub realm: Option<String>,
    pub params: Params,
}

impl BearerChallenge {
    pub fn is_valid(&self) -> bool {
        validate_params(&self.params)
    }
}

impl PartialEq for BearerChallenge {
    fn eq(&self, other: &Self) -> bool {
        self.realm == other.realm && compare_params(&self.params, &other.params, &[])
    }
}

impl fmt::Display for BearerChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Bearer")?;
        let mut joiner = FieldJoiner::new();
        if let Some(realm) = &self.realm {
            joiner.field(f, "realm", &syntax::quote(realm))?;
        }
        joiner.extension_params(f, &self.params)
    }
}

// ---- Scheme dispatch ---------------------------------------------------

/// Credentials carried by Authorization / Proxy-Authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Credentials {
    Digest(DigestCredentials),
    Bearer(BearerCredentials),
    Other(GenericAuth),
}

impl Credentials {
    pub fn is_valid(&self) -> bool {
        match self {
            Credentials::Digest(d) => d.is_valid(),
            Credentials::Bearer(b) => b.is_valid(),
            Credentials::Other(g) => syntax::is_token(&g.scheme),
        }
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Digest(d) => d.fmt(f),
            Credentials::Bearer(b) => b.fmt(f),
            Credentials::Other(g) => g.fmt(f),
        }
    }
}

impl FromStr for Credentials {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (scheme, rest) = split_scheme(s)?;
        if scheme.eq_ignore_ascii_case("digest") {
            let mut creds = DigestCredentials::default();
            for (key, value) in auth_fields(rest, s)? {
                match key.to_ascii_lowercase().as_str() {
                    "username" => creds.username = Some(syntax::unquote(&value)),
                    "realm" => creds.realm = Some(syntax::unquote(&value)),
                    "nonce" => creds.nonce = Some(syntax::unquote(&value)),
                    "response" => creds.response = Some(syntax::unquote(&value)),
                    "algorithm" => creds.algorithm = Some(syntax::unquote(&value)),
                    "cnonce" => creds.cnonce = Some(syntax::unquote(&value)),
                    "opaque" => creds.opaque = Some(syntax::unquote(&value)),
                    "qop" => creds.qop = Some(syntax::unquote(&value)),
                    "uri" => creds.uri = Some(syntax::unquote(&value)),
                    "nc" => {
                        creds.nc = u32::from_str_radix(&syntax::unquote(&value), 16)
                            .map_err(|_| Error::malformed("nonce-count", s))?;
                    }
                    other => creds.params.append(other, value),
                }
            }
            Ok(Credentials::Digest(creds))
        } else if scheme.eq_ignore_ascii_case("bearer") {
            let token = rest.trim().to_string();
            if token.is_empty() {
                return Err(Error::malformed("bearer-token", s));
            }
            Ok(Credentials::Bearer(BearerCredentials { token }))
        } else {
            Ok(Credentials::Other(GenericAuth {
                scheme: scheme.to_string(),
                data: rest.trim().to_string(),
            }))
        }
    }
}

/// Challenge carried by WWW-Authenticate / Proxy-Authenticate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Challenge {
    Digest(DigestChallenge),
    Bearer(BearerChallenge),
    Other(GenericAuth),
}

impl Challenge {
    pub fn is_valid(&self) -> bool {
        match self {
            Challenge::Digest(d) => d.is_valid(),
            Challenge::Bearer(b) => b.is_valid(),
            Challenge::Other(g) => syntax::is_token(&g.scheme),
        }
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Challenge::Digest(d) => d.fmt(f),
            Challenge::Bearer(b) => b.fmt(f),
            Challenge::Other(g) => g.fmt(f),
        }
    }
}

impl FromStr for Challenge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (scheme, rest) = split_scheme(s)?;
        if scheme.eq_ignore_ascii_case("digest") {
            let mut challenge = DigestChallenge::default();
            for (key, value) in auth_fields(rest, s)? {
                match key.to_ascii_lowercase().as_str() {
                    "realm" => challenge.realm = Some(syntax::unquote(&value)),
                    "domain" => challenge.domain = Some(syntax::unquote(&value)),
                    "nonce" => challenge.nonce = Some(syntax::unquote(&value)),
                    "opaque" => challenge.opaque = Some(syntax::unquote(&value)),
                    "algorithm" => challenge.algorithm = Some(syntax::unquote(&value)),
                    "qop" => challenge.qop = Some(syntax::unquote(&value)),
                    "stale" => {
                        let value = syntax::unquote(&value);
                        challenge.stale = if value.eq_ignore_ascii_case("true") {
                            Some(true)
                        } else if value.eq_ignore_ascii_case("false") {
                            Some(false)
                        } else {
                            return Err(Error::malformed("stale", s));
                        };
                    }
                    other => challenge.params.append(other, value),
                }
            }
            Ok(Challenge::Digest(challenge))
        } else if scheme.eq_ignore_ascii_case("bearer") {
            let mut challenge = BearerChallenge::default();
            for (key, value) in auth_fields(rest, s)? {
                if key.eq_ignore_ascii_case("realm") {
                    challenge.realm = Some(syntax::unquote(&value));
                } else {
                    challenge.params.append(key, value);
                }
            }
            Ok(Challenge::Bearer(challenge))
        } else {
            Ok(Challenge::Other(GenericAuth {
                scheme: scheme.to_string(),
                data: rest.trim().to_string(),
            }))
        }
    }
}

fn split_scheme(s: &str) -> Result<(&str, &str)> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::EmptyInput);
    }
    match s.split_once(char::is_whitespace) {
        Some((scheme, rest)) => Ok((scheme, rest)),
        None => Ok((s, "")),
    }
}

/// `key=value` pairs from a comma-separated auth-param list. Values keep
/// their quotes; unquoting is per-field, since extension parameters are
/// stored verbatim.
fn auth_fields(rest: &str, whole: &str) -> Result<Vec<(String, String)>> {
    let mut fields = Vec::new();
    for piece in syntax::split_unquoted(rest, ',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let (key, value) = piece
            .split_once('=')
            .ok_or_else(|| Error::malformed("auth-param", whole))?;
        fields.push((key.trim().to_string(), value.trim().to_string()));
    }
    Ok(fields)
}

/// Writes `, key=value` fields for an auth value, handling the space
/// after the scheme on the first field.
struct FieldJoiner {
    first: bool,
}

impl FieldJoiner {
    fn new() -> Self {
        FieldJoiner { first: true }
    }

    fn field(&mut self, f: &mut fmt::Formatter<'_>, key: &str, value: &str) -> fmt::Result {
        if self.first {
            self.first = false;
            write!(f, " {}={}", key, value)
        } else {
            write!(f, ", {}={}", key, value)
        }
    }

    fn extension_params(&mut self, f: &mut fmt::Formatter<'_>, params: &Params) -> fmt::Result {
        let mut keys: Vec<&str> = params.keys().collect();
        keys.sort_unstable();
        for key in keys {
            for value in params.get(key) {
                self.field(f, key, value)?;
            }
        }
        Ok(())
    }
}

// ---- Header wrappers ---------------------------------------------------

/// Value of the Authorization header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorization(pub Credentials);

impl Authorization {
    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Authorization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Credentials::from_str(s).map(Authorization)
    }
}

/// Value of the WWW-Authenticate header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WwwAuthenticate(pub Challenge);

impl WwwAuthenticate {
    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }
}

impl fmt::Display for WwwAuthenticate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for WwwAuthenticate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Challenge::from_str(s).map(WwwAuthenticate)
    }
}

/// Proxy-Authorization shares the Authorization implementation by
/// holding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyAuthorization(pub Authorization);

impl ProxyAuthorization {
    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }
}

impl fmt::Display for ProxyAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProxyAuthorization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Authorization::from_str(s).map(ProxyAuthorization)
    }
}

/// Proxy-Authenticate shares the WWW-Authenticate implementation by
/// holding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyAuthenticate(pub WwwAuthenticate);

impl ProxyAuthenticate {
    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }
}

impl fmt::Display for ProxyAuthenticate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProxyAuthenticate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        WwwAuthenticate::from_str(s).map(ProxyAuthenticate)
    }
}
