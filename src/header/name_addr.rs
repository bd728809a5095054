//! Entity addresses (`name-addr` / `addr-spec`) and the headers built
//! from them: From, To, Contact, Route, Record-Route and Reply-To.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::header::parse_params_str;
use crate::params::{compare_params, render_params, validate_params, Params};
use crate::syntax;
use crate::uri::Uri;

/// `[display-name] <URI> ;params`, the address construct shared by the
/// dialog-defining headers.
///
/// The display name is stored unquoted; rendering re-quotes it when it is
/// not a plain token sequence. Equality compares the URI and the header
/// parameters (with a per-header special set) and ignores the display
/// name, which carries no protocol meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameAddr {
    /// Unquoted display name, when present.
    pub display_name: Option<String>,
    /// The address itself.
    pub uri: Uri,
    /// Header parameters following the address.
    pub params: Params,
}

impl NameAddr {
    /// An address with no display name and no parameters.
    pub fn new(uri: Uri) -> Self {
        NameAddr { display_name: None, uri, params: Params::new() }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Equality with a caller-chosen special parameter set.
    pub(crate) fn equal_with(&self, other: &Self, special: &[&str]) -> bool {
        self.uri == other.uri && compare_params(&self.params, &other.params, special)
    }

    /// The URI must be valid and the parameters well-formed.
    pub fn is_valid(&self) -> bool {
        self.uri.is_valid() && validate_params(&self.params)
    }
}

impl PartialEq for NameAddr {
    fn eq(&self, other: &Self) -> bool {
        self.equal_with(other, &[])
    }
}

impl fmt::Display for NameAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.display_name {
            if syntax::is_token(name) || name.split(' ').all(syntax::is_token) {
                write!(f, "{} ", name)?;
            } else {
                write!(f, "{} ", syntax::quote(name))?;
            }
        }
        write!(f, "<{}>", self.uri)?;
        render_params(f, &self.params, false)
    }
}

impl FromStr for NameAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        if let Some(open) = find_unquoted(s, '<') {
            let close = s[open..]
                .find('>')
                .map(|i| open + i)
                .ok_or_else(|| Error::malformed("name-addr", s))?;
            let display = s[..open].trim();
            let display_name = if display.is_empty() {
                None
            } else {
                Some(syntax::unquote(display))
            };
            let uri = Uri::from_str(&s[open + 1..close])?;
            let tail = s[close + 1..].trim().trim_start_matches(';');
            let params = parse_params_str(tail, "name-addr", s)?;
            Ok(NameAddr { display_name, uri, params })
        } else {
            // addr-spec form: everything after the first ';' belongs to
            // the header, not the URI.
            let pieces = syntax::split_unquoted(s, ';');
            let uri = Uri::from_str(pieces[0].trim())?;
            let mut params = Params::new();
            for piece in &pieces[1..] {
                append_param(&mut params, piece, "name-addr", s)?;
            }
            Ok(NameAddr { display_name: None, uri, params })
        }
    }
}

fn find_unquoted(s: &str, target: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == target && !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

pub(crate) fn append_param(
    params: &mut Params,
    piece: &str,
    rule: &'static str,
    whole: &str,
) -> Result<()> {
    let piece = piece.trim();
    if piece.is_empty() {
        return Err(Error::malformed(rule, whole));
    }
    match piece.split_once('=') {
        Some((key, value)) => params.append(key.trim(), value.trim()),
        None => params.append(piece, ""),
    }
    Ok(())
}

/// Comma-separated list of addresses (Route, Record-Route, Contact).
fn parse_addr_list(s: &str) -> Result<Vec<NameAddr>> {
    if s.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    syntax::split_unquoted(s, ',')
        .into_iter()
        .map(NameAddr::from_str)
        .collect()
}

fn render_addr_list(f: &mut fmt::Formatter<'_>, addrs: &[NameAddr]) -> fmt::Result {
    for (i, addr) in addrs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt::Display::fmt(addr, f)?;
    }
    Ok(())
}

// ---- From / To ---------------------------------------------------------

/// Value of the From and To headers. The `tag` parameter is the dialog
/// identifier, so it is special for equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FromTo(pub NameAddr);

impl FromTo {
    /// The dialog `tag` parameter.
    pub fn tag(&self) -> Option<&str> {
        self.0.params.first("tag")
    }

    /// Sets the dialog `tag` parameter.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.0.params.set("tag", tag);
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }
}

impl PartialEq for FromTo {
    fn eq(&self, other: &Self) -> bool {
        self.0.equal_with(&other.0, &["tag"])
    }
}

impl fmt::Display for FromTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for FromTo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NameAddr::from_str(s).map(FromTo)
    }
}

// ---- Reply-To ----------------------------------------------------------

/// Value of the Reply-To header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyTo(pub NameAddr);

impl ReplyTo {
    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }
}

impl fmt::Display for ReplyTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ReplyTo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NameAddr::from_str(s).map(ReplyTo)
    }
}

// ---- Route / Record-Route ----------------------------------------------

/// Value of the Route header: an ordered list of hops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route(pub Vec<NameAddr>);

impl Route {
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(NameAddr::is_valid)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_addr_list(f, &self.0)
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_addr_list(s).map(Route)
    }
}

/// Value of the Record-Route header; shares the Route list behaviour by
/// holding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRoute(pub Route);

impl RecordRoute {
    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }
}

impl fmt::Display for RecordRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordRoute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Route::from_str(s).map(RecordRoute)
    }
}

// ---- Contact -----------------------------------------------------------

/// Value of the Contact header: either the wildcard `*` used when
/// unregistering, or a list of reachable addresses. The `q` and
/// `expires` parameters drive registration semantics, so they are the
/// special set for equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Contact {
    /// `Contact: *`
    Star,
    /// One or more concrete addresses.
    Entries(Vec<NameAddr>),
}

impl Contact {
    pub fn is_valid(&self) -> bool {
        match self {
            Contact::Star => true,
            Contact::Entries(entries) => {
                !entries.is_empty() && entries.iter().all(NameAddr::is_valid)
            }
        }
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Contact::Star, Contact::Star) => true,
            (Contact::Entries(a), Contact::Entries(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.equal_with(y, &["q", "expires"]))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contact::Star => f.write_str("*"),
            Contact::Entries(entries) => render_addr_list(f, entries),
        }
    }
}

impl FromStr for Contact {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim() == "*" {
            return Ok(Contact::Star);
        }
        parse_addr_list(s).map(Contact::Entries)
    }
}
