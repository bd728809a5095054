//! Media types and the Content-Type header.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::header::name_addr::append_param;
use crate::params::{compare_params, render_params, validate_params, Params};
use crate::syntax;

/// `type/subtype ;params`, the shape shared by Content-Type and the
/// Accept media ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    pub kind: String,
    pub subtype: String,
    pub params: Params,
}

impl MediaType {
    pub fn new(kind: impl Into<String>, subtype: impl Into<String>) -> Self {
        MediaType { kind: kind.into(), subtype: subtype.into(), params: Params::new() }
    }

    /// Both sides of the slash must be tokens (`*` counts, for ranges).
    pub fn is_valid(&self) -> bool {
        let token_or_star = |s: &str| s == "*" || syntax::is_token(s);
        token_or_star(&self.kind) && token_or_star(&self.subtype) && validate_params(&self.params)
    }
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.kind.eq_ignore_ascii_case(&other.kind)
            && self.subtype.eq_ignore_ascii_case(&other.subtype)
            && compare_params(&self.params, &other.params, &[])
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)?;
        render_params(f, &self.params, false)
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        let pieces = syntax::split_unquoted(s, ';');
        let (kind, subtype) = pieces[0]
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::malformed("media-type", s))?;
        let mut params = Params::new();
        for piece in &pieces[1..] {
            append_param(&mut params, piece, "media-type", s)?;
        }
        Ok(MediaType {
            kind: kind.trim().to_string(),
            subtype: subtype.trim().to_string(),
            params,
        })
    }
}

/// Value of the Content-Type header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentType(pub MediaType);

impl ContentType {
    pub fn is_valid(&self) -> bool {
        // A concrete type is required here, no ranges.
        self.0.kind != "*" && self.0.subtype != "*" && self.0.is_valid()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MediaType::from_str(s).map(ContentType)
    }
}
