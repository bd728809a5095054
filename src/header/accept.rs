//! Accept, Accept-Encoding and Accept-Language.
//!
//! All three carry comma-separated ranges with `q` preferences. Equality
//! for the lists is order-insensitive: the order of ranges expresses no
//! preference beyond what `q` already says.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::header::media_type::MediaType;
use crate::header::name_addr::append_param;
use crate::params::{compare_params, render_params, validate_params, Params};
use crate::syntax;

/// One Accept entry: a media range plus accept-params.
///
/// The grammar puts media parameters and accept-params in one `;` stream;
/// the split point is the first `q` parameter. Everything before it
/// belongs to the media type, `q` and everything after it to the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRange {
    pub media: MediaType,
    pub params: Params,
}

impl MediaRange {
    pub fn new(media: MediaType) -> Self {
        MediaRange { media, params: Params::new() }
    }

    pub fn is_valid(&self) -> bool {
        self.media.is_valid() && validate_params(&self.params)
    }
}

impl PartialEq for MediaRange {
    fn eq(&self, other: &Self) -> bool {
        self.media == other.media && compare_params(&self.params, &other.params, &["q"])
    }
}

impl fmt::Display for MediaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.media.fmt(f)?;
        render_params(f, &self.params, true)
    }
}

impl FromStr for MediaRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let pieces = syntax::split_unquoted(s, ';');
        let (kind, subtype) = pieces[0]
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::malformed("media-range", s))?;
        let mut media = MediaType::new(kind.trim(), subtype.trim());
        let mut params = Params::new();
        let mut seen_q = false;
        for piece in &pieces[1..] {
            let key = piece.trim().split('=').next().unwrap_or("").trim();
            if key.eq_ignore_ascii_case("q") {
                seen_q = true;
            }
            let target = if seen_q { &mut params } else { &mut media.params };
            append_param(target, piece, "media-range", s)?;
        }
        Ok(MediaRange { media, params })
    }
}

/// Value of the Accept header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accept(pub Vec<MediaRange>);

impl Accept {
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(MediaRange::is_valid)
    }
}

impl PartialEq for Accept {
    fn eq(&self, other: &Self) -> bool {
        unordered_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Accept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_list(f, &self.0)
    }
}

impl FromStr for Accept {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // An empty Accept is meaningful: it accepts nothing.
        if s.trim().is_empty() {
            return Ok(Accept(Vec::new()));
        }
        syntax::split_unquoted(s, ',')
            .into_iter()
            .map(|piece| MediaRange::from_str(piece.trim()))
            .collect::<Result<Vec<_>>>()
            .map(Accept)
    }
}

/// One Accept-Encoding or Accept-Language entry: a bare token range with
/// its params.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRange {
    pub value: String,
    pub params: Params,
}

impl TokenRange {
    pub fn new(value: impl Into<String>) -> Self {
        TokenRange { value: value.into(), params: Params::new() }
    }

    fn token_valid(&self) -> bool {
        (self.value == "*" || syntax::is_token(&self.value)) && validate_params(&self.params)
    }
}

impl PartialEq for TokenRange {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq_ignore_ascii_case(&other.value)
            && compare_params(&self.params, &other.params, &["q"])
    }
}

impl fmt::Display for TokenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)?;
        render_params(f, &self.params, true)
    }
}

impl FromStr for TokenRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let pieces = syntax::split_unquoted(s, ';');
        let value = pieces[0].trim().to_string();
        if value.is_empty() {
            return Err(Error::malformed("range", s));
        }
        let mut params = Params::new();
        for piece in &pieces[1..] {
            append_param(&mut params, piece, "range", s)?;
        }
        Ok(TokenRange { value, params })
    }
}

macro_rules! token_range_header {
    ($(#[$doc:meta])* $name:ident, $valid:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $name(pub Vec<TokenRange>);

        impl $name {
            pub fn is_valid(&self) -> bool {
                self.0.iter().all(|r| r.token_valid() && $valid(&r.value))
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                unordered_eq(&self.0, &other.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                render_list(f, &self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                if s.trim().is_empty() {
                    return Ok($name(Vec::new()));
                }
                syntax::split_unquoted(s, ',')
                    .into_iter()
                    .map(|piece| TokenRange::from_str(piece.trim()))
                    .collect::<Result<Vec<_>>>()
                    .map($name)
            }
        }
    };
}

fn any_token(_: &str) -> bool {
    true
}

fn language_shaped(value: &str) -> bool {
    value == "*"
        || value
            .split('-')
            .all(|part| !part.is_empty() && part.len() <= 8 && part.bytes().all(|b| b.is_ascii_alphabetic()))
}

token_range_header!(
    /// Value of the Accept-Encoding header.
    AcceptEncoding,
    any_token
);

token_range_header!(
    /// Value of the Accept-Language header; range values must look like
    /// language tags (`en`, `en-gb`, `*`).
    AcceptLanguage,
    language_shaped
);

fn render_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt(f)?;
    }
    Ok(())
}

fn unordered_eq<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len()
        && a.iter().all(|x| b.contains(x))
        && b.iter().all(|y| a.contains(y))
}
