//! Numeric-valued headers: Expires, Min-Expires, Max-Forwards,
//! Content-Length, Timestamp and Retry-After.

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::header::name_addr::append_param;
use crate::params::{compare_params, render_params, validate_params, Params};
use crate::syntax;

macro_rules! seconds_header {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn is_valid(&self) -> bool {
                true
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(Error::EmptyInput);
                }
                s.parse::<u32>()
                    .map($name)
                    .map_err(|_| Error::malformed("delta-seconds", s))
            }
        }
    };
}

seconds_header!(
    /// Value of the Expires header, whole seconds.
    Expires
);
seconds_header!(
    /// Value of the Min-Expires header.
    MinExpires
);
seconds_header!(
    /// Value of the Max-Forwards header.
    MaxForwards
);
seconds_header!(
    /// Value of the Content-Length header (octets, not seconds, but the
    /// same unsigned-integer wire shape).
    ContentLength
);

/// Value of the Timestamp header: the reflected timestamp and an
/// optional processing delay, both in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timestamp {
    pub value: NotNan<f32>,
    pub delay: Option<NotNan<f32>>,
}

impl Timestamp {
    pub fn is_valid(&self) -> bool {
        *self.value >= 0.0 && self.delay.map_or(true, |d| *d >= 0.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(delay) = self.delay {
            write!(f, " {}", delay)?;
        }
        Ok(())
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut pieces = trimmed.split_ascii_whitespace();
        let value = parse_seconds(pieces.next().unwrap_or(""), s)?;
        let delay = match pieces.next() {
            Some(piece) => Some(parse_seconds(piece, s)?),
            None => None,
        };
        if pieces.next().is_some() {
            return Err(Error::malformed("timestamp", s));
        }
        Ok(Timestamp { value, delay })
    }
}

fn parse_seconds(piece: &str, whole: &str) -> Result<NotNan<f32>> {
    piece
        .parse::<f32>()
        .ok()
        .and_then(|v| NotNan::new(v).ok())
        .ok_or_else(|| Error::malformed("timestamp", whole))
}

/// Value of the Retry-After header: seconds to wait, an optional
/// human-readable comment, and parameters. `duration` is the special
/// parameter for equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryAfter {
    pub seconds: u32,
    pub comment: Option<String>,
    pub params: Params,
}

impl RetryAfter {
    pub fn new(seconds: u32) -> Self {
        RetryAfter { seconds, comment: None, params: Params::new() }
    }

    /// The `duration` parameter as seconds, when present and numeric.
    pub fn duration(&self) -> Option<u32> {
        self.params.first("duration").and_then(|d| d.parse().ok())
    }

    pub fn is_valid(&self) -> bool {
        validate_params(&self.params)
    }
}

impl PartialEq for RetryAfter {
    fn eq(&self, other: &Self) -> bool {
        // Comments are free text for humans, not protocol state.
        self.seconds == other.seconds
            && compare_params(&self.params, &other.params, &["duration"])
    }
}

impl fmt::Display for RetryAfter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seconds)?;
        if let Some(comment) = &self.comment {
            write!(f, " ({})", comment)?;
        }
        render_params(f, &self.params, false)
    }
}

impl FromStr for RetryAfter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyInput);
        }
        let pieces = syntax::split_unquoted(trimmed, ';');
        let mut head = pieces[0].trim();
        let mut comment = None;
        if let Some(open) = head.find('(') {
            let close = head
                .rfind(')')
                .filter(|close| *close > open)
                .ok_or_else(|| Error::malformed("retry-after", s))?;
            comment = Some(head[open + 1..close].to_string());
            head = head[..open].trim_end();
        }
        let seconds = head
            .parse::<u32>()
            .map_err(|_| Error::malformed("retry-after", s))?;
        let mut params = Params::new();
        for piece in &pieces[1..] {
            append_param(&mut params, piece, "retry-after", s)?;
        }
        Ok(RetryAfter { seconds, comment, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_headers_round_trip() {
        assert_eq!(Expires::from_str("3600").unwrap(), Expires(3600));
        assert_eq!(Expires(0).to_string(), "0");
        assert_eq!(MaxForwards::from_str(" 70 ").unwrap(), MaxForwards(70));
        assert_eq!(ContentLength::from_str("349").unwrap().to_string(), "349");
        assert!(MinExpires::from_str("-1").is_err());
        assert!(Expires::from_str("soon").is_err());
    }

    #[test]
    fn timestamp_with_delay() {
        let ts = Timestamp::from_str("54 1.5").unwrap();
        assert_eq!(*ts.value, 54.0);
        assert_eq!(ts.delay.map(|d| *d), Some(1.5));
        assert_eq!(ts.to_string(), "54 1.5");

        let bare = Timestamp::from_str("54.25").unwrap();
        assert!(bare.delay.is_none());
        assert_eq!(bare.to_string(), "54.25");
    }

    #[test]
    fn timestamp_rejects_nan_and_extras() {
        assert!(Timestamp::from_str("NaN").is_err());
        assert!(Timestamp::from_str("1 2 3").is_err());
    }

    #[test]
    fn retry_after_with_comment_and_duration() {
        let ra = RetryAfter::from_str("120 (I'm in a meeting);duration=3600").unwrap();
        assert_eq!(ra.seconds, 120);
        assert_eq!(ra.comment.as_deref(), Some("I'm in a meeting"));
        assert_eq!(ra.duration(), Some(3600));
        assert_eq!(ra.to_string(), "120 (I'm in a meeting);duration=3600");
    }

    #[test]
    fn retry_after_equality_ignores_comment() {
        let a = RetryAfter::from_str("18000;duration=3600").unwrap();
        let b = RetryAfter::from_str("18000 (busy);duration=3600").unwrap();
        assert_eq!(a, b);

        // duration is special: one-sided presence breaks equality
        let c = RetryAfter::from_str("18000").unwrap();
        assert_ne!(a, c);
    }
}
