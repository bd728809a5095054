//! The CSeq header.

use nom::{
    bytes::complete::take_while1,
    character::complete::{digit1, space1},
    combinator::all_consuming,
    sequence::separated_pair,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::syntax;

/// `CSeq: 314159 INVITE`: a sequence number and the request method it
/// orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CSeq {
    pub seq: u32,
    pub method: String,
}

impl CSeq {
    pub fn new(seq: u32, method: impl Into<String>) -> Self {
        CSeq { seq, method: method.into() }
    }

    /// The CSeq for the next request of the same method in a dialog.
    pub fn next(&self) -> CSeq {
        CSeq { seq: self.seq.saturating_add(1), method: self.method.clone() }
    }

    /// Zero is not a usable sequence number.
    pub fn is_valid(&self) -> bool {
        self.seq > 0 && syntax::is_token(&self.method)
    }
}

impl PartialEq for CSeq {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq && self.method.eq_ignore_ascii_case(&other.method)
    }
}

impl fmt::Display for CSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.seq, self.method)
    }
}

fn cseq_value(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(separated_pair(
        digit1,
        space1,
        take_while1(syntax::is_token_char),
    ))(input)
}

impl FromStr for CSeq {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyInput);
        }
        let (_, (digits, method)) =
            cseq_value(trimmed).map_err(|_| Error::malformed("cseq", s))?;
        let seq = digits.parse::<u32>().map_err(|_| Error::malformed("cseq", s))?;
        Ok(CSeq { seq, method: method.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_renders() {
        let cseq = CSeq::from_str("314159 INVITE").unwrap();
        assert_eq!(cseq.seq, 314159);
        assert_eq!(cseq.method, "INVITE");
        assert_eq!(cseq.to_string(), "314159 INVITE");
    }

    #[test]
    fn next_bumps_sequence_only() {
        let cseq = CSeq::new(1, "INVITE").next();
        assert_eq!(cseq, CSeq::new(2, "INVITE"));
    }

    #[test]
    fn method_compares_case_insensitively() {
        assert_eq!(CSeq::new(1, "INVITE"), CSeq::new(1, "invite"));
        assert_ne!(CSeq::new(1, "INVITE"), CSeq::new(2, "INVITE"));
        assert_ne!(CSeq::new(1, "INVITE"), CSeq::new(1, "ACK"));
    }

    #[test]
    fn zero_sequence_is_invalid() {
        assert!(!CSeq::new(0, "INVITE").is_valid());
        assert!(CSeq::new(1, "INVITE").is_valid());
        assert!(!CSeq::new(1, "bad method").is_valid());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(CSeq::from_str("INVITE").is_err());
        assert!(CSeq::from_str("12").is_err());
        assert!(CSeq::from_str("4294967296 INVITE").is_err());
    }
}
