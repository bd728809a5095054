//! The Date header (RFC 1123 date, always rendered in GMT).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Value of the Date header. The original zone offset is kept for
/// inspection, but equality compares instants and rendering always
/// converts to GMT, so two spellings of one instant are the same header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipDate(pub DateTime<FixedOffset>);

impl SipDate {
    pub fn is_valid(&self) -> bool {
        true
    }
}

impl PartialEq for SipDate {
    fn eq(&self, other: &Self) -> bool {
        self.0.timestamp() == other.0.timestamp()
    }
}

impl fmt::Display for SipDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.with_timezone(&chrono::Utc).format("%a, %d %b %Y %H:%M:%S GMT")
        )
    }
}

impl FromStr for SipDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        DateTime::parse_from_rfc2822(s)
            .map(SipDate)
            .map_err(|_| Error::malformed("date", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_gmt() {
        let date = SipDate::from_str("Sat, 13 Nov 2010 23:29:00 GMT").unwrap();
        assert_eq!(date.to_string(), "Sat, 13 Nov 2010 23:29:00 GMT");
    }

    #[test]
    fn renders_other_zones_as_gmt() {
        let date = SipDate::from_str("Sat, 13 Nov 2010 18:29:00 -0500").unwrap();
        assert_eq!(date.to_string(), "Sat, 13 Nov 2010 23:29:00 GMT");
    }

    #[test]
    fn equality_compares_instants() {
        let a = SipDate::from_str("Sat, 13 Nov 2010 23:29:00 GMT").unwrap();
        let b = SipDate::from_str("Sat, 13 Nov 2010 18:29:00 -0500").unwrap();
        assert_eq!(a, b);
        let c = SipDate::from_str("Sat, 13 Nov 2010 23:29:01 GMT").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn rejects_garbage() {
        assert!(SipDate::from_str("not a date").is_err());
        assert!(SipDate::from_str("").is_err());
    }
}
