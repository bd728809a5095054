//! # Host/port address
//!
//! [`Addr`] is the host + optional-port pair shared by SIP URIs and Via
//! hops. The host keeps its textual spelling, and when it parses as an IP
//! literal the parsed address is kept alongside so equality can compare
//! address bytes instead of strings: `192.0.2.128` equals
//! `::ffff:192.0.2.128`, while `localhost` never equals `127.0.0.1`
//! (no resolution happens here).
//!
//! Brackets around an IPv6 literal are stripped at construction and
//! re-added only when rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::syntax;

/// Host with an optional port.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Addr {
    host: String,
    ip: Option<IpAddr>,
    port: Option<u16>,
}

impl Addr {
    /// Creates an address with no port. IPv6 brackets are stripped.
    pub fn host(host: impl Into<String>) -> Self {
        let host = host.into();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .map(str::to_string)
            .unwrap_or(host);
        let ip = IpAddr::from_str(&host).ok();
        Addr { host, ip, port: None }
    }

    /// Creates an address with an explicit port.
    pub fn host_port(host: impl Into<String>, port: u16) -> Self {
        let mut addr = Addr::host(host);
        addr.port = Some(port);
        addr
    }

    /// The host text, without IPv6 brackets.
    pub fn host_str(&self) -> &str {
        &self.host
    }

    /// The parsed IP when the host is an IP literal.
    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    /// The port and whether one is present.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Replaces the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// True when the host is syntactically a valid hostname or IP
    /// literal. An empty host is never valid.
    pub fn is_valid(&self) -> bool {
        syntax::is_host(&self.host)
    }

    /// True when no host text is present.
    pub fn is_empty(&self) -> bool {
        self.host.is_empty() && self.port.is_none()
    }
}

impl FromStr for Addr {
    type Err = crate::error::Error;

    /// Parses `host[:port]`, tolerating bracketed and bare IPv6 literals.
    fn from_str(s: &str) -> crate::error::Result<Self> {
        if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| crate::error::Error::malformed("hostport", s))?;
            return match tail.strip_prefix(':') {
                Some(port) => Ok(Addr::host_port(host, parse_port(port, s)?)),
                None if tail.is_empty() => Ok(Addr::host(host)),
                None => Err(crate::error::Error::malformed("hostport", s)),
            };
        }
        // More than one ':' means a bare IPv6 literal without a port.
        if s.matches(':').count() > 1 {
            return Ok(Addr::host(s));
        }
        match s.split_once(':') {
            Some((host, port)) => Ok(Addr::host_port(host, parse_port(port, s)?)),
            None => Ok(Addr::host(s)),
        }
    }
}

fn parse_port(port: &str, whole: &str) -> crate::error::Result<u16> {
    port.parse::<u16>()
        .map_err(|_| crate::error::Error::malformed("port", whole))
}

/// Folds an IPv4-mapped IPv6 address down to IPv4 so the two spellings of
/// the same address compare equal.
fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

impl PartialEq for Addr {
    fn eq(&self, other: &Self) -> bool {
        if self.port != other.port {
            return false;
        }
        match (self.ip, other.ip) {
            (Some(a), Some(b)) => canonical_ip(a) == canonical_ip(b),
            _ => self.host.eq_ignore_ascii_case(&other.host),
        }
    }
}

impl Eq for Addr {}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v6 = matches!(self.ip, Some(IpAddr::V6(_)));
        if v6 {
            write!(f, "[{}]", self.host)?;
        } else {
            f.write_str(&self.host)?;
        }
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_brackets_on_construction() {
        let addr = Addr::host("[2001:db8::1]");
        assert_eq!(addr.host_str(), "2001:db8::1");
        assert!(addr.ip().is_some());
        assert_eq!(addr.to_string(), "[2001:db8::1]");
        assert_eq!(Addr::host_port("[2001:db8::1]", 5060).to_string(), "[2001:db8::1]:5060");
    }

    #[test]
    fn renders_empty_host_with_port() {
        assert_eq!(Addr::host_port("", 5060).to_string(), ":5060");
        assert_eq!(Addr::host("").to_string(), "");
    }

    #[test]
    fn ip_equality_is_canonical() {
        assert_eq!(Addr::host("192.0.2.128"), Addr::host("::ffff:192.0.2.128"));
        assert_eq!(Addr::host("192.0.2.128"), Addr::host("[::ffff:192.0.2.128]"));
        assert_ne!(Addr::host("localhost"), Addr::host("127.0.0.1"));
    }

    #[test]
    fn host_equality_is_case_insensitive() {
        assert_eq!(Addr::host("EXAMPLE.com"), Addr::host("example.COM"));
        assert_ne!(Addr::host("example.com"), Addr::host("example.org"));
    }

    #[test]
    fn port_presence_matters() {
        assert_ne!(Addr::host("example.com"), Addr::host_port("example.com", 5060));
        assert_ne!(
            Addr::host_port("example.com", 5060),
            Addr::host_port("example.com", 5061)
        );
        assert_eq!(
            Addr::host_port("example.com", 5060),
            Addr::host_port("EXAMPLE.COM", 5060)
        );
    }

    #[test]
    fn validity_requires_host_grammar() {
        assert!(Addr::host("example.com").is_valid());
        assert!(Addr::host("[2001:db8::1]").is_valid());
        assert!(!Addr::host("").is_valid());
        assert!(!Addr::host("bad host").is_valid());
    }
}
