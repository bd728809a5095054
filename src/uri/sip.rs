//! SIP and SIPS URIs (RFC 3261 §19.1).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::addr::Addr;
use crate::error::{Error, Result};
use crate::params::{compare_params, Params};
use crate::syntax;

/// URI parameters whose presence must be symmetric for two SIP URIs to
/// compare equal (RFC 3261 §19.1.4).
const SPECIAL_URI_PARAMS: &[&str] = &["transport", "user", "method", "maddr", "ttl", "lr"];

/// The user part of a SIP URI, with its deprecated optional password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Username, stored unescaped. Compared case-sensitively.
    pub username: String,
    /// Password, when one is present. Compared case-sensitively.
    pub password: Option<String>,
}

impl UserInfo {
    /// A user with no password.
    pub fn new(username: impl Into<String>) -> Self {
        UserInfo { username: username.into(), password: None }
    }
}

/// A `sip:` or `sips:` URI.
///
/// Rendering is canonical: parameters sort by key, headers sort by key
/// then value, and both are percent-escaped for their component class.
/// Equality follows RFC 3261 §19.1.4: the scheme must match exactly, the
/// special URI parameters must be symmetric, and URI headers must agree
/// on both sides.
///
/// ```rust
/// use sipmsg::SipUri;
/// use std::str::FromStr;
///
/// let uri = SipUri::from_str("sip:alice@example.com:5060;transport=udp").unwrap();
/// assert_eq!(uri.addr.port(), Some(5060));
/// assert_eq!(uri.to_string(), "sip:alice@example.com:5060;transport=udp");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipUri {
    /// Optional user info.
    pub user: Option<UserInfo>,
    /// Host and optional port.
    pub addr: Addr,
    /// URI parameters (`;key=value` / `;key`), stored unescaped.
    pub params: Params,
    /// URI headers (`?key=value&...`), stored unescaped.
    pub headers: Params,
    /// True for `sips:`.
    pub secured: bool,
}

impl SipUri {
    /// A plain `sip:` URI for the given host.
    pub fn new(host: impl Into<String>) -> Self {
        SipUri {
            user: None,
            addr: Addr::host(host),
            params: Params::new(),
            headers: Params::new(),
            secured: false,
        }
    }

    /// A `sips:` URI for the given host.
    pub fn sips(host: impl Into<String>) -> Self {
        let mut uri = SipUri::new(host);
        uri.secured = true;
        uri
    }

    /// Sets the user part.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(UserInfo::new(user));
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr = self.addr.with_port(port);
        self
    }

    /// Adds a URI parameter; an empty value makes it a flag.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.set(key, value);
        self
    }

    /// The scheme string this URI renders with.
    pub fn scheme(&self) -> &'static str {
        if self.secured {
            "sips"
        } else {
            "sip"
        }
    }

    /// The username, when user info is present.
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    /// The `transport` URI parameter.
    pub fn transport(&self) -> Option<&str> {
        self.params.first("transport")
    }

    /// A SIP URI needs a non-empty, syntactically valid host.
    pub fn is_valid(&self) -> bool {
        self.addr.is_valid()
    }
}

impl PartialEq for SipUri {
    fn eq(&self, other: &Self) -> bool {
        if self.secured != other.secured || self.user != other.user || self.addr != other.addr {
            return false;
        }
        if !compare_params(&self.params, &other.params, SPECIAL_URI_PARAMS) {
            return false;
        }
        // Headers are the reverse of parameters: any header present in
        // either URI must be present in both.
        let mut keys: Vec<&str> = self.headers.keys().chain(other.headers.keys()).collect();
        keys.sort_unstable();
        keys.dedup();
        keys.into_iter().all(|key| {
            self.headers.has(key)
                && other.headers.has(key)
                && self
                    .headers
                    .get(key)
                    .join("\n")
                    .eq_ignore_ascii_case(&other.headers.get(key).join("\n"))
        })
    }
}

impl fmt::Display for SipUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme())?;
        if let Some(user) = &self.user {
            f.write_str(&syntax::escape_user(&user.username))?;
            if let Some(password) = &user.password {
                write!(f, ":{}", syntax::escape_password(password))?;
            }
            f.write_str("@")?;
        }
        write!(f, "{}", self.addr)?;

        let mut keys: Vec<&str> = self.params.keys().collect();
        keys.sort_unstable();
        for key in keys {
            for value in self.params.get(key) {
                if value.is_empty() {
                    write!(f, ";{}", syntax::escape_param(key))?;
                } else {
                    write!(f, ";{}={}", syntax::escape_param(key), syntax::escape_param(value))?;
                }
            }
        }

        if !self.headers.is_empty() {
            let mut pairs: Vec<(&str, &String)> = Vec::new();
            for key in self.headers.keys() {
                for value in self.headers.get(key) {
                    pairs.push((key, value));
                }
            }
            pairs.sort_unstable();
            for (i, (key, value)) in pairs.into_iter().enumerate() {
                f.write_str(if i == 0 { "?" } else { "&" })?;
                write!(f, "{}={}", syntax::escape_header(key), syntax::escape_header(value))?;
            }
        }
        Ok(())
    }
}

impl FromStr for SipUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        let (scheme, rest) = s
            .split_once(':')
            .ok_or_else(|| Error::malformed("sip-uri", s))?;
        let secured = match scheme.to_ascii_lowercase().as_str() {
            "sip" => false,
            "sips" => true,
            _ => return Err(Error::malformed("sip-uri", s)),
        };

        // The user part may legally contain ';' and '?' (user-unreserved),
        // so split off user info before looking for URI parameters or
        // headers; only a '?' after the hostport starts the headers.
        let (user, body) = match rest.split_once('@') {
            Some((user_info, host)) => {
                let (username, password) = match user_info.split_once(':') {
                    Some((name, pass)) => (name, Some(pass)),
                    None => (user_info, None),
                };
                if username.is_empty() {
                    return Err(Error::malformed("userinfo", s));
                }
                let username = syntax::unescape(username)?;
                let password = match password {
                    Some(p) => Some(syntax::unescape(p)?),
                    None => None,
                };
                (Some(UserInfo { username, password }), host)
            }
            None => (None, rest),
        };

        let (host_part, header_part) = match body.split_once('?') {
            Some((host, headers)) => (host, Some(headers)),
            None => (body, None),
        };

        let mut pieces = host_part.split(';');
        let hostport = pieces.next().unwrap_or("");
        let addr = Addr::from_str(hostport).map_err(|_| Error::malformed("hostport", s))?;

        let mut params = Params::new();
        for piece in pieces {
            if piece.is_empty() {
                return Err(Error::malformed("uri-parameter", s));
            }
            let (key, value) = match piece.split_once('=') {
                Some((k, v)) => (syntax::unescape(k)?, syntax::unescape(v)?),
                None => (syntax::unescape(piece)?, String::new()),
            };
            if key.is_empty() {
                return Err(Error::malformed("uri-parameter", s));
            }
            params.append(key, value);
        }

        let mut headers = Params::new();
        if let Some(header_part) = header_part {
            for piece in header_part.split('&') {
                let (key, value) = piece
                    .split_once('=')
                    .ok_or_else(|| Error::malformed("uri-header", s))?;
                if key.is_empty() {
                    return Err(Error::malformed("uri-header", s));
                }
                headers.append(syntax::unescape(key)?, syntax::unescape(value)?);
            }
        }

        Ok(SipUri { user, addr, params, headers, secured })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_form() {
        let uri = SipUri::from_str("sips:alice:secret@example.com:5061;transport=tls?subject=call").unwrap();
        assert!(uri.secured);
        let user = uri.user.as_ref().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.password.as_deref(), Some("secret"));
        assert_eq!(uri.addr.host_str(), "example.com");
        assert_eq!(uri.addr.port(), Some(5061));
        assert_eq!(uri.transport(), Some("tls"));
        assert_eq!(uri.headers.first("subject"), Some("call"));
    }

    #[test]
    fn parses_flag_params_and_escapes() {
        let uri = SipUri::from_str("sip:example.com;lr;maddr=239.255.255.1").unwrap();
        assert!(uri.params.has("lr"));
        assert_eq!(uri.params.first("lr"), Some(""));
        assert_eq!(uri.params.first("maddr"), Some("239.255.255.1"));

        let uri = SipUri::from_str("sip:ali%63e@example.com").unwrap();
        assert_eq!(uri.username(), Some("alice"));
    }

    #[test]
    fn user_part_may_contain_semicolons() {
        let uri = SipUri::from_str("sip:123456;phone-context=+222@;user=phone").unwrap();
        assert_eq!(uri.username(), Some("123456;phone-context=+222"));
        assert_eq!(uri.addr.host_str(), "");
        assert_eq!(uri.params.first("user"), Some("phone"));
        assert!(!uri.is_valid());
    }

    #[test]
    fn user_part_may_contain_question_mark() {
        // '?' is user-unreserved: only a '?' after the hostport starts
        // the URI headers
        let uri = SipUri::from_str("sip:what?ever@example.com").unwrap();
        assert_eq!(uri.username(), Some("what?ever"));
        assert!(uri.headers.is_empty());
        assert_eq!(uri.to_string(), "sip:what?ever@example.com");

        let uri = SipUri::from_str("sip:what?ever@example.com?subject=x").unwrap();
        assert_eq!(uri.username(), Some("what?ever"));
        assert_eq!(uri.headers.first("subject"), Some("x"));

        let round = SipUri::new("example.com").with_user("what?ever");
        assert_eq!(SipUri::from_str(&round.to_string()).unwrap(), round);
    }

    #[test]
    fn render_is_canonical() {
        let mut uri = SipUri::new("example.com").with_user("bob").with_port(5060);
        uri.params.set("ttl", "15");
        uri.params.set("lr", "");
        uri.headers.set("to", "alice@atlanta.com");
        uri.headers.append("body", "hello");
        assert_eq!(
            uri.to_string(),
            "sip:bob@example.com:5060;lr;ttl=15?body=hello&to=alice%40atlanta.com"
        );
    }

    #[test]
    fn ipv6_hosts_round_trip() {
        let uri = SipUri::from_str("sip:[2001:db8::1]:5060;transport=tcp").unwrap();
        assert_eq!(uri.addr.host_str(), "2001:db8::1");
        assert_eq!(uri.addr.port(), Some(5060));
        assert_eq!(uri.to_string(), "sip:[2001:db8::1]:5060;transport=tcp");

        let bare = SipUri::from_str("sip:2001:db8::1").unwrap();
        assert_eq!(bare.addr.host_str(), "2001:db8::1");
        assert!(bare.addr.port().is_none());
    }

    #[test]
    fn special_param_equality() {
        let a = SipUri::from_str("sip:EXAMPLE.com;transport=udp;lr").unwrap();
        let b = SipUri::from_str("sip:example.com;transport=UDP;lr").unwrap();
        assert_eq!(a, b);

        // special param on one side only
        let c = SipUri::from_str("sip:example.com;lr").unwrap();
        assert_ne!(a, c);

        // non-special extension param on one side only is ignored
        let d = SipUri::from_str("sip:example.com;transport=udp;lr;x-foo=1").unwrap();
        assert_eq!(a, d);

        // scheme sensitivity
        let e = SipUri::from_str("sips:example.com;transport=udp;lr").unwrap();
        assert_ne!(a, e);
    }

    #[test]
    fn header_equality_requires_both_sides() {
        let a = SipUri::from_str("sip:example.com?subject=X").unwrap();
        let b = SipUri::from_str("sip:example.com?subject=x").unwrap();
        let c = SipUri::from_str("sip:example.com").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(c, a);
    }

    #[test]
    fn username_is_case_sensitive() {
        let a = SipUri::from_str("sip:Alice@example.com").unwrap();
        let b = SipUri::from_str("sip:alice@example.com").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert_eq!(SipUri::from_str(""), Err(Error::EmptyInput));
        assert!(SipUri::from_str("http:example.com").is_err());
        assert!(SipUri::from_str("sip:host:99999").is_err());
        assert!(SipUri::from_str("sip:[::1").is_err());
        assert!(SipUri::from_str("sip:a@b;;x").is_err());
    }
}
