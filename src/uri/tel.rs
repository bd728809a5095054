//! Telephone URIs (RFC 3966).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::addr::Addr;
use crate::error::{Error, Result};
use crate::params::Params;
use crate::syntax;
use crate::uri::{SipUri, UserInfo};

/// A `tel:` URI: a telephone number with parameters.
///
/// Global numbers start with `+` and are self-contained; local numbers
/// only make sense together with a `phone-context` parameter. Equality
/// ignores visual separators in the number, so `+1(22)333-44-55` equals
/// `+1 22 333 44 55`, while rendering strips spaces only and keeps the
/// remaining separators verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelUri {
    /// The number as written, visual separators included.
    pub number: String,
    /// URI parameters.
    pub params: Params,
}

impl TelUri {
    /// A tel URI with no parameters.
    pub fn new(number: impl Into<String>) -> Self {
        TelUri { number: number.into(), params: Params::new() }
    }

    /// True for a global (RFC 3966 `+`-prefixed) number.
    pub fn is_glob(&self) -> bool {
        self.number.starts_with('+')
    }

    /// A non-empty number is required; local numbers additionally need a
    /// non-empty `phone-context`.
    pub fn is_valid(&self) -> bool {
        if self.number.is_empty() {
            return false;
        }
        if !self.is_glob() {
            return self
                .params
                .first("phone-context")
                .map(|ctx| !ctx.is_empty())
                .unwrap_or(false);
        }
        true
    }

    /// Converts to an equivalent SIP URI per RFC 3966 §19.1.6: visual
    /// separators are dropped from the number, a host-shaped
    /// `phone-context` becomes the SIP host, number-shaped contexts and
    /// extensions are normalized in place, and the whole (lowercased)
    /// tel rendering becomes the SIP user part with `user=phone` set.
    pub fn to_sip(&self) -> SipUri {
        let mut params = self.params.clone();
        let number = syntax::strip_visual_separators(&self.number);
        let mut host = String::new();

        if !self.is_glob() {
            if let Some(ctx) = params.first("phone-context").map(str::to_string) {
                if syntax::is_host(&ctx) {
                    host = ctx;
                    params.del("phone-context");
                } else if syntax::is_phone_number(&ctx) {
                    params.set("phone-context", syntax::strip_visual_separators(&ctx));
                }
            }
        }
        if let Some(ext) = params.first("ext").map(str::to_string) {
            if syntax::is_phone_number(&ext) {
                params.set("ext", syntax::strip_visual_separators(&ext));
            }
        }

        let mut user = number;
        let _ = render_tel_params(&mut user, &params);
        let user = user.to_lowercase();

        let mut uri_params = Params::new();
        uri_params.set("user", "phone");
        SipUri {
            user: Some(UserInfo::new(user)),
            addr: Addr::host(host),
            params: uri_params,
            headers: Params::new(),
            secured: false,
        }
    }
}

impl PartialEq for TelUri {
    fn eq(&self, other: &Self) -> bool {
        let a = syntax::strip_visual_separators(&self.number);
        let b = syntax::strip_visual_separators(&other.number);
        if !a.eq_ignore_ascii_case(&b) {
            return false;
        }
        // Unlike SIP URI parameters, every tel parameter is significant:
        // the parameter-name sets must be identical.
        if !self.params.keys().all(|k| other.params.has(k))
            || !other.params.keys().all(|k| self.params.has(k))
        {
            return false;
        }
        self.params.keys().all(|key| {
            let a = self.params.get(key).join("\n");
            let b = other.params.get(key).join("\n");
            if matches!(key, "ext" | "phone-context")
                && syntax::is_phone_number(&a)
                && syntax::is_phone_number(&b)
            {
                syntax::strip_visual_separators(&a).eq_ignore_ascii_case(&syntax::strip_visual_separators(&b))
            } else {
                a.eq_ignore_ascii_case(&b)
            }
        })
    }
}

/// Writes tel parameters in canonical order: `ext` and `isub` first, then
/// `phone-context`, then everything else alphabetically.
fn render_tel_params<W: fmt::Write>(f: &mut W, params: &Params) -> fmt::Result {
    let leading = ["ext", "isub", "phone-context"];
    for key in leading {
        for value in params.get(key) {
            write_param(f, key, value)?;
        }
    }
    let mut rest: Vec<&str> = params.keys().filter(|k| !leading.contains(k)).collect();
    rest.sort_unstable();
    for key in rest {
        for value in params.get(key) {
            write_param(f, key, value)?;
        }
    }
    Ok(())
}

fn write_param<W: fmt::Write>(f: &mut W, key: &str, value: &str) -> fmt::Result {
    if value.is_empty() {
        write!(f, ";{}", key)
    } else {
        write!(f, ";{}={}", key, value)
    }
}

impl fmt::Display for TelUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tel:{}", syntax::strip_spaces(&self.number))?;
        render_tel_params(f, &self.params)
    }
}

impl FromStr for TelUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        let rest = match s.split_once(':') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("tel") => rest,
            _ => return Err(Error::malformed("tel-uri", s)),
        };
        let mut pieces = rest.split(';');
        let number = pieces.next().unwrap_or("").to_string();
        if number.is_empty() || !syntax::is_phone_number(&number) {
            return Err(Error::malformed("tel-number", s));
        }
        let mut params = Params::new();
        for piece in pieces {
            if piece.is_empty() {
                return Err(Error::malformed("tel-parameter", s));
            }
            match piece.split_once('=') {
                Some((key, value)) => params.append(key, value),
                None => params.append(piece, ""),
            }
        }
        Ok(TelUri { number, params })
    }
}
