//! Informational resource headers: Alert-Info, Call-Info and Error-Info
//! all carry a list of `<URI> ;params` entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::header::parse_params_str;
use crate::params::{compare_params, render_params, validate_params, Params};
use crate::syntax;
use crate::uri::Uri;

/// One `<URI> ;params` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceAddr {
    pub uri: Uri,
    pub params: Params,
}

impl ResourceAddr {
    pub fn new(uri: Uri) -> Self {
        ResourceAddr { uri, params: Params::new() }
    }

    pub fn is_valid(&self) -> bool {
        self.uri.is_valid() && validate_params(&self.params)
    }
}

impl PartialEq for ResourceAddr {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && compare_params(&self.params, &other.params, &[])
    }
}

impl fmt::Display for ResourceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.uri)?;
        render_params(f, &self.params, false)
    }
}

impl FromStr for ResourceAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let rest = s
            .strip_prefix('<')
            .ok_or_else(|| Error::malformed("resource-addr", s))?;
        let (uri, tail) = rest
            .split_once('>')
            .ok_or_else(|| Error::malformed("resource-addr", s))?;
        let uri = Uri::from_str(uri)?;
        let params = parse_params_str(tail.trim().trim_start_matches(';'), "resource-addr", s)?;
        Ok(ResourceAddr { uri, params })
    }
}

/// Comma-separated resource list shared by Alert-Info, Call-Info and
/// Error-Info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoList(pub Vec<ResourceAddr>);

impl InfoList {
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(ResourceAddr::is_valid)
    }
}

impl fmt::Display for InfoList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, addr) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            addr.fmt(f)?;
        }
        Ok(())
    }
}

impl FromStr for InfoList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        syntax::split_unquoted(s, ',')
            .into_iter()
            .map(|piece| ResourceAddr::from_str(piece.trim()))
            .collect::<Result<Vec<_>>>()
            .map(InfoList)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_call_info_entries() {
        let list = InfoList::from_str(
            "<http://wwww.example.com/alice/photo.jpg>;purpose=icon, <http://www.example.com/alice/>;purpose=info",
        )
        .unwrap();
        assert_eq!(list.0.len(), 2);
        assert_eq!(list.0[0].params.first("purpose"), Some("icon"));
        assert_eq!(
            list.to_string(),
            "<http://wwww.example.com/alice/photo.jpg>;purpose=icon, <http://www.example.com/alice/>;purpose=info"
        );
    }

    #[test]
    fn requires_angle_brackets() {
        assert!(InfoList::from_str("http://example.com/sound.wav").is_err());
    }

    #[test]
    fn entries_compare_param_wise() {
        let a = InfoList::from_str("<http://x.com/a.wav>;Purpose=Icon").unwrap();
        let b = InfoList::from_str("<HTTP://X.COM/a.wav>;purpose=icon").unwrap();
        assert_eq!(a, b);

        let c = InfoList::from_str("<http://x.com/a.wav>;purpose=info").unwrap();
        assert_ne!(a, c);
    }
}
