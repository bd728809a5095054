//! The Via header: the trace of hops a request has taken.

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    sequence::{preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::addr::Addr;
use crate::error::{Error, Result};
use crate::header::name_addr::append_param;
use crate::params::{compare_params, render_params, validate_params, Params};
use crate::syntax;

/// Parameters that carry routing meaning in a hop; these must match on
/// both sides for two hops to be equal, presence included.
const SPECIAL_VIA_PARAMS: &[&str] = &["maddr", "ttl", "received", "branch"];

/// Protocol name and version from the sent-protocol triple, normally
/// `SIP` and `2.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtoInfo {
    pub name: String,
    pub version: String,
}

impl ProtoInfo {
    pub fn sip() -> Self {
        ProtoInfo { name: "SIP".into(), version: "2.0".into() }
    }
}

impl PartialEq for ProtoInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.version.eq_ignore_ascii_case(&other.version)
    }
}

/// One Via hop: `SIP/2.0/UDP host:port ;params`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViaHop {
    pub proto: ProtoInfo,
    pub transport: String,
    pub addr: Addr,
    pub params: Params,
}

impl ViaHop {
    /// A `SIP/2.0` hop over the given transport.
    pub fn new(transport: impl Into<String>, addr: Addr) -> Self {
        ViaHop {
            proto: ProtoInfo::sip(),
            transport: transport.into(),
            addr,
            params: Params::new(),
        }
    }

    /// The transaction `branch` parameter.
    pub fn branch(&self) -> Option<&str> {
        self.params.first("branch")
    }

    pub fn is_valid(&self) -> bool {
        syntax::is_token(&self.proto.name)
            && !self.proto.version.is_empty()
            && syntax::is_token(&self.transport)
            && self.addr.is_valid()
            && validate_params(&self.params)
    }
}

impl PartialEq for ViaHop {
    fn eq(&self, other: &Self) -> bool {
        self.proto == other.proto
            && self.transport.eq_ignore_ascii_case(&other.transport)
            && self.addr == other.addr
            && compare_params(&self.params, &other.params, SPECIAL_VIA_PARAMS)
    }
}

impl fmt::Display for ViaHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} {}",
            self.proto.name, self.proto.version, self.transport, self.addr
        )?;
        render_params(f, &self.params, false)
    }
}

fn sent_protocol(input: &str) -> IResult<&str, (&str, &str, &str)> {
    tuple((
        take_while1(syntax::is_token_char),
        preceded(char('/'), take_while1(|c: char| c.is_ascii_digit() || c == '.')),
        preceded(char('/'), take_while1(syntax::is_token_char)),
    ))(input)
}

impl FromStr for ViaHop {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        let (rest, (name, version, transport)) =
            sent_protocol(s).map_err(|_| Error::malformed("sent-protocol", s))?;
        if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
            return Err(Error::malformed("via-hop", s));
        }
        let pieces = syntax::split_unquoted(rest.trim(), ';');
        let addr = Addr::from_str(pieces[0].trim())?;
        let mut params = Params::new();
        for piece in &pieces[1..] {
            append_param(&mut params, piece, "via-hop", s)?;
        }
        Ok(ViaHop {
            proto: ProtoInfo { name: name.to_string(), version: version.to_string() },
            transport: transport.to_string(),
            addr,
            params,
        })
    }
}

/// Value of the Via header: one or more hops, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via(pub Vec<ViaHop>);

impl Via {
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(ViaHop::is_valid)
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hop) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            hop.fmt(f)?;
        }
        Ok(())
    }
}

impl FromStr for Via {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        syntax::split_unquoted(s, ',')
            .into_iter()
            .map(|piece| ViaHop::from_str(piece.trim()))
            .collect::<Result<Vec<_>>>()
            .map(Via)
    }
}
