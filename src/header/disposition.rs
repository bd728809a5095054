//! The Content-Disposition header.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::header::name_addr::append_param;
use crate::params::{compare_params, render_params, validate_params, Params};
use crate::syntax;

/// `Content-Disposition: session;handling=optional`. The `handling`
/// parameter decides whether an unsupported body can be ignored, so it
/// is the special parameter for equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDisposition {
    pub disp_type: String,
    pub params: Params,
}

impl ContentDisposition {
    pub fn new(disp_type: impl Into<String>) -> Self {
        ContentDisposition { disp_type: disp_type.into(), params: Params::new() }
    }

    pub fn handling(&self) -> Option<&str> {
        self.params.first("handling")
    }

    pub fn is_valid(&self) -> bool {
        syntax::is_token(&self.disp_type) && validate_params(&self.params)
    }
}

impl PartialEq for ContentDisposition {
    fn eq(&self, other: &Self) -> bool {
        self.disp_type.eq_ignore_ascii_case(&other.disp_type)
            && compare_params(&self.params, &other.params, &["handling"])
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.disp_type)?;
        render_params(f, &self.params, false)
    }
}

impl FromStr for ContentDisposition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyInput);
        }
        let pieces = syntax::split_unquoted(trimmed, ';');
        let disp_type = pieces[0].trim().to_string();
        let mut params = Params::new();
        for piece in &pieces[1..] {
            append_param(&mut params, piece, "content-disposition", s)?;
        }
        Ok(ContentDisposition { disp_type, params })
    }
}
