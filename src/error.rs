//! Error taxonomy for the SIP value model.
//!
//! Parsing is the only fallible surface of this crate: constructing a
//! semantically invalid value (an empty Call-ID, a `tel:` URI with no
//! number) is always possible and reported by the non-failing
//! `is_valid()` predicates instead. The variants here therefore cover
//! exactly three situations: an empty source, input the grammar could not
//! fully consume, and an internal grammar/model mismatch that indicates a
//! bug rather than bad input.

use thiserror::Error;

/// Errors produced while parsing SIP URIs and headers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Zero-length source was handed to a parser.
    #[error("empty input")]
    EmptyInput,

    /// The input did not match the target grammar rule, or matched only a
    /// prefix of it. `rule` names the grammar production that failed.
    #[error("malformed {rule}: {input:?}")]
    MalformedInput {
        /// Grammar rule that rejected the input.
        rule: &'static str,
        /// The offending input, truncated by the caller where needed.
        input: String,
    },

    /// A sub-value the builder unconditionally expects (given that the
    /// outer rule already matched) was absent. This is a grammar/model
    /// mismatch bug, never a property of the input; tests assert against
    /// it instead of the process aborting.
    #[error("internal grammar mismatch: missing {rule}")]
    MissingNode {
        /// The production that should have been present.
        rule: &'static str,
    },
}

impl Error {
    /// Shorthand used by the parsers throughout the crate.
    pub(crate) fn malformed(rule: &'static str, input: impl Into<String>) -> Self {
        Error::MalformedInput { rule, input: input.into() }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
