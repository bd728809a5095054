//! # Parameter container
//!
//! [`Params`] is the universal parameter/header multimap used throughout
//! the value model: URI parameters, URI headers, header field parameters
//! and authentication extension parameters all live in one of these.
//!
//! Keys are folded to ASCII lowercase on every write, so the original key
//! case is deliberately not retrievable; SIP parameter names compare
//! case-insensitively and their case is not part of any contract. Values
//! keep their original spelling (a quoted-string value keeps its quotes),
//! and a single key can hold several values in insertion order.
//!
//! ```rust
//! use sipmsg::Params;
//!
//! let mut params = Params::new();
//! params.set("Transport", "udp");
//! params.append("lr", "");
//! assert_eq!(params.first("transport"), Some("udp"));
//! assert!(params.has("LR"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::syntax;

const EMPTY: &[String] = &[];

/// Ordered-insertion, case-insensitive multimap from parameter name to
/// one or more values. Cloning is a full deep copy; a clone never shares
/// storage with its source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    entries: Vec<(String, Vec<String>)>,
}

impl Params {
    /// Creates an empty container.
    pub fn new() -> Self {
        Params { entries: Vec::new() }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no parameter is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order. Always lowercase.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// All values for `key`, in insertion order; empty when absent.
    pub fn get(&self, key: &str) -> &[String] {
        let key = key.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(EMPTY)
    }

    /// First value for `key`, if any.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).first().map(String::as_str)
    }

    /// Last value for `key`, if any.
    pub fn last(&self, key: &str) -> Option<&str> {
        self.get(key).last().map(String::as_str)
    }

    /// True when `key` is present (even with an empty flag value).
    pub fn has(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Replaces every value of `key` with the single `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => {
                values.clear();
                values.push(value);
            }
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Adds a value after any existing values of `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Adds a value before any existing values of `key`.
    pub fn prepend(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.insert(0, value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Removes `key` and all its values. Returns true when it was present.
    pub fn del(&mut self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    /// Removes every parameter.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}

/// Writes `;key` / `;key=value` pairs sorted alphabetically by key, with
/// the `q` parameter always first. When `add_default_q` is set and the
/// entry carries other parameters but no `q`, a `q=1` is emitted so
/// extension parameters stay on the accept-params side of the split
/// (RFC 2616 §14.1 ordering).
pub(crate) fn render_params<W: fmt::Write>(
    f: &mut W,
    params: &Params,
    add_default_q: bool,
) -> fmt::Result {
    let mut keys: Vec<&str> = params.keys().filter(|k| *k != "q").collect();
    keys.sort_unstable();
    if params.has("q") {
        for value in params.get("q") {
            write_param(f, "q", value)?;
        }
    } else if add_default_q && !params.is_empty() {
        write_param(f, "q", "1")?;
    }
    for key in keys {
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

/// The canonical "special parameter" equality rule shared by URIs, entity
/// addresses, Via hops, auth values, Content-Disposition and Retry-After.
///
/// A parameter present on both sides must compare equal: verbatim when
/// the value is a quoted-string, case-insensitively otherwise. A
/// parameter named in `special` must appear on both sides if it appears
/// on either. Non-special parameters present on only one side are
/// ignored.
pub(crate) fn compare_params(a: &Params, b: &Params, special: &[&str]) -> bool {
    for key in a.keys() {
        if b.has(key) {
            if !values_equal(a.get(key), b.get(key)) {
                return false;
            }
        } else if special.contains(&key) {
            return false;
        }
    }
    for key in b.keys() {
        if special.contains(&key) && !a.has(key) {
            return false;
        }
    }
    true
}

fn values_equal(a: &[String], b: &[String]) -> bool {
    let a = a.join("\n");
    let b = b.join("\n");
    if syntax::is_quoted(&a) || syntax::is_quoted(&b) {
        a == b
    } else {
        a.eq_ignore_ascii_case(&b)
    }
}

/// Structural validity of a parameter map: every key must be a token and
/// every value a token, a valid host, a quoted-string, or empty (flag).
pub(crate) fn validate_params(params: &Params) -> bool {
    params.keys().all(syntax::is_token)
        && params.keys().flat_map(|k| params.get(k)).all(|v| {
            v.is_empty() || syntax::is_token(v) || syntax::is_host(v) || syntax::is_quoted(v)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_fold_to_lowercase() {
        let mut p = Params::new();
        p.set("Transport", "udp");
        assert_eq!(p.first("TRANSPORT"), Some("udp"));
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["transport"]);
    }

    #[test]
    fn multimap_order_preserved() {
        let mut p = Params::new();
        p.append("tag", "a");
        p.append("tag", "b");
        p.prepend("tag", "z");
        assert_eq!(p.get("tag"), &["z", "a", "b"]);
        assert_eq!(p.first("tag"), Some("z"));
        assert_eq!(p.last("tag"), Some("b"));
    }

    #[test]
    fn set_replaces_all_values() {
        let mut p = Params::new();
        p.append("k", "1");
        p.append("k", "2");
        p.set("K", "3");
        assert_eq!(p.get("k"), &["3"]);
    }

    #[test]
    fn del_and_clear() {
        let mut p: Params = [("a", "1"), ("b", "2")].into_iter().collect();
        assert!(p.del("A"));
        assert!(!p.del("a"));
        assert!(p.has("b"));
        p.clear();
        assert!(p.is_empty());
    }

    #[test]
    fn clone_is_independent() {
        let mut p = Params::new();
        p.set("k", "v");
        let mut c = p.clone();
        c.append("k", "w");
        c.set("new", "x");
        assert_eq!(p.get("k"), &["v"]);
        assert!(!p.has("new"));
    }

    #[test]
    fn render_sorts_q_first() {
        let params: Params = [("b", "2"), ("a", "1"), ("q", "0.9")].into_iter().collect();
        let mut out = String::new();
        render_params(&mut out, &params, false).unwrap();
        assert_eq!(out, ";q=0.9;a=1;b=2");
    }

    #[test]
    fn render_defaults_q_only_with_other_params() {
        let params: Params = [("a", "123")].into_iter().collect();
        let mut out = String::new();
        render_params(&mut out, &params, true).unwrap();
        assert_eq!(out, ";q=1;a=123");

        let mut out = String::new();
        render_params(&mut out, &Params::new(), true).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn render_flag_omits_equals() {
        let params: Params = [("lr", ""), ("transport", "udp")].into_iter().collect();
        let mut out = String::new();
        render_params(&mut out, &params, false).unwrap();
        assert_eq!(out, ";lr;transport=udp");
    }

    #[test]
    fn special_parameter_law() {
        let both: Params = [("transport", "udp"), ("x", "1")].into_iter().collect();
        let one: Params = [("transport", "UDP")].into_iter().collect();
        // non-special on one side only: ignored
        assert!(compare_params(&both, &one, &["transport"]));
        // special on one side only: unequal
        let none = Params::new();
        assert!(!compare_params(&both, &none, &["transport"]));
        assert!(!compare_params(&none, &both, &["transport"]));
        // present on both with differing value: unequal even if non-special
        let other: Params = [("transport", "tcp")].into_iter().collect();
        assert!(!compare_params(&both, &other, &[]));
    }

    #[test]
    fn quoted_values_compare_verbatim() {
        let a: Params = [("reason", "\"Busy\"")].into_iter().collect();
        let b: Params = [("reason", "\"busy\"")].into_iter().collect();
        assert!(!compare_params(&a, &b, &[]));
        let c: Params = [("reason", "Busy")].into_iter().collect();
        let d: Params = [("reason", "busy")].into_iter().collect();
        assert!(compare_params(&c, &d, &[]));
    }

    #[test]
    fn validation_accepts_token_host_quoted() {
        let ok: Params = [("k", "token"), ("h", "example.com"), ("r", "\"x y\""), ("lr", "")]
            .into_iter()
            .collect();
        assert!(validate_params(&ok));
        let bad: Params = [("k", "has space")].into_iter().collect();
        assert!(!validate_params(&bad));
    }
}
