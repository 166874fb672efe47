//! Canonical hostname reduction shared by both list dialects.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Characters that terminate the host part of an anchored (`||`) rule.
pub const HOST_SEPARATORS: &[char] = &['^', '/', '*', '?', '|'];

/// A lowercase, anchor-free, port-free domain name.
///
/// Only [`normalize`] constructs values, so every `Hostname` contains at least
/// one dot, carries no path or port, and is not a bare IPv4 literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Hostname(String);

impl Hostname {
    /// Borrowed view of the canonical name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the hostname, returning the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Hostname {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Why a raw token failed to canonicalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Nothing left after stripping anchors and the port.
    Empty,
    /// Four dot-separated decimal groups.
    Ipv4Literal,
    /// A single label such as `localhost`.
    NoDot,
    /// The token still carried a path component.
    HasPath,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty host"),
            Self::Ipv4Literal => write!(f, "bare IPv4 literal"),
            Self::NoDot => write!(f, "host has no dot"),
            Self::HasPath => write!(f, "host carries a path"),
        }
    }
}

/// Reduces a raw rule token to its canonical hostname.
///
/// # Example
///
/// ```
/// use host_parser::hostname::{normalize, Rejection};
///
/// assert_eq!(normalize("*.Ads.Example.com:443").unwrap().as_str(), "ads.example.com");
/// assert_eq!(normalize("1.2.3.4"), Err(Rejection::Ipv4Literal));
/// ```
pub fn normalize(raw: &str) -> Result<Hostname, Rejection> {
    let lowered = raw.trim().to_lowercase();
    let host = lowered.strip_prefix('.').unwrap_or(&lowered);
    let host = host.trim_start_matches(['*', '.']);
    let host = match host.split_once(':') {
        Some((head, _port)) => head,
        None => host,
    };

    if host.is_empty() {
        return Err(Rejection::Empty);
    }
    if is_ipv4_literal(host) {
        return Err(Rejection::Ipv4Literal);
    }
    if !host.contains('.') {
        return Err(Rejection::NoDot);
    }
    if host.contains('/') {
        return Err(Rejection::HasPath);
    }
    Ok(Hostname(host.to_string()))
}

/// Returns the prefix of `rest` up to the first anchored-rule separator.
pub fn take_until_separator(rest: &str) -> &str {
    match rest.find(HOST_SEPARATORS) {
        Some(idx) => &rest[..idx],
        None => rest,
    }
}

/// True for exactly four non-empty groups of ASCII digits joined by dots.
pub fn is_ipv4_literal(candidate: &str) -> bool {
    let mut groups = 0usize;
    for group in candidate.split('.') {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        groups += 1;
    }
    groups == 4
}
