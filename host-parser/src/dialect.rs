//! Substring-sniffing classifier for downloaded list documents.

use serde::Serialize;
use std::fmt;

/// Markers whose presence anywhere in a document selects the filter dialect.
const FILTER_MARKERS: &[&str] = &["##", "||", "[Adblock"];

/// Supported list syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Adblock-Plus-style filter rules.
    Filter,
    /// One host per line, optionally IP-prefixed.
    Plain,
}

impl Dialect {
    /// Short label used in provenance notes.
    pub fn label(self) -> &'static str {
        match self {
            Self::Filter => "ABP",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Caller preference: sniff the document, or force a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialectChoice {
    /// Use [`detect`].
    #[default]
    Auto,
    /// Always parse as the given dialect.
    Fixed(Dialect),
}

impl DialectChoice {
    /// Resolves the choice against a concrete document.
    pub fn resolve(self, document: &str) -> Dialect {
        match self {
            Self::Auto => detect(document),
            Self::Fixed(dialect) => dialect,
        }
    }
}

/// Classifies a whole document.
///
/// A plain hostlist that happens to contain `||` or `##` anywhere is
/// classified as a filter list; callers who know better use
/// [`DialectChoice::Fixed`].
pub fn detect(document: &str) -> Dialect {
    if FILTER_MARKERS.iter().any(|marker| document.contains(marker)) {
        Dialect::Filter
    } else {
        Dialect::Plain
    }
}
