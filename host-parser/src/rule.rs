//! Per-line parse outcomes shared by both dialect parsers.

use crate::hostname::{Hostname, Rejection};
use serde::Serialize;
use std::fmt;

/// Whether a rule blocks or explicitly allows its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Network rule that blocks the host.
    Block,
    /// Exception (`@@`) rule that allows the host.
    Allow,
}

/// Result of parsing a single host-bearing line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Decision {
    /// Canonical host named by the rule.
    pub host: Hostname,
    /// Block or allow.
    pub verdict: Verdict,
}

impl Decision {
    /// Builds a blocking decision.
    pub fn block(host: Hostname) -> Self {
        Self {
            host,
            verdict: Verdict::Block,
        }
    }

    /// Builds an allowing decision.
    pub fn allow(host: Hostname) -> Self {
        Self {
            host,
            verdict: Verdict::Allow,
        }
    }

    /// True when the rule was an exception.
    pub fn is_allow(&self) -> bool {
        self.verdict == Verdict::Allow
    }
}

/// Reason a recognized line contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Blank after trimming.
    Empty,
    /// Comment line (`!`, `#`, `;`, `//`).
    Comment,
    /// `[Adblock ...]` header.
    Header,
    /// Element-hiding, scriptlet or HTML filter.
    Cosmetic,
    /// `/.../` regular-expression rule.
    Regex,
    /// A URL-shaped rule whose URL failed to parse or had no host.
    InvalidUrl,
    /// The extracted candidate failed host canonicalization.
    Rejected(Rejection),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::Comment => write!(f, "comment"),
            Self::Header => write!(f, "list header"),
            Self::Cosmetic => write!(f, "cosmetic rule"),
            Self::Regex => write!(f, "regex rule"),
            Self::InvalidUrl => write!(f, "invalid url"),
            Self::Rejected(rejection) => write!(f, "rejected host: {rejection}"),
        }
    }
}

/// Tagged outcome of one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineOutcome {
    /// The line names a host.
    Decision(Decision),
    /// The line was recognized but contributes nothing.
    Skip(SkipReason),
    /// Rule syntax that does not carry a host.
    Unrecognized,
}

impl LineOutcome {
    /// Runs `raw` through the normalizer, mapping rejection to a skip.
    pub(crate) fn from_candidate(raw: &str, verdict: Verdict) -> Self {
        match crate::hostname::normalize(raw) {
            Ok(host) => Self::Decision(Decision { host, verdict }),
            Err(rejection) => Self::Skip(SkipReason::Rejected(rejection)),
        }
    }

    /// Returns the decision, if any.
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Self::Decision(decision) => Some(decision),
            _ => None,
        }
    }
}
