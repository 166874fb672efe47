//! Plain hostlist parsing (`host`, `0.0.0.0 host`, `||host^`).
//!
//! The plain dialect has no exception syntax, so every accepted line is a
//! block decision.

use crate::hostname::{take_until_separator, Rejection};
use crate::rule::{Decision, LineOutcome, SkipReason, Verdict};
use std::borrow::Cow;
use url::Url;

const COMMENT_PREFIXES: &[&str] = &["#", ";", "//"];

/// Parses every line of a plain-dialect document.
pub fn outcomes(document: &str) -> impl Iterator<Item = LineOutcome> + '_ {
    document.lines().map(parse_line)
}

/// Yields only the accepted hosts of a plain-dialect document, as block decisions.
pub fn parse(document: &str) -> impl Iterator<Item = Decision> + '_ {
    outcomes(document).filter_map(|outcome| match outcome {
        LineOutcome::Decision(decision) => Some(decision),
        _ => None,
    })
}

/// Parses a single plain-dialect line.
pub fn parse_line(raw: &str) -> LineOutcome {
    let line = raw.trim();
    if line.is_empty() {
        return LineOutcome::Skip(SkipReason::Empty);
    }
    if COMMENT_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
        return LineOutcome::Skip(SkipReason::Comment);
    }

    // hosts files put the address first; the host is the last column
    let Some(token) = line.split_whitespace().last() else {
        return LineOutcome::Skip(SkipReason::Empty);
    };

    let candidate = match host_candidate(token) {
        Some(candidate) => candidate,
        None => return LineOutcome::Skip(SkipReason::InvalidUrl),
    };

    match LineOutcome::from_candidate(&candidate, Verdict::Block) {
        LineOutcome::Decision(decision) if decision.host.as_str().contains('/') => {
            LineOutcome::Skip(SkipReason::Rejected(Rejection::HasPath))
        }
        outcome => outcome,
    }
}

fn host_candidate(token: &str) -> Option<Cow<'_, str>> {
    let token = match token.strip_prefix("||") {
        Some(rest) => take_until_separator(rest),
        None => token,
    };
    let token = token.strip_suffix('^').unwrap_or(token);

    if token.starts_with("http://") || token.starts_with("https://") {
        let url = Url::parse(token).ok()?;
        let host = url.host_str().filter(|host| !host.is_empty())?;
        Some(Cow::Owned(host.to_string()))
    } else {
        Some(Cow::Borrowed(token))
    }
}
