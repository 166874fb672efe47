//! Cross-source merge of block/allow sets with allow-wins semantics.

use host_parser::{Dialect, Hostname, LineStats, ParsedList};
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// Final block and allow sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// Hosts to block; never intersects `allowed` once reconciled.
    pub blocked: BTreeSet<Hostname>,
    /// Hosts explicitly allowed by at least one source.
    pub allowed: BTreeSet<Hostname>,
}

/// What a source contributed, as rendered in the provenance header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteKind {
    /// The source parsed.
    Parsed {
        /// Dialect it was parsed under.
        dialect: Dialect,
        /// Hosts it blocked.
        blocked: usize,
        /// Hosts it allowed.
        allowed: usize,
    },
    /// Fetching failed; the source contributed nothing.
    Failed {
        /// Human readable failure.
        error: String,
    },
}

/// Per-source provenance line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceNote {
    /// Source location.
    pub url: Url,
    /// Outcome summary.
    pub kind: NoteKind,
}

impl fmt::Display for SourceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NoteKind::Parsed {
                dialect,
                blocked,
                allowed,
            } => write!(
                f,
                "{} ({dialect}: +{blocked} block, +{allowed} allow)",
                self.url
            ),
            NoteKind::Failed { error } => write!(f, "{} (error: {error})", self.url),
        }
    }
}

/// One source's contribution, consumed by [`Reconciler::absorb`].
#[derive(Debug, Clone)]
pub struct SourceResult {
    blocked: BTreeSet<Hostname>,
    allowed: BTreeSet<Hostname>,
    stats: Option<LineStats>,
    note: SourceNote,
}

impl SourceResult {
    /// Wraps a successfully parsed document.
    pub fn parsed(url: Url, list: ParsedList) -> Self {
        let note = SourceNote {
            url,
            kind: NoteKind::Parsed {
                dialect: list.dialect,
                blocked: list.blocked.len(),
                allowed: list.allowed.len(),
            },
        };
        Self {
            blocked: list.blocked,
            allowed: list.allowed,
            stats: Some(list.stats),
            note,
        }
    }

    /// Records a failed source with empty deltas.
    pub fn failed(url: Url, error: impl fmt::Display) -> Self {
        Self {
            blocked: BTreeSet::new(),
            allowed: BTreeSet::new(),
            stats: None,
            note: SourceNote {
                url,
                kind: NoteKind::Failed {
                    error: error.to_string(),
                },
            },
        }
    }

    /// Provenance line for this source.
    pub fn note(&self) -> &SourceNote {
        &self.note
    }

    /// Line counters, when the source parsed.
    pub fn stats(&self) -> Option<&LineStats> {
        self.stats.as_ref()
    }
}

/// Reconciled rules plus provenance notes in absorption order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Final sets.
    pub rules: RuleSet,
    /// One note per absorbed source.
    pub notes: Vec<SourceNote>,
}

/// Accumulates source results for a single run.
#[derive(Debug, Default)]
pub struct Reconciler {
    pending: RuleSet,
    notes: Vec<SourceNote>,
}

impl Reconciler {
    /// Starts with empty sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions one source's deltas into the running sets.
    pub fn absorb(&mut self, result: SourceResult) {
        self.pending.blocked.extend(result.blocked);
        self.pending.allowed.extend(result.allowed);
        self.notes.push(result.note);
    }

    /// Number of sources absorbed so far.
    pub fn sources(&self) -> usize {
        self.notes.len()
    }

    /// Applies allow-wins once, across every source.
    pub fn finish(self) -> Reconciled {
        let RuleSet {
            mut blocked,
            allowed,
        } = self.pending;
        blocked.retain(|host| !allowed.contains(host));
        Reconciled {
            rules: RuleSet { blocked, allowed },
            notes: self.notes,
        }
    }
}

/// Merges every result and applies allow-wins.
pub fn reconcile<I>(results: I) -> Reconciled
where
    I: IntoIterator<Item = SourceResult>,
{
    let mut reconciler = Reconciler::new();
    for result in results {
        reconciler.absorb(result);
    }
    reconciler.finish()
}
