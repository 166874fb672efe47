//! Per-document aggregation of line outcomes into host sets.

use crate::dialect::{Dialect, DialectChoice};
use crate::hostname::Hostname;
use crate::rule::{LineOutcome, SkipReason, Verdict};
use crate::{filter, plain};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Line counters gathered while parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineStats {
    /// Lines seen.
    pub lines: usize,
    /// Lines that produced a decision (before deduplication).
    pub decisions: usize,
    /// Lines skipped, keyed by reason label.
    pub skipped: BTreeMap<String, usize>,
    /// Lines whose syntax carries no host.
    pub unrecognized: usize,
}

impl LineStats {
    fn record(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Decision(_) => self.decisions += 1,
            LineOutcome::Skip(reason) => {
                *self.skipped.entry(reason.to_string()).or_default() += 1;
            }
            LineOutcome::Unrecognized => self.unrecognized += 1,
        }
    }

    /// Total skipped lines across every reason.
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Deduplicated block/allow hosts contributed by one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedList {
    /// Dialect the document was parsed under.
    pub dialect: Dialect,
    /// Hosts blocked by this document and not allowed by it.
    pub blocked: BTreeSet<Hostname>,
    /// Hosts this document explicitly allows.
    pub allowed: BTreeSet<Hostname>,
    /// Line counters.
    pub stats: LineStats,
}

impl ParsedList {
    /// Parses `document` under the dialect chosen by `choice`.
    ///
    /// # Example
    ///
    /// ```
    /// use host_parser::{DialectChoice, ParsedList};
    ///
    /// let list = ParsedList::parse("||ads.example.com^\n@@||ok.example.com^\n", DialectChoice::Auto);
    /// assert!(list.blocked.contains("ads.example.com"));
    /// assert!(list.allowed.contains("ok.example.com"));
    /// ```
    pub fn parse(document: &str, choice: DialectChoice) -> Self {
        let dialect = choice.resolve(document);
        let outcomes: Box<dyn Iterator<Item = LineOutcome> + '_> = match dialect {
            Dialect::Filter => Box::new(filter::outcomes(document)),
            Dialect::Plain => Box::new(plain::outcomes(document)),
        };

        let mut blocked = BTreeSet::new();
        let mut allowed = BTreeSet::new();
        let mut stats = LineStats::default();
        for (idx, outcome) in outcomes.enumerate() {
            stats.record(&outcome);
            match outcome {
                LineOutcome::Decision(decision) => match decision.verdict {
                    Verdict::Block => {
                        blocked.insert(decision.host);
                    }
                    Verdict::Allow => {
                        allowed.insert(decision.host);
                    }
                },
                LineOutcome::Skip(reason) => log_skip(idx + 1, reason),
                LineOutcome::Unrecognized => {
                    crate::debug_log!("line {}: unrecognized rule syntax", idx + 1);
                }
            }
        }

        blocked.retain(|host| !allowed.contains(host));

        Self {
            dialect,
            blocked,
            allowed,
            stats,
        }
    }
}

#[allow(unused_variables)]
fn log_skip(line_no: usize, reason: SkipReason) {
    if !matches!(reason, SkipReason::Empty | SkipReason::Comment) {
        crate::debug_log!("line {line_no}: skipped ({reason})");
    }
}
