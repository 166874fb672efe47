//! Parse domain blocklists into canonical hostnames.
//!
//! Two list dialects are understood: Adblock-Plus-style filter lists and
//! plain hostlists (optionally IP-prefixed, hosts-file style). Every line is
//! parsed independently into a [`LineOutcome`]; host-bearing lines pass their
//! candidate through [`hostname::normalize`], and [`ParsedList`] folds a
//! document's outcomes into deduplicated block and allow sets.

// This enables or disables the eprintln! macro, effectively removing it from the code when the
// "debug_logs" feature is disabled.
#[cfg(feature = "debug_logs")]
#[macro_export]
macro_rules! debug_log {
        ($($arg:tt)*) => {
            eprintln!($($arg)*);
        };
    }
#[cfg(not(feature = "debug_logs"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod dialect;
pub mod filter;
pub mod hostname;
mod list;
pub mod plain;
pub mod rule;

pub use dialect::{detect, Dialect, DialectChoice};
pub use hostname::{normalize, Hostname, Rejection};
pub use list::{LineStats, ParsedList};
pub use rule::{Decision, LineOutcome, SkipReason, Verdict};

/// Parses a document with dialect sniffing.
///
/// # Example
///
/// ```
/// use host_parser::{parse_document, Dialect};
///
/// let list = parse_document("0.0.0.0 tracker.example.com\n");
/// assert_eq!(list.dialect, Dialect::Plain);
/// assert!(list.blocked.contains("tracker.example.com"));
/// ```
pub fn parse_document(document: &str) -> ParsedList {
    ParsedList::parse(document, DialectChoice::Auto)
}
