#![warn(missing_docs)]
//! Core library entry points for the blockfold converter.
//!
//! Sources are fetched one at a time, parsed by `host-parser` under the
//! filter or plain dialect, merged by the [`Reconciler`] with allow-wins
//! semantics, and written out as `payload:` rule files.

pub mod controls;
pub mod fetch;
pub mod output;
pub mod reconcile;
pub mod runtime;

pub use controls::{Cli, ConvertConfig, DialectArg};
pub use fetch::{Fetch, FetchError, SourceFetcher};
pub use output::{render_payload, write_payload};
pub use reconcile::{reconcile, NoteKind, Reconciled, Reconciler, RuleSet, SourceNote, SourceResult};
pub use runtime::{Converter, RunReport, WrittenFile};
