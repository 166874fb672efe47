//! Sequential driver: fetch each source, parse, reconcile, write payloads.

use crate::controls::ConvertConfig;
use crate::fetch::{Fetch, FetchError, SourceFetcher};
use crate::output::write_payload;
use crate::reconcile::{Reconciled, Reconciler, RuleSet, SourceNote, SourceResult};
use anyhow::Result;
use chrono::{DateTime, Utc};
use host_parser::ParsedList;
use std::path::PathBuf;
use std::time::Instant;

/// A payload file written during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Destination path.
    pub path: PathBuf,
    /// Hosts in the payload.
    pub entries: usize,
}

/// Outcome of one conversion run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Reconciled sets.
    pub rules: RuleSet,
    /// Provenance notes in source order.
    pub notes: Vec<SourceNote>,
    /// Files actually written (empty on dry runs).
    pub written: Vec<WrittenFile>,
    /// Timestamp stamped into the payload headers.
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    /// True when no source produced a blocked host.
    pub fn blocklist_empty(&self) -> bool {
        self.rules.blocked.is_empty()
    }
}

/// Owns the configuration and fetch collaborator for one run.
pub struct Converter<F> {
    config: ConvertConfig,
    fetcher: F,
}

impl Converter<SourceFetcher> {
    /// Builds a converter backed by the HTTP/file fetcher.
    pub fn from_config(config: ConvertConfig) -> Result<Self, FetchError> {
        let fetcher = SourceFetcher::new(config.fetch_timeout())?;
        Ok(Self::new(config, fetcher))
    }
}

impl<F: Fetch> Converter<F> {
    /// Pairs a configuration with any fetch implementation.
    pub fn new(config: ConvertConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Fetches and parses one source; failures become an error note.
    pub fn process_source(&self, url: &url::Url) -> SourceResult {
        let started = Instant::now();
        match self.fetcher.fetch(url) {
            Ok(document) => {
                let list = ParsedList::parse(&document, self.config.dialect());
                tracing::info!(
                    source = %url,
                    dialect = %list.dialect,
                    blocked = list.blocked.len(),
                    allowed = list.allowed.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "parsed source"
                );
                tracing::debug!(
                    source = %url,
                    lines = list.stats.lines,
                    decisions = list.stats.decisions,
                    skipped = list.stats.skipped_total(),
                    unrecognized = list.stats.unrecognized,
                    "line statistics"
                );
                SourceResult::parsed(url.clone(), list)
            }
            Err(err) => {
                tracing::warn!(source = %url, error = %err, "source failed; skipping");
                SourceResult::failed(url.clone(), err)
            }
        }
    }

    /// Processes every configured source in order and reconciles them.
    pub fn collect(&self) -> Reconciled {
        let mut reconciler = Reconciler::new();
        for url in self.config.source_urls() {
            reconciler.absorb(self.process_source(url));
        }
        tracing::debug!(sources = reconciler.sources(), "all sources absorbed");
        reconciler.finish()
    }

    /// Runs the conversion, writing each non-empty set unless this is a dry run.
    pub fn run(&self) -> Result<RunReport> {
        let Reconciled { rules, notes } = self.collect();
        let generated_at = Utc::now();
        let mut written = Vec::new();

        if rules.blocked.is_empty() {
            tracing::warn!("block list empty; not writing blocked payload");
        } else if !self.config.dry_run() {
            let path = self.config.blocked_output_path();
            write_payload(path, &rules.blocked, &notes, generated_at)?;
            written.push(WrittenFile {
                path: path.to_path_buf(),
                entries: rules.blocked.len(),
            });
        }

        if !rules.allowed.is_empty() && !self.config.dry_run() {
            let path = self.config.allowed_output_path();
            write_payload(path, &rules.allowed, &notes, generated_at)?;
            written.push(WrittenFile {
                path: path.to_path_buf(),
                entries: rules.allowed.len(),
            });
        }

        Ok(RunReport {
            rules,
            notes,
            written,
            generated_at,
        })
    }
}
