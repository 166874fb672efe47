//! Conversion settings and the command-line surface that builds them.

use clap::{Parser, ValueEnum};
use host_parser::{Dialect, DialectChoice};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Source fetched when none is configured.
pub const DEFAULT_SOURCE: &str = "https://big.oisd.nl/domainswild2";
/// Default destination for the blocked payload.
pub const DEFAULT_BLOCKED_OUTPUT: &str = "oisd-stash.yaml";
/// Default destination for the allowed payload.
pub const DEFAULT_ALLOWED_OUTPUT: &str = "allowlist.yaml";
/// Default per-source fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 180;

/// Everything one conversion run needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertConfig {
    source_urls: Vec<Url>,
    blocked_output_path: PathBuf,
    allowed_output_path: PathBuf,
    fetch_timeout: Duration,
    dialect: DialectChoice,
    dry_run: bool,
}

impl ConvertConfig {
    /// Constructs a config with dialect sniffing and file output enabled.
    pub fn new(
        source_urls: Vec<Url>,
        blocked_output_path: PathBuf,
        allowed_output_path: PathBuf,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source_urls,
            blocked_output_path,
            allowed_output_path,
            fetch_timeout,
            dialect: DialectChoice::Auto,
            dry_run: false,
        }
    }

    /// Forces every source to parse under one dialect.
    pub fn with_dialect(mut self, dialect: DialectChoice) -> Self {
        self.dialect = dialect;
        self
    }

    /// Skips writing payload files.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sources in processing order.
    pub fn source_urls(&self) -> &[Url] {
        &self.source_urls
    }

    /// Destination of the blocked payload.
    pub fn blocked_output_path(&self) -> &Path {
        &self.blocked_output_path
    }

    /// Destination of the allowed payload.
    pub fn allowed_output_path(&self) -> &Path {
        &self.allowed_output_path
    }

    /// Timeout applied to each fetch.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Dialect selection policy.
    pub fn dialect(&self) -> DialectChoice {
        self.dialect
    }

    /// True when payload files should not be written.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        let source = Url::parse(DEFAULT_SOURCE).expect("valid default source url");
        Self::new(
            vec![source],
            PathBuf::from(DEFAULT_BLOCKED_OUTPUT),
            PathBuf::from(DEFAULT_ALLOWED_OUTPUT),
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        )
    }
}

/// Dialect override accepted on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum DialectArg {
    /// Sniff each document (default).
    Auto,
    /// Treat every source as an Adblock-style filter list.
    Abp,
    /// Treat every source as a plain hostlist.
    Plain,
}

impl From<DialectArg> for DialectChoice {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Auto => DialectChoice::Auto,
            DialectArg::Abp => DialectChoice::Fixed(Dialect::Filter),
            DialectArg::Plain => DialectChoice::Fixed(Dialect::Plain),
        }
    }
}

/// Command-line interface for the converter binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "blockfold",
    version,
    about = "Fetch domain blocklists and emit block/allow payload files"
)]
pub struct Cli {
    /// Blocklist URL or local path; repeat or comma separate for several
    #[arg(
        long = "source",
        env = "BLOCKFOLD_SOURCES",
        value_delimiter = ',',
        default_value = DEFAULT_SOURCE,
        value_parser = parse_source
    )]
    pub sources: Vec<Url>,

    /// Where to write the blocked payload
    #[arg(long, env = "BLOCKFOLD_BLOCKED_OUTPUT", default_value = DEFAULT_BLOCKED_OUTPUT)]
    pub blocked_output: PathBuf,

    /// Where to write the allowed payload
    #[arg(long, env = "BLOCKFOLD_ALLOWED_OUTPUT", default_value = DEFAULT_ALLOWED_OUTPUT)]
    pub allowed_output: PathBuf,

    /// Seconds to wait for each source download
    #[arg(long, env = "BLOCKFOLD_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// List dialect; `auto` sniffs each document
    #[arg(long, env = "BLOCKFOLD_DIALECT", value_enum, default_value_t = DialectArg::Auto)]
    pub dialect: DialectArg,

    /// Parse and reconcile without writing payload files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl Cli {
    /// Converts the parsed CLI into a `ConvertConfig`.
    pub fn build_config(&self) -> ConvertConfig {
        ConvertConfig::new(
            self.sources.clone(),
            self.blocked_output.clone(),
            self.allowed_output.clone(),
            Duration::from_secs(self.timeout_secs.max(1)),
        )
        .with_dialect(self.dialect.into())
        .with_dry_run(self.dry_run)
    }
}

/// Accepts URLs as-is and turns bare paths into `file://` URLs.
pub fn parse_source(raw: &str) -> Result<Url, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("empty source".to_string());
    }
    if raw.contains("://") {
        return Url::parse(raw).map_err(|err| format!("invalid source url '{raw}': {err}"));
    }

    let path = Path::new(raw);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| format!("cannot resolve '{raw}': {err}"))?
            .join(path)
    };
    Url::from_file_path(&absolute).map_err(|_| format!("invalid source path '{raw}'"))
}
