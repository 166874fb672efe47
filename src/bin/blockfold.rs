use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use blockfold::{Cli, Converter};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exit status when no source produced a blocked host.
const EXIT_EMPTY_BLOCKLIST: u8 = 2;
/// Exit status for configuration or write failures.
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}: {err:#}", env!("CARGO_PKG_NAME"));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_logging() {
    let directives =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,blockfold=info".into());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    FmtSubscriber::builder()
        .with_writer(io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.build_config();
    let converter = Converter::from_config(config).context("failed to build source fetcher")?;
    let report = converter.run()?;

    for file in &report.written {
        println!("Wrote {} with {} entries.", file.path.display(), file.entries);
    }
    if converter.config().dry_run() {
        println!(
            "dry run: {} blocked, {} allowed from {} sources",
            report.rules.blocked.len(),
            report.rules.allowed.len(),
            report.notes.len()
        );
    }

    if report.blocklist_empty() {
        eprintln!("Warning: block list empty.");
        return Ok(ExitCode::from(EXIT_EMPTY_BLOCKLIST));
    }
    Ok(ExitCode::SUCCESS)
}
