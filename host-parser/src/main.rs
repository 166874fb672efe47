use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use host_parser::{Dialect, DialectChoice, ParsedList};

fn main() {
    if let Err(err) = run() {
        eprintln!("{}: {err}", env!("CARGO_PKG_NAME"));
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    let mut choice = DialectChoice::Auto;
    let mut input = None;
    for arg in args {
        match arg.as_str() {
            flag if is_help_flag(flag) => {
                print_help(&program);
                return Ok(());
            }
            flag if is_version_flag(flag) => {
                println!("{}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--abp" => choice = DialectChoice::Fixed(Dialect::Filter),
            "--plain" => choice = DialectChoice::Fixed(Dialect::Plain),
            "-" if input.is_none() => input = Some(Input::Stdin),
            path if input.is_none() && !path.starts_with("--") => {
                input = Some(Input::File(path.to_string()))
            }
            extra => {
                return Err(format!("unexpected argument: {extra}\n{}", usage(&program)));
            }
        }
    }

    let document = match input.unwrap_or(Input::Stdin) {
        Input::Stdin => read_stdin()?,
        Input::File(path) => read_file(&path)?,
    };

    let list = ParsedList::parse(&document, choice);
    let json = serde_json::to_string_pretty(&list)
        .map_err(|err| format!("failed to serialize JSON: {err}"))?;
    println!("{json}");
    Ok(())
}

enum Input {
    Stdin,
    File(String),
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

fn is_version_flag(arg: &str) -> bool {
    arg == "-V" || arg == "--version"
}

fn read_file(path: &str) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|err| format!("failed to read '{path}': {err}"))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_stdin() -> Result<String, String> {
    let mut buf = Vec::new();
    io::stdin()
        .read_to_end(&mut buf)
        .map_err(|err| format!("failed to read stdin: {err}"))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn print_help(program: &str) {
    println!(
        "{}\n\nOptions:\n  --abp           Parse as an Adblock-style filter list\n  --plain         Parse as a plain hostlist\n  -h, --help      Show this message\n  -V, --version   Print package version",
        usage(program)
    );
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--abp|--plain] [LIST_FILE|-]\n\n\
         Provide a path to a downloaded blocklist or '-' to read from stdin. \
         When no path is passed, stdin is used. The dialect is sniffed unless forced."
    )
}
