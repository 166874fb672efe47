//! Payload file rendering.
//!
//! ```text
//! # Sources:
//! # - https://lists.example/hosts (plain: +2 block, +0 allow)
//! # Generated: 2024-05-01T08:30:00Z
//! payload:
//!   - 'ads.example.com'
//!   - 'tracker.example.com'
//! ```

use crate::reconcile::SourceNote;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use host_parser::Hostname;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Renders the provenance header and the sorted payload list.
///
/// Hosts come out in ascending code-point order because `BTreeSet<Hostname>`
/// orders by the underlying UTF-8 bytes.
pub fn render_payload(
    hosts: &BTreeSet<Hostname>,
    notes: &[SourceNote],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::with_capacity(64 + hosts.len() * 32);
    out.push_str("# Sources:\n");
    for note in notes {
        let _ = writeln!(out, "# - {note}");
    }
    let _ = writeln!(
        out,
        "# Generated: {}",
        generated_at.format("%Y-%m-%dT%H:%M:%SZ")
    );
    out.push_str("payload:\n");
    for host in hosts {
        let _ = writeln!(out, "  - '{}'", quote_scalar(host.as_str()));
    }
    out
}

/// Writes a rendered payload, creating parent directories as needed.
pub fn write_payload(
    path: &Path,
    hosts: &BTreeSet<Hostname>,
    notes: &[SourceNote],
    generated_at: DateTime<Utc>,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("failed to create {:?}", parent))?;
    }
    let rendered = render_payload(hosts, notes, generated_at);
    fs::write(path, rendered).with_context(|| format!("failed to write payload {:?}", path))?;
    Ok(())
}

// single-quoted YAML escapes a quote by doubling it
fn quote_scalar(host: &str) -> String {
    host.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::NoteKind;
    use chrono::TimeZone;
    use host_parser::{normalize, Dialect};
    use pretty_assertions::assert_eq;
    use url::Url;

    fn set(hosts: &[&str]) -> BTreeSet<Hostname> {
        hosts
            .iter()
            .map(|host| normalize(host).expect("valid host"))
            .collect()
    }

    fn notes() -> Vec<SourceNote> {
        vec![
            SourceNote {
                url: Url::parse("https://lists.example/hosts").expect("url"),
                kind: NoteKind::Parsed {
                    dialect: Dialect::Plain,
                    blocked: 3,
                    allowed: 0,
                },
            },
            SourceNote {
                url: Url::parse("https://lists.example/down").expect("url"),
                kind: NoteKind::Failed {
                    error: "timed out".to_string(),
                },
            },
        ]
    }

    #[test]
    fn renders_header_and_sorted_payload() {
        let generated = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let rendered = render_payload(
            &set(&["zeta.example.com", "Alpha.example.com", "mid.example.com"]),
            &notes(),
            generated,
        );
        assert_eq!(
            rendered,
            "# Sources:\n\
             # - https://lists.example/hosts (plain: +3 block, +0 allow)\n\
             # - https://lists.example/down (error: timed out)\n\
             # Generated: 2024-05-01T08:30:00Z\n\
             payload:\n  - 'alpha.example.com'\n  - 'mid.example.com'\n  - 'zeta.example.com'\n"
        );
    }

    #[test]
    fn payload_section_is_deterministic() {
        let hosts = set(&["b.example.com", "a.example.com", "c.example.net"]);
        let first = render_payload(&hosts, &notes(), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let second = render_payload(&hosts, &notes(), Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap());
        let strip = |text: &str| {
            text.lines()
                .filter(|line| !line.starts_with("# Generated:"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(strip(&first), strip(&second));
        assert_ne!(first, second);
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(quote_scalar("o'neil.example.com"), "o''neil.example.com");
        assert_eq!(quote_scalar("plain.example.com"), "plain.example.com");
    }

    #[test]
    fn writes_into_missing_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested/out/blocked.yaml");
        let generated = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        write_payload(&path, &set(&["ads.example.com"]), &[], generated).expect("write");

        let written = fs::read_to_string(&path).expect("read back");
        assert!(written.ends_with("payload:\n  - 'ads.example.com'\n"));
        assert!(written.starts_with("# Sources:\n# Generated: 2024-05-01T08:30:00Z\n"));
    }
}
