//! Adblock-Plus-style filter list parsing.
//!
//! Each line runs through an ordered cascade: skip predicates first
//! (comments, headers, cosmetic and regex rules), then the `@@` exception
//! prefix, then host extraction by rule shape:
//!
//! ```text
//! ||host^$options     anchored domain rule
//! |https://host/path  anchored URL rule
//! https://host/path   bare URL rule
//! host.example.com    bare hostname
//! ```

use crate::hostname::take_until_separator;
use crate::rule::{Decision, LineOutcome, SkipReason, Verdict};
use std::borrow::Cow;
use url::Url;

/// Substrings that mark element-hiding, scriptlet and HTML filters.
const COSMETIC_MARKERS: &[&str] = &["##", "#@#", "#?#", "#$#"];

/// Characters that end the URL part of an anchored URL rule.
const URL_OPTION_MARKERS: &[char] = &['^', '$'];

/// Parses every line of a filter-dialect document.
pub fn outcomes(document: &str) -> impl Iterator<Item = LineOutcome> + '_ {
    document.lines().map(parse_line)
}

/// Yields only the host-bearing decisions of a filter-dialect document.
pub fn parse(document: &str) -> impl Iterator<Item = Decision> + '_ {
    outcomes(document).filter_map(|outcome| match outcome {
        LineOutcome::Decision(decision) => Some(decision),
        _ => None,
    })
}

/// Parses a single filter-dialect line.
pub fn parse_line(raw: &str) -> LineOutcome {
    let line = raw.trim();
    if let Some(reason) = skip_reason(line) {
        return LineOutcome::Skip(reason);
    }

    let (verdict, body) = match line.strip_prefix("@@") {
        Some(rest) => (Verdict::Allow, rest),
        None => (Verdict::Block, line),
    };

    match extract_candidate(body) {
        Candidate::Host(host) => LineOutcome::from_candidate(&host, verdict),
        Candidate::InvalidUrl => LineOutcome::Skip(SkipReason::InvalidUrl),
        Candidate::NotHost => LineOutcome::Unrecognized,
    }
}

fn skip_reason(line: &str) -> Option<SkipReason> {
    if line.is_empty() {
        Some(SkipReason::Empty)
    } else if line.starts_with('!') {
        Some(SkipReason::Comment)
    } else if line.starts_with("[Adblock") {
        Some(SkipReason::Header)
    } else if is_cosmetic(line) {
        Some(SkipReason::Cosmetic)
    } else if is_regex_rule(line) {
        Some(SkipReason::Regex)
    } else {
        None
    }
}

fn is_cosmetic(line: &str) -> bool {
    COSMETIC_MARKERS.iter().any(|marker| line.contains(marker))
}

fn is_regex_rule(line: &str) -> bool {
    line.len() > 2 && line.starts_with('/') && line.ends_with('/')
}

enum Candidate<'a> {
    Host(Cow<'a, str>),
    InvalidUrl,
    NotHost,
}

fn extract_candidate(body: &str) -> Candidate<'_> {
    if let Some(rest) = body.strip_prefix("||") {
        Candidate::Host(Cow::Borrowed(take_until_separator(rest)))
    } else if body.starts_with("|http") {
        url_host(body.trim_start_matches('|'))
    } else if body.starts_with("http://") || body.starts_with("https://") {
        url_host(body)
    } else if is_bare_host(body) {
        Candidate::Host(Cow::Borrowed(body))
    } else {
        Candidate::NotHost
    }
}

fn url_host(rule: &str) -> Candidate<'static> {
    let url_part = match rule.find(URL_OPTION_MARKERS) {
        Some(idx) => &rule[..idx],
        None => rule,
    };
    match Url::parse(url_part) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => Candidate::Host(Cow::Owned(host.to_string())),
            _ => Candidate::InvalidUrl,
        },
        Err(_) => Candidate::InvalidUrl,
    }
}

fn is_bare_host(body: &str) -> bool {
    !body.is_empty()
        && body
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '*' | '_' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hostname::Rejection;

    fn decided(line: &str) -> (String, bool) {
        match parse_line(line) {
            LineOutcome::Decision(decision) => {
                (decision.host.as_str().to_string(), decision.is_allow())
            }
            other => panic!("expected decision for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn anchored_rule_blocks_host() {
        assert_eq!(
            decided("||ads.example.com^$important"),
            ("ads.example.com".to_string(), false)
        );
        assert_eq!(decided("||cdn.example.com/banner/*"), ("cdn.example.com".to_string(), false));
        assert_eq!(decided("||no-separator.example.com"), ("no-separator.example.com".to_string(), false));
    }

    #[test]
    fn exception_rule_allows_host() {
        assert_eq!(decided("@@||good.example.com^"), ("good.example.com".to_string(), true));
        assert_eq!(decided("@@good.example.org"), ("good.example.org".to_string(), true));
    }

    #[test]
    fn cosmetic_rules_are_skipped() {
        for line in [
            "example.com##.banner",
            "example.com#@#.ad",
            "example.com#?#div:has(> .ad)",
            "example.com#$#abort-on-property-read foo",
            "@@||example.com##.ad",
        ] {
            assert_eq!(parse_line(line), LineOutcome::Skip(SkipReason::Cosmetic), "{line}");
        }
    }

    #[test]
    fn regex_rules_are_skipped() {
        assert_eq!(parse_line(r"/^ads[0-9]+\./"), LineOutcome::Skip(SkipReason::Regex));
        assert_eq!(parse_line("//"), LineOutcome::Unrecognized);
    }

    #[test]
    fn comments_headers_and_blanks_are_skipped() {
        assert_eq!(parse_line("! Title: Demo"), LineOutcome::Skip(SkipReason::Comment));
        assert_eq!(parse_line("[Adblock Plus 2.0]"), LineOutcome::Skip(SkipReason::Header));
        assert_eq!(parse_line("   "), LineOutcome::Skip(SkipReason::Empty));
    }

    #[test]
    fn url_rules_take_the_url_host() {
        assert_eq!(
            decided("|https://Media.Example.com/ads/banner.js"),
            ("media.example.com".to_string(), false)
        );
        assert_eq!(
            decided("|https://anchored.example.net^$third-party"),
            ("anchored.example.net".to_string(), false)
        );
        assert_eq!(
            decided("@@http://allowed.example.com:8080/path"),
            ("allowed.example.com".to_string(), true)
        );
        assert_eq!(parse_line("|http://"), LineOutcome::Skip(SkipReason::InvalidUrl));
    }

    #[test]
    fn unknown_shapes_are_unrecognized() {
        assert_eq!(parse_line("/banner/*/img^"), LineOutcome::Unrecognized);
        assert_eq!(parse_line("&ad_box="), LineOutcome::Unrecognized);
        assert_eq!(parse_line("@@"), LineOutcome::Unrecognized);
    }

    #[test]
    fn normalizer_rejections_surface_as_skips() {
        assert_eq!(
            parse_line("||192.168.0.1^"),
            LineOutcome::Skip(SkipReason::Rejected(Rejection::Ipv4Literal))
        );
        assert_eq!(
            parse_line("localhost"),
            LineOutcome::Skip(SkipReason::Rejected(Rejection::NoDot))
        );
        assert_eq!(
            parse_line("||^"),
            LineOutcome::Skip(SkipReason::Rejected(Rejection::Empty))
        );
    }

    #[test]
    fn parse_keeps_only_decisions() {
        let document = "[Adblock Plus 2.0]\n! c\n||a.example.com^\nexample.com##.x\n@@||b.example.com^\n";
        let decisions: Vec<_> = parse(document).collect();
        assert_eq!(decisions.len(), 2);
        assert!(!decisions[0].is_allow());
        assert!(decisions[1].is_allow());
    }
}
