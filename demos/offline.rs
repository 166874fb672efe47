use blockfold::{ConvertConfig, Converter, Fetch, FetchError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const SOURCES: &[(&str, &str)] = &[
    (
        "https://lists.example/hosts",
        "# hosts\n0.0.0.0 ads.example.com\n0.0.0.0 shared.example.net\n",
    ),
    (
        "https://lists.example/filters",
        "[Adblock Plus 2.0]\n||tracker.example.org^\n@@||shared.example.net^\nexample.com##.banner\n",
    ),
];

struct InMemory(HashMap<&'static str, &'static str>);

impl Fetch for InMemory {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.0
            .get(url.as_str())
            .map(|body| body.to_string())
            .ok_or(FetchError::Status(404))
    }
}

fn main() -> anyhow::Result<()> {
    let urls = SOURCES
        .iter()
        .map(|(url, _)| Url::parse(url))
        .collect::<Result<Vec<_>, _>>()?;
    let config = ConvertConfig::new(
        urls,
        PathBuf::from("blocked.yaml"),
        PathBuf::from("allowed.yaml"),
        Duration::from_secs(5),
    )
    .with_dry_run(true);

    let converter = Converter::new(config, InMemory(SOURCES.iter().copied().collect()));
    let report = converter.run()?;

    print!(
        "{}",
        blockfold::render_payload(&report.rules.blocked, &report.notes, report.generated_at)
    );
    Ok(())
}
