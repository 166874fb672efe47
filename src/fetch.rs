//! Source download collaborator.
//!
//! `http(s)` sources go through a blocking Reqwest client; the body is decoded
//! with the charset the server declares (UTF-8 otherwise), replacing bytes
//! that do not decode. `file` sources are read from disk and decoded the same
//! lossy way.

use reqwest::blocking::Client;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("blockfold/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 5;

/// Anything that can turn a source URL into list text.
pub trait Fetch {
    /// Downloads and decodes the document behind `url`.
    fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Errors surfaced while downloading a source.
#[derive(Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    Client(reqwest::Error),
    /// Connecting or sending the request failed.
    Network(reqwest::Error),
    /// The request exceeded the configured timeout.
    Timeout(reqwest::Error),
    /// The server answered with a non-success status.
    Status(u16),
    /// Reading or decoding the response body failed.
    Decode(reqwest::Error),
    /// Reading a local source failed.
    Io(io::Error),
    /// The `file` URL does not map to a local path.
    InvalidPath(String),
    /// Only `http`, `https` and `file` are fetched.
    UnsupportedScheme(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(err) => write!(f, "http client setup failed: {err}"),
            Self::Network(err) => write!(f, "network error: {err}"),
            Self::Timeout(err) => write!(f, "timed out: {err}"),
            Self::Status(code) => write!(f, "http status {code}"),
            Self::Decode(err) => write!(f, "body decode error: {err}"),
            Self::Io(err) => write!(f, "read error: {err}"),
            Self::InvalidPath(url) => write!(f, "not a local path: {url}"),
            Self::UnsupportedScheme(scheme) => write!(f, "unsupported scheme '{scheme}'"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Client(err) | Self::Network(err) | Self::Timeout(err) | Self::Decode(err) => {
                Some(err)
            }
            Self::Io(err) => Some(err),
            Self::Status(_) | Self::InvalidPath(_) | Self::UnsupportedScheme(_) => None,
        }
    }
}

impl FetchError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_decode() || err.is_body() {
            Self::Decode(err)
        } else {
            Self::Network(err)
        }
    }
}

/// Fetches `http`, `https` and `file` sources.
#[derive(Clone)]
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    /// Builds a fetcher whose HTTP requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    fn fetch_http(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(FetchError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        response.text().map_err(FetchError::from_reqwest)
    }
}

impl Fetch for SourceFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        match url.scheme() {
            "http" | "https" => self.fetch_http(url),
            "file" => read_local(url),
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

fn read_local(url: &Url) -> Result<String, FetchError> {
    let path = url
        .to_file_path()
        .map_err(|_| FetchError::InvalidPath(url.to_string()))?;
    let bytes = fs::read(&path).map_err(FetchError::Io)?;
    let (text, lossy) = decode_body(&bytes);
    if lossy {
        tracing::debug!(path = %path.display(), "replaced undecodable bytes");
    }
    Ok(text.into_owned())
}

fn decode_body(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), false),
        Err(_) => (
            Cow::Owned(String::from_utf8_lossy(bytes).into_owned()),
            true,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_file_sources() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"0.0.0.0 local.example.com\n").expect("write");
        let url = Url::from_file_path(file.path()).expect("file url");

        let fetcher = SourceFetcher::new(Duration::from_secs(5)).expect("fetcher");
        let text = fetcher.fetch(&url).expect("local fetch");
        assert_eq!(text, "0.0.0.0 local.example.com\n");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let (text, lossy) = decode_body(b"ads.example.com\xff\n");
        assert!(lossy);
        assert_eq!(text, "ads.example.com\u{fffd}\n");

        let (text, lossy) = decode_body(b"plain.example.com\n");
        assert!(!lossy);
        assert_eq!(text, "plain.example.com\n");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = Url::from_file_path(dir.path().join("absent.txt")).expect("file url");
        let fetcher = SourceFetcher::new(Duration::from_secs(5)).expect("fetcher");
        assert!(matches!(fetcher.fetch(&url), Err(FetchError::Io(_))));
    }

    #[test]
    fn other_schemes_are_refused() {
        let url = Url::parse("ftp://lists.example.com/hosts").expect("url");
        let fetcher = SourceFetcher::new(Duration::from_secs(5)).expect("fetcher");
        match fetcher.fetch(&url) {
            Err(FetchError::UnsupportedScheme(scheme)) => assert_eq!(scheme, "ftp"),
            other => panic!("expected unsupported scheme, got {other:?}"),
        }
    }
}
