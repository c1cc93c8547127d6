use std::fs::{self, File};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::AneelError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded(Utf8PathBuf),
    AlreadyExists(Utf8PathBuf),
}

impl FetchOutcome {
    pub fn path(&self) -> &Utf8Path {
        match self {
            FetchOutcome::Downloaded(path) | FetchOutcome::AlreadyExists(path) => path,
        }
    }
}

pub trait FileFetcher: Send + Sync {
    fn fetch(&self, url: &str, destination_dir: &Utf8Path) -> Result<FetchOutcome, AneelError>;
}

// Last path segment with the query string stripped. Idempotence is keyed on
// this name alone, never on content: a stale file with the same name is
// never re-fetched.
pub fn filename_from_url(url: &str) -> Result<String, AneelError> {
    let name = url
        .rsplit('/')
        .next()
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("")
        .to_string();
    if name.is_empty() {
        return Err(AneelError::InvalidResourceUrl(url.to_string()));
    }
    Ok(name)
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AneelError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("aneel-data/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| AneelError::FetchHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(40))
            .build()
            .map_err(|err| AneelError::FetchHttp(err.to_string()))?;
        Ok(Self { client })
    }
}

impl FileFetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination_dir: &Utf8Path) -> Result<FetchOutcome, AneelError> {
        let filename = filename_from_url(url)?;
        let destination = destination_dir.join(&filename);
        if destination.as_std_path().exists() {
            return Ok(FetchOutcome::AlreadyExists(destination));
        }

        fs::create_dir_all(destination_dir.as_std_path())
            .map_err(|err| AneelError::Filesystem(err.to_string()))?;

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| AneelError::FetchHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "download failed".to_string());
            return Err(AneelError::FetchStatus { status, message });
        }

        // Written straight to the destination: a crash can leave a partial
        // file, and a later run will skip it by name.
        let mut file = File::create(destination.as_std_path())
            .map_err(|err| AneelError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| AneelError::Filesystem(err.to_string()))?;
        Ok(FetchOutcome::Downloaded(destination))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn filename_strips_query_string() {
        assert_eq!(
            filename_from_url("https://x/y/report.csv?v=2").unwrap(),
            "report.csv"
        );
        assert_eq!(
            filename_from_url("https://x/y/perdas.xlsx").unwrap(),
            "perdas.xlsx"
        );
    }

    #[test]
    fn filename_rejects_trailing_slash() {
        let err = filename_from_url("https://x/y/").unwrap_err();
        assert_matches!(err, AneelError::InvalidResourceUrl(_));
    }
}
