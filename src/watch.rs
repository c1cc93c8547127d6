use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AneelError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchTarget {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    FirstSeen,
    Changed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub name: String,
    pub url: String,
    pub kind: ChangeKind,
    pub fingerprint: String,
    pub observed_at: String,
}

pub trait PageFetcher: Send + Sync {
    fn fetch_page(&self, url: &str) -> Result<String, AneelError>;
}

#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, AneelError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("aneel-data/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| AneelError::PageHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|err| AneelError::PageHttp(err.to_string()))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_page(&self, url: &str) -> Result<String, AneelError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| AneelError::PageHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "page request failed".to_string());
            return Err(AneelError::PageStatus { status, message });
        }
        response
            .text()
            .map_err(|err| AneelError::PageHttp(err.to_string()))
    }
}

pub fn fingerprint(body: &str) -> String {
    let digest = Sha256::digest(body.as_bytes());
    format!("{digest:x}")
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

// In-memory only: fingerprints die with the process, so the first poll
// after a restart observes every target as FirstSeen again.
pub struct ChangeWatcher<P: PageFetcher> {
    fetcher: P,
    targets: Vec<WatchTarget>,
    fingerprints: HashMap<String, String>,
}

impl<P: PageFetcher> ChangeWatcher<P> {
    pub fn new(fetcher: P, targets: Vec<WatchTarget>) -> Self {
        Self {
            fetcher,
            targets,
            fingerprints: HashMap::new(),
        }
    }

    // A failing target is logged and skipped; the rest of the round still
    // runs.
    pub fn poll_once(&mut self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        for target in &self.targets {
            let body = match self.fetcher.fetch_page(&target.url) {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!(page = %target.name, error = %err, "poll failed");
                    continue;
                }
            };
            let current = fingerprint(&body);
            match self.fingerprints.get(&target.name) {
                None => {
                    self.fingerprints.insert(target.name.clone(), current.clone());
                    events.push(ChangeEvent {
                        name: target.name.clone(),
                        url: target.url.clone(),
                        kind: ChangeKind::FirstSeen,
                        fingerprint: current,
                        observed_at: iso_timestamp(),
                    });
                }
                Some(known) if *known != current => {
                    tracing::info!(page = %target.name, url = %target.url, "mudança detectada");
                    self.fingerprints.insert(target.name.clone(), current.clone());
                    events.push(ChangeEvent {
                        name: target.name.clone(),
                        url: target.url.clone(),
                        kind: ChangeKind::Changed,
                        fingerprint: current,
                        observed_at: iso_timestamp(),
                    });
                }
                Some(_) => {}
            }
        }
        events
    }
}
