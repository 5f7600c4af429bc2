use crate::{config::Config, document::ProbeDocument};
use std::fmt::Write;
use std::future::Future;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Everything that can stop a probe document from loading. All variants end
/// up as the same error card.
#[derive(Debug, Error)]
pub enum FetchOrParseError {
    #[error("invalid locator {locator:?}: {source}")]
    Locator {
        locator: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported locator scheme: {0}")]
    UnsupportedScheme(String),
    #[error("not a local file path: {0}")]
    FilePath(Url),
    #[error("request to {url} failed")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP status {status} from {url}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },
    #[error("reading {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid probe document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchOrParseError {
    /// One line carrying the whole cause chain.
    pub fn message(&self) -> String {
        let mut s = self.to_string();
        let mut err: &(dyn std::error::Error + 'static) = self;
        // Decode already prints its inner error.
        if matches!(self, Self::Decode(_)) {
            return s;
        }
        while let Some(src) = err.source() {
            if !s.ends_with(&src.to_string()) {
                let _ = write!(s, ": {}", src);
            }
            err = src;
        }
        s
    }
}

/// Retrieves the raw body behind a resolved locator.
pub trait Transport {
    fn get(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>, FetchOrParseError>> + Send;
}

/// Default transport: HTTP(S) through reqwest, `file:` from disk.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.fetch.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for Fetcher {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchOrParseError> {
        match url.scheme() {
            "http" | "https" => {
                let request_err = |source| FetchOrParseError::Request {
                    url: url.clone(),
                    source,
                };
                let resp = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(request_err)?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchOrParseError::Status {
                        url: url.clone(),
                        status,
                    });
                }
                let body = resp.bytes().await.map_err(request_err)?;
                Ok(body.to_vec())
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| FetchOrParseError::FilePath(url.clone()))?;
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| FetchOrParseError::Read {
                        path: path.display().to_string(),
                        source,
                    })
            }
            other => Err(FetchOrParseError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Resolve `locator` against the page address the way a browser resolves a
/// relative link.
pub fn resolve_locator(page: &Url, locator: &str) -> Result<Url, FetchOrParseError> {
    page.join(locator)
        .map_err(|source| FetchOrParseError::Locator {
            locator: locator.to_string(),
            source,
        })
}

/// One retrieval and one decode. No retry.
pub async fn fetch_and_parse<T: Transport>(
    transport: &T,
    page: &Url,
    locator: &str,
) -> Result<ProbeDocument, FetchOrParseError> {
    let url = resolve_locator(page, locator)?;
    let started = Instant::now();
    let body = transport.get(&url).await?;
    debug!(
        url = %url,
        bytes = body.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "fetched probe document"
    );
    Ok(ProbeDocument::from_json(&body)?)
}
