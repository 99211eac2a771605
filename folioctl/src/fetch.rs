//! Asset fetcher: `http(s)` over reqwest, everything else from disk.

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use async_trait::async_trait;
use folio_config::AssetsConfig;
use folio_contracts::fetch::{FetchError, MediaFetcher};
use folio_model::MediaUri;
use tracing::{debug, warn};
use url::Url;

const INITIAL_BACKOFF: Duration = Duration::from_millis(200);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Where a uri points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Remote(Url),
    Local(PathBuf),
}

#[derive(Debug)]
enum AttemptError {
    Retryable(FetchError),
    Fatal(FetchError),
}

#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: reqwest::Client,
    root: PathBuf,
    max_retries: u32,
}

impl AssetFetcher {
    pub fn new(config: &AssetsConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            client,
            root: config.root.clone(),
            max_retries: config.max_retries,
        })
    }

    /// Absolute `http(s)` urls are remote, `file://` urls and bare paths are
    /// local. Paths resolve against the asset root, a leading `/` included.
    pub fn classify(&self, uri: &MediaUri) -> Result<AssetSource, FetchError> {
        match Url::parse(uri.as_str()) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(AssetSource::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(AssetSource::Local)
                    .map_err(|_| FetchError::Unsupported(uri.to_string())),
                _ => Err(FetchError::Unsupported(uri.to_string())),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(
                AssetSource::Local(self.root.join(uri.as_str().trim_start_matches('/'))),
            ),
            Err(_) => Err(FetchError::Unsupported(uri.to_string())),
        }
    }

    async fn fetch_remote(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 0u32;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            match self.attempt_remote(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(AttemptError::Retryable(err)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "asset fetch retrying (attempt {}/{}): url={}, err={}",
                        attempt, self.max_retries, url, err
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = std::cmp::min(backoff * 2, MAX_BACKOFF);
                }
                Err(AttemptError::Retryable(err) | AttemptError::Fatal(err)) => {
                    return Err(err);
                }
            }
        }
    }

    async fn attempt_remote(&self, url: &Url) -> Result<Vec<u8>, AttemptError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| classify_http_error(url, err))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND
            || status == reqwest::StatusCode::GONE
        {
            return Err(AttemptError::Fatal(FetchError::NotFound(url.to_string())));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status.is_server_error()
        {
            return Err(AttemptError::Retryable(FetchError::Network(format!(
                "{url}: HTTP {status}"
            ))));
        }
        if !status.is_success() {
            return Err(AttemptError::Fatal(FetchError::Network(format!(
                "{url}: HTTP {status}"
            ))));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| classify_http_error(url, err))?;
        debug!("fetched remote asset: url={}, bytes={}", url, bytes.len());
        Ok(bytes.to_vec())
    }

    async fn fetch_local(&self, path: &Path) -> Result<Vec<u8>, FetchError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => FetchError::NotFound(path.display().to_string()),
            _ => FetchError::Network(format!("{}: {}", path.display(), err)),
        })?;
        debug!("read local asset: path={}, bytes={}", path.display(), bytes.len());
        Ok(bytes)
    }
}

fn classify_http_error(url: &Url, err: reqwest::Error) -> AttemptError {
    if err.is_timeout() {
        AttemptError::Retryable(FetchError::Timeout(url.to_string()))
    } else if err.is_connect() || err.is_request() || err.is_body() {
        AttemptError::Retryable(FetchError::Network(format!("{url}: {err}")))
    } else {
        AttemptError::Fatal(FetchError::Network(format!("{url}: {err}")))
    }
}

#[async_trait]
impl MediaFetcher for AssetFetcher {
    async fn fetch(&self, uri: &MediaUri) -> Result<Vec<u8>, FetchError> {
        match self.classify(uri)? {
            AssetSource::Remote(url) => self.fetch_remote(&url).await,
            AssetSource::Local(path) => self.fetch_local(&path).await,
        }
    }
}
