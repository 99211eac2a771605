//! Raw media retrieval.

use folio_model::MediaUri;
use thiserror::Error;

/// Why a single resource could not be fetched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("timed out fetching {0}")]
    Timeout(String),

    /// Scheme or path the fetcher cannot serve.
    #[error("unsupported uri: {0}")]
    Unsupported(String),
}

/// Retrieves the raw bytes behind a [`MediaUri`].
///
/// Implementations do not cache; de-duplication and memoization live in the
/// engine's media cache.
#[async_trait::async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch the bytes behind `uri`.
    async fn fetch(&self, uri: &MediaUri) -> Result<Vec<u8>, FetchError>;
}
