use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Where media comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory relative media uris resolve against.
    pub root: PathBuf,
    /// Per-request timeout for remote media.
    pub request_timeout_secs: u64,
    /// Retries after the first failed remote fetch. Not found is never
    /// retried.
    pub max_retries: u32,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            request_timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl AssetsConfig {
    /// Per-request timeout, never below one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
