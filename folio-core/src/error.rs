use folio_contracts::fetch::FetchError;
use thiserror::Error;

/// Why a single media resource is unavailable.
///
/// Cloneable because one outcome is shared by every waiter of a
/// single-flight load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The fetcher could not deliver the bytes.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The bytes are not a decodable image.
    #[error("decode failed for {uri}: {reason}")]
    Decode {
        /// Resource that failed to decode.
        uri: String,
        /// Decoder message.
        reason: String,
    },

    /// The cache was dropped while the load was pending.
    #[error("media cache was dropped before {0} settled")]
    CacheClosed(String),
}

/// Localization failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// No translation table exists for the locale.
    #[error("unknown locale: {0}")]
    UnknownLocale(String),
}
