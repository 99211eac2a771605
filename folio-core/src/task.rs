//! Deferred work handed back to the caller.

use folio_model::MediaUri;
use futures::future::BoxFuture;

use crate::media_cache::{LoadOutcome, PreloadReport};

/// A pending media operation. Poll it to completion and pass the output to
/// [`crate::Gallery::settle`].
pub type Task = BoxFuture<'static, Settled>;

/// Result of a [`Task`], tagged with whatever the engine needs to tell a
/// current result from a stale one.
#[derive(Debug, Clone)]
pub enum Settled {
    /// Preload for a navigation request.
    Preload {
        /// Generation of the request.
        generation: u64,
        /// Catalogue index requested.
        target: usize,
        /// Outcome per image slot.
        report: PreloadReport,
    },
    /// Look-ahead preload with nothing to commit.
    Warmed {
        /// Catalogue index preloaded.
        project: usize,
        /// Outcome per image slot.
        report: PreloadReport,
    },
    /// A modal image load.
    ModalImage {
        /// Modal opening the load belongs to.
        session: u64,
        /// Cursor ticket at request time.
        ticket: u64,
        /// Resource loaded.
        uri: MediaUri,
        /// Load result.
        outcome: LoadOutcome,
    },
}
