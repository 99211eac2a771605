//! Session-scoped media cache with single-flight loading.
//!
//! Two layers of de-duplication:
//! - per resource: a second `load` of a uri that is already in flight joins
//!   the pending fetch instead of issuing another one;
//! - per project: `preload` is memoized for the whole session, so revisiting
//!   a project never re-fetches it, and a preload requested while one is
//!   pending attaches to it.
//!
//! Nothing is evicted. The catalogue is small and fixed, and an image that
//! was shown once should show instantly the next time.

mod decoder;

pub use decoder::{DecodedMedia, ImageDecoder, MediaDecoder};

use std::{
    any::type_name_of_val,
    fmt,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use dashmap::{DashMap, mapref::entry::Entry};
use folio_contracts::fetch::MediaFetcher;
use folio_model::{MediaUri, Project, ProjectId};
use futures::{
    FutureExt,
    future::{self, BoxFuture, Shared},
};
use tracing::{debug, warn};

use crate::error::MediaError;

/// Outcome of one resource load, shared by every waiter.
pub type LoadOutcome = Result<Arc<DecodedMedia>, MediaError>;

/// Pending or settled single-resource load.
pub type SharedLoad = Shared<BoxFuture<'static, LoadOutcome>>;

/// Pending or settled project preload.
pub type SharedPreload = Shared<BoxFuture<'static, PreloadReport>>;

/// What happened to each image slot of a preloaded project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadReport {
    /// Project preloaded.
    pub project: ProjectId,
    /// Image slots that loaded.
    pub loaded: Vec<MediaUri>,
    /// Image slots that failed.
    pub failed: Vec<MediaUri>,
}

impl PreloadReport {
    fn new(project: ProjectId) -> Self {
        Self {
            project,
            loaded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Whether every image slot loaded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Where a resource stands in the cache.
#[derive(Debug, Clone)]
pub enum ResourceStatus {
    /// Decoded and cached.
    Ready(Arc<DecodedMedia>),
    /// Last load failed.
    Failed(MediaError),
    /// Load in flight.
    Pending,
    /// Never requested.
    Unknown,
}

/// Counters for a [`MediaCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Fetches actually issued to the fetcher.
    pub fetches_issued: u64,
    /// Requests that attached to an in-flight load or preload.
    pub single_flight_joins: u64,
    /// Resources decoded.
    pub ready: usize,
    /// Resources whose last load failed.
    pub failed: usize,
    /// Loads in flight.
    pub in_flight: usize,
    /// Projects with a preload started.
    pub projects: usize,
}

struct CacheInner {
    fetcher: Arc<dyn MediaFetcher>,
    decoder: Arc<dyn MediaDecoder>,
    ready: DashMap<MediaUri, Arc<DecodedMedia>>,
    failed: DashMap<MediaUri, MediaError>,
    in_flight: DashMap<MediaUri, SharedLoad>,
    projects: DashMap<ProjectId, SharedPreload>,
    fetches_issued: AtomicU64,
    single_flight_joins: AtomicU64,
}

impl CacheInner {
    async fn fetch_and_decode(&self, uri: &MediaUri) -> LoadOutcome {
        let bytes = self.fetcher.fetch(uri).await?;
        let media = self.decoder.decode(uri, &bytes)?;
        Ok(Arc::new(media))
    }

    fn record(&self, uri: &MediaUri, outcome: &LoadOutcome) {
        match outcome {
            Ok(media) => {
                self.ready.insert(uri.clone(), Arc::clone(media));
            }
            Err(err) => {
                warn!("media load failed: uri={}, err={}", uri, err);
                self.failed.insert(uri.clone(), err.clone());
            }
        }
        self.in_flight.remove(uri);
    }
}

/// Cheap-to-clone handle on the shared cache. The carousel and the modal
/// hold clones of the same handle.
#[derive(Clone)]
pub struct MediaCache {
    inner: Arc<CacheInner>,
}

impl fmt::Debug for MediaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaCache")
            .field("fetcher", &type_name_of_val(self.inner.fetcher.as_ref()))
            .field("decoder", &type_name_of_val(self.inner.decoder.as_ref()))
            .field("stats", &self.stats())
            .finish()
    }
}

impl MediaCache {
    /// Cache over `fetcher` decoding with [`ImageDecoder`].
    pub fn new(fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self::with_decoder(fetcher, Arc::new(ImageDecoder))
    }

    /// Cache with a custom decoder.
    pub fn with_decoder(
        fetcher: Arc<dyn MediaFetcher>,
        decoder: Arc<dyn MediaDecoder>,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                fetcher,
                decoder,
                ready: DashMap::new(),
                failed: DashMap::new(),
                in_flight: DashMap::new(),
                projects: DashMap::new(),
                fetches_issued: AtomicU64::new(0),
                single_flight_joins: AtomicU64::new(0),
            }),
        }
    }

    /// Load a single resource.
    ///
    /// Ready resources resolve immediately, in-flight ones are joined. A
    /// resource that failed earlier is fetched again: callers only get here
    /// on an explicit request, never on an automatic retry.
    pub fn load(&self, uri: &MediaUri) -> SharedLoad {
        if let Some(media) = self.inner.ready.get(uri) {
            let media = Arc::clone(media.value());
            return future::ready(Ok(media)).boxed().shared();
        }

        match self.inner.in_flight.entry(uri.clone()) {
            Entry::Occupied(pending) => {
                let joins = self
                    .inner
                    .single_flight_joins
                    .fetch_add(1, Ordering::Relaxed)
                    + 1;
                debug!("singleflight wait: uri={}, joins={}", uri, joins);
                pending.get().clone()
            }
            Entry::Vacant(slot) => {
                self.inner.failed.remove(uri);
                let fetches =
                    self.inner.fetches_issued.fetch_add(1, Ordering::Relaxed)
                        + 1;
                debug!("singleflight lead: uri={}, fetches={}", uri, fetches);

                let inner: Weak<CacheInner> = Arc::downgrade(&self.inner);
                let key = uri.clone();
                let load = async move {
                    let Some(inner) = inner.upgrade() else {
                        return Err(MediaError::CacheClosed(key.to_string()));
                    };
                    let outcome = inner.fetch_and_decode(&key).await;
                    inner.record(&key, &outcome);
                    outcome
                }
                .boxed()
                .shared();

                slot.insert(load.clone());
                load
            }
        }
    }

    /// Preload every image slot of `project`.
    ///
    /// Resolves once all image slots have settled, successfully or not.
    /// Embedded frames are skipped: the viewing surface loads them itself.
    pub fn preload(&self, project: &Project) -> SharedPreload {
        let id = project.id();
        if let Some(pending) = self.inner.projects.get(&id) {
            self.inner
                .single_flight_joins
                .fetch_add(1, Ordering::Relaxed);
            debug!("preload join: project={}", id);
            return pending.value().clone();
        }

        let loads: Vec<(MediaUri, SharedLoad)> = project
            .image_slots()
            .map(|(_, uri)| (uri.clone(), self.load(uri)))
            .collect();
        debug!("preload start: project={}, images={}", id, loads.len());

        let preload = async move {
            let outcomes =
                future::join_all(loads.into_iter().map(|(uri, load)| async move {
                    let outcome = load.await;
                    (uri, outcome)
                }))
                .await;

            let mut report = PreloadReport::new(id);
            for (uri, outcome) in outcomes {
                match outcome {
                    Ok(_) => report.loaded.push(uri),
                    Err(_) => report.failed.push(uri),
                }
            }
            if !report.is_complete() {
                warn!(
                    "preload settled with failures: project={}, loaded={}, failed={}",
                    id,
                    report.loaded.len(),
                    report.failed.len()
                );
            }
            report
        }
        .boxed()
        .shared();

        self.inner.projects.insert(id, preload.clone());
        preload
    }

    /// True once the project's preload has settled.
    pub fn is_preloaded(&self, project: ProjectId) -> bool {
        self.inner
            .projects
            .get(&project)
            .is_some_and(|preload| preload.peek().is_some())
    }

    /// Where `uri` stands.
    pub fn status(&self, uri: &MediaUri) -> ResourceStatus {
        if let Some(media) = self.inner.ready.get(uri) {
            return ResourceStatus::Ready(Arc::clone(media.value()));
        }
        if self.inner.in_flight.contains_key(uri) {
            return ResourceStatus::Pending;
        }
        if let Some(err) = self.inner.failed.get(uri) {
            return ResourceStatus::Failed(err.value().clone());
        }
        ResourceStatus::Unknown
    }

    /// The decoded resource, if ready.
    pub fn get(&self, uri: &MediaUri) -> Option<Arc<DecodedMedia>> {
        self.inner
            .ready
            .get(uri)
            .map(|media| Arc::clone(media.value()))
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            fetches_issued: self.inner.fetches_issued.load(Ordering::Relaxed),
            single_flight_joins: self
                .inner
                .single_flight_joins
                .load(Ordering::Relaxed),
            ready: self.inner.ready.len(),
            failed: self.inner.failed.len(),
            in_flight: self.inner.in_flight.len(),
            projects: self.inner.projects.len(),
        }
    }
}
