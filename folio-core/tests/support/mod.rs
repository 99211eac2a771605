//! Shared fixtures for the engine integration tests.
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    io::Cursor,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use async_trait::async_trait;
use folio_contracts::fetch::{FetchError, MediaFetcher};
use folio_core::{
    Gallery, GallerySettings, MediaCache, PageScroll, ScrollLock, Settled,
    Task, Translations,
};
use folio_model::{Catalogue, CatalogueVariant, MediaSlot, MediaUri, Project};
use futures::{StreamExt, stream::FuturesUnordered};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tokio::sync::oneshot;

/// Fetcher serving a small PNG for every uri, with per-uri failures and
/// gates that hold a fetch until released.
#[derive(Default)]
pub struct FakeFetcher {
    failing: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, uri: &str) {
        self.failing.lock().unwrap().insert(uri.to_string());
    }

    pub fn heal(&self, uri: &str) {
        self.failing.lock().unwrap().remove(uri);
    }

    /// Hold the next fetch of `uri` until the returned sender fires or is
    /// dropped.
    pub fn gate(&self, uri: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(uri.to_string(), rx);
        tx
    }

    pub fn calls(&self, uri: &str) -> usize {
        self.calls.lock().unwrap().get(uri).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch(&self, uri: &MediaUri) -> Result<Vec<u8>, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(uri.to_string())
            .or_default() += 1;

        let gate = self.gates.lock().unwrap().remove(uri.as_str());
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.failing.lock().unwrap().contains(uri.as_str()) {
            return Err(FetchError::NotFound(uri.to_string()));
        }
        Ok(png_bytes(4, 3))
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

pub fn image(uri: &str) -> MediaSlot {
    MediaSlot::Image(MediaUri::new(uri))
}

pub fn frame(uri: &str) -> MediaSlot {
    MediaSlot::EmbeddedFrame(MediaUri::new(uri))
}

/// `p{i}/{n}.jpg` image slots for project `i`.
pub fn image_project(id: u32, slots: usize) -> Project {
    let media = (0..slots)
        .map(|n| image(&format!("p{id}/{n}.jpg")))
        .collect();
    Project::new(id, format!("projects.p{id}"), media)
}

/// Project whose primary slot is an embedded frame.
pub fn frame_project(id: u32, slots: usize) -> Project {
    let mut media = vec![frame(&format!("https://frames.test/p{id}"))];
    media.extend((1..slots).map(|n| image(&format!("p{id}/{n}.jpg"))));
    Project::new(id, format!("projects.p{id}"), media)
}

pub fn quad_catalogue(projects: usize) -> Result<Arc<Catalogue>> {
    let projects = (0..projects as u32).map(|id| image_project(id, 4)).collect();
    Ok(Arc::new(Catalogue::new(CatalogueVariant::Quad, projects)?))
}

pub fn translations() -> Arc<Translations> {
    Arc::new(
        Translations::default()
            .with_table("cz", [("projects.p0", "První"), ("projects.p1", "Druhý")])
            .with_table("en", [("projects.p0", "First"), ("projects.p1", "Second")]),
    )
}

pub struct Harness {
    pub gallery: Gallery,
    pub fetcher: Arc<FakeFetcher>,
    pub page: Arc<PageScroll>,
    pub translations: Arc<Translations>,
}

impl Harness {
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self::with_settings(catalogue, GallerySettings::default())
    }

    pub fn with_settings(
        catalogue: Arc<Catalogue>,
        settings: GallerySettings,
    ) -> Self {
        let fetcher = FakeFetcher::new();
        let page = Arc::new(PageScroll::new());
        let translations = translations();
        let gallery = Gallery::new(
            catalogue,
            MediaCache::new(fetcher.clone()),
            translations.clone(),
            ScrollLock::new(page.clone()),
            settings,
        );
        Self {
            gallery,
            fetcher,
            page,
            translations,
        }
    }

    /// Poll `tasks` and everything they lead to until nothing is left.
    pub async fn drain(&mut self, tasks: Vec<Task>) {
        let mut pending: FuturesUnordered<Task> = tasks.into_iter().collect();
        while let Some(settled) = pending.next().await {
            pending.extend(self.gallery.settle(settled));
        }
    }

    pub async fn settle_one(&mut self, task: Task) -> Vec<Task> {
        let settled: Settled = task.await;
        self.gallery.settle(settled)
    }
}
