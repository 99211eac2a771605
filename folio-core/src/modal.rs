//! Full-screen modal viewer.
//!
//! A modal exists only while open: opening builds a [`ModalController`],
//! closing drops it. Dropping releases the scroll lock and throws away any
//! transient load state, so a reopened modal always asks the cache afresh.
//!
//! The modal keeps its own image cursor. It starts from the carousel's image
//! index but moves independently and is clamped, not wrapped. Embedded-frame
//! slots are skipped: the modal only ever shows a project's images.

use std::{fmt, sync::Arc};

use folio_model::{Catalogue, MediaUri};
use futures::FutureExt;
use tracing::{debug, warn};

use crate::{
    media_cache::{DecodedMedia, LoadOutcome, MediaCache},
    scroll::{ScrollGuard, ScrollLock},
    task::{Settled, Task},
};

/// What the modal's image area shows.
#[derive(Debug, Clone)]
pub enum ModalImage {
    /// Loading indicator up; the resource was not cached.
    Loading(MediaUri),
    /// Loaded and on display.
    Shown(Arc<DecodedMedia>),
    /// Load failed. Indicator dismissed, nothing displayed, no retry.
    Empty(MediaUri),
}

impl ModalImage {
    /// Resource this state refers to.
    pub fn uri(&self) -> &MediaUri {
        match self {
            ModalImage::Loading(uri) | ModalImage::Empty(uri) => uri,
            ModalImage::Shown(media) => &media.uri,
        }
    }
}

/// Result of a cursor step.
pub enum Step {
    /// Already at the boundary.
    Unchanged,
    /// Cursor moved; carries the load task when the image was not cached.
    Moved(Option<Task>),
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Unchanged => f.write_str("Unchanged"),
            Step::Moved(task) => f
                .debug_tuple("Moved")
                .field(&task.as_ref().map(|_| ".."))
                .finish(),
        }
    }
}

/// An open modal. Dropping it closes the modal.
pub struct ModalController {
    session: u64,
    project: usize,
    /// Image slots of the project: media index and uri.
    slots: Vec<(usize, MediaUri)>,
    cursor: usize,
    ticket: u64,
    image: ModalImage,
    cache: MediaCache,
    _scroll: ScrollGuard,
}

impl fmt::Debug for ModalController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalController")
            .field("session", &self.session)
            .field("project", &self.project)
            .field("cursor", &self.cursor)
            .field("count", &self.slots.len())
            .field("ticket", &self.ticket)
            .field("image", &self.image)
            .finish()
    }
}

impl ModalController {
    /// Open on `image_index` of the project at `project`.
    ///
    /// An index that points at an embedded frame (or past the end) opens on
    /// the nearest following image slot, falling back to the first one.
    /// Returns `None` when `project` is out of bounds.
    pub fn open(
        session: u64,
        catalogue: &Catalogue,
        project: usize,
        image_index: usize,
        cache: MediaCache,
        scroll: &ScrollLock,
    ) -> Option<(Self, Option<Task>)> {
        let entry = catalogue.get(project)?;
        let slots: Vec<(usize, MediaUri)> = entry
            .image_slots()
            .map(|(index, uri)| (index, uri.clone()))
            .collect();
        let first = slots.first()?.1.clone();
        let cursor = slots
            .iter()
            .position(|(index, _)| *index >= image_index)
            .unwrap_or(0);

        let mut modal = Self {
            session,
            project,
            slots,
            cursor,
            ticket: 0,
            image: ModalImage::Loading(first),
            cache,
            _scroll: scroll.acquire(),
        };
        debug!(
            "modal opened: session={}, project={}, image={}",
            session,
            project,
            modal.media_index()
        );
        let task = modal.resolve();
        Some((modal, task))
    }

    /// Close the modal. Equivalent to dropping it.
    pub fn close(self) {
        debug!("modal closed: session={}", self.session);
    }

    /// Id distinguishing this opening from earlier ones.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Catalogue index of the project shown.
    pub fn project(&self) -> usize {
        self.project
    }

    /// Position among the project's image slots.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of image slots.
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Media index of the slot on display.
    pub fn media_index(&self) -> usize {
        self.slots[self.cursor].0
    }

    /// `"i / N"`, 1-based.
    pub fn counter(&self) -> String {
        format!("{} / {}", self.cursor + 1, self.slots.len())
    }

    /// Whether [`ModalController::previous`] would move.
    pub fn can_previous(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`ModalController::next`] would move.
    pub fn can_next(&self) -> bool {
        self.cursor + 1 < self.slots.len()
    }

    /// Image area state.
    pub fn image(&self) -> &ModalImage {
        &self.image
    }

    /// Whether the loading indicator is up.
    pub fn is_loading(&self) -> bool {
        matches!(self.image, ModalImage::Loading(_))
    }

    /// Step to the next image; clamped at the last one.
    pub fn next(&mut self) -> Step {
        if !self.can_next() {
            return Step::Unchanged;
        }
        self.cursor += 1;
        Step::Moved(self.resolve())
    }

    /// Step to the previous image; clamped at the first one.
    pub fn previous(&mut self) -> Step {
        if !self.can_previous() {
            return Step::Unchanged;
        }
        self.cursor -= 1;
        Step::Moved(self.resolve())
    }

    /// Apply a settled image load. Loads for an earlier cursor position are
    /// ignored.
    pub fn settle(
        &mut self,
        ticket: u64,
        uri: MediaUri,
        outcome: LoadOutcome,
    ) -> bool {
        if ticket != self.ticket {
            debug!(
                "discarding stale modal load: uri={}, ticket={}, latest={}",
                uri, ticket, self.ticket
            );
            return false;
        }
        self.image = match outcome {
            Ok(media) => ModalImage::Shown(media),
            Err(err) => {
                warn!("modal image failed to load: uri={}, err={}", uri, err);
                ModalImage::Empty(uri)
            }
        };
        true
    }

    fn resolve(&mut self) -> Option<Task> {
        self.ticket += 1;
        let uri = self.slots[self.cursor].1.clone();

        if let Some(media) = self.cache.get(&uri) {
            self.image = ModalImage::Shown(media);
            return None;
        }

        self.image = ModalImage::Loading(uri.clone());
        let load = self.cache.load(&uri);
        let (session, ticket) = (self.session, self.ticket);
        Some(
            async move {
                Settled::ModalImage {
                    session,
                    ticket,
                    uri,
                    outcome: load.await,
                }
            }
            .boxed(),
        )
    }
}
