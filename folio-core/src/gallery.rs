//! The assembled gallery: carousel, modal, cache and localizer behind one
//! command-driven surface.
//!
//! [`Gallery::apply`] and [`Gallery::settle`] are the only ways state
//! changes. Both return follow-up [`Task`]s. [`Gallery::frame`] snapshots
//! everything a host needs to draw, with display names resolved through the
//! localizer at that moment, so a locale change only needs a new frame.

use std::{fmt, sync::Arc};

use folio_contracts::locale::Localizer;
use folio_model::{Catalogue, MediaSlot, MediaUri, SlotPosition};
use futures::FutureExt;
use tracing::{debug, info};

use crate::{
    carousel::{CarouselController, Commit, Navigation, SlotSelection},
    input::{Command, InputContext},
    media_cache::{MediaCache, ResourceStatus},
    modal::{ModalController, ModalImage, Step},
    scroll::ScrollLock,
    settings::GallerySettings,
    task::{Settled, Task},
};

/// Load state of one slot as far as rendering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// Decoded and ready to draw.
    Ready {
        /// Width in px.
        width: u32,
        /// Height in px.
        height: u32,
    },
    /// Fetch or decode in flight.
    Loading,
    /// Load failed; render nothing.
    Empty,
    /// Not requested yet.
    Idle,
}

impl From<ResourceStatus> for SlotStatus {
    fn from(status: ResourceStatus) -> Self {
        match status {
            ResourceStatus::Ready(media) => SlotStatus::Ready {
                width: media.width,
                height: media.height,
            },
            ResourceStatus::Pending => SlotStatus::Loading,
            ResourceStatus::Failed(_) => SlotStatus::Empty,
            ResourceStatus::Unknown => SlotStatus::Idle,
        }
    }
}

/// What the primary surface shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryView {
    /// An image slot.
    Image {
        /// Resource shown.
        uri: MediaUri,
        /// Load state.
        status: SlotStatus,
    },
    /// Handed to the host as-is; it loads and owns the frame.
    EmbeddedFrame {
        /// Frame source.
        uri: MediaUri,
    },
}

/// A detail thumbnail of the current project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    /// Thumbnail position.
    pub position: SlotPosition,
    /// Media index the position maps to.
    pub media_index: usize,
    /// Resource shown.
    pub uri: MediaUri,
    /// Whether the slot is an embedded frame.
    pub embedded: bool,
    /// Load state.
    pub status: SlotStatus,
}

/// An entry of the project strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailView {
    /// Catalogue index.
    pub project: usize,
    /// Localized display name.
    pub name: String,
    /// Media index shown, the project's cover.
    pub slot: usize,
    /// Resource shown.
    pub uri: MediaUri,
    /// Load state.
    pub status: SlotStatus,
    /// Whether this is the current project.
    pub active: bool,
}

/// A navigation waiting on its preload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionView {
    /// Catalogue index being navigated to.
    pub target: usize,
    /// Fade hosts apply meanwhile.
    pub fade_ms: u64,
}

/// What the modal's image area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalImageView {
    /// Loading indicator.
    Loading,
    /// A loaded image.
    Image {
        /// Resource shown.
        uri: MediaUri,
        /// Width in px.
        width: u32,
        /// Height in px.
        height: u32,
    },
    /// Load failed; nothing shown.
    Empty,
}

/// The open modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    /// Catalogue index of the project shown.
    pub project: usize,
    /// Localized project name.
    pub title: String,
    /// `"i / N"`.
    pub counter: String,
    /// Position among the project's images, 0-based.
    pub position: usize,
    /// Number of images in the project.
    pub count: usize,
    /// Media index of the image shown.
    pub media_index: usize,
    /// Image area state.
    pub image: ModalImageView,
    /// Whether the previous button is enabled.
    pub can_previous: bool,
    /// Whether the next button is enabled.
    pub can_next: bool,
}

/// Everything needed to draw the gallery once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    /// Active locale.
    pub locale: String,
    /// Catalogue index of the current project.
    pub project: usize,
    /// Number of projects.
    pub project_count: usize,
    /// Localized name of the current project.
    pub title: String,
    /// Primary surface, slot 0.
    pub primary: Option<PrimaryView>,
    /// Selected media index within the current project.
    pub image_index: usize,
    /// Detail thumbnails of the current project.
    pub details: Vec<SlotView>,
    /// Project strip.
    pub thumbnails: Vec<ThumbnailView>,
    /// Whether the navigation buttons are enabled.
    pub nav_enabled: bool,
    /// Set while a navigation is in flight.
    pub transition: Option<TransitionView>,
    /// Set while the modal is open.
    pub modal: Option<ModalView>,
    /// Whether page scrolling is suspended.
    pub scroll_locked: bool,
}

/// A gallery instance: one catalogue, one carousel, at most one modal.
pub struct Gallery {
    carousel: CarouselController,
    modal: Option<ModalController>,
    cache: MediaCache,
    localizer: Arc<dyn Localizer>,
    scroll: ScrollLock,
    settings: GallerySettings,
    modal_sessions: u64,
}

impl fmt::Debug for Gallery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gallery")
            .field("carousel", &self.carousel)
            .field("modal", &self.modal)
            .field("locale", &self.localizer.locale())
            .field("settings", &self.settings)
            .finish()
    }
}

impl Gallery {
    /// Gallery on `catalogue` with both cursors at 0 and the modal closed.
    pub fn new(
        catalogue: Arc<Catalogue>,
        cache: MediaCache,
        localizer: Arc<dyn Localizer>,
        scroll: ScrollLock,
        settings: GallerySettings,
    ) -> Self {
        Self {
            carousel: CarouselController::new(catalogue, cache.clone()),
            modal: None,
            cache,
            localizer,
            scroll,
            settings,
            modal_sessions: 0,
        }
    }

    /// The carousel.
    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    /// The open modal, if any.
    pub fn modal(&self) -> Option<&ModalController> {
        self.modal.as_ref()
    }

    /// The shared media cache.
    pub fn cache(&self) -> &MediaCache {
        &self.cache
    }

    /// Tuning in effect.
    pub fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    /// Whether the modal is open.
    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// State an [`crate::InputAdapter`] needs to route input.
    pub fn input_context(&self) -> InputContext {
        InputContext {
            modal_open: self.is_modal_open(),
            primary_is_frame: self.carousel.current().has_embedded_primary(),
            nav_enabled: self.carousel.nav_enabled(),
        }
    }

    /// Initial work: preload the starting project and its window.
    pub fn bootstrap(&mut self) -> Vec<Task> {
        let current = self.carousel.current_project();
        let mut tasks: Vec<Task> = self.warm(current).into_iter().collect();
        if self.settings.warm_window {
            tasks.extend(self.warm_window());
        }
        tasks
    }

    /// Apply a command. Returns the work it started.
    pub fn apply(&mut self, command: Command) -> Vec<Task> {
        debug!("applying command: {:?}", command);
        match command {
            Command::NextProject => {
                let navigation = self.carousel.next_project();
                self.navigated(navigation)
            }
            Command::PreviousProject => {
                let navigation = self.carousel.previous_project();
                self.navigated(navigation)
            }
            Command::GoToProject(index) => {
                let navigation = self.carousel.go_to_project(index);
                self.navigated(navigation)
            }
            Command::SelectSlot { project, position } => {
                match self.carousel.select_thumbnail_slot(project, position) {
                    SlotSelection::Ignored => Vec::new(),
                    SlotSelection::Immediate { project, image } => {
                        let mut tasks = self.open_modal(project, image);
                        if self.settings.warm_window {
                            tasks.extend(self.warm_window());
                        }
                        tasks
                    }
                    SlotSelection::Pending(task) => task.into_iter().collect(),
                }
            }
            Command::OpenPrimary => {
                if self.carousel.current().has_embedded_primary() {
                    return Vec::new();
                }
                let project = self.carousel.current_project();
                self.open_modal(project, 0)
            }
            Command::ModalNext => self.step_modal(ModalController::next),
            Command::ModalPrevious => {
                self.step_modal(ModalController::previous)
            }
            Command::CloseModal => {
                if let Some(modal) = self.modal.take() {
                    modal.close();
                }
                Vec::new()
            }
        }
    }

    /// Feed back the output of a finished [`Task`].
    pub fn settle(&mut self, settled: Settled) -> Vec<Task> {
        match settled {
            Settled::Preload {
                generation,
                target,
                report,
            } => match self.carousel.settle_preload(generation, target, &report)
            {
                Some(commit) => self.committed(commit),
                None => Vec::new(),
            },
            Settled::Warmed { project, report } => {
                debug!(
                    "warmed project: index={}, loaded={}, failed={}",
                    project,
                    report.loaded.len(),
                    report.failed.len()
                );
                Vec::new()
            }
            Settled::ModalImage {
                session,
                ticket,
                uri,
                outcome,
            } => {
                match self.modal.as_mut() {
                    Some(modal) if modal.session() == session => {
                        modal.settle(ticket, uri, outcome);
                    }
                    _ => debug!(
                        "discarding modal load for a closed session: session={}, uri={}",
                        session, uri
                    ),
                }
                Vec::new()
            }
        }
    }

    /// The locale switched. Cursors, window and modal stay as they are;
    /// the next frame picks up the new names.
    pub fn locale_changed(&mut self, locale: &str) {
        info!(
            "re-rendering for locale: {}, project={}",
            locale,
            self.carousel.current_project()
        );
    }

    /// Autoplay step. Does nothing while the modal is open or a navigation
    /// is in flight.
    pub fn autoplay_tick(&mut self) -> Vec<Task> {
        if self.is_modal_open() || self.carousel.is_transitioning() {
            return Vec::new();
        }
        self.apply(Command::NextProject)
    }

    /// Snapshot of everything a host draws.
    pub fn frame(&self) -> RenderFrame {
        let catalogue = self.carousel.catalogue();
        let current = self.carousel.current();
        let project = self.carousel.current_project();

        let primary = current.primary().map(|slot| match slot {
            MediaSlot::Image(uri) => PrimaryView::Image {
                uri: uri.clone(),
                status: self.cache.status(uri).into(),
            },
            MediaSlot::EmbeddedFrame(uri) => {
                PrimaryView::EmbeddedFrame { uri: uri.clone() }
            }
        });

        let details = SlotPosition::THUMBNAILS
            .iter()
            .filter_map(|&position| {
                let media_index = catalogue.media_index(project, position)?;
                let slot = current.slot(media_index)?;
                Some(SlotView {
                    position,
                    media_index,
                    uri: slot.uri().clone(),
                    embedded: slot.is_embedded_frame(),
                    status: self.cache.status(slot.uri()).into(),
                })
            })
            .collect();

        let thumbnails = self
            .carousel
            .thumbnails()
            .into_iter()
            .filter_map(|entry| {
                let listed = catalogue.get(entry.project)?;
                let uri = listed.slot(entry.slot)?.uri().clone();
                Some(ThumbnailView {
                    project: entry.project,
                    name: self.localizer.resolve(listed.display_name_key()),
                    slot: entry.slot,
                    status: self.cache.status(&uri).into(),
                    uri,
                    active: entry.active,
                })
            })
            .collect();

        let transition =
            self.carousel.pending_target().map(|target| TransitionView {
                target,
                fade_ms: self.settings.transition_fade_ms,
            });

        RenderFrame {
            locale: self.localizer.locale(),
            project,
            project_count: catalogue.len(),
            title: self.localizer.resolve(current.display_name_key()),
            primary,
            image_index: self.carousel.current_image(),
            details,
            thumbnails,
            nav_enabled: self.carousel.nav_enabled(),
            transition,
            modal: self.modal.as_ref().map(|modal| self.modal_view(modal)),
            scroll_locked: self.scroll.is_locked(),
        }
    }

    fn modal_view(&self, modal: &ModalController) -> ModalView {
        let title = self
            .carousel
            .catalogue()
            .get(modal.project())
            .map(|project| self.localizer.resolve(project.display_name_key()))
            .unwrap_or_default();
        let image = match modal.image() {
            ModalImage::Loading(_) => ModalImageView::Loading,
            ModalImage::Shown(media) => ModalImageView::Image {
                uri: media.uri.clone(),
                width: media.width,
                height: media.height,
            },
            ModalImage::Empty(_) => ModalImageView::Empty,
        };
        ModalView {
            project: modal.project(),
            title,
            counter: modal.counter(),
            position: modal.cursor(),
            count: modal.count(),
            media_index: modal.media_index(),
            image,
            can_previous: modal.can_previous(),
            can_next: modal.can_next(),
        }
    }

    fn navigated(&mut self, navigation: Navigation) -> Vec<Task> {
        match navigation {
            Navigation::Committed(commit) => self.committed(commit),
            Navigation::Pending(task) => vec![task],
            Navigation::Ignored | Navigation::Reverted => Vec::new(),
        }
    }

    fn committed(&mut self, commit: Commit) -> Vec<Task> {
        // The modal follows the carousel's project focus.
        if let Some(stale) = self
            .modal
            .take_if(|modal| modal.project() != commit.project)
        {
            debug!(
                "closing modal left on a previous project: modal={}, committed={}",
                stale.project(),
                commit.project
            );
            stale.close();
        }

        let mut tasks = Vec::new();
        if let Some(image) = commit.selected_image {
            tasks.extend(self.open_modal(commit.project, image));
        }
        if self.settings.warm_window {
            tasks.extend(self.warm_window());
        }
        tasks
    }

    fn open_modal(&mut self, project: usize, image: usize) -> Vec<Task> {
        // One modal at a time; the old guard is released before the new one
        // is taken.
        if let Some(previous) = self.modal.take() {
            previous.close();
        }
        // Opening on the project on display supersedes a navigation still
        // waiting on its preload.
        if self.carousel.is_transitioning()
            && project == self.carousel.current_project()
            && let Navigation::Reverted = self.carousel.go_to_project(project)
        {
            debug!("modal opened over a pending navigation, reverted it");
        }
        self.modal_sessions += 1;
        match ModalController::open(
            self.modal_sessions,
            self.carousel.catalogue(),
            project,
            image,
            self.cache.clone(),
            &self.scroll,
        ) {
            Some((modal, task)) => {
                self.modal = Some(modal);
                task.into_iter().collect()
            }
            None => {
                debug!("project has no images to show: index={}", project);
                Vec::new()
            }
        }
    }

    fn step_modal(
        &mut self,
        step: fn(&mut ModalController) -> Step,
    ) -> Vec<Task> {
        match self.modal.as_mut().map(step) {
            Some(Step::Moved(task)) => task.into_iter().collect(),
            Some(Step::Unchanged) | None => Vec::new(),
        }
    }

    /// Preload the window's other projects so stepping to them is instant.
    fn warm_window(&self) -> Vec<Task> {
        let current = self.carousel.current_project();
        self.carousel
            .window()
            .filter(|&index| index != current)
            .filter(|&index| {
                self.carousel
                    .catalogue()
                    .get(index)
                    .is_some_and(|project| !self.cache.is_preloaded(project.id()))
            })
            .filter_map(|index| self.warm(index))
            .collect()
    }

    fn warm(&self, index: usize) -> Option<Task> {
        let preload = self.cache.preload(self.carousel.catalogue().get(index)?);
        Some(
            async move {
                Settled::Warmed {
                    project: index,
                    report: preload.await,
                }
            }
            .boxed(),
        )
    }
}
