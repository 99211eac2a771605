//! Project carousel: catalogue focus, image focus and navigation.
//!
//! Navigation is two-phase. A request first preloads the target project and
//! only commits once that preload settles, so the primary surface never
//! switches to a half-loaded project. Every request bumps a generation
//! counter and a settling preload only commits if its generation is still
//! the latest: rapid clicking lands on the last requested project, never on
//! whichever preload happened to finish last.

use std::{fmt, ops::Range, sync::Arc};

use folio_model::{Catalogue, MediaSlot, Project, SlotPosition};
use futures::FutureExt;
use tracing::{debug, info};

use crate::{
    media_cache::{MediaCache, PreloadReport},
    task::{Settled, Task},
    window::{ThumbnailEntry, compute_window, thumbnail_entries},
};

/// The two cursors. `current_image` is reset to 0 whenever
/// `current_project` changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselState {
    /// Catalogue index of the project on display.
    pub current_project: usize,
    /// Media index within the current project.
    pub current_image: usize,
}

/// Whether a navigation is waiting on its preload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarouselPhase {
    /// Thumbnails and primary surface show the current project.
    #[default]
    Idle,
    /// Waiting on the preload of `target`.
    Transitioning {
        /// Catalogue index being navigated to.
        target: usize,
        /// Generation of the request.
        generation: u64,
    },
}

/// A committed navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    /// Catalogue index now on display.
    pub project: usize,
    /// Image picked through a thumbnail click that rode along with the
    /// navigation; the modal opens on it.
    pub selected_image: Option<usize>,
}

/// Result of a navigation request.
pub enum Navigation {
    /// Out of bounds, or already where the request points.
    Ignored,
    /// The target was cached and committed synchronously.
    Committed(Commit),
    /// The in-flight transition was dropped; the current project stays.
    Reverted,
    /// Poll the task and hand its result to [`CarouselController::settle_preload`].
    Pending(Task),
}

impl fmt::Debug for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Navigation::Ignored => f.write_str("Ignored"),
            Navigation::Committed(commit) => {
                f.debug_tuple("Committed").field(commit).finish()
            }
            Navigation::Reverted => f.write_str("Reverted"),
            Navigation::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Result of a thumbnail click.
pub enum SlotSelection {
    /// Unknown slot or out-of-bounds project.
    Ignored,
    /// The image cursor moved now; open the modal on it.
    Immediate {
        /// Catalogue index of the project.
        project: usize,
        /// Media index selected.
        image: usize,
    },
    /// Applied when the navigation to the clicked project commits. `None`
    /// when a task for that project is already in flight.
    Pending(Option<Task>),
}

impl fmt::Debug for SlotSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotSelection::Ignored => f.write_str("Ignored"),
            SlotSelection::Immediate { project, image } => f
                .debug_struct("Immediate")
                .field("project", project)
                .field("image", image)
                .finish(),
            SlotSelection::Pending(task) => f
                .debug_tuple("Pending")
                .field(&task.as_ref().map(|_| ".."))
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSelection {
    generation: u64,
    image: usize,
}

/// Owner of the two cursors and the navigation state machine.
pub struct CarouselController {
    catalogue: Arc<Catalogue>,
    cache: MediaCache,
    state: CarouselState,
    phase: CarouselPhase,
    generation: u64,
    pending_selection: Option<PendingSelection>,
    window: Range<usize>,
}

impl fmt::Debug for CarouselController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselController")
            .field("projects", &self.catalogue.len())
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("generation", &self.generation)
            .field("window", &self.window)
            .finish()
    }
}

impl CarouselController {
    /// Both cursors start at 0.
    pub fn new(catalogue: Arc<Catalogue>, cache: MediaCache) -> Self {
        let window = compute_window(catalogue.len(), 0);
        Self {
            catalogue,
            cache,
            state: CarouselState::default(),
            phase: CarouselPhase::Idle,
            generation: 0,
            pending_selection: None,
            window,
        }
    }

    /// The catalogue being browsed.
    pub fn catalogue(&self) -> &Arc<Catalogue> {
        &self.catalogue
    }

    /// The cache shared with the modal.
    pub fn cache(&self) -> &MediaCache {
        &self.cache
    }

    /// Snapshot of both cursors.
    pub fn state(&self) -> CarouselState {
        self.state
    }

    /// Whether a navigation is in flight.
    pub fn phase(&self) -> CarouselPhase {
        self.phase
    }

    /// Catalogue index of the project on display.
    pub fn current_project(&self) -> usize {
        self.state.current_project
    }

    /// Media index selected within the current project.
    pub fn current_image(&self) -> usize {
        self.state.current_image
    }

    /// Generation of the latest navigation request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a navigation preload is in flight.
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, CarouselPhase::Transitioning { .. })
    }

    /// Navigation buttons are disabled, not blocked, while a preload is in
    /// flight.
    pub fn nav_enabled(&self) -> bool {
        !self.is_transitioning()
    }

    /// Project the in-flight navigation is heading to.
    pub fn pending_target(&self) -> Option<usize> {
        match self.phase {
            CarouselPhase::Transitioning { target, .. } => Some(target),
            CarouselPhase::Idle => None,
        }
    }

    /// The project on display.
    pub fn current(&self) -> &Project {
        &self.catalogue.projects()[self.state.current_project]
    }

    /// Slot 0 of the current project.
    pub fn primary_surface(&self) -> Option<&MediaSlot> {
        self.current().primary()
    }

    /// Project indices of the thumbnail strip as of the last commit.
    pub fn window(&self) -> Range<usize> {
        self.window.clone()
    }

    /// Entries of the project strip, with the current project marked active.
    pub fn thumbnails(&self) -> Vec<ThumbnailEntry> {
        thumbnail_entries(
            &self.catalogue,
            self.window.clone(),
            self.state.current_project,
        )
    }

    /// Navigate to the project at `index`.
    pub fn go_to_project(&mut self, index: usize) -> Navigation {
        if index >= self.catalogue.len() {
            debug!(
                "ignoring out-of-bounds navigation: index={}, total={}",
                index,
                self.catalogue.len()
            );
            return Navigation::Ignored;
        }

        match self.phase {
            CarouselPhase::Transitioning { target, .. } if target == index => {
                return Navigation::Ignored;
            }
            CarouselPhase::Transitioning { target, .. }
                if index == self.state.current_project =>
            {
                self.generation += 1;
                self.phase = CarouselPhase::Idle;
                self.pending_selection = None;
                debug!(
                    "navigation returned to current project: index={}, dropped_target={}",
                    index, target
                );
                return Navigation::Reverted;
            }
            CarouselPhase::Idle if index == self.state.current_project => {
                return Navigation::Ignored;
            }
            _ => {}
        }

        let catalogue = Arc::clone(&self.catalogue);
        let project = &catalogue.projects()[index];

        self.generation += 1;
        let generation = self.generation;
        self.pending_selection = None;

        if self.cache.is_preloaded(project.id()) {
            return Navigation::Committed(self.commit(index));
        }

        self.phase = CarouselPhase::Transitioning {
            target: index,
            generation,
        };
        debug!(
            "navigation started: target={}, project={}, generation={}",
            index,
            project.id(),
            generation
        );

        let preload = self.cache.preload(project);
        Navigation::Pending(
            async move {
                Settled::Preload {
                    generation,
                    target: index,
                    report: preload.await,
                }
            }
            .boxed(),
        )
    }

    /// Advance one project, wrapping past the last to the first.
    pub fn next_project(&mut self) -> Navigation {
        let base = self.pending_target().unwrap_or(self.state.current_project);
        self.go_to_project(self.catalogue.wrap_next(base))
    }

    /// Step back one project, wrapping past the first to the last.
    pub fn previous_project(&mut self) -> Navigation {
        let base = self.pending_target().unwrap_or(self.state.current_project);
        self.go_to_project(self.catalogue.wrap_previous(base))
    }

    /// A thumbnail of `project` at `position` was clicked.
    pub fn select_thumbnail_slot(
        &mut self,
        project: usize,
        position: SlotPosition,
    ) -> SlotSelection {
        let Some(image) = self.catalogue.media_index(project, position) else {
            debug!(
                "ignoring thumbnail selection: project={}, position={}",
                project, position
            );
            return SlotSelection::Ignored;
        };

        match self.go_to_project(project) {
            Navigation::Pending(task) => {
                self.pending_selection = Some(PendingSelection {
                    generation: self.generation,
                    image,
                });
                SlotSelection::Pending(Some(task))
            }
            Navigation::Committed(_) | Navigation::Reverted => {
                self.state.current_image = image;
                SlotSelection::Immediate { project, image }
            }
            Navigation::Ignored if project == self.state.current_project => {
                self.state.current_image = image;
                SlotSelection::Immediate { project, image }
            }
            Navigation::Ignored => {
                // Already heading to `project`; ride along with that request.
                self.pending_selection = Some(PendingSelection {
                    generation: self.generation,
                    image,
                });
                SlotSelection::Pending(None)
            }
        }
    }

    /// Apply a settled navigation preload. Returns the commit, or `None` when
    /// a newer request superseded it.
    pub fn settle_preload(
        &mut self,
        generation: u64,
        target: usize,
        report: &PreloadReport,
    ) -> Option<Commit> {
        match self.phase {
            CarouselPhase::Transitioning {
                target: pending,
                generation: current,
            } if current == generation && pending == target => {
                if !report.is_complete() {
                    debug!(
                        "committing with empty slots: project={}, failed={}",
                        report.project,
                        report.failed.len()
                    );
                }
                Some(self.commit(target))
            }
            _ => {
                debug!(
                    "discarding stale preload: target={}, generation={}, latest={}",
                    target, generation, self.generation
                );
                None
            }
        }
    }

    fn commit(&mut self, index: usize) -> Commit {
        self.phase = CarouselPhase::Idle;
        self.state = CarouselState {
            current_project: index,
            current_image: 0,
        };
        self.window = compute_window(self.catalogue.len(), index);

        let generation = self.generation;
        let selected_image = self
            .pending_selection
            .take()
            .filter(|selection| selection.generation == generation)
            .map(|selection| selection.image);
        if let Some(image) = selected_image {
            self.state.current_image = image;
        }

        info!(
            "project committed: index={}, window={:?}, generation={}",
            index, self.window, generation
        );
        Commit {
            project: index,
            selected_image,
        }
    }
}
