//! Translation of raw keyboard, pointer and touch events into gallery
//! commands.
//!
//! Routing depends on whether the modal is open; exactly one interpretation
//! is active at a time. Embedded-frame surfaces are never captured so the
//! embedded content keeps its own interaction.

use folio_model::SlotPosition;

/// Keys the gallery reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Previous project, or previous image while the modal is open.
    ArrowLeft,
    /// Next project, or next image while the modal is open.
    ArrowRight,
    /// Closes the modal.
    Escape,
    /// Anything else; ignored.
    Other,
}

/// Surface a touch started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Primary surface showing an image.
    Primary,
    /// Primary surface showing an embedded frame.
    EmbeddedFrame,
    /// The project strip or the detail thumbnails.
    Thumbnails,
    /// The open modal's image area.
    Modal,
}

/// Element a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A thumbnail of `project` at `position`; covers both the project strip
    /// and the detail thumbnails of the current project.
    Thumbnail {
        /// Catalogue index of the project the thumbnail belongs to.
        project: usize,
        /// Slot the thumbnail shows.
        position: SlotPosition,
    },
    /// The primary surface of the current project.
    PrimarySurface,
    /// Previous-project button.
    NavPrevious,
    /// Next-project button.
    NavNext,
    /// Previous-image button inside the modal.
    ModalPrevious,
    /// Next-image button inside the modal.
    ModalNext,
    /// The modal's close button.
    ModalClose,
    /// The dimmed area around the modal image.
    ModalBackdrop,
}

/// Raw host input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key press.
    Key(Key),
    /// A touch began at `(x, y)` on `surface`.
    TouchStart {
        /// Horizontal position in px.
        x: f32,
        /// Vertical position in px.
        y: f32,
        /// Surface under the touch.
        surface: Surface,
    },
    /// The touch began by the last [`InputEvent::TouchStart`] ended.
    TouchEnd {
        /// Horizontal position in px.
        x: f32,
        /// Vertical position in px.
        y: f32,
    },
    /// A click or tap.
    Click(ClickTarget),
}

/// Controller operation an input resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Advance one project, wrapping at the end.
    NextProject,
    /// Step back one project, wrapping at the start.
    PreviousProject,
    /// Navigate to a catalogue index.
    GoToProject(usize),
    /// Select a slot of a project and open the modal on it.
    SelectSlot {
        /// Catalogue index of the project.
        project: usize,
        /// Slot that was picked.
        position: SlotPosition,
    },
    /// Open the modal on the current project at image index 0.
    OpenPrimary,
    /// Next image in the modal; clamped.
    ModalNext,
    /// Previous image in the modal; clamped.
    ModalPrevious,
    /// Close the modal.
    CloseModal,
}

/// Gallery state the adapter routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputContext {
    /// Whether the modal is open.
    pub modal_open: bool,
    /// Whether the current project's primary slot is an embedded frame.
    pub primary_is_frame: bool,
    /// Whether the navigation buttons accept clicks. False while a
    /// navigation preload is in flight.
    pub nav_enabled: bool,
}

impl Default for InputContext {
    fn default() -> Self {
        Self {
            modal_open: false,
            primary_is_frame: false,
            nav_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchOrigin {
    x: f32,
    y: f32,
    surface: Surface,
}

/// Stateful translator from [`InputEvent`]s to [`Command`]s. Holds the
/// origin of the touch in progress.
#[derive(Debug, Clone)]
pub struct InputAdapter {
    swipe_threshold: f32,
    touch: Option<TouchOrigin>,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl InputAdapter {
    /// Adapter recognising swipes longer than `swipe_threshold` px.
    pub fn new(swipe_threshold: f32) -> Self {
        Self {
            swipe_threshold: swipe_threshold.max(0.0),
            touch: None,
        }
    }

    /// Minimum horizontal travel of a swipe, in px.
    pub fn swipe_threshold(&self) -> f32 {
        self.swipe_threshold
    }

    /// Command for `event`, if it maps to one under `ctx`.
    pub fn translate(
        &mut self,
        event: InputEvent,
        ctx: InputContext,
    ) -> Option<Command> {
        match event {
            InputEvent::Key(key) => Self::key(key, ctx),
            InputEvent::TouchStart { x, y, surface } => {
                self.touch = (surface != Surface::EmbeddedFrame)
                    .then_some(TouchOrigin { x, y, surface });
                None
            }
            InputEvent::TouchEnd { x, y } => {
                let origin = self.touch.take()?;
                self.swipe(origin, x, y, ctx)
            }
            InputEvent::Click(target) => Self::click(target, ctx),
        }
    }

    fn key(key: Key, ctx: InputContext) -> Option<Command> {
        match (ctx.modal_open, key) {
            (true, Key::ArrowLeft) => Some(Command::ModalPrevious),
            (true, Key::ArrowRight) => Some(Command::ModalNext),
            (true, Key::Escape) => Some(Command::CloseModal),
            (false, Key::ArrowLeft) => Some(Command::PreviousProject),
            (false, Key::ArrowRight) => Some(Command::NextProject),
            _ => None,
        }
    }

    fn swipe(
        &self,
        origin: TouchOrigin,
        x: f32,
        y: f32,
        ctx: InputContext,
    ) -> Option<Command> {
        let dx = x - origin.x;
        let dy = y - origin.y;
        if dx.abs() <= dy.abs() || dx.abs() <= self.swipe_threshold {
            return None;
        }
        let forward = dx < 0.0;

        match (ctx.modal_open, origin.surface) {
            (true, Surface::Modal) => Some(if forward {
                Command::ModalNext
            } else {
                Command::ModalPrevious
            }),
            (false, Surface::Primary | Surface::Thumbnails) => Some(if forward {
                Command::NextProject
            } else {
                Command::PreviousProject
            }),
            _ => None,
        }
    }

    fn click(target: ClickTarget, ctx: InputContext) -> Option<Command> {
        match target {
            ClickTarget::Thumbnail { project, position } => {
                Some(Command::SelectSlot { project, position })
            }
            ClickTarget::PrimarySurface if ctx.primary_is_frame => None,
            ClickTarget::PrimarySurface => Some(Command::OpenPrimary),
            ClickTarget::NavPrevious | ClickTarget::NavNext
                if !ctx.nav_enabled =>
            {
                None
            }
            ClickTarget::NavPrevious => Some(Command::PreviousProject),
            ClickTarget::NavNext => Some(Command::NextProject),
            ClickTarget::ModalPrevious if ctx.modal_open => {
                Some(Command::ModalPrevious)
            }
            ClickTarget::ModalNext if ctx.modal_open => Some(Command::ModalNext),
            ClickTarget::ModalClose | ClickTarget::ModalBackdrop
                if ctx.modal_open =>
            {
                Some(Command::CloseModal)
            }
            ClickTarget::ModalPrevious
            | ClickTarget::ModalNext
            | ClickTarget::ModalClose
            | ClickTarget::ModalBackdrop => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOSED: InputContext = InputContext {
        modal_open: false,
        primary_is_frame: false,
        nav_enabled: true,
    };
    const OPEN: InputContext = InputContext {
        modal_open: true,
        primary_is_frame: false,
        nav_enabled: true,
    };
    const TRANSITIONING: InputContext = InputContext {
        modal_open: false,
        primary_is_frame: false,
        nav_enabled: false,
    };

    fn swipe(
        adapter: &mut InputAdapter,
        surface: Surface,
        from: (f32, f32),
        to: (f32, f32),
        ctx: InputContext,
    ) -> Option<Command> {
        adapter.translate(
            InputEvent::TouchStart {
                x: from.0,
                y: from.1,
                surface,
            },
            ctx,
        );
        adapter.translate(InputEvent::TouchEnd { x: to.0, y: to.1 }, ctx)
    }

    #[test]
    fn arrow_keys_follow_modal_state() {
        let mut adapter = InputAdapter::default();
        let left = InputEvent::Key(Key::ArrowLeft);
        let right = InputEvent::Key(Key::ArrowRight);

        assert_eq!(
            adapter.translate(left, CLOSED),
            Some(Command::PreviousProject)
        );
        assert_eq!(adapter.translate(right, CLOSED), Some(Command::NextProject));
        assert_eq!(adapter.translate(left, OPEN), Some(Command::ModalPrevious));
        assert_eq!(adapter.translate(right, OPEN), Some(Command::ModalNext));
    }

    #[test]
    fn escape_only_acts_on_an_open_modal() {
        let mut adapter = InputAdapter::default();
        let esc = InputEvent::Key(Key::Escape);
        assert_eq!(adapter.translate(esc, CLOSED), None);
        assert_eq!(adapter.translate(esc, OPEN), Some(Command::CloseModal));
        assert_eq!(adapter.translate(InputEvent::Key(Key::Other), OPEN), None);
    }

    #[test]
    fn horizontal_swipes_navigate_projects() {
        let mut adapter = InputAdapter::new(50.0);
        assert_eq!(
            swipe(&mut adapter, Surface::Primary, (300.0, 100.0), (200.0, 110.0), CLOSED),
            Some(Command::NextProject)
        );
        assert_eq!(
            swipe(&mut adapter, Surface::Primary, (100.0, 100.0), (220.0, 90.0), CLOSED),
            Some(Command::PreviousProject)
        );
    }

    #[test]
    fn short_or_vertical_swipes_are_ignored() {
        let mut adapter = InputAdapter::new(50.0);
        assert_eq!(
            swipe(&mut adapter, Surface::Primary, (100.0, 100.0), (140.0, 100.0), CLOSED),
            None
        );
        assert_eq!(
            swipe(&mut adapter, Surface::Primary, (100.0, 100.0), (30.0, 300.0), CLOSED),
            None
        );
        assert_eq!(adapter.translate(InputEvent::TouchEnd { x: 0.0, y: 0.0 }, CLOSED), None);
    }

    #[test]
    fn embedded_frames_are_not_captured() {
        let mut adapter = InputAdapter::new(50.0);
        assert_eq!(
            swipe(
                &mut adapter,
                Surface::EmbeddedFrame,
                (300.0, 100.0),
                (0.0, 100.0),
                CLOSED
            ),
            None
        );
    }

    #[test]
    fn swipes_inside_an_open_modal_move_the_modal_cursor() {
        let mut adapter = InputAdapter::new(50.0);
        assert_eq!(
            swipe(&mut adapter, Surface::Modal, (300.0, 100.0), (100.0, 100.0), OPEN),
            Some(Command::ModalNext)
        );
        assert_eq!(
            swipe(&mut adapter, Surface::Primary, (300.0, 100.0), (100.0, 100.0), OPEN),
            None
        );
    }

    #[test]
    fn primary_clicks_pass_through_embedded_frames() {
        let mut adapter = InputAdapter::default();
        let click = InputEvent::Click(ClickTarget::PrimarySurface);
        assert_eq!(adapter.translate(click, CLOSED), Some(Command::OpenPrimary));
        assert_eq!(
            adapter.translate(
                click,
                InputContext {
                    primary_is_frame: true,
                    ..CLOSED
                }
            ),
            None
        );
    }

    #[test]
    fn thumbnail_clicks_select_slots() {
        let mut adapter = InputAdapter::default();
        let click = InputEvent::Click(ClickTarget::Thumbnail {
            project: 3,
            position: SlotPosition::SmallOne,
        });
        assert_eq!(
            adapter.translate(
                click,
                InputContext {
                    primary_is_frame: true,
                    ..CLOSED
                }
            ),
            Some(Command::SelectSlot {
                project: 3,
                position: SlotPosition::SmallOne,
            })
        );
    }

    #[test]
    fn modal_buttons_are_inert_while_closed() {
        let mut adapter = InputAdapter::default();
        for target in [
            ClickTarget::ModalNext,
            ClickTarget::ModalPrevious,
            ClickTarget::ModalClose,
            ClickTarget::ModalBackdrop,
        ] {
            assert_eq!(adapter.translate(InputEvent::Click(target), CLOSED), None);
        }
        assert_eq!(
            adapter.translate(InputEvent::Click(ClickTarget::ModalBackdrop), OPEN),
            Some(Command::CloseModal)
        );
    }

    #[test]
    fn nav_buttons_are_disabled_during_a_transition() {
        let mut adapter = InputAdapter::default();
        let next = InputEvent::Click(ClickTarget::NavNext);
        let previous = InputEvent::Click(ClickTarget::NavPrevious);

        assert_eq!(adapter.translate(next, CLOSED), Some(Command::NextProject));
        assert_eq!(
            adapter.translate(previous, CLOSED),
            Some(Command::PreviousProject)
        );
        assert_eq!(adapter.translate(next, TRANSITIONING), None);
        assert_eq!(adapter.translate(previous, TRANSITIONING), None);

        // Keys and swipes still feed the latest request.
        assert_eq!(
            adapter.translate(InputEvent::Key(Key::ArrowRight), TRANSITIONING),
            Some(Command::NextProject)
        );
        assert_eq!(
            swipe(
                &mut adapter,
                Surface::Primary,
                (300.0, 100.0),
                (100.0, 100.0),
                TRANSITIONING
            ),
            Some(Command::NextProject)
        );
    }
}
