//! Folio gallery engine.
//!
//! A headless model of a project carousel with a full-screen modal viewer:
//! the catalogue and its two cursors, the 3-item thumbnail window, a shared
//! single-flight media cache, keyboard/pointer translation and a
//! single-threaded runtime that turns all of it into render frames.
//!
//! State changes happen synchronously through `&mut` methods. Anything that
//! waits on media comes back as a [`Task`]; the caller polls it and hands the
//! resulting [`Settled`] value back to [`Gallery::settle`]. Stale results are
//! recognised by generation and dropped.

pub mod carousel;
pub mod error;
pub mod gallery;
pub mod input;
pub mod localization;
pub mod media_cache;
pub mod modal;
pub mod runtime;
pub mod scroll;
pub mod settings;
pub mod task;
pub mod window;

pub use carousel::{CarouselController, CarouselPhase, CarouselState};
pub use error::{LocaleError, MediaError};
pub use gallery::{
    Gallery, ModalImageView, ModalView, PrimaryView, RenderFrame, SlotStatus,
    SlotView, ThumbnailView, TransitionView,
};
pub use input::{
    ClickTarget, Command, InputAdapter, InputContext, InputEvent, Key, Surface,
};
pub use localization::{DEFAULT_LOCALE, Translations};
pub use media_cache::{
    CacheStats, DecodedMedia, ImageDecoder, MediaCache, MediaDecoder,
    PreloadReport, ResourceStatus,
};
pub use modal::ModalController;
pub use runtime::{GalleryEvent, GalleryHandle, GalleryRuntime, RenderSink};
pub use scroll::{PageScroll, ScrollGuard, ScrollLock};
pub use settings::GallerySettings;
pub use task::{Settled, Task};
pub use window::{WINDOW_SIZE, compute_window};
