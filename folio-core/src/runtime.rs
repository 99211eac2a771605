//! Single-threaded driver for a [`Gallery`].
//!
//! One `select!` loop multiplexes host input, settled media tasks, locale
//! changes and the optional autoplay ticker. Tasks are polled in place from
//! a `FuturesUnordered`; nothing is spawned. After every event the current
//! [`RenderFrame`] is compared with the last one emitted and handed to the
//! [`RenderSink`] only when it changed.

use std::{fmt, time::Duration};

use folio_contracts::locale::LocaleSubscription;
use futures::{StreamExt, future, stream::FuturesUnordered};
use tokio::{
    sync::mpsc,
    time::{self, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    gallery::{Gallery, RenderFrame},
    input::{Command, InputAdapter, InputEvent},
    task::Task,
};

/// Receives every distinct frame the gallery produces.
pub trait RenderSink {
    /// Draw `frame`.
    fn render(&mut self, frame: &RenderFrame);
}

impl<F> RenderSink for F
where
    F: FnMut(&RenderFrame),
{
    fn render(&mut self, frame: &RenderFrame) {
        self(frame)
    }
}

/// What a host can push into a running gallery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GalleryEvent {
    /// Raw input, routed through the [`InputAdapter`].
    Input(InputEvent),
    /// A command applied directly, bypassing input routing.
    Command(Command),
}

/// Sending side of a running gallery. The runtime stops once every handle
/// is dropped and the outstanding tasks have settled.
#[derive(Debug, Clone)]
pub struct GalleryHandle {
    tx: mpsc::UnboundedSender<GalleryEvent>,
}

impl GalleryHandle {
    /// Returns `false` when the runtime has already stopped.
    pub fn send(&self, event: GalleryEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Send raw input.
    pub fn input(&self, event: InputEvent) -> bool {
        self.send(GalleryEvent::Input(event))
    }

    /// Send a command.
    pub fn command(&self, command: Command) -> bool {
        self.send(GalleryEvent::Command(command))
    }
}

/// Event loop owning a [`Gallery`] for the length of a session.
pub struct GalleryRuntime {
    gallery: Gallery,
    adapter: InputAdapter,
    locale: LocaleSubscription,
    sink: Box<dyn RenderSink>,
    rx: mpsc::UnboundedReceiver<GalleryEvent>,
    autoplay: Option<Duration>,
    last: Option<RenderFrame>,
    frames: u64,
}

impl fmt::Debug for GalleryRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryRuntime")
            .field("gallery", &self.gallery)
            .field("adapter", &self.adapter)
            .field("locale", &self.locale)
            .field("autoplay", &self.autoplay)
            .field("frames", &self.frames)
            .finish()
    }
}

impl GalleryRuntime {
    /// Runtime for `gallery` and the handle that feeds it.
    pub fn new(
        gallery: Gallery,
        locale: LocaleSubscription,
        sink: impl RenderSink + 'static,
    ) -> (Self, GalleryHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let settings = gallery.settings();
        let adapter = InputAdapter::new(settings.swipe_threshold_px);
        let autoplay = settings.autoplay_interval();

        let runtime = Self {
            gallery,
            adapter,
            locale,
            sink: Box::new(sink),
            rx,
            autoplay,
            last: None,
            frames: 0,
        };
        (runtime, GalleryHandle { tx })
    }

    /// Drive the gallery until every [`GalleryHandle`] is gone and no task
    /// is outstanding. Returns the gallery in its final state.
    pub async fn run(mut self) -> Gallery {
        let mut tasks: FuturesUnordered<Task> = FuturesUnordered::new();
        tasks.extend(self.gallery.bootstrap());
        self.emit();

        let mut autoplay = self.autoplay.map(|period| {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        let mut inputs_open = true;
        info!(
            "gallery runtime started: projects={}, autoplay={:?}",
            self.gallery.carousel().catalogue().len(),
            self.autoplay
        );

        loop {
            if !inputs_open && tasks.is_empty() {
                break;
            }

            tokio::select! {
                event = self.rx.recv(), if inputs_open => match event {
                    Some(event) => tasks.extend(self.handle(event)),
                    None => {
                        debug!("all gallery handles dropped, draining tasks: {}", tasks.len());
                        inputs_open = false;
                    }
                },
                Some(settled) = tasks.next(), if !tasks.is_empty() => {
                    tasks.extend(self.gallery.settle(settled));
                }
                locale = self.locale.changed(), if self.locale.is_active() => {
                    if let Some(locale) = locale {
                        self.gallery.locale_changed(&locale);
                    }
                }
                _ = tick(&mut autoplay), if inputs_open && autoplay.is_some() => {
                    tasks.extend(self.gallery.autoplay_tick());
                }
            }

            self.emit();
        }

        info!("gallery runtime stopped: frames={}", self.frames);
        self.gallery
    }

    fn handle(&mut self, event: GalleryEvent) -> Vec<Task> {
        match event {
            GalleryEvent::Input(input) => {
                let ctx = self.gallery.input_context();
                match self.adapter.translate(input, ctx) {
                    Some(command) => self.gallery.apply(command),
                    None => Vec::new(),
                }
            }
            GalleryEvent::Command(command) => self.gallery.apply(command),
        }
    }

    fn emit(&mut self) {
        let frame = self.gallery.frame();
        if self.last.as_ref() == Some(&frame) {
            return;
        }
        self.sink.render(&frame);
        self.frames += 1;
        self.last = Some(frame);
    }
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending().await,
    }
}
