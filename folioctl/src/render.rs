//! Plain-text rendering of gallery frames.

use std::{fmt::Write as _, io::Write};

use folio_core::{
    ModalImageView, PrimaryView, RenderFrame, RenderSink, SlotStatus,
};

pub fn render_frame(frame: &RenderFrame) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[{}/{}] {} ({}){}",
        frame.project + 1,
        frame.project_count,
        frame.title,
        frame.locale,
        if frame.nav_enabled { "" } else { " nav:off" }
    );

    match &frame.primary {
        Some(PrimaryView::Image { uri, status }) => {
            let _ = writeln!(out, "  primary  {} {}", uri, status_label(status));
        }
        Some(PrimaryView::EmbeddedFrame { uri }) => {
            let _ = writeln!(out, "  primary  {} [frame]", uri);
        }
        None => {}
    }

    for slot in &frame.details {
        let _ = writeln!(
            out,
            "  {:<8} #{} {} {}",
            slot.position.label(),
            slot.media_index,
            slot.uri,
            if slot.embedded {
                "[frame]".to_string()
            } else {
                status_label(&slot.status)
            }
        );
    }

    let strip: Vec<String> = frame
        .thumbnails
        .iter()
        .map(|thumb| {
            if thumb.active {
                format!("*{}:{}*", thumb.project, thumb.name)
            } else {
                format!("{}:{}", thumb.project, thumb.name)
            }
        })
        .collect();
    let _ = writeln!(out, "  strip    {}", strip.join("  "));

    if let Some(transition) = &frame.transition {
        let _ = writeln!(
            out,
            "  fading to {} ({}ms)",
            transition.target, transition.fade_ms
        );
    }

    if let Some(modal) = &frame.modal {
        let image = match &modal.image {
            ModalImageView::Loading => "loading".to_string(),
            ModalImageView::Image { uri, width, height } => {
                format!("{uri} {width}x{height}")
            }
            ModalImageView::Empty => "empty".to_string(),
        };
        let _ = writeln!(
            out,
            "  modal    {} {} #{} {}{}{}",
            modal.title,
            modal.counter,
            modal.media_index,
            image,
            if modal.can_previous { " <" } else { "" },
            if modal.can_next { " >" } else { "" },
        );
    }

    out
}

fn status_label(status: &SlotStatus) -> String {
    match status {
        SlotStatus::Ready { width, height } => format!("{width}x{height}"),
        SlotStatus::Loading => "loading".to_string(),
        SlotStatus::Empty => "empty".to_string(),
        SlotStatus::Idle => "idle".to_string(),
    }
}

/// Writes each frame to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl RenderSink for StdoutSink {
    fn render(&mut self, frame: &RenderFrame) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", render_frame(frame));
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use folio_core::{ModalView, SlotView, ThumbnailView, TransitionView};
    use folio_model::{MediaUri, SlotPosition};

    use super::*;

    fn frame() -> RenderFrame {
        RenderFrame {
            locale: "en".into(),
            project: 1,
            project_count: 5,
            title: "Harbour".into(),
            primary: Some(PrimaryView::EmbeddedFrame {
                uri: MediaUri::new("https://frames.test/harbour"),
            }),
            image_index: 0,
            details: vec![SlotView {
                position: SlotPosition::Large,
                media_index: 1,
                uri: MediaUri::new("img/harbour-1.webp"),
                embedded: false,
                status: SlotStatus::Ready {
                    width: 640,
                    height: 480,
                },
            }],
            thumbnails: vec![
                ThumbnailView {
                    project: 0,
                    name: "Atrium".into(),
                    slot: 0,
                    uri: MediaUri::new("img/atrium-0.webp"),
                    status: SlotStatus::Idle,
                    active: false,
                },
                ThumbnailView {
                    project: 1,
                    name: "Harbour".into(),
                    slot: 1,
                    uri: MediaUri::new("img/harbour-1.webp"),
                    status: SlotStatus::Loading,
                    active: true,
                },
            ],
            nav_enabled: false,
            transition: Some(TransitionView {
                target: 2,
                fade_ms: 150,
            }),
            modal: None,
            scroll_locked: false,
        }
    }

    #[test]
    fn frames_render_one_line_per_part() {
        let text = render_frame(&frame());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "[2/5] Harbour (en) nav:off");
        assert_eq!(lines[1], "  primary  https://frames.test/harbour [frame]");
        assert!(lines[2].contains("#1 img/harbour-1.webp 640x480"));
        assert_eq!(lines[3], "  strip    0:Atrium  *1:Harbour*");
        assert_eq!(lines[4], "  fading to 2 (150ms)");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn open_modal_shows_counter_and_arrows() {
        let mut frame = frame();
        frame.modal = Some(ModalView {
            project: 1,
            title: "Harbour".into(),
            counter: "1 / 3".into(),
            position: 0,
            count: 3,
            media_index: 1,
            image: ModalImageView::Loading,
            can_previous: false,
            can_next: true,
        });

        let text = render_frame(&frame);
        assert!(text.ends_with("  modal    Harbour 1 / 3 #1 loading >\n"));
    }
}
