//! The assembled gallery and its runtime.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Result;
use folio_contracts::locale::Localizer;
use folio_core::{
    ClickTarget, Command, GallerySettings, GalleryRuntime, InputAdapter,
    InputEvent, ModalImageView, PrimaryView, RenderFrame, SlotStatus,
};
use folio_model::{Catalogue, CatalogueVariant, SlotPosition};

#[path = "support/mod.rs"]
mod support;

use support::{Harness, frame_project, image_project, quad_catalogue};

fn framed_catalogue() -> Result<Arc<Catalogue>> {
    Ok(Arc::new(Catalogue::new(
        CatalogueVariant::Quad,
        vec![frame_project(0, 4), image_project(1, 4), image_project(2, 4)],
    )?))
}

#[tokio::test]
async fn embedded_primary_does_not_open_the_modal() -> Result<()> {
    let mut h = Harness::new(framed_catalogue()?);
    let tasks = h.gallery.bootstrap();
    h.drain(tasks).await;

    let mut adapter = InputAdapter::default();
    let click = InputEvent::Click(ClickTarget::PrimarySurface);
    assert_eq!(adapter.translate(click, h.gallery.input_context()), None);

    let tasks = h.gallery.apply(Command::OpenPrimary);
    assert!(tasks.is_empty());
    assert!(!h.gallery.is_modal_open());

    let frame = h.gallery.frame();
    assert!(matches!(frame.primary, Some(PrimaryView::EmbeddedFrame { .. })));

    let tasks = h.gallery.apply(Command::SelectSlot {
        project: 0,
        position: SlotPosition::SmallOne,
    });
    h.drain(tasks).await;

    let modal = h.gallery.frame().modal.expect("modal opened");
    assert_eq!(modal.media_index, 2);
    assert_eq!(modal.counter, "2 / 3");
    assert!(matches!(modal.image, ModalImageView::Image { .. }));
    assert!(h.page.is_suspended());
    Ok(())
}

#[tokio::test]
async fn image_primary_opens_the_modal_at_the_first_image() -> Result<()> {
    let mut h = Harness::new(quad_catalogue(3)?);
    let tasks = h.gallery.apply(Command::OpenPrimary);
    assert_eq!(tasks.len(), 1);
    assert!(matches!(
        h.gallery.frame().modal.map(|m| m.image),
        Some(ModalImageView::Loading)
    ));

    h.drain(tasks).await;
    let frame = h.gallery.frame();
    let modal = frame.modal.expect("modal open");
    assert_eq!(modal.counter, "1 / 4");
    assert!(frame.scroll_locked);

    h.gallery.apply(Command::CloseModal);
    assert!(!h.gallery.is_modal_open());
    assert!(!h.page.is_suspended());
    Ok(())
}

#[tokio::test]
async fn selecting_another_projects_slot_opens_after_the_commit() -> Result<()> {
    let mut h = Harness::with_settings(
        quad_catalogue(6)?,
        GallerySettings {
            warm_window: false,
            ..GallerySettings::default()
        },
    );

    let tasks = h.gallery.apply(Command::SelectSlot {
        project: 4,
        position: SlotPosition::Large,
    });
    assert!(!h.gallery.is_modal_open());
    assert!(!h.gallery.frame().nav_enabled);

    h.drain(tasks).await;
    let frame = h.gallery.frame();
    assert_eq!(frame.project, 4);
    assert_eq!(frame.image_index, 1);
    assert_eq!(frame.modal.map(|m| m.media_index), Some(1));
    assert!(frame.nav_enabled);
    Ok(())
}

#[tokio::test]
async fn committed_navigation_warms_the_window() -> Result<()> {
    let mut h = Harness::new(quad_catalogue(8)?);

    let tasks = h.gallery.apply(Command::GoToProject(4));
    h.drain(tasks).await;

    let frame = h.gallery.frame();
    let strip: Vec<usize> = frame.thumbnails.iter().map(|t| t.project).collect();
    assert_eq!(strip, vec![3, 4, 5]);
    assert!(
        frame
            .thumbnails
            .iter()
            .all(|t| matches!(t.status, SlotStatus::Ready { .. }))
    );
    assert_eq!(h.fetcher.calls("p5/0.jpg"), 1);
    assert_eq!(h.fetcher.calls("p6/0.jpg"), 0);
    Ok(())
}

#[tokio::test]
async fn failed_slots_render_empty() -> Result<()> {
    let mut h = Harness::new(quad_catalogue(3)?);
    h.fetcher.fail("p1/2.jpg");

    let tasks = h.gallery.apply(Command::NextProject);
    h.drain(tasks).await;

    let frame = h.gallery.frame();
    assert_eq!(frame.project, 1);
    let small_one = frame
        .details
        .iter()
        .find(|slot| slot.position == SlotPosition::SmallOne)
        .expect("detail slot");
    assert_eq!(small_one.status, SlotStatus::Empty);
    assert!(matches!(
        frame.primary,
        Some(PrimaryView::Image {
            status: SlotStatus::Ready { width: 4, height: 3 },
            ..
        })
    ));
    Ok(())
}

#[tokio::test]
async fn locale_change_keeps_cursors_and_renames() -> Result<()> {
    let mut h = Harness::new(quad_catalogue(4)?);
    let tasks = h.gallery.apply(Command::SelectSlot {
        project: 0,
        position: SlotPosition::SmallTwo,
    });
    h.drain(tasks).await;

    let before = h.gallery.frame();
    assert_eq!(before.title, "První");
    assert_eq!(before.thumbnails[1].name, "Druhý");
    assert_eq!(before.thumbnails[2].name, "projects.p2");

    h.translations.set_locale("en")?;
    h.gallery.locale_changed(&h.translations.locale());

    let after = h.gallery.frame();
    assert_eq!(after.title, "First");
    assert_eq!(after.locale, "en");
    assert_eq!(after.project, before.project);
    assert_eq!(after.image_index, 3);
    assert_eq!(
        after.thumbnails.iter().map(|t| t.project).collect::<Vec<_>>(),
        before.thumbnails.iter().map(|t| t.project).collect::<Vec<_>>()
    );
    assert_eq!(after.modal.map(|m| m.title), Some("First".to_string()));
    Ok(())
}

#[tokio::test]
async fn opening_the_modal_supersedes_a_pending_navigation() -> Result<()> {
    let mut h = Harness::with_settings(
        quad_catalogue(4)?,
        GallerySettings {
            warm_window: false,
            ..GallerySettings::default()
        },
    );
    let tasks = h.gallery.bootstrap();
    h.drain(tasks).await;

    let mut tasks = h.gallery.apply(Command::NextProject);
    assert!(h.gallery.carousel().is_transitioning());
    tasks.extend(h.gallery.apply(Command::OpenPrimary));
    assert!(!h.gallery.carousel().is_transitioning());
    h.drain(tasks).await;

    let frame = h.gallery.frame();
    let modal = frame.modal.expect("modal open");
    assert_eq!(frame.project, 0);
    assert_eq!(modal.project, frame.project);
    assert_eq!(modal.title, frame.title);
    assert!(frame.nav_enabled);
    Ok(())
}

#[tokio::test]
async fn committing_another_project_closes_the_modal() -> Result<()> {
    let mut h = Harness::with_settings(
        quad_catalogue(4)?,
        GallerySettings {
            warm_window: false,
            ..GallerySettings::default()
        },
    );
    let tasks = h.gallery.apply(Command::OpenPrimary);
    h.drain(tasks).await;
    assert!(h.page.is_suspended());

    let tasks = h.gallery.apply(Command::NextProject);
    h.drain(tasks).await;

    let frame = h.gallery.frame();
    assert_eq!(frame.project, 1);
    assert_eq!(frame.modal, None);
    assert!(!frame.scroll_locked);
    assert!(!h.page.is_suspended());
    Ok(())
}

#[tokio::test]
async fn nav_buttons_follow_the_transition() -> Result<()> {
    let mut h = Harness::with_settings(
        quad_catalogue(4)?,
        GallerySettings {
            warm_window: false,
            ..GallerySettings::default()
        },
    );
    let mut adapter = InputAdapter::default();
    let next = InputEvent::Click(ClickTarget::NavNext);

    let command = adapter.translate(next, h.gallery.input_context());
    assert_eq!(command, Some(Command::NextProject));
    let tasks = h.gallery.apply(Command::NextProject);

    assert!(!h.gallery.input_context().nav_enabled);
    assert_eq!(adapter.translate(next, h.gallery.input_context()), None);

    h.drain(tasks).await;
    assert_eq!(h.gallery.carousel().current_project(), 1);
    assert!(h.gallery.input_context().nav_enabled);
    Ok(())
}

#[tokio::test]
async fn autoplay_pauses_while_the_modal_is_open() -> Result<()> {
    let mut h = Harness::new(quad_catalogue(3)?);
    let tasks = h.gallery.apply(Command::OpenPrimary);
    h.drain(tasks).await;

    assert!(h.gallery.autoplay_tick().is_empty());
    assert_eq!(h.gallery.carousel().current_project(), 0);

    h.gallery.apply(Command::CloseModal);
    let tasks = h.gallery.autoplay_tick();
    h.drain(tasks).await;
    assert_eq!(h.gallery.carousel().current_project(), 1);
    Ok(())
}

#[tokio::test]
async fn runtime_routes_input_and_emits_distinct_frames() -> Result<()> {
    let h = Harness::new(quad_catalogue(5)?);
    let frames: Arc<Mutex<Vec<RenderFrame>>> = Arc::default();
    let sink = {
        let frames = Arc::clone(&frames);
        move |frame: &RenderFrame| frames.lock().unwrap().push(frame.clone())
    };

    let (runtime, handle) =
        GalleryRuntime::new(h.gallery, h.translations.subscribe(), sink);
    assert!(handle.input(InputEvent::Click(ClickTarget::Thumbnail {
        project: 1,
        position: SlotPosition::Large,
    })));
    drop(handle);

    let gallery = runtime.run().await;
    assert_eq!(gallery.carousel().current_project(), 1);
    assert_eq!(gallery.modal().map(|m| m.media_index()), Some(1));

    let frames = frames.lock().unwrap();
    assert!(!frames.is_empty());
    assert!(frames.windows(2).all(|pair| pair[0] != pair[1]));
    assert!(frames.iter().any(|frame| frame.modal.is_some()));
    assert_eq!(frames.last(), Some(&gallery.frame()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn runtime_autoplay_advances_on_its_interval() -> Result<()> {
    let h = Harness::with_settings(
        quad_catalogue(4)?,
        GallerySettings {
            autoplay_interval_ms: Some(1_000),
            ..GallerySettings::default()
        },
    );
    let (runtime, handle) =
        GalleryRuntime::new(h.gallery, h.translations.subscribe(), |_: &RenderFrame| {});

    let stop = async move {
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        drop(handle);
    };
    let (gallery, ()) = tokio::join!(runtime.run(), stop);

    assert_eq!(gallery.carousel().current_project(), 2);
    Ok(())
}
