//! Single-flight loading and project preloads.

use std::sync::Arc;

use anyhow::Result;
use folio_core::{MediaCache, MediaError, ResourceStatus};
use folio_contracts::fetch::FetchError;
use folio_model::MediaUri;

#[path = "support/mod.rs"]
mod support;

use support::{FakeFetcher, frame_project, image_project};

#[tokio::test]
async fn concurrent_loads_share_one_fetch() -> Result<()> {
    let fetcher = FakeFetcher::new();
    let cache = MediaCache::new(fetcher.clone());
    let uri = MediaUri::new("p0/0.jpg");

    let first = cache.load(&uri);
    let second = cache.load(&uri);
    assert!(matches!(cache.status(&uri), ResourceStatus::Pending));

    let (a, b) = futures::join!(first, second);
    let (a, b) = (a?, b?);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!((a.width, a.height), (4, 3));
    assert_eq!(fetcher.calls("p0/0.jpg"), 1);

    let stats = cache.stats();
    assert_eq!(stats.fetches_issued, 1);
    assert_eq!(stats.single_flight_joins, 1);
    assert_eq!(stats.in_flight, 0);
    Ok(())
}

#[tokio::test]
async fn gated_fetch_is_joined_by_a_later_preload() -> Result<()> {
    let fetcher = FakeFetcher::new();
    let cache = MediaCache::new(fetcher.clone());
    let project = image_project(7, 3);
    let release = fetcher.gate("p7/0.jpg");

    let first = tokio::spawn(cache.preload(&project));
    tokio::task::yield_now().await;
    assert_eq!(fetcher.calls("p7/0.jpg"), 1);
    assert!(!cache.is_preloaded(project.id()));

    let second = cache.preload(&project);
    release.send(()).ok();

    let report = first.await?;
    assert_eq!(second.await, report);
    assert!(report.is_complete());
    assert_eq!(report.loaded.len(), 3);
    assert!(cache.is_preloaded(project.id()));
    assert_eq!(fetcher.total_calls(), 3);
    Ok(())
}

#[tokio::test]
async fn failed_resource_does_not_block_the_preload() -> Result<()> {
    let fetcher = FakeFetcher::new();
    fetcher.fail("p2/1.jpg");
    let cache = MediaCache::new(fetcher.clone());
    let project = image_project(2, 3);

    let report = cache.preload(&project).await;
    assert_eq!(report.failed, vec![MediaUri::new("p2/1.jpg")]);
    assert_eq!(report.loaded.len(), 2);
    assert!(cache.is_preloaded(project.id()));

    match cache.status(&MediaUri::new("p2/1.jpg")) {
        ResourceStatus::Failed(MediaError::Fetch(FetchError::NotFound(_))) => {}
        other => panic!("unexpected status: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn revisiting_a_project_does_not_refetch() -> Result<()> {
    let fetcher = FakeFetcher::new();
    fetcher.fail("p1/2.jpg");
    let cache = MediaCache::new(fetcher.clone());
    let project = image_project(1, 3);

    cache.preload(&project).await;
    fetcher.heal("p1/2.jpg");
    let again = cache.preload(&project).await;

    assert_eq!(fetcher.total_calls(), 3);
    assert_eq!(again.failed.len(), 1);
    Ok(())
}

#[tokio::test]
async fn explicit_load_retries_a_failed_resource() -> Result<()> {
    let fetcher = FakeFetcher::new();
    fetcher.fail("p1/2.jpg");
    let cache = MediaCache::new(fetcher.clone());
    let uri = MediaUri::new("p1/2.jpg");

    assert!(cache.load(&uri).await.is_err());
    fetcher.heal("p1/2.jpg");
    assert!(cache.load(&uri).await.is_ok());
    assert_eq!(fetcher.calls("p1/2.jpg"), 2);
    assert!(cache.get(&uri).is_some());
    Ok(())
}

#[tokio::test]
async fn embedded_frames_are_never_fetched() -> Result<()> {
    let fetcher = FakeFetcher::new();
    let cache = MediaCache::new(fetcher.clone());
    let project = frame_project(3, 4);

    let report = cache.preload(&project).await;
    assert_eq!(report.loaded.len(), 3);
    assert_eq!(fetcher.calls("https://frames.test/p3"), 0);
    assert!(matches!(
        cache.status(&MediaUri::new("https://frames.test/p3")),
        ResourceStatus::Unknown
    ));
    Ok(())
}

#[tokio::test]
async fn undecodable_bytes_surface_as_decode_errors() -> Result<()> {
    struct Garbage;

    #[async_trait::async_trait]
    impl folio_contracts::fetch::MediaFetcher for Garbage {
        async fn fetch(&self, _: &MediaUri) -> Result<Vec<u8>, FetchError> {
            Ok(b"not an image".to_vec())
        }
    }

    let cache = MediaCache::new(Arc::new(Garbage));
    let outcome = cache.load(&MediaUri::new("p0/0.jpg")).await;
    assert!(matches!(outcome, Err(MediaError::Decode { .. })));
    Ok(())
}
