//! Catalog loader tests: partial and total shard failure, snapshot reuse,
//! stale-over-empty behavior, and the derived genre/listing views.

mod utils;

use kagami::application::services::{CatalogService, QueryService};
use kagami::infrastructure::cdn::CdnConfig;
use kagami::shared::errors::AppError;
use std::sync::Arc;
use std::time::Duration;
use utils::fakes::{anime, with_genres, StaticShardFetcher};

fn test_config(urls: &[&str]) -> CdnConfig {
    CdnConfig {
        urls: urls.iter().map(|s| s.to_string()).collect(),
        timeout: Duration::from_secs(5),
        max_retries: 0,
        retry_delay: Duration::from_millis(1),
        reload_interval: Duration::from_secs(3600),
    }
}

#[tokio::test]
async fn one_healthy_shard_is_enough() {
    let fetcher = Arc::new(
        StaticShardFetcher::new(vec![
            ("shard://1", vec![anime(1, "Naruto", Some(8.0), Some(10))]),
            ("shard://2", Vec::new()),
            ("shard://3", Vec::new()),
        ])
        .failing_urls(&["shard://2", "shard://3"]),
    );
    let service = CatalogService::new(
        fetcher.clone(),
        test_config(&["shard://1", "shard://2", "shard://3"]),
    );

    let snapshot = service.preload(false).await.unwrap();
    assert_eq!(snapshot.len(), 1);

    let stats = service.stats().await;
    assert!(stats.is_loaded);
    assert_eq!(stats.record_count, 1);
    assert_eq!(stats.shard_count, 1);
    assert!(stats.load_error.is_none());
}

#[tokio::test]
async fn total_failure_sets_error_and_reads_raise() {
    let fetcher = Arc::new(
        StaticShardFetcher::new(vec![("shard://1", Vec::new()), ("shard://2", Vec::new())])
            .failing_urls(&["shard://1", "shard://2"]),
    );
    let service = Arc::new(CatalogService::new(
        fetcher,
        test_config(&["shard://1", "shard://2"]),
    ));

    let result = service.preload(false).await;
    assert!(matches!(result, Err(AppError::LoadError(_))));

    let stats = service.stats().await;
    assert!(!stats.is_loaded);
    assert!(stats.load_error.is_some());

    // Every read path refuses to answer from the poisoned state.
    let queries = QueryService::new(service);
    let err = queries.search("naruto", 1, 12).await.unwrap_err();
    assert!(matches!(err, AppError::LoadError(_)));
}

#[tokio::test]
async fn fresh_snapshot_is_served_without_refetching() {
    let fetcher = Arc::new(StaticShardFetcher::new(vec![(
        "shard://1",
        vec![anime(1, "Naruto", Some(8.0), Some(10))],
    )]));
    let service = CatalogService::new(fetcher.clone(), test_config(&["shard://1"]));

    service.preload(false).await.unwrap();
    assert_eq!(fetcher.fetches(), 1);

    service.preload(false).await.unwrap();
    assert_eq!(fetcher.fetches(), 1, "fresh snapshot must be reused as-is");

    service.preload(true).await.unwrap();
    assert_eq!(fetcher.fetches(), 2, "forced reload must hit the shards");
}

#[tokio::test]
async fn failed_reload_keeps_previous_snapshot_intact() {
    let fetcher = Arc::new(StaticShardFetcher::new(vec![(
        "shard://1",
        vec![anime(1, "Naruto", Some(8.0), Some(10))],
    )]));
    let service = CatalogService::new(fetcher.clone(), test_config(&["shard://1"]));

    service.preload(false).await.unwrap();
    fetcher.fail_all();

    let result = service.force_reload().await;
    assert!(result.is_err());

    // Stale data survives the failed reload; only the error flag changes.
    let snapshot = service.snapshot().await;
    assert_eq!(snapshot.len(), 1);

    let stats = service.stats().await;
    assert!(stats.is_loaded);
    assert_eq!(stats.record_count, 1);
    assert!(stats.load_error.is_some());
}

#[tokio::test]
async fn duplicate_ids_resolve_to_first_occurrence() {
    let fetcher = Arc::new(StaticShardFetcher::new(vec![
        ("shard://1", vec![anime(1, "First copy", Some(8.0), Some(10))]),
        ("shard://2", vec![anime(1, "Second copy", Some(7.0), Some(20))]),
    ]));
    let service = CatalogService::new(fetcher, test_config(&["shard://1", "shard://2"]));

    let snapshot = service.preload(false).await.unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get(1).unwrap().title, "First copy");
}

#[tokio::test]
async fn genres_are_deduplicated_and_sorted_by_name() {
    let records = vec![
        with_genres(anime(1, "A", None, None), &[(4, "Drama"), (1, "Action")]),
        with_genres(anime(2, "B", None, None), &[(1, "Action"), (2, "Comedy")]),
    ];
    let fetcher = Arc::new(StaticShardFetcher::new(vec![("shard://1", records)]));
    let service = CatalogService::new(fetcher, test_config(&["shard://1"]));

    let genres = service.genres().await.unwrap();
    let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Action", "Comedy", "Drama"]);
}

#[tokio::test]
async fn list_pages_through_the_snapshot() {
    let records: Vec<_> = (1..=7)
        .map(|id| anime(id, &format!("Anime {}", id), None, None))
        .collect();
    let fetcher = Arc::new(StaticShardFetcher::new(vec![("shard://1", records)]));
    let service = CatalogService::new(fetcher, test_config(&["shard://1"]));

    let page = service.list(2, 3).await.unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_items, 7);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items[0].mal_id, 4);
}
