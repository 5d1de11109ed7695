//! Canonical metadata tests with an in-memory TMDB.

mod common;

use common::{test_config, FakeMetadata};
use series_catalog::core::catalog::Catalog;
use series_catalog::core::metadata::MetadataBuilder;
use series_catalog::Error;
use std::sync::Arc;
use tempfile::TempDir;

// ========== BUILDER ==========

#[tokio::test]
async fn test_build_skips_specials_and_empty_seasons() {
    let builder = MetadataBuilder::new(Arc::new(FakeMetadata::dark()));
    let canonical = builder.lookup("Dark", 0).await.unwrap();

    assert_eq!(canonical.id, 70523);
    assert_eq!(canonical.seasons.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(
        canonical.poster_url.as_deref(),
        Some("https://img.test/w500/dark.jpg")
    );
}

#[tokio::test]
async fn test_default_names() {
    let builder = MetadataBuilder::new(Arc::new(FakeMetadata::dark()));
    let canonical = builder.lookup("Dark", 0).await.unwrap();

    assert_eq!(canonical.seasons[&1].name, "Season 1");
    assert_eq!(canonical.seasons[&2].name, "Season 2");
    assert_eq!(canonical.episode_name(1, 3), Some("Episode 3"));
    assert_eq!(canonical.episode_name(2, 1), Some("Beginnings and Endings"));
    assert_eq!(canonical.episode_name(4, 1), None);
}

#[tokio::test]
async fn test_failing_season_is_skipped() {
    let mut fake = FakeMetadata::dark();
    fake.failing_seasons = vec![2];
    let builder = MetadataBuilder::new(Arc::new(fake));

    let canonical = builder.lookup("Dark", 0).await.unwrap();
    assert_eq!(canonical.seasons.keys().copied().collect::<Vec<_>>(), vec![1]);
}

#[tokio::test]
async fn test_pick_selects_candidate() {
    let builder = MetadataBuilder::new(Arc::new(FakeMetadata::dark()));
    let canonical = builder.lookup("Dark", 1).await.unwrap();
    assert_eq!(canonical.name, "Dark Matter");
    assert!(canonical.poster_url.is_none());

    let result = builder.lookup("Dark", 5).await;
    assert!(matches!(result, Err(Error::MetadataUnavailable(_))));
}

#[tokio::test]
async fn test_no_candidates() {
    let mut fake = FakeMetadata::dark();
    fake.candidates.clear();
    let builder = MetadataBuilder::new(Arc::new(fake));

    assert!(matches!(
        builder.lookup("Nothing", 0).await,
        Err(Error::MetadataUnavailable(_))
    ));
}

// ========== CATALOG ==========

#[tokio::test]
async fn test_lookup_stores_under_title_slug() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::open(&test_config(dir.path()))
        .unwrap()
        .with_metadata(Arc::new(FakeMetadata::dark()));

    catalog.lookup_metadata("Dark", 0).await.unwrap();

    let listed = catalog.list_metadata().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].slug, "dark");
    assert_eq!(listed[0].display_name, "Dark");
    assert!(dir.path().join("series_db_tmdb").join("dark.json").exists());
    // Filename trees live elsewhere
    assert!(catalog.list_series().unwrap().is_empty());
}

#[tokio::test]
async fn test_series_delete_cannot_reach_metadata_store() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::open(&test_config(dir.path()))
        .unwrap()
        .with_metadata(Arc::new(FakeMetadata::dark()));
    catalog.lookup_metadata("Dark", 0).await.unwrap();

    let result = catalog.delete_series("../series_db_tmdb/dark");
    assert!(matches!(result, Err(Error::InvalidSlug(_))));
    assert_eq!(catalog.list_metadata().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unavailable_metadata_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let mut fake = FakeMetadata::dark();
    fake.search_fails = true;
    let catalog = Catalog::open(&test_config(dir.path()))
        .unwrap()
        .with_metadata(Arc::new(fake));

    let result = catalog.lookup_metadata("Dark", 0).await;
    assert!(matches!(result, Err(Error::MetadataUnavailable(_))));
    assert!(catalog.list_metadata().unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_without_backend() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::open(&test_config(dir.path())).unwrap();

    assert!(matches!(
        catalog.lookup_metadata("Dark", 0).await,
        Err(Error::TmdbApiKeyMissing)
    ));
    assert!(matches!(
        catalog.metadata_candidates("Dark").await,
        Err(Error::TmdbApiKeyMissing)
    ));
}
