//! Series catalog.
//!
//! Entry point for the presentation layer: search/refresh run the whole
//! aggregate -> classify -> build pipeline and persist only a complete,
//! non-empty tree; the read operations work from the stores.

use super::aggregator::Aggregator;
use super::metadata::MetadataBuilder;
use super::store::{MetadataStore, SeriesStore, StoredSeries};
use super::tree;
use crate::models::canonical::{CanonicalSeries, SeriesCandidate};
use crate::models::config::Config;
use crate::models::series::{EpisodeFileVariant, SeriesTree};
use crate::services::tmdb::TmdbClient;
use crate::services::webshare::WebshareClient;
use crate::services::{MetadataProvider, SearchProvider};
use crate::utils::text::slugify;
use crate::{Error, Result};
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One episode of a season as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeListing {
    pub episode: u32,
    /// Canonical title when metadata for the series is stored.
    pub title: Option<String>,
    /// Variants in display order.
    pub variants: Vec<EpisodeFileVariant>,
}

/// Slugs with a search or refresh in flight.
#[derive(Debug, Default)]
struct SlugLocks {
    active: Mutex<HashSet<String>>,
}

struct SlugGuard<'a> {
    locks: &'a SlugLocks,
    slug: String,
}

impl SlugLocks {
    fn acquire(&self, slug: &str) -> Result<SlugGuard<'_>> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(slug.to_string()) {
            return Err(Error::RefreshInProgress(slug.to_string()));
        }
        Ok(SlugGuard {
            locks: self,
            slug: slug.to_string(),
        })
    }
}

impl Drop for SlugGuard<'_> {
    fn drop(&mut self) {
        self.locks
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.slug);
    }
}

/// Series catalog over a search backend, a metadata backend and two stores.
pub struct Catalog {
    config: Config,
    series_store: SeriesStore,
    metadata_store: MetadataStore,
    search: Option<Arc<dyn SearchProvider>>,
    metadata: Option<MetadataBuilder>,
    progress: ProgressBar,
    locks: SlugLocks,
}

impl Catalog {
    /// Open the stores without any collaborator attached.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            series_store: SeriesStore::open(&config.series_dir())?,
            metadata_store: MetadataStore::open(&config.metadata_dir())?,
            config: config.clone(),
            search: None,
            metadata: None,
            progress: ProgressBar::hidden(),
            locks: SlugLocks::default(),
        })
    }

    /// Open the stores and attach whichever clients are configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut catalog = Self::open(config)?;
        match WebshareClient::new(&config.webshare) {
            Ok(client) => catalog = catalog.with_search(Arc::new(client)),
            Err(Error::WebshareTokenMissing) => {
                tracing::debug!("No Webshare token, search disabled")
            }
            Err(e) => return Err(e),
        }
        match TmdbClient::new(&config.tmdb) {
            Ok(client) => catalog = catalog.with_metadata(Arc::new(client)),
            Err(Error::TmdbApiKeyMissing) => {
                tracing::debug!("No TMDB key, metadata lookups disabled")
            }
            Err(e) => return Err(e),
        }
        Ok(catalog)
    }

    pub fn with_search(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(provider);
        self
    }

    pub fn with_metadata(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = Some(MetadataBuilder::new(provider));
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn series_store(&self) -> &SeriesStore {
        &self.series_store
    }

    /// Search a series from scratch and persist the resulting tree.
    pub async fn search_series(&self, name: &str, cancel: &CancellationToken) -> Result<SeriesTree> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::other("Series name must not be empty"));
        }
        self.run_pipeline(name, cancel).await
    }

    /// Rebuild a series tree, keeping the stored series name when one exists.
    pub async fn refresh_series(&self, name: &str, cancel: &CancellationToken) -> Result<SeriesTree> {
        let stored_name = match self.series_store.load(&slugify(name.trim())) {
            Ok(tree) => tree.series_name,
            Err(e) => {
                tracing::debug!("Refreshing '{}' without stored tree: {}", name, e);
                name.trim().to_string()
            }
        };
        self.search_series(&stored_name, cancel).await
    }

    async fn run_pipeline(&self, series_name: &str, cancel: &CancellationToken) -> Result<SeriesTree> {
        let provider = self.search.clone().ok_or(Error::WebshareTokenMissing)?;
        let slug = slugify(series_name);
        let _guard = self.locks.acquire(&slug)?;

        let aggregator = Aggregator::new(provider, &self.config.webshare, &self.config.search)
            .with_progress(self.progress.clone());

        let secs = self.config.search.refresh_timeout_secs;
        let report = tokio::time::timeout(
            Duration::from_secs(secs),
            aggregator.aggregate(series_name, cancel),
        )
        .await
        .map_err(|_| Error::Timeout {
            series: series_name.to_string(),
            secs,
        })?;

        if report.cancelled {
            return Err(Error::Cancelled(series_name.to_string()));
        }
        if report.all_failed() {
            tracing::warn!("Every query for '{}' failed", series_name);
        }
        if report.results.is_empty() {
            return Err(Error::NoContentFound(series_name.to_string()));
        }

        let tree = tree::build(series_name, &report.results);
        if tree.is_empty() {
            return Err(Error::NoContentFound(series_name.to_string()));
        }

        self.series_store.save(&tree)?;
        Ok(tree)
    }

    /// Stored series sorted by slug.
    pub fn list_series(&self) -> Result<Vec<StoredSeries>> {
        self.series_store.list()
    }

    /// Remove a stored series.
    pub fn delete_series(&self, slug: &str) -> Result<()> {
        self.series_store.delete(slug)
    }

    /// Load the stored tree for a series name.
    pub fn load_series(&self, name: &str) -> Result<SeriesTree> {
        self.series_store.load(&slugify(name.trim()))
    }

    /// Season numbers of a stored series, ascending.
    pub fn get_seasons(&self, name: &str) -> Result<Vec<u32>> {
        Ok(tree::season_numbers(&self.load_series(name)?))
    }

    /// Episodes of a season with display-ordered variants.
    pub fn get_episodes(&self, name: &str, season: u32) -> Result<Vec<EpisodeListing>> {
        let series = self.load_series(name)?;
        let episodes = tree::season_episodes(&series, season).ok_or_else(|| Error::SeasonNotFound {
            series: series.series_name.clone(),
            season,
        })?;

        let canonical = match self.metadata_store.load(&slugify(name.trim())) {
            Ok(canonical) => Some(canonical),
            Err(e) => {
                tracing::debug!("No canonical metadata for '{}': {}", name, e);
                None
            }
        };

        Ok(episodes
            .into_iter()
            .map(|(episode, variants)| EpisodeListing {
                episode,
                title: canonical
                    .as_ref()
                    .and_then(|c| c.episode_name(season, episode))
                    .map(str::to_string),
                variants,
            })
            .collect())
    }

    fn metadata_builder(&self) -> Result<&MetadataBuilder> {
        self.metadata.as_ref().ok_or(Error::TmdbApiKeyMissing)
    }

    /// Metadata candidates for a title.
    pub async fn metadata_candidates(&self, title: &str) -> Result<Vec<SeriesCandidate>> {
        self.metadata_builder()?.candidates(title).await
    }

    /// Look a title up, build its canonical structure and store it under the
    /// slug of the title.
    pub async fn lookup_metadata(&self, title: &str, pick: usize) -> Result<CanonicalSeries> {
        let canonical = self.metadata_builder()?.lookup(title, pick).await?;
        self.metadata_store.save_as(&slugify(title.trim()), &canonical)?;
        Ok(canonical)
    }

    /// Stored canonical structures sorted by slug.
    pub fn list_metadata(&self) -> Result<Vec<StoredSeries>> {
        self.metadata_store.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_lock_excludes_same_slug() {
        let locks = SlugLocks::default();
        let guard = locks.acquire("dark").unwrap();
        assert!(matches!(locks.acquire("dark"), Err(Error::RefreshInProgress(_))));
        assert!(locks.acquire("friends").is_ok());
        drop(guard);
        assert!(locks.acquire("dark").is_ok());
    }
}
