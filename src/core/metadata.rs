//! Canonical series metadata.
//!
//! Runs independently of the filename pipeline: looks a title up on the
//! metadata provider and builds `season -> episode -> name`. Nothing here
//! touches the filename-derived trees; the two only meet when episodes are
//! listed.

use crate::models::canonical::{CanonicalSeason, CanonicalSeries, SeriesCandidate};
use crate::services::MetadataProvider;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds canonical structures from a metadata provider.
pub struct MetadataBuilder {
    provider: Arc<dyn MetadataProvider>,
}

impl MetadataBuilder {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Candidates for a title, in provider ranking order.
    pub async fn candidates(&self, title: &str) -> Result<Vec<SeriesCandidate>> {
        self.provider
            .search_by_title(title)
            .await
            .map_err(|e| Error::MetadataUnavailable(format!("search for '{}' failed: {}", title, e)))
    }

    /// Search a title and build the structure for the `pick`-th candidate.
    pub async fn lookup(&self, title: &str, pick: usize) -> Result<CanonicalSeries> {
        let candidates = self.candidates(title).await?;
        if candidates.is_empty() {
            return Err(Error::MetadataUnavailable(format!("no results for '{}'", title)));
        }
        let selected = candidates.get(pick).ok_or_else(|| {
            Error::MetadataUnavailable(format!(
                "pick {} out of range, {} candidates for '{}'",
                pick,
                candidates.len(),
                title
            ))
        })?;
        tracing::info!("Selected {} (id {})", selected.display_name(), selected.id);
        self.build(selected).await
    }

    /// Build the season/episode structure of a selected candidate.
    ///
    /// Specials (season 0) are skipped, as are seasons whose episode list
    /// cannot be fetched or is empty.
    pub async fn build(&self, selected: &SeriesCandidate) -> Result<CanonicalSeries> {
        let seasons = self.provider.season_details(selected.id).await.map_err(|e| {
            Error::MetadataUnavailable(format!("seasons of {} unavailable: {}", selected.id, e))
        })?;

        let mut canonical_seasons = BTreeMap::new();
        for season in seasons {
            if season.season_number == 0 {
                continue;
            }

            let episodes = match self
                .provider
                .episodes_for_season(selected.id, season.season_number)
                .await
            {
                Ok(episodes) => episodes,
                Err(e) => {
                    tracing::warn!(
                        "Skipping season {} of {}: {}",
                        season.season_number,
                        selected.name,
                        e
                    );
                    continue;
                }
            };
            if episodes.is_empty() {
                continue;
            }

            let episodes: BTreeMap<u32, String> = episodes
                .into_iter()
                .map(|ep| {
                    let name = ep
                        .name
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| format!("Episode {}", ep.episode_number));
                    (ep.episode_number, name)
                })
                .collect();

            canonical_seasons.insert(
                season.season_number,
                CanonicalSeason {
                    name: season
                        .name
                        .unwrap_or_else(|| format!("Season {}", season.season_number)),
                    episodes,
                },
            );
        }

        Ok(CanonicalSeries {
            id: selected.id,
            name: selected.name.clone(),
            original_name: selected.original_name.clone(),
            first_air_date: selected.first_air_date.clone(),
            poster_url: selected
                .poster_path
                .as_deref()
                .map(|p| self.provider.poster_url(p)),
            seasons: canonical_seasons,
        })
    }
}
