//! Canonical series structure built from TMDB.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A TMDB search hit offered for selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesCandidate {
    pub id: u64,
    pub name: String,
    pub original_name: String,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
}

impl SeriesCandidate {
    /// "Name (Year)" when the first air date is known.
    pub fn display_name(&self) -> String {
        match self.first_air_date.as_deref().and_then(|d| d.get(..4)) {
            Some(year) if !year.is_empty() => format!("{} ({})", self.name, year),
            _ => self.name.clone(),
        }
    }
}

/// Season entry of a series detail response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: u32,
    pub name: Option<String>,
}

/// Episode entry of a season response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode_number: u32,
    pub name: Option<String>,
}

/// Canonical season with episode names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSeason {
    pub name: String,
    pub episodes: BTreeMap<u32, String>,
}

/// Canonical identity and episode titles for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSeries {
    pub id: u64,
    pub name: String,
    pub original_name: String,
    pub first_air_date: Option<String>,
    pub poster_url: Option<String>,
    pub seasons: BTreeMap<u32, CanonicalSeason>,
}

impl CanonicalSeries {
    /// Canonical title of an episode, if known.
    pub fn episode_name(&self, season: u32, episode: u32) -> Option<&str> {
        self.seasons
            .get(&season)
            .and_then(|s| s.episodes.get(&episode))
            .map(String::as_str)
    }
}
