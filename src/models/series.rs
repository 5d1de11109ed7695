//! Series-related data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One file record returned by the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult {
    /// Filename as reported by the search backend.
    pub name: String,
    /// Opaque backend identifier.
    pub ident: String,
    /// File size in bytes.
    pub size: u64,
    /// Query string that surfaced this record.
    pub source_query: String,
    /// Normalized name variant the query was built from.
    pub name_variant: String,
}

impl RawResult {
    /// Identity used for deduplication.
    pub fn identity(&self) -> (&str, &str) {
        (&self.name, &self.ident)
    }
}

/// Season/episode position extracted from a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpisodeCoordinate {
    Resolved { season: u32, episode: u32 },
    Unresolved,
}

impl EpisodeCoordinate {
    /// Build a coordinate, rejecting zero season or episode numbers.
    pub fn new(season: u32, episode: u32) -> Self {
        if season == 0 || episode == 0 {
            EpisodeCoordinate::Unresolved
        } else {
            EpisodeCoordinate::Resolved { season, episode }
        }
    }

    /// `(season, episode)` when resolved.
    pub fn pair(&self) -> Option<(u32, u32)> {
        match *self {
            EpisodeCoordinate::Resolved { season, episode } => Some((season, episode)),
            EpisodeCoordinate::Unresolved => None,
        }
    }
}

impl std::fmt::Display for EpisodeCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeCoordinate::Resolved { season, episode } => {
                write!(f, "S{:02}E{:02}", season, episode)
            }
            EpisodeCoordinate::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// One physical file believed to represent an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeFileVariant {
    /// Filename.
    pub name: String,
    /// Backend identifier used for playback.
    pub ident: String,
    /// File size in bytes.
    #[serde(rename = "size", deserialize_with = "lenient_size")]
    pub size_bytes: u64,
}

impl From<&RawResult> for EpisodeFileVariant {
    fn from(raw: &RawResult) -> Self {
        Self {
            name: raw.name.clone(),
            ident: raw.ident.clone(),
            size_bytes: raw.size,
        }
    }
}

/// Episode number -> file variants.
pub type EpisodeMap = BTreeMap<u32, Vec<EpisodeFileVariant>>;

/// Filename-derived season/episode tree for one series.
///
/// Map keys serialize as strings ("1", "2", ...) and always iterate in
/// ascending numeric order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTree {
    /// Series name as searched; also the persistence key source.
    #[serde(rename = "name")]
    pub series_name: String,
    /// When the tree was built.
    pub last_updated: DateTime<Utc>,
    /// Season number -> episode map.
    pub seasons: BTreeMap<u32, EpisodeMap>,
}

impl SeriesTree {
    /// Create an empty tree stamped with the current time.
    pub fn new(series_name: &str) -> Self {
        Self {
            series_name: series_name.to_string(),
            last_updated: Utc::now(),
            seasons: BTreeMap::new(),
        }
    }

    /// Number of distinct episodes across all seasons.
    pub fn episode_count(&self) -> usize {
        self.seasons.values().map(|s| s.len()).sum()
    }

    /// Number of file variants across all episodes.
    pub fn variant_count(&self) -> usize {
        self.seasons
            .values()
            .flat_map(|s| s.values())
            .map(|v| v.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// Drop empty episode lists and empty seasons.
    pub fn prune(&mut self) {
        for episodes in self.seasons.values_mut() {
            episodes.retain(|_, variants| !variants.is_empty());
        }
        self.seasons.retain(|_, episodes| !episodes.is_empty());
    }
}

/// Accept sizes stored either as integers or as numeric strings.
fn lenient_size<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Size {
        Number(u64),
        Text(String),
    }

    Ok(match Size::deserialize(deserializer)? {
        Size::Number(n) => n,
        Size::Text(s) => s.trim().parse().unwrap_or(0),
    })
}
