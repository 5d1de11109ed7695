//! External service clients.
//!
//! The catalog only talks to collaborators through [`SearchProvider`] and
//! [`MetadataProvider`], so tests can substitute in-memory fakes.

pub mod tmdb;
pub mod webshare;

use crate::models::canonical::{EpisodeSummary, SeasonSummary, SeriesCandidate};
use crate::Result;
use async_trait::async_trait;

/// Parameters of one search call. The auth token belongs to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub category: String,
    pub sort: String,
    pub limit: u32,
    pub offset: u32,
}

/// Backend verdict on a search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Ok,
    Failed { status: String, message: Option<String> },
}

/// File record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub ident: String,
    pub size: u64,
}

/// Parsed search response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub status: SearchStatus,
    pub files: Vec<FileRecord>,
    pub total: u64,
}

/// Full-text file search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query. Transport problems and unparsable bodies are `Err`.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// Canonical series metadata backend.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn search_by_title(&self, title: &str) -> Result<Vec<SeriesCandidate>>;

    async fn season_details(&self, series_id: u64) -> Result<Vec<SeasonSummary>>;

    async fn episodes_for_season(&self, series_id: u64, season: u32) -> Result<Vec<EpisodeSummary>>;

    /// Public artwork URL for a poster path.
    fn poster_url(&self, poster_path: &str) -> String;
}
