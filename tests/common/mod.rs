//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use series_catalog::models::canonical::{EpisodeSummary, SeasonSummary, SeriesCandidate};
use series_catalog::models::config::Config;
use series_catalog::services::{
    FileRecord, MetadataProvider, SearchProvider, SearchRequest, SearchResponse, SearchStatus,
};
use series_catalog::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Canned answer for one query.
#[derive(Debug, Clone)]
pub enum Answer {
    Files(Vec<FileRecord>),
    Transport,
    Malformed,
    Rejected(String),
}

/// Search backend answering from a table; unknown queries get no files.
#[derive(Default)]
pub struct FakeSearch {
    answers: HashMap<String, Answer>,
    delays: HashMap<String, Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, query: &str, answer: Answer) -> Self {
        self.answers.insert(query.to_string(), answer);
        self
    }

    pub fn files(self, query: &str, files: &[(&str, &str, u64)]) -> Self {
        self.answer(
            query,
            Answer::Files(files.iter().map(|(n, i, s)| file(n, i, *s)).collect()),
        )
    }

    pub fn delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

pub fn file(name: &str, ident: &str, size: u64) -> FileRecord {
    FileRecord {
        name: name.to_string(),
        ident: ident.to_string(),
        size,
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.calls.lock().unwrap().push(request.query.clone());
        if let Some(delay) = self.delays.get(&request.query) {
            tokio::time::sleep(*delay).await;
        }

        match self.answers.get(&request.query) {
            None => Ok(SearchResponse {
                status: SearchStatus::Ok,
                files: Vec::new(),
                total: 0,
            }),
            Some(Answer::Files(files)) => Ok(SearchResponse {
                status: SearchStatus::Ok,
                files: files.clone(),
                total: files.len() as u64,
            }),
            Some(Answer::Transport) => Err(Error::Transport {
                query: request.query.clone(),
                reason: "connection reset".to_string(),
            }),
            Some(Answer::Malformed) => Err(Error::MalformedResponse {
                query: request.query.clone(),
                reason: "unexpected end of document".to_string(),
            }),
            Some(Answer::Rejected(status)) => Ok(SearchResponse {
                status: SearchStatus::Failed {
                    status: status.clone(),
                    message: None,
                },
                files: Vec::new(),
                total: 0,
            }),
        }
    }
}

/// Metadata backend with one series.
pub struct FakeMetadata {
    pub candidates: Vec<SeriesCandidate>,
    pub seasons: Vec<SeasonSummary>,
    pub episodes: HashMap<u32, Vec<EpisodeSummary>>,
    pub failing_seasons: Vec<u32>,
    pub search_fails: bool,
}

impl FakeMetadata {
    pub fn dark() -> Self {
        let mut episodes = HashMap::new();
        episodes.insert(0, vec![episode(1, Some("Making of"))]);
        episodes.insert(
            1,
            vec![episode(1, Some("Secrets")), episode(2, Some("Lies")), episode(3, None)],
        );
        episodes.insert(2, vec![episode(1, Some("Beginnings and Endings"))]);
        episodes.insert(3, Vec::new());

        Self {
            candidates: vec![
                SeriesCandidate {
                    id: 70523,
                    name: "Dark".to_string(),
                    original_name: "Dark".to_string(),
                    first_air_date: Some("2017-12-01".to_string()),
                    poster_path: Some("/dark.jpg".to_string()),
                },
                SeriesCandidate {
                    id: 1,
                    name: "Dark Matter".to_string(),
                    original_name: "Dark Matter".to_string(),
                    first_air_date: Some("2015-06-12".to_string()),
                    poster_path: None,
                },
            ],
            seasons: vec![
                season(0, Some("Specials")),
                season(1, Some("Season 1")),
                season(2, None),
                season(3, Some("Season 3")),
            ],
            episodes,
            failing_seasons: Vec::new(),
            search_fails: false,
        }
    }
}

pub fn season(number: u32, name: Option<&str>) -> SeasonSummary {
    SeasonSummary {
        season_number: number,
        name: name.map(str::to_string),
    }
}

pub fn episode(number: u32, name: Option<&str>) -> EpisodeSummary {
    EpisodeSummary {
        episode_number: number,
        name: name.map(str::to_string),
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn search_by_title(&self, _title: &str) -> Result<Vec<SeriesCandidate>> {
        if self.search_fails {
            return Err(Error::MetadataUnavailable("TMDB returned HTTP 503".to_string()));
        }
        Ok(self.candidates.clone())
    }

    async fn season_details(&self, _series_id: u64) -> Result<Vec<SeasonSummary>> {
        Ok(self.seasons.clone())
    }

    async fn episodes_for_season(&self, _series_id: u64, season: u32) -> Result<Vec<EpisodeSummary>> {
        if self.failing_seasons.contains(&season) {
            return Err(Error::MetadataUnavailable(format!("season {} unavailable", season)));
        }
        Ok(self.episodes.get(&season).cloned().unwrap_or_default())
    }

    fn poster_url(&self, path: &str) -> String {
        format!("https://img.test/w500{}", path)
    }
}

/// Config rooted in a temporary directory with no credentials.
pub fn test_config(data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.data_dir = data_dir.to_path_buf();
    config.webshare.token = None;
    config.tmdb.api_key = None;
    config
}
