//! TMDB API client.

use super::MetadataProvider;
use crate::models::canonical::{EpisodeSummary, SeasonSummary, SeriesCandidate};
use crate::models::config::TmdbConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// TMDB API client.
pub struct TmdbClient {
    api_key: String,
    language: String,
    /// Whether to use Bearer token authentication (API v4 style)
    use_bearer: bool,
    client: reqwest::Client,
}

/// TV show search result.
#[derive(Debug, Deserialize)]
pub struct TvSearchResult {
    pub results: Vec<TvSearchItem>,
}

/// TV show search item.
#[derive(Debug, Deserialize)]
pub struct TvSearchItem {
    pub id: u64,
    pub name: String,
    pub original_name: String,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
}

/// TV show details, reduced to the season list.
#[derive(Debug, Deserialize)]
pub struct TvDetails {
    #[serde(default)]
    pub seasons: Vec<TvSeason>,
}

/// Season entry within TV details.
#[derive(Debug, Deserialize)]
pub struct TvSeason {
    pub season_number: u32,
    pub name: Option<String>,
}

/// Season details, reduced to the episode list.
#[derive(Debug, Deserialize)]
pub struct SeasonDetails {
    #[serde(default)]
    pub episodes: Vec<EpisodeInfo>,
}

/// Episode info within a season.
#[derive(Debug, Deserialize)]
pub struct EpisodeInfo {
    pub episode_number: u32,
    pub name: Option<String>,
}

impl TmdbClient {
    /// Create a new TMDB client. Fails without an API key.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(Error::TmdbApiKeyMissing)?;

        // Bearer tokens start with "eyJ" (base64 encoded JWT header)
        let use_bearer = api_key.starts_with("eyJ");

        Ok(Self {
            api_key,
            language: config.language.clone(),
            use_bearer,
            client: reqwest::Client::new(),
        })
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        if self.use_bearer {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        } else {
            request
        }
    }

    /// Build URL with optional api_key parameter (only for v3 style).
    fn build_url(&self, path: &str, extra_params: &str) -> String {
        if self.use_bearer {
            format!(
                "{}/{}?language={}{}",
                TMDB_BASE_URL, path, self.language, extra_params
            )
        } else {
            format!(
                "{}/{}?api_key={}&language={}{}",
                TMDB_BASE_URL, path, self.api_key, self.language, extra_params
            )
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.build_request(url).send().await?;
        if !resp.status().is_success() {
            return Err(Error::MetadataUnavailable(format!(
                "TMDB returned HTTP {}",
                resp.status()
            )));
        }
        Ok(resp.json().await?)
    }

    /// Verify API key is valid.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = if self.use_bearer {
            format!("{}/authentication", TMDB_BASE_URL)
        } else {
            format!("{}/authentication?api_key={}", TMDB_BASE_URL, self.api_key)
        };

        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Search for TV shows.
    pub async fn search_tv(&self, query: &str) -> Result<Vec<TvSearchItem>> {
        let url = self.build_url(
            "search/tv",
            &format!("&include_adult=false&query={}", urlencoding::encode(query)),
        );
        let resp: TvSearchResult = self.get_json(&url).await?;
        Ok(resp.results)
    }

    /// Get TV show details.
    pub async fn get_tv_details(&self, tv_id: u64) -> Result<TvDetails> {
        let url = self.build_url(&format!("tv/{}", tv_id), "");
        self.get_json(&url).await
    }

    /// Get season details.
    pub async fn get_season_details(&self, tv_id: u64, season_number: u32) -> Result<SeasonDetails> {
        let url = self.build_url(&format!("tv/{}/season/{}", tv_id, season_number), "");
        self.get_json(&url).await
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn search_by_title(&self, title: &str) -> Result<Vec<SeriesCandidate>> {
        Ok(self
            .search_tv(title)
            .await?
            .into_iter()
            .map(|item| SeriesCandidate {
                id: item.id,
                name: item.name,
                original_name: item.original_name,
                first_air_date: item.first_air_date,
                poster_path: item.poster_path,
            })
            .collect())
    }

    async fn season_details(&self, series_id: u64) -> Result<Vec<SeasonSummary>> {
        Ok(self
            .get_tv_details(series_id)
            .await?
            .seasons
            .into_iter()
            .map(|s| SeasonSummary {
                season_number: s.season_number,
                name: s.name,
            })
            .collect())
    }

    async fn episodes_for_season(&self, series_id: u64, season: u32) -> Result<Vec<EpisodeSummary>> {
        Ok(self
            .get_season_details(series_id, season)
            .await?
            .episodes
            .into_iter()
            .map(|e| EpisodeSummary {
                episode_number: e.episode_number,
                name: e.name,
            })
            .collect())
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", TMDB_IMAGE_URL, poster_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str) -> TmdbConfig {
        TmdbConfig {
            api_key: Some(key.to_string()),
            language: "cs-CZ".to_string(),
        }
    }

    #[test]
    fn test_build_url_v3() {
        let client = TmdbClient::new(&config("abc123")).unwrap();
        assert_eq!(
            client.build_url("tv/1100", ""),
            "https://api.themoviedb.org/3/tv/1100?api_key=abc123&language=cs-CZ"
        );
    }

    #[test]
    fn test_build_url_bearer() {
        let client = TmdbClient::new(&config("eyJhbGciOi")).unwrap();
        assert_eq!(
            client.build_url("tv/1100/season/2", ""),
            "https://api.themoviedb.org/3/tv/1100/season/2?language=cs-CZ"
        );
    }

    #[test]
    fn test_missing_key() {
        let cfg = TmdbConfig {
            api_key: None,
            language: "en-US".to_string(),
        };
        assert!(matches!(TmdbClient::new(&cfg), Err(Error::TmdbApiKeyMissing)));
    }

    #[test]
    fn test_season_details_deserialize() {
        let json = r#"{
            "season_number": 1,
            "name": "Season 1",
            "episodes": [
                {"episode_number": 1, "name": "Pilot", "air_date": "2005-09-19"},
                {"episode_number": 2, "name": "Purple Giraffe", "air_date": null}
            ]
        }"#;
        let details: SeasonDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.episodes.len(), 2);
        assert_eq!(details.episodes[1].name.as_deref(), Some("Purple Giraffe"));
    }

    #[test]
    fn test_poster_url() {
        let client = TmdbClient::new(&config("abc123")).unwrap();
        assert_eq!(
            client.poster_url("/poster.jpg"),
            "https://image.tmdb.org/t/p/w500/poster.jpg"
        );
    }
}
