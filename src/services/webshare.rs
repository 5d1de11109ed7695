//! Webshare API client.
//!
//! Webshare answers form POSTs with XML bodies:
//!
//! ```xml
//! <response>
//!   <status>OK</status>
//!   <total>2</total>
//!   <file><ident>aB3x</ident><name>Show.S01E01.mkv</name><size>734003200</size></file>
//! </response>
//! ```

use super::{FileRecord, SearchProvider, SearchRequest, SearchResponse, SearchStatus};
use crate::models::config::WebshareConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Webshare API client.
pub struct WebshareClient {
    config: WebshareConfig,
    token: String,
    client: reqwest::Client,
}

/// XML envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
struct XmlResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    total: Option<String>,
    #[serde(rename = "file", default)]
    files: Vec<XmlFile>,
}

/// `<file>` element of a search response.
#[derive(Debug, Deserialize)]
struct XmlFile {
    #[serde(default)]
    ident: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size: Option<String>,
}

impl WebshareClient {
    /// Create a client. Fails without a token.
    pub fn new(config: &WebshareConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(Error::WebshareTokenMissing)?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config: config.clone(),
            token,
            client,
        })
    }

    fn endpoint(&self, function: &str) -> String {
        format!("{}{}/", self.config.api_url, function)
    }

    /// Check the token is accepted by the `user_data` endpoint.
    pub async fn verify_token(&self) -> Result<bool> {
        let form = [("wst", self.token.as_str())];
        let resp = self
            .client
            .post(self.endpoint("user_data"))
            .form(&form)
            .send()
            .await?;
        let body = resp.text().await?;
        let parsed: XmlResponse = quick_xml::de::from_str(&body)?;
        Ok(parsed.status == "OK")
    }
}

#[async_trait]
impl SearchProvider for WebshareClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let limit = request.limit.to_string();
        let offset = request.offset.to_string();
        let form = [
            ("what", request.query.as_str()),
            ("category", request.category.as_str()),
            ("sort", request.sort.as_str()),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
            ("wst", self.token.as_str()),
            ("maybe_removed", "true"),
        ];

        let resp = self
            .client
            .post(self.endpoint("search"))
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Transport {
                query: request.query.clone(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(Error::Transport {
                query: request.query.clone(),
                reason: format!("HTTP {}", resp.status()),
            });
        }

        let body = resp.text().await.map_err(|e| Error::Transport {
            query: request.query.clone(),
            reason: e.to_string(),
        })?;

        parse_search_response(&body).map_err(|e| Error::MalformedResponse {
            query: request.query.clone(),
            reason: e.to_string(),
        })
    }
}

/// Parse a search XML body. Records without a name or ident are dropped.
pub fn parse_search_response(body: &str) -> Result<SearchResponse> {
    let parsed: XmlResponse = quick_xml::de::from_str(body)?;

    if parsed.status != "OK" {
        return Ok(SearchResponse {
            status: SearchStatus::Failed {
                status: parsed.status,
                message: parsed.message,
            },
            files: Vec::new(),
            total: 0,
        });
    }

    let files: Vec<FileRecord> = parsed
        .files
        .into_iter()
        .filter_map(|f| {
            let name = f.name.filter(|n| !n.is_empty())?;
            let ident = f.ident.filter(|i| !i.is_empty())?;
            let size = f
                .size
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0);
            Some(FileRecord { name, ident, size })
        })
        .collect();

    let total = parsed
        .total
        .and_then(|t| t.trim().parse().ok())
        .unwrap_or(files.len() as u64);

    Ok(SearchResponse {
        status: SearchStatus::Ok,
        files,
        total,
    })
}
