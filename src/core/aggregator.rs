//! Search aggregation.
//!
//! Runs every expanded query against the search backend, keeps results that
//! plausibly belong to the series and deduplicates them by `(name, ident)`.
//! Individual query failures are recorded and skipped; they never abort the
//! aggregate.

use super::classifier;
use super::query::{build_queries, ExpandedQuery};
use crate::models::config::{SearchConfig, WebshareConfig};
use crate::models::series::RawResult;
use crate::services::{SearchProvider, SearchRequest, SearchResponse, SearchStatus};
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Why a single query contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    /// Backend unreachable or non-success HTTP status.
    Transport(String),
    /// Body could not be parsed.
    Malformed(String),
    /// Backend answered with a non-OK status.
    Rejected { status: String, message: Option<String> },
}

/// What happened to one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Completed {
        query: String,
        returned: usize,
        accepted: usize,
    },
    Failed {
        query: String,
        failure: QueryFailure,
    },
    /// Not issued because the search was cancelled.
    Skipped { query: String },
}

/// Deduplicated results plus a per-query account.
#[derive(Debug, Clone, Default)]
pub struct AggregateReport {
    pub results: Vec<RawResult>,
    pub outcomes: Vec<QueryOutcome>,
    pub cancelled: bool,
}

impl AggregateReport {
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, QueryOutcome::Failed { .. }))
            .count()
    }

    /// True when queries were issued and every one of them failed.
    pub fn all_failed(&self) -> bool {
        let issued = self
            .outcomes
            .iter()
            .filter(|o| !matches!(o, QueryOutcome::Skipped { .. }))
            .count();
        issued > 0 && self.failed_count() == issued
    }
}

/// Query fan-out and result filter for one backend.
pub struct Aggregator {
    provider: Arc<dyn SearchProvider>,
    category: String,
    sort: String,
    limit: u32,
    keywords: Vec<String>,
    max_concurrent: usize,
    progress: ProgressBar,
}

impl Aggregator {
    /// Create an aggregator from explicit configuration.
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        webshare: &WebshareConfig,
        search: &SearchConfig,
    ) -> Self {
        Self {
            provider,
            category: webshare.category.clone(),
            sort: webshare.sort.clone(),
            limit: webshare.limit,
            keywords: search
                .episode_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            max_concurrent: search.max_concurrent_queries.max(1),
            progress: ProgressBar::hidden(),
        }
    }

    /// Report each issued query on the given progress bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Whether a filename looks like an episode of the series.
    ///
    /// The name variant must appear in the filename; then either an episode
    /// rule matches or one of the configured keywords is present.
    pub fn is_likely_episode(&self, filename: &str, name_variant: &str) -> bool {
        let lower = filename.to_lowercase();
        if !lower.contains(&name_variant.to_lowercase()) {
            return false;
        }
        if classifier::matches_any_rule(filename) {
            return true;
        }
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    fn request_for(&self, query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            category: self.category.clone(),
            sort: self.sort.clone(),
            limit: self.limit,
            offset: 0,
        }
    }

    /// Run all expanded queries for a series name.
    ///
    /// Responses are folded in query order, so the report is identical for
    /// identical backend answers whatever the concurrency.
    pub async fn aggregate(&self, series_name: &str, cancel: &CancellationToken) -> AggregateReport {
        let queries = build_queries(series_name);
        tracing::info!(
            "Searching '{}' with {} queries ({} at a time)",
            series_name,
            queries.len(),
            self.max_concurrent
        );
        self.progress.set_length(queries.len() as u64);

        let responses: Vec<(ExpandedQuery, Option<Result<SearchResponse>>)> =
            stream::iter(queries)
                .map(|query| {
                    let request = self.request_for(&query.text);
                    async move {
                        if cancel.is_cancelled() {
                            return (query, None);
                        }
                        tracing::debug!("Query: {}", request.query);
                        let response = self.provider.search(&request).await;
                        self.progress.inc(1);
                        (query, Some(response))
                    }
                })
                .buffered(self.max_concurrent)
                .collect()
                .await;

        let mut report = AggregateReport::default();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for (query, response) in responses {
            let outcome = match response {
                None => QueryOutcome::Skipped { query: query.text },
                Some(Err(e)) => {
                    tracing::warn!("Query '{}' failed: {}", query.text, e);
                    QueryOutcome::Failed {
                        failure: failure_from_error(&e),
                        query: query.text,
                    }
                }
                Some(Ok(resp)) => self.fold_response(&query, resp, &mut seen, &mut report.results),
            };
            report.outcomes.push(outcome);
        }

        report.cancelled = cancel.is_cancelled();
        tracing::info!(
            "Aggregated {} candidate files for '{}' ({} queries failed)",
            report.results.len(),
            series_name,
            report.failed_count()
        );
        report
    }

    fn fold_response(
        &self,
        query: &ExpandedQuery,
        response: SearchResponse,
        seen: &mut HashSet<(String, String)>,
        results: &mut Vec<RawResult>,
    ) -> QueryOutcome {
        if let SearchStatus::Failed { status, message } = response.status {
            tracing::warn!("Query '{}' rejected with status {}", query.text, status);
            return QueryOutcome::Failed {
                query: query.text.clone(),
                failure: QueryFailure::Rejected { status, message },
            };
        }

        let returned = response.files.len();
        let mut accepted = 0;
        for file in response.files {
            if !self.is_likely_episode(&file.name, &query.name_variant) {
                continue;
            }
            if !seen.insert((file.name.clone(), file.ident.clone())) {
                continue;
            }
            accepted += 1;
            results.push(RawResult {
                name: file.name,
                ident: file.ident,
                size: file.size,
                source_query: query.text.clone(),
                name_variant: query.name_variant.clone(),
            });
        }

        tracing::debug!(
            "Query '{}': {} returned, {} new",
            query.text,
            returned,
            accepted
        );
        QueryOutcome::Completed {
            query: query.text.clone(),
            returned,
            accepted,
        }
    }
}

fn failure_from_error(error: &Error) -> QueryFailure {
    match error {
        Error::MalformedResponse { reason, .. } => QueryFailure::Malformed(reason.clone()),
        Error::Xml(e) => QueryFailure::Malformed(e.to_string()),
        Error::Transport { reason, .. } => QueryFailure::Transport(reason.clone()),
        Error::SearchRejected { status, .. } => QueryFailure::Rejected {
            status: status.clone(),
            message: None,
        },
        other => QueryFailure::Transport(other.to_string()),
    }
}
