use std::path::Path;
use std::time::Duration;

use uuid::Uuid;

use crate::clock::RowIdSequence;
use crate::error::AppError;
use crate::models::{IngestionLog, NewsResponse, QueryKey, TopQueryEntry};
use crate::params::{Language, ListParams};
use crate::persistence;
use crate::traits::{ApiKeySource, Clock, NewsClient, Store, get_within};

/// Deadline applied to every upstream call.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Language every curated query is restricted to.
pub const INGEST_LANGUAGE: Language = Language::En;

/// Built-in curated table.
pub fn default_top_queries() -> Vec<TopQueryEntry> {
    vec![
        TopQueryEntry::new(
            QueryKey::Domains,
            ["techcrunch.com", "nytimes.com", "wsj.com"],
        ),
        TopQueryEntry::new(
            QueryKey::Sources,
            ["bloomberg", "financial-times", "the-wall-street-journal"],
        ),
        TopQueryEntry::new(QueryKey::Query, ["bitcoin", "ethereum", "blockchain"]),
    ]
}

/// Load a curated table from a JSON array of `{"key": ..., "values": [...]}`.
pub fn load_top_queries(path: impl AsRef<Path>) -> Result<Vec<TopQueryEntry>, AppError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::ConfigError(format!("reading top queries {}: {e}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::ConfigError(format!("parsing top queries {}: {e}", path.display()))
    })
}

/// Build the `everything` parameters for one curated entry, or `None` when
/// the key is not one ingestion knows how to query.
pub fn params_for(entry: &TopQueryEntry) -> Option<ListParams> {
    let mut params = ListParams {
        language: Some(INGEST_LANGUAGE),
        ..Default::default()
    };
    match &entry.key {
        QueryKey::Domains => params.domains = entry.values.join(","),
        QueryKey::Sources => params.sources = entry.values.join(","),
        QueryKey::Query => {
            params.query = entry
                .values
                .iter()
                .map(|v| phrase(v))
                .collect::<Vec<_>>()
                .join("+")
        }
        QueryKey::Unknown(_) => return None,
    }
    Some(params)
}

/// Quote `value` so the upstream matches it as an exact phrase.
fn phrase(value: &str) -> String {
    format!("\"{value}\"")
}

/// Fetches every curated query and persists the returned articles.
///
/// Generic over the upstream client, the store, the key lookup and the clock
/// so tests can run it without network or database access.
pub struct IngestionJob<C, S, K, T>
where
    C: NewsClient,
    S: Store,
    K: ApiKeySource,
    T: Clock,
{
    client: C,
    store: S,
    keys: K,
    clock: T,
    top_queries: Vec<TopQueryEntry>,
    ids: RowIdSequence,
    timeout: Duration,
}

impl<C, S, K, T> IngestionJob<C, S, K, T>
where
    C: NewsClient,
    S: Store,
    K: ApiKeySource,
    T: Clock,
{
    /// Create a job over the built-in curated table.
    pub fn new(client: C, store: S, keys: K, clock: T) -> Self {
        Self {
            client,
            store,
            keys,
            clock,
            top_queries: default_top_queries(),
            ids: RowIdSequence::new(),
            timeout: UPSTREAM_TIMEOUT,
        }
    }

    pub fn with_top_queries(mut self, top_queries: Vec<TopQueryEntry>) -> Self {
        self.top_queries = top_queries;
        self
    }

    /// Share an id sequence with other jobs in the same process.
    pub fn with_ids(mut self, ids: RowIdSequence) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn top_queries(&self) -> &[TopQueryEntry] {
        &self.top_queries
    }

    /// Run every curated entry in order.
    ///
    /// Unknown keys are logged and left out of the returned log. The first
    /// key lookup, upstream, or store failure aborts the run.
    pub async fn ingest(&self) -> Result<IngestionLog, AppError> {
        let run_id = Uuid::new_v4();
        let start = self.clock.now();
        let mut queried = Vec::with_capacity(self.top_queries.len());

        tracing::info!(%run_id, entries = self.top_queries.len(), "Starting ingestion");

        for entry in &self.top_queries {
            let Some(params) = params_for(entry) else {
                tracing::warn!(%run_id, key = %entry.key, "Skipping unknown top query key");
                continue;
            };

            let response = self.fetch_and_persist(&params).await.inspect_err(|e| {
                tracing::error!(%run_id, key = %entry.key, error = %e, "Ingestion aborted");
            })?;
            tracing::info!(
                %run_id,
                key = %entry.key,
                articles = response.articles.len(),
                total = response.total_results,
                "Fetched top query"
            );
            queried.push(entry.clone());
        }

        let elapsed_time = self.clock.since(start);
        tracing::info!(
            %run_id,
            queried = queried.len(),
            elapsed_ms = elapsed_time.as_millis() as u64,
            "Ingestion complete"
        );

        Ok(IngestionLog {
            run_id,
            queried,
            elapsed_time,
        })
    }

    /// Fetch one parameter set and persist its articles.
    ///
    /// An empty article list is returned as an empty response without
    /// touching the store. The deadline covers the upstream call only.
    pub async fn fetch_and_persist(&self, params: &ListParams) -> Result<NewsResponse, AppError> {
        let api_key = self.keys.api_key()?;
        let response = get_within(&self.client, &api_key, params, self.timeout).await?;

        if response.articles.is_empty() {
            return Ok(NewsResponse::empty(response.status));
        }

        persistence::create(&self.store, &self.clock, &self.ids, &response.articles).await?;
        Ok(response)
    }
}
