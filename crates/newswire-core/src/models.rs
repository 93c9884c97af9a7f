use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Publisher of an article as reported by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// One news item as returned by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "urlToImage")]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Successful upstream body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl NewsResponse {
    /// A response carrying no articles, keeping the upstream status.
    pub fn empty(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            total_results: 0,
            articles: Vec::new(),
        }
    }
}

/// Structured error body returned by the upstream on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamError {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Which `everything` parameter a curated entry feeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QueryKey {
    Domains,
    Sources,
    Query,
    /// A key this version does not know how to query; skipped at ingestion.
    Unknown(String),
}

impl QueryKey {
    pub fn as_str(&self) -> &str {
        match self {
            QueryKey::Domains => "domains",
            QueryKey::Sources => "sources",
            QueryKey::Query => "query",
            QueryKey::Unknown(key) => key,
        }
    }
}

impl From<String> for QueryKey {
    fn from(key: String) -> Self {
        match key.as_str() {
            "domains" => QueryKey::Domains,
            "sources" => QueryKey::Sources,
            "query" => QueryKey::Query,
            _ => QueryKey::Unknown(key),
        }
    }
}

impl From<QueryKey> for String {
    fn from(key: QueryKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One curated `(key, values)` pair driving ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopQueryEntry {
    pub key: QueryKey,
    pub values: Vec<String>,
}

impl TopQueryEntry {
    pub fn new<I, S>(key: QueryKey, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionLog {
    pub run_id: Uuid,
    /// Entries actually fetched, in curated order.
    pub queried: Vec<TopQueryEntry>,
    #[serde(rename = "elapsedMs", serialize_with = "serialize_millis")]
    pub elapsed_time: Duration,
}

fn serialize_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
