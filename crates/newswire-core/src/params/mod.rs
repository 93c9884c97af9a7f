//! Parameter sets for the upstream endpoints.
//!
//! Each set validates its own field combinations and encodes itself into the
//! canonical query string the upstream expects: keys sorted, values
//! form-encoded, unset fields omitted.

pub mod headlines;
pub mod list;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::error::AppError;

pub use headlines::HeadlinesParams;
pub use list::{Language, ListParams, SortBy};

/// Base URL of the upstream news API.
pub const API_BASE_URL: &str = "https://newsapi.org/v2";

/// Base URL of the upstream documentation, used in error hints.
pub const DOCS_BASE_URL: &str = "https://newsapi.org/docs";

/// Largest page the upstream serves.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Upstream endpoint a parameter set targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Everything,
    TopHeadlines,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Everything => "/everything",
            Endpoint::TopHeadlines => "/top-headlines",
        }
    }

    /// Absolute request URL under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }

    pub fn docs_url(&self) -> String {
        format!("{DOCS_BASE_URL}/endpoints{}", self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

/// Documentation section for API key failures.
pub fn auth_docs_url() -> String {
    format!("{DOCS_BASE_URL}/authentication")
}

/// A validated, encodable bundle of query parameters for one endpoint.
pub trait ParamSet: Send + Sync {
    fn endpoint(&self) -> Endpoint;

    /// Encode into a query string. The result is never empty on success.
    fn encode(&self) -> Result<String, AppError>;
}

/// Ordered key/value accumulator using the upstream's literal parameter names.
#[derive(Debug, Default)]
pub(crate) struct QueryPairs {
    pairs: BTreeMap<&'static str, String>,
}

impl QueryPairs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append `value` under `key` unless it is empty.
    pub(crate) fn push(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.pairs.insert(key, value);
        }
    }

    pub(crate) fn push_instant(&mut self, key: &'static str, value: Option<&DateTime<Utc>>) {
        if let Some(instant) = value {
            self.push(key, instant.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Bounds-check and append `page` / `pageSize`; zero means unset.
    pub(crate) fn paginate(&mut self, page: u32, page_size: u32) -> Result<(), AppError> {
        if page_size > MAX_PAGE_SIZE {
            return Err(AppError::InvalidPageSize {
                max: MAX_PAGE_SIZE,
                requested: page_size,
            });
        }
        if page != 0 {
            self.push("page", page.to_string());
        }
        if page_size != 0 {
            self.push("pageSize", page_size.to_string());
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// Parse the ISO forms the upstream documents: RFC 3339, a naive
/// `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a bare `YYYY-MM-DD` date.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(format!(
        "invalid date `{raw}`, expected ISO 8601 such as 2018-07-28 or 2018-07-28T14:28:41"
    ))
}

/// Treat an absent or blank value as unset, otherwise parse with `FromStr`.
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

pub(crate) fn instant_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_instant(value).map(Some).map_err(de::Error::custom),
    }
}
