use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Endpoint, ParamSet, QueryPairs, empty_as_none, instant_opt};
use crate::error::AppError;

/// Order to sort `everything` results in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortBy {
    /// Articles more closely related to the query first.
    #[serde(rename = "relevancy")]
    Relevancy,
    /// Articles from popular sources and publishers first.
    #[serde(rename = "popularity")]
    Popularity,
    /// Newest articles first.
    #[serde(rename = "publishedAt")]
    PublishedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevancy => "relevancy",
            SortBy::Popularity => "popularity",
            SortBy::PublishedAt => "publishedAt",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevancy" => Ok(SortBy::Relevancy),
            "popularity" => Ok(SortBy::Popularity),
            "publishedAt" => Ok(SortBy::PublishedAt),
            _ => Err(format!(
                "unknown sortBy `{s}`, expected one of: relevancy, popularity, publishedAt"
            )),
        }
    }
}

/// 2-letter ISO-639-1 code of the language to get news for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ar,
    De,
    En,
    Es,
    Fr,
    He,
    It,
    Nl,
    No,
    Pt,
    Ru,
    Se,
    Ud,
    Zh,
}

impl Language {
    pub const ALL: [Language; 14] = [
        Language::Ar,
        Language::De,
        Language::En,
        Language::Es,
        Language::Fr,
        Language::He,
        Language::It,
        Language::Nl,
        Language::No,
        Language::Pt,
        Language::Ru,
        Language::Se,
        Language::Ud,
        Language::Zh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::De => "de",
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::He => "he",
            Language::It => "it",
            Language::Nl => "nl",
            Language::No => "no",
            Language::Pt => "pt",
            Language::Ru => "ru",
            Language::Se => "se",
            Language::Ud => "ud",
            Language::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown language `{s}`, expected a 2-letter ISO-639-1 code"))
    }
}

/// Request parameters for the `everything` endpoint.
///
/// At least one of `query`, `sources` or `domains` must be set.
/// See <https://newsapi.org/docs/endpoints/everything>.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ListParams {
    /// Keywords or phrase to search for.
    pub query: String,
    /// Comma-separated news source ids.
    pub sources: String,
    /// Comma-separated domains to restrict the search to.
    pub domains: String,
    /// Oldest article allowed.
    #[serde(deserialize_with = "instant_opt")]
    pub from: Option<DateTime<Utc>>,
    /// Newest article allowed.
    #[serde(deserialize_with = "instant_opt")]
    pub to: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "empty_as_none")]
    pub language: Option<Language>,
    #[serde(deserialize_with = "empty_as_none")]
    pub sort_by: Option<SortBy>,
    pub page_size: u32,
    pub page: u32,
}

impl ListParams {
    const REQUIRED: &'static str = "query, sources, domains";

    fn has_required(&self) -> bool {
        !(self.query.is_empty() && self.sources.is_empty() && self.domains.is_empty())
    }
}

impl ParamSet for ListParams {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Everything
    }

    fn encode(&self) -> Result<String, AppError> {
        if !self.has_required() {
            return Err(AppError::NoRequiredParams(Self::REQUIRED));
        }

        let mut q = QueryPairs::new();
        q.push("q", self.query.as_str());
        q.push("sources", self.sources.as_str());
        q.push("domains", self.domains.as_str());
        q.push_instant("from", self.from.as_ref());
        q.push_instant("to", self.to.as_ref());
        if let Some(language) = self.language {
            q.push("language", language.as_str());
        }
        if let Some(sort_by) = self.sort_by {
            q.push("sortBy", sort_by.as_str());
        }

        q.paginate(self.page, self.page_size)?;
        Ok(q.finish())
    }
}
