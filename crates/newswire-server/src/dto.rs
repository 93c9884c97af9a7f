use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;

use newswire_core::models::{Article, NewsResponse, Source};

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SourceResponse {
    pub id: Option<String>,
    pub name: String,
}

impl From<Source> for SourceResponse {
    fn from(source: Source) -> Self {
        Self {
            id: source.id,
            name: source.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub source: Option<SourceResponse>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "urlToImage")]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            source: article.source.map(Into::into),
            author: article.author,
            title: article.title,
            description: article.description,
            url: article.url,
            image_url: article.image_url,
            published_at: article.published_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Body of every successful news response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SuccessEnvelope {
    pub code: u16,
    #[serde(rename = "requestURL")]
    pub request_url: String,
    /// Number of articles in `data`.
    pub count: usize,
    pub page: u32,
    /// Upstream `totalResults`.
    #[serde(rename = "totalCount")]
    pub total_count: u64,
    pub data: Vec<ArticleResponse>,
}

impl SuccessEnvelope {
    /// Wrap an upstream response. A zero `page` is reported as 1.
    pub fn new(request_url: impl Into<String>, page: u32, upstream: NewsResponse) -> Self {
        let data: Vec<ArticleResponse> = upstream.articles.into_iter().map(Into::into).collect();
        Self {
            code: StatusCode::OK.as_u16(),
            request_url: request_url.into(),
            count: data.len(),
            page: page.max(1),
            total_count: upstream.total_results,
            data,
        }
    }
}

impl IntoResponse for SuccessEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, axum::Json(self)).into_response()
    }
}

/// One field that failed to decode.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Errors")]
    pub errors: Vec<String>,
}

/// A group of field errors sharing one message.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct FieldErrors {
    pub message: String,
    pub errors: Vec<FieldError>,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub request_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrors>,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}
