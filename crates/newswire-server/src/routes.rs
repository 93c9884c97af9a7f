use std::sync::Arc;

use axum::Router;
use axum::extract::{OriginalUri, Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use serde::de::DeserializeOwned;
use utoipa::OpenApi;

use newswire_core::params::{Endpoint, HeadlinesParams, ListParams, ParamSet};
use newswire_core::traits::{ApiKeySource, NewsClient, Store, get_within};

use crate::dto::{HealthResponse, SuccessEnvelope};
use crate::error::HttpError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router<C, K, S>(state: Arc<AppState<C, K, S>>) -> Router
where
    C: NewsClient + 'static,
    K: ApiKeySource + 'static,
    S: Store + 'static,
{
    Router::new()
        .route("/api/list", get(list::<C, K, S>))
        .route("/api/headlines", get(headlines::<C, K, S>))
        .route("/health", get(health::<C, K, S>))
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/list",
    params(
        ("query" = Option<String>, Query, description = "Keywords or phrase to search for"),
        ("sources" = Option<String>, Query, description = "Comma-separated source ids"),
        ("domains" = Option<String>, Query, description = "Comma-separated domains"),
        ("from" = Option<String>, Query, description = "Oldest article, ISO 8601"),
        ("to" = Option<String>, Query, description = "Newest article, ISO 8601"),
        ("language" = Option<String>, Query, description = "2-letter ISO-639-1 code"),
        ("sortBy" = Option<String>, Query, description = "relevancy, popularity or publishedAt"),
        ("pageSize" = Option<u32>, Query, description = "At most 100"),
        ("page" = Option<u32>, Query, description = "Defaults to 1"),
    ),
    responses(
        (status = 200, description = "Matching articles", body = SuccessEnvelope),
        (status = 400, description = "Invalid parameters or upstream failure", body = crate::dto::ErrorResponse),
    ),
    tag = "news"
)]
pub async fn list<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    OriginalUri(uri): OriginalUri,
) -> Result<SuccessEnvelope, HttpError>
where
    C: NewsClient,
    K: ApiKeySource,
    S: Store,
{
    let params: ListParams = decode(&uri, Endpoint::Everything)?;
    let page = params.page;
    fetch(&state, &uri, &params, page).await
}

#[utoipa::path(
    get,
    path = "/api/headlines",
    params(
        ("country" = Option<String>, Query, description = "2-letter ISO 3166-1 code"),
        ("category" = Option<String>, Query, description = "Category to get headlines for"),
        ("sources" = Option<String>, Query, description = "Comma-separated source ids, not mixable with country or category"),
        ("query" = Option<String>, Query, description = "Keywords or phrase to search for"),
        ("pageSize" = Option<u32>, Query, description = "At most 100"),
        ("page" = Option<u32>, Query, description = "Defaults to 1"),
    ),
    responses(
        (status = 200, description = "Top headlines", body = SuccessEnvelope),
        (status = 400, description = "Invalid parameters or upstream failure", body = crate::dto::ErrorResponse),
    ),
    tag = "news"
)]
pub async fn headlines<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    OriginalUri(uri): OriginalUri,
) -> Result<SuccessEnvelope, HttpError>
where
    C: NewsClient,
    K: ApiKeySource,
    S: Store,
{
    let params: HeadlinesParams = decode(&uri, Endpoint::TopHeadlines)?;
    let page = params.page;
    fetch(&state, &uri, &params, page).await
}

/// Path and query exactly as the client sent them.
fn request_url(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

fn decode<P: DeserializeOwned>(uri: &Uri, endpoint: Endpoint) -> Result<P, HttpError> {
    Query::try_from_uri(uri)
        .map(|Query(params)| params)
        .map_err(|rejection| HttpError::from_rejection(rejection, &request_url(uri), endpoint))
}

/// Resolve the key, call the upstream under the deadline and shape the result.
async fn fetch<C, K, S, P>(
    state: &AppState<C, K, S>,
    uri: &Uri,
    params: &P,
    page: u32,
) -> Result<SuccessEnvelope, HttpError>
where
    C: NewsClient,
    K: ApiKeySource,
    S: Store,
    P: ParamSet,
{
    let url = request_url(uri);
    let endpoint = params.endpoint();
    let fail = |e| HttpError::from_app(e, &url, endpoint);

    let api_key = state.keys.api_key().map_err(fail)?;
    let upstream = get_within(&state.client, &api_key, params, state.timeout)
        .await
        .map_err(fail)?;

    tracing::info!(
        %endpoint,
        articles = upstream.articles.len(),
        total = upstream.total_results,
        "Served news request"
    );
    Ok(SuccessEnvelope::new(url, page, upstream))
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health<C, K, S>(State(state): State<Arc<AppState<C, K, S>>>) -> impl IntoResponse
where
    C: NewsClient,
    K: ApiKeySource,
    S: Store,
{
    let healthy = match state.store.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let (status, response) = if healthy {
        (
            StatusCode::OK,
            HealthResponse {
                status: "healthy",
                database: "ok",
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "unhealthy",
                database: "error",
            },
        )
    };

    (status, axum::Json(response))
}

async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}

async fn not_found(OriginalUri(uri): OriginalUri) -> HttpError {
    HttpError::not_found(request_url(&uri))
}

async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> HttpError {
    HttpError::method_not_allowed(&method, request_url(&uri))
}
