use newswire_core::error::AppError;
use newswire_core::models::{NewsResponse, UpstreamError};
use newswire_core::params::{API_BASE_URL, ParamSet};
use newswire_core::traits::NewsClient;
use reqwest::{Client, StatusCode};
use url::Url;

/// Header carrying the upstream API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Upstream news API client using reqwest.
///
/// Stateless apart from the shared connection pool, so clones are cheap and
/// safe to use from concurrent requests. Deadlines are applied by the caller.
#[derive(Clone)]
pub struct ReqwestNewsClient {
    client: Client,
    base_url: String,
}

impl ReqwestNewsClient {
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Target a different upstream, e.g. a local stub.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("newswire/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::ConfigError(format!("building HTTP client: {e}")))?;
        Ok(Self::from_client(client, base_url))
    }

    /// Reuse an existing reqwest pool.
    pub fn from_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl NewsClient for ReqwestNewsClient {
    async fn get<P: ParamSet>(&self, api_key: &str, params: &P) -> Result<NewsResponse, AppError> {
        let query = params.encode()?;
        let endpoint = params.endpoint();

        let mut url = Url::parse(&endpoint.url(&self.base_url))
            .map_err(|e| AppError::ConfigError(format!("invalid upstream URL: {e}")))?;
        url.set_query(Some(&query));

        tracing::debug!(%endpoint, query = %query, "Dispatching upstream request");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| AppError::UpstreamTransport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamTransport(format!("reading response body: {e}")))?;

        if status == StatusCode::OK {
            let news: NewsResponse = serde_json::from_slice(&body)
                .map_err(|e| AppError::UpstreamDecode(e.to_string()))?;
            tracing::debug!(
                %endpoint,
                articles = news.articles.len(),
                total = news.total_results,
                "Upstream request succeeded"
            );
            return Ok(news);
        }

        let error: UpstreamError = serde_json::from_slice(&body).map_err(|e| {
            AppError::UpstreamDecode(format!("HTTP {} with undecodable body: {e}", status.as_u16()))
        })?;
        tracing::warn!(
            %endpoint,
            status = status.as_u16(),
            code = %error.code,
            "Upstream returned an error"
        );
        Err(AppError::Upstream(error))
    }
}
