use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::NewsResponse;
use crate::params::ParamSet;
use crate::store::Row;

/// Outbound client for the upstream news API.
pub trait NewsClient: Send + Sync + Clone {
    /// Encode `params`, call the endpoint they target with `api_key`, and
    /// decode either the success body or the structured error body.
    fn get<P: ParamSet>(
        &self,
        api_key: &str,
        params: &P,
    ) -> impl Future<Output = Result<NewsResponse, AppError>> + Send;
}

/// Call `client.get` under `deadline`. Dropping the returned future cancels
/// the in-flight request.
pub async fn get_within<C, P>(
    client: &C,
    api_key: &str,
    params: &P,
    deadline: Duration,
) -> Result<NewsResponse, AppError>
where
    C: NewsClient,
    P: ParamSet,
{
    tokio::time::timeout(deadline, client.get(api_key, params))
        .await
        .map_err(|_| AppError::Timeout(deadline.as_secs()))?
}

/// Bulk-insert capability over a relational backend.
pub trait Store: Send + Sync + Clone {
    /// Insert `rows` into `table`, mapping values positionally onto `columns`.
    /// All rows become visible or none do.
    fn create(
        &self,
        table: &str,
        columns: &[&str],
        rows: Vec<Row>,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Check backend connectivity.
    fn health_check(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Resolves the upstream API key. Looked up on every call, never cached.
pub trait ApiKeySource: Send + Sync + Clone {
    fn api_key(&self) -> Result<String, AppError>;
}

/// Time source.
pub trait Clock: Send + Sync + Clone {
    fn now(&self) -> DateTime<Utc>;

    /// Elapsed time since `start`; zero if the clock went backwards.
    fn since(&self, start: DateTime<Utc>) -> Duration {
        (self.now() - start).to_std().unwrap_or_default()
    }
}
