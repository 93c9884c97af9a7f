use std::time::Duration;

use newswire_core::UPSTREAM_TIMEOUT;
use newswire_core::traits::{ApiKeySource, NewsClient, Store};

/// Shared application state, available to all route handlers via
/// `State<Arc<AppState<..>>>`.
pub struct AppState<C, K, S>
where
    C: NewsClient,
    K: ApiKeySource,
    S: Store,
{
    pub client: C,
    pub keys: K,
    /// Only used by the health probe; request handlers never write.
    pub store: S,
    /// Deadline for each upstream call.
    pub timeout: Duration,
}

impl<C, K, S> AppState<C, K, S>
where
    C: NewsClient,
    K: ApiKeySource,
    S: Store,
{
    pub fn new(client: C, keys: K, store: S) -> Self {
        Self {
            client,
            keys,
            store,
            timeout: UPSTREAM_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
