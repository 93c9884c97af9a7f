//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{Article, NewsResponse, Source};
use crate::params::{Endpoint, ParamSet};
use crate::store::{Row, check_arity};
use crate::traits::{Clock, NewsClient, Store};

pub use crate::auth::StaticApiKey;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// An article titled `title`, optionally attributed to `(id, name)`.
pub fn article(title: &str, source: Option<(&str, &str)>) -> Article {
    Article {
        source: source.map(|(id, name)| Source {
            id: Some(id.to_string()),
            name: name.to_string(),
        }),
        author: None,
        title: Some(title.to_string()),
        description: None,
        url: Some(format!("https://example.com/{title}")),
        image_url: None,
        published_at: "2018-07-28T14:28:41Z"
            .parse()
            .expect("valid fixture timestamp"),
    }
}

pub fn news_response(total_results: u64, articles: Vec<Article>) -> NewsResponse {
    NewsResponse {
        status: "ok".to_string(),
        total_results,
        articles,
    }
}

// ---------------------------------------------------------------------------
// MockNewsClient
// ---------------------------------------------------------------------------

/// One recorded upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub api_key: String,
    pub endpoint: Endpoint,
    pub query: String,
}

/// Mock upstream client. Encodes the params like the real client, records
/// the call, then pops the next queued response.
#[derive(Clone)]
pub struct MockNewsClient {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns `default`.
    responses: Arc<Mutex<Vec<Result<NewsResponse, AppError>>>>,
    default: NewsResponse,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Option<Duration>,
}

impl MockNewsClient {
    /// Always answer with `response`.
    pub fn new(response: NewsResponse) -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default: response,
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<NewsResponse, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::new(NewsResponse::empty("ok"))
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl NewsClient for MockNewsClient {
    async fn get<P: ParamSet>(&self, api_key: &str, params: &P) -> Result<NewsResponse, AppError> {
        let query = params.encode()?;
        self.calls.lock().unwrap().push(RecordedCall {
            api_key: api_key.to_string(),
            endpoint: params.endpoint(),
            query,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default.clone())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// One recorded bulk insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Mock store that records inserts and fails on configured tables.
#[derive(Clone, Default)]
pub struct MockStore {
    inserts: Arc<Mutex<Vec<Insert>>>,
    errors: Arc<Mutex<HashMap<String, AppError>>>,
    unhealthy: Arc<Mutex<bool>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next insert into `table` with `error`.
    pub fn fail_on(self, table: &str, error: AppError) -> Self {
        self.errors.lock().unwrap().insert(table.to_string(), error);
        self
    }

    /// Make `health_check` fail.
    pub fn unhealthy(self) -> Self {
        *self.unhealthy.lock().unwrap() = true;
        self
    }

    /// Successful inserts, in submission order.
    pub fn inserts(&self) -> Vec<Insert> {
        self.inserts.lock().unwrap().clone()
    }
}

impl Store for MockStore {
    async fn create(&self, table: &str, columns: &[&str], rows: Vec<Row>) -> Result<(), AppError> {
        if let Some(e) = self.errors.lock().unwrap().remove(table) {
            return Err(e);
        }
        check_arity(table, columns, &rows)?;
        self.inserts.lock().unwrap().push(Insert {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        });
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if *self.unhealthy.lock().unwrap() {
            Err(AppError::DatabaseError("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// FixedClock
// ---------------------------------------------------------------------------

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Parse an RFC 3339 instant. Panics on bad input.
    pub fn at(rfc3339: &str) -> Self {
        Self::new(rfc3339.parse().expect("valid RFC 3339 instant"))
    }

    pub fn set(&self, rfc3339: &str) {
        *self.now.lock().unwrap() = rfc3339.parse().expect("valid RFC 3339 instant");
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).expect("duration in range");
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
