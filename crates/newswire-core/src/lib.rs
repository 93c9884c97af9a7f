pub mod auth;
pub mod clock;
pub mod error;
pub mod ingest;
pub mod models;
pub mod params;
pub mod persistence;
pub mod store;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use auth::{EnvApiKey, StaticApiKey};
pub use clock::{RowIdSequence, SystemClock};
pub use error::AppError;
pub use ingest::{IngestionJob, UPSTREAM_TIMEOUT, default_top_queries, load_top_queries};
pub use models::{Article, IngestionLog, NewsResponse, Source, TopQueryEntry, UpstreamError};
pub use params::{Endpoint, HeadlinesParams, ListParams, ParamSet};
pub use traits::{ApiKeySource, Clock, NewsClient, Store, get_within};
