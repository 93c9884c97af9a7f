use thiserror::Error;

use crate::models::UpstreamError;

/// Application-wide error types for newswire.
#[derive(Error, Debug)]
pub enum AppError {
    /// `API_KEY` is not present in the process environment.
    #[error("missing API key in the environment")]
    MissingAuthKey,

    /// None of the parameters the endpoint requires was supplied.
    #[error("required parameters are missing: {0}")]
    NoRequiredParams(&'static str),

    /// `sources` was combined with `country` or `category` on top headlines.
    #[error("mixing `sources` with the `{0}` param")]
    MixedExclusiveParams(&'static str),

    /// Requested page size is above what the upstream accepts.
    #[error("invalid page size, the maximum page size is {max}, you requested {requested}")]
    InvalidPageSize { max: u32, requested: u32 },

    /// Inbound query string could not be decoded into a parameter set.
    #[error("decoding query parameters: {0}")]
    DecodeParams(String),

    /// Network failure while calling the upstream API.
    #[error("dispatching request: {0}")]
    UpstreamTransport(String),

    /// Upstream body could not be parsed.
    #[error("error decoding response: {0}")]
    UpstreamDecode(String),

    /// Upstream answered with a structured error body.
    #[error("{0}")]
    Upstream(UpstreamError),

    /// Upstream call exceeded its deadline.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Store refused a row batch.
    #[error("database error: {0}")]
    DatabaseError(String),

    /// Invalid or missing process configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Returns true if the failure was caused by the request or the upstream
    /// rather than by this service. Client faults surface as 400s.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            AppError::MissingAuthKey
                | AppError::NoRequiredParams(_)
                | AppError::MixedExclusiveParams(_)
                | AppError::InvalidPageSize { .. }
                | AppError::DecodeParams(_)
                | AppError::UpstreamTransport(_)
                | AppError::UpstreamDecode(_)
                | AppError::Upstream(_)
                | AppError::Timeout(_)
        )
    }
}
