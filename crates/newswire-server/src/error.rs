use axum::extract::rejection::QueryRejection;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};

use newswire_core::error::AppError;
use newswire_core::params::{Endpoint, auth_docs_url};

use crate::dto::{ErrorResponse, FieldError, FieldErrors};

/// Error leaving the request pipeline. Serializes to [`ErrorResponse`] with
/// the embedded status code.
#[derive(Debug, Clone)]
pub struct HttpError(pub ErrorResponse);

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>, request_url: impl Into<String>) -> Self {
        Self(ErrorResponse {
            status_code: status.as_u16(),
            message: message.into(),
            request_url: request_url.into(),
            docs_url: None,
            errors: Vec::new(),
        })
    }

    pub fn not_found(request_url: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "page not found", request_url)
    }

    pub fn method_not_allowed(method: &Method, request_url: impl Into<String>) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("method {method} not allowed"),
            request_url,
        )
    }

    pub fn with_docs(mut self, docs_url: impl Into<String>) -> Self {
        self.0.docs_url = Some(docs_url.into());
        self
    }

    /// Map a pipeline failure on `endpoint`.
    ///
    /// Key lookup failures point at the authentication docs, other client
    /// faults at the endpoint docs. Everything else is a 500.
    pub fn from_app(err: AppError, request_url: &str, endpoint: Endpoint) -> Self {
        match err {
            AppError::MissingAuthKey => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), request_url)
                    .with_docs(auth_docs_url())
            }
            err if err.is_client_fault() => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), request_url)
                    .with_docs(endpoint.docs_url())
            }
            err => {
                tracing::error!(%endpoint, error = %err, "Request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), request_url)
            }
        }
    }

    /// Map a query string that could not be decoded into `endpoint`'s params.
    pub fn from_rejection(rejection: QueryRejection, request_url: &str, endpoint: Endpoint) -> Self {
        let detail = rejection.body_text();
        let detail = detail
            .strip_prefix("Failed to deserialize query string: ")
            .unwrap_or(&detail)
            .to_string();

        let mut err = Self::from_app(AppError::DecodeParams(detail.clone()), request_url, endpoint);
        if let Some(field) = offending_field(&detail) {
            err.0.errors.push(FieldErrors {
                message: err.0.message.clone(),
                errors: vec![FieldError {
                    field,
                    errors: vec![detail],
                }],
            });
        }
        err
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), axum::Json(self.0)).into_response()
    }
}

/// Pull the field name out of serde's `unknown field `x`` style messages.
fn offending_field(detail: &str) -> Option<String> {
    ["unknown field `", "missing field `", "duplicate field `"]
        .iter()
        .find_map(|prefix| {
            let start = detail.find(prefix)? + prefix.len();
            let len = detail[start..].find('`')?;
            Some(detail[start..start + len].to_string())
        })
}
