//! REST API server: routes, response envelopes, scheduled ingestion, and
//! OpenAPI documentation.

pub mod config;
pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod scheduler;
pub mod state;
