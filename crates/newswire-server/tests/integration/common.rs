use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use newswire_core::testutil::{MockNewsClient, MockStore, StaticApiKey};
use newswire_core::traits::{ApiKeySource, NewsClient, Store};
use newswire_server::routes;
use newswire_server::state::AppState;

pub const TEST_API_KEY: &str = "test-upstream-key";

/// Router over the given upstream mock, a healthy store and a present key.
pub fn setup_test_app(client: MockNewsClient) -> Router {
    app(client, StaticApiKey::new(TEST_API_KEY), MockStore::new())
}

pub fn app<C, K, S>(client: C, keys: K, store: S) -> Router
where
    C: NewsClient + 'static,
    K: ApiKeySource + 'static,
    S: Store + 'static,
{
    routes::router(Arc::new(AppState::new(client, keys, store)))
}

/// Send a GET and return the status plus the decoded JSON body.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, Method::GET, uri).await
}

/// Send a bodiless request and return the status plus the decoded JSON body.
pub async fn send_json(app: Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    assert_eq!(
        response.headers()["content-type"],
        "application/json",
        "{uri}"
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}
