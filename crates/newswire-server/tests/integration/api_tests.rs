use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};

use newswire_core::AppError;
use newswire_core::models::UpstreamError;
use newswire_core::params::Endpoint;
use newswire_core::testutil::{MockNewsClient, MockStore, StaticApiKey, article, news_response};
use newswire_server::routes;
use newswire_server::state::AppState;

use crate::integration::common::{TEST_API_KEY, app, get_json, send_json, setup_test_app};

// ---------------------------------------------------------------------------
// /api/list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_happy_path() {
    let client = MockNewsClient::new(news_response(
        42,
        vec![
            article("a1", Some(("bloomberg", "Bloomberg"))),
            article("a2", None),
        ],
    ));

    let (status, json) = get_json(setup_test_app(client.clone()), "/api/list?query=bitcoin").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 200);
    assert_eq!(json["requestURL"], "/api/list?query=bitcoin");
    assert_eq!(json["count"], 2);
    assert_eq!(json["page"], 1);
    assert_eq!(json["totalCount"], 42);
    assert_eq!(json["data"][0]["title"], "a1");
    assert_eq!(json["data"][0]["source"]["id"], "bloomberg");
    assert_eq!(json["data"][1]["title"], "a2");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].api_key, TEST_API_KEY);
    assert_eq!(calls[0].endpoint, Endpoint::Everything);
    assert_eq!(calls[0].query, "q=bitcoin");
}

#[tokio::test]
async fn list_forwards_every_parameter() {
    let client = MockNewsClient::new(news_response(0, vec![]));

    let (status, json) = get_json(
        setup_test_app(client.clone()),
        "/api/list?query=bitcoin&domains=wsj.com&from=2018-07-28&language=en&sortBy=popularity&pageSize=10&page=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 2);
    assert_eq!(json["count"], 0);
    assert_eq!(json["data"], serde_json::json!([]));
    assert_eq!(
        client.calls()[0].query,
        "domains=wsj.com&from=2018-07-28T00%3A00%3A00Z&language=en&page=2&pageSize=10&q=bitcoin&sortBy=popularity"
    );
}

#[tokio::test]
async fn list_missing_required_params() {
    let client = MockNewsClient::new(news_response(0, vec![]));

    let (status, json) = get_json(setup_test_app(client.clone()), "/api/list?pageSize=20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["statusCode"], 400);
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("required parameters are missing")
    );
    assert_eq!(json["requestUrl"], "/api/list?pageSize=20");
    assert_eq!(json["docsUrl"], "https://newsapi.org/docs/endpoints/everything");
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn list_page_size_over_limit() {
    let (status, json) = get_json(
        setup_test_app(MockNewsClient::new(news_response(0, vec![]))),
        "/api/list?query=bitcoin&pageSize=101",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("maximum page size is 100"));
}

#[tokio::test]
async fn list_page_size_at_limit_is_accepted() {
    let (status, _) = get_json(
        setup_test_app(MockNewsClient::new(news_response(0, vec![]))),
        "/api/list?query=bitcoin&pageSize=100",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_field_reports_field_error() {
    let client = MockNewsClient::new(news_response(0, vec![]));

    let (status, json) = get_json(setup_test_app(client.clone()), "/api/list?query=x&foo=bar").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .starts_with("decoding query parameters")
    );
    assert_eq!(json["errors"][0]["errors"][0]["Field"], "foo");
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn invalid_enum_value_is_rejected() {
    let (status, json) = get_json(
        setup_test_app(MockNewsClient::new(news_response(0, vec![]))),
        "/api/list?query=x&sortBy=oldest",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("oldest"));
}

#[tokio::test]
async fn non_numeric_page_is_rejected() {
    let (status, json) = get_json(
        setup_test_app(MockNewsClient::new(news_response(0, vec![]))),
        "/api/list?query=x&page=two",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["statusCode"], 400);
}

// ---------------------------------------------------------------------------
// /api/headlines
// ---------------------------------------------------------------------------

#[tokio::test]
async fn headlines_happy_path() {
    let client = MockNewsClient::new(news_response(7, vec![article("h1", None)]));

    let (status, json) = get_json(
        setup_test_app(client.clone()),
        "/api/headlines?country=us&category=business",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["totalCount"], 7);
    assert_eq!(json["page"], 1);

    let calls = client.calls();
    assert_eq!(calls[0].endpoint, Endpoint::TopHeadlines);
    assert_eq!(calls[0].query, "category=business&country=us");
}

#[tokio::test]
async fn headlines_exclusive_conflict() {
    let client = MockNewsClient::new(news_response(0, vec![]));

    let (status, json) = get_json(
        setup_test_app(client.clone()),
        "/api/headlines?sources=a&country=us",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("mixing `sources` with the `country` param")
    );
    assert_eq!(
        json["docsUrl"],
        "https://newsapi.org/docs/endpoints/top-headlines"
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn headlines_require_one_selector() {
    let (status, json) = get_json(
        setup_test_app(MockNewsClient::new(news_response(0, vec![]))),
        "/api/headlines",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("sources, query, country, category")
    );
}

// ---------------------------------------------------------------------------
// Upstream and key failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_error_is_surfaced() {
    let client = MockNewsClient::with_error(AppError::Upstream(UpstreamError {
        status: "error".into(),
        code: "apiKeyInvalid".into(),
        message: "key invalid".into(),
    }));

    let (status, json) = get_json(setup_test_app(client), "/api/list?query=bitcoin").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("key invalid"));
    assert_eq!(json["docsUrl"], "https://newsapi.org/docs/endpoints/everything");
}

#[tokio::test]
async fn missing_api_key_points_at_auth_docs() {
    let client = MockNewsClient::new(news_response(0, vec![]));
    let router = app(client.clone(), StaticApiKey::missing(), MockStore::new());

    let (status, json) = get_json(router, "/api/list?query=bitcoin").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "missing API key in the environment");
    assert_eq!(json["docsUrl"], "https://newsapi.org/docs/authentication");
    assert!(client.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_upstream_hits_the_deadline() {
    let client = MockNewsClient::new(news_response(0, vec![])).with_delay(Duration::from_secs(30));
    let state = AppState::new(client, StaticApiKey::new(TEST_API_KEY), MockStore::new())
        .with_timeout(Duration::from_secs(5));
    let router = routes::router(Arc::new(state));

    let (status, json) = get_json(router, "/api/headlines?country=us").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("timed out"));
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, json) = get_json(
        setup_test_app(MockNewsClient::new(news_response(0, vec![]))),
        "/api/nonexistent",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json,
        serde_json::json!({
            "statusCode": 404,
            "message": "page not found",
            "requestUrl": "/api/nonexistent"
        })
    );
}

#[tokio::test]
async fn wrong_method_is_405_json() {
    let client = MockNewsClient::new(news_response(0, vec![]));

    let (status, json) = send_json(
        setup_test_app(client.clone()),
        Method::POST,
        "/api/list?query=x",
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        json,
        serde_json::json!({
            "statusCode": 405,
            "message": "method POST not allowed",
            "requestUrl": "/api/list?query=x"
        })
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn health_reports_store_status() {
    let client = MockNewsClient::new(news_response(0, vec![]));

    let (status, json) = get_json(setup_test_app(client.clone()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");

    let router = app(
        client,
        StaticApiKey::new(TEST_API_KEY),
        MockStore::new().unhealthy(),
    );
    let (status, json) = get_json(router, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["database"], "error");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, json) = get_json(
        setup_test_app(MockNewsClient::new(news_response(0, vec![]))),
        "/api-docs/openapi.json",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/api/list"].is_object());
    assert!(json["paths"]["/api/headlines"].is_object());
}
