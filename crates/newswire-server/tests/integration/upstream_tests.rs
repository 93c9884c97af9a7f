//! Full pipeline against a stubbed upstream over real HTTP.

use axum::http::StatusCode;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newswire_client::ReqwestNewsClient;
use newswire_core::testutil::{MockStore, StaticApiKey};

use crate::integration::common::{TEST_API_KEY, app, get_json};

#[tokio::test]
async fn list_proxies_upstream_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(header("X-Api-Key", TEST_API_KEY))
        .and(query_param("q", "bitcoin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "totalResults": 42,
            "articles": [{
                "source": {"id": "bloomberg", "name": "Bloomberg"},
                "author": "Jane Doe",
                "title": "Bitcoin rallies",
                "description": null,
                "url": "https://example.com/bitcoin",
                "urlToImage": null,
                "publishedAt": "2018-07-28T14:28:41Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReqwestNewsClient::with_base_url(server.uri()).unwrap();
    let router = app(client, StaticApiKey::new(TEST_API_KEY), MockStore::new());

    let (status, json) = get_json(router, "/api/list?query=bitcoin").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["totalCount"], 42);
    assert_eq!(json["data"][0]["title"], "Bitcoin rallies");
    assert_eq!(json["data"][0]["publishedAt"], "2018-07-28T14:28:41Z");
}

#[tokio::test]
async fn upstream_401_body_becomes_400_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "key invalid"
        })))
        .mount(&server)
        .await;

    let client = ReqwestNewsClient::with_base_url(server.uri()).unwrap();
    let router = app(client, StaticApiKey::new("wrong"), MockStore::new());

    let (status, json) = get_json(router, "/api/headlines?country=us").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["statusCode"], 400);
    assert!(json["message"].as_str().unwrap().contains("key invalid"));
    assert_eq!(json["requestUrl"], "/api/headlines?country=us");
}
