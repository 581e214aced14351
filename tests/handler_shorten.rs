mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use linkify::api::handlers::{shorten_form_handler, shorten_handler};
use linkify::domain::repositories::LinkRepository;
use serde_json::json;

fn server(state: linkify::AppState) -> TestServer {
    let app = Router::new()
        .route("/api/shorten", post(shorten_handler))
        .route("/createShortenedUrl", post(shorten_form_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_shorten_success() {
    let (state, repo, _rx) = common::create_test_state();
    let server = server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({
            "url": "https://example.com/some/page",
            "alias": "my-link"
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["alias"], "my-link");
    assert_eq!(json["short_url"], "https://s.example.com/my-link");

    let stored = repo.find_by_alias("my-link").await.unwrap().unwrap();
    assert_eq!(stored.target_url, "https://example.com/some/page");
    assert_eq!(stored.visits, 0);
}

#[tokio::test]
async fn test_shorten_accepts_form_field_names() {
    let (state, repo, _rx) = common::create_test_state();
    let server = server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({
            "urlToDirect": "https://example.com",
            "shortenedUrlAlias": "legacy_names"
        }))
        .await;

    response.assert_status_ok();
    assert!(repo.find_by_alias("legacy_names").await.unwrap().is_some());
}

#[tokio::test]
async fn test_shorten_form_encoded() {
    let (state, repo, _rx) = common::create_test_state();
    let server = server(state);

    let response = server
        .post("/createShortenedUrl")
        .form(&[
            ("urlToDirect", "https://example.com/form?a=1&b=2"),
            ("shortenedUrlAlias", "from-form"),
        ])
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_url"], "https://s.example.com/from-form");

    let stored = repo.find_by_alias("from-form").await.unwrap().unwrap();
    assert_eq!(stored.target_url, "https://example.com/form?a=1&b=2");
}

#[tokio::test]
async fn test_shorten_form_encoded_validation_and_conflict() {
    let (state, repo, _rx) = common::create_test_state();
    common::create_test_link(&repo, "taken", "https://first.com").await;
    let server = server(state);

    let response = server
        .post("/createShortenedUrl")
        .form(&[("urlToDirect", "https://example.com")])
        .await;
    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["details"]["reason"], "empty");

    let response = server
        .post("/createShortenedUrl")
        .form(&[("urlToDirect", "https://second.com"), ("shortenedUrlAlias", "taken")])
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_shorten_missing_alias() {
    let (state, _repo, _rx) = common::create_test_state();
    let server = server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["details"]["reason"], "empty");
    assert_eq!(json["error"]["message"], "Invalid. Input field is empty.");
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let (state, repo, _rx) = common::create_test_state();
    let server = server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "not a url", "alias": "validalias" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["details"]["reason"], "bad_url");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_shorten_invalid_alias_characters() {
    let (state, _repo, _rx) = common::create_test_state();
    let server = server(state);

    for alias in ["has space", "dot.ted", "sl/ash", "ünïcode"] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "url": "https://example.com", "alias": alias }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["details"]["reason"], "bad_alias", "{alias}");
    }
}

#[tokio::test]
async fn test_shorten_alias_length_limits() {
    let (state, _repo, _rx) = common::create_test_state();
    let server = server(state);

    let cases = [
        ("abcd".to_string(), Some("too_short")),
        ("abcde".to_string(), None),
        ("b".repeat(50), None),
        ("c".repeat(51), Some("too_long")),
    ];

    for (alias, expected) in cases {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "url": "https://example.com", "alias": alias }))
            .await;

        match expected {
            None => response.assert_status_ok(),
            Some(reason) => {
                response.assert_status_bad_request();
                let json = response.json::<serde_json::Value>();
                assert_eq!(json["error"]["details"]["reason"], reason);
            }
        }
    }
}

#[tokio::test]
async fn test_shorten_duplicate_alias() {
    let (state, repo, _rx) = common::create_test_state();
    common::create_test_link(&repo, "taken", "https://first.com").await;
    let server = server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://second.com", "alias": "taken" }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "conflict");
    assert_eq!(
        json["error"]["message"],
        "This alias is already taken. Please try another one."
    );

    let kept = repo.find_by_alias("taken").await.unwrap().unwrap();
    assert_eq!(kept.target_url, "https://first.com");
}

#[tokio::test]
async fn test_shorten_store_failure() {
    let (state, _rx) = common::create_failing_state();
    let server = server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com", "alias": "abcde" }))
        .await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "internal_error");
    assert_eq!(
        json["error"]["message"],
        "Something went wrong. Please try again."
    );
}
