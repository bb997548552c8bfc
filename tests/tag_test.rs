//! Run: cargo test --test tag_test

use axum::http::StatusCode;
use serde_json::json;

mod test_harness;
use test_harness::{assert_envelope, TestApp};

#[tokio::test]
async fn create_and_fetch_tags() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;

    let id = app.create_tag(&ada.token, "Rust").await;
    app.create_tag(&ada.token, "Databases").await;

    let (status, body) = app.get(&format!("/api/tag?id={id}"), Some(&ada.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Rust");
    assert_eq!(body["data"]["author"], ada.id.to_string());

    let (status, body) = app.get("/api/tag", Some(&ada.token)).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Databases", "Rust"]);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;
    app.create_tag(&ada.token, "Rustacean").await;
    app.create_tag(&ada.token, "Trust").await;
    app.create_tag(&ada.token, "Python").await;

    let (status, body) = app.get("/api/tag?term=RUST", Some(&ada.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_title_is_rejected() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;
    app.create_tag(&ada.token, "Rust").await;

    let (status, body) = app
        .post("/api/tag", Some(&ada.token), json!({ "tag": "rUsT" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "RESOURCE_EXIST");
}

#[tokio::test]
async fn unknown_tag_and_anonymous_access() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;

    let (status, body) = app
        .get(&format!("/api/tag?id={}", uuid::Uuid::new_v4()), Some(&ada.token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(status, &body, "NOT_FOUND");

    let (status, body) = app.post("/api/tag", None, json!({ "tag": "Rust" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(status, &body, "MISSING_TOKEN");
}
