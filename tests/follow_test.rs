//! Run: cargo test --test follow_test

use axum::http::StatusCode;
use serde_json::json;

mod test_harness;
use test_harness::{assert_envelope, TestApp};

#[tokio::test]
async fn follow_and_unfollow() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;
    let grace = app.signup("grace@example.com").await;
    let uri = format!("/api/follows?author={}", grace.id);

    let (status, body) = app.post(&uri, Some(&ada.token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["author"], ada.id.to_string());
    assert_eq!(body["data"]["following"], grace.id.to_string());

    let (status, body) = app.post(&uri, Some(&ada.token), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "FORBIDDEN");

    let (_, body) = app
        .get(&format!("/api/follows?following={}", grace.id), Some(&ada.token))
        .await;
    assert_eq!(body["data"]["following"], grace.id.to_string());

    let (_, body) = app.get("/api/follows", Some(&ada.token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // following is one-directional
    let (_, body) = app
        .get(&format!("/api/follows?following={}", ada.id), Some(&grace.token))
        .await;
    assert!(body["data"].is_null());

    let (status, _) = app.delete(&uri, Some(&ada.token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.delete(&uri, Some(&ada.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "FORBIDDEN");
}

#[tokio::test]
async fn cannot_follow_self_or_strangers() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;

    let (status, body) = app
        .post(&format!("/api/follows?author={}", ada.id), Some(&ada.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "FORBIDDEN");

    let (status, body) = app
        .post(
            &format!("/api/follows?author={}", uuid::Uuid::new_v4()),
            Some(&ada.token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(status, &body, "USER_NOT_FOUND");
}
