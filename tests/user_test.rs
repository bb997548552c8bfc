//! Profiles, verification and password flows.
//!
//! Run: cargo test --test user_test

use axum::http::StatusCode;
use quill_api::models::Role;
use serde_json::json;

mod test_harness;
use test_harness::{assert_envelope, TestApp, PASSWORD};

#[tokio::test]
async fn get_one_or_all_users() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;
    app.register("Grace", "grace@example.com").await;

    let (status, body) = app.get("/api/user", Some(&ada.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .get(&format!("/api/user?id={}", ada.id), Some(&ada.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");

    let (status, body) = app
        .get(&format!("/api/user?id={}", uuid::Uuid::new_v4()), Some(&ada.token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(status, &body, "USER_NOT_FOUND");
}

#[tokio::test]
async fn users_update_only_themselves() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;
    let grace = app.signup("grace@example.com").await;

    let (status, body) = app
        .put(
            "/api/user",
            Some(&ada.token),
            json!({ "id": ada.id, "fullName": "Countess Ada", "bio": "Analyst" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fullName"], "Countess Ada");
    assert_eq!(body["data"]["bio"], "Analyst");

    let (status, body) = app
        .put(
            "/api/user",
            Some(&ada.token),
            json!({ "id": grace.id, "fullName": "Hijacked" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "FORBIDDEN");
    assert_eq!(app.user("grace@example.com").await.full_name, "Test User");
}

#[tokio::test]
async fn privileged_fields_need_super() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;
    let root = app.signup("root@example.com").await;
    app.set_role(root.id, Role::Super).await;

    let (status, body) = app
        .put(
            "/api/user",
            Some(&ada.token),
            json!({ "id": ada.id, "status": "enabled", "adminType": "super", "isEmailVerified": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["isEmailVerified"], false);

    let (status, body) = app
        .put(
            "/api/user",
            Some(&root.token),
            json!({ "id": ada.id, "status": "enabled", "adminType": "admin", "isEmailVerified": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "enabled");
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["isEmailVerified"], true);
}

#[tokio::test]
async fn update_unknown_user_is_404() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;

    let (status, body) = app
        .put(
            "/api/user",
            Some(&ada.token),
            json!({ "id": uuid::Uuid::new_v4(), "bio": "?" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(status, &body, "USER_NOT_FOUND");
}

#[tokio::test]
async fn only_super_creates_admins() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;
    let payload = json!({
        "fullName": "New Admin",
        "email": "admin@example.com",
        "password": PASSWORD,
        "admin": true
    });

    let (status, body) = app.post("/api/user", Some(&ada.token), payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "FORBIDDEN");

    app.set_role(ada.id, Role::Super).await;
    let (status, body) = app.post("/api/user", Some(&ada.token), payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");

    let (status, body) = app.post("/api/user", Some(&ada.token), payload).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "USER_EXIST");
}

#[tokio::test]
async fn plain_users_can_be_created_by_anyone_signed_in() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;

    let (status, body) = app
        .post(
            "/api/user",
            Some(&ada.token),
            json!({ "fullName": "Friend", "email": "friend@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn confirm_email_flow() {
    let app = TestApp::new();
    app.register("Ada", "ada@example.com").await;
    let token = app
        .user("ada@example.com")
        .await
        .verification_token
        .unwrap();

    let (status, body) = app
        .put(
            "/api/user/confirm-email",
            None,
            json!({ "email": "ada@example.com", "verificationToken": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(status, &body, "INVALID_TOKEN");

    let (status, body) = app
        .put(
            "/api/user/confirm-email",
            None,
            json!({ "email": "ada@example.com", "verificationToken": token }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isEmailVerified"], true);
    assert_eq!(body["data"]["status"], "enabled");
    assert!(app
        .user("ada@example.com")
        .await
        .verification_token
        .is_none());

    let (status, body) = app
        .post(
            "/api/user/request-verification",
            None,
            json!({ "email": "ada@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "FORBIDDEN");
}

#[tokio::test]
async fn confirm_email_for_unknown_user() {
    let app = TestApp::new();

    let (status, body) = app
        .put(
            "/api/user/confirm-email",
            None,
            json!({ "email": "ghost@example.com", "verificationToken": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(status, &body, "USER_NOT_FOUND");
}

#[tokio::test]
async fn request_verification_rotates_token() {
    let app = TestApp::new();
    app.register("Ada", "ada@example.com").await;
    let before = app.user("ada@example.com").await.verification_token;

    let (status, _) = app
        .post(
            "/api/user/request-verification",
            None,
            json!({ "email": "ada@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let after = app.user("ada@example.com").await.verification_token;
    assert!(after.is_some());
    assert_ne!(before, after);
}

#[tokio::test]
async fn change_password_revokes_old_tokens() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;

    let (status, body) = app
        .put(
            "/api/user/change-password",
            Some(&ada.token),
            json!({ "oldPassword": "nope-nope", "newPassword": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_envelope(status, &body, "WRONG_CREDENTIALS");

    let (status, body) = app
        .put(
            "/api/user/change-password",
            Some(&ada.token),
            json!({ "oldPassword": PASSWORD, "newPassword": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = app.get("/api/user", Some(&ada.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/user", Some(&fresh)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.login("ada@example.com", "brand-new-pass").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn avatar_must_be_a_web_url() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;

    let (status, body) = app
        .put("/api/user/avatar", Some(&ada.token), json!({ "avatar": "not a url" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "INVALID_PARAMS");

    let (status, body) = app
        .put(
            "/api/user/avatar",
            Some(&ada.token),
            json!({ "avatar": "ftp://files.example.com/me.png" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "INVALID_PARAMS");

    let url = "https://cdn.example.com/ada.png";
    let (status, body) = app
        .put("/api/user/avatar", Some(&ada.token), json!({ "avatar": url }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["avatar"], url);
}

#[tokio::test]
async fn forgot_and_reset_password() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;

    let (status, body) = app
        .post(
            "/api/user/forgot-password",
            None,
            json!({ "email": "ghost@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(status, &body, "USER_NOT_FOUND");

    let (status, _) = app
        .post(
            "/api/user/forgot-password",
            None,
            json!({ "email": "ada@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let reset_token = app
        .user("ada@example.com")
        .await
        .forgot_password_token
        .unwrap();

    let (status, body) = app
        .post(
            "/api/user/reset-password",
            None,
            json!({ "email": "ada@example.com", "token": "stale", "password": "s3cure-again" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_envelope(status, &body, "BAD_REQUEST");

    let (status, _) = app
        .post(
            "/api/user/reset-password",
            None,
            json!({ "email": "ada@example.com", "token": reset_token, "password": "s3cure-again" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app
        .user("ada@example.com")
        .await
        .forgot_password_token
        .is_none());

    // issued before the reset
    let (status, body) = app.get("/api/user", Some(&ada.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(status, &body, "UNAUTHORIZED");

    let (status, _) = app.login("ada@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, body) = app.login("ada@example.com", "s3cure-again").await;
    assert_eq!(status, StatusCode::OK);

    let fresh = body["data"]["token"].as_str().unwrap();
    let (status, _) = app.get("/api/user", Some(fresh)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn profile_password_update_revokes_old_tokens() {
    let app = TestApp::new();
    let ada = app.signup("ada@example.com").await;

    let (status, _) = app
        .put(
            "/api/user",
            Some(&ada.token),
            json!({ "id": ada.id, "password": "via-profile" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/user", Some(&ada.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(status, &body, "UNAUTHORIZED");

    let (status, _) = app.login("ada@example.com", "via-profile").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn super_setting_a_password_revokes_only_the_target() {
    let app = TestApp::new();
    let root = app.signup("root@example.com").await;
    app.set_role(root.id, Role::Super).await;
    let ada = app.signup("ada@example.com").await;

    let (status, _) = app
        .put(
            "/api/user",
            Some(&root.token),
            json!({ "id": ada.id, "password": "set-by-root" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/user", Some(&ada.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/user", Some(&root.token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn reset_password_enforces_minimum_length() {
    let app = TestApp::new();
    app.register("Ada", "ada@example.com").await;

    let (status, body) = app
        .post(
            "/api/user/reset-password",
            None,
            json!({ "email": "ada@example.com", "token": "x", "password": "abc" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(status, &body, "INVALID_PARAMS");
}
