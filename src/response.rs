//! The response envelope shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const SUCCESS: &str = "SUCCESS";

/// `{code, statusCode, message, data}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub code: &'static str,
    pub status_code: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::with_message(data, "")
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: SUCCESS,
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data,
        }
    }
}

/// Payload of the GET endpoints that return a single record when a filter
/// names one, and a list otherwise.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(Option<T>),
    Many(Vec<T>),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_uses_camel_case_keys() {
        let body = serde_json::to_value(ApiResponse::with_message(json!({"id": 1}), "done")).unwrap();
        assert_eq!(body["code"], "SUCCESS");
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["message"], "done");
        assert_eq!(body["data"]["id"], 1);
    }

    #[test]
    fn ok_has_empty_message() {
        let body = serde_json::to_value(ApiResponse::ok(Option::<u8>::None)).unwrap();
        assert_eq!(body["message"], "");
        assert!(body["data"].is_null());
    }

    #[test]
    fn one_or_many_is_untagged() {
        let one = serde_json::to_value(OneOrMany::One(Some(3))).unwrap();
        assert_eq!(one, json!(3));

        let none = serde_json::to_value(OneOrMany::<u8>::One(None)).unwrap();
        assert!(none.is_null());

        let many = serde_json::to_value(OneOrMany::Many(vec![1, 2])).unwrap();
        assert_eq!(many, json!([1, 2]));
    }
}
