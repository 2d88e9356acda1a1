use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// A successful API result. Wraps the handler's payload into the uniform
/// success envelope.
#[derive(Debug)]
pub struct ApiSuccess<T> {
    status: StatusCode,
    message: String,
    data: T,
}

#[derive(Debug, Serialize)]
struct SuccessEnvelope<T> {
    success: bool,
    message: String,
    data: T,
    timestamp: String,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data,
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        let payload = SuccessEnvelope {
            success: true,
            message: self.message,
            data: self.data,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        (self.status, Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_envelope_shape() {
        let response =
            ApiSuccess::new(serde_json::json!({"users": []}), "Users fetched").into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Users fetched");
        assert!(value["data"]["users"].is_array());
        assert!(value["timestamp"].is_string());
    }

    #[tokio::test]
    async fn created_uses_201() {
        let response = ApiSuccess::created(serde_json::json!({}), "Created").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
