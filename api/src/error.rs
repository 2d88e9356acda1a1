use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::config;
use crate::email::EmailError;
use crate::identity::IdentityError;
use crate::validation::FieldError;

/// Message shown to clients for 5xx failures in production
pub const GENERIC_SERVER_MESSAGE: &str = "Something went wrong. Please try again later.";

/// A typed API failure. Every handler error flows through this type; its
/// `IntoResponse` impl is the single point where failures become HTTP
/// responses and get logged.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
    route: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    message: String,
    error: ErrorBody,
    timestamp: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
            route: None,
        }
    }

    /// A 400 carrying every violated field
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let message = match errors.as_slice() {
            [only] => format!("Validation failed for field '{}'", only.field),
            many => format!("Validation failed for {} fields", many.len()),
        };
        let details = serde_json::to_value(&errors).ok();
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message,
            details,
            route: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "AUTHENTICATION_ERROR", message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "AUTHORIZATION_ERROR", message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    /// Tag this failure with the route name used for logging
    pub fn route(mut self, route: &'static str) -> Self {
        self.route = Some(route);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("Resource not found"),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::conflict("Resource already exists")
            }
            other => ApiError::database(other.to_string()),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::CertFetch(_) => ApiError::internal(err.to_string()),
            _ => ApiError::authentication("Invalid or expired token"),
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        ApiError::internal(err.to_string())
    }
}

/// What the client is allowed to see. In production, 5xx detail is replaced
/// with a generic message and structured details are dropped.
fn client_view(
    status: StatusCode,
    message: String,
    details: Option<Value>,
    production: bool,
) -> (String, Option<Value>) {
    if production && status.is_server_error() {
        (GENERIC_SERVER_MESSAGE.to_string(), None)
    } else {
        (message, details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let production = config::environment().is_production();
        let correlation_id = Uuid::new_v4().to_string();

        // The one log line per failure. Full detail always goes to the log;
        // only the client-facing body is redacted.
        tracing::error!(
            route = self.route.unwrap_or("unknown"),
            status = self.status.as_u16(),
            code = self.code,
            correlation_id = %correlation_id,
            message = %self.message,
            "request failed"
        );

        let (message, details) = client_view(self.status, self.message, self.details, production);
        let payload = ErrorEnvelope {
            success: false,
            message,
            error: ErrorBody {
                code: self.code,
                details,
            },
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        let mut response = (self.status, Json(payload)).into_response();
        if let Ok(value) = HeaderValue::from_str(&correlation_id) {
            response
                .headers_mut()
                .insert(header::HeaderName::from_static("x-correlation-id"), value);
        }
        response
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_every_field() {
        let err = ApiError::validation(vec![
            FieldError::new("phone", "must be at least 10 characters"),
            FieldError::new("name", "must be at least 2 characters"),
        ]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.message.contains("2 fields"));
        let details = err.details.expect("details present");
        assert_eq!(details.as_array().unwrap().len(), 2);
    }

    #[test]
    fn single_field_message_names_the_field() {
        let err = ApiError::validation(vec![FieldError::new("rating", "must be an integer")]);
        assert!(err.message.contains("field 'rating'"));
    }

    #[test]
    fn taxonomy_statuses() {
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::authentication("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::authorization("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::database("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::database("x").code(), "DATABASE_ERROR");
        assert_eq!(ApiError::internal("x").code(), "INTERNAL_ERROR");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn production_redacts_server_errors_only() {
        let (msg, details) = client_view(
            StatusCode::INTERNAL_SERVER_ERROR,
            "connection refused".into(),
            Some(serde_json::json!({"secret": true})),
            true,
        );
        assert_eq!(msg, GENERIC_SERVER_MESSAGE);
        assert!(details.is_none());

        let (msg, details) = client_view(
            StatusCode::BAD_REQUEST,
            "Validation failed for field 'rating'".into(),
            Some(serde_json::json!([])),
            true,
        );
        assert!(msg.contains("rating"));
        assert!(details.is_some());
    }

    #[test]
    fn development_passes_detail_through() {
        let (msg, _) = client_view(
            StatusCode::INTERNAL_SERVER_ERROR,
            "connection refused".into(),
            None,
            false,
        );
        assert_eq!(msg, "connection refused");
    }

    #[tokio::test]
    async fn failure_envelope_shape() {
        let response = ApiError::not_found("Business not found")
            .route("businesses-get")
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-correlation-id"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "Business not found");
        assert_eq!(value["error"]["code"], "NOT_FOUND");
        assert!(value["timestamp"].is_string());
    }
}
