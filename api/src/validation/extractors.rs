//! Custom Axum extractors for validated input

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;

/// A field-level validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Trait for request types that can be sanitized and validated
pub trait Validatable: Sized {
    /// Sanitize the data in-place (trim whitespace, strip HTML, etc.)
    fn sanitize(&mut self);

    /// Validate the data and return any field errors
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// JSON extractor that validates and sanitizes input.
///
/// Use this instead of `Json<T>` to automatically:
/// 1. Parse JSON from the request body
/// 2. Sanitize all string fields
/// 3. Validate fields against defined rules
/// 4. Reject non-conforming payloads with a detailed 400 before the
///    handler body runs
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validatable + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut data) = Json::<T>::from_request(req, state).await.map_err(|err| {
            let message = match err {
                axum::extract::rejection::JsonRejection::JsonDataError(e) => {
                    format!("Invalid JSON data: {}", e.body_text())
                }
                axum::extract::rejection::JsonRejection::JsonSyntaxError(e) => {
                    format!("JSON syntax error: {}", e.body_text())
                }
                axum::extract::rejection::JsonRejection::MissingJsonContentType(_) => {
                    "Content-Type must be application/json".to_string()
                }
                axum::extract::rejection::JsonRejection::BytesRejection(_) => {
                    "Failed to read request body".to_string()
                }
                _ => "Invalid JSON payload".to_string(),
            };
            ApiError::validation(vec![FieldError::new("body", message)])
        })?;

        data.sanitize();
        data.validate().map_err(ApiError::validation)?;

        Ok(ValidatedJson(data))
    }
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Builder for accumulating validation errors across fields
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Run a validator and record its error against `field`
    pub fn check<F>(&mut self, field: &str, validator: F) -> &mut Self
    where
        F: FnOnce() -> Result<(), String>,
    {
        if let Err(message) = validator() {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Record an error directly
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    /// Record an error when `condition` holds
    pub fn check_condition(
        &mut self,
        condition: bool,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut Self {
        if condition {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn build(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_holds_field_and_message() {
        let error = FieldError::new("name", "is required");
        assert_eq!(error.field, "name");
        assert_eq!(error.message, "is required");
    }

    #[test]
    fn builder_collects_every_failure() {
        let mut builder = ValidationBuilder::new();

        builder
            .check("name", || Err("is required".to_string()))
            .check("phone", || Ok(()))
            .check_condition(true, "rating", "must be between 1 and 5");

        assert!(builder.has_errors());

        let errors = builder.build().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[1].field, "rating");
    }

    #[test]
    fn builder_with_no_errors_builds_ok() {
        let mut builder = ValidationBuilder::new();
        builder.check("name", || Ok(()));
        assert!(builder.build().is_ok());
    }
}
