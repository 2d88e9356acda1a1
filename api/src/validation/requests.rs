//! Validation implementations for API request types

use shared::{
    CreateBusinessRequest, CreateReviewRequest, LoginRequest, RegisterRequest, SendEmailRequest,
    UpdateBusinessRequest, UserRole, VerifyOtpRequest,
};

use super::extractors::{Validatable, ValidationBuilder};
use super::sanitizers::{sanitize_name, sanitize_text_optional, trim, trim_optional};
use super::validators::{
    validate_email, validate_length, validate_no_xss, validate_phone, validate_rating,
    validate_required, validate_uuid,
};

/// Minimum length for a user display name
const MIN_NAME_LENGTH: usize = 2;
/// Maximum length for any name field
const MAX_NAME_LENGTH: usize = 255;
/// Maximum length for free-text fields (descriptions, comments)
const MAX_TEXT_LENGTH: usize = 2000;

impl Validatable for RegisterRequest {
    fn sanitize(&mut self) {
        self.phone = trim(&self.phone);
        self.name = sanitize_name(&self.name);
        trim_optional(&mut self.business_name);
    }

    fn validate(&self) -> Result<(), Vec<super::FieldError>> {
        let mut builder = ValidationBuilder::new();
        builder
            .check("phone", || validate_phone(&self.phone))
            .check("name", || {
                validate_length(&self.name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)
            });

        // Common fields first, then role-specific requirements.
        if self.role == UserRole::BusinessOwner {
            match self.business_name.as_deref() {
                None => {
                    builder.add_error(
                        "business_name",
                        "is required when registering as a business owner",
                    );
                }
                Some(name) => {
                    builder.check("business_name", || {
                        validate_length(name, 1, MAX_NAME_LENGTH)
                    });
                }
            }
        }

        builder.build()
    }
}

impl Validatable for LoginRequest {
    fn sanitize(&mut self) {
        self.phone = trim(&self.phone);
    }

    fn validate(&self) -> Result<(), Vec<super::FieldError>> {
        let mut builder = ValidationBuilder::new();
        builder.check("phone", || validate_phone(&self.phone));
        builder.build()
    }
}

impl Validatable for VerifyOtpRequest {
    fn sanitize(&mut self) {
        self.id_token = trim(&self.id_token);
    }

    fn validate(&self) -> Result<(), Vec<super::FieldError>> {
        let mut builder = ValidationBuilder::new();
        builder.check("id_token", || validate_required(&self.id_token, "id_token"));
        builder.build()
    }
}

impl Validatable for CreateBusinessRequest {
    fn sanitize(&mut self) {
        self.name = sanitize_name(&self.name);
        self.phone = trim(&self.phone);
        sanitize_text_optional(&mut self.description);
        trim_optional(&mut self.address);
        trim_optional(&mut self.location);
    }

    fn validate(&self) -> Result<(), Vec<super::FieldError>> {
        let mut builder = ValidationBuilder::new();
        builder
            .check("name", || validate_length(&self.name, 1, MAX_NAME_LENGTH))
            .check("name", || validate_no_xss(&self.name))
            .check("phone", || validate_phone(&self.phone));
        if let Some(ref description) = self.description {
            builder.check("description", || {
                validate_length(description, 1, MAX_TEXT_LENGTH)
            });
        }
        builder.build()
    }
}

impl Validatable for UpdateBusinessRequest {
    fn sanitize(&mut self) {
        if let Some(ref mut name) = self.name {
            *name = sanitize_name(name);
        }
        sanitize_text_optional(&mut self.description);
        trim_optional(&mut self.address);
        trim_optional(&mut self.location);
        trim_optional(&mut self.phone);
    }

    fn validate(&self) -> Result<(), Vec<super::FieldError>> {
        let mut builder = ValidationBuilder::new();

        let empty = self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.location.is_none();
        builder.check_condition(empty, "body", "at least one field must be provided");

        if let Some(ref name) = self.name {
            builder
                .check("name", || validate_length(name, 1, MAX_NAME_LENGTH))
                .check("name", || validate_no_xss(name));
        }
        if let Some(ref description) = self.description {
            builder.check("description", || {
                validate_length(description, 1, MAX_TEXT_LENGTH)
            });
        }
        if let Some(ref phone) = self.phone {
            builder.check("phone", || validate_phone(phone));
        }
        builder.build()
    }
}

impl Validatable for CreateReviewRequest {
    fn sanitize(&mut self) {
        self.reviewer_id = trim(&self.reviewer_id);
        sanitize_text_optional(&mut self.comment);
    }

    fn validate(&self) -> Result<(), Vec<super::FieldError>> {
        let mut builder = ValidationBuilder::new();
        builder
            .check("rating", || validate_rating(self.rating))
            .check("reviewer_id", || {
                validate_uuid(&self.reviewer_id, "reviewer_id")
            });
        if let Some(ref comment) = self.comment {
            builder
                .check("comment", || validate_length(comment, 1, MAX_TEXT_LENGTH))
                .check("comment", || validate_no_xss(comment));
        }
        builder.build()
    }
}

impl Validatable for SendEmailRequest {
    fn sanitize(&mut self) {
        self.to = trim(&self.to);
        self.subject = trim(&self.subject);
    }

    fn validate(&self) -> Result<(), Vec<super::FieldError>> {
        let mut builder = ValidationBuilder::new();
        builder
            .check("to", || validate_email(&self.to))
            .check("subject", || validate_required(&self.subject, "subject"))
            .check("message", || validate_required(&self.message, "message"));
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(phone: &str, name: &str, business_name: Option<&str>, role: UserRole) -> RegisterRequest {
        RegisterRequest {
            phone: phone.to_string(),
            name: name.to_string(),
            business_name: business_name.map(str::to_string),
            role,
        }
    }

    #[test]
    fn customer_registration_needs_no_business_name() {
        let mut req = register("9876543210", "Asha", None, UserRole::Customer);
        req.sanitize();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn business_owner_without_business_name_is_rejected() {
        let mut req = register("9876543210", "Asha", None, UserRole::BusinessOwner);
        req.sanitize();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "business_name");
    }

    #[test]
    fn business_owner_with_blank_business_name_is_rejected() {
        let mut req = register("9876543210", "Asha", Some("   "), UserRole::BusinessOwner);
        req.sanitize();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].field, "business_name");
    }

    #[test]
    fn business_owner_with_business_name_is_accepted() {
        let mut req = register(
            "9876543210",
            "Asha",
            Some("Asha Tailors"),
            UserRole::BusinessOwner,
        );
        req.sanitize();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn every_violated_field_is_reported() {
        let mut req = register("123", "A", None, UserRole::BusinessOwner);
        req.sanitize();
        let errors = req.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["phone", "name", "business_name"]);
    }

    #[test]
    fn review_rating_must_be_integer_in_range() {
        let mut req = CreateReviewRequest {
            rating: 4.5,
            comment: None,
            reviewer_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
        };
        req.sanitize();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].field, "rating");

        req.rating = 6.0;
        assert_eq!(req.validate().unwrap_err()[0].field, "rating");

        req.rating = 4.0;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn review_reviewer_id_must_be_uuid() {
        let mut req = CreateReviewRequest {
            rating: 4.0,
            comment: None,
            reviewer_id: "u1".to_string(),
        };
        req.sanitize();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].field, "reviewer_id");
    }

    #[test]
    fn update_business_requires_at_least_one_field() {
        let mut req = UpdateBusinessRequest {
            name: None,
            description: None,
            category: None,
            address: None,
            phone: None,
            location: None,
        };
        req.sanitize();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].field, "body");
    }

    #[test]
    fn update_business_validates_present_fields_only() {
        let mut req = UpdateBusinessRequest {
            name: Some("  New Name  ".to_string()),
            description: None,
            category: None,
            address: None,
            phone: Some("12345".to_string()),
            location: None,
        };
        req.sanitize();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "phone");
        assert_eq!(req.name.as_deref(), Some("New Name"));
    }

    #[test]
    fn email_request_validates_all_fields() {
        let mut req = SendEmailRequest {
            to: "nope".to_string(),
            subject: "".to_string(),
            message: "".to_string(),
        };
        req.sanitize();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
