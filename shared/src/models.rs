use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════════
// DOMAIN TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Account role assigned at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Customer,
    BusinessOwner,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Customer => write!(f, "customer"),
            UserRole::BusinessOwner => write!(f, "business_owner"),
        }
    }
}

/// Business category (closed enumeration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "business_category", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessCategory {
    FoodRestaurant,
    RetailShop,
    Services,
    HomeBusiness,
    StreetVendor,
    Artisan,
    Other,
}

impl std::fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessCategory::FoodRestaurant => write!(f, "food_restaurant"),
            BusinessCategory::RetailShop => write!(f, "retail_shop"),
            BusinessCategory::Services => write!(f, "services"),
            BusinessCategory::HomeBusiness => write!(f, "home_business"),
            BusinessCategory::StreetVendor => write!(f, "street_vendor"),
            BusinessCategory::Artisan => write!(f, "artisan"),
            BusinessCategory::Other => write!(f, "other"),
        }
    }
}

/// A registered user, keyed by unique phone number
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// A listed business
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: BusinessCategory,
    pub address: Option<String>,
    pub location: Option<String>,
    pub phone: String,
    pub owner_id: Uuid,
    pub is_verified: bool,
    pub trust_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rated review against a business. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub business_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// An unscored positive signal attached to a business
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Endorsement {
    pub id: Uuid,
    pub business_id: Uuid,
    pub endorser_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Derived analytics for a business. Never authored directly — always
/// recomputed from the live review set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessAnalytics {
    pub business_id: Uuid,
    pub total_reviews: i64,
    pub average_rating: f64,
    pub last_updated: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════════
// LIST / DETAIL VIEW TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Owner fields surfaced on business views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OwnerSummary {
    pub name: String,
    pub phone: String,
}

/// Business row joined with its owner and signal counts, as returned by
/// listing and search queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: BusinessCategory,
    pub address: Option<String>,
    pub location: Option<String>,
    pub phone: String,
    pub owner_id: Uuid,
    pub is_verified: bool,
    pub trust_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_phone: String,
    pub review_count: i64,
    pub endorsement_count: i64,
}

/// Review joined with the reviewer's display name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewWithReviewer {
    pub id: Uuid,
    pub business_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub reviewer_name: String,
}

/// Endorsement joined with the endorser's display name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EndorsementWithEndorser {
    pub id: Uuid,
    pub business_id: Uuid,
    pub endorser_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub endorser_name: String,
}

/// Full business detail: owner, reviews, endorsements and derived analytics
#[derive(Debug, Clone, Serialize)]
pub struct BusinessDetail {
    #[serde(flatten)]
    pub business: Business,
    pub owner: OwnerSummary,
    pub reviews: Vec<ReviewWithReviewer>,
    pub endorsements: Vec<EndorsementWithEndorser>,
    pub analytics: Option<BusinessAnalytics>,
}

// ═══════════════════════════════════════════════════════════════════════════
// REQUEST TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Request to register a new user (and optionally their business)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub name: String,
    pub business_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

/// Request to begin the OTP login flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
}

/// Request to verify a provider-issued ID token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub id_token: String,
}

/// Request to create a new business listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBusinessRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: BusinessCategory,
    pub address: Option<String>,
    pub phone: String,
    pub location: Option<String>,
}

/// Partial business update. At least one field must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBusinessRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<BusinessCategory>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Request to create a review against a business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: f64,
    pub comment: Option<String>,
    pub reviewer_id: String,
}

/// Request to send a transactional email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub message: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// QUERY PARAMS
// ═══════════════════════════════════════════════════════════════════════════

/// Query params for GET /api/businesses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<BusinessCategory>,
    pub verified: Option<bool>,
}

/// Query params for GET /api/search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<BusinessCategory>,
    pub location: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query params for GET /api/businesses/:id/reviews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// ═══════════════════════════════════════════════════════════════════════════
// RESPONSE TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Pagination block embedded in every list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total as f64 / limit as f64).ceil() as i64
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// Response to a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: User,
    pub business: Option<Business>,
}

/// Response to a login request. `debug_otp` is only populated outside
/// production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_otp: Option<String>,
}

/// Identity claims decoded from a verified ID token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedUser {
    pub uid: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Response to a successful token verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub user: VerifiedUser,
}

/// Paginated business listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessListResponse {
    pub businesses: Vec<BusinessSummary>,
    pub pagination: Pagination,
}

/// Paginated review listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewWithReviewer>,
    pub pagination: Pagination,
}

/// All registered users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// Response to a successful email dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub message_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_up_partial_pages() {
        let p = Pagination::new(2, 5, 12);
        assert_eq!(p.pages, 3);
        assert_eq!(p.page, 2);
        assert_eq!(p.limit, 5);
        assert_eq!(p.total, 12);
    }

    #[test]
    fn pagination_exact_multiple() {
        assert_eq!(Pagination::new(1, 5, 10).pages, 2);
    }

    #[test]
    fn pagination_empty_set_has_zero_pages() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
    }

    #[test]
    fn pagination_zero_limit_does_not_divide() {
        assert_eq!(Pagination::new(1, 0, 10).pages, 0);
    }

    #[test]
    fn role_defaults_to_customer() {
        assert_eq!(UserRole::default(), UserRole::Customer);
    }

    #[test]
    fn role_uses_screaming_snake_case_in_json() {
        assert_eq!(
            serde_json::to_string(&UserRole::BusinessOwner).unwrap(),
            "\"BUSINESS_OWNER\""
        );
        let role: UserRole = serde_json::from_str("\"CUSTOMER\"").unwrap();
        assert_eq!(role, UserRole::Customer);
    }

    #[test]
    fn category_uses_screaming_snake_case_in_json() {
        assert_eq!(
            serde_json::to_string(&BusinessCategory::FoodRestaurant).unwrap(),
            "\"FOOD_RESTAURANT\""
        );
        let cat: BusinessCategory = serde_json::from_str("\"STREET_VENDOR\"").unwrap();
        assert_eq!(cat, BusinessCategory::StreetVendor);
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(serde_json::from_str::<BusinessCategory>("\"NIGHTCLUB\"").is_err());
    }

    #[test]
    fn register_request_defaults_role() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"phone":"9876543210","name":"Asha"}"#).unwrap();
        assert_eq!(req.role, UserRole::Customer);
        assert!(req.business_name.is_none());
    }
}
