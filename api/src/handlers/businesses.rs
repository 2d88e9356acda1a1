use axum::extract::{rejection::QueryRejection, Path, Query, State};
use shared::{
    Business, BusinessAnalytics, BusinessDetail, BusinessListParams, BusinessListResponse,
    BusinessSummary, CreateBusinessRequest, EndorsementWithEndorser, OwnerSummary, Pagination,
    ReviewWithReviewer, UpdateBusinessRequest, User, UserRole,
};
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    handlers::{map_query_rejection, page_window},
    metrics,
    response::ApiSuccess,
    state::AppState,
    validation::{FieldError, ValidatedJson},
};

pub(crate) const SUMMARY_SELECT: &str = "SELECT b.*, u.name AS owner_name, u.phone AS owner_phone, \
     (SELECT COUNT(*) FROM reviews r WHERE r.business_id = b.id) AS review_count, \
     (SELECT COUNT(*) FROM endorsements e WHERE e.business_id = b.id) AS endorsement_count \
     FROM businesses b JOIN users u ON u.id = b.owner_id WHERE 1=1";

pub(crate) fn parse_business_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id)
        .map_err(|_| ApiError::validation(vec![FieldError::new("id", "must be a valid business id")]))
}

/// GET /api/businesses
pub async fn list_businesses(
    State(state): State<AppState>,
    params: Result<Query<BusinessListParams>, QueryRejection>,
) -> ApiResult<ApiSuccess<BusinessListResponse>> {
    const ROUTE: &str = "businesses-list";
    let Query(params) = params.map_err(|err| map_query_rejection(err).route(ROUTE))?;
    let (page, limit, offset) = page_window(params.page, params.limit, 10);

    let mut qb = QueryBuilder::new(SUMMARY_SELECT);
    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM businesses b WHERE 1=1");

    if let Some(category) = params.category {
        qb.push(" AND b.category = ");
        qb.push_bind(category);
        count_qb.push(" AND b.category = ");
        count_qb.push_bind(category);
    }
    if let Some(verified) = params.verified {
        qb.push(" AND b.is_verified = ");
        qb.push_bind(verified);
        count_qb.push(" AND b.is_verified = ");
        count_qb.push_bind(verified);
    }

    qb.push(" ORDER BY b.trust_score DESC, b.created_at DESC LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);

    let businesses: Vec<BusinessSummary> = qb
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    let total: i64 = count_qb
        .build_query_scalar()
        .fetch_one(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    Ok(ApiSuccess::new(
        BusinessListResponse {
            businesses,
            pagination: Pagination::new(page, limit, total),
        },
        "Businesses fetched",
    ))
}

/// POST /api/businesses
///
/// The owner is connected by phone, created on the fly when no user with
/// that phone exists yet.
pub async fn create_business(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBusinessRequest>,
) -> ApiResult<ApiSuccess<Business>> {
    const ROUTE: &str = "businesses-create";

    let owner: Option<User> = sqlx::query_as("SELECT * FROM users WHERE phone = $1")
        .bind(&payload.phone)
        .fetch_optional(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    let owner = match owner {
        Some(user) => user,
        None => sqlx::query_as(
            "INSERT INTO users (phone, name, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&payload.phone)
        .bind(&payload.name)
        .bind(UserRole::BusinessOwner)
        .fetch_one(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?,
    };

    let business: Business = sqlx::query_as(
        "INSERT INTO businesses (name, description, category, address, location, phone, owner_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.category)
    .bind(&payload.address)
    .bind(&payload.location)
    .bind(&payload.phone)
    .bind(owner.id)
    .fetch_one(&state.db)
    .await
    .map_err(|err| ApiError::from(err).route(ROUTE))?;

    metrics::BUSINESSES_CREATED.inc();
    tracing::info!(business_id = %business.id, owner_id = %owner.id, "business created");

    Ok(ApiSuccess::created(business, "Business created successfully"))
}

/// GET /api/businesses/:id
pub async fn get_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiSuccess<BusinessDetail>> {
    const ROUTE: &str = "businesses-get";
    let business_id = parse_business_id(&id).map_err(|err| err.route(ROUTE))?;

    let business: Business = sqlx::query_as("SELECT * FROM businesses WHERE id = $1")
        .bind(business_id)
        .fetch_one(&state.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => ApiError::not_found("Business not found").route(ROUTE),
            other => ApiError::from(other).route(ROUTE),
        })?;

    let owner: OwnerSummary = sqlx::query_as("SELECT name, phone FROM users WHERE id = $1")
        .bind(business.owner_id)
        .fetch_one(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    let reviews: Vec<ReviewWithReviewer> = sqlx::query_as(
        "SELECT r.*, u.name AS reviewer_name FROM reviews r \
         JOIN users u ON u.id = r.reviewer_id \
         WHERE r.business_id = $1 ORDER BY r.created_at DESC",
    )
    .bind(business_id)
    .fetch_all(&state.db)
    .await
    .map_err(|err| ApiError::from(err).route(ROUTE))?;

    let endorsements: Vec<EndorsementWithEndorser> = sqlx::query_as(
        "SELECT e.*, u.name AS endorser_name FROM endorsements e \
         JOIN users u ON u.id = e.endorser_id \
         WHERE e.business_id = $1 ORDER BY e.created_at DESC",
    )
    .bind(business_id)
    .fetch_all(&state.db)
    .await
    .map_err(|err| ApiError::from(err).route(ROUTE))?;

    let analytics: Option<BusinessAnalytics> =
        sqlx::query_as("SELECT * FROM business_analytics WHERE business_id = $1")
            .bind(business_id)
            .fetch_optional(&state.db)
            .await
            .map_err(|err| ApiError::from(err).route(ROUTE))?;

    Ok(ApiSuccess::new(
        BusinessDetail {
            business,
            owner,
            reviews,
            endorsements,
            analytics,
        },
        "Business fetched",
    ))
}

/// PUT /api/businesses/:id
pub async fn update_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateBusinessRequest>,
) -> ApiResult<ApiSuccess<Business>> {
    const ROUTE: &str = "businesses-update";
    let business_id = parse_business_id(&id).map_err(|err| err.route(ROUTE))?;

    let mut qb = QueryBuilder::new("UPDATE businesses SET updated_at = NOW()");
    if let Some(ref name) = payload.name {
        qb.push(", name = ");
        qb.push_bind(name);
    }
    if let Some(ref description) = payload.description {
        qb.push(", description = ");
        qb.push_bind(description);
    }
    if let Some(category) = payload.category {
        qb.push(", category = ");
        qb.push_bind(category);
    }
    if let Some(ref address) = payload.address {
        qb.push(", address = ");
        qb.push_bind(address);
    }
    if let Some(ref location) = payload.location {
        qb.push(", location = ");
        qb.push_bind(location);
    }
    if let Some(ref phone) = payload.phone {
        qb.push(", phone = ");
        qb.push_bind(phone);
    }
    qb.push(" WHERE id = ");
    qb.push_bind(business_id);
    qb.push(" RETURNING *");

    let business: Business = qb
        .build_query_as()
        .fetch_one(&state.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => ApiError::not_found("Business not found").route(ROUTE),
            other => ApiError::from(other).route(ROUTE),
        })?;

    tracing::info!(business_id = %business.id, "business updated");

    Ok(ApiSuccess::new(business, "Business updated successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_id_must_be_a_uuid() {
        assert!(parse_business_id("not-a-uuid").is_err());
        assert!(parse_business_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
    }
}
