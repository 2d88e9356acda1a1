use axum::extract::{rejection::QueryRejection, Path, Query, State};
use shared::{
    CreateReviewRequest, Pagination, Review, ReviewListParams, ReviewListResponse,
    ReviewWithReviewer,
};
use uuid::Uuid;

use crate::{
    analytics,
    error::{ApiError, ApiResult},
    handlers::{businesses::parse_business_id, map_query_rejection, page_window},
    metrics,
    response::ApiSuccess,
    state::AppState,
    validation::{FieldError, ValidatedJson},
};

/// GET /api/businesses/:id/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<ReviewListParams>, QueryRejection>,
) -> ApiResult<ApiSuccess<ReviewListResponse>> {
    const ROUTE: &str = "reviews-list";
    let business_id = parse_business_id(&id).map_err(|err| err.route(ROUTE))?;
    let Query(params) = params.map_err(|err| map_query_rejection(err).route(ROUTE))?;
    let (page, limit, offset) = page_window(params.page, params.limit, 5);

    let reviews: Vec<ReviewWithReviewer> = sqlx::query_as(
        "SELECT r.*, u.name AS reviewer_name FROM reviews r \
         JOIN users u ON u.id = r.reviewer_id \
         WHERE r.business_id = $1 \
         ORDER BY r.created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(business_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await
    .map_err(|err| ApiError::from(err).route(ROUTE))?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE business_id = $1")
        .bind(business_id)
        .fetch_one(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    Ok(ApiSuccess::new(
        ReviewListResponse {
            reviews,
            pagination: Pagination::new(page, limit, total),
        },
        "Reviews fetched",
    ))
}

/// POST /api/businesses/:id/reviews
///
/// Persists the review, then restores the business's derived analytics by
/// full recomputation. The two steps are not transactionally coupled: an
/// analytics failure surfaces as a Database error without rolling back the
/// review, and the next recomputation converges.
pub async fn create_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> ApiResult<ApiSuccess<ReviewWithReviewer>> {
    const ROUTE: &str = "reviews-create";
    let business_id = parse_business_id(&id).map_err(|err| err.route(ROUTE))?;

    // Validation guarantees the id parses.
    let reviewer_id = Uuid::parse_str(&payload.reviewer_id).map_err(|_| {
        ApiError::validation(vec![FieldError::new("reviewer_id", "must be a valid id")])
            .route(ROUTE)
    })?;

    let business_exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM businesses WHERE id = $1")
        .bind(business_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;
    if business_exists.is_none() {
        return Err(ApiError::not_found("Business not found").route(ROUTE));
    }

    let reviewer_name: Option<String> = sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
        .bind(reviewer_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;
    let reviewer_name = match reviewer_name {
        Some(name) => name,
        None => return Err(ApiError::not_found("Reviewer not found").route(ROUTE)),
    };

    // Reviews are auto-verified for now.
    let review: Review = sqlx::query_as(
        "INSERT INTO reviews (business_id, reviewer_id, rating, comment, is_verified) \
         VALUES ($1, $2, $3, $4, true) RETURNING *",
    )
    .bind(business_id)
    .bind(reviewer_id)
    .bind(payload.rating as i32)
    .bind(&payload.comment)
    .fetch_one(&state.db)
    .await
    .map_err(|err| ApiError::from(err).route(ROUTE))?;

    analytics::recompute_business_analytics(&state.db, business_id)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    metrics::REVIEWS_CREATED.inc();
    tracing::info!(
        review_id = %review.id,
        business_id = %business_id,
        rating = review.rating,
        "review created"
    );

    Ok(ApiSuccess::created(
        ReviewWithReviewer {
            id: review.id,
            business_id: review.business_id,
            reviewer_id: review.reviewer_id,
            rating: review.rating,
            comment: review.comment,
            is_verified: review.is_verified,
            created_at: review.created_at,
            reviewer_name,
        },
        "Review created successfully",
    ))
}
