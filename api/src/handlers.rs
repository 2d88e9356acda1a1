pub mod auth;
pub mod businesses;
pub mod email;
pub mod reviews;
pub mod search;
pub mod users;

use axum::{
    extract::{rejection::QueryRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{ApiError, ApiResult},
    response::ApiSuccess,
    state::AppState,
    validation::FieldError,
};

pub(crate) fn map_query_rejection(err: QueryRejection) -> ApiError {
    ApiError::validation(vec![FieldError::new(
        "query",
        format!("Invalid query parameters: {}", err.body_text()),
    )])
}

/// Normalize pagination params: 1-based page, clamped limit, derived offset
pub(crate) fn page_window(
    page: Option<i64>,
    limit: Option<i64>,
    default_limit: i64,
) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, 100);
    let offset = (page - 1) * limit;
    (page, limit, offset)
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let uptime = state.started_at.elapsed().as_secs();
    let now = chrono::Utc::now().to_rfc3339();

    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    if db_ok {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "version": "0.1.0",
                "timestamp": now,
                "uptime_secs": uptime
            })),
        )
    } else {
        tracing::warn!(uptime_secs = uptime, "health check degraded, db unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "version": "0.1.0",
                "timestamp": now,
                "uptime_secs": uptime
            })),
        )
    }
}

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<ApiSuccess<Value>> {
    const ROUTE: &str = "stats";

    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    let total_businesses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM businesses")
        .fetch_one(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    let verified_businesses: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM businesses WHERE is_verified = true")
            .fetch_one(&state.db)
            .await
            .map_err(|err| ApiError::from(err).route(ROUTE))?;

    let total_reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    Ok(ApiSuccess::new(
        json!({
            "total_users": total_users,
            "total_businesses": total_businesses,
            "verified_businesses": verified_businesses,
            "total_reviews": total_reviews,
        }),
        "Stats fetched",
    ))
}

pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults() {
        assert_eq!(page_window(None, None, 10), (1, 10, 0));
        assert_eq!(page_window(None, None, 5), (1, 5, 0));
    }

    #[test]
    fn page_window_offsets_are_one_based() {
        assert_eq!(page_window(Some(2), Some(5), 10), (2, 5, 5));
        assert_eq!(page_window(Some(3), Some(20), 10), (3, 20, 40));
    }

    #[test]
    fn page_window_clamps_abuse() {
        assert_eq!(page_window(Some(0), Some(0), 10), (1, 1, 0));
        assert_eq!(page_window(Some(-5), Some(1000), 10), (1, 100, 0));
    }
}
