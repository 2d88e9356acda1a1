use axum::extract::{rejection::QueryRejection, Query, State};
use shared::{BusinessListResponse, BusinessSummary, Pagination, SearchParams};
use sqlx::QueryBuilder;

use crate::{
    error::{ApiError, ApiResult},
    handlers::{map_query_rejection, page_window},
    response::ApiSuccess,
    state::AppState,
};

/// GET /api/search
///
/// Free-text search over business names and descriptions, with optional
/// category and location filters. Results order by trust score.
pub async fn search_businesses(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<ApiSuccess<BusinessListResponse>> {
    const ROUTE: &str = "search";
    let Query(params) = params.map_err(|err| map_query_rejection(err).route(ROUTE))?;
    let (page, limit, offset) = page_window(params.page, params.limit, 10);

    let mut qb = QueryBuilder::new(super::businesses::SUMMARY_SELECT);
    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM businesses b WHERE 1=1");

    if let Some(ref q) = params.q {
        let pattern = format!("%{}%", q);
        qb.push(" AND (b.name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR b.description ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(")");
        count_qb.push(" AND (b.name ILIKE ");
        count_qb.push_bind(pattern.clone());
        count_qb.push(" OR b.description ILIKE ");
        count_qb.push_bind(pattern);
        count_qb.push(")");
    }
    if let Some(category) = params.category {
        qb.push(" AND b.category = ");
        qb.push_bind(category);
        count_qb.push(" AND b.category = ");
        count_qb.push_bind(category);
    }
    if let Some(ref location) = params.location {
        let pattern = format!("%{}%", location);
        qb.push(" AND b.location ILIKE ");
        qb.push_bind(pattern.clone());
        count_qb.push(" AND b.location ILIKE ");
        count_qb.push_bind(pattern);
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
        "Search results fetched",
    ))
}
