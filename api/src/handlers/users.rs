use axum::extract::State;
use shared::{User, UsersResponse};

use crate::{
    error::{ApiError, ApiResult},
    response::ApiSuccess,
    state::AppState,
};

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<ApiSuccess<UsersResponse>> {
    const ROUTE: &str = "users-list";

    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await
        .map_err(|err| ApiError::from(err).route(ROUTE))?;

    Ok(ApiSuccess::new(UsersResponse { users }, "Users fetched"))
}
