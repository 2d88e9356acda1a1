use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{
    handlers::{self, auth, businesses, email, reviews, search, users},
    metrics_handler,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/verify-otp", post(auth::verify_otp))
}

pub fn business_routes() -> Router<AppState> {
    Router::new()
        .route("/api/businesses", get(businesses::list_businesses))
        .route("/api/businesses", post(businesses::create_business))
        .route("/api/businesses/:id", get(businesses::get_business))
        .route("/api/businesses/:id", put(businesses::update_business))
        .route("/api/businesses/:id/reviews", get(reviews::list_reviews))
        .route("/api/businesses/:id/reviews", post(reviews::create_review))
}

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/api/search", get(search::search_businesses))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/api/users", get(users::list_users))
}

pub fn email_routes() -> Router<AppState> {
    Router::new().route("/api/email", post(email::send_email))
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/stats", get(handlers::get_stats))
}

pub fn observability_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler::metrics_endpoint))
}
