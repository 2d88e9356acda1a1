use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::metrics;
use crate::state::AppState;

pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let body = metrics::gather_metrics(&state.registry);
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, EmailConfig, Environment, IdentityConfig};
    use crate::identity::IdentityVerifier;
    use axum::extract::State;
    use axum::response::IntoResponse;
    use prometheus::Registry;
    use std::sync::Arc;

    fn test_state() -> AppState {
        let registry = Registry::new_custom(Some("test".into()), None).unwrap();
        metrics::register_all(&registry).unwrap();
        let config = AppConfig {
            database_url: "postgres://localhost/test".to_string(),
            port: 0,
            environment: Environment::Development,
            identity: IdentityConfig {
                project_id: "demo-project".to_string(),
            },
            email: EmailConfig {
                api_key: None,
                sender: None,
            },
        };
        AppState::new(
            create_test_pool(),
            config,
            Arc::new(IdentityVerifier::new("demo-project")),
            registry,
        )
    }

    fn create_test_pool() -> sqlx::PgPool {
        sqlx::pool::PoolOptions::new()
            .max_connections(1)
            .connect_lazy("postgres://localhost/test")
            .expect("lazy pool")
    }

    #[tokio::test]
    async fn metrics_endpoint_returns_prometheus_text() {
        let state = test_state();
        metrics::USERS_REGISTERED.inc();

        let resp = metrics_endpoint(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let ct = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(ct.contains("text/plain"));

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("users_registered_total"));
    }
}
