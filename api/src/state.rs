use prometheus::Registry;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::email::Mailer;
use crate::identity::IdentityVerifier;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: AppConfig,
    pub started_at: Instant,
    pub identity: Arc<IdentityVerifier>,
    pub mailer: Arc<Mailer>,
    pub registry: Registry,
}

impl AppState {
    pub fn new(
        db: PgPool,
        config: AppConfig,
        identity: Arc<IdentityVerifier>,
        registry: Registry,
    ) -> Self {
        let mailer = Arc::new(Mailer::from_config(&config.email));
        Self {
            db,
            config,
            started_at: Instant::now(),
            identity,
            mailer,
            registry,
        }
    }
}
