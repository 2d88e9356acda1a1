use std::env;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;

/// Deployment mode. Governs error-message verbosity and whether debug OTP
/// codes are ever returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }

    fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Identity-provider settings. Credentials are supplied out-of-band via the
/// environment.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub project_id: String,
}

/// Email-delivery settings. Optional: when absent the email endpoint
/// reports itself unconfigured instead of failing at startup.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub sender: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub environment: Environment,
    pub identity: IdentityConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => 3001,
        };
        let project_id =
            env::var("FIREBASE_PROJECT_ID").context("FIREBASE_PROJECT_ID must be set")?;

        Ok(Self {
            database_url,
            port,
            environment: Environment::from_env(),
            identity: IdentityConfig { project_id },
            email: EmailConfig {
                api_key: env::var("SENDGRID_API_KEY").ok(),
                sender: env::var("SENDGRID_SENDER").ok(),
            },
        })
    }
}

static ENVIRONMENT: OnceCell<Environment> = OnceCell::new();

/// Record the deployment mode as process-wide state. Idempotent; invoked
/// once at startup.
pub fn init_environment(environment: Environment) {
    let _ = ENVIRONMENT.set(environment);
}

/// The deployment mode recorded at startup. Defaults to development when
/// initialization has not happened (tests, tools).
pub fn environment() -> Environment {
    ENVIRONMENT.get().copied().unwrap_or(Environment::Development)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_environment_defaults_to_development() {
        assert!(!environment().is_production());
    }

    #[test]
    fn production_mode_flag() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Development.is_production());
    }
}
