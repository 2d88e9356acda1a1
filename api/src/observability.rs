use anyhow::Result;
use prometheus::Registry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::metrics;

pub struct Observability {
    pub registry: Registry,
}

impl Observability {
    pub fn init() -> Result<Self> {
        let registry = Registry::new_custom(Some("trustnet".into()), None)?;
        metrics::register_all(&registry)?;

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "api=debug,tower_http=debug".into());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();

        tracing::info!("Observability stack initialized (Prometheus)");
        Ok(Self { registry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_carries_prefixed_families() {
        let registry = Registry::new_custom(Some("test".into()), None).unwrap();
        metrics::register_all(&registry).unwrap();
        let families = registry.gather();
        assert!(!families.is_empty());
        for fam in &families {
            assert!(
                fam.get_name().starts_with("test_"),
                "metric {} missing prefix",
                fam.get_name()
            );
        }
    }
}
