use once_cell::sync::Lazy;
use prometheus::{
    opts, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Registry, TextEncoder,
};

macro_rules! counter_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| IntCounterVec::new(opts!($name, $help), $labels).unwrap())
    };
}
macro_rules! counter {
    ($name:expr, $help:expr) => {
        Lazy::new(|| IntCounter::new($name, $help).unwrap())
    };
}
macro_rules! histogram_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| {
            HistogramVec::new(
                HistogramOpts::new($name, $help).buckets(LATENCY_BUCKETS.to_vec()),
                $labels,
            )
            .unwrap()
        })
    };
}

const LATENCY_BUCKETS: [f64; 14] = [
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
];

// ── HTTP ────────────────────────────────────────────────────────────────────
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = counter_vec!(
    "http_requests_total",
    "Total HTTP requests",
    &["method", "path", "status"]
);
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = histogram_vec!(
    "http_request_duration_seconds",
    "HTTP request latency",
    &["method", "path"]
);

// ── Domain ──────────────────────────────────────────────────────────────────
pub static USERS_REGISTERED: Lazy<IntCounter> =
    counter!("users_registered_total", "Users registered");
pub static BUSINESSES_CREATED: Lazy<IntCounter> =
    counter!("businesses_created_total", "Businesses created");
pub static REVIEWS_CREATED: Lazy<IntCounter> =
    counter!("reviews_created_total", "Reviews created");
pub static ANALYTICS_RECOMPUTES: Lazy<IntCounter> = counter!(
    "analytics_recomputes_total",
    "Business analytics recomputations"
);
pub static OTP_VERIFICATIONS: Lazy<IntCounterVec> = counter_vec!(
    "otp_verifications_total",
    "ID-token verification attempts",
    &["result"]
);
pub static EMAILS_SENT: Lazy<IntCounter> = counter!("emails_sent_total", "Emails dispatched");

pub fn register_all(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    registry.register(Box::new(HTTP_REQUEST_DURATION.clone()))?;
    registry.register(Box::new(USERS_REGISTERED.clone()))?;
    registry.register(Box::new(BUSINESSES_CREATED.clone()))?;
    registry.register(Box::new(REVIEWS_CREATED.clone()))?;
    registry.register(Box::new(ANALYTICS_RECOMPUTES.clone()))?;
    registry.register(Box::new(OTP_VERIFICATIONS.clone()))?;
    registry.register(Box::new(EMAILS_SENT.clone()))?;
    Ok(())
}

pub fn observe_http(method: &str, path: &str, status: u16, seconds: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, path])
        .observe(seconds);
}

pub fn gather_metrics(registry: &Registry) -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::error!(error = ?err, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_all_exposes_every_family() {
        let registry = Registry::new_custom(Some("test".into()), None).unwrap();
        register_all(&registry).unwrap();
        observe_http("GET", "/health", 200, 0.001);
        USERS_REGISTERED.inc();

        let text = gather_metrics(&registry);
        assert!(text.contains("http_requests_total"));
        assert!(text.contains("users_registered_total"));
        assert!(text.contains("# TYPE"));
    }
}
