//! Identity-provider ID-token verification.
//!
//! OTP issuance is provider-authoritative: the provider's client SDK sends
//! and checks the code, then hands the client a signed ID token. This
//! module verifies that token server-side: RS256 signature against the
//! provider's published JWKS, audience pinned to the project id, issuer
//! pinned to the project's token endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

/// Published signing keys for provider-issued ID tokens
const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// How long fetched keys are trusted when the provider sends no max-age
const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to fetch signing keys: {0}")]
    CertFetch(#[from] reqwest::Error),
    #[error("token header is missing a key id")]
    MissingKeyId,
    #[error("no signing key matches key id {0}")]
    UnknownKeyId(String),
    #[error("token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Claims decoded from a verified ID token
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Default)]
struct KeyCache {
    fetched_at: Option<Instant>,
    ttl: Duration,
    keys: HashMap<String, Jwk>,
}

pub struct IdentityVerifier {
    project_id: String,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl IdentityVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            http: reqwest::Client::new(),
            cache: RwLock::new(KeyCache::default()),
        }
    }

    /// Verify a provider-issued ID token and return its identity claims
    pub async fn verify(&self, id_token: &str) -> Result<IdentityClaims, IdentityError> {
        let header = decode_header(id_token)?;
        let kid = header.kid.ok_or(IdentityError::MissingKeyId)?;
        let jwk = self.signing_key(&kid).await?;

        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.project_id
        )]);

        let data = decode::<IdentityClaims>(id_token, &key, &validation)?;
        Ok(data.claims)
    }

    async fn signing_key(&self, kid: &str) -> Result<Jwk, IdentityError> {
        {
            let cache = self.cache.read().await;
            if let Some(fetched_at) = cache.fetched_at {
                if fetched_at.elapsed() < cache.ttl {
                    if let Some(jwk) = cache.keys.get(kid) {
                        return Ok(jwk.clone());
                    }
                }
            }
        }

        let mut cache = self.cache.write().await;
        let response = self.http.get(JWKS_URL).send().await?.error_for_status()?;
        let ttl = parse_max_age(
            response
                .headers()
                .get(reqwest::header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
        );
        let set: JwkSet = response.json().await?;

        cache.fetched_at = Some(Instant::now());
        cache.ttl = ttl;
        cache.keys = set.keys.into_iter().map(|k| (k.kid.clone(), k)).collect();

        cache
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| IdentityError::UnknownKeyId(kid.to_string()))
    }
}

/// Parse `max-age` out of a Cache-Control header, falling back to the
/// default TTL
fn parse_max_age(header: Option<&str>) -> Duration {
    header
        .and_then(|value| {
            value.split(',').find_map(|directive| {
                directive
                    .trim()
                    .strip_prefix("max-age=")
                    .and_then(|age| age.parse::<u64>().ok())
            })
        })
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_KEY_TTL)
}

static VERIFIER: OnceCell<Arc<IdentityVerifier>> = OnceCell::new();

/// Initialize the process-wide identity verifier. Idempotent; invoked once
/// at startup with credentials from configuration, never implicitly on
/// first use.
pub fn init(project_id: &str) -> Arc<IdentityVerifier> {
    VERIFIER
        .get_or_init(|| Arc::new(IdentityVerifier::new(project_id)))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_age_parsed_from_cache_control() {
        assert_eq!(
            parse_max_age(Some("public, max-age=19204, must-revalidate")),
            Duration::from_secs(19204)
        );
    }

    #[test]
    fn missing_or_malformed_cache_control_uses_default() {
        assert_eq!(parse_max_age(None), DEFAULT_KEY_TTL);
        assert_eq!(parse_max_age(Some("no-store")), DEFAULT_KEY_TTL);
        assert_eq!(parse_max_age(Some("max-age=banana")), DEFAULT_KEY_TTL);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_before_any_network_call() {
        let verifier = IdentityVerifier::new("demo-project");
        let result = verifier.verify("not-a-jwt").await;
        assert!(matches!(result, Err(IdentityError::Invalid(_))));
    }

    #[tokio::test]
    async fn token_without_kid_is_rejected() {
        // HS256 token with no kid in the header
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &serde_json::json!({"sub": "u1", "exp": 4102444800u64}),
            &jsonwebtoken::EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let verifier = IdentityVerifier::new("demo-project");
        let result = verifier.verify(&token).await;
        assert!(matches!(result, Err(IdentityError::MissingKeyId)));
    }
}
