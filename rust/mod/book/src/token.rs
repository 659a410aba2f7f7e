//! Bearer token handling.
//!
//! [`ClaimsExtractor`] is the seam the HTTP layer calls to turn request
//! headers into [`Claims`]. [`TokenAuthority`] is the HS256 implementation
//! and also mints tokens for the `/token/new` endpoint.

use axum::http::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use bookshelf_core::ServiceError;

use crate::model::{Claims, Permissions, TokenClaims};
use crate::service::BookError;

/// Decodes caller claims from request headers.
///
/// Every failure is a `BookError::Decode`; expiry is left to the guard.
pub trait ClaimsExtractor: Send + Sync + 'static {
    fn extract(&self, headers: &HeaderMap) -> Result<Claims, BookError>;
}

/// An extractor that hands out the same claims for every request.
/// Used in tests.
pub struct FixedClaims(pub Claims);

impl ClaimsExtractor for FixedClaims {
    fn extract(&self, _headers: &HeaderMap) -> Result<Claims, BookError> {
        Ok(self.0.clone())
    }
}

/// Signs and verifies HS256 access tokens with a shared secret.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The guard compares `exp` against the clock itself, so an expired
        // token must still decode.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issue a token carrying `permissions`, valid for the configured TTL.
    pub fn issue(&self, permissions: Permissions) -> Result<String, ServiceError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| ServiceError::Internal("token expiry out of range".into()))?;
        self.issue_until(permissions, expires_at)
    }

    /// Issue a token with an explicit expiry.
    pub fn issue_until(
        &self,
        permissions: Permissions,
        expires_at: DateTime<Utc>,
    ) -> Result<String, ServiceError> {
        let claims = TokenClaims::new(expires_at, permissions);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(format!("JWT encode failed: {}", e)))
    }

    /// Verify a raw token and convert it into request claims.
    pub fn verify(&self, token: &str) -> Result<Claims, BookError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| BookError::Decode(e.to_string()))?;
        data.claims
            .into_claims()
            .ok_or_else(|| BookError::Decode("token expiry out of range".into()))
    }
}

impl ClaimsExtractor for TokenAuthority {
    fn extract(&self, headers: &HeaderMap) -> Result<Claims, BookError> {
        let token = extract_bearer(headers)?;
        self.verify(token)
    }
}

/// Extract the Bearer token from the Authorization header.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, BookError> {
    let value = headers
        .get("authorization")
        .ok_or_else(|| BookError::Decode("missing authorization header".into()))?
        .to_str()
        .map_err(|e| BookError::Decode(e.to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BookError::Decode("authorization header is not a bearer token".into()))
}
