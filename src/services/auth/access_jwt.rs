use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::Duration;

use crate::config::AccessTokenKey;

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug, thiserror::Error)]
pub enum AccessJwtError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid verification key: {0}")]
    InvalidKey(String),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
}

/// Access token (JWT) claims.
///
/// NOTE:
/// - `sub` is the user's e-mail address (the identity lookup key).
/// - `iss`/`aud` are checked by jsonwebtoken itself when configured; they are not kept here.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub exp: u64,
}

/// Access-token verifier.
///
/// Checks signature, `exp` (with leeway), the required claims, and
/// `iss`/`aud` when those are configured.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: u64,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(
        key: &AccessTokenKey,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, AccessJwtError> {
        let (decoding_key, algorithm) = match key {
            AccessTokenKey::Ed25519PublicPem(pem) => {
                let key = DecodingKey::from_ed_pem(pem.as_bytes()).map_err(|e| {
                    AccessJwtError::InvalidKey(format!("invalid ed25519 public key pem: {}", e))
                })?;
                (key, Algorithm::EdDSA)
            }
            AccessTokenKey::Hs256Secret(secret) => {
                if secret.is_empty() {
                    return Err(AccessJwtError::InvalidKey("empty hs256 secret".to_string()));
                }
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = leeway_seconds;

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            // Otherwise a token carrying `aud` would be rejected outright
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
            leeway_seconds,
        })
    }

    // Verify and decode a JWT access token.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify + strict claim validation.
    ///
    /// `jsonwebtoken::Validation` already checks:
    /// - signature and algorithm
    /// - `exp` (with leeway)
    /// - presence of `exp` and `sub`
    /// - `iss` and `aud` when configured
    ///
    /// This method additionally checks that the required claims are not empty.
    pub fn verify_strict(&self, token: &str) -> Result<AccessTokenClaims, AccessJwtError> {
        let claims = self.verify(token)?;

        if claims.sub.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }
        if claims.exp == 0 {
            return Err(AccessJwtError::EmptyClaim("exp"));
        }

        Ok(claims)
    }

    /// How long a revocation of a token with these claims must be kept.
    ///
    /// The token is accepted until `exp + leeway`, so the entry must outlive that.
    /// At least one second.
    pub fn revocation_ttl(&self, claims: &AccessTokenClaims, now: i64) -> Duration {
        let accepted_until = i64::try_from(claims.exp)
            .unwrap_or(i64::MAX)
            .saturating_add(i64::try_from(self.leeway_seconds).unwrap_or(i64::MAX));
        let secs = u64::try_from(accepted_until.saturating_sub(now)).unwrap_or(0);
        Duration::from_secs(secs.max(1))
    }

    /// Fail-closed validity check. Every defect collapses to `false`.
    pub fn validate(&self, token: &str) -> bool {
        match self.verify_strict(token) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "access token rejected");
                false
            }
        }
    }

    /// Subject claim of a well-formed, verified token; `None` otherwise.
    pub fn extract_subject(&self, token: &str) -> Option<String> {
        self.verify_strict(token)
            .ok()
            .map(|claims| claims.sub.trim().to_string())
    }
}
