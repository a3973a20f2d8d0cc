use async_trait::async_trait;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::services::cache::{CacheClient, CacheError};

#[derive(Debug, thiserror::Error)]
pub enum RevocationError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Revocation (blacklist) lookup for bearer tokens.
///
/// - `is_revoked` must be answered before any claim of the token is trusted.
/// - `Err(_)` means the store could not answer; the caller decides the policy.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError>;

    // Revoke `token` for `ttl` (normally the token's remaining lifetime).
    async fn revoke(&self, token: &str, ttl: Duration) -> Result<(), RevocationError>;
}

/// Cache-backed revocation store (Valkey in production, in-process in dev/tests).
///
/// Raw tokens are never stored: keys are `<prefix>:<base64url(sha256(token))>`.
#[derive(Clone, Debug)]
pub struct CacheRevocationStore<C: CacheClient> {
    cache: C,
    prefix: String,
}

impl<C: CacheClient> CacheRevocationStore<C> {
    pub fn new(cache: C, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        format!(
            "{}:{}",
            self.prefix,
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)
        )
    }
}

#[async_trait]
impl<C: CacheClient> RevocationStore for CacheRevocationStore<C> {
    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError> {
        let found = self.cache.get_string(&self.key(token)).await?;
        Ok(found.is_some())
    }

    async fn revoke(&self, token: &str, ttl: Duration) -> Result<(), RevocationError> {
        let created = self
            .cache
            .set_if_absent_with_ttl(&self.key(token), "1", ttl)
            .await?;

        if !created {
            tracing::debug!(backend = self.cache.backend_name(), "token already revoked");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::MemoryClient;

    fn store() -> CacheRevocationStore<MemoryClient> {
        CacheRevocationStore::new(MemoryClient::new(), "auth:revoked")
    }

    #[tokio::test]
    async fn unknown_tokens_are_not_revoked() {
        assert!(!store().is_revoked("header.payload.sig").await.unwrap());
    }

    #[tokio::test]
    async fn revoked_tokens_are_reported() {
        let store = store();

        store
            .revoke("header.payload.sig", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(store.is_revoked("header.payload.sig").await.unwrap());
        assert!(!store.is_revoked("header.payload.other").await.unwrap());
    }

    #[tokio::test]
    async fn revoking_twice_is_fine() {
        let store = store();
        let ttl = Duration::from_secs(60);

        store.revoke("t", ttl).await.unwrap();
        store.revoke("t", ttl).await.unwrap();

        assert!(store.is_revoked("t").await.unwrap());
    }

    #[tokio::test]
    async fn revocation_lapses_with_ttl() {
        let store = store();

        store.revoke("t", Duration::from_millis(20)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!store.is_revoked("t").await.unwrap());
    }

    #[test]
    fn keys_do_not_contain_the_raw_token() {
        let key = store().key("header.payload.sig");

        assert!(key.starts_with("auth:revoked:"));
        assert!(!key.contains("payload"));
        assert_eq!(key, store().key("header.payload.sig"));
    }
}
