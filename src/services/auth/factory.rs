//! Factory: build the authentication gate from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    AuthPipeline, CacheRevocationStore, RevocationStore, TokenVerifier, access_jwt::AccessJwtError,
};
use crate::services::cache::{CacheError, MemoryClient, ValkeyClient};
use crate::services::identity::IdentityResolver;

pub async fn build_revocation_store(
    config: &Config,
) -> Result<Arc<dyn RevocationStore>, CacheError> {
    let prefix = config.revocation_key_prefix.clone();

    match config.valkey_url.as_deref() {
        Some(url) => {
            let client = ValkeyClient::new(url).await?;
            Ok(Arc::new(CacheRevocationStore::new(client, prefix)))
        }
        None => {
            // Config refuses this combination in production.
            tracing::warn!("VALKEY_URL not set; revocations are kept in process memory");
            Ok(Arc::new(CacheRevocationStore::new(MemoryClient::new(), prefix)))
        }
    }
}

pub fn build_auth_pipeline(
    config: &Config,
    revocations: Arc<dyn RevocationStore>,
    identities: Arc<dyn IdentityResolver>,
) -> Result<Arc<AuthPipeline>, AccessJwtError> {
    let verifier = TokenVerifier::new(
        &config.access_token_key,
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    )?;

    Ok(Arc::new(AuthPipeline::new(
        Arc::new(verifier),
        revocations,
        identities,
        config.collaborator_timeout,
    )))
}
