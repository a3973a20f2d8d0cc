//! Shared fixtures for HTTP-level tests: real router, in-memory collaborators.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use auth_gate::{
    app::build_router,
    config::AccessTokenKey,
    services::{
        auth::{AuthPipeline, CacheRevocationStore, RevocationStore, TokenVerifier},
        cache::MemoryClient,
        identity::{Identity, IdentityError, IdentityResolver},
    },
    state::AppState,
};
use axum::{Router, body::Body, response::Response};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;

pub const SECRET: &str = "integration-test-secret";

/// In-memory user directory that counts lookups.
#[derive(Default)]
pub struct Directory {
    users: HashMap<String, Identity>,
    lookups: AtomicUsize,
}

impl Directory {
    pub fn with_user(mut self, user_id: i64, email: &str, role: &str) -> Self {
        self.users.insert(
            email.to_string(),
            Identity::new(user_id, email, vec![format!("ROLE_{role}")]),
        );
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityResolver for Directory {
    async fn resolve_by_subject(&self, subject: &str) -> Result<Identity, IdentityError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.users
            .get(subject)
            .cloned()
            .ok_or(IdentityError::NotFound)
    }
}

pub struct TestApp {
    pub router: Router,
    pub directory: Arc<Directory>,
    pub revocations: Arc<CacheRevocationStore<MemoryClient>>,
}

impl TestApp {
    pub fn new(directory: Directory) -> Self {
        let verifier = TokenVerifier::new(
            &AccessTokenKey::Hs256Secret(SECRET.to_string()),
            None,
            None,
            0,
        )
        .expect("verifier");
        let directory = Arc::new(directory);
        let revocations = Arc::new(CacheRevocationStore::new(
            MemoryClient::new(),
            "test:revoked",
        ));

        let pipeline = AuthPipeline::new(
            Arc::new(verifier),
            revocations.clone() as Arc<dyn RevocationStore>,
            directory.clone() as Arc<dyn IdentityResolver>,
            Duration::from_millis(500),
        );
        let router = build_router(
            AppState::new(Arc::new(pipeline)),
            Duration::from_secs(5),
        );

        Self {
            router,
            directory,
            revocations,
        }
    }
}

pub fn token(sub: &str) -> String {
    token_signed_with(sub, SECRET)
}

pub fn token_signed_with(sub: &str, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({"sub": sub, "exp": chrono::Utc::now().timestamp() + 600}),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token")
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
