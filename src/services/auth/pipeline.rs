//! Request authentication pipeline.
//!
//! Order per request:
//! 1. `Authorization: Bearer <token>` present? otherwise stop (no collaborator calls)
//! 2. revocation lookup (before any claim of the token is trusted)
//! 3. signature / claims validation
//! 4. subject extraction
//! 5. already authenticated? keep the existing identity
//! 6. identity lookup
//! 7. install the identity into the request's `AuthContext`
//!
//! Every failure ends in `Unauthenticated`; the pipeline never rejects a
//! request. Rejection is up to whatever runs after it and needs an identity.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use crate::services::auth::{
    access_jwt::TokenVerifier,
    context::{AuthContext, Authentication, RequestDetails},
    revocation::{RevocationError, RevocationStore},
};
use crate::services::identity::{IdentityError, IdentityResolver};

const BEARER_PREFIX: &str = "Bearer ";

/// Collaborator call that can stall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RevocationLookup,
    IdentityLookup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::RevocationLookup => f.write_str("revocation lookup"),
            Stage::IdentityLookup => f.write_str("identity lookup"),
        }
    }
}

/// Why a request was left unauthenticated.
///
/// Observability only: every variant takes the same path (forward, anonymous).
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("no bearer credential presented")]
    NoCredential,
    #[error("token revoked")]
    Revoked,
    #[error("token invalid")]
    InvalidToken,
    #[error("token has no usable subject")]
    MissingSubject,
    #[error("subject has no identity")]
    IdentityNotFound,
    #[error("revocation store unavailable: {0}")]
    RevocationUnavailable(#[source] RevocationError),
    #[error("identity lookup unavailable: {0}")]
    IdentityUnavailable(#[source] IdentityError),
    #[error("{0} timed out")]
    Timeout(Stage),
}

impl AuthFailure {
    /// Collaborator outage rather than a problem with the credential.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::RevocationUnavailable(_) | Self::IdentityUnavailable(_) | Self::Timeout(_)
        )
    }
}

impl From<IdentityError> for AuthFailure {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotFound => Self::IdentityNotFound,
            other => Self::IdentityUnavailable(other),
        }
    }
}

#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated,
    /// The context already held an identity; it was left as is.
    AlreadyAuthenticated,
    Unauthenticated(AuthFailure),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated | Self::AlreadyAuthenticated)
    }
}

/// `Bearer <token>` -> `<token>`. Any other scheme (or none) yields `None`.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization?
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}

#[derive(Clone)]
pub struct AuthPipeline {
    verifier: Arc<TokenVerifier>,
    revocations: Arc<dyn RevocationStore>,
    identities: Arc<dyn IdentityResolver>,
    collaborator_timeout: Duration,
}

impl fmt::Debug for AuthPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPipeline")
            .field("verifier", &self.verifier)
            .field("collaborator_timeout", &self.collaborator_timeout)
            .finish_non_exhaustive()
    }
}

impl AuthPipeline {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        revocations: Arc<dyn RevocationStore>,
        identities: Arc<dyn IdentityResolver>,
        collaborator_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            revocations,
            identities,
            collaborator_timeout,
        }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        self.verifier.as_ref()
    }

    pub fn revocations(&self) -> &dyn RevocationStore {
        self.revocations.as_ref()
    }

    /// Runs the pipeline for one request. Never fails: the outcome says what happened.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
        ctx: &mut AuthContext,
        details: RequestDetails,
    ) -> AuthOutcome {
        let Some(token) = bearer_token(authorization) else {
            // Nothing to check; an identity installed upstream stays in place.
            if ctx.is_authenticated() {
                return AuthOutcome::AlreadyAuthenticated;
            }
            return AuthOutcome::Unauthenticated(AuthFailure::NoCredential);
        };

        match self.authenticate_token(token, ctx, details).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                if failure.is_backend() {
                    // Outages fail open as well; keep them loud.
                    tracing::warn!(error = %failure, "authentication skipped");
                } else {
                    tracing::debug!(error = %failure, "request left unauthenticated");
                }
                AuthOutcome::Unauthenticated(failure)
            }
        }
    }

    async fn authenticate_token(
        &self,
        token: &str,
        ctx: &mut AuthContext,
        details: RequestDetails,
    ) -> Result<AuthOutcome, AuthFailure> {
        let revoked = self
            .bounded(Stage::RevocationLookup, self.revocations.is_revoked(token))
            .await?
            .map_err(AuthFailure::RevocationUnavailable)?;
        if revoked {
            return Err(AuthFailure::Revoked);
        }

        if !self.verifier.validate(token) {
            return Err(AuthFailure::InvalidToken);
        }

        let subject = self
            .verifier
            .extract_subject(token)
            .ok_or(AuthFailure::MissingSubject)?;

        if ctx.is_authenticated() {
            return Ok(AuthOutcome::AlreadyAuthenticated);
        }

        let identity = self
            .bounded(
                Stage::IdentityLookup,
                self.identities.resolve_by_subject(&subject),
            )
            .await??;

        let user_id = identity.user_id;
        if !ctx.install(Authentication { identity, details }) {
            return Ok(AuthOutcome::AlreadyAuthenticated);
        }

        tracing::debug!(user_id, "request authenticated");
        Ok(AuthOutcome::Authenticated)
    }

    // Dropping the timed-out future abandons the in-flight collaborator call.
    async fn bounded<T>(
        &self,
        stage: Stage,
        call: impl Future<Output = T>,
    ) -> Result<T, AuthFailure> {
        tokio::time::timeout(self.collaborator_timeout, call)
            .await
            .map_err(|_| AuthFailure::Timeout(stage))
    }
}
