use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

use crate::error::AppError;
use crate::services::auth::{AuthContext, Authentication};

/// Requires an established identity.
///
/// The gate never rejects; this extractor is where an anonymous request
/// turns into a 401.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Authentication);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .and_then(AuthContext::authentication)
            .cloned()
            .map(Authenticated)
            .ok_or(AppError::Unauthorized)
    }
}

/// The request's AuthContext, authenticated or not. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentAuth(pub AuthContext);

impl<S> FromRequestParts<S> for CurrentAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentAuth(
            parts
                .extensions
                .get::<AuthContext>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}
