/*
 * Responsibility
 * - GET /session: reports whether the gate established an identity (never 401)
 * - POST /auth/logout: revokes the presented bearer token for as long as it validates
 */
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};

use crate::{
    api::v1::{
        dto::session::SessionResponse,
        extractors::{Authenticated, CurrentAuth},
    },
    error::AppError,
    services::auth::pipeline::bearer_token,
    state::AppState,
};

pub async fn current_session(CurrentAuth(ctx): CurrentAuth) -> Json<SessionResponse> {
    Json(SessionResponse::from(&ctx))
}

pub async fn logout(
    State(state): State<AppState>,
    Authenticated(auth): Authenticated,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    )
    .ok_or(AppError::Unauthorized)?;

    let verifier = state.auth.verifier();
    let claims = verifier
        .verify_strict(token)
        .map_err(|_| AppError::Unauthorized)?;

    // Must cover the leeway window too, or the token would validate again.
    let ttl = verifier.revocation_ttl(&claims, chrono::Utc::now().timestamp());

    state
        .auth
        .revocations()
        .revoke(token, ttl)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "token revocation failed");
            AppError::ServiceUnavailable
        })?;

    tracing::info!(user_id = auth.identity.user_id, "token revoked on logout");
    Ok(StatusCode::NO_CONTENT)
}
