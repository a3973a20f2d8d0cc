/*
 * Responsibility
 * - GET /me: the caller's identity
 * - requires an established identity (401 otherwise)
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::Authenticated};

pub async fn me(Authenticated(auth): Authenticated) -> Json<MeResponse> {
    Json(MeResponse::from(&auth.identity))
}
