/*
 * Responsibility
 * - v1 URL layout
 * - the authentication gate is applied to this whole router by app.rs;
 *   each handler decides whether it needs an identity (extractors)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    me::me,
    session::{current_session, logout},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(current_session))
        .route("/me", get(me))
        .route("/auth/logout", post(logout))
}
