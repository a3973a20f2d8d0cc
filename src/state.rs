/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 * - cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::services::auth::AuthPipeline;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthPipeline>,
}

impl AppState {
    pub fn new(auth: Arc<AuthPipeline>) -> Self {
        Self { auth }
    }
}
