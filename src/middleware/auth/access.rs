//! Authentication gate: bearer token -> AuthContext in request extensions.
//!
//! Fail-open: the request is always forwarded exactly once. Whether an
//! anonymous request is acceptable is decided downstream (see
//! `api::v1::extractors::Authenticated`).

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::middleware::http::REQUEST_ID_HEADER;
use crate::services::auth::{AuthContext, RequestDetails};
use crate::state::AppState;

/// Puts the authentication gate in front of every route of `router`.
///
/// Example:
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 from_fn cannot take a State extractor, so pass state explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Normally created empty by `context::apply`; tolerate its absence.
    let mut ctx = req
        .extensions_mut()
        .remove::<AuthContext>()
        .unwrap_or_default();

    let details = request_details(&req);

    // Non-UTF-8 header values count as "no credential"
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    state.auth.authenticate(authorization, &mut ctx, details).await;

    // middleware -> extractor hand-off
    req.extensions_mut().insert(ctx);

    next.run(req).await
}

fn request_details(req: &Request<Body>) -> RequestDetails {
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    RequestDetails {
        remote_addr,
        request_id,
    }
}
