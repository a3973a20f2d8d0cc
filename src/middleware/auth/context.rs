//! Creates the empty, request-scoped `AuthContext` at request start.

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::services::auth::AuthContext;

pub fn apply(router: Router) -> Router {
    router.layer(middleware::from_fn(init_context))
}

async fn init_context(mut req: Request<Body>, next: Next) -> Response {
    if req.extensions().get::<AuthContext>().is_none() {
        req.extensions_mut().insert(AuthContext::new());
    }
    next.run(req).await
}
