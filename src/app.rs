/*
 * Responsibility
 * - load Config -> build collaborators -> assemble the Router
 * - apply middleware (transport, auth context, authentication gate)
 * - start with axum::serve()
 */
use std::{net::SocketAddr, panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, v1::handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{build_auth_pipeline, build_revocation_store};
use crate::services::identity::PgIdentityResolver;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,auth_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get lost
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting auth gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    // ConnectInfo feeds the peer address into the authentication details
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let revocations = build_revocation_store(config)
        .await
        .context("failed to connect to the revocation store")?;

    // Lazy: the pool connects on first identity lookup
    let db = sqlx::PgPool::connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;
    let identities = Arc::new(PgIdentityResolver::new(db));

    let auth = build_auth_pipeline(config, revocations, identities)
        .context("failed to build access token verifier")?;

    Ok(AppState::new(auth))
}

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let v1 = middleware::auth::access::apply(api::v1::routes(), state.clone());

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", v1)
        .with_state(state);

    // Outermost first at request time: transport, then an empty AuthContext, then the gate.
    let router = middleware::auth::context::apply(router);
    middleware::http::apply(router, request_timeout)
}
