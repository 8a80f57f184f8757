//! # bounty-api: Axum HTTP Service for the Bounty Ledger
//!
//! Exposes one [`bounty_ledger::BountyLedger`] over JSON. The caller of
//! every mutating request is the party named in the `x-party-id` header.
//!
//! ## API Surface
//!
//! | Prefix                               | Module                      |
//! |--------------------------------------|-----------------------------|
//! | `/v1/bounties`, `/v1/bounties/{b}/*` | [`routes::bounties`]        |
//! | `/v1/bounties/{b}/fulfillments/*`    | [`routes::fulfillments`]    |
//! | `/v1/escrow`, `/v1/events`, `/v1/accounts/{party}` | [`routes::ledger`] |
//! | `/health/*`, `/metrics`              | this module                 |
//! | `/openapi.json`                      | [`openapi`]                 |
//!
//! ## Errors
//!
//! Every failure renders as `{"error": {"code", "message"}}` with the
//! ledger's stable error code. See [`error::AppError`].

pub mod config;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::bounties::router())
        .merge(routes::fulfillments::router())
        .merge(routes::ledger::router())
        .merge(openapi::router())
        .route("/metrics", get(render_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Bind `config.host:config.port` and serve `state` until the process exits.
pub async fn serve(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "bounty API listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics: Prometheus text exposition, 404 without a recorder.
async fn render_metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(StatusCode::NOT_FOUND)
}
