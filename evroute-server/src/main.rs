//! HTTP API for the EV route planning engine.
//!
//! # Endpoints
//!
//! - `POST /api/v1/ev-route` - plan a charging-aware route
//! - `GET /health` - liveness probe
//!
//! Configuration comes from a TOML file plus command-line overrides; see
//! [`config::ServerConfig`]. `RUST_LOG` controls log verbosity.

mod config;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use evroute_core::client::OrsClient;
use evroute_core::model::PlanRequest;
use evroute_core::{Error, RoutePlanner, dataset};

use config::{Cli, ServerConfig};

#[derive(Clone)]
struct AppState {
    planner: Arc<RoutePlanner<OrsClient>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(&cli)?;

    let stations = dataset::load_chargers(&config.dataset)?;
    info!(
        stations = stations.len(),
        ors = %config.ors_url,
        "starting evroute server"
    );

    let client = OrsClient::new(&config.ors_url, &config.ors_profile);
    let state = AppState {
        planner: Arc::new(RoutePlanner::new(
            client,
            Arc::new(stations),
            config.engine.clone(),
        )),
    };

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/ev-route", post(plan_route))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn plan_route(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Response {
    let cancel = CancellationToken::new();
    match state.planner.plan(&request, cancel).await {
        Ok(trip) => (
            StatusCode::OK,
            Json(serde_json::json!({ "recommended_route": trip })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Maps engine errors to response codes. Upstream details are logged but
/// never forwarded to clients.
fn error_response(err: Error) -> Response {
    let (status, kind, message, hint) = match &err {
        Error::Validation(message) => {
            (StatusCode::BAD_REQUEST, "validation", message.clone(), None)
        }
        Error::NoRoute { hint } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "no_route",
            "no feasible route within range and filters".to_string(),
            Some(hint.clone()),
        ),
        Error::Upstream { status, message } => {
            error!(status = ?status, message = %message, "routing provider failure");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream",
                "routing service temporarily unavailable".to_string(),
                None,
            )
        }
        Error::Timeout { budget_ms } => (
            StatusCode::GATEWAY_TIMEOUT,
            "timeout",
            format!("request exceeded the {budget_ms} ms budget"),
            None,
        ),
        Error::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            "cancelled",
            "request cancelled".to_string(),
            None,
        ),
        other => {
            error!(error = %other, "internal planning failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal server error".to_string(),
                None,
            )
        }
    };

    let mut body = serde_json::json!({ "error": { "kind": kind, "message": message } });
    if let Some(hint) = hint {
        body["error"]["hint"] = serde_json::Value::String(hint);
    }
    (status, Json(body)).into_response()
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install shutdown signal handler");
        return;
    }
    info!("shutdown signal received");
}
