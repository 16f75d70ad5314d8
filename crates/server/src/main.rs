use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde_json::Value;
use shared::error::{ApiError, ErrorCode};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};
use url::Url;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

const UPSTREAM_FAILURE_MESSAGE: &str = "Error al procesar la solicitud";

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let backend_url = Url::parse(&settings.backend_url)
        .with_context(|| format!("invalid backend url '{}'", settings.backend_url))?;
    let http = Client::builder()
        .timeout(Duration::from_secs(settings.backend_timeout_secs))
        .build()
        .context("failed to build backend http client")?;

    let state = AppState { http, backend_url };
    let app = build_router(Arc::new(state), settings.body_limit_bytes);

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, backend = %settings.backend_url, "relay listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/simulate", post(simulate))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn upstream_failure() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new(ErrorCode::Upstream, UPSTREAM_FAILURE_MESSAGE)),
    )
}

/// Forwards the request document to the numerical service and returns its JSON verbatim.
async fn simulate(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Json<Value>> {
    let document: Value = serde_json::from_slice(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                ErrorCode::Validation,
                format!("request body is not valid JSON: {e}"),
            )),
        )
    })?;

    let mode = document
        .get("mode_op")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    info!(%mode, bytes = body.len(), "relaying simulation request");

    let forwarded = async {
        state
            .http
            .post(state.backend_url.clone())
            .json(&document)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    };

    match forwarded.await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!(error = %e, backend = %state.backend_url, "simulation backend request failed");
            Err(upstream_failure())
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
