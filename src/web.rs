//! Axum-based HTTP server exposing the rate list

use crate::error::{Result, TempoError};
use crate::tempo::{RateInterval, RateService};
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub rates: Arc<RateService>,
}

impl AppState {
    pub fn new(rates: RateService) -> Self {
        Self {
            rates: Arc::new(rates),
        }
    }
}

/// Health check, independent of upstream state
pub async fn ping() -> impl IntoResponse {
    Json(serde_json::json!({"message": "pong"}))
}

/// Rates for yesterday through tomorrow, sorted by start; empty when upstream fails
pub async fn prices(State(state): State<AppState>) -> Json<Vec<RateInterval>> {
    Json(state.rates.current_rates().await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/prices", get(prices))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let router = build_router(state);

    let logger = crate::logging::get_logger("web");
    logger.info(&format!(
        "Starting web server; requested host={}, port={}",
        host, port
    ));

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!(
                "Invalid host '{}'; falling back to 127.0.0.1",
                host
            ));
            ([127, 0, 0, 1], port).into()
        }
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TempoError::web(format!("failed to bind {}: {}", addr, e)))?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{}:{} (/ping, /prices)",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router)
        .await
        .map_err(|e| TempoError::web(format!("server stopped: {}", e)))
}
