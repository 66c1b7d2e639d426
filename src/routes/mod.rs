// HTTP + WebSocket routes

mod error;
mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::{Notify, watch};
use tower_http::cors::{Any, CorsLayer};

use crate::client::DeviceClient;
use crate::config::AppConfig;
use crate::models::RenderedState;
use crate::visibility::Visibility;

pub use error::ApiError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) state_rx: watch::Receiver<RenderedState>,
    pub(crate) client: Arc<DeviceClient>,
    pub(crate) visibility: Arc<Visibility>,
    pub(crate) refresh: Arc<Notify>,
    pub(crate) config: AppConfig,
}

pub fn app(
    state_rx: watch::Receiver<RenderedState>,
    client: Arc<DeviceClient>,
    visibility: Arc<Visibility>,
    refresh: Arc<Notify>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        state_rx,
        client,
        visibility,
        refresh,
        config,
    };
    Router::new()
        .route("/", get(|| async { "gatewatch: gateway dashboard backend" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/state", get(http::state_handler)) // GET /api/state
        .route("/api/refresh", post(http::refresh_handler)) // POST /api/refresh
        .route(
            "/api/serial-config",
            get(http::get_serial_config).post(http::post_serial_config),
        ) // GET|POST /api/serial-config
        .route("/api/ports", get(http::get_ports).post(http::post_ports)) // GET|POST /api/ports
        .route(
            "/api/flow-counters/{port}/read",
            post(http::manual_read_handler),
        ) // POST /api/flow-counters/{port}/read
        .route("/ws/state", get(ws::ws_state)) // WS /ws/state
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
