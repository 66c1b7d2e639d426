// JSON handlers: state, refresh, serial line + port configuration, manual read

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use std::time::Duration;

use super::{ApiError, AppState};
use crate::codec::SerialLineConfig;
use crate::error::ConfigFormError;
use crate::models::{DeviceReply, MAX_FLOW_COUNTERS, PortSettings, RenderedState, validate_ports};
use crate::version::{NAME, VERSION};

/// Outcome of a configuration submit, as relayed to the page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    serial_config: Option<u32>,
    restart_required: bool,
}

impl SaveResponse {
    fn from_reply(reply: &DeviceReply, fallback: &str, serial_config: Option<u32>) -> Self {
        Self {
            message: reply.message.clone().unwrap_or_else(|| fallback.to_string()),
            serial_config,
            restart_required: reply.requires_restart(),
        }
    }
}

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/state: the last reconciled dashboard state.
pub(super) async fn state_handler(State(state): State<AppState>) -> Json<RenderedState> {
    Json(state.state_rx.borrow().clone())
}

/// POST /api/refresh: poll the device now instead of waiting for the next tick.
pub(super) async fn refresh_handler(State(state): State<AppState>) -> StatusCode {
    state.refresh.notify_one();
    StatusCode::ACCEPTED
}

/// GET /api/serial-config: device RS485 settings decoded for the form.
pub(super) async fn get_serial_config(
    State(state): State<AppState>,
) -> Result<Json<SerialLineConfig>, ApiError> {
    Ok(Json(state.client.load_line_config().await?))
}

/// POST /api/serial-config: encode the form and submit it to the device.
pub(super) async fn post_serial_config(
    State(state): State<AppState>,
    Json(config): Json<SerialLineConfig>,
) -> Result<Json<SaveResponse>, ApiError> {
    let settings = config.to_rs485()?;
    let reply = state.client.save_rs485(&settings).await?;
    Ok(Json(SaveResponse::from_reply(
        &reply,
        "RS485 configuration saved",
        Some(settings.serial_config),
    )))
}

/// GET /api/ports: per-port flow counter settings.
pub(super) async fn get_ports(
    State(state): State<AppState>,
) -> Result<Json<Vec<PortSettings>>, ApiError> {
    let config = state.client.fetch_gateway_config().await?;
    Ok(Json(config.ports))
}

/// POST /api/ports: validate and submit per-port settings.
pub(super) async fn post_ports(
    State(state): State<AppState>,
    Json(ports): Json<Vec<PortSettings>>,
) -> Result<Json<SaveResponse>, ApiError> {
    validate_ports(&ports)?;
    let reply = state.client.save_ports(&ports).await?;
    Ok(Json(SaveResponse::from_reply(
        &reply,
        "Port configuration saved",
        None,
    )))
}

/// POST /api/flow-counters/{port}/read: trigger a manual read, then refresh shortly after.
pub(super) async fn manual_read_handler(
    State(state): State<AppState>,
    Path(port): Path<u8>,
) -> Result<impl IntoResponse, ApiError> {
    if port == 0 || port > MAX_FLOW_COUNTERS {
        return Err(ConfigFormError::Port {
            port,
            max: MAX_FLOW_COUNTERS,
        }
        .into());
    }
    state.client.manual_read(port).await?;
    tracing::info!(port, "manual read triggered");

    let refresh = state.refresh.clone();
    let delay = Duration::from_millis(state.config.polling.manual_read_refresh_delay_ms);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        refresh.notify_one();
    });

    Ok(Json(serde_json::json!({
        "message": format!("Manual read triggered for Port {}", port),
    })))
}
