// Fake gateway device served on a loopback port

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct FakeDevice {
    pub busy: Arc<AtomicBool>,
    /// Non-zero: status endpoint answers with this HTTP status.
    pub status_code: Arc<AtomicU16>,
    pub data_fails: Arc<AtomicBool>,
    pub data_hits: Arc<AtomicUsize>,
    pub posted_configs: Arc<Mutex<Vec<Value>>>,
    pub manual_reads: Arc<Mutex<Vec<u8>>>,
}

pub fn status_doc() -> Value {
    json!({
        "ethernet": {"connected": true, "ip": "192.168.1.100", "dhcp": true},
        "uptime": 7260,
        "version": "1.4.0",
        "sd": {"inserted": true, "ready": true, "capacityGB": 7.4, "freeSpaceGB": 6.0},
        "modbus": {"hasError": false, "activeDevices": 1, "errorDevices": 0},
        "modbusTcp": {"port": 502, "connectedClients": 0, "clients": []}
    })
}

pub fn gateway_data_doc() -> Value {
    json!({
        "current_millis": 65000,
        "millis_rollover_count": 0,
        "flow_counters": [
            {"port": 1, "enabled": true, "slave_id": 5, "name": "Boiler", "data_valid": true,
             "comm_error": false, "trigger_count": 2,
             "data": {"volume": 10.0, "flow": 1.5, "timestamp": 1700000000, "unit_id": "FC-7",
                      "last_update": 5000}},
            {"port": 2, "enabled": false, "slave_id": 2, "name": "", "data_valid": false,
             "comm_error": false, "trigger_count": 0}
        ]
    })
}

pub fn gateway_config_doc() -> Value {
    json!({
        "rs485": {"baud_rate": 19200, "serial_config": 1074, "response_timeout": 500},
        "ports": [
            {"port": 1, "enabled": true, "slave_id": 5, "name": "Boiler", "log_to_sd": true},
            {"port": 2, "enabled": false, "slave_id": 2, "name": "", "log_to_sd": false}
        ]
    })
}

async fn status(State(device): State<FakeDevice>) -> impl IntoResponse {
    let code = device.status_code.load(Ordering::SeqCst);
    if code != 0 {
        let code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (code, Json(json!({"error": "unavailable"})));
    }
    if device.busy.load(Ordering::SeqCst) {
        return (StatusCode::OK, Json(json!({"uptime": 7262, "busy": true})));
    }
    (StatusCode::OK, Json(status_doc()))
}

async fn gateway_data(State(device): State<FakeDevice>) -> impl IntoResponse {
    device.data_hits.fetch_add(1, Ordering::SeqCst);
    if device.data_fails.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "busy"})));
    }
    (StatusCode::OK, Json(gateway_data_doc()))
}

async fn gateway_config() -> Json<Value> {
    Json(gateway_config_doc())
}

async fn save_config(State(device): State<FakeDevice>, Json(body): Json<Value>) -> Json<Value> {
    let restart = body.get("rs485").is_some();
    device.posted_configs.lock().unwrap().push(body);
    if restart {
        Json(json!({"message": "RS485 configuration saved, device will restart"}))
    } else {
        Json(json!({"message": "Configuration saved"}))
    }
}

async fn manual_read(
    State(device): State<FakeDevice>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    match params.get("port").and_then(|p| p.parse::<u8>().ok()) {
        Some(port) => {
            device.manual_reads.lock().unwrap().push(port);
            (StatusCode::OK, Json(json!({"message": "Manual read triggered"})))
        }
        None => (StatusCode::BAD_REQUEST, Json(json!({"error": "Missing port"}))),
    }
}

/// Serves the fake device and returns its base URL.
pub async fn spawn(device: FakeDevice) -> String {
    let app = Router::new()
        .route("/api/system/status", get(status))
        .route("/api/gateway/data", get(gateway_data))
        .route("/api/gateway/config", get(gateway_config).post(save_config))
        .route("/api/gateway/manual-read", post(manual_read))
        .with_state(device);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a loopback port with nothing listening.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
