// Gateway REST client

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::instrument;

use crate::codec::SerialLineConfig;
use crate::error::FetchError;
use crate::models::{
    DeviceReply, FlowCounterSet, GatewayConfig, PortSettings, Rs485Settings, StatusSnapshot,
};

pub const STATUS_PATH: &str = "/api/system/status";
pub const GATEWAY_DATA_PATH: &str = "/api/gateway/data";
pub const GATEWAY_CONFIG_PATH: &str = "/api/gateway/config";
pub const MANUAL_READ_PATH: &str = "/api/gateway/manual-read";

/// Anything that can produce one status snapshot per poll.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<StatusSnapshot, FetchError>> + Send;
}

#[derive(Serialize)]
struct ConfigUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    rs485: Option<&'a Rs485Settings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ports: Option<&'a [PortSettings]>,
}

pub struct DeviceClient {
    http: reqwest::Client,
    base_url: String,
}

impl DeviceClient {
    /// `request_timeout` bounds every request, connection included.
    pub fn new(base_url: &str, request_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        path: &'static str,
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path,
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { path, source })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { path, source })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, FetchError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| FetchError::Transport { path, source })?;
        Self::read_json(path, response).await
    }

    async fn post_config(&self, update: &ConfigUpdate<'_>) -> Result<DeviceReply, FetchError> {
        let path = GATEWAY_CONFIG_PATH;
        let response = self
            .http
            .post(self.url(path))
            .json(update)
            .send()
            .await
            .map_err(|source| FetchError::Transport { path, source })?;
        Self::read_json(path, response).await
    }

    #[instrument(skip(self), fields(repo = "device", operation = "fetch_status"))]
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, FetchError> {
        self.get_json(STATUS_PATH).await
    }

    #[instrument(skip(self), fields(repo = "device", operation = "fetch_flow_counters"))]
    pub async fn fetch_flow_counters(&self) -> Result<FlowCounterSet, FetchError> {
        self.get_json(GATEWAY_DATA_PATH).await
    }

    pub async fn fetch_gateway_config(&self) -> Result<GatewayConfig, FetchError> {
        self.get_json(GATEWAY_CONFIG_PATH).await
    }

    /// Loads the RS485 settings and decodes them for the line configuration form.
    pub async fn load_line_config(&self) -> Result<SerialLineConfig, FetchError> {
        let config = self.fetch_gateway_config().await?;
        Ok(SerialLineConfig::from_rs485(&config.rs485))
    }

    pub async fn save_rs485(&self, settings: &Rs485Settings) -> Result<DeviceReply, FetchError> {
        tracing::info!(
            baud_rate = settings.baud_rate,
            serial_config = settings.serial_config,
            response_timeout = settings.response_timeout,
            "submitting RS485 settings"
        );
        self.post_config(&ConfigUpdate {
            rs485: Some(settings),
            ports: None,
        })
        .await
    }

    pub async fn save_ports(&self, ports: &[PortSettings]) -> Result<DeviceReply, FetchError> {
        tracing::info!(ports = ports.len(), "submitting port settings");
        self.post_config(&ConfigUpdate {
            rs485: None,
            ports: Some(ports),
        })
        .await
    }

    /// Asks the gateway to read one flow counter now instead of waiting for a trigger.
    pub async fn manual_read(&self, port: u8) -> Result<(), FetchError> {
        let path = MANUAL_READ_PATH;
        let response = self
            .http
            .post(self.url(path))
            .query(&[("port", port)])
            .send()
            .await
            .map_err(|source| FetchError::Transport { path, source })?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                path,
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

impl SnapshotSource for DeviceClient {
    /// Status first; flow counters only when the device is not busy. A failed counter
    /// fetch leaves the counters absent so the previous ones stay on screen.
    async fn fetch_snapshot(&self) -> Result<StatusSnapshot, FetchError> {
        let mut snapshot = self.fetch_status().await?;
        if snapshot.busy {
            return Ok(snapshot);
        }
        match self.fetch_flow_counters().await {
            Ok(set) => snapshot.flow_counters = Some(set),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "fetch_flow_counters",
                    "flow counter data unavailable; keeping previous counters"
                );
            }
        }
        Ok(snapshot)
    }
}
