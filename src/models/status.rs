// GET /api/system/status payload

use serde::{Deserialize, Serialize};

use super::FlowCounterSet;

/// One poll cycle's worth of device data.
///
/// Every service block is optional: a busy device only sends `uptime` and `busy`,
/// and some firmware builds omit blocks entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    #[serde(default)]
    pub busy: bool,
    #[serde(default, rename = "uptime")]
    pub uptime_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet: Option<EthernetStatus>,
    #[serde(default, rename = "sd", skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageStatus>,
    #[serde(default, rename = "modbus", skip_serializing_if = "Option::is_none")]
    pub serial_bus: Option<SerialBusStatus>,
    #[serde(default, rename = "modbusTcp", skip_serializing_if = "Option::is_none")]
    pub tcp_gateway: Option<TcpGatewayStatus>,
    /// Filled from GET /api/gateway/data; the status document itself never has it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_counters: Option<FlowCounterSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthernetStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default, rename = "dhcp")]
    pub uses_dhcp: bool,
    /// Only sent while connected.
    #[serde(default, rename = "ip", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

/// SD card block. The device sends `{}` when the card is locked by a writer,
/// which deserializes as "not ready, not inserted".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageStatus {
    pub ready: bool,
    pub inserted: bool,
    #[serde(rename = "capacityGB")]
    pub capacity_gb: f64,
    #[serde(rename = "freeSpaceGB")]
    pub free_space_gb: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialBusStatus {
    #[serde(rename = "hasError")]
    pub has_error: bool,
    #[serde(rename = "activeDevices")]
    pub active_device_count: u32,
    #[serde(rename = "errorDevices")]
    pub error_device_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpGatewayStatus {
    pub port: u16,
    #[serde(rename = "connectedClients")]
    pub connected_client_count: u32,
    #[serde(rename = "clients")]
    pub client_addresses: Vec<String>,
}
