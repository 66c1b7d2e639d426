// Rendered dashboard state: what the browser page draws

use serde::{Deserialize, Serialize};

use super::FlowReading;

/// Last known good value of every dashboard field.
///
/// Fields are independent: a field is `None` only until the first snapshot that
/// carries it, and is never cleared afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedState {
    pub uptime: Option<UptimeView>,
    pub version: Option<String>,
    pub ethernet: Option<EthernetView>,
    pub storage: Option<StorageView>,
    pub serial_bus: Option<SerialBusView>,
    pub tcp_gateway: Option<TcpGatewayView>,
    pub flow_counters: Option<FlowCounterPanel>,
    /// Sequence number of the newest poll whose data was applied.
    pub last_applied_seq: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

impl Badge {
    pub fn new(label: impl Into<String>, tone: BadgeTone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeView {
    pub seconds: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthernetView {
    pub connected: bool,
    pub badge: Badge,
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageView {
    pub ready: bool,
    pub inserted: bool,
    pub badge: Badge,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialBusView {
    pub badge: Badge,
    pub devices: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpGatewayView {
    pub port: u16,
    pub connected_clients: u32,
    pub clients: Vec<String>,
}

/// Health of one flow counter as shown by its status dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterStatus {
    Error,
    Ok,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FlowCounterPanel {
    /// The device reported no counters at all.
    NotConfigured,
    /// Counters exist but every one is disabled.
    NoneEnabled,
    /// Enabled counters only, in device order.
    Counters { counters: Vec<FlowCounterView> },
}

impl FlowCounterPanel {
    pub fn visible(&self) -> &[FlowCounterView] {
        match self {
            FlowCounterPanel::Counters { counters } => counters,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowCounterView {
    pub port: u8,
    pub slave_id: u8,
    pub name: String,
    pub status: CounterStatus,
    pub trigger_count: u32,
    /// Present when the counter has valid data.
    pub reading: Option<FlowReadingView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReadingView {
    pub values: FlowReading,
    pub last_trigger: String,
    pub last_read: String,
}
