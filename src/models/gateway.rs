// Flow counter data and gateway configuration (GET /api/gateway/data, /api/gateway/config)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ConfigFormError;

/// Number of trigger ports on the gateway board.
pub const MAX_FLOW_COUNTERS: u8 = 12;
/// `portName` is a 16-byte C string on the device.
pub const MAX_PORT_NAME_LEN: usize = 15;
const MAX_SLAVE_ID: u8 = 247;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowCounterSet {
    /// Device `millis()` at the time the document was built.
    pub current_millis: u32,
    pub millis_rollover_count: u32,
    pub flow_counters: Vec<FlowCounterSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowCounterSnapshot {
    pub port: u8,
    pub slave_id: u8,
    pub name: String,
    pub enabled: bool,
    #[serde(rename = "comm_error")]
    pub has_comm_error: bool,
    pub trigger_count: u32,
    pub data_valid: bool,
    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub reading: Option<FlowReading>,
}

/// Registers read from one flow counter. Snapshot values only change on trigger
/// events; the `current_*` values are refreshed by periodic polling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowReading {
    pub unit_id: String,
    #[serde(rename = "volume")]
    pub volume_ml: f64,
    #[serde(rename = "volume_normalised")]
    pub volume_normalised_ml: f64,
    #[serde(rename = "flow")]
    pub flow_ml_per_min: f64,
    #[serde(rename = "flow_normalised")]
    pub flow_normalised_ml_per_min: f64,
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
    #[serde(rename = "pressure")]
    pub pressure_hpa: f64,
    pub psu_volts: f64,
    pub batt_volts: f64,
    #[serde(rename = "timestamp")]
    pub last_trigger_unix_time: u32,
    #[serde(rename = "last_update")]
    pub last_update_device_millis: u32,
    #[serde(rename = "current_temperature")]
    pub current_temperature_c: f64,
    #[serde(rename = "current_pressure")]
    pub current_pressure_kpa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rs485Settings {
    pub baud_rate: u32,
    pub serial_config: u32,
    pub response_timeout: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSettings {
    pub port: u8,
    #[serde(default)]
    pub enabled: bool,
    pub slave_id: u8,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub log_to_sd: bool,
}

impl PortSettings {
    pub fn validate(&self) -> Result<(), ConfigFormError> {
        if self.port == 0 || self.port > MAX_FLOW_COUNTERS {
            return Err(ConfigFormError::Port {
                port: self.port,
                max: MAX_FLOW_COUNTERS,
            });
        }
        if self.slave_id == 0 || self.slave_id > MAX_SLAVE_ID {
            return Err(ConfigFormError::SlaveId(self.slave_id));
        }
        let len = self.name.chars().count();
        if len > MAX_PORT_NAME_LEN {
            return Err(ConfigFormError::NameTooLong {
                len,
                max: MAX_PORT_NAME_LEN,
            });
        }
        Ok(())
    }
}

/// Validates a port settings submission as a whole.
pub fn validate_ports(ports: &[PortSettings]) -> Result<(), ConfigFormError> {
    let mut seen = HashSet::with_capacity(ports.len());
    for p in ports {
        p.validate()?;
        if !seen.insert(p.port) {
            return Err(ConfigFormError::DuplicatePort(p.port));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub rs485: Rs485Settings,
    #[serde(default)]
    pub ports: Vec<PortSettings>,
}

/// Body of the device's answer to a configuration POST.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeviceReply {
    /// The firmware asks for a page reload when the change needs a restart.
    pub fn requires_restart(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|m| m.contains("restart"))
    }
}
