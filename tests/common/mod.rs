// Shared test helpers
#![allow(dead_code)]

pub mod device;

use gatewatch::models::*;

pub fn busy_snapshot(uptime_seconds: u32) -> StatusSnapshot {
    StatusSnapshot {
        busy: true,
        uptime_seconds,
        ..Default::default()
    }
}

pub fn full_snapshot(uptime_seconds: u32) -> StatusSnapshot {
    StatusSnapshot {
        busy: false,
        uptime_seconds,
        version: Some("1.2.0".into()),
        ethernet: Some(EthernetStatus {
            connected: true,
            uses_dhcp: true,
            ip_address: Some("192.168.1.100".into()),
        }),
        storage: Some(StorageStatus {
            ready: true,
            inserted: true,
            capacity_gb: 15.9,
            free_space_gb: 12.4,
        }),
        serial_bus: Some(SerialBusStatus {
            has_error: false,
            active_device_count: 2,
            error_device_count: 0,
        }),
        tcp_gateway: Some(TcpGatewayStatus {
            port: 502,
            connected_client_count: 1,
            client_addresses: vec!["192.168.1.20:50123".into()],
        }),
        flow_counters: Some(FlowCounterSet {
            current_millis: 120_000,
            millis_rollover_count: 0,
            flow_counters: vec![counter(1, true), counter(2, false)],
        }),
    }
}

pub fn counter(port: u8, enabled: bool) -> FlowCounterSnapshot {
    FlowCounterSnapshot {
        port,
        slave_id: port,
        name: format!("FC{}", port),
        enabled,
        has_comm_error: false,
        trigger_count: 3,
        data_valid: true,
        reading: Some(FlowReading {
            unit_id: "FC-0001".into(),
            volume_ml: 125.5,
            last_trigger_unix_time: 1_700_000_000,
            last_update_device_millis: 30_000,
            ..Default::default()
        }),
    }
}
