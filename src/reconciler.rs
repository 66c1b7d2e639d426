// Merges device snapshots into the rendered dashboard state.
//
// Policy per poll:
// - fetch failed: state untouched
// - busy: only uptime is taken from the snapshot
// - normal: each block present in the snapshot replaces its field, absent blocks keep
//   their previous value

use crate::clock;
use crate::error::FetchError;
use crate::models::*;

/// Result of one poll as seen by the reconciler.
#[derive(Debug)]
pub enum PollOutcome {
    Fetched(StatusSnapshot),
    Failed(FetchError),
}

/// What [`StatusReconciler::apply`] did with a poll result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Older than a poll already seen; dropped.
    Stale,
    /// Fetch failed; nothing changed.
    Unchanged,
    /// Device was busy; uptime refreshed.
    UptimeOnly,
    Full,
}

impl Applied {
    pub fn changed_state(self) -> bool {
        matches!(self, Applied::UptimeOnly | Applied::Full)
    }
}

#[derive(Debug, Default)]
pub struct StatusReconciler {
    state: RenderedState,
    newest_seen: Option<u64>,
}

impl StatusReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes from a previously rendered state.
    pub fn with_state(state: RenderedState) -> Self {
        let newest_seen = state.last_applied_seq;
        Self { state, newest_seen }
    }

    pub fn state(&self) -> &RenderedState {
        &self.state
    }

    /// Applies the result of poll number `seq`.
    ///
    /// Results must carry strictly increasing sequence numbers; anything not newer
    /// than the newest result seen so far (failed ones included) is discarded.
    pub fn apply(&mut self, seq: u64, outcome: PollOutcome) -> Applied {
        if self.newest_seen.is_some_and(|newest| seq <= newest) {
            tracing::debug!(seq, newest = ?self.newest_seen, "discarding stale poll result");
            return Applied::Stale;
        }
        self.newest_seen = Some(seq);

        match outcome {
            PollOutcome::Failed(e) => {
                tracing::warn!(
                    error = %e,
                    seq,
                    operation = "fetch_snapshot",
                    "status poll failed; keeping previous dashboard state"
                );
                Applied::Unchanged
            }
            PollOutcome::Fetched(snapshot) => {
                let applied = self.reconcile(snapshot);
                self.state.last_applied_seq = Some(seq);
                applied
            }
        }
    }

    /// Merges one snapshot, ignoring sequencing.
    pub fn reconcile(&mut self, snapshot: StatusSnapshot) -> Applied {
        let state = &mut self.state;
        state.uptime = Some(render_uptime(snapshot.uptime_seconds));

        if snapshot.busy {
            tracing::debug!(
                uptime_secs = snapshot.uptime_seconds,
                "device busy; only uptime updated"
            );
            return Applied::UptimeOnly;
        }

        if let Some(version) = snapshot.version {
            state.version = Some(version);
        }
        if let Some(ethernet) = &snapshot.ethernet {
            state.ethernet = Some(render_ethernet(ethernet));
        }
        if let Some(storage) = &snapshot.storage {
            state.storage = Some(render_storage(storage));
        }
        if let Some(bus) = &snapshot.serial_bus {
            state.serial_bus = Some(render_serial_bus(bus));
        }
        if let Some(tcp) = snapshot.tcp_gateway {
            state.tcp_gateway = Some(TcpGatewayView {
                port: tcp.port,
                connected_clients: tcp.connected_client_count,
                clients: tcp.client_addresses,
            });
        }
        if let Some(set) = snapshot.flow_counters {
            state.flow_counters = Some(render_flow_counters(set));
        }
        Applied::Full
    }
}

/// Status dot for a flow counter: comm errors win, then "has produced valid data".
pub fn classify(counter: &FlowCounterSnapshot) -> CounterStatus {
    if counter.has_comm_error {
        CounterStatus::Error
    } else if counter.trigger_count > 0 && counter.data_valid {
        CounterStatus::Ok
    } else {
        CounterStatus::Unknown
    }
}

fn render_uptime(seconds: u32) -> UptimeView {
    UptimeView {
        seconds,
        text: clock::format_uptime(seconds),
    }
}

fn render_ethernet(eth: &EthernetStatus) -> EthernetView {
    if eth.connected {
        let label = if eth.uses_dhcp { "DHCP" } else { "Static" };
        EthernetView {
            connected: true,
            badge: Badge::new(label, BadgeTone::Success),
            ip: eth.ip_address.clone().unwrap_or_else(|| "--".to_string()),
        }
    } else {
        EthernetView {
            connected: false,
            badge: Badge::new("Disconnected", BadgeTone::Error),
            ip: "--".to_string(),
        }
    }
}

fn render_storage(sd: &StorageStatus) -> StorageView {
    let (badge, size) = if sd.ready {
        let label = if sd.inserted { "Inserted" } else { "Not Inserted" };
        (
            Badge::new(label, BadgeTone::Success),
            format!(
                "{:.1} GB ({:.1} GB free)",
                sd.capacity_gb, sd.free_space_gb
            ),
        )
    } else if sd.inserted {
        (Badge::new("Error", BadgeTone::Error), "--".to_string())
    } else {
        (Badge::new("Not Inserted", BadgeTone::Info), "--".to_string())
    };
    StorageView {
        ready: sd.ready,
        inserted: sd.inserted,
        badge,
        size,
    }
}

fn render_serial_bus(bus: &SerialBusStatus) -> SerialBusView {
    let badge = if bus.has_error {
        Badge::new("Comm Error", BadgeTone::Error)
    } else if bus.active_device_count > 0 {
        Badge::new("OK", BadgeTone::Success)
    } else {
        Badge::new("No Devices", BadgeTone::Info)
    };
    let devices = if bus.error_device_count > 0 {
        format!(
            "{} ({} errors)",
            bus.active_device_count, bus.error_device_count
        )
    } else {
        bus.active_device_count.to_string()
    };
    SerialBusView { badge, devices }
}

fn render_flow_counters(set: FlowCounterSet) -> FlowCounterPanel {
    if set.flow_counters.is_empty() {
        return FlowCounterPanel::NotConfigured;
    }
    let current_millis = set.current_millis;
    let counters: Vec<FlowCounterView> = set
        .flow_counters
        .into_iter()
        .filter(|fc| fc.enabled)
        .map(|fc| render_counter(fc, current_millis))
        .collect();
    if counters.is_empty() {
        FlowCounterPanel::NoneEnabled
    } else {
        FlowCounterPanel::Counters { counters }
    }
}

fn render_counter(fc: FlowCounterSnapshot, current_millis: u32) -> FlowCounterView {
    let status = classify(&fc);
    let reading = match fc.reading {
        Some(values) if fc.data_valid => Some(FlowReadingView {
            last_trigger: clock::format_device_timestamp(values.last_trigger_unix_time),
            last_read: clock::format_time_since(values.last_update_device_millis, current_millis),
            values,
        }),
        _ => None,
    };
    FlowCounterView {
        port: fc.port,
        slave_id: fc.slave_id,
        name: fc.name,
        status,
        trigger_count: fc.trigger_count,
        reading,
    }
}
