// Reconciliation policy tests: failures, busy device, partial snapshots, counter filtering

mod common;

use common::{busy_snapshot, counter, full_snapshot};
use gatewatch::error::FetchError;
use gatewatch::models::*;
use gatewatch::reconciler::{Applied, PollOutcome, StatusReconciler, classify};

fn failed() -> PollOutcome {
    PollOutcome::Failed(FetchError::Status {
        path: "/api/system/status",
        status: 500,
    })
}

fn reconciled(snapshot: StatusSnapshot) -> StatusReconciler {
    let mut r = StatusReconciler::new();
    assert_eq!(r.apply(1, PollOutcome::Fetched(snapshot)), Applied::Full);
    r
}

#[test]
fn test_full_snapshot_renders_every_field() {
    let r = reconciled(full_snapshot(3720));
    let state = r.state();
    assert_eq!(state.uptime.as_ref().unwrap().text, "Uptime: 1h 2m");
    assert_eq!(state.version.as_deref(), Some("1.2.0"));
    let eth = state.ethernet.as_ref().unwrap();
    assert!(eth.connected);
    assert_eq!(eth.badge, Badge::new("DHCP", BadgeTone::Success));
    assert_eq!(eth.ip, "192.168.1.100");
    assert_eq!(state.storage.as_ref().unwrap().size, "15.9 GB (12.4 GB free)");
    assert_eq!(state.serial_bus.as_ref().unwrap().badge.label, "OK");
    let tcp = state.tcp_gateway.as_ref().unwrap();
    assert_eq!(tcp.port, 502);
    assert_eq!(tcp.clients, vec!["192.168.1.20:50123".to_string()]);
    assert_eq!(state.last_applied_seq, Some(1));
}

#[test]
fn test_fetch_failure_leaves_state_unchanged() {
    let mut r = reconciled(full_snapshot(100));
    let before = r.state().clone();
    assert_eq!(r.apply(2, failed()), Applied::Unchanged);
    assert_eq!(r.state(), &before);
}

#[test]
fn test_busy_only_updates_uptime() {
    let mut r = reconciled(full_snapshot(100));
    let before = r.state().clone();

    assert_eq!(r.apply(2, PollOutcome::Fetched(busy_snapshot(7200))), Applied::UptimeOnly);

    let after = r.state();
    assert!(after.ethernet.as_ref().unwrap().connected);
    assert_eq!(after.uptime.as_ref().unwrap().seconds, 7200);
    assert_eq!(after.uptime.as_ref().unwrap().text, "Uptime: 2h 0m");
    assert_eq!(after.ethernet, before.ethernet);
    assert_eq!(after.storage, before.storage);
    assert_eq!(after.serial_bus, before.serial_bus);
    assert_eq!(after.tcp_gateway, before.tcp_gateway);
    assert_eq!(after.flow_counters, before.flow_counters);
    assert_eq!(after.version, before.version);
}

#[test]
fn test_busy_ignores_blocks_even_if_present() {
    let mut r = reconciled(full_snapshot(100));
    let mut torn = full_snapshot(200);
    torn.busy = true;
    torn.ethernet = Some(EthernetStatus::default());
    r.apply(2, PollOutcome::Fetched(torn));
    assert!(r.state().ethernet.as_ref().unwrap().connected);
}

#[test]
fn test_missing_storage_block_keeps_previous_storage() {
    let mut r = reconciled(full_snapshot(100));
    let before = r.state().storage.clone();

    let mut partial = full_snapshot(102);
    partial.storage = None;
    partial.ethernet = Some(EthernetStatus {
        connected: false,
        ..Default::default()
    });
    assert_eq!(r.apply(2, PollOutcome::Fetched(partial)), Applied::Full);

    assert_eq!(r.state().storage, before);
    let eth = r.state().ethernet.as_ref().unwrap();
    assert_eq!(eth.badge, Badge::new("Disconnected", BadgeTone::Error));
    assert_eq!(eth.ip, "--");
}

#[test]
fn test_missing_flow_counters_keep_previous_panel() {
    let mut r = reconciled(full_snapshot(100));
    let before = r.state().flow_counters.clone();
    let mut partial = full_snapshot(102);
    partial.flow_counters = None;
    partial.version = None;
    r.apply(2, PollOutcome::Fetched(partial));
    assert_eq!(r.state().flow_counters, before);
    assert_eq!(r.state().version.as_deref(), Some("1.2.0"));
}

#[test]
fn test_disabled_counters_are_never_visible() {
    let r = reconciled(full_snapshot(100));
    let panel = r.state().flow_counters.as_ref().unwrap();
    let ports: Vec<u8> = panel.visible().iter().map(|c| c.port).collect();
    assert_eq!(ports, vec![1]);
}

#[test]
fn test_disabled_counter_with_error_is_still_hidden() {
    let mut broken = counter(5, false);
    broken.has_comm_error = true;
    let mut snapshot = full_snapshot(100);
    snapshot.flow_counters = Some(FlowCounterSet {
        current_millis: 1,
        millis_rollover_count: 0,
        flow_counters: vec![counter(1, true), broken],
    });
    let r = reconciled(snapshot);
    let panel = r.state().flow_counters.as_ref().unwrap();
    assert!(panel.visible().iter().all(|c| c.port != 5));
}

#[test]
fn test_counter_panel_empty_states() {
    let mut snapshot = full_snapshot(100);
    snapshot.flow_counters = Some(FlowCounterSet::default());
    let r = reconciled(snapshot);
    assert_eq!(r.state().flow_counters, Some(FlowCounterPanel::NotConfigured));

    let mut snapshot = full_snapshot(100);
    snapshot.flow_counters = Some(FlowCounterSet {
        flow_counters: vec![counter(1, false), counter(2, false)],
        ..Default::default()
    });
    let r = reconciled(snapshot);
    assert_eq!(r.state().flow_counters, Some(FlowCounterPanel::NoneEnabled));
    assert!(r.state().flow_counters.as_ref().unwrap().visible().is_empty());
}

#[test]
fn test_counter_view_formats_reading() {
    let r = reconciled(full_snapshot(100));
    let panel = r.state().flow_counters.as_ref().unwrap();
    let view = &panel.visible()[0];
    assert_eq!(view.status, CounterStatus::Ok);
    assert_eq!(view.name, "FC1");
    let reading = view.reading.as_ref().unwrap();
    // current_millis 120_000, last_update 30_000
    assert_eq!(reading.last_read, "1m 30s ago");
    assert_eq!(reading.last_trigger, "14/11/2023, 22:13:20");
    assert_eq!(reading.values.volume_ml, 125.5);
}

#[test]
fn test_counter_never_read_shows_never() {
    let mut fc = counter(1, true);
    if let Some(reading) = fc.reading.as_mut() {
        reading.last_update_device_millis = 0;
        reading.last_trigger_unix_time = 0;
    }
    let mut snapshot = full_snapshot(100);
    snapshot.flow_counters = Some(FlowCounterSet {
        current_millis: 5_000,
        millis_rollover_count: 0,
        flow_counters: vec![fc],
    });
    let r = reconciled(snapshot);
    let reading = r.state().flow_counters.as_ref().unwrap().visible()[0]
        .reading
        .clone()
        .unwrap();
    assert_eq!(reading.last_read, "Never");
    assert_eq!(reading.last_trigger, "N/A");
}

#[test]
fn test_classify() {
    let mut fc = counter(1, true);
    assert_eq!(classify(&fc), CounterStatus::Ok);

    fc.has_comm_error = true;
    assert_eq!(classify(&fc), CounterStatus::Error);

    fc.has_comm_error = false;
    fc.trigger_count = 0;
    assert_eq!(classify(&fc), CounterStatus::Unknown);

    fc.trigger_count = 4;
    fc.data_valid = false;
    assert_eq!(classify(&fc), CounterStatus::Unknown);
}

#[test]
fn test_stale_result_is_discarded() {
    let mut r = StatusReconciler::new();
    r.apply(2, PollOutcome::Fetched(full_snapshot(200)));
    let before = r.state().clone();

    assert_eq!(r.apply(1, PollOutcome::Fetched(busy_snapshot(100))), Applied::Stale);
    assert_eq!(r.apply(2, PollOutcome::Fetched(full_snapshot(300))), Applied::Stale);
    assert_eq!(r.state(), &before);
    assert_eq!(r.state().last_applied_seq, Some(2));
}

#[test]
fn test_failed_newer_poll_still_supersedes_older_results() {
    let mut r = StatusReconciler::new();
    r.apply(1, PollOutcome::Fetched(full_snapshot(100)));
    r.apply(3, failed());
    assert_eq!(r.apply(2, PollOutcome::Fetched(full_snapshot(150))), Applied::Stale);
    assert_eq!(r.state().last_applied_seq, Some(1));
    assert_eq!(r.apply(4, PollOutcome::Fetched(full_snapshot(160))), Applied::Full);
    assert_eq!(r.state().last_applied_seq, Some(4));
}

#[test]
fn test_with_state_resumes_sequence() {
    let prior = reconciled(full_snapshot(100)).state().clone();
    let mut r = StatusReconciler::with_state(prior);
    assert_eq!(r.apply(1, PollOutcome::Fetched(full_snapshot(1))), Applied::Stale);
    assert_eq!(r.apply(2, PollOutcome::Fetched(full_snapshot(2))), Applied::Full);
}
