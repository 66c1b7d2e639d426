// Background status poller: fetch -> reconcile -> publish.
//
// One fetch at a time: the next tick is not awaited until the current fetch resolves,
// and late ticks are skipped rather than bunched up.

use crate::client::SnapshotSource;
use crate::models::RenderedState;
use crate::reconciler::{Applied, PollOutcome, StatusReconciler};
use crate::visibility::Visibility;
use std::sync::Arc;
use tokio::sync::{Notify, oneshot, watch};
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::Instrument;

/// Reference cadence of the browser dashboard.
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Source, output channel, lifecycle signals.
pub struct PollerDeps<S> {
    pub source: Arc<S>,
    /// Receives a fresh copy of the rendered state after each applied poll.
    pub state_tx: watch::Sender<RenderedState>,
    pub visibility: Arc<Visibility>,
    /// `notify_one` triggers an immediate poll.
    pub refresh: Arc<Notify>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

pub struct PollerConfig {
    pub interval_ms: u64,
    /// How often to log poller stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Running totals for the periodic stats line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    pub applied: u64,
    pub busy: u64,
    pub failed: u64,
    pub stale: u64,
}

impl PollStats {
    fn record(&mut self, applied: Applied) {
        match applied {
            Applied::Full => self.applied += 1,
            Applied::UptimeOnly => self.busy += 1,
            Applied::Unchanged => self.failed += 1,
            Applied::Stale => self.stale += 1,
        }
    }
}

pub fn spawn<S: SnapshotSource>(
    deps: PollerDeps<S>,
    config: PollerConfig,
) -> tokio::task::JoinHandle<()> {
    let PollerDeps {
        source,
        state_tx,
        visibility,
        refresh,
        mut shutdown_rx,
    } = deps;
    let PollerConfig {
        interval_ms,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut visible_rx = visibility.subscribe();
        let mut reconciler = StatusReconciler::with_state(state_tx.borrow().clone());
        let mut seq = reconciler.state().last_applied_seq.unwrap_or(0);
        let mut stats = PollStats::default();

        // First tick completes immediately: poll on start.
        let mut tick = interval(Duration::from_millis(interval_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if !*visible_rx.borrow_and_update() {
                tracing::debug!("dashboard hidden; polling suspended");
                tokio::select! {
                    changed = visible_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        // Poll right away on resume, then restart the cadence.
                        tick.reset_immediately();
                        continue;
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Poller shutting down");
                        break;
                    }
                }
            }

            tokio::select! {
                _ = tick.tick() => {}
                _ = refresh.notified() => {
                    tracing::debug!("manual refresh requested");
                    tick.reset();
                }
                changed = visible_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        viewers = visibility.viewer_count(),
                        polls_applied = stats.applied,
                        polls_busy = stats.busy,
                        polls_failed = stats.failed,
                        polls_stale = stats.stale,
                        "poller stats"
                    );
                    continue;
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Poller shutting down");
                    break;
                }
            }

            seq += 1;
            let outcome = match source.fetch_snapshot().await {
                Ok(snapshot) => PollOutcome::Fetched(snapshot),
                Err(e) => PollOutcome::Failed(e),
            };
            let applied = reconciler.apply(seq, outcome);
            stats.record(applied);
            if applied.changed_state() {
                state_tx.send_replace(reconciler.state().clone());
            }
        }
    }
    .instrument(tracing::debug_span!("poller", interval_ms)))
}
