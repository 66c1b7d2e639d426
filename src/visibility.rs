// Dashboard visibility: polling only runs while someone is watching.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

/// Tracks connected dashboard viewers and publishes whether polling should run.
///
/// With `pause_when_hidden = false` the dashboard counts as always visible.
pub struct Visibility {
    tx: watch::Sender<bool>,
    viewers: AtomicUsize,
    pause_when_hidden: bool,
}

impl Visibility {
    pub fn new(pause_when_hidden: bool) -> Arc<Self> {
        let (tx, _) = watch::channel(!pause_when_hidden);
        Arc::new(Self {
            tx,
            viewers: AtomicUsize::new(0),
            pause_when_hidden,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Whether the poller is currently allowed to run.
    pub fn is_visible(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn viewer_count(&self) -> usize {
        self.viewers.load(Ordering::Relaxed)
    }

    /// Registers a viewer until the returned guard is dropped.
    pub fn attach_viewer(self: &Arc<Self>) -> ViewerGuard {
        // Count and flag change under the channel's write lock.
        self.tx.send_if_modified(|visible| {
            self.viewers.fetch_add(1, Ordering::Relaxed);
            !std::mem::replace(visible, true)
        });
        ViewerGuard(self.clone())
    }

    fn detach_viewer(&self) {
        self.tx.send_if_modified(|visible| {
            let remaining = self.viewers.fetch_sub(1, Ordering::Relaxed) - 1;
            let next = remaining > 0 || !self.pause_when_hidden;
            std::mem::replace(visible, next) != next
        });
    }
}

/// Connect = +1 viewer, drop = -1.
pub struct ViewerGuard(Arc<Visibility>);

impl Drop for ViewerGuard {
    fn drop(&mut self) {
        self.0.detach_viewer();
    }
}
