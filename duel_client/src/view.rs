//! Latest-view tracking.
//!
//! The server replies with at most one view per report and datagrams
//! may be dropped, so the client renders from the newest view it has
//! and carries it across misses.

use duel_shared::net::OpponentView;

/// Retains the most recent opponent view.
#[derive(Debug, Default)]
pub struct ViewTracker {
    latest: Option<OpponentView>,
    received: u64,
}

impl ViewTracker {
    pub fn push(&mut self, view: OpponentView) {
        self.latest = Some(view);
        self.received += 1;
    }

    /// The newest view, possibly stale.
    pub fn latest(&self) -> Option<&OpponentView> {
        self.latest.as_ref()
    }

    /// Total views received since connect.
    pub fn received(&self) -> u64 {
        self.received
    }
}
