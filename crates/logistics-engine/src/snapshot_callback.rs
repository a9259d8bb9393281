//! Tick callback that logs the network state as the run progresses.
//!
//! Every tick gets a one-line summary at debug level. Every
//! `snapshot_interval_ticks` ticks, and on any tick that serviced a
//! transfer or discarded overflow, the full [`NetworkSnapshot`] is logged
//! as JSON at info level.
//!
//! [`NetworkSnapshot`]: logistics_types::NetworkSnapshot

use logistics_core::runner::TickCallback;
use logistics_core::tick::{SimulationState, TickSummary};
use tracing::{debug, info, warn};

/// Callback that reports network pools through `tracing`.
pub struct SnapshotLogger {
    interval: u64,
    transfers: u64,
}

impl SnapshotLogger {
    /// Create a logger emitting a full snapshot every `interval` ticks
    /// (0 = only on notable ticks).
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            transfers: 0,
        }
    }

    /// Transfers serviced so far.
    pub const fn transfers(&self) -> u64 {
        self.transfers
    }

    fn due(&self, summary: &TickSummary) -> bool {
        let periodic = self.interval > 0 && summary.tick.checked_rem(self.interval) == Some(0);
        periodic || summary.report.transfer.is_some() || !summary.report.discarded.is_empty()
    }
}

impl TickCallback for SnapshotLogger {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        debug!(
            tick = summary.tick,
            participants = summary.participants,
            members = summary.report.members,
            containers = summary.report.containers,
            requests_rejected = summary.requests_rejected,
            "Tick"
        );

        if let Some(transfer) = &summary.report.transfer {
            self.transfers = self.transfers.saturating_add(1);
            info!(
                tick = summary.tick,
                requester = ?transfer.requester,
                granted = ?transfer.granted,
                discarded = ?transfer.discarded,
                "Transfer serviced"
            );
        }

        if summary.report.requests_cancelled {
            info!(tick = summary.tick, "Requests cancelled by membership change");
        }

        if !self.due(summary) {
            return;
        }

        match serde_json::to_string(&summary.snapshot) {
            Ok(json) => info!(
                tick = summary.tick,
                fleet = state.fleet.len(),
                snapshot = %json,
                "Network snapshot"
            ),
            Err(e) => warn!(tick = summary.tick, error = %e, "Failed to serialize snapshot"),
        }
    }
}
