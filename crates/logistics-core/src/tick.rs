//! Tick cycle: one fixed step of the logistics network.
//!
//! Each tick runs through these phases:
//!
//! 1. **Clock** -- advance the tick counter.
//! 2. **Requests** -- ask the [`RequestSource`] for the requester's wishes,
//!    using the snapshot from the end of the previous tick, and apply them
//!    to the network (set amounts, optionally commit).
//! 3. **Membership** -- build the membership table from the fleet via the
//!    [`MembershipSource`].
//! 4. **Network** -- run the pooling, redistribution, and transfer passes.
//! 5. **Snapshot** -- capture the post-tick pools for display.
//!
//! Rejected requests (no requester, requester plugged in) are logged and
//! skipped; they never fail the tick.

use logistics_network::{LogisticsNetwork, NetworkError, NetworkSettings, TickReport};
use logistics_types::{Fleet, NetworkSnapshot, ParticipantId};
use tracing::{debug, warn};

use crate::clock::{ClockError, TickClock};
use crate::config::SimulationConfig;
use crate::membership::{MembershipSource, SituationPolicy};
use crate::source::{RequestBatch, RequestSource, RequestSourceError};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The request source failed.
    #[error("request source error: {source}")]
    RequestSource {
        /// The underlying request source error.
        #[from]
        source: RequestSourceError,
    },
}

/// Everything the tick cycle mutates.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// The tick counter.
    pub clock: TickClock,
    /// All participants and their containers.
    pub fleet: Fleet,
    /// The shared network and request coordinator.
    pub network: LogisticsNetwork,
    /// Who may join the network.
    pub policy: SituationPolicy,
}

impl SimulationState {
    /// Create a state at tick 0 with no requester.
    pub fn new(fleet: Fleet, settings: NetworkSettings, policy: SituationPolicy) -> Self {
        Self {
            clock: TickClock::new(),
            fleet,
            network: LogisticsNetwork::new(settings),
            policy,
        }
    }

    /// Create a state using the `network` config section.
    pub fn from_config(fleet: Fleet, config: &SimulationConfig) -> Self {
        let settings = NetworkSettings {
            require_unplugged_requester: config.network.require_unplugged_requester,
        };
        Self::new(fleet, settings, SituationPolicy::from_config(&config.network))
    }

    /// Switch the requester (the host's active vessel changed).
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownParticipant`] if the id is not in the
    /// fleet.
    pub fn set_requester(&mut self, requester: Option<ParticipantId>) -> Result<(), NetworkError> {
        self.network.set_requester(&self.fleet, requester)
    }

    /// Snapshot of the network as of the current tick.
    pub fn snapshot(&self) -> NetworkSnapshot {
        self.network.snapshot(self.clock.tick(), &self.fleet)
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick that was executed.
    pub tick: u64,
    /// Participants in the fleet.
    pub participants: usize,
    /// Request operations rejected by the network this tick.
    pub requests_rejected: usize,
    /// What the network pass did.
    pub report: TickReport,
    /// Pools after the tick.
    pub snapshot: NetworkSnapshot,
}

/// Execute a single tick.
///
/// # Errors
///
/// Returns [`TickError`] if the clock overflows or the request source fails.
pub fn run_tick(
    state: &mut SimulationState,
    requests: &mut dyn RequestSource,
) -> Result<TickSummary, TickError> {
    let before = state.snapshot();
    let tick = state.clock.advance()?;

    // --- Requests ---
    let requests_rejected = match requests.collect_requests(tick, &before)? {
        Some(batch) if !batch.is_empty() => apply_requests(state, tick, &batch),
        _ => 0,
    };

    // --- Membership ---
    let membership = state.policy.membership(tick, &state.fleet);

    // --- Network ---
    let report = state.network.tick(tick, &mut state.fleet, &membership);
    let snapshot = state.network.snapshot(tick, &state.fleet);

    debug!(
        tick,
        members = report.members,
        containers = report.containers,
        resources = report.distributed.len(),
        transfer = report.transfer.is_some(),
        "Tick complete"
    );

    Ok(TickSummary {
        tick,
        participants: state.fleet.len(),
        requests_rejected,
        report,
        snapshot,
    })
}

/// Apply a batch to the network. Returns the number of rejected operations.
fn apply_requests(state: &mut SimulationState, tick: u64, batch: &RequestBatch) -> usize {
    let mut rejected: usize = 0;
    for (resource, &amount) in &batch.amounts {
        match state.network.set_request(&state.fleet, resource, amount) {
            Ok(stored) => {
                if stored < amount {
                    debug!(tick, resource = %resource, amount, stored, "Request clamped");
                }
            }
            Err(e) => {
                warn!(tick, resource = %resource, amount, error = %e, "Request rejected");
                rejected = rejected.saturating_add(1);
            }
        }
    }

    let committed = if batch.commit {
        state.network.commit_request(&state.fleet)
    } else {
        Ok(())
    };
    if let Err(e) = committed {
        warn!(tick, error = %e, "Commit rejected");
        rejected = rejected.saturating_add(1);
    }
    rejected
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::collections::BTreeMap;

    use logistics_types::{Container, LogisticsLink, Participant, ResourceName, Situation};

    use super::*;
    use crate::source::{ScriptedRequestSource, StubRequestSource};

    fn water() -> ResourceName {
        ResourceName::new("Water")
    }

    fn depot_and_rover(link: LogisticsLink) -> (SimulationState, ParticipantId, ParticipantId) {
        let mut fleet = Fleet::new();
        let depot = fleet.insert(
            Participant::new("Depot", Situation::Landed, LogisticsLink::Absent)
                .with_container(Container::new("Water", 30.0, 100.0)),
        );
        let rover = fleet.insert(
            Participant::new("Rover", Situation::Landed, link)
                .with_container(Container::new("Water", 0.0, 20.0)),
        );
        let mut state = SimulationState::from_config(fleet, &SimulationConfig::default());
        state.set_requester(Some(rover)).unwrap();
        (state, depot, rover)
    }

    fn water_request(at_tick: u64, amount: f64) -> ScriptedRequestSource {
        let mut source = ScriptedRequestSource::new();
        source.schedule(
            at_tick,
            RequestBatch {
                amounts: BTreeMap::from([(water(), amount)]),
                commit: true,
            },
        );
        source
    }

    #[test]
    fn tick_advances_clock_and_reports() {
        let (mut state, _, _) = depot_and_rover(LogisticsLink::Unplugged);
        let summary = run_tick(&mut state, &mut StubRequestSource::new()).unwrap();

        assert_eq!(summary.tick, 1);
        assert_eq!(state.clock.tick(), 1);
        assert_eq!(summary.participants, 2);
        assert_eq!(summary.report.members, 1);
        assert_eq!(summary.snapshot.pool.get(&water()), Some(&30.0));
        assert!(summary.report.transfer.is_none());
    }

    #[test]
    fn scripted_request_moves_resources() {
        let (mut state, depot, rover) = depot_and_rover(LogisticsLink::Unplugged);
        let mut source = water_request(2, 15.0);

        run_tick(&mut state, &mut source).unwrap();
        let summary = run_tick(&mut state, &mut source).unwrap();

        assert_eq!(summary.requests_rejected, 0);
        let transfer = summary.report.transfer.unwrap();
        assert_eq!(transfer.granted.get(&water()), Some(&15.0));
        assert_eq!(state.fleet.get(depot).unwrap().total_of(&water()), 15.0);
        assert_eq!(state.fleet.get(rover).unwrap().total_of(&water()), 15.0);
        assert!(!summary.snapshot.request_pending);
    }

    #[test]
    fn request_before_first_tick_is_clamped_to_zero() {
        let (mut state, depot, rover) = depot_and_rover(LogisticsLink::Unplugged);
        let mut source = water_request(1, 15.0);

        let summary = run_tick(&mut state, &mut source).unwrap();

        assert_eq!(summary.requests_rejected, 0);
        assert_eq!(state.fleet.get(depot).unwrap().total_of(&water()), 30.0);
        assert_eq!(state.fleet.get(rover).unwrap().total_of(&water()), 0.0);
    }

    #[test]
    fn plugged_requester_is_rejected_without_failing_tick() {
        let (mut state, depot, _) = depot_and_rover(LogisticsLink::Plugged);
        let mut source = water_request(2, 15.0);

        run_tick(&mut state, &mut source).unwrap();
        let summary = run_tick(&mut state, &mut source).unwrap();

        // One set and one commit rejected.
        assert_eq!(summary.requests_rejected, 2);
        assert!(summary.report.transfer.is_none());
        // Plugged rover joins the network: 30 water over 100 + 20 capacity.
        assert_eq!(state.fleet.get(depot).unwrap().total_of(&water()), 15.0);
        assert_eq!(summary.snapshot.pool.get(&water()), Some(&30.0));
    }

    #[test]
    fn missed_script_entry_fails_tick() {
        let (mut state, _, _) = depot_and_rover(LogisticsLink::Unplugged);
        state.clock = TickClock::starting_at(4);
        let mut source = water_request(2, 15.0);
        assert!(matches!(
            run_tick(&mut state, &mut source),
            Err(TickError::RequestSource { .. })
        ));
    }

    #[test]
    fn clock_overflow_fails_tick() {
        let (mut state, _, _) = depot_and_rover(LogisticsLink::Unplugged);
        state.clock = TickClock::starting_at(u64::MAX);
        assert!(matches!(
            run_tick(&mut state, &mut StubRequestSource::new()),
            Err(TickError::Clock { .. })
        ));
    }
}
