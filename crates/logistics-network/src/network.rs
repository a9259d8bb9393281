//! The logistics network: per-tick redistribution and the request/transfer
//! coordinator.
//!
//! [`LogisticsNetwork`] is an explicit engine value owned by the tick
//! driver. Each call to [`LogisticsNetwork::tick`] runs:
//!
//! 1. **Registry** -- collect eligible containers from the fleet.
//! 2. **Aggregation** -- rebuild the resource pool from scratch.
//! 3. **Network pass** -- for every resource type, distribute the pool total
//!    (minus any amount granted to a pending request) across all eligible
//!    containers of that type.
//! 4. **Transfer pass** -- when a request is pending, re-aggregate the
//!    requester's own containers, add the granted amounts, and distribute
//!    again over those containers only. Then the request returns to idle.
//!
//! The network pass always runs before the transfer pass.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use logistics_types::{Fleet, LogisticsLink, NetworkSnapshot, ParticipantId, ResourceName};
use tracing::{debug, info, warn};

use crate::distribute::{apply_share, share_resource};
use crate::error::NetworkError;
use crate::pool::{self, Aggregation, ResourcePool};
use crate::registry::{self, Membership};
use crate::report::{TickReport, TransferReport};
use crate::request::{RequestPool, RequestState};

/// Tunables for the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkSettings {
    /// Only a requester whose logistics module is fitted and unplugged may
    /// place or commit requests.
    pub require_unplugged_requester: bool,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            require_unplugged_requester: true,
        }
    }
}

/// The shared resource network.
#[derive(Debug, Clone, Default)]
pub struct LogisticsNetwork {
    settings: NetworkSettings,
    requester: Option<ParticipantId>,
    requests: RequestPool,
    state: RequestState,
    pool: ResourcePool,
    spare_space: ResourcePool,
    last_members: Option<BTreeSet<ParticipantId>>,
}

impl LogisticsNetwork {
    /// Create a network with no requester.
    pub fn new(settings: NetworkSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Requester and request surface
    // -----------------------------------------------------------------------

    /// Switch the requesting participant (the host's active vessel).
    ///
    /// Clears outstanding requests, seeds a zero request for each resource
    /// type the new requester holds, and recomputes its spare space.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownParticipant`] if `requester` is not in
    /// the fleet. The previous requester is cleared in that case.
    pub fn set_requester(
        &mut self,
        fleet: &Fleet,
        requester: Option<ParticipantId>,
    ) -> Result<(), NetworkError> {
        self.requests.clear();
        self.spare_space.clear();
        self.state = RequestState::Idle;
        self.requester = None;

        let Some(id) = requester else {
            return Ok(());
        };
        let participant = fleet.get(id).ok_or(NetworkError::UnknownParticipant(id))?;

        let held: BTreeSet<&ResourceName> =
            participant.containers.iter().map(|c| &c.resource).collect();
        self.requests.seed(held);
        self.spare_space = pool::spare_space(fleet, id);
        self.requester = Some(id);
        debug!(requester = %id, "Requester selected");
        Ok(())
    }

    /// The current requester.
    pub const fn requester(&self) -> Option<ParticipantId> {
        self.requester
    }

    /// Whether the current requester may place requests.
    pub fn can_request(&self, fleet: &Fleet) -> bool {
        let Some(participant) = self.requester.and_then(|id| fleet.get(id)) else {
            return false;
        };
        !self.settings.require_unplugged_requester
            || participant.link == LogisticsLink::Unplugged
    }

    /// Set the requested amount for `resource`, clamped to
    /// `[0, min(spare_space, pool)]` as of the last tick. Returns the value
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no requester, the requester may not
    /// request, or `amount` is not finite.
    pub fn set_request(
        &mut self,
        fleet: &Fleet,
        resource: &ResourceName,
        amount: f64,
    ) -> Result<f64, NetworkError> {
        self.check_requester(fleet)?;
        let ceiling = self.request_ceiling(resource);
        self.requests.set_clamped(resource, amount, ceiling)
    }

    /// Request as much of `resource` as allowed. Returns the value stored.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no requester or it may not request.
    pub fn fill_request(
        &mut self,
        fleet: &Fleet,
        resource: &ResourceName,
    ) -> Result<f64, NetworkError> {
        let ceiling = self.request_ceiling(resource);
        self.set_request(fleet, resource, ceiling)
    }

    /// Withdraw the request for `resource`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no requester or it may not request.
    pub fn zero_request(
        &mut self,
        fleet: &Fleet,
        resource: &ResourceName,
    ) -> Result<(), NetworkError> {
        self.check_requester(fleet)?;
        self.requests.set(resource, 0.0)
    }

    /// Largest amount of `resource` that may currently be requested.
    pub fn request_ceiling(&self, resource: &ResourceName) -> f64 {
        self.spare_space
            .get_or_zero(resource)
            .min(self.pool.get_or_zero(resource))
            .max(0.0)
    }

    /// Commit the outstanding requests; they are serviced on the next tick.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no requester or it may not request.
    pub fn commit_request(&mut self, fleet: &Fleet) -> Result<(), NetworkError> {
        let id = self.check_requester(fleet)?;
        self.state = RequestState::Pending;
        info!(requester = %id, "Request committed");
        Ok(())
    }

    /// Whether a request is pending.
    pub const fn request_state(&self) -> RequestState {
        self.state
    }

    /// Outstanding requests.
    pub const fn requests(&self) -> &RequestPool {
        &self.requests
    }

    /// Network pool as aggregated on the last tick.
    pub const fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Requester spare space as of the last refresh.
    pub const fn spare_space(&self) -> &ResourcePool {
        &self.spare_space
    }

    /// Recompute the requester's spare space from the fleet.
    pub fn refresh_spare_space(&mut self, fleet: &Fleet) {
        self.spare_space = self
            .requester
            .map(|id| pool::spare_space(fleet, id))
            .unwrap_or_default();
    }

    fn check_requester(&self, fleet: &Fleet) -> Result<ParticipantId, NetworkError> {
        let id = self.requester.ok_or(NetworkError::NoRequester)?;
        if fleet.get(id).is_none() {
            return Err(NetworkError::UnknownParticipant(id));
        }
        if !self.can_request(fleet) {
            return Err(NetworkError::RequestNotAllowed(id));
        }
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run one tick of pooling and redistribution over `fleet`.
    pub fn tick(&mut self, tick: u64, fleet: &mut Fleet, membership: &Membership) -> TickReport {
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        let members = membership.members(fleet);
        report.members = members.len();
        report.requests_cancelled = self.check_membership(tick, members);

        let refs = registry::collect_eligible(fleet, membership);
        report.containers = refs.len();
        let aggregation = Aggregation::build(fleet, &refs);

        let grants = if self.state == RequestState::Pending {
            self.grants(fleet, &aggregation.pool)
        } else {
            BTreeMap::new()
        };

        for (resource, group) in &aggregation.groups {
            let pooled = aggregation.pool.get_or_zero(resource);
            let target = pooled - grants.get(resource).copied().unwrap_or(0.0);
            let capacities = Aggregation::capacities(fleet, group);
            let share = share_resource(&capacities, target);
            apply_share(fleet, group, &share);

            debug!(
                tick,
                resource = %resource,
                pooled,
                target,
                containers = group.len(),
                "Resource distributed"
            );
            if share.discarded > 0.0 {
                warn!(tick, resource = %resource, discarded = share.discarded, "Network overflow discarded");
                report.discarded.insert(resource.clone(), share.discarded);
            }
            report.distributed.insert(resource.clone(), target);
        }

        self.pool = aggregation.pool;

        if self.state == RequestState::Pending {
            report.transfer = Some(self.transfer(tick, fleet, grants));
            self.state = RequestState::Idle;
        }

        self.refresh_spare_space(fleet);
        report
    }

    /// Clear requests when the set of admitted participants changes, since
    /// container identities may no longer be valid. Returns whether anything
    /// outstanding was dropped.
    fn check_membership(&mut self, tick: u64, members: BTreeSet<ParticipantId>) -> bool {
        let changed = self
            .last_members
            .as_ref()
            .is_some_and(|previous| *previous != members);
        self.last_members = Some(members);
        if !changed {
            return false;
        }

        let outstanding =
            self.requests.has_outstanding() || self.state == RequestState::Pending;
        self.requests.reset();
        self.state = RequestState::Idle;
        if outstanding {
            warn!(tick, "Network membership changed, outstanding requests cancelled");
        }
        outstanding
    }

    /// Amount of each requested resource the pool can actually fund.
    ///
    /// A request is capped by the live pool (missing types count as zero) and
    /// granted nothing when the requester has no container to receive it.
    fn grants(&self, fleet: &Fleet, live: &ResourcePool) -> BTreeMap<ResourceName, f64> {
        let receivable: BTreeSet<ResourceName> = self
            .requester
            .map(|id| registry::collect_owned(fleet, id))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| r.resolve(fleet).map(|c| c.resource.clone()))
            .collect();

        let mut grants = BTreeMap::new();
        for (resource, requested) in self.requests.iter() {
            if requested <= 0.0 {
                continue;
            }
            if !receivable.contains(resource) {
                warn!(resource = %resource, requested, "Requester has no container for resource");
                continue;
            }
            let available = live.get_or_zero(resource);
            let granted = requested.min(available).max(0.0);
            if granted < requested {
                warn!(
                    resource = %resource,
                    requested,
                    available,
                    "Request cut back to live pool"
                );
            }
            grants.insert(resource.clone(), granted);
        }
        grants
    }

    /// Top up the requester's own containers with the granted amounts.
    fn transfer(
        &mut self,
        tick: u64,
        fleet: &mut Fleet,
        grants: BTreeMap<ResourceName, f64>,
    ) -> TransferReport {
        let mut report = TransferReport {
            requester: self.requester,
            ..TransferReport::default()
        };

        if let Some(id) = self.requester {
            let owned = registry::collect_owned(fleet, id);
            let local = Aggregation::build(fleet, &owned);

            for (resource, group) in &local.groups {
                let granted = grants.get(resource).copied().unwrap_or(0.0);
                let target = local.pool.get_or_zero(resource) + granted;
                let capacities = Aggregation::capacities(fleet, group);
                let share = share_resource(&capacities, target);
                apply_share(fleet, group, &share);

                if granted > 0.0 {
                    report.granted.insert(resource.clone(), granted);
                }
                if share.discarded > 0.0 {
                    warn!(tick, resource = %resource, discarded = share.discarded, "Requester overflow discarded");
                    report.discarded.insert(resource.clone(), share.discarded);
                }
            }

            info!(
                tick,
                requester = %id,
                resources = report.granted.len(),
                total = report.total_granted(),
                "Request serviced"
            );
        }

        self.requests.reset();
        report
    }

    // -----------------------------------------------------------------------
    // Presentation
    // -----------------------------------------------------------------------

    /// Read-only snapshot of the pools for display.
    pub fn snapshot(&self, tick: u64, fleet: &Fleet) -> NetworkSnapshot {
        NetworkSnapshot {
            tick,
            taken_at: Utc::now(),
            requester: self.requester,
            can_request: self.can_request(fleet),
            request_pending: self.state == RequestState::Pending,
            pool: self.pool.to_totals(),
            requests: self.requests.to_totals(),
            spare_space: self.spare_space.to_totals(),
        }
    }
}
