//! Per-tick outcome of a network pass.

use std::collections::BTreeMap;

use logistics_types::{ParticipantId, ResourceName};
use serde::Serialize;

/// What one tick of the network did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// The tick that was executed.
    pub tick: u64,
    /// Number of participants admitted to the network.
    pub members: usize,
    /// Number of eligible containers.
    pub containers: usize,
    /// Target amount distributed across the network, per resource type.
    pub distributed: BTreeMap<ResourceName, f64>,
    /// Overflow that did not fit in the network, per resource type.
    pub discarded: BTreeMap<ResourceName, f64>,
    /// The transfer serviced this tick, if any.
    pub transfer: Option<TransferReport>,
    /// Whether outstanding requests were dropped because membership changed.
    pub requests_cancelled: bool,
}

/// A serviced request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferReport {
    /// The participant that received the resources.
    pub requester: Option<ParticipantId>,
    /// Amount actually taken from the network, per resource type.
    pub granted: BTreeMap<ResourceName, f64>,
    /// Granted amount that did not fit in the requester's containers.
    pub discarded: BTreeMap<ResourceName, f64>,
}

impl TransferReport {
    /// Total granted across all resource types.
    pub fn total_granted(&self) -> f64 {
        self.granted.values().sum()
    }
}
