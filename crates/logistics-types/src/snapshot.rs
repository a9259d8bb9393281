//! Read-only snapshots handed to the presentation surface.
//!
//! The core exposes pool, request, and spare-space totals after every tick.
//! It does not format or render them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ParticipantId;
use crate::structs::ResourceName;

/// Per-resource totals as shown on screen.
pub type ResourceTotals = BTreeMap<ResourceName, f64>;

/// State of the network after a tick, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NetworkSnapshot {
    /// The tick this snapshot was taken at.
    pub tick: u64,
    /// Wall-clock time the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// The participant allowed to request, if any.
    pub requester: Option<ParticipantId>,
    /// Whether the requester may currently place requests.
    pub can_request: bool,
    /// Whether a committed request is waiting for the next tick.
    pub request_pending: bool,
    /// Network pool: resource type to total amount.
    pub pool: ResourceTotals,
    /// Outstanding requested amounts.
    pub requests: ResourceTotals,
    /// Unused capacity of the requester's own containers.
    pub spare_space: ResourceTotals,
}

impl NetworkSnapshot {
    /// Largest amount of `resource` the requester may ask for:
    /// `min(spare_space, pool)`, or zero when either side is missing.
    pub fn request_ceiling(&self, resource: &ResourceName) -> f64 {
        let spare = self.spare_space.get(resource).copied().unwrap_or(0.0);
        let pooled = self.pool.get(resource).copied().unwrap_or(0.0);
        spare.min(pooled).max(0.0)
    }
}
