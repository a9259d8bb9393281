//! Pool aggregation and spare-space accounting.
//!
//! The pool is rebuilt from scratch every tick: immediately after
//! [`Aggregation::build`], `pool[type]` equals the sum of `amount` over every
//! eligible container of that type. A type only gets an entry when at least
//! one eligible container holds it, so the distributor is never handed an
//! empty group.

use std::collections::BTreeMap;

use logistics_types::{Fleet, ParticipantId, ResourceName, ResourceTotals};

use crate::registry::{self, ContainerRef};

/// Per-resource totals: resource type to amount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePool {
    totals: BTreeMap<ResourceName, f64>,
}

impl ResourcePool {
    /// Create an empty pool.
    pub const fn new() -> Self {
        Self {
            totals: BTreeMap::new(),
        }
    }

    /// Add `amount` to the entry for `resource`, creating it if needed.
    pub fn add(&mut self, resource: &ResourceName, amount: f64) {
        if let Some(total) = self.totals.get_mut(resource) {
            *total += amount;
        } else {
            self.totals.insert(resource.clone(), amount);
        }
    }

    /// The total for `resource`, if the pool has an entry for it.
    pub fn get(&self, resource: &ResourceName) -> Option<f64> {
        self.totals.get(resource).copied()
    }

    /// The total for `resource`, or zero when absent.
    pub fn get_or_zero(&self, resource: &ResourceName) -> f64 {
        self.get(resource).unwrap_or(0.0)
    }

    /// Whether the pool has an entry for `resource`.
    pub fn contains(&self, resource: &ResourceName) -> bool {
        self.totals.contains_key(resource)
    }

    /// Iterate entries in resource-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceName, f64)> {
        self.totals.iter().map(|(k, v)| (k, *v))
    }

    /// Number of resource types.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether the pool has no entries.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.totals.clear();
    }

    /// Copy the totals out for display.
    pub fn to_totals(&self) -> ResourceTotals {
        self.totals.clone()
    }
}

/// The result of aggregating a container list: the pool plus the containers
/// grouped by resource type, in the same order they were collected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Resource type to summed amount.
    pub pool: ResourcePool,
    /// Resource type to the containers holding it.
    pub groups: BTreeMap<ResourceName, Vec<ContainerRef>>,
}

impl Aggregation {
    /// Group `refs` by resource type and sum their current amounts.
    ///
    /// Addresses that no longer resolve are skipped.
    pub fn build(fleet: &Fleet, refs: &[ContainerRef]) -> Self {
        let mut aggregation = Self::default();
        for &r in refs {
            let Some(container) = r.resolve(fleet) else {
                continue;
            };
            aggregation.pool.add(&container.resource, container.amount);
            aggregation
                .groups
                .entry(container.resource.clone())
                .or_default()
                .push(r);
        }
        aggregation
    }

    /// Capacities of the containers in `group`, in group order.
    pub fn capacities(fleet: &Fleet, group: &[ContainerRef]) -> Vec<f64> {
        group
            .iter()
            .map(|r| r.resolve(fleet).map_or(0.0, |c| c.max_amount))
            .collect()
    }
}

/// Unused capacity per resource type across one participant's own flowing
/// containers.
///
/// Advisory only: it bounds what may be requested, not what the distributor
/// assigns. An unknown participant yields an empty result.
pub fn spare_space(fleet: &Fleet, participant: ParticipantId) -> ResourcePool {
    let mut spare = ResourcePool::new();
    for r in registry::collect_owned(fleet, participant) {
        if let Some(container) = r.resolve(fleet) {
            spare.add(&container.resource, container.spare());
        }
    }
    spare
}
