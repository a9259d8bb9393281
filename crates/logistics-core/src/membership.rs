//! Building the per-tick membership table from the fleet.
//!
//! The network core never decides who is in the network; it is handed an
//! explicit [`Membership`] table each tick. A [`MembershipSource`] produces
//! that table. [`SituationPolicy`] is the standard rule: a participant is
//! admitted when its situation is in the allowed set and its logistics
//! module, if fitted, is plugged in.

use std::collections::BTreeSet;

use logistics_network::{Membership, MembershipEntry};
use logistics_types::{Fleet, Situation};

use crate::config::NetworkConfig;

/// Produces the membership table for a tick.
pub trait MembershipSource {
    /// Build the membership table for `tick` from the current fleet.
    fn membership(&self, tick: u64, fleet: &Fleet) -> Membership;
}

/// Admit participants by situation and logistics link state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SituationPolicy {
    allowed: BTreeSet<Situation>,
}

impl SituationPolicy {
    /// Create a policy admitting the given situations.
    pub fn new(allowed: impl IntoIterator<Item = Situation>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Create a policy from the `network` config section.
    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.allowed_situations.iter().copied())
    }

    /// Whether `situation` permits sharing.
    pub fn allows(&self, situation: Situation) -> bool {
        self.allowed.contains(&situation)
    }
}

impl Default for SituationPolicy {
    fn default() -> Self {
        Self::from_config(&NetworkConfig::default())
    }
}

impl MembershipSource for SituationPolicy {
    fn membership(&self, _tick: u64, fleet: &Fleet) -> Membership {
        let mut membership = Membership::new();
        for participant in fleet.iter() {
            membership.set(
                participant.id,
                MembershipEntry {
                    situation_allowed: self.allows(participant.situation),
                    connected: participant.link.shares(),
                },
            );
        }
        membership
    }
}
