//! Core entity structs: resource names, containers, participants, and the
//! fleet that owns them.
//!
//! The core never creates or destroys containers. It reads the flags below to
//! decide eligibility and writes only [`Container::amount`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{FlowMode, LogisticsLink, PartState, Situation, TransferMode};
use crate::ids::{ContainerId, ParticipantId};

// ---------------------------------------------------------------------------
// Resource name
// ---------------------------------------------------------------------------

/// Resource-type identifier (e.g. `"LiquidFuel"`, `"Water"`).
///
/// Resource types are defined by the host, so they are open-ended strings
/// rather than a closed enum. Ordering is lexical, which keeps pools sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(transparent)]
pub struct ResourceName(pub String);

impl ResourceName {
    /// Create a resource name from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ResourceName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// A single storage unit holding one resource type.
///
/// At rest `0 <= amount <= max_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Container {
    /// Unique container id.
    pub id: ContainerId,
    /// The resource type stored.
    pub resource: ResourceName,
    /// Current quantity.
    pub amount: f64,
    /// Capacity.
    pub max_amount: f64,
    /// Whether the resource type supports transfer.
    pub transfer_mode: TransferMode,
    /// Allowed flow direction.
    pub flow_mode: FlowMode,
    /// Flow toggle set by the player on the part.
    pub flow_enabled: bool,
    /// State of the mounting part.
    pub part_state: PartState,
}

impl Container {
    /// Create an intact, pumpable container with flow enabled.
    pub fn new(resource: impl Into<ResourceName>, amount: f64, max_amount: f64) -> Self {
        Self {
            id: ContainerId::new(),
            resource: resource.into(),
            amount,
            max_amount,
            transfer_mode: TransferMode::Pump,
            flow_mode: FlowMode::Both,
            flow_enabled: true,
            part_state: PartState::Operational,
        }
    }

    /// Whether this container may take part in network flow.
    ///
    /// Dead parts, non-transferable resources, and containers whose flow is
    /// switched off or set to `None` are excluded.
    pub fn can_flow(&self) -> bool {
        self.part_state == PartState::Operational
            && self.transfer_mode != TransferMode::None
            && self.flow_mode != FlowMode::None
            && self.flow_enabled
    }

    /// Unused capacity (`max_amount - amount`).
    pub const fn spare(&self) -> f64 {
        self.max_amount - self.amount
    }
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// An owner of containers that may join or leave the network (a vessel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Participant {
    /// Unique participant id.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Current physical situation.
    pub situation: Situation,
    /// Fitted logistics module, if any.
    pub link: LogisticsLink,
    /// Containers owned by this participant, in part order.
    pub containers: Vec<Container>,
}

impl Participant {
    /// Create a participant with no containers.
    pub fn new(name: impl Into<String>, situation: Situation, link: LogisticsLink) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.into(),
            situation,
            link,
            containers: Vec::new(),
        }
    }

    /// Builder-style helper that appends a container.
    #[must_use]
    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    /// Sum of `amount` over this participant's containers of `resource`.
    pub fn total_of(&self, resource: &ResourceName) -> f64 {
        self.containers
            .iter()
            .filter(|c| &c.resource == resource)
            .map(|c| c.amount)
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Fleet
// ---------------------------------------------------------------------------

/// Every participant currently loaded in the host scene, keyed by id.
///
/// The fleet is owned by the tick driver and lent to the network each tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    participants: BTreeMap<ParticipantId, Participant>,
}

impl Fleet {
    /// Create an empty fleet.
    pub const fn new() -> Self {
        Self {
            participants: BTreeMap::new(),
        }
    }

    /// Add a participant, returning its id. Replaces any participant with the
    /// same id.
    pub fn insert(&mut self, participant: Participant) -> ParticipantId {
        let id = participant.id;
        self.participants.insert(id, participant);
        id
    }

    /// Remove a participant (e.g. unloaded or destroyed).
    pub fn remove(&mut self, id: ParticipantId) -> Option<Participant> {
        self.participants.remove(&id)
    }

    /// Look up a participant.
    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    /// Look up a participant mutably.
    pub fn get_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(&id)
    }

    /// Iterate participants in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether the fleet is empty.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Sum of `amount` of `resource` across every container in the fleet.
    pub fn total_of(&self, resource: &ResourceName) -> f64 {
        self.iter().map(|p| p.total_of(resource)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn new_container_can_flow() {
        let c = Container::new("Water", 5.0, 10.0);
        assert!(c.can_flow());
        assert_eq!(c.spare(), 5.0);
    }

    #[test]
    fn flow_flags_exclude_container() {
        let mut c = Container::new("SolidFuel", 5.0, 10.0);
        c.transfer_mode = TransferMode::None;
        assert!(!c.can_flow());

        let mut c = Container::new("Water", 5.0, 10.0);
        c.flow_mode = FlowMode::None;
        assert!(!c.can_flow());

        let mut c = Container::new("Water", 5.0, 10.0);
        c.flow_enabled = false;
        assert!(!c.can_flow());

        let mut c = Container::new("Water", 5.0, 10.0);
        c.part_state = PartState::Dead;
        assert!(!c.can_flow());
    }

    #[test]
    fn fleet_totals_span_participants() {
        let mut fleet = Fleet::new();
        fleet.insert(
            Participant::new("Base", Situation::Landed, LogisticsLink::Absent)
                .with_container(Container::new("Water", 4.0, 10.0))
                .with_container(Container::new("Ore", 1.0, 10.0)),
        );
        fleet.insert(
            Participant::new("Rover", Situation::Landed, LogisticsLink::Plugged)
                .with_container(Container::new("Water", 6.0, 10.0)),
        );

        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet.total_of(&ResourceName::new("Water")), 10.0);
        assert_eq!(fleet.total_of(&ResourceName::new("Ore")), 1.0);
        assert_eq!(fleet.total_of(&ResourceName::new("Xenon")), 0.0);
    }

    #[test]
    fn resource_name_serializes_as_plain_string() {
        let json = serde_json::to_string(&ResourceName::new("Water")).ok();
        assert_eq!(json.as_deref(), Some("\"Water\""));
    }
}
