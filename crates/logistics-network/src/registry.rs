//! Container registry: which containers take part in the network this tick.
//!
//! A container is eligible when its owning participant is admitted by the
//! [`Membership`] table (allowed situation and network connection) and the
//! container itself can flow (see [`Container::can_flow`]).
//!
//! The registry hands out [`ContainerRef`] addresses rather than borrows so
//! that distribution can write back into the fleet afterwards. Addresses are
//! only valid for the tick they were collected in.
//!
//! [`Container::can_flow`]: logistics_types::Container::can_flow

use std::collections::{BTreeMap, BTreeSet};

use logistics_types::{Container, Fleet, ParticipantId};

/// Address of a container inside a [`Fleet`]: owner plus position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerRef {
    /// The owning participant.
    pub participant: ParticipantId,
    /// Index into the participant's container list.
    pub index: usize,
}

impl ContainerRef {
    /// Resolve the address to a container.
    pub fn resolve(self, fleet: &Fleet) -> Option<&Container> {
        fleet
            .get(self.participant)
            .and_then(|p| p.containers.get(self.index))
    }

    /// Resolve the address to a mutable container.
    pub fn resolve_mut(self, fleet: &mut Fleet) -> Option<&mut Container> {
        fleet
            .get_mut(self.participant)
            .and_then(|p| p.containers.get_mut(self.index))
    }
}

/// Membership facts for one participant, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MembershipEntry {
    /// The participant's physical situation allows sharing.
    pub situation_allowed: bool,
    /// The participant is connected to the network.
    pub connected: bool,
}

impl MembershipEntry {
    /// Whether the participant's containers join the network.
    pub const fn admitted(self) -> bool {
        self.situation_allowed && self.connected
    }
}

/// Explicit membership table: participant id to membership facts.
///
/// Built outside the core every tick. Participants missing from the table
/// are not admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    entries: BTreeMap<ParticipantId, MembershipEntry>,
}

impl Membership {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record membership facts for a participant.
    pub fn set(&mut self, participant: ParticipantId, entry: MembershipEntry) {
        self.entries.insert(participant, entry);
    }

    /// Look up the facts recorded for a participant.
    pub fn get(&self, participant: ParticipantId) -> Option<MembershipEntry> {
        self.entries.get(&participant).copied()
    }

    /// Whether the participant is admitted to the network.
    pub fn admits(&self, participant: ParticipantId) -> bool {
        self.get(participant).is_some_and(MembershipEntry::admitted)
    }

    /// Ids of admitted participants that are present in `fleet`.
    pub fn members(&self, fleet: &Fleet) -> BTreeSet<ParticipantId> {
        fleet
            .iter()
            .map(|p| p.id)
            .filter(|id| self.admits(*id))
            .collect()
    }
}

/// Collect every network-eligible container across the fleet.
pub fn collect_eligible(fleet: &Fleet, membership: &Membership) -> Vec<ContainerRef> {
    fleet
        .iter()
        .filter(|p| membership.admits(p.id))
        .flat_map(|p| flowing_containers(p.id, &p.containers))
        .collect()
}

/// Collect one participant's own flowing containers, regardless of
/// membership. Used for the requester-only transfer pass.
pub fn collect_owned(fleet: &Fleet, participant: ParticipantId) -> Vec<ContainerRef> {
    fleet
        .get(participant)
        .map(|p| flowing_containers(p.id, &p.containers).collect())
        .unwrap_or_default()
}

fn flowing_containers(
    participant: ParticipantId,
    containers: &[Container],
) -> impl Iterator<Item = ContainerRef> + '_ {
    containers
        .iter()
        .enumerate()
        .filter(|(_, c)| c.can_flow())
        .map(move |(index, _)| ContainerRef { participant, index })
}

#[cfg(test)]
mod tests {
    use logistics_types::{Container, LogisticsLink, Participant, PartState, Situation};

    use super::*;

    fn admitted() -> MembershipEntry {
        MembershipEntry {
            situation_allowed: true,
            connected: true,
        }
    }

    #[test]
    fn entry_requires_both_flags() {
        assert!(admitted().admitted());
        assert!(
            !MembershipEntry {
                situation_allowed: false,
                connected: true
            }
            .admitted()
        );
        assert!(
            !MembershipEntry {
                situation_allowed: true,
                connected: false
            }
            .admitted()
        );
    }

    #[test]
    fn missing_participant_is_not_admitted() {
        let membership = Membership::new();
        assert!(!membership.admits(ParticipantId::new()));
    }

    #[test]
    fn collects_only_admitted_flowing_containers() {
        let mut dead = Container::new("Water", 1.0, 10.0);
        dead.part_state = PartState::Dead;

        let mut fleet = Fleet::new();
        let base = fleet.insert(
            Participant::new("Base", Situation::Landed, LogisticsLink::Absent)
                .with_container(Container::new("Water", 1.0, 10.0))
                .with_container(dead)
                .with_container(Container::new("Ore", 2.0, 10.0)),
        );
        let flyer = fleet.insert(
            Participant::new("Flyer", Situation::Flying, LogisticsLink::Absent)
                .with_container(Container::new("Water", 3.0, 10.0)),
        );

        let mut membership = Membership::new();
        membership.set(base, admitted());
        membership.set(
            flyer,
            MembershipEntry {
                situation_allowed: false,
                connected: true,
            },
        );

        let refs = collect_eligible(&fleet, &membership);
        assert_eq!(
            refs,
            vec![
                ContainerRef {
                    participant: base,
                    index: 0
                },
                ContainerRef {
                    participant: base,
                    index: 2
                },
            ]
        );
        assert_eq!(membership.members(&fleet).len(), 1);
    }

    #[test]
    fn owned_ignores_membership() {
        let mut fleet = Fleet::new();
        let rover = fleet.insert(
            Participant::new("Rover", Situation::Landed, LogisticsLink::Unplugged)
                .with_container(Container::new("Water", 0.0, 5.0)),
        );
        let refs = collect_owned(&fleet, rover);
        assert_eq!(refs.len(), 1);
        assert!(collect_owned(&fleet, ParticipantId::new()).is_empty());
    }

    #[test]
    fn refs_resolve_into_fleet() {
        let mut fleet = Fleet::new();
        let rover = fleet.insert(
            Participant::new("Rover", Situation::Landed, LogisticsLink::Absent)
                .with_container(Container::new("Water", 2.0, 5.0)),
        );
        let r = ContainerRef {
            participant: rover,
            index: 0,
        };
        assert!(r.resolve(&fleet).is_some());
        if let Some(c) = r.resolve_mut(&mut fleet) {
            c.amount = 4.0;
        }
        assert_eq!(r.resolve(&fleet).map(|c| c.amount > 3.0), Some(true));
        let missing = ContainerRef {
            participant: rover,
            index: 9,
        };
        assert!(missing.resolve(&fleet).is_none());
    }
}
