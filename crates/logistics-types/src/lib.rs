//! Shared type definitions for the Simple Logistics resource network.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Snapshot types flow to `TypeScript` via `ts-rs` for the
//! presentation surface.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for participants and containers
//! - [`enums`] -- Situations, logistics links, and container flow flags
//! - [`structs`] -- Resource names, containers, participants, and the fleet
//! - [`snapshot`] -- Read-only network snapshots for display

pub mod enums;
pub mod ids;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{FlowMode, LogisticsLink, PartState, Situation, TransferMode};
pub use ids::{ContainerId, ParticipantId};
pub use snapshot::{NetworkSnapshot, ResourceTotals};
pub use structs::{Container, Fleet, Participant, ResourceName};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        use ts_rs::TS;

        let _ = crate::ids::ParticipantId::export_all();
        let _ = crate::ids::ContainerId::export_all();

        let _ = crate::enums::Situation::export_all();
        let _ = crate::enums::LogisticsLink::export_all();
        let _ = crate::enums::TransferMode::export_all();
        let _ = crate::enums::FlowMode::export_all();
        let _ = crate::enums::PartState::export_all();

        let _ = crate::structs::ResourceName::export_all();
        let _ = crate::structs::Container::export_all();
        let _ = crate::structs::Participant::export_all();

        let _ = crate::snapshot::NetworkSnapshot::export_all();
    }
}
