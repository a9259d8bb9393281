//! Enumeration types for the logistics network.
//!
//! These mirror the host environment's notion of where a vessel is and how a
//! container's contents may flow. The core only reads them; the host keeps
//! them current.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Participant state
// ---------------------------------------------------------------------------

/// Physical situation of a participant (vessel).
///
/// Only some situations allow a vessel to join the network. Which ones is
/// decided by the membership policy, not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    /// Sitting on the launch pad before launch.
    Prelaunch,
    /// Resting on solid ground.
    Landed,
    /// Floating on water.
    Splashed,
    /// In atmospheric flight.
    Flying,
    /// On a suborbital trajectory.
    SubOrbital,
    /// In a stable orbit.
    Orbiting,
    /// On an escape trajectory.
    Escaping,
    /// Docked to another vessel.
    Docked,
}

/// The logistics module fitted to a participant, if any.
///
/// A participant with no module is not switchable and shares whenever its
/// situation allows. A participant with a module shares only while plugged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum LogisticsLink {
    /// No logistics module is fitted.
    #[default]
    Absent,
    /// A module is fitted and plugged into the network.
    Plugged,
    /// A module is fitted but unplugged.
    Unplugged,
}

impl LogisticsLink {
    /// Whether this link lets the participant share with the network.
    pub const fn shares(self) -> bool {
        matches!(self, Self::Absent | Self::Plugged)
    }
}

// ---------------------------------------------------------------------------
// Container flow flags
// ---------------------------------------------------------------------------

/// Whether a resource type may be moved between containers at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// The resource cannot be transferred (e.g. solid fuel).
    None,
    /// The resource can be pumped between containers.
    #[default]
    Pump,
}

/// Direction a container's contents may flow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    /// No flow in either direction.
    None,
    /// Contents may only flow out.
    Out,
    /// Contents may only flow in.
    In,
    /// Contents may flow in both directions.
    #[default]
    Both,
}

/// Structural state of the part a container is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum PartState {
    /// The part is intact.
    #[default]
    Operational,
    /// The part has been destroyed; its containers are inert.
    Dead,
}
