//! Resource pooling and fair-share redistribution for the Simple Logistics
//! network.
//!
//! Every tick, the containers of all admitted participants are pooled per
//! resource type and the pool is spread back across them, filling small
//! containers first. One distinguished participant, the requester, may
//! withdraw part of the pool into its own containers.
//!
//! The crate is synchronous and single-threaded. It never creates or
//! destroys containers; it only rewrites their `amount`.
//!
//! # Modules
//!
//! - [`registry`] -- Membership table and eligible-container collection.
//! - [`pool`] -- Pool aggregation and requester spare-space accounting.
//! - [`distribute`] -- The fair-share (water-filling) distributor.
//! - [`request`] -- Request pool and request state.
//! - [`network`] -- [`LogisticsNetwork`]: the per-tick pass and the
//!   request/transfer coordinator.
//! - [`report`] -- Per-tick outcome reporting.
//! - [`error`] -- Request-surface errors.
//!
//! # Usage
//!
//! ```
//! use logistics_network::{LogisticsNetwork, Membership, MembershipEntry, NetworkSettings};
//! use logistics_types::{Container, Fleet, LogisticsLink, Participant, ResourceName, Situation};
//!
//! let mut fleet = Fleet::new();
//! let base = fleet.insert(
//!     Participant::new("Base", Situation::Landed, LogisticsLink::Absent)
//!         .with_container(Container::new("Water", 40.0, 50.0))
//!         .with_container(Container::new("Water", 0.0, 50.0)),
//! );
//!
//! let mut membership = Membership::new();
//! membership.set(base, MembershipEntry { situation_allowed: true, connected: true });
//!
//! let mut network = LogisticsNetwork::new(NetworkSettings::default());
//! let report = network.tick(1, &mut fleet, &membership);
//!
//! assert_eq!(report.containers, 2);
//! assert_eq!(network.pool().get(&ResourceName::new("Water")), Some(40.0));
//! ```

pub mod distribute;
pub mod error;
pub mod network;
pub mod pool;
pub mod registry;
pub mod report;
pub mod request;

// Re-export primary types at crate root.
pub use distribute::{Share, apply_share, share_resource};
pub use error::NetworkError;
pub use network::{LogisticsNetwork, NetworkSettings};
pub use pool::{Aggregation, ResourcePool, spare_space};
pub use registry::{ContainerRef, Membership, MembershipEntry};
pub use report::{TickReport, TransferReport};
pub use request::{RequestPool, RequestState};
