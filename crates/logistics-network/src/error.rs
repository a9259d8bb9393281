//! Error types for the `logistics-network` crate.
//!
//! Distribution itself never fails. Only operator-facing request handling
//! returns [`NetworkError`].

use logistics_types::{ParticipantId, ResourceName};

/// Errors raised when the request surface is misused.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// No requester has been selected.
    #[error("no requesting participant is selected")]
    NoRequester,

    /// The participant is not present in the fleet.
    #[error("participant not found: {0}")]
    UnknownParticipant(ParticipantId),

    /// The requester is plugged into the network and may not withdraw from it.
    #[error("participant {0} is plugged into the network and cannot request")]
    RequestNotAllowed(ParticipantId),

    /// A requested amount was negative, NaN, or infinite.
    #[error("invalid request of {amount} {resource}")]
    InvalidAmount {
        /// The resource the request was for.
        resource: ResourceName,
        /// The rejected amount.
        amount: f64,
    },
}
