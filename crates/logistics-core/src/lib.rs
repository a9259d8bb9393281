//! Tick driver, configuration, and run loop for the Simple Logistics
//! network.
//!
//! This crate owns everything around the network core that a host would
//! otherwise provide: the tick counter, the membership policy, the source of
//! player requests, and the loop that runs them at a fixed interval.
//!
//! # Modules
//!
//! - [`clock`] -- Monotonic tick counter.
//! - [`config`] -- Configuration loading from `logistics-config.yaml` into
//!   strongly-typed structs.
//! - [`membership`] -- [`MembershipSource`] trait and the situation-based
//!   [`SituationPolicy`].
//! - [`operator`] -- Shared pause, stop, and speed controls.
//! - [`runner`] -- The bounded async run loop.
//! - [`source`] -- [`RequestSource`] trait with stub and scripted sources.
//! - [`tick`] -- One tick: requests, membership, network pass, snapshot.
//!
//! [`MembershipSource`]: membership::MembershipSource
//! [`SituationPolicy`]: membership::SituationPolicy
//! [`RequestSource`]: source::RequestSource

pub mod clock;
pub mod config;
pub mod membership;
pub mod operator;
pub mod runner;
pub mod source;
pub mod tick;
