//! Request source trait and its stub and scripted implementations.
//!
//! Before each network pass the tick driver asks a [`RequestSource`] whether
//! the requester wants anything. The answer is a [`RequestBatch`]: amounts
//! per resource type and whether to commit them immediately. In the host
//! this is the player working the request window; here it can be a test
//! stub or a script loaded from configuration.

use std::collections::BTreeMap;

use logistics_types::{NetworkSnapshot, ResourceName};

use crate::config::ScriptedRequestConfig;

/// Errors that can occur while collecting requests.
#[derive(Debug, thiserror::Error)]
pub enum RequestSourceError {
    /// A scripted batch was scheduled for a tick that has already run.
    #[error("scripted request for tick {at_tick} missed; clock is at tick {tick}")]
    Missed {
        /// The tick the batch was scheduled for.
        at_tick: u64,
        /// The tick being collected.
        tick: u64,
    },
}

/// Amounts the requester asks for on one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBatch {
    /// Requested amount per resource type. Values are clamped by the network.
    pub amounts: BTreeMap<ResourceName, f64>,
    /// Commit the request so the coming tick services it.
    pub commit: bool,
}

impl RequestBatch {
    /// Whether the batch neither sets nor commits anything.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty() && !self.commit
    }
}

/// A source of resource requests.
///
/// The tick driver calls [`collect_requests`] once per tick, before the
/// network pass, with the snapshot taken at the end of the previous tick.
///
/// [`collect_requests`]: RequestSource::collect_requests
pub trait RequestSource {
    /// Collect the request for `tick`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RequestSourceError`] if the source fails entirely.
    fn collect_requests(
        &mut self,
        tick: u64,
        snapshot: &NetworkSnapshot,
    ) -> Result<Option<RequestBatch>, RequestSourceError>;
}

/// A request source that never asks for anything.
#[derive(Debug, Clone, Default)]
pub struct StubRequestSource;

impl StubRequestSource {
    /// Create a new stub request source.
    pub const fn new() -> Self {
        Self
    }
}

impl RequestSource for StubRequestSource {
    fn collect_requests(
        &mut self,
        _tick: u64,
        _snapshot: &NetworkSnapshot,
    ) -> Result<Option<RequestBatch>, RequestSourceError> {
        Ok(None)
    }
}

/// Plays back requests at fixed ticks.
///
/// Several entries for the same tick are merged; later amounts win and any
/// entry asking to commit commits the merged batch. A batch whose tick has
/// already passed when it is first seen is an error, since it can never be
/// played.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRequestSource {
    script: BTreeMap<u64, RequestBatch>,
}

impl ScriptedRequestSource {
    /// Create an empty script.
    pub const fn new() -> Self {
        Self {
            script: BTreeMap::new(),
        }
    }

    /// Build a script from the `scenario.requests` config entries.
    pub fn from_config(entries: &[ScriptedRequestConfig]) -> Self {
        let mut source = Self::new();
        for entry in entries {
            let batch = RequestBatch {
                amounts: entry
                    .amounts
                    .iter()
                    .map(|(name, amount)| (ResourceName::new(name.as_str()), *amount))
                    .collect(),
                commit: entry.commit,
            };
            source.schedule(entry.at_tick, batch);
        }
        source
    }

    /// Add a batch to be played at `tick`.
    pub fn schedule(&mut self, tick: u64, batch: RequestBatch) {
        let slot = self.script.entry(tick).or_default();
        slot.amounts.extend(batch.amounts);
        slot.commit |= batch.commit;
    }

    /// Number of ticks that still have a batch queued.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RequestSource for ScriptedRequestSource {
    fn collect_requests(
        &mut self,
        tick: u64,
        _snapshot: &NetworkSnapshot,
    ) -> Result<Option<RequestBatch>, RequestSourceError> {
        let missed = self.script.keys().next().copied().filter(|&at| at < tick);
        if let Some(at_tick) = missed {
            self.script.remove(&at_tick);
            return Err(RequestSourceError::Missed { at_tick, tick });
        }
        Ok(self.script.remove(&tick))
    }
}
