//! Simulation loop runner with operator controls.
//!
//! [`run_simulation`] drives [`run_tick`] at the configured interval and
//! stops on the tick limit, an operator stop, or an empty fleet. Pause and
//! tick speed are read from the shared [`OperatorState`] every iteration.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use tracing::{info, warn};

use crate::operator::{OperatorState, SimulationEndReason};
use crate::source::RequestSource;
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails.
pub async fn run_simulation(
    state: &mut SimulationState,
    requests: &mut dyn RequestSource,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        participants = state.fleet.len(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!("Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return Ok(
                finish(operator, SimulationEndReason::OperatorStop, last_summary, total_ticks).await,
            );
        }

        // --- Check fleet (before tick) ---
        if state.fleet.is_empty() {
            info!(tick = state.clock.tick(), "Fleet is empty");
            return Ok(
                finish(operator, SimulationEndReason::FleetEmpty, last_summary, total_ticks).await,
            );
        }

        // --- Execute tick ---
        let summary = tick::run_tick(state, requests)?;
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return Ok(finish(
                operator,
                SimulationEndReason::MaxTicksReached,
                Some(summary),
                total_ticks,
            )
            .await);
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

async fn finish(
    operator: &OperatorState,
    reason: SimulationEndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> SimulationResult {
    operator.set_end_reason(reason).await;
    SimulationResult {
        end_reason: reason,
        final_summary,
        total_ticks,
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            members = summary.report.members,
            containers = summary.report.containers,
            pool = ?summary.snapshot.pool,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
