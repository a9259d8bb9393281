//! Headless engine for the Simple Logistics network.
//!
//! Loads a scenario, builds the fleet, and runs the tick loop until a
//! termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `logistics-config.yaml` (or the path given as
//!    the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Build the fleet from the scenario and select the requester
//! 4. Create operator state from simulation bounds, wire Ctrl-C to stop
//! 5. Run the simulation loop
//! 6. Log the result

mod error;
mod snapshot_callback;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use logistics_core::config::SimulationConfig;
use logistics_core::operator::OperatorState;
use logistics_core::runner;
use logistics_core::source::ScriptedRequestSource;
use logistics_core::tick::SimulationState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::snapshot_callback::SnapshotLogger;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "logistics-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, scenario setup, or the run fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, found) = load_config(&config_path)?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str())),
        )
        .with_target(true)
        .init();

    info!("logistics-engine starting");
    if !found {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.simulation.max_ticks,
        allowed_situations = ?config.network.allowed_situations,
        require_unplugged_requester = config.network.require_unplugged_requester,
        "Configuration loaded"
    );

    // 3. Build the fleet.
    let scenario = config.scenario.load()?;
    info!(
        participants = scenario.fleet.len(),
        requester = ?scenario.requester,
        scripted_requests = config.scenario.requests.len(),
        "Scenario loaded"
    );
    if scenario.fleet.is_empty() {
        warn!("Scenario has no participants; nothing to simulate");
    }

    let mut sim_state = SimulationState::from_config(scenario.fleet, &config);
    sim_state.set_requester(scenario.requester)?;
    let mut requests = ScriptedRequestSource::from_config(&config.scenario.requests);

    // 4. Operator state, stopped cleanly on Ctrl-C.
    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    let stopper = Arc::clone(&operator);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping");
                stopper.request_stop();
            }
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });

    // 5. Run the simulation.
    let mut callback = SnapshotLogger::new(config.logging.snapshot_interval_ticks);
    let result =
        runner::run_simulation(&mut sim_state, &mut requests, &operator, &mut callback).await?;

    // 6. Log results.
    runner::log_simulation_end(&result);
    if requests.remaining() > 0 {
        warn!(
            unplayed = requests.remaining(),
            "Scripted requests left unplayed"
        );
    }

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        transfers = callback.transfers(),
        "logistics-engine shutdown complete"
    );

    Ok(())
}

/// Load the configuration, falling back to defaults when the file is
/// missing. Returns the config and whether the file was found.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        let config = SimulationConfig::from_file(path)?;
        Ok((config, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}
