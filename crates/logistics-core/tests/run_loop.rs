//! End-to-end runs of the simulation loop from a YAML scenario.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::sync::Arc;

use logistics_core::config::SimulationConfig;
use logistics_core::operator::{OperatorState, SimulationEndReason};
use logistics_core::runner::{NoOpCallback, TickCallback, run_simulation};
use logistics_core::source::{ScriptedRequestSource, StubRequestSource};
use logistics_core::tick::{SimulationState, TickSummary};
use logistics_types::{Fleet, ResourceName};

const SCENARIO: &str = r#"
world:
  tick_interval_ms: 0

simulation:
  max_ticks: 5

scenario:
  requester: "Rover"
  participants:
    - name: "Depot"
      containers:
        - { resource: "Water", amount: 30.0, capacity: 100.0 }
        - { resource: "Fuel", amount: 10.0, capacity: 10.0 }
    - name: "Tanker"
      situation: splashed
      link: plugged
      containers:
        - { resource: "Water", amount: 10.0, capacity: 20.0 }
    - name: "Plane"
      situation: flying
      containers:
        - { resource: "Water", amount: 7.0, capacity: 10.0 }
    - name: "Rover"
      link: unplugged
      containers:
        - { resource: "Water", amount: 0.0, capacity: 25.0 }
        - { resource: "Fuel", amount: 0.0, capacity: 5.0 }
  requests:
    - at_tick: 3
      amounts: { Water: 12.0, Fuel: 50.0 }
"#;

fn water() -> ResourceName {
    ResourceName::new("Water")
}

fn fuel() -> ResourceName {
    ResourceName::new("Fuel")
}

fn setup() -> (SimulationConfig, SimulationState, ScriptedRequestSource, Arc<OperatorState>) {
    let config = SimulationConfig::parse(SCENARIO).unwrap();
    let loaded = config.scenario.load().unwrap();
    let mut state = SimulationState::from_config(loaded.fleet, &config);
    state.set_requester(loaded.requester).unwrap();
    let source = ScriptedRequestSource::from_config(&config.scenario.requests);
    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    (config, state, source, operator)
}

fn named_total(state: &SimulationState, name: &str, r: &ResourceName) -> f64 {
    state
        .fleet
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.total_of(r))
        .unwrap()
}

/// Records every summary it sees.
#[derive(Default)]
struct Recorder {
    summaries: Vec<TickSummary>,
}

impl TickCallback for Recorder {
    fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
        self.summaries.push(summary.clone());
    }
}

#[tokio::test]
async fn scripted_run_transfers_and_conserves() {
    let (_, mut state, mut source, operator) = setup();
    let water_before = state.fleet.total_of(&water());
    let fuel_before = state.fleet.total_of(&fuel());
    let mut recorder = Recorder::default();

    let result = run_simulation(&mut state, &mut source, &operator, &mut recorder)
        .await
        .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 5);
    assert_eq!(recorder.summaries.len(), 5);
    assert_eq!(operator.end_reason().await, Some(SimulationEndReason::MaxTicksReached));

    // Nothing is created or destroyed while everything fits.
    assert!((state.fleet.total_of(&water()) - water_before).abs() < 1e-9);
    assert!((state.fleet.total_of(&fuel()) - fuel_before).abs() < 1e-9);

    // Depot and tanker share; the plane and the unplugged rover do not.
    let first = recorder.summaries.first().unwrap();
    assert_eq!(first.report.members, 2);
    assert_eq!(first.snapshot.pool.get(&water()), Some(&40.0));

    // Tick 3 services the request: 12 water, fuel capped by rover spare (5).
    let serviced = recorder.summaries.get(2).unwrap();
    let transfer = serviced.report.transfer.as_ref().unwrap();
    assert_eq!(transfer.granted.get(&water()), Some(&12.0));
    assert_eq!(transfer.granted.get(&fuel()), Some(&5.0));

    assert_eq!(named_total(&state, "Rover", &water()), 12.0);
    assert_eq!(named_total(&state, "Rover", &fuel()), 5.0);
    assert_eq!(named_total(&state, "Plane", &water()), 7.0);
    let network_water = named_total(&state, "Depot", &water())
        + named_total(&state, "Tanker", &water());
    assert!((network_water - 28.0).abs() < 1e-9);
}

#[tokio::test]
async fn operator_stop_before_first_tick() {
    let (_, mut state, _, operator) = setup();
    operator.request_stop();

    let result = run_simulation(
        &mut state,
        &mut StubRequestSource::new(),
        &operator,
        &mut NoOpCallback,
    )
    .await
    .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
    assert_eq!(result.total_ticks, 0);
    assert!(result.final_summary.is_none());
}

#[tokio::test]
async fn empty_fleet_ends_run() {
    let config = SimulationConfig::default();
    let mut state = SimulationState::from_config(Fleet::new(), &config);
    let operator = Arc::new(OperatorState::new(0, &config.simulation));

    let result = run_simulation(
        &mut state,
        &mut StubRequestSource::new(),
        &operator,
        &mut NoOpCallback,
    )
    .await
    .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::FleetEmpty);
    assert_eq!(result.total_ticks, 0);
}

#[tokio::test]
async fn paused_run_waits_for_resume() {
    let (_, mut state, _, operator) = setup();
    operator.pause();

    let control = Arc::clone(&operator);
    let resumer = tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        control.resume();
    });

    let result = run_simulation(
        &mut state,
        &mut StubRequestSource::new(),
        &operator,
        &mut NoOpCallback,
    )
    .await
    .unwrap();
    resumer.await.unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 5);
}
