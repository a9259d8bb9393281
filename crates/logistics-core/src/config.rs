//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `logistics-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and a loader that reads them. Every field has a default,
//! so an empty file is a valid configuration.

use std::collections::BTreeMap;
use std::path::Path;

use logistics_types::{
    Container, Fleet, FlowMode, LogisticsLink, Participant, ParticipantId, PartState, Situation,
    TransferMode,
};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The scenario names a participant that is not in the fleet.
    #[error("scenario references unknown participant: {name}")]
    UnknownParticipant {
        /// The name that did not resolve.
        name: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, timing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Network membership and request rules.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Fleet and scripted requests to run.
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Real-time milliseconds per tick (the host's fixed physics step).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Network membership and request rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// Situations in which a participant may join the network.
    #[serde(default = "default_allowed_situations")]
    pub allowed_situations: Vec<Situation>,

    /// Only an unplugged requester may withdraw from the network.
    #[serde(default = "default_true")]
    pub require_unplugged_requester: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            allowed_situations: default_allowed_situations(),
            require_unplugged_requester: true,
        }
    }
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is
    /// not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log a full pool snapshot every N ticks (0 = never).
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            snapshot_interval_ticks: default_snapshot_interval_ticks(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// A fleet to load plus the requests to play against it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScenarioConfig {
    /// Participants present at start.
    #[serde(default)]
    pub participants: Vec<ParticipantConfig>,

    /// Name of the participant acting as requester, if any.
    #[serde(default)]
    pub requester: Option<String>,

    /// Requests committed at fixed ticks.
    #[serde(default)]
    pub requests: Vec<ScriptedRequestConfig>,
}

/// A fleet built from a [`ScenarioConfig`], with participant names resolved
/// to ids.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    /// The participants.
    pub fleet: Fleet,
    /// Participant name to id.
    pub names: BTreeMap<String, ParticipantId>,
    /// The requester, if one was named.
    pub requester: Option<ParticipantId>,
}

impl ScenarioConfig {
    /// Build the fleet and resolve the requester name.
    ///
    /// Participant names are expected to be unique; with duplicates the last
    /// one wins the name index.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownParticipant`] if `requester` does not
    /// match any participant.
    pub fn load(&self) -> Result<LoadedScenario, ConfigError> {
        let mut fleet = Fleet::new();
        let mut names = BTreeMap::new();
        for participant in &self.participants {
            let id = fleet.insert(participant.build());
            names.insert(participant.name.clone(), id);
        }

        let requester = match &self.requester {
            Some(name) => Some(names.get(name).copied().ok_or_else(|| {
                ConfigError::UnknownParticipant { name: name.clone() }
            })?),
            None => None,
        };

        Ok(LoadedScenario {
            fleet,
            names,
            requester,
        })
    }
}

/// One participant in the scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParticipantConfig {
    /// Display name; also how scripted requests refer to it.
    pub name: String,

    /// Physical situation.
    #[serde(default = "default_situation")]
    pub situation: Situation,

    /// Fitted logistics module.
    #[serde(default)]
    pub link: LogisticsLink,

    /// Containers in part order.
    #[serde(default)]
    pub containers: Vec<ContainerConfig>,
}

impl ParticipantConfig {
    /// Build the runtime participant (fresh ids).
    pub fn build(&self) -> Participant {
        let mut participant = Participant::new(self.name.clone(), self.situation, self.link);
        participant.containers = self.containers.iter().map(ContainerConfig::build).collect();
        participant
    }
}

/// One container in the scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContainerConfig {
    /// Resource type name.
    pub resource: String,

    /// Starting amount.
    #[serde(default)]
    pub amount: f64,

    /// Capacity.
    pub capacity: f64,

    /// Whether the resource can be pumped.
    #[serde(default)]
    pub transfer_mode: TransferMode,

    /// Allowed flow direction.
    #[serde(default)]
    pub flow_mode: FlowMode,

    /// Flow toggle.
    #[serde(default = "default_true")]
    pub flow_enabled: bool,

    /// Part state.
    #[serde(default)]
    pub part_state: PartState,
}

impl ContainerConfig {
    /// Build the runtime container (fresh id).
    pub fn build(&self) -> Container {
        let mut container = Container::new(self.resource.as_str(), self.amount, self.capacity);
        container.transfer_mode = self.transfer_mode;
        container.flow_mode = self.flow_mode;
        container.flow_enabled = self.flow_enabled;
        container.part_state = self.part_state;
        container
    }
}

/// Requests set and committed at a given tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptedRequestConfig {
    /// Tick before which the request is placed.
    pub at_tick: u64,

    /// Resource name to requested amount.
    #[serde(default)]
    pub amounts: BTreeMap<String, f64>,

    /// Whether to commit right away.
    #[serde(default = "default_true")]
    pub commit: bool,
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Logistics Network".to_owned()
}

const fn default_tick_interval_ms() -> u64 {
    20
}

fn default_allowed_situations() -> Vec<Situation> {
    vec![Situation::Prelaunch, Situation::Landed, Situation::Splashed]
}

const fn default_situation() -> Situation {
    Situation::Landed
}

const fn default_max_ticks() -> u64 {
    0
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_snapshot_interval_ticks() -> u64 {
    50
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.tick_interval_ms, 20);
        assert_eq!(config.network.allowed_situations.len(), 3);
        assert!(config.network.require_unplugged_requester);
        assert_eq!(config.simulation.max_ticks, 0);
        assert!(config.scenario.participants.is_empty());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Duna Base"
  tick_interval_ms: 0

network:
  allowed_situations: [landed, splashed]
  require_unplugged_requester: false

simulation:
  max_ticks: 10

logging:
  level: "debug"
  snapshot_interval_ticks: 5

scenario:
  requester: "Rover"
  participants:
    - name: "Base"
      situation: landed
      containers:
        - { resource: "LiquidFuel", amount: 300.0, capacity: 400.0 }
        - { resource: "SolidFuel", amount: 10.0, capacity: 10.0, transfer_mode: none }
    - name: "Rover"
      link: unplugged
      containers:
        - { resource: "LiquidFuel", capacity: 90.0, flow_enabled: false }
  requests:
    - at_tick: 3
      amounts: { LiquidFuel: 45.0 }
"#;

        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.name, "Duna Base");
        assert_eq!(
            config.network.allowed_situations,
            vec![Situation::Landed, Situation::Splashed]
        );
        assert!(!config.network.require_unplugged_requester);
        assert_eq!(config.simulation.max_ticks, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.scenario.requester.as_deref(), Some("Rover"));
        assert_eq!(config.scenario.participants.len(), 2);

        let base = config.scenario.participants.first().map(ParticipantConfig::build);
        let solid = base.as_ref().and_then(|b| b.containers.get(1));
        assert_eq!(solid.map(|c| c.transfer_mode), Some(TransferMode::None));

        let rover = config.scenario.participants.get(1).map(ParticipantConfig::build);
        assert_eq!(rover.as_ref().map(|r| r.link), Some(LogisticsLink::Unplugged));
        assert_eq!(
            rover.as_ref().and_then(|r| r.containers.first()).map(|c| c.flow_enabled),
            Some(false)
        );

        let request = config.scenario.requests.first();
        assert_eq!(request.map(|r| r.at_tick), Some(3));
        assert_eq!(request.map(|r| r.commit), Some(true));
        assert_eq!(
            request.and_then(|r| r.amounts.get("LiquidFuel")).copied(),
            Some(45.0)
        );
    }

    #[test]
    fn scenario_loads_fleet_and_requester() {
        let yaml = r#"
scenario:
  requester: "Rover"
  participants:
    - name: "Base"
      containers:
        - { resource: "Water", amount: 5.0, capacity: 10.0 }
    - name: "Rover"
      link: unplugged
"#;
        let config = SimulationConfig::parse(yaml).ok().unwrap_or_default();
        let loaded = config.scenario.load();
        assert!(loaded.is_ok());
        let loaded = loaded.ok();
        let loaded = loaded.as_ref();

        assert_eq!(loaded.map(|l| l.fleet.len()), Some(2));
        assert_eq!(
            loaded.and_then(|l| l.requester),
            loaded.and_then(|l| l.names.get("Rover").copied())
        );
        assert!(loaded.and_then(|l| l.requester).is_some());
    }

    #[test]
    fn scenario_rejects_unknown_requester() {
        let scenario = ScenarioConfig {
            requester: Some("Ghost".to_owned()),
            ..ScenarioConfig::default()
        };
        assert!(matches!(
            scenario.load(),
            Err(ConfigError::UnknownParticipant { .. })
        ));
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("simulation:\n  max_ticks: 7\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.simulation.max_ticks, 7);
        assert_eq!(config.logging.snapshot_interval_ticks, 50);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(SimulationConfig::parse("").ok(), Some(SimulationConfig::default()));
    }

    #[test]
    fn invalid_situation_is_rejected() {
        let yaml = "network:\n  allowed_situations: [hovering]\n";
        assert!(SimulationConfig::parse(yaml).is_err());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("logistics-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
