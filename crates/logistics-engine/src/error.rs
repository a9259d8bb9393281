//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the run so
//! that `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: logistics_core::config::ConfigError,
    },

    /// The scenario's requester could not be selected.
    #[error("network error: {source}")]
    Network {
        /// The underlying network error.
        #[from]
        source: logistics_network::NetworkError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: logistics_core::runner::RunnerError,
    },
}
