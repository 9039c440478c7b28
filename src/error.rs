//! Error types for catalog loading, simulation and analysis runs.

use thiserror::Error;

/// Problems with a stat catalog. Raised before any simulation runs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("stat catalog is empty")]
    Empty,

    #[error("duplicate stat id '{0}'")]
    DuplicateId(String),

    #[error("stat '{id}' has a non-finite weight ({weight})")]
    NonFiniteWeight { id: String, weight: f64 },

    #[error("stat '{id}' has a negative weight ({weight})")]
    NegativeWeight { id: String, weight: f64 },

    #[error("stat '{id}' has a non-finite default value ({value})")]
    NonFiniteDefault { id: String, value: f64 },

    #[error("stat '{id}' overflows when boosted with scale {boost_scale}")]
    BoostOverflow { id: String, boost_scale: f64 },

    #[error("card '{card}' references unknown stat '{stat}'")]
    UnknownCardStat { card: String, stat: String },

    #[error("failed to read catalog file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(String),
}

/// Raised by a [crate::combat::Simulator] for a single encounter.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("simulator produced a non-finite score ({0})")]
    NonFinite(f64),

    #[error("archetype is missing required stat '{0}'")]
    MissingStat(String),

    #[error("simulation failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),

    #[error("repetitions must be at least 1 (got {0})")]
    InvalidRepetitions(usize),

    #[error("boost scale must be finite and non-negative (got {0})")]
    InvalidBoostScale(f64),

    #[error("synergy thresholds must be finite with weak <= op (got op {op}, weak {weak})")]
    InvalidThresholds { op: f64, weak: f64 },

    #[error("archetype set has no baseline")]
    MissingBaseline,

    #[error("simulation of '{archetype_id}' failed on repetition {repetition}: {source}")]
    Simulation {
        archetype_id: String,
        repetition: usize,
        #[source]
        source: SimulationError,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}
