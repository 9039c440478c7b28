//! Stress-testing core for game balance: generates stat-perturbed archetypes, scores them with a
//! combat simulator and reports per-stat marginal utility and per-pair synergy.

pub mod analysis;
pub mod archetype;
pub mod catalog;
pub mod cli;
pub mod combat;
pub mod config;
pub mod error;
pub mod export;
pub mod parallel;
pub mod server;

pub use analysis::{
    AnalysisReport, MarginalUtilityResult, StressTest, SynergyResult, UtilityAnalyzer,
};
pub use archetype::{Archetype, ArchetypeGenerator, ArchetypeKind};
pub use catalog::{StatCatalog, StatDefinition};
pub use combat::{DuelSimulator, Simulator};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, CatalogError, ConfigError, SimulationError};
