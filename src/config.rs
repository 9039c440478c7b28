//! Analysis settings. Layered: built-in defaults, then an optional JSON/YAML file, then
//! `BALANCE_LAB_*` environment variables, then command-line flags.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::archetype::DEFAULT_BOOST_SCALE;
use crate::error::{AnalysisError, ConfigError};

/// Design default. 10 000 tightens the estimate but takes ten times as long.
pub const DEFAULT_REPETITIONS: usize = 1000;
pub const DEFAULT_OP_THRESHOLD: f64 = 1.15;
pub const DEFAULT_WEAK_THRESHOLD: f64 = 0.95;
pub const DEFAULT_CONFIG_PATH: &str = "data/analysis.json";

pub const ENV_REPETITIONS: &str = "BALANCE_LAB_REPETITIONS";
pub const ENV_SEED: &str = "BALANCE_LAB_SEED";
pub const ENV_PARALLEL: &str = "BALANCE_LAB_PARALLEL";
pub const ENV_WORKERS: &str = "BALANCE_LAB_WORKERS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Simulator invocations per archetype. At least 1.
    pub repetitions: usize,
    /// Repetition `k` is simulated with seed `seed + k`.
    pub seed: u64,
    /// Multipliers strictly above this are flagged as OP synergies.
    pub op_threshold: f64,
    /// Multipliers strictly below this are flagged as weak synergies.
    pub weak_threshold: f64,
    pub boost_scale: f64,
    /// Score archetypes on a worker pool. Only honored for `Sync` simulators.
    pub parallel: bool,
    /// Worker threads when `parallel` is set; 0 uses every core.
    pub workers: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            seed: 0,
            op_threshold: DEFAULT_OP_THRESHOLD,
            weak_threshold: DEFAULT_WEAK_THRESHOLD,
            boost_scale: DEFAULT_BOOST_SCALE,
            parallel: false,
            workers: 0,
        }
    }
}

impl AnalysisConfig {
    pub fn with_repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, workers: usize) -> Self {
        self.parallel = true;
        self.workers = workers;
        self
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.repetitions == 0 {
            return Err(AnalysisError::InvalidRepetitions(self.repetitions));
        }
        if !self.boost_scale.is_finite() || self.boost_scale < 0.0 {
            return Err(AnalysisError::InvalidBoostScale(self.boost_scale));
        }
        let (op, weak) = (self.op_threshold, self.weak_threshold);
        if !op.is_finite() || !weak.is_finite() || weak > op {
            return Err(AnalysisError::InvalidThresholds { op, weak });
        }
        Ok(())
    }

    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_REPETITIONS) {
            self.repetitions = parse_value(ENV_REPETITIONS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            self.seed = parse_value(ENV_SEED, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PARALLEL) {
            self.parallel = parse_flag(ENV_PARALLEL, &raw)?;
        }
        if let Some(raw) = lookup(ENV_WORKERS) {
            self.workers = parse_value(ENV_WORKERS, &raw)?;
        }
        Ok(self)
    }
}

/// Read a config file (`.yaml`/`.yml` as YAML, else JSON). Missing fields keep their defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if yaml {
        serde_yaml::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))
    } else {
        serde_json::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

/// [DEFAULT_CONFIG_PATH] if present, else defaults; environment overrides applied on top.
pub fn resolve_config() -> Result<AnalysisConfig, ConfigError> {
    let base = if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)?
    } else {
        AnalysisConfig::default()
    };
    base.with_env_overrides(|key| std::env::var(key).ok())
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}
