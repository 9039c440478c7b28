pub mod analyzer;
pub mod cache;
pub mod ranking;
pub mod stats;
pub mod stress_test;
pub mod synergy;

pub use analyzer::{AnalysisReport, MarginalUtilityResult, UtilityAnalyzer};
pub use cache::AnalysisCache;
pub use ranking::{rank_by_marginal_utility, rank_synergies, synergies_of_class, RankedStat};
pub use stats::{marginal_utility, ScoreSummary, EPSILON};
pub use stress_test::StressTest;
pub use synergy::{
    compute_synergies, synergy_multiplier, SynergyClass, SynergyResult, SynergyThresholds,
    NEUTRAL_MULTIPLIER,
};
