use serde::Serialize;

use crate::analysis::analyzer::{AnalysisReport, UtilityAnalyzer};
use crate::archetype::{Archetype, ArchetypeGenerator};
use crate::catalog::StatCatalog;
use crate::combat::Simulator;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Catalog + settings for one stress test: validate, generate archetypes, analyze.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressTest {
    pub catalog: StatCatalog,
    pub config: AnalysisConfig,
}

impl StressTest {
    pub fn new(catalog: StatCatalog, config: AnalysisConfig) -> Self {
        Self { catalog, config }
    }

    pub fn archetypes(&self) -> Vec<Archetype> {
        ArchetypeGenerator::with_boost_scale(&self.catalog, self.config.boost_scale).generate_all()
    }

    /// Checks run before any simulation: non-empty catalog, valid settings, finite boosted stats.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.catalog.ensure_non_empty()?;
        self.config.validate()?;
        self.catalog.check_boost_scale(self.config.boost_scale)?;
        Ok(())
    }

    /// Sequential run.
    pub fn run<S: Simulator + ?Sized>(&self, simulator: &S) -> Result<AnalysisReport, AnalysisError> {
        self.validate()?;
        UtilityAnalyzer::new(simulator, self.config.clone())?.run_full_analysis(&self.archetypes())
    }

    /// Parallel when `config.parallel` is set.
    pub fn run_concurrent<S: Simulator + Sync + ?Sized>(
        &self,
        simulator: &S,
    ) -> Result<AnalysisReport, AnalysisError> {
        self.validate()?;
        UtilityAnalyzer::new(simulator, self.config.clone())?.run(&self.archetypes())
    }

    pub fn run_with_progress<S, F>(
        &self,
        simulator: &S,
        on_progress: F,
    ) -> Result<AnalysisReport, AnalysisError>
    where
        S: Simulator + ?Sized,
        F: FnMut(usize, usize),
    {
        self.validate()?;
        UtilityAnalyzer::new(simulator, self.config.clone())?
            .run_full_analysis_with_progress(&self.archetypes(), on_progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StatDefinition;
    use crate::error::{CatalogError, SimulationError};

    #[test]
    fn empty_catalog_fails_before_simulation() {
        let catalog = StatCatalog::from_stats(Vec::new()).unwrap();
        let test = StressTest::new(catalog, AnalysisConfig::default());
        let sim = |_: &Archetype, _: u64| -> Result<f64, SimulationError> {
            panic!("simulator must not run for an empty catalog")
        };
        let err = test.run(&sim).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidCatalog(CatalogError::Empty)));
    }

    #[test]
    fn boost_scale_flows_into_archetypes() {
        let catalog = StatCatalog::from_stats(vec![StatDefinition::new("hp", 1.0, 100.0)]).unwrap();
        let config = AnalysisConfig {
            boost_scale: 10.0,
            ..AnalysisConfig::default()
        };
        let archetypes = StressTest::new(catalog, config).archetypes();
        assert_eq!(archetypes[1].stat("hp"), 110.0);
    }

    #[test]
    fn overflowing_boost_scale_fails_before_simulation() {
        let catalog = StatCatalog::from_stats(vec![StatDefinition::new("hp", 1e300, 0.0)]).unwrap();
        let config = AnalysisConfig {
            boost_scale: 1e10,
            ..AnalysisConfig::default()
        };
        let sim = |_: &Archetype, _: u64| -> Result<f64, SimulationError> {
            panic!("simulator must not run when boosted stats overflow")
        };
        let err = StressTest::new(catalog, config).run(&sim).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidCatalog(CatalogError::BoostOverflow { .. })
        ));
    }
}
