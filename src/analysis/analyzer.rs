use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::stats::{marginal_utility, ScoreSummary, EPSILON};
use crate::analysis::synergy::{compute_synergies, SynergyResult, SynergyThresholds};
use crate::archetype::Archetype;
use crate::combat::Simulator;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, SimulationError};
use crate::parallel::{archetype_batches, WorkerPool};

/// Number of progress-reporting batches for analysis runs with a progress callback.
const PROGRESS_BATCH_COUNT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginalUtilityResult {
    pub archetype: Archetype,
    pub average_score: f64,
    /// Signed percent change over the baseline average.
    pub marginal_utility: f64,
    pub standard_deviation: f64,
}

/// Output of one full analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub repetitions: usize,
    pub seed: u64,
    pub baseline_score: f64,
    pub marginal_utilities: Vec<MarginalUtilityResult>,
    pub synergies: Vec<SynergyResult>,
}

impl AnalysisReport {
    pub fn marginal_utility_for(&self, archetype_id: &str) -> Option<&MarginalUtilityResult> {
        self.marginal_utilities
            .iter()
            .find(|result| result.archetype.id == archetype_id)
    }

    /// Synergy for the unordered pair `(a, b)`.
    pub fn synergy_for(&self, a: &str, b: &str) -> Option<&SynergyResult> {
        let wanted = if a <= b { (a, b) } else { (b, a) };
        self.synergies.iter().find(|synergy| {
            let (low, high) = synergy.stat_key();
            (low.as_str(), high.as_str()) == wanted
        })
    }

    pub fn op_synergies(&self) -> impl Iterator<Item = &SynergyResult> {
        self.synergies.iter().filter(|synergy| synergy.is_op_synergy)
    }

    pub fn weak_synergies(&self) -> impl Iterator<Item = &SynergyResult> {
        self.synergies.iter().filter(|synergy| synergy.is_weak_synergy)
    }
}

/// Scores archetypes against a simulator and derives marginal utilities and synergies.
///
/// Every archetype is scored exactly once per analysis pass; everything after scoring is pure
/// aggregation. Repetition `k` uses seed `config.seed + k` for every archetype, so all
/// archetypes face the same sequence of encounters and the comparison is not swamped by noise.
pub struct UtilityAnalyzer<'a, S: ?Sized> {
    simulator: &'a S,
    config: AnalysisConfig,
}

impl<'a, S: Simulator + ?Sized> UtilityAnalyzer<'a, S> {
    pub fn new(simulator: &'a S, config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { simulator, config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The only operation that calls the simulator: `repetitions` calls, then mean and sample
    /// standard deviation. The first failure or non-finite score aborts.
    pub fn score_archetype(&self, archetype: &Archetype) -> Result<ScoreSummary, AnalysisError> {
        let mut scores = Vec::with_capacity(self.config.repetitions);
        for repetition in 0..self.config.repetitions {
            let seed = self.config.seed.wrapping_add(repetition as u64);
            let score = self
                .simulator
                .score(archetype, seed)
                .and_then(|score| {
                    if score.is_finite() {
                        Ok(score)
                    } else {
                        Err(SimulationError::NonFinite(score))
                    }
                })
                .map_err(|source| AnalysisError::Simulation {
                    archetype_id: archetype.id.clone(),
                    repetition,
                    source,
                })?;
            scores.push(score);
        }
        let summary = ScoreSummary::from_scores(&scores);
        tracing::debug!(
            archetype = %archetype.id,
            average = summary.average_score,
            std_dev = summary.standard_deviation,
            "scored archetype"
        );
        Ok(summary)
    }

    /// Score every archetype once, sequentially, in input order.
    pub fn score_all(&self, archetypes: &[Archetype]) -> Result<Vec<ScoreSummary>, AnalysisError> {
        archetypes
            .iter()
            .map(|archetype| self.score_archetype(archetype))
            .collect()
    }

    pub fn compute_marginal_utilities(
        &self,
        archetypes: &[Archetype],
    ) -> Result<Vec<MarginalUtilityResult>, AnalysisError> {
        require_baseline(archetypes)?;
        let summaries = self.score_all(archetypes)?;
        assemble_marginal_utilities(archetypes, &summaries)
    }

    /// Pure: no simulator calls. Uses the baseline and singles already present in `results`.
    pub fn compute_synergies(
        &self,
        results: &[MarginalUtilityResult],
    ) -> Result<Vec<SynergyResult>, AnalysisError> {
        compute_synergies(results, SynergyThresholds::from(&self.config))
    }

    /// Marginal utilities and synergies over one shared scoring pass.
    pub fn run_full_analysis(&self, archetypes: &[Archetype]) -> Result<AnalysisReport, AnalysisError> {
        require_baseline(archetypes)?;
        tracing::info!(
            archetypes = archetypes.len(),
            repetitions = self.config.repetitions,
            "starting analysis"
        );
        let summaries = self.score_all(archetypes)?;
        self.finish(archetypes, &summaries)
    }

    /// Like [Self::run_full_analysis] but scores in batches and calls `on_progress(done, total)`
    /// after each one (and once with `done = 0` before the first).
    pub fn run_full_analysis_with_progress<F>(
        &self,
        archetypes: &[Archetype],
        mut on_progress: F,
    ) -> Result<AnalysisReport, AnalysisError>
    where
        F: FnMut(usize, usize),
    {
        require_baseline(archetypes)?;
        let total = archetypes.len();
        on_progress(0, total);

        let mut summaries = Vec::with_capacity(total);
        for batch in archetype_batches(archetypes, PROGRESS_BATCH_COUNT) {
            summaries.extend(self.score_all(batch)?);
            on_progress(summaries.len(), total);
        }
        self.finish(archetypes, &summaries)
    }

    fn finish(
        &self,
        archetypes: &[Archetype],
        summaries: &[ScoreSummary],
    ) -> Result<AnalysisReport, AnalysisError> {
        let marginal_utilities = assemble_marginal_utilities(archetypes, summaries)?;
        let synergies = self.compute_synergies(&marginal_utilities)?;
        let baseline_score = marginal_utilities
            .iter()
            .find(|result| result.archetype.is_baseline())
            .map(|result| result.average_score)
            .unwrap_or(0.0);
        tracing::info!(
            baseline = baseline_score,
            op = synergies.iter().filter(|s| s.is_op_synergy).count(),
            weak = synergies.iter().filter(|s| s.is_weak_synergy).count(),
            "analysis complete"
        );
        Ok(AnalysisReport {
            repetitions: self.config.repetitions,
            seed: self.config.seed,
            baseline_score,
            marginal_utilities,
            synergies,
        })
    }
}

impl<'a, S: Simulator + Sync + ?Sized> UtilityAnalyzer<'a, S> {
    /// Score archetypes across the worker pool. Results are in input order, and identical to
    /// [Self::score_all] since seeds depend only on the repetition index.
    pub fn score_all_parallel(
        &self,
        archetypes: &[Archetype],
    ) -> Result<Vec<ScoreSummary>, AnalysisError> {
        let pool = WorkerPool::with_workers(self.config.workers);
        pool.install(|| {
            archetypes
                .par_iter()
                .map(|archetype| self.score_archetype(archetype))
                .collect::<Result<Vec<_>, _>>()
        })?
    }

    pub fn run_full_analysis_parallel(
        &self,
        archetypes: &[Archetype],
    ) -> Result<AnalysisReport, AnalysisError> {
        require_baseline(archetypes)?;
        tracing::info!(
            archetypes = archetypes.len(),
            repetitions = self.config.repetitions,
            workers = self.config.workers,
            "starting parallel analysis"
        );
        let summaries = self.score_all_parallel(archetypes)?;
        self.finish(archetypes, &summaries)
    }

    /// Full analysis, parallel when the config asks for it.
    pub fn run(&self, archetypes: &[Archetype]) -> Result<AnalysisReport, AnalysisError> {
        if self.config.parallel {
            self.run_full_analysis_parallel(archetypes)
        } else {
            self.run_full_analysis(archetypes)
        }
    }
}

fn require_baseline(archetypes: &[Archetype]) -> Result<(), AnalysisError> {
    if archetypes.iter().any(Archetype::is_baseline) {
        Ok(())
    } else {
        Err(AnalysisError::MissingBaseline)
    }
}

fn assemble_marginal_utilities(
    archetypes: &[Archetype],
    summaries: &[ScoreSummary],
) -> Result<Vec<MarginalUtilityResult>, AnalysisError> {
    let baseline = archetypes
        .iter()
        .zip(summaries)
        .find(|(archetype, _)| archetype.is_baseline())
        .map(|(_, summary)| summary.average_score)
        .ok_or(AnalysisError::MissingBaseline)?;
    if baseline.abs() < EPSILON {
        tracing::warn!("baseline average score is zero; marginal utilities reported as 0");
    }

    Ok(archetypes
        .iter()
        .zip(summaries)
        .map(|(archetype, summary)| MarginalUtilityResult {
            archetype: archetype.clone(),
            average_score: summary.average_score,
            marginal_utility: if archetype.is_baseline() {
                0.0
            } else {
                marginal_utility(summary.average_score, baseline)
            },
            standard_deviation: summary.standard_deviation,
        })
        .collect())
}
