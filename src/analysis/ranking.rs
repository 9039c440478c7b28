use serde::Serialize;

use crate::analysis::analyzer::MarginalUtilityResult;
use crate::analysis::synergy::{SynergyClass, SynergyResult};

#[derive(Debug, Clone, Serialize)]
pub struct RankedStat {
    pub rank: usize,
    pub archetype_id: String,
    pub name: String,
    pub average_score: f64,
    pub marginal_utility: f64,
    pub standard_deviation: f64,
}

/// Single-stat archetypes ordered by descending marginal utility, ties broken by id.
pub fn rank_by_marginal_utility(results: &[MarginalUtilityResult]) -> Vec<RankedStat> {
    let mut singles: Vec<&MarginalUtilityResult> = results
        .iter()
        .filter(|result| result.archetype.single_stat().is_some())
        .collect();

    singles.sort_by(|left, right| {
        right
            .marginal_utility
            .total_cmp(&left.marginal_utility)
            .then_with(|| left.archetype.id.cmp(&right.archetype.id))
    });

    singles
        .into_iter()
        .enumerate()
        .map(|(index, result)| RankedStat {
            rank: index + 1,
            archetype_id: result.archetype.id.clone(),
            name: result.archetype.name.clone(),
            average_score: result.average_score,
            marginal_utility: result.marginal_utility,
            standard_deviation: result.standard_deviation,
        })
        .collect()
}

/// Synergies ordered by descending multiplier, ties broken by pair id.
pub fn rank_synergies(synergies: &[SynergyResult]) -> Vec<&SynergyResult> {
    let mut ranked: Vec<&SynergyResult> = synergies.iter().collect();
    ranked.sort_by(|left, right| {
        right
            .synergy_multiplier
            .total_cmp(&left.synergy_multiplier)
            .then_with(|| left.pair_archetype.id.cmp(&right.pair_archetype.id))
    });
    ranked
}

/// Synergies of one class, in input order.
pub fn synergies_of_class(synergies: &[SynergyResult], class: SynergyClass) -> Vec<&SynergyResult> {
    synergies
        .iter()
        .filter(|synergy| synergy.classification() == class)
        .collect()
}
