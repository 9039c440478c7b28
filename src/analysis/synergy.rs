//! Pairwise synergy: how far a pair's combined effect departs from the sum of its parts.

use std::collections::HashMap;

use serde::Serialize;

use crate::analysis::analyzer::MarginalUtilityResult;
use crate::analysis::stats::EPSILON;
use crate::archetype::Archetype;
use crate::config::{AnalysisConfig, DEFAULT_OP_THRESHOLD, DEFAULT_WEAK_THRESHOLD};
use crate::error::AnalysisError;

/// Multiplier reported when the expected combined delta is zero.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynergyThresholds {
    pub op: f64,
    pub weak: f64,
}

impl Default for SynergyThresholds {
    fn default() -> Self {
        Self {
            op: DEFAULT_OP_THRESHOLD,
            weak: DEFAULT_WEAK_THRESHOLD,
        }
    }
}

impl From<&AnalysisConfig> for SynergyThresholds {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            op: config.op_threshold,
            weak: config.weak_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynergyClass {
    Op,
    Weak,
    Neutral,
}

impl SynergyClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Op => "op",
            Self::Weak => "weak",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynergyResult {
    /// The pair in catalog order.
    pub stat_ids: [String; 2],
    pub pair_archetype: Archetype,
    pub synergy_multiplier: f64,
    pub is_op_synergy: bool,
    pub is_weak_synergy: bool,
    /// Sum of the two single-stat deltas over baseline.
    pub expected_delta: f64,
    /// Pair delta over baseline.
    pub actual_delta: f64,
}

impl SynergyResult {
    pub fn classification(&self) -> SynergyClass {
        if self.is_op_synergy {
            SynergyClass::Op
        } else if self.is_weak_synergy {
            SynergyClass::Weak
        } else {
            SynergyClass::Neutral
        }
    }

    /// Order-independent lookup key: the two ids sorted.
    pub fn stat_key(&self) -> (String, String) {
        let [a, b] = &self.stat_ids;
        if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }

    pub fn involves(&self, stat_id: &str) -> bool {
        self.stat_ids.iter().any(|id| id == stat_id)
    }
}

/// `actual / expected`, or [NEUTRAL_MULTIPLIER] when the expected delta is zero.
pub fn synergy_multiplier(actual_delta: f64, expected_delta: f64) -> f64 {
    if expected_delta.abs() < EPSILON {
        return NEUTRAL_MULTIPLIER;
    }
    actual_delta / expected_delta
}

/// Build synergy rows from scored archetypes. Needs the baseline and, for each pair, both of
/// its singles; pairs missing a single are skipped.
pub fn compute_synergies(
    results: &[MarginalUtilityResult],
    thresholds: SynergyThresholds,
) -> Result<Vec<SynergyResult>, AnalysisError> {
    let baseline = results
        .iter()
        .find(|result| result.archetype.is_baseline())
        .ok_or(AnalysisError::MissingBaseline)?
        .average_score;

    let single_deltas: HashMap<&str, f64> = results
        .iter()
        .filter_map(|result| {
            result
                .archetype
                .single_stat()
                .map(|stat_id| (stat_id, result.average_score - baseline))
        })
        .collect();

    let mut synergies = Vec::new();
    for result in results {
        let Some((first, second)) = result.archetype.pair_stats() else {
            continue;
        };
        let (Some(delta_first), Some(delta_second)) =
            (single_deltas.get(first), single_deltas.get(second))
        else {
            tracing::warn!(
                pair = %result.archetype.id,
                "skipping synergy: single-stat result missing for one side of the pair"
            );
            continue;
        };

        let expected_delta = delta_first + delta_second;
        let actual_delta = result.average_score - baseline;
        if expected_delta.abs() < EPSILON {
            tracing::debug!(
                pair = %result.archetype.id,
                "expected delta is zero; reporting neutral synergy"
            );
        }
        let multiplier = synergy_multiplier(actual_delta, expected_delta);

        synergies.push(SynergyResult {
            stat_ids: [first.to_string(), second.to_string()],
            pair_archetype: result.archetype.clone(),
            synergy_multiplier: multiplier,
            is_op_synergy: multiplier > thresholds.op,
            is_weak_synergy: multiplier < thresholds.weak,
            expected_delta,
            actual_delta,
        });
    }
    Ok(synergies)
}
