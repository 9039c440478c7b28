use crate::archetype::{Archetype, ArchetypeKind, StatVector, BASELINE_ID};
use crate::catalog::{StatCatalog, StatDefinition};

/// Boost applied to a stat is `round(weight * scale)`.
pub const DEFAULT_BOOST_SCALE: f64 = 25.0;

/// Enumerates the stress-test archetype set for a catalog: one baseline, one single per
/// stat and one pair per unordered stat pair, all in catalog order.
#[derive(Debug, Clone)]
pub struct ArchetypeGenerator<'a> {
    catalog: &'a StatCatalog,
    boost_scale: f64,
}

impl<'a> ArchetypeGenerator<'a> {
    pub fn new(catalog: &'a StatCatalog) -> Self {
        Self {
            catalog,
            boost_scale: DEFAULT_BOOST_SCALE,
        }
    }

    pub fn with_boost_scale(catalog: &'a StatCatalog, boost_scale: f64) -> Self {
        Self {
            catalog,
            boost_scale,
        }
    }

    /// Weights are validated non-negative, so `f64::round` (half away from zero) is half-up here.
    /// Values stay finite when [StatCatalog::check_boost_scale] passes for this scale.
    pub fn boost_for(&self, stat: &StatDefinition) -> f64 {
        stat.boost(self.boost_scale)
    }

    pub fn generate_baseline(&self) -> Archetype {
        Archetype {
            id: BASELINE_ID.to_string(),
            name: "Baseline".to_string(),
            kind: ArchetypeKind::Baseline,
            stats: self.baseline_stats(),
        }
    }

    pub fn generate_singles(&self) -> Vec<Archetype> {
        self.catalog
            .iter()
            .map(|stat| {
                let boost = self.boost_for(stat);
                let mut stats = self.baseline_stats();
                stats.add(&stat.id, boost);
                Archetype {
                    id: format!("single_{}", stat.id),
                    name: format!("{} +{}", stat.display_label(), boost),
                    kind: ArchetypeKind::Single {
                        stat_id: stat.id.clone(),
                        boost,
                    },
                    stats,
                }
            })
            .collect()
    }

    pub fn generate_pairs(&self) -> Vec<Archetype> {
        let stats = self.catalog.stats();
        let n = stats.len();
        let mut pairs = Vec::with_capacity(pair_count(n));
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push(self.pair(&stats[i], &stats[j]));
            }
        }
        pairs
    }

    /// `[baseline, ...singles, ...pairs]`, `1 + n + C(n, 2)` archetypes.
    pub fn generate_all(&self) -> Vec<Archetype> {
        let n = self.catalog.len();
        let mut all = Vec::with_capacity(1 + n + pair_count(n));
        all.push(self.generate_baseline());
        all.extend(self.generate_singles());
        all.extend(self.generate_pairs());
        all
    }

    fn pair(&self, first: &StatDefinition, second: &StatDefinition) -> Archetype {
        let first_boost = self.boost_for(first);
        let second_boost = self.boost_for(second);
        let mut stats = self.baseline_stats();
        stats.add(&first.id, first_boost);
        stats.add(&second.id, second_boost);
        Archetype {
            id: format!("pair_{}_{}", first.id, second.id),
            name: format!(
                "{} +{} & {} +{}",
                first.display_label(),
                first_boost,
                second.display_label(),
                second_boost
            ),
            kind: ArchetypeKind::Pair {
                first: first.id.clone(),
                second: second.id.clone(),
            },
            stats,
        }
    }

    fn baseline_stats(&self) -> StatVector {
        self.catalog
            .iter()
            .map(|stat| (stat.id.clone(), stat.default_value))
            .collect()
    }
}

pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}
