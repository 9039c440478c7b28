use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::archetype::DEFAULT_BOOST_SCALE;
use crate::error::CatalogError;

/// A tunable stat: the unit archetypes are built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Scales the perturbation magnitude. Non-negative.
    pub weight: f64,
    #[serde(default, alias = "defaultValue")]
    pub default_value: f64,
}

impl StatDefinition {
    pub fn new(id: impl Into<String>, weight: f64, default_value: f64) -> Self {
        Self {
            id: id.into(),
            label: None,
            weight,
            default_value,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Perturbation applied to this stat: `round(weight * boost_scale)`.
    pub fn boost(&self, boost_scale: f64) -> f64 {
        (self.weight * boost_scale).round()
    }

    /// Label for display; falls back to the id.
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.id,
        }
    }
}

/// Presentation grouping of stats (one "card" in the balancer UI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub id: String,
    pub label: String,
    #[serde(default, alias = "statIds")]
    pub stat_ids: Vec<String>,
}

/// Raw on-disk shape of a catalog, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub stats: Vec<StatDefinition>,
    #[serde(default)]
    pub cards: Vec<StatCard>,
}

/// Validated, ordered stat catalog.
///
/// Iteration order is the order the definitions were supplied in. Pair
/// archetypes name their stats in this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile", into = "CatalogFile")]
pub struct StatCatalog {
    stats: Vec<StatDefinition>,
    cards: Vec<StatCard>,
    index: HashMap<String, usize>,
}

impl StatCatalog {
    pub fn new(stats: Vec<StatDefinition>, cards: Vec<StatCard>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(stats.len());
        for (position, stat) in stats.iter().enumerate() {
            if !stat.weight.is_finite() {
                return Err(CatalogError::NonFiniteWeight {
                    id: stat.id.clone(),
                    weight: stat.weight,
                });
            }
            if stat.weight < 0.0 {
                return Err(CatalogError::NegativeWeight {
                    id: stat.id.clone(),
                    weight: stat.weight,
                });
            }
            if !stat.default_value.is_finite() {
                return Err(CatalogError::NonFiniteDefault {
                    id: stat.id.clone(),
                    value: stat.default_value,
                });
            }
            if index.insert(stat.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(stat.id.clone()));
            }
        }

        let catalog = Self {
            stats,
            cards,
            index,
        };
        catalog.check_boost_scale(DEFAULT_BOOST_SCALE)?;

        for card in &catalog.cards {
            if let Some(unknown) = card.stat_ids.iter().find(|id| !catalog.index.contains_key(*id)) {
                return Err(CatalogError::UnknownCardStat {
                    card: card.id.clone(),
                    stat: unknown.clone(),
                });
            }
        }

        Ok(catalog)
    }

    /// Every boost and boosted value stays finite at `boost_scale`.
    pub fn check_boost_scale(&self, boost_scale: f64) -> Result<(), CatalogError> {
        for stat in &self.stats {
            let boost = stat.boost(boost_scale);
            if !boost.is_finite() || !(stat.default_value + boost).is_finite() {
                return Err(CatalogError::BoostOverflow {
                    id: stat.id.clone(),
                    boost_scale,
                });
            }
        }
        Ok(())
    }

    pub fn from_stats(stats: Vec<StatDefinition>) -> Result<Self, CatalogError> {
        Self::new(stats, Vec::new())
    }

    /// Analysis runs reject empty catalogs; generation alone does not.
    pub fn ensure_non_empty(&self) -> Result<(), CatalogError> {
        if self.stats.is_empty() {
            Err(CatalogError::Empty)
        } else {
            Ok(())
        }
    }

    pub fn get(&self, stat_id: &str) -> Option<&StatDefinition> {
        self.index.get(stat_id).map(|&position| &self.stats[position])
    }

    pub fn position(&self, stat_id: &str) -> Option<usize> {
        self.index.get(stat_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatDefinition> {
        self.stats.iter()
    }

    pub fn stats(&self) -> &[StatDefinition] {
        &self.stats
    }

    pub fn stat_ids(&self) -> Vec<&str> {
        self.stats.iter().map(|stat| stat.id.as_str()).collect()
    }

    pub fn cards(&self) -> &[StatCard] {
        &self.cards
    }

    /// First card listing `stat_id`, if any.
    pub fn card_for(&self, stat_id: &str) -> Option<&StatCard> {
        self.cards
            .iter()
            .find(|card| card.stat_ids.iter().any(|id| id == stat_id))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Stats not covered by any card.
    pub fn ungrouped_stats(&self) -> Vec<&str> {
        let grouped: HashSet<&str> = self
            .cards
            .iter()
            .flat_map(|card| card.stat_ids.iter().map(String::as_str))
            .collect();
        self.stats
            .iter()
            .map(|stat| stat.id.as_str())
            .filter(|id| !grouped.contains(id))
            .collect()
    }
}

impl TryFrom<CatalogFile> for StatCatalog {
    type Error = CatalogError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        Self::new(file.stats, file.cards)
    }
}

impl From<StatCatalog> for CatalogFile {
    fn from(catalog: StatCatalog) -> Self {
        Self {
            stats: catalog.stats,
            cards: catalog.cards,
        }
    }
}
