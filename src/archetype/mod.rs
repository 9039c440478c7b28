pub mod generator;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub use generator::{ArchetypeGenerator, DEFAULT_BOOST_SCALE};

pub const BASELINE_ID: &str = "baseline";

/// Ordered stat-id → value vector. Reads of unknown ids yield 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatVector {
    entries: Vec<(String, f64)>,
}

impl StatVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat_id: &str) -> f64 {
        self.entries
            .iter()
            .find(|(id, _)| id == stat_id)
            .map(|(_, value)| *value)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, stat_id: &str) -> bool {
        self.entries.iter().any(|(id, _)| id == stat_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(id, value)| (id.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids whose value differs from `other`.
    pub fn differing_stats<'a>(&'a self, other: &StatVector) -> Vec<&'a str> {
        self.iter()
            .filter(|(id, value)| other.get(id) != *value)
            .map(|(id, _)| id)
            .collect()
    }

    fn push(&mut self, stat_id: impl Into<String>, value: f64) {
        self.entries.push((stat_id.into(), value));
    }

    fn add(&mut self, stat_id: &str, delta: f64) {
        if let Some((_, value)) = self.entries.iter_mut().find(|(id, _)| id == stat_id) {
            *value += delta;
        }
    }
}

impl FromIterator<(String, f64)> for StatVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut stats = StatVector::new();
        for (id, value) in iter {
            stats.push(id, value);
        }
        stats
    }
}

impl Serialize for StatVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

/// How an archetype deviates from the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArchetypeKind {
    Baseline,
    Single { stat_id: String, boost: f64 },
    Pair { first: String, second: String },
}

impl ArchetypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Single { .. } => "single",
            Self::Pair { .. } => "pair",
        }
    }
}

/// A fully specified stat vector used as simulation input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Archetype {
    pub id: String,
    pub name: String,
    pub kind: ArchetypeKind,
    pub stats: StatVector,
}

impl Archetype {
    pub fn is_baseline(&self) -> bool {
        matches!(self.kind, ArchetypeKind::Baseline)
    }

    pub fn stat(&self, stat_id: &str) -> f64 {
        self.stats.get(stat_id)
    }

    /// The single stat this archetype boosts, if it is a single.
    pub fn single_stat(&self) -> Option<&str> {
        match &self.kind {
            ArchetypeKind::Single { stat_id, .. } => Some(stat_id),
            _ => None,
        }
    }

    /// The two stats this archetype boosts, in catalog order, if it is a pair.
    pub fn pair_stats(&self) -> Option<(&str, &str)> {
        match &self.kind {
            ArchetypeKind::Pair { first, second } => Some((first, second)),
            _ => None,
        }
    }
}
