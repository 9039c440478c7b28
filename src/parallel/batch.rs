//! Splitting an archetype set into progress-reporting slices.

use std::slice::Chunks;

use crate::archetype::Archetype;

/// Consecutive slices of `archetypes`, at most `max_batches` of them, each holding
/// `ceil(total / max_batches)` archetypes except possibly the last. A run that reports after
/// every slice therefore reports at most `max_batches` times, in input order.
pub fn archetype_batches(archetypes: &[Archetype], max_batches: usize) -> Chunks<'_, Archetype> {
    let batch_size = archetypes.len().div_ceil(max_batches.max(1)).max(1);
    archetypes.chunks(batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeGenerator;
    use crate::catalog::{StatCatalog, StatDefinition};

    fn archetypes(stat_count: usize) -> Vec<Archetype> {
        let stats = (0..stat_count)
            .map(|i| StatDefinition::new(format!("s{i}"), 1.0, 0.0))
            .collect();
        let catalog = StatCatalog::from_stats(stats).unwrap();
        ArchetypeGenerator::new(&catalog).generate_all()
    }

    #[test]
    fn batches_cover_every_archetype_once_in_order() {
        // 1 + 8 + 28 archetypes.
        let all = archetypes(8);
        let batches: Vec<&[Archetype]> = archetype_batches(&all, 20).collect();
        assert!(batches.len() <= 20);
        let flattened: Vec<&str> = batches
            .iter()
            .flat_map(|batch| batch.iter().map(|a| a.id.as_str()))
            .collect();
        let expected: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn small_sets_report_after_each_archetype() {
        // Baseline plus one single.
        let all = archetypes(1);
        let sizes: Vec<usize> = archetype_batches(&all, 20).map(<[Archetype]>::len).collect();
        assert_eq!(sizes, vec![1, 1]);
    }

    #[test]
    fn only_the_last_batch_is_short() {
        // 1 + 4 + 6 = 11 archetypes in at most 3 batches of 4.
        let all = archetypes(4);
        let sizes: Vec<usize> = archetype_batches(&all, 3).map(<[Archetype]>::len).collect();
        assert_eq!(sizes, vec![4, 4, 3]);
    }

    #[test]
    fn zero_batches_falls_back_to_one() {
        let all = archetypes(3);
        assert_eq!(archetype_batches(&all, 0).count(), 1);
        assert_eq!(archetype_batches(&[], 5).count(), 0);
    }
}
