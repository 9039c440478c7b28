use std::collections::HashSet;

use balance_lab::archetype::{Archetype, ArchetypeGenerator, ArchetypeKind};
use balance_lab::catalog::{default_catalog, StatCatalog, StatDefinition};

fn combat_catalog() -> StatCatalog {
    StatCatalog::from_stats(vec![
        StatDefinition::new("hp", 1.0, 100.0),
        StatDefinition::new("damage", 2.0, 50.0),
        StatDefinition::new("defense", 1.5, 25.0),
    ])
    .expect("catalog should validate")
}

fn find<'a>(archetypes: &'a [Archetype], id: &str) -> &'a Archetype {
    archetypes
        .iter()
        .find(|a| a.id == id)
        .unwrap_or_else(|| panic!("missing archetype {id}"))
}

#[test]
fn combat_catalog_scenario() {
    let catalog = combat_catalog();
    let all = ArchetypeGenerator::new(&catalog).generate_all();
    assert_eq!(all.len(), 7);

    let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "baseline",
            "single_hp",
            "single_damage",
            "single_defense",
            "pair_hp_damage",
            "pair_hp_defense",
            "pair_damage_defense",
        ]
    );

    assert_eq!(find(&all, "single_hp").stat("hp"), 125.0);

    let pair = find(&all, "pair_hp_damage");
    assert_eq!(pair.stat("hp"), 125.0);
    assert_eq!(pair.stat("damage"), 100.0);
    assert_eq!(pair.stat("defense"), 25.0);

    // 1.5 * 25 = 37.5 rounds up.
    assert_eq!(find(&all, "single_defense").stat("defense"), 63.0);
}

#[test]
fn archetype_count_is_one_plus_n_plus_n_choose_two() {
    for n in 0..8usize {
        let stats = (0..n)
            .map(|i| StatDefinition::new(format!("s{i}"), 1.0, 0.0))
            .collect();
        let catalog = StatCatalog::from_stats(stats).unwrap();
        let all = ArchetypeGenerator::new(&catalog).generate_all();
        assert_eq!(all.len(), 1 + n + n * n.saturating_sub(1) / 2, "n = {n}");

        let unique: HashSet<&str> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(unique.len(), all.len(), "ids must be unique for n = {n}");
    }
}

#[test]
fn baseline_matches_defaults_exactly() {
    let catalog = default_catalog();
    let baseline = ArchetypeGenerator::new(&catalog).generate_baseline();
    assert_eq!(baseline.id, "baseline");
    assert_eq!(baseline.kind, ArchetypeKind::Baseline);
    assert_eq!(baseline.stats.len(), catalog.len());
    for stat in catalog.iter() {
        assert_eq!(baseline.stat(&stat.id), stat.default_value);
    }
    let order: Vec<&str> = baseline.stats.iter().map(|(id, _)| id).collect();
    assert_eq!(order, catalog.stat_ids());
}

#[test]
fn singles_differ_from_baseline_in_exactly_one_stat() {
    let catalog = default_catalog();
    let generator = ArchetypeGenerator::new(&catalog);
    let baseline = generator.generate_baseline();
    for (single, stat) in generator.generate_singles().iter().zip(catalog.iter()) {
        assert_eq!(single.id, format!("single_{}", stat.id));
        assert_eq!(single.stats.differing_stats(&baseline.stats), vec![stat.id.as_str()]);
        assert_eq!(
            single.stat(&stat.id) - baseline.stat(&stat.id),
            (stat.weight * 25.0).round()
        );
    }
}

#[test]
fn pairs_differ_in_exactly_two_stats_by_individual_boosts() {
    let catalog = default_catalog();
    let generator = ArchetypeGenerator::new(&catalog);
    let baseline = generator.generate_baseline();
    let pairs = generator.generate_pairs();
    assert_eq!(pairs.len(), 10);

    for pair in &pairs {
        let (first, second) = pair.pair_stats().expect("pair kind");
        assert!(catalog.position(first) < catalog.position(second));
        assert_eq!(pair.id, format!("pair_{first}_{second}"));

        let differing = pair.stats.differing_stats(&baseline.stats);
        assert_eq!(differing, vec![first, second]);
        for id in [first, second] {
            let weight = catalog.get(id).unwrap().weight;
            assert_eq!(pair.stat(id) - baseline.stat(id), (weight * 25.0).round());
        }
    }

    let unordered: HashSet<(String, String)> = pairs
        .iter()
        .map(|p| {
            let (a, b) = p.pair_stats().unwrap();
            if a < b {
                (a.to_string(), b.to_string())
            } else {
                (b.to_string(), a.to_string())
            }
        })
        .collect();
    assert_eq!(unordered.len(), pairs.len(), "no duplicate unordered pairs");
}

#[test]
fn zero_weight_single_equals_baseline_but_is_listed() {
    let catalog = StatCatalog::from_stats(vec![
        StatDefinition::new("hp", 1.0, 100.0),
        StatDefinition::new("cosmetic", 0.0, 7.0),
    ])
    .unwrap();
    let all = ArchetypeGenerator::new(&catalog).generate_all();
    let baseline = find(&all, "baseline");
    let cosmetic = find(&all, "single_cosmetic");
    assert_eq!(cosmetic.stats, baseline.stats);
    assert_eq!(cosmetic.name, "cosmetic +0");
    assert_eq!(all.len(), 4);
}

#[test]
fn empty_catalog_yields_only_baseline() {
    let catalog = StatCatalog::from_stats(Vec::new()).unwrap();
    let all = ArchetypeGenerator::new(&catalog).generate_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "baseline");
    assert!(all[0].stats.is_empty());
}

#[test]
fn pair_naming_follows_catalog_order_not_alphabetical() {
    let catalog = StatCatalog::from_stats(vec![
        StatDefinition::new("zeal", 1.0, 0.0),
        StatDefinition::new("armor", 1.0, 0.0),
    ])
    .unwrap();
    let pairs = ArchetypeGenerator::new(&catalog).generate_pairs();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].id, "pair_zeal_armor");
}

#[test]
fn generation_is_deterministic() {
    let catalog = default_catalog();
    let a = ArchetypeGenerator::new(&catalog).generate_all();
    let b = ArchetypeGenerator::new(&catalog).generate_all();
    assert_eq!(a, b);
}
