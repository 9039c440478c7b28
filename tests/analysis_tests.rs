use balance_lab::analysis::{
    rank_by_marginal_utility, AnalysisReport, StressTest, SynergyClass, UtilityAnalyzer,
};
use balance_lab::archetype::{Archetype, ArchetypeGenerator};
use balance_lab::catalog::{default_catalog, StatCatalog, StatDefinition};
use balance_lab::combat::DuelSimulator;
use balance_lab::config::AnalysisConfig;
use balance_lab::error::{AnalysisError, SimulationError};

fn two_stat_catalog() -> StatCatalog {
    StatCatalog::from_stats(vec![
        StatDefinition::new("a", 1.0, 10.0),
        StatDefinition::new("b", 1.0, 10.0),
    ])
    .expect("catalog should validate")
}

/// Runs a full analysis where every archetype scores a fixed value looked up by id.
fn analyze_fixed(scores: &[(&str, f64)]) -> AnalysisReport {
    let catalog = two_stat_catalog();
    let archetypes = ArchetypeGenerator::new(&catalog).generate_all();
    let sim = |archetype: &Archetype, _: u64| -> Result<f64, SimulationError> {
        scores
            .iter()
            .find(|(id, _)| *id == archetype.id)
            .map(|(_, score)| *score)
            .ok_or_else(|| SimulationError::Failed(format!("no score for {}", archetype.id)))
    };
    let analyzer = UtilityAnalyzer::new(&sim, AnalysisConfig::default().with_repetitions(3))
        .expect("config should validate");
    analyzer
        .run_full_analysis(&archetypes)
        .expect("analysis should succeed")
}

#[test]
fn marginal_utility_is_percent_change_over_baseline() {
    let report = analyze_fixed(&[
        ("baseline", 100.0),
        ("single_a", 110.0),
        ("single_b", 80.0),
        ("pair_a_b", 95.0),
    ]);
    assert_eq!(report.baseline_score, 100.0);
    assert_eq!(report.marginal_utility_for("baseline").unwrap().marginal_utility, 0.0);
    assert_eq!(report.marginal_utility_for("single_a").unwrap().marginal_utility, 10.0);
    assert_eq!(report.marginal_utility_for("single_b").unwrap().marginal_utility, -20.0);
    assert_eq!(report.marginal_utility_for("pair_a_b").unwrap().marginal_utility, -5.0);
    assert_eq!(report.marginal_utility_for("single_a").unwrap().standard_deviation, 0.0);
}

#[test]
fn results_keep_input_order() {
    let report = analyze_fixed(&[
        ("baseline", 100.0),
        ("single_a", 110.0),
        ("single_b", 110.0),
        ("pair_a_b", 120.0),
    ]);
    let ids: Vec<&str> = report
        .marginal_utilities
        .iter()
        .map(|r| r.archetype.id.as_str())
        .collect();
    assert_eq!(ids, vec!["baseline", "single_a", "single_b", "pair_a_b"]);
}

#[test]
fn op_threshold_is_strict() {
    let at_threshold = analyze_fixed(&[
        ("baseline", 100.0),
        ("single_a", 110.0),
        ("single_b", 110.0),
        ("pair_a_b", 123.0),
    ]);
    let synergy = at_threshold.synergy_for("a", "b").unwrap();
    assert_eq!(synergy.synergy_multiplier, 1.15);
    assert!(!synergy.is_op_synergy);
    assert!(!synergy.is_weak_synergy);

    let above = analyze_fixed(&[
        ("baseline", 100.0),
        ("single_a", 110.0),
        ("single_b", 110.0),
        ("pair_a_b", 130.0),
    ]);
    let synergy = above.synergy_for("b", "a").unwrap();
    assert_eq!(synergy.synergy_multiplier, 1.5);
    assert!(synergy.is_op_synergy);
    assert_eq!(synergy.classification(), SynergyClass::Op);
    assert_eq!(above.op_synergies().count(), 1);
}

#[test]
fn weak_threshold_is_strict() {
    let at_threshold = analyze_fixed(&[
        ("baseline", 100.0),
        ("single_a", 110.0),
        ("single_b", 110.0),
        ("pair_a_b", 119.0),
    ]);
    let synergy = at_threshold.synergy_for("a", "b").unwrap();
    assert_eq!(synergy.synergy_multiplier, 0.95);
    assert!(!synergy.is_weak_synergy);

    let below = analyze_fixed(&[
        ("baseline", 100.0),
        ("single_a", 110.0),
        ("single_b", 110.0),
        ("pair_a_b", 110.0),
    ]);
    let synergy = below.synergy_for("a", "b").unwrap();
    assert_eq!(synergy.synergy_multiplier, 0.5);
    assert!(synergy.is_weak_synergy);
    assert!(!synergy.is_op_synergy);
    assert_eq!(below.weak_synergies().count(), 1);
}

#[test]
fn zero_baseline_reports_zero_utility() {
    let report = analyze_fixed(&[
        ("baseline", 0.0),
        ("single_a", 5.0),
        ("single_b", -5.0),
        ("pair_a_b", 3.0),
    ]);
    for result in &report.marginal_utilities {
        assert_eq!(result.marginal_utility, 0.0, "{}", result.archetype.id);
        assert!(result.marginal_utility.is_finite());
    }
}

#[test]
fn zero_expected_delta_is_neutral() {
    let report = analyze_fixed(&[
        ("baseline", 100.0),
        ("single_a", 100.0),
        ("single_b", 100.0),
        ("pair_a_b", 140.0),
    ]);
    let synergy = report.synergy_for("a", "b").unwrap();
    assert_eq!(synergy.expected_delta, 0.0);
    assert_eq!(synergy.actual_delta, 40.0);
    assert_eq!(synergy.synergy_multiplier, 1.0);
    assert_eq!(synergy.classification(), SynergyClass::Neutral);
}

#[test]
fn simulation_failure_names_archetype_and_repetition() {
    let catalog = two_stat_catalog();
    let archetypes = ArchetypeGenerator::new(&catalog).generate_all();
    let sim = |archetype: &Archetype, seed: u64| -> Result<f64, SimulationError> {
        if archetype.id == "single_b" && seed == 2 {
            Err(SimulationError::Failed("engine exploded".to_string()))
        } else {
            Ok(50.0)
        }
    };
    let analyzer =
        UtilityAnalyzer::new(&sim, AnalysisConfig::default().with_repetitions(5)).unwrap();
    match analyzer.run_full_analysis(&archetypes) {
        Err(AnalysisError::Simulation {
            archetype_id,
            repetition,
            ..
        }) => {
            assert_eq!(archetype_id, "single_b");
            assert_eq!(repetition, 2);
        }
        other => panic!("expected simulation error, got {other:?}"),
    }
}

#[test]
fn non_finite_score_aborts_analysis() {
    let catalog = two_stat_catalog();
    let archetypes = ArchetypeGenerator::new(&catalog).generate_all();
    let cases = [("single_a", f64::NAN), ("pair_a_b", f64::INFINITY)];
    for (failing_id, bad_score) in cases {
        let sim = |archetype: &Archetype, _: u64| -> Result<f64, SimulationError> {
            if archetype.id == failing_id {
                Ok(bad_score)
            } else {
                Ok(1.0)
            }
        };
        let analyzer =
            UtilityAnalyzer::new(&sim, AnalysisConfig::default().with_repetitions(2)).unwrap();
        match analyzer.run_full_analysis(&archetypes) {
            Err(AnalysisError::Simulation {
                archetype_id,
                repetition,
                source: SimulationError::NonFinite(_),
            }) => {
                assert_eq!(archetype_id, failing_id);
                assert_eq!(repetition, 0);
            }
            other => panic!("expected non-finite rejection for {failing_id}, got {other:?}"),
        }
    }
}

#[test]
fn reports_never_contain_non_finite_values() {
    let test = StressTest::new(default_catalog(), AnalysisConfig::default().with_repetitions(15));
    let report = test.run(&DuelSimulator::default()).unwrap();
    for result in &report.marginal_utilities {
        assert!(result.average_score.is_finite());
        assert!(result.marginal_utility.is_finite());
        assert!(result.standard_deviation.is_finite());
    }
    for synergy in &report.synergies {
        assert!(synergy.synergy_multiplier.is_finite());
        assert!(synergy.expected_delta.is_finite());
        assert!(synergy.actual_delta.is_finite());
    }
}

#[test]
fn analysis_is_deterministic_for_a_fixed_seed() {
    let test = StressTest::new(
        default_catalog(),
        AnalysisConfig::default().with_repetitions(40).with_seed(11),
    );
    let simulator = DuelSimulator::default();
    let first = test.run(&simulator).unwrap();
    let second = test.run(&simulator).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallel_matches_sequential() {
    let sequential = StressTest::new(
        default_catalog(),
        AnalysisConfig::default().with_repetitions(30).with_seed(3),
    );
    let parallel = StressTest::new(
        default_catalog(),
        AnalysisConfig::default()
            .with_repetitions(30)
            .with_seed(3)
            .with_parallel(2),
    );
    let simulator = DuelSimulator::default();
    let a = sequential.run(&simulator).unwrap();
    let b = parallel.run_concurrent(&simulator).unwrap();
    assert_eq!(a, b);
}

#[test]
fn default_catalog_report_has_one_synergy_per_pair() {
    let test = StressTest::new(default_catalog(), AnalysisConfig::default().with_repetitions(20));
    let report = test.run(&DuelSimulator::default()).unwrap();
    assert_eq!(report.marginal_utilities.len(), 1 + 5 + 10);
    assert_eq!(report.synergies.len(), 10);
    assert!(report.baseline_score > 0.0);
    for synergy in &report.synergies {
        assert!(synergy.synergy_multiplier.is_finite());
        assert!(!(synergy.is_op_synergy && synergy.is_weak_synergy));
    }

    let ranking = rank_by_marginal_utility(&report.marginal_utilities);
    assert_eq!(ranking.len(), 5);
    for window in ranking.windows(2) {
        assert!(window[0].marginal_utility >= window[1].marginal_utility);
    }
}

#[test]
fn empty_catalog_cannot_be_analyzed() {
    let test = StressTest::new(
        StatCatalog::from_stats(Vec::new()).unwrap(),
        AnalysisConfig::default(),
    );
    let err = test.run(&DuelSimulator::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidCatalog(_)));
}
