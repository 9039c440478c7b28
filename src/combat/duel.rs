//! Reference combat simulator: a seeded, round-based duel between an archetype and a fixed
//! opponent. Reads stats `hp`, `damage`, `defense`, `crit_chance` (percent), `crit_damage`
//! (bonus percent over the base 1.5x) and `speed`; stats the catalog lacks read as 0.

use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::combat::rng::{hash_identifier, Rng};
use crate::combat::simulator::Simulator;
use crate::error::SimulationError;

pub const DEFAULT_MAX_ROUNDS: u32 = 30;
const BASE_CRIT_MULTIPLIER: f64 = 1.5;
const DAMAGE_VARIANCE: (f64, f64) = (0.85, 1.15);
const MAX_EXTRA_ATTACK_CHANCE: f64 = 0.5;
/// Share of the opponent's hp awarded as a bonus for winning.
const WIN_BONUS_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    pub name: String,
    pub hp: f64,
    pub damage: f64,
    pub defense: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub crit_chance: f64,
}

impl Default for Opponent {
    fn default() -> Self {
        Self {
            name: "sparring_champion".to_string(),
            hp: 300.0,
            damage: 30.0,
            defense: 30.0,
            speed: 10.0,
            crit_chance: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Fighter {
    hp: f64,
    damage: f64,
    defense: f64,
    speed: f64,
    crit_chance: f64,
    crit_multiplier: f64,
}

impl Fighter {
    fn from_archetype(archetype: &Archetype) -> Self {
        Self {
            hp: archetype.stat("hp"),
            damage: archetype.stat("damage").max(0.0),
            defense: archetype.stat("defense"),
            speed: archetype.stat("speed"),
            crit_chance: archetype.stat("crit_chance") / 100.0,
            crit_multiplier: BASE_CRIT_MULTIPLIER + archetype.stat("crit_damage") / 100.0,
        }
    }

    fn from_opponent(opponent: &Opponent) -> Self {
        Self {
            hp: opponent.hp,
            damage: opponent.damage.max(0.0),
            defense: opponent.defense,
            speed: opponent.speed,
            crit_chance: opponent.crit_chance / 100.0,
            crit_multiplier: BASE_CRIT_MULTIPLIER,
        }
    }
}

/// Outcome of one duel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DuelOutcome {
    pub won: bool,
    pub rounds: u32,
    pub damage_dealt: f64,
    pub hp_remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelSimulator {
    #[serde(default)]
    pub opponent: Opponent,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

impl Default for DuelSimulator {
    fn default() -> Self {
        Self {
            opponent: Opponent::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// Fraction of incoming damage absorbed: `d / (d + 100)`, 0 for non-positive defense.
pub fn defense_mitigation(defense: f64) -> f64 {
    let defense = defense.max(0.0);
    defense / (defense + 100.0)
}

fn strike(rng: &mut Rng, attacker: &Fighter, defender: &Fighter) -> f64 {
    let mut hit = attacker.damage * rng.range(DAMAGE_VARIANCE.0, DAMAGE_VARIANCE.1);
    if rng.chance(attacker.crit_chance) {
        hit *= attacker.crit_multiplier;
    }
    hit * (1.0 - defense_mitigation(defender.defense))
}

fn extra_attack_chance(attacker: &Fighter, defender: &Fighter) -> f64 {
    ((attacker.speed - defender.speed).max(0.0) / 100.0).min(MAX_EXTRA_ATTACK_CHANCE)
}

impl DuelSimulator {
    pub fn new(opponent: Opponent, max_rounds: u32) -> Self {
        Self {
            opponent,
            max_rounds,
        }
    }

    pub fn duel(&self, archetype: &Archetype, seed: u64) -> DuelOutcome {
        let mut rng = Rng::new(seed ^ hash_identifier(&self.opponent.name));
        let mut hero = Fighter::from_archetype(archetype);
        let mut foe = Fighter::from_opponent(&self.opponent);
        let opening_hp = foe.hp;

        let hero_first = hero.speed + rng.range(0.0, 10.0) >= foe.speed + rng.range(0.0, 10.0);
        let hero_extra = extra_attack_chance(&hero, &foe);
        let foe_extra = extra_attack_chance(&foe, &hero);

        let mut damage_dealt = 0.0;
        let mut rounds = 0;
        while rounds < self.max_rounds && hero.hp > 0.0 && foe.hp > 0.0 {
            rounds += 1;
            for hero_turn in [hero_first, !hero_first] {
                if hero.hp <= 0.0 || foe.hp <= 0.0 {
                    break;
                }
                if hero_turn {
                    let swings = if rng.chance(hero_extra) { 2 } else { 1 };
                    for _ in 0..swings {
                        let dealt = strike(&mut rng, &hero, &foe).min(foe.hp.max(0.0));
                        foe.hp -= dealt;
                        damage_dealt += dealt;
                    }
                } else {
                    let swings = if rng.chance(foe_extra) { 2 } else { 1 };
                    for _ in 0..swings {
                        hero.hp -= strike(&mut rng, &foe, &hero);
                    }
                }
            }
        }

        DuelOutcome {
            won: foe.hp <= 0.0 && opening_hp > 0.0,
            rounds,
            damage_dealt,
            hp_remaining: hero.hp.max(0.0),
        }
    }
}

impl Simulator for DuelSimulator {
    fn score(&self, archetype: &Archetype, seed: u64) -> Result<f64, SimulationError> {
        let outcome = self.duel(archetype, seed);
        let bonus = if outcome.won {
            self.opponent.hp * WIN_BONUS_FRACTION
        } else {
            0.0
        };
        let score = outcome.damage_dealt + outcome.hp_remaining + bonus;
        if score.is_finite() {
            Ok(score)
        } else {
            Err(SimulationError::NonFinite(score))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeGenerator;
    use crate::catalog::default_catalog;

    fn baseline() -> Archetype {
        ArchetypeGenerator::new(&default_catalog()).generate_baseline()
    }

    #[test]
    fn mitigation_is_bounded() {
        assert_eq!(defense_mitigation(-50.0), 0.0);
        assert_eq!(defense_mitigation(100.0), 0.5);
        assert!(defense_mitigation(1e12) < 1.0);
    }

    #[test]
    fn same_seed_same_outcome() {
        let sim = DuelSimulator::default();
        let archetype = baseline();
        assert_eq!(sim.duel(&archetype, 11), sim.duel(&archetype, 11));
        assert_eq!(sim.score(&archetype, 11), sim.score(&archetype, 11));
    }

    #[test]
    fn duel_respects_round_limit() {
        let sim = DuelSimulator::new(
            Opponent {
                hp: 1e9,
                damage: 0.0,
                ..Opponent::default()
            },
            5,
        );
        let outcome = sim.duel(&baseline(), 3);
        assert_eq!(outcome.rounds, 5);
        assert!(!outcome.won);
    }

    #[test]
    fn stronger_damage_scores_higher_on_average() {
        let catalog = default_catalog();
        let generator = ArchetypeGenerator::new(&catalog);
        let base = generator.generate_baseline();
        let boosted = generator
            .generate_singles()
            .into_iter()
            .find(|a| a.id == "single_damage")
            .unwrap();
        let sim = DuelSimulator::default();
        let mean = |a: &Archetype| {
            (0..500u64).map(|s| sim.score(a, s).unwrap()).sum::<f64>() / 500.0
        };
        assert!(mean(&boosted) > mean(&base));
    }

    #[test]
    fn empty_archetype_scores_zero_without_error() {
        let empty = ArchetypeGenerator::new(&crate::catalog::StatCatalog::from_stats(Vec::new()).unwrap())
            .generate_baseline();
        let score = DuelSimulator::default().score(&empty, 1).unwrap();
        assert_eq!(score, 0.0);
    }
}
