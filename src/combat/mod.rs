pub mod duel;
pub mod rng;
pub mod simulator;

pub use duel::{defense_mitigation, DuelOutcome, DuelSimulator, Opponent, DEFAULT_MAX_ROUNDS};
pub use rng::{hash_identifier, Rng};
pub use simulator::Simulator;
