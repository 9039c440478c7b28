use crate::archetype::Archetype;
use crate::error::SimulationError;

/// One simulated encounter for an archetype, reduced to a scalar performance score.
///
/// The analyzer calls `score` thousands of times per run and passes a distinct `seed` per
/// repetition; implementations that draw randomness must derive it from that seed so runs are
/// reproducible. Implementations that are also `Sync` may be scored in parallel.
pub trait Simulator {
    fn score(&self, archetype: &Archetype, seed: u64) -> Result<f64, SimulationError>;
}

impl<F> Simulator for F
where
    F: Fn(&Archetype, u64) -> Result<f64, SimulationError>,
{
    fn score(&self, archetype: &Archetype, seed: u64) -> Result<f64, SimulationError> {
        self(archetype, seed)
    }
}
