use serde::Serialize;

/// Values with magnitude below this are treated as zero when dividing.
pub const EPSILON: f64 = 1e-9;

/// Aggregate of the repeated scores of one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub average_score: f64,
    /// Sample standard deviation (divisor `n - 1`); 0 for a single sample.
    pub standard_deviation: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub samples: usize,
}

impl ScoreSummary {
    pub fn from_scores(scores: &[f64]) -> Self {
        let samples = scores.len();
        if samples == 0 {
            return Self {
                average_score: 0.0,
                standard_deviation: 0.0,
                min_score: 0.0,
                max_score: 0.0,
                samples,
            };
        }

        let average_score = scores.iter().sum::<f64>() / samples as f64;
        let standard_deviation = if samples < 2 {
            0.0
        } else {
            let squared: f64 = scores
                .iter()
                .map(|score| (score - average_score).powi(2))
                .sum();
            (squared / (samples - 1) as f64).sqrt()
        };
        let min_score = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            average_score,
            standard_deviation,
            min_score,
            max_score,
            samples,
        }
    }

    /// Standard error of the mean.
    pub fn standard_error(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.standard_deviation / (self.samples as f64).sqrt()
        }
    }
}

/// Percent change of `average` over `baseline`. A zero baseline yields 0 rather than a
/// non-finite value.
pub fn marginal_utility(average: f64, baseline: f64) -> f64 {
    if baseline.abs() < EPSILON {
        return 0.0;
    }
    (average - baseline) / baseline * 100.0
}
