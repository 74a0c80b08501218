use crate::config::PenaltyWeights;

use super::types::Cover;

/// Penalty of an assignment and the per-person counts it implies
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub penalty: f64,
    /// Covered slots per roster index
    pub counts: Vec<u32>,
}

/// Fitness function of the search. Lower is better.
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: PenaltyWeights,
    target: u32,
    roster_len: usize,
}

impl Scorer {
    pub fn new(weights: PenaltyWeights, target: u32, roster_len: usize) -> Self {
        Self {
            weights,
            target,
            roster_len,
        }
    }

    pub fn evaluate(&self, assignment: &[Option<Cover>]) -> Evaluation {
        let mut counts = vec![0u32; self.roster_len];
        let mut penalty = 0.0;

        for entry in assignment {
            match entry {
                None => penalty += self.weights.uncovered,
                Some(cover) => {
                    counts[cover.person] += 1;
                    // Independent per-flag additions: the loosest tier pays both
                    if cover.tier.relaxes_same_weekday() {
                        penalty += self.weights.relaxed_same_weekday;
                    }
                    if cover.tier.relaxes_back_to_back() {
                        penalty += self.weights.relaxed_back_to_back;
                    }
                }
            }
        }

        let target = f64::from(self.target);
        for &count in &counts {
            let deviation = f64::from(count) - target;
            penalty += deviation * deviation * self.weights.load_deviation;
        }

        penalty += population_variance(&counts) * self.weights.variance;

        Evaluation { penalty, counts }
    }
}

fn population_variance(counts: &[u32]) -> f64 {
    let n = counts.len().max(1) as f64;
    let mean = counts.iter().map(|&c| f64::from(c)).sum::<f64>() / n;
    counts
        .iter()
        .map(|&c| {
            let d = f64::from(c) - mean;
            d * d
        })
        .sum::<f64>()
        / n
}
