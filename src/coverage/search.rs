use rand::RngCore;
use tracing::debug;

use super::eligibility::{previous_coverer, EligibilityRules};
use super::rng::pick_index;
use super::scorer::Scorer;
use super::types::{Assignment, Cover, CoverageSlot};

/// Best assignment found by the search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub assignment: Assignment,
    pub counts: Vec<u32>,
    pub penalty: f64,
}

/// Greedy construction followed by hill climbing over single-slot
/// reassignments, repeated over several restarts.
pub struct LocalSearch<'a> {
    slots: &'a [CoverageSlot],
    rules: &'a EligibilityRules<'a>,
    scorer: &'a Scorer,
    target: u32,
    roster_len: usize,
}

impl<'a> LocalSearch<'a> {
    pub fn new(
        slots: &'a [CoverageSlot],
        rules: &'a EligibilityRules<'a>,
        scorer: &'a Scorer,
        target: u32,
        roster_len: usize,
    ) -> Self {
        Self {
            slots,
            rules,
            scorer,
            target,
            roster_len,
        }
    }

    /// Runs `restarts` construct-then-improve cycles on one shared stream and
    /// keeps the lowest penalty. A restart count of zero still runs once.
    pub fn run<R: RngCore + ?Sized>(&self, rng: &mut R, iterations: usize, restarts: usize) -> SearchOutcome {
        if self.slots.is_empty() {
            return SearchOutcome {
                assignment: Vec::new(),
                counts: vec![0; self.roster_len],
                penalty: 0.0,
            };
        }

        let mut best = self.climb(rng, iterations);
        debug!(restart = 0, penalty = best.penalty, "restart finished");

        for restart in 1..restarts.max(1) {
            let outcome = self.climb(rng, iterations);
            debug!(restart, penalty = outcome.penalty, "restart finished");
            if outcome.penalty < best.penalty {
                best = outcome;
            }
        }

        best
    }

    fn climb<R: RngCore + ?Sized>(&self, rng: &mut R, iterations: usize) -> SearchOutcome {
        let mut current = self.construct(rng);
        let mut evaluation = self.scorer.evaluate(&current);

        for _ in 0..iterations {
            let Some(candidate) = self.propose(rng, &current) else {
                continue;
            };

            let candidate_eval = self.scorer.evaluate(&candidate);
            // Ties are accepted so the search can drift across plateaus
            if candidate_eval.penalty <= evaluation.penalty {
                current = candidate;
                evaluation = candidate_eval;
            }
        }

        SearchOutcome {
            assignment: current,
            counts: evaluation.counts,
            penalty: evaluation.penalty,
        }
    }

    /// Greedy pass in slot order. Candidates under target are preferred, then
    /// the least loaded so far; remaining ties go to the random stream.
    pub fn construct<R: RngCore + ?Sized>(&self, rng: &mut R) -> Assignment {
        let mut running = vec![0u32; self.roster_len];
        let mut assignment: Assignment = Vec::with_capacity(self.slots.len());

        for (index, slot) in self.slots.iter().enumerate() {
            let previous = previous_coverer(&assignment, index);
            let Some((tier, candidates)) = self.rules.first_eligible(slot, previous) else {
                assignment.push(None);
                continue;
            };

            let under: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&c| running[c] < self.target)
                .collect();
            let pool = if under.is_empty() { candidates } else { under };

            let lightest = pool.iter().map(|&c| running[c]).min().unwrap_or(0);
            let tied: Vec<usize> = pool.into_iter().filter(|&c| running[c] == lightest).collect();
            let person = if tied.len() == 1 {
                tied[0]
            } else {
                tied[pick_index(rng, tied.len())]
            };

            running[person] += 1;
            assignment.push(Some(Cover { person, tier }));
        }

        assignment
    }

    /// Reassigns one random slot, judging back-to-back against the current
    /// coverer of the slot before it. `None` when the slot has no candidates.
    fn propose<R: RngCore + ?Sized>(&self, rng: &mut R, current: &[Option<Cover>]) -> Option<Assignment> {
        let index = pick_index(rng, self.slots.len());
        let previous = previous_coverer(current, index);
        let (tier, candidates) = self.rules.first_eligible(&self.slots[index], previous)?;

        let person = candidates[pick_index(rng, candidates.len())];
        let mut next = current.to_vec();
        next[index] = Some(Cover { person, tier });
        Some(next)
    }
}
