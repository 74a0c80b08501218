use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoverageError;

/// Rotations that keep someone from covering a clinic slot
pub const DEFAULT_FORBIDDEN_ROTATIONS: &[&str] = &[
    "Cath", "Cath 2", "Cath 3", "ICU", "Floor A", "Floor B", "Nights", "Vac", "Vacation",
];

/// Weights of the additive penalty the search minimizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    pub uncovered: f64,
    pub relaxed_same_weekday: f64,
    pub relaxed_back_to_back: f64,
    pub load_deviation: f64,
    pub variance: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            uncovered: 5000.0,
            relaxed_same_weekday: 150.0,
            relaxed_back_to_back: 80.0,
            load_deviation: 25.0,
            variance: 10.0,
        }
    }
}

/// Knobs of a single optimizer run. Every field has a default so partial
/// JSON bodies deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Rotation label that marks the absent person for a period
    pub trigger_rotation: String,
    pub forbidden_rotations: Vec<String>,
    pub junior_level: u8,
    /// Junior level is excluded for period numbers at or below this
    pub junior_exclusion_period: u32,
    pub senior_level: u8,
    /// Senior level is excluded for period numbers at or above this
    pub senior_exclusion_period: u32,
    pub target_per_person: u32,
    pub seed: u64,
    pub iterations: usize,
    pub restarts: usize,
    pub weights: PenaltyWeights,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            trigger_rotation: "Nights".to_string(),
            forbidden_rotations: DEFAULT_FORBIDDEN_ROTATIONS
                .iter()
                .map(|r| r.to_string())
                .collect(),
            junior_level: 4,
            junior_exclusion_period: 4,
            senior_level: 6,
            senior_exclusion_period: 21,
            target_per_person: 4,
            seed: 7,
            iterations: 200,
            restarts: 3,
            weights: PenaltyWeights::default(),
        }
    }
}

impl OptimizerConfig {
    /// Defaults overridden by `COVERAGE_*` environment variables
    pub fn from_env() -> Result<Self, CoverageError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, CoverageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = parse_override(&lookup, "COVERAGE_SEED")? {
            self.seed = seed;
        }
        if let Some(iterations) = parse_override(&lookup, "COVERAGE_ITERATIONS")? {
            self.iterations = iterations;
        }
        if let Some(restarts) = parse_override(&lookup, "COVERAGE_RESTARTS")? {
            self.restarts = restarts;
        }
        if let Some(target) = parse_override(&lookup, "COVERAGE_TARGET")? {
            self.target_per_person = target;
        }
        if let Some(rotation) = lookup("COVERAGE_TRIGGER_ROTATION") {
            let rotation = rotation.trim();
            if !rotation.is_empty() {
                self.trigger_rotation = rotation.to_string();
            }
        }
        Ok(self)
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Result<Option<T>, CoverageError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CoverageError::InvalidConfig {
                key: key.to_string(),
                value: raw,
            }),
        _ => Ok(None),
    }
}
