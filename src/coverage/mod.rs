pub mod types;
pub mod dates;
pub mod slots;
pub mod eligibility;
pub mod rng;
pub mod scorer;
pub mod search;
pub mod projector;

use rand::RngCore;
use tracing::{info, warn};

pub use types::{
    CoverageEntry, CoverageRequest, CoverageResult, CoverageStatus, Period, RelaxationTier,
};
pub use projector::{CoverageSummary, Standing};
pub use rng::Lcg32;

use eligibility::EligibilityRules;
use scorer::Scorer;
use search::LocalSearch;
use slots::derive_slots;
use types::Roster;

/// Runs the coverage optimizer with the configured seed
pub fn optimize_coverage(request: &CoverageRequest) -> CoverageResult {
    let mut rng = Lcg32::new(request.config.seed);
    optimize_coverage_with_rng(request, &mut rng)
}

/// Runs the coverage optimizer on a caller-supplied random stream
pub fn optimize_coverage_with_rng<R: RngCore + ?Sized>(request: &CoverageRequest, rng: &mut R) -> CoverageResult {
    let config = &request.config;
    let roster = Roster::from_request(request);
    let slots = derive_slots(&roster, &request.periods, &config.trigger_rotation);

    let rules = EligibilityRules::new(&roster, config);
    let scorer = Scorer::new(config.weights, config.target_per_person, roster.len());
    let search = LocalSearch::new(&slots, &rules, &scorer, config.target_per_person, roster.len());
    let outcome = search.run(rng, config.iterations, config.restarts);

    let result = projector::project(&roster, &slots, &outcome);

    let uncovered = result.uncovered_count();
    if uncovered > 0 {
        warn!(uncovered, slots = slots.len(), "some slots have no eligible coverer");
    }
    info!(
        slots = slots.len(),
        assigned = result.assigned_count(),
        penalty = result.penalty,
        "coverage optimized"
    );

    result
}

/// Summary of `result` using the request's seniority levels
pub fn summarize(request: &CoverageRequest, result: &CoverageResult) -> CoverageSummary {
    CoverageSummary::new(
        result,
        |name| request.seniority.get(name).copied(),
        request.config.target_per_person,
    )
}
