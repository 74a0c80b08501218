use crate::config::OptimizerConfig;

use super::types::{Cover, CoverageSlot, RelaxationTier, Roster};

/// Decides who may cover a slot under each relaxation tier
#[derive(Debug)]
pub struct EligibilityRules<'a> {
    roster: &'a Roster,
    forbidden: Vec<String>,
    junior_level: u8,
    junior_exclusion_period: u32,
    senior_level: u8,
    senior_exclusion_period: u32,
}

impl<'a> EligibilityRules<'a> {
    pub fn new(roster: &'a Roster, config: &OptimizerConfig) -> Self {
        // Blank labels never forbid anything
        let forbidden = config
            .forbidden_rotations
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.to_lowercase())
            .collect();

        Self {
            roster,
            forbidden,
            junior_level: config.junior_level,
            junior_exclusion_period: config.junior_exclusion_period,
            senior_level: config.senior_level,
            senior_exclusion_period: config.senior_exclusion_period,
        }
    }

    fn on_forbidden_rotation(&self, rotation: &str) -> bool {
        let rotation = rotation.to_lowercase();
        self.forbidden.iter().any(|r| *r == rotation)
    }

    fn seniority_excluded(&self, seniority: Option<u8>, period_number: u32) -> bool {
        let Some(level) = seniority else {
            return false;
        };
        (level == self.junior_level && period_number <= self.junior_exclusion_period)
            || (level == self.senior_level && period_number >= self.senior_exclusion_period)
    }

    /// Whether `candidate` may cover `slot` under `tier`, given the coverer
    /// of the preceding slot
    pub fn is_eligible(
        &self,
        tier: RelaxationTier,
        slot: &CoverageSlot,
        candidate: usize,
        previous: Option<usize>,
    ) -> bool {
        if candidate == slot.absent {
            return false;
        }

        let person = self.roster.person(candidate);
        if self.on_forbidden_rotation(person.rotation(slot.period_index)) {
            return false;
        }

        if !tier.relaxes_same_weekday() && person.weekday != 0 && person.weekday == slot.absent_weekday {
            return false;
        }

        if self.seniority_excluded(person.seniority, slot.period_number) {
            return false;
        }

        if !tier.relaxes_back_to_back() && previous == Some(candidate) {
            return false;
        }

        true
    }

    /// Eligible roster indices for one tier, in roster order
    pub fn candidates(&self, tier: RelaxationTier, slot: &CoverageSlot, previous: Option<usize>) -> Vec<usize> {
        (0..self.roster.len())
            .filter(|&candidate| self.is_eligible(tier, slot, candidate, previous))
            .collect()
    }

    /// First tier with any candidates, or `None` when the slot cannot be covered
    pub fn first_eligible(&self, slot: &CoverageSlot, previous: Option<usize>) -> Option<(RelaxationTier, Vec<usize>)> {
        RelaxationTier::ORDER.into_iter().find_map(|tier| {
            let candidates = self.candidates(tier, slot, previous);
            (!candidates.is_empty()).then_some((tier, candidates))
        })
    }
}

/// Coverer of the slot right before `index` in `assignment`
pub fn previous_coverer(assignment: &[Option<Cover>], index: usize) -> Option<usize> {
    index
        .checked_sub(1)
        .and_then(|i| assignment.get(i).copied().flatten())
        .map(|cover| cover.person)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::types::CoverageRequest;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // (name, seniority, weekday, rotation)
    fn roster(rows: &[(&str, u8, u8, &str)]) -> Roster {
        let mut request = CoverageRequest::default();
        for (name, level, weekday, rotation) in rows {
            request.roster.push(name.to_string());
            request.seniority.insert(name.to_string(), *level);
            request.weekdays.insert(name.to_string(), *weekday);
            request.schedule.insert(name.to_string(), vec![rotation.to_string()]);
        }
        Roster::from_request(&request)
    }

    fn slot(period_number: u32, absent: usize, absent_weekday: u8) -> CoverageSlot {
        CoverageSlot {
            period_index: 0,
            period_number,
            week: 1,
            period_start: date("2025-07-01"),
            period_end: date("2025-07-14"),
            appointment_date: date("2025-07-02"),
            absent,
            absent_weekday,
        }
    }

    fn sample_roster() -> Roster {
        roster(&[
            ("Ana", 5, 3, "Nights"),
            ("Ben", 5, 1, "Echo"),
            ("Cal", 5, 3, "Echo"),
            ("Dee", 5, 0, "icu"),
            ("Eve", 4, 2, "Research"),
            ("Fin", 6, 0, ""),
        ])
    }

    #[test]
    fn strict_rules_filter_absent_rotation_and_weekday() {
        let roster = sample_roster();
        let rules = EligibilityRules::new(&roster, &OptimizerConfig::default());
        let slot = slot(10, 0, 3);

        // Ana absent, Cal shares Wednesday, Dee on ICU
        assert_eq!(rules.candidates(RelaxationTier::Strict, &slot, None), vec![1, 4, 5]);
        assert_eq!(rules.candidates(RelaxationTier::Strict, &slot, Some(1)), vec![4, 5]);
        assert_eq!(rules.candidates(RelaxationTier::RelaxBackToBack, &slot, Some(1)), vec![1, 4, 5]);
        assert_eq!(
            rules.candidates(RelaxationTier::RelaxWeekdayAndBackToBack, &slot, Some(1)),
            vec![1, 2, 4, 5]
        );
    }

    #[test]
    fn seniority_exclusions_follow_period_thresholds() {
        let roster = sample_roster();
        let rules = EligibilityRules::new(&roster, &OptimizerConfig::default());

        assert!(!rules.is_eligible(RelaxationTier::RelaxWeekdayAndBackToBack, &slot(4, 0, 3), 4, None));
        assert!(rules.is_eligible(RelaxationTier::Strict, &slot(5, 0, 3), 4, None));
        assert!(rules.is_eligible(RelaxationTier::Strict, &slot(20, 0, 3), 5, None));
        assert!(!rules.is_eligible(RelaxationTier::RelaxWeekdayAndBackToBack, &slot(21, 0, 3), 5, None));
    }

    #[test]
    fn shared_level_gets_both_exclusions() {
        let roster = sample_roster();
        let config = OptimizerConfig {
            junior_level: 5,
            senior_level: 5,
            ..OptimizerConfig::default()
        };
        let rules = EligibilityRules::new(&roster, &config);

        // Ben is level 5
        assert!(!rules.is_eligible(RelaxationTier::RelaxWeekdayAndBackToBack, &slot(3, 0, 3), 1, None));
        assert!(rules.is_eligible(RelaxationTier::Strict, &slot(10, 0, 3), 1, None));
        assert!(!rules.is_eligible(RelaxationTier::RelaxWeekdayAndBackToBack, &slot(21, 0, 3), 1, None));
    }

    #[test]
    fn empty_forbidden_label_does_not_block_idle_people() {
        let roster = sample_roster();
        let mut config = OptimizerConfig::default();
        config.forbidden_rotations.push(String::new());
        let rules = EligibilityRules::new(&roster, &config);

        assert!(rules.is_eligible(RelaxationTier::Strict, &slot(10, 0, 3), 5, None));
    }

    #[test]
    fn tiers_are_nested() {
        let roster = sample_roster();
        let rules = EligibilityRules::new(&roster, &OptimizerConfig::default());

        for period_number in [1, 4, 5, 20, 21, 30] {
            for absent_weekday in 1..=5 {
                let slot = slot(period_number, 0, absent_weekday);
                for previous in [None, Some(1), Some(2), Some(4), Some(5)] {
                    let strict = rules.candidates(RelaxationTier::Strict, &slot, previous);
                    let b2b = rules.candidates(RelaxationTier::RelaxBackToBack, &slot, previous);
                    let day = rules.candidates(RelaxationTier::RelaxWeekdayAndBackToBack, &slot, previous);
                    assert!(strict.iter().all(|c| b2b.contains(c)));
                    assert!(b2b.iter().all(|c| day.contains(c)));
                }
            }
        }
    }

    #[test]
    fn first_eligible_falls_through_tiers() {
        let roster = roster(&[("Ana", 5, 3, "Nights"), ("Ben", 5, 1, "Echo"), ("Cal", 5, 3, "Echo")]);
        let rules = EligibilityRules::new(&roster, &OptimizerConfig::default());
        let slot = slot(10, 0, 3);

        assert_eq!(rules.first_eligible(&slot, None), Some((RelaxationTier::Strict, vec![1])));
        assert_eq!(rules.first_eligible(&slot, Some(1)), Some((RelaxationTier::RelaxBackToBack, vec![1])));

        let lonely = self::roster(&[("Ana", 5, 3, "Nights"), ("Cal", 5, 3, "Echo")]);
        let rules = EligibilityRules::new(&lonely, &OptimizerConfig::default());
        assert_eq!(
            rules.first_eligible(&slot, None),
            Some((RelaxationTier::RelaxWeekdayAndBackToBack, vec![1]))
        );

        let nobody = self::roster(&[("Ana", 5, 3, "Nights"), ("Dee", 5, 0, "ICU")]);
        let rules = EligibilityRules::new(&nobody, &OptimizerConfig::default());
        assert_eq!(rules.first_eligible(&slot, None), None);
    }

    #[test]
    fn previous_coverer_looks_back_one_slot() {
        let assignment = vec![
            Some(Cover { person: 2, tier: RelaxationTier::Strict }),
            None,
            Some(Cover { person: 1, tier: RelaxationTier::RelaxBackToBack }),
        ];
        assert_eq!(previous_coverer(&assignment, 0), None);
        assert_eq!(previous_coverer(&assignment, 1), Some(2));
        assert_eq!(previous_coverer(&assignment, 2), None);
        assert_eq!(previous_coverer(&assignment, 3), Some(1));
    }
}
