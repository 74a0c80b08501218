use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::dates::week_range;
use super::search::SearchOutcome;
use super::types::{CoverageEntry, CoverageResult, CoverageSlot, CoverageStatus, Roster};

/// Turns the winning assignment into display records.
///
/// Counts are recomputed from the realized coverers only; the search's own
/// running tallies are not reused.
pub fn project(roster: &Roster, slots: &[CoverageSlot], outcome: &SearchOutcome) -> CoverageResult {
    let entries: Vec<CoverageEntry> = slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let cover = outcome.assignment.get(index).copied().flatten();
            let absent = roster.person(slot.absent);
            let coverer = cover.map(|c| roster.person(c.person));
            let (week_start, week_end) = week_range(slot.period_start, slot.period_end, slot.week)
                .unwrap_or((slot.period_start, slot.period_end));

            CoverageEntry {
                period: slot.period_number,
                week: slot.week,
                period_start: slot.period_start,
                period_end: slot.period_end,
                week_start,
                week_end,
                appointment_date: slot.appointment_date,
                absent: absent.name.clone(),
                absent_rotation: absent.rotation(slot.period_index).to_string(),
                absent_weekday: slot.absent_weekday,
                absent_seniority: absent.seniority,
                coverer: coverer.map(|p| p.name.clone()),
                coverer_rotation: coverer.map(|p| p.rotation(slot.period_index).to_string()),
                coverer_weekday: coverer.map(|p| p.weekday),
                coverer_seniority: coverer.and_then(|p| p.seniority),
                status: if cover.is_some() {
                    CoverageStatus::Ok
                } else {
                    CoverageStatus::NoCoverage
                },
                tier: cover.map(|c| c.tier),
                relaxed_back_to_back: cover.is_some_and(|c| c.tier.relaxes_back_to_back()),
                relaxed_same_weekday: cover.is_some_and(|c| c.tier.relaxes_same_weekday()),
            }
        })
        .collect();

    let mut counts = roster.zeroed_counts();
    for coverer in entries.iter().filter_map(|e| e.coverer.as_ref()) {
        if let Some(count) = counts.get_mut(coverer) {
            *count += 1;
        }
    }

    CoverageResult {
        entries,
        counts,
        penalty: outcome.penalty,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Under,
    OnTarget,
    Over,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStanding {
    pub name: String,
    pub count: u32,
    pub standing: Standing,
}

/// Roster members sharing a seniority level; `None` collects the unknowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeniorityGroup {
    pub seniority: Option<u8>,
    pub members: Vec<LoadStanding>,
}

/// Headline numbers of a coverage run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub slots: usize,
    pub assigned: usize,
    pub uncovered: usize,
    pub target_per_person: u32,
    pub target_total: u64,
    pub groups: Vec<SeniorityGroup>,
}

impl CoverageSummary {
    pub fn new(result: &CoverageResult, seniority: impl Fn(&str) -> Option<u8>, target: u32) -> Self {
        let mut by_level: IndexMap<Option<u8>, Vec<LoadStanding>> = IndexMap::new();
        for (name, &count) in &result.counts {
            let standing = match count.cmp(&target) {
                std::cmp::Ordering::Less => Standing::Under,
                std::cmp::Ordering::Equal => Standing::OnTarget,
                std::cmp::Ordering::Greater => Standing::Over,
            };
            by_level.entry(seniority(name)).or_default().push(LoadStanding {
                name: name.clone(),
                count,
                standing,
            });
        }

        // Known levels ascending, unknown last
        by_level.sort_by(|a, _, b, _| match (a, b) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Self {
            slots: result.entries.len(),
            assigned: result.assigned_count(),
            uncovered: result.uncovered_count(),
            target_per_person: target,
            target_total: u64::from(target)
                .saturating_mul(u64::try_from(result.counts.len()).unwrap_or(u64::MAX)),
            groups: by_level
                .into_iter()
                .map(|(seniority, members)| SeniorityGroup { seniority, members })
                .collect(),
        }
    }
}
