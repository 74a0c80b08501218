use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::OptimizerConfig;

/// A scheduling block; dates are inclusive and may be missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub number: u32,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl Period {
    pub fn new(number: u32, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            number,
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Everything one optimizer run reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageRequest {
    pub roster: Vec<String>,
    /// person -> rotation label per period, by position in `periods`
    #[serde(default)]
    pub schedule: HashMap<String, Vec<String>>,
    /// person -> recurring weekday (0 = none, 1 = Mon .. 5 = Fri)
    #[serde(default)]
    pub weekdays: HashMap<String, u8>,
    #[serde(default)]
    pub seniority: HashMap<String, u8>,
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub config: OptimizerConfig,
}

/// A roster member with their lookups resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub seniority: Option<u8>,
    /// 0 when unset
    pub weekday: u8,
    pub rotations: Vec<String>,
}

impl Person {
    /// Rotation label for a period, empty when unassigned
    pub fn rotation(&self, period_index: usize) -> &str {
        self.rotations
            .get(period_index)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Roster in caller order; people are addressed by index
#[derive(Debug, Clone, Default)]
pub struct Roster {
    people: Vec<Person>,
}

impl Roster {
    pub fn from_request(request: &CoverageRequest) -> Self {
        let mut seen = HashSet::new();
        let mut people = Vec::with_capacity(request.roster.len());

        for name in &request.roster {
            if !seen.insert(name.as_str()) {
                warn!(person = %name, "duplicate roster entry ignored");
                continue;
            }

            let weekday = match request.weekdays.get(name).copied().unwrap_or(0) {
                day @ 0..=5 => day,
                day => {
                    warn!(person = %name, weekday = day, "weekday out of range, treating as unset");
                    0
                }
            };

            people.push(Person {
                name: name.clone(),
                seniority: request.seniority.get(name).copied(),
                weekday,
                rotations: request.schedule.get(name).cloned().unwrap_or_default(),
            });
        }

        Self { people }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn person(&self, index: usize) -> &Person {
        &self.people[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    /// Map of every roster member to zero, in roster order
    pub fn zeroed_counts(&self) -> IndexMap<String, u32> {
        self.people.iter().map(|p| (p.name.clone(), 0)).collect()
    }
}

/// Case-insensitive exact comparison of rotation labels
pub fn rotation_matches(label: &str, other: &str) -> bool {
    label.to_lowercase() == other.to_lowercase()
}

/// One weekly appointment that needs a substitute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageSlot {
    pub period_index: usize,
    pub period_number: u32,
    pub week: u8,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub appointment_date: NaiveDate,
    /// Roster index of the absent person
    pub absent: usize,
    pub absent_weekday: u8,
}

/// Eligibility rule set, strictest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationTier {
    Strict,
    RelaxBackToBack,
    RelaxWeekdayAndBackToBack,
}

impl RelaxationTier {
    /// Evaluation order; the first tier with candidates wins
    pub const ORDER: [RelaxationTier; 3] = [
        RelaxationTier::Strict,
        RelaxationTier::RelaxBackToBack,
        RelaxationTier::RelaxWeekdayAndBackToBack,
    ];

    pub fn relaxes_back_to_back(self) -> bool {
        !matches!(self, RelaxationTier::Strict)
    }

    pub fn relaxes_same_weekday(self) -> bool {
        matches!(self, RelaxationTier::RelaxWeekdayAndBackToBack)
    }
}

/// A chosen coverer and the tier that admitted them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cover {
    pub person: usize,
    pub tier: RelaxationTier,
}

/// One entry per slot; `None` is an uncovered slot
pub type Assignment = Vec<Option<Cover>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    Ok,
    NoCoverage,
}

/// Display-ready record of one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageEntry {
    pub period: u32,
    pub week: u8,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub appointment_date: NaiveDate,
    pub absent: String,
    pub absent_rotation: String,
    pub absent_weekday: u8,
    pub absent_seniority: Option<u8>,
    pub coverer: Option<String>,
    pub coverer_rotation: Option<String>,
    pub coverer_weekday: Option<u8>,
    pub coverer_seniority: Option<u8>,
    pub status: CoverageStatus,
    pub tier: Option<RelaxationTier>,
    pub relaxed_back_to_back: bool,
    pub relaxed_same_weekday: bool,
}

/// Optimizer output: entries in slot order, realized load, winning penalty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub entries: Vec<CoverageEntry>,
    pub counts: IndexMap<String, u32>,
    pub penalty: f64,
}

impl CoverageResult {
    pub fn uncovered_count(&self) -> usize {
        self.entries.iter().filter(|e| e.coverer.is_none()).count()
    }

    pub fn assigned_count(&self) -> usize {
        self.entries.len() - self.uncovered_count()
    }
}
