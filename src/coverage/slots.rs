use tracing::debug;

use super::dates::{appointment_date, is_within_period, weeks_in_period};
use super::types::{rotation_matches, CoverageSlot, Period, Roster};

/// Builds the ordered list of slots that need a substitute.
///
/// For each dated period, the first roster member on `trigger_rotation` is
/// the absent person; their recurring weekday fixes the appointment date in
/// each coverage week. Slots whose date falls outside the period are dropped.
pub fn derive_slots(roster: &Roster, periods: &[Period], trigger_rotation: &str) -> Vec<CoverageSlot> {
    let mut slots = Vec::new();

    for (period_index, period) in periods.iter().enumerate() {
        let (Some(start), Some(end)) = (period.start, period.end) else {
            debug!(period = period.number, "period has no dates, skipping");
            continue;
        };

        let absent = roster
            .iter()
            .position(|p| rotation_matches(p.rotation(period_index), trigger_rotation));
        let Some(absent) = absent else {
            continue;
        };

        let absent_weekday = roster.person(absent).weekday;
        if absent_weekday == 0 {
            debug!(
                period = period.number,
                person = %roster.person(absent).name,
                "absent person has no recurring weekday, skipping"
            );
            continue;
        }

        for &week in weeks_in_period(start, end) {
            let Some(date) = appointment_date(start, week, absent_weekday) else {
                continue;
            };
            if !is_within_period(date, start, end) {
                continue;
            }

            slots.push(CoverageSlot {
                period_index,
                period_number: period.number,
                week,
                period_start: start,
                period_end: end,
                appointment_date: date,
                absent,
                absent_weekday,
            });
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::types::CoverageRequest;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn roster(rows: &[(&str, u8, &[&str])]) -> Roster {
        let mut request = CoverageRequest::default();
        for (name, weekday, rotations) in rows {
            request.roster.push(name.to_string());
            request.weekdays.insert(name.to_string(), *weekday);
            request
                .schedule
                .insert(name.to_string(), rotations.iter().map(|r| r.to_string()).collect());
        }
        Roster::from_request(&request)
    }

    #[test]
    fn two_week_period_yields_two_slots() {
        let roster = roster(&[("Ana", 3, &["nights"]), ("Ben", 1, &["Echo"])]);
        let periods = [Period::new(1, date("2025-07-01"), date("2025-07-14"))];

        let slots = derive_slots(&roster, &periods, "Nights");

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].appointment_date, date("2025-07-02"));
        assert_eq!(slots[1].appointment_date, date("2025-07-09"));
        assert!(slots.iter().all(|s| s.absent == 0 && s.absent_weekday == 3));
        assert_eq!(slots[1].week, 2);
    }

    #[test]
    fn date_past_period_end_is_dropped() {
        // Tuesday start, Monday appointment lands on 07-07, after the end
        let roster = roster(&[("Ana", 1, &["Nights"])]);
        let periods = [Period::new(1, date("2025-07-01"), date("2025-07-05"))];

        assert!(derive_slots(&roster, &periods, "Nights").is_empty());
    }

    #[test]
    fn second_week_dropped_when_it_overruns() {
        // 10-day period: week 2 anchor 07-08 (Tue), Monday would be 07-14
        let roster = roster(&[("Ana", 1, &["Nights"])]);
        let periods = [Period::new(1, date("2025-07-01"), date("2025-07-10"))];

        let slots = derive_slots(&roster, &periods, "Nights");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].appointment_date, date("2025-07-07"));
    }

    #[test]
    fn skips_undated_unstaffed_and_weekdayless_periods() {
        let roster = roster(&[
            ("Ana", 2, &["Nights", "Echo", "Echo"]),
            ("Ben", 0, &["Echo", "Echo", "NIGHTS"]),
        ]);
        let periods = [
            Period { number: 1, start: None, end: Some(date("2025-07-14")) },
            Period::new(2, date("2025-07-15"), date("2025-07-28")),
            Period::new(3, date("2025-07-29"), date("2025-08-11")),
        ];

        assert!(derive_slots(&roster, &periods, "Nights").is_empty());
    }

    #[test]
    fn period_at_calendar_end_does_not_panic() {
        let last = NaiveDate::MAX;
        let start = last - chrono::Duration::days(2);
        for weekday in 1..=5 {
            let roster = roster(&[("Ana", weekday, &["Nights"])]);
            let periods = [Period::new(1, start, last)];

            let slots = derive_slots(&roster, &periods, "Nights");
            assert!(slots.iter().all(|s| s.appointment_date >= start && s.appointment_date <= last));
        }
    }

    #[test]
    fn first_matching_person_is_absent() {
        let roster = roster(&[("Ana", 2, &["Echo"]), ("Ben", 4, &["Nights"]), ("Cal", 5, &["Nights"])]);
        let periods = [Period::new(7, date("2025-07-01"), date("2025-07-07"))];

        let slots = derive_slots(&roster, &periods, "nights");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].absent, 1);
        assert_eq!(slots[0].period_number, 7);
        assert_eq!(slots[0].appointment_date, date("2025-07-03"));
    }
}
