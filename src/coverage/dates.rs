use chrono::{Datelike, Duration, NaiveDate};

/// Number of calendar days from `start` to `end`, both included
pub fn days_between_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Coverage weeks inside a period. Week 2 starts at start + 7, so it only
/// exists when the period spans at least 8 days.
pub fn weeks_in_period(start: NaiveDate, end: NaiveDate) -> &'static [u8] {
    if days_between_inclusive(start, end) >= 8 {
        &[1, 2]
    } else {
        &[1]
    }
}

pub fn is_within_period(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

fn week_anchor(period_start: NaiveDate, week: u8) -> Option<NaiveDate> {
    period_start.checked_add_signed(Duration::days(i64::from(week.saturating_sub(1)) * 7))
}

/// First `weekday` (1 = Mon .. 5 = Fri) on or after the start of `week`,
/// where weeks are anchored on the period start. `None` past the last
/// representable date.
pub fn appointment_date(period_start: NaiveDate, week: u8, weekday: u8) -> Option<NaiveDate> {
    let week_start = week_anchor(period_start, week)?;
    // 0 = Sunday .. 6 = Saturday
    let start_dow = i64::from(week_start.weekday().num_days_from_sunday());
    let delta = (i64::from(weekday) - start_dow + 7).rem_euclid(7);
    week_start.checked_add_signed(Duration::days(delta))
}

/// Displayed range of a week: seven days from its anchor, clamped to the period end
pub fn week_range(period_start: NaiveDate, period_end: NaiveDate, week: u8) -> Option<(NaiveDate, NaiveDate)> {
    let start = week_anchor(period_start, week)?;
    let end = start
        .checked_add_signed(Duration::days(6))
        .map_or(period_end, |end| end.min(period_end));
    Some((start, end))
}

pub fn weekday_name(weekday: u8) -> &'static str {
    match weekday {
        0 => "None",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn inclusive_day_count() {
        assert_eq!(days_between_inclusive(date("2025-07-01"), date("2025-07-01")), 1);
        assert_eq!(days_between_inclusive(date("2025-07-01"), date("2025-07-14")), 14);
    }

    #[test]
    fn second_week_needs_eight_days() {
        assert_eq!(weeks_in_period(date("2025-07-01"), date("2025-07-07")), &[1]);
        assert_eq!(weeks_in_period(date("2025-07-01"), date("2025-07-08")), &[1, 2]);
    }

    #[test]
    fn appointment_date_moves_forward_to_weekday() {
        // 2025-07-01 is a Tuesday
        let start = date("2025-07-01");
        assert_eq!(appointment_date(start, 1, 2), Some(date("2025-07-01")));
        assert_eq!(appointment_date(start, 1, 3), Some(date("2025-07-02")));
        assert_eq!(appointment_date(start, 2, 3), Some(date("2025-07-09")));
        assert_eq!(appointment_date(start, 1, 1), Some(date("2025-07-07")));
    }

    #[test]
    fn sunday_anchor_lands_on_monday() {
        assert_eq!(appointment_date(date("2025-06-29"), 1, 1), Some(date("2025-06-30")));
        assert_eq!(appointment_date(date("2025-06-29"), 2, 5), Some(date("2025-07-11")));
    }

    #[test]
    fn week_range_is_clamped() {
        let (start, end) = week_range(date("2025-07-01"), date("2025-07-10"), 2).unwrap();
        assert_eq!(start, date("2025-07-08"));
        assert_eq!(end, date("2025-07-10"));

        let (start, end) = week_range(date("2025-07-01"), date("2025-07-14"), 1).unwrap();
        assert_eq!((start, end), (date("2025-07-01"), date("2025-07-07")));
    }

    #[test]
    fn dates_past_the_calendar_end_are_none() {
        let last = NaiveDate::MAX;
        assert_eq!(appointment_date(last, 2, 1), None);
        assert!((1..=5).any(|weekday| appointment_date(last - Duration::days(2), 1, weekday).is_none()));
        assert_eq!(week_range(last, last, 2), None);
        assert_eq!(week_range(last - Duration::days(2), last, 1), Some((last - Duration::days(2), last)));
    }

    #[test]
    fn within_period_is_inclusive() {
        let (s, e) = (date("2025-07-01"), date("2025-07-14"));
        assert!(is_within_period(s, s, e));
        assert!(is_within_period(e, s, e));
        assert!(!is_within_period(date("2025-07-15"), s, e));
    }
}
