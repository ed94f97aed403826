//! Pure schedule math for recurrence definitions.
//!
//! Decides whether a definition produces an entry in a given calendar
//! month and on which day. No I/O happens here; the engine in
//! `recurrences_service` orchestrates persistence around these rules.

use chrono::{Datelike, Duration, NaiveDate};

use crate::constants::{BIWEEKLY_OFFSET_DAYS, WEEKLY_OFFSET_DAYS};
use crate::utils::time_utils::MonthKey;

use super::recurrences_model::{Frequency, RecurrenceDefinition};

/// Whether `definition` is due to produce an entry in `month`.
///
/// The engine writes at most one entry per calendar month per
/// definition, so weekly and biweekly rules collapse to a single
/// monthly occurrence. Date comparisons are at day granularity, which
/// makes the end boundary inclusive to end-of-day.
pub fn should_occur_in_month(definition: &RecurrenceDefinition, month: MonthKey) -> bool {
    let month_start = month.first_day();
    let month_end = month.last_day();
    let start = definition.start_date.date_naive();

    if start > month_end {
        return false;
    }
    if let Some(end_date) = definition.end_date {
        if end_date.date_naive() < month_start {
            return false;
        }
    }

    if definition.skipped_months.contains(&month) {
        return false;
    }

    match definition.frequency {
        // A month where the rule is already running counts as occurring,
        // no matter how many weeks fall inside it.
        Frequency::Weekly => month_start >= start,
        Frequency::Biweekly => {
            let days = (month_start - start).num_days();
            days >= 0 && (days / 7) % 2 == 0
        }
        Frequency::Monthly => month.months_since(MonthKey::from_date(start)) >= 0,
        Frequency::Quarterly => {
            let months = month.months_since(MonthKey::from_date(start));
            months >= 0 && months % 3 == 0
        }
        Frequency::Yearly => month.year >= start.year(),
    }
}

/// The concrete day a due entry should be dated for `month`.
///
/// Monthly-style frequencies anchor on the start date's day-of-month,
/// clamped to the target month's length. Yearly occurrences always land
/// in the start date's month of the target year, so callers must pass
/// the anniversary month for the date to fall inside it.
pub fn occurrence_date_in_month(definition: &RecurrenceDefinition, month: MonthKey) -> NaiveDate {
    let start = definition.start_date.date_naive();
    match definition.frequency {
        Frequency::Weekly => month.first_day() + Duration::days(WEEKLY_OFFSET_DAYS),
        Frequency::Biweekly => month.first_day() + Duration::days(BIWEEKLY_OFFSET_DAYS),
        Frequency::Monthly | Frequency::Quarterly => {
            let day = start.day().min(month.days_in_month());
            NaiveDate::from_ymd_opt(month.year, month.month, day).unwrap_or_default()
        }
        Frequency::Yearly => {
            let anniversary = MonthKey::new(month.year, start.month());
            let day = start.day().min(anniversary.days_in_month());
            NaiveDate::from_ymd_opt(anniversary.year, anniversary.month, day).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    use crate::ledger::EntryKind;

    fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_definition(frequency: Frequency, start_date: DateTime<Utc>) -> RecurrenceDefinition {
        RecurrenceDefinition {
            id: "rec-1".to_string(),
            owner_id: "user-1".to_string(),
            name: "Internet".to_string(),
            amount: dec!(60),
            kind: EntryKind::Expense,
            category: "Utilities".to_string(),
            frequency,
            start_date,
            end_date: None,
            is_active: true,
            skipped_months: BTreeSet::new(),
        }
    }

    #[test]
    fn test_monthly_start_date_boundary() {
        let definition = make_definition(Frequency::Monthly, instant(2024, 1, 15));

        assert!(!should_occur_in_month(&definition, MonthKey::new(2023, 12)));
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 1)));
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 2)));
    }

    #[test]
    fn test_end_date_boundary_inclusive() {
        let mut definition = make_definition(Frequency::Monthly, instant(2024, 1, 1));
        definition.end_date = Some(instant(2024, 6, 30));

        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 6)));
        assert!(!should_occur_in_month(&definition, MonthKey::new(2024, 7)));
    }

    #[test]
    fn test_skipped_month_is_excluded_and_resumes() {
        let mut definition = make_definition(Frequency::Monthly, instant(2024, 1, 1));
        definition.skipped_months.insert(MonthKey::new(2024, 3));

        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 2)));
        assert!(!should_occur_in_month(&definition, MonthKey::new(2024, 3)));
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 4)));
    }

    #[test]
    fn test_weekly_waits_for_first_full_month() {
        // A weekly rule starting mid-January first fires in February,
        // because the predicate requires the month to start inside the
        // active window.
        let definition = make_definition(Frequency::Weekly, instant(2024, 1, 15));

        assert!(!should_occur_in_month(&definition, MonthKey::new(2024, 1)));
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 2)));
    }

    #[test]
    fn test_biweekly_parity() {
        // 2024-01-01 is the anchor; months whose first day is an even
        // number of whole weeks later occur.
        let definition = make_definition(Frequency::Biweekly, instant(2024, 1, 1));

        // Jan 1 -> 0 days -> week 0, even.
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 1)));
        // Feb 1 -> 31 days -> week 4, even.
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 2)));
        // Mar 1 -> 60 days -> week 8, even.
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 3)));
        // May 1 -> 121 days -> week 17, odd.
        assert!(!should_occur_in_month(&definition, MonthKey::new(2024, 5)));
    }

    #[test]
    fn test_biweekly_before_start_never_occurs() {
        let definition = make_definition(Frequency::Biweekly, instant(2024, 6, 1));
        assert!(!should_occur_in_month(&definition, MonthKey::new(2024, 5)));
    }

    #[test]
    fn test_quarterly_every_third_month() {
        let definition = make_definition(Frequency::Quarterly, instant(2024, 1, 10));

        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 1)));
        assert!(!should_occur_in_month(&definition, MonthKey::new(2024, 2)));
        assert!(!should_occur_in_month(&definition, MonthKey::new(2024, 3)));
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 4)));
        assert!(should_occur_in_month(&definition, MonthKey::new(2025, 1)));
    }

    #[test]
    fn test_yearly_occurs_from_start_year() {
        let definition = make_definition(Frequency::Yearly, instant(2024, 5, 20));

        assert!(!should_occur_in_month(&definition, MonthKey::new(2023, 5)));
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 5)));
        assert!(should_occur_in_month(&definition, MonthKey::new(2025, 5)));
    }

    #[test]
    fn test_monthly_day_clamps_to_short_months() {
        let definition = make_definition(Frequency::Monthly, instant(2024, 1, 31));

        // Leap-year February clamps to the 29th.
        assert_eq!(
            occurrence_date_in_month(&definition, MonthKey::new(2024, 2)),
            date(2024, 2, 29)
        );
        // Non-leap February clamps to the 28th.
        assert_eq!(
            occurrence_date_in_month(&definition, MonthKey::new(2025, 2)),
            date(2025, 2, 28)
        );
        // April clamps to the 30th.
        assert_eq!(
            occurrence_date_in_month(&definition, MonthKey::new(2024, 4)),
            date(2024, 4, 30)
        );
        // Months long enough use the anchor day unchanged.
        assert_eq!(
            occurrence_date_in_month(&definition, MonthKey::new(2024, 3)),
            date(2024, 3, 31)
        );
    }

    #[test]
    fn test_weekly_and_biweekly_dates_offset_from_month_start() {
        let weekly = make_definition(Frequency::Weekly, instant(2024, 1, 1));
        assert_eq!(
            occurrence_date_in_month(&weekly, MonthKey::new(2024, 3)),
            date(2024, 3, 8)
        );

        let biweekly = make_definition(Frequency::Biweekly, instant(2024, 1, 1));
        assert_eq!(
            occurrence_date_in_month(&biweekly, MonthKey::new(2024, 3)),
            date(2024, 3, 15)
        );
    }

    #[test]
    fn test_yearly_date_pinned_to_anniversary_month() {
        let definition = make_definition(Frequency::Yearly, instant(2020, 2, 29));

        // The anniversary month is February of the target year, clamped
        // for non-leap years.
        assert_eq!(
            occurrence_date_in_month(&definition, MonthKey::new(2024, 2)),
            date(2024, 2, 29)
        );
        assert_eq!(
            occurrence_date_in_month(&definition, MonthKey::new(2025, 2)),
            date(2025, 2, 28)
        );
        // Even when a caller passes a different month, the date stays in
        // the anniversary month of that year.
        assert_eq!(
            occurrence_date_in_month(&definition, MonthKey::new(2025, 7)),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_inactive_flag_is_not_schedules_concern() {
        // The predicate only looks at dates, skips and frequency; the
        // engine filters inactive definitions before calling it.
        let mut definition = make_definition(Frequency::Monthly, instant(2024, 1, 1));
        definition.is_active = false;
        assert!(should_occur_in_month(&definition, MonthKey::new(2024, 2)));
    }
}
