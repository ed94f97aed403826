//! Calendar-month helpers shared by the recurrence engine and ledger queries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar month identified by year and month.
///
/// Renders and parses as a `YYYY-MM` month-key, the format used for
/// skip-list membership and month bucketing. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        MonthKey { year, month }
    }

    /// The month containing the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current calendar month in UTC.
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    /// First calendar day of this month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Last calendar day of this month.
    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or_default()
    }

    /// Number of days in this month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// The month immediately after this one.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Whole calendar months elapsed from `earlier` to this month,
    /// ignoring day-of-month. Negative when this month comes first.
    pub fn months_since(&self, earlier: MonthKey) -> i32 {
        (self.year - earlier.year) * 12 + self.month as i32 - earlier.month as i32
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year_part, month_part) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid month key '{}', expected YYYY-MM", s))?;
        let year: i32 = year_part
            .parse()
            .map_err(|_| format!("Invalid year in month key '{}'", s))?;
        let month: u32 = month_part
            .parse()
            .map_err(|_| format!("Invalid month in month key '{}'", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Month out of range in month key '{}'", s));
        }
        Ok(MonthKey { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Midnight UTC for the given calendar date.
///
/// Materialized ledger entries are stamped at midnight of their occurrence
/// day so that month bucketing by `occurred_at` is stable.
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}
