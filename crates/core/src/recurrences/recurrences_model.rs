//! Recurrence domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::ledger::{timestamp_format, EntryKind, LedgerEntry};
use crate::recurrences::recurrences_errors::RecurrenceError;
use crate::utils::time_utils::MonthKey;

/// How often a recurrence definition produces ledger entries.
///
/// The engine materializes at most one entry per calendar month per
/// definition, so sub-monthly frequencies only affect the predicate and
/// the computed occurrence day, not the entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl FromStr for Frequency {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(RecurrenceError::InvalidFrequency(s.to_string())),
        }
    }
}

/// Domain model for a user-authored recurring income/expense rule.
///
/// Name, amount, kind and category are copied onto realized entries at
/// materialization time; editing a definition never rewrites entries
/// that were already realized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceDefinition {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// Positive magnitude; the sign is carried by `kind`.
    pub amount: Decimal,
    pub kind: EntryKind,
    pub category: String,
    pub frequency: Frequency,
    /// No occurrences before this date.
    #[serde(with = "timestamp_format")]
    pub start_date: DateTime<Utc>,
    /// No occurrences after this date; the boundary day itself is included.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Inactive definitions never materialize new entries. Deactivation
    /// alone does not delete entries that already exist.
    pub is_active: bool,
    /// Months excluded from materialization regardless of the frequency
    /// predicate.
    #[serde(default)]
    pub skipped_months: BTreeSet<MonthKey>,
}

/// Input model for creating a new recurrence definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurrenceDefinition {
    pub id: Option<String>,
    pub owner_id: String,
    pub name: String,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub category: String,
    pub frequency: Frequency,
    #[serde(with = "timestamp_format")]
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[serde(default)]
    pub skipped_months: BTreeSet<MonthKey>,
}

/// Outcome of one materialization pass over an owner's definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializationReport {
    pub month: MonthKey,
    /// Entries written by this pass, in definition order.
    pub created: Vec<LedgerEntry>,
    /// Definitions that were due but already had an entry for the month.
    pub already_materialized: u32,
    /// Definitions whose frequency predicate did not fire for the month.
    pub not_due: u32,
    /// Definitions excluded by an explicit month skip.
    pub skipped: u32,
    /// Per-definition write failures; the rest of the pass continued.
    pub failures: Vec<MaterializationFailure>,
}

impl MaterializationReport {
    pub fn new(month: MonthKey) -> Self {
        MaterializationReport {
            month,
            created: Vec::new(),
            already_materialized: 0,
            not_due: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    /// True when at least one definition's write failed.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// A single definition whose write failed during a materialization pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterializationFailure {
    pub recurrence_id: String,
    pub message: String,
}
