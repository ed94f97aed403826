//! Database models for recurrence definitions.

use std::collections::BTreeSet;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use finflow_core::errors::Error;
use finflow_core::ledger::EntryKind;
use finflow_core::recurrences::{Frequency, NewRecurrenceDefinition, RecurrenceDefinition};
use finflow_core::utils::time_utils::MonthKey;

use crate::errors::StorageError;
use crate::utils::{parse_decimal_tolerant, parse_timestamp_tolerant};

/// Database model for recurrence definitions
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::recurrence_definitions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceDefinitionDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub amount: String,
    pub kind: String,
    pub category: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_active: bool,
    pub skipped_months: String,
}

/// Database model for creating a new recurrence definition
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::recurrence_definitions)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurrenceDefinitionDB {
    pub id: Option<String>,
    pub owner_id: String,
    pub name: String,
    pub amount: String,
    pub kind: String,
    pub category: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_active: bool,
    pub skipped_months: String,
}

fn serialize_skipped_months(skipped_months: &BTreeSet<MonthKey>) -> String {
    serde_json::to_string(skipped_months).unwrap_or_else(|e| {
        log::error!("Failed to serialize skipped months: {}", e);
        "[]".to_string()
    })
}

// Conversion to domain models.
//
// The frequency column is the one place where a stored value can make a row
// unusable, so the conversion is fallible rather than falling back.
impl TryFrom<RecurrenceDefinitionDB> for RecurrenceDefinition {
    type Error = Error;

    fn try_from(db: RecurrenceDefinitionDB) -> std::result::Result<Self, Self::Error> {
        let frequency: Frequency = db.frequency.parse()?;
        let skipped_months = serde_json::from_str(&db.skipped_months)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        Ok(Self {
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            amount: parse_decimal_tolerant(&db.amount, "amount"),
            kind: db.kind.parse().unwrap_or_else(|e| {
                log::error!("Failed to parse entry kind: {}", e);
                EntryKind::Expense
            }),
            category: db.category,
            frequency,
            start_date: parse_timestamp_tolerant(&db.start_date, "start_date"),
            end_date: db
                .end_date
                .as_deref()
                .map(|s| parse_timestamp_tolerant(s, "end_date")),
            is_active: db.is_active,
            skipped_months,
        })
    }
}

impl From<RecurrenceDefinition> for RecurrenceDefinitionDB {
    fn from(domain: RecurrenceDefinition) -> Self {
        Self {
            id: domain.id,
            owner_id: domain.owner_id,
            name: domain.name,
            amount: domain.amount.to_string(),
            kind: domain.kind.as_str().to_string(),
            category: domain.category,
            frequency: domain.frequency.as_str().to_string(),
            start_date: domain.start_date.to_rfc3339(),
            end_date: domain.end_date.map(|dt| dt.to_rfc3339()),
            is_active: domain.is_active,
            skipped_months: serialize_skipped_months(&domain.skipped_months),
        }
    }
}

impl From<NewRecurrenceDefinition> for NewRecurrenceDefinitionDB {
    fn from(domain: NewRecurrenceDefinition) -> Self {
        Self {
            id: domain.id,
            owner_id: domain.owner_id,
            name: domain.name,
            amount: domain.amount.to_string(),
            kind: domain.kind.as_str().to_string(),
            category: domain.category,
            frequency: domain.frequency.as_str().to_string(),
            start_date: domain.start_date.to_rfc3339(),
            end_date: domain.end_date.map(|dt| dt.to_rfc3339()),
            is_active: domain.is_active,
            skipped_months: serialize_skipped_months(&domain.skipped_months),
        }
    }
}
