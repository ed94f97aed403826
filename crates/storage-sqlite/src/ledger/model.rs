//! Database models for ledger entries.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use finflow_core::ledger::{EntryKind, LedgerEntry, NewLedgerEntry};

use crate::utils::{parse_decimal_tolerant, parse_timestamp_tolerant};

/// Database model for realized ledger entries
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::ledger_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryDB {
    pub id: String,
    pub owner_id: String,
    pub description: String,
    pub amount: String,
    pub kind: String,
    pub category: String,
    pub occurred_at: String,
    pub source_recurrence_id: Option<String>,
}

/// Database model for creating a new ledger entry
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_entries)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerEntryDB {
    pub id: Option<String>,
    pub owner_id: String,
    pub description: String,
    pub amount: String,
    pub kind: String,
    pub category: String,
    pub occurred_at: String,
    pub source_recurrence_id: Option<String>,
}

// Conversion to domain models
impl From<LedgerEntryDB> for LedgerEntry {
    fn from(db: LedgerEntryDB) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            description: db.description,
            amount: parse_decimal_tolerant(&db.amount, "amount"),
            kind: db.kind.parse().unwrap_or_else(|e| {
                log::error!("Failed to parse entry kind: {}", e);
                EntryKind::Expense
            }),
            category: db.category,
            occurred_at: parse_timestamp_tolerant(&db.occurred_at, "occurred_at"),
            source_recurrence_id: db.source_recurrence_id,
        }
    }
}

impl From<NewLedgerEntry> for NewLedgerEntryDB {
    fn from(domain: NewLedgerEntry) -> Self {
        Self {
            id: domain.id,
            owner_id: domain.owner_id,
            description: domain.description,
            amount: domain.amount.to_string(),
            kind: domain.kind.as_str().to_string(),
            category: domain.category,
            occurred_at: domain.occurred_at.to_rfc3339(),
            source_recurrence_id: domain.source_recurrence_id,
        }
    }
}
