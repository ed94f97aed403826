use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::MonthKey;

use super::ledger_model::{LedgerEntry, NewLedgerEntry};
use super::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
use async_trait::async_trait;

/// Service for manual ledger entries and month reads.
///
/// Materialized entries are created by the recurrence engine, not here;
/// this service covers the direct-entry path and shared queries.
pub struct LedgerService {
    repository: Arc<dyn LedgerRepositoryTrait>,
}

impl LedgerService {
    pub fn new(repository: Arc<dyn LedgerRepositoryTrait>) -> Self {
        LedgerService { repository }
    }

    fn validate(new_entry: &NewLedgerEntry) -> Result<()> {
        if new_entry.description.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "description".to_string(),
            )));
        }
        if new_entry.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Entry amount must be a positive magnitude".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    fn get_entry(&self, owner_id: &str, entry_id: &str) -> Result<LedgerEntry> {
        self.repository.get_entry(owner_id, entry_id)
    }

    fn list_entries(&self, owner_id: &str) -> Result<Vec<LedgerEntry>> {
        self.repository.list_entries(owner_id)
    }

    fn list_entries_for_month(&self, owner_id: &str, month: MonthKey) -> Result<Vec<LedgerEntry>> {
        self.repository.list_entries_for_month(owner_id, month)
    }

    async fn create_entry(&self, new_entry: NewLedgerEntry) -> Result<LedgerEntry> {
        Self::validate(&new_entry)?;
        let mut entry = new_entry;
        entry.id = Some(Uuid::new_v4().to_string());
        // Manual entries never point back at a recurrence definition.
        entry.source_recurrence_id = None;
        debug!("Creating manual ledger entry for owner {}", entry.owner_id);
        self.repository.create_entry(entry).await
    }

    async fn delete_entry(&self, owner_id: &str, entry_id: &str) -> Result<usize> {
        self.repository.delete_entry(owner_id, entry_id).await
    }
}
