use crate::errors::Result;
use crate::ledger::ledger_model::{LedgerEntry, NewLedgerEntry};
use crate::utils::time_utils::MonthKey;
use async_trait::async_trait;

/// Trait for ledger store operations
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    fn get_entry(&self, owner_id: &str, entry_id: &str) -> Result<LedgerEntry>;
    fn list_entries(&self, owner_id: &str) -> Result<Vec<LedgerEntry>>;
    fn list_entries_for_month(&self, owner_id: &str, month: MonthKey) -> Result<Vec<LedgerEntry>>;
    async fn create_entry(&self, new_entry: NewLedgerEntry) -> Result<LedgerEntry>;
    async fn delete_entry(&self, owner_id: &str, entry_id: &str) -> Result<usize>;
}

/// Trait for ledger service operations
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    fn get_entry(&self, owner_id: &str, entry_id: &str) -> Result<LedgerEntry>;
    fn list_entries(&self, owner_id: &str) -> Result<Vec<LedgerEntry>>;
    fn list_entries_for_month(&self, owner_id: &str, month: MonthKey) -> Result<Vec<LedgerEntry>>;
    async fn create_entry(&self, new_entry: NewLedgerEntry) -> Result<LedgerEntry>;
    async fn delete_entry(&self, owner_id: &str, entry_id: &str) -> Result<usize>;
}
