use finflow_core::ledger::{LedgerEntry, LedgerRepositoryTrait, NewLedgerEntry};
use finflow_core::utils::time_utils::{midnight_utc, MonthKey};
use finflow_core::Result;

use super::model::{LedgerEntryDB, NewLedgerEntryDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::ledger_entries;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;

use std::sync::Arc;
use uuid::Uuid;

pub struct LedgerRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        LedgerRepository { pool, writer }
    }

    fn get_entry_impl(&self, owner_id: &str, entry_id: &str) -> Result<LedgerEntry> {
        let mut conn = get_connection(&self.pool)?;
        let entry_db = ledger_entries::table
            .filter(ledger_entries::owner_id.eq(owner_id))
            .filter(ledger_entries::id.eq(entry_id))
            .first::<LedgerEntryDB>(&mut conn)
            .into_core()?;
        Ok(LedgerEntry::from(entry_db))
    }

    fn list_entries_impl(&self, owner_id: &str) -> Result<Vec<LedgerEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let entries_db = ledger_entries::table
            .filter(ledger_entries::owner_id.eq(owner_id))
            .order(ledger_entries::occurred_at.asc())
            .load::<LedgerEntryDB>(&mut conn)
            .into_core()?;
        Ok(entries_db.into_iter().map(LedgerEntry::from).collect())
    }

    fn list_entries_for_month_impl(
        &self,
        owner_id: &str,
        month: MonthKey,
    ) -> Result<Vec<LedgerEntry>> {
        let mut conn = get_connection(&self.pool)?;

        // All timestamps are written as UTC RFC3339 text, so a string range
        // over the month's half-open interval is also a chronological range.
        let month_start = midnight_utc(month.first_day()).to_rfc3339();
        let next_month_start = midnight_utc(month.next().first_day()).to_rfc3339();

        let entries_db = ledger_entries::table
            .filter(ledger_entries::owner_id.eq(owner_id))
            .filter(ledger_entries::occurred_at.ge(month_start))
            .filter(ledger_entries::occurred_at.lt(next_month_start))
            .order(ledger_entries::occurred_at.asc())
            .load::<LedgerEntryDB>(&mut conn)
            .into_core()?;
        Ok(entries_db.into_iter().map(LedgerEntry::from).collect())
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    fn get_entry(&self, owner_id: &str, entry_id: &str) -> Result<LedgerEntry> {
        self.get_entry_impl(owner_id, entry_id)
    }

    fn list_entries(&self, owner_id: &str) -> Result<Vec<LedgerEntry>> {
        self.list_entries_impl(owner_id)
    }

    fn list_entries_for_month(&self, owner_id: &str, month: MonthKey) -> Result<Vec<LedgerEntry>> {
        self.list_entries_for_month_impl(owner_id, month)
    }

    async fn create_entry(&self, new_entry: NewLedgerEntry) -> Result<LedgerEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<LedgerEntry> {
                let mut new_entry_db: NewLedgerEntryDB = new_entry.into();
                if new_entry_db.id.is_none() {
                    new_entry_db.id = Some(Uuid::new_v4().to_string());
                }

                let result_db = diesel::insert_into(ledger_entries::table)
                    .values(&new_entry_db)
                    .returning(LedgerEntryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(LedgerEntry::from(result_db))
            })
            .await
    }

    async fn delete_entry(&self, owner_id: &str, entry_id: &str) -> Result<usize> {
        let owner_id = owner_id.to_string();
        let entry_id = entry_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    ledger_entries::table
                        .filter(ledger_entries::owner_id.eq(owner_id))
                        .filter(ledger_entries::id.eq(entry_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
