use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, error};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{DatabaseError, Error, Result, ValidationError};
use crate::ledger::{LedgerRepositoryTrait, NewLedgerEntry};
use crate::recurrences::recurrences_errors::RecurrenceError;
use crate::recurrences::recurrences_model::{
    MaterializationFailure, MaterializationReport, NewRecurrenceDefinition, RecurrenceDefinition,
};
use crate::recurrences::recurrences_traits::{RecurrenceRepositoryTrait, RecurrenceServiceTrait};
use crate::recurrences::schedule;
use crate::utils::time_utils::{midnight_utc, MonthKey};

/// Projection engine for recurrence definitions.
///
/// Turns definitions into concrete ledger entries one calendar month at
/// a time, keeps the materialized entries consistent with edits and
/// deletes, and tracks per-month skips. Materialization passes for the
/// same owner and month are serialized through an in-process lock so
/// the read-check-then-write sequence cannot race itself.
pub struct RecurrenceService {
    recurrence_repository: Arc<dyn RecurrenceRepositoryTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    materialization_locks: DashMap<(String, MonthKey), Arc<Mutex<()>>>,
}

impl RecurrenceService {
    pub fn new(
        recurrence_repository: Arc<dyn RecurrenceRepositoryTrait>,
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    ) -> Self {
        Self {
            recurrence_repository,
            ledger_repository,
            materialization_locks: DashMap::new(),
        }
    }

    fn validate(
        name: &str,
        amount: Decimal,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Recurrence amount must be a positive magnitude".to_string(),
            )
            .into());
        }
        if let Some(end) = end_date {
            if end < start_date {
                return Err(ValidationError::InvalidInput(
                    "Recurrence end date must not precede its start date".to_string(),
                )
                .into());
            }
        }
        Ok(())
    }

    fn load_definition(&self, owner_id: &str, definition_id: &str) -> Result<RecurrenceDefinition> {
        self.recurrence_repository
            .get_definition(owner_id, definition_id)
            .map_err(|e| match e {
                Error::Database(DatabaseError::NotFound(_)) => {
                    RecurrenceError::NotFound(definition_id.to_string()).into()
                }
                other => other,
            })
    }
}

#[async_trait]
impl RecurrenceServiceTrait for RecurrenceService {
    fn get_definition(&self, owner_id: &str, definition_id: &str) -> Result<RecurrenceDefinition> {
        self.load_definition(owner_id, definition_id)
    }

    fn list_definitions(&self, owner_id: &str) -> Result<Vec<RecurrenceDefinition>> {
        self.recurrence_repository.list_definitions(owner_id)
    }

    async fn create_definition(
        &self,
        mut new_definition: NewRecurrenceDefinition,
    ) -> Result<RecurrenceDefinition> {
        Self::validate(
            &new_definition.name,
            new_definition.amount,
            new_definition.start_date,
            new_definition.end_date,
        )?;
        new_definition.id = Some(Uuid::new_v4().to_string());

        debug!("Creating recurrence definition '{}'", new_definition.name);
        // No materialization here; the next pass for the relevant month
        // picks the new definition up.
        self.recurrence_repository
            .create_definition(new_definition)
            .await
    }

    async fn update_definition(
        &self,
        definition: RecurrenceDefinition,
    ) -> Result<RecurrenceDefinition> {
        Self::validate(
            &definition.name,
            definition.amount,
            definition.start_date,
            definition.end_date,
        )?;

        debug!("Updating recurrence definition {}", definition.id);
        // Resolve the definition first so an unknown id surfaces as
        // NotFound rather than as a write failure.
        self.load_definition(&definition.owner_id, &definition.id)?;
        let updated = self
            .recurrence_repository
            .update_definition(definition)
            .await?;

        // Edits never rewrite already-materialized entries; reconciling
        // only fills a genuinely missing entry for the current month.
        self.reconcile_on_edit(&updated).await?;
        Ok(updated)
    }

    async fn materialize_month(
        &self,
        owner_id: &str,
        month: MonthKey,
    ) -> Result<MaterializationReport> {
        let lock = self
            .materialization_locks
            .entry((owner_id.to_string(), month))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        debug!("Materializing {} for owner {}", month, owner_id);

        let definitions = self
            .recurrence_repository
            .list_active_definitions(owner_id)?;
        let mut report = MaterializationReport::new(month);

        // Already-materialized source ids, bucketed by the month the
        // entry occurred in. Yearly occurrences land in their
        // anniversary month rather than the requested one, so buckets
        // load lazily per occurrence month.
        let mut existing: HashMap<MonthKey, HashSet<String>> = HashMap::new();

        for definition in definitions {
            if !schedule::should_occur_in_month(&definition, month) {
                if definition.skipped_months.contains(&month) {
                    report.skipped += 1;
                } else {
                    report.not_due += 1;
                }
                continue;
            }

            let occurrence_date = schedule::occurrence_date_in_month(&definition, month);
            let occurrence_month = MonthKey::from_date(occurrence_date);

            let bucket = match existing.entry(occurrence_month) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(slot) => {
                    let ids = self
                        .ledger_repository
                        .list_entries_for_month(owner_id, occurrence_month)?
                        .into_iter()
                        .filter_map(|entry| entry.source_recurrence_id)
                        .collect::<HashSet<_>>();
                    slot.insert(ids)
                }
            };

            if bucket.contains(&definition.id) {
                report.already_materialized += 1;
                continue;
            }

            let new_entry = NewLedgerEntry {
                id: Some(Uuid::new_v4().to_string()),
                owner_id: definition.owner_id.clone(),
                description: definition.name.clone(),
                amount: definition.amount,
                kind: definition.kind,
                category: definition.category.clone(),
                occurred_at: midnight_utc(occurrence_date),
                source_recurrence_id: Some(definition.id.clone()),
            };

            // Each write is independent; a failure on one definition
            // does not stop the rest of the pass.
            match self.ledger_repository.create_entry(new_entry).await {
                Ok(entry) => {
                    bucket.insert(definition.id.clone());
                    report.created.push(entry);
                }
                Err(e) => {
                    error!(
                        "Failed to materialize definition {} for {}: {}",
                        definition.id, month, e
                    );
                    report.failures.push(MaterializationFailure {
                        recurrence_id: definition.id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if report.failures.is_empty() {
            Ok(report)
        } else {
            Err(RecurrenceError::PartialMaterialization {
                month,
                created: report.created.len(),
                failed: report.failures,
            }
            .into())
        }
    }

    async fn reconcile_on_edit(
        &self,
        definition: &RecurrenceDefinition,
    ) -> Result<Option<MaterializationReport>> {
        if !definition.is_active {
            return Ok(None);
        }

        // Only the current month is reconciled; past months are never
        // retroactively materialized or corrected by an edit.
        let month = MonthKey::current();
        let report = self
            .materialize_month(&definition.owner_id, month)
            .await?;
        Ok(Some(report))
    }

    async fn delete_definition_cascade(
        &self,
        owner_id: &str,
        definition_id: &str,
    ) -> Result<usize> {
        let definition = self.load_definition(owner_id, definition_id)?;

        let entries = self.ledger_repository.list_entries(owner_id)?;
        let mut removed = 0;
        for entry in entries {
            if entry.source_recurrence_id.as_deref() == Some(definition_id) {
                // Abort before the definition delete if an entry delete
                // fails; the cascade is safe to re-run.
                self.ledger_repository
                    .delete_entry(owner_id, &entry.id)
                    .await?;
                removed += 1;
            }
        }

        self.recurrence_repository
            .delete_definition(owner_id, &definition.id)
            .await?;

        debug!(
            "Deleted definition {} and {} materialized entries",
            definition_id, removed
        );
        Ok(removed)
    }

    async fn skip_month(
        &self,
        owner_id: &str,
        definition_id: &str,
        month: MonthKey,
    ) -> Result<RecurrenceDefinition> {
        let mut definition = self.load_definition(owner_id, definition_id)?;
        if !definition.skipped_months.insert(month) {
            return Ok(definition);
        }

        // Skipping only suppresses future materialization; an entry
        // already created for the month stays in the ledger.
        self.recurrence_repository
            .update_definition(definition)
            .await
    }

    async fn unskip_month(
        &self,
        owner_id: &str,
        definition_id: &str,
        month: MonthKey,
    ) -> Result<RecurrenceDefinition> {
        let mut definition = self.load_definition(owner_id, definition_id)?;
        if !definition.skipped_months.remove(&month) {
            return Ok(definition);
        }

        self.recurrence_repository
            .update_definition(definition)
            .await
    }
}
