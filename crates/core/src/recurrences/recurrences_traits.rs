use crate::errors::Result;
use crate::recurrences::recurrences_model::{
    MaterializationReport, NewRecurrenceDefinition, RecurrenceDefinition,
};
use crate::utils::time_utils::MonthKey;
use async_trait::async_trait;

/// Trait for recurrence definition repository operations
#[async_trait]
pub trait RecurrenceRepositoryTrait: Send + Sync {
    fn get_definition(&self, owner_id: &str, definition_id: &str) -> Result<RecurrenceDefinition>;
    fn list_definitions(&self, owner_id: &str) -> Result<Vec<RecurrenceDefinition>>;
    fn list_active_definitions(&self, owner_id: &str) -> Result<Vec<RecurrenceDefinition>>;
    async fn create_definition(
        &self,
        new_definition: NewRecurrenceDefinition,
    ) -> Result<RecurrenceDefinition>;
    async fn update_definition(
        &self,
        definition: RecurrenceDefinition,
    ) -> Result<RecurrenceDefinition>;
    async fn delete_definition(&self, owner_id: &str, definition_id: &str) -> Result<usize>;
}

/// Trait for the recurrence projection engine
#[async_trait]
pub trait RecurrenceServiceTrait: Send + Sync {
    fn get_definition(&self, owner_id: &str, definition_id: &str) -> Result<RecurrenceDefinition>;
    fn list_definitions(&self, owner_id: &str) -> Result<Vec<RecurrenceDefinition>>;
    async fn create_definition(
        &self,
        new_definition: NewRecurrenceDefinition,
    ) -> Result<RecurrenceDefinition>;
    async fn update_definition(
        &self,
        definition: RecurrenceDefinition,
    ) -> Result<RecurrenceDefinition>;
    async fn materialize_month(
        &self,
        owner_id: &str,
        month: MonthKey,
    ) -> Result<MaterializationReport>;
    async fn reconcile_on_edit(
        &self,
        definition: &RecurrenceDefinition,
    ) -> Result<Option<MaterializationReport>>;
    async fn delete_definition_cascade(&self, owner_id: &str, definition_id: &str)
        -> Result<usize>;
    async fn skip_month(
        &self,
        owner_id: &str,
        definition_id: &str,
        month: MonthKey,
    ) -> Result<RecurrenceDefinition>;
    async fn unskip_month(
        &self,
        owner_id: &str,
        definition_id: &str,
        month: MonthKey,
    ) -> Result<RecurrenceDefinition>;
}
