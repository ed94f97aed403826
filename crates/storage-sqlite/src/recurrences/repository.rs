use finflow_core::recurrences::{
    NewRecurrenceDefinition, RecurrenceDefinition, RecurrenceRepositoryTrait,
};
use finflow_core::Result;

use super::model::{NewRecurrenceDefinitionDB, RecurrenceDefinitionDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::recurrence_definitions;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;

use std::sync::Arc;
use uuid::Uuid;

pub struct RecurrenceRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl RecurrenceRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        RecurrenceRepository { pool, writer }
    }

    fn get_definition_impl(
        &self,
        owner_id: &str,
        definition_id: &str,
    ) -> Result<RecurrenceDefinition> {
        let mut conn = get_connection(&self.pool)?;
        let definition_db = recurrence_definitions::table
            .filter(recurrence_definitions::owner_id.eq(owner_id))
            .filter(recurrence_definitions::id.eq(definition_id))
            .first::<RecurrenceDefinitionDB>(&mut conn)
            .map_err(StorageError::from)?;
        definition_db.try_into()
    }

    fn list_definitions_impl(&self, owner_id: &str) -> Result<Vec<RecurrenceDefinition>> {
        let mut conn = get_connection(&self.pool)?;
        let definitions_db = recurrence_definitions::table
            .filter(recurrence_definitions::owner_id.eq(owner_id))
            .order(recurrence_definitions::name.asc())
            .load::<RecurrenceDefinitionDB>(&mut conn)
            .map_err(StorageError::from)?;
        definitions_db
            .into_iter()
            .map(RecurrenceDefinition::try_from)
            .collect()
    }

    fn list_active_definitions_impl(&self, owner_id: &str) -> Result<Vec<RecurrenceDefinition>> {
        let mut conn = get_connection(&self.pool)?;
        let definitions_db = recurrence_definitions::table
            .filter(recurrence_definitions::owner_id.eq(owner_id))
            .filter(recurrence_definitions::is_active.eq(true))
            .order(recurrence_definitions::name.asc())
            .load::<RecurrenceDefinitionDB>(&mut conn)
            .map_err(StorageError::from)?;
        definitions_db
            .into_iter()
            .map(RecurrenceDefinition::try_from)
            .collect()
    }
}

#[async_trait]
impl RecurrenceRepositoryTrait for RecurrenceRepository {
    fn get_definition(&self, owner_id: &str, definition_id: &str) -> Result<RecurrenceDefinition> {
        self.get_definition_impl(owner_id, definition_id)
    }

    fn list_definitions(&self, owner_id: &str) -> Result<Vec<RecurrenceDefinition>> {
        self.list_definitions_impl(owner_id)
    }

    fn list_active_definitions(&self, owner_id: &str) -> Result<Vec<RecurrenceDefinition>> {
        self.list_active_definitions_impl(owner_id)
    }

    async fn create_definition(
        &self,
        new_definition: NewRecurrenceDefinition,
    ) -> Result<RecurrenceDefinition> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<RecurrenceDefinition> {
                    let mut new_definition_db: NewRecurrenceDefinitionDB = new_definition.into();
                    if new_definition_db.id.is_none() {
                        new_definition_db.id = Some(Uuid::new_v4().to_string());
                    }

                    let result_db = diesel::insert_into(recurrence_definitions::table)
                        .values(&new_definition_db)
                        .returning(RecurrenceDefinitionDB::as_returning())
                        .get_result::<RecurrenceDefinitionDB>(conn)
                        .map_err(StorageError::from)?;
                    result_db.try_into()
                },
            )
            .await
    }

    async fn update_definition(
        &self,
        definition: RecurrenceDefinition,
    ) -> Result<RecurrenceDefinition> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<RecurrenceDefinition> {
                    let definition_db: RecurrenceDefinitionDB = definition.into();

                    // Scoping the update by owner keeps a mismatched owner id
                    // from touching another owner's row; zero rows updated
                    // surfaces as NotFound on the read-back.
                    diesel::update(
                        recurrence_definitions::table
                            .filter(recurrence_definitions::owner_id.eq(&definition_db.owner_id))
                            .filter(recurrence_definitions::id.eq(&definition_db.id)),
                    )
                    .set(&definition_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                    let updated_db = recurrence_definitions::table
                        .filter(recurrence_definitions::owner_id.eq(&definition_db.owner_id))
                        .filter(recurrence_definitions::id.eq(&definition_db.id))
                        .first::<RecurrenceDefinitionDB>(conn)
                        .map_err(StorageError::from)?;
                    updated_db.try_into()
                },
            )
            .await
    }

    async fn delete_definition(&self, owner_id: &str, definition_id: &str) -> Result<usize> {
        let owner_id = owner_id.to_string();
        let definition_id = definition_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    recurrence_definitions::table
                        .filter(recurrence_definitions::owner_id.eq(owner_id))
                        .filter(recurrence_definitions::id.eq(definition_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
