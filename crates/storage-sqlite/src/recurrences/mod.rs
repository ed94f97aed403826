//! SQLite storage implementation for recurrence definitions.

mod model;
mod repository;

pub use model::{NewRecurrenceDefinitionDB, RecurrenceDefinitionDB};
pub use repository::RecurrenceRepository;
