//! Recurrences module - definitions, schedule math, and the projection engine.

mod recurrences_errors;
mod recurrences_model;
mod recurrences_service;
mod recurrences_traits;
mod schedule;

#[cfg(test)]
mod recurrences_model_tests;

pub use recurrences_errors::RecurrenceError;
pub use recurrences_model::{
    Frequency, MaterializationFailure, MaterializationReport, NewRecurrenceDefinition,
    RecurrenceDefinition,
};
pub use recurrences_service::RecurrenceService;
pub use recurrences_traits::{RecurrenceRepositoryTrait, RecurrenceServiceTrait};
pub use schedule::{occurrence_date_in_month, should_occur_in_month};
