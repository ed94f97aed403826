//! Recurrence engine error types.
//!
//! These cover lookups of missing definitions, frequency values outside
//! the closed set, and materialization passes that only partially
//! succeeded.

use thiserror::Error;

use crate::utils::time_utils::MonthKey;

use super::recurrences_model::MaterializationFailure;

/// Errors specific to recurrence operations.
#[derive(Error, Debug)]
pub enum RecurrenceError {
    /// The referenced recurrence definition does not exist.
    #[error("Recurrence definition not found: {0}")]
    NotFound(String),

    /// A frequency value outside the enumerated set was encountered.
    #[error("Invalid recurrence frequency: {0}")]
    InvalidFrequency(String),

    /// A materialization pass finished, but at least one definition's
    /// write failed. Entries that were written are kept; the pass is
    /// safe to retry.
    #[error(
        "Materialization for {month} created {created} entries but failed for {} definition(s)",
        failed.len()
    )]
    PartialMaterialization {
        month: MonthKey,
        created: usize,
        failed: Vec<MaterializationFailure>,
    },
}

impl RecurrenceError {
    /// Creates a NotFound error.
    pub fn not_found(definition_id: impl Into<String>) -> Self {
        Self::NotFound(definition_id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RecurrenceError::not_found("rec-42");
        assert_eq!(err.to_string(), "Recurrence definition not found: rec-42");

        let err = RecurrenceError::InvalidFrequency("fortnightly".to_string());
        assert_eq!(err.to_string(), "Invalid recurrence frequency: fortnightly");

        let err = RecurrenceError::PartialMaterialization {
            month: MonthKey::new(2024, 3),
            created: 2,
            failed: vec![MaterializationFailure {
                recurrence_id: "rec-1".to_string(),
                message: "boom".to_string(),
            }],
        };
        assert_eq!(
            err.to_string(),
            "Materialization for 2024-03 created 2 entries but failed for 1 definition(s)"
        );
    }
}
