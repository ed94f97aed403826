//! Finflow Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Finflow: the ledger
//! of realized transactions and the recurrence projection engine that
//! turns recurring definitions into concrete monthly entries. It is
//! database-agnostic and defines traits that are implemented by the
//! `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod ledger;
pub mod recurrences;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
