//! Ledger module - domain models, services, and traits.

mod ledger_model;
mod ledger_service;
mod ledger_traits;


pub use ledger_model::{EntryKind, LedgerEntry, NewLedgerEntry};
pub use ledger_service::LedgerService;
pub use ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};

pub(crate) use ledger_model::timestamp_format;
