//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Both implement the storage ports of `seashore_core::ledger`.

pub mod account;
pub mod journal;

pub use account::{AccountError, AccountRepository};
pub use journal::{JournalRepository, JournalTx};

use sea_orm::DbErr;
use seashore_core::ledger::LedgerError;

/// Maps a database error onto the ledger's storage failure.
pub(crate) fn storage(err: DbErr) -> LedgerError {
    tracing::error!(error = %err, "Ledger storage error");
    LedgerError::Storage(err.to_string())
}
