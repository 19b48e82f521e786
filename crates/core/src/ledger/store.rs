//! Storage ports the poster depends on.
//!
//! The core never talks to a database directly. `seashore-db` implements
//! these traits over Postgres; [`MemoryLedger`](super::memory::MemoryLedger)
//! implements them in memory.

use async_trait::async_trait;
use chrono::NaiveDate;
use seashore_shared::types::{AccountId, BranchId, JournalEntryId};

use super::account::Account;
use super::entry::{JournalEntry, JournalEntryLine};
use super::error::LedgerError;

/// Resolves GL codes to accounts.
#[async_trait]
pub trait AccountResolver: Send + Sync {
    /// Looks up the active account with `code` visible from `branch`.
    ///
    /// A branch-scoped account for `branch` wins over a global account with
    /// the same code. Returns `Ok(None)` if neither exists.
    async fn resolve(&self, code: &str, branch: BranchId) -> Result<Option<Account>, LedgerError>;
}

/// Opens units of work and answers read queries outside of one.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Unit-of-work type.
    type Tx: LedgerTx;

    /// Starts a new unit of work.
    async fn begin(&self) -> Result<Self::Tx, LedgerError>;

    /// Loads a committed entry with its lines.
    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, LedgerError>;

    /// Lines posted to `account` by entries that count toward balances,
    /// optionally limited to entries posted on or before `as_of`.
    async fn balance_lines(
        &self,
        account: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<JournalEntryLine>, LedgerError>;
}

/// An all-or-nothing unit of work.
///
/// Dropping a transaction without committing discards every write made
/// through it.
#[async_trait]
pub trait LedgerTx: Send {
    /// Takes an exclusive lock on each account until commit or rollback.
    ///
    /// Callers pass ids sorted so concurrent writers lock in the same order.
    async fn lock_accounts(&mut self, ids: &[AccountId]) -> Result<(), LedgerError>;

    /// Returns true if a journal number is already used.
    async fn journal_number_taken(&mut self, number: &str) -> Result<bool, LedgerError>;

    /// Inserts an entry header and all of its lines.
    async fn insert_entry(&mut self, entry: &JournalEntry) -> Result<(), LedgerError>;

    /// Loads an entry (including entries inserted in this unit of work),
    /// locking it against concurrent status changes.
    async fn load_entry_for_update(
        &mut self,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, LedgerError>;

    /// Persists the status and posting fields of `entry`'s header.
    async fn update_status(&mut self, entry: &JournalEntry) -> Result<(), LedgerError>;

    /// Makes every write visible atomically.
    async fn commit(self) -> Result<(), LedgerError>;

    /// Discards every write.
    async fn rollback(self) -> Result<(), LedgerError>;
}
