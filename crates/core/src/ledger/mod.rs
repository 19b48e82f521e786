//! Double-entry journal posting.
//!
//! This module implements the microfinance general ledger:
//! - Chart of accounts and branch-scoped account resolution
//! - Journal entries, lines and their lifecycle (draft, posted, reversed)
//! - Posting recipes for loan, savings and fee events
//! - Validation of balance, line count and amount precision
//! - The poster, which records entries atomically through a storage port
//! - An in-memory store for tests and embedding

pub mod account;
pub mod balance;
pub mod entry;
pub mod error;
pub mod memory;
pub mod poster;
pub mod recipe;
pub mod reversal;
pub mod store;
pub mod validation;

#[cfg(test)]
mod poster_props;
#[cfg(test)]
mod validation_props;

pub use account::{Account, AccountType};
pub use balance::AccountBalance;
pub use entry::{
    EntryKind, EntryOrigin, EntryStatus, JournalEntry, JournalEntryLine, PostingContext,
    PostingLine, Side, SourceLinks,
};
pub use error::{LedgerError, LineDefect};
pub use memory::MemoryLedger;
pub use poster::{LedgerPoster, PostingSettings, ResolvedLine};
pub use recipe::{
    BusinessEvent, ClientRef, FeeType, Loan, SavingsAccount, SavingsProductType,
    SourceTransaction,
};
pub use store::{AccountResolver, LedgerStore, LedgerTx};
pub use validation::{EntryTotals, validate_journal, validate_lines};
