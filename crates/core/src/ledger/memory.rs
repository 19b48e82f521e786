//! In-memory ledger implementing the storage ports.
//!
//! Accounts live in a concurrent map; the journal sits behind an async mutex
//! that a [`MemoryTx`] holds from `begin` until commit or drop, so units of
//! work are fully serialised. Writes are staged and applied on commit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use seashore_shared::types::{AccountId, BranchId, JournalEntryId};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::account::Account;
use super::entry::{JournalEntry, JournalEntryLine};
use super::error::LedgerError;
use super::store::{AccountResolver, LedgerStore, LedgerTx};

#[derive(Debug, Default)]
struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    fn find(&self, id: JournalEntryId) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

/// Chart of accounts and journal held in process memory.
///
/// Cloning is cheap and clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    accounts: Arc<DashMap<AccountId, Account>>,
    journal: Arc<Mutex<Journal>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account to the chart and returns its id.
    pub fn add_account(&self, account: Account) -> AccountId {
        let id = account.id;
        self.accounts.insert(id, account);
        id
    }

    /// Returns a copy of the account with `id`.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).map(|account| account.clone())
    }

    /// Snapshot of every committed entry, in insertion order.
    pub async fn entries(&self) -> Vec<JournalEntry> {
        self.journal.lock().await.entries.clone()
    }

    /// Makes the next commit fail after its writes were staged.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AccountResolver for MemoryLedger {
    async fn resolve(&self, code: &str, branch: BranchId) -> Result<Option<Account>, LedgerError> {
        let mut global = None;
        for item in self.accounts.iter() {
            let account = item.value();
            if !account.is_active || account.code != code {
                continue;
            }
            match account.branch {
                Some(owner) if owner == branch => return Ok(Some(account.clone())),
                None => global = Some(account.clone()),
                Some(_) => {}
            }
        }
        Ok(global)
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, LedgerError> {
        Ok(MemoryTx {
            journal: Arc::clone(&self.journal).lock_owned().await,
            inserted: Vec::new(),
            updated: Vec::new(),
            fail_commit: Arc::clone(&self.fail_next_commit),
        })
    }

    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, LedgerError> {
        Ok(self.journal.lock().await.find(id).cloned())
    }

    async fn balance_lines(
        &self,
        account: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<JournalEntryLine>, LedgerError> {
        let journal = self.journal.lock().await;
        let lines = journal
            .entries
            .iter()
            .filter(|entry| entry.status.counts_toward_balance())
            .filter(|entry| match (as_of, entry.posting_date) {
                (Some(limit), Some(posted)) => posted <= limit,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .flat_map(|entry| entry.lines.iter())
            .filter(|line| line.account_id == account)
            .cloned()
            .collect();
        Ok(lines)
    }
}

/// Unit of work over a [`MemoryLedger`].
#[derive(Debug)]
pub struct MemoryTx {
    journal: OwnedMutexGuard<Journal>,
    inserted: Vec<JournalEntry>,
    updated: Vec<JournalEntry>,
    fail_commit: Arc<AtomicBool>,
}

#[async_trait]
impl LedgerTx for MemoryTx {
    async fn lock_accounts(&mut self, _ids: &[AccountId]) -> Result<(), LedgerError> {
        // The journal guard already excludes every other writer.
        Ok(())
    }

    async fn journal_number_taken(&mut self, number: &str) -> Result<bool, LedgerError> {
        Ok(self
            .journal
            .entries
            .iter()
            .chain(self.inserted.iter())
            .any(|entry| entry.journal_number == number))
    }

    async fn insert_entry(&mut self, entry: &JournalEntry) -> Result<(), LedgerError> {
        if self.journal_number_taken(&entry.journal_number).await? {
            return Err(LedgerError::Storage(format!(
                "duplicate journal number {}",
                entry.journal_number
            )));
        }
        self.inserted.push(entry.clone());
        Ok(())
    }

    async fn load_entry_for_update(
        &mut self,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let staged = self
            .updated
            .iter()
            .rev()
            .chain(self.inserted.iter())
            .find(|entry| entry.id == id);
        Ok(staged.or_else(|| self.journal.find(id)).cloned())
    }

    async fn update_status(&mut self, entry: &JournalEntry) -> Result<(), LedgerError> {
        if let Some(staged) = self.inserted.iter_mut().find(|staged| staged.id == entry.id) {
            staged.status = entry.status;
            staged.posted_by = entry.posted_by;
            staged.posted_at = entry.posted_at;
            staged.posting_date = entry.posting_date;
            return Ok(());
        }
        if self.journal.find(entry.id).is_none() {
            return Err(LedgerError::EntryNotFound(entry.id));
        }
        self.updated.push(entry.clone());
        Ok(())
    }

    async fn commit(mut self) -> Result<(), LedgerError> {
        if self.fail_commit.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::Storage("commit failed".to_string()));
        }
        let updated = std::mem::take(&mut self.updated);
        for change in updated {
            if let Some(entry) = self.journal.entries.iter_mut().find(|e| e.id == change.id) {
                entry.status = change.status;
                entry.posted_by = change.posted_by;
                entry.posted_at = change.posted_at;
                entry.posting_date = change.posting_date;
            }
        }
        let inserted = std::mem::take(&mut self.inserted);
        self.journal.entries.extend(inserted);
        Ok(())
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        Ok(())
    }
}
