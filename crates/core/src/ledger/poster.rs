//! Ledger poster: turns business events into balanced, atomically persisted
//! journal entries.
//!
//! Every posting goes through the same pipeline:
//! 1. Validate line count, amounts and precision, then debits == credits
//! 2. Resolve account codes for the originating branch
//! 3. In one unit of work: lock the accounts, insert header and lines, commit
//!
//! Steps 1 and 2 finish before any storage transaction is opened, so a
//! rejected posting never writes anything.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use seashore_shared::{AppError, LedgerConfig};
use seashore_shared::types::{
    AccountId, BranchId, ClientId, Currency, JournalEntryId, JournalLineId, UserId,
};
use tracing::{debug, error, info, warn};

use super::account::Account;
use super::balance::AccountBalance;
use super::entry::{
    EntryKind, EntryOrigin, EntryStatus, JournalEntry, JournalEntryLine, PostingContext,
    PostingLine, Side, generate_journal_number,
};
use super::error::LedgerError;
use super::recipe::{BusinessEvent, ClientRef, FeeType, Loan, SavingsAccount, SourceTransaction};
use super::reversal::{reversal_description, reversal_reference, reversing_lines};
use super::store::{AccountResolver, LedgerStore, LedgerTx};
use super::validation::{validate_journal, validate_lines};

/// Attempts at drawing an unused journal number before giving up.
const JOURNAL_NUMBER_ATTEMPTS: usize = 16;

/// Posting rules taken from configuration.
///
/// Only built from a validated [`LedgerConfig`], so the scale always fits
/// the journal line columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingSettings {
    decimal_scale: u32,
    currency: Currency,
}

impl PostingSettings {
    /// Fractional digits every amount must fit exactly.
    #[must_use]
    pub const fn decimal_scale(&self) -> u32 {
        self.decimal_scale
    }

    /// Functional currency, used in log output.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }
}

impl Default for PostingSettings {
    fn default() -> Self {
        let config = LedgerConfig::default();
        Self {
            decimal_scale: config.decimal_scale,
            currency: config.currency,
        }
    }
}

impl TryFrom<LedgerConfig> for PostingSettings {
    type Error = AppError;

    fn try_from(config: LedgerConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            decimal_scale: config.decimal_scale,
            currency: config.currency,
        })
    }
}

/// A posting line bound to a concrete account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    /// Account posted to.
    pub account_id: AccountId,
    /// Its GL code.
    pub account_code: String,
    /// Debit or credit.
    pub side: Side,
    /// Positive amount.
    pub amount: Decimal,
    /// Line narration.
    pub description: Option<String>,
    /// Related client.
    pub client_id: Option<ClientId>,
}

/// A validated, resolved posting ready to be written.
#[derive(Debug, Clone)]
pub struct PreparedEntry {
    /// Event kind.
    pub kind: EntryKind,
    /// Header data.
    pub context: PostingContext,
    /// Resolved lines.
    pub lines: Vec<ResolvedLine>,
    /// Entry being reversed, for reversal entries.
    pub reverses: Option<JournalEntryId>,
}

/// Validates postings and records them through a [`LedgerStore`].
#[derive(Debug, Clone)]
pub struct LedgerPoster<R, S> {
    resolver: R,
    store: S,
    settings: PostingSettings,
}

impl<R, S> LedgerPoster<R, S>
where
    R: AccountResolver,
    S: LedgerStore,
{
    /// Creates a poster over an account resolver and a ledger store.
    pub fn new(resolver: R, store: S, settings: PostingSettings) -> Self {
        Self {
            resolver,
            store,
            settings,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active posting settings.
    pub fn settings(&self) -> PostingSettings {
        self.settings
    }

    /// Validates `lines` and resolves their accounts without writing anything.
    ///
    /// # Errors
    ///
    /// `InvalidLine`, `ImbalancedEntry`, `UnknownAccount` or
    /// `ManualPostingNotAllowed`.
    pub async fn prepare(
        &self,
        kind: EntryKind,
        lines: Vec<PostingLine>,
        context: PostingContext,
    ) -> Result<PreparedEntry, LedgerError> {
        validate_lines(&lines, self.settings.decimal_scale)?;

        let mut accounts: HashMap<String, Account> = HashMap::new();
        let mut resolved = Vec::with_capacity(lines.len());
        for line in lines {
            let account = match accounts.get(&line.account_code) {
                Some(account) => account.clone(),
                None => {
                    let account = self.resolve_account(&line.account_code, context.branch_id).await?;
                    accounts.insert(line.account_code.clone(), account.clone());
                    account
                }
            };
            if context.origin == EntryOrigin::Manual && !account.allows_manual_entries {
                return Err(LedgerError::ManualPostingNotAllowed(account.code));
            }
            resolved.push(ResolvedLine {
                account_id: account.id,
                account_code: account.code,
                side: line.side,
                amount: line.amount,
                description: line.description,
                client_id: line.client_id,
            });
        }

        Ok(PreparedEntry {
            kind,
            context,
            lines: resolved,
            reverses: None,
        })
    }

    /// Posts one journal entry in its own unit of work.
    ///
    /// System-generated entries are Posted; manual entries stay Draft.
    ///
    /// # Errors
    ///
    /// Any validation error from [`prepare`](Self::prepare), or `Storage` if
    /// the write or commit fails. Nothing is persisted on error.
    pub async fn post(
        &self,
        kind: EntryKind,
        lines: Vec<PostingLine>,
        context: PostingContext,
    ) -> Result<JournalEntry, LedgerError> {
        let prepared = self
            .prepare(kind, lines, context)
            .await
            .inspect_err(|err| log_rejected(kind, err))?;

        let mut tx = self.store.begin().await?;
        let entry = match write_entry(&mut tx, prepared).await {
            Ok(entry) => entry,
            Err(err) => {
                abandon(tx, &err).await;
                return Err(err);
            }
        };
        tx.commit().await.inspect_err(|err| log_rejected(kind, err))?;

        self.log_recorded(&entry);
        Ok(entry)
    }

    /// Posts one journal entry inside a unit of work the caller owns.
    ///
    /// The caller commits `tx` together with its own business mutation, so
    /// both become visible or neither does. On error the caller must abandon
    /// `tx`.
    ///
    /// # Errors
    ///
    /// Same as [`post`](Self::post), minus commit failures.
    pub async fn post_in(
        &self,
        tx: &mut S::Tx,
        kind: EntryKind,
        lines: Vec<PostingLine>,
        context: PostingContext,
    ) -> Result<JournalEntry, LedgerError> {
        let prepared = self
            .prepare(kind, lines, context)
            .await
            .inspect_err(|err| log_rejected(kind, err))?;
        let entry = write_entry(tx, prepared).await?;
        debug!(
            journal_number = %entry.journal_number,
            kind = %entry.kind,
            "Journal entry staged in caller transaction"
        );
        Ok(entry)
    }

    /// Posts the recipe of a business event.
    ///
    /// # Errors
    ///
    /// Same as [`post`](Self::post).
    pub async fn post_event(
        &self,
        event: &BusinessEvent<'_>,
        actor: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        self.post(event.kind(), event.lines(), event.context(actor))
            .await
    }

    /// Posts the recipe of a business event inside the caller's unit of work.
    ///
    /// # Errors
    ///
    /// Same as [`post_in`](Self::post_in).
    pub async fn post_event_in(
        &self,
        tx: &mut S::Tx,
        event: &BusinessEvent<'_>,
        actor: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        self.post_in(tx, event.kind(), event.lines(), event.context(actor))
            .await
    }

    /// Dr Loan Receivable / Cr Cash for the loan principal.
    pub async fn post_loan_disbursement(
        &self,
        loan: &Loan,
        actor: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        self.post_event(&BusinessEvent::LoanDisbursement { loan }, actor)
            .await
    }

    /// Dr Cash / Cr Loan Receivable (principal) + Cr Interest Income (interest).
    ///
    /// `amount` must equal `principal_portion + interest_portion`.
    pub async fn post_loan_repayment(
        &self,
        loan: &Loan,
        amount: Decimal,
        principal_portion: Decimal,
        interest_portion: Decimal,
        actor: UserId,
        origin: &SourceTransaction,
    ) -> Result<JournalEntry, LedgerError> {
        let event = BusinessEvent::LoanRepayment {
            loan,
            amount,
            principal: principal_portion,
            interest: interest_portion,
            origin,
        };
        self.post_event(&event, actor).await
    }

    /// Dr Cash / Cr Savings Liability for the account's product.
    pub async fn post_savings_deposit(
        &self,
        account: &SavingsAccount,
        amount: Decimal,
        actor: UserId,
        origin: &SourceTransaction,
    ) -> Result<JournalEntry, LedgerError> {
        let event = BusinessEvent::SavingsDeposit {
            account,
            amount,
            origin,
        };
        self.post_event(&event, actor).await
    }

    /// Dr Savings Liability for the account's product / Cr Cash.
    pub async fn post_savings_withdrawal(
        &self,
        account: &SavingsAccount,
        amount: Decimal,
        actor: UserId,
        origin: &SourceTransaction,
    ) -> Result<JournalEntry, LedgerError> {
        let event = BusinessEvent::SavingsWithdrawal {
            account,
            amount,
            origin,
        };
        self.post_event(&event, actor).await
    }

    /// Dr Cash / Cr the fee's income account.
    pub async fn post_fee_collection(
        &self,
        fee: FeeType,
        amount: Decimal,
        branch_id: BranchId,
        client: &ClientRef,
        actor: UserId,
        origin: &SourceTransaction,
    ) -> Result<JournalEntry, LedgerError> {
        let event = BusinessEvent::FeeCollection {
            fee,
            amount,
            branch_id,
            client,
            origin,
        };
        self.post_event(&event, actor).await
    }

    /// Posts a Draft entry after review.
    ///
    /// # Errors
    ///
    /// `EntryNotFound`, `InvalidState` unless the entry is Draft, or a
    /// validation error if the stored lines no longer balance.
    pub async fn approve(
        &self,
        id: JournalEntryId,
        actor: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut tx = self.store.begin().await?;
        let entry = match approve_in(&mut tx, id, actor).await {
            Ok(entry) => entry,
            Err(err) => {
                abandon(tx, &err).await;
                return Err(err);
            }
        };
        tx.commit().await?;

        info!(
            journal_number = %entry.journal_number,
            approved_by = %actor,
            "Journal entry approved"
        );
        Ok(entry)
    }

    /// Cancels a Posted entry with a mirror entry dated `reversal_date` and
    /// returns the mirror.
    ///
    /// The original is marked Reversed in the same unit of work. The mirror
    /// carries the reference `REV-<original journal number>`.
    ///
    /// # Errors
    ///
    /// `EntryNotFound`, `InvalidState` unless the entry is Posted, or a
    /// validation error if the stored lines no longer balance.
    pub async fn reverse(
        &self,
        id: JournalEntryId,
        actor: UserId,
        reversal_date: NaiveDate,
        reason: &str,
    ) -> Result<JournalEntry, LedgerError> {
        let mut tx = self.store.begin().await?;
        let reversal = match reverse_in(&mut tx, id, actor, reversal_date, reason).await {
            Ok(entry) => entry,
            Err(err) => {
                abandon(tx, &err).await;
                return Err(err);
            }
        };
        tx.commit().await?;

        info!(
            journal_number = %reversal.journal_number,
            reverses = %id,
            reason,
            "Journal entry reversed"
        );
        Ok(reversal)
    }

    /// Balance of the account `code` as seen from `branch`.
    ///
    /// # Errors
    ///
    /// `UnknownAccount` if the code does not resolve.
    pub async fn account_balance(
        &self,
        code: &str,
        branch: BranchId,
        as_of: Option<NaiveDate>,
    ) -> Result<AccountBalance, LedgerError> {
        let account = self.resolve_account(code, branch).await?;
        let lines = self.store.balance_lines(account.id, as_of).await?;
        Ok(AccountBalance::from_lines(&account, &lines))
    }

    /// Loads a committed entry.
    pub async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, LedgerError> {
        self.store.find_entry(id).await
    }

    async fn resolve_account(&self, code: &str, branch: BranchId) -> Result<Account, LedgerError> {
        match self.resolver.resolve(code, branch).await? {
            Some(account) if account.is_active => Ok(account),
            _ => Err(LedgerError::UnknownAccount {
                code: code.to_string(),
                branch,
            }),
        }
    }

    fn log_recorded(&self, entry: &JournalEntry) {
        info!(
            journal_number = %entry.journal_number,
            kind = %entry.kind,
            status = %entry.status,
            branch_id = %entry.branch_id,
            total = %entry.total_debit(),
            currency = %self.settings.currency,
            lines = entry.lines.len(),
            "Journal entry recorded"
        );
    }
}

/// Writes a prepared entry: re-checks the built lines, locks their accounts,
/// draws a journal number and inserts header and lines.
async fn write_entry<T: LedgerTx>(
    tx: &mut T,
    prepared: PreparedEntry,
) -> Result<JournalEntry, LedgerError> {
    let PreparedEntry {
        kind,
        context,
        lines,
        reverses,
    } = prepared;

    let now = Utc::now();
    let id = JournalEntryId::new();
    let lines: Vec<JournalEntryLine> = lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let (debit, credit) = match line.side {
                Side::Debit => (line.amount, Decimal::ZERO),
                Side::Credit => (Decimal::ZERO, line.amount),
            };
            JournalEntryLine {
                id: JournalLineId::new(),
                entry_id: id,
                line_no: u32::try_from(index + 1).unwrap_or(u32::MAX),
                account_id: line.account_id,
                account_code: line.account_code,
                debit,
                credit,
                description: line.description.or_else(|| Some(context.description.clone())),
                client_id: line.client_id,
            }
        })
        .collect();

    let mut entry = JournalEntry {
        id,
        journal_number: String::new(),
        kind,
        status: EntryStatus::Draft,
        transaction_date: context.transaction_date,
        posting_date: None,
        branch_id: context.branch_id,
        description: context.description,
        reference_number: context.reference_number,
        created_by: context.actor,
        created_at: now,
        posted_by: None,
        posted_at: None,
        links: context.links,
        reverses,
        lines,
    };
    if context.origin == EntryOrigin::System {
        entry.mark_posted(context.actor, now, context.transaction_date);
    }
    validate_journal(&entry)?;

    tx.lock_accounts(&entry.account_ids()).await?;
    entry.journal_number = allocate_journal_number(tx, now.date_naive()).await?;
    tx.insert_entry(&entry).await?;
    Ok(entry)
}

async fn allocate_journal_number<T: LedgerTx>(
    tx: &mut T,
    date: NaiveDate,
) -> Result<String, LedgerError> {
    for _ in 0..JOURNAL_NUMBER_ATTEMPTS {
        let candidate = generate_journal_number(date);
        if !tx.journal_number_taken(&candidate).await? {
            return Ok(candidate);
        }
    }
    Err(LedgerError::Storage(format!(
        "no free journal number for {date} after {JOURNAL_NUMBER_ATTEMPTS} attempts"
    )))
}

async fn approve_in<T: LedgerTx>(
    tx: &mut T,
    id: JournalEntryId,
    actor: UserId,
) -> Result<JournalEntry, LedgerError> {
    let mut entry = tx
        .load_entry_for_update(id)
        .await?
        .ok_or(LedgerError::EntryNotFound(id))?;
    if entry.status != EntryStatus::Draft {
        return Err(LedgerError::InvalidState {
            id,
            status: entry.status,
            action: "approve",
        });
    }
    validate_journal(&entry)?;

    tx.lock_accounts(&entry.account_ids()).await?;
    let now = Utc::now();
    entry.mark_posted(actor, now, now.date_naive());
    tx.update_status(&entry).await?;
    Ok(entry)
}

async fn reverse_in<T: LedgerTx>(
    tx: &mut T,
    id: JournalEntryId,
    actor: UserId,
    reversal_date: NaiveDate,
    reason: &str,
) -> Result<JournalEntry, LedgerError> {
    let mut original = tx
        .load_entry_for_update(id)
        .await?
        .ok_or(LedgerError::EntryNotFound(id))?;
    if original.status != EntryStatus::Posted {
        return Err(LedgerError::InvalidState {
            id,
            status: original.status,
            action: "reverse",
        });
    }

    let lines = reversing_lines(&original)?;
    let context = PostingContext::system(
        reversal_date,
        original.branch_id,
        reversal_description(&original, reason),
        actor,
    )
    .with_reference(reversal_reference(&original))
    .with_links(original.links);

    let reversal = write_entry(
        tx,
        PreparedEntry {
            kind: EntryKind::Reversal,
            context,
            lines,
            reverses: Some(original.id),
        },
    )
    .await?;

    original.status = EntryStatus::Reversed;
    tx.update_status(&original).await?;
    Ok(reversal)
}

async fn abandon<T: LedgerTx>(tx: T, cause: &LedgerError) {
    if let Err(err) = tx.rollback().await {
        error!(error = %err, cause = %cause, "Rollback failed");
    }
}

fn log_rejected(kind: EntryKind, err: &LedgerError) {
    warn!(
        kind = %kind,
        code = err.error_code(),
        error = %err,
        "Journal entry rejected"
    );
}

#[cfg(test)]
#[path = "poster_tests.rs"]
mod tests;
