//! Journal entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use seashore_shared::types::{
    AccountId, BranchId, ClientId, JournalEntryId, JournalLineId, LoanId, SavingsAccountId,
    TransactionId, UserId,
};

use super::error::LineDefect;

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit (increases assets/expenses, decreases liabilities/equity/income).
    Debit,
    /// Credit (decreases assets/expenses, increases liabilities/equity/income).
    Credit,
}

impl Side {
    /// Returns the other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// What kind of business event produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Human-entered journal.
    Manual,
    /// Human-entered correction.
    Adjustment,
    /// Loan principal paid out to a client.
    LoanDisbursement,
    /// Loan repayment received.
    LoanRepayment,
    /// Cash deposited into a savings account.
    SavingsDeposit,
    /// Cash withdrawn from a savings account.
    SavingsWithdrawal,
    /// Fee collected from a client.
    FeeCollection,
    /// Mirror entry cancelling a posted one.
    Reversal,
}

impl EntryKind {
    /// Returns the snake_case name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Adjustment => "adjustment",
            Self::LoanDisbursement => "loan_disbursement",
            Self::LoanRepayment => "loan_repayment",
            Self::SavingsDeposit => "savings_deposit",
            Self::SavingsWithdrawal => "savings_withdrawal",
            Self::FeeCollection => "fee_collection",
            Self::Reversal => "reversal",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Posting status of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Awaiting review, not included in balances.
    Draft,
    /// Final and append-only.
    Posted,
    /// Posted, then cancelled by a reversal entry.
    Reversed,
}

impl EntryStatus {
    /// Returns true if lines of an entry in this status count toward balances.
    ///
    /// Reversed entries still count: their reversal cancels them out.
    #[must_use]
    pub const fn counts_toward_balance(self) -> bool {
        matches!(self, Self::Posted | Self::Reversed)
    }

    /// Returns the lowercase name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Reversed => "reversed",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who authored an entry, which decides its initial status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrigin {
    /// Generated by a business operation; posted immediately.
    System,
    /// Entered by staff; stays in draft until approved.
    Manual,
}

/// One requested line of a posting, before account resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingLine {
    /// GL code of the account to post to.
    pub account_code: String,
    /// Debit or credit.
    pub side: Side,
    /// Strictly positive amount.
    pub amount: Decimal,
    /// Line narration; defaults to the entry description.
    pub description: Option<String>,
    /// Client the line relates to, if any.
    pub client_id: Option<ClientId>,
}

impl PostingLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self::new(account_code, Side::Debit, amount)
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self::new(account_code, Side::Credit, amount)
    }

    /// Creates a line on the given side.
    #[must_use]
    pub fn new(account_code: impl Into<String>, side: Side, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            side,
            amount,
            description: None,
            client_id: None,
        }
    }

    /// Builds a line from a debit/credit amount pair, as entered on a form.
    ///
    /// Exactly one of the pair must be non-zero and neither may be negative.
    /// `line` is the zero-based position used in the error.
    pub fn from_amounts(
        line: usize,
        account_code: impl Into<String>,
        debit: Decimal,
        credit: Decimal,
    ) -> Result<Self, LineDefect> {
        if debit.is_sign_negative() && !debit.is_zero() {
            return Err(LineDefect::NonPositiveAmount { line, amount: debit });
        }
        if credit.is_sign_negative() && !credit.is_zero() {
            return Err(LineDefect::NonPositiveAmount { line, amount: credit });
        }
        match (debit.is_zero(), credit.is_zero()) {
            (false, false) => Err(LineDefect::BothSides { line }),
            (true, true) => Err(LineDefect::NeitherSide { line }),
            (false, true) => Ok(Self::debit(account_code, debit)),
            (true, false) => Ok(Self::credit(account_code, credit)),
        }
    }

    /// Sets the line narration.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the client reference.
    #[must_use]
    pub fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }
}

/// Links from a journal entry back to the business records that caused it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLinks {
    /// Originating business transaction (repayment, deposit, ...).
    pub transaction_id: Option<TransactionId>,
    /// Related loan.
    pub loan_id: Option<LoanId>,
    /// Related savings account.
    pub savings_account_id: Option<SavingsAccountId>,
}

/// Header data for a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingContext {
    /// Business date of the event.
    pub transaction_date: NaiveDate,
    /// Branch the event originated from; scopes account resolution.
    pub branch_id: BranchId,
    /// Entry narration.
    pub description: String,
    /// Staff member recording the entry.
    pub actor: UserId,
    /// External reference (loan number, transaction reference, ...).
    pub reference_number: Option<String>,
    /// Links to originating records.
    pub links: SourceLinks,
    /// Authorship; decides Draft vs Posted.
    pub origin: EntryOrigin,
}

impl PostingContext {
    /// Context for a system-generated entry (posted immediately).
    #[must_use]
    pub fn system(
        transaction_date: NaiveDate,
        branch_id: BranchId,
        description: impl Into<String>,
        actor: UserId,
    ) -> Self {
        Self {
            transaction_date,
            branch_id,
            description: description.into(),
            actor,
            reference_number: None,
            links: SourceLinks::default(),
            origin: EntryOrigin::System,
        }
    }

    /// Context for a human-entered entry (kept as draft).
    #[must_use]
    pub fn manual(
        transaction_date: NaiveDate,
        branch_id: BranchId,
        description: impl Into<String>,
        actor: UserId,
    ) -> Self {
        Self {
            origin: EntryOrigin::Manual,
            ..Self::system(transaction_date, branch_id, description, actor)
        }
    }

    /// Sets the external reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }

    /// Sets the source links.
    #[must_use]
    pub fn with_links(mut self, links: SourceLinks) -> Self {
        self.links = links;
        self
    }
}

/// A persisted journal line. Exactly one of `debit`/`credit` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryLine {
    /// Unique identifier.
    pub id: JournalLineId,
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Position within the entry, starting at 1.
    pub line_no: u32,
    /// Account posted to.
    pub account_id: AccountId,
    /// GL code of that account, denormalised for display.
    pub account_code: String,
    /// Debit amount (zero for credit lines).
    pub debit: Decimal,
    /// Credit amount (zero for debit lines).
    pub credit: Decimal,
    /// Line narration.
    pub description: Option<String>,
    /// Related client.
    pub client_id: Option<ClientId>,
}

impl JournalEntryLine {
    /// Returns the side and amount of this line, checking the one-sided invariant.
    pub fn side_amount(&self) -> Result<(Side, Decimal), LineDefect> {
        let line = self.line_no.saturating_sub(1) as usize;
        if self.debit < Decimal::ZERO {
            return Err(LineDefect::NonPositiveAmount { line, amount: self.debit });
        }
        if self.credit < Decimal::ZERO {
            return Err(LineDefect::NonPositiveAmount { line, amount: self.credit });
        }
        match (self.debit.is_zero(), self.credit.is_zero()) {
            (false, true) => Ok((Side::Debit, self.debit)),
            (true, false) => Ok((Side::Credit, self.credit)),
            (false, false) => Err(LineDefect::BothSides { line }),
            (true, true) => Err(LineDefect::NeitherSide { line }),
        }
    }

    /// Returns debit minus credit.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A journal entry header with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Human-facing number, `JE-YYYYMMDD-NNNNNN`.
    pub journal_number: String,
    /// Event kind.
    pub kind: EntryKind,
    /// Posting status.
    pub status: EntryStatus,
    /// Business date.
    pub transaction_date: NaiveDate,
    /// Date the entry was posted, if it has been.
    pub posting_date: Option<NaiveDate>,
    /// Originating branch.
    pub branch_id: BranchId,
    /// Narration.
    pub description: String,
    /// External reference.
    pub reference_number: Option<String>,
    /// Creator.
    pub created_by: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Poster, once posted.
    pub posted_by: Option<UserId>,
    /// Posting time, once posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// Links to originating records.
    pub links: SourceLinks,
    /// The entry this one reverses, for reversal entries.
    pub reverses: Option<JournalEntryId>,
    /// Lines in posting order.
    pub lines: Vec<JournalEntryLine>,
}

impl JournalEntry {
    /// Sum of all debit amounts.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|line| line.debit).sum()
    }

    /// Sum of all credit amounts.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|line| line.credit).sum()
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }

    /// Distinct accounts referenced by the lines, sorted.
    #[must_use]
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.lines.iter().map(|line| line.account_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Marks the entry posted by `actor` at `now`.
    pub(crate) fn mark_posted(&mut self, actor: UserId, now: DateTime<Utc>, posting_date: NaiveDate) {
        self.status = EntryStatus::Posted;
        self.posted_by = Some(actor);
        self.posted_at = Some(now);
        self.posting_date = Some(posting_date);
    }
}

/// Generates a journal number of the form `JE-YYYYMMDD-NNNNNN`.
#[must_use]
pub fn generate_journal_number(date: NaiveDate) -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000);
    format!("JE-{}-{suffix:06}", date.format("%Y%m%d"))
}
