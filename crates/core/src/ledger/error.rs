//! Ledger error types for validation, resolution and storage failures.
//!
//! Every validation error is raised before the poster opens a storage
//! transaction, so none of them can leave a partial entry behind.

use rust_decimal::Decimal;
use seashore_shared::AppError;
use seashore_shared::types::{BranchId, JournalEntryId};
use thiserror::Error;

use super::entry::EntryStatus;

/// A structural problem with one or more journal lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineDefect {
    /// Fewer than two lines.
    #[error("journal entry must have at least 2 lines, got {count}")]
    TooFewLines {
        /// Number of lines supplied.
        count: usize,
    },

    /// Zero or negative amount.
    #[error("line {line}: amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// Zero-based line position.
        line: usize,
        /// Offending amount.
        amount: Decimal,
    },

    /// More fractional digits than the ledger keeps.
    #[error("line {line}: amount {amount} has more than {scale} decimal places")]
    ExcessPrecision {
        /// Zero-based line position.
        line: usize,
        /// Offending amount.
        amount: Decimal,
        /// Configured scale.
        scale: u32,
    },

    /// Adding this line overflows the entry's side total.
    #[error("line {line}: amount total overflows")]
    AmountOverflow {
        /// Zero-based line position.
        line: usize,
    },

    /// Both a debit and a credit amount.
    #[error("line {line}: cannot have both debit and credit amounts")]
    BothSides {
        /// Zero-based line position.
        line: usize,
    },

    /// Neither a debit nor a credit amount.
    #[error("line {line}: must have either a debit or a credit amount")]
    NeitherSide {
        /// Zero-based line position.
        line: usize,
    },
}

/// Errors that can occur while posting to the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Debits and credits differ.
    #[error("Journal entry not balanced: debits {debit} != credits {credit}")]
    ImbalancedEntry {
        /// Total debits.
        debit: Decimal,
        /// Total credits.
        credit: Decimal,
    },

    /// Account code does not resolve to an active account for the branch.
    #[error("Account {code} not found or inactive for branch {branch}")]
    UnknownAccount {
        /// The GL code looked up.
        code: String,
        /// The branch scope of the lookup.
        branch: BranchId,
    },

    /// A line is malformed.
    #[error("Invalid journal line: {0}")]
    InvalidLine(#[from] LineDefect),

    /// A manual entry targets a system-only account.
    #[error("Account {0} does not accept manual journal entries")]
    ManualPostingNotAllowed(String),

    // ========== Entry State Errors ==========
    /// No entry with this id.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// The entry's status does not allow the requested action.
    #[error("Cannot {action} journal entry {id} with status {status}")]
    InvalidState {
        /// The entry.
        id: JournalEntryId,
        /// Its current status.
        status: EntryStatus,
        /// What was attempted.
        action: &'static str,
    },

    // ========== Storage Errors ==========
    /// Storage layer failure; the unit of work was rolled back.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ImbalancedEntry { .. } => "IMBALANCED_ENTRY",
            Self::UnknownAccount { .. } => "UNKNOWN_ACCOUNT",
            Self::InvalidLine(_) => "INVALID_LINE",
            Self::ManualPostingNotAllowed(_) => "MANUAL_POSTING_NOT_ALLOWED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true for errors detected before any write.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ImbalancedEntry { .. }
                | Self::UnknownAccount { .. }
                | Self::InvalidLine(_)
                | Self::ManualPostingNotAllowed(_)
        )
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::ImbalancedEntry { .. } | LedgerError::InvalidLine(_) => {
                Self::Validation(message)
            }
            LedgerError::UnknownAccount { .. } | LedgerError::EntryNotFound(_) => {
                Self::NotFound(message)
            }
            LedgerError::ManualPostingNotAllowed(_) | LedgerError::InvalidState { .. } => {
                Self::BusinessRule(message)
            }
            LedgerError::Storage(_) => Self::Database(message),
        }
    }
}
