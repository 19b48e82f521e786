//! Chart of accounts domain types.

use serde::{Deserialize, Serialize};
use seashore_shared::types::{AccountId, BranchId};

use super::entry::Side;

/// The five top-level account classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Cash, receivables and other resources.
    Asset,
    /// Client savings, payables and other obligations.
    Liability,
    /// Capital and retained earnings.
    Equity,
    /// Interest and fee income.
    Income,
    /// Operating costs and provisions.
    Expense,
}

impl AccountType {
    /// Returns the side on which balances of this type naturally increase.
    #[must_use]
    pub const fn normal_balance(self) -> Side {
        match self {
            Self::Asset | Self::Expense => Side::Debit,
            Self::Liability | Self::Equity | Self::Income => Side::Credit,
        }
    }

    /// Returns the lowercase name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A general-ledger account.
///
/// `branch == None` marks a system-wide account; otherwise the account is
/// only visible to postings originating from that branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// GL code, e.g. `1010`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account class.
    pub account_type: AccountType,
    /// Owning branch, `None` for global accounts.
    pub branch: Option<BranchId>,
    /// Inactive accounts cannot receive postings.
    pub is_active: bool,
    /// Whether human-entered journal entries may use this account.
    pub allows_manual_entries: bool,
}

impl Account {
    /// Creates an active global account that accepts manual entries.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: AccountId::new(),
            code: code.into(),
            name: name.into(),
            account_type,
            branch: None,
            is_active: true,
            allows_manual_entries: true,
        }
    }

    /// Restricts the account to a single branch.
    #[must_use]
    pub fn for_branch(mut self, branch: BranchId) -> Self {
        self.branch = Some(branch);
        self
    }

    /// Marks the account as system-only (no manual journal entries).
    #[must_use]
    pub fn system_only(mut self) -> Self {
        self.allows_manual_entries = false;
        self
    }

    /// Marks the account inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Returns the normal balance side of this account.
    #[must_use]
    pub const fn normal_balance(&self) -> Side {
        self.account_type.normal_balance()
    }

    /// Returns true for system-wide accounts.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.branch.is_none()
    }

    /// Returns true if a posting from `branch` may use this account.
    #[must_use]
    pub fn is_visible_from(&self, branch: BranchId) -> bool {
        self.branch.is_none_or(|owner| owner == branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountType::Asset, Side::Debit)]
    #[case(AccountType::Expense, Side::Debit)]
    #[case(AccountType::Liability, Side::Credit)]
    #[case(AccountType::Equity, Side::Credit)]
    #[case(AccountType::Income, Side::Credit)]
    fn test_normal_balance(#[case] account_type: AccountType, #[case] expected: Side) {
        assert_eq!(account_type.normal_balance(), expected);
        assert_eq!(
            Account::new("9999", "Test", account_type).normal_balance(),
            expected
        );
    }

    #[test]
    fn test_branch_visibility() {
        let home = BranchId::new();
        let other = BranchId::new();

        let global = Account::new("1010", "Cash In Hand", AccountType::Asset);
        assert!(global.is_global());
        assert!(global.is_visible_from(home));
        assert!(global.is_visible_from(other));

        let local = Account::new("1010", "Cash In Hand - Ikeja", AccountType::Asset).for_branch(home);
        assert!(!local.is_global());
        assert!(local.is_visible_from(home));
        assert!(!local.is_visible_from(other));
    }

    #[test]
    fn test_builder_flags() {
        let account = Account::new("1810", "Loan Receivable", AccountType::Asset)
            .system_only()
            .inactive();
        assert!(!account.allows_manual_entries);
        assert!(!account.is_active);
    }

    #[test]
    fn test_account_type_serde() {
        let json = serde_json::to_string(&AccountType::Liability).unwrap();
        assert_eq!(json, "\"liability\"");
        assert_eq!(AccountType::Income.to_string(), "income");
    }
}
