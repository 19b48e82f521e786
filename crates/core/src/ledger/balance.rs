//! Account balance calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use seashore_shared::types::AccountId;

use super::account::Account;
use super::entry::{JournalEntryLine, Side};

/// Account balance at a point in time.
///
/// `balance` is signed by the account's normal side: debit-normal accounts
/// report debits minus credits, credit-normal accounts credits minus debits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// The account's GL code.
    pub code: String,
    /// Side on which the balance grows.
    pub normal_balance: Side,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
    /// Net balance on the normal side.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Creates a zero balance for `account`.
    #[must_use]
    pub fn new(account: &Account) -> Self {
        Self {
            account_id: account.id,
            code: account.code.clone(),
            normal_balance: account.normal_balance(),
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Folds `lines` into a balance for `account`. Lines for other accounts are ignored.
    #[must_use]
    pub fn from_lines<'a>(
        account: &Account,
        lines: impl IntoIterator<Item = &'a JournalEntryLine>,
    ) -> Self {
        let mut balance = Self::new(account);
        for line in lines.into_iter().filter(|line| line.account_id == account.id) {
            balance.apply(line.debit, line.credit);
        }
        balance
    }

    /// Adds a debit/credit pair.
    pub fn apply(&mut self, debit: Decimal, credit: Decimal) {
        self.debit_total += debit;
        self.credit_total += credit;
        self.balance = match self.normal_balance {
            Side::Debit => self.debit_total - self.credit_total,
            Side::Credit => self.credit_total - self.debit_total,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::account::AccountType;
    use rust_decimal_macros::dec;
    use seashore_shared::types::{JournalEntryId, JournalLineId};

    fn line(account: &Account, debit: Decimal, credit: Decimal) -> JournalEntryLine {
        JournalEntryLine {
            id: JournalLineId::new(),
            entry_id: JournalEntryId::new(),
            line_no: 1,
            account_id: account.id,
            account_code: account.code.clone(),
            debit,
            credit,
            description: None,
            client_id: None,
        }
    }

    #[test]
    fn test_debit_normal_balance() {
        let cash = Account::new("1010", "Cash In Hand", AccountType::Asset);
        let lines = [
            line(&cash, dec!(500), dec!(0)),
            line(&cash, dec!(0), dec!(120)),
        ];
        let balance = AccountBalance::from_lines(&cash, &lines);
        assert_eq!(balance.debit_total, dec!(500));
        assert_eq!(balance.credit_total, dec!(120));
        assert_eq!(balance.balance, dec!(380));
    }

    #[test]
    fn test_credit_normal_balance() {
        let savings = Account::new("2010", "Savings - Regular", AccountType::Liability);
        let lines = [
            line(&savings, dec!(0), dec!(500)),
            line(&savings, dec!(200), dec!(0)),
        ];
        let balance = AccountBalance::from_lines(&savings, &lines);
        assert_eq!(balance.balance, dec!(300));
        assert_eq!(balance.normal_balance, Side::Credit);
    }

    #[test]
    fn test_other_accounts_ignored() {
        let cash = Account::new("1010", "Cash In Hand", AccountType::Asset);
        let income = Account::new("4010", "Interest Income", AccountType::Income);
        let lines = [line(&income, dec!(0), dec!(75))];
        let balance = AccountBalance::from_lines(&cash, &lines);
        assert_eq!(balance.balance, Decimal::ZERO);
    }
}
