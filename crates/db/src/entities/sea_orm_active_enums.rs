//! Postgres enum types and their mapping to the core ledger enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use seashore_core::ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_entry_kind")]
pub enum EntryKind {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
    #[sea_orm(string_value = "loan_disbursement")]
    LoanDisbursement,
    #[sea_orm(string_value = "loan_repayment")]
    LoanRepayment,
    #[sea_orm(string_value = "savings_deposit")]
    SavingsDeposit,
    #[sea_orm(string_value = "savings_withdrawal")]
    SavingsWithdrawal,
    #[sea_orm(string_value = "fee_collection")]
    FeeCollection,
    #[sea_orm(string_value = "reversal")]
    Reversal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_entry_status")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

impl From<AccountType> for ledger::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<ledger::AccountType> for AccountType {
    fn from(value: ledger::AccountType) -> Self {
        match value {
            ledger::AccountType::Asset => Self::Asset,
            ledger::AccountType::Liability => Self::Liability,
            ledger::AccountType::Equity => Self::Equity,
            ledger::AccountType::Income => Self::Income,
            ledger::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<EntryKind> for ledger::EntryKind {
    fn from(value: EntryKind) -> Self {
        match value {
            EntryKind::Manual => Self::Manual,
            EntryKind::Adjustment => Self::Adjustment,
            EntryKind::LoanDisbursement => Self::LoanDisbursement,
            EntryKind::LoanRepayment => Self::LoanRepayment,
            EntryKind::SavingsDeposit => Self::SavingsDeposit,
            EntryKind::SavingsWithdrawal => Self::SavingsWithdrawal,
            EntryKind::FeeCollection => Self::FeeCollection,
            EntryKind::Reversal => Self::Reversal,
        }
    }
}

impl From<ledger::EntryKind> for EntryKind {
    fn from(value: ledger::EntryKind) -> Self {
        match value {
            ledger::EntryKind::Manual => Self::Manual,
            ledger::EntryKind::Adjustment => Self::Adjustment,
            ledger::EntryKind::LoanDisbursement => Self::LoanDisbursement,
            ledger::EntryKind::LoanRepayment => Self::LoanRepayment,
            ledger::EntryKind::SavingsDeposit => Self::SavingsDeposit,
            ledger::EntryKind::SavingsWithdrawal => Self::SavingsWithdrawal,
            ledger::EntryKind::FeeCollection => Self::FeeCollection,
            ledger::EntryKind::Reversal => Self::Reversal,
        }
    }
}

impl From<EntryStatus> for ledger::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Reversed => Self::Reversed,
        }
    }
}

impl From<ledger::EntryStatus> for EntryStatus {
    fn from(value: ledger::EntryStatus) -> Self {
        match value {
            ledger::EntryStatus::Draft => Self::Draft,
            ledger::EntryStatus::Posted => Self::Posted,
            ledger::EntryStatus::Reversed => Self::Reversed,
        }
    }
}
