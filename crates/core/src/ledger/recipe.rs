//! Posting recipes: the fixed debit/credit mapping for each business event.
//!
//! | Event              | Debit                       | Credit                                   |
//! |--------------------|-----------------------------|------------------------------------------|
//! | Loan disbursement  | Loan Receivable (principal) | Cash                                     |
//! | Loan repayment     | Cash                        | Loan Receivable + Interest Income        |
//! | Savings deposit    | Cash                        | Savings Liability (by product)           |
//! | Savings withdrawal | Savings Liability           | Cash                                     |
//! | Fee collection     | Cash                        | Fee Income (by fee type)                 |

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use seashore_shared::types::{BranchId, ClientId, LoanId, SavingsAccountId, TransactionId, UserId};

use super::entry::{EntryKind, PostingContext, PostingLine, SourceLinks};

/// GL codes the recipes post to.
pub mod codes {
    /// Cash In Hand. Branches may override it with a branch-scoped account.
    pub const CASH_IN_HAND: &str = "1010";
    /// Loan Receivable - Principal.
    pub const LOAN_RECEIVABLE: &str = "1810";
    /// Interest Income - Loans.
    pub const INTEREST_INCOME: &str = "4010";
    /// Savings Deposits - Regular.
    pub const SAVINGS_REGULAR: &str = "2010";
    /// Savings Deposits - Fixed.
    pub const SAVINGS_FIXED: &str = "2020";
    /// Savings Deposits - Target.
    pub const SAVINGS_TARGET: &str = "2030";
    /// Savings Deposits - Children.
    pub const SAVINGS_CHILDREN: &str = "2040";
}

/// Savings product families, each with its own liability account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsProductType {
    /// Regular (demand) savings.
    #[default]
    Regular,
    /// Fixed-term deposit.
    Fixed,
    /// Goal-based target savings.
    Target,
    /// Children's savings.
    Children,
}

impl SavingsProductType {
    /// GL code of the liability account holding this product's deposits.
    #[must_use]
    pub const fn liability_account_code(self) -> &'static str {
        match self {
            Self::Regular => codes::SAVINGS_REGULAR,
            Self::Fixed => codes::SAVINGS_FIXED,
            Self::Target => codes::SAVINGS_TARGET,
            Self::Children => codes::SAVINGS_CHILDREN,
        }
    }
}

/// Client fees, each credited to its own income account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    /// One-off client registration.
    Registration,
    /// Loan application form.
    LoanForm,
    /// Credit life insurance.
    LoanInsurance,
    /// Loan processing.
    Processing,
    /// Risk premium.
    RiskPremium,
    /// Technology levy.
    Tech,
    /// Penalty on overdue instalments.
    LatePayment,
}

impl FeeType {
    /// GL code of the income account for this fee.
    #[must_use]
    pub const fn income_account_code(self) -> &'static str {
        match self {
            Self::Registration => "4110",
            Self::LoanForm => "4120",
            Self::LoanInsurance => "4130",
            Self::Processing => "4140",
            Self::RiskPremium => "4150",
            Self::Tech => "4160",
            Self::LatePayment => "4170",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Registration => "Registration Fee",
            Self::LoanForm => "Loan Form Fee",
            Self::LoanInsurance => "Loan Insurance Fee",
            Self::Processing => "Processing Fee",
            Self::RiskPremium => "Risk Premium",
            Self::Tech => "Tech Fee",
            Self::LatePayment => "Late Payment Fee",
        }
    }
}

/// The client a business record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    /// Client id.
    pub id: ClientId,
    /// Full name, used in line narration.
    pub name: String,
}

/// The fields of a loan the recipes need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Loan id.
    pub id: LoanId,
    /// Loan number, used as the entry reference.
    pub loan_number: String,
    /// Servicing branch.
    pub branch_id: BranchId,
    /// Borrower.
    pub client: ClientRef,
    /// Principal disbursed.
    pub principal_amount: Decimal,
    /// Date the principal was paid out.
    pub disbursement_date: NaiveDate,
}

/// The fields of a savings account the recipes need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsAccount {
    /// Savings account id.
    pub id: SavingsAccountId,
    /// Account number shown to the client.
    pub account_number: String,
    /// Servicing branch.
    pub branch_id: BranchId,
    /// Account holder.
    pub client: ClientRef,
    /// Product family.
    pub product_type: SavingsProductType,
}

/// The business transaction record a posting originates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTransaction {
    /// Transaction id.
    pub id: TransactionId,
    /// Transaction reference, used as the entry reference.
    pub reference: String,
    /// Business date.
    pub transaction_date: NaiveDate,
}

/// A business event with a fixed posting recipe.
#[derive(Debug, Clone, Copy)]
pub enum BusinessEvent<'a> {
    /// Loan principal paid out.
    LoanDisbursement {
        /// The loan.
        loan: &'a Loan,
    },
    /// Repayment received.
    LoanRepayment {
        /// The loan.
        loan: &'a Loan,
        /// Cash received.
        amount: Decimal,
        /// Part of `amount` applied to principal.
        principal: Decimal,
        /// Part of `amount` applied to interest.
        interest: Decimal,
        /// The repayment record.
        origin: &'a SourceTransaction,
    },
    /// Cash deposited.
    SavingsDeposit {
        /// The savings account.
        account: &'a SavingsAccount,
        /// Amount deposited.
        amount: Decimal,
        /// The deposit record.
        origin: &'a SourceTransaction,
    },
    /// Cash withdrawn.
    SavingsWithdrawal {
        /// The savings account.
        account: &'a SavingsAccount,
        /// Amount withdrawn.
        amount: Decimal,
        /// The withdrawal record.
        origin: &'a SourceTransaction,
    },
    /// Fee collected in cash.
    FeeCollection {
        /// Fee type.
        fee: FeeType,
        /// Amount collected.
        amount: Decimal,
        /// Collecting branch.
        branch_id: BranchId,
        /// Paying client.
        client: &'a ClientRef,
        /// The fee payment record.
        origin: &'a SourceTransaction,
    },
}

impl BusinessEvent<'_> {
    /// Entry kind recorded for this event.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        match self {
            Self::LoanDisbursement { .. } => EntryKind::LoanDisbursement,
            Self::LoanRepayment { .. } => EntryKind::LoanRepayment,
            Self::SavingsDeposit { .. } => EntryKind::SavingsDeposit,
            Self::SavingsWithdrawal { .. } => EntryKind::SavingsWithdrawal,
            Self::FeeCollection { .. } => EntryKind::FeeCollection,
        }
    }

    /// Builds the posting lines for this event.
    ///
    /// A zero repayment portion produces no line. A negative portion is kept,
    /// so validation rejects it instead of the entry silently dropping it.
    #[must_use]
    pub fn lines(&self) -> Vec<PostingLine> {
        match *self {
            Self::LoanDisbursement { loan } => vec![
                PostingLine::debit(codes::LOAN_RECEIVABLE, loan.principal_amount)
                    .with_description(format!("Loan disbursement to {}", loan.client.name))
                    .with_client(loan.client.id),
                PostingLine::credit(codes::CASH_IN_HAND, loan.principal_amount)
                    .with_description(format!("Cash paid for loan {}", loan.loan_number))
                    .with_client(loan.client.id),
            ],
            Self::LoanRepayment {
                loan,
                amount,
                principal,
                interest,
                ..
            } => {
                let mut lines = vec![
                    PostingLine::debit(codes::CASH_IN_HAND, amount)
                        .with_description(format!("Loan repayment from {}", loan.client.name))
                        .with_client(loan.client.id),
                ];
                if !principal.is_zero() {
                    lines.push(
                        PostingLine::credit(codes::LOAN_RECEIVABLE, principal)
                            .with_description(format!("Principal repaid on loan {}", loan.loan_number))
                            .with_client(loan.client.id),
                    );
                }
                if !interest.is_zero() {
                    lines.push(
                        PostingLine::credit(codes::INTEREST_INCOME, interest)
                            .with_description(format!("Interest earned on loan {}", loan.loan_number))
                            .with_client(loan.client.id),
                    );
                }
                lines
            }
            Self::SavingsDeposit { account, amount, .. } => vec![
                PostingLine::debit(codes::CASH_IN_HAND, amount)
                    .with_description(format!("Savings deposit from {}", account.client.name))
                    .with_client(account.client.id),
                PostingLine::credit(account.product_type.liability_account_code(), amount)
                    .with_description(format!("Deposit to account {}", account.account_number))
                    .with_client(account.client.id),
            ],
            Self::SavingsWithdrawal { account, amount, .. } => vec![
                PostingLine::debit(account.product_type.liability_account_code(), amount)
                    .with_description(format!("Withdrawal from account {}", account.account_number))
                    .with_client(account.client.id),
                PostingLine::credit(codes::CASH_IN_HAND, amount)
                    .with_description(format!("Cash paid to {}", account.client.name))
                    .with_client(account.client.id),
            ],
            Self::FeeCollection {
                fee, amount, client, ..
            } => vec![
                PostingLine::debit(codes::CASH_IN_HAND, amount)
                    .with_description(format!("{} from {}", fee.label(), client.name))
                    .with_client(client.id),
                PostingLine::credit(fee.income_account_code(), amount)
                    .with_description(format!("{} income", fee.label()))
                    .with_client(client.id),
            ],
        }
    }

    /// Builds the system-generated posting context for this event.
    #[must_use]
    pub fn context(&self, actor: UserId) -> PostingContext {
        match *self {
            Self::LoanDisbursement { loan } => PostingContext::system(
                loan.disbursement_date,
                loan.branch_id,
                format!("Loan Disbursement: {}", loan.loan_number),
                actor,
            )
            .with_reference(loan.loan_number.clone())
            .with_links(SourceLinks {
                loan_id: Some(loan.id),
                ..SourceLinks::default()
            }),
            Self::LoanRepayment { loan, origin, .. } => PostingContext::system(
                origin.transaction_date,
                loan.branch_id,
                format!("Loan Repayment: {}", loan.loan_number),
                actor,
            )
            .with_reference(origin.reference.clone())
            .with_links(SourceLinks {
                transaction_id: Some(origin.id),
                loan_id: Some(loan.id),
                savings_account_id: None,
            }),
            Self::SavingsDeposit { account, origin, .. } => PostingContext::system(
                origin.transaction_date,
                account.branch_id,
                format!("Savings Deposit: {}", account.account_number),
                actor,
            )
            .with_reference(origin.reference.clone())
            .with_links(SourceLinks {
                transaction_id: Some(origin.id),
                loan_id: None,
                savings_account_id: Some(account.id),
            }),
            Self::SavingsWithdrawal { account, origin, .. } => PostingContext::system(
                origin.transaction_date,
                account.branch_id,
                format!("Savings Withdrawal: {}", account.account_number),
                actor,
            )
            .with_reference(origin.reference.clone())
            .with_links(SourceLinks {
                transaction_id: Some(origin.id),
                loan_id: None,
                savings_account_id: Some(account.id),
            }),
            Self::FeeCollection {
                fee,
                branch_id,
                origin,
                ..
            } => PostingContext::system(
                origin.transaction_date,
                branch_id,
                format!("Fee Collection: {}", fee.label()),
                actor,
            )
            .with_reference(origin.reference.clone())
            .with_links(SourceLinks {
                transaction_id: Some(origin.id),
                ..SourceLinks::default()
            }),
        }
    }
}
