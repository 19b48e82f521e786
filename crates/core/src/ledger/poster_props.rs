//! Property-based tests for the poster against the in-memory ledger.
//!
//! - Every recorded entry balances
//! - Account balances always net to zero across the chart
//! - Reversing every entry returns every account to zero

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use seashore_shared::types::{BranchId, ClientId, SavingsAccountId, TransactionId, UserId};

use super::account::{Account, AccountType};
use super::entry::Side;
use super::memory::MemoryLedger;
use super::poster::{LedgerPoster, PostingSettings};
use super::recipe::{ClientRef, SavingsAccount, SavingsProductType, SourceTransaction, codes};

const CODES: [&str; 3] = [codes::CASH_IN_HAND, codes::SAVINGS_REGULAR, codes::SAVINGS_FIXED];

/// A savings movement: deposit (true) or withdrawal, product, amount.
fn movement() -> impl Strategy<Value = (bool, bool, Decimal)> {
    (
        any::<bool>(),
        any::<bool>(),
        (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn setup() -> (MemoryLedger, LedgerPoster<MemoryLedger, MemoryLedger>) {
    let ledger = MemoryLedger::new();
    ledger.add_account(Account::new(codes::CASH_IN_HAND, "Cash In Hand", AccountType::Asset));
    ledger.add_account(Account::new(codes::SAVINGS_REGULAR, "Savings - Regular", AccountType::Liability));
    ledger.add_account(Account::new(codes::SAVINGS_FIXED, "Savings - Fixed", AccountType::Liability));
    let poster = LedgerPoster::new(ledger.clone(), ledger.clone(), PostingSettings::default());
    (ledger, poster)
}

/// Net debit position of `code`: debits minus credits.
async fn net_debit(
    poster: &LedgerPoster<MemoryLedger, MemoryLedger>,
    code: &str,
    branch: BranchId,
) -> Decimal {
    let balance = poster.account_balance(code, branch, None).await.unwrap();
    match balance.normal_balance {
        Side::Debit => balance.balance,
        Side::Credit => -balance.balance,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_trial_balance_nets_to_zero(moves in prop::collection::vec(movement(), 1..12)) {
        let rt = runtime();
        rt.block_on(async {
            let (ledger, poster) = setup();
            let branch = BranchId::new();
            let actor = UserId::new();
            let client = ClientRef { id: ClientId::new(), name: "Kofi Mensah".to_string() };
            let origin = SourceTransaction {
                id: TransactionId::new(),
                reference: "TX-PROP".to_string(),
                transaction_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            };

            for (deposit, fixed, amount) in &moves {
                let account = SavingsAccount {
                    id: SavingsAccountId::new(),
                    account_number: "SV-PROP".to_string(),
                    branch_id: branch,
                    client: client.clone(),
                    product_type: if *fixed { SavingsProductType::Fixed } else { SavingsProductType::Regular },
                };
                let entry = if *deposit {
                    poster.post_savings_deposit(&account, *amount, actor, &origin).await
                } else {
                    poster.post_savings_withdrawal(&account, *amount, actor, &origin).await
                }
                .unwrap();
                assert!(entry.is_balanced());
            }

            let mut net = Decimal::ZERO;
            for code in CODES {
                net += net_debit(&poster, code, branch).await;
            }
            assert_eq!(net, Decimal::ZERO);

            for entry in ledger.entries().await {
                poster.reverse(entry.id, actor, origin.transaction_date, "unwind").await.unwrap();
            }
            for code in CODES {
                assert_eq!(net_debit(&poster, code, branch).await, Decimal::ZERO);
            }
            assert_eq!(ledger.entries().await.len(), moves.len() * 2);
        });
    }
}
