//! Property-based tests for posting line validation.
//!
//! - Balanced lines with positive, in-scale amounts are accepted
//! - Any imbalance is rejected, whatever the split
//! - Amounts finer than the configured scale are rejected, never rounded

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::{PostingLine, Side};
use super::error::{LedgerError, LineDefect};
use super::validation::validate_lines;

/// Strategy to generate a positive amount in cents (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a non-positive amount (-1,000,000.00 to 0.00).
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

/// Strategy to generate a side.
fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Debit), Just(Side::Credit)]
}

/// One debit of the total, split across credits of `parts`.
fn split_lines(parts: &[Decimal]) -> Vec<PostingLine> {
    let total: Decimal = parts.iter().copied().sum();
    let mut lines = vec![PostingLine::debit("1010", total)];
    lines.extend(
        parts
            .iter()
            .enumerate()
            .map(|(i, amount)| PostingLine::credit(format!("4{i:03}"), *amount)),
    );
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A debit split over any number of credits balances.
    #[test]
    fn prop_split_credits_accepted(parts in prop::collection::vec(positive_amount(), 1..8)) {
        let lines = split_lines(&parts);

        let totals = validate_lines(&lines, 2);
        prop_assert!(totals.is_ok(), "balanced split rejected: {:?}", totals);
        let totals = totals.unwrap();
        prop_assert_eq!(totals.debit, totals.credit);
        prop_assert_eq!(totals.debit, parts.iter().copied().sum::<Decimal>());
    }

    /// Removing one cent from any credit breaks the balance.
    #[test]
    fn prop_off_by_one_cent_rejected(
        parts in prop::collection::vec(positive_amount(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut lines = split_lines(&parts);
        let target = 1 + pick.index(parts.len());
        lines[target].amount += Decimal::new(1, 2);

        let result = validate_lines(&lines, 2);
        match result {
            Err(LedgerError::ImbalancedEntry { debit, credit }) => {
                prop_assert_eq!(credit - debit, Decimal::new(1, 2));
            }
            other => prop_assert!(false, "expected imbalance, got {:?}", other),
        }
    }

    /// Zero or negative amounts are rejected before the balance check.
    #[test]
    fn prop_non_positive_amount_rejected(
        side in side_strategy(),
        bad in non_positive_amount(),
        good in positive_amount(),
    ) {
        let lines = vec![
            PostingLine::new("1010", side, bad),
            PostingLine::new("2010", side.opposite(), good),
        ];

        let result = validate_lines(&lines, 2);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidLine(LineDefect::NonPositiveAmount { line: 0, .. }))),
            "non-positive amount accepted: {:?}",
            result
        );
    }

    /// Amounts with a third fractional digit are rejected at scale 2.
    #[test]
    fn prop_sub_cent_amount_rejected(mills in 1i64..1_000_000_000i64) {
        prop_assume!(mills % 10 != 0);
        let amount = Decimal::new(mills, 3);
        let lines = vec![
            PostingLine::debit("1010", amount),
            PostingLine::credit("2010", amount),
        ];

        let result = validate_lines(&lines, 2);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidLine(LineDefect::ExcessPrecision { .. }))),
            "sub-cent amount accepted: {:?}",
            result
        );
        prop_assert!(validate_lines(&lines, 3).is_ok());
    }

    /// A single line never validates.
    #[test]
    fn prop_single_line_rejected(side in side_strategy(), amount in positive_amount()) {
        let lines = vec![PostingLine::new("1010", side, amount)];

        let result = validate_lines(&lines, 2);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidLine(LineDefect::TooFewLines { count: 1 }))),
            "single line accepted: {:?}",
            result
        );
    }
}
