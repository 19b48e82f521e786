//! Business rule validation for journal entries.

use rust_decimal::Decimal;
use seashore_shared::types::fits_scale;

use super::entry::{JournalEntry, PostingLine, Side};
use super::error::{LedgerError, LineDefect};

/// Minimum number of lines in a double-entry journal.
pub const MIN_LINES: usize = 2;

/// Debit and credit totals of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// Returns debits minus credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }

    fn add(&mut self, line: usize, side: Side, amount: Decimal) -> Result<(), LineDefect> {
        let total = match side {
            Side::Debit => &mut self.debit,
            Side::Credit => &mut self.credit,
        };
        *total = total
            .checked_add(amount)
            .ok_or(LineDefect::AmountOverflow { line })?;
        Ok(())
    }

    fn into_balanced(self) -> Result<Self, LedgerError> {
        if self.is_balanced() {
            Ok(self)
        } else {
            Err(LedgerError::ImbalancedEntry {
                debit: self.debit,
                credit: self.credit,
            })
        }
    }
}

/// Validates requested posting lines and returns their totals.
///
/// Checks, in order: line count, each amount positive and exact at `scale`,
/// then debits == credits. Amounts are never rounded.
///
/// # Errors
///
/// Returns `InvalidLine` or `ImbalancedEntry`.
pub fn validate_lines(lines: &[PostingLine], scale: u32) -> Result<EntryTotals, LedgerError> {
    if lines.len() < MIN_LINES {
        return Err(LineDefect::TooFewLines { count: lines.len() }.into());
    }

    let mut totals = EntryTotals {
        debit: Decimal::ZERO,
        credit: Decimal::ZERO,
    };

    for (line, posting) in lines.iter().enumerate() {
        if posting.amount <= Decimal::ZERO {
            return Err(LineDefect::NonPositiveAmount {
                line,
                amount: posting.amount,
            }
            .into());
        }
        if !fits_scale(posting.amount, scale) {
            return Err(LineDefect::ExcessPrecision {
                line,
                amount: posting.amount,
                scale,
            }
            .into());
        }
        totals.add(line, posting.side, posting.amount)?;
    }

    totals.into_balanced()
}

/// Re-validates a stored entry before it is posted.
///
/// # Errors
///
/// Returns `InvalidLine` or `ImbalancedEntry`.
pub fn validate_journal(entry: &JournalEntry) -> Result<EntryTotals, LedgerError> {
    if entry.lines.len() < MIN_LINES {
        return Err(LineDefect::TooFewLines {
            count: entry.lines.len(),
        }
        .into());
    }

    let mut totals = EntryTotals {
        debit: Decimal::ZERO,
        credit: Decimal::ZERO,
    };
    for (position, line) in entry.lines.iter().enumerate() {
        let (side, amount) = line.side_amount()?;
        totals.add(position, side, amount)?;
    }

    totals.into_balanced()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balanced_lines() {
        let lines = vec![
            PostingLine::debit("1010", dec!(100)),
            PostingLine::credit("1810", dec!(80)),
            PostingLine::credit("4010", dec!(20)),
        ];
        let totals = validate_lines(&lines, 2).unwrap();
        assert_eq!(totals.debit, dec!(100));
        assert_eq!(totals.credit, dec!(100));
        assert!(totals.is_balanced());
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_unbalanced_lines() {
        let lines = vec![
            PostingLine::debit("1010", dec!(100)),
            PostingLine::credit("2010", dec!(99.99)),
        ];
        match validate_lines(&lines, 2) {
            Err(LedgerError::ImbalancedEntry { debit, credit }) => {
                assert_eq!(debit, dec!(100));
                assert_eq!(credit, dec!(99.99));
            }
            other => panic!("expected imbalance, got {other:?}"),
        }
    }

    #[test]
    fn test_single_line_rejected() {
        let lines = vec![PostingLine::debit("1010", dec!(100))];
        assert!(matches!(
            validate_lines(&lines, 2),
            Err(LedgerError::InvalidLine(LineDefect::TooFewLines { count: 1 }))
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            validate_lines(&[], 2),
            Err(LedgerError::InvalidLine(LineDefect::TooFewLines { count: 0 }))
        ));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let lines = vec![
            PostingLine::debit("1010", dec!(0)),
            PostingLine::credit("2010", dec!(0)),
        ];
        assert!(matches!(
            validate_lines(&lines, 2),
            Err(LedgerError::InvalidLine(LineDefect::NonPositiveAmount { line: 0, .. }))
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = vec![
            PostingLine::debit("1010", dec!(50)),
            PostingLine::credit("2010", dec!(-50)),
        ];
        assert!(matches!(
            validate_lines(&lines, 2),
            Err(LedgerError::InvalidLine(LineDefect::NonPositiveAmount { line: 1, .. }))
        ));
    }

    #[test]
    fn test_excess_precision_rejected() {
        // Balanced at 3 places, but the books keep 2.
        let lines = vec![
            PostingLine::debit("1010", dec!(10.005)),
            PostingLine::credit("2010", dec!(10.005)),
        ];
        assert!(matches!(
            validate_lines(&lines, 2),
            Err(LedgerError::InvalidLine(LineDefect::ExcessPrecision { line: 0, scale: 2, .. }))
        ));
        assert!(validate_lines(&lines, 3).is_ok());
    }

    #[test]
    fn test_trailing_zeros_accepted() {
        let lines = vec![
            PostingLine::debit("1010", dec!(10.500)),
            PostingLine::credit("2010", dec!(10.5)),
        ];
        assert!(validate_lines(&lines, 2).is_ok());
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let lines = vec![
            PostingLine::debit("1010", Decimal::MAX),
            PostingLine::debit("1810", Decimal::MAX),
            PostingLine::credit("2010", Decimal::ONE),
        ];
        assert!(matches!(
            validate_lines(&lines, 2),
            Err(LedgerError::InvalidLine(LineDefect::AmountOverflow { line: 1 }))
        ));
    }

    #[test]
    fn test_one_sided_lines_are_imbalanced() {
        let lines = vec![
            PostingLine::debit("1010", dec!(10)),
            PostingLine::debit("1810", dec!(10)),
        ];
        assert!(matches!(
            validate_lines(&lines, 2),
            Err(LedgerError::ImbalancedEntry { .. })
        ));
    }
}
