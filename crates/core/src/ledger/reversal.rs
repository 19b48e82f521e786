//! Reversing entries for posted journals.
//!
//! A posted entry is never edited. To cancel it, a new entry with every
//! line's debit and credit swapped is posted against the same accounts.

use super::entry::JournalEntry;
use super::error::LedgerError;
use super::poster::ResolvedLine;

/// Builds the mirror lines of `original`.
///
/// # Errors
///
/// Returns `InvalidLine` if a stored line violates the one-sided invariant.
pub fn reversing_lines(original: &JournalEntry) -> Result<Vec<ResolvedLine>, LedgerError> {
    original
        .lines
        .iter()
        .map(|line| {
            let (side, amount) = line.side_amount()?;
            Ok(ResolvedLine {
                account_id: line.account_id,
                account_code: line.account_code.clone(),
                side: side.opposite(),
                amount,
                description: Some(format!(
                    "Reversal: {}",
                    line.description.as_deref().unwrap_or(&original.description)
                )),
                client_id: line.client_id,
            })
        })
        .collect()
}

/// Narration of the reversal entry.
#[must_use]
pub fn reversal_description(original: &JournalEntry, reason: &str) -> String {
    format!("Reversal of {}: {reason}", original.journal_number)
}

/// Reference number of the reversal entry, `REV-<original journal number>`.
#[must_use]
pub fn reversal_reference(original: &JournalEntry) -> String {
    format!("REV-{}", original.journal_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::{EntryKind, EntryStatus, JournalEntryLine, Side, SourceLinks};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use seashore_shared::types::{
        AccountId, BranchId, JournalEntryId, JournalLineId, UserId,
    };

    fn repayment() -> JournalEntry {
        let id = JournalEntryId::new();
        let line = |line_no, code: &str, debit, credit, description: Option<&str>| JournalEntryLine {
            id: JournalLineId::new(),
            entry_id: id,
            line_no,
            account_id: AccountId::new(),
            account_code: code.to_string(),
            debit,
            credit,
            description: description.map(str::to_string),
            client_id: None,
        };
        JournalEntry {
            id,
            journal_number: "JE-20260301-000042".to_string(),
            kind: EntryKind::LoanRepayment,
            status: EntryStatus::Posted,
            transaction_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            posting_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            branch_id: BranchId::new(),
            description: "Loan Repayment: LN-0001".to_string(),
            reference_number: Some("TX-9".to_string()),
            created_by: UserId::new(),
            created_at: Utc::now(),
            posted_by: None,
            posted_at: None,
            links: SourceLinks::default(),
            reverses: None,
            lines: vec![
                line(1, "1010", dec!(100), dec!(0), Some("Loan repayment from Ada")),
                line(2, "1810", dec!(0), dec!(80), None),
                line(3, "4010", dec!(0), dec!(20), None),
            ],
        }
    }

    #[test]
    fn test_reversing_lines_swap_sides() {
        let original = repayment();
        let lines = reversing_lines(&original).unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].side, Side::Credit);
        assert_eq!(lines[0].amount, dec!(100));
        assert_eq!(lines[1].side, Side::Debit);
        assert_eq!(lines[1].amount, dec!(80));
        assert_eq!(lines[2].side, Side::Debit);
        assert_eq!(lines[2].amount, dec!(20));
        for (mirror, line) in lines.iter().zip(&original.lines) {
            assert_eq!(mirror.account_id, line.account_id);
        }
    }

    #[test]
    fn test_reversing_line_descriptions() {
        let lines = reversing_lines(&repayment()).unwrap();
        assert_eq!(
            lines[0].description.as_deref(),
            Some("Reversal: Loan repayment from Ada")
        );
        assert_eq!(
            lines[1].description.as_deref(),
            Some("Reversal: Loan Repayment: LN-0001")
        );
    }

    #[test]
    fn test_corrupt_line_is_rejected() {
        let mut original = repayment();
        original.lines[1].debit = dec!(5);
        assert!(matches!(
            reversing_lines(&original),
            Err(LedgerError::InvalidLine(_))
        ));
    }

    #[test]
    fn test_reversal_description() {
        assert_eq!(
            reversal_description(&repayment(), "posted twice"),
            "Reversal of JE-20260301-000042: posted twice"
        );
        assert_eq!(reversal_reference(&repayment()), "REV-JE-20260301-000042");
    }
}
