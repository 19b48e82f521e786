//! `SeaORM` entities for the ledger tables.

pub mod chart_of_accounts;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod sea_orm_active_enums;
