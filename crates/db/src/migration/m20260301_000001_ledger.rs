//! Ledger schema: chart of accounts, journal entries and journal lines.
//!
//! The database enforces the same rules as the poster, so rows written by
//! other tools cannot break the books:
//! - every line is one-sided and non-negative
//! - a posted or reversed entry balances (checked at commit)
//! - lines of a non-draft entry are never updated or deleted

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM ('asset', 'liability', 'equity', 'income', 'expense');

CREATE TYPE journal_entry_kind AS ENUM (
    'manual',
    'adjustment',
    'loan_disbursement',
    'loan_repayment',
    'savings_deposit',
    'savings_withdrawal',
    'fee_collection',
    'reversal'
);

CREATE TYPE journal_entry_status AS ENUM ('draft', 'posted', 'reversed');
";

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    branch_id UUID,
    is_active BOOLEAN NOT NULL DEFAULT true,
    allows_manual_entries BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- One global account per code, and one per code within each branch
CREATE UNIQUE INDEX idx_coa_global_code ON chart_of_accounts(code) WHERE branch_id IS NULL;
CREATE UNIQUE INDEX idx_coa_branch_code ON chart_of_accounts(branch_id, code) WHERE branch_id IS NOT NULL;
CREATE INDEX idx_coa_code_active ON chart_of_accounts(code) WHERE is_active = true;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_number VARCHAR(32) NOT NULL UNIQUE,
    kind journal_entry_kind NOT NULL,
    status journal_entry_status NOT NULL DEFAULT 'draft',
    transaction_date DATE NOT NULL,
    posting_date DATE,
    branch_id UUID NOT NULL,
    description TEXT NOT NULL,
    reference_number VARCHAR(100),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    posted_by UUID,
    posted_at TIMESTAMPTZ,
    transaction_id UUID,
    loan_id UUID,
    savings_account_id UUID,
    reverses_entry_id UUID REFERENCES journal_entries(id),

    CONSTRAINT chk_posting_fields CHECK (
        (status = 'draft' AND posting_date IS NULL AND posted_at IS NULL)
        OR (status <> 'draft' AND posting_date IS NOT NULL AND posted_at IS NOT NULL)
    )
);

CREATE INDEX idx_je_branch_date ON journal_entries(branch_id, transaction_date);
CREATE INDEX idx_je_loan ON journal_entries(loan_id) WHERE loan_id IS NOT NULL;
CREATE INDEX idx_je_savings ON journal_entries(savings_account_id) WHERE savings_account_id IS NOT NULL;
CREATE UNIQUE INDEX idx_je_reverses ON journal_entries(reverses_entry_id) WHERE reverses_entry_id IS NOT NULL;
";

// Amount scale must stay equal to `seashore_shared::types::MAX_DECIMAL_SCALE`.
const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    description TEXT,
    client_id UUID,

    UNIQUE (journal_entry_id, line_no),
    CONSTRAINT chk_non_negative CHECK (debit >= 0 AND credit >= 0),
    CONSTRAINT chk_one_sided CHECK ((debit = 0) <> (credit = 0))
);

CREATE INDEX idx_jel_entry ON journal_entry_lines(journal_entry_id);
CREATE INDEX idx_jel_account ON journal_entry_lines(account_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_journal_balance
-- Posted and reversed entries must have debit = credit
-- ============================================================
CREATE OR REPLACE FUNCTION check_journal_balance()
RETURNS TRIGGER AS $$
DECLARE
    entry_id UUID;
    entry_status journal_entry_status;
    total_debit NUMERIC(19, 4);
    total_credit NUMERIC(19, 4);
    line_count INTEGER;
BEGIN
    IF TG_TABLE_NAME = 'journal_entries' THEN
        entry_id := NEW.id;
    ELSE
        entry_id := NEW.journal_entry_id;
    END IF;

    SELECT status INTO entry_status FROM journal_entries WHERE id = entry_id;

    IF entry_status <> 'draft' THEN
        SELECT COALESCE(SUM(debit), 0), COALESCE(SUM(credit), 0), COUNT(*)
        INTO total_debit, total_credit, line_count
        FROM journal_entry_lines
        WHERE journal_entry_id = entry_id;

        IF line_count < 2 THEN
            RAISE EXCEPTION 'Journal entry % has % lines', entry_id, line_count;
        END IF;

        IF total_debit <> total_credit THEN
            RAISE EXCEPTION 'Journal entry % is not balanced. Debit: %, Credit: %',
                entry_id, total_debit, total_credit;
        END IF;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_line_balance
AFTER INSERT OR UPDATE ON journal_entry_lines
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_journal_balance();

CREATE CONSTRAINT TRIGGER trg_check_entry_balance
AFTER INSERT OR UPDATE OF status ON journal_entries
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_journal_balance();

-- ============================================================
-- FUNCTION: prevent_posted_line_changes
-- Lines of posted or reversed entries are append-only
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_posted_line_changes()
RETURNS TRIGGER AS $$
DECLARE
    entry_status journal_entry_status;
BEGIN
    SELECT status INTO entry_status FROM journal_entries WHERE id = OLD.journal_entry_id;

    IF entry_status IS NOT NULL AND entry_status <> 'draft' THEN
        RAISE EXCEPTION 'Lines of % journal entry % cannot be changed',
            entry_status, OLD.journal_entry_id;
    END IF;

    IF TG_OP = 'DELETE' THEN
        RETURN OLD;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_line_changes
BEFORE UPDATE OR DELETE ON journal_entry_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_line_changes();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_prevent_posted_line_changes ON journal_entry_lines;
DROP TRIGGER IF EXISTS trg_check_entry_balance ON journal_entries;
DROP TRIGGER IF EXISTS trg_check_line_balance ON journal_entry_lines;
DROP FUNCTION IF EXISTS prevent_posted_line_changes();
DROP FUNCTION IF EXISTS check_journal_balance();

DROP TABLE IF EXISTS journal_entry_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS chart_of_accounts CASCADE;

DROP TYPE IF EXISTS journal_entry_status;
DROP TYPE IF EXISTS journal_entry_kind;
DROP TYPE IF EXISTS account_type;
";
