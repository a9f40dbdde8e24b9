//! Initial database migration.
//!
//! Creates the enums and tables of the ledger schema: fiscal years,
//! chart of accounts, journal entries and lines, opening balances,
//! auto-journal templates and audit log, and bank reconciliation.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: FISCAL YEARS
        // ============================================================
        db.execute_unprepared(FISCAL_YEARS_SQL).await?;

        // ============================================================
        // PART 3: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 4: JOURNAL ENTRIES & LINES
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;

        // ============================================================
        // PART 5: OPENING BALANCES
        // ============================================================
        db.execute_unprepared(OPENING_BALANCES_SQL).await?;

        // ============================================================
        // PART 6: AUTO-JOURNAL TEMPLATES & AUDIT LOG
        // ============================================================
        db.execute_unprepared(AUTO_JOURNAL_TEMPLATES_SQL).await?;
        db.execute_unprepared(AUTO_JOURNAL_LOG_SQL).await?;

        // ============================================================
        // PART 7: BANK RECONCILIATION
        // ============================================================
        db.execute_unprepared(BANK_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(BANK_RECONCILIATION_MATCHES_SQL).await?;

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
-- Fiscal year status
CREATE TYPE fiscal_year_status AS ENUM ('open', 'closed');

-- Account types (five-way classification)
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Which side increases an account's balance
CREATE TYPE account_nature AS ENUM ('debit', 'credit');

-- Journal entry status
CREATE TYPE entry_status AS ENUM ('draft', 'posted', 'cancelled');

-- Reconciliation match type
CREATE TYPE match_type AS ENUM ('auto', 'manual', 'suggested');
";

const FISCAL_YEARS_SQL: &str = r"
CREATE TABLE fiscal_years (
    id UUID PRIMARY KEY,
    year INTEGER NOT NULL UNIQUE,
    name VARCHAR(50) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status fiscal_year_status NOT NULL DEFAULT 'open',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_fiscal_year_dates CHECK (end_date > start_date)
);

CREATE INDEX idx_fiscal_years_dates ON fiscal_years(start_date, end_date);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    name_ar VARCHAR(255),
    description TEXT,
    account_type account_type NOT NULL,
    account_nature account_nature NOT NULL,
    is_header BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    parent_id UUID REFERENCES accounts(id),
    current_balance NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_active ON accounts(code) WHERE is_active = true;
CREATE INDEX idx_accounts_type ON accounts(account_type);
CREATE INDEX idx_accounts_parent ON accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    entry_number VARCHAR(20) NOT NULL,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    fiscal_year_id UUID NOT NULL REFERENCES fiscal_years(id),
    status entry_status NOT NULL DEFAULT 'draft',
    reference_type VARCHAR(50),
    reference_id UUID,
    created_by UUID NOT NULL,
    posted_by UUID,
    posted_at TIMESTAMPTZ,
    cancelled_by UUID,
    cancelled_at TIMESTAMPTZ,
    review_notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- Backs concurrent entry-number generation: the losing writer
    -- retries with a fresh number.
    CONSTRAINT uq_entry_number_per_year UNIQUE (fiscal_year_id, entry_number)
);

CREATE INDEX idx_journal_entries_date ON journal_entries(entry_date);
CREATE INDEX idx_journal_entries_status ON journal_entries(status);
CREATE INDEX idx_journal_entries_reference ON journal_entries(reference_type, reference_id)
    WHERE reference_id IS NOT NULL;
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id UUID PRIMARY KEY,
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    credit_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    description VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_line_number_per_entry UNIQUE (entry_id, line_number),
    CONSTRAINT chk_one_side CHECK (
        (debit_amount > 0 AND credit_amount = 0) OR
        (credit_amount > 0 AND debit_amount = 0)
    )
);

CREATE INDEX idx_lines_entry ON journal_entry_lines(entry_id);
CREATE INDEX idx_lines_account ON journal_entry_lines(account_id);
";

const OPENING_BALANCES_SQL: &str = r"
CREATE TABLE opening_balances (
    id UUID PRIMARY KEY,
    fiscal_year_id UUID NOT NULL REFERENCES fiscal_years(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    credit_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_opening_balance UNIQUE (fiscal_year_id, account_id),
    CONSTRAINT chk_non_negative CHECK (debit_amount >= 0 AND credit_amount >= 0)
);

CREATE INDEX idx_opening_balances_account ON opening_balances(account_id);
";

const AUTO_JOURNAL_TEMPLATES_SQL: &str = r"
CREATE TABLE auto_journal_templates (
    id UUID PRIMARY KEY,
    trigger_event VARCHAR(100) NOT NULL,
    name VARCHAR(255) NOT NULL,
    debit_accounts JSONB NOT NULL DEFAULT '[]',
    credit_accounts JSONB NOT NULL DEFAULT '[]',
    priority SMALLINT NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_templates_trigger ON auto_journal_templates(trigger_event, priority DESC)
    WHERE is_active = true;
";

const AUTO_JOURNAL_LOG_SQL: &str = r"
CREATE TABLE auto_journal_log (
    id UUID PRIMARY KEY,
    trigger_event VARCHAR(100) NOT NULL,
    template_id UUID REFERENCES auto_journal_templates(id) ON DELETE SET NULL,
    amount NUMERIC(18, 2) NOT NULL,
    reference_type VARCHAR(50) NOT NULL,
    reference_id UUID NOT NULL,
    journal_entry_id UUID REFERENCES journal_entries(id),
    success BOOLEAN NOT NULL,
    error_message TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_auto_journal_log_trigger ON auto_journal_log(trigger_event, created_at);
CREATE INDEX idx_auto_journal_log_reference ON auto_journal_log(reference_type, reference_id);
";

const BANK_TRANSACTIONS_SQL: &str = r"
CREATE TABLE bank_transactions (
    id UUID PRIMARY KEY,
    transaction_date DATE NOT NULL,
    amount NUMERIC(18, 2) NOT NULL,
    description TEXT NOT NULL,
    statement_reference VARCHAR(100),
    is_matched BOOLEAN NOT NULL DEFAULT false,
    journal_entry_id UUID REFERENCES journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_bank_transactions_unmatched ON bank_transactions(transaction_date)
    WHERE is_matched = false;
";

const BANK_RECONCILIATION_MATCHES_SQL: &str = r"
CREATE TABLE bank_reconciliation_matches (
    id UUID PRIMARY KEY,
    bank_transaction_id UUID NOT NULL REFERENCES bank_transactions(id) ON DELETE CASCADE,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id),
    match_type match_type NOT NULL,
    confidence_score NUMERIC(5, 4) NOT NULL,
    matched_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- One active match per bank transaction.
    CONSTRAINT uq_match_per_transaction UNIQUE (bank_transaction_id),
    CONSTRAINT chk_confidence_range CHECK (confidence_score >= 0 AND confidence_score <= 1)
);

CREATE INDEX idx_matches_entry ON bank_reconciliation_matches(journal_entry_id);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TABLE IF EXISTS bank_reconciliation_matches CASCADE;
DROP TABLE IF EXISTS bank_transactions CASCADE;
DROP TABLE IF EXISTS auto_journal_log CASCADE;
DROP TABLE IF EXISTS auto_journal_templates CASCADE;
DROP TABLE IF EXISTS opening_balances CASCADE;
DROP TABLE IF EXISTS journal_entry_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS fiscal_years CASCADE;

DROP TYPE IF EXISTS match_type CASCADE;
DROP TYPE IF EXISTS entry_status CASCADE;
DROP TYPE IF EXISTS account_nature CASCADE;
DROP TYPE IF EXISTS account_type CASCADE;
DROP TYPE IF EXISTS fiscal_year_status CASCADE;
";
