//! Fixed asset ledger schema.
//!
//! Creates the enums, tables, constraints and triggers backing the period
//! ledger: accounting periods, asset categories, fixed assets, per-period
//! balances, the movement audit trail and depreciation entries.

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
        // PART 2: PERIODS & ASSET REGISTER
        // ============================================================
        db.execute_unprepared(ACCOUNTING_PERIODS_SQL).await?;
        db.execute_unprepared(ASSET_CATEGORIES_SQL).await?;
        db.execute_unprepared(FIXED_ASSETS_SQL).await?;

        // ============================================================
        // PART 3: PERIOD LEDGER
        // ============================================================
        db.execute_unprepared(ASSET_PERIOD_BALANCES_SQL).await?;
        db.execute_unprepared(ASSET_MOVEMENTS_SQL).await?;
        db.execute_unprepared(DEPRECIATION_ENTRIES_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS
        // ============================================================
        db.execute_unprepared(FUNCTIONS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
-- Accounting period lifecycle
CREATE TYPE accounting_period_status AS ENUM ('PLANNED', 'OPEN', 'CLOSED');

-- Depreciation methods
CREATE TYPE depreciation_method AS ENUM ('straight_line', 'reducing_balance');

-- Movement kinds posted against a period balance
CREATE TYPE asset_movement_type AS ENUM (
    'cost_adj',
    'depreciation_adj',
    'revaluation',
    'disposal_full',
    'disposal_partial'
);
";

const ACCOUNTING_PERIODS_SQL: &str = r"
CREATE TABLE accounting_periods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL,
    name VARCHAR(100) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status accounting_period_status NOT NULL DEFAULT 'PLANNED',
    is_current BOOLEAN NOT NULL DEFAULT false,
    closed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_accounting_period_dates CHECK (end_date >= start_date),
    CONSTRAINT chk_closed_not_current CHECK (NOT (status = 'CLOSED' AND is_current)),
    UNIQUE (client_id, start_date)
);

CREATE INDEX idx_accounting_periods_client_date ON accounting_periods(client_id, start_date, end_date);

-- At most one current open period per client
CREATE UNIQUE INDEX uq_accounting_periods_current_open
    ON accounting_periods(client_id)
    WHERE is_current AND status = 'OPEN';
";

const ASSET_CATEGORIES_SQL: &str = r"
CREATE TABLE asset_categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL,
    name VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (client_id, name)
);
";

const FIXED_ASSETS_SQL: &str = r"
CREATE TABLE fixed_assets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL,
    category_id UUID NOT NULL REFERENCES asset_categories(id) ON DELETE RESTRICT,
    description VARCHAR(255) NOT NULL,
    original_cost NUMERIC(19, 2) NOT NULL,
    cost_adjustment NUMERIC(19, 2) NOT NULL DEFAULT 0,
    acquisition_date DATE NOT NULL,
    depreciation_method depreciation_method NOT NULL,
    depreciation_rate NUMERIC(7, 4) NOT NULL,
    total_depreciation_to_date NUMERIC(19, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_original_cost_non_negative CHECK (original_cost >= 0),
    CONSTRAINT chk_depreciation_rate_range CHECK (depreciation_rate >= 0 AND depreciation_rate <= 100)
);

CREATE INDEX idx_fixed_assets_client ON fixed_assets(client_id, acquisition_date);
CREATE INDEX idx_fixed_assets_category ON fixed_assets(category_id);
";

const ASSET_PERIOD_BALANCES_SQL: &str = r"
CREATE TABLE asset_period_balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL,
    asset_id UUID NOT NULL REFERENCES fixed_assets(id) ON DELETE RESTRICT,
    period_id UUID NOT NULL REFERENCES accounting_periods(id) ON DELETE RESTRICT,
    cost_bfwd NUMERIC(19, 2) NOT NULL DEFAULT 0,
    additions NUMERIC(19, 2) NOT NULL DEFAULT 0,
    disposals_cost NUMERIC(19, 2) NOT NULL DEFAULT 0,
    cost_adjustment NUMERIC(19, 2) NOT NULL DEFAULT 0,
    depreciation_bfwd NUMERIC(19, 2) NOT NULL DEFAULT 0,
    depreciation_charge NUMERIC(19, 2) NOT NULL DEFAULT 0,
    depreciation_on_disposals NUMERIC(19, 2) NOT NULL DEFAULT 0,
    depreciation_adjustment NUMERIC(19, 2) NOT NULL DEFAULT 0,
    disposal_proceeds NUMERIC(19, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_balance_charge_non_negative CHECK (depreciation_charge >= 0),
    CONSTRAINT chk_balance_disposals_non_negative CHECK (
        disposals_cost >= 0 AND depreciation_on_disposals >= 0 AND disposal_proceeds >= 0
    ),
    UNIQUE (asset_id, period_id)
);

CREATE INDEX idx_asset_period_balances_period ON asset_period_balances(client_id, period_id);
";

const ASSET_MOVEMENTS_SQL: &str = r"
CREATE TABLE asset_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL,
    asset_id UUID NOT NULL REFERENCES fixed_assets(id) ON DELETE RESTRICT,
    period_id UUID NOT NULL REFERENCES accounting_periods(id) ON DELETE RESTRICT,
    movement_type asset_movement_type NOT NULL,
    posting_date DATE NOT NULL,
    amount_cost NUMERIC(19, 2) NOT NULL DEFAULT 0,
    amount_depreciation NUMERIC(19, 2) NOT NULL DEFAULT 0,
    amount_proceeds NUMERIC(19, 2) NOT NULL DEFAULT 0,
    disposal_percentage NUMERIC(7, 4),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_disposal_percentage_range CHECK (
        disposal_percentage IS NULL OR (disposal_percentage > 0 AND disposal_percentage <= 100)
    )
);

CREATE INDEX idx_asset_movements_asset_period ON asset_movements(asset_id, period_id, posting_date);
";

const DEPRECIATION_ENTRIES_SQL: &str = r"
CREATE TABLE depreciation_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL,
    asset_id UUID NOT NULL REFERENCES fixed_assets(id) ON DELETE RESTRICT,
    period_id UUID NOT NULL REFERENCES accounting_periods(id) ON DELETE RESTRICT,
    depreciation_amount NUMERIC(19, 2) NOT NULL,
    days_in_period INTEGER NOT NULL,
    rate_used NUMERIC(7, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_depreciation_amount_non_negative CHECK (depreciation_amount >= 0),
    CONSTRAINT chk_days_in_period_non_negative CHECK (days_in_period >= 0),
    UNIQUE (asset_id, period_id)
);

CREATE INDEX idx_depreciation_entries_period ON depreciation_entries(client_id, period_id);
";

const FUNCTIONS_SQL: &str = r"
-- Movements are an append-only audit trail
CREATE OR REPLACE FUNCTION prevent_movement_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Asset movements are append-only and cannot be %', lower(TG_OP);
END;
$$ LANGUAGE plpgsql;

-- Closed periods are immutable
CREATE OR REPLACE FUNCTION prevent_closed_period_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.status = 'CLOSED' THEN
        RAISE EXCEPTION 'Accounting period % is closed and cannot be modified', OLD.id;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const TRIGGERS_SQL: &str = r"
CREATE TRIGGER trg_prevent_movement_mod
    BEFORE UPDATE OR DELETE ON asset_movements
    FOR EACH ROW
    EXECUTE FUNCTION prevent_movement_modification();

CREATE TRIGGER trg_prevent_closed_period_mod
    BEFORE UPDATE ON accounting_periods
    FOR EACH ROW
    EXECUTE FUNCTION prevent_closed_period_modification();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop triggers
DROP TRIGGER IF EXISTS trg_prevent_closed_period_mod ON accounting_periods;
DROP TRIGGER IF EXISTS trg_prevent_movement_mod ON asset_movements;

-- Drop functions
DROP FUNCTION IF EXISTS prevent_closed_period_modification();
DROP FUNCTION IF EXISTS prevent_movement_modification();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS depreciation_entries CASCADE;
DROP TABLE IF EXISTS asset_movements CASCADE;
DROP TABLE IF EXISTS asset_period_balances CASCADE;
DROP TABLE IF EXISTS fixed_assets CASCADE;
DROP TABLE IF EXISTS asset_categories CASCADE;
DROP TABLE IF EXISTS accounting_periods CASCADE;

-- Drop enums
DROP TYPE IF EXISTS asset_movement_type;
DROP TYPE IF EXISTS depreciation_method;
DROP TYPE IF EXISTS accounting_period_status;
";
