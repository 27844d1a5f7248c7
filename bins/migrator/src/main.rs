//! Database migration runner for Assetbook.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Roll back the asset ledger schema
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The connection string is read from `DATABASE_URL`.

use assetbook_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // sea-orm-migration installs its own tracing subscriber.
    cli::run_cli(Migrator).await;
}
