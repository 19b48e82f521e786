//! Postgres storage for the Seashore ledger.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ledger tables
//! - Repositories implementing the core storage ports
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{AccountRepository, JournalRepository, JournalTx};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use seashore_core::ledger::{LedgerPoster, PostingSettings};
use seashore_shared::config::DatabaseConfig;

/// Ledger poster backed by Postgres.
pub type PgLedgerPoster = LedgerPoster<AccountRepository, JournalRepository>;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}

/// Builds a poster whose resolver and store share one connection pool.
#[must_use]
pub fn ledger_poster(db: &DatabaseConnection, settings: PostingSettings) -> PgLedgerPoster {
    LedgerPoster::new(
        AccountRepository::new(db.clone()),
        JournalRepository::new(db.clone()),
        settings,
    )
}
