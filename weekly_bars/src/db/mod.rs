//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - SQLite connection helpers: [`connection::connect_sqlite`] applies WAL, foreign_keys=ON, and a 5000ms busy_timeout.
//! - Embedded Diesel migrations: [`migrate::run_sqlite`] brings `weekly_qfq` and `stock_info` up to date.
//! - [`open`]: migrate then connect, the usual entry point for the CLI.
//!
//! Example:
//! ```no_run
//! use weekly_bars::db;
//!
//! let db_path = std::env::temp_dir().join("weekly_bars_example.db");
//! let _conn = db::open(db_path.to_str().unwrap()).expect("open");
//! ```

pub mod connection;
pub mod migrate;

use diesel::SqliteConnection;

/// Apply pending migrations and return a tuned connection.
pub fn open(database_url: &str) -> anyhow::Result<SqliteConnection> {
    migrate::run_sqlite(database_url)?;
    connection::connect_sqlite(database_url)
}
