//! Typed errors surfaced by the import and configuration layers.
//!
//! Orchestration code works in `anyhow::Result`; these variants travel inside
//! it and can be recovered with `downcast_ref`.

use thiserror::Error;

/// Errors raised while loading a CSV file into the store.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The header row does not contain a column the table cannot live without.
    #[error("csv header is missing required column `{0}`")]
    MissingColumn(&'static str),

    /// The CSV reader failed (I/O or malformed record).
    #[error("csv read failed")]
    Csv(#[from] csv::Error),
}

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No database URL was given on the command line, in the config file, or in the environment.
    #[error("no database url: pass --database-url, set `database_url` in the config file, or export {0}")]
    MissingDatabaseUrl(&'static str),

    /// A config value is outside its accepted range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
