//! Weekly A-share bar store: CSV import, suspension gap filling, dataset export.
//!
//! The core is [`suspension`]: it derives a master trading [`calendar`] from all
//! stored dates and inserts flat, zero-volume rows for every week an instrument
//! did not trade between its first and last observation.

#![deny(missing_docs)]

pub mod calendar;
pub mod config;
pub mod dataset;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
/// Diesel table definitions for the embedded migrations.
#[allow(missing_docs)]
pub mod schema;
pub mod suspension;
