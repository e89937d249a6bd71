//! CSV loaders that populate the store.
//!
//! Each loader reads one CSV stream, maps rows onto a table model with the
//! rules in [`coerce`], and upserts them inside a single `BEGIN IMMEDIATE`
//! transaction: a file either lands completely or not at all. Rows without a
//! key column value are dropped and counted, not reported as errors.

pub mod coerce;
pub mod stock_info;
pub mod weekly;

use std::fmt;

pub use stock_info::{import_stock_info_csv, import_stock_info_path};
pub use weekly::{import_weekly_csv, import_weekly_path};

/// Row counts for one loaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Data records read (header excluded).
    pub read: usize,
    /// Records upserted.
    pub imported: usize,
    /// Records dropped for lacking a key column value.
    pub dropped: usize,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read {} rows, imported {}, dropped {}",
            self.read, self.imported, self.dropped
        )
    }
}

fn csv_reader<R: std::io::Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
}
