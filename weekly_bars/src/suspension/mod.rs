//! Suspension fill: densify every instrument's weekly series.
//!
//! ## What this does
//! - Builds the master [`CalendarIndex`] once from all stored trade dates.
//! - Walks instruments in ascending `ts_code` order and calls
//!   [`engine::fill_instrument`] for each, one after another.
//! - Logs `Filled N suspension rows for {code}` when N > 0 and a final total.
//!
//! ## Transactions & failure
//! Each instrument commits on its own. The first storage error aborts the run:
//! instruments already committed stay committed, the failing one is rolled back,
//! and the error is returned. Date-range inconsistencies are not errors; the
//! affected instrument is skipped with a warning.
//!
//! An empty store (no dates or no codes) is a successful no-op.

pub mod engine;
pub mod normalize;
pub mod repo;

use std::fmt;

use anyhow::Context;
use diesel::SqliteConnection;
use indexmap::IndexMap;
use tracing::info;

use crate::calendar::CalendarIndex;
use repo::BarRepo;

pub use engine::fill_instrument;
pub use normalize::normalize_suspension;

/// Outcome of a full fill run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillSummary {
    /// Distinct trade dates in the calendar used for the run.
    pub calendar_len: usize,
    /// Instruments visited.
    pub instruments: usize,
    /// Rows inserted per instrument, in processing order; only non-zero counts.
    pub filled: IndexMap<String, usize>,
    /// Sum of all inserted rows.
    pub total_inserted: usize,
}

impl fmt::Display for FillSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "calendar: {} dates, instruments: {}, new rows: {}",
            self.calendar_len, self.instruments, self.total_inserted
        )?;
        for (code, n) in &self.filled {
            writeln!(f, "  {code}: +{n}")?;
        }
        Ok(())
    }
}

/// Fill suspension gaps across the whole store.
pub fn fill_suspensions(
    repo: &impl BarRepo,
    conn: &mut SqliteConnection,
) -> anyhow::Result<FillSummary> {
    let calendar = CalendarIndex::load(repo, conn).context("failed to build trading calendar")?;
    fill_suspensions_with_calendar(repo, conn, &calendar)
}

/// Like [`fill_suspensions`] but against a caller-supplied calendar.
pub fn fill_suspensions_with_calendar(
    repo: &impl BarRepo,
    conn: &mut SqliteConnection,
    calendar: &CalendarIndex,
) -> anyhow::Result<FillSummary> {
    let mut summary = FillSummary {
        calendar_len: calendar.len(),
        ..Default::default()
    };

    if calendar.is_empty() {
        info!("Suspension fill complete. Total new rows: 0.");
        return Ok(summary);
    }

    let codes = repo
        .distinct_codes(conn)
        .context("failed to list instrument codes")?;

    for code in codes {
        let inserted = fill_instrument(repo, conn, &code, calendar)
            .with_context(|| format!("suspension fill failed for {code}"))?;
        summary.instruments += 1;
        if inserted > 0 {
            info!("Filled {inserted} suspension rows for {code}");
            summary.total_inserted += inserted;
            summary.filled.insert(code, inserted);
        }
    }

    info!(
        "Suspension fill complete. Total new rows: {}.",
        summary.total_inserted
    );
    Ok(summary)
}
