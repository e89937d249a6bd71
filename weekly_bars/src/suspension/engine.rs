//! Per-instrument gap walk.
//!
//! For one `ts_code` the engine walks every calendar position between the
//! instrument's first and last stored dates. Each slot is either a real row
//! (left alone), a previously filled row (rebased and rewritten), or empty
//! (filled from the most recent row seen so far). Slots before the first or
//! after the last stored date are never touched.

use std::collections::HashMap;

use diesel::SqliteConnection;
use tracing::{debug, warn};

use crate::calendar::CalendarIndex;
use crate::models::WeeklyBar;
use crate::suspension::normalize::{renormalize, synthesize_from};
use crate::suspension::repo::BarRepo;

/// Densify one instrument against `calendar`; returns the number of rows inserted.
///
/// All writes for the instrument run in a single `BEGIN IMMEDIATE` transaction.
/// A write failure rolls the instrument back and is returned to the caller.
/// A first or last date missing from the calendar is logged and the
/// instrument is skipped with no writes.
pub fn fill_instrument(
    repo: &impl BarRepo,
    conn: &mut SqliteConnection,
    code: &str,
    calendar: &CalendarIndex,
) -> anyhow::Result<usize> {
    conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let bars = repo.load_bars(conn, code)?;
        let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
            return Ok(0);
        };

        let (Some(start), Some(end)) = (
            calendar.position(&first.trade_date),
            calendar.position(&last.trade_date),
        ) else {
            warn!(
                ts_code = code,
                first_date = %first.trade_date,
                last_date = %last.trade_date,
                "stored date range not found in trading calendar, skipping instrument"
            );
            return Ok(0);
        };

        if start >= end {
            return Ok(0);
        }

        let mut by_date: HashMap<String, WeeklyBar> = bars
            .into_iter()
            .map(|b| (b.trade_date.clone(), b))
            .collect();
        let mut last_row: Option<WeeklyBar> = None;
        let mut inserted = 0usize;

        for date in &calendar.dates()[start..=end] {
            match by_date.get(date) {
                Some(existing) if existing.is_suspension_fill => {
                    let refreshed = renormalize(existing, last_row.as_ref());
                    repo.upsert_bar(conn, &refreshed)?;
                    by_date.insert(date.clone(), refreshed.clone());
                    last_row = Some(refreshed);
                }
                Some(existing) => {
                    last_row = Some(existing.clone());
                }
                None => {
                    let Some(prev) = last_row.as_ref() else {
                        warn!(
                            ts_code = code,
                            trade_date = %date,
                            "no prior row to carry forward, skipping date"
                        );
                        continue;
                    };
                    let filled = synthesize_from(prev, date);
                    repo.upsert_bar(conn, &filled)?;
                    by_date.insert(date.clone(), filled.clone());
                    last_row = Some(filled);
                    inserted += 1;
                }
            }
        }

        debug!(ts_code = code, start, end, inserted, "instrument walk done");
        Ok(inserted)
    })
}
