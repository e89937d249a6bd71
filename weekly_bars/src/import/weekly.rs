//! `weekly_qfq` loader.

use std::{fs::File, io::Read, path::Path};

use anyhow::Context;
use diesel::prelude::*;
use tracing::info;

use crate::error::ImportError;
use crate::import::{ImportReport, coerce::Columns, csv_reader};
use crate::models::WeeklyBar;
use crate::schema::weekly_qfq;

fn to_bar(cols: &Columns, rec: &csv::StringRecord) -> Option<WeeklyBar> {
    let ts_code = cols.text(rec, "ts_code")?;
    let trade_date = cols.text(rec, "trade_date")?;

    Some(WeeklyBar {
        end_date: cols.text(rec, "end_date"),
        freq: cols.text(rec, "freq"),
        open: cols.number(rec, "open"),
        high: cols.number(rec, "high"),
        low: cols.number(rec, "low"),
        close: cols.number(rec, "close"),
        pre_close: cols.number(rec, "pre_close"),
        open_qfq: cols.number(rec, "open_qfq"),
        high_qfq: cols.number(rec, "high_qfq"),
        low_qfq: cols.number(rec, "low_qfq"),
        close_qfq: cols.number(rec, "close_qfq"),
        open_hfq: cols.number(rec, "open_hfq"),
        high_hfq: cols.number(rec, "high_hfq"),
        low_hfq: cols.number(rec, "low_hfq"),
        close_hfq: cols.number(rec, "close_hfq"),
        vol: cols.number(rec, "vol"),
        amount: cols.number(rec, "amount"),
        change: cols.number(rec, "change"),
        pct_chg: cols.number(rec, "pct_chg"),
        // imported rows are real market data by definition
        is_suspension_fill: false,
        ..WeeklyBar::empty(ts_code, trade_date)
    })
}

/// Load weekly bars from CSV text into `weekly_qfq`.
///
/// Requires `ts_code` and `trade_date` headers. Re-importing a row replaces it,
/// including a previously filled row for the same key.
pub fn import_weekly_csv<R: Read>(
    conn: &mut SqliteConnection,
    input: R,
) -> anyhow::Result<ImportReport> {
    let mut rdr = csv_reader(input);
    let cols = Columns::new(rdr.headers().map_err(ImportError::from)?);
    for required in ["ts_code", "trade_date"] {
        if !cols.has(required) {
            return Err(ImportError::MissingColumn(required).into());
        }
    }

    conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let mut report = ImportReport::default();
        for rec in rdr.records() {
            let rec = rec.map_err(ImportError::from)?;
            report.read += 1;
            let Some(bar) = to_bar(&cols, &rec) else {
                report.dropped += 1;
                continue;
            };
            diesel::replace_into(weekly_qfq::table)
                .values(&bar)
                .execute(conn)?;
            report.imported += 1;
        }
        Ok(report)
    })
}

/// Open `path` and run [`import_weekly_csv`] on it.
pub fn import_weekly_path(
    conn: &mut SqliteConnection,
    path: impl AsRef<Path>,
) -> anyhow::Result<ImportReport> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let report = import_weekly_csv(conn, file)
        .with_context(|| format!("weekly import failed for {}", path.display()))?;
    info!(file = %path.display(), %report, "weekly bars imported");
    Ok(report)
}
