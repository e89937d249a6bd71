//! `stock_info` loader.

use std::{fs::File, io::Read, path::Path};

use anyhow::Context;
use diesel::prelude::*;
use tracing::info;

use crate::error::ImportError;
use crate::import::{ImportReport, coerce::Columns, csv_reader};
use crate::models::StockInfo;
use crate::schema::stock_info;

fn to_info(cols: &Columns, rec: &csv::StringRecord) -> Option<StockInfo> {
    Some(StockInfo {
        ts_code: cols.text(rec, "ts_code")?,
        symbol: cols.text(rec, "symbol"),
        name: cols.text(rec, "name"),
        area: cols.text(rec, "area"),
        industry: cols.text(rec, "industry"),
        cnspell: cols.text(rec, "cnspell"),
        market: cols.text(rec, "market"),
        list_date: cols.text(rec, "list_date"),
        act_name: cols.text(rec, "act_name"),
        act_ent_type: cols.text(rec, "act_ent_type"),
    })
}

/// Load company metadata from CSV text into `stock_info`. Requires a `ts_code` header.
pub fn import_stock_info_csv<R: Read>(
    conn: &mut SqliteConnection,
    input: R,
) -> anyhow::Result<ImportReport> {
    let mut rdr = csv_reader(input);
    let cols = Columns::new(rdr.headers().map_err(ImportError::from)?);
    if !cols.has("ts_code") {
        return Err(ImportError::MissingColumn("ts_code").into());
    }

    conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let mut report = ImportReport::default();
        for rec in rdr.records() {
            let rec = rec.map_err(ImportError::from)?;
            report.read += 1;
            match to_info(&cols, &rec) {
                Some(info) => {
                    diesel::replace_into(stock_info::table)
                        .values(&info)
                        .execute(conn)?;
                    report.imported += 1;
                }
                None => report.dropped += 1,
            }
        }
        Ok(report)
    })
}

/// Open `path` and run [`import_stock_info_csv`] on it.
pub fn import_stock_info_path(
    conn: &mut SqliteConnection,
    path: impl AsRef<Path>,
) -> anyhow::Result<ImportReport> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let report = import_stock_info_csv(conn, file)
        .with_context(|| format!("stock_info import failed for {}", path.display()))?;
    info!(file = %path.display(), %report, "stock info imported");
    Ok(report)
}
