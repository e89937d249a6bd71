//! Per-instrument training dataset: weekly bars joined with company metadata.
//!
//! Selection rules, applied in order:
//! 1. only instruments with a `stock_info` row are eligible; with
//!    `exclude_st` those whose name contains "ST" (any case) or is missing
//!    are dropped too;
//! 2. an instrument is kept when it has at least `min_weeks` rows and its
//!    latest `trade_date` equals the latest date among all eligible rows,
//!    i.e. it is still trading.
//!
//! The result is keyed by `ts_code` in ascending order and serializes to JSON.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::config::DatasetCfg;
use crate::models::{StockInfo, WeeklyBar};
use crate::schema::{stock_info, weekly_qfq};

/// Listing venue derived from the `ts_code` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exchange {
    /// `.SH`
    Shanghai,
    /// `.SZ`
    Shenzhen,
    /// Any other or no suffix.
    Unknown,
}

impl Exchange {
    /// Classify by the text after the last `.` (case-insensitive).
    pub fn from_ts_code(ts_code: &str) -> Self {
        match ts_code.rsplit_once('.').map(|(_, s)| s.to_ascii_uppercase()) {
            Some(s) if s == "SH" => Exchange::Shanghai,
            Some(s) if s == "SZ" => Exchange::Shenzhen,
            _ => Exchange::Unknown,
        }
    }
}

/// Metadata block of one exported instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentInfo {
    /// Stored company metadata.
    #[serde(flatten)]
    pub info: StockInfo,
    /// Venue derived from the code.
    pub exchange: Exchange,
}

/// One exported instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentDataset {
    /// Company metadata.
    pub stock_info: InstrumentInfo,
    /// Weekly bars, ascending by date.
    pub weekly_qfq: Vec<WeeklyBar>,
}

/// Exported dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// When the dataset was assembled.
    pub generated_at: DateTime<Utc>,
    /// Latest trade date among eligible rows, if any.
    pub latest_trade_date: Option<String>,
    /// Instruments by code, ascending.
    pub instruments: IndexMap<String, InstrumentDataset>,
}

fn is_special_treatment(name: &str) -> bool {
    name.to_uppercase().contains("ST")
}

// an unnamed company cannot be cleared of special treatment
fn passes_st_filter(info: &StockInfo, cfg: &DatasetCfg) -> bool {
    !cfg.exclude_st || !info.name.as_deref().is_none_or(is_special_treatment)
}

/// Assemble the dataset according to `cfg`.
pub fn build_dataset(conn: &mut SqliteConnection, cfg: &DatasetCfg) -> anyhow::Result<Dataset> {
    let infos: Vec<StockInfo> = stock_info::table
        .select(StockInfo::as_select())
        .load(conn)?;
    let mut eligible: HashMap<String, StockInfo> = infos
        .into_iter()
        .filter(|i| passes_st_filter(i, cfg))
        .map(|i| (i.ts_code.clone(), i))
        .collect();

    let bars: Vec<WeeklyBar> = weekly_qfq::table
        .order((weekly_qfq::ts_code.asc(), weekly_qfq::trade_date.asc()))
        .select(WeeklyBar::as_select())
        .load(conn)?;

    let mut grouped: IndexMap<String, Vec<WeeklyBar>> = IndexMap::new();
    for bar in bars {
        if eligible.contains_key(&bar.ts_code) {
            grouped.entry(bar.ts_code.clone()).or_default().push(bar);
        }
    }

    // rows are date-ordered per code, so the last row is each code's latest
    let latest_trade_date = grouped
        .values()
        .filter_map(|rows| rows.last().map(|b| b.trade_date.clone()))
        .max();

    let mut instruments = IndexMap::new();
    for (code, rows) in grouped {
        let current = rows.last().map(|b| &b.trade_date) == latest_trade_date.as_ref();
        if rows.len() < cfg.min_weeks || !current {
            debug!(ts_code = %code, rows = rows.len(), current, "instrument not exported");
            continue;
        }
        let Some(info) = eligible.remove(&code) else {
            continue;
        };
        let exchange = Exchange::from_ts_code(&code);
        instruments.insert(
            code,
            InstrumentDataset {
                stock_info: InstrumentInfo { info, exchange },
                weekly_qfq: rows,
            },
        );
    }

    Ok(Dataset {
        generated_at: Utc::now(),
        latest_trade_date,
        instruments,
    })
}
