//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`]:
//! - [`crate::schema::weekly_qfq`] — one weekly bar per `(ts_code, trade_date)`
//! - [`crate::schema::stock_info`] — static company metadata per `ts_code`
//!
//! Bars are only ever written with `REPLACE INTO`, so the same struct serves as
//! the Queryable and the Insertable form. `None` fields are written as SQL NULL.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{stock_info, weekly_qfq};

/// A row in [`crate::schema::weekly_qfq`]: one instrument on one trading week.
///
/// Price fields come in three flavours: raw, forward-adjusted (`_qfq`) and
/// backward-adjusted (`_hfq`). Any of them may be missing in the source data.
#[derive(
    Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize,
)]
#[diesel(table_name = weekly_qfq, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_default_value = false)]
pub struct WeeklyBar {
    /// Instrument code with exchange suffix (e.g., "600000.SH").
    pub ts_code: String,
    /// Trading date as `YYYYMMDD`.
    pub trade_date: String,
    /// Period end date as reported by the source; echoes `trade_date` on filled rows.
    pub end_date: Option<String>,
    /// Sampling frequency tag (e.g., "week"); carried over unchanged.
    pub freq: Option<String>,
    /// Opening price.
    pub open: Option<f64>,
    /// Highest price.
    pub high: Option<f64>,
    /// Lowest price.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Previous period close.
    pub pre_close: Option<f64>,
    /// Forward-adjusted open.
    pub open_qfq: Option<f64>,
    /// Forward-adjusted high.
    pub high_qfq: Option<f64>,
    /// Forward-adjusted low.
    pub low_qfq: Option<f64>,
    /// Forward-adjusted close.
    pub close_qfq: Option<f64>,
    /// Backward-adjusted open.
    pub open_hfq: Option<f64>,
    /// Backward-adjusted high.
    pub high_hfq: Option<f64>,
    /// Backward-adjusted low.
    pub low_hfq: Option<f64>,
    /// Backward-adjusted close.
    pub close_hfq: Option<f64>,
    /// Traded volume.
    pub vol: Option<f64>,
    /// Turnover.
    pub amount: Option<f64>,
    /// Absolute price change versus `pre_close`.
    pub change: Option<f64>,
    /// Percentage price change versus `pre_close`.
    pub pct_chg: Option<f64>,
    /// True when the row was fabricated to cover a suspension.
    pub is_suspension_fill: bool,
}

impl WeeklyBar {
    /// A real (non-filled) bar with every optional column unset.
    pub fn empty(ts_code: impl Into<String>, trade_date: impl Into<String>) -> Self {
        Self {
            ts_code: ts_code.into(),
            trade_date: trade_date.into(),
            end_date: None,
            freq: None,
            open: None,
            high: None,
            low: None,
            close: None,
            pre_close: None,
            open_qfq: None,
            high_qfq: None,
            low_qfq: None,
            close_qfq: None,
            open_hfq: None,
            high_hfq: None,
            low_hfq: None,
            close_hfq: None,
            vol: None,
            amount: None,
            change: None,
            pct_chg: None,
            is_suspension_fill: false,
        }
    }
}

/// A row in [`crate::schema::stock_info`]: listing metadata for one instrument.
#[derive(
    Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize,
)]
#[diesel(table_name = stock_info, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_default_value = false)]
pub struct StockInfo {
    /// Instrument code (primary key).
    pub ts_code: String,
    /// Bare exchange symbol (e.g., "600000").
    pub symbol: Option<String>,
    /// Short company name; "ST" in the name marks special treatment.
    pub name: Option<String>,
    /// Registered region.
    pub area: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Pinyin abbreviation of the name.
    pub cnspell: Option<String>,
    /// Market board (e.g., main board, STAR).
    pub market: Option<String>,
    /// Listing date as `YYYYMMDD`.
    pub list_date: Option<String>,
    /// Name of the actual controller.
    pub act_name: Option<String>,
    /// Entity type of the actual controller.
    pub act_ent_type: Option<String>,
}
