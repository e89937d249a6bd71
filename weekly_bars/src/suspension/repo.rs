//! Bar storage surface used by the suspension fill.
//!
//! Every method takes the connection explicitly so callers decide the
//! transaction boundary; the fill engine wraps one instrument's writes in a
//! single immediate transaction and calls [`BarRepo::upsert_bar`] inside it.

use diesel::prelude::*;

use crate::models::WeeklyBar;
use crate::schema::weekly_qfq::dsl as wq;

/// Result type used throughout the bar repository.
pub type RepoResult<T> = anyhow::Result<T>;

/// Portable surface, SQLite implementation is [`SqliteBarRepo`].
pub trait BarRepo {
    /// All distinct trade dates across every instrument, ascending.
    fn distinct_trade_dates(&self, conn: &mut SqliteConnection) -> RepoResult<Vec<String>>;

    /// All distinct instrument codes, ascending.
    fn distinct_codes(&self, conn: &mut SqliteConnection) -> RepoResult<Vec<String>>;

    /// Every stored row (real and filled) for `code`, ordered by trade date ascending.
    fn load_bars(&self, conn: &mut SqliteConnection, code: &str) -> RepoResult<Vec<WeeklyBar>>;

    /// Insert-or-replace one row keyed by `(ts_code, trade_date)`.
    fn upsert_bar(&self, conn: &mut SqliteConnection, bar: &WeeklyBar) -> RepoResult<()>;
}

/// [`BarRepo`] backed by the `weekly_qfq` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteBarRepo;

impl SqliteBarRepo {
    /// Create the repository; it holds no state.
    pub fn new() -> Self {
        Self
    }
}

impl BarRepo for SqliteBarRepo {
    fn distinct_trade_dates(&self, conn: &mut SqliteConnection) -> RepoResult<Vec<String>> {
        let dates = wq::weekly_qfq
            .select(wq::trade_date)
            .distinct()
            .order(wq::trade_date.asc())
            .load::<String>(conn)?;
        Ok(dates)
    }

    fn distinct_codes(&self, conn: &mut SqliteConnection) -> RepoResult<Vec<String>> {
        let codes = wq::weekly_qfq
            .select(wq::ts_code)
            .distinct()
            .order(wq::ts_code.asc())
            .load::<String>(conn)?;
        Ok(codes)
    }

    fn load_bars(&self, conn: &mut SqliteConnection, code: &str) -> RepoResult<Vec<WeeklyBar>> {
        let bars = wq::weekly_qfq
            .filter(wq::ts_code.eq(code))
            .order(wq::trade_date.asc())
            .select(WeeklyBar::as_select())
            .load(conn)?;
        Ok(bars)
    }

    fn upsert_bar(&self, conn: &mut SqliteConnection, bar: &WeeklyBar) -> RepoResult<()> {
        // REPLACE INTO: the unique key makes this the only mutation we need
        diesel::replace_into(wq::weekly_qfq)
            .values(bar)
            .execute(conn)?;
        Ok(())
    }
}
