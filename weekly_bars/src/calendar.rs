//! Master trading calendar.
//!
//! The calendar is the ordered, deduplicated set of every `trade_date` seen in
//! `weekly_qfq`, across all instruments, plus a date → position lookup. It is
//! rebuilt on every fill run and handed to each instrument by reference; nothing
//! mutates it after [`CalendarIndex::load`] returns.

use std::collections::HashMap;

use diesel::SqliteConnection;

use crate::suspension::repo::BarRepo;

/// Ordered trade dates with zero-based position lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarIndex {
    dates: Vec<String>,
    positions: HashMap<String, usize>,
}

impl CalendarIndex {
    /// Build from any collection of dates; sorts and dedupes.
    pub fn from_dates<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dates: Vec<String> = dates.into_iter().map(Into::into).collect();
        dates.sort_unstable();
        dates.dedup();

        let positions = dates
            .iter()
            .enumerate()
            .map(|(i, d)| (d.clone(), i))
            .collect();

        Self { dates, positions }
    }

    /// Build from the distinct trade dates currently in the store.
    pub fn load(repo: &impl BarRepo, conn: &mut SqliteConnection) -> anyhow::Result<Self> {
        Ok(Self::from_dates(repo.distinct_trade_dates(conn)?))
    }

    /// Position of `date`, or `None` if it was never observed.
    pub fn position(&self, date: &str) -> Option<usize> {
        self.positions.get(date).copied()
    }

    /// Date at `pos`.
    pub fn date_at(&self, pos: usize) -> Option<&str> {
        self.dates.get(pos).map(String::as_str)
    }

    /// All dates, ascending.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Number of distinct dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when no dates were observed; callers treat this as nothing to do.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
