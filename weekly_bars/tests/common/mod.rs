#![allow(dead_code)]

use diesel::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use weekly_bars::db::{connection, migrate};
use weekly_bars::models::WeeklyBar;
use weekly_bars::schema::weekly_qfq::dsl as wq;

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

/// A real bar trading around `close`, with non-zero flow fields.
pub fn real(code: &str, date: &str, close: f64) -> WeeklyBar {
    WeeklyBar {
        end_date: Some(date.to_string()),
        freq: Some("week".to_string()),
        open: Some(close - 0.5),
        high: Some(close + 1.0),
        low: Some(close - 1.0),
        close: Some(close),
        pre_close: Some(close - 0.25),
        open_qfq: Some(close / 2.0 - 0.25),
        high_qfq: Some(close / 2.0 + 0.5),
        low_qfq: Some(close / 2.0 - 0.5),
        close_qfq: Some(close / 2.0),
        open_hfq: Some(close * 2.0 - 1.0),
        high_hfq: Some(close * 2.0 + 2.0),
        low_hfq: Some(close * 2.0 - 2.0),
        close_hfq: Some(close * 2.0),
        vol: Some(1000.0),
        amount: Some(close * 1000.0),
        change: Some(0.25),
        pct_chg: Some(2.5),
        ..WeeklyBar::empty(code, date)
    }
}

pub fn insert(conn: &mut SqliteConnection, bars: &[WeeklyBar]) {
    for bar in bars {
        diesel::replace_into(wq::weekly_qfq)
            .values(bar)
            .execute(conn)
            .expect("insert bar");
    }
}

pub fn bars_for(conn: &mut SqliteConnection, code: &str) -> Vec<WeeklyBar> {
    wq::weekly_qfq
        .filter(wq::ts_code.eq(code))
        .order(wq::trade_date.asc())
        .select(WeeklyBar::as_select())
        .load(conn)
        .expect("load bars")
}

pub fn all_bars(conn: &mut SqliteConnection) -> Vec<WeeklyBar> {
    wq::weekly_qfq
        .order((wq::ts_code.asc(), wq::trade_date.asc()))
        .select(WeeklyBar::as_select())
        .load(conn)
        .expect("load bars")
}

pub fn count(conn: &mut SqliteConnection) -> i64 {
    wq::weekly_qfq.count().get_result(conn).expect("count")
}

/// Shared in-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = LogBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buf.0.lock().expect("log buffer")).into_owned();
    (out, logs)
}
