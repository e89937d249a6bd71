mod common;
use common::setup_db;

use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error};
use diesel::sql_query;
use diesel::sql_types::{Integer, Text};

#[derive(QueryableByName)]
struct TblCnt {
    #[diesel(sql_type = Integer)]
    cnt: i32,
}
#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

#[test]
fn migrations_create_tables_and_pragmas_are_set() {
    let (_db, mut conn) = setup_db();

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(&mut conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");
    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(&mut conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);

    let tbls: TblCnt = sql_query(
        "SELECT COUNT(*) AS cnt
            FROM sqlite_master
            WHERE type='table'
            AND name IN ('weekly_qfq','stock_info');",
    )
    .get_result(&mut conn)
    .unwrap();
    assert_eq!(tbls.cnt, 2);
}

#[test]
fn bar_key_is_unique_and_flag_defaults_to_real() {
    let (_db, mut conn) = setup_db();

    sql_query("INSERT INTO weekly_qfq (ts_code, trade_date, close) VALUES ('600000.SH','20240105',7.3);")
        .execute(&mut conn)
        .unwrap();

    let err = sql_query(
        "INSERT INTO weekly_qfq (ts_code, trade_date, close) VALUES ('600000.SH','20240105',8.0);",
    )
    .execute(&mut conn)
    .unwrap_err();
    assert!(matches!(
        err,
        Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    ));

    let fills: TblCnt =
        sql_query("SELECT COUNT(*) AS cnt FROM weekly_qfq WHERE is_suspension_fill = 0;")
            .get_result(&mut conn)
            .unwrap();
    assert_eq!(fills.cnt, 1);
}
