//! Flat-bar shaping for suspension rows.
//!
//! A suspended week has no trades, so its bar is flat at the last known close:
//! every price equals that close and every flow field is zero.

use crate::models::WeeklyBar;

/// Return a flattened copy of `bar` tagged as a suspension fill.
///
/// - non-null `close` is copied into `open`, `high`, `low`, `pre_close`
/// - non-null `close_qfq` is copied into all four `_qfq` prices
/// - non-null `close_hfq` is copied into all four `_hfq` prices
/// - `vol`, `amount`, `change`, `pct_chg` become 0
///
/// Null closes leave their group untouched. The input is not modified and
/// applying the function twice gives the same row as applying it once.
pub fn normalize_suspension(bar: &WeeklyBar) -> WeeklyBar {
    let mut out = bar.clone();

    if let Some(close) = bar.close {
        out.open = Some(close);
        out.high = Some(close);
        out.low = Some(close);
        out.pre_close = Some(close);
    }

    if let Some(close) = bar.close_qfq {
        out.open_qfq = Some(close);
        out.high_qfq = Some(close);
        out.low_qfq = Some(close);
        out.close_qfq = Some(close);
    }

    if let Some(close) = bar.close_hfq {
        out.open_hfq = Some(close);
        out.high_hfq = Some(close);
        out.low_hfq = Some(close);
        out.close_hfq = Some(close);
    }

    out.vol = Some(0.0);
    out.amount = Some(0.0);
    out.change = Some(0.0);
    out.pct_chg = Some(0.0);
    out.is_suspension_fill = true;
    out
}

/// Clone `last` onto `date` and flatten it.
///
/// `end_date` follows the new date only when the source row carried one.
pub fn synthesize_from(last: &WeeklyBar, date: &str) -> WeeklyBar {
    let mut next = last.clone();
    next.trade_date = date.to_string();
    if next.end_date.is_some() {
        next.end_date = Some(date.to_string());
    }
    normalize_suspension(&next)
}

/// Re-derive an already filled row from the current chain head `last`.
///
/// The row is rebuilt as a fresh forward-fill of `last` onto the existing
/// `trade_date`, so every carried price follows a revised upstream row. The
/// existing `end_date` and `freq` are kept. Without a chain head the row is
/// only re-flattened.
pub fn renormalize(existing: &WeeklyBar, last: Option<&WeeklyBar>) -> WeeklyBar {
    let Some(last) = last else {
        return normalize_suspension(existing);
    };
    let mut rebuilt = synthesize_from(last, &existing.trade_date);
    rebuilt.end_date = existing.end_date.clone();
    rebuilt.freq = existing.freq.clone();
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn real_bar() -> WeeklyBar {
        WeeklyBar {
            end_date: Some("20240105".into()),
            freq: Some("week".into()),
            open: Some(10.0),
            high: Some(11.0),
            low: Some(9.5),
            close: Some(10.5),
            pre_close: Some(9.8),
            open_qfq: Some(5.0),
            high_qfq: Some(5.5),
            low_qfq: Some(4.75),
            close_qfq: Some(5.25),
            open_hfq: Some(20.0),
            high_hfq: Some(22.0),
            low_hfq: Some(19.0),
            close_hfq: Some(21.0),
            vol: Some(123_456.0),
            amount: Some(1_296_288.0),
            change: Some(0.7),
            pct_chg: Some(7.14),
            ..WeeklyBar::empty("600000.SH", "20240105")
        }
    }

    #[test]
    fn flattens_every_price_group() {
        let src = real_bar();
        let out = normalize_suspension(&src);

        assert_eq!(
            (out.open, out.high, out.low, out.close, out.pre_close),
            (Some(10.5), Some(10.5), Some(10.5), Some(10.5), Some(10.5))
        );
        assert_eq!(
            (out.open_qfq, out.high_qfq, out.low_qfq, out.close_qfq),
            (Some(5.25), Some(5.25), Some(5.25), Some(5.25))
        );
        assert_eq!(
            (out.open_hfq, out.high_hfq, out.low_hfq, out.close_hfq),
            (Some(21.0), Some(21.0), Some(21.0), Some(21.0))
        );
        assert_eq!(
            (out.vol, out.amount, out.change, out.pct_chg),
            (Some(0.0), Some(0.0), Some(0.0), Some(0.0))
        );
        assert!(out.is_suspension_fill);
        assert_eq!(out.freq.as_deref(), Some("week"));

        // input untouched
        assert_eq!(src, real_bar());
    }

    #[test]
    fn null_close_leaves_group_alone() {
        let src = WeeklyBar {
            open: Some(1.0),
            high: Some(2.0),
            open_qfq: Some(3.0),
            vol: None,
            ..WeeklyBar::empty("000001.SZ", "20240105")
        };
        let out = normalize_suspension(&src);
        assert_eq!(out.open, Some(1.0));
        assert_eq!(out.high, Some(2.0));
        assert_eq!(out.low, None);
        assert_eq!(out.pre_close, None);
        assert_eq!(out.open_qfq, Some(3.0));
        assert_eq!(out.vol, Some(0.0));
        assert!(out.is_suspension_fill);
    }

    #[test]
    fn synthesized_row_moves_end_date_only_when_present() {
        let with_end = synthesize_from(&real_bar(), "20240112");
        assert_eq!(with_end.trade_date, "20240112");
        assert_eq!(with_end.end_date.as_deref(), Some("20240112"));
        assert_eq!(with_end.close, Some(10.5));

        let without_end = synthesize_from(
            &WeeklyBar {
                end_date: None,
                ..real_bar()
            },
            "20240112",
        );
        assert_eq!(without_end.end_date, None);
    }

    #[test]
    fn renormalize_rebases_on_chain_head() {
        let stale = synthesize_from(&real_bar(), "20240112");
        let head = WeeklyBar {
            close: Some(12.0),
            close_qfq: Some(6.0),
            close_hfq: None,
            ..real_bar()
        };
        let out = renormalize(&stale, Some(&head));
        assert_eq!(out.trade_date, "20240112");
        assert_eq!(out.open, Some(12.0));
        assert_eq!(out.pre_close, Some(12.0));
        assert_eq!(out.close_qfq, Some(6.0));
        assert_eq!(out.close_hfq, None);

        assert_eq!(renormalize(&stale, None), stale);
    }

    #[test]
    fn renormalize_with_null_head_close_matches_fresh_fill() {
        let stale = synthesize_from(&real_bar(), "20240112");
        let head = WeeklyBar {
            open: Some(19.5),
            close: None,
            close_qfq: None,
            close_hfq: None,
            ..real_bar()
        };
        let out = renormalize(&stale, Some(&head));
        assert_eq!(out, synthesize_from(&head, "20240112"));
        assert_eq!(out.open, Some(19.5));
        assert_eq!(out.close, None);
        assert_eq!(out.open_qfq, Some(5.0));
    }

    fn opt_price() -> impl Strategy<Value = Option<f64>> {
        proptest::option::of(0.01f64..10_000.0)
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(
            close in opt_price(),
            close_qfq in opt_price(),
            close_hfq in opt_price(),
            open in opt_price(),
            vol in opt_price(),
        ) {
            let bar = WeeklyBar {
                open,
                close,
                close_qfq,
                close_hfq,
                vol,
                ..WeeklyBar::empty("600000.SH", "20240105")
            };
            let once = normalize_suspension(&bar);
            let twice = normalize_suspension(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
