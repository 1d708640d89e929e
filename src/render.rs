//! Output sinks and row builders.

use crate::format::{format_price, format_text};
use crate::payload::{ActiveSignalEntry, SignalsPayload, TopCoinEntry};
use crate::view::{Cell, DashboardView, Row, TableBody, FUTURES_CLASS, STATUS_BADGE_CLASS};

pub const TOP_COINS_HEADERS: [&str; 7] = [
    "Symbol", "Timeframe", "Price", "Signal", "Entry", "TP", "SL",
];

pub const ACTIVE_SIGNALS_HEADERS: [&str; 10] = [
    "Symbol", "Timeframe", "Signal", "Entry", "TP", "SL", "Price", "Status", "Time", "Duration",
];

/// 1-based signal column of the top-coins table.
pub const TOP_COINS_SIGNAL_COLUMN: usize = 4;
/// 1-based signal column of the active-signals table.
pub const ACTIVE_SIGNALS_SIGNAL_COLUMN: usize = 3;

/// The places a refresh writes to.
///
/// Table bodies are handed out mutably so the styling passes can restyle
/// cells after rows are installed. `commit` is called once a batch of
/// mutations is complete; surfaces that draw somewhere do it there.
pub trait RenderTarget {
    fn set_loading(&mut self, visible: bool);
    fn top_coins(&mut self) -> &mut TableBody;
    fn active_signals(&mut self) -> &mut TableBody;
    fn set_last_updated(&mut self, text: &str);
    fn set_countdown(&mut self, remaining: i64);
    fn commit(&mut self) {}
}

impl RenderTarget for DashboardView {
    fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn top_coins(&mut self) -> &mut TableBody {
        &mut self.top_coins
    }

    fn active_signals(&mut self) -> &mut TableBody {
        &mut self.active_signals
    }

    fn set_last_updated(&mut self, text: &str) {
        self.last_updated = Some(text.to_string());
    }

    fn set_countdown(&mut self, remaining: i64) {
        self.countdown = Some(remaining);
    }
}

pub fn top_coin_row(coin: &TopCoinEntry) -> Row {
    Row::new(vec![
        Cell::plain(format_text(&coin.symbol)),
        Cell::plain(format_text(&coin.timeframe)),
        Cell::plain(format_price(coin.current_price)),
        Cell::plain(format_text(&coin.signal)),
        Cell::plain(format_price(coin.entry)),
        Cell::plain(format_price(coin.tp)),
        Cell::plain(format_price(coin.sl)),
    ])
}

pub fn active_signal_row(signal: &ActiveSignalEntry) -> Row {
    let status = if signal.is_futures() {
        Cell::badge(format_text(&signal.status), &[STATUS_BADGE_CLASS, FUTURES_CLASS])
    } else {
        Cell::badge(format_text(&signal.status), &[STATUS_BADGE_CLASS])
    };
    Row::new(vec![
        Cell::plain(format_text(&signal.symbol)),
        Cell::plain(format_text(&signal.timeframe)),
        Cell::plain(format_text(&signal.signal)),
        Cell::plain(format_price(signal.entry)),
        Cell::plain(format_price(signal.tp)),
        Cell::plain(format_price(signal.sl)),
        Cell::plain(format_price(signal.current_price)),
        status,
        Cell::plain(format_text(&signal.time)),
        Cell::plain(format_text(&signal.duration)),
    ])
}

/// Rows for both tables, in payload order.
pub struct RenderedRows {
    pub top_coins: Vec<Row>,
    pub active_signals: Vec<Row>,
}

pub fn build_rows(payload: &SignalsPayload) -> RenderedRows {
    RenderedRows {
        top_coins: payload.top_coins.iter().map(top_coin_row).collect(),
        active_signals: payload.active_signals.iter().map(active_signal_row).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(row: &Row) -> Vec<&str> {
        row.cells.iter().map(Cell::text).collect()
    }

    #[test]
    fn top_coin_row_layout() {
        let coin = TopCoinEntry {
            symbol: "BTCUSDT".into(),
            timeframe: "1h".into(),
            current_price: Some(64000.5),
            signal: "🟢⬆️ LONG".into(),
            entry: Some(63900.0),
            tp: None,
            sl: Some(0.0),
        };
        let row = top_coin_row(&coin);
        assert_eq!(row.cells.len(), TOP_COINS_HEADERS.len());
        assert_eq!(
            texts(&row),
            vec!["BTCUSDT", "1h", "$64000.5000", "🟢⬆️ LONG", "$63900.0000", "N/A", "N/A"]
        );
        assert_eq!(row.cell(TOP_COINS_SIGNAL_COLUMN).map(Cell::text), Some("🟢⬆️ LONG"));
    }

    #[test]
    fn active_signal_row_layout() {
        let signal = ActiveSignalEntry {
            symbol: "SOLUSDT".into(),
            timeframe: "15m".into(),
            signal: "🔻🚀 FUTURES SHORT".into(),
            entry: Some(142.1),
            tp: Some(138.0),
            sl: Some(145.0),
            current_price: None,
            status: "⏳ Đang theo dõi".into(),
            time: "2024-05-01 10:00:00".into(),
            duration: String::new(),
        };
        let row = active_signal_row(&signal);
        assert_eq!(row.cells.len(), ACTIVE_SIGNALS_HEADERS.len());
        assert_eq!(
            texts(&row),
            vec![
                "SOLUSDT",
                "15m",
                "🔻🚀 FUTURES SHORT",
                "$142.1000",
                "$138.0000",
                "$145.0000",
                "N/A",
                "⏳ Đang theo dõi",
                "2024-05-01 10:00:00",
                "N/A",
            ]
        );
        let badge = row.cell(8).and_then(|c| c.badge.as_ref()).unwrap();
        assert!(badge.has_class(STATUS_BADGE_CLASS));
        assert!(badge.has_class(FUTURES_CLASS));
    }

    #[test]
    fn spot_status_badge_has_no_futures_class() {
        let signal = ActiveSignalEntry {
            signal: "🟢⬆️ LONG".into(),
            ..Default::default()
        };
        let row = active_signal_row(&signal);
        let badge = row.cell(8).and_then(|c| c.badge.as_ref()).unwrap();
        assert_eq!(badge.classes, vec![STATUS_BADGE_CLASS.to_string()]);
        assert_eq!(badge.text, "N/A");
    }

    #[test]
    fn falsy_text_fields_render_not_available() {
        let payload = SignalsPayload::from_json(
            r#"{"top_coins":[{"symbol":0,"timeframe":false,"signal":"🔻 SHORT"}],
                "active_signals":[{"symbol":"BTCUSDT","status":false,"duration":0}]}"#,
        )
        .unwrap();
        let rows = build_rows(&payload);
        let top = texts(&rows.top_coins[0]);
        assert_eq!(top[0], "N/A");
        assert_eq!(top[1], "N/A");
        assert_eq!(top[3], "🔻 SHORT");
        let active = texts(&rows.active_signals[0]);
        assert_eq!(active[0], "BTCUSDT");
        assert_eq!(active[7], "N/A");
        assert_eq!(active[9], "N/A");
    }

    #[test]
    fn rows_keep_payload_order() {
        let payload = SignalsPayload {
            top_coins: ["C", "A", "B"]
                .iter()
                .map(|s| TopCoinEntry {
                    symbol: s.to_string(),
                    ..Default::default()
                })
                .collect(),
            active_signals: Vec::new(),
        };
        let rows = build_rows(&payload);
        let symbols: Vec<&str> = rows.top_coins.iter().map(|r| r.cells[0].text()).collect();
        assert_eq!(symbols, vec!["C", "A", "B"]);
        assert!(rows.active_signals.is_empty());
    }
}
