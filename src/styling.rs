//! Cosmetic coloring passes.
//!
//! Both passes look only at visible text, so running them again over rows
//! they already styled changes nothing.

use crate::render::{RenderTarget, ACTIVE_SIGNALS_SIGNAL_COLUMN, TOP_COINS_SIGNAL_COLUMN};
use crate::view::{Element, FUTURES_CLASS, STATUS_BADGE_CLASS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    Success,
    Failure,
    Pending,
    Warning,
}

impl BadgeKind {
    /// Checked in this order; first match wins.
    const MARKERS: [(&'static str, BadgeKind); 4] = [
        ("✅", BadgeKind::Success),
        ("❌", BadgeKind::Failure),
        ("⏳", BadgeKind::Pending),
        ("⚠️", BadgeKind::Warning),
    ];

    pub fn classify(text: &str) -> Option<Self> {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| text.contains(marker))
            .map(|(_, kind)| *kind)
    }

    pub fn palette(&self) -> Palette {
        match self {
            BadgeKind::Success => Palette { background: "#d4edda", color: "#155724" },
            BadgeKind::Failure => Palette { background: "#f8d7da", color: "#721c24" },
            BadgeKind::Pending => Palette { background: "#fff3cd", color: "#856404" },
            BadgeKind::Warning => Palette { background: "#ffeeba", color: "#856404" },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    FuturesLong,
    FuturesShort,
    Long,
    Short,
}

impl SignalKind {
    /// Checked in this order; the futures variants must precede the plain ones.
    const MARKERS: [(&'static str, SignalKind); 4] = [
        ("🟢🚀", SignalKind::FuturesLong),
        ("🔻🚀", SignalKind::FuturesShort),
        ("🟢⬆️", SignalKind::Long),
        ("🔻", SignalKind::Short),
    ];

    pub fn classify(text: &str) -> Option<Self> {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| text.contains(marker))
            .map(|(_, kind)| *kind)
    }

    pub fn palette(&self) -> Palette {
        match self {
            SignalKind::FuturesLong => Palette { background: "#c3e6cb", color: "#155724" },
            SignalKind::FuturesShort => Palette { background: "#f5c6cb", color: "#721c24" },
            SignalKind::Long => Palette { background: "#d4edda", color: "#155724" },
            SignalKind::Short => Palette { background: "#f8d7da", color: "#721c24" },
        }
    }

    pub fn is_futures(&self) -> bool {
        matches!(self, SignalKind::FuturesLong | SignalKind::FuturesShort)
    }
}

fn paint(element: &mut Element, palette: Palette) {
    element.set_colors(palette.background, palette.color);
}

/// Colors every status badge by its emoji marker. Returns how many were styled.
pub fn apply_badge_styling<T: RenderTarget + ?Sized>(target: &mut T) -> usize {
    let mut styled = style_badges(target.top_coins().badges_mut(STATUS_BADGE_CLASS));
    styled += style_badges(target.active_signals().badges_mut(STATUS_BADGE_CLASS));
    styled
}

fn style_badges<'a>(badges: impl Iterator<Item = &'a mut Element>) -> usize {
    let mut styled = 0;
    for badge in badges {
        if let Some(kind) = BadgeKind::classify(&badge.text) {
            paint(badge, kind.palette());
            styled += 1;
        }
    }
    styled
}

/// Colors the signal column of both tables. Returns how many cells were styled.
pub fn apply_signal_badge_styling<T: RenderTarget + ?Sized>(target: &mut T) -> usize {
    let mut styled = 0;
    for cell in target.active_signals().column_mut(ACTIVE_SIGNALS_SIGNAL_COLUMN) {
        styled += style_signal_cell(&mut cell.td) as usize;
    }
    for cell in target.top_coins().column_mut(TOP_COINS_SIGNAL_COLUMN) {
        styled += style_signal_cell(&mut cell.td) as usize;
    }
    styled
}

fn style_signal_cell(td: &mut Element) -> bool {
    let Some(kind) = SignalKind::classify(&td.text) else {
        return false;
    };
    paint(td, kind.palette());
    if kind.is_futures() {
        td.add_class(FUTURES_CLASS);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Cell, DashboardView, Row};

    fn status_row(status: &str) -> Row {
        let mut cells: Vec<Cell> = (0..7).map(|_| Cell::plain("x")).collect();
        cells.push(Cell::badge(status, &[STATUS_BADGE_CLASS]));
        Row::new(cells)
    }

    fn signal_row(signal: &str) -> Row {
        Row::new(vec![Cell::plain("BTCUSDT"), Cell::plain("1h"), Cell::plain(signal)])
    }

    fn badge_style(view: &DashboardView, row: usize) -> (Option<&str>, Option<&str>) {
        let badge = view.active_signals.rows[row].cells[7].badge.as_ref().unwrap();
        (badge.style.background.as_deref(), badge.style.color.as_deref())
    }

    #[test]
    fn badge_colors_by_marker() {
        let mut view = DashboardView::new();
        view.active_signals.replace(vec![
            status_row("✅ Đạt TP"),
            status_row("❌ Dừng lỗ"),
            status_row("⏳ Đang theo dõi (+0.12%)"),
            status_row("⚠️ Lỗi cập nhật"),
            status_row("Đang theo dõi"),
        ]);

        assert_eq!(apply_badge_styling(&mut view), 4);
        assert_eq!(badge_style(&view, 0), (Some("#d4edda"), Some("#155724")));
        assert_eq!(badge_style(&view, 1), (Some("#f8d7da"), Some("#721c24")));
        assert_eq!(badge_style(&view, 2), (Some("#fff3cd"), Some("#856404")));
        assert_eq!(badge_style(&view, 3), (Some("#ffeeba"), Some("#856404")));
        assert_eq!(badge_style(&view, 4), (None, None));
    }

    #[test]
    fn badge_first_match_wins() {
        assert_eq!(BadgeKind::classify("⚠️ then ✅"), Some(BadgeKind::Success));
        assert_eq!(BadgeKind::classify("⏳❌"), Some(BadgeKind::Failure));
        assert_eq!(BadgeKind::classify("plain"), None);
    }

    #[test]
    fn signal_colors_and_futures_class() {
        let mut view = DashboardView::new();
        view.active_signals.replace(vec![
            signal_row("🟢🚀 FUTURES LONG"),
            signal_row("🔻🚀 FUTURES SHORT"),
            signal_row("🟢⬆️ LONG"),
            signal_row("🔻 SHORT"),
            signal_row("⚠️ No signal"),
        ]);

        assert_eq!(apply_signal_badge_styling(&mut view), 4);
        let td = |i: usize| &view.active_signals.rows[i].cells[2].td;

        assert_eq!(td(0).style.background.as_deref(), Some("#c3e6cb"));
        assert_eq!(td(0).style.color.as_deref(), Some("#155724"));
        assert!(td(0).has_class(FUTURES_CLASS));

        assert_eq!(td(1).style.background.as_deref(), Some("#f5c6cb"));
        assert_eq!(td(1).style.color.as_deref(), Some("#721c24"));
        assert!(td(1).has_class(FUTURES_CLASS));

        assert_eq!(td(2).style.background.as_deref(), Some("#d4edda"));
        assert!(!td(2).has_class(FUTURES_CLASS));

        assert_eq!(td(3).style.background.as_deref(), Some("#f8d7da"));
        assert!(!td(3).has_class(FUTURES_CLASS));

        assert!(td(4).style.is_empty());
    }

    #[test]
    fn signal_pass_reads_the_right_columns() {
        let mut view = DashboardView::new();
        // Top-coins signal lives in column 4; column 3 holds the price.
        view.top_coins.replace(vec![Row::new(vec![
            Cell::plain("ETHUSDT"),
            Cell::plain("4h"),
            Cell::plain("🔻 decoy"),
            Cell::plain("🟢🚀 FUTURES LONG"),
        ])]);
        apply_signal_badge_styling(&mut view);
        let row = &view.top_coins.rows[0];
        assert!(row.cells[2].td.style.is_empty());
        assert!(row.cells[3].td.has_class(FUTURES_CLASS));
    }

    #[test]
    fn passes_are_idempotent() {
        let mut view = DashboardView::new();
        view.active_signals.replace(vec![signal_row("🟢🚀 FUTURES LONG")]);
        view.active_signals.rows[0].cells.extend((0..4).map(|_| Cell::plain("x")));
        view.active_signals.rows[0].cells.push(Cell::badge("✅ Đạt TP", &[STATUS_BADGE_CLASS]));

        apply_badge_styling(&mut view);
        apply_signal_badge_styling(&mut view);
        let once = view.clone();
        apply_badge_styling(&mut view);
        apply_signal_badge_styling(&mut view);
        apply_signal_badge_styling(&mut view);
        assert_eq!(view, once);
        assert_eq!(view.active_signals.rows[0].cells[2].td.classes.len(), 1);
    }
}
