//! Terminal rendering surface.
//!
//! Keeps a `DashboardView` and repaints the whole screen on every commit.
//! Cell styles are hex colors; they map onto truecolor escapes.

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

use crate::logging::{self, obj, v_str, Domain};
use crate::render::{RenderTarget, ACTIVE_SIGNALS_HEADERS, TOP_COINS_HEADERS};
use crate::view::{Cell, DashboardView, Style, TableBody};

pub struct TerminalTarget<W: Write = Stdout> {
    out: W,
    view: DashboardView,
    source: String,
    snapshot: Option<PathBuf>,
    snapshot_stamp: Option<String>,
}

impl TerminalTarget<Stdout> {
    pub fn stdout(source: impl Into<String>, snapshot: Option<PathBuf>) -> Self {
        Self::new(io::stdout(), source, snapshot)
    }
}

impl<W: Write> TerminalTarget<W> {
    pub fn new(out: W, source: impl Into<String>, snapshot: Option<PathBuf>) -> Self {
        Self {
            out,
            view: DashboardView::new(),
            source: source.into(),
            snapshot,
            snapshot_stamp: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        draw_view(&mut self.out, &self.view, &self.source, true)?;
        self.out.flush()
    }

    /// Writes the HTML snapshot once per new last-updated stamp.
    fn write_snapshot(&mut self) -> io::Result<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        if self.view.loading || self.view.last_updated == self.snapshot_stamp {
            return Ok(());
        }
        std::fs::write(path, self.view.to_html())?;
        self.snapshot_stamp = self.view.last_updated.clone();
        Ok(())
    }
}

impl<W: Write> RenderTarget for TerminalTarget<W> {
    fn set_loading(&mut self, visible: bool) {
        self.view.set_loading(visible);
    }

    fn top_coins(&mut self) -> &mut TableBody {
        self.view.top_coins()
    }

    fn active_signals(&mut self) -> &mut TableBody {
        self.view.active_signals()
    }

    fn set_last_updated(&mut self, text: &str) {
        self.view.set_last_updated(text);
    }

    fn set_countdown(&mut self, remaining: i64) {
        self.view.set_countdown(remaining);
    }

    fn commit(&mut self) {
        if let Err(err) = self.draw() {
            logging::warn(Domain::Render, "draw_failed", obj(&[("msg", v_str(&err.to_string()))]));
        }
        if let Err(err) = self.write_snapshot() {
            logging::warn(
                Domain::Render,
                "snapshot_failed",
                obj(&[("msg", v_str(&err.to_string()))]),
            );
        }
    }
}

/// Uncolored rendering of a view, for logs and one-shot output.
pub fn plain_text(view: &DashboardView, source: &str) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = draw_view(&mut out, view, source, false);
    String::from_utf8_lossy(&out).into_owned()
}

fn draw_view<W: Write>(out: &mut W, view: &DashboardView, source: &str, colored: bool) -> io::Result<()> {
    let status = format!(
        "Signals from {}  |  last updated: {}  |  reload in {}s{}\n\n",
        source,
        view.last_updated.as_deref().unwrap_or("-"),
        view.countdown.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
        if view.loading { "  |  loading..." } else { "" },
    );
    queue!(out, Print(status))?;
    queue!(out, Print(format!("Top coins ({})\n", view.top_coins.len())))?;
    draw_table(out, &TOP_COINS_HEADERS, &view.top_coins, colored)?;
    queue!(out, Print(format!("\nActive signals ({})\n", view.active_signals.len())))?;
    draw_table(out, &ACTIVE_SIGNALS_HEADERS, &view.active_signals, colored)
}

/// Terminal columns, not chars: emoji markers take two cells.
fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn column_widths(headers: &[&str], body: &TableBody) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in &body.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            let w = display_width(cell.text());
            match widths.get_mut(i) {
                Some(current) => *current = (*current).max(w),
                None => widths.push(w),
            }
        }
    }
    widths
}

fn draw_table<W: Write>(
    out: &mut W,
    headers: &[&str],
    body: &TableBody,
    colored: bool,
) -> io::Result<()> {
    let widths = column_widths(headers, body);
    for (i, header) in headers.iter().enumerate() {
        queue!(out, Print(pad(header, widths[i])), Print(" | "))?;
    }
    queue!(out, Print("\n"))?;
    let rule: usize = widths.iter().map(|w| w + 3).sum();
    queue!(out, Print("-".repeat(rule)), Print("\n"))?;
    if body.is_empty() {
        return queue!(out, Print("None\n"));
    }
    for row in &body.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(0);
            if colored {
                draw_cell(out, cell, width)?;
            } else {
                queue!(out, Print(pad(cell.text(), width)))?;
            }
            queue!(out, Print(" | "))?;
        }
        queue!(out, Print("\n"))?;
    }
    Ok(())
}

fn draw_cell<W: Write>(out: &mut W, cell: &Cell, width: usize) -> io::Result<()> {
    let style = match &cell.badge {
        Some(badge) if !badge.style.is_empty() => &badge.style,
        _ => &cell.td.style,
    };
    let text = pad(cell.text(), width);
    if style.is_empty() {
        return queue!(out, Print(text));
    }
    apply_style(out, style)?;
    queue!(out, Print(text), ResetColor)
}

fn apply_style<W: Write>(out: &mut W, style: &Style) -> io::Result<()> {
    if let Some(bg) = style.background.as_deref().and_then(hex_color) {
        queue!(out, SetBackgroundColor(bg))?;
    }
    if let Some(fg) = style.color.as_deref().and_then(hex_color) {
        queue!(out, SetForegroundColor(fg))?;
    }
    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// `#rrggbb` to a truecolor value.
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}
