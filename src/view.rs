//! In-memory rendering surface.
//!
//! Mirrors the handful of page elements the dashboard writes to: a loading
//! indicator, two table bodies, a last-updated label and a countdown label.
//! Cells carry a class list and an inline style so the styling passes can be
//! checked without a browser or a terminal.

use std::fmt::Write as _;

/// Class carried by status badges inside active-signal rows.
pub const STATUS_BADGE_CLASS: &str = "status-badge";
/// Class marking leveraged-signal cells and badges.
pub const FUTURES_CLASS: &str = "futures";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub background: Option<String>,
    pub color: Option<String>,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.color.is_none()
    }

    fn to_css(&self) -> String {
        let mut css = String::new();
        if let Some(bg) = &self.background {
            let _ = write!(css, "background-color: {};", bg);
        }
        if let Some(fg) = &self.color {
            if !css.is_empty() {
                css.push(' ');
            }
            let _ = write!(css, "color: {};", fg);
        }
        css
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub text: String,
    pub classes: Vec<String>,
    pub style: Style,
}

impl Element {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Adding a class that is already present is a no-op.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn set_colors(&mut self, background: &str, color: &str) {
        self.style.background = Some(background.to_string());
        self.style.color = Some(color.to_string());
    }

    fn write_open(&self, tag: &str, out: &mut String) {
        out.push('<');
        out.push_str(tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_html(&self.classes.join(" ")));
        }
        if !self.style.is_empty() {
            let _ = write!(out, " style=\"{}\"", escape_html(&self.style.to_css()));
        }
        out.push('>');
    }

    fn write_html(&self, tag: &str, out: &mut String) {
        self.write_open(tag, out);
        out.push_str(&escape_html(&self.text));
        let _ = write!(out, "</{}>", tag);
    }
}

/// A table cell. Status cells wrap their text in a badge element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub td: Element,
    pub badge: Option<Element>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            td: Element::new(text),
            badge: None,
        }
    }

    pub fn badge(text: impl Into<String>, classes: &[&str]) -> Self {
        let mut badge = Element::new(text);
        for class in classes {
            badge.add_class(class);
        }
        Self {
            td: Element::default(),
            badge: Some(badge),
        }
    }

    /// Visible text, including text nested inside a badge.
    pub fn text(&self) -> &str {
        match &self.badge {
            Some(badge) => &badge.text,
            None => &self.td.text,
        }
    }

    fn write_html(&self, out: &mut String) {
        match &self.badge {
            Some(badge) => {
                self.td.write_open("td", out);
                badge.write_html("span", out);
                out.push_str("</td>");
            }
            None => self.td.write_html("td", out),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// 1-based, like `td:nth-child(n)`.
    pub fn cell_mut(&mut self, column: usize) -> Option<&mut Cell> {
        column.checked_sub(1).and_then(|i| self.cells.get_mut(i))
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        column.checked_sub(1).and_then(|i| self.cells.get(i))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBody {
    pub rows: Vec<Row>,
}

impl TableBody {
    /// Drops every existing row and installs the new ones in order.
    pub fn replace(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_mut(&mut self, column: usize) -> impl Iterator<Item = &mut Cell> + '_ {
        self.rows.iter_mut().filter_map(move |r| r.cell_mut(column))
    }

    pub fn badges_mut(&mut self, class: &str) -> impl Iterator<Item = &mut Element> + '_ {
        let class = class.to_string();
        self.rows
            .iter_mut()
            .flat_map(|r| r.cells.iter_mut())
            .filter_map(|c| c.badge.as_mut())
            .filter(move |b| b.has_class(&class))
    }

    fn write_html(&self, id: &str, out: &mut String) {
        let _ = write!(out, "<tbody id=\"{}\">", id);
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in &row.cells {
                cell.write_html(out);
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody>");
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    pub loading: bool,
    pub top_coins: TableBody,
    pub active_signals: TableBody,
    pub last_updated: Option<String>,
    pub countdown: Option<i64>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let display = if self.loading { "block" } else { "none" };
        let _ = writeln!(out, "<div id=\"loading\" style=\"display: {};\"></div>", display);
        out.push_str("<table>");
        self.top_coins.write_html("top-coins-table", &mut out);
        out.push_str("</table>\n<table>");
        self.active_signals.write_html("active-signals-table", &mut out);
        out.push_str("</table>\n");
        let _ = writeln!(
            out,
            "<span id=\"last-updated\">{}</span>",
            escape_html(self.last_updated.as_deref().unwrap_or(""))
        );
        let _ = writeln!(
            out,
            "<span id=\"countdown\">{}</span>",
            self.countdown.map(|c| c.to_string()).unwrap_or_default()
        );
        out
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_class_is_idempotent() {
        let mut el = Element::new("x");
        el.add_class(FUTURES_CLASS);
        el.add_class(FUTURES_CLASS);
        assert_eq!(el.classes, vec!["futures".to_string()]);
    }

    #[test]
    fn nth_child_is_one_based() {
        let mut row = Row::new(vec![Cell::plain("a"), Cell::plain("b"), Cell::plain("c")]);
        assert_eq!(row.cell(1).map(Cell::text), Some("a"));
        assert_eq!(row.cell(3).map(Cell::text), Some("c"));
        assert!(row.cell(0).is_none());
        assert!(row.cell_mut(4).is_none());
    }

    #[test]
    fn badge_text_is_cell_text() {
        let cell = Cell::badge("✅ Đạt TP", &[STATUS_BADGE_CLASS]);
        assert_eq!(cell.text(), "✅ Đạt TP");
        assert_eq!(cell.td.text, "");
    }

    #[test]
    fn html_escapes_and_renders_styles() {
        let mut styled = Cell::plain("🟢🚀 <LONG>");
        styled.td.set_colors("#c3e6cb", "#155724");
        styled.td.add_class(FUTURES_CLASS);
        let mut badge = Cell::badge("⏳ wait", &[STATUS_BADGE_CLASS, FUTURES_CLASS]);
        if let Some(b) = badge.badge.as_mut() {
            b.set_colors("#fff3cd", "#856404");
        }

        let mut view = DashboardView::new();
        view.active_signals.replace(vec![Row::new(vec![styled, badge])]);
        view.last_updated = Some("A & B".to_string());
        view.countdown = Some(42);
        let html = view.to_html();

        assert!(html.contains("<div id=\"loading\" style=\"display: none;\"></div>"));
        assert!(html.contains(
            "<td class=\"futures\" style=\"background-color: #c3e6cb; color: #155724;\">🟢🚀 &lt;LONG&gt;</td>"
        ));
        assert!(html.contains(
            "<td><span class=\"status-badge futures\" style=\"background-color: #fff3cd; color: #856404;\">⏳ wait</span></td>"
        ));
        assert!(html.contains("<tbody id=\"top-coins-table\"></tbody>"));
        assert!(html.contains("<span id=\"last-updated\">A &amp; B</span>"));
        assert!(html.contains("<span id=\"countdown\">42</span>"));
    }
}
