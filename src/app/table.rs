use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::core::Candle;

/// One display row of the read-only table view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
}

impl From<&Candle> for TableRow {
    fn from(candle: &Candle) -> Self {
        Self {
            date: candle.time.to_string(),
            open: candle.open.normalize().to_string(),
            high: candle.high.normalize().to_string(),
            low: candle.low.normalize().to_string(),
            close: candle.close.normalize().to_string(),
        }
    }
}

impl TableRow {
    fn cells(&self) -> [&str; 5] {
        [&self.date, &self.open, &self.high, &self.low, &self.close]
    }
}

const HEADER: [&str; 5] = ["Date", "Open", "High", "Low", "Close"];

/// Renders rows as a column-aligned text table with a header line.
#[must_use]
pub fn render_table(rows: &[TableRow]) -> String {
    let mut widths = HEADER.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_line(&mut out, HEADER, widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in rows {
        push_line(&mut out, row.cells(), widths);
    }
    out
}

fn push_line(out: &mut String, cells: [&str; 5], widths: [usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (cell, width))| {
            // Date left aligned, prices right aligned.
            if column == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
