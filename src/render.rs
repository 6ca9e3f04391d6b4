//! Columnar text rendering
//!
//! Two passes: every cell is escaped and measured first, then lines are
//! emitted padded to the global column widths.
//!
//! ```text
//! [2x2] news
//!    Date     Title
//! 0: Jan-02   Stocks Rally
//! 1: Jan-03   Quiet
//!    <string> <string>
//! ```

use std::fmt;

use crate::table::Table;

/// Render a table; empty when it has no columns or carries an error
pub fn render(table: &Table) -> String {
    let (row_count, col_count) = table.shape();
    if col_count == 0 || table.error().is_some() {
        return String::new();
    }

    // Pass 1: escape every cell and measure
    let mut lines: Vec<(String, Vec<String>)> = Vec::with_capacity(row_count + 2);
    lines.push((String::new(), table.headers().iter().map(|h| escape(h)).collect()));
    for (i, row) in table.rows().iter().enumerate() {
        lines.push((
            format!("{}:", i),
            row.iter().map(|c| escape(&c.to_string())).collect(),
        ));
    }
    lines.push((
        String::new(),
        (0..col_count)
            .map(|c| format!("<{}>", table.type_label(c)))
            .collect(),
    ));

    let label_width = lines.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let mut widths = vec![0usize; col_count];
    for (_, cells) in &lines {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    // Pass 2: emit
    let mut out = format!("[{}x{}] {}\n", row_count, col_count, table.name());
    for (label, cells) in &lines {
        out.push_str(&format!("{:>width$}", label, width = label_width));
        for (cell, w) in cells.iter().zip(&widths) {
            out.push(' ');
            out.push_str(&format!("{:<width$}", cell, width = *w));
        }
        out.push('\n');
    }
    out
}

/// Single escaping pass for quotes, backslashes and control characters
fn escape(s: &str) -> String {
    s.escape_debug().to_string()
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
