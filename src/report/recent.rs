//! Recent-activity table

use crate::journal::{RecentTrade, TIME_FORMAT};

const HEADERS: [&str; 6] = ["Time", "Symbol", "Entry", "Stop", "Target", "Result"];

/// Render recent trades as an aligned text table
///
/// Returns `None` when there is nothing to show.
pub fn format_recent(trades: &[RecentTrade]) -> Option<String> {
    if trades.is_empty() {
        return None;
    }

    let rows: Vec<[String; 6]> = trades
        .iter()
        .map(|t| {
            [
                t.time.format(TIME_FORMAT).to_string(),
                t.symbol.clone().unwrap_or_else(|| "-".to_string()),
                format!("{:.2}", t.entry),
                format!("{:.2}", t.stop),
                format!("{:.2}", t.target),
                format!("{:+.2}", t.result),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&rule.join("──"));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    Some(out)
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            // Time and symbol left-aligned, numbers right-aligned
            if i < 2 {
                format!("{:<width$}", cell, width = *width)
            } else {
                format!("{:>width$}", cell, width = *width)
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
