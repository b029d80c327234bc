//! Fixed-width grid rendering for tables.
//!
//! ```text
//! +-----------+-----------+
//! | HeaderA   | HeaderB   |
//! +===========+===========+
//! | A1        | B1        |
//! +-----------+-----------+
//! ```
//!
//! Column width is the wider of the header plus two and the widest cell line,
//! measured in terminal columns so double-width characters line up. Columns
//! holding only numbers are right-aligned with their decimal points lined up,
//! header included. Repeated headers collapse to one column.

use unicode_width::UnicodeWidthStr;

use super::keyed_records;
use crate::model::StructuredTable;

/// Minimum padding added to header widths.
const HEADER_PADDING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Decimal,
}

/// Render a table as a bordered grid.
///
/// A table without headers has no columns and renders as an empty string.
pub fn to_grid(table: &StructuredTable) -> String {
    if table.headers.is_empty() {
        return String::new();
    }

    let keyed = keyed_records(table);
    let columns = keyed.headers.len();

    let aligns: Vec<Align> = (0..columns)
        .map(|c| {
            let mut present = keyed.records.iter().filter_map(|r| r[c]).peekable();
            if present.peek().is_some() && present.all(is_number) {
                Align::Decimal
            } else {
                Align::Left
            }
        })
        .collect();

    let mut body: Vec<Vec<String>> = keyed
        .records
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|cell| cell.unwrap_or("").to_string())
                .collect()
        })
        .collect();
    for (c, _) in aligns.iter().enumerate().filter(|(_, a)| **a == Align::Decimal) {
        let deepest = keyed
            .records
            .iter()
            .filter_map(|r| r[c])
            .map(after_point)
            .max()
            .unwrap_or(-1);
        for (row, record) in body.iter_mut().zip(&keyed.records) {
            if let Some(text) = record[c] {
                let fill = (deepest - after_point(text)).max(0) as usize;
                row[c].push_str(&" ".repeat(fill));
            }
        }
    }

    let mut widths: Vec<usize> = keyed
        .headers
        .iter()
        .map(|h| max_line_width(h) + HEADER_PADDING)
        .collect();
    for row in &body {
        for (c, cell) in row.iter().enumerate() {
            widths[c] = widths[c].max(max_line_width(cell));
        }
    }

    let mut lines = Vec::new();
    lines.push(border(&widths, '-'));
    push_row(&mut lines, &keyed.headers, &widths, &aligns);
    lines.push(border(&widths, '='));

    if body.is_empty() {
        lines.push(border(&widths, '-'));
    }
    for row in &body {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_row(&mut lines, &cells, &widths, &aligns);
        lines.push(border(&widths, '-'));
    }

    lines.join("\n")
}

fn border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for &width in widths {
        line.extend(std::iter::repeat(fill).take(width + 2));
        line.push('+');
    }
    line
}

/// Append one logical row, which spans as many lines as its tallest cell.
fn push_row(lines: &mut Vec<String>, cells: &[&str], widths: &[usize], aligns: &[Align]) {
    let split: Vec<Vec<&str>> = cells.iter().map(|cell| cell_lines(cell)).collect();
    let height = split.iter().map(Vec::len).max().unwrap_or(1);

    for i in 0..height {
        let mut line = String::from("|");
        for (c, cell) in split.iter().enumerate() {
            let text = cell.get(i).copied().unwrap_or("");
            line.push(' ');
            line.push_str(&pad(text, widths[c], aligns[c]));
            line.push_str(" |");
        }
        lines.push(line);
    }
}

fn cell_lines(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        vec![""]
    } else {
        lines
    }
}

fn max_line_width(text: &str) -> usize {
    cell_lines(text)
        .iter()
        .map(|line| line.width())
        .max()
        .unwrap_or(0)
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Decimal => format!("{}{}", fill, text),
    }
}

/// Characters after the decimal point (or exponent marker); -1 for integers.
fn after_point(text: &str) -> isize {
    let text = text.trim();
    if text.parse::<i64>().is_ok() {
        return -1;
    }
    match text.rfind('.').or_else(|| text.rfind(['e', 'E'])) {
        Some(pos) => (text.len() - pos - 1) as isize,
        None => -1,
    }
}

fn is_number(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text.parse::<f64>().is_ok()
}
