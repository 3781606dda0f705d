//! Plain-text table rendering for previews and mapping listings.

use itertools::Itertools;

const COLUMN_GAP: &str = "  ";
const MIN_COLUMN_WIDTH: usize = 3;

pub fn render_table<H, C>(headers: &[H], rows: &[Vec<C>]) -> String
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    let headers = headers.iter().map(|h| flatten(h.as_ref())).collect_vec();
    let rows = rows
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|idx| row.get(idx).map(|c| flatten(c.as_ref())).unwrap_or_default())
                .collect_vec()
        })
        .collect_vec();

    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect_vec();

    let mut output = String::new();
    output.push_str(&format_line(&headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect_vec();
    output.push_str(&format_line(&separator, &widths));
    for row in &rows {
        output.push_str(&format_line(row, &widths));
    }
    output
}

pub fn print_table<H, C>(headers: &[H], rows: &[Vec<C>])
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    print!("{}", render_table(headers, rows));
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .join(COLUMN_GAP);
    format!("{}\n", line.trim_end())
}

/// Keeps each cell on one line.
fn flatten(value: &str) -> String {
    value.replace(['\r', '\n', '\t'], " ")
}
