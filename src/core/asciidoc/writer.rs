//! AsciiDoc table writer

use std::fmt::Write;

use crate::core::grid::{Cell, Grid};
use crate::core::options::{AsciiDocOptions, CellLayout};

/// Span shorthand for a cell: `c+`, `.r+`, `c.r+` or nothing
pub fn span_prefix(col_span: usize, row_span: usize) -> String {
    match (col_span > 1, row_span > 1) {
        (true, true) => format!("{}.{}+", col_span, row_span),
        (true, false) => format!("{}+", col_span),
        (false, true) => format!(".{}+", row_span),
        (false, false) => String::new(),
    }
}

/// Escape one line of cell content.
///
/// Besides `\|`, a line that would read back as a comment or a table
/// delimiter gets an `{empty}` prefix, and a trailing ` +` that would read
/// back as a hard break is written as `{plus}`.
fn escape_line(line: &str) -> String {
    let mut out = line.replace('|', "\\|");
    let trimmed = out.trim();
    let looks_like_delimiter = trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'=');
    if trimmed.starts_with("//") || looks_like_delimiter {
        out.insert_str(0, "{empty}");
    }
    let trimmed = out.trim_end();
    if trimmed == "+" || trimmed.ends_with(" +") {
        let keep = trimmed.len() - 1;
        out.truncate(keep);
        out.push_str("{plus}");
    }
    out
}

/// Escape separators and turn line breaks into hard breaks
pub fn escape_cell(content: &str) -> String {
    content.split('\n').map(escape_line).collect::<Vec<_>>().join(" +\n")
}

fn cell_token(cell: &Cell) -> String {
    format!(
        "{}|{}",
        span_prefix(cell.col_span, cell.row_span),
        escape_cell(&cell.content)
    )
}

/// Write a grid as an AsciiDoc table.
///
/// Rows that row spans from above cover completely have no cells to write
/// and produce no cell group.
pub fn write_asciidoc(grid: &Grid, options: &AsciiDocOptions) -> String {
    let mut out = String::new();

    if options.cols_attribute {
        let cols = vec!["1"; grid.col_count()];
        let _ = writeln!(out, "[cols=\"{}\"]", cols.join(","));
    }
    out.push_str("|===\n");

    let mut first = true;
    for row in grid.rows() {
        if row.is_empty() {
            continue;
        }
        if !first {
            out.push('\n');
        }
        first = false;

        match options.cell_layout {
            CellLayout::OnePerLine => {
                for cell in row {
                    debug_assert!(cell.origin_col + cell.col_span <= grid.col_count());
                    let _ = writeln!(out, "{}", cell_token(cell));
                }
            }
            CellLayout::RowPerLine => {
                let tokens: Vec<String> = row.iter().map(cell_token).collect();
                let _ = writeln!(out, "{}", tokens.join(" "));
            }
        }
    }

    out.push_str("|===\n");
    out
}
