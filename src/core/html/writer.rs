//! HTML table writer

use std::fmt::Write;

use crate::core::grid::{Cell, Grid};
use crate::core::options::HtmlOptions;
use crate::utils::xml::escape_text;

fn cell_attributes(cell: &Cell) -> String {
    let mut attrs = String::new();
    if cell.col_span > 1 {
        let _ = write!(attrs, " colspan=\"{}\"", cell.col_span);
    }
    if cell.row_span > 1 {
        let _ = write!(attrs, " rowspan=\"{}\"", cell.row_span);
    }
    attrs
}

fn cell_html(content: &str) -> String {
    content
        .split('\n')
        .map(escape_text)
        .collect::<Vec<_>>()
        .join("<br />")
}

/// Write a grid as an HTML `<table>`.
///
/// `colspan`/`rowspan` equal to 1 are omitted. Every grid row gets a `<tr>`,
/// including rows that row spans cover completely.
pub fn write_html(grid: &Grid, options: &HtmlOptions) -> String {
    let mut out = String::new();

    match &options.class {
        Some(class) => {
            let _ = writeln!(out, "<table class=\"{}\">", escape_text(class));
        }
        None => out.push_str("<table>\n"),
    }

    if options.colgroup {
        out.push_str("<colgroup>");
        for _ in 0..grid.col_count() {
            out.push_str("<col />");
        }
        out.push_str("</colgroup>\n");
    }

    out.push_str("<tbody>\n");
    for row in grid.rows() {
        out.push_str("<tr>\n");
        for cell in row {
            debug_assert!(cell.origin_row + cell.row_span <= grid.row_count());
            let _ = writeln!(
                out,
                "<td{}>{}</td>",
                cell_attributes(cell),
                cell_html(&cell.content)
            );
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}
