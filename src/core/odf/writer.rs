//! ODF table writer

use std::fmt::Write;

use crate::core::grid::{Grid, GridSlot};
use crate::core::options::OdfOptions;
use crate::data::markup::{ODF_TABLE_NS, ODF_TEXT_NS};
use crate::utils::xml::escape_text;

fn write_paragraphs(out: &mut String, content: &str) {
    for line in content.split('\n') {
        if line.is_empty() {
            out.push_str("<text:p/>");
        } else {
            let _ = write!(out, "<text:p>{}</text:p>", escape_text(line));
        }
    }
}

/// Write a grid as a `table:table` element.
///
/// The output is dense: every slot gets an entry, origins as
/// `table:table-cell` and every other covered slot as
/// `table:covered-table-cell`.
pub fn write_odf(grid: &Grid, options: &OdfOptions) -> String {
    let mut out = String::new();

    out.push_str("<table:table");
    if options.declare_namespace {
        let _ = write!(
            out,
            " xmlns:table=\"{}\" xmlns:text=\"{}\"",
            ODF_TABLE_NS, ODF_TEXT_NS
        );
    }
    let _ = writeln!(out, " table:name=\"{}\">", escape_text(&options.table_name));
    let _ = writeln!(
        out,
        "  <table:table-column table:number-columns-repeated=\"{}\"/>",
        grid.col_count()
    );

    for r in 0..grid.row_count() {
        out.push_str("  <table:table-row>\n");
        for c in 0..grid.col_count() {
            match grid.slot(r, c) {
                Some(GridSlot::Origin(id)) => {
                    let Some(cell) = grid.cell(id) else { continue };
                    out.push_str("    <table:table-cell");
                    if cell.col_span > 1 {
                        let _ = write!(out, " table:number-columns-spanned=\"{}\"", cell.col_span);
                    }
                    if cell.row_span > 1 {
                        let _ = write!(out, " table:number-rows-spanned=\"{}\"", cell.row_span);
                    }
                    out.push('>');
                    write_paragraphs(&mut out, &cell.content);
                    out.push_str("</table:table-cell>\n");
                }
                _ => out.push_str("    <table:covered-table-cell/>\n"),
            }
        }
        out.push_str("  </table:table-row>\n");
    }

    out.push_str("</table:table>\n");
    out
}
