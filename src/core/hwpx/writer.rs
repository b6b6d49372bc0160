//! HWPX table writer

use std::fmt::Write;

use crate::core::grid::Grid;
use crate::core::options::HwpxOptions;
use crate::data::markup::HWPX_PARAGRAPH_NS;
use crate::utils::xml::escape_text;

/// Write a grid as an `hp:tbl` element.
///
/// Only physical cells are written, each addressed at its origin
/// `(colAddr, rowAddr) = (origin_col, origin_row)`. A row fully covered by
/// row spans is an empty `hp:tr`, which keeps structural rows aligned with
/// grid rows.
pub fn write_hwpx(grid: &Grid, options: &HwpxOptions) -> String {
    let mut out = String::new();

    out.push_str("<hp:tbl");
    if options.declare_namespace {
        let _ = write!(out, " xmlns:hp=\"{}\"", HWPX_PARAGRAPH_NS);
    }
    let _ = writeln!(
        out,
        " rowCnt=\"{}\" colCnt=\"{}\">",
        grid.row_count(),
        grid.col_count()
    );

    for row in grid.rows() {
        if row.is_empty() {
            out.push_str("  <hp:tr/>\n");
            continue;
        }
        out.push_str("  <hp:tr>\n");
        for cell in row {
            debug_assert!(cell.origin_row + cell.row_span <= grid.row_count());
            debug_assert!(cell.origin_col + cell.col_span <= grid.col_count());

            out.push_str("    <hp:tc>\n      <hp:subList>\n");
            for line in cell.content.split('\n') {
                if line.is_empty() {
                    out.push_str("        <hp:p><hp:run/></hp:p>\n");
                } else {
                    let _ = writeln!(
                        out,
                        "        <hp:p><hp:run><hp:t>{}</hp:t></hp:run></hp:p>",
                        escape_text(line)
                    );
                }
            }
            out.push_str("      </hp:subList>\n");
            let _ = writeln!(
                out,
                "      <hp:cellAddr colAddr=\"{}\" rowAddr=\"{}\"/>",
                cell.origin_col, cell.origin_row
            );
            if options.emit_cell_span {
                let _ = writeln!(
                    out,
                    "      <hp:cellSpan colSpan=\"{}\" rowSpan=\"{}\"/>",
                    cell.col_span, cell.row_span
                );
            }
            out.push_str("    </hp:tc>\n");
        }
        out.push_str("  </hp:tr>\n");
    }

    out.push_str("</hp:tbl>\n");
    out
}
