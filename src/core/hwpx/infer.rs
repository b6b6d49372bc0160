//! Merge inference for grid-addressed tables
//!
//! HWPX records each physical cell's top-left address. When a record has no
//! `hp:cellSpan`, its extent has to be recovered from the addresses around
//! it:
//!
//! - a gap between two addresses in one structural row is a column span of
//!   the left record;
//! - a column range whose address does not reappear in the next row is a
//!   row span of the cell above.
//!
//! Rows are processed top to bottom in one greedy pass over the builder's
//! occupancy map. Row spans are resolved before column spans, so a column
//! span is always measured against the slots row spans left free.
//!
//! ```text
//! row r:    A(0)        B(2)           A: colspan 2 (gap 0..2)
//! row r+1:  C(0)  D(1)                 B: no address at 2 -> rowspan grows
//! ```
//!
//! Records with an explicit span are placed as given and never grow.
//! Anything that cannot be expressed as rectangles is rejected.

use crate::core::grid::{CellId, Grid, GridBuilder};
use crate::utils::error::StructuralError;

use super::ast::{AddressedCell, AddressedTable};

/// Resolved table dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

/// Row and column counts: the declared ones, or derived from the records.
///
/// Derived columns are the furthest column any record reaches with its
/// explicit span (1 when absent); derived rows are the structural rows.
pub fn resolve_dimensions(table: &AddressedTable) -> Dimensions {
    let cols = table.col_count.unwrap_or_else(|| {
        table
            .records()
            .map(|(_, c)| c.address.col.saturating_add(c.col_span.unwrap_or(1)))
            .max()
            .unwrap_or(0)
    });

    let structural = table.rows.len();
    let rows = match table.row_count {
        Some(declared) if declared < structural => {
            log::warn!(
                "rowCnt={} but the table has {} rows; using the row elements",
                declared,
                structural
            );
            structural
        }
        Some(declared) => declared,
        None => structural,
    };

    Dimensions { rows, cols }
}

/// Resolve every record's span and build the grid.
pub fn infer_grid(table: &AddressedTable) -> Result<Grid, StructuralError> {
    let dims = resolve_dimensions(table);
    if dims.rows == 0 || dims.cols == 0 || table.record_count() == 0 {
        return Err(StructuralError::EmptyTable);
    }

    let mut builder = GridBuilder::new(dims.cols, Some(dims.rows))?;
    // Cells whose row span was inferred and may still grow
    let mut open: Vec<CellId> = Vec::new();
    let mut reading_index = 0;

    for r in 0..dims.rows {
        let records: &[AddressedCell] = table.rows.get(r).map(Vec::as_slice).unwrap_or(&[]);

        let mut ordered: Vec<(usize, &AddressedCell)> = records
            .iter()
            .enumerate()
            .map(|(i, cell)| (reading_index + i, cell))
            .collect();
        reading_index += records.len();
        ordered.sort_by_key(|(_, cell)| cell.address.col);

        check_row_records(r, &ordered, dims.cols)?;
        let starts: Vec<usize> = ordered.iter().map(|(_, c)| c.address.col).collect();

        // Row spans first: an open cell grows when no record starts inside
        // its columns and those slots are still free.
        let mut still_open = Vec::with_capacity(open.len());
        for id in open.drain(..) {
            let Some(cell) = builder.cell(id) else {
                continue;
            };
            let span = cell.span();
            let claimed = starts.iter().any(|&c| span.col <= c && c < span.end_col());
            let free = (span.col..span.end_col()).all(|c| builder.is_free(r, c));
            if !claimed && free {
                builder.extend_down(id)?;
                log::debug!(
                    "row {}: extended cell at ({}, {}) to row span {}",
                    r,
                    span.row,
                    span.col,
                    span.row_span + 1
                );
                still_open.push(id);
            }
        }
        open = still_open;

        // Then the records of this row, left to right.
        for (k, &(doc_index, record)) in ordered.iter().enumerate() {
            let col = record.address.col;
            if let Some(owner) = builder.owner(r, col) {
                let first = builder
                    .cell(owner)
                    .map(|c| (c.origin_row, c.origin_col))
                    .unwrap_or((r, col));
                return Err(StructuralError::AmbiguousMerge {
                    row: r,
                    col,
                    first,
                    second: (r, col),
                });
            }

            let col_span = match record.col_span {
                Some(span) => span,
                None => {
                    let next = starts.get(k + 1).copied().unwrap_or(dims.cols);
                    (col..next).take_while(|&c| builder.is_free(r, c)).count()
                }
            };
            let row_span = record.row_span.unwrap_or(1);

            let id = builder.place(r, col, row_span, col_span, record.content.clone())?;
            builder.set_reading_order(id, doc_index);
            if record.row_span.is_none() {
                open.push(id);
            }
        }

        // Whatever is still free cannot be reached by any rectangle.
        if let Some(col) = (0..dims.cols).find(|&c| builder.is_free(r, c)) {
            return Err(StructuralError::NonRectangularMerge { row: r, col });
        }
    }

    builder.finish()
}

/// Per-row sanity checks on the sorted records of structural row `r`
fn check_row_records(
    r: usize,
    ordered: &[(usize, &AddressedCell)],
    cols: usize,
) -> Result<(), StructuralError> {
    for (_, record) in ordered {
        if record.address.row != r {
            log::warn!(
                "cell at colAddr={} has rowAddr={} inside row {}; using the row element",
                record.address.col,
                record.address.row,
                r
            );
        }
        if record.address.col >= cols {
            return Err(StructuralError::RowOverflow {
                row: r,
                required: record.address.col.saturating_add(record.col_span.unwrap_or(1)),
                col_count: cols,
            });
        }
        if record.col_span == Some(0) || record.row_span == Some(0) {
            return Err(StructuralError::NonRectangularMerge {
                row: r,
                col: record.address.col,
            });
        }
    }

    // Two records at one address both claim to be the origin of that slot.
    for pair in ordered.windows(2) {
        let (a, b) = (pair[0].1, pair[1].1);
        if a.address.col == b.address.col {
            return Err(StructuralError::AmbiguousMerge {
                row: r,
                col: a.address.col,
                first: (a.address.row, a.address.col),
                second: (b.address.row, b.address.col),
            });
        }
    }
    Ok(())
}
