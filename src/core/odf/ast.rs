//! ODF table AST and grid assembly

use crate::core::grid::{Grid, GridBuilder};
use crate::utils::error::StructuralError;

/// One slot entry of a `table:table-row`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OdfEntry {
    /// `table:table-cell`, the origin of a span
    Cell {
        col_span: usize,
        row_span: usize,
        content: String,
    },
    /// `table:covered-table-cell`, a slot inside some other cell's span
    Covered,
}

impl OdfEntry {
    pub fn cell(content: impl Into<String>) -> Self {
        OdfEntry::Cell {
            col_span: 1,
            row_span: 1,
            content: content.into(),
        }
    }

    pub fn spanning(col_span: usize, row_span: usize, content: impl Into<String>) -> Self {
        OdfEntry::Cell {
            col_span,
            row_span,
            content: content.into(),
        }
    }
}

/// One `table:table`: a dense matrix, one entry per slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OdfTable {
    /// `table:name`
    pub name: Option<String>,
    /// Sum of `table:table-column` repeats
    pub col_count: Option<usize>,
    pub rows: Vec<Vec<OdfEntry>>,
}

impl OdfTable {
    pub fn resolved_col_count(&self) -> usize {
        self.col_count
            .filter(|&n| n > 0)
            .unwrap_or_else(|| self.rows.iter().map(Vec::len).max().unwrap_or(0))
    }

    /// Assemble the grid. Every entry sits at its own column; a covered
    /// entry must land on a slot that an earlier span already claimed.
    pub fn build_grid(&self) -> Result<Grid, StructuralError> {
        let col_count = self.resolved_col_count();
        let mut builder = GridBuilder::new(col_count, None)?;

        for row in &self.rows {
            let r = builder.begin_row();
            if row.len() > col_count {
                return Err(StructuralError::RowOverflow {
                    row: r,
                    required: row.len(),
                    col_count,
                });
            }
            for (c, entry) in row.iter().enumerate() {
                match entry {
                    OdfEntry::Cell {
                        col_span,
                        row_span,
                        content,
                    } => {
                        if let Some(owner) = builder.owner(r, c) {
                            let first = builder
                                .cell(owner)
                                .map(|cell| (cell.origin_row, cell.origin_col))
                                .unwrap_or((r, c));
                            return Err(StructuralError::AmbiguousMerge {
                                row: r,
                                col: c,
                                first,
                                second: (r, c),
                            });
                        }
                        builder.place(r, c, *row_span, *col_span, content.clone())?;
                    }
                    OdfEntry::Covered => {
                        if builder.owner(r, c).is_none() {
                            return Err(StructuralError::NonRectangularMerge { row: r, col: c });
                        }
                    }
                }
            }
            builder.end_row()?;
        }
        builder.finish()
    }
}
