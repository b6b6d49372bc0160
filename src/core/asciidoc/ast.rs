//! AsciiDoc table AST and grid assembly

use crate::core::grid::{Grid, GridBuilder};
use crate::utils::error::StructuralError;

/// One cell token: optional span operators and the cell text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShorthandCell {
    /// `c` of a `c+|` or `c.r+|` prefix
    pub col_span: Option<usize>,
    /// `r` of a `.r+|` or `c.r+|` prefix
    pub row_span: Option<usize>,
    pub content: String,
}

impl ShorthandCell {
    pub fn new(content: impl Into<String>) -> Self {
        ShorthandCell {
            col_span: None,
            row_span: None,
            content: content.into(),
        }
    }

    pub fn spanning(col_span: usize, row_span: usize, content: impl Into<String>) -> Self {
        ShorthandCell {
            col_span: Some(col_span),
            row_span: Some(row_span),
            content: content.into(),
        }
    }
}

/// An AsciiDoc table: rows are the blank-line separated groups of cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShorthandTable {
    /// Column count declared by the `cols` attribute
    pub col_count: Option<usize>,
    pub rows: Vec<Vec<ShorthandCell>>,
    /// 1-based line of the opening `|===`, when parsed from text
    pub line: Option<usize>,
}

impl ShorthandTable {
    /// Column count: the declared one, else the width of the first row
    /// (nothing can be covered from above in the first row).
    pub fn resolved_col_count(&self) -> usize {
        self.col_count.unwrap_or_else(|| {
            self.rows
                .first()
                .map(|row| {
                    row.iter()
                        .fold(0usize, |width, c| width.saturating_add(c.col_span.unwrap_or(1)))
                })
                .unwrap_or(0)
        })
    }

    /// Assemble the grid.
    ///
    /// A row that row spans from above cover completely cannot be written as
    /// a cell group, so such rows are skipped before each group and may
    /// trail after the last one.
    pub fn build_grid(&self) -> Result<Grid, StructuralError> {
        let mut builder = GridBuilder::new(self.resolved_col_count(), None)?;
        for row in &self.rows {
            builder.skip_covered_rows();
            builder.begin_row();
            for cell in row {
                builder.push_cell(
                    cell.row_span.unwrap_or(1),
                    cell.col_span.unwrap_or(1),
                    cell.content.clone(),
                )?;
            }
            builder.end_row()?;
        }
        builder.finish()
    }
}
