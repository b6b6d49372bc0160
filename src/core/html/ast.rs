//! HTML table AST and grid assembly

use crate::core::grid::{Grid, GridBuilder, MAX_DIMENSION};
use crate::utils::error::StructuralError;

/// One `<td>` or `<th>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlCell {
    pub col_span: usize,
    pub row_span: usize,
    pub content: String,
    /// Written as `<th>`
    pub header: bool,
}

impl HtmlCell {
    pub fn new(content: impl Into<String>) -> Self {
        HtmlCell {
            col_span: 1,
            row_span: 1,
            content: content.into(),
            header: false,
        }
    }

    pub fn with_span(mut self, col_span: usize, row_span: usize) -> Self {
        self.col_span = col_span;
        self.row_span = row_span;
        self
    }
}

/// One `<table>`: rows of explicit-span cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    /// Column count declared by `<colgroup>`/`<col>`
    pub col_count: Option<usize>,
    pub caption: Option<String>,
    pub rows: Vec<Vec<HtmlCell>>,
}

impl HtmlTable {
    /// Widest row once the columns held by row spans from above are counted.
    ///
    /// Tracks how many more rows each column stays covered, the way a
    /// browser lays out the table.
    pub fn measure_columns(&self) -> usize {
        let mut col_coverage: Vec<usize> = Vec::new();
        let mut width = 0;

        for row in &self.rows {
            let mut current_col = 0;
            for cell in row {
                while current_col < col_coverage.len() && col_coverage[current_col] > 0 {
                    current_col += 1;
                }
                let span = cell.col_span.max(1);
                let end = current_col.saturating_add(span);
                if end > MAX_DIMENSION {
                    // Too wide to lay out; the builder reports it
                    return end;
                }
                if end > col_coverage.len() {
                    col_coverage.resize(end, 0);
                }
                // Counted down once at the end of this row
                for i in 0..span {
                    col_coverage[current_col + i] = cell.row_span.max(1);
                }
                current_col += span;
            }
            let covered_tail = col_coverage
                .iter()
                .rposition(|&n| n > 0)
                .map_or(0, |i| i + 1);
            width = width.max(current_col).max(covered_tail);

            for remaining in col_coverage.iter_mut() {
                *remaining = remaining.saturating_sub(1);
            }
        }
        width
    }

    /// Column count: the `<colgroup>` one when present, else measured
    pub fn resolved_col_count(&self) -> usize {
        self.col_count
            .filter(|&n| n > 0)
            .unwrap_or_else(|| self.measure_columns())
    }

    pub fn build_grid(&self) -> Result<Grid, StructuralError> {
        let mut builder = GridBuilder::new(self.resolved_col_count(), None)?;
        for row in &self.rows {
            builder.begin_row();
            for cell in row {
                builder.push_cell(cell.row_span, cell.col_span, cell.content.clone())?;
            }
            builder.end_row()?;
        }
        builder.finish()
    }
}
