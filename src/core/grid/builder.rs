//! Incremental grid assembly over an occupancy map

use super::cell::{Cell, CellId, Span};
use super::model::{Grid, GridSlot};
use crate::utils::error::StructuralError;

/// Largest row or column count a table may have
pub const MAX_DIMENSION: usize = 16_384;

/// Largest number of slots (rows times columns) a table may have
pub const MAX_SLOTS: usize = 1 << 21;

fn check_size(rows: usize, cols: usize) -> Result<(), StructuralError> {
    let fits = rows <= MAX_DIMENSION
        && cols <= MAX_DIMENSION
        && rows.checked_mul(cols).is_some_and(|n| n <= MAX_SLOTS);
    if fits {
        Ok(())
    } else {
        Err(StructuralError::TableTooLarge { rows, cols })
    }
}

/// Incremental grid assembler.
///
/// Keeps an occupancy map (owner of every claimed slot) that grows a row at
/// a time. Two placement modes share it:
///
/// - sequential: [`begin_row`](Self::begin_row), [`push_cell`](Self::push_cell),
///   [`end_row`](Self::end_row). A column cursor skips slots still covered by
///   row spans from earlier rows.
/// - positional: [`place`](Self::place) at an explicit origin, and
///   [`extend_down`](Self::extend_down) to grow a row span by one row.
///
/// [`finish`](Self::finish) checks full coverage and freezes the [`Grid`].
#[derive(Debug)]
pub struct GridBuilder {
    col_count: usize,
    declared_rows: Option<usize>,
    /// Owner index (into `cells`) of every claimed slot, row-major
    owners: Vec<Option<usize>>,
    cells: Vec<Cell>,
    /// Rows opened through `begin_row` or skipped as fully covered
    rows_begun: usize,
    cursor: usize,
}

impl GridBuilder {
    /// Create a builder for a table of `col_count` columns.
    ///
    /// With `declared_rows`, any span reaching past that row count is an
    /// [`StructuralError::UnterminatedSpan`]. Without it, the row count is
    /// whatever the placed cells reach.
    pub fn new(col_count: usize, declared_rows: Option<usize>) -> Result<Self, StructuralError> {
        if col_count == 0 || declared_rows == Some(0) {
            return Err(StructuralError::EmptyTable);
        }
        check_size(declared_rows.unwrap_or(1), col_count)?;
        Ok(GridBuilder {
            col_count,
            declared_rows,
            owners: Vec::new(),
            cells: Vec::new(),
            rows_begun: 0,
            cursor: 0,
        })
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn declared_rows(&self) -> Option<usize> {
        self.declared_rows
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    fn allocated_rows(&self) -> usize {
        self.owners.len() / self.col_count
    }

    fn ensure_rows(&mut self, rows: usize) {
        if self.allocated_rows() < rows {
            self.owners.resize(rows * self.col_count, None);
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.col_count + col
    }

    /// Cell that claimed `(row, col)`, if any
    pub fn owner(&self, row: usize, col: usize) -> Option<CellId> {
        if col >= self.col_count || row >= self.allocated_rows() {
            return None;
        }
        self.owners[self.index(row, col)].map(CellId)
    }

    /// Whether `(row, col)` lies inside the table and is still unclaimed
    pub fn is_free(&self, row: usize, col: usize) -> bool {
        col < self.col_count
            && self.declared_rows.map_or(true, |n| row < n)
            && self.owner(row, col).is_none()
    }

    /// Whether every column of `row` is claimed
    pub fn is_row_covered(&self, row: usize) -> bool {
        (0..self.col_count).all(|c| self.owner(row, c).is_some())
    }

    /// Claim the rectangle at `(row, col)` for a new cell.
    pub fn place(
        &mut self,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        content: String,
    ) -> Result<CellId, StructuralError> {
        debug_assert!(row_span >= 1 && col_span >= 1, "spans start at 1");
        let (row_span, col_span) = (row_span.max(1), col_span.max(1));

        let end_col = col.saturating_add(col_span);
        if end_col > self.col_count {
            return Err(StructuralError::RowOverflow {
                row,
                required: end_col,
                col_count: self.col_count,
            });
        }
        let end_row = row.saturating_add(row_span);
        if let Some(row_count) = self.declared_rows {
            if end_row > row_count {
                return Err(StructuralError::UnterminatedSpan {
                    row,
                    col,
                    row_span,
                    row_count,
                });
            }
        }
        check_size(end_row, self.col_count)?;
        let span = Span::new(row, col, row_span, col_span);

        self.ensure_rows(span.end_row());
        if span
            .slots()
            .any(|(r, c)| self.owners[self.index(r, c)].is_some())
        {
            return Err(StructuralError::OverlappingSpan { row, col });
        }

        let idx = self.cells.len();
        for (r, c) in span.slots() {
            let slot = self.index(r, c);
            self.owners[slot] = Some(idx);
        }
        self.cells.push(Cell {
            id: CellId(idx),
            origin_row: row,
            origin_col: col,
            row_span: span.row_span,
            col_span: span.col_span,
            content,
            reading_order_index: idx,
        });
        Ok(CellId(idx))
    }

    /// Grow the row span of `id` by one row, claiming the slots below it.
    pub fn extend_down(&mut self, id: CellId) -> Result<(), StructuralError> {
        let span = self.cells[id.0].span();
        let new_row = span.end_row();

        if let Some(row_count) = self.declared_rows {
            if new_row >= row_count {
                return Err(StructuralError::UnterminatedSpan {
                    row: span.row,
                    col: span.col,
                    row_span: span.row_span + 1,
                    row_count,
                });
            }
        }

        self.ensure_rows(new_row + 1);
        for c in span.col..span.end_col() {
            if self.owners[self.index(new_row, c)].is_some() {
                return Err(StructuralError::OverlappingSpan {
                    row: new_row,
                    col: c,
                });
            }
        }
        for c in span.col..span.end_col() {
            let slot = self.index(new_row, c);
            self.owners[slot] = Some(id.0);
        }
        self.cells[id.0].row_span += 1;
        Ok(())
    }

    /// Record where the cell appeared in the source document
    pub fn set_reading_order(&mut self, id: CellId, index: usize) {
        if let Some(cell) = self.cells.get_mut(id.0) {
            cell.reading_order_index = index;
        }
    }

    /// Open the next row for sequential placement and return its index
    pub fn begin_row(&mut self) -> usize {
        let row = self.rows_begun;
        self.rows_begun += 1;
        self.cursor = 0;
        self.ensure_rows(row + 1);
        row
    }

    /// Index of the row opened last
    pub fn current_row(&self) -> Option<usize> {
        self.rows_begun.checked_sub(1)
    }

    /// Number of rows opened or skipped so far
    pub fn rows_begun(&self) -> usize {
        self.rows_begun
    }

    /// Skip the rows ahead that row spans from above already cover
    /// completely, returning how many were skipped.
    pub fn skip_covered_rows(&mut self) -> usize {
        let mut skipped = 0;
        while self.rows_begun < self.allocated_rows() && self.is_row_covered(self.rows_begun) {
            self.rows_begun += 1;
            skipped += 1;
        }
        skipped
    }

    /// Place a cell at the cursor of the current row, skipping covered slots.
    pub fn push_cell(
        &mut self,
        row_span: usize,
        col_span: usize,
        content: String,
    ) -> Result<CellId, StructuralError> {
        let row = match self.current_row() {
            Some(row) => row,
            None => self.begin_row(),
        };

        while self.cursor < self.col_count && self.owner(row, self.cursor).is_some() {
            self.cursor += 1;
        }
        if self.cursor >= self.col_count {
            return Err(StructuralError::RowOverflow {
                row,
                required: self.cursor.saturating_add(col_span.max(1)),
                col_count: self.col_count,
            });
        }

        let id = self.place(row, self.cursor, row_span, col_span, content)?;
        self.cursor += self.cells[id.0].col_span;
        Ok(id)
    }

    /// Close the current row; every column must be claimed by now.
    pub fn end_row(&mut self) -> Result<(), StructuralError> {
        if let Some(row) = self.current_row() {
            if let Some(col) = (0..self.col_count).find(|&c| self.owner(row, c).is_none()) {
                return Err(StructuralError::IncompleteRow { row, col });
            }
        }
        Ok(())
    }

    /// Check full coverage and freeze the grid.
    ///
    /// Cells are renumbered into canonical order (row-major by origin).
    pub fn finish(mut self) -> Result<Grid, StructuralError> {
        let allocated = self.allocated_rows();
        let row_count = match self.declared_rows {
            Some(n) => n,
            None => self.rows_begun.max(allocated),
        };
        if row_count == 0 || self.cells.is_empty() {
            return Err(StructuralError::EmptyTable);
        }

        // Without a declared row count, rows past the last opened one exist
        // only because a row span reaches into them.
        if self.declared_rows.is_none() && allocated > self.rows_begun && self.rows_begun > 0 {
            let trailing_gap =
                (self.rows_begun..allocated).any(|r| !self.is_row_covered(r));
            if trailing_gap {
                let last = self.rows_begun;
                if let Some(cell) = self.cells.iter().find(|c| c.span().end_row() > last) {
                    return Err(StructuralError::UnterminatedSpan {
                        row: cell.origin_row,
                        col: cell.origin_col,
                        row_span: cell.row_span,
                        row_count: last,
                    });
                }
            }
        }

        self.ensure_rows(row_count);
        self.owners.truncate(row_count * self.col_count);
        if let Some(idx) = self.owners.iter().position(Option::is_none) {
            let (row, col) = (idx / self.col_count, idx % self.col_count);
            return Err(StructuralError::IncompleteRow { row, col });
        }

        // Canonical renumbering
        let mut order: Vec<usize> = (0..self.cells.len()).collect();
        order.sort_by_key(|&i| (self.cells[i].origin_row, self.cells[i].origin_col));
        let mut remap = vec![0; self.cells.len()];
        for (new, &old) in order.iter().enumerate() {
            remap[old] = new;
        }
        let mut cells: Vec<Cell> = Vec::with_capacity(self.cells.len());
        for &old in &order {
            let mut cell = self.cells[old].clone();
            cell.id = CellId(remap[old]);
            cells.push(cell);
        }

        let mut slots = Vec::with_capacity(row_count * self.col_count);
        for (idx, owner) in self.owners.iter().enumerate() {
            let (row, col) = (idx / self.col_count, idx % self.col_count);
            let Some(old) = *owner else {
                return Err(StructuralError::IncompleteRow { row, col });
            };
            let id = CellId(remap[old]);
            let cell = &cells[id.0];
            if cell.origin_row == row && cell.origin_col == col {
                slots.push(GridSlot::Origin(id));
            } else {
                slots.push(GridSlot::OccupiedBy(id));
            }
        }

        let grid = Grid::from_parts(row_count, self.col_count, cells, slots);
        log::debug!(
            "built {}x{} grid: {} cells, {}",
            grid.row_count(),
            grid.col_count(),
            grid.cells().len(),
            grid.merge_stats()
        );
        Ok(grid)
    }
}
