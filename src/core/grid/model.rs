//! The canonical grid

use std::fmt;

use super::cell::{Cell, CellId, Span};
use crate::utils::error::StructuralError;

/// What a grid slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSlot {
    /// Top-left slot of the cell
    Origin(CellId),
    /// Slot covered by the span of a cell whose origin is elsewhere
    OccupiedBy(CellId),
}

impl GridSlot {
    pub fn cell_id(self) -> CellId {
        match self {
            GridSlot::Origin(id) | GridSlot::OccupiedBy(id) => id,
        }
    }

    pub fn is_origin(self) -> bool {
        matches!(self, GridSlot::Origin(_))
    }
}

/// Merge counts of a grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Cells with `col_span > 1`
    pub col_merges: usize,
    /// Cells with `row_span > 1`
    pub row_merges: usize,
    /// Cells with either span above 1
    pub merged_cells: usize,
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} colspans, {} rowspans, {} merged cells",
            self.col_merges, self.row_merges, self.merged_cells
        )
    }
}

/// Canonical row x column model of one table with resolved spans.
///
/// Every slot in `[0, row_count) x [0, col_count)` is covered by exactly one
/// cell. A `Grid` only comes out of [`GridBuilder::finish`], which checks
/// that, and is immutable afterwards.
///
/// [`GridBuilder::finish`]: super::GridBuilder::finish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    row_count: usize,
    col_count: usize,
    /// Physical cells in canonical order; `cells[i].id == CellId(i)`
    cells: Vec<Cell>,
    /// Dense row-major slot map
    slots: Vec<GridSlot>,
}

impl Grid {
    pub(super) fn from_parts(
        row_count: usize,
        col_count: usize,
        cells: Vec<Cell>,
        slots: Vec<GridSlot>,
    ) -> Self {
        debug_assert_eq!(slots.len(), row_count * col_count);
        Grid {
            row_count,
            col_count,
            cells,
            slots,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    /// Physical cells in canonical order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    pub fn slot(&self, row: usize, col: usize) -> Option<GridSlot> {
        if row >= self.row_count || col >= self.col_count {
            return None;
        }
        self.slots.get(row * self.col_count + col).copied()
    }

    /// The cell whose span covers `(row, col)`
    pub fn covering_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.slot(row, col).and_then(|s| self.cell(s.cell_id()))
    }

    /// Physical cells whose origin lies in `row`, left to right.
    ///
    /// Empty for rows that are fully covered by row spans from above.
    pub fn cells_in_row(&self, row: usize) -> &[Cell] {
        let start = self.cells.partition_point(|c| c.origin_row < row);
        let end = self.cells.partition_point(|c| c.origin_row <= row);
        &self.cells[start..end]
    }

    /// Physical cells grouped by origin row, one entry per grid row
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        (0..self.row_count).map(move |r| self.cells_in_row(r))
    }

    /// Geometry of every cell in canonical order
    pub fn spans(&self) -> Vec<Span> {
        self.cells.iter().map(Cell::span).collect()
    }

    /// Physical cells in source document order
    pub fn cells_in_reading_order(&self) -> Vec<&Cell> {
        let mut cells: Vec<&Cell> = self.cells.iter().collect();
        cells.sort_by_key(|c| c.reading_order_index);
        cells
    }

    pub fn merge_stats(&self) -> MergeStats {
        let mut stats = MergeStats::default();
        for cell in &self.cells {
            if cell.col_span > 1 {
                stats.col_merges += 1;
            }
            if cell.row_span > 1 {
                stats.row_merges += 1;
            }
            if cell.is_merged() {
                stats.merged_cells += 1;
            }
        }
        stats
    }

    /// Recompute coverage from the cell list and compare it against the
    /// slot map.
    pub fn check_coverage(&self) -> Result<(), StructuralError> {
        let mut seen: Vec<Option<CellId>> = vec![None; self.row_count * self.col_count];
        for cell in &self.cells {
            let span = cell.span();
            if span.end_row() > self.row_count {
                return Err(StructuralError::UnterminatedSpan {
                    row: span.row,
                    col: span.col,
                    row_span: span.row_span,
                    row_count: self.row_count,
                });
            }
            if span.end_col() > self.col_count {
                return Err(StructuralError::RowOverflow {
                    row: span.row,
                    required: span.end_col(),
                    col_count: self.col_count,
                });
            }
            for (r, c) in span.slots() {
                let idx = r * self.col_count + c;
                if seen[idx].is_some() {
                    return Err(StructuralError::OverlappingSpan { row: r, col: c });
                }
                seen[idx] = Some(cell.id);
            }
        }
        for (idx, owner) in seen.iter().enumerate() {
            let (r, c) = (idx / self.col_count, idx % self.col_count);
            match (owner, self.slots.get(idx)) {
                (Some(id), Some(slot)) if slot.cell_id() == *id => {}
                (None, _) => return Err(StructuralError::IncompleteRow { row: r, col: c }),
                _ => return Err(StructuralError::OverlappingSpan { row: r, col: c }),
            }
        }
        Ok(())
    }

    /// Text picture of the slot map, one line per row.
    ///
    /// Origins print as the cell index, covered slots as `^` (covered from
    /// above) or `<` (covered from the left).
    pub fn layout_map(&self) -> String {
        let mut out = String::new();
        for r in 0..self.row_count {
            let line: Vec<String> = (0..self.col_count)
                .map(|c| match self.slot(r, c) {
                    Some(GridSlot::Origin(id)) => id.0.to_string(),
                    Some(GridSlot::OccupiedBy(id)) => match self.cell(id) {
                        Some(cell) if cell.origin_row < r => "^".to_string(),
                        _ => "<".to_string(),
                    },
                    None => "?".to_string(),
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}
