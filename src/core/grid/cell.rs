//! Cell and span types for the canonical grid

/// Identifier of a physical cell: its index in canonical order
/// (row-major by origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Rectangle of grid slots covered by one cell
///
/// `[row, row + row_span) x [col, col + col_span)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl Span {
    pub fn new(row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        Span {
            row,
            col,
            row_span,
            col_span,
        }
    }

    /// First row below the span
    pub fn end_row(&self) -> usize {
        self.row + self.row_span
    }

    /// First column right of the span
    pub fn end_col(&self) -> usize {
        self.col + self.col_span
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row..self.end_row()).contains(&row) && (self.col..self.end_col()).contains(&col)
    }

    pub fn intersects(&self, other: &Span) -> bool {
        self.row < other.end_row()
            && other.row < self.end_row()
            && self.col < other.end_col()
            && other.col < self.end_col()
    }

    /// Every `(row, col)` slot of the span, row-major
    pub fn slots(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.col..self.end_col();
        (self.row..self.end_row()).flat_map(move |r| cols.clone().map(move |c| (r, c)))
    }

    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}

/// A physical cell: the origin of a span, owning its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub id: CellId,
    pub origin_row: usize,
    pub origin_col: usize,
    /// Number of rows this cell spans (>= 1)
    pub row_span: usize,
    /// Number of columns this cell spans (>= 1)
    pub col_span: usize,
    /// Opaque text content, line breaks as `\n`
    pub content: String,
    /// Position of the cell record in the source document
    pub reading_order_index: usize,
}

impl Cell {
    pub fn span(&self) -> Span {
        Span::new(self.origin_row, self.origin_col, self.row_span, self.col_span)
    }

    pub fn is_merged(&self) -> bool {
        self.span().is_merged()
    }
}
