//! Grid-addressed table records as read from HWPX

/// `(colAddr, rowAddr)` exactly as written in `hp:cellAddr`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceAddress {
    pub col: usize,
    pub row: usize,
}

impl SourceAddress {
    pub fn new(col: usize, row: usize) -> Self {
        SourceAddress { col, row }
    }
}

/// One `hp:tc` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressedCell {
    pub address: SourceAddress,
    /// `colSpan` of `hp:cellSpan`, when present
    pub col_span: Option<usize>,
    /// `rowSpan` of `hp:cellSpan`, when present
    pub row_span: Option<usize>,
    pub content: String,
}

impl AddressedCell {
    /// A record with an address only; spans are left to inference
    pub fn at(col: usize, row: usize, content: impl Into<String>) -> Self {
        AddressedCell {
            address: SourceAddress::new(col, row),
            col_span: None,
            row_span: None,
            content: content.into(),
        }
    }

    /// A record with an explicit `hp:cellSpan`
    pub fn spanning(
        col: usize,
        row: usize,
        col_span: usize,
        row_span: usize,
        content: impl Into<String>,
    ) -> Self {
        AddressedCell {
            address: SourceAddress::new(col, row),
            col_span: Some(col_span),
            row_span: Some(row_span),
            content: content.into(),
        }
    }

    pub fn has_explicit_span(&self) -> bool {
        self.col_span.is_some() || self.row_span.is_some()
    }
}

/// One `hp:tbl`: structural rows (`hp:tr`) holding only their physical cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressedTable {
    /// `rowCnt`
    pub row_count: Option<usize>,
    /// `colCnt`
    pub col_count: Option<usize>,
    pub rows: Vec<Vec<AddressedCell>>,
}

impl AddressedTable {
    pub fn record_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Records in document order with their structural row index
    pub fn records(&self) -> impl Iterator<Item = (usize, &AddressedCell)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().map(move |cell| (r, cell)))
    }
}
