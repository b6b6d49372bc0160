//! Error handling for cellspan conversions
//!
//! Two layers of errors exist:
//!
//! - [`StructuralError`]: the table geometry cannot be expressed as a grid of
//!   non-overlapping rectangular spans. Raised while a grid is assembled and
//!   fatal for that table.
//! - [`ConversionError`]: everything around the geometry (malformed markup,
//!   malformed XML, I/O), plus structural errors tagged with the index of the
//!   table they came from.

use std::fmt;

use thiserror::Error;

use crate::core::grid::{MAX_DIMENSION, MAX_SLOTS};

/// Geometry fault detected while assembling a grid.
///
/// Rows and columns are zero-based grid coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The table declares or contains no rows or no columns
    #[error("table has no rows or columns")]
    EmptyTable,

    /// A row's cells need more columns than the table has
    #[error("row {row} needs {required} columns but the table has {col_count}")]
    RowOverflow {
        row: usize,
        required: usize,
        col_count: usize,
    },

    /// A row span reaches past the last row of the table
    #[error(
        "cell at row {row}, column {col} spans {row_span} rows past the last row (table has {row_count})"
    )]
    UnterminatedSpan {
        row: usize,
        col: usize,
        row_span: usize,
        row_count: usize,
    },

    /// A slot has two candidate origin cells with equal claim
    #[error(
        "slot at row {row}, column {col} is claimed by both the cell at {first:?} and the cell at {second:?}"
    )]
    AmbiguousMerge {
        row: usize,
        col: usize,
        first: (usize, usize),
        second: (usize, usize),
    },

    /// A gap cannot be covered by any axis-aligned rectangular span
    #[error("slot at row {row}, column {col} is not covered by any rectangular span")]
    NonRectangularMerge { row: usize, col: usize },

    /// A cell's rectangle intersects a slot another cell already claimed
    #[error("cell at row {row}, column {col} overlaps an existing span")]
    OverlappingSpan { row: usize, col: usize },

    /// A row ends before every column is covered
    #[error("row {row} leaves column {col} uncovered")]
    IncompleteRow { row: usize, col: usize },

    /// Declared counts or spans reach past the size limits of a grid
    #[error(
        "table of {rows} rows and {cols} columns exceeds the limit of {limit} per axis and {slots} slots",
        limit = MAX_DIMENSION,
        slots = MAX_SLOTS
    )]
    TableTooLarge { rows: usize, cols: usize },
}

impl StructuralError {
    /// Grid coordinate the error was detected at, if any
    pub fn location(&self) -> Option<(usize, usize)> {
        match *self {
            StructuralError::EmptyTable | StructuralError::TableTooLarge { .. } => None,
            StructuralError::RowOverflow { row, col_count, .. } => Some((row, col_count)),
            StructuralError::UnterminatedSpan { row, col, .. }
            | StructuralError::AmbiguousMerge { row, col, .. }
            | StructuralError::NonRectangularMerge { row, col }
            | StructuralError::OverlappingSpan { row, col }
            | StructuralError::IncompleteRow { row, col } => Some((row, col)),
        }
    }

    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            StructuralError::EmptyTable => "EmptyTable",
            StructuralError::RowOverflow { .. } => "RowOverflow",
            StructuralError::UnterminatedSpan { .. } => "UnterminatedSpan",
            StructuralError::AmbiguousMerge { .. } => "AmbiguousMerge",
            StructuralError::NonRectangularMerge { .. } => "NonRectangularMerge",
            StructuralError::OverlappingSpan { .. } => "OverlappingSpan",
            StructuralError::IncompleteRow { .. } => "IncompleteRow",
            StructuralError::TableTooLarge { .. } => "TableTooLarge",
        }
    }
}

fn at_location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {}, column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        _ => String::new(),
    }
}

fn with_suggestion(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(". {}", s))
        .unwrap_or_default()
}

/// Conversion error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Parse error - markup could not be parsed
    #[error("Parse error{}: {message}", at_location(.line, .column))]
    ParseError {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// Malformed XML or attribute
    #[error("XML error: {message}")]
    Xml { message: String },
    /// A table's geometry is invalid
    #[error("table {table}: {source}")]
    Structural {
        table: usize,
        #[source]
        source: StructuralError,
    },
    /// Unsupported feature
    #[error("Unsupported feature '{feature}'{}", with_suggestion(.suggestion))]
    UnsupportedFeature {
        feature: String,
        suggestion: Option<String>,
    },
    /// Invalid input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
    /// IO error (for file operations)
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for ConversionError {
    fn from(err: quick_xml::Error) -> Self {
        ConversionError::Xml {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for ConversionError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ConversionError::Xml {
            message: err.to_string(),
        }
    }
}

impl From<StructuralError> for ConversionError {
    fn from(source: StructuralError) -> Self {
        ConversionError::Structural { table: 0, source }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Conversion warnings (non-fatal issues)
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionWarning {
    pub message: String,
    /// Index of the table the warning refers to
    pub table: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            table: None,
            suggestion: None,
        }
    }

    pub fn for_table(mut self, table: usize) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(t) = self.table {
            write!(f, "Warning in table {}: {}", t, self.message)?;
        } else {
            write!(f, "Warning: {}", self.message)?;
        }
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}

/// Conversion output with optional warnings
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The converted content
    pub content: String,
    /// Any warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(content: String, warnings: Vec<ConversionWarning>) -> Self {
        Self { content, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// Convenience constructors for errors
impl ConversionError {
    pub fn parse(message: impl Into<String>) -> Self {
        ConversionError::ParseError {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn parse_at_line(message: impl Into<String>, line: usize) -> Self {
        ConversionError::ParseError {
            message: message.into(),
            line: Some(line),
            column: None,
        }
    }

    pub fn unsupported(feature: impl Into<String>) -> Self {
        ConversionError::UnsupportedFeature {
            feature: feature.into(),
            suggestion: None,
        }
    }

    pub fn unsupported_with_suggestion(
        feature: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        ConversionError::UnsupportedFeature {
            feature: feature.into(),
            suggestion: Some(suggestion.into()),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ConversionError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn structural(table: usize, source: StructuralError) -> Self {
        ConversionError::Structural { table, source }
    }

    /// The structural error behind this conversion error, if any
    pub fn as_structural(&self) -> Option<&StructuralError> {
        match self {
            ConversionError::Structural { source, .. } => Some(source),
            _ => None,
        }
    }
}
