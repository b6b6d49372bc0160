//! Table diagnostics
//!
//! Parses every table of a source and reports what would stop or bend a
//! conversion:
//!
//! - Structural errors (overflowing rows, unterminated or ambiguous merges)
//! - Source oddities the readers tolerate (`rowAddr` disagreements, short `rowCnt`)
//! - Spans that had to be inferred from HWPX cell addresses
//!
//! ## Example
//!
//! ```rust
//! use cellspan::diagnostics::check_tables;
//! use cellspan::Format;
//!
//! let result = check_tables("|===\n|a |b\n\n|c\n|===\n", Format::AsciiDoc);
//! assert!(result.has_errors());
//! ```

use std::fmt;

use crate::core::format::{parse_tables, Format, TableAst};
use crate::core::hwpx::{resolve_dimensions, AddressedTable};
use crate::utils::error::StructuralError;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - the table converts, but the source is irregular
    Warning,
    /// Error - the table cannot be converted
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// Table index in document order (0-indexed)
    pub table: Option<usize>,
    /// Grid row (0-indexed)
    pub row: Option<usize>,
    /// Grid column (0-indexed)
    pub column: Option<usize>,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            table: None,
            row: None,
            column: None,
            suggestion: None,
        }
    }

    pub fn in_table(mut self, table: usize) -> Self {
        self.table = Some(table);
        self
    }

    /// Add a grid location
    pub fn with_location(mut self, row: usize, column: usize) -> Self {
        self.row = Some(row);
        self.column = Some(column);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> table 2, row 3, column 1
        //         = help: suggestion

        write!(f, "{}: {}", self.level, self.message)?;

        match (self.table, self.row, self.column) {
            (Some(t), Some(r), Some(c)) => write!(f, "\n  --> table {}, row {}, column {}", t, r, c)?,
            (Some(t), _, _) => write!(f, "\n  --> table {}", t)?,
            (None, Some(r), Some(c)) => write!(f, "\n  --> row {}, column {}", r, c)?,
            _ => {}
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Number of tables found
    pub tables: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} table{}",
            self.tables,
            if self.tables == 1 { "" } else { "s" }
        )];
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if self.is_empty() {
            parts.push("no issues found".to_string());
        }
        parts.join(", ")
    }
}

fn suggestion_for(err: &StructuralError, from: Format) -> Option<&'static str> {
    match (err, from) {
        (StructuralError::EmptyTable, _) => Some("Remove the table or give it at least one cell"),
        (StructuralError::RowOverflow { .. }, Format::AsciiDoc) => {
            Some("Check the cols attribute and the span prefixes of this row")
        }
        (StructuralError::RowOverflow { .. }, _) => {
            Some("A row span from above may be taking columns this row expects")
        }
        (StructuralError::UnterminatedSpan { .. }, _) => {
            Some("Reduce the row span or add the missing rows")
        }
        (StructuralError::AmbiguousMerge { .. }, Format::Hwpx) => {
            Some("Add an explicit hp:cellSpan to the cells around this slot")
        }
        (StructuralError::AmbiguousMerge { .. }, _) => Some("Two cells claim this slot"),
        (StructuralError::NonRectangularMerge { .. }, _) => {
            Some("Only rectangular merges can be represented; split the merged region")
        }
        (StructuralError::IncompleteRow { .. }, _) => Some("Add the missing cells to this row"),
        (StructuralError::OverlappingSpan { .. }, _) => None,
        (StructuralError::TableTooLarge { .. }, _) => {
            Some("Check the declared row/column counts and spans for stray values")
        }
    }
}

fn check_addressed(index: usize, table: &AddressedTable, result: &mut CheckResult) {
    if let Some(declared) = table.row_count {
        if declared < table.rows.len() {
            result.add(
                Diagnostic::new(
                    DiagnosticLevel::Warning,
                    format!(
                        "rowCnt={} but the table has {} row elements",
                        declared,
                        table.rows.len()
                    ),
                )
                .in_table(index),
            );
        }
    }

    for (r, row) in table.rows.iter().enumerate() {
        for record in row {
            if record.address.row != r {
                result.add(
                    Diagnostic::new(
                        DiagnosticLevel::Warning,
                        format!(
                            "cell has rowAddr={} inside row element {}",
                            record.address.row, r
                        ),
                    )
                    .in_table(index)
                    .with_location(r, record.address.col)
                    .with_suggestion("The row element wins; fix rowAddr in the source"),
                );
            }
        }
    }

    let inferred = table
        .records()
        .filter(|(_, cell)| !cell.has_explicit_span())
        .count();
    if inferred > 0 {
        let dims = resolve_dimensions(table);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Info,
                format!(
                    "spans inferred from cell addresses for {} of {} cells ({}x{})",
                    inferred,
                    table.record_count(),
                    dims.rows,
                    dims.cols
                ),
            )
            .in_table(index),
        );
    }
}

/// Check every table of `input` for conversion problems
pub fn check_tables(input: &str, from: Format) -> CheckResult {
    let mut result = CheckResult::new();

    let tables = match parse_tables(input, from) {
        Ok(tables) => tables,
        Err(err) => {
            result.add(Diagnostic::new(DiagnosticLevel::Error, err.to_string()));
            return result;
        }
    };
    result.tables = tables.len();

    if tables.is_empty() {
        result.add(Diagnostic::new(
            DiagnosticLevel::Warning,
            format!("no {} tables found", from),
        ));
        return result;
    }

    for (index, table) in tables.iter().enumerate() {
        if let TableAst::Hwpx(addressed) = table {
            check_addressed(index, addressed, &mut result);
        }

        if let Err(err) = table.build_grid() {
            let mut diag = Diagnostic::new(DiagnosticLevel::Error, err.to_string()).in_table(index);
            if let Some((row, col)) = err.location() {
                diag = diag.with_location(row, col);
            }
            if let Some(suggestion) = suggestion_for(&err, from) {
                diag = diag.with_suggestion(suggestion);
            }
            result.add(diag);
        }
    }

    result
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const HWPX: &str = r#"<hp:tbl rowCnt="1" colCnt="2"><hp:tr><hp:tc><hp:cellAddr colAddr="0" rowAddr="0"/></hp:tc></hp:tr><hp:tr><hp:tc><hp:cellAddr colAddr="0" rowAddr="5"/></hp:tc><hp:tc><hp:cellAddr colAddr="1" rowAddr="1"/></hp:tc></hp:tr></hp:tbl>"#;

    #[test]
    fn test_clean_table() {
        let result = check_tables("|===\n|a |b\n\n|c |d\n|===\n", Format::AsciiDoc);
        assert!(result.is_empty());
        assert_eq!(result.tables, 1);
        assert_eq!(result.summary(), "1 table, no issues found");
    }

    #[test]
    fn test_structural_error_reported() {
        let result = check_tables("|===\n|a |b\n\n|c\n|===\n", Format::AsciiDoc);
        assert!(result.has_errors());
        let diag = &result.diagnostics[0];
        assert_eq!(diag.table, Some(0));
        assert_eq!((diag.row, diag.column), (Some(1), Some(1)));
    }

    #[test]
    fn test_hwpx_oddities() {
        let result = check_tables(HWPX, Format::Hwpx);
        // rowCnt too small, one rowAddr mismatch, inferred spans
        assert_eq!(result.warnings, 2);
        assert_eq!(result.infos, 1);
        assert!(!result.has_errors());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message.contains("rowAddr=5")));
    }

    #[test]
    fn test_parse_error_reported() {
        let result = check_tables("<hp:tbl><hp:tr><hp:tc></hp:tc></hp:tr></hp:tbl>", Format::Hwpx);
        assert!(result.has_errors());
        assert_eq!(result.tables, 0);
    }

    #[test]
    fn test_no_tables() {
        let result = check_tables("<p>text</p>", Format::Html);
        assert_eq!(result.warnings, 1);
    }

    #[test]
    fn test_format_diagnostics() {
        let mut result = CheckResult::new();
        result.tables = 1;
        result.add(
            Diagnostic::new(DiagnosticLevel::Error, "broken")
                .in_table(0)
                .with_location(2, 3)
                .with_suggestion("fix it"),
        );
        let text = format_diagnostics(&result, false);
        assert!(text.contains("error: broken\n  --> table 0, row 2, column 3\n  = help: fix it"));
        assert!(text.ends_with("Summary: 1 table, 1 error"));
    }
}
