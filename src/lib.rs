//! # cellspan
//!
//! Merge-preserving table codec between HWPX, AsciiDoc, HTML and ODF.
//!
//! ## Features
//!
//! - **Canonical Grid**: every format is read into one validated row x column model
//! - **Merge Inference**: spans of HWPX cells are recovered from their addresses
//! - **Lossless**: merges survive any round trip, or the conversion fails loudly
//! - **Round-Trip Validation**: itemized diffs instead of a yes/no answer
//! - **Document Blocks**: converts AsciiDoc tables inside Org and AsciiDoc documents
//!
//! ## Usage Examples
//!
//! ### Table Conversion
//!
//! ```rust
//! use cellspan::{convert_text, Format};
//!
//! let adoc = "[cols=\"1,1,1\"]\n|===\n.2+|Labor\n2+|Q1\n\n|a\n|b\n|===\n";
//! let html = convert_text(adoc, Format::AsciiDoc, Format::Html).unwrap();
//! assert!(html.contains("<td rowspan=\"2\">Labor</td>"));
//! assert!(html.contains("<td colspan=\"2\">Q1</td>"));
//! ```
//!
//! ### Working With the Grid
//!
//! ```rust
//! use cellspan::{parse_table, serialize, Format};
//!
//! let hwpx = r#"<hp:tbl rowCnt="2" colCnt="2">
//!   <hp:tr>
//!     <hp:tc><hp:subList><hp:p><hp:run><hp:t>A</hp:t></hp:run></hp:p></hp:subList><hp:cellAddr colAddr="0" rowAddr="0"/></hp:tc>
//!   </hp:tr>
//!   <hp:tr>
//!     <hp:tc><hp:cellAddr colAddr="0" rowAddr="1"/></hp:tc>
//!     <hp:tc><hp:cellAddr colAddr="1" rowAddr="1"/></hp:tc>
//!   </hp:tr>
//! </hp:tbl>"#;
//!
//! let grid = parse_table(hwpx, Format::Hwpx).unwrap().build_grid().unwrap();
//! assert_eq!(grid.cells()[0].col_span, 2);
//! assert!(serialize(&grid, Format::AsciiDoc).contains("2+|A"));
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - static vocabulary
pub mod data;

/// Feature modules - document-level conversion and validation
pub mod features;

/// Utility modules
pub mod utils;

// Re-export core conversion functions
pub use core::format::{
    build_grid, convert, convert_with_options, detect_format, parse_table, parse_tables,
    serialize, serialize_with_options, Format, TableAst,
};
pub use core::grid::{
    Cell, CellId, Grid, GridBuilder, GridSlot, MergeStats, Span, MAX_DIMENSION, MAX_SLOTS,
};
pub use core::options::{
    AsciiDocOptions, CellLayout, HtmlOptions, HwpxOptions, OdfOptions, WriteOptions,
};

// Re-export per-format codecs
pub use core::asciidoc;
pub use core::html;
pub use core::hwpx;
pub use core::odf;

// Re-export feature modules
pub use features::blocks;
pub use features::blocks::{
    convert_document, find_table_blocks, rewrite_table_blocks, DocumentOptions, ErrorPolicy, Host,
};
pub use features::roundtrip;
pub use features::roundtrip::{roundtrip_report, validate_roundtrip, RoundTripDiff, RoundTripReport};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::diagnostics::{check_tables, format_diagnostics};
pub use utils::error::{
    ConversionError, ConversionOutput, ConversionResult, ConversionWarning, StructuralError,
};

/// Convert every table of `input` from one format to another
///
/// # Arguments
/// * `input` - source text holding one or more tables
/// * `from` - format of `input`
/// * `to` - target format
///
/// # Returns
/// The converted tables, separated by blank lines
pub fn convert_text(input: &str, from: Format, to: Format) -> ConversionResult<String> {
    convert_text_with_options(input, from, to, &WriteOptions::default())
}

/// Convert every table of `input` with custom write options
pub fn convert_text_with_options(
    input: &str,
    from: Format,
    to: Format,
    options: &WriteOptions,
) -> ConversionResult<String> {
    let options = DocumentOptions {
        policy: ErrorPolicy::Abort,
        write: options.clone(),
    };
    Ok(convert_document(input, from, to, &options)?.content)
}

/// Convert with automatic source format detection
///
/// Returns the converted text and the detected source format.
pub fn convert_auto(input: &str, to: Format) -> ConversionResult<(String, Format)> {
    let from = detect_format(input).ok_or_else(|| {
        ConversionError::invalid("could not detect the table format of the input")
    })?;
    Ok((convert_text(input, from, to)?, from))
}
