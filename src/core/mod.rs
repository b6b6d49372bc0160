//! Core conversion modules
//!
//! This module contains the canonical grid and one codec per format:
//! - `grid`: the validated row x column model and its builder
//! - `hwpx`: HWPX `hp:tbl` reader, merge inference and writer
//! - `asciidoc`: AsciiDoc `|===` tables with span shorthand
//! - `html`: HTML `<table>` with `colspan`/`rowspan`
//! - `odf`: OpenDocument `table:table` with covered cells
//! - `format`: dispatch between the formats

pub mod asciidoc;
pub mod format;
pub mod grid;
pub mod html;
pub mod hwpx;
pub mod odf;
pub mod options;

// Re-export main types and functions
pub use format::{
    build_grid, convert, convert_with_options, detect_format, parse_table, parse_tables,
    serialize, serialize_with_options, Format, TableAst,
};
pub use grid::{Cell, CellId, Grid, GridBuilder, GridSlot, MergeStats, Span};
pub use options::{AsciiDocOptions, CellLayout, HtmlOptions, HwpxOptions, OdfOptions, WriteOptions};
