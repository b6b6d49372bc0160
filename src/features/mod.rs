//! Feature modules - Work on top of the table codecs
//!
//! This module contains the document-level features:
//! - Round-trip validation of a table through another format
//! - Table blocks inside Org and AsciiDoc documents

pub mod blocks;
pub mod roundtrip;

// Re-export commonly used types
pub use blocks::{
    convert_document, find_table_blocks, rewrite_table_blocks, DocumentOptions, ErrorPolicy, Host,
    TableBlock,
};
pub use roundtrip::{
    compare_grids, roundtrip_report, validate_roundtrip, validate_roundtrip_with_options,
    Divergence, RoundTripDiff, RoundTripReport, Stage,
};
