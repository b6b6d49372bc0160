//! HWPX Table Codec
//!
//! HWPX stores a table as structural rows of physical cells. Every cell
//! carries its top-left grid address; the span element is optional:
//!
//! ```text
//! <hp:tbl rowCnt="2" colCnt="3">
//!   <hp:tr>
//!     <hp:tc> ... <hp:cellAddr colAddr="0" rowAddr="0"/> </hp:tc>   colspan 2
//!     <hp:tc> ... <hp:cellAddr colAddr="2" rowAddr="0"/> </hp:tc>   rowspan 2
//!   </hp:tr>
//!   <hp:tr>
//!     <hp:tc> ... <hp:cellAddr colAddr="0" rowAddr="1"/> </hp:tc>
//!     <hp:tc> ... <hp:cellAddr colAddr="1" rowAddr="1"/> </hp:tc>
//!   </hp:tr>
//! </hp:tbl>
//! ```
//!
//! Covered slots have no record at all. [`infer_grid`] turns the records
//! into a [`Grid`](crate::core::grid::Grid), inferring spans from the
//! address gaps where `hp:cellSpan` is missing.

mod ast;
mod infer;
mod reader;
mod writer;


pub use ast::{AddressedCell, AddressedTable, SourceAddress};
pub use infer::{infer_grid, resolve_dimensions, Dimensions};
pub use reader::parse_tables;
pub use writer::write_hwpx;
