//! ODF Table Codec
//!
//! OpenDocument tables are dense: each row lists one entry per column.
//! A merged cell is a `table:table-cell` with `number-columns-spanned` /
//! `number-rows-spanned`, and every other slot it covers is written as a
//! `table:covered-table-cell` placeholder.
//!
//! Repeat attributes (`number-columns-repeated`, `number-rows-repeated`)
//! are expanded on read up to [`MAX_REPEAT`].

mod ast;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use ast::{OdfEntry, OdfTable};
pub use reader::{parse_tables, MAX_REPEAT};
pub use writer::write_odf;
