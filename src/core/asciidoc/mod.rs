//! AsciiDoc Table Codec
//!
//! Reads and writes AsciiDoc tables whose merges use the span shorthand:
//!
//! ```text
//! [cols="1,1,1,1"]
//! |===
//! 2+|Total
//! |x
//! |y
//!
//! .2+|Labor
//! |a
//! |b
//! |c
//!
//! |d
//! |e
//! |f
//! |===
//! ```
//!
//! `c+|` spans `c` columns, `.r+|` spans `r` rows, `c.r+|` both. A blank
//! line ends a row. The column count comes from the `cols` attribute, or
//! from the width of the first row.

mod ast;
mod parser;
mod writer;


pub use ast::{ShorthandCell, ShorthandTable};
pub use parser::{
    locate_tables, parse_block, parse_cols_attribute, parse_tables, TableBlockLines,
};
pub use writer::{escape_cell, span_prefix, write_asciidoc};
