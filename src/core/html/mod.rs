//! HTML Table Codec
//!
//! The HTML intermediate between the markup and the word-processor output.
//! Spans are explicit (`colspan`, `rowspan`) and covered slots have no
//! `<td>`, so assembly is the same cursor walk as for AsciiDoc.

mod ast;
mod reader;
mod writer;


pub use ast::{HtmlCell, HtmlTable};
pub use reader::{parse_first_table, parse_tables};
pub use writer::write_html;
