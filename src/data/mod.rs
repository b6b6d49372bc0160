//! Data layer - Static vocabulary
//!
//! This module contains the static data used by the table codecs:
//! - XML namespace URIs
//! - HTML block elements and named entities

pub mod markup;

// Re-export commonly used items
pub use markup::{
    is_block_element, HTML_BLOCK_ELEMENTS, HTML_ENTITIES, HWPX_PARAGRAPH_NS, ODF_TABLE_NS,
    ODF_TEXT_NS,
};
