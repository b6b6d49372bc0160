//! Markup vocabulary shared by the table readers and writers
//!
//! Namespace URIs written by the XML serializers, the HTML elements that
//! open a new line inside a cell, and named HTML entities accepted in cell
//! text on top of the five XML ones.

use phf::{phf_map, phf_set};

/// HWPX paragraph namespace (`hp:`)
pub const HWPX_PARAGRAPH_NS: &str = "http://www.hancom.co.kr/hwpml/2011/paragraph";

/// ODF table namespace (`table:`)
pub const ODF_TABLE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";

/// ODF text namespace (`text:`)
pub const ODF_TEXT_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

/// HTML elements that start a new line when they open inside a cell
pub static HTML_BLOCK_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "p", "div", "li", "ul", "ol", "dl", "dt", "dd",
    "h1", "h2", "h3", "h4", "h5", "h6",
    "pre", "blockquote", "section", "article", "header", "footer",
};

/// Named HTML entities resolved in cell text
pub static HTML_ENTITIES: phf::Map<&'static str, &'static str> = phf_map! {
    "nbsp" => "\u{a0}",
    "ensp" => "\u{2002}",
    "emsp" => "\u{2003}",
    "thinsp" => "\u{2009}",
    "shy" => "\u{ad}",
    "ndash" => "\u{2013}",
    "mdash" => "\u{2014}",
    "hellip" => "\u{2026}",
    "middot" => "\u{b7}",
    "bull" => "\u{2022}",
    "lsquo" => "\u{2018}",
    "rsquo" => "\u{2019}",
    "ldquo" => "\u{201c}",
    "rdquo" => "\u{201d}",
    "laquo" => "\u{ab}",
    "raquo" => "\u{bb}",
    "copy" => "\u{a9}",
    "reg" => "\u{ae}",
    "trade" => "\u{2122}",
    "deg" => "\u{b0}",
    "plusmn" => "\u{b1}",
    "times" => "\u{d7}",
    "divide" => "\u{f7}",
    "minus" => "\u{2212}",
    "le" => "\u{2264}",
    "ge" => "\u{2265}",
    "ne" => "\u{2260}",
    "euro" => "\u{20ac}",
    "yen" => "\u{a5}",
    "pound" => "\u{a3}",
    "cent" => "\u{a2}",
    "sect" => "\u{a7}",
    "para" => "\u{b6}",
    "larr" => "\u{2190}",
    "rarr" => "\u{2192}",
    "uarr" => "\u{2191}",
    "darr" => "\u{2193}",
};

/// Whether an HTML element name (lowercase) opens a new line in a cell
pub fn is_block_element(name: &str) -> bool {
    HTML_BLOCK_ELEMENTS.contains(name)
}
