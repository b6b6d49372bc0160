//! Format dispatch
//!
//! Ties the per-format readers and writers to the canonical [`Grid`].

use std::fmt;
use std::str::FromStr;

use crate::core::asciidoc::{self, ShorthandTable};
use crate::core::grid::Grid;
use crate::core::html::{self, HtmlTable};
use crate::core::hwpx::{self, AddressedTable};
use crate::core::odf::{self, OdfTable};
use crate::core::options::WriteOptions;
use crate::utils::error::{ConversionError, ConversionResult, StructuralError};

/// A table representation the codec reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// HWPX section XML (`hp:tbl`)
    Hwpx,
    /// AsciiDoc `|===` table
    AsciiDoc,
    /// HTML `<table>`
    Html,
    /// OpenDocument `table:table`
    Odf,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Hwpx, Format::AsciiDoc, Format::Html, Format::Odf];

    pub fn name(self) -> &'static str {
        match self {
            Format::Hwpx => "hwpx",
            Format::AsciiDoc => "asciidoc",
            Format::Html => "html",
            Format::Odf => "odf",
        }
    }

    /// Preferred file extension for output
    pub fn extension(self) -> &'static str {
        match self {
            Format::Hwpx => "xml",
            Format::AsciiDoc => "adoc",
            Format::Html => "html",
            Format::Odf => "fodt",
        }
    }

    /// Guess the format from a file name or bare extension.
    ///
    /// `.xml` is ambiguous between HWPX sections and ODF `content.xml`;
    /// `content.xml` and `*.odt.xml` map to ODF, other `.xml` to HWPX.
    pub fn from_extension(path: &str) -> Option<Format> {
        let lower = path.to_ascii_lowercase();
        let file = lower.rsplit(['/', '\\']).next().unwrap_or(&lower);
        if file == "content.xml" || file.ends_with(".odt.xml") {
            return Some(Format::Odf);
        }
        let ext = file.rsplit('.').next().unwrap_or(file);
        match ext {
            "hwpx" | "xml" | "hwpml" => Some(Format::Hwpx),
            "adoc" | "asciidoc" | "asc" => Some(Format::AsciiDoc),
            "html" | "htm" | "xhtml" => Some(Format::Html),
            "fodt" | "fods" | "odf" => Some(Format::Odf),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hwpx" | "hwp" | "hwpml" => Ok(Format::Hwpx),
            "asciidoc" | "adoc" => Ok(Format::AsciiDoc),
            "html" | "htm" => Ok(Format::Html),
            "odf" | "odt" | "fodt" => Ok(Format::Odf),
            other => Err(ConversionError::invalid(format!(
                "unknown format '{}' (expected hwpx, asciidoc, html or odf)",
                other
            ))),
        }
    }
}

/// A parsed source table, tagged with the format it came from
#[derive(Debug, Clone, PartialEq)]
pub enum TableAst {
    Hwpx(AddressedTable),
    AsciiDoc(ShorthandTable),
    Html(HtmlTable),
    Odf(OdfTable),
}

impl TableAst {
    pub fn format(&self) -> Format {
        match self {
            TableAst::Hwpx(_) => Format::Hwpx,
            TableAst::AsciiDoc(_) => Format::AsciiDoc,
            TableAst::Html(_) => Format::Html,
            TableAst::Odf(_) => Format::Odf,
        }
    }

    /// Resolve the table into a validated grid
    pub fn build_grid(&self) -> Result<Grid, StructuralError> {
        match self {
            TableAst::Hwpx(table) => hwpx::infer_grid(table),
            TableAst::AsciiDoc(table) => table.build_grid(),
            TableAst::Html(table) => table.build_grid(),
            TableAst::Odf(table) => table.build_grid(),
        }
    }
}

impl From<AddressedTable> for TableAst {
    fn from(table: AddressedTable) -> Self {
        TableAst::Hwpx(table)
    }
}

impl From<ShorthandTable> for TableAst {
    fn from(table: ShorthandTable) -> Self {
        TableAst::AsciiDoc(table)
    }
}

impl From<HtmlTable> for TableAst {
    fn from(table: HtmlTable) -> Self {
        TableAst::Html(table)
    }
}

impl From<OdfTable> for TableAst {
    fn from(table: OdfTable) -> Self {
        TableAst::Odf(table)
    }
}

pub fn build_grid(input: &TableAst) -> Result<Grid, StructuralError> {
    input.build_grid()
}

/// Write a grid in `to` with default options
pub fn serialize(grid: &Grid, to: Format) -> String {
    serialize_with_options(grid, to, &WriteOptions::default())
}

pub fn serialize_with_options(grid: &Grid, to: Format, options: &WriteOptions) -> String {
    match to {
        Format::Hwpx => hwpx::write_hwpx(grid, &options.hwpx),
        Format::AsciiDoc => asciidoc::write_asciidoc(grid, &options.asciidoc),
        Format::Html => html::write_html(grid, &options.html),
        Format::Odf => odf::write_odf(grid, &options.odf),
    }
}

/// Convert one parsed table into the text of another format
pub fn convert(input: &TableAst, to: Format) -> Result<String, StructuralError> {
    convert_with_options(input, to, &WriteOptions::default())
}

pub fn convert_with_options(
    input: &TableAst,
    to: Format,
    options: &WriteOptions,
) -> Result<String, StructuralError> {
    let grid = input.build_grid()?;
    Ok(serialize_with_options(&grid, to, options))
}

/// Parse every table of `input`, in document order
pub fn parse_tables(input: &str, from: Format) -> ConversionResult<Vec<TableAst>> {
    let tables = match from {
        Format::Hwpx => hwpx::parse_tables(input)?
            .into_iter()
            .map(TableAst::from)
            .collect(),
        Format::AsciiDoc => asciidoc::parse_tables(input)?
            .into_iter()
            .map(TableAst::from)
            .collect(),
        Format::Html => html::parse_tables(input)?
            .into_iter()
            .map(TableAst::from)
            .collect(),
        Format::Odf => odf::parse_tables(input)?
            .into_iter()
            .map(TableAst::from)
            .collect(),
    };
    Ok(tables)
}

/// Parse the first table of `input`
pub fn parse_table(input: &str, from: Format) -> ConversionResult<TableAst> {
    parse_tables(input, from)?
        .into_iter()
        .next()
        .ok_or_else(|| ConversionError::invalid(format!("no {} table found in input", from)))
}

/// Guess the format of `input` from its content
pub fn detect_format(input: &str) -> Option<Format> {
    let hwpx_score = if input.contains("cellAddr") { 10 } else { 0 }
        + if input.contains("hp:tbl") { 5 } else { 0 }
        + if input.contains("hwpml") { 3 } else { 0 };
    let odf_score = if input.contains("covered-table-cell") { 10 } else { 0 }
        + if input.contains("table:table") { 5 } else { 0 }
        + if input.contains("opendocument") { 3 } else { 0 };
    let html_score = if input.contains("<table") || input.contains("<TABLE") {
        5
    } else {
        0
    } + if input.contains("<td") || input.contains("<TD") {
        3
    } else {
        0
    };
    let asciidoc_score = input
        .lines()
        .filter(|line| line.trim_end().starts_with("|==="))
        .count()
        * 4;

    [
        (Format::Hwpx, hwpx_score),
        (Format::Odf, odf_score),
        (Format::Html, html_score),
        (Format::AsciiDoc, asciidoc_score),
    ]
    .into_iter()
    .filter(|&(_, score)| score > 0)
    .max_by_key(|&(_, score)| score)
    .map(|(format, _)| format)
}
