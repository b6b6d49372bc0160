//! Table blocks inside host documents
//!
//! Org files carry AsciiDoc tables in source blocks:
//!
//! ```text
//! #+begin_src asciidoc :name Budget
//! [cols="1,1"]
//! |===
//! 2+|Total
//! |===
//! #+end_src
//! ```
//!
//! AsciiDoc documents carry them directly. Rewriting replaces each block
//! with the converted table, wrapped so the host passes it through
//! untouched (`#+begin_export html`, `++++`).

use std::ops::Range;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::asciidoc::{self, locate_tables};
use crate::core::format::{convert_with_options, parse_tables, Format, TableAst};
use crate::core::options::WriteOptions;
use crate::utils::error::{ConversionError, ConversionOutput, ConversionResult, ConversionWarning};

lazy_static! {
    /// `#+begin_src adoc|asciidoc [header args]` ... `#+end_src`
    static ref ORG_SRC_BLOCK: Regex = Regex::new(
        r"(?im)^[ \t]*#\+begin_src[ \t]+(?:adoc|asciidoc)\b([^\n]*)\n((?s:.*?))^[ \t]*#\+end_src[ \t]*\r?$"
    )
    .unwrap();
}

/// Document kind that hosts the table blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    AsciiDoc,
    Org,
}

/// What to do with a table that fails to convert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Fail the whole document
    #[default]
    Abort,
    /// Leave the table as it was and report a warning
    Skip,
}

/// Options for document-level conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    pub policy: ErrorPolicy,
    pub write: WriteOptions,
}

impl DocumentOptions {
    pub fn skip_errors() -> Self {
        Self {
            policy: ErrorPolicy::Skip,
            ..Self::default()
        }
    }
}

/// One table block of a host document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    /// Byte range of the whole block, delimiters included
    pub range: Range<usize>,
    /// 1-based line the block starts on
    pub line: usize,
    /// AsciiDoc text holding the table(s)
    pub source: String,
    /// Org header arguments in order (`:name Budget` -> `name = "Budget"`)
    pub header_args: IndexMap<String, String>,
}

impl TableBlock {
    pub fn name(&self) -> Option<&str> {
        self.header_args.get("name").map(String::as_str)
    }
}

fn parse_header_args(args: &str) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    let mut key: Option<String> = None;
    let mut value: Vec<&str> = Vec::new();
    for token in args.split_whitespace() {
        if let Some(name) = token.strip_prefix(':') {
            if let Some(k) = key.take() {
                map.insert(k, value.join(" "));
                value.clear();
            }
            key = Some(name.to_ascii_lowercase());
        } else if key.is_some() {
            value.push(token);
        }
    }
    if let Some(k) = key {
        map.insert(k, value.join(" "));
    }
    map
}

fn line_starts(doc: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(doc.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

fn line_of(starts: &[usize], offset: usize) -> usize {
    starts.partition_point(|&s| s <= offset)
}

/// Find every table block of `doc`, in document order
pub fn find_table_blocks(doc: &str, host: Host) -> ConversionResult<Vec<TableBlock>> {
    let starts = line_starts(doc);
    match host {
        Host::Org => Ok(ORG_SRC_BLOCK
            .captures_iter(doc)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(TableBlock {
                    range: whole.range(),
                    line: line_of(&starts, whole.start()),
                    source: caps.get(2).map_or("", |m| m.as_str()).to_string(),
                    header_args: parse_header_args(caps.get(1).map_or("", |m| m.as_str())),
                })
            })
            .collect()),
        Host::AsciiDoc => {
            let lines: Vec<&str> = doc.lines().collect();
            Ok(locate_tables(&lines)?
                .into_iter()
                .map(|block| {
                    let begin = starts[block.start];
                    let end = starts[block.close] + lines[block.close].len();
                    TableBlock {
                        range: begin..end,
                        line: block.start + 1,
                        source: doc[begin..end].to_string(),
                        header_args: IndexMap::new(),
                    }
                })
                .collect())
        }
    }
}

fn convert_block(block: &TableBlock, to: Format, options: &WriteOptions) -> ConversionResult<String> {
    let tables = asciidoc::parse_tables(&block.source)?;
    if tables.is_empty() {
        return Err(ConversionError::invalid("source block holds no |=== table"));
    }
    let mut parts = Vec::with_capacity(tables.len());
    for (i, table) in tables.into_iter().enumerate() {
        let ast = TableAst::AsciiDoc(table);
        parts.push(
            convert_with_options(&ast, to, options)
                .map_err(|e| ConversionError::structural(i, e))?,
        );
    }
    Ok(parts.join("\n"))
}

fn org_export_backend(to: Format) -> &'static str {
    match to {
        Format::Html => "html",
        Format::Odf => "odt",
        Format::Hwpx | Format::AsciiDoc => "xml",
    }
}

fn wrap_block(block: &TableBlock, host: Host, to: Format, body: &str) -> String {
    match (host, to) {
        (Host::AsciiDoc, Format::AsciiDoc) => body.trim_end().to_string(),
        (Host::AsciiDoc, _) => format!("++++\n{}++++", body),
        (Host::Org, Format::AsciiDoc) => {
            let args: String = block
                .header_args
                .iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        format!(" :{}", k)
                    } else {
                        format!(" :{} {}", k, v)
                    }
                })
                .collect();
            format!("#+begin_src asciidoc{}\n{}#+end_src", args, body)
        }
        (Host::Org, _) => {
            let backend = org_export_backend(to);
            let name = block
                .name()
                .map(|n| format!("#+name: {}\n", n))
                .unwrap_or_default();
            format!("{}#+begin_export {}\n{}#+end_export", name, backend, body)
        }
    }
}

/// Convert every table block of `doc` to `to`, in place.
///
/// Text outside the blocks is copied unchanged. Under
/// [`ErrorPolicy::Skip`] a failing block stays as it was and is reported in
/// [`ConversionOutput::warnings`].
pub fn rewrite_table_blocks(
    doc: &str,
    host: Host,
    to: Format,
    options: &DocumentOptions,
) -> ConversionResult<ConversionOutput> {
    let blocks = find_table_blocks(doc, host)?;
    if blocks.is_empty() {
        log::info!("no table blocks found; document left unchanged");
    }

    let mut content = String::with_capacity(doc.len());
    let mut warnings = Vec::new();
    let mut cursor = 0;

    for (index, block) in blocks.iter().enumerate() {
        content.push_str(&doc[cursor..block.range.start]);
        cursor = block.range.end;

        match convert_block(block, to, &options.write) {
            Ok(body) => {
                log::debug!("converted table block {} at line {}", index, block.line);
                content.push_str(&wrap_block(block, host, to, &body));
            }
            Err(err) if options.policy == ErrorPolicy::Skip => {
                log::warn!("table block at line {} left unchanged: {}", block.line, err);
                warnings.push(
                    ConversionWarning::new(format!(
                        "block at line {} left unchanged: {}",
                        block.line, err
                    ))
                    .for_table(index),
                );
                content.push_str(&doc[block.range.clone()]);
            }
            Err(err) => return Err(err),
        }
    }
    content.push_str(&doc[cursor..]);

    Ok(ConversionOutput::with_warnings(content, warnings))
}

/// Convert every table of a standalone source and join the outputs with
/// blank lines.
pub fn convert_document(
    input: &str,
    from: Format,
    to: Format,
    options: &DocumentOptions,
) -> ConversionResult<ConversionOutput> {
    let tables = parse_tables(input, from)?;
    if tables.is_empty() {
        return Err(ConversionError::invalid(format!(
            "no {} tables found in input",
            from
        )));
    }

    let mut parts = Vec::with_capacity(tables.len());
    let mut warnings = Vec::new();
    for (index, table) in tables.iter().enumerate() {
        match convert_with_options(table, to, &options.write) {
            Ok(text) => parts.push(text),
            Err(err) if options.policy == ErrorPolicy::Skip => {
                log::warn!("table {} skipped: {}", index, err);
                warnings.push(
                    ConversionWarning::new(format!("skipped: {}", err)).for_table(index),
                );
            }
            Err(err) => return Err(ConversionError::structural(index, err)),
        }
    }

    Ok(ConversionOutput::with_warnings(parts.join("\n"), warnings))
}
