//! HTML table reader
//!
//! Tolerant of the HTML found in rendered documents: missing end tags for
//! cells and rows, void elements without a slash, unquoted attributes and
//! named entities. Tags are matched case-insensitively.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ast::{HtmlCell, HtmlTable};
use crate::data::markup::is_block_element;
use crate::utils::error::{ConversionError, ConversionResult};
use crate::utils::text::{collapse_spaces, tidy_lines};
use crate::utils::xml::{html_text, span_attr};

#[derive(Debug, Default)]
struct TableFrame {
    slot: usize,
    table: HtmlTable,
    row: Option<Vec<HtmlCell>>,
    cell: Option<HtmlCell>,
    in_caption: bool,
    declared_cols: usize,
    /// `span` of an open `<colgroup>` not yet overridden by `<col>` children
    colgroup_span: Option<usize>,
}

impl TableFrame {
    fn close_cell(&mut self) {
        if let Some(mut cell) = self.cell.take() {
            cell.content = tidy_lines(&cell.content);
            self.row.get_or_insert_with(Vec::new).push(cell);
        }
    }

    fn close_row(&mut self) {
        self.close_cell();
        if let Some(row) = self.row.take() {
            self.table.rows.push(row);
        }
    }

    fn finish(mut self) -> HtmlTable {
        self.close_row();
        if self.declared_cols > 0 {
            self.table.col_count = Some(self.declared_cols);
        }
        self.table.caption = self
            .table
            .caption
            .map(|c| collapse_spaces(&c).trim().to_string())
            .filter(|c| !c.is_empty());
        self.table
    }
}

fn lowercase_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase()
}

/// Parse every `<table>` in an HTML document or fragment
pub fn parse_tables(html: &str) -> ConversionResult<Vec<HtmlTable>> {
    let mut reader = Reader::from_str(html);
    {
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
    }

    let mut stack: Vec<TableFrame> = Vec::new();
    let mut tables: Vec<Option<HtmlTable>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => start_element(&lowercase_name(&e), &e, false, &mut stack, &mut tables)?,
            Event::Empty(e) => {
                let name = lowercase_name(&e);
                start_element(&name, &e, true, &mut stack, &mut tables)?;
                end_element(&name, &mut stack, &mut tables);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                end_element(&name, &mut stack, &mut tables);
            }
            Event::Text(t) => {
                if let Some(frame) = stack.last_mut() {
                    let text = html_text(&t);
                    if let Some(cell) = frame.cell.as_mut() {
                        cell.content.push_str(&collapse_spaces(&text));
                    } else if frame.in_caption {
                        frame
                            .table
                            .caption
                            .get_or_insert_with(String::new)
                            .push_str(&text);
                    }
                }
            }
            Event::CData(t) => {
                if let Some(cell) = stack.last_mut().and_then(|f| f.cell.as_mut()) {
                    cell.content.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Unclosed tables end with the document
    while let Some(frame) = stack.pop() {
        log::warn!("<table> without end tag; closing at end of input");
        let slot = frame.slot;
        if let Some(entry) = tables.get_mut(slot) {
            *entry = Some(frame.finish());
        }
    }
    Ok(tables.into_iter().flatten().collect())
}

fn start_element(
    name: &str,
    e: &BytesStart<'_>,
    empty: bool,
    stack: &mut Vec<TableFrame>,
    tables: &mut Vec<Option<HtmlTable>>,
) -> ConversionResult<()> {
    if name == "table" {
        stack.push(TableFrame {
            slot: tables.len(),
            ..TableFrame::default()
        });
        tables.push(None);
        return Ok(());
    }

    let Some(frame) = stack.last_mut() else {
        return Ok(());
    };

    match name {
        "caption" if !empty => frame.in_caption = true,
        "colgroup" => {
            frame.colgroup_span = Some(span_attr(e.html_attributes(), b"span")?.unwrap_or(1));
        }
        "col" => {
            frame.colgroup_span = None;
            frame.declared_cols += span_attr(e.html_attributes(), b"span")?.unwrap_or(1);
        }
        "tr" => {
            frame.close_row();
            frame.row = Some(Vec::new());
        }
        "td" | "th" => {
            frame.close_cell();
            let col_span = span_attr(e.html_attributes(), b"colspan")?.unwrap_or(1);
            let row_span = span_attr(e.html_attributes(), b"rowspan")?.unwrap_or(1);
            frame.cell = Some(HtmlCell {
                col_span,
                row_span,
                content: String::new(),
                header: name == "th",
            });
        }
        "br" => {
            if let Some(cell) = frame.cell.as_mut() {
                cell.content.push('\n');
            }
        }
        _ if is_block_element(name) => {
            if let Some(cell) = frame.cell.as_mut() {
                if !cell.content.trim().is_empty() && !cell.content.ends_with('\n') {
                    cell.content.push('\n');
                }
            }
        }
        "thead" | "tbody" | "tfoot" => frame.close_row(),
        _ => {}
    }
    Ok(())
}

fn end_element(name: &str, stack: &mut Vec<TableFrame>, tables: &mut [Option<HtmlTable>]) {
    if name == "table" {
        if let Some(frame) = stack.pop() {
            let slot = frame.slot;
            if let Some(entry) = tables.get_mut(slot) {
                *entry = Some(frame.finish());
            }
        }
        return;
    }

    let Some(frame) = stack.last_mut() else {
        return;
    };
    match name {
        "caption" => frame.in_caption = false,
        "colgroup" => {
            if let Some(span) = frame.colgroup_span.take() {
                frame.declared_cols += span;
            }
        }
        "td" | "th" => frame.close_cell(),
        "tr" | "thead" | "tbody" | "tfoot" => frame.close_row(),
        _ => {}
    }
}

/// Parse the first table of an HTML document
pub fn parse_first_table(html: &str) -> ConversionResult<HtmlTable> {
    parse_tables(html)?
        .into_iter()
        .next()
        .ok_or_else(|| ConversionError::invalid("no <table> element found"))
}
