//! ODF table reader (`content.xml` or a flat `.fodt`)

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ast::{OdfEntry, OdfTable};
use crate::core::grid::{MAX_DIMENSION, MAX_SLOTS};
use crate::utils::error::{ConversionError, ConversionResult};
use crate::utils::xml::{count_attr, find_attr, span_attr, xml_text};

/// Largest repeat count expanded for columns, rows or cells
pub const MAX_REPEAT: usize = 4096;

#[derive(Debug)]
enum PendingEntry {
    Cell {
        col_span: usize,
        row_span: usize,
        paragraphs: Vec<String>,
    },
    Covered,
}

#[derive(Debug, Default)]
struct TableFrame {
    slot: usize,
    table: OdfTable,
    row: Option<(Vec<OdfEntry>, usize)>,
    entry: Option<(PendingEntry, usize)>,
    declared_cols: usize,
    /// Depth of open `text:p`/`text:h` inside the current entry
    in_paragraph: usize,
    /// Entries of all rows closed so far, after repeat expansion
    expanded: usize,
}

fn too_large(what: &str, limit: usize) -> ConversionError {
    ConversionError::unsupported_with_suggestion(
        format!("table with more than {} {}", limit, what),
        "repeat counts are expanded; trim the trailing repeated rows or columns",
    )
}

impl TableFrame {
    fn push_text(&mut self, text: &str) {
        if self.in_paragraph == 0 {
            return;
        }
        if let Some((PendingEntry::Cell { paragraphs, .. }, _)) = self.entry.as_mut() {
            if let Some(last) = paragraphs.last_mut() {
                last.push_str(text);
            }
        }
    }

    fn close_entry(&mut self) -> ConversionResult<()> {
        let Some((pending, repeat)) = self.entry.take() else {
            return Ok(());
        };
        let entry = match pending {
            PendingEntry::Cell {
                col_span,
                row_span,
                paragraphs,
            } => OdfEntry::Cell {
                col_span,
                row_span,
                content: paragraphs.join("\n"),
            },
            PendingEntry::Covered => OdfEntry::Covered,
        };
        if let Some((row, _)) = self.row.as_mut() {
            if row.len().saturating_add(repeat) > MAX_DIMENSION {
                return Err(too_large("columns", MAX_DIMENSION));
            }
            row.extend(std::iter::repeat(entry).take(repeat));
        }
        Ok(())
    }

    fn close_row(&mut self) -> ConversionResult<()> {
        self.close_entry()?;
        if let Some((row, repeat)) = self.row.take() {
            self.expanded = self
                .expanded
                .saturating_add(row.len().max(1).saturating_mul(repeat));
            if self.expanded > MAX_SLOTS {
                return Err(too_large("cells", MAX_SLOTS));
            }
            for _ in 0..repeat {
                self.table.rows.push(row.clone());
            }
        }
        Ok(())
    }
}

fn repeat_attr(e: &BytesStart<'_>, name: &[u8]) -> ConversionResult<usize> {
    let n = count_attr(e.attributes(), name)?.unwrap_or(1).max(1);
    if n > MAX_REPEAT {
        return Err(ConversionError::unsupported_with_suggestion(
            format!("{}={}", String::from_utf8_lossy(name), n),
            format!("repeat counts above {} are not expanded", MAX_REPEAT),
        ));
    }
    Ok(n)
}

/// Parse every `table:table` in an ODF XML document, in document order
pub fn parse_tables(xml: &str) -> ConversionResult<Vec<OdfTable>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<TableFrame> = Vec::new();
    let mut tables: Vec<Option<OdfTable>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => start_element(&e, &mut stack, &mut tables)?,
            Event::Empty(e) => {
                start_element(&e, &mut stack, &mut tables)?;
                end_element(e.local_name().as_ref(), &mut stack, &mut tables)?;
            }
            Event::End(e) => end_element(e.local_name().as_ref(), &mut stack, &mut tables)?,
            Event::Text(t) => {
                if let Some(frame) = stack.last_mut() {
                    if frame.in_paragraph > 0 {
                        let text = xml_text(&t)?;
                        frame.push_text(&text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ConversionError::parse("table:table is never closed"));
    }
    Ok(tables.into_iter().flatten().collect())
}

fn start_element(
    e: &BytesStart<'_>,
    stack: &mut Vec<TableFrame>,
    tables: &mut Vec<Option<OdfTable>>,
) -> ConversionResult<()> {
    let name = e.local_name();
    if name.as_ref() == b"table" {
        stack.push(TableFrame {
            slot: tables.len(),
            table: OdfTable {
                name: find_attr(e.attributes(), b"name")?,
                ..OdfTable::default()
            },
            ..TableFrame::default()
        });
        tables.push(None);
        return Ok(());
    }

    let Some(frame) = stack.last_mut() else {
        return Ok(());
    };

    match name.as_ref() {
        b"table-column" => {
            frame.declared_cols += repeat_attr(e, b"number-columns-repeated")?;
        }
        b"table-row" => {
            frame.close_row()?;
            frame.row = Some((Vec::new(), repeat_attr(e, b"number-rows-repeated")?));
        }
        b"table-cell" => {
            frame.close_entry()?;
            let col_span = span_attr(e.attributes(), b"number-columns-spanned")?.unwrap_or(1);
            let row_span = span_attr(e.attributes(), b"number-rows-spanned")?.unwrap_or(1);
            let repeat = repeat_attr(e, b"number-columns-repeated")?;
            frame.entry = Some((
                PendingEntry::Cell {
                    col_span,
                    row_span,
                    paragraphs: Vec::new(),
                },
                repeat,
            ));
        }
        b"covered-table-cell" => {
            frame.close_entry()?;
            let repeat = repeat_attr(e, b"number-columns-repeated")?;
            frame.entry = Some((PendingEntry::Covered, repeat));
        }
        b"p" | b"h" => {
            if let Some((PendingEntry::Cell { paragraphs, .. }, _)) = frame.entry.as_mut() {
                if frame.in_paragraph == 0 {
                    paragraphs.push(String::new());
                }
                frame.in_paragraph += 1;
            }
        }
        b"line-break" => frame.push_text("\n"),
        b"tab" => frame.push_text("\t"),
        b"s" => {
            let n = count_attr(e.attributes(), b"c")?.unwrap_or(1).min(MAX_REPEAT);
            frame.push_text(&" ".repeat(n));
        }
        _ => {}
    }
    Ok(())
}

fn end_element(
    name: &[u8],
    stack: &mut Vec<TableFrame>,
    tables: &mut [Option<OdfTable>],
) -> ConversionResult<()> {
    if name == b"table" {
        if let Some(mut frame) = stack.pop() {
            frame.close_row()?;
            if frame.declared_cols > 0 {
                frame.table.col_count = Some(frame.declared_cols);
            }
            if let Some(entry) = tables.get_mut(frame.slot) {
                *entry = Some(frame.table);
            }
        }
        return Ok(());
    }

    let Some(frame) = stack.last_mut() else {
        return Ok(());
    };
    match name {
        b"p" | b"h" => frame.in_paragraph = frame.in_paragraph.saturating_sub(1),
        b"table-cell" | b"covered-table-cell" => {
            frame.in_paragraph = 0;
            frame.close_entry()?;
        }
        b"table-row" => frame.close_row()?,
        _ => {}
    }
    Ok(())
}
