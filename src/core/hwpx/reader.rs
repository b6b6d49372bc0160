//! HWPX section reader
//!
//! Pulls every `hp:tbl` out of a section document (or a bare table
//! fragment) as structural rows of addressed records. Elements are matched
//! by local name, so the namespace prefix does not matter.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ast::{AddressedCell, AddressedTable, SourceAddress};
use crate::utils::error::{ConversionError, ConversionResult};
use crate::utils::xml::{count_attr, span_attr, xml_text};

#[derive(Debug, Default)]
struct CellFrame {
    address: Option<SourceAddress>,
    col_span: Option<usize>,
    row_span: Option<usize>,
    paragraphs: Vec<String>,
    /// Depth of open `hp:t` elements
    in_text: usize,
}

impl CellFrame {
    fn paragraph(&mut self) -> &mut String {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(String::new());
        }
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }
}

#[derive(Debug)]
struct TableFrame {
    /// Index reserved in the output so tables keep document order
    slot: usize,
    table: AddressedTable,
    row: Option<Vec<AddressedCell>>,
    cell: Option<CellFrame>,
}

/// Parse every table in `xml`, outer tables before the tables nested in
/// their cells.
pub fn parse_tables(xml: &str) -> ConversionResult<Vec<AddressedTable>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<TableFrame> = Vec::new();
    let mut tables: Vec<Option<AddressedTable>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => start_element(&e, false, &mut stack, &mut tables)?,
            Event::Empty(e) => {
                start_element(&e, true, &mut stack, &mut tables)?;
                end_element(e.local_name().as_ref(), &mut stack, &mut tables)?;
            }
            Event::End(e) => end_element(e.local_name().as_ref(), &mut stack, &mut tables)?,
            Event::Text(t) => {
                if let Some(cell) = current_text_cell(&mut stack) {
                    let text = xml_text(&t)?;
                    cell.paragraph().push_str(&text);
                }
            }
            Event::CData(t) => {
                if let Some(cell) = current_text_cell(&mut stack) {
                    let text = String::from_utf8_lossy(&t).into_owned();
                    cell.paragraph().push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ConversionError::parse("hp:tbl is never closed"));
    }
    Ok(tables.into_iter().flatten().collect())
}

fn current_text_cell(stack: &mut [TableFrame]) -> Option<&mut CellFrame> {
    stack
        .last_mut()
        .and_then(|frame| frame.cell.as_mut())
        .filter(|cell| cell.in_text > 0)
}

fn start_element(
    e: &BytesStart<'_>,
    empty: bool,
    stack: &mut Vec<TableFrame>,
    tables: &mut Vec<Option<AddressedTable>>,
) -> ConversionResult<()> {
    let name = e.local_name();
    match name.as_ref() {
        b"tbl" => {
            let table = AddressedTable {
                row_count: count_attr(e.attributes(), b"rowCnt")?,
                col_count: count_attr(e.attributes(), b"colCnt")?,
                rows: Vec::new(),
            };
            stack.push(TableFrame {
                slot: tables.len(),
                table,
                row: None,
                cell: None,
            });
            tables.push(None);
        }
        b"tr" => {
            if let Some(frame) = stack.last_mut() {
                frame.row = Some(Vec::new());
            }
        }
        b"tc" => {
            if let Some(frame) = stack.last_mut() {
                frame.cell = Some(CellFrame::default());
            }
        }
        b"cellAddr" => {
            if let Some(cell) = stack.last_mut().and_then(|f| f.cell.as_mut()) {
                let col = count_attr(e.attributes(), b"colAddr")?;
                let row = count_attr(e.attributes(), b"rowAddr")?;
                match (col, row) {
                    (Some(col), Some(row)) => cell.address = Some(SourceAddress { col, row }),
                    _ => {
                        return Err(ConversionError::parse(
                            "hp:cellAddr needs both colAddr and rowAddr",
                        ))
                    }
                }
            }
        }
        b"cellSpan" => {
            if let Some(cell) = stack.last_mut().and_then(|f| f.cell.as_mut()) {
                cell.col_span = span_attr(e.attributes(), b"colSpan")?;
                cell.row_span = span_attr(e.attributes(), b"rowSpan")?;
            }
        }
        b"p" => {
            if let Some(cell) = stack.last_mut().and_then(|f| f.cell.as_mut()) {
                cell.paragraphs.push(String::new());
            }
        }
        b"t" if !empty => {
            if let Some(cell) = stack.last_mut().and_then(|f| f.cell.as_mut()) {
                cell.in_text += 1;
            }
        }
        b"lineBreak" => {
            if let Some(cell) = current_text_cell(stack) {
                cell.paragraph().push('\n');
            }
        }
        b"tab" => {
            if let Some(cell) = current_text_cell(stack) {
                cell.paragraph().push('\t');
            }
        }
        _ => {}
    }
    Ok(())
}

fn end_element(
    name: &[u8],
    stack: &mut Vec<TableFrame>,
    tables: &mut [Option<AddressedTable>],
) -> ConversionResult<()> {
    match name {
        b"t" => {
            if let Some(cell) = stack.last_mut().and_then(|f| f.cell.as_mut()) {
                cell.in_text = cell.in_text.saturating_sub(1);
            }
        }
        b"tc" => {
            let Some(frame) = stack.last_mut() else {
                return Ok(());
            };
            let Some(cell) = frame.cell.take() else {
                return Ok(());
            };
            let row_index = frame.table.rows.len();
            let address = cell.address.ok_or_else(|| {
                ConversionError::parse(format!("hp:tc in row {} has no hp:cellAddr", row_index))
            })?;
            let record = AddressedCell {
                address,
                col_span: cell.col_span,
                row_span: cell.row_span,
                content: cell.paragraphs.join("\n"),
            };
            match frame.row.as_mut() {
                Some(row) => row.push(record),
                None => return Err(ConversionError::parse("hp:tc outside of hp:tr")),
            }
        }
        b"tr" => {
            if let Some(frame) = stack.last_mut() {
                if let Some(row) = frame.row.take() {
                    frame.table.rows.push(row);
                }
            }
        }
        b"tbl" => {
            if let Some(frame) = stack.pop() {
                if let Some(slot) = tables.get_mut(frame.slot) {
                    *slot = Some(frame.table);
                }
            }
        }
        _ => {}
    }
    Ok(())
}
