//! AsciiDoc table parser
//!
//! Recognizes `|===` blocks, the `cols` attribute above them and the span
//! shorthand in front of each cell separator.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::ast::{ShorthandCell, ShorthandTable};
use crate::core::grid::MAX_DIMENSION;
use crate::utils::error::{ConversionError, ConversionResult};

lazy_static! {
    /// `|===` table delimiter
    static ref DELIMITER: Regex = Regex::new(r"^\|={3,}$").unwrap();

    /// Span operator right before a cell separator: `2+`, `.3+`, `2.3+`
    static ref SPAN_SUFFIX: Regex = Regex::new(r"(?:^|\s)(\d+)?(?:\.(\d+))?\+$").unwrap();

    /// Cell style operator (`a|`, `h|`, `2+a|`), which this parser does not handle
    static ref STYLE_OPERATOR: Regex =
        Regex::new(r"^\s*(?:\d*(?:\.\d+)?\+)?[adehlmsv]\s*$").unwrap();

    /// `cols` entry of a block attribute line
    static ref COLS_ATTR: Regex =
        Regex::new(r#"cols\s*=\s*(?:"([^"]*)"|'([^']*)'|([^,\]\s]+))"#).unwrap();
}

/// Location of a `|===` block in a document (0-based line indices)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlockLines {
    /// First line of the block, including attribute and title lines
    pub start: usize,
    /// Line of the opening delimiter
    pub open: usize,
    /// Line of the closing delimiter
    pub close: usize,
    /// Attribute line without its brackets
    pub attributes: Option<String>,
}

fn is_delimiter(line: &str) -> bool {
    DELIMITER.is_match(line.trim())
}

fn is_title(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('.') && chars.next().is_some_and(|c| !c.is_whitespace() && c != '.')
}

/// Find every `|===` block with the attribute and title lines above it.
pub fn locate_tables(lines: &[&str]) -> ConversionResult<Vec<TableBlockLines>> {
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !is_delimiter(lines[i]) {
            i += 1;
            continue;
        }
        let open = i;
        let close = (open + 1..lines.len())
            .find(|&j| is_delimiter(lines[j]))
            .ok_or_else(|| {
                ConversionError::parse_at_line("table opened with |=== is never closed", open + 1)
            })?;

        let mut start = open;
        let mut attributes = None;
        while start > 0 {
            let prev = lines[start - 1].trim();
            if attributes.is_none() && prev.len() >= 2 && prev.starts_with('[') && prev.ends_with(']')
            {
                attributes = Some(prev[1..prev.len() - 1].to_string());
            } else if !is_title(prev) {
                break;
            }
            start -= 1;
        }

        blocks.push(TableBlockLines {
            start,
            open,
            close,
            attributes,
        });
        i = close + 1;
    }
    Ok(blocks)
}

/// Column count declared by a block attribute line.
///
/// Accepts a plain count (`cols="3"`), a list (`cols="1,2,1"`) and the
/// repeat form (`cols="3*"`, `cols="2*,1"`).
pub fn parse_cols_attribute(attributes: &str) -> Option<usize> {
    let caps = COLS_ATTR.captures(attributes)?;
    let spec = caps.get(1).or(caps.get(2)).or(caps.get(3))?.as_str().trim();

    if !spec.is_empty() && spec.bytes().all(|b| b.is_ascii_digit()) {
        // Oversized counts saturate and are refused when the grid is built
        return Some(spec.parse::<usize>().unwrap_or(usize::MAX)).filter(|&n| n > 0);
    }

    let mut count: usize = 0;
    for item in spec.split([',', ';']).map(str::trim) {
        if item.is_empty() {
            continue;
        }
        let n = match item.split_once('*') {
            Some((n, _)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => {
                n.parse::<usize>().unwrap_or(usize::MAX)
            }
            _ => 1,
        };
        count = count.saturating_add(n);
    }
    (count > 0).then_some(count)
}

/// Parse every table of an AsciiDoc document
pub fn parse_tables(doc: &str) -> ConversionResult<Vec<ShorthandTable>> {
    let lines: Vec<&str> = doc.lines().collect();
    locate_tables(&lines)?
        .iter()
        .map(|block| parse_block(&lines, block))
        .collect()
}

/// Parse the body of one located block
pub fn parse_block(lines: &[&str], block: &TableBlockLines) -> ConversionResult<ShorthandTable> {
    let mut body = BodyParser::default();
    for idx in block.open + 1..block.close {
        body.line(lines[idx], idx + 1)?;
    }
    Ok(ShorthandTable {
        col_count: block.attributes.as_deref().and_then(parse_cols_attribute),
        rows: body.finish(),
        line: Some(block.open + 1),
    })
}

/// Undo the `{empty}` and `{plus}` escapes of the writer
fn unescape_segment(text: &str) -> String {
    text.strip_prefix("{empty}").unwrap_or(text).replace("{plus}", "+")
}

/// Cell being accumulated across lines
#[derive(Debug, Default)]
struct CellBuf {
    col_span: Option<usize>,
    row_span: Option<usize>,
    content: String,
    has_text: bool,
    /// The last segment ended with a hard line break (` +`)
    pending_break: bool,
}

impl CellBuf {
    fn append(&mut self, segment: &str) {
        let mut text = segment.trim();
        let hard_break = text == "+" || text.ends_with(" +");
        if hard_break {
            text = text[..text.len() - 1].trim_end();
        }
        if text.is_empty() && !hard_break {
            return;
        }
        if self.has_text {
            if self.pending_break {
                self.content.push('\n');
            } else if !text.is_empty() {
                self.content.push(' ');
            }
        }
        self.content.push_str(&unescape_segment(text));
        self.has_text = true;
        self.pending_break = hard_break;
    }

    /// Text after a blank line: a new paragraph of the same cell
    fn append_paragraph(&mut self, segment: &str) {
        if self.has_text {
            self.pending_break = true;
        }
        self.append(segment);
    }

    fn into_cell(self) -> ShorthandCell {
        ShorthandCell {
            col_span: self.col_span,
            row_span: self.row_span,
            content: self.content,
        }
    }
}

#[derive(Debug, Default)]
struct BodyParser {
    rows: Vec<Vec<CellBuf>>,
    row: Vec<CellBuf>,
}

impl BodyParser {
    fn line(&mut self, line: &str, line_no: usize) -> ConversionResult<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !self.row.is_empty() {
                self.rows.push(std::mem::take(&mut self.row));
            }
            return Ok(());
        }
        if trimmed.starts_with("//") {
            return Ok(());
        }

        let (lead, cells) = split_cells(line, line_no)?;

        if !lead.trim().is_empty() {
            if let Some(open) = self.row.last_mut() {
                open.append(&lead);
            } else if let Some(prev) = self.rows.last_mut().and_then(|r| r.last_mut()) {
                prev.append_paragraph(&lead);
            } else {
                return Err(ConversionError::parse_at_line(
                    format!("text outside any cell: '{}'", lead.trim()),
                    line_no,
                ));
            }
        }

        for (spans, text) in cells {
            let mut cell = CellBuf::default();
            if let Some((col_span, row_span)) = spans {
                cell.col_span = col_span;
                cell.row_span = row_span;
            }
            cell.append(&text);
            self.row.push(cell);
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<Vec<ShorthandCell>> {
        if !self.row.is_empty() {
            self.rows.push(std::mem::take(&mut self.row));
        }
        self.rows
            .into_iter()
            .map(|row| row.into_iter().map(CellBuf::into_cell).collect())
            .collect()
    }
}

type SpanSpec = (Option<usize>, Option<usize>);

fn span_number(caps: &Captures<'_>, group: usize, line_no: usize) -> ConversionResult<Option<usize>> {
    let Some(m) = caps.get(group) else {
        return Ok(None);
    };
    match m.as_str().parse::<usize>() {
        Ok(0) => Err(ConversionError::parse_at_line(
            "cell span must be at least 1",
            line_no,
        )),
        Ok(n) if n <= MAX_DIMENSION => Ok(Some(n)),
        _ => Err(ConversionError::parse_at_line(
            format!("cell span '{}' is out of range", m.as_str()),
            line_no,
        )),
    }
}

/// Split a body line at unescaped `|` separators.
///
/// Returns the text before the first separator (a continuation of the cell
/// opened earlier) and one `(span operator, text)` pair per separator. A span
/// operator belongs to the separator it directly precedes.
fn split_cells(line: &str, line_no: usize) -> ConversionResult<(String, Vec<(Option<SpanSpec>, String)>)> {
    let mut parts: Vec<String> = vec![String::new()];
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                if let Some(part) = parts.last_mut() {
                    part.push('|');
                }
            }
            '|' => parts.push(String::new()),
            _ => {
                if let Some(part) = parts.last_mut() {
                    part.push(ch);
                }
            }
        }
    }

    let mut specs: Vec<Option<SpanSpec>> = vec![None; parts.len()];
    for k in 0..parts.len() - 1 {
        let found = match SPAN_SUFFIX.captures(&parts[k]) {
            Some(caps) => {
                let col_span = span_number(&caps, 1, line_no)?;
                let row_span = span_number(&caps, 2, line_no)?;
                caps.get(0).map(|m| (m.start(), (col_span, row_span)))
            }
            None => None,
        };
        if let Some((start, spec)) = found {
            parts[k].truncate(start);
            specs[k + 1] = Some(spec);
        } else if k == 0 && STYLE_OPERATOR.is_match(&parts[k]) {
            return Err(ConversionError::unsupported_with_suggestion(
                format!("cell style operator '{}|' (line {})", parts[k].trim(), line_no),
                "remove the style letter in front of '|'",
            ));
        }
    }

    let mut parts = parts.into_iter();
    let lead = parts.next().unwrap_or_default();
    let cells = specs.into_iter().skip(1).zip(parts).collect();
    Ok((lead, cells))
}
