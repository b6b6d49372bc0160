//! Regression tests for the ODF table codec

use pretty_assertions::assert_eq;

use super::*;
use crate::core::grid::Span;
use crate::core::options::OdfOptions;
use crate::utils::error::{ConversionError, StructuralError};

const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
    xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"
    xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
  <office:body><office:text>
    <table:table table:name="Budget">
      <table:table-column table:number-columns-repeated="2"/>
      <table:table-column/>
      <table:table-header-rows>
        <table:table-row>
          <table:table-cell table:number-columns-spanned="2"><text:p>Head</text:p></table:table-cell>
          <table:covered-table-cell/>
          <table:table-cell table:number-rows-spanned="2"><text:p>Side</text:p></table:table-cell>
        </table:table-row>
      </table:table-header-rows>
      <table:table-row>
        <table:table-cell><text:p>a<text:line-break/>b</text:p><text:p>c<text:s text:c="2"/>d</text:p></table:table-cell>
        <table:table-cell><text:h>x &amp; y</text:h></table:table-cell>
        <table:covered-table-cell/>
      </table:table-row>
    </table:table>
  </office:text></office:body>
</office:document-content>"#;

#[test]
fn test_parse_content() {
    let tables = parse_tables(CONTENT).unwrap();
    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(table.name.as_deref(), Some("Budget"));
    assert_eq!(table.col_count, Some(3));
    assert_eq!(table.rows[0][0], OdfEntry::spanning(2, 1, "Head"));
    assert_eq!(table.rows[0][1], OdfEntry::Covered);
    assert_eq!(table.rows[1][0], OdfEntry::cell("a\nb\nc  d"));
    assert_eq!(table.rows[1][1], OdfEntry::cell("x & y"));

    let grid = table.build_grid().unwrap();
    assert_eq!(grid.row_count(), 2);
    assert_eq!(
        grid.spans(),
        vec![
            Span::new(0, 0, 1, 2),
            Span::new(0, 2, 2, 1),
            Span::new(1, 0, 1, 1),
            Span::new(1, 1, 1, 1),
        ]
    );
}

#[test]
fn test_repeats_expanded() {
    let xml = r#"<table:table xmlns:table="urn:t" xmlns:text="urn:x">
  <table:table-row table:number-rows-repeated="2">
    <table:table-cell table:number-columns-repeated="3"><text:p>z</text:p></table:table-cell>
  </table:table-row>
</table:table>"#;
    let table = parse_tables(xml).unwrap().remove(0);
    assert_eq!(table.rows.len(), 2);
    assert!(table.rows.iter().all(|row| row.len() == 3));
    let grid = table.build_grid().unwrap();
    assert_eq!(grid.cells().len(), 6);
}

#[test]
fn test_repeat_limit() {
    let xml = r#"<table:table xmlns:table="urn:t"><table:table-row table:number-rows-repeated="1048576"><table:table-cell/></table:table-row></table:table>"#;
    assert!(matches!(
        parse_tables(xml).unwrap_err(),
        ConversionError::UnsupportedFeature { .. }
    ));
}

#[test]
fn test_nested_table_order() {
    let xml = r#"<table:table xmlns:table="urn:t" xmlns:text="urn:x" table:name="outer"><table:table-row><table:table-cell><text:p>o</text:p><table:table table:name="inner"><table:table-row><table:table-cell><text:p>i</text:p></table:table-cell></table:table-row></table:table></table:table-cell></table:table-row></table:table>"#;
    let tables = parse_tables(xml).unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].name.as_deref(), Some("outer"));
    assert_eq!(tables[0].rows[0][0], OdfEntry::cell("o"));
    assert_eq!(tables[1].rows[0][0], OdfEntry::cell("i"));
}

#[test]
fn test_cell_inside_span_rejected() {
    let table = OdfTable {
        name: None,
        col_count: Some(2),
        rows: vec![vec![OdfEntry::spanning(2, 1, "a"), OdfEntry::cell("b")]],
    };
    assert_eq!(
        table.build_grid().unwrap_err(),
        StructuralError::AmbiguousMerge {
            row: 0,
            col: 1,
            first: (0, 0),
            second: (0, 1),
        }
    );
}

#[test]
fn test_stray_covered_entry() {
    let table = OdfTable {
        name: None,
        col_count: None,
        rows: vec![vec![OdfEntry::cell("a"), OdfEntry::Covered]],
    };
    assert_eq!(
        table.build_grid().unwrap_err(),
        StructuralError::NonRectangularMerge { row: 0, col: 1 }
    );
}

#[test]
fn test_write_odf() {
    let grid = parse_tables(CONTENT).unwrap()[0].build_grid().unwrap();
    let written = write_odf(
        &grid,
        &OdfOptions {
            table_name: "T".to_string(),
            declare_namespace: false,
        },
    );
    assert_eq!(
        written,
        "<table:table table:name=\"T\">\n  <table:table-column table:number-columns-repeated=\"3\"/>\n  <table:table-row>\n    <table:table-cell table:number-columns-spanned=\"2\"><text:p>Head</text:p></table:table-cell>\n    <table:covered-table-cell/>\n    <table:table-cell table:number-rows-spanned=\"2\"><text:p>Side</text:p></table:table-cell>\n  </table:table-row>\n  <table:table-row>\n    <table:table-cell><text:p>a</text:p><text:p>b</text:p><text:p>c  d</text:p></table:table-cell>\n    <table:table-cell><text:p>x &amp; y</text:p></table:table-cell>\n    <table:covered-table-cell/>\n  </table:table-row>\n</table:table>\n"
    );
    let reread = parse_tables(&written).unwrap()[0].build_grid().unwrap();
    assert_eq!(reread, grid);
}

#[test]
fn test_expanded_size_limit() {
    let xml = r#"<table:table xmlns:table="urn:t"><table:table-row table:number-rows-repeated="4096"><table:table-cell table:number-columns-repeated="4096"/></table:table-row></table:table>"#;
    assert!(matches!(
        parse_tables(xml).unwrap_err(),
        ConversionError::UnsupportedFeature { .. }
    ));

    let xml = r#"<table:table xmlns:table="urn:t"><table:table-row><table:table-cell table:number-columns-spanned="99999999999999"/></table:table-row></table:table>"#;
    assert!(matches!(
        parse_tables(xml).unwrap_err(),
        ConversionError::ParseError { .. }
    ));
}
