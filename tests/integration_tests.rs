//! Integration tests for cellspan table conversion

use cellspan::{
    convert, convert_text, convert_text_with_options, parse_table, parse_tables, serialize,
    validate_roundtrip, Format, MergeStats, Span, StructuralError, TableAst, WriteOptions,
};

// ============================================================================
// Fixtures
// ============================================================================

const BUDGET_ROWS: usize = 49;
const BUDGET_COLS: usize = 30;

/// The budget table: 49 x 30 with 215 colspans and 39 rowspans.
///
/// - column 0: two-row label cells down to row 47, then a unit cell
/// - column 29: three-row cells down to row 44, then unit cells
/// - columns 1-28: paired cells in rows 0-14, one pair then units in rows
///   15-19, units below
fn budget_layout() -> Vec<Span> {
    let mut spans = Vec::new();
    for r in 0..BUDGET_ROWS {
        if r == 48 {
            spans.push(Span::new(r, 0, 1, 1));
        } else if r % 2 == 0 {
            spans.push(Span::new(r, 0, 2, 1));
        }

        if r < 15 {
            for k in 0..14 {
                spans.push(Span::new(r, 1 + 2 * k, 1, 2));
            }
        } else if r < 20 {
            spans.push(Span::new(r, 1, 1, 2));
            for c in 3..29 {
                spans.push(Span::new(r, c, 1, 1));
            }
        } else {
            for c in 1..29 {
                spans.push(Span::new(r, c, 1, 1));
            }
        }

        if r >= 45 {
            spans.push(Span::new(r, 29, 1, 1));
        } else if r % 3 == 0 {
            spans.push(Span::new(r, 29, 3, 1));
        }
    }
    spans
}

fn budget_hwpx(with_cell_span: bool) -> String {
    let spans = budget_layout();
    let mut xml = format!(
        "<hs:sec xmlns:hs=\"http://www.hancom.co.kr/hwpml/2011/section\" xmlns:hp=\"http://www.hancom.co.kr/hwpml/2011/paragraph\">\n<hp:tbl rowCnt=\"{}\" colCnt=\"{}\">\n",
        BUDGET_ROWS, BUDGET_COLS
    );
    for r in 0..BUDGET_ROWS {
        xml.push_str("<hp:tr>\n");
        for span in spans.iter().filter(|s| s.row == r) {
            xml.push_str(&format!(
                "<hp:tc><hp:subList><hp:p><hp:run><hp:t>r{}c{}</hp:t></hp:run></hp:p></hp:subList><hp:cellAddr colAddr=\"{}\" rowAddr=\"{}\"/>",
                span.row, span.col, span.col, span.row
            ));
            if with_cell_span {
                xml.push_str(&format!(
                    "<hp:cellSpan colSpan=\"{}\" rowSpan=\"{}\"/>",
                    span.col_span, span.row_span
                ));
            }
            xml.push_str("</hp:tc>\n");
        }
        xml.push_str("</hp:tr>\n");
    }
    xml.push_str("</hp:tbl>\n</hs:sec>\n");
    xml
}

fn budget_table() -> TableAst {
    parse_table(&budget_hwpx(false), Format::Hwpx).unwrap()
}

fn lines_starting_with(text: &str, prefix: &str) -> usize {
    text.lines().filter(|l| l.starts_with(prefix)).count()
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_colspan() {
        let adoc = "[cols=\"1,1,1,1\"]\n|===\n2+|Total\n|c\n|d\n|===\n";
        let grid = parse_table(adoc, Format::AsciiDoc)
            .unwrap()
            .build_grid()
            .unwrap();
        assert_eq!(
            grid.spans(),
            vec![
                Span::new(0, 0, 1, 2),
                Span::new(0, 2, 1, 1),
                Span::new(0, 3, 1, 1),
            ]
        );
        assert_eq!(grid.cells()[0].content, "Total");
    }

    #[test]
    fn test_rowspan_chain() {
        let adoc = "[cols=\"3*\"]\n|===\n.3+|Labor\n|a\n|b\n\n|c\n|d\n\n|e\n|f\n|===\n";
        let grid = parse_table(adoc, Format::AsciiDoc)
            .unwrap()
            .build_grid()
            .unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.cells()[0].span(), Span::new(0, 0, 3, 1));
        assert_eq!(grid.cells()[0].content, "Labor");
        for r in 0..3 {
            assert_eq!(grid.covering_cell(r, 0).map(|c| c.content.as_str()), Some("Labor"));
        }
        assert_eq!(grid.cells().len(), 7);
    }

    #[test]
    fn test_ambiguity_rejection() {
        // A claims rows 0-2 of column 0; C claims rows 1-2 of the same column
        let xml = r#"<hp:tbl rowCnt="3" colCnt="2">
<hp:tr>
  <hp:tc><hp:cellAddr colAddr="0" rowAddr="0"/><hp:cellSpan colSpan="1" rowSpan="3"/></hp:tc>
  <hp:tc><hp:cellAddr colAddr="1" rowAddr="0"/></hp:tc>
</hp:tr>
<hp:tr>
  <hp:tc><hp:cellAddr colAddr="0" rowAddr="1"/><hp:cellSpan colSpan="1" rowSpan="2"/></hp:tc>
  <hp:tc><hp:cellAddr colAddr="1" rowAddr="1"/></hp:tc>
</hp:tr>
<hp:tr>
  <hp:tc><hp:cellAddr colAddr="1" rowAddr="2"/></hp:tc>
</hp:tr>
</hp:tbl>"#;
        let table = parse_table(xml, Format::Hwpx).unwrap();
        assert_eq!(
            table.build_grid().unwrap_err(),
            StructuralError::AmbiguousMerge {
                row: 1,
                col: 0,
                first: (0, 0),
                second: (1, 0),
            }
        );

        let err = convert_text(xml, Format::Hwpx, Format::AsciiDoc).unwrap_err();
        assert_eq!(err.as_structural().map(StructuralError::kind), Some("AmbiguousMerge"));
    }

    #[test]
    fn test_l_shape_rejected() {
        // A's inferred colspan covers columns 0-1 of row 0; row 1 only
        // restarts column 1, which would leave A as an L.
        let xml = r#"<hp:tbl rowCnt="2" colCnt="3">
<hp:tr><hp:tc><hp:cellAddr colAddr="0" rowAddr="0"/></hp:tc><hp:tc><hp:cellAddr colAddr="2" rowAddr="0"/></hp:tc></hp:tr>
<hp:tr><hp:tc><hp:cellAddr colAddr="1" rowAddr="1"/><hp:cellSpan colSpan="1" rowSpan="1"/></hp:tc><hp:tc><hp:cellAddr colAddr="2" rowAddr="1"/></hp:tc></hp:tr>
</hp:tbl>"#;
        let table = parse_table(xml, Format::Hwpx).unwrap();
        assert_eq!(
            table.build_grid().unwrap_err(),
            StructuralError::NonRectangularMerge { row: 1, col: 0 }
        );
    }

    #[test]
    fn test_unterminated_span() {
        let html = "<table><tr><td rowspan=\"3\">a</td><td>b</td></tr><tr><td>c</td></tr></table>";
        let table = parse_table(html, Format::Html).unwrap();
        assert!(matches!(
            table.build_grid().unwrap_err(),
            StructuralError::UnterminatedSpan { row: 0, col: 0, row_span: 3, .. }
        ));
    }

    #[test]
    fn test_row_overflow() {
        let adoc = "[cols=\"2\"]\n|===\n.2+|a\n|b\n\n|c\n|d\n|===\n";
        let table = parse_table(adoc, Format::AsciiDoc).unwrap();
        assert!(matches!(
            table.build_grid().unwrap_err(),
            StructuralError::RowOverflow { row: 1, col_count: 2, .. }
        ));
    }
}

// ============================================================================
// Budget table
// ============================================================================

mod budget {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inferred_from_addresses() {
        let grid = budget_table().build_grid().unwrap();
        assert_eq!(grid.row_count(), BUDGET_ROWS);
        assert_eq!(grid.col_count(), BUDGET_COLS);
        assert_eq!(grid.spans(), budget_layout());
        assert_eq!(
            grid.merge_stats(),
            MergeStats {
                col_merges: 215,
                row_merges: 39,
                merged_cells: 254,
            }
        );
        assert!(grid.check_coverage().is_ok());
    }

    #[test]
    fn test_explicit_spans_agree_with_inference() {
        let explicit = parse_table(&budget_hwpx(true), Format::Hwpx)
            .unwrap()
            .build_grid()
            .unwrap();
        let inferred = budget_table().build_grid().unwrap();
        assert_eq!(explicit.spans(), inferred.spans());
    }

    #[test]
    fn test_roundtrips_through_every_format() {
        let table = budget_table();
        for via in Format::ALL {
            if let Err(diff) = validate_roundtrip(&table, via) {
                panic!("{}", diff);
            }
        }
    }

    #[test]
    fn test_every_format_as_source() {
        let grid = budget_table().build_grid().unwrap();
        for from in Format::ALL {
            let source = parse_table(&serialize(&grid, from), from).unwrap();
            assert_eq!(source.format(), from);
            for via in Format::ALL {
                assert!(
                    validate_roundtrip(&source, via).is_ok(),
                    "{} -> {} failed",
                    from,
                    via
                );
            }
        }
    }

    #[test]
    fn test_address_only_roundtrips() {
        let table = budget_table();
        let options = WriteOptions::address_only();
        for via in Format::ALL {
            let report = cellspan::roundtrip_report(&table, via, &options);
            assert!(report.is_ok(), "{:?}", report.diffs);
        }
    }

    #[test]
    fn test_hwpx_to_asciidoc_and_back_preserves_merges() {
        let adoc = convert_text(&budget_hwpx(false), Format::Hwpx, Format::AsciiDoc).unwrap();
        assert_eq!(lines_starting_with(&adoc, "2+|"), 215);
        assert_eq!(lines_starting_with(&adoc, ".2+|"), 24);
        assert_eq!(lines_starting_with(&adoc, ".3+|"), 15);

        let hwpx = convert_text_with_options(
            &adoc,
            Format::AsciiDoc,
            Format::Hwpx,
            &WriteOptions::address_only(),
        )
        .unwrap();
        assert!(!hwpx.contains("cellSpan"));
        let back = parse_table(&hwpx, Format::Hwpx)
            .unwrap()
            .build_grid()
            .unwrap();
        assert_eq!(back.spans(), budget_layout());
        assert_eq!(back.cells()[0].content, "r0c0");
    }

    #[test]
    fn test_html_merge_attributes() {
        let table = budget_table();
        let html = convert(&table, Format::Html).unwrap();
        assert_eq!(html.matches("colspan=\"2\"").count(), 215);
        assert_eq!(html.matches("rowspan=\"2\"").count(), 24);
        assert_eq!(html.matches("rowspan=\"3\"").count(), 15);
        assert_eq!(html.matches("<tr>").count(), BUDGET_ROWS);
    }

    #[test]
    fn test_odf_is_dense() {
        let odf = convert(&budget_table(), Format::Odf).unwrap();
        let cells = odf.matches("<table:table-cell").count();
        let covered = odf.matches("<table:covered-table-cell/>").count();
        assert_eq!(cells, 1201);
        assert_eq!(cells + covered, BUDGET_ROWS * BUDGET_COLS);
    }
}

// ============================================================================
// Documents with several tables
// ============================================================================

mod documents {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_multiple_tables_keep_order() {
        let adoc = "= Report\n\n[cols=\"2\"]\n|===\n2+|first\n|===\n\nSome text.\n\n.Second\n|===\n|a |b\n\n|c |d\n|===\n";
        let tables = parse_tables(adoc, Format::AsciiDoc).unwrap();
        assert_eq!(tables.len(), 2);

        let html = convert_text(adoc, Format::AsciiDoc, Format::Html).unwrap();
        let first = html.find("first").unwrap();
        let second = html.find(">a<").unwrap();
        assert!(first < second);
        assert_eq!(html.matches("<table>").count(), 2);
    }

    #[test]
    fn test_structural_error_names_table() {
        let adoc = "|===\n|a\n|===\n\n|===\n|a |b\n\n|c\n|===\n";
        let err = convert_text(adoc, Format::AsciiDoc, Format::Html).unwrap_err();
        assert!(err.to_string().contains("table 1"), "{}", err);
    }

    #[test]
    fn test_hwpx_section_with_text_around_tables() {
        let xml = budget_hwpx(true);
        let odf = convert_text(&xml, Format::Hwpx, Format::Odf).unwrap();
        let back = convert_text(&odf, Format::Odf, Format::Hwpx).unwrap();
        let grid = parse_table(&back, Format::Hwpx)
            .unwrap()
            .build_grid()
            .unwrap();
        assert_eq!(grid.spans(), budget_layout());
    }
}
