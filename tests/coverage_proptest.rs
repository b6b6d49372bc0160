//! Property-based tests for grid coverage and cross-format round trips
//!
//! Layouts are random tilings of a small table by rectangles, so every
//! generated table is valid by construction. Cell text mixes fragments that
//! each format has to escape.

use cellspan::html::{HtmlCell, HtmlTable};
use cellspan::utils::text::normalize_markup;
use cellspan::{parse_table, serialize, Format, Grid, Span};
use proptest::prelude::*;

/// Tile `rows x cols` row-major; each free slot starts a rectangle whose
/// wanted size is shrunk until it fits.
fn tile(rows: usize, cols: usize, wanted: &[(usize, usize)]) -> Vec<Span> {
    let mut taken = vec![false; rows * cols];
    let mut spans = Vec::new();
    let mut k = 0;
    for r in 0..rows {
        for c in 0..cols {
            if taken[r * cols + c] {
                continue;
            }
            let (want_rows, want_cols) = wanted[k % wanted.len()];
            k += 1;

            let free_cols = (c..cols).take_while(|&cc| !taken[r * cols + cc]).count();
            let col_span = want_cols.min(free_cols);
            let mut row_span = 1;
            while row_span < want_rows
                && r + row_span < rows
                && (c..c + col_span).all(|cc| !taken[(r + row_span) * cols + cc])
            {
                row_span += 1;
            }

            for rr in r..r + row_span {
                for cc in c..c + col_span {
                    taken[rr * cols + cc] = true;
                }
            }
            spans.push(Span::new(r, c, row_span, col_span));
        }
    }
    spans
}

/// Lines that read as markup in at least one format
const FRAGMENTS: &[&str] = &[
    "R&D",
    "a < b",
    "x > y",
    "\"q\" 's'",
    "p | q",
    "back\\slash",
    "// note",
    "total +",
    "+",
    "===",
    "plain",
];

fn content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 1..4).prop_map(|lines| lines.join("\n"))
}

fn html_table(rows: usize, cols: usize, spans: &[Span], contents: &[String]) -> HtmlTable {
    let mut table = HtmlTable {
        col_count: Some(cols),
        caption: None,
        rows: vec![Vec::new(); rows],
    };
    for (i, span) in spans.iter().enumerate() {
        table.rows[span.row]
            .push(HtmlCell::new(contents[i % contents.len()].clone()).with_span(span.col_span, span.row_span));
    }
    table
}

fn layout_strategy() -> impl Strategy<Value = (usize, usize, Vec<Span>)> {
    (
        1usize..7,
        1usize..7,
        prop::collection::vec((1usize..4, 1usize..4), 1..16),
    )
        .prop_map(|(rows, cols, wanted)| {
            let spans = tile(rows, cols, &wanted);
            (rows, cols, spans)
        })
}

fn contents_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(content_strategy(), 1..12)
}

fn build(rows: usize, cols: usize, spans: &[Span]) -> Grid {
    let contents: Vec<String> = (0..spans.len()).map(|i| format!("c{}", i)).collect();
    build_with(rows, cols, spans, &contents)
}

fn build_with(rows: usize, cols: usize, spans: &[Span], contents: &[String]) -> Grid {
    html_table(rows, cols, spans, contents).build_grid().unwrap()
}

fn contents(grid: &Grid) -> Vec<&str> {
    grid.cells().iter().map(|c| c.content.as_str()).collect()
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_every_slot_covered_exactly_once((rows, cols, spans) in layout_strategy()) {
            let grid = build(rows, cols, &spans);
            prop_assert_eq!(grid.row_count(), rows);
            prop_assert_eq!(grid.col_count(), cols);
            prop_assert_eq!(grid.spans(), spans.clone());
            prop_assert!(grid.check_coverage().is_ok());

            for r in 0..rows {
                for c in 0..cols {
                    let owners = grid.spans().iter().filter(|s| s.contains(r, c)).count();
                    prop_assert_eq!(owners, 1, "slot ({}, {})", r, c);
                    let cell = grid.covering_cell(r, c);
                    prop_assert!(cell.is_some_and(|cell| cell.span().contains(r, c)));
                }
            }
            let area: usize = spans.iter().map(|s| s.row_span * s.col_span).sum();
            prop_assert_eq!(area, rows * cols);
        }

        #[test]
        fn test_asciidoc_idempotent(
            (rows, cols, spans) in layout_strategy(),
            texts in contents_strategy(),
        ) {
            let grid = build_with(rows, cols, &spans, &texts);
            let text = serialize(&grid, Format::AsciiDoc);
            let reparsed = parse_table(&text, Format::AsciiDoc).unwrap().build_grid().unwrap();
            prop_assert_eq!(reparsed.spans(), grid.spans());
            prop_assert_eq!(contents(&reparsed), contents(&grid));
            let again = serialize(&reparsed, Format::AsciiDoc);
            prop_assert_eq!(normalize_markup(&again), normalize_markup(&text));
        }

        #[test]
        fn test_hwpx_asciidoc_hwpx_preserves_merges((rows, cols, spans) in layout_strategy()) {
            let grid = build(rows, cols, &spans);
            let hwpx = serialize(&grid, Format::Hwpx);
            let source = parse_table(&hwpx, Format::Hwpx).unwrap();

            let adoc = cellspan::convert(&source, Format::AsciiDoc).unwrap();
            let middle = parse_table(&adoc, Format::AsciiDoc).unwrap();
            let back = cellspan::convert(&middle, Format::Hwpx).unwrap();
            let returned = parse_table(&back, Format::Hwpx).unwrap().build_grid().unwrap();

            prop_assert_eq!(returned.merge_stats(), grid.merge_stats());
            prop_assert_eq!(returned.spans(), spans);
        }

        #[test]
        fn test_odf_and_html_roundtrip(
            (rows, cols, spans) in layout_strategy(),
            texts in contents_strategy(),
        ) {
            let grid = build_with(rows, cols, &spans, &texts);
            for from in [Format::Odf, Format::Html] {
                let source = parse_table(&serialize(&grid, from), from).unwrap();
                let rebuilt = source.build_grid().unwrap();
                prop_assert_eq!(contents(&rebuilt), contents(&grid));
                for via in Format::ALL {
                    let result = cellspan::validate_roundtrip(&source, via);
                    prop_assert!(result.is_ok(), "{} via {}: {:?}", from, via, result);
                }
            }
        }
    }
}
