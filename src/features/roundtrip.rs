//! Round-trip validation
//!
//! Runs `A -> Grid_A -> B text -> Grid_B -> A text -> Grid_A'` and compares
//! the grids. Geometry must match exactly; content is compared after
//! whitespace normalization.
//!
//! ```rust
//! use cellspan::roundtrip::validate_roundtrip;
//! use cellspan::{parse_table, Format};
//!
//! let table = parse_table("|===\n2+|Total\n\n|a\n|b\n|===\n", Format::AsciiDoc).unwrap();
//! assert!(validate_roundtrip(&table, Format::Hwpx).is_ok());
//! ```

use std::fmt;

use thiserror::Error;

use crate::core::format::{parse_table, serialize_with_options, Format, TableAst};
use crate::core::grid::{Grid, MergeStats, Span};
use crate::core::options::WriteOptions;
use crate::utils::error::StructuralError;
use crate::utils::text::normalize_whitespace;

/// Which comparison of the round trip diverged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Building `Grid_A` from the input
    Build,
    /// `Grid_A` against `Grid_B`, rebuilt from the intermediate text
    Intermediate,
    /// `Grid_A` against `Grid_A'`, rebuilt from the returned text
    Return,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Build => write!(f, "build"),
            Stage::Intermediate => write!(f, "intermediate"),
            Stage::Return => write!(f, "return"),
        }
    }
}

/// What diverged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divergence {
    /// Serialized text could not be parsed back
    Unparsable(String),
    /// Parsed back, but the grid could not be rebuilt
    Structural(StructuralError),
    /// `(rows, cols)` differ
    Dimensions {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    CellCount { expected: usize, actual: usize },
    /// First cell, in canonical order, whose origin or span differs
    Cell {
        index: usize,
        expected: Span,
        actual: Span,
    },
    /// First cell whose normalized content differs
    Content {
        index: usize,
        expected: String,
        actual: String,
    },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Divergence::Unparsable(msg) => write!(f, "output does not parse back: {}", msg),
            Divergence::Structural(err) => write!(f, "output does not rebuild: {}", err),
            Divergence::Dimensions { expected, actual } => write!(
                f,
                "dimensions {}x{} became {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Divergence::CellCount { expected, actual } => {
                write!(f, "{} cells became {}", expected, actual)
            }
            Divergence::Cell {
                index,
                expected,
                actual,
            } => write!(
                f,
                "cell {} at ({}, {}) span {}x{} became ({}, {}) span {}x{}",
                index,
                expected.row,
                expected.col,
                expected.row_span,
                expected.col_span,
                actual.row,
                actual.col,
                actual.row_span,
                actual.col_span
            ),
            Divergence::Content {
                index,
                expected,
                actual,
            } => write!(f, "cell {} content {:?} became {:?}", index, expected, actual),
        }
    }
}

/// One divergence of a round trip
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{from} -> {via} round trip, {stage} stage: {divergence}")]
pub struct RoundTripDiff {
    pub from: Format,
    pub via: Format,
    pub stage: Stage,
    pub divergence: Divergence,
}

/// Every divergence of a round trip; `diffs` is empty on success
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    pub from: Format,
    pub via: Format,
    /// Merge counts of `Grid_A`, when it could be built
    pub merges: Option<MergeStats>,
    pub diffs: Vec<RoundTripDiff>,
}

impl RoundTripReport {
    pub fn is_ok(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// Compare two grids: geometry first, then content
pub fn compare_grids(expected: &Grid, actual: &Grid) -> Vec<Divergence> {
    let mut out = Vec::new();

    let dims = |g: &Grid| (g.row_count(), g.col_count());
    if dims(expected) != dims(actual) {
        out.push(Divergence::Dimensions {
            expected: dims(expected),
            actual: dims(actual),
        });
        return out;
    }

    if expected.cells().len() != actual.cells().len() {
        out.push(Divergence::CellCount {
            expected: expected.cells().len(),
            actual: actual.cells().len(),
        });
    }

    let pairs = || expected.cells().iter().zip(actual.cells()).enumerate();

    if let Some((index, (e, a))) = pairs().find(|(_, (e, a))| e.span() != a.span()) {
        out.push(Divergence::Cell {
            index,
            expected: e.span(),
            actual: a.span(),
        });
        return out;
    }

    if let Some((index, (e, a))) = pairs()
        .find(|(_, (e, a))| normalize_whitespace(&e.content) != normalize_whitespace(&a.content))
    {
        out.push(Divergence::Content {
            index,
            expected: e.content.clone(),
            actual: a.content.clone(),
        });
    }
    out
}

fn rebuild(text: &str, format: Format) -> Result<Grid, Divergence> {
    let table = parse_table(text, format).map_err(|e| Divergence::Unparsable(e.to_string()))?;
    table.build_grid().map_err(Divergence::Structural)
}

/// Validate a round trip through `via`, collecting every divergence
pub fn roundtrip_report(input: &TableAst, via: Format, options: &WriteOptions) -> RoundTripReport {
    let from = input.format();
    let mut report = RoundTripReport {
        from,
        via,
        merges: None,
        diffs: Vec::new(),
    };
    let diff = |stage, divergence| RoundTripDiff {
        from,
        via,
        stage,
        divergence,
    };

    let grid_a = match input.build_grid() {
        Ok(grid) => grid,
        Err(err) => {
            report
                .diffs
                .push(diff(Stage::Build, Divergence::Structural(err)));
            return report;
        }
    };
    report.merges = Some(grid_a.merge_stats());

    let intermediate = serialize_with_options(&grid_a, via, options);
    let grid_b = match rebuild(&intermediate, via) {
        Ok(grid) => grid,
        Err(divergence) => {
            report.diffs.push(diff(Stage::Intermediate, divergence));
            return report;
        }
    };
    report.diffs.extend(
        compare_grids(&grid_a, &grid_b)
            .into_iter()
            .map(|d| diff(Stage::Intermediate, d)),
    );

    let returned = serialize_with_options(&grid_b, from, options);
    match rebuild(&returned, from) {
        Ok(grid) => report.diffs.extend(
            compare_grids(&grid_a, &grid)
                .into_iter()
                .map(|d| diff(Stage::Return, d)),
        ),
        Err(divergence) => report.diffs.push(diff(Stage::Return, divergence)),
    }

    if report.is_ok() {
        log::debug!("{} -> {} round trip clean ({})", from, via, grid_a.merge_stats());
    }
    report
}

/// Validate a round trip through `via` with default write options
pub fn validate_roundtrip(input: &TableAst, via: Format) -> Result<(), RoundTripDiff> {
    validate_roundtrip_with_options(input, via, &WriteOptions::default())
}

/// Validate a round trip, returning the first divergence
pub fn validate_roundtrip_with_options(
    input: &TableAst,
    via: Format,
    options: &WriteOptions,
) -> Result<(), RoundTripDiff> {
    match roundtrip_report(input, via, options).diffs.into_iter().next() {
        Some(diff) => Err(diff),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::asciidoc::{ShorthandCell, ShorthandTable};
    use crate::core::format::convert;
    use crate::core::hwpx::{AddressedCell, AddressedTable};
    use pretty_assertions::assert_eq;

    fn labor_table() -> TableAst {
        TableAst::AsciiDoc(ShorthandTable {
            col_count: Some(3),
            rows: vec![
                vec![
                    ShorthandCell::spanning(1, 3, "Labor"),
                    ShorthandCell::spanning(2, 1, "Q1"),
                ],
                vec![ShorthandCell::new("a"), ShorthandCell::new("b")],
                vec![ShorthandCell::new("c"), ShorthandCell::new("d")],
            ],
            line: None,
        })
    }

    #[test]
    fn test_every_format_roundtrips() {
        let table = labor_table();
        for via in Format::ALL {
            let report = roundtrip_report(&table, via, &WriteOptions::default());
            assert!(report.is_ok(), "{:?}", report.diffs);
            assert_eq!(report.merges.map(|m| m.merged_cells), Some(2));
        }
    }

    #[test]
    fn test_build_failure_is_a_diff() {
        let table = TableAst::AsciiDoc(ShorthandTable {
            col_count: Some(2),
            rows: vec![vec![ShorthandCell::spanning(1, 2, "x"), ShorthandCell::new("y")]],
            line: None,
        });
        let diff = validate_roundtrip(&table, Format::Html).unwrap_err();
        assert_eq!(diff.stage, Stage::Build);
        assert!(matches!(
            diff.divergence,
            Divergence::Structural(StructuralError::UnterminatedSpan { .. })
        ));
    }

    #[test]
    fn test_address_only_hwpx() {
        // Inferred layouts survive an address-only round trip
        let inferred = TableAst::Hwpx(AddressedTable {
            row_count: Some(2),
            col_count: Some(2),
            rows: vec![
                vec![AddressedCell::at(0, 0, "a"), AddressedCell::at(1, 0, "b")],
                vec![AddressedCell::at(0, 1, "c")],
            ],
        });
        let options = WriteOptions::address_only();
        assert!(validate_roundtrip_with_options(&inferred, Format::AsciiDoc, &options).is_ok());

        // A colspan under two unit cells reads back as a row span without hp:cellSpan
        let explicit = TableAst::AsciiDoc(ShorthandTable {
            col_count: Some(2),
            rows: vec![
                vec![ShorthandCell::new("a"), ShorthandCell::new("b")],
                vec![ShorthandCell::spanning(2, 1, "c")],
            ],
            line: None,
        });
        assert!(validate_roundtrip(&explicit, Format::Hwpx).is_ok());
        let diff = validate_roundtrip_with_options(&explicit, Format::Hwpx, &options).unwrap_err();
        assert_eq!(diff.stage, Stage::Intermediate);
        assert_eq!(
            diff.divergence,
            Divergence::Cell {
                index: 1,
                expected: Span::new(0, 1, 1, 1),
                actual: Span::new(0, 1, 2, 1),
            }
        );
    }

    #[test]
    fn test_compare_grids_reports_first_cell() {
        let a = labor_table().build_grid().unwrap();
        let b = TableAst::AsciiDoc(ShorthandTable {
            col_count: Some(3),
            rows: vec![
                vec![
                    ShorthandCell::spanning(1, 2, "Labor"),
                    ShorthandCell::spanning(2, 1, "Q1"),
                ],
                vec![ShorthandCell::new("a"), ShorthandCell::new("b")],
                vec![
                    ShorthandCell::new("x"),
                    ShorthandCell::new("c"),
                    ShorthandCell::new("d"),
                ],
            ],
            line: None,
        })
        .build_grid()
        .unwrap();

        let diffs = compare_grids(&a, &b);
        assert_eq!(
            diffs,
            vec![
                Divergence::CellCount {
                    expected: 6,
                    actual: 7
                },
                Divergence::Cell {
                    index: 0,
                    expected: Span::new(0, 0, 3, 1),
                    actual: Span::new(0, 0, 2, 1),
                },
            ]
        );
    }

    #[test]
    fn test_content_compared_leniently() {
        let a = labor_table().build_grid().unwrap();
        let mut spaced = labor_table();
        if let TableAst::AsciiDoc(t) = &mut spaced {
            t.rows[1][0].content = "  a ".to_string();
        }
        let b = spaced.build_grid().unwrap();
        assert!(compare_grids(&a, &b).is_empty());
    }

    #[test]
    fn test_markup_characters_survive_every_format() {
        let table = TableAst::AsciiDoc(ShorthandTable {
            col_count: Some(3),
            rows: vec![
                vec![
                    ShorthandCell::new("R&D"),
                    ShorthandCell::new("a < b"),
                    ShorthandCell::new("\"q\""),
                ],
                vec![
                    ShorthandCell::new("x\n// note"),
                    ShorthandCell::new("total +"),
                    ShorthandCell::new("p | q \\ r"),
                ],
            ],
            line: None,
        });
        for via in Format::ALL {
            let report = roundtrip_report(&table, via, &WriteOptions::default());
            assert!(report.is_ok(), "via {}: {:?}", via, report.diffs);
        }
    }

    #[test]
    fn test_html_text_is_not_escaped_twice() {
        let source = parse_table("|===\n|R&D\n|a < b\n|===\n", Format::AsciiDoc).unwrap();
        let html = convert(&source, Format::Html).unwrap();
        assert!(html.contains("<td>R&amp;D</td>"));
        assert!(html.contains("<td>a &lt; b</td>"));

        let back = convert(&parse_table(&html, Format::Html).unwrap(), Format::AsciiDoc).unwrap();
        assert_eq!(back, "[cols=\"1,1\"]\n|===\n|R&D\n|a < b\n|===\n");
        assert!(validate_roundtrip(&source, Format::Html).is_ok());
    }
}
