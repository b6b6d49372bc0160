//! Writer options for every target format

/// How AsciiDoc cells are laid out in the table body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellLayout {
    /// Every cell on its own line, rows separated by a blank line
    #[default]
    OnePerLine,
    /// All cells of a row on one line, rows separated by a blank line
    RowPerLine,
}

/// AsciiDoc writer options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiDocOptions {
    /// Emit a `[cols="1,1,..."]` attribute line before the table
    pub cols_attribute: bool,
    pub cell_layout: CellLayout,
}

impl Default for AsciiDocOptions {
    fn default() -> Self {
        Self {
            cols_attribute: true,
            cell_layout: CellLayout::OnePerLine,
        }
    }
}

/// HWPX writer options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HwpxOptions {
    /// Emit `hp:cellSpan` next to `hp:cellAddr`. Without it, spans must be
    /// recovered from the addresses alone when the table is read back.
    pub emit_cell_span: bool,
    /// Put an `xmlns:hp` declaration on the table element
    pub declare_namespace: bool,
}

impl Default for HwpxOptions {
    fn default() -> Self {
        Self {
            emit_cell_span: true,
            declare_namespace: true,
        }
    }
}

/// HTML writer options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Emit a `<colgroup>` with one `<col />` per column
    pub colgroup: bool,
    /// `class` attribute of the `<table>` element
    pub class: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            colgroup: true,
            class: None,
        }
    }
}

/// ODF writer options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdfOptions {
    /// `table:name` of the table element
    pub table_name: String,
    /// Put `xmlns:table`/`xmlns:text` declarations on the table element
    pub declare_namespace: bool,
}

impl Default for OdfOptions {
    fn default() -> Self {
        Self {
            table_name: "Table1".to_string(),
            declare_namespace: true,
        }
    }
}

/// Options for all serializers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub asciidoc: AsciiDocOptions,
    pub hwpx: HwpxOptions,
    pub html: HtmlOptions,
    pub odf: OdfOptions,
}

impl WriteOptions {
    /// HWPX output carries cell addresses only, no `hp:cellSpan`
    pub fn address_only() -> Self {
        Self {
            hwpx: HwpxOptions {
                emit_cell_span: false,
                ..HwpxOptions::default()
            },
            ..Self::default()
        }
    }

    /// Compact output: no optional headers, AsciiDoc rows on one line
    pub fn compact() -> Self {
        Self {
            asciidoc: AsciiDocOptions {
                cols_attribute: false,
                cell_layout: CellLayout::RowPerLine,
            },
            html: HtmlOptions {
                colgroup: false,
                class: None,
            },
            ..Self::default()
        }
    }
}
