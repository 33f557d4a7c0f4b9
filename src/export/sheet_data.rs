//! `<row>` and `<c>` emission shared by the buffered and streaming sinks.

use std::collections::{BTreeMap, BTreeSet};

use crate::cell_ref::cell_name;
use crate::types::{CachedValue, CellValue, Comment, RowInfo, StringRef, ERROR_CODES};
use crate::worksheet::{SheetLayout, ORIGINAL_ROW_HEIGHT};

use super::xml_writer::{format_number, XmlWriter};

/// Comments keyed by row then column.
pub(crate) type CommentMap = BTreeMap<u32, BTreeMap<u32, Comment>>;

/// Sheet state a sink needs to write rows.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub(crate) layout: &'a SheetLayout,
    pub(crate) comments: &'a CommentMap,
    /// Sparklines present: rows carry `x14ac:dyDescent`.
    pub(crate) dy_descent: bool,
}

impl<'a> RowContext<'a> {
    pub(crate) fn new(layout: &'a SheetLayout, comments: &'a CommentMap, dy_descent: bool) -> Self {
        Self {
            layout,
            comments,
            dy_descent,
        }
    }

    pub(crate) fn row_info(&self, row: u32) -> Option<&'a RowInfo> {
        self.layout.rows.get(&row)
    }

    pub(crate) fn has_comments(&self, row: u32) -> bool {
        self.comments.get(&row).is_some_and(|c| !c.is_empty())
    }

    /// A row is written when it has cells, properties or comments.
    pub(crate) fn is_written(&self, row: u32, has_cells: bool) -> bool {
        has_cells || self.row_info(row).is_some() || self.has_comments(row)
    }

    /// Style of a cell: its own format, then the row's, then the column's.
    fn cell_xf(&self, row: u32, col: u32, cell: &CellValue) -> u32 {
        if let Some(xf) = cell.xf() {
            return xf;
        }
        if let Some(xf) = self.row_info(row).and_then(|info| info.xf) {
            return xf;
        }
        self.layout.col_formats.get(&col).copied().unwrap_or(0)
    }
}

/// Open a `<row>` element, or write it empty.
pub(crate) fn write_row_tag(
    out: &mut XmlWriter,
    row: u32,
    spans: Option<&str>,
    ctx: &RowContext<'_>,
    empty: bool,
) {
    let info = ctx.row_info(row);
    let height = info.map_or(ctx.layout.default_row_height, |i| i.height);

    let mut attrs = vec![("r", (row + 1).to_string())];
    if let Some(spans) = spans {
        attrs.push(("spans", spans.to_string()));
    }
    if let Some(xf) = info.and_then(|i| i.xf) {
        if xf != 0 {
            attrs.push(("s", xf.to_string()));
        }
        attrs.push(("customFormat", "1".to_string()));
    }
    #[allow(clippy::float_cmp)]
    let custom_height = height != ORIGINAL_ROW_HEIGHT
        || ctx.layout.default_row_height != ORIGINAL_ROW_HEIGHT;
    if custom_height {
        attrs.push(("ht", format_number(height)));
    }
    if let Some(info) = info {
        if info.hidden {
            attrs.push(("hidden", "1".to_string()));
        }
    }
    if custom_height {
        attrs.push(("customHeight", "1".to_string()));
    }
    if let Some(info) = info {
        if info.level > 0 {
            attrs.push(("outlineLevel", info.level.to_string()));
        }
        if info.collapsed {
            attrs.push(("collapsed", "1".to_string()));
        }
    }
    if ctx.dy_descent {
        attrs.push(("x14ac:dyDescent", "0.25".to_string()));
    }

    if empty {
        out.empty_tag("row", &attrs);
    } else {
        out.start_tag("row", &attrs);
    }
}

/// Write one complete row of cells.
pub(crate) fn write_row<'c>(
    out: &mut XmlWriter,
    row: u32,
    cells: impl IntoIterator<Item = (&'c u32, &'c CellValue)>,
    spans: Option<&str>,
    ctx: &RowContext<'_>,
) {
    let mut cells = cells.into_iter().peekable();
    if cells.peek().is_none() {
        write_row_tag(out, row, spans, ctx, true);
        return;
    }
    write_row_tag(out, row, spans, ctx, false);
    for (col, cell) in cells {
        write_cell(out, row, *col, cell, ctx);
    }
    out.end_tag("row");
}

/// Write a single `<c>` element.
pub(crate) fn write_cell(
    out: &mut XmlWriter,
    row: u32,
    col: u32,
    cell: &CellValue,
    ctx: &RowContext<'_>,
) {
    let mut attrs = vec![("r", cell_name(row, col))];
    let xf = ctx.cell_xf(row, col, cell);
    if xf != 0 {
        attrs.push(("s", xf.to_string()));
    }

    match cell {
        CellValue::Number { value, .. } => {
            out.start_tag("c", &attrs);
            out.data_element("v", &format_number(*value), &[]);
            out.end_tag("c");
        }
        CellValue::String { string, .. } => match string {
            StringRef::Shared(index) => {
                attrs.push(("t", "s".to_string()));
                out.start_tag("c", &attrs);
                out.data_element("v", &index.to_string(), &[]);
                out.end_tag("c");
            }
            StringRef::Inline(text) => {
                attrs.push(("t", "inlineStr".to_string()));
                out.start_tag("c", &attrs);
                out.start_tag("is", &[]);
                write_text_element(out, text);
                out.end_tag("is");
                out.end_tag("c");
            }
            StringRef::InlineRich(fragment) => {
                attrs.push(("t", "inlineStr".to_string()));
                out.start_tag("c", &attrs);
                out.start_tag("is", &[]);
                out.raw(fragment);
                out.end_tag("is");
                out.end_tag("c");
            }
        },
        CellValue::Blank { .. } => out.empty_tag("c", &attrs),
        CellValue::Boolean { value, .. } => {
            attrs.push(("t", "b".to_string()));
            out.start_tag("c", &attrs);
            out.data_element("v", if *value { "1" } else { "0" }, &[]);
            out.end_tag("c");
        }
        CellValue::Formula { formula, value, .. } => {
            match value {
                CachedValue::Bool(_) => attrs.push(("t", "b".to_string())),
                CachedValue::Text(text) if text.is_empty() => {}
                CachedValue::Text(text) if ERROR_CODES.contains(&text.as_str()) => {
                    attrs.push(("t", "e".to_string()));
                }
                CachedValue::Text(_) => attrs.push(("t", "str".to_string())),
                CachedValue::Number(_) => {}
            }
            out.start_tag("c", &attrs);
            out.data_element("f", formula, &[]);
            out.data_element("v", &cached_text(value), &[]);
            out.end_tag("c");
        }
        CellValue::ArrayFormula {
            formula,
            value,
            range,
            dynamic,
            ..
        } => {
            if *dynamic {
                attrs.push(("cm", "1".to_string()));
            }
            if !is_numeric(value) {
                attrs.push(("t", "str".to_string()));
            }
            out.start_tag("c", &attrs);
            out.data_element(
                "f",
                formula,
                &[("t", "array".to_string()), ("ref", range.clone())],
            );
            out.data_element("v", &cached_text(value), &[]);
            out.end_tag("c");
        }
    }
}

/// `<t>` with `xml:space="preserve"` when the text has outer whitespace.
pub(crate) fn write_text_element(out: &mut XmlWriter, text: &str) {
    if needs_preserve(text) {
        out.data_element("t", text, &[("xml:space", "preserve".to_string())]);
    } else {
        out.data_element("t", text, &[]);
    }
}

pub(crate) fn needs_preserve(text: &str) -> bool {
    text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace)
}

fn cached_text(value: &CachedValue) -> String {
    match value {
        CachedValue::Number(n) => format_number(*n),
        CachedValue::Text(s) => s.clone(),
        CachedValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
    }
}

fn is_numeric(value: &CachedValue) -> bool {
    match value {
        CachedValue::Number(_) => true,
        CachedValue::Text(s) => s.trim().parse::<f64>().is_ok(),
        CachedValue::Bool(_) => false,
    }
}

/// Per 16-row block `min:max` column spans (1-based) over cells and comments.
pub(crate) fn calculate_spans<'a>(
    cell_rows: impl Iterator<Item = (u32, &'a BTreeMap<u32, CellValue>)>,
    comments: &CommentMap,
) -> BTreeMap<u32, String> {
    let mut blocks: BTreeMap<u32, (u32, u32)> = BTreeMap::new();
    let mut extend = |row: u32, first: Option<u32>, last: Option<u32>| {
        if let (Some(first), Some(last)) = (first, last) {
            let entry = blocks.entry(row / 16).or_insert((first, last));
            entry.0 = entry.0.min(first);
            entry.1 = entry.1.max(last);
        }
    };
    for (row, cells) in cell_rows {
        extend(
            row,
            cells.keys().next().copied(),
            cells.keys().next_back().copied(),
        );
    }
    for (row, cols) in comments {
        extend(
            *row,
            cols.keys().next().copied(),
            cols.keys().next_back().copied(),
        );
    }
    blocks
        .into_iter()
        .map(|(block, (min, max))| (block, format!("{}:{}", min + 1, max + 1)))
        .collect()
}

/// Rows to emit: every row with cells, properties or comments inside the
/// row bounds.
pub(crate) fn rows_to_write(
    cell_rows: impl Iterator<Item = u32>,
    ctx: &RowContext<'_>,
    first: u32,
    last: u32,
) -> BTreeSet<u32> {
    cell_rows
        .chain(ctx.layout.rows.keys().copied())
        .chain(
            ctx.comments
                .iter()
                .filter(|(_, cols)| !cols.is_empty())
                .map(|(row, _)| *row),
        )
        .filter(|row| (first..=last).contains(row))
        .collect()
}
