//! The worksheet: cell storage, feature overlays and sheet state.
//!
//! Writes are validated and stored through the [`CellSink`] chosen at
//! construction. Feature overlays (merges, hyperlinks, validations,
//! conditional formats, tables, sparklines, comments, drawings) live in
//! side tables and are only turned into XML by
//! [`Worksheet::assemble_xml`].

mod layout;
mod write;

use std::collections::BTreeMap;

use serde::Serialize;

pub use layout::{
    height_to_pixels, pixels_to_width, width_to_pixels, SheetLayout, DEFAULT_COL_WIDTH,
    ORIGINAL_ROW_HEIGHT,
};
pub use write::STRING_MAX;

pub(crate) use layout::{write_cols, write_sheet_format_pr};

use crate::cell_ref::{cell_name, CellRange, COL_MAX, ROW_MAX};
use crate::error::{Result, XlsheetError};
use crate::export::sheet_data::{CommentMap, RowContext};
use crate::options::WorksheetOptions;
use crate::protection::Protection;
use crate::shared_strings::{SharedStringTable, SharedStrings};
use crate::sink::{BufferedSink, CellSink, StreamingSink};
use crate::types::{
    AutoFilter, CellValue, ConditionalFormat, DataValidation, DrawingObject, Hyperlink,
    PageSetup, SheetView, SparklineGroup, Table,
};

/// Bounding box of every cell written so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub row_min: Option<u32>,
    pub row_max: Option<u32>,
    pub col_min: Option<u32>,
    pub col_max: Option<u32>,
}

impl Dimensions {
    fn add_row(&mut self, row: u32) {
        self.row_min = Some(self.row_min.map_or(row, |r| r.min(row)));
        self.row_max = Some(self.row_max.map_or(row, |r| r.max(row)));
    }

    fn add_col(&mut self, col: u32) {
        self.col_min = Some(self.col_min.map_or(col, |c| c.min(col)));
        self.col_max = Some(self.col_max.map_or(col, |c| c.max(col)));
    }

    /// Row bounds, `None` until a row was touched.
    pub fn rows(&self) -> Option<(u32, u32)> {
        self.row_min.zip(self.row_max)
    }

    /// `ref` of the `<dimension>` element.
    pub fn to_ref(&self) -> String {
        let (Some(col_min), Some(col_max)) = (self.col_min, self.col_max) else {
            return "A1".to_string();
        };
        match self.rows() {
            None if col_min == col_max => cell_name(0, col_min),
            None => format!("{}:{}", cell_name(0, col_min), cell_name(0, col_max)),
            Some((row_min, row_max)) if row_min == row_max && col_min == col_max => {
                cell_name(row_min, col_min)
            }
            Some((row_min, row_max)) => format!(
                "{}:{}",
                cell_name(row_min, col_min),
                cell_name(row_max, col_max)
            ),
        }
    }
}

/// Counts of everything stored on a sheet, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSummary {
    pub name: String,
    pub streaming: bool,
    pub dimension: String,
    pub cells: usize,
    pub shared_strings: usize,
    pub merged_ranges: usize,
    pub hyperlinks: usize,
    pub comments: usize,
    pub data_validations: usize,
    pub conditional_formats: usize,
    pub tables: Vec<String>,
    pub sparkline_groups: usize,
    pub drawings: usize,
    pub autofilter: Option<String>,
    pub protected: bool,
}

/// A single worksheet under construction.
#[derive(Debug)]
pub struct Worksheet {
    pub(crate) options: WorksheetOptions,
    pub(crate) sst: SharedStrings,
    pub(crate) sink: Box<dyn CellSink>,
    pub(crate) dims: Dimensions,
    pub(crate) layout: SheetLayout,
    pub(crate) merges: Vec<CellRange>,
    pub(crate) hyperlinks: BTreeMap<u32, BTreeMap<u32, Hyperlink>>,
    pub(crate) hyperlink_count: usize,
    pub(crate) comments: CommentMap,
    pub(crate) comments_visible: bool,
    pub(crate) comments_author: Option<String>,
    pub(crate) autofilter: Option<AutoFilter>,
    pub(crate) validations: Vec<DataValidation>,
    /// Rules keyed by their sqref.
    pub(crate) cond_formats: BTreeMap<String, Vec<ConditionalFormat>>,
    pub(crate) cf_priority: u32,
    pub(crate) tables: Vec<Table>,
    pub(crate) sparklines: Vec<SparklineGroup>,
    pub(crate) view: SheetView,
    pub(crate) page: PageSetup,
    pub(crate) protection: Option<Protection>,
    pub(crate) drawings: Vec<DrawingObject>,
}

impl Worksheet {
    /// Create a worksheet with its own shared string table.
    pub fn new(options: WorksheetOptions) -> Result<Self> {
        Self::with_shared_strings(options, SharedStringTable::shared())
    }

    /// Create a worksheet interning strings into a workbook-wide table.
    pub fn with_shared_strings(options: WorksheetOptions, sst: SharedStrings) -> Result<Self> {
        let sink: Box<dyn CellSink> = if options.constant_memory {
            Box::new(StreamingSink::new()?)
        } else {
            Box::new(BufferedSink::new())
        };
        log::debug!(
            "new worksheet '{}' ({} mode)",
            options.name,
            if options.constant_memory { "streaming" } else { "buffered" }
        );
        let page = if options.excel2003_style {
            PageSetup::excel2003()
        } else {
            PageSetup::default()
        };
        Ok(Self {
            options,
            sst,
            sink,
            dims: Dimensions::default(),
            layout: SheetLayout::default(),
            merges: Vec::new(),
            hyperlinks: BTreeMap::new(),
            hyperlink_count: 0,
            comments: BTreeMap::new(),
            comments_visible: false,
            comments_author: None,
            autofilter: None,
            validations: Vec::new(),
            cond_formats: BTreeMap::new(),
            cf_priority: 0,
            tables: Vec::new(),
            sparklines: Vec::new(),
            view: SheetView::default(),
            page,
            protection: None,
            drawings: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn options(&self) -> &WorksheetOptions {
        &self.options
    }

    pub fn shared_strings(&self) -> &SharedStrings {
        &self.sst
    }

    /// Rows are spilled to disk as they complete.
    pub fn is_streaming(&self) -> bool {
        self.sink.is_streaming()
    }

    /// Stored cell, if still in memory. In streaming mode only the current
    /// row can be read back.
    pub fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.sink.get(row, col)
    }

    /// Text of a stored string cell, resolving shared string indices.
    pub fn cell_text(&self, row: u32, col: u32) -> Option<String> {
        use crate::types::StringRef;
        match self.cell(row, col)? {
            CellValue::String { string, .. } => match string {
                StringRef::Shared(index) => {
                    self.sst.borrow().resolve(*index).map(str::to_string)
                }
                StringRef::Inline(text) | StringRef::InlineRich(text) => Some(text.clone()),
            },
            _ => None,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.sink.cell_count()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn merged_ranges(&self) -> &[CellRange] {
        &self.merges
    }

    pub fn hyperlink(&self, row: u32, col: u32) -> Option<&Hyperlink> {
        self.hyperlinks.get(&row).and_then(|cols| cols.get(&col))
    }

    pub fn hyperlink_count(&self) -> usize {
        self.hyperlink_count
    }

    pub fn data_validations(&self) -> &[DataValidation] {
        &self.validations
    }

    /// Conditional format rules keyed by sqref.
    pub fn conditional_formats(&self) -> &BTreeMap<String, Vec<ConditionalFormat>> {
        &self.cond_formats
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn sparkline_groups(&self) -> &[SparklineGroup] {
        &self.sparklines
    }

    pub fn autofilter_state(&self) -> Option<&AutoFilter> {
        self.autofilter.as_ref()
    }

    pub fn drawing_objects(&self) -> &[DrawingObject] {
        &self.drawings
    }

    pub fn view(&self) -> &SheetView {
        &self.view
    }

    pub fn page_setup(&self) -> &PageSetup {
        &self.page
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn summary(&self) -> SheetSummary {
        SheetSummary {
            name: self.options.name.clone(),
            streaming: self.is_streaming(),
            dimension: self.dims.to_ref(),
            cells: self.cell_count(),
            shared_strings: self.sst.borrow().len(),
            merged_ranges: self.merges.len(),
            hyperlinks: self.hyperlink_count,
            comments: self.comments.values().map(BTreeMap::len).sum(),
            data_validations: self.validations.len(),
            conditional_formats: self.cond_formats.values().map(Vec::len).sum(),
            tables: self.tables.iter().map(|t| t.name.clone()).collect(),
            sparkline_groups: self.sparklines.len(),
            drawings: self.drawings.len(),
            autofilter: self.autofilter.as_ref().map(|f| f.range.name()),
            protected: self.protection.is_some(),
        }
    }

    /// Validate a coordinate and grow the dimensions. In streaming mode a
    /// full check also moves the sink to `row`, rejecting earlier rows.
    pub(crate) fn check_dimensions(
        &mut self,
        row: u32,
        col: u32,
        ignore_row: bool,
        ignore_col: bool,
    ) -> Result<()> {
        check_bounds(row, col)?;
        if !ignore_row && !ignore_col && self.sink.is_streaming() {
            let ctx = RowContext::new(&self.layout, &self.comments, !self.sparklines.is_empty());
            self.sink.advance_to(row, &ctx)?;
        }
        if !ignore_row {
            self.dims.add_row(row);
        }
        if !ignore_col {
            self.dims.add_col(col);
        }
        Ok(())
    }

    /// Bounds check and dimension update that never moves the sink. Used for
    /// the far corner of a range whose anchor is written first.
    pub(crate) fn extend_dimensions(&mut self, row: u32, col: u32) -> Result<()> {
        check_bounds(row, col)?;
        self.dims.add_row(row);
        self.dims.add_col(col);
        Ok(())
    }

    /// Check both corners of a range before growing the dimensions. The far
    /// corner never moves a streaming sink.
    pub(crate) fn check_range(&mut self, range: &CellRange) -> Result<()> {
        check_bounds(range.first_row, range.first_col)?;
        check_bounds(range.last_row, range.last_col)?;
        self.check_dimensions(range.first_row, range.first_col, false, false)?;
        self.extend_dimensions(range.last_row, range.last_col)
    }

    /// Store a cell after its coordinate was checked.
    pub(crate) fn store(&mut self, row: u32, col: u32, cell: CellValue) -> Result<()> {
        self.sink.insert(row, col, cell)
    }

    /// Sparklines need the Excel 2010 row/format extensions.
    pub(crate) fn uses_excel_2010(&self) -> bool {
        !self.sparklines.is_empty()
    }
}

/// Reject coordinates outside the sheet.
pub(crate) fn check_bounds(row: u32, col: u32) -> Result<()> {
    if row >= ROW_MAX || col >= COL_MAX {
        log::warn!("cell ({row}, {col}) is outside the worksheet limits");
        return Err(XlsheetError::CellOutOfRange { row, col });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sheet() -> Worksheet {
        Worksheet::new(WorksheetOptions::default()).unwrap()
    }

    #[test]
    fn test_dimension_ref() {
        let mut dims = Dimensions::default();
        assert_eq!(dims.to_ref(), "A1");
        dims.add_col(2);
        assert_eq!(dims.to_ref(), "C1");
        dims.add_col(4);
        assert_eq!(dims.to_ref(), "C1:E1");
        dims.add_row(9);
        assert_eq!(dims.to_ref(), "C10:E10");
    }

    #[test]
    fn test_dimensions_grow_in_any_order() {
        let mut ws = sheet();
        ws.check_dimensions(5, 5, false, false).unwrap();
        ws.check_dimensions(2, 9, false, false).unwrap();
        ws.check_dimensions(10, 1, false, false).unwrap();
        let dims = ws.dimensions();
        assert_eq!(dims.rows(), Some((2, 10)));
        assert_eq!((dims.col_min, dims.col_max), (Some(1), Some(9)));
    }

    #[test]
    fn test_ignored_axes_do_not_grow() {
        let mut ws = sheet();
        ws.check_dimensions(3, 7, true, false).unwrap();
        assert_eq!(ws.dimensions().rows(), None);
        assert_eq!(ws.dimensions().col_min, Some(7));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = sheet();
        assert!(ws.check_dimensions(ROW_MAX, 0, false, false).is_err());
        assert!(ws.check_dimensions(0, COL_MAX, true, true).is_err());
        assert_eq!(ws.dimensions(), Dimensions::default());
    }
}
