//! Row heights, column widths and pixel positioning of floating objects.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::cell_ref::{COL_MAX, ROW_MAX};
use crate::error::{Result, XlsheetError};
use crate::export::xml_writer::{format_number, XmlWriter};
use crate::format::Format;
use crate::outlines::{clamp_level, OutlineSettings};
use crate::types::{ColInfo, ObjectAnchor, ObjectPosition, RowColOptions, RowInfo};

use super::Worksheet;

/// Row height Excel uses for an untouched sheet, in points.
pub const ORIGINAL_ROW_HEIGHT: f64 = 15.0;
/// Column width Excel uses for an untouched sheet, in characters.
pub const DEFAULT_COL_WIDTH: f64 = 8.43;
/// Pixel width of a default column.
pub const DEFAULT_COL_PIXELS: f64 = 64.0;

// Calibri 11 metrics.
const MAX_DIGIT_WIDTH: f64 = 7.0;
const PADDING: f64 = 5.0;

/// Row and column sizing state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetLayout {
    pub rows: BTreeMap<u32, RowInfo>,
    /// Column ranges keyed by their first column.
    pub cols: BTreeMap<u32, ColInfo>,
    /// Per column `(width, hidden)`.
    pub col_sizes: HashMap<u32, (Option<f64>, bool)>,
    /// Per column style index.
    pub col_formats: HashMap<u32, u32>,
    /// Per row `(height, hidden)`.
    pub row_sizes: HashMap<u32, (f64, bool)>,
    pub default_row_height: f64,
    /// Rows without data are hidden.
    pub default_row_zeroed: bool,
    pub outline: OutlineSettings,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            cols: BTreeMap::new(),
            col_sizes: HashMap::new(),
            col_formats: HashMap::new(),
            row_sizes: HashMap::new(),
            default_row_height: ORIGINAL_ROW_HEIGHT,
            default_row_zeroed: false,
            outline: OutlineSettings::default(),
        }
    }
}

/// Column width in characters to pixels.
pub fn width_to_pixels(width: f64) -> f64 {
    if width < 1.0 {
        (width * (MAX_DIGIT_WIDTH + PADDING) + 0.5).trunc()
    } else {
        (width * MAX_DIGIT_WIDTH + 0.5).trunc() + PADDING
    }
}

/// Pixels to column width in characters.
pub fn pixels_to_width(pixels: f64) -> f64 {
    if pixels <= 12.0 {
        pixels / (MAX_DIGIT_WIDTH + PADDING)
    } else {
        (pixels - PADDING) / MAX_DIGIT_WIDTH
    }
}

/// Row height in points to pixels.
pub fn height_to_pixels(height: f64) -> f64 {
    (4.0 / 3.0 * height).trunc()
}

impl SheetLayout {
    /// Pixel width of a column. Hidden columns are 0 wide unless the object
    /// keeps hidden cells sized.
    pub fn size_col(&self, col: u32, anchor: ObjectPosition) -> f64 {
        match self.col_sizes.get(&col) {
            Some((_, true)) if anchor != ObjectPosition::MoveAndSizeAfter => 0.0,
            Some((width, _)) => width_to_pixels(width.unwrap_or(DEFAULT_COL_WIDTH)),
            None => DEFAULT_COL_PIXELS,
        }
    }

    /// Pixel height of a row.
    pub fn size_row(&self, row: u32, anchor: ObjectPosition) -> f64 {
        match self.row_sizes.get(&row) {
            Some((_, true)) if anchor != ObjectPosition::MoveAndSizeAfter => 0.0,
            Some((height, _)) => height_to_pixels(*height),
            None => height_to_pixels(self.default_row_height),
        }
    }

    /// Anchor an object of `width` x `height` pixels placed at
    /// (`row_start`, `col_start`) with pixel offsets `x1`, `y1`.
    pub fn position_object_pixels(
        &self,
        mut col_start: u32,
        mut row_start: u32,
        mut x1: f64,
        mut y1: f64,
        mut width: f64,
        mut height: f64,
        anchor: ObjectPosition,
    ) -> ObjectAnchor {
        // Negative offsets move the start back into earlier cells.
        while x1 < 0.0 && col_start > 0 {
            x1 += self.size_col(col_start - 1, ObjectPosition::MoveAndSize);
            col_start -= 1;
        }
        while y1 < 0.0 && row_start > 0 {
            y1 += self.size_row(row_start - 1, ObjectPosition::MoveAndSize);
            row_start -= 1;
        }
        x1 = x1.max(0.0);
        y1 = y1.max(0.0);

        let x_abs = if self.col_sizes.is_empty() {
            DEFAULT_COL_PIXELS * f64::from(col_start)
        } else {
            (0..col_start)
                .map(|c| self.size_col(c, ObjectPosition::MoveAndSize))
                .sum()
        } + x1;
        let y_abs = if self.row_sizes.is_empty() {
            height_to_pixels(self.default_row_height) * f64::from(row_start)
        } else {
            (0..row_start)
                .map(|r| self.size_row(r, ObjectPosition::MoveAndSize))
                .sum()
        } + y1;

        // Offsets larger than the start cell move the start on.
        while col_start < COL_MAX - 1 && x1 >= self.size_col(col_start, anchor) {
            x1 -= self.size_col(col_start, anchor);
            col_start += 1;
        }
        while row_start < ROW_MAX - 1 && y1 >= self.size_row(row_start, anchor) {
            y1 -= self.size_row(row_start, anchor);
            row_start += 1;
        }

        // Hidden start cells do not offset the object.
        if self.size_col(col_start, anchor) > 0.0 {
            width += x1;
        }
        if self.size_row(row_start, anchor) > 0.0 {
            height += y1;
        }

        let mut col_end = col_start;
        let mut row_end = row_start;
        while col_end < COL_MAX - 1 && width >= self.size_col(col_end, anchor) {
            width -= self.size_col(col_end, anchor);
            col_end += 1;
        }
        while row_end < ROW_MAX - 1 && height >= self.size_row(row_end, anchor) {
            height -= self.size_row(row_end, anchor);
            row_end += 1;
        }

        ObjectAnchor {
            col_from: col_start,
            row_from: row_start,
            col_from_offset: x1,
            row_from_offset: y1,
            col_to: col_end,
            row_to: row_end,
            col_to_offset: width,
            row_to_offset: height,
            x_abs,
            y_abs,
        }
    }
}

impl Worksheet {
    /// Set height, format and outline options of a row. A `None` height
    /// keeps the default, a zero height hides the row.
    pub fn set_row(
        &mut self,
        row: u32,
        height: Option<f64>,
        format: Option<&Format>,
        options: Option<&RowColOptions>,
    ) -> Result<()> {
        let min_col = self.dims.col_min.unwrap_or(0);
        self.check_dimensions(row, min_col, false, false)?;

        let options = options.copied().unwrap_or_default();
        let mut hidden = options.hidden;
        let mut height = height.unwrap_or(self.layout.default_row_height);
        #[allow(clippy::float_cmp)]
        let zero_height = height == 0.0;
        if zero_height {
            hidden = true;
            height = self.layout.default_row_height;
        }
        let level = clamp_level(options.level);
        self.layout.outline.row_level = self.layout.outline.row_level.max(level);

        self.layout.rows.insert(
            row,
            RowInfo {
                height,
                xf: format.map(Format::xf),
                hidden,
                level,
                collapsed: options.collapsed,
            },
        );
        self.layout.row_sizes.insert(row, (height, hidden));
        Ok(())
    }

    /// `set_row` with the height in pixels.
    pub fn set_row_pixels(
        &mut self,
        row: u32,
        height: Option<u32>,
        format: Option<&Format>,
        options: Option<&RowColOptions>,
    ) -> Result<()> {
        self.set_row(row, height.map(|px| 0.75 * f64::from(px)), format, options)
    }

    /// Set width, format and outline options of a column range.
    pub fn set_column(
        &mut self,
        first_col: u32,
        last_col: u32,
        width: Option<f64>,
        format: Option<&Format>,
        options: Option<&RowColOptions>,
    ) -> Result<()> {
        let (first_col, last_col) = (first_col.min(last_col), first_col.max(last_col));
        let options = options.copied().unwrap_or_default();

        // Only formatted or hidden sized columns count towards the dimensions.
        #[allow(clippy::float_cmp)]
        let ignore_col = !(format.is_some() || (width.is_some_and(|w| w != 0.0) && options.hidden));
        self.check_dimensions(0, last_col, true, ignore_col)?;
        self.check_dimensions(0, first_col, true, ignore_col)?;

        let level = clamp_level(options.level);
        self.layout.outline.col_level = self.layout.outline.col_level.max(level);

        let xf = format.map(Format::xf);
        self.layout.cols.insert(
            first_col,
            ColInfo {
                first_col,
                last_col,
                width,
                xf,
                hidden: options.hidden,
                level,
                collapsed: options.collapsed,
            },
        );
        for col in first_col..=last_col {
            self.layout.col_sizes.insert(col, (width, options.hidden));
            if let Some(xf) = xf {
                self.layout.col_formats.insert(col, xf);
            }
        }
        Ok(())
    }

    /// `set_column` with the width in pixels.
    pub fn set_column_pixels(
        &mut self,
        first_col: u32,
        last_col: u32,
        width: Option<u32>,
        format: Option<&Format>,
        options: Option<&RowColOptions>,
    ) -> Result<()> {
        let width = width.map(|px| pixels_to_width(f64::from(px)));
        self.set_column(first_col, last_col, width, format, options)
    }

    /// Change the default row height and optionally hide rows without data.
    pub fn set_default_row(&mut self, height: Option<f64>, hide_unused_rows: bool) {
        let height = height.unwrap_or(self.layout.default_row_height);
        #[allow(clippy::float_cmp)]
        let changed = height != ORIGINAL_ROW_HEIGHT;
        if changed {
            self.layout.default_row_height = height;
        }
        if hide_unused_rows {
            self.layout.default_row_zeroed = true;
        }
    }

    /// Pixel anchor of an object, validating the start cell.
    pub(crate) fn position_object(
        &self,
        row: u32,
        col: u32,
        x_offset: f64,
        y_offset: f64,
        width: f64,
        height: f64,
        anchor: ObjectPosition,
    ) -> Result<ObjectAnchor> {
        if row >= ROW_MAX || col >= COL_MAX {
            return Err(XlsheetError::CellOutOfRange { row, col });
        }
        Ok(self
            .layout
            .position_object_pixels(col, row, x_offset, y_offset, width, height, anchor))
    }
}

/// `<cols>` with one `<col>` per `set_column` range.
pub(crate) fn write_cols(out: &mut XmlWriter, layout: &SheetLayout) {
    if layout.cols.is_empty() {
        return;
    }
    out.start_tag("cols", &[]);
    for info in layout.cols.values() {
        write_col_info(out, info);
    }
    out.end_tag("cols");
}

fn write_col_info(out: &mut XmlWriter, info: &ColInfo) {
    let mut custom_width = true;
    #[allow(clippy::float_cmp)]
    let width = match info.width {
        None if info.hidden => 0.0,
        None => {
            custom_width = false;
            DEFAULT_COL_WIDTH
        }
        Some(w) if w == DEFAULT_COL_WIDTH => {
            custom_width = false;
            w
        }
        Some(w) => w,
    };
    // Character width to the stored column width, in 1/256 units.
    let width = if width > 0.0 {
        (width_to_pixels(width) / MAX_DIGIT_WIDTH * 256.0).trunc() / 256.0
    } else {
        width
    };

    let mut attrs = vec![
        ("min", (info.first_col + 1).to_string()),
        ("max", (info.last_col + 1).to_string()),
        ("width", format_number(width)),
    ];
    if let Some(xf) = info.xf.filter(|xf| *xf != 0) {
        attrs.push(("style", xf.to_string()));
    }
    if info.hidden {
        attrs.push(("hidden", "1".to_string()));
    }
    if custom_width {
        attrs.push(("customWidth", "1".to_string()));
    }
    if info.level > 0 {
        attrs.push(("outlineLevel", info.level.to_string()));
    }
    if info.collapsed {
        attrs.push(("collapsed", "1".to_string()));
    }
    out.empty_tag("col", &attrs);
}

/// `<sheetFormatPr>`.
pub(crate) fn write_sheet_format_pr(out: &mut XmlWriter, layout: &SheetLayout, dy_descent: bool) {
    let mut attrs = vec![("defaultRowHeight", format_number(layout.default_row_height))];
    #[allow(clippy::float_cmp)]
    let custom_height = layout.default_row_height != ORIGINAL_ROW_HEIGHT;
    if custom_height {
        attrs.push(("customHeight", "1".to_string()));
    }
    if layout.default_row_zeroed {
        attrs.push(("zeroHeight", "1".to_string()));
    }
    if layout.outline.row_level > 0 {
        attrs.push(("outlineLevelRow", layout.outline.row_level.to_string()));
    }
    if layout.outline.col_level > 0 {
        attrs.push(("outlineLevelCol", layout.outline.col_level.to_string()));
    }
    if dy_descent {
        attrs.push(("x14ac:dyDescent", "0.25".to_string()));
    }
    out.empty_tag("sheetFormatPr", &attrs);
}
