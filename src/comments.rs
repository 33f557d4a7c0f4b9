//! Cell comments (notes).
//!
//! Comments are stored per cell with their box already positioned in
//! pixels. The comments and VML parts are built by the packager; the sheet
//! itself only carries the `<legacyDrawing>` link.

use crate::cell_ref::{parse_cell_ref, COL_MAX, ROW_MAX};
use crate::color::to_html;
use crate::error::{Result, XlsheetError};
use crate::export::XmlWriter;
use crate::types::{Comment, CommentOptions, ObjectPosition};
use crate::worksheet::{check_bounds, Worksheet, STRING_MAX};

const DEFAULT_WIDTH: f64 = 128.0;
const DEFAULT_HEIGHT: f64 = 74.0;
const DEFAULT_COLOR: &str = "#ffffe1";

/// Cell the box starts in and its offset, nudged inwards at the sheet
/// edges.
fn default_start(row: u32, col: u32) -> (u32, u32, i32, i32) {
    let (start_row, y_offset) = match row {
        0 => (0, 2),
        r if r == ROW_MAX - 3 => (ROW_MAX - 7, 16),
        r if r == ROW_MAX - 2 => (ROW_MAX - 6, 16),
        r if r == ROW_MAX - 1 => (ROW_MAX - 5, 14),
        r => (r - 1, 10),
    };
    let (start_col, x_offset) = match col {
        c if c == COL_MAX - 3 => (COL_MAX - 6, 49),
        c if c == COL_MAX - 2 => (COL_MAX - 5, 54),
        c if c == COL_MAX - 1 => (COL_MAX - 4, 59),
        c => (c + 1, 15),
    };
    (start_row, start_col, x_offset, y_offset)
}

/// Round a scaled size to whole pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_pixels(size: f64) -> u32 {
    (0.5 + size).max(0.0) as u32
}

impl Worksheet {
    /// Attach a comment to a cell. Comments count towards the sheet
    /// dimensions like cell data.
    pub fn write_comment(
        &mut self,
        row: u32,
        col: u32,
        text: &str,
        options: Option<&CommentOptions>,
    ) -> Result<()> {
        check_bounds(row, col)?;
        if text.chars().count() > STRING_MAX {
            log::warn!("comment text exceeds Excel's limit of {STRING_MAX} characters");
            return Err(XlsheetError::StringTooLong {
                what: "comment",
                limit: STRING_MAX,
            });
        }
        let default = CommentOptions::default();
        let options = options.unwrap_or(&default);

        let color = match &options.color {
            Some(color) => to_html(color)?,
            None => DEFAULT_COLOR.to_string(),
        };
        let (mut start_row, mut start_col, x_offset, y_offset) = default_start(row, col);
        if let Some(start_row_opt) = options.start_row {
            start_row = start_row_opt;
        }
        if let Some(start_col_opt) = options.start_col {
            start_col = start_col_opt;
        }
        if let Some(cell) = &options.start_cell {
            (start_row, start_col) =
                parse_cell_ref(cell).ok_or_else(|| XlsheetError::CellRef(cell.clone()))?;
        }
        let x_offset = options.x_offset.unwrap_or(x_offset);
        let y_offset = options.y_offset.unwrap_or(y_offset);

        let width = round_pixels(
            options.width.unwrap_or(DEFAULT_WIDTH) * options.x_scale.unwrap_or(1.0),
        );
        let height = round_pixels(
            options.height.unwrap_or(DEFAULT_HEIGHT) * options.y_scale.unwrap_or(1.0),
        );
        let anchor = self.position_object(
            start_row,
            start_col,
            f64::from(x_offset),
            f64::from(y_offset),
            f64::from(width),
            f64::from(height),
            ObjectPosition::MoveAndSize,
        )?;

        self.check_dimensions(row, col, false, false)?;
        let comment = Comment {
            row,
            col,
            text: text.to_string(),
            author: options.author.clone(),
            visible: options.visible,
            color,
            font_name: options.font_name.clone().unwrap_or_else(|| "Tahoma".to_string()),
            font_size: options.font_size.unwrap_or(8.0),
            font_family: 2,
            anchor,
            width,
            height,
        };
        self.comments.entry(row).or_default().insert(col, comment);
        Ok(())
    }

    /// Make every comment visible unless it overrides `visible` itself.
    pub fn show_comments(&mut self) {
        self.comments_visible = true;
    }

    /// Default author of the sheet's comments.
    pub fn set_comments_author(&mut self, author: &str) {
        self.comments_author = Some(author.to_string());
    }

    pub fn comments_visible(&self) -> bool {
        self.comments_visible
    }

    pub fn comments_author(&self) -> Option<&str> {
        self.comments_author.as_deref()
    }

    /// Comments in row then column order.
    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.values().flat_map(|cols| cols.values())
    }

    pub fn comment(&self, row: u32, col: u32) -> Option<&Comment> {
        self.comments.get(&row).and_then(|cols| cols.get(&col))
    }

    pub(crate) fn has_comments(&self) -> bool {
        self.comments.values().any(|cols| !cols.is_empty())
    }
}

/// `<legacyDrawing>` for the comments VML part. Returns the next free
/// relationship id.
pub(crate) fn write_legacy_drawing(out: &mut XmlWriter, has_vml: bool, rel_id: u32) -> u32 {
    if !has_vml {
        return rel_id;
    }
    out.empty_tag("legacyDrawing", &[("r:id", format!("rId{rel_id}"))]);
    rel_id + 1
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::options::WorksheetOptions;

    fn sheet() -> Worksheet {
        Worksheet::new(WorksheetOptions::default()).unwrap()
    }

    #[test]
    fn test_default_comment_box() {
        let mut ws = sheet();
        ws.write_comment(2, 2, "Check this", None).unwrap();
        let comment = ws.comment(2, 2).unwrap();
        assert_eq!((comment.width, comment.height), (128, 74));
        assert_eq!(comment.color, "#ffffe1");
        assert_eq!(comment.font_name, "Tahoma");
        // one row up, one column right, offset 15 x 10 px
        let anchor = comment.anchor;
        assert_eq!((anchor.row_from, anchor.col_from), (1, 3));
        assert_eq!((anchor.col_from_offset, anchor.row_from_offset), (15.0, 10.0));
        // 143 px from the start of D: two columns plus 15 px
        assert_eq!((anchor.col_to, anchor.col_to_offset), (5, 15.0));
        // 84 px from the start of row 2: four rows plus 4 px
        assert_eq!((anchor.row_to, anchor.row_to_offset), (5, 4.0));
        assert_eq!(ws.dimensions().rows(), Some((2, 2)));
    }

    #[test]
    fn test_edge_of_sheet_moves_box_inwards() {
        assert_eq!(default_start(0, 0), (0, 1, 15, 2));
        assert_eq!(
            default_start(ROW_MAX - 1, COL_MAX - 1),
            (ROW_MAX - 5, COL_MAX - 4, 59, 14)
        );
    }

    #[test]
    fn test_comment_options() {
        let mut ws = sheet();
        let options = CommentOptions {
            author: Some("Ann".to_string()),
            visible: Some(true),
            x_scale: Some(2.0),
            color: Some("green".to_string()),
            start_cell: Some("E10".to_string()),
            ..CommentOptions::default()
        };
        ws.write_comment(0, 0, "Note", Some(&options)).unwrap();
        let comment = ws.comment(0, 0).unwrap();
        assert_eq!(comment.width, 256);
        assert_eq!(comment.color, "#008000");
        assert_eq!((comment.anchor.row_from, comment.anchor.col_from), (9, 4));
        assert_eq!(comment.visible, Some(true));
    }

    #[test]
    fn test_comment_errors() {
        let mut ws = sheet();
        let long = "x".repeat(STRING_MAX + 1);
        assert_eq!(ws.write_comment(0, 0, &long, None).unwrap_err().code(), -3);
        assert_eq!(ws.write_comment(ROW_MAX, 0, "x", None).unwrap_err().code(), -1);
        let bad = CommentOptions {
            start_cell: Some("not a cell".to_string()),
            ..CommentOptions::default()
        };
        assert!(ws.write_comment(1, 1, "x", Some(&bad)).is_err());
        assert_eq!(ws.comments().count(), 0);
    }

    #[test]
    fn test_legacy_drawing() {
        let mut out = XmlWriter::new();
        assert_eq!(write_legacy_drawing(&mut out, false, 2), 2);
        assert_eq!(write_legacy_drawing(&mut out, true, 2), 3);
        assert_eq!(out.as_str(), r#"<legacyDrawing r:id="rId2"/>"#);
    }
}
