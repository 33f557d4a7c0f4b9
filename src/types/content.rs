use serde::{Deserialize, Serialize};

use super::ObjectAnchor;

/// Hyperlink target kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkType {
    /// Web, mail or file target stored as a relationship.
    External,
    /// Location inside the workbook.
    Internal,
}

impl LinkType {
    /// Numeric link type (1 external, 2 internal).
    pub const fn code(self) -> u8 {
        match self {
            Self::External => 1,
            Self::Internal => 2,
        }
    }
}

/// Hyperlink metadata stored beside the cell holding its display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperlink {
    pub link_type: LinkType,
    /// Escaped target without the anchor. Empty for internal links.
    pub url: String,
    /// Anchor of an external link, or the target of an internal one.
    pub location: Option<String>,
    /// Text shown in the cell.
    pub display: String,
    pub tip: Option<String>,
}

/// Options of `write_comment`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommentOptions {
    pub author: Option<String>,
    /// Overrides `show_comments` for this comment.
    pub visible: Option<bool>,
    /// Box width in pixels, default 128.
    pub width: Option<f64>,
    /// Box height in pixels, default 74.
    pub height: Option<f64>,
    pub x_scale: Option<f64>,
    pub y_scale: Option<f64>,
    /// Box background, `#RRGGBB` or a named color.
    pub color: Option<String>,
    /// A1 cell the box starts in, overrides `start_row`/`start_col`.
    pub start_cell: Option<String>,
    pub start_row: Option<u32>,
    pub start_col: Option<u32>,
    pub x_offset: Option<i32>,
    pub y_offset: Option<i32>,
    pub font_name: Option<String>,
    pub font_size: Option<f64>,
}

/// A cell comment with its computed box position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub row: u32,
    pub col: u32,
    pub text: String,
    pub author: Option<String>,
    /// `None` follows the sheet-wide `show_comments` setting.
    pub visible: Option<bool>,
    /// Lowercase `#rrggbb` fill color.
    pub color: String,
    pub font_name: String,
    pub font_size: f64,
    pub font_family: u8,
    /// Box anchor in pixels.
    pub anchor: ObjectAnchor,
    pub width: u32,
    pub height: u32,
}
