use serde::{Deserialize, Serialize};

/// How an object moves and sizes with the cells beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectPosition {
    /// Move and size with cells.
    #[default]
    MoveAndSize,
    /// Move but do not size with cells.
    MoveOnly,
    /// Neither move nor size with cells.
    Absolute,
    /// Like `MoveAndSize`, but hidden rows and columns keep their size.
    MoveAndSizeAfter,
}

/// Options of `insert_image`.
///
/// The image itself is not read: its native pixel size and resolution
/// come from the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageOptions {
    /// Native width in pixels.
    pub image_width: f64,
    /// Native height in pixels.
    pub image_height: f64,
    pub x_dpi: f64,
    pub y_dpi: f64,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_scale: f64,
    pub y_scale: f64,
    pub url: Option<String>,
    pub tip: Option<String>,
    pub description: Option<String>,
    pub decorative: bool,
    pub object_position: ObjectPosition,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            image_width: 0.0,
            image_height: 0.0,
            x_dpi: 96.0,
            y_dpi: 96.0,
            x_offset: 0,
            y_offset: 0,
            x_scale: 1.0,
            y_scale: 1.0,
            url: None,
            tip: None,
            description: None,
            decorative: false,
            object_position: ObjectPosition::MoveOnly,
        }
    }
}

impl ImageOptions {
    pub fn new(image_width: f64, image_height: f64) -> Self {
        Self {
            image_width,
            image_height,
            ..Self::default()
        }
    }
}

/// Options of `insert_chart`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartOptions {
    pub width: f64,
    pub height: f64,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_scale: f64,
    pub y_scale: f64,
    pub description: Option<String>,
    pub object_position: ObjectPosition,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 288.0,
            x_offset: 0,
            y_offset: 0,
            x_scale: 1.0,
            y_scale: 1.0,
            description: None,
            object_position: ObjectPosition::MoveAndSize,
        }
    }
}

/// Two-cell anchor of a floating object with offsets in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAnchor {
    pub col_from: u32,
    pub row_from: u32,
    pub col_from_offset: f64,
    pub row_from_offset: f64,
    pub col_to: u32,
    pub row_to: u32,
    pub col_to_offset: f64,
    pub row_to_offset: f64,
    /// Absolute position of the top-left corner.
    pub x_abs: f64,
    pub y_abs: f64,
}

/// Two-cell anchor with offsets in English Metric Units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmuAnchor {
    pub col_from: u32,
    pub row_from: u32,
    pub col_from_offset: u64,
    pub row_from_offset: u64,
    pub col_to: u32,
    pub row_to: u32,
    pub col_to_offset: u64,
    pub row_to_offset: u64,
    pub x_abs: u64,
    pub y_abs: u64,
}

impl ObjectAnchor {
    pub fn to_emus(&self) -> EmuAnchor {
        EmuAnchor {
            col_from: self.col_from,
            row_from: self.row_from,
            col_from_offset: pixels_to_emus(self.col_from_offset),
            row_from_offset: pixels_to_emus(self.row_from_offset),
            col_to: self.col_to,
            row_to: self.row_to,
            col_to_offset: pixels_to_emus(self.col_to_offset),
            row_to_offset: pixels_to_emus(self.row_to_offset),
            x_abs: pixels_to_emus(self.x_abs),
            y_abs: pixels_to_emus(self.y_abs),
        }
    }
}

/// English Metric Units per pixel at 96 dpi.
pub const EMUS_PER_PIXEL: f64 = 9525.0;

/// Pixels to EMUs, rounded half up.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pixels_to_emus(pixels: f64) -> u64 {
    (0.5 + EMUS_PER_PIXEL * pixels.max(0.0)) as u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DrawingKind {
    Image { filename: String },
    Chart { name: String },
}

/// An image or chart placed on the sheet, ready for the drawing part.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingObject {
    pub kind: DrawingKind,
    pub row: u32,
    pub col: u32,
    pub anchor: EmuAnchor,
    /// Extent in EMUs.
    pub width: u64,
    pub height: u64,
    pub object_position: ObjectPosition,
    pub description: Option<String>,
    pub decorative: bool,
    pub url: Option<String>,
    pub tip: Option<String>,
}
