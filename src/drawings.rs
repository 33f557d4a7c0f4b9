//! Images and charts placed over the grid.
//!
//! The worksheet only computes where an object sits: a two-cell anchor in
//! EMUs plus its extent. The drawing part itself is assembled by the
//! packager from [`Worksheet::drawing_objects`].

use crate::error::{Result, XlsheetError};
use crate::export::XmlWriter;
use crate::types::{pixels_to_emus, ChartOptions, DrawingKind, DrawingObject, ImageOptions};
use crate::worksheet::{check_bounds, Worksheet};

/// Pixel size of an object after scaling, rounded half up.
fn scaled(size: f64, scale: f64) -> f64 {
    (0.5 + size * scale).trunc()
}

impl Worksheet {
    /// Place an image with its top-left corner in cell (`row`, `col`).
    ///
    /// The native size comes from the options: the image file is not read.
    /// Images with a resolution other than 96 dpi are scaled to match.
    pub fn insert_image(
        &mut self,
        row: u32,
        col: u32,
        filename: &str,
        options: &ImageOptions,
    ) -> Result<()> {
        check_bounds(row, col)?;
        if !(options.image_width > 0.0 && options.image_height > 0.0) {
            log::warn!("image '{filename}' needs a positive width and height");
            return Err(XlsheetError::InvalidOption(format!(
                "image '{filename}' has no size"
            )));
        }
        if !(options.x_dpi > 0.0 && options.y_dpi > 0.0) {
            return Err(XlsheetError::InvalidOption(format!(
                "image '{filename}' has an invalid resolution"
            )));
        }
        let width = options.image_width * 96.0 / options.x_dpi * options.x_scale;
        let height = options.image_height * 96.0 / options.y_dpi * options.y_scale;
        let anchor = self.position_object(
            row,
            col,
            f64::from(options.x_offset),
            f64::from(options.y_offset),
            width,
            height,
            options.object_position,
        )?;
        log::debug!("image '{filename}' anchored at ({row}, {col})");
        self.drawings.push(DrawingObject {
            kind: DrawingKind::Image {
                filename: filename.to_string(),
            },
            row,
            col,
            anchor: anchor.to_emus(),
            width: pixels_to_emus(width),
            height: pixels_to_emus(height),
            object_position: options.object_position,
            description: options.description.clone(),
            decorative: options.decorative,
            url: options.url.clone(),
            tip: options.tip.clone(),
        });
        Ok(())
    }

    /// Place a chart, 480 x 288 pixels unless the options say otherwise.
    pub fn insert_chart(
        &mut self,
        row: u32,
        col: u32,
        name: &str,
        options: Option<&ChartOptions>,
    ) -> Result<()> {
        check_bounds(row, col)?;
        let default = ChartOptions::default();
        let options = options.unwrap_or(&default);
        let width = scaled(options.width, options.x_scale);
        let height = scaled(options.height, options.y_scale);
        if !(width > 0.0 && height > 0.0) {
            return Err(XlsheetError::InvalidOption(format!(
                "chart '{name}' has no size"
            )));
        }
        let anchor = self.position_object(
            row,
            col,
            f64::from(options.x_offset),
            f64::from(options.y_offset),
            width,
            height,
            options.object_position,
        )?;
        self.drawings.push(DrawingObject {
            kind: DrawingKind::Chart {
                name: name.to_string(),
            },
            row,
            col,
            anchor: anchor.to_emus(),
            width: pixels_to_emus(width),
            height: pixels_to_emus(height),
            object_position: options.object_position,
            description: options.description.clone(),
            decorative: false,
            url: None,
            tip: None,
        });
        Ok(())
    }
}

/// `<drawing>` when the sheet has images or charts. Returns the next free
/// relationship id.
pub(crate) fn write_drawing(out: &mut XmlWriter, drawings: &[DrawingObject], rel_id: u32) -> u32 {
    if drawings.is_empty() {
        return rel_id;
    }
    out.empty_tag("drawing", &[("r:id", format!("rId{rel_id}"))]);
    rel_id + 1
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::WorksheetOptions;
    use crate::types::ObjectPosition;

    fn sheet() -> Worksheet {
        Worksheet::new(WorksheetOptions::default()).unwrap()
    }

    #[test]
    fn test_insert_image_anchor() {
        let mut ws = sheet();
        ws.insert_image(1, 2, "logo.png", &ImageOptions::new(32.0, 32.0))
            .unwrap();
        let image = ws.drawing_objects().first().unwrap();
        assert_eq!(image.kind, DrawingKind::Image { filename: "logo.png".to_string() });
        assert_eq!(image.object_position, ObjectPosition::MoveOnly);
        assert_eq!((image.width, image.height), (304_800, 304_800));
        let anchor = image.anchor;
        assert_eq!((anchor.col_from, anchor.row_from), (2, 1));
        assert_eq!((anchor.col_to, anchor.row_to), (2, 2));
        // 32 px into C, 12 px into row 3
        assert_eq!(anchor.col_to_offset, 304_800);
        assert_eq!(anchor.row_to_offset, 114_300);
        assert_eq!((anchor.x_abs, anchor.y_abs), (1_219_200, 190_500));
    }

    #[test]
    fn test_image_dpi_and_scale() {
        let mut ws = sheet();
        let options = ImageOptions {
            x_dpi: 192.0,
            y_dpi: 192.0,
            x_scale: 2.0,
            ..ImageOptions::new(100.0, 50.0)
        };
        ws.insert_image(0, 0, "hi-res.png", &options).unwrap();
        let image = ws.drawing_objects().first().unwrap();
        assert_eq!(image.width, pixels_to_emus(100.0));
        assert_eq!(image.height, pixels_to_emus(25.0));
    }

    #[test]
    fn test_insert_image_errors() {
        let mut ws = sheet();
        assert!(ws.insert_image(0, 0, "x.png", &ImageOptions::default()).is_err());
        assert_eq!(
            ws.insert_image(crate::cell_ref::ROW_MAX, 0, "x.png", &ImageOptions::new(1.0, 1.0))
                .unwrap_err()
                .code(),
            -1
        );
        assert!(ws.drawing_objects().is_empty());
    }

    #[test]
    fn test_insert_chart_default_size() {
        let mut ws = sheet();
        ws.insert_chart(0, 0, "Chart 1", None).unwrap();
        let chart = ws.drawing_objects().first().unwrap();
        assert_eq!((chart.width, chart.height), (4_572_000, 2_743_200));
        // 480 px = 7.5 default columns, 288 px = 14.4 default rows
        assert_eq!((chart.anchor.col_to, chart.anchor.row_to), (7, 14));
        assert_eq!(chart.anchor.col_to_offset, pixels_to_emus(32.0));
        assert_eq!(chart.anchor.row_to_offset, pixels_to_emus(8.0));
    }

    #[test]
    fn test_write_drawing() {
        let mut ws = sheet();
        let mut out = XmlWriter::new();
        assert_eq!(write_drawing(&mut out, ws.drawing_objects(), 1), 1);
        ws.insert_chart(3, 3, "Chart 1", None).unwrap();
        assert_eq!(write_drawing(&mut out, ws.drawing_objects(), 1), 2);
        assert_eq!(out.as_str(), r#"<drawing r:id="rId1"/>"#);
    }
}
