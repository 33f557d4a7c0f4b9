//! Sheet view state: panes, selection, zoom, gridlines and tab color.
//!
//! Also writes `<sheetPr>`, which collects the filter flag, tab color,
//! outline settings and fit-to-page flag.

use crate::cell_ref::{cell_name, range_name, CellRange};
use crate::color::to_argb;
use crate::error::{Result, XlsheetError};
use crate::export::xml_writer::{format_number, XmlWriter};
use crate::outlines::{write_outline_pr, OutlineSettings};
use crate::types::{HideGridlines, Pane, PaneSelection, PageSetup, PageView, Selection, SheetView};
use crate::worksheet::{check_bounds, width_to_pixels, Worksheet};

impl Worksheet {
    /// Freeze the rows above `row` and the columns left of `col`. The
    /// scrolled area starts at `top_row`/`left_col`, by default right after
    /// the frozen cells.
    pub fn freeze_panes(
        &mut self,
        row: u32,
        col: u32,
        top_row: Option<u32>,
        left_col: Option<u32>,
    ) -> Result<()> {
        check_bounds(row, col)?;
        let top_row = top_row.unwrap_or(row);
        let left_col = left_col.unwrap_or(col);
        check_bounds(top_row, left_col)?;
        self.view.pane = Some(Pane::Freeze {
            row,
            col,
            top_row,
            left_col,
        });
        Ok(())
    }

    /// Split the window at `y` points down and `x` character widths across.
    pub fn split_panes(
        &mut self,
        y: f64,
        x: f64,
        top_row: Option<u32>,
        left_col: Option<u32>,
    ) -> Result<()> {
        if !y.is_finite() || !x.is_finite() || y < 0.0 || x < 0.0 {
            return Err(XlsheetError::InvalidOption(format!(
                "split position ({y}, {x}) must not be negative"
            )));
        }
        self.view.pane = Some(Pane::Split {
            y,
            x,
            top_row,
            left_col,
        });
        Ok(())
    }

    /// Select a cell or range. Selecting `A1` is the default and stores
    /// nothing.
    pub fn set_selection(
        &mut self,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
    ) -> Result<()> {
        check_bounds(first_row, first_col)?;
        check_bounds(last_row, last_col)?;
        let active_cell = cell_name(first_row, first_col);
        let range = CellRange::new(first_row, first_col, last_row, last_col);
        let sqref = if range.is_single_cell() {
            active_cell.clone()
        } else {
            range_name(range.first_row, range.first_col, range.last_row, range.last_col)
        };
        if sqref == "A1" {
            self.view.selection = None;
            return Ok(());
        }
        self.view.selection = Some(Selection { active_cell, sqref });
        Ok(())
    }

    /// First visible cell of the window.
    pub fn set_top_left_cell(&mut self, row: u32, col: u32) -> Result<()> {
        check_bounds(row, col)?;
        self.view.top_left_cell = (row != 0 || col != 0).then(|| cell_name(row, col));
        Ok(())
    }

    /// Zoom percent, 10 to 400. Out of range values keep the current zoom.
    pub fn set_zoom(&mut self, zoom: u32) -> Result<()> {
        if !(10..=400).contains(&zoom) {
            log::warn!("zoom factor {zoom} outside range: 10 <= zoom <= 400");
            return Err(XlsheetError::ValueOutOfRange {
                what: "zoom",
                value: f64::from(zoom),
                min: 10.0,
                max: 400.0,
            });
        }
        self.view.zoom = zoom;
        Ok(())
    }

    pub fn right_to_left(&mut self) {
        self.view.right_to_left = true;
    }

    /// Show zero values as blank cells.
    pub fn hide_zero(&mut self) {
        self.view.show_zeros = false;
    }

    pub fn hide_gridlines(&mut self, option: HideGridlines) {
        match option {
            HideGridlines::None => {
                self.page.print_gridlines = true;
                self.page.print_options_changed = true;
                self.view.show_gridlines = true;
            }
            HideGridlines::Print => {
                self.page.print_gridlines = false;
                self.view.show_gridlines = true;
            }
            HideGridlines::All => {
                self.page.print_gridlines = false;
                self.view.show_gridlines = false;
            }
        }
    }

    pub fn hide_row_col_headers(&mut self) {
        self.view.show_row_col_headers = false;
    }

    /// Mark the sheet tab as selected.
    pub fn select(&mut self) {
        self.view.selected = true;
    }

    /// Tab color as a named color or `#RRGGBB`.
    pub fn set_tab_color(&mut self, color: &str) -> Result<()> {
        self.view.tab_color = Some(to_argb(color)?);
        Ok(())
    }

    pub fn set_page_view(&mut self, view: PageView) {
        self.view.page_view = view;
    }
}

/// `<sheetPr>`, skipped when none of its parts is set.
pub(crate) fn write_sheet_pr(
    out: &mut XmlWriter,
    view: &SheetView,
    outline: &OutlineSettings,
    page: &PageSetup,
    filter_on: bool,
) {
    let has_children = page.fit_page || view.tab_color.is_some() || outline.changed;
    if !has_children && !filter_on {
        return;
    }
    let mut attrs = Vec::new();
    if filter_on {
        attrs.push(("filterMode", "1".to_string()));
    }
    if !has_children {
        out.empty_tag("sheetPr", &attrs);
        return;
    }
    out.start_tag("sheetPr", &attrs);
    if let Some(rgb) = &view.tab_color {
        out.empty_tag("tabColor", &[("rgb", rgb.clone())]);
    }
    write_outline_pr(out, outline);
    if page.fit_page {
        out.empty_tag("pageSetUpPr", &[("fitToPage", "1".to_string())]);
    }
    out.end_tag("sheetPr");
}

/// `<sheetViews>` with its single `<sheetView>`.
pub(crate) fn write_sheet_views(out: &mut XmlWriter, view: &SheetView, outline: &OutlineSettings) {
    let mut attrs = Vec::new();
    if !view.show_gridlines {
        attrs.push(("showGridLines", "0".to_string()));
    }
    if !view.show_row_col_headers {
        attrs.push(("showRowColHeaders", "0".to_string()));
    }
    if !view.show_zeros {
        attrs.push(("showZeros", "0".to_string()));
    }
    if view.right_to_left {
        attrs.push(("rightToLeft", "1".to_string()));
    }
    if view.selected {
        attrs.push(("tabSelected", "1".to_string()));
    }
    if !outline.visible {
        attrs.push(("showOutlineSymbols", "0".to_string()));
    }
    match view.page_view {
        PageView::Normal => {}
        PageView::PageLayout => attrs.push(("view", "pageLayout".to_string())),
        PageView::PageBreakPreview => attrs.push(("view", "pageBreakPreview".to_string())),
    }
    if let Some(cell) = &view.top_left_cell {
        attrs.push(("topLeftCell", cell.clone()));
    }
    if view.zoom != 100 {
        attrs.push(("zoomScale", view.zoom.to_string()));
        if view.page_view == PageView::Normal && view.zoom_scale_normal {
            attrs.push(("zoomScaleNormal", view.zoom.to_string()));
        }
    }
    attrs.push(("workbookViewId", "0".to_string()));

    out.start_tag("sheetViews", &[]);
    let selections = match view.pane {
        Some(pane) => {
            let (pane_attrs, selections) = pane_layout(&pane, view.selection.as_ref());
            out.start_tag("sheetView", &attrs);
            out.empty_tag("pane", &pane_attrs);
            selections
        }
        None => {
            let selections: Vec<PaneSelection> = view
                .selection
                .iter()
                .map(|s| PaneSelection {
                    pane: None,
                    active_cell: s.active_cell.clone(),
                    sqref: s.sqref.clone(),
                })
                .collect();
            if selections.is_empty() {
                out.empty_tag("sheetView", &attrs);
                out.end_tag("sheetViews");
                return;
            }
            out.start_tag("sheetView", &attrs);
            selections
        }
    };
    for selection in &selections {
        write_selection(out, selection);
    }
    out.end_tag("sheetView");
    out.end_tag("sheetViews");
}

fn write_selection(out: &mut XmlWriter, selection: &PaneSelection) {
    let mut attrs = Vec::new();
    if let Some(pane) = selection.pane {
        attrs.push(("pane", pane.to_string()));
    }
    if !selection.active_cell.is_empty() {
        attrs.push(("activeCell", selection.active_cell.clone()));
    }
    if !selection.sqref.is_empty() {
        attrs.push(("sqref", selection.sqref.clone()));
    }
    out.empty_tag("selection", &attrs);
}

/// Split width in character units to the twips Excel stores.
pub fn split_width_twips(width: f64) -> f64 {
    width_to_pixels(width) * 3.0 / 4.0 * 20.0 + 390.0
}

/// `<pane>` attributes and the selections moved into the panes. A user
/// selection becomes the selection of the active pane.
fn pane_layout(
    pane: &Pane,
    selection: Option<&Selection>,
) -> (Vec<(&'static str, String)>, Vec<PaneSelection>) {
    match *pane {
        Pane::Freeze {
            row,
            col,
            top_row,
            left_col,
        } => {
            let (active_cell, sqref) = selection
                .map(|s| (s.active_cell.clone(), s.sqref.clone()))
                .unwrap_or_default();
            let (active_pane, selections) =
                pane_selections(row, col, cell_name(row, 0), cell_name(0, col), active_cell, sqref);
            let mut attrs = Vec::new();
            if col > 0 {
                attrs.push(("xSplit", col.to_string()));
            }
            if row > 0 {
                attrs.push(("ySplit", row.to_string()));
            }
            attrs.push(("topLeftCell", cell_name(top_row, left_col)));
            attrs.push(("activePane", active_pane.to_string()));
            attrs.push(("state", "frozen".to_string()));
            (attrs, selections)
        }
        Pane::Split {
            y,
            x,
            top_row,
            left_col,
        } => {
            let y_split = if y > 0.0 { (20.0 * y + 300.0).trunc() } else { 0.0 };
            let x_split = if x > 0.0 { split_width_twips(x) } else { 0.0 };
            // Without explicit values the first visible cell is estimated
            // from a default grid.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let top_row = top_row.unwrap_or_else(|| (0.5 + (y_split - 300.0) / 20.0 / 15.0).max(0.0) as u32);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let left_col = left_col
                .unwrap_or_else(|| (0.5 + (x_split - 390.0) / 20.0 / 3.0 * 4.0 / 64.0).max(0.0) as u32);
            let top_left = cell_name(top_row, left_col);

            let has_selection = selection.is_some();
            let (active_cell, sqref) = selection
                .map_or_else(|| (top_left.clone(), top_left.clone()), |s| {
                    (s.active_cell.clone(), s.sqref.clone())
                });
            let row_split = u32::from(y_split > 0.0);
            let col_split = u32::from(x_split > 0.0);
            let (active_pane, selections) = pane_selections(
                row_split,
                col_split,
                cell_name(top_row, 0),
                cell_name(0, left_col),
                active_cell,
                sqref,
            );
            let mut attrs = Vec::new();
            if x_split > 0.0 {
                attrs.push(("xSplit", format_number(x_split)));
            }
            if y_split > 0.0 {
                attrs.push(("ySplit", format_number(y_split)));
            }
            attrs.push(("topLeftCell", top_left));
            if has_selection {
                attrs.push(("activePane", active_pane.to_string()));
            }
            (attrs, selections)
        }
    }
}

/// Active pane and the per-pane selections. Only the sign of `row` and
/// `col` matters.
fn pane_selections(
    row: u32,
    col: u32,
    row_cell: String,
    col_cell: String,
    active_cell: String,
    sqref: String,
) -> (&'static str, Vec<PaneSelection>) {
    if row > 0 && col > 0 {
        let selections = vec![
            PaneSelection {
                pane: Some("topRight"),
                active_cell: col_cell.clone(),
                sqref: col_cell,
            },
            PaneSelection {
                pane: Some("bottomLeft"),
                active_cell: row_cell.clone(),
                sqref: row_cell,
            },
            PaneSelection {
                pane: Some("bottomRight"),
                active_cell,
                sqref,
            },
        ];
        ("bottomRight", selections)
    } else if col > 0 {
        let selection = PaneSelection {
            pane: Some("topRight"),
            active_cell,
            sqref,
        };
        ("topRight", vec![selection])
    } else {
        let selection = PaneSelection {
            pane: Some("bottomLeft"),
            active_cell,
            sqref,
        };
        ("bottomLeft", vec![selection])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::WorksheetOptions;
    use pretty_assertions::assert_eq;

    fn sheet() -> Worksheet {
        Worksheet::new(WorksheetOptions::default()).unwrap()
    }

    fn views_xml(ws: &Worksheet) -> String {
        let mut out = XmlWriter::new();
        write_sheet_views(&mut out, ws.view(), ws.outline());
        out.into_string()
    }

    #[test]
    fn test_default_view() {
        assert_eq!(
            views_xml(&sheet()),
            r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews>"#
        );
    }

    #[test]
    fn test_view_flags_and_zoom() {
        let mut ws = sheet();
        ws.select();
        ws.hide_gridlines(HideGridlines::All);
        ws.hide_zero();
        ws.right_to_left();
        ws.set_zoom(200).unwrap();
        assert!(ws.set_zoom(5).is_err());
        assert_eq!(
            views_xml(&ws),
            concat!(
                r#"<sheetViews><sheetView showGridLines="0" showZeros="0" rightToLeft="1" "#,
                r#"tabSelected="1" zoomScale="200" zoomScaleNormal="200" workbookViewId="0"/></sheetViews>"#
            )
        );
    }

    #[test]
    fn test_selection() {
        let mut ws = sheet();
        ws.set_selection(0, 0, 0, 0).unwrap();
        assert!(ws.view().selection.is_none());
        ws.set_selection(3, 2, 1, 1).unwrap();
        assert_eq!(
            views_xml(&ws),
            concat!(
                r#"<sheetViews><sheetView workbookViewId="0">"#,
                r#"<selection activeCell="C4" sqref="B2:C4"/></sheetView></sheetViews>"#
            )
        );
    }

    #[test]
    fn test_freeze_top_row() {
        let mut ws = sheet();
        ws.freeze_panes(1, 0, None, None).unwrap();
        assert_eq!(
            views_xml(&ws),
            concat!(
                r#"<sheetViews><sheetView workbookViewId="0">"#,
                r#"<pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>"#,
                r#"<selection pane="bottomLeft"/></sheetView></sheetViews>"#
            )
        );
    }

    #[test]
    fn test_freeze_row_and_column_with_selection() {
        let mut ws = sheet();
        ws.set_selection(5, 5, 5, 5).unwrap();
        ws.freeze_panes(1, 1, None, None).unwrap();
        assert_eq!(
            views_xml(&ws),
            concat!(
                r#"<sheetViews><sheetView workbookViewId="0">"#,
                r#"<pane xSplit="1" ySplit="1" topLeftCell="B2" activePane="bottomRight" state="frozen"/>"#,
                r#"<selection pane="topRight" activeCell="B1" sqref="B1"/>"#,
                r#"<selection pane="bottomLeft" activeCell="A2" sqref="A2"/>"#,
                r#"<selection pane="bottomRight" activeCell="F6" sqref="F6"/>"#,
                r#"</sheetView></sheetViews>"#
            )
        );
    }

    #[test]
    fn test_split_panes() {
        let mut ws = sheet();
        ws.split_panes(15.0, 0.0, None, None).unwrap();
        assert_eq!(
            views_xml(&ws),
            concat!(
                r#"<sheetViews><sheetView workbookViewId="0">"#,
                r#"<pane ySplit="600" topLeftCell="A2"/>"#,
                r#"<selection pane="bottomLeft" activeCell="A2" sqref="A2"/>"#,
                r#"</sheetView></sheetViews>"#
            )
        );
        assert!(ws.split_panes(-1.0, 0.0, None, None).is_err());
    }

    #[test]
    fn test_split_width() {
        // 8.43 characters = 64 px = 48 pt = 960 twips, plus padding
        assert_eq!(format_number(split_width_twips(8.43)), "1350");
    }

    #[test]
    fn test_sheet_pr() {
        let mut ws = sheet();
        let pr = |ws: &Worksheet, filter_on: bool| {
            let mut out = XmlWriter::new();
            write_sheet_pr(&mut out, ws.view(), ws.outline(), ws.page_setup(), filter_on);
            out.into_string()
        };
        assert_eq!(pr(&ws, false), "");
        assert_eq!(pr(&ws, true), r#"<sheetPr filterMode="1"/>"#);
        ws.set_tab_color("red").unwrap();
        ws.fit_to_pages(1, 1);
        assert_eq!(
            pr(&ws, false),
            r#"<sheetPr><tabColor rgb="FFFF0000"/><pageSetUpPr fitToPage="1"/></sheetPr>"#
        );
        assert!(ws.set_tab_color("#12").is_err());
    }

    #[test]
    fn test_top_left_cell_and_page_view() {
        let mut ws = sheet();
        ws.set_top_left_cell(0, 0).unwrap();
        assert!(ws.view().top_left_cell.is_none());
        ws.set_top_left_cell(30, 2).unwrap();
        ws.set_page_view(PageView::PageLayout);
        ws.hide_row_col_headers();
        assert_eq!(
            views_xml(&ws),
            concat!(
                r#"<sheetViews><sheetView showRowColHeaders="0" view="pageLayout" "#,
                r#"topLeftCell="C31" workbookViewId="0"/></sheetViews>"#
            )
        );
    }
}
