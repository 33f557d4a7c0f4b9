use serde::Serialize;

/// Worksheet view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PageView {
    #[default]
    Normal,
    PageLayout,
    PageBreakPreview,
}

/// Frozen or split panes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Pane {
    /// Rows above `row` and columns left of `col` stay on screen.
    Freeze {
        row: u32,
        col: u32,
        top_row: u32,
        left_col: u32,
    },
    /// Split position as row height in points and column width in
    /// character units.
    Split {
        y: f64,
        x: f64,
        top_row: Option<u32>,
        left_col: Option<u32>,
    },
}

/// A user selection set through `set_selection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub active_cell: String,
    pub sqref: String,
}

/// A `<selection>` element as written, with its pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneSelection {
    pub pane: Option<&'static str>,
    pub active_cell: String,
    pub sqref: String,
}

/// State of the single `<sheetView>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetView {
    pub show_gridlines: bool,
    pub show_row_col_headers: bool,
    pub show_zeros: bool,
    pub right_to_left: bool,
    pub selected: bool,
    pub page_view: PageView,
    pub top_left_cell: Option<String>,
    /// Zoom percent, 10 to 400.
    pub zoom: u32,
    pub zoom_scale_normal: bool,
    pub pane: Option<Pane>,
    pub selection: Option<Selection>,
    /// `FFRRGGBB` worksheet tab color.
    pub tab_color: Option<String>,
}

impl Default for SheetView {
    fn default() -> Self {
        Self {
            show_gridlines: true,
            show_row_col_headers: true,
            show_zeros: true,
            right_to_left: false,
            selected: false,
            page_view: PageView::Normal,
            top_left_cell: None,
            zoom: 100,
            zoom_scale_normal: true,
            pane: None,
            selection: None,
            tab_color: None,
        }
    }
}
