use serde::{Deserialize, Serialize};

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub header: f64,
    pub footer: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            left: 0.7,
            right: 0.7,
            top: 0.75,
            bottom: 0.75,
            header: 0.3,
            footer: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Which gridlines `hide_gridlines` turns off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HideGridlines {
    /// Show on screen and print them.
    None,
    /// Show on screen, do not print. The Excel default.
    #[default]
    Print,
    /// Hide on screen and in print.
    All,
}

/// Options of `set_header` / `set_footer`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderFooterOptions {
    /// Header or footer margin in inches, defaults to 0.3.
    pub margin: Option<f64>,
    pub scale_with_doc: Option<bool>,
    pub align_with_margins: Option<bool>,
}

/// Print setup: `printOptions`, `pageMargins`, `pageSetup`,
/// `headerFooter` and the page breaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    pub page_setup_changed: bool,
    pub print_options_changed: bool,
    pub header_footer_changed: bool,
    pub orientation: Orientation,
    /// Excel paper size id, 0 for the printer default.
    pub paper_size: u32,
    /// Print scale percent, 10 to 400.
    pub scale: u32,
    pub fit_page: bool,
    pub fit_width: u32,
    pub fit_height: u32,
    /// Print pages across then down.
    pub across: bool,
    pub first_page_number: Option<u32>,
    pub black_and_white: bool,
    pub center_horizontally: bool,
    pub center_vertically: bool,
    pub print_headings: bool,
    pub print_gridlines: bool,
    pub margins: PageMargins,
    pub header: String,
    pub footer: String,
    pub scale_with_doc: bool,
    pub align_with_margins: bool,
    pub row_breaks: Vec<u32>,
    pub col_breaks: Vec<u32>,
    /// `Sheet1!$A$1:$D$10` style defined name values.
    pub print_area: Option<String>,
    pub repeat_rows: Option<String>,
    pub repeat_cols: Option<String>,
}

impl PageSetup {
    /// Defaults of a sheet written in the Excel 2003 style.
    pub fn excel2003() -> Self {
        Self {
            margins: PageMargins {
                left: 0.75,
                right: 0.75,
                top: 1.0,
                bottom: 1.0,
                header: 0.5,
                footer: 0.5,
            },
            align_with_margins: false,
            ..Self::default()
        }
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            page_setup_changed: false,
            print_options_changed: false,
            header_footer_changed: false,
            orientation: Orientation::Portrait,
            paper_size: 0,
            scale: 100,
            fit_page: false,
            fit_width: 1,
            fit_height: 1,
            across: false,
            first_page_number: None,
            black_and_white: false,
            center_horizontally: false,
            center_vertically: false,
            print_headings: false,
            print_gridlines: false,
            margins: PageMargins::default(),
            header: String::new(),
            footer: String::new(),
            scale_with_doc: true,
            align_with_margins: true,
            row_breaks: Vec::new(),
            col_breaks: Vec::new(),
            print_area: None,
            repeat_rows: None,
            repeat_cols: None,
        }
    }
}
