//! Cell format handle.
//!
//! The workbook owns the style tables; a worksheet only needs the indices a
//! format was registered under plus the font properties written into rich
//! string runs.

use serde::Serialize;

/// Underline variants understood by Excel's font records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
}

/// Superscript/subscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FontScript {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

/// A registered cell format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    /// Index into the workbook `cellXfs` table.
    pub xf_index: Option<u32>,
    /// Index into the workbook `dxfs` table (conditional formats).
    pub dxf_index: Option<u32>,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikeout: bool,
    pub outline: bool,
    pub shadow: bool,
    pub script: FontScript,
    pub font_size: f64,
    pub font_name: String,
    pub font_family: u8,
    pub font_scheme: String,
    /// `#RRGGBB` or named color.
    pub font_color: Option<String>,
    pub theme: Option<u8>,
    pub color_indexed: Option<u8>,
    /// Font is the built-in hyperlink style.
    pub hyperlink: bool,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            xf_index: None,
            dxf_index: None,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikeout: false,
            outline: false,
            shadow: false,
            script: FontScript::Baseline,
            font_size: 11.0,
            font_name: "Calibri".to_string(),
            font_family: 2,
            font_scheme: "minor".to_string(),
            font_color: None,
            theme: None,
            color_indexed: None,
            hyperlink: false,
        }
    }
}

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format registered at `xf` in the cell style table.
    pub fn with_xf(xf: u32) -> Self {
        Self {
            xf_index: Some(xf),
            ..Self::default()
        }
    }

    /// Format registered at `dxf` in the differential style table.
    pub fn with_dxf(dxf: u32) -> Self {
        Self {
            dxf_index: Some(dxf),
            ..Self::default()
        }
    }

    /// Cell style index, `0` when the format was never registered.
    pub fn xf(&self) -> u32 {
        self.xf_index.unwrap_or(0)
    }

    /// Differential style index, `0` when the format was never registered.
    pub fn dxf(&self) -> u32 {
        self.dxf_index.unwrap_or(0)
    }

    pub fn set_xf_index(mut self, xf: u32) -> Self {
        self.xf_index = Some(xf);
        self
    }

    pub fn set_dxf_index(mut self, dxf: u32) -> Self {
        self.dxf_index = Some(dxf);
        self
    }

    pub fn set_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn set_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn set_underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    pub fn set_strikeout(mut self) -> Self {
        self.strikeout = true;
        self
    }

    pub fn set_font_outline(mut self) -> Self {
        self.outline = true;
        self
    }

    pub fn set_font_shadow(mut self) -> Self {
        self.shadow = true;
        self
    }

    pub fn set_font_script(mut self, script: FontScript) -> Self {
        self.script = script;
        self
    }

    pub fn set_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn set_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    pub fn set_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = Some(color.into());
        self
    }

    pub fn set_theme(mut self, theme: u8) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn set_hyperlink(mut self) -> Self {
        self.hyperlink = true;
        self
    }
}
