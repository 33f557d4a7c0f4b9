use serde::{Deserialize, Serialize};

use crate::error::XlsheetError;
use crate::options::keyword_enum;

keyword_enum! {
    /// Sparkline chart type.
    SparklineType, "sparkline type" {
        Line => "line" : ["line"],
        Column => "column" : ["column"],
        WinLoss => "stacked" : ["win_loss"],
    }
}

keyword_enum! {
    /// How empty cells are plotted.
    EmptyCells, "empty cell mode" {
        Gaps => "gap" : ["gaps", "gap"],
        Zero => "zero" : ["zero"],
        Connect => "span" : ["connect"],
    }
}

/// Sparkline color: theme color with optional tint, or an ARGB value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SparkColor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<f64>,
}

impl SparkColor {
    pub fn theme(theme: u8, tint: Option<f64>) -> Self {
        Self {
            rgb: None,
            theme: Some(theme),
            tint,
        }
    }

    pub fn rgb(argb: impl Into<String>) -> Self {
        Self {
            rgb: Some(argb.into()),
            theme: None,
            tint: None,
        }
    }
}

/// The seven role colors of a sparkline style.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SparkPalette {
    pub series: SparkColor,
    pub negative: SparkColor,
    pub markers: SparkColor,
    pub first: SparkColor,
    pub last: SparkColor,
    pub high: SparkColor,
    pub low: SparkColor,
}

/// A value or list of values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(s: &str) -> Self {
        Self::One(s.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(v: Vec<&str>) -> Self {
        Self::Many(v.into_iter().map(str::to_string).collect())
    }
}

/// Vertical axis bound: shared by the group or a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum AxisLimit {
    Group,
    Value(f64),
}

impl TryFrom<serde_json::Value> for AxisLimit {
    type Error = XlsheetError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        match &v {
            serde_json::Value::String(s) if s == "group" => Ok(Self::Group),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Value)
                .ok_or_else(|| XlsheetError::InvalidOption(format!("bad axis limit {v}"))),
            _ => Err(XlsheetError::InvalidOption(format!(
                "axis limit must be \"group\" or a number, got {v}"
            ))),
        }
    }
}

/// Options accepted by `add_sparkline`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparklineOptions {
    /// Target cell(s). Defaults to the cell passed to `add_sparkline`.
    pub location: Option<OneOrMany>,
    /// Source data range(s), required.
    pub range: Option<OneOrMany>,
    #[serde(rename = "type")]
    pub kind: Option<SparklineType>,
    pub high_point: bool,
    pub low_point: bool,
    pub negative_points: bool,
    pub first_point: bool,
    pub last_point: bool,
    pub markers: bool,
    /// Built-in style id, 0 to 35.
    pub style: Option<u8>,
    pub series_color: Option<String>,
    pub negative_color: Option<String>,
    pub markers_color: Option<String>,
    pub first_color: Option<String>,
    pub last_color: Option<String>,
    pub high_color: Option<String>,
    pub low_color: Option<String>,
    pub max: Option<AxisLimit>,
    pub min: Option<AxisLimit>,
    pub axis: bool,
    pub reverse: bool,
    pub empty_cells: Option<EmptyCells>,
    pub show_hidden: bool,
    pub date_axis: Option<String>,
    pub weight: Option<f64>,
}

impl SparklineOptions {
    pub fn new(range: impl Into<OneOrMany>) -> Self {
        Self {
            range: Some(range.into()),
            ..Self::default()
        }
    }
}

/// A stored sparkline group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SparklineGroup {
    pub kind: SparklineType,
    pub locations: Vec<String>,
    pub ranges: Vec<String>,
    pub high: bool,
    pub low: bool,
    pub negative: bool,
    pub first: bool,
    pub last: bool,
    pub markers: bool,
    pub axis: bool,
    pub reverse: bool,
    pub show_hidden: bool,
    pub max: Option<AxisLimit>,
    pub min: Option<AxisLimit>,
    pub empty_cells: EmptyCells,
    pub date_axis: Option<String>,
    pub weight: Option<f64>,
    pub colors: SparkPalette,
}
