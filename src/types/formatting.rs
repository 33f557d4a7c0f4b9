use serde::{Deserialize, Serialize};

use crate::datetime::DateValue;
use crate::error::XlsheetError;
use crate::format::Format;
use crate::options::keyword_enum;
use crate::types::Criteria;

keyword_enum! {
    /// Conditional format rule family.
    CfType, "conditional format type" {
        Cell => "cellIs" : ["cell"],
        Date => "cellIs" : ["date"],
        Time => "cellIs" : ["time"],
        Average => "aboveAverage" : ["average"],
        Duplicate => "duplicateValues" : ["duplicate"],
        Unique => "uniqueValues" : ["unique"],
        Top => "top10" : ["top"],
        Bottom => "top10" : ["bottom"],
        Text => "text" : ["text"],
        TimePeriod => "timePeriod" : ["time_period"],
        Blanks => "containsBlanks" : ["blanks"],
        NoBlanks => "notContainsBlanks" : ["no_blanks"],
        Errors => "containsErrors" : ["errors"],
        NoErrors => "notContainsErrors" : ["no_errors"],
        TwoColorScale => "colorScale" : ["2_color_scale"],
        ThreeColorScale => "colorScale" : ["3_color_scale"],
        DataBar => "dataBar" : ["data_bar"],
        Formula => "expression" : ["formula"],
    }
}

keyword_enum! {
    /// Criteria of `text` rules.
    TextCriteria, "text criteria" {
        Containing => "containsText" : ["containing"],
        NotContaining => "notContains" : ["not containing"],
        BeginsWith => "beginsWith" : ["begins with"],
        EndsWith => "endsWith" : ["ends with"],
    }
}

keyword_enum! {
    /// Named periods of `time_period` rules.
    TimePeriod, "time period" {
        Yesterday => "yesterday" : ["yesterday"],
        Today => "today" : ["today"],
        Tomorrow => "tomorrow" : ["tomorrow"],
        Last7Days => "last7Days" : ["last 7 days"],
        LastWeek => "lastWeek" : ["last week"],
        ThisWeek => "thisWeek" : ["this week"],
        NextWeek => "nextWeek" : ["next week", "continue week"],
        LastMonth => "lastMonth" : ["last month"],
        ThisMonth => "thisMonth" : ["this month"],
        NextMonth => "nextMonth" : ["next month", "continue month"],
    }
}

keyword_enum! {
    /// Criteria of `average` rules.
    AverageCriteria, "average criteria" {
        Above => "above" : ["above"],
        Below => "below" : ["below"],
        EqualOrAbove => "equal or above" : ["equal or above"],
        EqualOrBelow => "equal or below" : ["equal or below"],
        OneStdDevAbove => "1 std dev above" : ["1 std dev above"],
        OneStdDevBelow => "1 std dev below" : ["1 std dev below"],
        TwoStdDevAbove => "2 std dev above" : ["2 std dev above"],
        TwoStdDevBelow => "2 std dev below" : ["2 std dev below"],
        ThreeStdDevAbove => "3 std dev above" : ["3 std dev above"],
        ThreeStdDevBelow => "3 std dev below" : ["3 std dev below"],
    }
}

impl AverageCriteria {
    pub fn is_below(self) -> bool {
        self.wire().contains("below")
    }

    pub fn is_equal(self) -> bool {
        self.wire().starts_with("equal")
    }

    /// Standard deviation count, if any.
    pub fn std_dev(self) -> Option<u8> {
        match self {
            Self::OneStdDevAbove | Self::OneStdDevBelow => Some(1),
            Self::TwoStdDevAbove | Self::TwoStdDevBelow => Some(2),
            Self::ThreeStdDevAbove | Self::ThreeStdDevBelow => Some(3),
            _ => None,
        }
    }
}

keyword_enum! {
    /// Value type of a color scale or data bar end point.
    CfvoType, "cfvo type" {
        Min => "min" : ["min"],
        Num => "num" : ["num"],
        Percent => "percent" : ["percent"],
        Percentile => "percentile" : ["percentile"],
        Formula => "formula" : ["formula"],
        Max => "max" : ["max"],
    }
}

/// A rule operand: number, formula text, boolean or date.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum CfValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Date(DateValue),
}

impl TryFrom<serde_json::Value> for CfValue {
    type Error = XlsheetError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        match v {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| XlsheetError::InvalidOption(format!("bad number {n}"))),
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            other => Err(XlsheetError::InvalidOption(format!(
                "unsupported conditional format value {other}"
            ))),
        }
    }
}

impl From<f64> for CfValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for CfValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for CfValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<bool> for CfValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<DateValue> for CfValue {
    fn from(v: DateValue) -> Self {
        Self::Date(v)
    }
}

/// Options accepted by `conditional_format`.
///
/// `criteria` is interpreted per rule type: a comparison for cell/date/time
/// rules, a text or period keyword, an average variant, `"%"` for top/bottom
/// percentages, or the formula itself for `formula` rules.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConditionalFormatOptions {
    #[serde(rename = "type")]
    pub kind: Option<CfType>,
    pub criteria: Option<String>,
    pub value: Option<CfValue>,
    pub minimum: Option<CfValue>,
    pub maximum: Option<CfValue>,
    #[serde(skip)]
    pub format: Option<Format>,
    pub stop_if_true: bool,
    pub min_type: Option<CfvoType>,
    pub mid_type: Option<CfvoType>,
    pub max_type: Option<CfvoType>,
    pub min_value: Option<CfValue>,
    pub mid_value: Option<CfValue>,
    pub max_value: Option<CfValue>,
    pub min_color: Option<String>,
    pub mid_color: Option<String>,
    pub max_color: Option<String>,
    pub bar_color: Option<String>,
    pub multi_range: Option<String>,
}

impl ConditionalFormatOptions {
    pub fn new(kind: CfType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn criteria(mut self, criteria: &str) -> Self {
        self.criteria = Some(criteria.to_string());
        self
    }

    pub fn value(mut self, value: impl Into<CfValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn minimum(mut self, value: impl Into<CfValue>) -> Self {
        self.minimum = Some(value.into());
        self
    }

    pub fn maximum(mut self, value: impl Into<CfValue>) -> Self {
        self.maximum = Some(value.into());
        self
    }

    pub fn format(mut self, format: &Format) -> Self {
        self.format = Some(format.clone());
        self
    }
}

/// One end point of a color scale or data bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cfvo {
    pub kind: CfvoType,
    pub value: String,
}

/// The type specific part of a conditional format rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "rule")]
pub enum CfRule {
    /// Cell value comparison with one or two formulas.
    CellIs {
        operator: Criteria,
        formulas: Vec<String>,
    },
    AboveAverage {
        criteria: AverageCriteria,
    },
    Top10 {
        bottom: bool,
        percent: bool,
        rank: String,
    },
    Duplicate,
    Unique,
    Text {
        criteria: TextCriteria,
        text: String,
        formula: String,
    },
    TimePeriod {
        period: TimePeriod,
        formula: String,
    },
    /// Blanks/errors rules: `kind` is the cfRule type.
    Contains {
        kind: CfType,
        formula: String,
    },
    ColorScale {
        points: Vec<Cfvo>,
        /// ARGB colors, one per point.
        colors: Vec<String>,
    },
    DataBar {
        min: Cfvo,
        max: Cfvo,
        color: String,
    },
    Expression {
        formula: String,
    },
}

impl CfRule {
    /// `type` attribute of the `cfRule` element.
    pub fn wire_type(&self) -> &'static str {
        match self {
            Self::CellIs { .. } => "cellIs",
            Self::AboveAverage { .. } => "aboveAverage",
            Self::Top10 { .. } => "top10",
            Self::Duplicate => "duplicateValues",
            Self::Unique => "uniqueValues",
            Self::Text { criteria, .. } => match criteria {
                TextCriteria::Containing => "containsText",
                TextCriteria::NotContaining => "notContainsText",
                TextCriteria::BeginsWith => "beginsWith",
                TextCriteria::EndsWith => "endsWith",
            },
            Self::TimePeriod { .. } => "timePeriod",
            Self::Contains { kind, .. } => kind.wire(),
            Self::ColorScale { .. } => "colorScale",
            Self::DataBar { .. } => "dataBar",
            Self::Expression { .. } => "expression",
        }
    }
}

/// A stored conditional format rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalFormat {
    /// Global insertion order, lower first.
    pub priority: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dxf: Option<u32>,
    pub stop_if_true: bool,
    pub rule: CfRule,
}
