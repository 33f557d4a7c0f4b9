use serde::{Deserialize, Serialize};

use crate::datetime::DateValue;
use crate::error::XlsheetError;
use crate::options::keyword_enum;

keyword_enum! {
    /// What a data validation checks.
    ValidationType, "validation type" {
        Any => "none" : ["any", "any value"],
        Whole => "whole" : ["whole number", "whole", "integer"],
        Decimal => "decimal" : ["decimal"],
        List => "list" : ["list"],
        Date => "date" : ["date"],
        Time => "time" : ["time"],
        TextLength => "textLength" : ["text length", "length"],
        Custom => "custom" : ["custom"],
    }
}

keyword_enum! {
    /// Comparison applied by a data validation.
    Criteria, "validation criteria" {
        Between => "between" : ["between"],
        NotBetween => "notBetween" : ["not between"],
        Equal => "equal" : ["equal to", "=", "=="],
        NotEqual => "notEqual" : ["not equal to", "!=", "<>"],
        GreaterThan => "greaterThan" : ["greater than", ">"],
        LessThan => "lessThan" : ["less than", "<"],
        GreaterThanOrEqual => "greaterThanOrEqual" : ["greater than or equal to", ">="],
        LessThanOrEqual => "lessThanOrEqual" : ["less than or equal to", "<="],
    }
}

keyword_enum! {
    /// Error dialog shown for invalid input.
    ErrorStyle, "error type" {
        Stop => "stop" : ["stop"],
        Warning => "warning" : ["warning"],
        Information => "information" : ["information"],
    }
}

/// A validation operand: a number, a formula/cell reference, an inline
/// list or a date.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum DvValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
    Date(DateValue),
}

impl TryFrom<serde_json::Value> for DvValue {
    type Error = XlsheetError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        match v {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| XlsheetError::InvalidOption(format!("bad number {n}"))),
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Array(items) => Ok(Self::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            other => Err(XlsheetError::InvalidOption(format!(
                "unsupported validation value {other}"
            ))),
        }
    }
}

impl From<f64> for DvValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for DvValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for DvValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<&str>> for DvValue {
    fn from(v: Vec<&str>) -> Self {
        Self::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<DateValue> for DvValue {
    fn from(v: DateValue) -> Self {
        Self::Date(v)
    }
}

/// Options accepted by `data_validation`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataValidationOptions {
    pub validate: Option<ValidationType>,
    pub criteria: Option<Criteria>,
    pub value: Option<DvValue>,
    /// Alias of `value`, usually for list sources.
    pub source: Option<DvValue>,
    /// Alias of `value` for range criteria.
    pub minimum: Option<DvValue>,
    pub maximum: Option<DvValue>,
    pub ignore_blank: Option<bool>,
    pub dropdown: Option<bool>,
    pub show_input: Option<bool>,
    pub input_title: Option<String>,
    pub input_message: Option<String>,
    pub show_error: Option<bool>,
    pub error_title: Option<String>,
    pub error_message: Option<String>,
    pub error_type: Option<ErrorStyle>,
    /// Extra `(first_row, first_col, last_row, last_col)` ranges.
    pub other_cells: Vec<(u32, u32, u32, u32)>,
    /// Explicit sqref overriding the computed one, e.g. `"A1:A5 C1:C5"`.
    pub multi_range: Option<String>,
}

impl DataValidationOptions {
    pub fn new(validate: ValidationType) -> Self {
        Self {
            validate: Some(validate),
            ..Self::default()
        }
    }

    pub fn criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn value(mut self, value: impl Into<DvValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn maximum(mut self, value: impl Into<DvValue>) -> Self {
        self.maximum = Some(value.into());
        self
    }
}

/// A validated data validation rule ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValidation {
    pub validate: ValidationType,
    pub criteria: Criteria,
    /// `formula1` text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `formula2` text, only for between/not between.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<String>,
    pub ignore_blank: bool,
    pub dropdown: bool,
    pub show_input: bool,
    pub show_error: bool,
    pub input_title: Option<String>,
    pub input_message: Option<String>,
    pub error_title: Option<String>,
    pub error_message: Option<String>,
    pub error_type: ErrorStyle,
    /// Space separated list of ranges the rule applies to.
    pub sqref: String,
}
