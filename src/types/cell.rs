use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::datetime::DateValue;

/// How a string cell references its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum StringRef {
    /// Index into the shared string table.
    Shared(u32),
    /// Literal text written as an inline string (constant memory mode).
    Inline(String),
    /// Pre-built `<r>` run markup written inline (constant memory rich strings).
    InlineRich(String),
}

/// Cached result stored next to a formula.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CachedValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Default for CachedValue {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl From<f64> for CachedValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for CachedValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for CachedValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for CachedValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Excel error values a formula result may hold (`t="e"`).
pub const ERROR_CODES: [&str; 7] = [
    "#DIV/0!", "#N/A", "#NAME?", "#NULL!", "#NUM!", "#REF!", "#VALUE!",
];

/// Content of one stored cell. `xf` is the style index taken from the
/// format at write time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum CellValue {
    Number {
        value: f64,
        xf: Option<u32>,
    },
    String {
        string: StringRef,
        xf: Option<u32>,
    },
    Blank {
        xf: u32,
    },
    Boolean {
        value: bool,
        xf: Option<u32>,
    },
    Formula {
        formula: String,
        value: CachedValue,
        xf: Option<u32>,
    },
    ArrayFormula {
        formula: String,
        value: CachedValue,
        /// `A1` or `A1:B2` reference of the whole array.
        range: String,
        /// Dynamic array formula (`cm="1"`).
        dynamic: bool,
        xf: Option<u32>,
    },
}

impl CellValue {
    /// Style index of the cell, if any.
    pub fn xf(&self) -> Option<u32> {
        match self {
            Self::Number { xf, .. }
            | Self::String { xf, .. }
            | Self::Boolean { xf, .. }
            | Self::Formula { xf, .. }
            | Self::ArrayFormula { xf, .. } => *xf,
            Self::Blank { xf } => Some(*xf),
        }
    }

    /// Short tag name, used by summaries and logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number { .. } => "number",
            Self::String { .. } => "string",
            Self::Blank { .. } => "blank",
            Self::Boolean { .. } => "boolean",
            Self::Formula { .. } => "formula",
            Self::ArrayFormula { .. } => "arrayFormula",
        }
    }
}

/// Caller-side value handed to [`crate::Worksheet::write`].
///
/// The variant decides the dispatch: `Null` writes a blank, `Bool` a
/// boolean, `DateTime` a date serial, `Number` a number, `String` goes
/// through string sniffing and `Other` is tried as a number first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum CellInput {
    Null,
    Bool(bool),
    DateTime(DateValue),
    Number(f64),
    String(String),
    /// Display text of any other value.
    Other(String),
}

impl From<serde_json::Value> for CellInput {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Other(n.to_string()),
            },
            serde_json::Value::String(s) => Self::String(s),
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<&str> for CellInput {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for CellInput {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&String> for CellInput {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl From<bool> for CellInput {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for CellInput {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for CellInput {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i32> for CellInput {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for CellInput {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i64> for CellInput {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<DateValue> for CellInput {
    fn from(v: DateValue) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveDateTime> for CellInput {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v.into())
    }
}

impl From<NaiveDate> for CellInput {
    fn from(v: NaiveDate) -> Self {
        Self::DateTime(v.into())
    }
}

impl From<NaiveTime> for CellInput {
    fn from(v: NaiveTime) -> Self {
        Self::DateTime(v.into())
    }
}

impl<T: Into<CellInput>> From<Option<T>> for CellInput {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Row properties set through `set_row`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowInfo {
    pub height: f64,
    pub xf: Option<u32>,
    pub hidden: bool,
    pub level: u8,
    pub collapsed: bool,
}

/// Column range properties set through `set_column`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColInfo {
    pub first_col: u32,
    pub last_col: u32,
    /// Width in character units, `None` for the default.
    pub width: Option<f64>,
    pub xf: Option<u32>,
    pub hidden: bool,
    pub level: u8,
    pub collapsed: bool,
}

/// Optional row/column flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RowColOptions {
    pub hidden: bool,
    pub level: u8,
    pub collapsed: bool,
}
