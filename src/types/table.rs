use serde::{Deserialize, Serialize};

use crate::cell_ref::CellRange;
use crate::error::XlsheetError;
use crate::format::Format;
use crate::types::{CachedValue, CellInput};

/// Aggregate written in a table's total row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TotalFunction {
    Average,
    CountNums,
    Count,
    Max,
    Min,
    StdDev,
    Sum,
    Var,
    /// Any other formula, written as a `totalsRowFormula`.
    Custom(String),
}

impl TotalFunction {
    /// `SUBTOTAL` function number, `None` for custom formulas.
    pub const fn subtotal_code(&self) -> Option<u32> {
        match self {
            Self::Average => Some(101),
            Self::CountNums => Some(102),
            Self::Count => Some(103),
            Self::Max => Some(104),
            Self::Min => Some(105),
            Self::StdDev => Some(107),
            Self::Sum => Some(109),
            Self::Var => Some(110),
            Self::Custom(_) => None,
        }
    }

    /// `totalsRowFunction` attribute value.
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::CountNums => "countNums",
            Self::Count => "count",
            Self::Max => "max",
            Self::Min => "min",
            Self::StdDev => "stdDev",
            Self::Sum => "sum",
            Self::Var => "var",
            Self::Custom(_) => "custom",
        }
    }
}

impl std::str::FromStr for TotalFunction {
    type Err = XlsheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = match s.trim() {
            "average" => Self::Average,
            "count_nums" | "countNums" => Self::CountNums,
            "count" => Self::Count,
            "max" => Self::Max,
            "min" => Self::Min,
            "std_dev" | "stdDev" => Self::StdDev,
            "sum" => Self::Sum,
            "var" => Self::Var,
            "" => {
                return Err(XlsheetError::InvalidOption(
                    "empty table total function".to_string(),
                ))
            }
            other => Self::Custom(other.to_string()),
        };
        Ok(f)
    }
}

impl TryFrom<String> for TotalFunction {
    type Error = XlsheetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Per-column options of `add_table`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableColumnOptions {
    pub header: Option<String>,
    #[serde(skip)]
    pub header_format: Option<Format>,
    /// Format of the data cells, also the column's `dataDxfId`.
    #[serde(skip)]
    pub format: Option<Format>,
    /// Calculated column formula, `@` is expanded to `[#This Row],`.
    pub formula: Option<String>,
    pub total_function: Option<TotalFunction>,
    pub total_string: Option<String>,
    pub total_value: Option<f64>,
}

/// Options accepted by `add_table`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableOptions {
    pub name: Option<String>,
    /// Table style name, spaces are removed. `Some("")` writes no style.
    pub style: Option<String>,
    pub header_row: Option<bool>,
    pub autofilter: Option<bool>,
    pub banded_rows: Option<bool>,
    pub banded_columns: bool,
    pub first_column: bool,
    pub last_column: bool,
    pub total_row: bool,
    pub columns: Vec<TableColumnOptions>,
    /// Row-major data written below the header.
    pub data: Vec<Vec<CellInput>>,
}

/// A stored table column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub id: u32,
    pub name: String,
    pub total_string: Option<String>,
    pub total_function: Option<TotalFunction>,
    pub formula: Option<String>,
    pub dxf: Option<u32>,
}

/// A stored worksheet table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: u32,
    pub name: String,
    pub range: CellRange,
    /// Autofilter ref, the table range less any total row.
    pub autofilter: Option<String>,
    pub style: String,
    pub header_row: bool,
    pub total_row: bool,
    pub show_first_col: bool,
    pub show_last_col: bool,
    pub show_row_stripes: bool,
    pub show_col_stripes: bool,
    pub columns: Vec<TableColumn>,
}

/// Cached value of a total row formula.
pub(crate) fn total_cached_value(value: Option<f64>) -> CachedValue {
    CachedValue::Number(value.unwrap_or(0.0))
}
