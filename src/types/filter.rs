use std::collections::BTreeMap;

use serde::Serialize;

use crate::cell_ref::CellRange;

/// Operator of one autofilter condition.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    LessThan,
    Equal,
    LessThanOrEqual,
    GreaterThan,
    NotEqual,
    GreaterThanOrEqual,
    /// Equality against a value holding `*` or `?`.
    Wildcard,
    Top,
    TopPercent,
    Bottom,
    BottomPercent,
}

impl FilterOperator {
    /// Numeric operator code used by Excel's binary filter records.
    pub const fn code(self) -> u8 {
        match self {
            Self::LessThan => 1,
            Self::Equal => 2,
            Self::LessThanOrEqual => 3,
            Self::GreaterThan => 4,
            Self::NotEqual => 5,
            Self::GreaterThanOrEqual => 6,
            Self::Wildcard => 22,
            Self::Top => 30,
            Self::TopPercent => 31,
            Self::Bottom => 32,
            Self::BottomPercent => 33,
        }
    }

    /// `operator` attribute of a `customFilter`. `None` for plain equality,
    /// which is the default and never written.
    pub const fn wire(self) -> Option<&'static str> {
        match self {
            Self::LessThan => Some("lessThan"),
            Self::LessThanOrEqual => Some("lessThanOrEqual"),
            Self::GreaterThan => Some("greaterThan"),
            Self::NotEqual => Some("notEqual"),
            Self::GreaterThanOrEqual => Some("greaterThanOrEqual"),
            Self::Equal
            | Self::Wildcard
            | Self::Top
            | Self::TopPercent
            | Self::Bottom
            | Self::BottomPercent => None,
        }
    }

    pub const fn is_top10(self) -> bool {
        matches!(
            self,
            Self::Top | Self::TopPercent | Self::Bottom | Self::BottomPercent
        )
    }
}

/// A single `operator value` condition.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub operator: FilterOperator,
    pub value: String,
}

/// How two conditions combine.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FilterJoin {
    And,
    Or,
}

/// One or two conditions parsed from a filter expression.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterExpression {
    pub first: FilterCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<(FilterJoin, FilterCondition)>,
}

/// Criteria applied to one column of the autofilter.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FilterColumn {
    /// Values to show (`<filters>`). `"Blanks"` selects empty cells.
    List(Vec<String>),
    /// Classic custom criteria (`<customFilters>` or `<top10>`).
    Custom(FilterExpression),
}

/// Autofilter over a worksheet range.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutoFilter {
    pub range: CellRange,
    /// Defined name area, e.g. `Sheet1!$A$1:$D$10`.
    pub area: String,
    /// Criteria keyed by absolute column.
    pub columns: BTreeMap<u32, FilterColumn>,
}

impl AutoFilter {
    /// Any column has criteria.
    pub fn is_active(&self) -> bool {
        !self.columns.is_empty()
    }
}
