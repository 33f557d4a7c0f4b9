//! Autofilter range and column criteria.
//!
//! Criteria are given as small expressions such as `x > 2000`,
//! `x == Blanks`, `x =~ b*` or `Top 10 %`, with an optional second
//! condition joined by `and`/`or`:
//!
//! ```xml
//! <autoFilter ref="A1:D51">
//!   <filterColumn colId="0">
//!     <customFilters and="1">
//!       <customFilter operator="greaterThan" val="2000"/>
//!       <customFilter operator="lessThan" val="5000"/>
//!     </customFilters>
//!   </filterColumn>
//! </autoFilter>
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::cell_ref::{quote_sheet_name, CellRange};
use crate::error::{Result, XlsheetError};
use crate::export::XmlWriter;
use crate::types::{
    AutoFilter, FilterColumn, FilterCondition, FilterExpression, FilterJoin, FilterOperator,
};
use crate::worksheet::{check_bounds, Worksheet};

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r#""(?:[^"]|"")*"|\S+"#).expect("valid filter token regex"))
}

impl Worksheet {
    /// Add an autofilter over a range. A later call replaces the range and
    /// drops earlier column criteria.
    pub fn autofilter(
        &mut self,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
    ) -> Result<()> {
        check_bounds(first_row, first_col)?;
        check_bounds(last_row, last_col)?;
        let range = CellRange::new(first_row, first_col, last_row, last_col);
        let area = format!("{}!{}", quote_sheet_name(&self.options.name), range.name_abs());
        log::debug!("autofilter {} on '{}'", range.name(), self.options.name);
        self.autofilter = Some(AutoFilter {
            range,
            area,
            columns: BTreeMap::new(),
        });
        Ok(())
    }

    /// Filter one autofilter column with an expression like `x > 2000` or
    /// `x == East or x == West`.
    pub fn filter_column(&mut self, col: u32, expression: &str) -> Result<()> {
        self.check_filter_column(col)?;
        let parsed = parse_filter_expression(expression)?;
        let criteria = collapse_equality(parsed);
        self.set_filter_column(col, criteria);
        Ok(())
    }

    /// Filter one autofilter column to a list of values. `Blanks` selects
    /// empty cells.
    pub fn filter_column_list<S: AsRef<str>>(&mut self, col: u32, values: &[S]) -> Result<()> {
        self.check_filter_column(col)?;
        if values.is_empty() {
            return Err(XlsheetError::InvalidOption(
                "filter_column_list needs at least one value".to_string(),
            ));
        }
        let values = values.iter().map(|v| v.as_ref().to_string()).collect();
        self.set_filter_column(col, FilterColumn::List(values));
        Ok(())
    }

    fn check_filter_column(&self, col: u32) -> Result<()> {
        let Some(filter) = &self.autofilter else {
            log::warn!("autofilter() must be called before filter_column()");
            return Err(XlsheetError::Conflict(
                "filter_column called without an autofilter".to_string(),
            ));
        };
        let range = filter.range;
        if col < range.first_col || col > range.last_col {
            log::warn!(
                "column {col} is outside the autofilter range {}",
                range.name()
            );
            return Err(XlsheetError::Conflict(format!(
                "column {col} is outside the autofilter range {}",
                range.name()
            )));
        }
        Ok(())
    }

    fn set_filter_column(&mut self, col: u32, criteria: FilterColumn) {
        if let Some(filter) = self.autofilter.as_mut() {
            filter.columns.insert(col, criteria);
        }
    }

    /// An autofilter column has criteria (`filterMode` on `sheetPr`).
    pub(crate) fn filter_on(&self) -> bool {
        self.autofilter.as_ref().is_some_and(AutoFilter::is_active)
    }
}

/// Parse a filter expression into one or two conditions.
pub fn parse_filter_expression(expression: &str) -> Result<FilterExpression> {
    let tokens = extract_tokens(expression);
    match tokens.as_slice() {
        [a, b, c] => Ok(FilterExpression {
            first: parse_condition(expression, a, b, c)?,
            second: None,
        }),
        [a, b, c, join, d, e, f] => {
            let join = if join.starts_with("and") || join.starts_with("&&") {
                FilterJoin::And
            } else if join.starts_with("or") || join.starts_with("||") {
                FilterJoin::Or
            } else {
                log::warn!("'{join}' is not a valid conditional in filter expression '{expression}'");
                return Err(XlsheetError::InvalidOption(format!(
                    "'{join}' is not a valid conditional in '{expression}'"
                )));
            };
            Ok(FilterExpression {
                first: parse_condition(expression, a, b, c)?,
                second: Some((join, parse_condition(expression, d, e, f)?)),
            })
        }
        _ => {
            log::warn!("incorrect number of tokens in filter expression '{expression}'");
            Err(XlsheetError::InvalidOption(format!(
                "incorrect number of tokens in filter expression '{expression}'"
            )))
        }
    }
}

/// Split on whitespace, keeping `"quoted strings"` whole and unescaping
/// doubled quotes.
fn extract_tokens(expression: &str) -> Vec<String> {
    token_re()
        .find_iter(expression)
        .map(|m| {
            let token = m.as_str();
            let token = token.strip_prefix('"').unwrap_or(token);
            let token = token.strip_suffix('"').unwrap_or(token);
            token.replace("\"\"", "\"")
        })
        .collect()
}

fn parse_condition(expression: &str, subject: &str, op: &str, value: &str) -> Result<FilterCondition> {
    let subject_lower = subject.to_ascii_lowercase();
    if subject_lower.starts_with("top") || subject_lower.starts_with("bottom") {
        return parse_top10(expression, &subject_lower, op, value);
    }

    let mut operator = match op {
        "==" | "=" | "=~" | "eq" => FilterOperator::Equal,
        "!=" | "!~" | "ne" | "<>" => FilterOperator::NotEqual,
        "<" => FilterOperator::LessThan,
        "<=" => FilterOperator::LessThanOrEqual,
        ">" => FilterOperator::GreaterThan,
        ">=" => FilterOperator::GreaterThanOrEqual,
        _ => {
            log::warn!("'{op}' is not a valid operator in filter expression '{expression}'");
            return Err(XlsheetError::InvalidOption(format!(
                "'{op}' is not a valid operator in '{expression}'"
            )));
        }
    };
    let mut value = value.to_string();

    let lower = value.to_ascii_lowercase();
    if lower.starts_with("blanks") || lower.starts_with("nonblanks") {
        if !matches!(operator, FilterOperator::Equal | FilterOperator::NotEqual) {
            log::warn!("operator '{op}' is not valid with Blanks/NonBlanks in '{expression}'");
            return Err(XlsheetError::InvalidOption(format!(
                "operator '{op}' is not valid with Blanks/NonBlanks in '{expression}'"
            )));
        }
        // Blank tests are stored as equality against "blanks" or a space.
        value = match (lower.starts_with("blanks"), operator) {
            (true, FilterOperator::NotEqual) => " ".to_string(),
            (true, _) => lower,
            (false, FilterOperator::NotEqual) => {
                operator = FilterOperator::Equal;
                "blanks".to_string()
            }
            (false, _) => {
                operator = FilterOperator::NotEqual;
                " ".to_string()
            }
        };
    }

    if operator == FilterOperator::Equal && value.contains(['*', '?']) {
        operator = FilterOperator::Wildcard;
    }
    Ok(FilterCondition { operator, value })
}

fn parse_top10(expression: &str, subject: &str, count: &str, kind: &str) -> Result<FilterCondition> {
    let value: u32 = count.parse().map_err(|_| {
        XlsheetError::InvalidOption(format!("'{count}' is not a count in '{expression}'"))
    })?;
    if !(1..=500).contains(&value) {
        log::warn!("value '{value}' in Top 10 filter expression '{expression}' must be in 1..=500");
        return Err(XlsheetError::ValueOutOfRange {
            what: "top 10 filter count",
            value: f64::from(value),
            min: 1.0,
            max: 500.0,
        });
    }
    let percent = match kind.to_ascii_lowercase().as_str() {
        "items" => false,
        "%" => true,
        _ => {
            log::warn!("type '{kind}' in Top 10 filter expression '{expression}' must be 'items' or '%'");
            return Err(XlsheetError::InvalidOption(format!(
                "type '{kind}' in '{expression}' must be 'items' or '%'"
            )));
        }
    };
    let operator = match (subject.starts_with("top"), percent) {
        (true, false) => FilterOperator::Top,
        (true, true) => FilterOperator::TopPercent,
        (false, false) => FilterOperator::Bottom,
        (false, true) => FilterOperator::BottomPercent,
    };
    Ok(FilterCondition {
        operator,
        value: value.to_string(),
    })
}

/// Plain equality, or two equalities joined by `or`, is written as a value
/// list rather than custom filters.
fn collapse_equality(expr: FilterExpression) -> FilterColumn {
    match expr {
        FilterExpression {
            first:
                FilterCondition {
                    operator: FilterOperator::Equal,
                    value,
                },
            second: None,
        } => FilterColumn::List(vec![value]),
        FilterExpression {
            first:
                FilterCondition {
                    operator: FilterOperator::Equal,
                    value: v1,
                },
            second:
                Some((
                    FilterJoin::Or,
                    FilterCondition {
                        operator: FilterOperator::Equal,
                        value: v2,
                    },
                )),
        } => FilterColumn::List(vec![v1, v2]),
        other => FilterColumn::Custom(other),
    }
}

/// `<autoFilter>`, empty unless a column has criteria.
pub(crate) fn write_autofilter(out: &mut XmlWriter, filter: Option<&AutoFilter>) {
    let Some(filter) = filter else {
        return;
    };
    let attrs = [("ref", filter.range.name())];
    if !filter.is_active() {
        out.empty_tag("autoFilter", &attrs);
        return;
    }
    out.start_tag("autoFilter", &attrs);
    for (col, criteria) in &filter.columns {
        let col_id = col.saturating_sub(filter.range.first_col);
        out.start_tag("filterColumn", &[("colId", col_id.to_string())]);
        match criteria {
            FilterColumn::List(values) => write_filters(out, values),
            FilterColumn::Custom(expr) if expr.first.operator.is_top10() && expr.second.is_none() => {
                write_top10(out, &expr.first);
            }
            FilterColumn::Custom(expr) => write_custom_filters(out, expr),
        }
        out.end_tag("filterColumn");
    }
    out.end_tag("autoFilter");
}

fn write_filters(out: &mut XmlWriter, values: &[String]) {
    let mut shown: Vec<&String> = values
        .iter()
        .filter(|v| !v.eq_ignore_ascii_case("blanks"))
        .collect();
    let attrs = if shown.len() == values.len() {
        Vec::new()
    } else {
        vec![("blank", "1".to_string())]
    };
    if shown.is_empty() {
        out.empty_tag("filters", &attrs);
        return;
    }
    shown.sort();
    out.start_tag("filters", &attrs);
    for value in shown {
        out.empty_tag("filter", &[("val", value.clone())]);
    }
    out.end_tag("filters");
}

fn write_custom_filters(out: &mut XmlWriter, expr: &FilterExpression) {
    let attrs = match &expr.second {
        None => Vec::new(),
        Some((FilterJoin::And, _)) => vec![("and", "1".to_string())],
        Some((FilterJoin::Or, _)) => vec![("and", "0".to_string())],
    };
    out.start_tag("customFilters", &attrs);
    write_custom_filter(out, &expr.first);
    if let Some((_, second)) = &expr.second {
        write_custom_filter(out, second);
    }
    out.end_tag("customFilters");
}

fn write_custom_filter(out: &mut XmlWriter, cond: &FilterCondition) {
    let mut attrs = Vec::with_capacity(2);
    if let Some(op) = cond.operator.wire() {
        attrs.push(("operator", op.to_string()));
    }
    attrs.push(("val", cond.value.clone()));
    out.empty_tag("customFilter", &attrs);
}

fn write_top10(out: &mut XmlWriter, cond: &FilterCondition) {
    let mut attrs = Vec::with_capacity(3);
    if matches!(
        cond.operator,
        FilterOperator::Bottom | FilterOperator::BottomPercent
    ) {
        attrs.push(("top", "0".to_string()));
    }
    if matches!(
        cond.operator,
        FilterOperator::TopPercent | FilterOperator::BottomPercent
    ) {
        attrs.push(("percent", "1".to_string()));
    }
    attrs.push(("val", cond.value.clone()));
    out.empty_tag("top10", &attrs);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::WorksheetOptions;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn filtered_sheet() -> Worksheet {
        let mut ws = Worksheet::new(WorksheetOptions::default()).unwrap();
        ws.autofilter(0, 0, 50, 3).unwrap();
        ws
    }

    fn filter_xml(ws: &Worksheet) -> String {
        let mut out = XmlWriter::new();
        write_autofilter(&mut out, ws.autofilter_state());
        out.into_string()
    }

    fn cond(operator: FilterOperator, value: &str) -> FilterCondition {
        FilterCondition {
            operator,
            value: value.to_string(),
        }
    }

    #[test_case("x == East", FilterOperator::Equal, "East" ; "equal")]
    #[test_case("x eq East", FilterOperator::Equal, "East" ; "eq keyword")]
    #[test_case("x <> East", FilterOperator::NotEqual, "East" ; "not equal")]
    #[test_case("x > 2000", FilterOperator::GreaterThan, "2000" ; "greater")]
    #[test_case("x <= 10", FilterOperator::LessThanOrEqual, "10" ; "less or equal")]
    #[test_case("x =~ b*", FilterOperator::Wildcard, "b*" ; "wildcard")]
    #[test_case("x == Blanks", FilterOperator::Equal, "blanks" ; "blanks")]
    #[test_case("x != Blanks", FilterOperator::NotEqual, " " ; "not blanks")]
    #[test_case("x == NonBlanks", FilterOperator::NotEqual, " " ; "nonblanks")]
    #[test_case("x != NonBlanks", FilterOperator::Equal, "blanks" ; "not nonblanks")]
    #[test_case("Top 10 Items", FilterOperator::Top, "10" ; "top items")]
    #[test_case("Bottom 5 %", FilterOperator::BottomPercent, "5" ; "bottom percent")]
    #[test_case(r#"x == "East Coast""#, FilterOperator::Equal, "East Coast" ; "quoted")]
    #[test_case(r#"x == "a ""b"" c""#, FilterOperator::Equal, r#"a "b" c"# ; "doubled quotes")]
    fn test_parse_single(expr: &str, operator: FilterOperator, value: &str) {
        let parsed = parse_filter_expression(expr).unwrap();
        assert_eq!(parsed.first, cond(operator, value));
        assert_eq!(parsed.second, None);
    }

    #[test]
    fn test_parse_joined() {
        let parsed = parse_filter_expression("x > 2000 and x < 5000").unwrap();
        assert_eq!(parsed.first, cond(FilterOperator::GreaterThan, "2000"));
        assert_eq!(
            parsed.second,
            Some((FilterJoin::And, cond(FilterOperator::LessThan, "5000")))
        );
        let parsed = parse_filter_expression("x == a || x == b").unwrap();
        assert_eq!(parsed.second.map(|(join, _)| join), Some(FilterJoin::Or));
    }

    #[test_case("x >" ; "too few")]
    #[test_case("x > 1 and" ; "five tokens")]
    #[test_case("x >> 1" ; "bad operator")]
    #[test_case("x > 1 xor x < 2" ; "bad join")]
    #[test_case("x > Blanks" ; "blanks needs equality")]
    #[test_case("Top 501 items" ; "top too large")]
    #[test_case("Top 10 rows" ; "top bad kind")]
    fn test_parse_errors(expr: &str) {
        assert!(parse_filter_expression(expr).is_err());
    }

    #[test]
    fn test_requires_autofilter() {
        let mut ws = Worksheet::new(WorksheetOptions::default()).unwrap();
        let err = ws.filter_column(0, "x > 1").unwrap_err();
        assert!(matches!(err, XlsheetError::Conflict(_)));
    }

    #[test]
    fn test_column_outside_range() {
        let mut ws = filtered_sheet();
        assert!(ws.filter_column(4, "x > 1").is_err());
        assert!(!ws.filter_on());
    }

    #[test]
    fn test_area_and_empty_filter() {
        let ws = filtered_sheet();
        assert_eq!(ws.autofilter_state().unwrap().area, "Sheet1!$A$1:$D$51");
        assert_eq!(filter_xml(&ws), "<autoFilter ref=\"A1:D51\"/>");
    }

    #[test]
    fn test_quoted_sheet_area() {
        let mut ws = Worksheet::new(WorksheetOptions {
            name: "Sales Data".to_string(),
            ..WorksheetOptions::default()
        })
        .unwrap();
        ws.autofilter(9, 3, 0, 0).unwrap();
        let filter = ws.autofilter_state().unwrap();
        assert_eq!(filter.range.name(), "A1:D10");
        assert_eq!(filter.area, "'Sales Data'!$A$1:$D$10");
    }

    #[test]
    fn test_equality_becomes_list() {
        let mut ws = filtered_sheet();
        ws.filter_column(0, "x == East or x == West").unwrap();
        ws.filter_column(2, "x == Blanks").unwrap();
        assert!(ws.filter_on());
        assert_eq!(
            filter_xml(&ws),
            "<autoFilter ref=\"A1:D51\">\
             <filterColumn colId=\"0\"><filters><filter val=\"East\"/><filter val=\"West\"/></filters></filterColumn>\
             <filterColumn colId=\"2\"><filters blank=\"1\"/></filterColumn>\
             </autoFilter>"
        );
    }

    #[test]
    fn test_custom_filters_xml() {
        let mut ws = filtered_sheet();
        ws.filter_column(1, "x > 2000 and x < 5000").unwrap();
        ws.filter_column(3, "x =~ b*").unwrap();
        assert_eq!(
            filter_xml(&ws),
            "<autoFilter ref=\"A1:D51\">\
             <filterColumn colId=\"1\"><customFilters and=\"1\">\
             <customFilter operator=\"greaterThan\" val=\"2000\"/>\
             <customFilter operator=\"lessThan\" val=\"5000\"/>\
             </customFilters></filterColumn>\
             <filterColumn colId=\"3\"><customFilters><customFilter val=\"b*\"/></customFilters></filterColumn>\
             </autoFilter>"
        );
    }

    #[test]
    fn test_list_sorted_with_blanks() {
        let mut ws = filtered_sheet();
        ws.filter_column_list(0, &["March", "Blanks", "April"]).unwrap();
        assert!(filter_xml(&ws).contains(
            "<filters blank=\"1\"><filter val=\"April\"/><filter val=\"March\"/></filters>"
        ));
    }

    #[test]
    fn test_top10_xml() {
        let mut ws = filtered_sheet();
        ws.filter_column(0, "Bottom 5 %").unwrap();
        assert!(filter_xml(&ws).contains("<top10 top=\"0\" percent=\"1\" val=\"5\"/>"));
    }
}
