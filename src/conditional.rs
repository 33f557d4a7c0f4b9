//! Conditional formatting rules.
//!
//! Rules are grouped by the range they apply to and written in sorted
//! range order. Priorities follow the order rules were added across the
//! whole sheet, starting at 1.
//!
//! ```xml
//! <conditionalFormatting sqref="A1:A10">
//!   <cfRule type="cellIs" dxfId="0" priority="1" operator="greaterThan">
//!     <formula>5</formula>
//!   </cfRule>
//!   <cfRule type="colorScale" priority="2">
//!     <colorScale>
//!       <cfvo type="min" val="0"/>
//!       <cfvo type="max" val="0"/>
//!       <color rgb="FFFF7128"/>
//!       <color rgb="FFFFEF9C"/>
//!     </colorScale>
//!   </cfRule>
//! </conditionalFormatting>
//! ```

use std::collections::BTreeMap;

use crate::cell_ref::{cell_name, CellRange};
use crate::color::to_argb;
use crate::datetime::excel_serial;
use crate::error::{Result, XlsheetError};
use crate::export::{format_number, XmlWriter};
use crate::types::{
    AverageCriteria, CfRule, CfType, CfValue, Cfvo, CfvoType, ConditionalFormat,
    ConditionalFormatOptions, Criteria, TextCriteria, TimePeriod,
};
use crate::worksheet::{check_bounds, Worksheet};

impl Worksheet {
    /// Add a conditional format rule over a range.
    pub fn conditional_format(
        &mut self,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
        options: &ConditionalFormatOptions,
    ) -> Result<()> {
        check_bounds(first_row, first_col)?;
        check_bounds(last_row, last_col)?;

        let Some(kind) = options.kind else {
            log::warn!("parameter 'type' is required in conditional_format()");
            return Err(XlsheetError::InvalidOption(
                "conditional_format requires 'type'".to_string(),
            ));
        };

        let range = CellRange::new(first_row, first_col, last_row, last_col);
        let start_cell = cell_name(range.first_row, range.first_col);
        let sqref = match &options.multi_range {
            Some(multi) => multi.replace('$', ""),
            None => range.name(),
        };

        let rule = build_rule(kind, options, &start_cell, self.options.date_1904)?;
        let dxf = match rule {
            CfRule::ColorScale { .. } | CfRule::DataBar { .. } => None,
            _ => options.format.as_ref().map(|f| f.dxf()),
        };

        self.cf_priority += 1;
        log::debug!(
            "conditional format {} on {sqref} with priority {}",
            rule.wire_type(),
            self.cf_priority
        );
        self.cond_formats
            .entry(sqref)
            .or_default()
            .push(ConditionalFormat {
                priority: self.cf_priority,
                dxf,
                stop_if_true: options.stop_if_true,
                rule,
            });
        Ok(())
    }
}

fn build_rule(
    kind: CfType,
    options: &ConditionalFormatOptions,
    start_cell: &str,
    date_1904: bool,
) -> Result<CfRule> {
    let criteria = options.criteria.as_deref();
    let rule = match kind {
        CfType::Cell | CfType::Date | CfType::Time => {
            let operator: Criteria = required(criteria, "criteria")?.parse()?;
            let dates_only = kind != CfType::Cell;
            let operand = |value: &CfValue| operand_text(value, dates_only, date_1904);
            let formulas = match (operator, &options.minimum, &options.maximum) {
                (Criteria::Between | Criteria::NotBetween, Some(min), Some(max)) => {
                    vec![operand(min)?, operand(max)?]
                }
                (Criteria::Between | Criteria::NotBetween, _, _) => {
                    return Err(missing("minimum and maximum"));
                }
                _ => vec![operand(required(options.value.as_ref(), "value")?)?],
            };
            CfRule::CellIs { operator, formulas }
        }
        CfType::Average => CfRule::AboveAverage {
            criteria: match criteria {
                Some(c) => c.parse()?,
                None => AverageCriteria::Above,
            },
        },
        CfType::Top | CfType::Bottom => CfRule::Top10 {
            bottom: kind == CfType::Bottom,
            percent: match criteria {
                None => false,
                Some("%") => true,
                Some(other) => {
                    log::warn!("unknown top/bottom criteria '{other}', expected '%'");
                    return Err(XlsheetError::unknown("top/bottom criteria", other));
                }
            },
            rank: match &options.value {
                Some(value) => operand_text(value, false, date_1904)?,
                None => "10".to_string(),
            },
        },
        CfType::Duplicate => CfRule::Duplicate,
        CfType::Unique => CfRule::Unique,
        CfType::Text => {
            let criteria: TextCriteria = required(criteria, "criteria")?.parse()?;
            let text = match required(options.value.as_ref(), "value")? {
                CfValue::Text(text) => text.clone(),
                other => operand_text(other, false, date_1904)?,
            };
            let formula = text_formula(criteria, &text, start_cell);
            CfRule::Text {
                criteria,
                text,
                formula,
            }
        }
        CfType::TimePeriod => {
            let period: TimePeriod = required(criteria, "criteria")?.parse()?;
            CfRule::TimePeriod {
                period,
                formula: period_formula(period, start_cell),
            }
        }
        CfType::Blanks | CfType::NoBlanks | CfType::Errors | CfType::NoErrors => {
            let formula = match kind {
                CfType::Blanks => format!("LEN(TRIM({start_cell}))=0"),
                CfType::NoBlanks => format!("LEN(TRIM({start_cell}))>0"),
                CfType::Errors => format!("ISERROR({start_cell})"),
                _ => format!("NOT(ISERROR({start_cell}))"),
            };
            CfRule::Contains { kind, formula }
        }
        CfType::TwoColorScale => CfRule::ColorScale {
            points: vec![
                cfvo(options.min_type, CfvoType::Min, options.min_value.as_ref(), "0")?,
                cfvo(options.max_type, CfvoType::Max, options.max_value.as_ref(), "0")?,
            ],
            colors: vec![
                color(options.min_color.as_deref(), "#FF7128")?,
                color(options.max_color.as_deref(), "#FFEF9C")?,
            ],
        },
        CfType::ThreeColorScale => CfRule::ColorScale {
            points: vec![
                cfvo(options.min_type, CfvoType::Min, options.min_value.as_ref(), "0")?,
                cfvo(
                    options.mid_type,
                    CfvoType::Percentile,
                    options.mid_value.as_ref(),
                    "50",
                )?,
                cfvo(options.max_type, CfvoType::Max, options.max_value.as_ref(), "0")?,
            ],
            colors: vec![
                color(options.min_color.as_deref(), "#F8696B")?,
                color(options.mid_color.as_deref(), "#FFEB84")?,
                color(options.max_color.as_deref(), "#63BE7B")?,
            ],
        },
        CfType::DataBar => CfRule::DataBar {
            min: cfvo(options.min_type, CfvoType::Min, options.min_value.as_ref(), "0")?,
            max: cfvo(options.max_type, CfvoType::Max, options.max_value.as_ref(), "0")?,
            color: color(options.bar_color.as_deref(), "#638EC6")?,
        },
        CfType::Formula => CfRule::Expression {
            formula: required(criteria, "criteria")?
                .trim_start_matches('=')
                .to_string(),
        },
    };
    Ok(rule)
}

fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| missing(name))
}

fn missing(name: &str) -> XlsheetError {
    log::warn!("conditional format parameter '{name}' is required");
    XlsheetError::InvalidOption(format!("conditional format requires '{name}'"))
}

/// Formula text of a rule operand. Date and time rules only take dates.
fn operand_text(value: &CfValue, dates_only: bool, date_1904: bool) -> Result<String> {
    match value {
        CfValue::Date(date) => Ok(format_number(excel_serial(*date, date_1904))),
        _ if dates_only => {
            log::warn!("conditional format 'value' must be a date or time");
            Err(XlsheetError::InvalidOption(
                "date and time rules need date values".to_string(),
            ))
        }
        CfValue::Number(n) => Ok(format_number(*n)),
        CfValue::Bool(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
        CfValue::Text(text) => Ok(text.clone()),
    }
}

fn cfvo(
    kind: Option<CfvoType>,
    default_kind: CfvoType,
    value: Option<&CfValue>,
    default_value: &str,
) -> Result<Cfvo> {
    let value = match value {
        Some(value) => operand_text(value, false, false)?
            .trim_start_matches('=')
            .to_string(),
        None => default_value.to_string(),
    };
    Ok(Cfvo {
        kind: kind.unwrap_or(default_kind),
        value,
    })
}

fn color(color: Option<&str>, default: &str) -> Result<String> {
    to_argb(color.unwrap_or(default))
}

fn text_formula(criteria: TextCriteria, text: &str, cell: &str) -> String {
    let quoted = text.replace('"', "\"\"");
    let len = text.chars().count();
    match criteria {
        TextCriteria::Containing => format!("NOT(ISERROR(SEARCH(\"{quoted}\",{cell})))"),
        TextCriteria::NotContaining => format!("ISERROR(SEARCH(\"{quoted}\",{cell}))"),
        TextCriteria::BeginsWith => format!("LEFT({cell},{len})=\"{quoted}\""),
        TextCriteria::EndsWith => format!("RIGHT({cell},{len})=\"{quoted}\""),
    }
}

fn period_formula(period: TimePeriod, c: &str) -> String {
    match period {
        TimePeriod::Yesterday => format!("FLOOR({c},1)=TODAY()-1"),
        TimePeriod::Today => format!("FLOOR({c},1)=TODAY()"),
        TimePeriod::Tomorrow => format!("FLOOR({c},1)=TODAY()+1"),
        TimePeriod::Last7Days => {
            format!("AND(TODAY()-FLOOR({c},1)<=6,FLOOR({c},1)<=TODAY())")
        }
        TimePeriod::LastWeek => format!(
            "AND(TODAY()-ROUNDDOWN({c},0)>=(WEEKDAY(TODAY())),\
             TODAY()-ROUNDDOWN({c},0)<(WEEKDAY(TODAY())+7))"
        ),
        TimePeriod::ThisWeek => format!(
            "AND(TODAY()-ROUNDDOWN({c},0)<=WEEKDAY(TODAY())-1,\
             ROUNDDOWN({c},0)-TODAY()<=7-WEEKDAY(TODAY()))"
        ),
        TimePeriod::NextWeek => format!(
            "AND(ROUNDDOWN({c},0)-TODAY()>(7-WEEKDAY(TODAY())),\
             ROUNDDOWN({c},0)-TODAY()<(15-WEEKDAY(TODAY())))"
        ),
        TimePeriod::LastMonth => format!(
            "AND(MONTH({c})=MONTH(TODAY())-1,OR(YEAR({c})=YEAR(TODAY()),\
             AND(MONTH({c})=1,YEAR({c})=YEAR(TODAY())-1)))"
        ),
        TimePeriod::ThisMonth => {
            format!("AND(MONTH({c})=MONTH(TODAY()),YEAR({c})=YEAR(TODAY()))")
        }
        TimePeriod::NextMonth => format!(
            "AND(MONTH({c})=MONTH(TODAY())+1,OR(YEAR({c})=YEAR(TODAY()),\
             AND(MONTH({c})=12,YEAR({c})=YEAR(TODAY())+1)))"
        ),
    }
}

/// `<conditionalFormatting>` blocks in sqref order.
pub(crate) fn write_conditional_formats(
    out: &mut XmlWriter,
    formats: &BTreeMap<String, Vec<ConditionalFormat>>,
) {
    for (sqref, rules) in formats {
        out.start_tag("conditionalFormatting", &[("sqref", sqref.clone())]);
        for rule in rules {
            write_cf_rule(out, rule);
        }
        out.end_tag("conditionalFormatting");
    }
}

fn write_cf_rule(out: &mut XmlWriter, cf: &ConditionalFormat) {
    let mut attrs = vec![("type", cf.rule.wire_type().to_string())];
    if let Some(dxf) = cf.dxf {
        attrs.push(("dxfId", dxf.to_string()));
    }
    attrs.push(("priority", cf.priority.to_string()));
    if cf.stop_if_true {
        attrs.push(("stopIfTrue", "1".to_string()));
    }

    match &cf.rule {
        CfRule::CellIs { operator, formulas } => {
            attrs.push(("operator", operator.wire().to_string()));
            out.start_tag("cfRule", &attrs);
            for formula in formulas {
                out.data_element("formula", formula, &[]);
            }
        }
        CfRule::AboveAverage { criteria } => {
            if criteria.is_below() {
                attrs.push(("aboveAverage", "0".to_string()));
            }
            if criteria.is_equal() {
                attrs.push(("equalAverage", "1".to_string()));
            }
            if let Some(std_dev) = criteria.std_dev() {
                attrs.push(("stdDev", std_dev.to_string()));
            }
            out.empty_tag("cfRule", &attrs);
            return;
        }
        CfRule::Top10 {
            bottom,
            percent,
            rank,
        } => {
            if *percent {
                attrs.push(("percent", "1".to_string()));
            }
            if *bottom {
                attrs.push(("bottom", "1".to_string()));
            }
            attrs.push(("rank", rank.clone()));
            out.empty_tag("cfRule", &attrs);
            return;
        }
        CfRule::Duplicate | CfRule::Unique => {
            out.empty_tag("cfRule", &attrs);
            return;
        }
        CfRule::Text {
            criteria,
            text,
            formula,
        } => {
            attrs.push(("operator", criteria.wire().to_string()));
            attrs.push(("text", text.clone()));
            out.start_tag("cfRule", &attrs);
            out.data_element("formula", formula, &[]);
        }
        CfRule::TimePeriod { period, formula } => {
            attrs.push(("timePeriod", period.wire().to_string()));
            out.start_tag("cfRule", &attrs);
            out.data_element("formula", formula, &[]);
        }
        CfRule::Contains { formula, .. } | CfRule::Expression { formula } => {
            out.start_tag("cfRule", &attrs);
            out.data_element("formula", formula, &[]);
        }
        CfRule::ColorScale { points, colors } => {
            out.start_tag("cfRule", &attrs);
            out.start_tag("colorScale", &[]);
            for point in points {
                write_cfvo(out, point);
            }
            for rgb in colors {
                out.empty_tag("color", &[("rgb", rgb.clone())]);
            }
            out.end_tag("colorScale");
        }
        CfRule::DataBar { min, max, color } => {
            out.start_tag("cfRule", &attrs);
            out.start_tag("dataBar", &[]);
            write_cfvo(out, min);
            write_cfvo(out, max);
            out.empty_tag("color", &[("rgb", color.clone())]);
            out.end_tag("dataBar");
        }
    }
    out.end_tag("cfRule");
}

fn write_cfvo(out: &mut XmlWriter, cfvo: &Cfvo) {
    out.empty_tag(
        "cfvo",
        &[
            ("type", cfvo.kind.wire().to_string()),
            ("val", cfvo.value.clone()),
        ],
    );
}
