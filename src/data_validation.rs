//! Data validation rules.
//!
//! ```xml
//! <dataValidations count="1">
//!   <dataValidation type="whole" operator="greaterThan" allowBlank="1"
//!                   showInputMessage="1" showErrorMessage="1" sqref="B5">
//!     <formula1>10</formula1>
//!   </dataValidation>
//! </dataValidations>
//! ```

use crate::cell_ref::CellRange;
use crate::datetime::excel_serial;
use crate::error::{Result, XlsheetError};
use crate::export::{format_number, XmlWriter};
use crate::types::{
    Criteria, DataValidation, DataValidationOptions, DvValue, ErrorStyle, ValidationType,
};
use crate::worksheet::{check_bounds, Worksheet};

const TITLE_MAX: usize = 32;
const MESSAGE_MAX: usize = 255;
const LIST_MAX: usize = 255;

impl Worksheet {
    /// Add a data validation rule over a range.
    ///
    /// A rule of type `any` without an input title or message has nothing
    /// to show and is accepted without being stored.
    pub fn data_validation(
        &mut self,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
        options: &DataValidationOptions,
    ) -> Result<()> {
        check_bounds(first_row, first_col)?;
        check_bounds(last_row, last_col)?;

        let value = options
            .minimum
            .as_ref()
            .or(options.source.as_ref())
            .or(options.value.as_ref());

        let Some(validate) = options.validate else {
            log::warn!("parameter 'validate' is required in data_validation()");
            return Err(XlsheetError::InvalidOption(
                "data_validation requires 'validate'".to_string(),
            ));
        };

        if validate == ValidationType::Any
            && options.input_title.is_none()
            && options.input_message.is_none()
        {
            log::debug!("skipping 'any' data validation without input message");
            return Ok(());
        }

        let (criteria, maximum) = if matches!(
            validate,
            ValidationType::Any | ValidationType::List | ValidationType::Custom
        ) {
            (Criteria::Between, None)
        } else {
            let Some(criteria) = options.criteria else {
                log::warn!("parameter 'criteria' is required in data_validation()");
                return Err(XlsheetError::InvalidOption(
                    "data_validation requires 'criteria'".to_string(),
                ));
            };
            let maximum = match criteria {
                Criteria::Between | Criteria::NotBetween => {
                    let Some(maximum) = options.maximum.as_ref() else {
                        log::warn!(
                            "parameter 'maximum' is required in data_validation() with between criteria"
                        );
                        return Err(XlsheetError::InvalidOption(
                            "between criteria require 'maximum'".to_string(),
                        ));
                    };
                    Some(maximum)
                }
                _ => None,
            };
            (criteria, maximum)
        };

        if matches!(validate, ValidationType::Date | ValidationType::Time) {
            for (what, operand) in [("value", value), ("maximum", maximum)] {
                if let Some(operand) = operand {
                    check_date_operand(validate, what, operand)?;
                }
            }
        }

        check_length("input_title", options.input_title.as_deref(), TITLE_MAX)?;
        check_length("error_title", options.error_title.as_deref(), TITLE_MAX)?;
        check_length("input_message", options.input_message.as_deref(), MESSAGE_MAX)?;
        check_length("error_message", options.error_message.as_deref(), MESSAGE_MAX)?;

        let date_1904 = self.options.date_1904;
        let value = match value {
            Some(DvValue::List(items)) if validate == ValidationType::List => {
                let joined = items.join(",");
                if joined.chars().count() > LIST_MAX {
                    log::warn!("data validation list exceeds Excel's limit of {LIST_MAX} characters");
                    return Err(XlsheetError::StringTooLong {
                        what: "data validation list",
                        limit: LIST_MAX,
                    });
                }
                Some(format!("\"{joined}\""))
            }
            Some(value) => Some(formula_text(value, date_1904)),
            None if validate == ValidationType::Any => None,
            None => {
                log::warn!("parameter 'value' is required in data_validation()");
                return Err(XlsheetError::InvalidOption(
                    "data_validation requires 'value'".to_string(),
                ));
            }
        };
        let maximum = maximum.map(|max| formula_text(max, date_1904));

        let sqref = match &options.multi_range {
            Some(multi) => multi.replace('$', ""),
            None => std::iter::once((first_row, first_col, last_row, last_col))
                .chain(options.other_cells.iter().copied())
                .map(|(r1, c1, r2, c2)| CellRange::new(r1, c1, r2, c2).name())
                .collect::<Vec<_>>()
                .join(" "),
        };

        self.validations.push(DataValidation {
            validate,
            criteria,
            value,
            maximum,
            ignore_blank: options.ignore_blank.unwrap_or(true),
            dropdown: options.dropdown.unwrap_or(true),
            show_input: options.show_input.unwrap_or(true),
            show_error: options.show_error.unwrap_or(true),
            input_title: options.input_title.clone(),
            input_message: options.input_message.clone(),
            error_title: options.error_title.clone(),
            error_message: options.error_message.clone(),
            error_type: options.error_type.unwrap_or(ErrorStyle::Stop),
            sqref,
        });
        Ok(())
    }
}

fn check_length(what: &'static str, text: Option<&str>, limit: usize) -> Result<()> {
    match text {
        Some(text) if text.chars().count() > limit => {
            log::warn!("data validation {what} exceeds Excel's limit of {limit} characters");
            Err(XlsheetError::StringTooLong { what, limit })
        }
        _ => Ok(()),
    }
}

/// Date and time rules take dates, or formulas and cell references such
/// as `=A1` or `TODAY()`. Plain numbers are rejected.
fn check_date_operand(validate: ValidationType, what: &str, operand: &DvValue) -> Result<()> {
    match operand {
        DvValue::Date(_) => Ok(()),
        DvValue::Text(text) if text.trim().parse::<f64>().is_err() => Ok(()),
        _ => {
            log::warn!("data validation '{what}' must be a date or time for '{}' rules", validate.wire());
            Err(XlsheetError::InvalidOption(format!(
                "'{what}' of a {} validation must be a date or time",
                validate.wire()
            )))
        }
    }
}

/// Formula text of an operand: numbers as written, dates as serials,
/// formulas without their leading `=`.
fn formula_text(value: &DvValue, date_1904: bool) -> String {
    match value {
        DvValue::Number(n) => format_number(*n),
        DvValue::Date(d) => format_number(excel_serial(*d, date_1904)),
        DvValue::Text(text) if text.trim().parse::<f64>().is_ok() => text.clone(),
        DvValue::Text(text) => text.trim_start_matches('=').to_string(),
        DvValue::List(items) => format!("\"{}\"", items.join(",")),
    }
}

/// `<dataValidations>`.
pub(crate) fn write_data_validations(out: &mut XmlWriter, validations: &[DataValidation]) {
    if validations.is_empty() {
        return;
    }
    out.start_tag("dataValidations", &[("count", validations.len().to_string())]);
    for dv in validations {
        write_data_validation(out, dv);
    }
    out.end_tag("dataValidations");
}

fn write_data_validation(out: &mut XmlWriter, dv: &DataValidation) {
    let mut attrs = Vec::with_capacity(12);
    if dv.validate != ValidationType::Any {
        attrs.push(("type", dv.validate.wire().to_string()));
    }
    if dv.criteria != Criteria::Between {
        attrs.push(("operator", dv.criteria.wire().to_string()));
    }
    match dv.error_type {
        ErrorStyle::Stop => {}
        ErrorStyle::Warning => attrs.push(("errorStyle", "warning".to_string())),
        ErrorStyle::Information => attrs.push(("errorStyle", "information".to_string())),
    }
    if dv.ignore_blank {
        attrs.push(("allowBlank", "1".to_string()));
    }
    // Excel's attribute is inverted: showDropDown="1" hides the arrow.
    if !dv.dropdown {
        attrs.push(("showDropDown", "1".to_string()));
    }
    if dv.show_input {
        attrs.push(("showInputMessage", "1".to_string()));
    }
    if dv.show_error {
        attrs.push(("showErrorMessage", "1".to_string()));
    }
    if let Some(title) = &dv.error_title {
        attrs.push(("errorTitle", title.clone()));
    }
    if let Some(message) = &dv.error_message {
        attrs.push(("error", message.clone()));
    }
    if let Some(title) = &dv.input_title {
        attrs.push(("promptTitle", title.clone()));
    }
    if let Some(message) = &dv.input_message {
        attrs.push(("prompt", message.clone()));
    }
    attrs.push(("sqref", dv.sqref.clone()));

    if dv.validate == ValidationType::Any {
        out.empty_tag("dataValidation", &attrs);
        return;
    }
    out.start_tag("dataValidation", &attrs);
    out.data_element("formula1", dv.value.as_deref().unwrap_or_default(), &[]);
    if let Some(maximum) = &dv.maximum {
        out.data_element("formula2", maximum, &[]);
    }
    out.end_tag("dataValidation");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::datetime::DateValue;
    use crate::error::ErrorKind;
    use crate::options::WorksheetOptions;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sheet() -> Worksheet {
        Worksheet::new(WorksheetOptions::default()).unwrap()
    }

    fn xml(ws: &Worksheet) -> String {
        let mut out = XmlWriter::new();
        write_data_validations(&mut out, ws.data_validations());
        out.into_string()
    }

    #[test]
    fn test_whole_greater_than() {
        let mut ws = sheet();
        let opts = DataValidationOptions::new(ValidationType::Whole)
            .criteria(Criteria::GreaterThan)
            .value(10);
        ws.data_validation(4, 1, 4, 1, &opts).unwrap();
        assert_eq!(
            xml(&ws),
            "<dataValidations count=\"1\">\
             <dataValidation type=\"whole\" operator=\"greaterThan\" allowBlank=\"1\" \
             showInputMessage=\"1\" showErrorMessage=\"1\" sqref=\"B5\">\
             <formula1>10</formula1></dataValidation></dataValidations>"
        );
    }

    #[test]
    fn test_between_needs_maximum() {
        let mut ws = sheet();
        let opts = DataValidationOptions::new(ValidationType::Decimal)
            .criteria(Criteria::Between)
            .value(0.1);
        let err = ws.data_validation(0, 0, 0, 0, &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
        assert!(ws.data_validations().is_empty());

        let opts = opts.maximum(0.5);
        ws.data_validation(0, 0, 9, 0, &opts).unwrap();
        let dv = &ws.data_validations()[0];
        assert_eq!(dv.value.as_deref(), Some("0.1"));
        assert_eq!(dv.maximum.as_deref(), Some("0.5"));
        assert_eq!(dv.sqref, "A1:A10");
    }

    #[test]
    fn test_list_source_and_dropdown() {
        let mut ws = sheet();
        let opts = DataValidationOptions {
            source: Some(vec!["open", "high", "close"].into()),
            dropdown: Some(false),
            ..DataValidationOptions::new(ValidationType::List)
        };
        ws.data_validation(0, 3, 0, 3, &opts).unwrap();
        assert_eq!(
            xml(&ws),
            "<dataValidations count=\"1\">\
             <dataValidation type=\"list\" allowBlank=\"1\" showDropDown=\"1\" \
             showInputMessage=\"1\" showErrorMessage=\"1\" sqref=\"D1\">\
             <formula1>\"open,high,close\"</formula1></dataValidation></dataValidations>"
        );
    }

    #[test]
    fn test_list_too_long() {
        let mut ws = sheet();
        let items: Vec<&str> = std::iter::repeat("abcdefghij").take(30).collect();
        let opts = DataValidationOptions::new(ValidationType::List).value(items);
        let err = ws.data_validation(0, 0, 0, 0, &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn test_formula_value_strips_equals() {
        let mut ws = sheet();
        let opts = DataValidationOptions::new(ValidationType::List).value("=$E$4:$G$4");
        ws.data_validation(0, 0, 0, 0, &opts).unwrap();
        assert_eq!(ws.data_validations()[0].value.as_deref(), Some("$E$4:$G$4"));
    }

    #[test]
    fn test_date_values_become_serials() {
        let mut ws = sheet();
        let date = NaiveDate::from_ymd_opt(2008, 1, 1).unwrap();
        let opts = DataValidationOptions::new(ValidationType::Date)
            .criteria(Criteria::GreaterThan)
            .value(DateValue::Date(date));
        ws.data_validation(0, 0, 0, 0, &opts).unwrap();
        assert_eq!(ws.data_validations()[0].value.as_deref(), Some("39448"));
    }

    #[test]
    fn test_date_rules_reject_numbers() {
        let mut ws = sheet();
        let opts = DataValidationOptions::new(ValidationType::Date)
            .criteria(Criteria::GreaterThan)
            .value(5);
        let err = ws.data_validation(0, 0, 0, 0, &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let opts = DataValidationOptions::new(ValidationType::Time)
            .criteria(Criteria::Between)
            .value(DateValue::Date(start))
            .maximum("0.5");
        assert!(ws.data_validation(0, 0, 0, 0, &opts).is_err());
        assert!(ws.data_validations().is_empty());

        // formulas and cell references stand in for dates
        let opts = DataValidationOptions::new(ValidationType::Date)
            .criteria(Criteria::LessThan)
            .value("=TODAY()");
        ws.data_validation(0, 0, 0, 0, &opts).unwrap();
        assert_eq!(ws.data_validations()[0].value.as_deref(), Some("TODAY()"));
    }

    #[test]
    fn test_any_without_message_is_noop() {
        let mut ws = sheet();
        let opts = DataValidationOptions::new(ValidationType::Any);
        ws.data_validation(0, 0, 0, 0, &opts).unwrap();
        assert!(ws.data_validations().is_empty());

        let opts = DataValidationOptions {
            input_title: Some("Note".to_string()),
            input_message: Some("Anything goes".to_string()),
            ..opts
        };
        ws.data_validation(0, 0, 0, 0, &opts).unwrap();
        assert_eq!(
            xml(&ws),
            "<dataValidations count=\"1\"><dataValidation allowBlank=\"1\" \
             showInputMessage=\"1\" showErrorMessage=\"1\" promptTitle=\"Note\" \
             prompt=\"Anything goes\" sqref=\"A1\"/></dataValidations>"
        );
    }

    #[test]
    fn test_title_limit() {
        let mut ws = sheet();
        let opts = DataValidationOptions {
            input_title: Some("x".repeat(33)),
            ..DataValidationOptions::new(ValidationType::Whole)
                .criteria(Criteria::Equal)
                .value(1)
        };
        assert!(ws.data_validation(0, 0, 0, 0, &opts).is_err());
    }

    #[test]
    fn test_other_cells_and_multi_range() {
        let mut ws = sheet();
        let opts = DataValidationOptions {
            other_cells: vec![(4, 2, 2, 2)],
            error_type: Some(ErrorStyle::Warning),
            ..DataValidationOptions::new(ValidationType::Whole)
                .criteria(Criteria::Equal)
                .value(1)
        };
        ws.data_validation(0, 0, 1, 0, &opts).unwrap();
        assert_eq!(ws.data_validations()[0].sqref, "A1:A2 C3:C5");
        assert!(xml(&ws).contains("operator=\"equal\" errorStyle=\"warning\""));

        let opts = DataValidationOptions {
            multi_range: Some("$A$1:$A$2 $C$3".to_string()),
            ..opts
        };
        ws.data_validation(0, 0, 1, 0, &opts).unwrap();
        assert_eq!(ws.data_validations()[1].sqref, "A1:A2 C3");
    }

    #[test]
    fn test_missing_validate() {
        let mut ws = sheet();
        let err = ws
            .data_validation(0, 0, 0, 0, &DataValidationOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }
}
