//! Typed cell writers and the `write()` dispatcher.

use std::sync::OnceLock;

use regex::Regex;

use crate::cell_ref::{cell_name, parse_cell_ref, CellRange};
use crate::datetime::{excel_serial, DateValue};
use crate::error::{Result, WriteStatus, XlsheetError};
use crate::format::Format;
use crate::formula::{has_dynamic_function, is_array_formula, prepare_formula, strip_formula};
use crate::types::{CachedValue, CellInput, CellValue};

use super::{check_bounds, Worksheet};

/// Longest string Excel stores in a cell.
pub const STRING_MAX: usize = 32_767;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?:ftp|http)s?://|mailto:|(?:in|ex)ternal:)").expect("valid URL regex")
    })
}

/// Strings `write()` hands to `write_url`.
pub(crate) fn looks_like_url(text: &str) -> bool {
    text.contains(':') && url_re().is_match(text)
}

/// Cut `text` to at most `max` characters.
pub(crate) fn truncate_chars(text: &str, max: usize) -> Option<&str> {
    text.char_indices().nth(max).and_then(|(end, _)| text.get(..end))
}

/// Reject a formula with nothing after its `=`.
fn check_formula(row: u32, col: u32, formula: &str) -> Result<()> {
    if formula.trim_start_matches('=').is_empty() {
        log::warn!("empty formula at {}", cell_name(row, col));
        return Err(XlsheetError::InvalidOption(
            "formula can't be empty".to_string(),
        ));
    }
    Ok(())
}

impl Worksheet {
    /// Write any value, choosing the typed writer from the input variant.
    ///
    /// Strings are sniffed in order: empty (blank), leading `=` (formula,
    /// when `strings_to_formulas`), `{=...}` (array formula), URL schemes
    /// (when `strings_to_urls`), numbers (when `strings_to_numbers`).
    pub fn write(
        &mut self,
        row: u32,
        col: u32,
        value: impl Into<CellInput>,
        format: Option<&Format>,
    ) -> Result<WriteStatus> {
        match value.into() {
            CellInput::Null => self.write_blank(row, col, format),
            CellInput::Bool(b) => self.write_boolean(row, col, b, format),
            CellInput::DateTime(dt) => self.write_datetime(row, col, dt, format),
            CellInput::Number(n) => self.write_number(row, col, n, format),
            CellInput::String(s) => self.write_token_as_string(row, col, &s, format),
            CellInput::Other(s) => match s.trim().parse::<f64>() {
                Ok(n) => self.write_number(row, col, n, format),
                Err(_) => self.write_string(row, col, &s, format),
            },
        }
    }

    /// `write()` addressed with an A1 reference.
    pub fn write_ref(
        &mut self,
        cell: &str,
        value: impl Into<CellInput>,
        format: Option<&Format>,
    ) -> Result<WriteStatus> {
        let (row, col) =
            parse_cell_ref(cell).ok_or_else(|| XlsheetError::CellRef(cell.to_string()))?;
        self.write(row, col, value, format)
    }

    /// Check that `write()` would accept `value` without writing it.
    /// Returns whether the write would add a new hyperlink.
    pub(crate) fn check_input(&self, row: u32, col: u32, value: &CellInput) -> Result<bool> {
        check_bounds(row, col)?;
        match value {
            CellInput::Number(n) if !n.is_finite() && !self.options.nan_inf_to_errors => {
                log::warn!("NaN and infinity are not supported by Excel, see nan_inf_to_errors");
                Err(XlsheetError::NonFiniteNumber(*n))
            }
            CellInput::String(token)
                if (self.options.strings_to_formulas && token.starts_with('='))
                    || (token.starts_with("{=") && token.ends_with('}')) =>
            {
                check_formula(row, col, strip_formula(token))?;
                Ok(false)
            }
            CellInput::String(token) if self.options.strings_to_urls && looks_like_url(token) => {
                self.prepare_url(row, col, token, None, None)?;
                Ok(self.hyperlink(row, col).is_none())
            }
            _ => Ok(false),
        }
    }

    fn write_token_as_string(
        &mut self,
        row: u32,
        col: u32,
        token: &str,
        format: Option<&Format>,
    ) -> Result<WriteStatus> {
        if token.is_empty() {
            return self.write_blank(row, col, format);
        }
        if self.options.strings_to_formulas && token.starts_with('=') {
            return self.write_formula(row, col, token, format, None);
        }
        if token.starts_with("{=") && token.ends_with('}') {
            return self.write_formula(row, col, token, format, None);
        }
        if self.options.strings_to_urls && looks_like_url(token) {
            return self.write_url(row, col, token, format, None, None);
        }
        if self.options.strings_to_numbers {
            if let Ok(n) = token.trim().parse::<f64>() {
                if n.is_finite() {
                    return self.write_number(row, col, n, format);
                }
            }
        }
        self.write_string(row, col, token, format)
    }

    /// Write a string, cut to 32,767 characters with a `Truncated` status
    /// when longer.
    pub fn write_string(
        &mut self,
        row: u32,
        col: u32,
        text: &str,
        format: Option<&Format>,
    ) -> Result<WriteStatus> {
        self.check_dimensions(row, col, false, false)?;

        let (text, status) = match truncate_chars(text, STRING_MAX) {
            Some(cut) => {
                log::warn!(
                    "string at {} truncated to {STRING_MAX} characters",
                    cell_name(row, col)
                );
                (cut, WriteStatus::Truncated)
            }
            None => (text, WriteStatus::Complete),
        };

        let string = self.sink.string_ref(&self.sst, text);
        self.store(
            row,
            col,
            CellValue::String {
                string,
                xf: format.map(Format::xf),
            },
        )?;
        Ok(status)
    }

    /// Write a number. NaN and infinities become `#NUM!` / `#DIV/0!`
    /// formulas with `nan_inf_to_errors`, and are rejected otherwise.
    pub fn write_number(
        &mut self,
        row: u32,
        col: u32,
        value: f64,
        format: Option<&Format>,
    ) -> Result<WriteStatus> {
        if !value.is_finite() {
            if !self.options.nan_inf_to_errors {
                log::warn!("NaN and infinity are not supported by Excel, see nan_inf_to_errors");
                return Err(XlsheetError::NonFiniteNumber(value));
            }
            let (formula, result) = if value.is_nan() {
                ("#NUM!", "#NUM!")
            } else if value > 0.0 {
                ("1/0", "#DIV/0!")
            } else {
                ("-1/0", "#DIV/0!")
            };
            return self.write_formula(row, col, formula, format, Some(result.into()));
        }

        self.check_dimensions(row, col, false, false)?;
        self.store(
            row,
            col,
            CellValue::Number {
                value,
                xf: format.map(Format::xf),
            },
        )?;
        Ok(WriteStatus::Complete)
    }

    /// Write a formatted blank. Without a format nothing is stored.
    pub fn write_blank(
        &mut self,
        row: u32,
        col: u32,
        format: Option<&Format>,
    ) -> Result<WriteStatus> {
        let Some(format) = format else {
            check_bounds(row, col)?;
            return Ok(WriteStatus::Complete);
        };
        self.check_dimensions(row, col, false, false)?;
        self.store(row, col, CellValue::Blank { xf: format.xf() })?;
        Ok(WriteStatus::Complete)
    }

    pub fn write_boolean(
        &mut self,
        row: u32,
        col: u32,
        value: bool,
        format: Option<&Format>,
    ) -> Result<WriteStatus> {
        self.check_dimensions(row, col, false, false)?;
        self.store(
            row,
            col,
            CellValue::Boolean {
                value,
                xf: format.map(Format::xf),
            },
        )?;
        Ok(WriteStatus::Complete)
    }

    /// Write a date or time as its Excel serial number. Without a format the
    /// sheet's default date style is applied.
    pub fn write_datetime(
        &mut self,
        row: u32,
        col: u32,
        value: DateValue,
        format: Option<&Format>,
    ) -> Result<WriteStatus> {
        self.check_dimensions(row, col, false, false)?;
        let serial = excel_serial(value, self.options.date_1904);
        let xf = format.map(Format::xf).or(self.options.default_date_xf);
        self.store(row, col, CellValue::Number { value: serial, xf })?;
        Ok(WriteStatus::Complete)
    }

    /// Write a formula with an optional cached result.
    ///
    /// Formulas calling dynamic array functions are stored as single cell
    /// dynamic arrays, and `{=...}` formulas as single cell array formulas.
    pub fn write_formula(
        &mut self,
        row: u32,
        col: u32,
        formula: &str,
        format: Option<&Format>,
        value: Option<CachedValue>,
    ) -> Result<WriteStatus> {
        check_formula(row, col, formula)?;
        if has_dynamic_function(formula) {
            return self.write_dynamic_array_formula(row, col, row, col, formula, format, value);
        }
        if is_array_formula(formula) {
            return self.write_array_formula(row, col, row, col, formula, format, value);
        }

        self.check_dimensions(row, col, false, false)?;
        let formula = prepare_formula(formula, self.options.use_future_functions);
        self.store(
            row,
            col,
            CellValue::Formula {
                formula,
                value: value.unwrap_or_default(),
                xf: format.map(Format::xf),
            },
        )?;
        Ok(WriteStatus::Complete)
    }

    /// Write an array formula over a range. The anchor holds the formula;
    /// the other cells hold formatted zeros until Excel recalculates.
    #[allow(clippy::too_many_arguments)]
    pub fn write_array_formula(
        &mut self,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
        formula: &str,
        format: Option<&Format>,
        value: Option<CachedValue>,
    ) -> Result<WriteStatus> {
        let range = CellRange::new(first_row, first_col, last_row, last_col);
        self.store_array_formula(range, formula, format, value, false)
    }

    /// Write a dynamic array formula (`cm="1"`), spilling from the anchor.
    #[allow(clippy::too_many_arguments)]
    pub fn write_dynamic_array_formula(
        &mut self,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
        formula: &str,
        format: Option<&Format>,
        value: Option<CachedValue>,
    ) -> Result<WriteStatus> {
        let range = CellRange::new(first_row, first_col, last_row, last_col);
        self.store_array_formula(range, formula, format, value, true)
    }

    fn store_array_formula(
        &mut self,
        range: CellRange,
        formula: &str,
        format: Option<&Format>,
        value: Option<CachedValue>,
        dynamic: bool,
    ) -> Result<WriteStatus> {
        let formula = prepare_formula(formula, self.options.use_future_functions);
        check_formula(range.first_row, range.first_col, &formula)?;
        self.check_range(&range)?;

        let xf = format.map(Format::xf);
        self.store(
            range.first_row,
            range.first_col,
            CellValue::ArrayFormula {
                formula,
                value: value.unwrap_or_default(),
                range: range.name(),
                dynamic,
                xf,
            },
        )?;

        // A streaming sink cannot pad rows it has not reached.
        if !self.is_streaming() {
            for (row, col) in range.cells().skip(1) {
                self.store(row, col, CellValue::Number { value: 0.0, xf })?;
            }
        }
        Ok(WriteStatus::Complete)
    }

    /// Write a sequence of values across a row starting at `col`, stopping
    /// at the first failure or truncation.
    pub fn write_row<I>(
        &mut self,
        row: u32,
        col: u32,
        data: I,
        format: Option<&Format>,
    ) -> Result<WriteStatus>
    where
        I: IntoIterator,
        I::Item: Into<CellInput>,
    {
        for (offset, value) in (0u32..).zip(data) {
            let status = self.write(row, col.saturating_add(offset), value, format)?;
            if status != WriteStatus::Complete {
                return Ok(status);
            }
        }
        Ok(WriteStatus::Complete)
    }

    /// Write a sequence of values down a column starting at `row`.
    pub fn write_column<I>(
        &mut self,
        row: u32,
        col: u32,
        data: I,
        format: Option<&Format>,
    ) -> Result<WriteStatus>
    where
        I: IntoIterator,
        I::Item: Into<CellInput>,
    {
        for (offset, value) in (0u32..).zip(data) {
            let status = self.write(row.saturating_add(offset), col, value, format)?;
            if status != WriteStatus::Complete {
                return Ok(status);
            }
        }
        Ok(WriteStatus::Complete)
    }

    /// Merge a range: the anchor gets `value`, the rest formatted blanks.
    ///
    /// Single cells and ranges overlapping an earlier merge or table are
    /// rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn merge_range(
        &mut self,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
        value: impl Into<CellInput>,
        format: Option<&Format>,
    ) -> Result<WriteStatus> {
        let range = CellRange::new(first_row, first_col, last_row, last_col);
        if range.is_single_cell() {
            log::warn!("can't merge single cell {}", range.anchor_name());
            return Err(XlsheetError::Conflict(format!(
                "can't merge single cell {}",
                range.anchor_name()
            )));
        }
        check_bounds(range.first_row, range.first_col)?;
        check_bounds(range.last_row, range.last_col)?;
        self.check_overlap(&range)?;

        // The anchor write either fails untouched or stores the value, so a
        // rejected value leaves no merge behind.
        let status = self.write(range.first_row, range.first_col, value, format)?;
        self.check_range(&range)?;
        self.merges.push(range);
        for (row, col) in range.cells().skip(1) {
            self.write_blank(row, col, format)?;
        }
        Ok(status)
    }

    /// Reject a range overlapping a merged range or a table.
    pub(crate) fn check_overlap(&self, range: &CellRange) -> Result<()> {
        let overlaps = |other: &CellRange| {
            range.first_row <= other.last_row
                && other.first_row <= range.last_row
                && range.first_col <= other.last_col
                && other.first_col <= range.last_col
        };
        if let Some(merge) = self.merges.iter().find(|m| overlaps(m)) {
            log::warn!("range {} overlaps merged range {}", range.name(), merge.name());
            return Err(XlsheetError::Conflict(format!(
                "range {} overlaps merged range {}",
                range.name(),
                merge.name()
            )));
        }
        if let Some(table) = self.tables.iter().find(|t| overlaps(&t.range)) {
            log::warn!("range {} overlaps table '{}'", range.name(), table.name);
            return Err(XlsheetError::Conflict(format!(
                "range {} overlaps table '{}' ({})",
                range.name(),
                table.name,
                table.range.name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;
    use crate::cell_ref::{COL_MAX, ROW_MAX};
    use crate::error::ErrorKind;
    use crate::options::WorksheetOptions;
    use crate::types::StringRef;

    fn sheet() -> Worksheet {
        Worksheet::new(WorksheetOptions::default()).unwrap()
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abc", 5), None);
        assert_eq!(truncate_chars("abc", 3), None);
        assert_eq!(truncate_chars("abcdef", 3), Some("abc"));
        assert_eq!(truncate_chars("ééé", 2), Some("éé"));
    }

    #[test]
    fn test_write_dispatch() {
        let mut ws = sheet();
        ws.write(0, 0, 1.5, None).unwrap();
        ws.write(0, 1, true, None).unwrap();
        ws.write(0, 2, "text", None).unwrap();
        ws.write(0, 3, "=A1*2", None).unwrap();
        ws.write(0, 4, CellInput::Null, Some(&Format::with_xf(3))).unwrap();
        ws.write(0, 5, CellInput::Other("42".to_string()), None).unwrap();

        assert!(matches!(ws.cell(0, 0), Some(CellValue::Number { value, .. }) if *value == 1.5));
        assert!(matches!(ws.cell(0, 1), Some(CellValue::Boolean { value: true, .. })));
        assert_eq!(ws.cell_text(0, 2).as_deref(), Some("text"));
        assert!(matches!(ws.cell(0, 3), Some(CellValue::Formula { formula, .. }) if formula == "A1*2"));
        assert!(matches!(ws.cell(0, 4), Some(CellValue::Blank { xf: 3 })));
        assert!(matches!(ws.cell(0, 5), Some(CellValue::Number { value, .. }) if *value == 42.0));
    }

    #[test]
    fn test_strings_to_numbers() {
        let mut ws = Worksheet::new(WorksheetOptions {
            strings_to_numbers: true,
            ..WorksheetOptions::default()
        })
        .unwrap();
        ws.write(0, 0, "12.5", None).unwrap();
        ws.write(0, 1, "12.5kg", None).unwrap();
        assert!(matches!(ws.cell(0, 0), Some(CellValue::Number { .. })));
        assert!(matches!(ws.cell(0, 1), Some(CellValue::String { .. })));
    }

    #[test]
    fn test_formula_sniffing_can_be_disabled() {
        let mut ws = Worksheet::new(WorksheetOptions {
            strings_to_formulas: false,
            strings_to_urls: false,
            ..WorksheetOptions::default()
        })
        .unwrap();
        ws.write(0, 0, "=1+1", None).unwrap();
        ws.write(0, 1, "http://example.com", None).unwrap();
        assert_eq!(ws.cell_text(0, 0).as_deref(), Some("=1+1"));
        assert_eq!(ws.hyperlink_count(), 0);
    }

    #[test]
    fn test_blank_without_format_is_not_stored() {
        let mut ws = sheet();
        assert_eq!(ws.write_blank(3, 3, None).unwrap(), WriteStatus::Complete);
        assert!(ws.cell(3, 3).is_none());
        assert_eq!(ws.dimensions().rows(), None);
        assert!(ws.write_blank(ROW_MAX, 0, None).is_err());
    }

    #[test]
    fn test_string_truncation() {
        let mut ws = sheet();
        let long = "x".repeat(STRING_MAX + 10);
        assert_eq!(ws.write_string(0, 0, &long, None).unwrap(), WriteStatus::Truncated);
        let stored = ws.cell_text(0, 0).unwrap();
        assert_eq!(stored.len(), STRING_MAX);
        assert_eq!(ws.write_string(1, 0, &stored, None).unwrap(), WriteStatus::Complete);
    }

    #[test]
    fn test_out_of_bounds_stores_nothing() {
        let mut ws = sheet();
        let err = ws.write_number(ROW_MAX, 0, 1.0, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        assert!(ws.write_string(0, COL_MAX, "x", None).is_err());
        assert_eq!(ws.cell_count(), 0);
    }

    #[test]
    fn test_nan_inf() {
        let mut ws = sheet();
        assert_eq!(
            ws.write_number(0, 0, f64::NAN, None).unwrap_err().kind(),
            ErrorKind::InvalidOption
        );

        let mut ws = Worksheet::new(WorksheetOptions {
            nan_inf_to_errors: true,
            ..WorksheetOptions::default()
        })
        .unwrap();
        ws.write_number(0, 0, f64::NAN, None).unwrap();
        ws.write_number(0, 1, f64::INFINITY, None).unwrap();
        ws.write_number(0, 2, f64::NEG_INFINITY, None).unwrap();
        assert!(matches!(
            ws.cell(0, 0),
            Some(CellValue::Formula { formula, value: CachedValue::Text(v), .. })
                if formula == "#NUM!" && v == "#NUM!"
        ));
        assert!(matches!(
            ws.cell(0, 1),
            Some(CellValue::Formula { formula, value: CachedValue::Text(v), .. })
                if formula == "1/0" && v == "#DIV/0!"
        ));
        assert!(matches!(ws.cell(0, 2), Some(CellValue::Formula { formula, .. }) if formula == "-1/0"));
    }

    #[test]
    fn test_empty_formula_rejected() {
        let mut ws = sheet();
        assert!(ws.write_formula(0, 0, "", None, None).is_err());
        assert!(ws.cell(0, 0).is_none());
    }

    #[test]
    fn test_array_formula_padding() {
        let mut ws = sheet();
        let fmt = Format::with_xf(7);
        ws.write_array_formula(1, 1, 0, 0, "{=SUM(A1:B1)}", Some(&fmt), None)
            .unwrap();
        match ws.cell(0, 0) {
            Some(CellValue::ArrayFormula {
                formula,
                range,
                dynamic,
                xf,
                ..
            }) => {
                assert_eq!(formula, "SUM(A1:B1)");
                assert_eq!(range, "A1:B2");
                assert!(!dynamic);
                assert_eq!(*xf, Some(7));
            }
            other => panic!("unexpected cell {other:?}"),
        }
        for (row, col) in [(0, 1), (1, 0), (1, 1)] {
            assert_eq!(
                ws.cell(row, col),
                Some(&CellValue::Number {
                    value: 0.0,
                    xf: Some(7)
                })
            );
        }
    }

    #[test]
    fn test_braced_formula_becomes_single_cell_array() {
        let mut ws = sheet();
        ws.write_formula(2, 2, "{=A1*B1}", None, None).unwrap();
        assert!(matches!(
            ws.cell(2, 2),
            Some(CellValue::ArrayFormula { range, .. }) if range == "C3"
        ));
    }

    #[test]
    fn test_dynamic_function_becomes_dynamic_array() {
        let mut ws = sheet();
        ws.write_formula(0, 0, "=UNIQUE(B1:B9)", None, None).unwrap();
        assert!(matches!(
            ws.cell(0, 0),
            Some(CellValue::ArrayFormula { formula, dynamic: true, .. }) if formula == "_xlfn.UNIQUE(B1:B9)"
        ));
    }

    #[test]
    fn test_datetime_uses_default_date_style() {
        let mut ws = Worksheet::new(WorksheetOptions {
            default_date_xf: Some(9),
            ..WorksheetOptions::default()
        })
        .unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ws.write(0, 0, date, None).unwrap();
        assert_eq!(
            ws.cell(0, 0),
            Some(&CellValue::Number {
                value: 45292.0,
                xf: Some(9)
            })
        );
    }

    #[test]
    fn test_write_row_and_column() {
        let mut ws = sheet();
        ws.write_row(0, 1, [1.0, 2.0, 3.0], None).unwrap();
        ws.write_column(1, 0, vec!["a", "b"], None).unwrap();
        assert_eq!(ws.cell_count(), 5);
        assert_eq!(ws.cell_text(2, 0).as_deref(), Some("b"));
        let dims = ws.dimensions();
        assert_eq!((dims.col_min, dims.col_max), (Some(0), Some(3)));
    }

    #[test]
    fn test_write_row_stops_at_first_error() {
        let mut ws = sheet();
        let err = ws
            .write_row(0, COL_MAX - 2, [1.0, 2.0, 3.0], None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        assert_eq!(ws.cell_count(), 2);
    }

    #[test]
    fn test_merge_range() {
        let mut ws = sheet();
        let fmt = Format::with_xf(2);
        ws.merge_range(1, 1, 2, 3, "merged", Some(&fmt)).unwrap();
        assert_eq!(ws.merged_ranges(), &[CellRange::new(1, 1, 2, 3)]);
        assert_eq!(ws.cell_text(1, 1).as_deref(), Some("merged"));
        assert_eq!(ws.cell(2, 3), Some(&CellValue::Blank { xf: 2 }));
        assert_eq!(ws.cell_count(), 6);
    }

    #[test]
    fn test_merge_single_cell_rejected() {
        let mut ws = sheet();
        let err = ws.merge_range(2, 2, 2, 2, "x", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralConflict);
        assert!(ws.merged_ranges().is_empty());
        assert_eq!(ws.cell_count(), 0);
    }

    #[test]
    fn test_merge_overlap_rejected() {
        let mut ws = sheet();
        ws.merge_range(0, 0, 1, 1, "a", None).unwrap();
        let err = ws.merge_range(1, 1, 3, 3, "b", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralConflict);
        assert_eq!(ws.merged_ranges().len(), 1);
    }

    #[test]
    fn test_write_ref() {
        let mut ws = sheet();
        ws.write_ref("C5", 3.0, None).unwrap();
        assert!(ws.cell(4, 2).is_some());
        assert_eq!(
            ws.write_ref("5C", 3.0, None).unwrap_err().kind(),
            ErrorKind::OutOfBounds
        );
    }

    #[test]
    fn test_shared_string_index() {
        let mut ws = sheet();
        ws.write_string(0, 0, "same", None).unwrap();
        ws.write_string(1, 0, "same", None).unwrap();
        assert_eq!(ws.cell(0, 0), ws.cell(1, 0));
        assert!(matches!(
            ws.cell(0, 0),
            Some(CellValue::String {
                string: StringRef::Shared(0),
                ..
            })
        ));
    }
}
