//! Tests for cell writes through `write()` and the typed writers
//!
//! Covers:
//! - String sniffing order (blank, formula, array formula, URL, number)
//! - Excel limits: sheet bounds, string length, non-finite numbers
//! - Integer result codes for every outcome
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::approx_constant,
    clippy::cast_possible_truncation,
    clippy::absurd_extreme_comparisons,
    clippy::cast_lossless
)]

use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use test_case::test_case;
use xlsheet::cell_ref::{COL_MAX, ROW_MAX};
use xlsheet::{
    result_code, CachedValue, CellValue, DateValue, ErrorKind, Format, StringRef, Worksheet,
    WorksheetOptions, WriteStatus, XlsheetError,
};

fn sheet() -> Worksheet {
    Worksheet::new(WorksheetOptions::default()).unwrap()
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_plain_string_is_shared() {
    let mut ws = sheet();
    ws.write(0, 0, "hello", None).unwrap();
    ws.write(1, 0, "hello", None).unwrap();
    assert_eq!(
        ws.cell(1, 0),
        Some(&CellValue::String {
            string: StringRef::Shared(0),
            xf: None
        })
    );
    let sst = ws.shared_strings().borrow();
    assert_eq!(sst.len(), 1);
    assert_eq!(sst.total_count(), 2);
}

#[test]
fn test_formula_string() {
    let mut ws = sheet();
    ws.write(0, 0, "=SUM(B1:B5)", None).unwrap();
    match ws.cell(0, 0) {
        Some(CellValue::Formula { formula, value, .. }) => {
            assert_eq!(formula, "SUM(B1:B5)");
            assert_eq!(value, &CachedValue::Number(0.0));
        }
        other => panic!("expected formula, got {other:?}"),
    }
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
    ws.write(1, 0, "http://example.com", None).unwrap();
    assert_eq!(ws.cell_text(0, 0).as_deref(), Some("=1+1"));
    assert_eq!(ws.cell_text(1, 0).as_deref(), Some("http://example.com"));
    assert_eq!(ws.hyperlink_count(), 0);
}

#[test]
fn test_array_formula_string() {
    let mut ws = sheet();
    ws.write(2, 2, "{=SUM(A1:A3*B1:B3)}", None).unwrap();
    match ws.cell(2, 2) {
        Some(CellValue::ArrayFormula {
            formula,
            range,
            dynamic,
            ..
        }) => {
            assert_eq!(formula, "SUM(A1:A3*B1:B3)");
            assert_eq!(range, "C3");
            assert!(!dynamic);
        }
        other => panic!("expected array formula, got {other:?}"),
    }
}

#[test]
fn test_url_string_becomes_hyperlink() {
    let mut ws = sheet();
    ws.write(0, 0, "https://example.com", None).unwrap();
    assert_eq!(ws.hyperlink_count(), 1);
    assert!(ws.hyperlink(0, 0).is_some());
    assert_eq!(ws.cell_text(0, 0).as_deref(), Some("https://example.com"));
}

#[test_case(false, None ; "numbers stay strings by default")]
#[test_case(true, Some(42.5) ; "numbers converted")]
fn test_strings_to_numbers(enabled: bool, expected: Option<f64>) {
    let mut ws = Worksheet::new(WorksheetOptions {
        strings_to_numbers: enabled,
        ..WorksheetOptions::default()
    })
    .unwrap();
    ws.write(0, 0, "42.5", None).unwrap();
    let number = match ws.cell(0, 0) {
        Some(CellValue::Number { value, .. }) => Some(*value),
        _ => None,
    };
    assert_eq!(number, expected);
}

#[test]
fn test_empty_string_is_blank() {
    let mut ws = sheet();
    ws.write(0, 0, "", None).unwrap();
    assert!(ws.cell(0, 0).is_none());
    assert_eq!(ws.dimensions().rows(), None);

    let fmt = Format::with_xf(3);
    ws.write(0, 0, "", Some(&fmt)).unwrap();
    assert_eq!(ws.cell(0, 0), Some(&CellValue::Blank { xf: 3 }));
}

#[test]
fn test_json_values() {
    let mut ws = sheet();
    ws.write(0, 0, serde_json::json!(true), None).unwrap();
    ws.write(0, 1, serde_json::json!(7), None).unwrap();
    ws.write(0, 2, serde_json::json!(null), None).unwrap();
    assert!(matches!(ws.cell(0, 0), Some(CellValue::Boolean { value: true, .. })));
    assert!(matches!(ws.cell(0, 1), Some(CellValue::Number { value, .. }) if *value == 7.0));
    assert!(ws.cell(0, 2).is_none());
}

#[test]
fn test_write_ref() {
    let mut ws = sheet();
    ws.write_ref("C5", 1.5, None).unwrap();
    assert!(matches!(ws.cell(4, 2), Some(CellValue::Number { .. })));
    let err = ws.write_ref("5C", 1.5, None).unwrap_err();
    assert!(matches!(err, XlsheetError::CellRef(_)));
}

// ============================================================================
// Typed writers
// ============================================================================

#[test]
fn test_datetime_serials() {
    let mut ws = Worksheet::new(WorksheetOptions {
        default_date_xf: Some(9),
        ..WorksheetOptions::default()
    })
    .unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    ws.write_datetime(0, 0, DateValue::Date(date), None).unwrap();
    assert_eq!(
        ws.cell(0, 0),
        Some(&CellValue::Number {
            value: 45292.0,
            xf: Some(9)
        })
    );

    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    ws.write_datetime(1, 0, DateValue::Time(noon), None).unwrap();
    assert!(matches!(ws.cell(1, 0), Some(CellValue::Number { value, .. }) if *value == 0.5));
}

#[test]
fn test_formula_cached_values() {
    let mut ws = sheet();
    ws.write_formula(0, 0, "=A2=1", None, Some(true.into())).unwrap();
    ws.write_formula(1, 0, "=1/0", None, Some("#DIV/0!".into())).unwrap();
    let xml = ws.assemble_xml().unwrap();
    assert!(xml.contains(r#"<c r="A1" t="b"><f>A2=1</f><v>1</v></c>"#));
    assert!(xml.contains(r#"<c r="A2" t="e"><f>1/0</f><v>#DIV/0!</v></c>"#));
}

#[test]
fn test_dynamic_function_becomes_dynamic_array() {
    let mut ws = sheet();
    ws.write_formula(0, 0, "=UNIQUE(B1:B10)", None, None).unwrap();
    match ws.cell(0, 0) {
        Some(CellValue::ArrayFormula {
            formula, dynamic, ..
        }) => {
            assert!(dynamic);
            assert_eq!(formula, "_xlfn.UNIQUE(B1:B10)");
        }
        other => panic!("expected dynamic array formula, got {other:?}"),
    }
}

#[test]
fn test_array_formula_pads_range() {
    let mut ws = sheet();
    ws.write_array_formula(0, 0, 2, 0, "{=TREND(B1:B3)}", None, None)
        .unwrap();
    assert_eq!(ws.cell_count(), 3);
    assert!(matches!(ws.cell(2, 0), Some(CellValue::Number { value, .. }) if *value == 0.0));
    assert_eq!(ws.dimensions().to_ref(), "A1:A3");
}

#[test]
fn test_write_row_and_column() {
    let mut ws = sheet();
    ws.write_row(0, 1, [1.0, 2.0, 3.0], None).unwrap();
    ws.write_column(1, 0, ["a", "b"], None).unwrap();
    assert_eq!(ws.dimensions().to_ref(), "A1:D3");
    assert_eq!(ws.cell_text(2, 0).as_deref(), Some("b"));
}

// ============================================================================
// Limits and result codes
// ============================================================================

#[test_case(ROW_MAX, 0 ; "row past the end")]
#[test_case(0, COL_MAX ; "column past the end")]
fn test_out_of_bounds(row: u32, col: u32) {
    let mut ws = sheet();
    let result = ws.write_number(row, col, 1.0, None);
    assert_eq!(result_code(&result), -1);
    assert_eq!(ws.dimensions().rows(), None);
}

#[test]
fn test_last_cell_is_valid() {
    let mut ws = sheet();
    ws.write_number(ROW_MAX - 1, COL_MAX - 1, 1.0, None).unwrap();
    assert_eq!(ws.dimensions().to_ref(), "XFD1048576");
}

#[test]
fn test_long_string_truncated() {
    let mut ws = sheet();
    let long = "x".repeat(32_768);
    let result = ws.write_string(0, 0, &long, None);
    assert_eq!(result_code(&result), -2);
    assert_eq!(result.unwrap(), WriteStatus::Truncated);
    assert_eq!(ws.cell_text(0, 0).unwrap().chars().count(), 32_767);
}

#[test]
fn test_non_finite_numbers() {
    let mut ws = sheet();
    let err = ws.write_number(0, 0, f64::NAN, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOption);
    assert!(ws.cell(0, 0).is_none());

    let mut ws = Worksheet::new(WorksheetOptions {
        nan_inf_to_errors: true,
        ..WorksheetOptions::default()
    })
    .unwrap();
    ws.write_number(0, 0, f64::INFINITY, None).unwrap();
    ws.write_number(1, 0, f64::NAN, None).unwrap();
    let xml = ws.assemble_xml().unwrap();
    assert!(xml.contains(r#"<c r="A1" t="e"><f>1/0</f><v>#DIV/0!</v></c>"#));
    assert!(xml.contains(r#"<c r="A2" t="e"><f>#NUM!</f><v>#NUM!</v></c>"#));
}

#[test]
fn test_empty_formula_rejected() {
    let mut ws = sheet();
    let result = ws.write_formula(0, 0, "", None, None);
    assert_eq!(result_code(&result), -4);
}

#[test]
fn test_merge_conflicts() {
    let mut ws = sheet();
    assert_eq!(
        result_code(&ws.merge_range(0, 0, 0, 0, "x", None)),
        -5,
        "single cell merge"
    );
    ws.merge_range(0, 0, 1, 1, "x", None).unwrap();
    assert_eq!(result_code(&ws.merge_range(1, 1, 2, 2, "y", None)), -5);
    assert_eq!(ws.merged_ranges().len(), 1);
}

#[test]
fn test_rejected_merge_value_leaves_no_merge() {
    let mut ws = sheet();
    let err = ws.merge_range(0, 0, 1, 1, f64::NAN, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOption);
    assert!(ws.merged_ranges().is_empty());
    assert_eq!(ws.cell_count(), 0);
    assert_eq!(ws.dimensions().rows(), None);

    // The same range is still free afterwards.
    ws.merge_range(0, 0, 1, 1, "ok", None).unwrap();
    assert_eq!(ws.merged_ranges().len(), 1);
}

#[test]
fn test_rejected_formula_keeps_dimensions() {
    let mut ws = sheet();
    assert_eq!(result_code(&ws.write_formula(5, 5, "", None, None)), -4);
    assert_eq!(result_code(&ws.write_formula(5, 5, "=", None, None)), -4);
    assert_eq!(result_code(&ws.write(5, 5, "=", None)), -4);
    assert_eq!(
        result_code(&ws.write_array_formula(2, 2, 4, 4, "{=}", None, None)),
        -4
    );
    assert_eq!(ws.dimensions().rows(), None);
    assert_eq!(ws.cell_count(), 0);
}
