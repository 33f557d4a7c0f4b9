//! Utilities for converting between zero-indexed (row, col) pairs and
//! Excel-style cell references and ranges.

use serde::Serialize;

use crate::error::{Result, XlsheetError};

/// Number of rows in an Excel 2007+ worksheet.
pub const ROW_MAX: u32 = 1_048_576;
/// Number of columns in an Excel 2007+ worksheet.
pub const COL_MAX: u32 = 16_384;

/// Column letters for a zero-indexed column: 0 -> "A", 27 -> "AB".
pub fn col_to_letter(col: u32) -> String {
    let mut letters = Vec::with_capacity(3);
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26 so the narrowing is lossless
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1 name of a zero-indexed cell.
pub fn cell_name(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
}

/// Cell name with optional `$` anchors, e.g. `$A$1`.
pub fn cell_name_abs(row: u32, col: u32, row_abs: bool, col_abs: bool) -> String {
    format!(
        "{}{}{}{}",
        if col_abs { "$" } else { "" },
        col_to_letter(col),
        if row_abs { "$" } else { "" },
        row + 1
    )
}

/// `A1:B2` style range, collapsing to a single cell name when both corners match.
pub fn range_name(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> String {
    let start = cell_name(first_row, first_col);
    let end = cell_name(last_row, last_col);
    if start == end {
        start
    } else {
        format!("{start}:{end}")
    }
}

/// `$A$1:$B$2` style range, collapsing to a single cell when both corners match.
pub fn range_name_abs(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> String {
    let start = cell_name_abs(first_row, first_col, true, true);
    let end = cell_name_abs(last_row, last_col, true, true);
    if start == end {
        start
    } else {
        format!("{start}:{end}")
    }
}

/// Parse column letters ("A", "xfd") into a zero-indexed column.
pub fn parse_col_letters(letters: &str) -> Option<u32> {
    let letters = letters.trim().trim_start_matches('$');
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let upper = ch.to_ascii_uppercase();
        col = col * 26 + (upper as u32 - 'A' as u32 + 1);
    }
    Some(col - 1)
}

/// Parse a cell reference like "A1" or "$B$10" into zero-indexed (row, col).
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let s = cell_ref.trim();
    let split = s
        .char_indices()
        .find(|(i, c)| c.is_ascii_digit() || (*c == '$' && *i > 0))
        .map(|(i, _)| i)?;
    let (letters, digits) = s.split_at(split);
    let col = parse_col_letters(letters)?;
    let digits = digits.trim_start_matches('$');
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col))
}

/// A rectangular block of cells, always stored with first <= last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl CellRange {
    /// Build a range, swapping reversed corners.
    pub fn new(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> Self {
        Self {
            first_row: first_row.min(last_row),
            first_col: first_col.min(last_col),
            last_row: first_row.max(last_row),
            last_col: first_col.max(last_col),
        }
    }

    /// A 1x1 range.
    pub fn cell(row: u32, col: u32) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    /// Both corners inside the sheet limits.
    pub fn is_valid(&self) -> bool {
        self.last_row < ROW_MAX && self.last_col < COL_MAX
    }

    /// Relative A1 name of the range.
    pub fn name(&self) -> String {
        range_name(self.first_row, self.first_col, self.last_row, self.last_col)
    }

    /// Absolute `$A$1:$B$2` name of the range.
    pub fn name_abs(&self) -> String {
        range_name_abs(self.first_row, self.first_col, self.last_row, self.last_col)
    }

    /// A1 name of the top-left cell.
    pub fn anchor_name(&self) -> String {
        cell_name(self.first_row, self.first_col)
    }

    /// Every (row, col) pair of the range in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.first_row..=self.last_row)
            .flat_map(move |r| (self.first_col..=self.last_col).map(move |c| (r, c)))
    }
}

impl std::str::FromStr for CellRange {
    type Err = XlsheetError;

    fn from_str(s: &str) -> Result<Self> {
        parse_cell_range(s).ok_or_else(|| XlsheetError::CellRef(s.to_string()))
    }
}

/// Parse "A1", "A1:C3", "$A$1:$C$3" or a column-only range like "A:C".
pub fn parse_cell_range(range: &str) -> Option<CellRange> {
    let range = range.trim();
    if let Some((start, end)) = range.split_once(':') {
        if let (Some(c1), Some(c2)) = (parse_col_letters(start), parse_col_letters(end)) {
            return Some(CellRange::new(0, c1, ROW_MAX - 1, c2));
        }
        let (r1, c1) = parse_cell_ref(start)?;
        let (r2, c2) = parse_cell_ref(end)?;
        Some(CellRange::new(r1, c1, r2, c2))
    } else {
        let (row, col) = parse_cell_ref(range)?;
        Some(CellRange::cell(row, col))
    }
}

/// Parse a space separated sqref string into ranges.
pub fn parse_sqref(sqref: &str) -> Vec<CellRange> {
    sqref.split_whitespace().filter_map(parse_cell_range).collect()
}

/// Quote a worksheet name for use in a formula or defined name when required.
pub fn quote_sheet_name(name: &str) -> String {
    if name.starts_with('\'') && name.ends_with('\'') && name.len() > 1 {
        return name.to_string();
    }
    let plain = name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    let leading_digit = name.chars().next().is_some_and(|c| c.is_ascii_digit());
    let looks_like_ref = parse_cell_ref(name).is_some() || looks_like_r1c1(name);
    if plain && !leading_digit && !looks_like_ref {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// `R`, `C`, `R1C1`, `rc` style names.
pub(crate) fn looks_like_r1c1(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    if upper == "R" || upper == "C" {
        return true;
    }
    let Some(rest) = upper.strip_prefix('R') else {
        return false;
    };
    let Some((row, col)) = rest.split_once('C') else {
        return false;
    };
    !row.is_empty()
        && !col.is_empty()
        && row.chars().all(|c| c.is_ascii_digit())
        && col.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
        assert_eq!(col_to_letter(COL_MAX - 1), "XFD");
    }

    #[test]
    fn test_cell_names() {
        assert_eq!(cell_name(0, 0), "A1");
        assert_eq!(cell_name(9, 27), "AB10");
        assert_eq!(cell_name_abs(0, 0, true, true), "$A$1");
        assert_eq!(cell_name_abs(4, 2, false, true), "$C5");
        assert_eq!(range_name(0, 0, 1, 1), "A1:B2");
        assert_eq!(range_name(3, 3, 3, 3), "D4");
        assert_eq!(range_name_abs(0, 0, 12, 2), "$A$1:$C$13");
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("$B$10"), Some((9, 1)));
        assert_eq!(parse_cell_ref("xfd1048576"), Some((ROW_MAX - 1, COL_MAX - 1)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("1A"), None);
        assert_eq!(parse_cell_ref("ABCD1"), None);
        assert_eq!(parse_cell_ref(""), None);
    }

    #[test]
    fn test_parse_cell_range() {
        assert_eq!(parse_cell_range("A1:C3"), Some(CellRange::new(0, 0, 2, 2)));
        assert_eq!(parse_cell_range("C3:A1"), Some(CellRange::new(0, 0, 2, 2)));
        assert_eq!(parse_cell_range("B2"), Some(CellRange::cell(1, 1)));
        assert_eq!(
            parse_cell_range("A:C"),
            Some(CellRange::new(0, 0, ROW_MAX - 1, 2))
        );
        assert_eq!(parse_cell_range("nonsense"), None);
        assert!("A1:B".parse::<CellRange>().is_err());
    }

    #[test]
    fn test_range_helpers() {
        let r = CellRange::new(2, 2, 0, 0);
        assert_eq!(r.name(), "A1:C3");
        assert_eq!(r.anchor_name(), "A1");
        assert!(r.contains(1, 1));
        assert!(!r.contains(3, 0));
        assert_eq!(r.cells().count(), 9);
        assert!(CellRange::cell(4, 4).is_single_cell());
    }

    #[test]
    fn test_parse_sqref() {
        let ranges = parse_sqref("A1:A3 C1");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1], CellRange::cell(0, 2));
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Sheet1"), "Sheet1");
        assert_eq!(quote_sheet_name("Sales Data"), "'Sales Data'");
        assert_eq!(quote_sheet_name("O'Brien"), "'O''Brien'");
        assert_eq!(quote_sheet_name("A1"), "'A1'");
        assert_eq!(quote_sheet_name("R1C1"), "'R1C1'");
        assert_eq!(quote_sheet_name("2024"), "'2024'");
        assert_eq!(quote_sheet_name("'Quoted'"), "'Quoted'");
    }
}
