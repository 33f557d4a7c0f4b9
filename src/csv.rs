//! Minimal CSV/TSV loader that fills a [`Worksheet`] through `write`.
//!
//! Fields that parse as numbers are written as numbers; everything else
//! goes through the usual string sniffing (formulas, URLs).

use std::path::Path;

use serde::Serialize;

use crate::error::{Result, WriteStatus};
use crate::worksheet::Worksheet;

/// Field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// Tab for `.tsv`/`.tab` files, comma otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => {
                Self::Tab
            }
            _ => Self::Comma,
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// Outcome of loading delimited text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    pub rows: u32,
    pub cells: u32,
    /// Strings cut to Excel's length limit.
    pub truncated: u32,
}

/// Write delimited text into `ws`, one line per row starting at row 0.
/// Blank lines keep their row, empty fields are skipped.
pub fn load_delimited(ws: &mut Worksheet, text: &str, delim: Delimiter) -> Result<LoadStats> {
    let mut stats = LoadStats::default();
    for (row, line) in (0u32..).zip(text.lines()) {
        stats.rows = row + 1;
        if line.is_empty() {
            continue;
        }
        for (col, field) in (0u32..).zip(split_line(line, delim.as_char())) {
            let value = field.trim();
            if value.is_empty() {
                continue;
            }
            let status = match value.parse::<f64>() {
                Ok(number) if number.is_finite() => ws.write_number(row, col, number, None)?,
                _ => ws.write(row, col, value, None)?,
            };
            stats.cells += 1;
            if status == WriteStatus::Truncated {
                stats.truncated += 1;
            }
        }
    }
    log::debug!("loaded {} cells in {} rows", stats.cells, stats.rows);
    Ok(stats)
}

/// Split a line respecting quoted fields and `""` escapes.
fn split_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}
