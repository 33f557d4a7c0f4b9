//! Structured error types for xlsheet.
//!
//! Every worksheet call reports failure through [`XlsheetError`]. Callers that
//! want the classic integer result codes can use [`XlsheetError::code`].

use serde::Serialize;

/// Failure categories shared by every worksheet operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Row/column outside the sheet, or a row written out of order while streaming.
    OutOfBounds,
    /// Content was cut to fit a limit but still written.
    Truncated,
    /// Content exceeded a limit and nothing was written.
    LimitExceeded,
    /// Unknown option key or a value outside its keyword set.
    InvalidOption,
    /// Call conflicts with its own arguments or with existing sheet state.
    StructuralConflict,
    /// Feature is not available in the current worksheet mode.
    Unsupported,
    /// Spill file or output stream failure.
    Io,
}

impl ErrorKind {
    /// Negative integer result code for this category.
    pub const fn code(self) -> i32 {
        match self {
            Self::OutOfBounds => -1,
            Self::Truncated => -2,
            Self::LimitExceeded => -3,
            Self::InvalidOption => -4,
            Self::StructuralConflict => -5,
            Self::Unsupported => -6,
            Self::Io => -7,
        }
    }
}

/// All errors that can occur while building or serializing a worksheet.
#[derive(Debug, thiserror::Error)]
pub enum XlsheetError {
    /// Row or column outside Excel's sheet limits.
    #[error("cell ({row}, {col}) is outside the worksheet limits")]
    CellOutOfRange { row: u32, col: u32 },

    /// Constant memory mode only accepts non-decreasing rows.
    #[error("row {row} is before already flushed row {flushed} in constant memory mode")]
    RowOutOfOrder { row: u32, flushed: u32 },

    /// Invalid A1 style cell or range reference.
    #[error("invalid cell reference: {0}")]
    CellRef(String),

    /// Text longer than the Excel limit for that field.
    #[error("{what} exceeds Excel's limit of {limit} characters")]
    StringTooLong { what: &'static str, limit: usize },

    /// Escaped URL or its anchor is longer than the configured maximum.
    #[error("URL '{url}' exceeds Excel's limit of {limit} characters")]
    UrlTooLong { url: String, limit: usize },

    /// Per-worksheet hyperlink cap reached.
    #[error("hyperlink limit of {0} per worksheet exceeded")]
    TooManyHyperlinks(usize),

    /// NaN/Inf written without `nan_inf_to_errors`.
    #[error("number {0} is NaN or infinite and nan_inf_to_errors is off")]
    NonFiniteNumber(f64),

    /// Keyword outside a closed option set.
    #[error("unknown {kind} '{value}'")]
    UnknownKeyword { kind: &'static str, value: String },

    /// Missing, unknown or inconsistent option.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Numeric setting outside Excel's accepted range.
    #[error("{what} {value} outside range {min}..={max}")]
    ValueOutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Call conflicts with its arguments or earlier state (single-cell merge,
    /// overlapping ranges, consecutive rich string formats).
    #[error("{0}")]
    Conflict(String),

    /// Feature not available in constant memory mode.
    #[error("{0} is not supported in constant memory mode")]
    Unsupported(&'static str),

    /// JSON option block could not be decoded.
    #[error("option decoding: {0}")]
    Options(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl XlsheetError {
    /// The error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CellOutOfRange { .. } | Self::RowOutOfOrder { .. } | Self::CellRef(_) => {
                ErrorKind::OutOfBounds
            }
            Self::StringTooLong { .. } | Self::UrlTooLong { .. } | Self::TooManyHyperlinks(_) => {
                ErrorKind::LimitExceeded
            }
            Self::NonFiniteNumber(_)
            | Self::UnknownKeyword { .. }
            | Self::InvalidOption(_)
            | Self::ValueOutOfRange { .. }
            | Self::Options(_) => ErrorKind::InvalidOption,
            Self::Conflict(_) => ErrorKind::StructuralConflict,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Integer result code of the error category.
    pub fn code(&self) -> i32 {
        self.kind().code()
    }

    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownKeyword {
            kind,
            value: value.to_string(),
        }
    }
}

/// Outcome of a write that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteStatus {
    /// Stored as given.
    Complete,
    /// Stored after cutting the text to Excel's string limit.
    Truncated,
}

impl WriteStatus {
    /// `0` for a complete write, the truncation code otherwise.
    pub const fn code(self) -> i32 {
        match self {
            Self::Complete => 0,
            Self::Truncated => ErrorKind::Truncated.code(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlsheetError>;

/// Collapse a write result into the integer result code.
pub fn result_code(result: &Result<WriteStatus>) -> i32 {
    match result {
        Ok(status) => status.code(),
        Err(e) => e.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_and_negative() {
        let kinds = [
            ErrorKind::OutOfBounds,
            ErrorKind::Truncated,
            ErrorKind::LimitExceeded,
            ErrorKind::InvalidOption,
            ErrorKind::StructuralConflict,
            ErrorKind::Unsupported,
            ErrorKind::Io,
        ];
        let mut codes: Vec<i32> = kinds.iter().map(|k| k.code()).collect();
        assert!(codes.iter().all(|c| *c < 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_result_code() {
        assert_eq!(result_code(&Ok(WriteStatus::Complete)), 0);
        assert_eq!(result_code(&Ok(WriteStatus::Truncated)), -2);
        let err = XlsheetError::RowOutOfOrder { row: 3, flushed: 5 };
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        assert_eq!(result_code(&Err(err)), -1);
    }
}
