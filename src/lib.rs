//! xlsheet - worksheet cell model and OOXML worksheet serializer
//!
//! Builds the `xl/worksheets/sheetN.xml` part of an XLSX file:
//! - Typed and sniffing cell writes with Excel's limits enforced
//! - Merges, hyperlinks, comments, autofilters, data validation
//! - Conditional formats, tables, sparklines, images and charts anchors
//! - Views, panes, page setup and sheet protection
//! - Buffered or constant memory (row streaming) storage
//!
//! Packaging the part into a workbook is left to the caller; the sheet
//! exposes the relationships and objects a packager needs.
//!
//! # Usage
//!
//! ```
//! use xlsheet::{Worksheet, WorksheetOptions};
//!
//! let mut ws = Worksheet::new(WorksheetOptions::default())?;
//! ws.write(0, 0, "Total", None)?;
//! ws.write(0, 1, 42.0, None)?;
//! ws.write(1, 1, "=B1*2", None)?;
//! let xml = ws.assemble_xml()?;
//! assert!(xml.contains(r#"<c r="B2"><f>B1*2</f><v>0</v></c>"#));
//! # Ok::<(), xlsheet::XlsheetError>(())
//! ```

// Core model
pub mod cell_ref;
pub mod cell_table;
pub mod color;
pub mod datetime;
pub mod error;
pub mod format;
pub mod formula;
pub mod options;
pub mod shared_strings;
pub mod sink;
pub mod types;
pub mod worksheet;

// Feature overlays
pub mod auto_filter;
pub mod comments;
pub mod conditional;
pub mod data_validation;
pub mod drawings;
pub mod hyperlinks;
pub mod outlines;
pub mod page_setup;
pub mod protection;
pub mod rich_text;
pub mod sparklines;
pub mod tables;
pub mod views;

// Output
pub mod csv;
pub mod export;
pub mod namespaces;

pub use cell_ref::{cell_name, parse_cell_range, parse_cell_ref, CellRange};
pub use datetime::DateValue;
pub use error::{result_code, ErrorKind, Result, WriteStatus, XlsheetError};
pub use export::SheetRelationships;
pub use format::Format;
pub use options::WorksheetOptions;
pub use protection::ProtectionOptions;
pub use shared_strings::{SharedStringTable, SharedStrings};
pub use types::*;
pub use worksheet::{Dimensions, SheetSummary, Worksheet};

/// Get the library version
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
