//! Worksheet XML export.
//!
//! `xml_writer` is the element emitter, `sheet_data` writes rows and cells
//! for both cell sinks, `sheet_writer` assembles the whole worksheet part in
//! the element order Excel requires.

pub mod sheet_data;
pub(crate) mod sheet_writer;
pub mod xml_writer;

pub use sheet_writer::SheetRelationships;
pub use xml_writer::{format_number, XmlWriter};
