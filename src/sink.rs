//! Cell storage strategies.
//!
//! A worksheet is built over one [`CellSink`] chosen at construction:
//! [`BufferedSink`] keeps every cell in memory and can be read back and
//! written in any order, [`StreamingSink`] keeps a single row in memory and
//! spills finished rows to a temporary file, which requires rows to arrive
//! in non-decreasing order.

use std::fs::File;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};

use crate::cell_table::{CellTable, RowCells};
use crate::error::{Result, XlsheetError};
use crate::export::sheet_data::{self, RowContext};
use crate::export::XmlWriter;
use crate::shared_strings::SharedStrings;
use crate::types::{CellValue, StringRef};

/// Where written cells go.
pub trait CellSink: std::fmt::Debug {
    /// Rows are flushed as soon as a later row is written.
    fn is_streaming(&self) -> bool;

    /// Prepare for a write to `row`. Streaming sinks reject rows before the
    /// current one and flush the current row when `row` moves past it.
    fn advance_to(&mut self, row: u32, ctx: &RowContext<'_>) -> Result<()>;

    /// Store a cell, replacing any value already at that position.
    fn insert(&mut self, row: u32, col: u32, cell: CellValue) -> Result<()>;

    /// Cell still held in memory.
    fn get(&self, row: u32, col: u32) -> Option<&CellValue>;

    /// How a string is referenced from its cell.
    fn string_ref(&self, sst: &SharedStrings, text: &str) -> StringRef;

    /// How a rich string fragment (`<r>` runs) is referenced from its cell.
    fn rich_string_ref(&self, sst: &SharedStrings, fragment: String) -> StringRef;

    /// Number of cells written so far.
    fn cell_count(&self) -> usize;

    /// Write the children of `<sheetData>`. `rows` are the dimension row
    /// bounds, `None` for an empty sheet.
    fn write_rows(
        &mut self,
        out: &mut XmlWriter,
        rows: Option<(u32, u32)>,
        ctx: &RowContext<'_>,
    ) -> Result<()>;
}

/// In-memory sink over a sparse [`CellTable`].
#[derive(Debug, Default)]
pub struct BufferedSink {
    table: CellTable,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &CellTable {
        &self.table
    }
}

impl CellSink for BufferedSink {
    fn is_streaming(&self) -> bool {
        false
    }

    fn advance_to(&mut self, _row: u32, _ctx: &RowContext<'_>) -> Result<()> {
        Ok(())
    }

    fn insert(&mut self, row: u32, col: u32, cell: CellValue) -> Result<()> {
        self.table.insert(row, col, cell);
        Ok(())
    }

    fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.table.get(row, col)
    }

    fn string_ref(&self, sst: &SharedStrings, text: &str) -> StringRef {
        StringRef::Shared(sst.borrow_mut().intern(text))
    }

    fn rich_string_ref(&self, sst: &SharedStrings, fragment: String) -> StringRef {
        StringRef::Shared(sst.borrow_mut().intern(&fragment))
    }

    fn cell_count(&self) -> usize {
        self.table.len()
    }

    fn write_rows(
        &mut self,
        out: &mut XmlWriter,
        rows: Option<(u32, u32)>,
        ctx: &RowContext<'_>,
    ) -> Result<()> {
        let Some((first, last)) = rows else {
            return Ok(());
        };
        let spans = sheet_data::calculate_spans(self.table.rows(), ctx.comments);
        let written = sheet_data::rows_to_write(self.table.rows().map(|(r, _)| r), ctx, first, last);
        let empty = RowCells::new();
        for row in written {
            let span = spans.get(&(row / 16)).map(String::as_str);
            let cells = self.table.row(row).unwrap_or(&empty);
            sheet_data::write_row(out, row, cells, span, ctx);
        }
        Ok(())
    }
}

/// Constant memory sink: one row in memory, finished rows in a temp file.
#[derive(Debug)]
pub struct StreamingSink {
    /// `None` once the rows were copied into the sheet XML.
    spill: Option<BufWriter<File>>,
    current_row: Option<u32>,
    current: RowCells,
    count: usize,
}

impl StreamingSink {
    /// Create the sink and its anonymous spill file.
    pub fn new() -> Result<Self> {
        let file = tempfile::tempfile()?;
        Ok(Self {
            spill: Some(BufWriter::new(file)),
            current_row: None,
            current: RowCells::new(),
            count: 0,
        })
    }

    /// Row currently held in memory.
    pub fn current_row(&self) -> Option<u32> {
        self.current_row
    }

    fn spill(&mut self) -> Result<&mut BufWriter<File>> {
        self.spill
            .as_mut()
            .ok_or(XlsheetError::Unsupported("writing after the sheet was assembled"))
    }

    /// Write the in-memory row to the spill file.
    fn flush_row(&mut self, ctx: &RowContext<'_>) -> Result<()> {
        let Some(row) = self.current_row else {
            return Ok(());
        };
        let has_cells = !self.current.is_empty();
        if ctx.is_written(row, has_cells) {
            let mut xml = XmlWriter::with_capacity(256);
            sheet_data::write_row(&mut xml, row, &self.current, None, ctx);
            self.spill()?.write_all(xml.as_str().as_bytes())?;
        }
        self.current.clear();
        Ok(())
    }
}

impl CellSink for StreamingSink {
    fn is_streaming(&self) -> bool {
        true
    }

    fn advance_to(&mut self, row: u32, ctx: &RowContext<'_>) -> Result<()> {
        if self.spill.is_none() {
            return Err(XlsheetError::Unsupported(
                "writing after the sheet was assembled",
            ));
        }
        match self.current_row {
            Some(current) if row < current => {
                log::warn!("row {row} written after row {current} in constant memory mode");
                Err(XlsheetError::RowOutOfOrder {
                    row,
                    flushed: current,
                })
            }
            Some(current) if row == current => Ok(()),
            _ => {
                self.flush_row(ctx)?;
                self.current_row = Some(row);
                Ok(())
            }
        }
    }

    fn insert(&mut self, row: u32, col: u32, cell: CellValue) -> Result<()> {
        if self.current_row != Some(row) {
            return Err(XlsheetError::RowOutOfOrder {
                row,
                flushed: self.current_row.unwrap_or(0),
            });
        }
        if self.current.insert(col, cell).is_none() {
            self.count += 1;
        }
        Ok(())
    }

    fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        if self.current_row == Some(row) {
            self.current.get(&col)
        } else {
            None
        }
    }

    fn string_ref(&self, _sst: &SharedStrings, text: &str) -> StringRef {
        StringRef::Inline(text.to_string())
    }

    fn rich_string_ref(&self, _sst: &SharedStrings, fragment: String) -> StringRef {
        StringRef::InlineRich(fragment)
    }

    fn cell_count(&self) -> usize {
        self.count
    }

    fn write_rows(
        &mut self,
        out: &mut XmlWriter,
        _rows: Option<(u32, u32)>,
        ctx: &RowContext<'_>,
    ) -> Result<()> {
        self.flush_row(ctx)?;
        self.current_row = None;
        let writer = self
            .spill
            .take()
            .ok_or(XlsheetError::Unsupported("assembling a sheet twice"))?;
        let mut file = writer.into_inner().map_err(|e| e.into_error())?;
        file.seek(SeekFrom::Start(0))?;
        let mut rows = String::new();
        file.read_to_string(&mut rows)?;
        out.raw(&rows);
        // the anonymous temp file is removed when `file` drops here
        Ok(())
    }
}
