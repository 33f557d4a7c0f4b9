//! Sparse in-memory cell storage.
//!
//! Rows are created explicitly on insert; reads never create empty rows.

use std::collections::BTreeMap;

use crate::types::CellValue;

/// Cells of one row keyed by column.
pub type RowCells = BTreeMap<u32, CellValue>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellTable {
    rows: BTreeMap<u32, RowCells>,
    len: usize,
}

impl CellTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row cells, creating the row if needed.
    pub fn row_mut(&mut self, row: u32) -> &mut RowCells {
        self.rows.entry(row).or_default()
    }

    /// Store a cell, replacing any previous value.
    pub fn insert(&mut self, row: u32, col: u32, cell: CellValue) {
        if self.row_mut(row).insert(col, cell).is_none() {
            self.len += 1;
        }
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.rows.get(&row).and_then(|cells| cells.get(&col))
    }

    pub fn row(&self, row: u32) -> Option<&RowCells> {
        self.rows.get(&row).filter(|cells| !cells.is_empty())
    }

    pub fn has_row(&self, row: u32) -> bool {
        self.row(row).is_some()
    }

    /// Rows holding at least one cell, in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &RowCells)> {
        self.rows
            .iter()
            .filter(|(_, cells)| !cells.is_empty())
            .map(|(row, cells)| (*row, cells))
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every row, keeping the allocation of the row map.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.len = 0;
    }
}
