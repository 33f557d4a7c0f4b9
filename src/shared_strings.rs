//! Workbook shared string table.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexSet;

/// Deduplicated string table referenced by `t="s"` cells.
#[derive(Debug, Default)]
pub struct SharedStringTable {
    strings: IndexSet<String>,
    total: u64,
}

/// Handle through which several worksheets share one table.
pub type SharedStrings = Rc<RefCell<SharedStringTable>>;

impl SharedStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// New table wrapped for sharing between worksheets.
    pub fn shared() -> SharedStrings {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Index of `s`, adding it on first use. Every call counts as one reference.
    pub fn intern(&mut self, s: &str) -> u32 {
        self.total += 1;
        let index = match self.strings.get_index_of(s) {
            Some(i) => i,
            None => self.strings.insert_full(s.to_string()).0,
        };
        u32::try_from(index).unwrap_or(u32::MAX)
    }

    /// String stored at `index`.
    pub fn resolve(&self, index: u32) -> Option<&str> {
        self.strings
            .get_index(usize::try_from(index).ok()?)
            .map(String::as_str)
    }

    /// Number of unique strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Number of string references, including repeats.
    pub fn total_count(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut sst = SharedStringTable::new();
        assert_eq!(sst.intern("alpha"), 0);
        assert_eq!(sst.intern("beta"), 1);
        assert_eq!(sst.intern("alpha"), 0);
        assert_eq!(sst.len(), 2);
        assert_eq!(sst.total_count(), 3);
        assert_eq!(sst.resolve(1), Some("beta"));
        assert_eq!(sst.resolve(7), None);
    }

    #[test]
    fn test_shared_handle() {
        let sst = SharedStringTable::shared();
        let other = Rc::clone(&sst);
        sst.borrow_mut().intern("x");
        assert_eq!(other.borrow().iter().collect::<Vec<_>>(), vec!["x"]);
    }
}
