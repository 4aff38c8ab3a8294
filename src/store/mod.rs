//! Record storage.
//!
//! The store owns the placement table and its persisted form. The
//! dashboard and the aggregator only ever see snapshots returned by
//! [`RecordStore::load`].

mod csv_store;

pub use csv_store::CsvStore;

use crate::error::Result;
use crate::models::{Record, Table};
use std::cell::{Cell, RefCell};

/// Load/append/persist interface over the placement table.
pub trait RecordStore {
    /// Read the current table. An absent backing file is an empty table.
    fn load(&self) -> Result<Table>;

    /// Return a new table with `record` at the end.
    fn append(&self, table: &Table, record: Record) -> Table {
        table.appended(record)
    }

    /// Overwrite the persisted table with `table`.
    fn persist(&self, table: &Table) -> Result<()>;
}

/// Store that keeps the "file" in memory.
#[allow(dead_code)] // Swap-in store for the presenter tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RefCell<Table>,
    persists: Cell<usize>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new(table: Table) -> Self {
        Self {
            table: RefCell::new(table),
            persists: Cell::new(0),
        }
    }

    /// Number of times `persist` has been called.
    pub fn persist_count(&self) -> usize {
        self.persists.get()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Table> {
        Ok(self.table.borrow().clone())
    }

    fn persist(&self, table: &Table) -> Result<()> {
        *self.table.borrow_mut() = table.clone();
        self.persists.set(self.persists.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryStore::default();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.persist_count(), 0);
    }

    #[test]
    fn test_append_does_not_touch_store() {
        let store = MemoryStore::default();
        let table = store.load().unwrap();
        let grown = store.append(&table, record("2023", "1", "R1", "Asha", "CSE", "Acme"));

        assert_eq!(grown.len(), 1);
        assert!(table.is_empty());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_persist_replaces_table() {
        let store = MemoryStore::default();
        let table = Table::from(vec![record("2023", "1", "R1", "Asha", "CSE", "Acme")]);
        store.persist(&table).unwrap();

        assert_eq!(store.load().unwrap(), table);
        assert_eq!(store.persist_count(), 1);
    }
}
