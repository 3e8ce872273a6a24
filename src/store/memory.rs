//! In-process store.

use std::collections::HashMap;

use super::{CellRef, Sheet, Store, StoreError};

/// Store holding sheets in memory.
///
/// Used by tests, and by `show` to run a cycle against a copy of a real
/// store without touching it. Can be switched offline to simulate outages.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sheets: HashMap<String, Sheet>,
    offline: bool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the named sheets out of another store. Missing sheets are skipped.
    ///
    /// # Errors
    ///
    /// Returns any error other than [`StoreError::MissingSheet`].
    pub fn snapshot(source: &impl Store, names: &[&str]) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for &name in names {
            match source.read_sheet(name) {
                Ok(sheet) => store.insert_sheet(name, sheet),
                Err(StoreError::MissingSheet(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(store)
    }

    /// Insert or replace a sheet.
    pub fn insert_sheet(&mut self, name: impl Into<String>, sheet: Sheet) {
        self.sheets.insert(name.into(), sheet);
    }

    /// Get a sheet without going through the [`Store`] trait.
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Get a sheet mutably, e.g. to append feed rows in tests.
    #[must_use]
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.get_mut(name)
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Store for MemoryStore {
    fn read_sheet(&self, name: &str) -> Result<Sheet, StoreError> {
        self.check_online()?;
        self.sheets
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::MissingSheet(name.to_string()))
    }

    fn write_range(&mut self, name: &str, anchor: CellRef, rows: &[Vec<String>]) -> Result<(), StoreError> {
        self.check_online()?;
        self.sheets.entry(name.to_string()).or_default().write(anchor, rows);
        Ok(())
    }
}
