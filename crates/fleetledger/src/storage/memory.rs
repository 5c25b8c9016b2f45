//! In-memory store.

use std::io;
use std::path::PathBuf;

use crate::customer::Customer;
use crate::entry::LedgerEntry;
use crate::error::{Error, Result};
use crate::vehicle::Vehicle;

use super::{Snapshot, StatusChange, Store};

/// A store that keeps records in memory.
///
/// Records are held exactly as a file store would read them back, so a
/// ledger reopened over the same `MemoryStore` sees the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Snapshot,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records.
    #[must_use]
    pub fn with_records(records: Snapshot) -> Self {
        Self {
            records,
            fail_writes: false,
        }
    }

    /// Make every subsequent append fail, as a full or read-only disk would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Records appended so far.
    #[must_use]
    pub fn records(&self) -> &Snapshot {
        &self.records
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            return Err(Error::StoreWrite {
                path: PathBuf::from(":memory:"),
                source: io::Error::new(io::ErrorKind::Other, "writes disabled"),
            });
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Snapshot {
        self.records.clone()
    }

    fn append_vehicle(&mut self, vehicle: &Vehicle) -> Result<()> {
        self.check_writable()?;
        self.records.vehicles.push(vehicle.clone());
        Ok(())
    }

    fn append_customer(&mut self, customer: &Customer) -> Result<()> {
        self.check_writable()?;
        self.records.customers.push(customer.clone());
        Ok(())
    }

    fn append_entry(&mut self, entry: &LedgerEntry) -> Result<()> {
        self.check_writable()?;
        self.records.entries.push(entry.clone());
        Ok(())
    }

    fn append_status_change(&mut self, change: &StatusChange) -> Result<()> {
        self.check_writable()?;
        self.records.status_changes.push(change.clone());
        Ok(())
    }
}
