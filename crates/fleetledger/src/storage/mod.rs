//! Durable storage for the ledger.
//!
//! The ledger talks to storage through the [`Store`] trait. Two stores are
//! provided:
//! - [`FileStore`], the append-only flat files used in production
//! - [`MemoryStore`], an isolated store for tests and embedding
//!
//! Loading is best-effort: a missing or unreadable store yields an empty
//! collection and malformed lines are skipped. Appends are synchronous and
//! report failure to the caller.

pub mod file;
pub mod memory;
pub mod records;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::customer::Customer;
use crate::entry::LedgerEntry;
use crate::error::Result;
use crate::plate::Plate;
use crate::vehicle::{Vehicle, VehicleStatus};

pub use file::FileStore;
pub use memory::MemoryStore;

/// An administrative status assignment.
///
/// `after_entries` is the number of ledger entries that existed when the
/// assignment was made, which places it in the rent/return history on reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Vehicle whose status changed.
    pub plate: Plate,
    /// The new status.
    pub status: VehicleStatus,
    /// Number of entries recorded before the change.
    pub after_entries: usize,
}

/// Everything read back from a store at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Vehicles in the order they were added.
    pub vehicles: Vec<Vehicle>,
    /// Customers in the order they were added.
    pub customers: Vec<Customer>,
    /// Entries in the order they were recorded.
    pub entries: Vec<LedgerEntry>,
    /// Administrative status changes in the order they were made.
    pub status_changes: Vec<StatusChange>,
}

/// Backing storage for a [`Ledger`](crate::Ledger).
///
/// Each append must be durable when it returns `Ok`. Implementations never
/// rewrite or remove earlier records.
///
/// An append that returns `Err` may still have reached the store, for example
/// when the write lands but the flush fails. Such a record appears on the next
/// load even though the ledger did not apply it; a partial record is skipped
/// as malformed and never merges with the record appended after it.
pub trait Store: Debug {
    /// Read back everything persisted so far.
    ///
    /// Failures are logged and degrade to empty collections.
    fn load(&self) -> Snapshot;

    /// Append a newly added vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn append_vehicle(&mut self, vehicle: &Vehicle) -> Result<()>;

    /// Append a newly added customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn append_customer(&mut self, customer: &Customer) -> Result<()>;

    /// Append a rent or return entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn append_entry(&mut self, entry: &LedgerEntry) -> Result<()>;

    /// Append an administrative status change.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn append_status_change(&mut self, change: &StatusChange) -> Result<()>;
}
