//! `fleetledger` - Vehicle rental record keeping
//!
//! This library tracks a fleet of rentable vehicles, the customers who rent
//! them, and an append-only history of rent and return transactions. Every
//! accepted change is written to flat files before it takes effect in memory,
//! and reopening the ledger replays that history.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use fleetledger::{Customer, FileStore, Ledger, Plate, Vehicle, VehicleKind};
//! use rust_decimal::Decimal;
//!
//! # fn main() -> fleetledger::Result<()> {
//! let mut ledger = Ledger::open(FileStore::open("/tmp/fleet")?);
//! let camry = Vehicle::new("toyota", "camry", 2022, VehicleKind::Car { seats: 5 })?
//!     .with_plate("ABC123")?;
//! ledger.add_vehicle(camry)?;
//! ledger.add_customer(Customer::new(100, "Test Customer")?)?;
//!
//! let plate = Plate::parse("ABC123")?;
//! let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default();
//! assert!(ledger.rent_vehicle(&plate, 100, date, Decimal::new(50, 0))?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod customer;
pub mod entry;
pub mod error;
pub mod fields;
pub mod ledger;
pub mod logging;
pub mod plate;
pub mod storage;
pub mod vehicle;

pub use config::Config;
pub use customer::Customer;
pub use entry::{EntryKind, LedgerEntry};
pub use error::{Error, Result};
pub use ledger::{Ledger, LedgerStats};
pub use logging::init_logging;
pub use plate::{Plate, PlateError};
pub use storage::{FileStore, MemoryStore, Store};
pub use vehicle::{Vehicle, VehicleKind, VehicleStatus};
