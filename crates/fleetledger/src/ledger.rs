//! The rental ledger.
//!
//! [`Ledger`] owns every vehicle, customer and entry and is the only place a
//! vehicle's status changes. Each mutation follows the same order:
//!
//! 1. check the guard, returning `Ok(false)` if it does not hold
//! 2. append the fact to the store
//! 3. apply it in memory
//!
//! If the append fails the error is returned and memory is left untouched, so
//! the in-memory state never runs ahead of what a reload would rebuild.
//!
//! Every mutating method takes `&mut self`. Sharing a ledger between threads
//! therefore requires wrapping the whole ledger in a single lock, which keeps
//! each read-then-write transition atomic.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::customer::Customer;
use crate::entry::{EntryKind, LedgerEntry};
use crate::error::{Error, Result};
use crate::fields::check_amount;
use crate::plate::Plate;
use crate::storage::{FileStore, StatusChange, Store};
use crate::vehicle::{Vehicle, VehicleStatus};

/// Vehicles, customers and rental history, kept consistent with a [`Store`].
#[derive(Debug)]
pub struct Ledger<S: Store = FileStore> {
    store: S,
    vehicles: Vec<Vehicle>,
    vehicle_index: HashMap<Plate, usize>,
    customers: Vec<Customer>,
    customer_index: HashMap<u32, usize>,
    entries: Vec<LedgerEntry>,
}

/// Summary counts over a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    /// All vehicles.
    pub vehicles: usize,
    /// Vehicles that can be rented.
    pub available: usize,
    /// Vehicles on hold.
    pub held: usize,
    /// Vehicles currently out.
    pub rented: usize,
    /// Vehicles in maintenance.
    pub under_maintenance: usize,
    /// Vehicles out of service.
    pub out_of_service: usize,
    /// Registered customers.
    pub customers: usize,
    /// RENT entries.
    pub rentals: usize,
    /// RETURN entries.
    pub returns: usize,
    /// Rental amounts plus return fees.
    pub revenue: Decimal,
}

impl LedgerStats {
    /// Number of vehicles in the given status.
    #[must_use]
    pub fn count(&self, status: VehicleStatus) -> usize {
        match status {
            VehicleStatus::Available => self.available,
            VehicleStatus::Held => self.held,
            VehicleStatus::Rented => self.rented,
            VehicleStatus::UnderMaintenance => self.under_maintenance,
            VehicleStatus::OutOfService => self.out_of_service,
        }
    }
}

impl<S: Store> Ledger<S> {
    /// Build a ledger from everything the store holds.
    ///
    /// Entries are replayed in order so each vehicle ends in the status of its
    /// most recent rent, return or administrative change. Records that refer
    /// to unknown vehicles or customers, and duplicate keys, are skipped.
    pub fn open(store: S) -> Self {
        let snapshot = store.load();
        let mut ledger = Self {
            store,
            vehicles: Vec::with_capacity(snapshot.vehicles.len()),
            vehicle_index: HashMap::new(),
            customers: Vec::with_capacity(snapshot.customers.len()),
            customer_index: HashMap::new(),
            entries: Vec::with_capacity(snapshot.entries.len()),
        };

        for vehicle in snapshot.vehicles {
            let Some(plate) = vehicle.plate().cloned() else {
                warn!("Skipping stored vehicle without a plate");
                continue;
            };
            if ledger.vehicle_index.contains_key(&plate) {
                warn!("Skipping duplicate stored vehicle {}", plate);
                continue;
            }
            ledger.insert_vehicle(plate, vehicle);
        }

        for customer in snapshot.customers {
            if ledger.customer_index.contains_key(&customer.id()) {
                warn!("Skipping duplicate stored customer {}", customer.id());
                continue;
            }
            ledger.insert_customer(customer);
        }

        let mut changes = snapshot.status_changes;
        changes.sort_by_key(|change| change.after_entries);
        let mut changes = changes.into_iter().peekable();

        // `after_entries` counts accepted entries, so skipped ones don't advance it
        for entry in snapshot.entries {
            let accepted = ledger.entries.len();
            while let Some(change) = changes.next_if(|c| c.after_entries <= accepted) {
                ledger.replay_status_change(&change);
            }
            ledger.replay_entry(entry);
        }
        for change in changes {
            ledger.replay_status_change(&change);
        }

        info!(
            "Ledger loaded: {} vehicles, {} customers, {} entries",
            ledger.vehicles.len(),
            ledger.customers.len(),
            ledger.entries.len()
        );
        ledger
    }

    /// Add a vehicle.
    ///
    /// Returns `Ok(false)` without touching the store if a vehicle with the
    /// same plate already exists. The vehicle enters the ledger as
    /// `Available`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPlate`] if the vehicle has no plate, or a
    /// storage error if the record could not be appended.
    pub fn add_vehicle(&mut self, mut vehicle: Vehicle) -> Result<bool> {
        let plate = vehicle.plate().cloned().ok_or(Error::MissingPlate)?;
        if self.vehicle_index.contains_key(&plate) {
            debug!("Rejected vehicle {}: plate already registered", plate);
            return Ok(false);
        }

        vehicle.set_status(VehicleStatus::Available);
        if let Err(e) = self.store.append_vehicle(&vehicle) {
            warn!("Vehicle {} not added: {}", plate, e);
            return Err(e);
        }

        info!("Added vehicle {}", plate);
        self.insert_vehicle(plate, vehicle);
        Ok(true)
    }

    /// Add a customer.
    ///
    /// Returns `Ok(false)` without touching the store if the id is taken.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record could not be appended.
    pub fn add_customer(&mut self, customer: Customer) -> Result<bool> {
        if self.customer_index.contains_key(&customer.id()) {
            debug!("Rejected customer {}: id already registered", customer.id());
            return Ok(false);
        }

        if let Err(e) = self.store.append_customer(&customer) {
            warn!("Customer {} not added: {}", customer.id(), e);
            return Err(e);
        }

        info!("Added customer {}", customer.id());
        self.insert_customer(customer);
        Ok(true)
    }

    /// Rent out a vehicle.
    ///
    /// Succeeds only if the vehicle is `Available`; it then becomes `Rented`
    /// and one RENT entry is recorded. Returns `Ok(false)` with nothing
    /// changed if the vehicle is in any other state or the vehicle or
    /// customer is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for a negative amount, or a storage
    /// error if the entry could not be appended.
    pub fn rent_vehicle(
        &mut self,
        plate: &Plate,
        customer_id: u32,
        date: NaiveDate,
        amount: Decimal,
    ) -> Result<bool> {
        let amount = check_amount("amount", amount)?;
        self.record(EntryKind::Rent, plate, customer_id, date, amount)
    }

    /// Take back a rented vehicle.
    ///
    /// Succeeds only if the vehicle is `Rented`; it then becomes `Available`
    /// and one RETURN entry carrying `extra_fees` is recorded. Returns
    /// `Ok(false)` with nothing changed otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for negative fees, or a storage error if
    /// the entry could not be appended.
    pub fn return_vehicle(
        &mut self,
        plate: &Plate,
        customer_id: u32,
        date: NaiveDate,
        extra_fees: Decimal,
    ) -> Result<bool> {
        let extra_fees = check_amount("extra fees", extra_fees)?;
        self.record(EntryKind::Return, plate, customer_id, date, extra_fees)
    }

    /// Assign an administrative status.
    ///
    /// Moves a vehicle between `Available`, `Held`, `UnderMaintenance` and
    /// `OutOfService`. `Rented` is reachable only through
    /// [`rent_vehicle`](Self::rent_vehicle), and a rented vehicle must be
    /// returned first; both cases return `Ok(false)`, as does an unknown
    /// plate. Assigning the current status succeeds without recording
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the change could not be appended.
    pub fn set_status(&mut self, plate: &Plate, status: VehicleStatus) -> Result<bool> {
        let Some(&index) = self.vehicle_index.get(plate) else {
            debug!("Rejected status change for unknown vehicle {}", plate);
            return Ok(false);
        };
        let current = self.vehicles[index].status();

        if status == VehicleStatus::Rented || current == VehicleStatus::Rented {
            debug!("Rejected status change for {}: {} -> {}", plate, current, status);
            return Ok(false);
        }
        if current == status {
            return Ok(true);
        }

        let change = StatusChange {
            plate: plate.clone(),
            status,
            after_entries: self.entries.len(),
        };
        if let Err(e) = self.store.append_status_change(&change) {
            warn!("Status of {} not changed: {}", plate, e);
            return Err(e);
        }

        info!("Vehicle {} is now {}", plate, status);
        self.vehicles[index].set_status(status);
        Ok(true)
    }

    /// Look up a vehicle by plate, ignoring case.
    #[must_use]
    pub fn find_vehicle_by_plate(&self, plate: &str) -> Option<&Vehicle> {
        let plate = Plate::parse(plate).ok()?;
        self.vehicle_index.get(&plate).map(|&i| &self.vehicles[i])
    }

    /// Look up a customer by id.
    #[must_use]
    pub fn find_customer_by_id(&self, id: u32) -> Option<&Customer> {
        self.customer_index.get(&id).map(|&i| &self.customers[i])
    }

    /// Vehicles in insertion order, optionally only those in one status.
    #[must_use]
    pub fn vehicles(&self, status: Option<VehicleStatus>) -> Vec<&Vehicle> {
        self.vehicles
            .iter()
            .filter(|v| status.map_or(true, |s| v.status() == s))
            .collect()
    }

    /// Customers in insertion order.
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Every entry in the order it was recorded.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Entries for one vehicle, in order.
    #[must_use]
    pub fn entries_for_vehicle(&self, plate: &Plate) -> Vec<&LedgerEntry> {
        self.entries.iter().filter(|e| &e.plate == plate).collect()
    }

    /// Entries for one customer, in order.
    #[must_use]
    pub fn entries_for_customer(&self, customer_id: u32) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.customer_id == customer_id)
            .collect()
    }

    /// Summary counts.
    #[must_use]
    pub fn stats(&self) -> LedgerStats {
        let mut stats = LedgerStats {
            vehicles: self.vehicles.len(),
            customers: self.customers.len(),
            ..LedgerStats::default()
        };

        for vehicle in &self.vehicles {
            match vehicle.status() {
                VehicleStatus::Available => stats.available += 1,
                VehicleStatus::Held => stats.held += 1,
                VehicleStatus::Rented => stats.rented += 1,
                VehicleStatus::UnderMaintenance => stats.under_maintenance += 1,
                VehicleStatus::OutOfService => stats.out_of_service += 1,
            }
        }

        for entry in &self.entries {
            match entry.kind {
                EntryKind::Rent => stats.rentals += 1,
                EntryKind::Return => stats.returns += 1,
            }
            stats.revenue += entry.amount;
        }

        stats
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give up the ledger and keep its store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn record(
        &mut self,
        kind: EntryKind,
        plate: &Plate,
        customer_id: u32,
        date: NaiveDate,
        amount: Decimal,
    ) -> Result<bool> {
        let Some(&index) = self.vehicle_index.get(plate) else {
            debug!("Rejected {} of unknown vehicle {}", kind, plate);
            return Ok(false);
        };
        if !self.customer_index.contains_key(&customer_id) {
            debug!("Rejected {} of {}: unknown customer {}", kind, plate, customer_id);
            return Ok(false);
        }

        let current = self.vehicles[index].status();
        if current != kind.required_status() {
            debug!("Rejected {} of {}: vehicle is {}", kind, plate, current);
            return Ok(false);
        }

        let entry = LedgerEntry::new(plate.clone(), customer_id, date, amount, kind);
        if let Err(e) = self.store.append_entry(&entry) {
            warn!("{} of {} not recorded: {}", kind, plate, e);
            return Err(e);
        }

        info!("{} of {} by customer {} for {}", kind, plate, customer_id, amount);
        self.vehicles[index].set_status(kind.resulting_status());
        self.entries.push(entry);
        Ok(true)
    }

    fn insert_vehicle(&mut self, plate: Plate, vehicle: Vehicle) {
        self.vehicle_index.insert(plate, self.vehicles.len());
        self.vehicles.push(vehicle);
    }

    fn insert_customer(&mut self, customer: Customer) {
        self.customer_index.insert(customer.id(), self.customers.len());
        self.customers.push(customer);
    }

    fn replay_entry(&mut self, entry: LedgerEntry) {
        let Some(&index) = self.vehicle_index.get(&entry.plate) else {
            warn!("Skipping stored {} for unknown vehicle {}", entry.kind, entry.plate);
            return;
        };
        if !self.customer_index.contains_key(&entry.customer_id) {
            warn!(
                "Skipping stored {} for unknown customer {}",
                entry.kind, entry.customer_id
            );
            return;
        }

        let vehicle = &mut self.vehicles[index];
        if vehicle.status() != entry.kind.required_status() {
            warn!(
                "Stored {} of {} follows status {}; applying it anyway",
                entry.kind,
                entry.plate,
                vehicle.status()
            );
        }
        vehicle.set_status(entry.kind.resulting_status());
        self.entries.push(entry);
    }

    fn replay_status_change(&mut self, change: &StatusChange) {
        match self.vehicle_index.get(&change.plate) {
            Some(&index) => self.vehicles[index].set_status(change.status),
            None => warn!("Skipping status change for unknown vehicle {}", change.plate),
        }
    }
}

impl Ledger<FileStore> {
    /// Open the ledger kept in the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        Ok(Self::open(FileStore::from_config(config)?))
    }
}
