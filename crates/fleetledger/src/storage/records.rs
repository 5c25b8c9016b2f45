//! Line formats for the flat stores.
//!
//! Every store is newline-delimited, comma-separated and append-only:
//!
//! | store          | line                                         |
//! |----------------|----------------------------------------------|
//! | vehicles       | `plate,make,model,year,status,KIND[,field…]` |
//! | customers      | `id,name`                                    |
//! | entries        | `plate,customerId,date,amount,kind`          |
//! | status changes | `plate,status,entryCount`                    |
//!
//! Vehicle kinds are written as `CAR,<seats>`, `MINIBUS,<accessible>` or
//! `PICKUP,<cargo_capacity>,<has_trailer>`. A vehicle line with only the first
//! five fields predates kinds and decodes as a car.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::customer::Customer;
use crate::entry::{EntryKind, LedgerEntry};
use crate::error::{Error, Result};
use crate::fields::{parse_date, DELIMITER};
use crate::plate::Plate;
use crate::vehicle::{Vehicle, VehicleKind, VehicleStatus};

use super::StatusChange;

/// Kind tag for cars.
pub const KIND_CAR: &str = "CAR";

/// Kind tag for minibuses.
pub const KIND_MINIBUS: &str = "MINIBUS";

/// Kind tag for pickup trucks.
pub const KIND_PICKUP: &str = "PICKUP";

/// Encode a vehicle as a store line (without the trailing newline).
///
/// # Errors
///
/// Returns [`Error::MissingPlate`] if the vehicle has no plate.
pub fn encode_vehicle(vehicle: &Vehicle) -> Result<String> {
    let plate = vehicle.plate().ok_or(Error::MissingPlate)?;
    let kind = match vehicle.kind() {
        VehicleKind::Car { seats } => format!("{KIND_CAR},{seats}"),
        VehicleKind::Minibus { accessible } => format!("{KIND_MINIBUS},{accessible}"),
        VehicleKind::PickupTruck {
            cargo_capacity,
            has_trailer,
        } => format!("{KIND_PICKUP},{cargo_capacity},{has_trailer}"),
    };
    Ok(format!(
        "{plate},{},{},{},{},{kind}",
        vehicle.make(),
        vehicle.model(),
        vehicle.year(),
        vehicle.status(),
    ))
}

/// Decode a vehicle line.
///
/// `default_seats` is used for lines written before vehicle kinds were stored.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] if the line does not have the expected
/// shape or any field fails validation.
pub fn decode_vehicle(line: &str, default_seats: u32) -> Result<Vehicle> {
    let parts = split(line);
    if parts.len() < 5 {
        return Err(field_count("vehicle", 5, parts.len()));
    }

    let kind = match parts.get(5).copied() {
        None => VehicleKind::Car {
            seats: default_seats,
        },
        Some(KIND_CAR) => {
            expect_len("car", &parts, 7)?;
            VehicleKind::Car {
                seats: parse_field(parts[6], "seats")?,
            }
        }
        Some(KIND_MINIBUS) => {
            expect_len("minibus", &parts, 7)?;
            VehicleKind::Minibus {
                accessible: parse_field(parts[6], "accessible")?,
            }
        }
        Some(KIND_PICKUP) => {
            expect_len("pickup", &parts, 8)?;
            VehicleKind::PickupTruck {
                cargo_capacity: parse_field(parts[6], "cargo capacity")?,
                has_trailer: parse_field(parts[7], "trailer")?,
            }
        }
        Some(other) => return Err(Error::malformed(format!("unknown vehicle kind '{other}'"))),
    };

    let year = parse_field(parts[3], "year")?;
    let status = VehicleStatus::from_str(parts[4]).map_err(as_malformed)?;
    let mut vehicle = Vehicle::new(parts[1], parts[2], year, kind).map_err(as_malformed)?;
    vehicle
        .set_license_plate(Some(parts[0]))
        .map_err(|e| as_malformed(e.into()))?;
    vehicle.set_status(status);
    Ok(vehicle)
}

/// Encode a customer as a store line.
#[must_use]
pub fn encode_customer(customer: &Customer) -> String {
    format!("{},{}", customer.id(), customer.name())
}

/// Decode a customer line.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] if the line does not have the expected
/// shape.
pub fn decode_customer(line: &str) -> Result<Customer> {
    let parts = split(line);
    if parts.len() != 2 {
        return Err(field_count("customer", 2, parts.len()));
    }
    let id = parse_field(parts[0], "customer id")?;
    Customer::new(id, parts[1]).map_err(as_malformed)
}

/// Encode a ledger entry as a store line.
#[must_use]
pub fn encode_entry(entry: &LedgerEntry) -> String {
    format!(
        "{},{},{},{},{}",
        entry.plate,
        entry.customer_id,
        entry.date.format("%Y-%m-%d"),
        entry.amount,
        entry.kind
    )
}

/// Decode an entry line.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] if the line does not have the expected
/// shape.
pub fn decode_entry(line: &str) -> Result<LedgerEntry> {
    let parts = split(line);
    if parts.len() != 5 {
        return Err(field_count("entry", 5, parts.len()));
    }
    let plate = Plate::parse(parts[0]).map_err(|e| as_malformed(e.into()))?;
    let customer_id = parse_field(parts[1], "customer id")?;
    let date = parse_date(parts[2]).map_err(as_malformed)?;
    let amount: Decimal = parse_field(parts[3], "amount")?;
    let kind = EntryKind::from_str(parts[4]).map_err(as_malformed)?;
    Ok(LedgerEntry::new(plate, customer_id, date, amount, kind))
}

/// Encode a status change as a store line.
#[must_use]
pub fn encode_status_change(change: &StatusChange) -> String {
    format!("{},{},{}", change.plate, change.status, change.after_entries)
}

/// Decode a status change line.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] if the line does not have the expected
/// shape.
pub fn decode_status_change(line: &str) -> Result<StatusChange> {
    let parts = split(line);
    if parts.len() != 3 {
        return Err(field_count("status change", 3, parts.len()));
    }
    Ok(StatusChange {
        plate: Plate::parse(parts[0]).map_err(|e| as_malformed(e.into()))?,
        status: VehicleStatus::from_str(parts[1]).map_err(as_malformed)?,
        after_entries: parse_field(parts[2], "entry count")?,
    })
}

fn split(line: &str) -> Vec<&str> {
    line.trim_end_matches('\r').split(DELIMITER).collect()
}

fn parse_field<T: FromStr>(raw: &str, name: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::malformed(format!("invalid {name} '{raw}'")))
}

fn expect_len(what: &str, parts: &[&str], expected: usize) -> Result<()> {
    if parts.len() == expected {
        Ok(())
    } else {
        Err(field_count(what, expected, parts.len()))
    }
}

fn field_count(what: &str, expected: usize, found: usize) -> Error {
    Error::malformed(format!(
        "{what} line needs {expected} fields, found {found}"
    ))
}

fn as_malformed(err: Error) -> Error {
    match err {
        Error::MalformedRecord(_) => err,
        other => Error::malformed(other.to_string()),
    }
}
