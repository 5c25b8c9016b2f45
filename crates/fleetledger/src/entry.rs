//! Rental ledger entries.
//!
//! An entry is an immutable fact: a vehicle went out or came back. Entries
//! refer to their vehicle and customer by key; the ledger owns the records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::plate::Plate;
use crate::vehicle::VehicleStatus;

/// Whether an entry records a rental or a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    /// The vehicle was rented out.
    Rent,
    /// The vehicle was brought back.
    Return,
}

impl EntryKind {
    /// The kind as written to the entry store.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rent => "RENT",
            Self::Return => "RETURN",
        }
    }

    /// Status the vehicle must be in for this entry to be accepted.
    #[must_use]
    pub fn required_status(self) -> VehicleStatus {
        match self {
            Self::Rent => VehicleStatus::Available,
            Self::Return => VehicleStatus::Rented,
        }
    }

    /// Status the vehicle is in once this entry is accepted.
    #[must_use]
    pub fn resulting_status(self) -> VehicleStatus {
        match self {
            Self::Rent => VehicleStatus::Rented,
            Self::Return => VehicleStatus::Available,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RENT" => Ok(Self::Rent),
            "RETURN" => Ok(Self::Return),
            other => Err(Error::invalid_field(
                "entry kind",
                format!("unknown entry kind '{other}'"),
            )),
        }
    }
}

/// One recorded rent or return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Vehicle the entry is about.
    pub plate: Plate,
    /// Customer the entry is about.
    pub customer_id: u32,
    /// Calendar date of the event.
    pub date: NaiveDate,
    /// Rental amount for RENT, extra fees for RETURN.
    pub amount: Decimal,
    /// Rent or return.
    pub kind: EntryKind,
}

impl LedgerEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(
        plate: Plate,
        customer_id: u32,
        date: NaiveDate,
        amount: Decimal,
        kind: EntryKind,
    ) -> Self {
        Self {
            plate,
            customer_id,
            date,
            amount,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings() {
        assert_eq!(EntryKind::Rent.to_string(), "RENT");
        assert_eq!(EntryKind::Return.to_string(), "RETURN");
        assert_eq!("RENT".parse::<EntryKind>().unwrap(), EntryKind::Rent);
        assert_eq!("RETURN".parse::<EntryKind>().unwrap(), EntryKind::Return);
        assert!("rent".parse::<EntryKind>().is_err());
    }

    #[test]
    fn test_transitions() {
        assert_eq!(EntryKind::Rent.required_status(), VehicleStatus::Available);
        assert_eq!(EntryKind::Rent.resulting_status(), VehicleStatus::Rented);
        assert_eq!(EntryKind::Return.required_status(), VehicleStatus::Rented);
        assert_eq!(EntryKind::Return.resulting_status(), VehicleStatus::Available);
    }

    #[test]
    fn test_entry_serializes_kind_uppercase() {
        let entry = LedgerEntry::new(
            Plate::parse("ABC123").unwrap(),
            100,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            Decimal::new(500, 1),
            EntryKind::Rent,
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "RENT");
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["amount"], "50.0");
    }
}
