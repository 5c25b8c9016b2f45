//! Vehicle records.
//!
//! A vehicle's status is only ever changed by the [`Ledger`](crate::Ledger);
//! callers can read it but not assign it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fields::{capitalize, check_year, clean_text};
use crate::plate::{Plate, PlateError};

/// Lifecycle state of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// Ready to be rented.
    #[default]
    Available,
    /// Reserved; not rentable until reset.
    Held,
    /// Out with a customer.
    Rented,
    /// In the workshop.
    UnderMaintenance,
    /// Retired or otherwise unusable.
    OutOfService,
}

impl VehicleStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Available,
        Self::Held,
        Self::Rented,
        Self::UnderMaintenance,
        Self::OutOfService,
    ];

    /// The status name as written to the vehicle store.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Held => "Held",
            Self::Rented => "Rented",
            Self::UnderMaintenance => "UnderMaintenance",
            Self::OutOfService => "OutOfService",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::invalid_field("status", format!("unknown status '{s}'")))
    }
}

/// Kind-specific attributes of a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VehicleKind {
    /// Passenger car.
    Car {
        /// Seating capacity.
        seats: u32,
    },
    /// Shuttle minibus.
    Minibus {
        /// Wheelchair accessible.
        accessible: bool,
    },
    /// Cargo pickup truck.
    PickupTruck {
        /// Cargo capacity.
        cargo_capacity: f64,
        /// Fitted with a trailer.
        has_trailer: bool,
    },
}

impl VehicleKind {
    /// Human-readable label for tables.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Car { .. } => "Car",
            Self::Minibus { .. } => "Minibus",
            Self::PickupTruck { .. } => "Pickup Truck",
        }
    }

    /// Short description of the kind-specific fields.
    #[must_use]
    pub fn details(&self) -> String {
        match self {
            Self::Car { seats } => format!("{seats} seats"),
            Self::Minibus { accessible: true } => "accessible".to_string(),
            Self::Minibus { accessible: false } => "not accessible".to_string(),
            Self::PickupTruck {
                cargo_capacity,
                has_trailer,
            } => {
                if *has_trailer {
                    format!("cargo {cargo_capacity}, trailer")
                } else {
                    format!("cargo {cargo_capacity}")
                }
            }
        }
    }
}

/// A rentable vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    plate: Option<Plate>,
    make: String,
    model: String,
    year: i32,
    status: VehicleStatus,
    #[serde(flatten)]
    kind: VehicleKind,
}

impl Vehicle {
    /// Create an available vehicle without a plate.
    ///
    /// Make and model are trimmed and capitalized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if make or model is empty or contains the
    /// store delimiter, or if the year is out of range.
    pub fn new(make: &str, model: &str, year: i32, kind: VehicleKind) -> Result<Self> {
        let make = capitalize(&clean_text("make", make)?);
        let model = capitalize(&clean_text("model", model)?);
        let year = check_year(year)?;
        if let VehicleKind::PickupTruck { cargo_capacity, .. } = kind {
            if !cargo_capacity.is_finite() || cargo_capacity < 0.0 {
                return Err(Error::invalid_field(
                    "cargo capacity",
                    "must be a non-negative number",
                ));
            }
        }

        Ok(Self {
            plate: None,
            make,
            model,
            year,
            status: VehicleStatus::Available,
            kind,
        })
    }

    /// Set the plate and return the vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlate`] if the plate is rejected.
    pub fn with_plate(mut self, plate: &str) -> Result<Self> {
        self.set_license_plate(Some(plate))?;
        Ok(self)
    }

    /// Validate and set the plate.
    ///
    /// On rejection the current plate is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns the [`PlateError`] describing why the input was rejected.
    pub fn set_license_plate(&mut self, input: Option<&str>) -> std::result::Result<(), PlateError> {
        let plate = Plate::parse_opt(input)?;
        self.plate = Some(plate);
        Ok(())
    }

    /// The plate, if one has been set.
    #[must_use]
    pub fn plate(&self) -> Option<&Plate> {
        self.plate.as_ref()
    }

    /// Manufacturer.
    #[must_use]
    pub fn make(&self) -> &str {
        &self.make
    }

    /// Model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Model year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    /// Kind-specific attributes.
    #[must_use]
    pub fn kind(&self) -> &VehicleKind {
        &self.kind
    }

    pub(crate) fn set_status(&mut self, status: VehicleStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car() -> Vehicle {
        Vehicle::new("toyota", "CAMRY", 2022, VehicleKind::Car { seats: 5 }).unwrap()
    }

    #[test]
    fn test_new_vehicle_defaults() {
        let vehicle = car();
        assert_eq!(vehicle.make(), "Toyota");
        assert_eq!(vehicle.model(), "Camry");
        assert_eq!(vehicle.year(), 2022);
        assert_eq!(vehicle.status(), VehicleStatus::Available);
        assert!(vehicle.plate().is_none());
    }

    #[test]
    fn test_new_rejects_bad_fields() {
        assert!(Vehicle::new("", "Camry", 2022, VehicleKind::Car { seats: 5 }).is_err());
        assert!(Vehicle::new("Toyota", "Cam,ry", 2022, VehicleKind::Car { seats: 5 }).is_err());
        assert!(Vehicle::new("Toyota", "Camry", 12, VehicleKind::Car { seats: 5 }).is_err());
        let truck = VehicleKind::PickupTruck {
            cargo_capacity: -1.0,
            has_trailer: false,
        };
        assert!(Vehicle::new("Ford", "Ranger", 2020, truck).is_err());
    }

    #[test]
    fn test_valid_plates_are_set() {
        for input in ["AAA100", "ABC567", "ZZZ999"] {
            let mut vehicle = car();
            vehicle.set_license_plate(Some(input)).unwrap();
            assert_eq!(vehicle.plate().map(Plate::as_str), Some(input));
        }
    }

    #[test]
    fn test_rejected_plates_leave_plate_unset() {
        let mut vehicle = Vehicle::new("Invalid", "Car", 2023, VehicleKind::Car { seats: 5 }).unwrap();

        assert!(vehicle.set_license_plate(Some("")).is_err());
        assert!(vehicle.set_license_plate(None).is_err());
        assert!(vehicle.set_license_plate(Some("AAA1000")).is_err());
        assert!(vehicle.set_license_plate(Some("ZZZ99")).is_err());

        assert!(vehicle.plate().is_none());
    }

    #[test]
    fn test_rejected_plate_keeps_previous_plate() {
        let mut vehicle = car().with_plate("abc123").unwrap();
        assert!(vehicle.set_license_plate(Some("ZZZ99")).is_err());
        assert_eq!(vehicle.plate().map(Plate::as_str), Some("ABC123"));
    }

    #[test]
    fn test_status_round_trips_through_name() {
        for status in VehicleStatus::ALL {
            assert_eq!(status.to_string().parse::<VehicleStatus>().unwrap(), status);
        }
        assert!("Lost".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(VehicleKind::Car { seats: 4 }.label(), "Car");
        assert_eq!(VehicleKind::Minibus { accessible: true }.label(), "Minibus");
        assert_eq!(
            VehicleKind::PickupTruck {
                cargo_capacity: 1000.0,
                has_trailer: true
            }
            .label(),
            "Pickup Truck"
        );
    }

    #[test]
    fn test_kind_details() {
        assert_eq!(VehicleKind::Car { seats: 7 }.details(), "7 seats");
        assert_eq!(
            VehicleKind::Minibus { accessible: false }.details(),
            "not accessible"
        );
        let truck = VehicleKind::PickupTruck {
            cargo_capacity: 1500.0,
            has_trailer: true,
        };
        assert_eq!(truck.details(), "cargo 1500, trailer");
    }

    #[test]
    fn test_vehicle_serializes_kind_inline() {
        let vehicle = car().with_plate("ABC123").unwrap();
        let json = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(json["plate"], "ABC123");
        assert_eq!(json["kind"], "car");
        assert_eq!(json["seats"], 5);
        assert_eq!(json["status"], "Available");
    }
}
