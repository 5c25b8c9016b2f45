//! CLI command definitions.
//!
//! Numeric and date arguments are taken as text and parsed by the binary with
//! the helpers in [`crate::fields`], so every command reports bad input the
//! same way.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::vehicle::VehicleStatus;

/// Vehicle commands.
#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// Register a new vehicle
    Add(VehicleAddArgs),

    /// List vehicles
    List {
        /// Only show vehicles in this status
        #[arg(short, long, value_enum)]
        status: Option<ListStatusArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Assign an administrative status
    Status {
        /// License plate
        plate: String,

        /// New status
        #[arg(value_enum)]
        status: StatusArg,
    },
}

/// Arguments for `vehicle add`.
#[derive(Debug, Args)]
pub struct VehicleAddArgs {
    /// Kind of vehicle
    #[arg(short, long, value_enum, default_value = "car")]
    pub kind: KindArg,

    /// License plate (three letters then three digits)
    #[arg(short, long)]
    pub plate: String,

    /// Manufacturer
    #[arg(long)]
    pub make: String,

    /// Model name
    #[arg(long)]
    pub model: String,

    /// Model year
    #[arg(short, long)]
    pub year: String,

    /// Seats (cars only; defaults to the configured value)
    #[arg(long)]
    pub seats: Option<u32>,

    /// Wheelchair accessible (minibuses only)
    #[arg(long)]
    pub accessible: bool,

    /// Cargo capacity (pickup trucks only; defaults to the configured value)
    #[arg(long)]
    pub cargo: Option<f64>,

    /// Has a trailer (pickup trucks only)
    #[arg(long)]
    pub trailer: bool,
}

/// Customer commands.
#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    /// Register a new customer
    Add {
        /// Customer id
        id: String,

        /// Customer name
        name: String,
    },

    /// List customers
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Rent command arguments.
#[derive(Debug, Args)]
pub struct RentCommand {
    /// License plate
    pub plate: String,

    /// Renting customer's id
    pub customer_id: String,

    /// Rental amount
    pub amount: String,

    /// Rental date as YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,
}

/// Return command arguments.
#[derive(Debug, Args)]
pub struct ReturnCommand {
    /// License plate
    pub plate: String,

    /// Returning customer's id
    pub customer_id: String,

    /// Extra fees charged on return (defaults to 0)
    pub fees: Option<String>,

    /// Return date as YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Only entries for this vehicle
    #[arg(short, long, conflicts_with = "customer")]
    pub plate: Option<String>,

    /// Only entries for this customer id
    #[arg(short = 'u', long)]
    pub customer: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Vehicle kind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Passenger car
    Car,
    /// Minibus
    Minibus,
    /// Pickup truck
    Pickup,
}

/// Status that can be assigned administratively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Ready to be rented
    Available,
    /// Reserved
    Held,
    /// In the workshop
    UnderMaintenance,
    /// Retired
    OutOfService,
}

impl From<StatusArg> for VehicleStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Available => Self::Available,
            StatusArg::Held => Self::Held,
            StatusArg::UnderMaintenance => Self::UnderMaintenance,
            StatusArg::OutOfService => Self::OutOfService,
        }
    }
}

/// Status filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListStatusArg {
    /// Ready to be rented
    Available,
    /// Reserved
    Held,
    /// Out with a customer
    Rented,
    /// In the workshop
    UnderMaintenance,
    /// Retired
    OutOfService,
}

impl From<ListStatusArg> for VehicleStatus {
    fn from(arg: ListStatusArg) -> Self {
        match arg {
            ListStatusArg::Available => Self::Available,
            ListStatusArg::Held => Self::Held,
            ListStatusArg::Rented => Self::Rented,
            ListStatusArg::UnderMaintenance => Self::UnderMaintenance,
            ListStatusArg::OutOfService => Self::OutOfService,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One record per line
    #[default]
    Plain,
    /// Aligned columns
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_arg_conversion() {
        assert_eq!(VehicleStatus::from(StatusArg::Available), VehicleStatus::Available);
        assert_eq!(VehicleStatus::from(StatusArg::Held), VehicleStatus::Held);
        assert_eq!(
            VehicleStatus::from(StatusArg::UnderMaintenance),
            VehicleStatus::UnderMaintenance
        );
        assert_eq!(
            VehicleStatus::from(StatusArg::OutOfService),
            VehicleStatus::OutOfService
        );
    }

    #[test]
    fn test_list_status_covers_every_status() {
        let converted: Vec<VehicleStatus> = ListStatusArg::value_variants()
            .iter()
            .map(|&arg| arg.into())
            .collect();
        assert_eq!(converted, VehicleStatus::ALL);
    }

    #[test]
    fn test_value_names() {
        let name = |arg: StatusArg| arg.to_possible_value().unwrap().get_name().to_string();
        assert_eq!(name(StatusArg::UnderMaintenance), "under-maintenance");
        assert_eq!(name(StatusArg::OutOfService), "out-of-service");
        assert_eq!(
            KindArg::Pickup.to_possible_value().unwrap().get_name(),
            "pickup"
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }
}
