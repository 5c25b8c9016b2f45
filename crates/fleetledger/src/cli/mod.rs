//! Command-line interface for fleetledger.
//!
//! This module provides the CLI structure for the `fleetctl` binary. Handlers
//! live in the binary; everything here is argument parsing.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, CustomerCommand, HistoryCommand, KindArg, ListStatusArg, OutputFormat,
    RentCommand, ReturnCommand, StatsCommand, StatusArg, VehicleAddArgs, VehicleCommand,
};

use crate::logging::Verbosity;

/// fleetctl - Keep track of a rental fleet
///
/// Registers vehicles and customers and records rentals and returns in
/// append-only files.
#[derive(Debug, Parser)]
#[command(name = "fleetctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register and inspect vehicles
    #[command(subcommand)]
    Vehicle(VehicleCommand),

    /// Register and inspect customers
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Rent out an available vehicle
    Rent(RentCommand),

    /// Take back a rented vehicle
    Return(ReturnCommand),

    /// Show rent and return entries
    History(HistoryCommand),

    /// Show fleet and revenue totals
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "fleetctl");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["fleetctl", "stats"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["fleetctl", "-q", "stats"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["fleetctl", "-v", "stats"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["fleetctl", "-vv", "stats"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(
            parse(&["fleetctl", "-q", "-v", "stats"]).verbosity(),
            Verbosity::Quiet
        );
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["fleetctl", "stats", "-c", "/custom/config.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_vehicle_add() {
        let cli = parse(&[
            "fleetctl", "vehicle", "add", "--kind", "pickup", "--plate", "TRK001", "--make",
            "ford", "--model", "ranger", "--year", "2019", "--cargo", "750", "--trailer",
        ]);
        let Command::Vehicle(VehicleCommand::Add(args)) = cli.command else {
            panic!("expected vehicle add");
        };
        assert_eq!(args.kind, KindArg::Pickup);
        assert_eq!(args.plate, "TRK001");
        assert_eq!(args.year, "2019");
        assert_eq!(args.cargo, Some(750.0));
        assert!(args.trailer);
        assert!(args.seats.is_none());
    }

    #[test]
    fn test_parse_vehicle_status() {
        let cli = parse(&["fleetctl", "vehicle", "status", "ABC123", "under-maintenance"]);
        assert!(matches!(
            cli.command,
            Command::Vehicle(VehicleCommand::Status {
                status: StatusArg::UnderMaintenance,
                ..
            })
        ));
    }

    #[test]
    fn test_rented_is_not_an_assignable_status() {
        let result = Cli::try_parse_from(["fleetctl", "vehicle", "status", "ABC123", "rented"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rent() {
        let cli = parse(&["fleetctl", "rent", "ABC123", "100", "50.00", "--date", "2024-06-01"]);
        let Command::Rent(rent) = cli.command else {
            panic!("expected rent");
        };
        assert_eq!(rent.plate, "ABC123");
        assert_eq!(rent.customer_id, "100");
        assert_eq!(rent.amount, "50.00");
        assert_eq!(rent.date.as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn test_parse_return_without_fees() {
        let cli = parse(&["fleetctl", "return", "ABC123", "100"]);
        let Command::Return(ret) = cli.command else {
            panic!("expected return");
        };
        assert!(ret.fees.is_none());
        assert!(ret.date.is_none());
    }

    #[test]
    fn test_history_filters_conflict() {
        let result =
            Cli::try_parse_from(["fleetctl", "history", "--plate", "ABC123", "--customer", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_customer_add() {
        let cli = parse(&["fleetctl", "customer", "add", "100", "Test Customer"]);
        assert!(matches!(
            cli.command,
            Command::Customer(CustomerCommand::Add { .. })
        ));
    }
}
