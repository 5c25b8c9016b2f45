//! `fleetctl` - CLI for fleetledger
//!
//! This binary registers vehicles and customers and records rentals and
//! returns against the configured data directory.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;

use fleetledger::cli::{
    Cli, Command, ConfigCommand, CustomerCommand, HistoryCommand, KindArg, OutputFormat,
    RentCommand, ReturnCommand, VehicleAddArgs, VehicleCommand,
};
use fleetledger::fields::{parse_amount, parse_customer_id, parse_date, parse_year};
use fleetledger::{
    init_logging, Config, Customer, EntryKind, Ledger, LedgerEntry, Plate, Vehicle, VehicleKind,
    VehicleStatus,
};

/// Outcome of a command: `false` when the ledger refused the request.
type Outcome = anyhow::Result<bool>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Outcome {
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    let open = || Ledger::from_config(&config).context("failed to open the ledger");

    match cli.command {
        Command::Vehicle(VehicleCommand::Add(args)) => {
            handle_vehicle_add(&mut open()?, &config, &args)
        }
        Command::Vehicle(VehicleCommand::List { status, format }) => {
            print_vehicles(&open()?.vehicles(status.map(Into::into)), format)?;
            Ok(true)
        }
        Command::Vehicle(VehicleCommand::Status { plate, status }) => {
            handle_set_status(&mut open()?, &plate, status.into())
        }
        Command::Customer(CustomerCommand::Add { id, name }) => {
            handle_customer_add(&mut open()?, &id, &name)
        }
        Command::Customer(CustomerCommand::List { format }) => {
            print_customers(open()?.customers(), format)?;
            Ok(true)
        }
        Command::Rent(cmd) => handle_rent(&mut open()?, &cmd),
        Command::Return(cmd) => handle_return(&mut open()?, &cmd),
        Command::History(cmd) => handle_history(&open()?, &cmd),
        Command::Stats(cmd) => handle_stats(&open()?, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_vehicle_add(ledger: &mut Ledger, config: &Config, args: &VehicleAddArgs) -> Outcome {
    let plate = Plate::parse(&args.plate)?;
    let year = parse_year(&args.year)?;
    let kind = match args.kind {
        KindArg::Car => VehicleKind::Car {
            seats: args.seats.unwrap_or(config.rental.default_seats),
        },
        KindArg::Minibus => VehicleKind::Minibus {
            accessible: args.accessible,
        },
        KindArg::Pickup => VehicleKind::PickupTruck {
            cargo_capacity: args.cargo.unwrap_or(config.rental.default_cargo_capacity),
            has_trailer: args.trailer,
        },
    };

    let vehicle = Vehicle::new(&args.make, &args.model, year, kind)?.with_plate(plate.as_str())?;
    if ledger.add_vehicle(vehicle)? {
        println!("Added vehicle {plate}");
        Ok(true)
    } else {
        eprintln!("A vehicle with plate {plate} is already registered");
        Ok(false)
    }
}

fn handle_set_status(ledger: &mut Ledger, plate: &str, status: VehicleStatus) -> Outcome {
    let plate = Plate::parse(plate)?;
    if ledger.set_status(&plate, status)? {
        println!("Vehicle {plate} is now {status}");
        return Ok(true);
    }

    match ledger.find_vehicle_by_plate(plate.as_str()) {
        None => eprintln!("No vehicle with plate {plate}"),
        Some(_) => eprintln!("Vehicle {plate} is rented; return it before changing its status"),
    }
    Ok(false)
}

fn handle_customer_add(ledger: &mut Ledger, id: &str, name: &str) -> Outcome {
    let customer = Customer::new(parse_customer_id(id)?, name)?;
    let id = customer.id();
    if ledger.add_customer(customer)? {
        println!("Added customer #{id}");
        Ok(true)
    } else {
        eprintln!("A customer with id {id} is already registered");
        Ok(false)
    }
}

fn handle_rent(ledger: &mut Ledger, cmd: &RentCommand) -> Outcome {
    let plate = Plate::parse(&cmd.plate)?;
    let customer_id = parse_customer_id(&cmd.customer_id)?;
    let amount = parse_amount("amount", &cmd.amount)?;
    let date = resolve_date(cmd.date.as_deref())?;

    if ledger.rent_vehicle(&plate, customer_id, date, amount)? {
        println!("Rented {plate} to customer #{customer_id} for {amount}");
        return Ok(true);
    }
    explain_rejection(ledger, EntryKind::Rent, &plate, customer_id);
    Ok(false)
}

fn handle_return(ledger: &mut Ledger, cmd: &ReturnCommand) -> Outcome {
    let plate = Plate::parse(&cmd.plate)?;
    let customer_id = parse_customer_id(&cmd.customer_id)?;
    let fees = parse_amount("extra fees", cmd.fees.as_deref().unwrap_or_default())?;
    let date = resolve_date(cmd.date.as_deref())?;

    if ledger.return_vehicle(&plate, customer_id, date, fees)? {
        println!("Returned {plate} from customer #{customer_id} with fees {fees}");
        return Ok(true);
    }
    explain_rejection(ledger, EntryKind::Return, &plate, customer_id);
    Ok(false)
}

fn explain_rejection(ledger: &Ledger, kind: EntryKind, plate: &Plate, customer_id: u32) {
    let Some(vehicle) = ledger.find_vehicle_by_plate(plate.as_str()) else {
        eprintln!("No vehicle with plate {plate}");
        return;
    };
    if ledger.find_customer_by_id(customer_id).is_none() {
        eprintln!("No customer with id {customer_id}");
        return;
    }
    eprintln!(
        "Cannot {} {plate}: vehicle is {}, expected {}",
        kind.as_str().to_lowercase(),
        vehicle.status(),
        kind.required_status()
    );
}

fn handle_history(ledger: &Ledger, cmd: &HistoryCommand) -> Outcome {
    let entries: Vec<&LedgerEntry> = if let Some(plate) = &cmd.plate {
        ledger.entries_for_vehicle(&Plate::parse(plate)?)
    } else if let Some(id) = &cmd.customer {
        ledger.entries_for_customer(parse_customer_id(id)?)
    } else {
        ledger.entries().iter().collect()
    };

    print_entries(&entries, cmd.format)?;
    Ok(true)
}

fn handle_stats(ledger: &Ledger, json: bool) -> Outcome {
    let stats = ledger.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(true);
    }

    println!("Fleet");
    println!("=====");
    println!("  Vehicles:           {}", stats.vehicles);
    for status in VehicleStatus::ALL {
        println!("  {:<20}{}", format!("{status}:"), stats.count(status));
    }
    println!();
    println!("Activity");
    println!("========");
    println!("  Customers:          {}", stats.customers);
    println!("  Rentals:            {}", stats.rentals);
    println!("  Returns:            {}", stats.returns);
    println!("  Revenue:            {}", stats.revenue);
    Ok(true)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Outcome {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Vehicles file:      {}", config.storage.vehicles_file);
                println!("  Customers file:     {}", config.storage.customers_file);
                println!("  Entries file:       {}", config.storage.entries_file);
                println!("  Status file:        {}", config.storage.status_file);
                println!();
                println!("[Rental]");
                println!("  Default seats:      {}", config.rental.default_seats);
                println!(
                    "  Default cargo:      {}",
                    config.rental.default_cargo_capacity
                );
            }
            Ok(true)
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
            Ok(true)
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => {
                    println!("Configuration is valid.");
                    Ok(true)
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(false)
                }
            }
        }
    }
}

fn resolve_date(input: Option<&str>) -> fleetledger::Result<NaiveDate> {
    input.map_or_else(|| Ok(Local::now().date_naive()), parse_date)
}

fn plate_text(vehicle: &Vehicle) -> &str {
    vehicle.plate().map_or("-", Plate::as_str)
}

fn print_vehicles(vehicles: &[&Vehicle], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(vehicles)?),
        OutputFormat::Plain => {
            for v in vehicles {
                println!(
                    "{} {} {} {} {} ({}) {}",
                    plate_text(v),
                    v.make(),
                    v.model(),
                    v.year(),
                    v.kind().label(),
                    v.kind().details(),
                    v.status()
                );
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<8} {:<14} {:<14} {:<6} {:<13} {:<20} {}",
                "PLATE", "MAKE", "MODEL", "YEAR", "KIND", "DETAILS", "STATUS"
            );
            for v in vehicles {
                println!(
                    "{:<8} {:<14} {:<14} {:<6} {:<13} {:<20} {}",
                    plate_text(v),
                    v.make(),
                    v.model(),
                    v.year(),
                    v.kind().label(),
                    v.kind().details(),
                    v.status()
                );
            }
        }
    }
    Ok(())
}

fn print_customers(customers: &[Customer], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(customers)?),
        OutputFormat::Plain => customers.iter().for_each(|c| println!("{c}")),
        OutputFormat::Table => {
            println!("{:<10} NAME", "ID");
            for c in customers {
                println!("{:<10} {}", c.id(), c.name());
            }
        }
    }
    Ok(())
}

fn print_entries(entries: &[&LedgerEntry], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entries)?),
        OutputFormat::Plain => {
            for e in entries {
                println!(
                    "{} {} {} customer #{} {}",
                    e.date, e.kind, e.plate, e.customer_id, e.amount
                );
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<10} {:<6} {:<8} {:>10} {:>12}",
                "DATE", "KIND", "PLATE", "CUSTOMER", "AMOUNT"
            );
            for e in entries {
                println!(
                    "{:<10} {:<6} {:<8} {:>10} {:>12}",
                    e.date.to_string(),
                    e.kind.as_str(),
                    e.plate.as_str(),
                    e.customer_id,
                    e.amount.to_string()
                );
            }
        }
    }
    Ok(())
}
