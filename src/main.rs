// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use vehicle_ledger::config::DEFAULT_CONFIG_PATH;
use vehicle_ledger::{
    import_cars, load_chassis_numbers, load_config, logging, Car, ChaincodeHost, MemoryLedger,
    Response, SqliteLedger, VlmConfig,
};

#[derive(Parser)]
#[command(
    name = "vlm",
    version,
    about = "Vehicle lifecycle ledger: create, transfer, register and scrap cars"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Ledger database, overrides `database_path` from the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Invoke a contract function, e.g. `invoke transferCar 1000 Rahul`.
    Invoke {
        function: String,
        args: Vec<String>,
    },
    /// Print the current record of a car.
    Get { chassis: String },
    /// Print every version a car has had, oldest first.
    History { chassis: String },
    /// Print all cars.
    List,
    /// Create cars from a CSV file with a `chassis_number` column.
    Import { csv: PathBuf },
    /// Run the reference lifecycle against an in-memory ledger.
    Demo,
    /// Browse the ledger in the terminal.
    Ui,
}

fn main() {
    logging::init();

    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    debug!(database = %config.database_path.display(), "config loaded");

    match cli.command {
        Command::Invoke { function, args } => {
            let mut host = open_host(&config)?;
            let mut invocation = vec![function];
            invocation.extend(args);
            print_payload(host.invoke(&invocation))
        }
        Command::Get { chassis } => {
            let mut host = open_host(&config)?;
            print_payload(host.invoke(&["getCar", chassis.as_str()]))
        }
        Command::History { chassis } => {
            let mut host = open_host(&config)?;
            print_payload(host.invoke(&["getCarHistory", chassis.as_str()]))
        }
        Command::List => {
            let mut host = open_host(&config)?;
            print_payload(host.invoke(&["listCars"]))
        }
        Command::Import { csv } => run_import(&config, &csv),
        Command::Demo => run_demo(&config),
        Command::Ui => run_ui_mode(&config),
    }
}

fn open_host(config: &VlmConfig) -> Result<ChaincodeHost<SqliteLedger>> {
    let ledger = SqliteLedger::open(&config.database_path)?;
    Ok(ChaincodeHost::new(ledger, config.lifecycle.clone()).with_actor(config.actor.clone()))
}

fn print_payload(response: Response) -> Result<()> {
    if !response.is_ok() {
        return Err(anyhow!("{} (status {})", response.message, response.status));
    }
    let json = response.payload_json().context("payload is not JSON")?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn run_import(config: &VlmConfig, csv: &std::path::Path) -> Result<()> {
    println!("📂 Loading {}...", csv.display());
    let chassis_numbers = load_chassis_numbers(csv)?;
    println!("✓ Read {} chassis numbers", chassis_numbers.len());

    let mut host = open_host(config)?;
    let summary = import_cars(&mut host, &chassis_numbers)?;

    println!("✓ Created: {} cars", summary.inserted);
    println!("✓ Skipped existing: {}", summary.duplicates);
    Ok(())
}

/// The lifecycle every car in the reference fleet goes through.
fn run_demo(config: &VlmConfig) -> Result<()> {
    let mut host = ChaincodeHost::new(MemoryLedger::new(), config.lifecycle.clone())
        .with_actor(config.actor.clone());

    let steps: [&[&str]; 6] = [
        &["createCar", "1000"],
        &["transferCar", "1000", "Rahul"],
        &["sellnRegisterCar", "1000", "Vaibhav", "TS071", "31DEC2025"],
        &["scrapCar", "1000"],
        &["sellnRegisterCar", "1000", "Jyothi", "TS071", "31DEC2025"],
        &["getCar", "1000"],
    ];

    for step in steps {
        println!("▶ {}", step.join(" "));
        let response = host.mock_invoke("001", step);
        if !response.is_ok() {
            return Err(anyhow!("{} failed: {}", step[0], response.message));
        }
        let car = Car::from_bytes(&response.payload).context("payload is not a car")?;
        println!("  Car -> {}", car);
    }

    let history = host.history("1000")?;
    println!("\n⏳ {} versions of 1000:", history.version_count());
    for version in &history.versions {
        println!(
            "  v{} {} {} ({})",
            version.version,
            version.value.owner,
            version.value.status,
            &version.tx_id[..12]
        );
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &VlmConfig) -> Result<()> {
    if !config.database_path.exists() {
        return Err(anyhow!(
            "ledger not found at {} (run `vlm import` or `vlm invoke createCar ...` first)",
            config.database_path.display()
        ));
    }

    let mut host = open_host(config)?;
    let cars = host.cars()?;
    let mut histories = Vec::with_capacity(cars.len());
    for car in &cars {
        histories.push(host.history(&car.chassis_number)?);
    }

    let mut app = ui::App::new(cars, histories);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &VlmConfig) -> Result<()> {
    Err(anyhow!(
        "TUI mode not available, rebuild with: cargo build --features tui"
    ))
}
