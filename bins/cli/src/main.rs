//! Gescom command-line front end.
//!
//! Loads tenant configuration, reads a JSON request, runs the engine and
//! prints the JSON result on stdout. Logs go to stderr.
//!
//! Usage:
//!   gescom totals invoice.json
//!   gescom payroll march.json
//!   gescom post events.json
//!   gescom words 1250.50

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gescom_core::TenantSettings;
use gescom_shared::{AppError, TenantConfig};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "gescom",
    version,
    about = "Document totals, payroll, ledger postings and amounts in words"
)]
struct Cli {
    /// Tenant configuration file, layered over config/default and config/{RUN_MODE}
    #[arg(long, short, global = true, env = "GESCOM_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute document totals from a JSON document
    Totals {
        /// JSON file with lines, discount and selected taxes
        file: PathBuf,
    },
    /// Compute payslips from a JSON payroll request
    Payroll {
        /// JSON file with one payslip input or a list of them
        file: PathBuf,
    },
    /// Build ledger entries from JSON business events
    Post {
        /// JSON file with one event or a list of events
        file: PathBuf,
    },
    /// Spell out an amount in words
    Words {
        /// Amount, e.g. 1250.50
        #[arg(allow_hyphen_values = true)]
        amount: Decimal,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gescom=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let code = err
                .downcast_ref::<AppError>()
                .map_or(1, AppError::exit_code);
            error!(error = %format!("{err:#}"), "Command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = TenantConfig::load(cli.config.as_deref())?;
    let settings = TenantSettings::from_config(&config).map_err(AppError::from)?;
    info!(currency = %settings.currency, "Tenant configuration loaded");

    let value = match &cli.command {
        Command::Totals { file } => commands::totals(&settings, &commands::read_json(file)?)?,
        Command::Payroll { file } => commands::payroll(&settings, &commands::read_json(file)?)?,
        Command::Post { file } => commands::post(&settings, &commands::read_json(file)?)?,
        Command::Words { amount } => commands::words(&settings, *amount),
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(output)
}
