use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand};
use kurs::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for kurs::AppCommand {
    fn from(cmd: Commands) -> kurs::AppCommand {
        let today = Local::now().date_naive();
        match cmd {
            Commands::Rates { date } => kurs::AppCommand::Rates {
                date: date.unwrap_or(today),
            },
            Commands::Convert {
                amount,
                from,
                to,
                date,
            } => kurs::AppCommand::Convert {
                date: date.unwrap_or(today),
                from,
                to,
                amount,
            },
            Commands::Interactive => kurs::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the rate table for a date
    Rates {
        /// Rate date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: f64,
        /// Source currency char code, e.g. USD
        from: String,
        /// Target currency char code, e.g. EUR
        to: String,
        /// Rate date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Run the interactive converter
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => kurs::cli::setup::setup(),
        Some(cmd) => kurs::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
