//! Currency conversion against the Bank of Russia daily rate feed.

pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

pub enum AppCommand {
    Rates {
        date: NaiveDate,
    },
    Convert {
        date: NaiveDate,
        from: String,
        to: String,
        amount: f64,
    },
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("kurs starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = providers::cbr::CbrProvider::new(config.base_url(), config.max_lookback_days);

    match command {
        AppCommand::Rates { date } => cli::rates::run(&provider, date).await,
        AppCommand::Convert {
            date,
            from,
            to,
            amount,
        } => cli::convert::run(&provider, date, &from, &to, amount).await,
        AppCommand::Interactive => cli::interactive::run(&provider).await,
    }
}
