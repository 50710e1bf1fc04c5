use super::ui;
use crate::core::convert::code_from_label;
use crate::core::provider::RateProvider;
use crate::core::session::{ConverterSession, FetchRequest};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use console::Term;
use tracing::debug;

const HELP: &str = "\
Commands:
  date <YYYY-MM-DD>    select the rate date
  from <CODE|label>    select the source currency
  to <CODE|label>      select the target currency
  amount <NUMBER>      set the amount to convert
  list                 list available currencies
  help                 show this help
  quit                 exit";

/// Accepts either a bare char code or a full picker label.
fn resolve_code(input: &str) -> String {
    code_from_label(input).unwrap_or(input).trim().to_uppercase()
}

async fn fetch_into(
    provider: &dyn RateProvider,
    session: &mut ConverterSession,
    request: FetchRequest,
) {
    let pb = ui::new_spinner("Fetching rates...");
    let fetched = provider.fetch(request.date).await;
    pb.finish_and_clear();

    match fetched {
        Ok(snapshot) => {
            if !session.apply_snapshot(request.generation, snapshot) {
                debug!("Snapshot for {} arrived after a newer selection", request.date);
            }
        }
        Err(e) => println!(
            "{}",
            ui::style_text(&format!("Rates unavailable: {e}"), ui::StyleType::Error)
        ),
    }
}

fn print_state(term: &Term, session: &ConverterSession) -> Result<()> {
    let date = session
        .selected_date()
        .map_or_else(|| "-".to_string(), |d| d.to_string());
    let from = session.from_code().unwrap_or("-");
    let to = session.to_code().unwrap_or("-");

    match session.converted() {
        Some(converted) => term.write_line(&format!(
            "[{date}] {:.2} {from} = {} {to}",
            session.input_amount(),
            ui::style_text(&format!("{converted:.2}"), ui::StyleType::ResultValue)
        ))?,
        None => term.write_line(&format!(
            "[{date}] {}",
            ui::style_text("no conversion available", ui::StyleType::Subtle)
        ))?,
    }
    Ok(())
}

pub async fn run(provider: &dyn RateProvider) -> Result<()> {
    let term = Term::stdout();
    let mut session = ConverterSession::new();

    if let Some(request) = session.select_date(Local::now().date_naive()) {
        fetch_into(provider, &mut session, request).await;
    }
    term.write_line(HELP)?;
    print_state(&term, &session)?;

    loop {
        term.write_str("> ")?;
        let line = term.read_line()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => break,
            "help" => term.write_line(HELP)?,
            "list" => {
                if let Some(snapshot) = session.snapshot() {
                    for code in snapshot.codes() {
                        if let Some(entry) = snapshot.get(code) {
                            term.write_line(&entry.display_label())?;
                        }
                    }
                } else {
                    term.write_line("No rates loaded")?;
                }
            }
            "date" => match argument.parse::<NaiveDate>() {
                Ok(date) => {
                    if let Some(request) = session.select_date(date) {
                        fetch_into(provider, &mut session, request).await;
                    }
                    print_state(&term, &session)?;
                }
                Err(_) => term.write_line(&ui::style_text(
                    "Expected a date like 2024-03-07",
                    ui::StyleType::Error,
                ))?,
            },
            "from" => {
                session.select_from(&resolve_code(argument));
                print_state(&term, &session)?;
            }
            "to" => {
                session.select_to(&resolve_code(argument));
                print_state(&term, &session)?;
            }
            "amount" => match argument.parse::<f64>() {
                Ok(amount) if amount.is_finite() => {
                    session.set_amount(amount);
                    print_state(&term, &session)?;
                }
                _ => term.write_line(&ui::style_text(
                    "Expected a finite number",
                    ui::StyleType::Error,
                ))?,
            },
            _ => term.write_line(&ui::style_text(
                &format!("Unknown command: {command} (try 'help')"),
                ui::StyleType::Error,
            ))?,
        }
    }

    Ok(())
}
