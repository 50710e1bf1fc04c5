use super::ui;
use crate::core::provider::RateProvider;
use crate::core::snapshot::{CurrencyEntry, RateSnapshot};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

fn change_percent(entry: &CurrencyEntry) -> Option<f64> {
    if entry.previous > 0.0 {
        Some((entry.value - entry.previous) / entry.previous * 100.0)
    } else {
        None
    }
}

pub fn display_as_table(snapshot: &RateSnapshot) -> String {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Nominal"),
        ui::header_cell("Value (RUB)"),
        ui::header_cell("Change"),
    ]);

    let mut entries: Vec<&CurrencyEntry> = snapshot.currencies.values().collect();
    entries.sort_by(|a, b| a.code.cmp(&b.code));

    for entry in entries {
        let change = change_percent(entry).map_or_else(ui::na_cell, ui::change_cell);

        table.add_row(vec![
            Cell::new(&entry.code),
            Cell::new(&entry.name),
            ui::value_cell(&entry.nominal.to_string()),
            ui::value_cell(&format!("{:.4}", entry.value)),
            change,
        ]);
    }

    table.to_string()
}

pub async fn run(provider: &dyn RateProvider, date: NaiveDate) -> Result<()> {
    let pb = ui::new_spinner("Fetching rates...");
    let fetched = provider.fetch(date).await;
    pb.finish_and_clear();
    let snapshot = fetched?;

    let effective = snapshot.effective_date();
    println!(
        "Rates for {}",
        ui::style_text(&effective.to_string(), ui::StyleType::Title)
    );
    if effective != date {
        println!(
            "{}",
            ui::style_text(
                &format!("No rates published for {date}; showing the closest earlier date"),
                ui::StyleType::Subtle
            )
        );
    }
    println!("{}", display_as_table(&snapshot));
    Ok(())
}
