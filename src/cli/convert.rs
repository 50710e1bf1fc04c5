use super::ui;
use crate::core::convert::convert;
use crate::core::provider::RateProvider;
use anyhow::Result;
use chrono::NaiveDate;

pub async fn run(
    provider: &dyn RateProvider,
    date: NaiveDate,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching rates...");
    let fetched = provider.fetch(date).await;
    pb.finish_and_clear();
    let snapshot = fetched?;

    let effective = snapshot.effective_date();
    let from_code = from.to_uppercase();
    let to_code = to.to_uppercase();

    // Lookup misses are reported here, at the presentation boundary; the
    // conversion itself treats a missing entry as "nothing to convert".
    for code in [&from_code, &to_code] {
        if snapshot.get(code).is_none() {
            anyhow::bail!("No rate for {code} on {effective}");
        }
    }

    let converted = convert(snapshot.get(&from_code), snapshot.get(&to_code), amount);

    if effective != date {
        println!(
            "{}",
            ui::style_text(
                &format!("No rates published for {date}; using {effective}"),
                ui::StyleType::Subtle
            )
        );
    }
    println!(
        "{amount:.2} {from_code} = {} {to_code}",
        ui::style_text(&format!("{converted:.2}"), ui::StyleType::ResultValue)
    );
    Ok(())
}
