//! Rate snapshot model for the CBR daily JSON feed.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;

/// Char code of the currency the feed quotes everything in. The feed never
/// lists it; providers inject a synthetic unit entry after parsing.
pub const BASE_CODE: &str = "RUB";

/// Display name used for the synthetic base entry.
pub const BASE_NAME: &str = "Российский рубль";

/// One currency's published rate: `value` roubles per `nominal` units.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyEntry {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "NumCode", default)]
    pub num_code: String,
    #[serde(rename = "CharCode")]
    pub code: String,
    #[serde(rename = "Nominal")]
    pub nominal: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: f64,
    #[serde(rename = "Previous", default)]
    pub previous: f64,
}

impl CurrencyEntry {
    /// Roubles per one unit of this currency.
    pub fn unit_rate(&self) -> f64 {
        self.value / f64::from(self.nominal)
    }

    /// Picker label, `"<Name>, (<CODE>)"`.
    pub fn display_label(&self) -> String {
        format!("{}, ({})", self.name, self.code)
    }
}

/// The full set of rates published for one effective date.
///
/// Built fresh on every fetch and immutable afterwards. Entries belong to
/// the snapshot that parsed them; they are never shared across snapshots.
#[derive(Debug, Clone, Deserialize)]
pub struct RateSnapshot {
    #[serde(rename = "Date")]
    pub date: DateTime<FixedOffset>,
    #[serde(rename = "PreviousDate")]
    pub previous_date: DateTime<FixedOffset>,
    #[serde(rename = "PreviousURL", default)]
    pub previous_url: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<FixedOffset>,
    #[serde(rename = "Valute")]
    pub currencies: HashMap<String, CurrencyEntry>,
}

impl RateSnapshot {
    /// Calendar date the rates were published for. May be earlier than the
    /// date a caller requested when the archive had a gap.
    pub fn effective_date(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyEntry> {
        self.currencies.get(code)
    }

    /// Char codes in sorted order, for stable listings.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.currencies.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}
