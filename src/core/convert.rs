//! Cross-rate conversion between two currencies of one snapshot.

use crate::core::snapshot::CurrencyEntry;

/// Converts `amount` units of `from` into `to` via their common rouble
/// rates.
///
/// Both entries must come from the same snapshot; mixing snapshots is a
/// caller error and is not validated here. A missing entry or a zero
/// amount means there is nothing to convert and yields 0.0 rather than an
/// error. The result is not rounded; display rounding belongs to the
/// presentation layer.
pub fn convert(from: Option<&CurrencyEntry>, to: Option<&CurrencyEntry>, amount: f64) -> f64 {
    let (Some(from), Some(to)) = (from, to) else {
        return 0.0;
    };
    if amount == 0.0 {
        return 0.0;
    }

    let cross_rate = from.unit_rate() / to.unit_rate();
    cross_rate * amount
}

/// Recovers the char code from a picker label of the form
/// `"<Name>, (<CODE>)"`.
///
/// The code is the substring between the last pair of parentheses, so
/// names that contain parentheses themselves still parse.
pub fn code_from_label(label: &str) -> Option<&str> {
    let open = label.rfind('(')?;
    let rest = &label[open + 1..];
    let close = rest.find(')')?;
    Some(&rest[..close])
}
