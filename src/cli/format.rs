//! Currency rendering: fixed symbol prefix, thousands grouping, two decimals.

pub const CURRENCY_SYMBOL: &str = "₦";

/// Formats an amount as `₦1,234.50`. Negative values (derived balances)
/// carry a leading minus sign before the symbol.
pub fn format_amount(value: f64) -> String {
    let grouped = group_thousands(value.abs());
    if value < 0.0 {
        format!("-{CURRENCY_SYMBOL}{grouped}")
    } else {
        format!("{CURRENCY_SYMBOL}{grouped}")
    }
}

fn group_thousands(value: f64) -> String {
    let raw = format!("{:.2}", value);
    let (whole, frac) = match raw.split_once('.') {
        Some(parts) => parts,
        None => (raw.as_str(), "00"),
    };
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(frac);
    grouped
}
