use crate::metrics::Metric;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;

/// Formats an optional value, or returns "—" if None.
pub fn fmt_opt<T: Display>(v: Option<T>) -> String {
    v.map_or_else(|| "—".to_owned(), |x| x.to_string())
}

/// `$1,234.50` style, rounded half away from zero.
pub fn fmt_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac_part}")
}

pub fn fmt_money_metric(metric: Metric) -> String {
    metric.value().map_or_else(|| "N/A".to_owned(), fmt_money)
}

/// `12.35%`, or `N/A`.
pub fn fmt_percent(metric: Metric) -> String {
    match metric {
        Metric::Defined(_) => format!("{metric}%"),
        Metric::Undefined => metric.to_string(),
    }
}
