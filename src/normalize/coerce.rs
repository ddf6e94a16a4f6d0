//! Cell-level type coercion: currency, percentages, yes/no flags, dates.

use crate::workbook::{Cell, excel_serial_to_date};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr as _;

/// Largest amount, rate or hour count a cell may hold. Products and sums of
/// values below it stay well inside `Decimal` range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Why a cell could not be read as a non-negative amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmountIssue {
    Missing,
    NotNumeric,
    Negative,
    TooLarge,
}

/// Reads a numeric cell or numeric-looking text as a decimal.
pub fn parse_decimal(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Decimal::try_from(*n).ok(),
        Cell::Text(s) => parse_decimal_text(s),
        Cell::Empty | Cell::Bool(_) | Cell::Date(_) | Cell::Error(_) => None,
    }
}

/// Accepts `1234.5`, `$1,234.50`, `-$12`, `(12.00)` for negatives and a
/// trailing `%`, which is dropped without rescaling.
pub fn parse_decimal_text(raw: &str) -> Option<Decimal> {
    let mut text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let mut negative = false;
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        negative = true;
        text = inner.trim();
    }
    if let Some(rest) = text.strip_prefix('-') {
        negative = !negative;
        text = rest.trim_start();
    }
    text = text.strip_prefix('$').unwrap_or(text);
    text = text.strip_suffix('%').unwrap_or(text);

    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    Some(if negative { -value } else { value })
}

/// Reads an amount that must be present, `>= 0` and at most [`MAX_AMOUNT`].
///
/// # Errors
///
/// Returns the [`AmountIssue`] describing why the cell was rejected.
pub fn non_negative_decimal(cell: &Cell) -> Result<Decimal, AmountIssue> {
    if cell.is_blank() {
        return Err(AmountIssue::Missing);
    }
    let value = parse_decimal(cell).ok_or(AmountIssue::NotNumeric)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountIssue::Negative);
    }
    if value > Decimal::from(MAX_AMOUNT) {
        return Err(AmountIssue::TooLarge);
    }
    Ok(value)
}

/// `yes`, `y` and `true` in any case, boolean true and the number 1 are true.
/// Everything else, blank included, is false.
pub fn parse_flag(cell: &Cell) -> bool {
    match cell {
        Cell::Bool(b) => *b,
        Cell::Number(n) => (*n - 1.0).abs() < f64::EPSILON,
        Cell::Text(s) => matches!(s.trim().to_lowercase().as_str(), "yes" | "y" | "true"),
        Cell::Empty | Cell::Date(_) | Cell::Error(_) => false,
    }
}

/// Date cells, Excel serial numbers, or `YYYY-MM-DD` / `MM/DD/YYYY` text.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Number(n) => excel_serial_to_date(*n),
        Cell::Text(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
                .ok()
        }
        Cell::Empty | Cell::Bool(_) | Cell::Error(_) => None,
    }
}

/// Non-blank trimmed text of any cell kind.
pub fn cell_text(cell: &Cell) -> Option<String> {
    if cell.is_blank() {
        return None;
    }
    let text = cell.display_text();
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_text() {
        assert_eq!(parse_decimal_text("$1,234.50"), Some(dec!(1234.50)));
        assert_eq!(parse_decimal_text("  42 "), Some(dec!(42)));
        assert_eq!(parse_decimal_text("-$12"), Some(dec!(-12)));
        assert_eq!(parse_decimal_text("(12.00)"), Some(dec!(-12.00)));
        assert_eq!(parse_decimal_text("15%"), Some(dec!(15)));
        assert_eq!(parse_decimal_text("1.5e3"), Some(dec!(1500)));
        assert_eq!(parse_decimal_text("abc"), None);
        assert_eq!(parse_decimal_text("$"), None);
        assert_eq!(parse_decimal_text(""), None);
    }

    #[test]
    fn test_numeric_cells() {
        assert_eq!(parse_decimal(&Cell::Number(15.5)), Some(dec!(15.5)));
        assert_eq!(parse_decimal(&Cell::Number(f64::NAN)), None);
        assert_eq!(parse_decimal(&Cell::Bool(true)), None);
    }

    #[test]
    fn test_non_negative_issues() {
        assert_eq!(non_negative_decimal(&Cell::Number(0.0)), Ok(dec!(0)));
        assert_eq!(non_negative_decimal(&Cell::from("  ")), Err(AmountIssue::Missing));
        assert_eq!(non_negative_decimal(&Cell::from("n/a")), Err(AmountIssue::NotNumeric));
        assert_eq!(non_negative_decimal(&Cell::Number(-1.0)), Err(AmountIssue::Negative));
        assert_eq!(
            non_negative_decimal(&Cell::Error("#DIV/0!".to_owned())),
            Err(AmountIssue::NotNumeric)
        );
    }

    #[test]
    fn test_amount_upper_bound() {
        assert_eq!(
            non_negative_decimal(&Cell::Number(1e12)),
            Ok(Decimal::from(MAX_AMOUNT))
        );
        assert_eq!(non_negative_decimal(&Cell::Number(1e20)), Err(AmountIssue::TooLarge));
        assert_eq!(non_negative_decimal(&Cell::from("2.5e13")), Err(AmountIssue::TooLarge));
    }

    #[test]
    fn test_flags() {
        for yes in ["Yes", "y", "TRUE", " yes "] {
            assert!(parse_flag(&Cell::from(yes)), "{yes} should be true");
        }
        for no in ["No", "n", "maybe", "", "Vegan"] {
            assert!(!parse_flag(&Cell::from(no)), "{no} should be false");
        }
        assert!(parse_flag(&Cell::Bool(true)));
        assert!(parse_flag(&Cell::Number(1.0)));
        assert!(!parse_flag(&Cell::Number(0.0)));
    }

    #[test]
    fn test_dates() {
        let expected = NaiveDate::from_ymd_opt(2022, 3, 14);
        assert_eq!(parse_date(&Cell::from("2022-03-14")), expected);
        assert_eq!(parse_date(&Cell::from("03/14/2022")), expected);
        assert_eq!(parse_date(&Cell::Number(44634.0)), expected);
        assert_eq!(parse_date(&Cell::from("soon")), None);
        assert_eq!(parse_date(&Cell::Empty), None);
    }
}
