//! `Monthly Sales <YYYY>` sheets → [`MonthlySales`] records.
//!
//! The sheet holds per-item rows and several summary rows; only the row
//! labelled `Total Sales` is read. Its twelve following cells are the months.
//! A month-name header above that row, if there is one, decides which column
//! is which month.

use super::coerce::{AmountIssue, non_negative_decimal};
use crate::error::{ComandaError, Result};
use crate::model::{Month, MonthlySales};
use crate::workbook::{Cell, RawSheet};
use tracing::debug;

pub const TOTALS_LABEL: &str = "Total Sales";

/// Extracts the sheet's year from its name, e.g. `Monthly Sales 2024`.
///
/// # Errors
///
/// Returns [`ComandaError::AmbiguousYear`] if the name holds no 4-digit
/// number or more than one distinct one.
pub fn sheet_year(name: &str) -> Result<i32> {
    let mut years: Vec<i32> = Vec::new();
    let mut digits = String::new();

    for c in name.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.len() == 4
            && let Ok(year) = digits.parse::<i32>()
            && !years.contains(&year)
        {
            years.push(year);
        }
        digits.clear();
    }

    match years.as_slice() {
        [year] => Ok(*year),
        _ => Err(ComandaError::AmbiguousYear {
            sheet: name.to_owned(),
        }),
    }
}

/// Index of the first row whose first cell is the totals label.
fn locate_totals_row(sheet: &RawSheet) -> Result<usize> {
    sheet
        .rows
        .iter()
        .position(|row| row.first().and_then(Cell::as_text) == Some(TOTALS_LABEL))
        .ok_or_else(|| ComandaError::MissingTotalsRow {
            sheet: sheet.name.clone(),
        })
}

/// Month order of the twelve value columns. The nearest row above the totals
/// row whose matching cells name twelve distinct months wins; otherwise
/// January through December.
fn month_columns(sheet: &RawSheet, totals_row: usize) -> Vec<Month> {
    for row in sheet.rows.iter().take(totals_row).rev() {
        let Some(cells) = row.get(1..13) else {
            continue;
        };
        let months: Vec<Month> = cells
            .iter()
            .filter_map(|c| c.as_text().and_then(Month::from_name))
            .collect();

        let mut distinct = months.clone();
        distinct.sort();
        distinct.dedup();
        if months.len() == 12 && distinct.len() == 12 {
            debug!(sheet = %sheet.name, ?months, "Using month header row");
            return months;
        }
    }

    Month::ALL.to_vec()
}

/// Normalizes one sales sheet into twelve records in calendar order.
///
/// # Errors
///
/// Returns [`ComandaError::AmbiguousYear`], [`ComandaError::MissingTotalsRow`]
/// or [`ComandaError::InvalidSalesValue`] for the first offending month.
pub fn normalize_sales_sheet(sheet: &RawSheet) -> Result<Vec<MonthlySales>> {
    let year = sheet_year(&sheet.name)?;
    let row_idx = locate_totals_row(sheet)?;
    let totals = sheet.rows.get(row_idx).map(Vec::as_slice).unwrap_or_default();

    let mut records = Vec::with_capacity(12);
    for (offset, month) in month_columns(sheet, row_idx).into_iter().enumerate() {
        let cell = totals.get(1 + offset).unwrap_or(&Cell::Empty);
        let amount = non_negative_decimal(cell).map_err(|issue| {
            let value = match issue {
                AmountIssue::Missing => "<blank>".to_owned(),
                AmountIssue::NotNumeric | AmountIssue::Negative | AmountIssue::TooLarge => {
                    cell.display_text()
                }
            };
            ComandaError::InvalidSalesValue {
                sheet: sheet.name.clone(),
                month,
                value,
            }
        })?;
        records.push(MonthlySales {
            year,
            month,
            amount,
        });
    }

    records.sort_by_key(|r| r.month);
    Ok(records)
}

/// Normalizes every sales sheet, ordered by year then month.
///
/// # Errors
///
/// Fails on the first sheet that fails, or with
/// [`ComandaError::AmbiguousYear`] if two sheets claim the same year.
pub fn normalize_sales(sheets: &[&RawSheet]) -> Result<Vec<MonthlySales>> {
    let mut per_year: Vec<(i32, Vec<MonthlySales>)> = Vec::with_capacity(sheets.len());

    for sheet in sheets {
        let records = normalize_sales_sheet(sheet)?;
        let year = sheet_year(&sheet.name)?;
        if per_year.iter().any(|(y, _)| *y == year) {
            return Err(ComandaError::AmbiguousYear {
                sheet: sheet.name.clone(),
            });
        }
        per_year.push((year, records));
    }

    per_year.sort_by_key(|(year, _)| *year);
    Ok(per_year.into_iter().flat_map(|(_, r)| r).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn totals_row(values: &[f64]) -> Vec<Cell> {
        let mut row = vec![Cell::from(TOTALS_LABEL)];
        row.extend(values.iter().map(|v| Cell::Number(*v)));
        row
    }

    fn twelve() -> Vec<f64> {
        (1..=12).map(|m| f64::from(m) * 100.0).collect()
    }

    #[test]
    fn test_sheet_year() {
        assert_eq!(sheet_year("Monthly Sales 2024").unwrap(), 2024);
        assert_eq!(sheet_year("2023 Monthly Sales (final)").unwrap(), 2023);
        assert_eq!(sheet_year("Sales 2024 vs 2024").unwrap(), 2024);
        assert!(sheet_year("Monthly Sales").is_err());
        assert!(sheet_year("Monthly Sales 24").is_err());
        assert!(sheet_year("Monthly Sales 20245").is_err());
        assert_eq!(
            sheet_year("Sales 2023-2024").unwrap_err().kind(),
            "ambiguous_year"
        );
    }

    #[test]
    fn test_totals_row_among_item_rows() {
        let sheet = RawSheet::new(
            "Monthly Sales 2024",
            vec![
                vec![Cell::from("Item"), Cell::from("Jan")],
                vec![Cell::from("Carnitas"), Cell::Number(1.0)],
                totals_row(&twelve()),
                vec![Cell::from("Average Sales"), Cell::Number(650.0)],
            ],
        );
        let records = normalize_sales_sheet(&sheet).unwrap();
        assert_eq!(records.len(), 12);
        assert!(records.iter().all(|r| r.year == 2024));
        assert_eq!(records.first().map(|r| r.amount), Some(dec!(100)));
        assert_eq!(
            records.last().map(|r| (r.month, r.amount)),
            Some((Month::December, dec!(1200)))
        );
    }

    #[test]
    fn test_header_row_decides_month_order() {
        // Fiscal layout starting in July.
        let order = [
            "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun",
        ];
        let mut header = vec![Cell::from("Item")];
        header.extend(order.iter().map(|m| Cell::from(*m)));

        let sheet = RawSheet::new(
            "Monthly Sales 2024",
            vec![header, vec![Cell::from("Birria")], totals_row(&twelve())],
        );
        let records = normalize_sales_sheet(&sheet).unwrap();

        let months: Vec<Month> = records.iter().map(|r| r.month).collect();
        assert_eq!(months, Month::ALL.to_vec(), "output is calendar ordered");

        let july = records.iter().find(|r| r.month == Month::July).unwrap();
        assert_eq!(july.amount, dec!(100));
        let january = records.iter().find(|r| r.month == Month::January).unwrap();
        assert_eq!(january.amount, dec!(700));
    }

    #[test]
    fn test_padded_label_and_currency_text() {
        let mut row = vec![Cell::from(" Total Sales ")];
        row.extend((1..=12).map(|m| Cell::Text(format!("${m},000.00"))));
        let sheet = RawSheet::new("Monthly Sales 2023", vec![row]);

        let records = normalize_sales_sheet(&sheet).unwrap();
        assert_eq!(records.get(11).map(|r| r.amount), Some(dec!(12000)));
    }

    #[test]
    fn test_label_must_be_first_cell() {
        let mut indented = vec![Cell::Empty];
        indented.extend(totals_row(&twelve()));
        let sheet = RawSheet::new("Monthly Sales 2024", vec![indented]);
        let err = normalize_sales_sheet(&sheet).unwrap_err();
        assert_eq!(err.kind(), "missing_totals_row");

        // A later row with the label in place is still found.
        let sheet = RawSheet::new(
            "Monthly Sales 2024",
            vec![
                vec![Cell::from("Notes"), Cell::from("Total Sales")],
                totals_row(&twelve()),
            ],
        );
        assert_eq!(normalize_sales_sheet(&sheet).unwrap().len(), 12);
    }

    #[test]
    fn test_label_is_case_sensitive() {
        let mut row = totals_row(&twelve());
        row[0] = Cell::from("total sales");
        let sheet = RawSheet::new("Monthly Sales 2024", vec![row]);
        let err = normalize_sales_sheet(&sheet).unwrap_err();
        assert_eq!(err.kind(), "missing_totals_row");
    }

    #[test]
    fn test_invalid_value_names_month() {
        let mut values = twelve();
        values[4] = -5.0;
        let sheet = RawSheet::new("Monthly Sales 2024", vec![totals_row(&values)]);

        match normalize_sales_sheet(&sheet).unwrap_err() {
            ComandaError::InvalidSalesValue { month, value, .. } => {
                assert_eq!(month, Month::May);
                assert_eq!(value, "-5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_fails_on_first_missing_month() {
        let sheet = RawSheet::new(
            "Monthly Sales 2024",
            vec![totals_row(&[1.0, 2.0, 3.0])],
        );
        match normalize_sales_sheet(&sheet).unwrap_err() {
            ComandaError::InvalidSalesValue { month, .. } => assert_eq!(month, Month::April),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_multiple_sheets_sorted_and_unique() {
        let s2024 = RawSheet::new("Monthly Sales 2024", vec![totals_row(&twelve())]);
        let s2023 = RawSheet::new("Monthly Sales 2023", vec![totals_row(&[0.0; 12])]);

        let records = normalize_sales(&[&s2024, &s2023]).unwrap();
        assert_eq!(records.len(), 24);
        assert_eq!(records.first().map(|r| r.year), Some(2023));
        assert_eq!(
            records.iter().filter(|r| r.year == 2023).map(|r| r.amount).sum::<Decimal>(),
            Decimal::ZERO
        );

        let dup = RawSheet::new("Monthly Sales 2024 (copy)", vec![totals_row(&twelve())]);
        let err = normalize_sales(&[&s2024, &dup]).unwrap_err();
        assert_eq!(err.kind(), "ambiguous_year");
    }
}
