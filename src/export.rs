//! Delimited-text export of the normalized tables.
//!
//! Two artifacts, each readable back into the same table:
//!
//! | Artifact | Header |
//! |----------|--------|
//! | sales by month | `Month,Sales,Year` |
//! | menu | `ItemName,Category,VegetarianOption,Price` |

use crate::error::{ComandaError, Result, ResultExt as _};
use crate::model::{MenuItem, Month, MonthlySales};
use crate::normalize::NormalizedTables;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SalesRecord {
    month: Month,
    #[serde(with = "rust_decimal::serde::str")]
    sales: Decimal,
    year: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MenuRecord {
    item_name: String,
    category: String,
    vegetarian_option: String,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
}

pub const SALES_HEADER: [&str; 3] = ["Month", "Sales", "Year"];
pub const MENU_HEADER: [&str; 4] = ["ItemName", "Category", "VegetarianOption", "Price"];

/// Writer that emits `header` even when there are no rows.
fn writer_with_header<W: Write>(writer: W, header: &[&str]) -> Result<csv::Writer<W>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(header)?;
    Ok(wtr)
}

fn flag(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// # Errors
///
/// Returns [`ComandaError::Export`] or [`ComandaError::Io`] if writing fails.
pub fn write_sales_csv<W: Write>(sales: &[MonthlySales], writer: W) -> Result<()> {
    let mut wtr = writer_with_header(writer, &SALES_HEADER)?;
    for row in sales {
        wtr.serialize(SalesRecord {
            month: row.month,
            sales: row.amount,
            year: row.year,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// # Errors
///
/// Returns [`ComandaError::Export`] for a row that is not a month name, a
/// decimal and a year.
pub fn parse_sales_csv<R: Read>(reader: R) -> Result<Vec<MonthlySales>> {
    csv::Reader::from_reader(reader)
        .deserialize::<SalesRecord>()
        .map(|record| {
            let record = record?;
            Ok(MonthlySales {
                year: record.year,
                month: record.month,
                amount: record.sales,
            })
        })
        .collect()
}

/// Flags are written as `Yes`/`No`.
///
/// # Errors
///
/// Returns [`ComandaError::Export`] or [`ComandaError::Io`] if writing fails.
pub fn write_menu_csv<W: Write>(items: &[MenuItem], writer: W) -> Result<()> {
    let mut wtr = writer_with_header(writer, &MENU_HEADER)?;
    for item in items {
        wtr.serialize(MenuRecord {
            item_name: item.name.clone(),
            category: item.category.clone(),
            vegetarian_option: flag(item.is_vegetarian).to_owned(),
            price: item.price,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// # Errors
///
/// Returns [`ComandaError::Export`] for a malformed row.
pub fn parse_menu_csv<R: Read>(reader: R) -> Result<Vec<MenuItem>> {
    csv::Reader::from_reader(reader)
        .deserialize::<MenuRecord>()
        .map(|record| {
            let record = record?;
            Ok(MenuItem {
                name: record.item_name,
                category: record.category,
                is_vegetarian: record.vegetarian_option.eq_ignore_ascii_case("yes"),
                price: record.price,
            })
        })
        .collect()
}

/// Which table to export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Sales,
    Menu,
}

impl ExportKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Sales => "sales_by_month.csv",
            Self::Menu => "menu_items.csv",
        }
    }

    /// # Errors
    ///
    /// Returns [`ComandaError::Export`] or [`ComandaError::Io`] if writing fails.
    pub fn write<W: Write>(self, tables: &NormalizedTables, writer: W) -> Result<()> {
        match self {
            Self::Sales => write_sales_csv(&tables.sales, writer),
            Self::Menu => write_menu_csv(&tables.menu, writer),
        }
    }

    /// # Errors
    ///
    /// See [`Self::write`].
    pub fn render(self, tables: &NormalizedTables) -> Result<String> {
        let mut buf = Vec::new();
        self.write(tables, &mut buf)?;
        String::from_utf8(buf).map_err(|e| ComandaError::Export(e.to_string()))
    }

    /// Writes the artifact to `path`, creating or truncating it.
    ///
    /// # Errors
    ///
    /// See [`Self::write`].
    pub fn write_to_path(self, tables: &NormalizedTables, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.write(tables, file)?;
        info!(path = %path.display(), kind = ?self, "Exported table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sales() -> Vec<MonthlySales> {
        vec![
            MonthlySales {
                year: 2024,
                month: Month::January,
                amount: dec!(1200.50),
            },
            MonthlySales {
                year: 2024,
                month: Month::February,
                amount: dec!(0),
            },
            MonthlySales {
                year: 2023,
                month: Month::December,
                amount: dec!(980),
            },
        ]
    }

    #[test]
    fn test_sales_csv_layout() {
        let mut buf = Vec::new();
        write_sales_csv(&sales(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Month,Sales,Year"));
        assert_eq!(lines.next(), Some("January,1200.50,2024"));
        assert_eq!(lines.next(), Some("February,0,2024"));
    }

    #[test]
    fn test_sales_round_trip_preserves_order() {
        let mut buf = Vec::new();
        write_sales_csv(&sales(), &mut buf).unwrap();
        assert_eq!(parse_sales_csv(buf.as_slice()).unwrap(), sales());
    }

    #[test]
    fn test_menu_csv() {
        let items = vec![
            MenuItem {
                name: "Tacos, al pastor".to_owned(),
                category: "Tacos".to_owned(),
                price: dec!(3.75),
                is_vegetarian: false,
            },
            MenuItem {
                name: "Rajas".to_owned(),
                category: "Tacos".to_owned(),
                price: dec!(3.50),
                is_vegetarian: true,
            },
        ];

        let mut buf = Vec::new();
        write_menu_csv(&items, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("ItemName,Category,VegetarianOption,Price\n"));
        assert!(text.contains("\"Tacos, al pastor\",Tacos,No,3.75"));
        assert!(text.contains("Rajas,Tacos,Yes,3.50"));

        assert_eq!(parse_menu_csv(buf.as_slice()).unwrap(), items);
    }

    #[test]
    fn test_round_trip_keeps_full_precision() {
        let big = dec!(12345678901234567.89);
        let sales = vec![MonthlySales {
            year: 2024,
            month: Month::March,
            amount: big,
        }];
        let mut buf = Vec::new();
        write_sales_csv(&sales, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains("March,12345678901234567.89,2024"));
        let parsed = parse_sales_csv(buf.as_slice()).unwrap();
        assert_eq!(parsed[0].amount, big);

        let items = vec![MenuItem {
            name: "Caviar Taco".to_owned(),
            category: "Tacos".to_owned(),
            price: big,
            is_vegetarian: false,
        }];
        let mut buf = Vec::new();
        write_menu_csv(&items, &mut buf).unwrap();
        assert_eq!(parse_menu_csv(buf.as_slice()).unwrap(), items);
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        let err = parse_sales_csv("Month,Sales,Year\nSmarch,1,2024\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), "export");
        let err = parse_sales_csv("Month,Sales,Year\nMarch,lots,2024\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), "export");
    }

    #[test]
    fn test_render_by_kind() {
        let tables = NormalizedTables {
            sales: sales(),
            ..Default::default()
        };
        let text = ExportKind::Sales.render(&tables).unwrap();
        assert_eq!(text.lines().count(), 4);

        let empty = ExportKind::Menu.render(&tables).unwrap();
        assert_eq!(empty, "ItemName,Category,VegetarianOption,Price\n");
        assert!(parse_menu_csv(empty.as_bytes()).unwrap().is_empty());
    }
}
