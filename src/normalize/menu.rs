//! Food-items sheet → [`MenuItem`] records.
//!
//! Row defects here are not fatal: rows without a name or category, and rows
//! whose price cannot be read, are dropped and counted.

use super::coerce::{AmountIssue, cell_text, non_negative_decimal, parse_flag};
use super::header::{ColumnSpec, resolve_header};
use crate::error::Result;
use crate::model::MenuItem;
use crate::workbook::{RawSheet, row_is_blank};
use tracing::warn;

pub const MENU_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        field: "name",
        aliases: &["FoodItem", "Food Item", "Item", "Item Name", "Name", "Dish"],
        required: true,
    },
    ColumnSpec {
        field: "category",
        aliases: &["Category", "Menu Category"],
        required: true,
    },
    ColumnSpec {
        field: "vegetarian",
        aliases: &[
            "VegetarianOption",
            "Vegetarian",
            "Veg",
            "Is Vegetarian",
            "Vegetarian?",
        ],
        required: false,
    },
    ColumnSpec {
        field: "price",
        aliases: &["Price", "Unit Price", "Cost"],
        required: true,
    },
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuNormalization {
    pub items: Vec<MenuItem>,
    /// Rows dropped for a blank name or category.
    pub missing_fields: usize,
    /// Rows dropped for a missing, non-numeric or negative price.
    pub invalid_price: usize,
}

/// # Errors
///
/// Returns [`crate::error::ComandaError::MissingColumns`] if no header row
/// names the item, category and price columns.
pub fn normalize_menu_sheet(sheet: &RawSheet) -> Result<MenuNormalization> {
    let header = resolve_header(sheet, MENU_COLUMNS)?;
    let mut out = MenuNormalization::default();

    for (row_idx, row) in sheet.rows.iter().enumerate().skip(header.row + 1) {
        if row_is_blank(row) || header.is_header_echo(row, MENU_COLUMNS) {
            continue;
        }

        let name = header.cell(row, "name").and_then(cell_text);
        let category = header.cell(row, "category").and_then(cell_text);
        let (Some(name), Some(category)) = (name, category) else {
            out.missing_fields += 1;
            continue;
        };

        let price = header
            .cell(row, "price")
            .map_or(Err(AmountIssue::Missing), non_negative_decimal);
        let Ok(price) = price else {
            warn!(sheet = %sheet.name, row = row_idx + 1, item = %name, "Dropping menu row with unusable price");
            out.invalid_price += 1;
            continue;
        };

        out.items.push(MenuItem {
            name,
            category,
            price,
            is_vegetarian: header.cell(row, "vegetarian").is_some_and(parse_flag),
        });
    }

    Ok(out)
}
