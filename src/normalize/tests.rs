#![expect(clippy::unwrap_used, clippy::indexing_slicing)]
use super::*;
use crate::workbook::{Cell, RawSheet};

fn text_row(cells: &[&str]) -> Vec<Cell> {
    cells.iter().map(|c| Cell::from(*c)).collect()
}

fn sales_sheet(year: i32, base: f64) -> RawSheet {
    let mut totals = vec![Cell::from("Total Sales")];
    totals.extend((0..12).map(|m| Cell::Number(base + f64::from(m))));
    RawSheet::new(format!("Monthly Sales {year}"), vec![totals])
}

fn food_sheet() -> RawSheet {
    RawSheet::new(
        "FoodItems",
        vec![
            text_row(&["FoodItem", "Category", "VegetarianOption", "Price"]),
            text_row(&["Carne Asada", "Tacos", "No", "4.00"]),
            text_row(&["Rajas", "Tacos", "Yes", "3.50"]),
            text_row(&["", "Drinks", "Yes", "2.00"]),
        ],
    )
}

fn employee_sheet() -> RawSheet {
    RawSheet::new(
        "Employees",
        vec![
            text_row(&[
                "First Name",
                "Last Name",
                "Role",
                "Hourly Rate",
                "Weekly Hours",
                "Employment Type",
            ]),
            text_row(&["Ana", "Ruiz", "Cook", "15.5", "40", "Full"]),
        ],
    )
}

#[test]
fn test_full_workbook_normalizes() {
    let wb = RawWorkbook::from_sheets(vec![
        food_sheet(),
        sales_sheet(2024, 1000.0),
        sales_sheet(2023, 500.0),
        employee_sheet(),
    ]);
    let tables = normalize_workbook(&wb, &SheetNames::default()).unwrap();

    assert_eq!(tables.sales.len(), 24);
    assert_eq!(tables.report.sales_years, vec![2023, 2024]);
    assert_eq!(tables.menu.len(), 2);
    assert_eq!(tables.report.dropped_menu_rows(), 1);
    assert_eq!(tables.employees.len(), 1);
    assert!(tables.report.employees_sheet_present);
}

#[test]
fn test_workbook_without_employees() {
    let wb = RawWorkbook::from_sheets(vec![food_sheet(), sales_sheet(2024, 1000.0)]);
    let tables = normalize_workbook(&wb, &SheetNames::default()).unwrap();

    assert!(tables.employees.is_empty());
    assert!(!tables.report.employees_sheet_present);
    assert_eq!(tables.sales.len(), 12);
}

#[test]
fn test_custom_sheet_names() {
    let mut food = food_sheet();
    food.name = "Menu".to_owned();
    let wb = RawWorkbook::from_sheets(vec![food, sales_sheet(2024, 1.0)]);

    let names = SheetNames {
        food: "Menu".to_owned(),
        ..Default::default()
    };
    let tables = normalize_workbook(&wb, &names).unwrap();
    assert_eq!(tables.menu[0].name, "Carne Asada");
}

#[test]
fn test_sales_error_aborts_load() {
    let broken = RawSheet::new("Monthly Sales 2024", vec![text_row(&["Grand Total", "1"])]);
    let wb = RawWorkbook::from_sheets(vec![food_sheet(), broken, employee_sheet()]);

    let err = normalize_workbook(&wb, &SheetNames::default()).unwrap_err();
    assert_eq!(err.kind(), "missing_totals_row");
}

#[test]
fn test_normalization_is_deterministic() {
    let wb = RawWorkbook::from_sheets(vec![
        food_sheet(),
        sales_sheet(2024, 10.0),
        employee_sheet(),
    ]);
    let first = normalize_workbook(&wb, &SheetNames::default()).unwrap();
    let second = normalize_workbook(&wb, &SheetNames::default()).unwrap();
    assert_eq!(first, second);
}
