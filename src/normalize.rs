//! Table normalization.
//!
//! Turns the loosely structured sheets of a [`RawWorkbook`] into the typed
//! tables of [`crate::model`]. Pure: the same workbook always yields the same
//! tables and report.
//!
//! - [`sales`]: `Monthly Sales <YYYY>` sheets, located by their totals row
//! - [`menu`]: food items, located by header labels; bad rows are dropped
//! - [`employees`]: staff, located by header labels; bad pay data is fatal
//! - [`header`]: the header-resolution step shared by menu and employees
//! - [`coerce`]: currency, flag and date parsing of single cells

pub mod coerce;
pub mod employees;
pub mod header;
pub mod menu;
pub mod sales;

use crate::config::SheetNames;
use crate::error::Result;
use crate::model::{Employee, MenuItem, MonthlySales};
use crate::workbook::RawWorkbook;
use serde::Serialize;
use tracing::{info, warn};

/// What normalization kept, dropped and found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    pub sales_years: Vec<i32>,
    pub menu_items: usize,
    pub menu_rows_missing_fields: usize,
    pub menu_rows_invalid_price: usize,
    pub employees: usize,
    pub employees_sheet_present: bool,
    pub employee_blank_rows_skipped: usize,
    pub start_dates_present: bool,
}

impl NormalizationReport {
    pub fn dropped_menu_rows(&self) -> usize {
        self.menu_rows_missing_fields + self.menu_rows_invalid_price
    }
}

/// The canonical tables of one load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedTables {
    pub sales: Vec<MonthlySales>,
    pub menu: Vec<MenuItem>,
    pub employees: Vec<Employee>,
    pub report: NormalizationReport,
}

/// Normalizes every sheet the dashboard reads.
///
/// # Errors
///
/// Returns the first structural error: a missing sheet, a sales sheet without
/// a totals row or year, an invalid sales amount, missing header columns, or
/// invalid employee pay data.
pub fn normalize_workbook(workbook: &RawWorkbook, names: &SheetNames) -> Result<NormalizedTables> {
    let sheets = workbook.required_sheets(names)?;

    let sales = sales::normalize_sales(&sheets.sales)?;
    let menu = menu::normalize_menu_sheet(sheets.food)?;
    let staff = employees::normalize_employee_sheet(sheets.employees)?;

    let mut sales_years: Vec<i32> = sales.iter().map(|r| r.year).collect();
    sales_years.dedup();

    let report = NormalizationReport {
        sales_years,
        menu_items: menu.items.len(),
        menu_rows_missing_fields: menu.missing_fields,
        menu_rows_invalid_price: menu.invalid_price,
        employees: staff.employees.len(),
        employees_sheet_present: staff.sheet_present,
        employee_blank_rows_skipped: staff.blank_rows_skipped,
        start_dates_present: staff.has_start_dates,
    };

    if report.dropped_menu_rows() > 0 {
        warn!(
            missing_fields = report.menu_rows_missing_fields,
            invalid_price = report.menu_rows_invalid_price,
            "Dropped menu rows during normalization"
        );
    }
    if !report.employees_sheet_present {
        info!("No employees sheet; staffing metrics will be unavailable");
    }
    info!(
        years = ?report.sales_years,
        menu_items = report.menu_items,
        employees = report.employees,
        "Normalized workbook"
    );

    Ok(NormalizedTables {
        sales,
        menu: menu.items,
        employees: staff.employees,
        report,
    })
}

#[cfg(test)]
mod tests;
