//! Employees sheet → [`Employee`] records.
//!
//! Unlike the menu, bad pay data is fatal: a negative or unreadable rate or
//! hour count fails the whole load so payroll is never computed from clamped
//! values. A `Salary` or `Weekly Pay` column is ignored; pay is always derived.

use super::coerce::{AmountIssue, cell_text, non_negative_decimal, parse_date};
use super::header::{ColumnSpec, HeaderMap, resolve_header};
use crate::error::{ComandaError, Result};
use crate::model::{Employee, EmploymentType};
use crate::workbook::{Cell, RawSheet, row_is_blank};
use rust_decimal::Decimal;

/// Role used when the role cell is blank.
pub const UNASSIGNED_ROLE: &str = "Unassigned";

pub const EMPLOYEE_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        field: "first_name",
        aliases: &["First Name", "FirstName", "First", "Given Name"],
        required: true,
    },
    ColumnSpec {
        field: "last_name",
        aliases: &["Last Name", "LastName", "Last", "Surname"],
        required: true,
    },
    ColumnSpec {
        field: "role",
        aliases: &["Role", "Position", "Job Title", "Title"],
        required: true,
    },
    ColumnSpec {
        field: "hourly_rate",
        aliases: &["Hourly Rate", "Rate", "Pay Rate", "Hourly Wage", "Wage"],
        required: true,
    },
    ColumnSpec {
        field: "weekly_hours",
        aliases: &["Weekly Hours", "Hours", "Hours Per Week", "Hours/Week"],
        required: true,
    },
    ColumnSpec {
        field: "employment_type",
        aliases: &[
            "Employment Type",
            "EmploymentType",
            "Type",
            "Status",
            "Full/Part Time",
        ],
        required: true,
    },
    ColumnSpec {
        field: "start_date",
        aliases: &["Start Date", "StartDate", "Hire Date", "Date Hired"],
        required: false,
    },
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaffNormalization {
    pub employees: Vec<Employee>,
    pub sheet_present: bool,
    pub blank_rows_skipped: usize,
    pub has_start_dates: bool,
}

fn invalid(row_idx: usize, field: &str, cell: Option<&Cell>) -> ComandaError {
    ComandaError::InvalidEmployeeData {
        row: row_idx + 1,
        field: field.to_owned(),
        value: cell.map(Cell::display_text).unwrap_or_default(),
    }
}

fn amount(header: &HeaderMap, row: &[Cell], row_idx: usize, field: &str) -> Result<Decimal> {
    let cell = header.cell(row, field);
    cell.map_or(Err(AmountIssue::Missing), non_negative_decimal)
        .map_err(|_| invalid(row_idx, &field.replace('_', " "), cell))
}

fn employment_type(header: &HeaderMap, row: &[Cell], row_idx: usize) -> Result<EmploymentType> {
    let cell = header.cell(row, "employment_type");
    let Some(text) = cell.and_then(cell_text) else {
        return Ok(EmploymentType::Full);
    };

    let text = text.to_lowercase();
    if text.starts_with("full") || text == "ft" {
        Ok(EmploymentType::Full)
    } else if text.starts_with("part") || text == "pt" {
        Ok(EmploymentType::Part)
    } else {
        Err(invalid(row_idx, "employment type", cell))
    }
}

/// An absent or empty sheet yields an empty table.
///
/// # Errors
///
/// Returns [`ComandaError::MissingColumns`] if a non-empty sheet has no
/// recognisable header, or [`ComandaError::InvalidEmployeeData`] for the first
/// row with a negative or unreadable rate, hour count or employment type.
pub fn normalize_employee_sheet(sheet: Option<&RawSheet>) -> Result<StaffNormalization> {
    let Some(sheet) = sheet.filter(|s| !s.is_blank()) else {
        return Ok(StaffNormalization {
            sheet_present: sheet.is_some(),
            ..Default::default()
        });
    };

    let header = resolve_header(sheet, EMPLOYEE_COLUMNS)?;
    let mut out = StaffNormalization {
        sheet_present: true,
        has_start_dates: header.has("start_date"),
        ..Default::default()
    };

    for (row_idx, row) in sheet.rows.iter().enumerate().skip(header.row + 1) {
        if row_is_blank(row) {
            out.blank_rows_skipped += 1;
            continue;
        }
        if header.is_header_echo(row, EMPLOYEE_COLUMNS) {
            continue;
        }

        let text = |field: &str| header.cell(row, field).and_then(cell_text);

        out.employees.push(Employee {
            first_name: text("first_name").unwrap_or_default(),
            last_name: text("last_name").unwrap_or_default(),
            role: text("role").unwrap_or_else(|| UNASSIGNED_ROLE.to_owned()),
            hourly_rate: amount(&header, row, row_idx, "hourly_rate")?,
            weekly_hours: amount(&header, row, row_idx, "weekly_hours")?,
            employment_type: employment_type(&header, row, row_idx)?,
            start_date: header.cell(row, "start_date").and_then(parse_date),
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const HEADER: &[&str] = &[
        "First Name",
        "Last Name",
        "Position",
        "Hourly Rate",
        "Weekly Hours",
        "Employment Type",
        "Start Date",
    ];

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    #[test]
    fn test_absent_or_empty_sheet_is_empty_table() {
        let staff = normalize_employee_sheet(None).unwrap();
        assert!(staff.employees.is_empty());
        assert!(!staff.sheet_present);

        let blank = RawSheet::new("Employees", vec![row(&["", ""])]);
        let staff = normalize_employee_sheet(Some(&blank)).unwrap();
        assert!(staff.employees.is_empty());
        assert!(staff.sheet_present);
    }

    #[test]
    fn test_employees_parsed() {
        let sheet = RawSheet::new(
            "Employees",
            vec![
                row(HEADER),
                row(&["Ana", "Ruiz", "Cook", "15.50", "40", "Full", "2021-03-15"]),
                row(&["", "", "", "", "", "", ""]),
                row(&["Luis", "Mora", "", "$12", "22.5", "part-time", ""]),
            ],
        );
        let staff = normalize_employee_sheet(Some(&sheet)).unwrap();
        assert_eq!(staff.employees.len(), 2);
        assert_eq!(staff.blank_rows_skipped, 1);
        assert!(staff.has_start_dates);

        let ana = &staff.employees[0];
        assert_eq!(ana.role, "Cook");
        assert_eq!(ana.hourly_rate, dec!(15.50));
        assert_eq!(ana.employment_type, EmploymentType::Full);
        assert_eq!(ana.start_date, NaiveDate::from_ymd_opt(2021, 3, 15));

        let luis = &staff.employees[1];
        assert_eq!(luis.role, UNASSIGNED_ROLE);
        assert_eq!(luis.weekly_hours, dec!(22.5));
        assert_eq!(luis.employment_type, EmploymentType::Part);
        assert_eq!(luis.start_date, None);
    }

    #[test]
    fn test_implausible_rate_fails_load() {
        let sheet = RawSheet::new(
            "Employees",
            vec![
                row(HEADER),
                vec![
                    Cell::from("Ana"),
                    Cell::from("Ruiz"),
                    Cell::from("Cook"),
                    Cell::Number(1e20),
                    Cell::Number(1e10),
                ],
            ],
        );
        match normalize_employee_sheet(Some(&sheet)).unwrap_err() {
            ComandaError::InvalidEmployeeData { row, field, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, "hourly rate");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_rate_fails_load() {
        let sheet = RawSheet::new(
            "Employees",
            vec![
                row(HEADER),
                row(&["Ana", "Ruiz", "Cook", "15.50", "40", "Full", ""]),
                row(&["Eva", "Paz", "Server", "-3", "30", "Part", ""]),
            ],
        );
        match normalize_employee_sheet(Some(&sheet)).unwrap_err() {
            ComandaError::InvalidEmployeeData { row, field, value } => {
                assert_eq!(row, 3);
                assert_eq!(field, "hourly rate");
                assert_eq!(value, "-3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_hours_fails_load() {
        let sheet = RawSheet::new(
            "Employees",
            vec![
                row(HEADER),
                row(&["Ana", "Ruiz", "Cook", "15.50", "", "Full", ""]),
            ],
        );
        let err = normalize_employee_sheet(Some(&sheet)).unwrap_err();
        assert_eq!(err.kind(), "invalid_employee_data");
        assert!(err.to_string().contains("weekly hours"));
    }

    #[test]
    fn test_unknown_employment_type_rejected() {
        let sheet = RawSheet::new(
            "Employees",
            vec![
                row(HEADER),
                row(&["Ana", "Ruiz", "Cook", "15.50", "40", "Seasonal", ""]),
            ],
        );
        let err = normalize_employee_sheet(Some(&sheet)).unwrap_err();
        assert!(err.to_string().contains("employment type"));
    }

    #[test]
    fn test_start_date_column_optional() {
        let sheet = RawSheet::new(
            "Employees",
            vec![
                row(&["First", "Last", "Role", "Rate", "Hours", "Type", "Salary"]),
                row(&["Ana", "Ruiz", "Cook", "15", "40", "FT", "999999"]),
            ],
        );
        let staff = normalize_employee_sheet(Some(&sheet)).unwrap();
        assert!(!staff.has_start_dates);
        assert_eq!(staff.employees.len(), 1);
        assert_eq!(staff.employees[0].start_date, None);
    }
}
