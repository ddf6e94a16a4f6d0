use super::{Cell, RawSheet, RawWorkbook};
use crate::error::{ComandaError, Result};
use calamine::{Data, Range, Reader as _, open_workbook_auto};
use chrono::{Duration, NaiveDate};
use std::path::Path;
use tracing::{debug, info};

/// Opens the workbook and reads every sheet.
///
/// Format is picked from the file extension (xlsx, xlsm, xlsb, xls, ods).
///
/// # Errors
///
/// Returns [`ComandaError::UnreadableWorkbook`] if the file is missing, is not
/// a spreadsheet, or any sheet fails to parse.
pub fn load_workbook(path: &Path) -> Result<RawWorkbook> {
    let unreadable = |reason: String| ComandaError::UnreadableWorkbook {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;

    let names = workbook.sheet_names();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| unreadable(format!("sheet '{name}': {e}")))?;
        let sheet = convert_range(&name, &range);
        debug!(sheet = %sheet.name, rows = sheet.rows.len(), "Read sheet");
        sheets.push(sheet);
    }

    info!(path = %path.display(), sheets = sheets.len(), "Loaded workbook");
    Ok(RawWorkbook::new(path, sheets))
}

/// Pads the used range back to absolute coordinates so column indices match
/// the sheet's own.
fn convert_range(name: &str, range: &Range<Data>) -> RawSheet {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or_default();

    let mut rows = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    RawSheet::new(name, rows)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            excel_serial_to_date(serial).map_or(Cell::Number(serial), Cell::Date)
        }
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map_or_else(|| Cell::Text(s.clone()), Cell::Date),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

/// Converts an Excel serial day number (1900 date system) to a date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    // Day 0 is 1899-12-30 once the phantom 1900-02-29 is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = load_workbook(Path::new("does/not/exist.xlsx")).unwrap_err();
        assert_eq!(err.kind(), "unreadable_workbook");
        assert!(err.to_string().contains("exist.xlsx"));
    }

    #[test]
    fn test_garbage_file_is_unreadable() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("corrupt.xlsx");
        std::fs::write(&path, b"this is not a zip archive")?;

        let err = load_workbook(&path).unwrap_err();
        assert!(matches!(err, ComandaError::UnreadableWorkbook { .. }));
        Ok(())
    }

    #[test]
    fn test_excel_serial_dates() {
        assert_eq!(
            excel_serial_to_date(45292.0),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            excel_serial_to_date(44197.75),
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
    }

    #[test]
    fn test_convert_cell_kinds() {
        assert_eq!(convert_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(
            convert_cell(&Data::String("Tacos".to_owned())),
            Cell::Text("Tacos".to_owned())
        );
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2023-05-01T00:00:00".to_owned())),
            Cell::Date(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap())
        );
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
    }
}
