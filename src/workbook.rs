//! Raw workbook access.
//!
//! The loader turns a spreadsheet file into [`RawWorkbook`]: named sheets made
//! of rows of [`Cell`]s, with no interpretation beyond the spreadsheet's own
//! cell kinds. Everything that gives the cells meaning lives in
//! [`crate::normalize`].

pub mod cache;
pub mod loader;

pub use cache::{SourceFingerprint, WorkbookCache};
pub use loader::{excel_serial_to_date, load_workbook};

use crate::config::SheetNames;
use crate::error::{ComandaError, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// A single spreadsheet cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    /// Spreadsheet error value such as `#DIV/0!`.
    Error(String),
}

impl Cell {
    /// Empty cells and whitespace-only text both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) | Self::Date(_) | Self::Error(_) => false,
        }
    }

    /// Trimmed text content, only for text cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.trim()),
            _ => None,
        }
    }

    /// Human-readable rendering used for labels and error messages.
    pub fn display_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_owned(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{n:.0}"),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Error(e) => e.clone(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_owned())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

pub(crate) fn row_is_blank(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_blank)
}

/// One sheet's cells. Row and column indices match the sheet's own, 0-based.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|row| row_is_blank(row))
    }
}

/// Every sheet of one workbook, in workbook order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawWorkbook {
    source: Option<PathBuf>,
    sheets: Vec<RawSheet>,
}

/// The sheets normalization needs, resolved by name.
#[derive(Debug)]
pub struct RequiredSheets<'a> {
    pub food: &'a RawSheet,
    pub sales: Vec<&'a RawSheet>,
    pub employees: Option<&'a RawSheet>,
}

impl RawWorkbook {
    pub fn new(source: impl Into<PathBuf>, sheets: Vec<RawSheet>) -> Self {
        Self {
            source: Some(source.into()),
            sheets,
        }
    }

    /// In-memory workbook with no backing file.
    pub fn from_sheets(sheets: Vec<RawSheet>) -> Self {
        Self {
            source: None,
            sheets,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn sheets(&self) -> &[RawSheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    /// Finds a sheet by exact name, then by trimmed case-insensitive name.
    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|s| s.name == name).or_else(|| {
            self.sheets
                .iter()
                .find(|s| s.name.trim().eq_ignore_ascii_case(name.trim()))
        })
    }

    /// # Errors
    ///
    /// Returns [`ComandaError::MissingSheet`] naming the absent sheet.
    pub fn require_sheet(&self, name: &str) -> Result<&RawSheet> {
        self.sheet(name).ok_or_else(|| ComandaError::MissingSheet {
            sheet: name.to_owned(),
        })
    }

    /// Sheets whose name starts with the sales prefix, in workbook order.
    pub fn sales_sheets(&self, prefix: &str) -> Vec<&RawSheet> {
        let prefix = prefix.trim().to_lowercase();
        self.sheets
            .iter()
            .filter(|s| s.name.trim().to_lowercase().starts_with(&prefix))
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`ComandaError::MissingSheet`] if the food sheet or every
    /// sales sheet is absent. The employees sheet is optional.
    pub fn required_sheets(&self, names: &SheetNames) -> Result<RequiredSheets<'_>> {
        let food = self.require_sheet(&names.food)?;

        let sales = self.sales_sheets(&names.sales_prefix);
        if sales.is_empty() {
            return Err(ComandaError::MissingSheet {
                sheet: format!("{} <YYYY>", names.sales_prefix),
            });
        }

        Ok(RequiredSheets {
            food,
            sales,
            employees: self.sheet(&names.employees),
        })
    }
}
