//! Error taxonomy for loading and normalizing the workbook.
//!
//! Structural problems with the workbook (a missing sheet, no totals row, a
//! negative pay rate) abort the whole load. The presentation layer receives
//! them as a [`LoadFailure`], which carries a stable kind, the message, and a
//! description of what the workbook was expected to contain:
//!
//! ```
//! use comanda::error::ComandaError;
//!
//! let err = ComandaError::MissingSheet { sheet: "FoodItems".to_owned() };
//! let failure = err.to_failure();
//! assert_eq!(failure.kind, "missing_sheet");
//! assert!(failure.expected.contains("FoodItems"));
//! ```
//!
//! Metric computations never produce errors; see [`crate::metrics::Metric`].

use crate::model::Month;
use serde::Serialize;
use std::path::PathBuf;

/// Main error type for comanda operations.
#[derive(Debug, thiserror::Error)]
pub enum ComandaError {
    /// The file is missing, corrupt, or not a spreadsheet.
    #[error("Cannot read workbook {}: {reason}", path.display())]
    UnreadableWorkbook { path: PathBuf, reason: String },

    #[error("Workbook has no sheet named '{sheet}'")]
    MissingSheet { sheet: String },

    #[error("Sheet '{sheet}' has no row labelled 'Total Sales'")]
    MissingTotalsRow { sheet: String },

    #[error("Cannot determine a single 4-digit year from sheet name '{sheet}'")]
    AmbiguousYear { sheet: String },

    #[error("Sheet '{sheet}': invalid sales value for {month}: '{value}'")]
    InvalidSalesValue {
        sheet: String,
        month: Month,
        value: String,
    },

    #[error("Sheet '{sheet}' is missing required columns: {}", missing.join(", "))]
    MissingColumns { sheet: String, missing: Vec<String> },

    /// `row` is the 1-based row number as shown in the spreadsheet.
    #[error("Employees sheet row {row}: invalid {field}: '{value}'")]
    InvalidEmployeeData {
        row: usize,
        field: String,
        value: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ComandaError>,
    },
}

impl ComandaError {
    /// Stable identifier for the error kind, looking through any context.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnreadableWorkbook { .. } => "unreadable_workbook",
            Self::MissingSheet { .. } => "missing_sheet",
            Self::MissingTotalsRow { .. } => "missing_totals_row",
            Self::AmbiguousYear { .. } => "ambiguous_year",
            Self::InvalidSalesValue { .. } => "invalid_sales_value",
            Self::MissingColumns { .. } => "missing_columns",
            Self::InvalidEmployeeData { .. } => "invalid_employee_data",
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Export(_) => "export",
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// What the workbook should look like to avoid this error.
    pub fn expected_structure(&self) -> &'static str {
        match self {
            Self::UnreadableWorkbook { .. } => {
                "An existing .xlsx workbook that can be opened in a spreadsheet program."
            }
            Self::MissingSheet { .. } => {
                "Sheets named 'FoodItems', one or more 'Monthly Sales <YYYY>' sheets, \
                 and optionally 'Employees'."
            }
            Self::MissingTotalsRow { .. } => {
                "A row whose first cell reads exactly 'Total Sales', followed by twelve \
                 monthly amounts."
            }
            Self::AmbiguousYear { .. } => {
                "Sales sheets named 'Monthly Sales <YYYY>' with exactly one 4-digit year, \
                 and no two sheets for the same year."
            }
            Self::InvalidSalesValue { .. } => {
                "Twelve numeric, non-negative amounts after the 'Total Sales' label."
            }
            Self::MissingColumns { .. } => {
                "A header row naming the columns, e.g. FoodItem, Category, \
                 VegetarianOption, Price for the menu and First Name, Last Name, Role, \
                 Hourly Rate, Weekly Hours, Employment Type for employees."
            }
            Self::InvalidEmployeeData { .. } => {
                "Non-negative numeric hourly rates and weekly hours, and an employment \
                 type of Full or Part for every employee."
            }
            Self::Io(_) | Self::Export(_) => "A writable output location.",
            Self::Config(_) => "A valid comanda config.json and a workbook path.",
            Self::Context { source, .. } => source.expected_structure(),
        }
    }

    pub fn to_failure(&self) -> LoadFailure {
        LoadFailure {
            kind: self.kind(),
            detail: self.to_string(),
            expected: self.expected_structure(),
        }
    }
}

/// Structured form of a failed load, handed to the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub kind: &'static str,
    pub detail: String,
    pub expected: &'static str,
}

impl From<&ComandaError> for LoadFailure {
    fn from(err: &ComandaError) -> Self {
        err.to_failure()
    }
}

impl From<serde_json::Error> for ComandaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<csv::Error> for ComandaError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

// For consumers that only carry strings.
impl From<ComandaError> for String {
    fn from(err: ComandaError) -> Self {
        err.to_string()
    }
}

/// Result type alias for comanda operations.
pub type Result<T> = std::result::Result<T, ComandaError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ComandaError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| ComandaError::Context {
            context: msg.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ComandaError::Context {
            context: f(),
            source: Box::new(e.into()),
        })
    }
}
