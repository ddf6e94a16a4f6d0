//! Dashboard configuration
//!
//! Persistent settings for locating the workbook and tuning the derived
//! metrics. Stored as JSON in the platform config directory.

use crate::error::{ComandaError, Result, ResultExt as _};
use crate::metrics::MetricsOptions;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PRICE_BUCKETS: usize = 20;
/// Upper bound on histogram buckets.
pub const MAX_PRICE_BUCKETS: usize = 1000;

/// Sheet naming convention of the workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub food: String,
    pub employees: String,
    /// Sales sheets are named `<prefix> <YYYY>`.
    pub sales_prefix: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            food: "FoodItems".to_owned(),
            employees: "Employees".to_owned(),
            sales_prefix: "Monthly Sales".to_owned(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Workbook to read when none is given on the command line
    pub workbook_path: Option<PathBuf>,
    /// Year to report on; the latest year in the workbook when unset
    pub default_year: Option<i32>,
    /// Bucket count for the menu price histogram
    pub price_buckets: usize,
    /// Used to turn weekly payroll into a monthly estimate
    pub weeks_per_month: Decimal,
    /// Also write logs to the rolling file in the data directory
    pub log_to_file: bool,
    pub sheets: SheetNames,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            workbook_path: None,
            default_year: None,
            price_buckets: DEFAULT_PRICE_BUCKETS,
            weeks_per_month: Decimal::from(52) / Decimal::from(12),
            log_to_file: false,
            sheets: SheetNames::default(),
        }
    }
}

impl DashboardConfig {
    /// Get the config file path
    ///
    /// # Errors
    ///
    /// Returns error if the platform has no config directory.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ComandaError::Config("Failed to get config directory".to_owned()))?;
        Ok(config_dir.join("comanda").join("config.json"))
    }

    /// Load configuration from the default location, falling back to defaults
    /// when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON in {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// # Errors
    ///
    /// Returns error if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.price_buckets == 0 {
            return Err(ComandaError::Config(
                "price_buckets must be at least 1".to_owned(),
            ));
        }
        if self.price_buckets > MAX_PRICE_BUCKETS {
            return Err(ComandaError::Config(format!(
                "price_buckets must be at most {MAX_PRICE_BUCKETS}"
            )));
        }
        if self.weeks_per_month <= Decimal::ZERO {
            return Err(ComandaError::Config(
                "weeks_per_month must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Picks the workbook: an explicit path wins over the configured one.
    ///
    /// # Errors
    ///
    /// Returns error if neither is set.
    pub fn resolve_workbook(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        explicit
            .or_else(|| self.workbook_path.clone())
            .ok_or_else(|| {
                ComandaError::Config(
                    "No workbook given. Pass --workbook, set COMANDA_WORKBOOK, \
                     or set workbook_path in config.json."
                        .to_owned(),
                )
            })
    }

    pub fn metrics_options(&self, as_of: NaiveDate) -> MetricsOptions {
        MetricsOptions {
            price_buckets: self.price_buckets,
            weeks_per_month: self.weeks_per_month,
            as_of,
        }
    }
}
