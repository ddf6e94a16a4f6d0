//! Derived metrics.
//!
//! Every function here is a pure function over the normalized tables: no
//! state, no I/O, no errors. Ratios whose denominator is zero, and averages
//! over nothing, come back as [`Metric::Undefined`] instead of panicking or
//! producing `NaN`/infinity. The renderer shows those as `N/A`.
//!
//! Plain totals saturate at [`Decimal::MAX`] rather than overflow; derived
//! figures whose arithmetic would leave `Decimal` range are undefined.
//!
//! Year-dependent functions are O(months) or O(items), so re-filtering by a
//! different year simply calls them again on the same snapshot.

pub mod financials;
pub mod menu;
pub mod sales;
pub mod staffing;

use crate::config::DEFAULT_PRICE_BUCKETS;
use crate::normalize::NormalizedTables;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A metric value, or the explicit marker that it has no valid value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Defined(Decimal),
    Undefined,
}

impl Metric {
    /// `numerator / denominator`, undefined for a zero denominator or overflow.
    pub fn ratio(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator.is_zero() {
            return Self::Undefined;
        }
        numerator
            .checked_div(denominator)
            .map_or(Self::Undefined, Self::Defined)
    }

    /// `numerator / denominator * 100`.
    pub fn percent(numerator: Decimal, denominator: Decimal) -> Self {
        Self::ratio(numerator, denominator).and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
    }

    /// Arithmetic mean, undefined for an empty input or an overflowing sum.
    pub fn mean(values: impl IntoIterator<Item = Decimal>) -> Self {
        let mut sum = Decimal::ZERO;
        let mut count = 0_u64;
        for v in values {
            let Some(next) = sum.checked_add(v) else {
                return Self::Undefined;
            };
            sum = next;
            count += 1;
        }
        Self::ratio(sum, Decimal::from(count))
    }

    fn and_then(self, f: impl FnOnce(Decimal) -> Option<Decimal>) -> Self {
        match self {
            Self::Defined(v) => f(v).map_or(Self::Undefined, Self::Defined),
            Self::Undefined => Self::Undefined,
        }
    }

    pub fn value(self) -> Option<Decimal> {
        match self {
            Self::Defined(v) => Some(v),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn round_dp(self, dp: u32) -> Self {
        match self {
            Self::Defined(v) => {
                Self::Defined(v.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
            }
            Self::Undefined => Self::Undefined,
        }
    }
}

/// Sum that stops at [`Decimal::MAX`] instead of overflowing.
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

impl From<Option<Decimal>> for Metric {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Self::Undefined, Self::Defined)
    }
}

/// Two decimal places, or `N/A`.
impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(v) => write!(
                f,
                "{:.2}",
                v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            ),
            Self::Undefined => f.write_str("N/A"),
        }
    }
}

/// Tunables for a metrics pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricsOptions {
    pub price_buckets: usize,
    pub weeks_per_month: Decimal,
    /// Reference date for tenure.
    pub as_of: NaiveDate,
}

impl MetricsOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            price_buckets: DEFAULT_PRICE_BUCKETS,
            weeks_per_month: Decimal::from(52) / Decimal::from(12),
            as_of,
        }
    }
}

/// Everything the four dashboard views show for one selected year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetricsBundle {
    pub year: i32,
    pub sales: sales::SalesMetrics,
    pub menu: menu::MenuMetrics,
    /// Absent when the workbook has no employees.
    pub staffing: Option<staffing::StaffingMetrics>,
    pub financials: financials::FinancialMetrics,
}

pub fn compute_metrics(
    tables: &NormalizedTables,
    year: i32,
    options: &MetricsOptions,
) -> MetricsBundle {
    let staffing = (!tables.employees.is_empty())
        .then(|| staffing::summarize(&tables.employees, options.as_of));

    MetricsBundle {
        year,
        sales: sales::summarize(&tables.sales, year),
        menu: menu::summarize(&tables.menu, options.price_buckets),
        staffing,
        financials: financials::summarize(
            &tables.sales,
            &tables.employees,
            year,
            options.weeks_per_month,
        ),
    }
}
