//! Canonical typed tables produced by normalization.
//!
//! Every record here is immutable once the normalizer has built it. Derived
//! values such as weekly pay live in [`crate::metrics`] and are never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month, ordered January first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// 1-based month number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Self> {
        let idx = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::ALL.get(idx).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        self.name().get(..3).unwrap_or_default()
    }

    /// Parses a full or three-letter month name, ignoring case and surrounding
    /// whitespace. `Sept` is accepted as well.
    pub fn from_name(raw: &str) -> Option<Self> {
        let wanted = raw.trim().trim_end_matches('.').to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        if wanted == "sept" {
            return Some(Self::September);
        }
        Self::ALL.into_iter().find(|month| {
            month.name().eq_ignore_ascii_case(&wanted)
                || month.abbreviation().eq_ignore_ascii_case(&wanted)
        })
    }

    /// Quarter of the year, 1 through 4.
    pub fn quarter(self) -> u8 {
        self as u8 / 3 + 1
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One month of sales for one year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub year: i32,
    pub month: Month,
    pub amount: Decimal,
}

/// One dish on the menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub is_vegetarian: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    Full,
    Part,
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("Full-time"),
            Self::Part => f.write_str("Part-time"),
        }
    }
}

/// One staff member. Pay is derived, see [`crate::metrics::staffing::weekly_pay`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub hourly_rate: Decimal,
    pub weekly_hours: Decimal,
    pub employment_type: EmploymentType,
    pub start_date: Option<NaiveDate>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}
