use super::{Metric, saturating_sum};
use crate::model::{Month, MonthlySales};
use rust_decimal::Decimal;
use serde::Serialize;

fn year_rows(table: &[MonthlySales], year: i32) -> impl Iterator<Item = &MonthlySales> {
    table.iter().filter(move |r| r.year == year)
}

/// Rows of one year in calendar order.
fn year_series(table: &[MonthlySales], year: i32) -> Vec<&MonthlySales> {
    let mut rows: Vec<&MonthlySales> = year_rows(table, year).collect();
    rows.sort_by_key(|r| r.month);
    rows
}

pub fn total_sales(table: &[MonthlySales], year: i32) -> Decimal {
    saturating_sum(year_rows(table, year).map(|r| r.amount))
}

/// Mean over the months present for that year.
pub fn average_monthly_sales(table: &[MonthlySales], year: i32) -> Metric {
    Metric::mean(year_rows(table, year).map(|r| r.amount))
}

/// `(this year - last year) / last year * 100`. Undefined without prior-year
/// data or when the prior-year total is zero.
pub fn year_over_year_growth(table: &[MonthlySales], year: i32) -> Metric {
    let Some(prior_year) = year.checked_sub(1) else {
        return Metric::Undefined;
    };
    if year_rows(table, prior_year).next().is_none() {
        return Metric::Undefined;
    }
    let current = total_sales(table, year);
    let previous = total_sales(table, prior_year);
    current
        .checked_sub(previous)
        .map_or(Metric::Undefined, |delta| Metric::percent(delta, previous))
}

/// Month with the highest amount; the earliest month wins ties.
pub fn peak_month(table: &[MonthlySales], year: i32) -> Option<Month> {
    year_series(table, year)
        .into_iter()
        .fold(None, |best: Option<&MonthlySales>, r| match best {
            Some(b) if b.amount >= r.amount => Some(b),
            _ => Some(r),
        })
        .map(|r| r.month)
}

/// Month with the lowest amount; the earliest month wins ties.
pub fn lowest_month(table: &[MonthlySales], year: i32) -> Option<Month> {
    year_series(table, year)
        .into_iter()
        .fold(None, |best: Option<&MonthlySales>, r| match best {
            Some(b) if b.amount <= r.amount => Some(b),
            _ => Some(r),
        })
        .map(|r| r.month)
}

/// Growth of each month over its predecessor, in percent. The first month has
/// no predecessor and a zero predecessor has no defined growth.
pub fn month_over_month_growth(table: &[MonthlySales], year: i32) -> Vec<(Month, Metric)> {
    let series = year_series(table, year);
    let mut previous: Option<Decimal> = None;

    series
        .into_iter()
        .map(|r| {
            let growth = previous.map_or(Metric::Undefined, |prev| {
                Metric::percent(r.amount - prev, prev)
            });
            previous = Some(r.amount);
            (r.month, growth)
        })
        .collect()
}

/// Totals for Q1 through Q4.
pub fn quarterly_sales(table: &[MonthlySales], year: i32) -> [Decimal; 4] {
    let mut quarters = [Decimal::ZERO; 4];
    for r in year_rows(table, year) {
        if let Some(q) = quarters.get_mut(usize::from(r.month.quarter() - 1)) {
            *q = q.saturating_add(r.amount);
        }
    }
    quarters
}

/// Distinct years in ascending order.
pub fn available_years(table: &[MonthlySales]) -> Vec<i32> {
    let mut years: Vec<i32> = table.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Sales view figures for one year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SalesMetrics {
    pub total: Decimal,
    pub average_monthly: Metric,
    pub year_over_year_growth: Metric,
    pub peak_month: Option<Month>,
    pub lowest_month: Option<Month>,
    pub monthly: Vec<(Month, Decimal)>,
    pub month_over_month: Vec<(Month, Metric)>,
    pub quarterly: [Decimal; 4],
}

pub fn summarize(table: &[MonthlySales], year: i32) -> SalesMetrics {
    SalesMetrics {
        total: total_sales(table, year),
        average_monthly: average_monthly_sales(table, year),
        year_over_year_growth: year_over_year_growth(table, year),
        peak_month: peak_month(table, year),
        lowest_month: lowest_month(table, year),
        monthly: year_series(table, year)
            .into_iter()
            .map(|r| (r.month, r.amount))
            .collect(),
        month_over_month: month_over_month_growth(table, year),
        quarterly: quarterly_sales(table, year),
    }
}
