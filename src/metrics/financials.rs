//! Labor cost against sales.
//!
//! The employees sheet only holds weekly figures, so monthly payroll and
//! hours are estimated as weekly totals times `weeks_per_month`.

use super::{Metric, saturating_sum};
use super::staffing::{total_weekly_hours, total_weekly_payroll};
use crate::model::{Employee, Month, MonthlySales};
use rust_decimal::Decimal;
use serde::Serialize;

/// Payroll as a percentage of sales over the same period.
pub fn labor_cost_percent(monthly_payroll: Decimal, monthly_sales: Decimal) -> Metric {
    Metric::percent(monthly_payroll, monthly_sales)
}

pub fn sales_per_labor_hour(sales: Decimal, total_hours: Decimal) -> Metric {
    Metric::ratio(sales, total_hours)
}

pub fn monthly_payroll_estimate(employees: &[Employee], weeks_per_month: Decimal) -> Decimal {
    total_weekly_payroll(employees).saturating_mul(weeks_per_month)
}

pub fn monthly_labor_hours(employees: &[Employee], weeks_per_month: Decimal) -> Decimal {
    total_weekly_hours(employees).saturating_mul(weeks_per_month)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyFinancials {
    pub month: Month,
    pub sales: Decimal,
    pub labor_cost_percent: Metric,
    pub sales_per_labor_hour: Metric,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FinancialMetrics {
    pub annual_sales: Decimal,
    /// `None` without employees.
    pub monthly_payroll_estimate: Option<Decimal>,
    pub monthly_labor_hours: Option<Decimal>,
    /// Estimated payroll for the months with sales, against their sales.
    pub labor_cost_percent: Metric,
    pub sales_per_labor_hour: Metric,
    pub monthly: Vec<MonthlyFinancials>,
}

pub fn summarize(
    sales: &[MonthlySales],
    employees: &[Employee],
    year: i32,
    weeks_per_month: Decimal,
) -> FinancialMetrics {
    let mut rows: Vec<&MonthlySales> = sales.iter().filter(|r| r.year == year).collect();
    rows.sort_by_key(|r| r.month);

    let annual_sales = saturating_sum(rows.iter().map(|r| r.amount));
    let months = Decimal::from(rows.len());

    let labor = (!employees.is_empty()).then(|| {
        (
            monthly_payroll_estimate(employees, weeks_per_month),
            monthly_labor_hours(employees, weeks_per_month),
        )
    });

    let monthly = rows
        .iter()
        .map(|r| MonthlyFinancials {
            month: r.month,
            sales: r.amount,
            labor_cost_percent: labor.map_or(Metric::Undefined, |(payroll, _)| {
                labor_cost_percent(payroll, r.amount)
            }),
            sales_per_labor_hour: labor.map_or(Metric::Undefined, |(_, hours)| {
                sales_per_labor_hour(r.amount, hours)
            }),
        })
        .collect();

    FinancialMetrics {
        annual_sales,
        monthly_payroll_estimate: labor.map(|(payroll, _)| payroll),
        monthly_labor_hours: labor.map(|(_, hours)| hours),
        labor_cost_percent: labor
            .and_then(|(payroll, _)| payroll.checked_mul(months))
            .map_or(Metric::Undefined, |payroll| {
                labor_cost_percent(payroll, annual_sales)
            }),
        sales_per_labor_hour: labor
            .and_then(|(_, hours)| hours.checked_mul(months))
            .map_or(Metric::Undefined, |hours| {
                sales_per_labor_hour(annual_sales, hours)
            }),
        monthly,
    }
}
