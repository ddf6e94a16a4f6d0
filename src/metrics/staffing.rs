use super::{Metric, saturating_sum};
use crate::model::{Employee, EmploymentType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// `hourly_rate * weekly_hours`, saturating at [`Decimal::MAX`]. Any salary
/// column in the workbook is ignored.
pub fn weekly_pay(employee: &Employee) -> Decimal {
    employee.hourly_rate.saturating_mul(employee.weekly_hours)
}

/// Weekly payroll summed per role, in the order roles first appear.
pub fn payroll_by_role(employees: &[Employee]) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for e in employees {
        let pay = weekly_pay(e);
        match totals.iter_mut().find(|(role, _)| *role == e.role) {
            Some((_, total)) => *total = total.saturating_add(pay),
            None => totals.push((e.role.clone(), pay)),
        }
    }
    totals
}

pub fn total_weekly_payroll(employees: &[Employee]) -> Decimal {
    saturating_sum(employees.iter().map(weekly_pay))
}

pub fn total_weekly_hours(employees: &[Employee]) -> Decimal {
    saturating_sum(employees.iter().map(|e| e.weekly_hours))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Headcount {
    pub full: usize,
    pub part: usize,
}

impl Headcount {
    pub fn total(self) -> usize {
        self.full + self.part
    }
}

pub fn headcount_by_employment_type(employees: &[Employee]) -> Headcount {
    employees
        .iter()
        .fold(Headcount::default(), |mut acc, e| {
            match e.employment_type {
                EmploymentType::Full => acc.full += 1,
                EmploymentType::Part => acc.part += 1,
            }
            acc
        })
}

/// Unweighted mean of hourly rates.
pub fn average_hourly_rate(employees: &[Employee]) -> Metric {
    Metric::mean(employees.iter().map(|e| e.hourly_rate))
}

/// Days employed as of `as_of`. `None` without a start date or when the start
/// date lies after `as_of`.
pub fn tenure_days(employee: &Employee, as_of: NaiveDate) -> Option<i64> {
    let start = employee.start_date?;
    (start <= as_of).then(|| (as_of - start).num_days())
}

/// Mean tenure over the employees that have one.
pub fn average_tenure_days(employees: &[Employee], as_of: NaiveDate) -> Metric {
    Metric::mean(
        employees
            .iter()
            .filter_map(|e| tenure_days(e, as_of))
            .map(Decimal::from),
    )
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StaffingMetrics {
    pub headcount: Headcount,
    pub payroll_by_role: Vec<(String, Decimal)>,
    pub total_weekly_payroll: Decimal,
    pub total_weekly_hours: Decimal,
    pub average_hourly_rate: Metric,
    pub average_tenure_days: Metric,
}

pub fn summarize(employees: &[Employee], as_of: NaiveDate) -> StaffingMetrics {
    StaffingMetrics {
        headcount: headcount_by_employment_type(employees),
        payroll_by_role: payroll_by_role(employees),
        total_weekly_payroll: total_weekly_payroll(employees),
        total_weekly_hours: total_weekly_hours(employees),
        average_hourly_rate: average_hourly_rate(employees),
        average_tenure_days: average_tenure_days(employees, as_of),
    }
}
