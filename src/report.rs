//! Markdown rendering of a [`MetricsBundle`].
//!
//! Undefined metrics are printed as `N/A`; a workbook without employees gets
//! a placeholder instead of a staffing section.

use crate::error::LoadFailure;
use crate::metrics::MetricsBundle;
use crate::metrics::financials::FinancialMetrics;
use crate::metrics::menu::MenuMetrics;
use crate::metrics::sales::SalesMetrics;
use crate::metrics::staffing::StaffingMetrics;
use crate::normalize::NormalizationReport;
use crate::utils::{fmt_money, fmt_money_metric, fmt_opt, fmt_percent};
use clap::ValueEnum;

/// Which dashboard view to render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    Sales,
    Menu,
    Staffing,
    Financials,
    #[default]
    All,
}

impl View {
    fn includes(self, other: Self) -> bool {
        self == Self::All || self == other
    }
}

/// Render one view (or all four) as Markdown.
pub fn render_markdown(bundle: &MetricsBundle, view: View) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Restaurant Report: {}\n\n", bundle.year));

    if view.includes(View::Sales) {
        render_sales(&mut md, &bundle.sales);
    }
    if view.includes(View::Menu) {
        render_menu(&mut md, &bundle.menu);
    }
    if view.includes(View::Staffing) {
        md.push_str("## Staffing\n\n");
        match &bundle.staffing {
            Some(staffing) => render_staffing(&mut md, staffing),
            None => md.push_str("*No staffing data in this workbook.*\n\n"),
        }
    }
    if view.includes(View::Financials) {
        render_financials(&mut md, &bundle.financials);
    }

    md
}

fn render_sales(md: &mut String, sales: &SalesMetrics) {
    md.push_str("## Sales\n\n");
    md.push_str(&format!("**Total Sales:** {}  \n", fmt_money(sales.total)));
    md.push_str(&format!(
        "**Average Monthly Sales:** {}  \n",
        fmt_money_metric(sales.average_monthly)
    ));
    md.push_str(&format!(
        "**Year-over-Year Growth:** {}  \n",
        fmt_percent(sales.year_over_year_growth)
    ));
    md.push_str(&format!("**Peak Month:** {}  \n", fmt_opt(sales.peak_month)));
    md.push_str(&format!("**Lowest Month:** {}\n\n", fmt_opt(sales.lowest_month)));

    if sales.monthly.is_empty() {
        md.push_str("*No sales recorded for this year.*\n\n");
        return;
    }

    md.push_str("| Month | Sales | MoM Growth |\n");
    md.push_str("|-------|------:|-----------:|\n");
    for ((month, amount), (_, growth)) in sales.monthly.iter().zip(&sales.month_over_month) {
        md.push_str(&format!(
            "| {month} | {} | {} |\n",
            fmt_money(*amount),
            fmt_percent(*growth)
        ));
    }
    md.push('\n');

    md.push_str("| Quarter | Sales |\n");
    md.push_str("|---------|------:|\n");
    for (i, total) in sales.quarterly.iter().enumerate() {
        md.push_str(&format!("| Q{} | {} |\n", i + 1, fmt_money(*total)));
    }
    md.push('\n');
}

fn render_menu(md: &mut String, menu: &MenuMetrics) {
    md.push_str("## Menu\n\n");

    if menu.prices.count == 0 {
        md.push_str("*No menu items.*\n\n");
        return;
    }

    md.push_str(&format!("**Items:** {}  \n", menu.prices.count));
    md.push_str(&format!(
        "**Price Range:** {} to {}  \n",
        fmt_opt(menu.prices.min.map(fmt_money)),
        fmt_opt(menu.prices.max.map(fmt_money))
    ));
    md.push_str(&format!(
        "**Mean / Median Price:** {} / {}  \n",
        fmt_money_metric(menu.prices.mean),
        fmt_money_metric(menu.prices.median)
    ));
    md.push_str(&format!(
        "**Vegetarian Share:** {}\n\n",
        fmt_percent(menu.vegetarian_share)
    ));

    md.push_str("| Category | Items | Vegetarian | Min | Max | Average |\n");
    md.push_str("|----------|------:|-----------:|----:|----:|--------:|\n");
    for c in &menu.categories {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            c.category,
            c.items,
            c.vegetarian,
            fmt_money(c.min_price),
            fmt_money(c.max_price),
            fmt_money_metric(c.average_price)
        ));
    }
    md.push('\n');

    md.push_str("### Price Distribution\n\n");
    md.push_str("| Range | Items |\n");
    md.push_str("|-------|------:|\n");
    for bucket in &menu.price_distribution.buckets {
        md.push_str(&format!(
            "| {} to {} | {} |\n",
            fmt_money(bucket.lower),
            fmt_money(bucket.upper),
            bucket.count
        ));
    }
    md.push('\n');
}

fn render_staffing(md: &mut String, staffing: &StaffingMetrics) {
    md.push_str(&format!(
        "**Headcount:** {} ({} full-time, {} part-time)  \n",
        staffing.headcount.total(),
        staffing.headcount.full,
        staffing.headcount.part
    ));
    md.push_str(&format!(
        "**Weekly Payroll:** {}  \n",
        fmt_money(staffing.total_weekly_payroll)
    ));
    md.push_str(&format!(
        "**Weekly Hours:** {}  \n",
        staffing.total_weekly_hours.normalize()
    ));
    md.push_str(&format!(
        "**Average Hourly Rate:** {}  \n",
        fmt_money_metric(staffing.average_hourly_rate)
    ));
    md.push_str(&format!(
        "**Average Tenure (days):** {}\n\n",
        staffing.average_tenure_days.round_dp(0)
    ));

    md.push_str("| Role | Weekly Payroll |\n");
    md.push_str("|------|---------------:|\n");
    for (role, total) in &staffing.payroll_by_role {
        md.push_str(&format!("| {role} | {} |\n", fmt_money(*total)));
    }
    md.push('\n');
}

fn render_financials(md: &mut String, fin: &FinancialMetrics) {
    md.push_str("## Financials\n\n");
    md.push_str(&format!("**Annual Sales:** {}  \n", fmt_money(fin.annual_sales)));
    md.push_str(&format!(
        "**Estimated Monthly Payroll:** {}  \n",
        fin.monthly_payroll_estimate
            .map_or_else(|| "N/A".to_owned(), fmt_money)
    ));
    md.push_str(&format!(
        "**Labor Cost:** {} of sales  \n",
        fmt_percent(fin.labor_cost_percent)
    ));
    md.push_str(&format!(
        "**Sales per Labor Hour:** {}\n\n",
        fmt_money_metric(fin.sales_per_labor_hour)
    ));

    if fin.monthly.is_empty() {
        return;
    }

    md.push_str("| Month | Sales | Labor Cost | Sales / Labor Hour |\n");
    md.push_str("|-------|------:|-----------:|-------------------:|\n");
    for m in &fin.monthly {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            m.month,
            fmt_money(m.sales),
            fmt_percent(m.labor_cost_percent),
            fmt_money_metric(m.sales_per_labor_hour)
        ));
    }
    md.push('\n');
}

/// Summary of what a load kept and dropped.
pub fn render_normalization(report: &NormalizationReport) -> String {
    let mut md = String::new();

    md.push_str("# Workbook Check\n\n");
    let years: Vec<String> = report.sales_years.iter().map(ToString::to_string).collect();
    md.push_str(&format!("**Sales Years:** {}  \n", years.join(", ")));
    md.push_str(&format!("**Menu Items:** {}  \n", report.menu_items));
    if report.dropped_menu_rows() > 0 {
        md.push_str(&format!(
            "**Dropped Menu Rows:** {} ({} missing name or category, {} invalid price)  \n",
            report.dropped_menu_rows(),
            report.menu_rows_missing_fields,
            report.menu_rows_invalid_price
        ));
    }
    if report.employees_sheet_present {
        md.push_str(&format!("**Employees:** {}  \n", report.employees));
        md.push_str(&format!(
            "**Start Dates:** {}\n",
            if report.start_dates_present { "present" } else { "absent" }
        ));
    } else {
        md.push_str("**Employees:** no employees sheet\n");
    }

    md
}

/// Actionable message for a failed load.
pub fn render_load_failure(failure: &LoadFailure) -> String {
    format!(
        "Could not load the workbook ({}).\n\n{}\n\nExpected: {}\n",
        failure.kind, failure.detail, failure.expected
    )
}
