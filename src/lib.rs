//! # Comanda - Restaurant Workbook Reporting
//!
//! Comanda reads a restaurant's operating workbook (menu, monthly sales per
//! year, staff) and turns it into validated tables and dashboard metrics.
//!
//! ## Quick Start
//!
//! ```no_run
//! use comanda::config::SheetNames;
//! use comanda::metrics::MetricsOptions;
//! use comanda::snapshot::Snapshot;
//!
//! let snapshot = Snapshot::load("restaurant.xlsx".as_ref(), &SheetNames::default())?;
//! if let Some(year) = snapshot.latest_year() {
//!     let today = chrono::Utc::now().date_naive();
//!     let bundle = snapshot.metrics(year, &MetricsOptions::new(today));
//!     println!("{year}: {}", comanda::utils::fmt_money(bundle.sales.total));
//! }
//! # Ok::<(), comanda::error::ComandaError>(())
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! .xlsx ──> workbook::load_workbook ──> RawWorkbook (untyped cells)
//!                                          │
//!                   normalize::normalize_workbook
//!                                          │
//!                                          v
//!                            NormalizedTables + report ──> Snapshot
//!                                                             │
//!                                        metrics::compute_metrics(year)
//!                                                             │
//!                                                             v
//!                                      MetricsBundle ──> report / export
//! ```
//!
//! ## Core Modules
//!
//! - [`workbook`]: reading the spreadsheet into untyped cells, plus a
//!   load-once cache
//! - [`normalize`]: sheet location, header resolution and cell coercion
//! - [`metrics`]: pure functions from tables to figures; zero denominators
//!   give [`metrics::Metric::Undefined`]
//! - [`snapshot`]: immutable load results and an atomically swapped store
//! - [`export`]: CSV artifacts for sales and menu
//! - [`report`]: Markdown rendering of the four dashboard views
//! - [`config`], [`logging`], [`error`]: ambient plumbing

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod report;
pub mod snapshot;
pub mod utils;
pub mod workbook;
