//! Header-row resolution.
//!
//! Workbook revisions move header rows around, repeat them, and rename
//! columns. Instead of assuming a row index, each sheet declares the columns
//! it needs as [`ColumnSpec`]s and [`resolve_header`] finds the first row that
//! names all required ones, returning a [`HeaderMap`] or
//! [`ComandaError::MissingColumns`].

use crate::error::{ComandaError, Result};
use crate::workbook::{Cell, RawSheet};
use tracing::debug;

/// A logical column and the header labels it goes by.
#[derive(Clone, Copy, Debug)]
pub struct ColumnSpec {
    pub field: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

/// Lowercases and drops everything that is not a letter or digit, so
/// `Food Item`, `food_item` and `FoodItem` compare equal.
pub fn standardise_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn spec_matches(spec: &ColumnSpec, label: &str) -> bool {
    spec.aliases
        .iter()
        .any(|alias| standardise_label(alias) == label)
}

/// Resolved header: the row it sits on and where each field lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderMap {
    pub row: usize,
    columns: Vec<(&'static str, usize)>,
}

impl HeaderMap {
    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
    }

    pub fn has(&self, field: &str) -> bool {
        self.column(field).is_some()
    }

    /// The row's cell for `field`; `None` if the column is absent or the row
    /// is shorter than the header.
    pub fn cell<'a>(&self, row: &'a [Cell], field: &str) -> Option<&'a Cell> {
        row.get(self.column(field)?)
    }

    /// True when the row repeats the header labels, e.g. a duplicated header.
    pub fn is_header_echo(&self, row: &[Cell], specs: &[ColumnSpec]) -> bool {
        self.columns.iter().all(|(field, idx)| {
            let label = row
                .get(*idx)
                .and_then(Cell::as_text)
                .map(standardise_label)
                .unwrap_or_default();
            specs
                .iter()
                .find(|s| s.field == *field)
                .is_some_and(|spec| spec_matches(spec, &label))
        })
    }
}

fn match_row(row: &[Cell], specs: &[ColumnSpec]) -> Vec<(&'static str, usize)> {
    let labels: Vec<(usize, String)> = row
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| cell.as_text().map(|t| (idx, standardise_label(t))))
        .filter(|(_, label)| !label.is_empty())
        .collect();

    let mut columns: Vec<(&'static str, usize)> = Vec::new();
    for spec in specs {
        let found = labels.iter().find(|(idx, label)| {
            spec_matches(spec, label) && !columns.iter().any(|(_, taken)| taken == idx)
        });
        if let Some((idx, _)) = found {
            columns.push((spec.field, *idx));
        }
    }
    columns
}

/// Finds the first row naming every required column.
///
/// # Errors
///
/// Returns [`ComandaError::MissingColumns`] listing the required fields absent
/// from the best candidate row.
pub fn resolve_header(sheet: &RawSheet, specs: &[ColumnSpec]) -> Result<HeaderMap> {
    let required: Vec<&ColumnSpec> = specs.iter().filter(|s| s.required).collect();
    let mut best: Vec<(&'static str, usize)> = Vec::new();

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let columns = match_row(row, specs);
        let found_required = required
            .iter()
            .filter(|spec| columns.iter().any(|(f, _)| *f == spec.field))
            .count();

        if found_required == required.len() {
            debug!(sheet = %sheet.name, row = row_idx + 1, ?columns, "Resolved header row");
            return Ok(HeaderMap {
                row: row_idx,
                columns,
            });
        }

        let best_required = required
            .iter()
            .filter(|spec| best.iter().any(|(f, _)| *f == spec.field))
            .count();
        if found_required > best_required {
            best = columns;
        }
    }

    let missing = required
        .iter()
        .filter(|spec| !best.iter().any(|(f, _)| *f == spec.field))
        .map(|spec| spec.field.to_owned())
        .collect();

    Err(ComandaError::MissingColumns {
        sheet: sheet.name.clone(),
        missing,
    })
}
