use std::collections::HashMap;

use serde::Serialize;

use crate::error::DriverError;

/// Text written in place of a SQL NULL.
///
/// A text cell holding the four characters `NULL` renders the same way; the
/// two are only distinguishable before materialization.
pub const NULL_MARKER: &str = "NULL";

/// Display-ready result of one query.
///
/// Column order is preserved in [`columns`](QueryResult::columns); each row
/// maps every column name to its text, or [`NULL_MARKER`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

impl QueryResult {
    /// Build a result from driver-scanned text cells (`None` = SQL NULL).
    ///
    /// # Errors
    /// Returns `DriverError::Other` if a row does not have one cell per column.
    pub fn from_text_rows(
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, DriverError> {
        let mut raw = RawRowSet::new(columns);
        for row in rows {
            raw.push(row)?;
        }
        Ok(raw.materialize())
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[HashMap<String, String>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of row `index` in column order.
    #[must_use]
    pub fn row_values(&self, index: usize) -> Option<Vec<&str>> {
        let row = self.rows.get(index)?;
        Some(
            self.columns
                .iter()
                .map(|column| row.get(column).map_or(NULL_MARKER, String::as_str))
                .collect(),
        )
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<HashMap<String, String>>) {
        (self.columns, self.rows)
    }
}

/// Rows as scanned from a driver, before the NULL marker is applied.
#[derive(Debug, Default)]
pub(crate) struct RawRowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawRowSet {
    pub(crate) fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.columns.len()
    }

    pub(crate) fn push(&mut self, cells: Vec<Option<String>>) -> Result<(), DriverError> {
        if cells.len() != self.columns.len() {
            return Err(DriverError::Other(format!(
                "row has {} values but the result has {} columns",
                cells.len(),
                self.columns.len()
            )));
        }
        self.rows.push(cells);
        Ok(())
    }

    pub(crate) fn materialize(self) -> QueryResult {
        let RawRowSet { columns, rows } = self;
        let rows = rows
            .into_iter()
            .map(|cells| {
                columns
                    .iter()
                    .zip(cells)
                    .map(|(column, cell)| {
                        (
                            column.clone(),
                            cell.unwrap_or_else(|| NULL_MARKER.to_string()),
                        )
                    })
                    .collect::<HashMap<_, _>>()
            })
            .collect();
        QueryResult { columns, rows }
    }
}
