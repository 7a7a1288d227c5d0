use futures_util::TryStreamExt;
use sqlx::mysql::{MySql, MySqlConnection, MySqlRow};
use sqlx::{Column, Decode, Either, Executor, Row, ValueRef};

use crate::error::{DbClientError, DriverError};
use crate::results::RawRowSet;

/// Run `sql` over the text protocol and collect the first row set.
///
/// A statement that yields no rows still counts as a row set when the server
/// can describe its columns (an empty SELECT); otherwise it returns `Ok(None)`.
///
/// # Errors
/// `QueryExecution` if the server rejects the statement, `ColumnRead` if a row
/// width changes mid-result, `RowScan` if a cell cannot be read.
pub(crate) async fn fetch_text(
    conn: &mut MySqlConnection,
    sql: &str,
) -> Result<Option<RawRowSet>, DbClientError> {
    let mut row_set: Option<RawRowSet> = None;
    {
        let mut stream = sqlx::raw_sql(sql).fetch_many(&mut *conn);
        while let Some(step) = stream
            .try_next()
            .await
            .map_err(|e| DbClientError::QueryExecution(e.into()))?
        {
            match step {
                Either::Left(_done) => {
                    // only the first statement's rows are shown
                    if row_set.is_some() {
                        break;
                    }
                }
                Either::Right(row) => {
                    let set = row_set.get_or_insert_with(|| RawRowSet::new(column_names(&row)));
                    if row.len() != set.width() {
                        return Err(DbClientError::ColumnRead(DriverError::Other(format!(
                            "row has {} columns but the result set has {}",
                            row.len(),
                            set.width()
                        ))));
                    }
                    let cells = scan_row(&row).map_err(|e| DbClientError::RowScan(e.into()))?;
                    set.push(cells).map_err(DbClientError::RowScan)?;
                }
            }
        }
    }

    if row_set.is_some() {
        return Ok(row_set);
    }
    Ok(describe_columns(conn, sql).await.map(RawRowSet::new))
}

fn column_names(row: &MySqlRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

// Column metadata for a statement that returned no rows. Statements that
// cannot be prepared (or have no result columns) have no row set.
async fn describe_columns(conn: &mut MySqlConnection, sql: &str) -> Option<Vec<String>> {
    match Executor::describe(&mut *conn, sql).await {
        Ok(described) if !described.columns().is_empty() => Some(
            described
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        ),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "describe failed, treating statement as rowless");
            None
        }
    }
}

fn scan_row(row: &MySqlRow) -> Result<Vec<Option<String>>, sqlx::Error> {
    (0..row.len()).map(|idx| scan_cell(row, idx)).collect()
}

// Text-protocol cells are the server's text rendering of the value.
fn scan_cell(row: &MySqlRow, idx: usize) -> Result<Option<String>, sqlx::Error> {
    let value = row.try_get_raw(idx)?;
    if value.is_null() {
        return Ok(None);
    }
    let bytes = <&[u8] as Decode<'_, MySql>>::decode(value).map_err(sqlx::Error::Decode)?;
    Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
}
