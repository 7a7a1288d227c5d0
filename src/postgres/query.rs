use tokio_postgres::{Client, SimpleQueryMessage, SimpleQueryRow};

use crate::error::{DbClientError, DriverError};
use crate::results::RawRowSet;

/// Run `sql` over the simple-query protocol and collect the first row set
/// as text.
///
/// Returns `Ok(None)` when the statement produced no row description
/// (DDL/DML without `RETURNING`). Every value arrives in its text form, so a
/// SQL NULL (`None`) stays distinct from the string `NULL`.
///
/// # Errors
/// `QueryExecution` if the server rejects the statement, `ColumnRead` if a row
/// disagrees with its description, `RowScan` if a cell cannot be read.
pub(crate) async fn fetch_text(
    client: &Client,
    sql: &str,
) -> Result<Option<RawRowSet>, DbClientError> {
    let messages = client
        .simple_query(sql)
        .await
        .map_err(|e| DbClientError::QueryExecution(e.into()))?;

    let mut row_set: Option<RawRowSet> = None;
    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(columns) => {
                if row_set.is_some() {
                    break;
                }
                let names = columns.iter().map(|c| c.name().to_string()).collect();
                row_set = Some(RawRowSet::new(names));
            }
            SimpleQueryMessage::Row(row) => {
                let set = row_set.get_or_insert_with(|| {
                    RawRowSet::new(row.columns().iter().map(|c| c.name().to_string()).collect())
                });
                if row.len() != set.width() {
                    return Err(DbClientError::ColumnRead(DriverError::Other(format!(
                        "row has {} columns but the description lists {}",
                        row.len(),
                        set.width()
                    ))));
                }
                let cells = scan_row(&row).map_err(|e| DbClientError::RowScan(e.into()))?;
                set.push(cells).map_err(DbClientError::RowScan)?;
            }
            SimpleQueryMessage::CommandComplete(_) => {
                // only the first statement's rows are shown
                if row_set.is_some() {
                    break;
                }
            }
            _ => {}
        }
    }

    Ok(row_set)
}

fn scan_row(row: &SimpleQueryRow) -> Result<Vec<Option<String>>, tokio_postgres::Error> {
    (0..row.len())
        .map(|idx| row.try_get(idx).map(|cell| cell.map(str::to_string)))
        .collect()
}
