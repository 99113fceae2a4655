//! Database access for export_xlsx.
//!
//! Connections go through `sqlx::Any`, so the URL scheme (`postgres://`,
//! `mysql://`, `sqlite:`) selects the driver.

mod types;

pub use types::{raw_row, CellValue, RawRow, RawValue};

use crate::config::redact_url;
use crate::error::{ExportError, Result};
use sqlx::any::AnyStatement;
use sqlx::AnyConnection;
use sqlx::{Column as SqlxColumn, Connection, Executor, Statement};
use tracing::debug;

/// Opens a single connection to the database at `url`.
pub async fn connect(url: &str) -> Result<AnyConnection> {
    sqlx::any::install_default_drivers();

    debug!("Opening connection to {}", redact_url(url));
    AnyConnection::connect(url)
        .await
        .map_err(|e| map_connection_error(e, url))
}

/// Prepares `sql` verbatim as one statement.
pub async fn prepare<'q>(conn: &mut AnyConnection, sql: &'q str) -> Result<AnyStatement<'q>> {
    conn.prepare(sql)
        .await
        .map_err(|e| ExportError::query(format_query_error(e)))
}

/// Returns the ordered column names of a prepared statement.
pub fn column_names(statement: &AnyStatement<'_>) -> Vec<String> {
    statement
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect()
}

/// Closes the connection, waiting for the server to acknowledge.
pub async fn close(conn: AnyConnection) -> Result<()> {
    conn.close()
        .await
        .map_err(|e| ExportError::connection(format!("Failed to close connection: {e}")))
}

/// Maps sqlx connection errors to short messages.
fn map_connection_error(error: sqlx::Error, url: &str) -> ExportError {
    let target = redact_url(url);
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        ExportError::connection(format!(
            "Cannot connect to {target}. Check that the server is running."
        ))
    } else if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
        || error_str.contains("access denied")
    {
        ExportError::connection(format!(
            "Authentication failed for {target}. Check your credentials."
        ))
    } else if error_str.contains("no driver found") || error_str.contains("unsupported") {
        ExportError::connection(format!(
            "Unsupported connection URL {target}. Expected postgres://, mysql:// or sqlite:"
        ))
    } else {
        ExportError::connection(format!("{target}: {error}"))
    }
}

/// Formats a query error, keeping the driver's code when there is one.
pub(crate) fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => match db_error.code() {
            Some(code) => format!("ERROR {code}: {}", db_error.message()),
            None => format!("ERROR: {}", db_error.message()),
        },
        None => error.to_string(),
    }
}
