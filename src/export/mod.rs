//! Export driver: runs the script and streams its rows into a workbook.

mod paginator;
mod workbook;

pub use paginator::{sheet_name, SheetPaginator, FIRST_DATA_ROW};
pub use workbook::{CellAddress, MemorySheet, MemoryWorkbook, WorkbookSink, XlsxSink};

use crate::config::RunConfig;
use crate::db;
use crate::error::{ExportError, Result};
use crate::labels::ColumnLabels;
use futures::TryStreamExt;
use sqlx::AnyConnection;
use sqlx::Statement;
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Sheets in the saved workbook.
    pub sheets: u32,
    /// Data rows written, headers excluded.
    pub rows: u64,
    /// Where the workbook was saved.
    pub output_path: PathBuf,
}

/// Runs the configured script and saves its result set as an xlsx workbook.
///
/// The output file is only created once every row has been written; any
/// earlier failure leaves the file system untouched.
pub async fn run_export(config: &RunConfig, labels: &ColumnLabels) -> Result<ExportSummary> {
    let sql = read_script(config).await?;

    info!("Connecting to {}", config.display_url());
    let mut conn = db::connect(&config.database_url).await?;

    let streamed = stream_rows(&mut conn, &sql, config, labels).await;
    let closed = db::close(conn).await;
    let streamed = match (streamed, closed) {
        (Ok(streamed), Ok(())) => streamed,
        (Ok(_), Err(close_err)) => return Err(close_err),
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                warn!("{close_err}");
            }
            return Err(e);
        }
    };

    streamed.sink.save(&config.output_path)?;
    info!("save file {} successful.", config.output_path.display());

    Ok(ExportSummary {
        sheets: streamed.sheets,
        rows: streamed.rows,
        output_path: config.output_path.clone(),
    })
}

/// Workbook filled from the cursor, not yet saved.
struct Streamed {
    sink: XlsxSink,
    sheets: u32,
    rows: u64,
}

async fn read_script(config: &RunConfig) -> Result<String> {
    tokio::fs::read_to_string(&config.script_path)
        .await
        .map_err(|e| {
            ExportError::io(format!(
                "Cannot read script {}: {e}",
                config.script_path.display()
            ))
        })
}

/// Executes `sql` and feeds every row to a paginator over an [`XlsxSink`].
async fn stream_rows(
    conn: &mut AnyConnection,
    sql: &str,
    config: &RunConfig,
    labels: &ColumnLabels,
) -> Result<Streamed> {
    let statement = db::prepare(conn, sql).await?;
    let columns = db::column_names(&statement);
    info!("Query returns {} columns", columns.len());

    let mut paginator = SheetPaginator::new(
        XlsxSink::new(),
        labels,
        config.transcoder,
        config.rows_per_sheet,
        &columns,
    )?;

    let mut cursor = statement.query().fetch(&mut *conn);
    while let Some(row) = cursor
        .try_next()
        .await
        .map_err(|e| ExportError::query(db::format_query_error(e)))?
    {
        let values = db::raw_row(&row)?;
        paginator.write_row(&values)?;
    }
    drop(cursor);

    let sheets = paginator.sheet_count();
    let rows = paginator.rows_written();
    Ok(Streamed {
        sink: paginator.finish()?,
        sheets,
        rows,
    })
}
