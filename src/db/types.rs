//! Raw row values handed from the cursor to the export driver.

use crate::error::{ExportError, Result};
use sqlx::any::AnyRow;
use sqlx::{Row as SqlxRow, TypeInfo, ValueRef};

/// A non-NULL column value as the driver handed it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Text the driver already decoded (text columns, rendered numbers).
    Text(String),
    /// Bytes still in the database's own encoding (blobs).
    Bytes(Vec<u8>),
}

/// One column value: `None` for SQL NULL.
pub type RawValue = Option<CellValue>;

/// One result row in column order.
pub type RawRow = Vec<RawValue>;

/// Extracts every column of `row` as raw bytes.
pub fn raw_row(row: &AnyRow) -> Result<RawRow> {
    (0..row.len()).map(|i| raw_value(row, i)).collect()
}

/// Extracts a single column value.
///
/// Blobs keep their bytes; numbers and booleans are rendered the way they
/// print in Rust (`42`, `2.5`, `true`).
fn raw_value(row: &AnyRow, index: usize) -> Result<RawValue> {
    let raw = row.try_get_raw(index).map_err(|e| decode_error(index, e))?;
    if raw.is_null() {
        return Ok(None);
    }
    let type_name = raw.type_info().name().to_uppercase();

    let value = match type_name.as_str() {
        "BOOLEAN" | "BOOL" => CellValue::Text(decode::<bool>(row, index)?.to_string()),
        "SMALLINT" => CellValue::Text(decode::<i16>(row, index)?.to_string()),
        "INTEGER" | "INT" => CellValue::Text(decode::<i32>(row, index)?.to_string()),
        "BIGINT" => CellValue::Text(decode::<i64>(row, index)?.to_string()),
        "REAL" => CellValue::Text(decode::<f32>(row, index)?.to_string()),
        "DOUBLE" => CellValue::Text(decode::<f64>(row, index)?.to_string()),
        "BLOB" => CellValue::Bytes(decode::<Vec<u8>>(row, index)?),
        _ => CellValue::Text(decode::<String>(row, index)?),
    };
    Ok(Some(value))
}

fn decode<'r, T>(row: &'r AnyRow, index: usize) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
{
    row.try_get::<T, _>(index).map_err(|e| decode_error(index, e))
}

fn decode_error(index: usize, error: sqlx::Error) -> ExportError {
    ExportError::query(format!("Failed to read column {}: {error}", index + 1))
}
