//! Splits a row stream across sheets.
//!
//! Row 1 of every sheet holds the header; data starts at row 2. Once a sheet
//! holds `rows_per_sheet` data rows the next row opens `Sheet{n + 1}`.

use super::workbook::{CellAddress, WorkbookSink};
use crate::db::{CellValue, RawValue};
use crate::encoding::Transcoder;
use crate::error::{ExportError, Result};
use crate::labels::ColumnLabels;
use std::num::NonZeroU32;
use tracing::{debug, info};

/// First data row of every sheet.
pub const FIRST_DATA_ROW: u32 = 2;

/// Returns the name of the sheet with 1-based `index`.
pub fn sheet_name(index: u32) -> String {
    format!("Sheet{index}")
}

/// Writes header and data rows into a [`WorkbookSink`], opening sheets as needed.
pub struct SheetPaginator<'a, S: WorkbookSink> {
    sink: S,
    labels: &'a ColumnLabels,
    transcoder: Transcoder,
    rows_per_sheet: NonZeroU32,
    headers: Vec<String>,
    sheet_index: u32,
    row: u32,
    rows_written: u64,
}

impl<'a, S: WorkbookSink> SheetPaginator<'a, S> {
    /// Creates `Sheet1` and writes the converted header row into it.
    pub fn new(
        sink: S,
        labels: &'a ColumnLabels,
        transcoder: Transcoder,
        rows_per_sheet: NonZeroU32,
        columns: &[String],
    ) -> Result<Self> {
        if columns.len() > labels.len() {
            return Err(ExportError::config(format!(
                "Query returns {} columns but a sheet holds at most {}",
                columns.len(),
                labels.len()
            )));
        }

        let headers = columns
            .iter()
            .map(|name| transcoder.convert_text(name))
            .collect();

        let mut paginator = Self {
            sink,
            labels,
            transcoder,
            rows_per_sheet,
            headers,
            sheet_index: 1,
            row: FIRST_DATA_ROW,
            rows_written: 0,
        };
        paginator.start_sheet()?;
        Ok(paginator)
    }

    /// Writes one data row, starting a new sheet first when the current one is full.
    pub fn write_row(&mut self, values: &[RawValue]) -> Result<()> {
        if self.row - FIRST_DATA_ROW >= self.rows_per_sheet.get() {
            self.sheet_index += 1;
            self.start_sheet()?;
            self.row = FIRST_DATA_ROW;
        }

        for (column, value) in values.iter().enumerate() {
            let text = match value {
                Some(CellValue::Text(text)) => self.transcoder.convert_text(text),
                Some(CellValue::Bytes(bytes)) => self.transcoder.convert(bytes),
                None => self.transcoder.convert_nullable(None),
            };
            let cell = self.address(column, self.row)?;
            self.sink.write_cell(cell, &text)?;
        }
        info!(
            "Write sheet: {}, row: {} successful",
            self.sheet_index, self.row
        );

        self.row += 1;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of sheets created so far.
    pub fn sheet_count(&self) -> u32 {
        self.sheet_index
    }

    /// Number of data rows written across all sheets.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Marks the first sheet active and hands back the sink.
    pub fn finish(mut self) -> Result<S> {
        self.sink.set_active_sheet(0)?;
        Ok(self.sink)
    }

    fn start_sheet(&mut self) -> Result<()> {
        let name = sheet_name(self.sheet_index);
        self.sink.add_sheet(&name)?;
        if self.sheet_index > 1 {
            info!("Started sheet {name}");
        }

        for (column, header) in self.headers.iter().enumerate() {
            let cell = self.address(column, 1)?;
            self.sink.write_cell(cell, header)?;
        }
        if let (Some(first), Some(last)) = (
            self.labels.cell_ref(0, 1),
            self.headers
                .len()
                .checked_sub(1)
                .and_then(|i| self.labels.cell_ref(i, 1)),
        ) {
            debug!("Wrote header {first}:{last} on {name}");
        }
        Ok(())
    }

    fn address(&self, column: usize, row: u32) -> Result<CellAddress<'a>> {
        let label = self.labels.get(column).ok_or_else(|| {
            ExportError::config(format!(
                "Column {} exceeds the {} addressable columns",
                column + 1,
                self.labels.len()
            ))
        })?;
        Ok(CellAddress { column, label, row })
    }
}
