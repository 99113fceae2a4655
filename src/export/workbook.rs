//! Workbook backends.
//!
//! [`XlsxSink`] builds a real xlsx document with rust_xlsxwriter;
//! [`MemoryWorkbook`] keeps cells in maps so exports can be inspected in tests.

use crate::error::{ExportError, Result};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet, XlsxError};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A cell position: zero-based column index, its label, and 1-based row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAddress<'a> {
    pub column: usize,
    pub label: &'a str,
    pub row: u32,
}

impl fmt::Display for CellAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label, self.row)
    }
}

/// Destination for exported sheets and cells.
pub trait WorkbookSink {
    /// Appends a new sheet; later cells go into it.
    fn add_sheet(&mut self, name: &str) -> Result<()>;

    /// Writes a text value into the current sheet.
    fn write_cell(&mut self, cell: CellAddress<'_>, value: &str) -> Result<()>;

    /// Marks the sheet at zero-based `index` as the one shown on open.
    fn set_active_sheet(&mut self, index: usize) -> Result<()>;
}

/// xlsx document built in memory and written out once by [`XlsxSink::save`].
pub struct XlsxSink {
    workbook: Workbook,
    current: Option<Worksheet>,
    sheet_count: usize,
    active: usize,
}

impl XlsxSink {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            current: None,
            sheet_count: 0,
            active: 0,
        }
    }

    /// Moves the sheet being filled into the workbook.
    fn flush_current(&mut self) {
        if let Some(worksheet) = self.current.take() {
            self.workbook.push_worksheet(worksheet);
        }
    }

    /// Serializes the workbook to `path`.
    ///
    /// The document goes to a temporary file next to `path` first and is
    /// renamed into place, so a failed save never leaves a truncated file.
    pub fn save(mut self, path: &Path) -> Result<()> {
        self.flush_current();
        if self.sheet_count == 0 {
            return Err(ExportError::internal("Cannot save a workbook without sheets"));
        }
        self.workbook
            .worksheet_from_index(self.active)?
            .set_active(true);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::Builder::new()
            .prefix(".export_xlsx")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| {
                ExportError::io(format!(
                    "Cannot create temporary file in {}: {e}",
                    dir.display()
                ))
            })?;

        self.workbook.save_to_writer(tmp.as_file_mut())?;

        tmp.persist(path).map_err(|e| {
            ExportError::io(format!("Cannot write {}: {}", path.display(), e.error))
        })?;
        Ok(())
    }
}

impl Default for XlsxSink {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookSink for XlsxSink {
    fn add_sheet(&mut self, name: &str) -> Result<()> {
        self.flush_current();
        let mut worksheet = Worksheet::new();
        worksheet.set_name(name)?;
        self.current = Some(worksheet);
        self.sheet_count += 1;
        Ok(())
    }

    fn write_cell(&mut self, cell: CellAddress<'_>, value: &str) -> Result<()> {
        let worksheet = self
            .current
            .as_mut()
            .ok_or_else(|| ExportError::internal(format!("No sheet to write {cell} into")))?;
        let col = ColNum::try_from(cell.column).map_err(|_| XlsxError::RowColumnLimitError)?;
        let row: RowNum = cell
            .row
            .checked_sub(1)
            .ok_or_else(|| ExportError::internal(format!("Invalid row in cell {cell}")))?;
        worksheet.write_string(row, col, value)?;
        Ok(())
    }

    fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.sheet_count {
            return Err(ExportError::internal(format!(
                "Sheet index {index} out of range ({} sheets)",
                self.sheet_count
            )));
        }
        self.active = index;
        Ok(())
    }
}

/// One sheet of a [`MemoryWorkbook`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    pub name: String,
    cells: HashMap<String, String>,
    last_row: u32,
}

impl MemorySheet {
    /// Returns the value at an A1-style reference such as `B2`.
    pub fn cell(&self, reference: &str) -> Option<&str> {
        self.cells.get(reference).map(String::as_str)
    }

    /// Highest row number written, 0 when empty.
    pub fn last_row(&self) -> u32 {
        self.last_row
    }
}

/// Workbook that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
    active: usize,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn active_sheet(&self) -> usize {
        self.active
    }
}

impl WorkbookSink for MemoryWorkbook {
    fn add_sheet(&mut self, name: &str) -> Result<()> {
        if self.sheet(name).is_some() {
            return Err(ExportError::workbook(format!(
                "Sheet name '{name}' is already in use"
            )));
        }
        self.sheets.push(MemorySheet {
            name: name.to_string(),
            ..Default::default()
        });
        Ok(())
    }

    fn write_cell(&mut self, cell: CellAddress<'_>, value: &str) -> Result<()> {
        let sheet = self
            .sheets
            .last_mut()
            .ok_or_else(|| ExportError::internal(format!("No sheet to write {cell} into")))?;
        sheet.cells.insert(cell.to_string(), value.to_string());
        sheet.last_row = sheet.last_row.max(cell.row);
        Ok(())
    }

    fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.sheets.len() {
            return Err(ExportError::internal(format!(
                "Sheet index {index} out of range ({} sheets)",
                self.sheets.len()
            )));
        }
        self.active = index;
        Ok(())
    }
}
