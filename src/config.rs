//! Run configuration for an export.
//!
//! A [`RunConfig`] is assembled once from the command line (see `cli`) and
//! stays unchanged for the rest of the process.

use crate::encoding::Transcoder;
use crate::error::{ExportError, Result};
use std::num::NonZeroU32;
use std::path::PathBuf;
use url::Url;

/// Default SQL script path.
pub const DEFAULT_SCRIPT_PATH: &str = "1.txt";

/// Default output workbook path.
pub const DEFAULT_OUTPUT_PATH: &str = "1.xlsx";

/// Default number of data rows per sheet.
pub const DEFAULT_ROWS_PER_SHEET: u32 = 1_000_000;

const DEFAULT_THRESHOLD: NonZeroU32 = match NonZeroU32::new(DEFAULT_ROWS_PER_SHEET) {
    Some(rows) => rows,
    None => panic!("DEFAULT_ROWS_PER_SHEET must be non-zero"),
};

/// Largest rows-per-sheet value an xlsx sheet can hold below its header row.
pub const MAX_ROWS_PER_SHEET: u32 = 1_048_575;

/// Validated configuration for one export run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Database connection URL (`postgres://`, `mysql://`, `sqlite:`).
    pub database_url: String,

    /// File holding the single SQL statement to run.
    pub script_path: PathBuf,

    /// Destination workbook.
    pub output_path: PathBuf,

    /// Data rows written to one sheet before the next sheet is started.
    pub rows_per_sheet: NonZeroU32,

    /// Encoding pair applied to every header and cell.
    pub transcoder: Transcoder,
}

impl RunConfig {
    /// Creates a config with default paths, page size and encodings.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            script_path: PathBuf::from(DEFAULT_SCRIPT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            rows_per_sheet: DEFAULT_THRESHOLD,
            transcoder: Transcoder::default(),
        }
    }

    pub fn with_script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Sets the sheet threshold; accepts `1..=MAX_ROWS_PER_SHEET`.
    pub fn with_rows_per_sheet(mut self, rows: u32) -> Result<Self> {
        self.rows_per_sheet = NonZeroU32::new(rows)
            .filter(|rows| rows.get() <= MAX_ROWS_PER_SHEET)
            .ok_or_else(|| {
                ExportError::config(format!(
                    "rows per sheet must be between 1 and {MAX_ROWS_PER_SHEET}, got {rows}"
                ))
            })?;
        Ok(self)
    }

    /// Sets the encoding pair from two labels.
    pub fn with_encodings(mut self, source: &str, target: &str) -> Result<Self> {
        self.transcoder = Transcoder::new(source, target)?;
        Ok(self)
    }

    /// Returns the connection target with any password masked.
    pub fn display_url(&self) -> String {
        redact_url(&self.database_url)
    }
}

/// Masks the password component of a connection URL.
///
/// Strings that do not parse as URLs (for example Oracle-style
/// `user/password@host` descriptors) are cut at the last `@`.
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() && url.set_password(Some("***")).is_err() {
                return format!("{}://***", url.scheme());
            }
            url.to_string()
        }
        Err(_) => match raw.rsplit_once('@') {
            Some((_, host)) => format!("***@{host}"),
            None => raw.to_string(),
        },
    }
}
