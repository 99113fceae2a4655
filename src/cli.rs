//! Command-line argument parsing for export_xlsx.
//!
//! Uses clap with short flags `-h -l -s -x -c`; the help flag is handled
//! here rather than by clap so usage always goes to stderr.

use crate::config::{
    RunConfig, DEFAULT_OUTPUT_PATH, DEFAULT_ROWS_PER_SHEET, DEFAULT_SCRIPT_PATH,
    MAX_ROWS_PER_SHEET,
};
use crate::encoding::{DEFAULT_SOURCE_ENCODING, DEFAULT_TARGET_ENCODING};
use crate::error::Result;
use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// Export the result of a SQL script into an xlsx workbook.
#[derive(Parser, Debug)]
#[command(name = "export_xlsx")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true)]
#[command(
    override_usage = "export_xlsx -l <DATABASE_URL> [-s <SCRIPT>] [-x <OUTPUT>] [-c <ROWS_PER_SHEET>]"
)]
pub struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,

    /// Database connection URL: postgres://, mysql:// or sqlite: (Oracle
    /// user/password@host:port/sid descriptors are not accepted)
    #[arg(
        short = 'l',
        long = "url",
        value_name = "DATABASE_URL",
        env = "EXPORT_XLSX_DATABASE_URL",
        hide_env_values = true
    )]
    pub database_url: Option<String>,

    /// SQL script path
    #[arg(short = 's', long = "script", value_name = "SCRIPT", default_value = DEFAULT_SCRIPT_PATH)]
    pub script: PathBuf,

    /// Output xlsx file path
    #[arg(short = 'x', long = "output", value_name = "OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Data rows per sheet before a new sheet is started
    #[arg(
        short = 'c',
        long = "count",
        value_name = "ROWS_PER_SHEET",
        default_value_t = DEFAULT_ROWS_PER_SHEET,
        value_parser = clap::value_parser!(u32).range(1..=MAX_ROWS_PER_SHEET as i64)
    )]
    pub rows_per_sheet: u32,

    /// Encoding of blob bytes holding text; decoded text columns skip it
    #[arg(
        long,
        value_name = "LABEL",
        env = "EXPORT_XLSX_SOURCE_ENCODING",
        default_value = DEFAULT_SOURCE_ENCODING
    )]
    pub source_encoding: String,

    /// Encoding of text written into the workbook
    #[arg(
        long,
        value_name = "LABEL",
        env = "EXPORT_XLSX_TARGET_ENCODING",
        default_value = DEFAULT_TARGET_ENCODING
    )]
    pub target_encoding: String,
}

/// What the binary should do after reading its arguments.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Run an export with this configuration.
    Run(RunConfig),
    /// Print usage and stop without touching the database or file system.
    Usage,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns true when usage should be printed instead of running.
    pub fn wants_usage(&self) -> bool {
        self.help
            || self
                .database_url
                .as_deref()
                .map_or(true, |url| url.trim().is_empty())
    }

    /// Converts the arguments into a validated run configuration.
    pub fn load(self) -> Result<LoadOutcome> {
        if self.wants_usage() {
            return Ok(LoadOutcome::Usage);
        }
        let Some(database_url) = self.database_url else {
            return Ok(LoadOutcome::Usage);
        };

        let config = RunConfig::new(database_url.trim())
            .with_script_path(self.script)
            .with_output_path(self.output)
            .with_rows_per_sheet(self.rows_per_sheet)?
            .with_encodings(&self.source_encoding, &self.target_encoding)?;

        Ok(LoadOutcome::Run(config))
    }

    /// Renders the usage text printed for `-h` or a missing URL.
    pub fn usage() -> String {
        let version = env!("CARGO_PKG_VERSION");
        let help = Self::command().render_help();
        format!("export_xlsx version: export_xlsx/{version}\n{help}")
    }
}
