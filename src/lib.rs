//! export_xlsx - Export the result of a SQL script into an xlsx workbook.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod encoding;
pub mod error;
pub mod export;
pub mod labels;
pub mod logging;
