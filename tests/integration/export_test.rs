//! Export driver integration tests.
//!
//! Runs full exports against in-memory SQLite and inspects the saved workbook.

use super::{counting_query, read_member, worksheet_count, write_script};
use export_xlsx::config::RunConfig;
use export_xlsx::error::ExportError;
use export_xlsx::export::run_export;
use export_xlsx::labels::ColumnLabels;
use tempfile::tempdir;

fn config_for(dir: &std::path::Path, sql: &str, rows_per_sheet: u32) -> RunConfig {
    RunConfig::new("sqlite::memory:")
        .with_script_path(write_script(dir, sql))
        .with_output_path(dir.join("out.xlsx"))
        .with_rows_per_sheet(rows_per_sheet)
        .unwrap()
}

/// Scenario: result set no larger than the threshold
/// Then exactly one sheet is written
#[tokio::test]
async fn test_small_result_fits_one_sheet() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), &counting_query(5), 5);

    let summary = run_export(&config, &ColumnLabels::new()).await.unwrap();

    assert_eq!(summary.sheets, 1);
    assert_eq!(summary.rows, 5);
    assert_eq!(worksheet_count(&config.output_path), 1);
}

/// Scenario: threshold N with N + 1 rows
/// Then two sheets are written, each with a header row
#[tokio::test]
async fn test_threshold_plus_one_rows_paginates() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), &counting_query(4), 3);

    let summary = run_export(&config, &ColumnLabels::new()).await.unwrap();

    assert_eq!(summary.sheets, 2);
    assert_eq!(summary.rows, 4);
    assert_eq!(worksheet_count(&config.output_path), 2);

    let workbook = read_member(&config.output_path, "xl/workbook.xml").unwrap();
    assert!(workbook.contains(r#"name="Sheet1""#));
    assert!(workbook.contains(r#"name="Sheet2""#));

    // The second sheet holds the header in row 1 and the fourth row in row 2.
    let second = read_member(&config.output_path, "xl/worksheets/sheet2.xml").unwrap();
    assert!(second.contains(r#"r="A1""#));
    assert!(second.contains(r#"r="A2""#));
    assert!(!second.contains(r#"r="A3""#));
}

/// Scenario: empty result set
/// Then the header row is still written
#[tokio::test]
async fn test_empty_result_writes_header() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), "SELECT 1 AS id, 'a' AS name WHERE 1 = 0", 10);

    let summary = run_export(&config, &ColumnLabels::new()).await.unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(summary.sheets, 1);
    let strings = read_member(&config.output_path, "xl/sharedStrings.xml").unwrap();
    assert!(strings.contains(">id<"));
    assert!(strings.contains(">name<"));
}

/// Scenario: GBK bytes and NULL values
/// Then text is converted to UTF-8 and NULL becomes an empty cell value
#[tokio::test]
async fn test_values_are_converted_and_null_is_empty() {
    let dir = tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "SELECT x'D6D0CEC4' AS name, NULL AS missing",
        10,
    );

    run_export(&config, &ColumnLabels::new()).await.unwrap();

    let strings = read_member(&config.output_path, "xl/sharedStrings.xml").unwrap();
    assert!(strings.contains("中文"));
    assert!(!strings.to_lowercase().contains("null"));
}

/// Scenario: database cannot be opened
/// Then the export fails and no output file exists
#[tokio::test]
async fn test_unreachable_database_creates_no_file() {
    let dir = tempdir().unwrap();
    let missing_db = dir.path().join("nested").join("absent.db");
    let config = RunConfig::new(format!("sqlite://{}", missing_db.display()))
        .with_script_path(write_script(dir.path(), "SELECT 1"))
        .with_output_path(dir.path().join("out.xlsx"));

    let result = run_export(&config, &ColumnLabels::new()).await;

    assert!(matches!(result, Err(ExportError::Connection(_))));
    assert!(!config.output_path.exists());
}

/// Scenario: the script is not valid SQL
/// Then a query error is returned and no output file exists
#[tokio::test]
async fn test_invalid_sql_creates_no_file() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), "SELEC 1", 10);

    let result = run_export(&config, &ColumnLabels::new()).await;

    assert!(matches!(result, Err(ExportError::Query(_))));
    assert!(!config.output_path.exists());
}

/// Scenario: the cursor fails after some rows were streamed
/// Then a query error is returned and no output file exists
#[tokio::test]
async fn test_cursor_error_mid_stream_creates_no_file() {
    let dir = tempdir().unwrap();
    let sql = "WITH RECURSIVE cnt(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM cnt WHERE x < 5) \
               SELECT CASE WHEN x = 3 THEN abs(-9223372036854775807 - 1) ELSE x END AS id FROM cnt";
    let config = config_for(dir.path(), sql, 10);

    let result = run_export(&config, &ColumnLabels::new()).await;

    assert!(matches!(result, Err(ExportError::Query(_))), "{result:?}");
    assert!(!config.output_path.exists());
}

/// Scenario: non-ASCII text columns and headers with the default encodings
/// Then driver-decoded text is written unchanged
#[tokio::test]
async fn test_decoded_text_keeps_characters_with_default_encodings() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), "SELECT '中文' AS 名称", 10);

    run_export(&config, &ColumnLabels::new()).await.unwrap();

    let strings = read_member(&config.output_path, "xl/sharedStrings.xml").unwrap();
    assert!(strings.contains(">名称<"), "{strings}");
    assert!(strings.contains(">中文<"), "{strings}");
}

/// Scenario: result wider than the label table
/// Then the export is rejected before any row is written
#[tokio::test]
async fn test_too_many_columns_is_rejected() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), "SELECT 1 AS a, 2 AS b, 3 AS c", 10);

    let result = run_export(&config, &ColumnLabels::with_capacity(2)).await;

    assert!(matches!(result, Err(ExportError::Config(_))));
    assert!(!config.output_path.exists());
}

/// Scenario: UTF-8 database with an identity encoding pair
#[tokio::test]
async fn test_utf8_source_encoding() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), "SELECT 'café' AS word", 10)
        .with_encodings("utf-8", "utf-8")
        .unwrap();

    run_export(&config, &ColumnLabels::new()).await.unwrap();

    let strings = read_member(&config.output_path, "xl/sharedStrings.xml").unwrap();
    assert!(strings.contains("café"));
}
