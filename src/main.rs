//! export_xlsx - Export the result of a SQL script into an xlsx workbook.

use export_xlsx::cli::{Cli, LoadOutcome};
use export_xlsx::error::Result;
use export_xlsx::export::run_export;
use export_xlsx::labels::ColumnLabels;
use export_xlsx::logging;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = match Cli::parse_args().load()? {
        LoadOutcome::Run(config) => config,
        LoadOutcome::Usage => {
            eprintln!("{}", Cli::usage());
            return Ok(());
        }
    };

    let labels = ColumnLabels::new();
    let summary = run_export(&config, &labels).await?;
    info!(
        "Exported {} rows into {} sheet(s) of {}",
        summary.rows,
        summary.sheets,
        summary.output_path.display()
    );

    Ok(())
}
