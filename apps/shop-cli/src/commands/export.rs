//! # Export Commands
//!
//! Writes the inventory or sales report as CSV: the detail rows with a
//! header line, a blank line, then the one-row summary with its own header.

use chrono::Utc;
use murick_core::report::export_file_name;
use murick_core::{InventoryReport, SalesReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::sale_filter;
use crate::cli::ExportCommand;
use crate::error::CliResult;
use crate::output::CommandOutput;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ExportResult {
    path: PathBuf,
    rows: usize,
}

pub async fn run(state: &AppState, command: ExportCommand) -> CliResult<CommandOutput> {
    let now = Utc::now();
    let shop = state.shops().snapshot(&state.shop_id).await?;

    let (path, rows) = match command {
        ExportCommand::Inventory { out } => {
            let report = InventoryReport::build(&shop.ledger, &shop.config, now)?;
            let path = out.unwrap_or_else(|| export_file_name(&shop.config, "Inventory", now, "csv").into());
            write_file(&path, &to_csv(&report.rows, &report.summary)?)?;
            (path, report.rows.len())
        }

        ExportCommand::Sales { out, filter } => {
            let filter = sale_filter(&filter, now)?;
            let report = SalesReport::build(&shop.ledger, &shop.sales, &shop.config, &filter, now)?;
            let path = out.unwrap_or_else(|| export_file_name(&shop.config, "Sales", now, "csv").into());
            write_file(&path, &to_csv(&report.rows, &report.summary)?)?;
            (path, report.rows.len())
        }
    };

    info!(path = %path.display(), rows, "Export written");
    let text = format!("Exported {} rows to {}\n", rows, path.display());
    CommandOutput::new(&ExportResult { path, rows }, text)
}

/// Rows, a blank line, then the summary.
pub fn to_csv<R: Serialize, S: Serialize>(rows: &[R], summary: &S) -> CliResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let mut buffer = writer.into_inner().map_err(|e| e.into_error())?;
    buffer.push(b'\n');

    let mut writer = csv::Writer::from_writer(buffer);
    writer.serialize(summary)?;
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

fn write_file(path: &Path, contents: &[u8]) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
