// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Report export
//!
//! Renders a [`Report`] as CSV, a JSON object keyed by column name, or an
//! aligned terminal table, and writes it to a file chosen by extension.

use std::fmt;
use std::path::Path;

use sql_coldoc_ir::Report;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Bordered terminal table
    #[default]
    Table,
    /// Comma-separated values with a header line
    Csv,
    /// Object keyed by column name
    Json,
}

impl ExportFormat {
    /// Format implied by `path`'s extension; anything but `.json` is CSV
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => ExportFormat::Json,
            Some("csv") => ExportFormat::Csv,
            other => {
                debug!(extension = ?other, "Unrecognized report extension, writing CSV");
                ExportFormat::Csv
            }
        }
    }

    pub fn render(&self, report: &Report) -> EngineResult<String> {
        match self {
            ExportFormat::Table => Ok(report.to_table()),
            ExportFormat::Csv => Ok(report.to_csv()),
            ExportFormat::Json => report
                .to_json()
                .map_err(|e| EngineError::Export(e.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Table => "table",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        })
    }
}

/// Write `report` to `path` in the format its extension implies
///
/// Returns the format that was written.
pub fn export_report(report: &Report, path: &Path) -> EngineResult<ExportFormat> {
    let format = ExportFormat::from_path(path);
    write_report(report, path, format)?;
    Ok(format)
}

/// Write `report` to `path` in `format`
pub fn write_report(report: &Report, path: &Path, format: ExportFormat) -> EngineResult<()> {
    let rendered = format.render(report)?;
    std::fs::write(path, rendered)?;
    info!(path = %path.display(), %format, rows = report.len(), "Report written");
    Ok(())
}
