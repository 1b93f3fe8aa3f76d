// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sql-coldoc - Engine
//!
//! Turns a batch of SQL statements into per-column lineage, transformation
//! tags and generated descriptions.
//!
//! ## Architecture
//!
//! ```text
//! raw SQL ─ split_statements ─┬─ statement 1 ─┐
//!                             ├─ statement 2 ─┼─ (worker pool) ─ ColumnMap ─ Report
//!                             └─ statement N ─┘
//! ```
//!
//! - [`config`]: layered [`AnalyzerConfig`] (defaults, YAML, environment)
//! - [`orchestrator`]: the [`BatchAnalyzer`] worker pool and single-writer
//!   merge
//! - [`export`]: CSV, JSON and table rendering of the report
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sql_coldoc_engine::{AnalyzerConfig, BatchAnalyzer};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnalyzerConfig::default().with_process_env();
//! let analyzer = BatchAnalyzer::from_config(&config)?;
//!
//! let columns = analyzer
//!     .analyze_columns("SELECT SUM(amount) AS total FROM orders;")
//!     .await?;
//! print!("{}", columns.report().to_table());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod orchestrator;

pub use config::{AnalyzerConfig, ConfigError, DEFAULT_WORKER_COUNT};
pub use error::{EngineError, EngineResult};
pub use export::{ExportFormat, export_report, write_report};
pub use orchestrator::{BatchAnalyzer, BatchOutput, BatchSummary};
