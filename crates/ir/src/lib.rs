// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sql-coldoc - Data Model
//!
//! This crate provides the shared data model for column lineage analysis:
//! - Statement contexts extracted from individual SQL statements
//! - The fixed transformation taxonomy
//! - Lineage edges and per-column records
//! - The tabular report projected from the column map
//!
//! ## Data flow
//!
//! ```text
//! StatementContext + TransformationSet + LineageEdge
//!         → ColumnContext (description payload)
//!         → ColumnRecord (with description)
//!         → ColumnMap (last-writer-wins per target)
//!         → Report
//! ```

pub mod column;
pub mod dialect;
pub mod error;
pub mod lineage;
pub mod report;
pub mod statement;
pub mod transformation;

// Re-export commonly used types
pub use column::{ColumnContext, ColumnMap, ColumnRecord};
pub use dialect::Dialect;
pub use error::{IrError, IrResult};
pub use lineage::LineageEdge;
pub use report::{REPORT_HEADERS, Report, ReportRow};
pub use statement::{QueryType, StatementContext};
pub use transformation::{TransformationSet, TransformationTag, join_labels};
