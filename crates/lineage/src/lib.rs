// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sql-coldoc - Lineage Layer
//!
//! Column lineage for single statements.
//!
//! ## Overview
//!
//! The [`LineageAnalyzer`] trait is the capability that computes raw
//! dependency paths. [`SqlLineageAnalyzer`] implements it on top of
//! `sqlparser`; tests substitute canned analyzers. [`LineageResolver`]
//! wraps any analyzer and turns its paths into [`LineageEdge`]s, absorbing
//! malformed paths and analyzer failures.
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use sql_coldoc_ir::{Dialect, LineageEdge};
//! use sql_coldoc_lineage::{LineageResolver, SqlLineageAnalyzer};
//!
//! let resolver = LineageResolver::new(Arc::new(SqlLineageAnalyzer::new(Dialect::Generic)));
//! let edges = resolver.resolve("SELECT SUM(amount) AS total FROM orders;");
//! assert_eq!(edges, vec![LineageEdge::new("orders.amount", "total")]);
//! ```

pub mod analyzer;
pub mod error;
pub mod resolver;
pub mod r#trait;

pub use analyzer::SqlLineageAnalyzer;
pub use error::{LineageError, LineageResult};
pub use resolver::{LineageResolver, normalize_path};
pub use r#trait::{DependencyPath, LineageAnalyzer};

pub use sql_coldoc_ir::LineageEdge;
