// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lineage analyzer trait
//!
//! The seam between the resolver and whatever computes column
//! dependencies. The built-in implementation is
//! [`crate::SqlLineageAnalyzer`]; tests plug in canned analyzers.

use crate::error::LineageResult;

/// One dependency path as reported by an analyzer
///
/// Well-formed paths start with the source column and the target column.
/// Analyzers may report longer paths (intermediate hops after the target) or
/// malformed ones; [`crate::LineageResolver`] normalizes both.
pub type DependencyPath = Vec<String>;

/// Column dependency analysis for a single statement
///
/// Implementations must be pure functions of the statement text: no side
/// effects, same input same output. They are shared across worker tasks.
///
/// # Examples
///
/// ```rust
/// use sql_coldoc_lineage::{DependencyPath, LineageAnalyzer, LineageResult};
///
/// struct Passthrough;
///
/// impl LineageAnalyzer for Passthrough {
///     fn dependencies(&self, sql: &str) -> LineageResult<Vec<DependencyPath>> {
///         Ok(vec![vec![format!("src.{sql}"), sql.to_string()]])
///     }
/// }
///
/// let paths = Passthrough.dependencies("id").unwrap();
/// assert_eq!(paths, vec![vec!["src.id".to_string(), "id".to_string()]]);
/// ```
pub trait LineageAnalyzer: Send + Sync {
    /// Dependency paths of `sql`
    ///
    /// # Errors
    ///
    /// Returns [`crate::LineageError::Parse`] when the statement cannot be
    /// parsed and [`crate::LineageError::Unsupported`] for constructs the
    /// analyzer refuses to follow.
    fn dependencies(&self, sql: &str) -> LineageResult<Vec<DependencyPath>>;
}
